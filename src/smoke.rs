use crate::auth_client::{AuthApiClient, AuthApiError};
use crate::configuration::Settings;
use crate::domain::{Credentials, UserProfile};
use crate::telemetry::error_chain_fmt;

/// The scripted smoke test: probe the contract's routes, log in with the
/// configured test account, fetch the profile the token grants access to,
/// then log out. Steps run strictly in sequence and the first failure
/// aborts the rest.
pub struct SmokeTest {
    client: AuthApiClient,
    credentials: Credentials,
}

#[derive(Debug)]
pub struct SmokeReport {
    pub probed_endpoints: usize,
    pub reachable_endpoints: usize,
    pub token_preview: String,
    pub profile: UserProfile,
}

#[derive(thiserror::Error)]
pub enum SmokeError {
    #[error("No probed endpoint answered; the service looks unreachable.")]
    ServiceUnreachable,
    #[error("The login step failed.")]
    Login(#[source] AuthApiError),
    #[error("The profile step failed.")]
    Profile(#[source] AuthApiError),
    #[error("The logout step failed.")]
    Logout(#[source] AuthApiError),
}

impl std::fmt::Debug for SmokeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl SmokeTest {
    pub fn new(settings: &Settings) -> Self {
        let client = AuthApiClient::new(settings.api.base_url.clone(), settings.api.timeout());
        Self {
            client,
            credentials: settings.credentials.as_credentials(),
        }
    }

    #[tracing::instrument(name = "Running the authentication smoke test", skip(self))]
    pub async fn run(&self) -> Result<SmokeReport, SmokeError> {
        let probes = self.client.probe_endpoints().await;
        let reachable_endpoints = probes.iter().filter(|p| p.is_reachable()).count();
        if reachable_endpoints == 0 {
            return Err(SmokeError::ServiceUnreachable);
        }

        let token = self
            .client
            .login(&self.credentials)
            .await
            .map_err(SmokeError::Login)?;
        tracing::info!(token = %token.preview(), "Login succeeded");

        let profile = self
            .client
            .fetch_profile(&token)
            .await
            .map_err(SmokeError::Profile)?;
        tracing::info!(username = %profile.username, "Profile fetched");

        self.client.logout(&token).await.map_err(SmokeError::Logout)?;
        tracing::info!("Logout succeeded");

        Ok(SmokeReport {
            probed_endpoints: probes.len(),
            reachable_endpoints,
            token_preview: token.preview(),
            profile,
        })
    }
}
