use crate::domain::{Credentials, SessionToken, UserProfile};
use crate::telemetry::error_chain_fmt;
use reqwest::{Client, Method, StatusCode};
use secrecy::ExposeSecret;

/// A client for the token-auth contract exposed by the remote service:
/// `POST /auth/login/` issues a token, `GET /auth/user/` and
/// `POST /auth/logout/` consume it.
#[derive(Clone, Debug)]
pub struct AuthApiClient {
    base_url: String,
    http_client: Client,
}

#[derive(serde::Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(serde::Deserialize)]
struct LoginResponse {
    key: String,
}

#[derive(thiserror::Error)]
pub enum AuthApiError {
    #[error("The authentication service rejected the credentials ({status}): {body}")]
    InvalidCredentials { status: StatusCode, body: String },
    #[error("The authentication service rejected the session token: {body}")]
    Unauthorized { body: String },
    #[error("The authentication service answered {status} where a success was expected: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error("Failed to reach the authentication service.")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to interpret the authentication service's response: {0}")]
    MalformedResponse(String),
}

impl std::fmt::Debug for AuthApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// The outcome of poking a single route of the contract without valid
/// credentials. Any HTTP answer counts as reachable; 400, 401 and 405 are
/// what a healthy deployment returns to an anonymous probe.
#[derive(Debug)]
pub struct EndpointProbe {
    pub method: Method,
    pub path: &'static str,
    pub status: Result<StatusCode, reqwest::Error>,
}

impl EndpointProbe {
    pub fn is_reachable(&self) -> bool {
        self.status.is_ok()
    }
}

const PROBED_ENDPOINTS: [(Method, &str); 3] = [
    (Method::POST, "/auth/login/"),
    (Method::GET, "/auth/user/"),
    (Method::POST, "/auth/logout/"),
];

impl AuthApiClient {
    pub fn new(base_url: String, timeout: std::time::Duration) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();
        Self {
            http_client,
            base_url,
        }
    }

    #[tracing::instrument(
        name = "Logging in against the authentication service",
        skip(self, credentials),
        fields(username = %credentials.username)
    )]
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionToken, AuthApiError> {
        let url = format!("{}/auth/login/", self.base_url);
        let request_body = LoginRequest {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
        };
        let response = self
            .http_client
            .post(&url)
            .header("Accept", "application/json")
            .json(&request_body)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(AuthApiError::InvalidCredentials { status, body });
        }
        if !status.is_success() {
            return Err(AuthApiError::UnexpectedStatus { status, body });
        }
        let login: LoginResponse = serde_json::from_str(&body).map_err(|e| {
            AuthApiError::MalformedResponse(format!(
                "the login body carried no usable `key` field: {}",
                e
            ))
        })?;
        SessionToken::parse(login.key).map_err(AuthApiError::MalformedResponse)
    }

    #[tracing::instrument(name = "Fetching the user profile", skip(self, token))]
    pub async fn fetch_profile(&self, token: &SessionToken) -> Result<UserProfile, AuthApiError> {
        let url = format!("{}/auth/user/", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", token.expose()),
            )
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AuthApiError::Unauthorized { body });
        }
        if !status.is_success() {
            return Err(AuthApiError::UnexpectedStatus { status, body });
        }
        serde_json::from_str(&body).map_err(|e| {
            AuthApiError::MalformedResponse(format!("the profile body could not be parsed: {}", e))
        })
    }

    #[tracing::instrument(name = "Logging out", skip(self, token))]
    pub async fn logout(&self, token: &SessionToken) -> Result<(), AuthApiError> {
        let url = format!("{}/auth/logout/", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", token.expose()),
            )
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            let body = response.text().await?;
            return Err(AuthApiError::Unauthorized { body });
        }
        if !status.is_success() {
            let body = response.text().await?;
            return Err(AuthApiError::UnexpectedStatus { status, body });
        }
        Ok(())
    }

    /// Pokes each route of the contract anonymously and records whether the
    /// service answered at all.
    #[tracing::instrument(name = "Probing endpoint availability", skip(self))]
    pub async fn probe_endpoints(&self) -> Vec<EndpointProbe> {
        let mut probes = Vec::with_capacity(PROBED_ENDPOINTS.len());
        for (method, path) in PROBED_ENDPOINTS {
            let url = format!("{}{}", self.base_url, path);
            let request = if method == Method::POST {
                self.http_client.post(&url).json(&serde_json::json!({}))
            } else {
                self.http_client.get(&url)
            };
            let status = request.send().await.map(|response| response.status());
            match &status {
                Ok(code) => tracing::info!(%method, path, status = %code, "Endpoint answered"),
                Err(e) => tracing::warn!(%method, path, error = %e, "Endpoint unreachable"),
            }
            probes.push(EndpointProbe {
                method,
                path,
                status,
            });
        }
        probes
    }
}
