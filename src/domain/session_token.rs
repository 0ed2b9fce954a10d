use secrecy::{ExposeSecret, Secret};

/// The opaque bearer token issued by the login endpoint.
///
/// Required by every subsequent authenticated request. The inner value is
/// wrapped in `Secret` so it cannot leak into logs by accident.
#[derive(Debug, Clone)]
pub struct SessionToken(Secret<String>);

impl SessionToken {
    /// Returns an instance of `SessionToken` if the input satisfies
    /// our validation constraints on tokens, `Err` otherwise.
    pub fn parse(s: String) -> Result<SessionToken, String> {
        if s.trim().is_empty() {
            return Err("The login response contained an empty token.".to_string());
        }
        if s.chars().any(char::is_whitespace) {
            return Err(format!("`{}` is not a valid session token.", s));
        }
        Ok(Self(Secret::new(s)))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// A short, loggable prefix of the token.
    pub fn preview(&self) -> String {
        let token = self.0.expose_secret();
        let prefix: String = token.chars().take(8).collect();
        format!("{}…", prefix)
    }
}
