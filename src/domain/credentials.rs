use secrecy::Secret;

/// The test account presented to the login endpoint.
pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}
