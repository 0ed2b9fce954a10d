/// The profile returned by the `/auth/user/` endpoint.
///
/// The contract only promises an opaque user object; we pick out the fields
/// we report on and keep whatever else the server sent in `extra`.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct UserProfile {
    pub pk: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
