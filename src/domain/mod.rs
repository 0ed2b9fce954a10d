mod credentials;
mod session_token;
mod user_profile;

pub use credentials::Credentials;
pub use session_token::SessionToken;
pub use user_profile::UserProfile;
