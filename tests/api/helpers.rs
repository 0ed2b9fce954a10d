use authsmoke::configuration::{ApiSettings, CredentialSettings, Settings};
use authsmoke::smoke::SmokeTest;
use authsmoke::telemetry::{get_subscriber, init_subscriber};
use secrecy::Secret;
use std::sync::LazyLock;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Ensure that the `tracing` stack is only initialised once using `LazyLock`
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    // We cannot assign the output of `get_subscriber` to a variable based on the
    // value TEST_LOG` because the sink is part of the type returned by
    // `get_subscriber`, therefore they are not the same type. We could work around
    // it, but this is the most straight-forward way of moving forward.
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub const TEST_TOKEN: &str = "b7c9843596cefad112dea7316f496abebd6a39b1";

/// A wiremock stand-in for the remote authentication service, plus the
/// settings pointing the smoke test at it.
pub struct TestService {
    pub mock_server: MockServer,
    pub settings: Settings,
}

pub async fn spawn_service() -> TestService {
    // The first time `force` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    LazyLock::force(&TRACING);

    // An exclusive (unpooled) server is required: pooled servers from
    // `MockServer::start` keep listening after drop, which would break tests
    // that drop the service to simulate an unreachable server.
    let mock_server = MockServer::builder().start().await;
    let settings = Settings {
        api: ApiSettings {
            base_url: mock_server.uri(),
            timeout_milliseconds: 500,
        },
        credentials: CredentialSettings {
            username: "frontend4561".to_string(),
            password: Secret::new("TestIrVpejwCK9#x@123".to_string()),
        },
    };
    TestService {
        mock_server,
        settings,
    }
}

impl TestService {
    pub fn smoke_test(&self) -> SmokeTest {
        SmokeTest::new(&self.settings)
    }

    fn authorization_header(&self) -> String {
        format!("Token {}", TEST_TOKEN)
    }

    // No `expect` on the login mock: the availability probe hits the same
    // route anonymously before the real login does.
    pub async fn mount_login_success(&self) {
        Mock::given(path("/auth/login/"))
            .and(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "key": TEST_TOKEN })),
            )
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_login_rejection(&self) {
        Mock::given(path("/auth/login/"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "non_field_errors": ["Unable to log in with provided credentials."]
            })))
            .mount(&self.mock_server)
            .await;
    }

    // The Authorization matcher keeps the anonymous probe from being
    // counted against the mock's expectations.
    pub async fn mount_profile_success(&self) {
        Mock::given(path("/auth/user/"))
            .and(method("GET"))
            .and(header("Authorization", self.authorization_header().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "pk": 42,
                "username": "frontend4561",
                "email": "frontend@example.com",
                "first_name": "",
                "last_name": ""
            })))
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_profile_rejection(&self) {
        Mock::given(path("/auth/user/"))
            .and(method("GET"))
            .and(header("Authorization", self.authorization_header().as_str()))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "detail": "Invalid token."
            })))
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_profile_never_called(&self) {
        Mock::given(path("/auth/user/"))
            .and(method("GET"))
            .and(header("Authorization", self.authorization_header().as_str()))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_logout_success(&self) {
        Mock::given(path("/auth/logout/"))
            .and(method("POST"))
            .and(header("Authorization", self.authorization_header().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "detail": "Successfully logged out."
            })))
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_logout_never_called(&self) {
        Mock::given(path("/auth/logout/"))
            .and(method("POST"))
            .and(header("Authorization", self.authorization_header().as_str()))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&self.mock_server)
            .await;
    }
}
