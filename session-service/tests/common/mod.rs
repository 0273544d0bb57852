use std::sync::Arc;

use auth::HashCost;
use auth::ManualClock;
use auth::PasswordHasher;
use auth::SessionGuard;
use auth::SessionPolicy;
use auth::TokenCodec;
use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use serde_json::json;
use session_service::domain::credential::service::AuthService;
use session_service::inbound::http::router::create_router;
use session_service::outbound::repositories::InMemoryCredentialStore;

const TEST_SECRET: &[u8] = b"test-secret-key-for-session-signing-32-bytes";

/// Test application that spawns a real server over an in-memory store.
///
/// Every component shares one manual clock, so tests move time forward
/// instead of sleeping.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub token_codec: Arc<TokenCodec>,
    pub store: Arc<InMemoryCredentialStore>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_policy(SessionPolicy::default()).await
    }

    pub async fn spawn_with_policy(policy: SessionPolicy) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let clock = Arc::new(ManualClock::new(Self::start_time()));
        let token_codec = Arc::new(TokenCodec::with_clock(TEST_SECRET, clock.clone()));
        let store = Arc::new(InMemoryCredentialStore::new());

        // Cheap parameters keep hashing fast under test.
        let password_hasher = PasswordHasher::with_cost(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");

        let auth_service = Arc::new(AuthService::new(
            store.clone(),
            password_hasher,
            token_codec.clone(),
            policy.ttl(),
        ));
        let session_guard = Arc::new(SessionGuard::new(token_codec.clone(), policy));

        let router = create_router(auth_service, session_guard);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            clock,
            token_codec,
            store,
        }
    }

    /// Instant every test app's clock starts at.
    pub fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and log in, returning the issued token.
    pub async fn session_token(&self, email: &str, password: &str) -> String {
        self.register(email, password).await;
        let body: serde_json::Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        body["data"]["token"]
            .as_str()
            .expect("login response carries a token")
            .to_string()
    }
}
