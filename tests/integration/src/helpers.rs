//! Test helpers for integration tests
//!
//! Spawns the full application on an ephemeral port and hands out
//! cookie-carrying clients, one per simulated user.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use chat_api::{create_app, create_app_state};
use chat_common::AppConfig;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{AuthResponse, Credentials, CurrentUser, ErrorBody};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub config: AppConfig,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config.clone()).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        tokio::time::sleep(Duration::from_millis(50)).await;

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client with no session
    pub fn anonymous(&self) -> Session {
        Session::new(self.base_url(), None)
    }

    /// Register a fresh user; the returned client carries its session cookie
    pub async fn register(&self, prefix: &str) -> Result<Session> {
        let credentials = Credentials::unique(prefix);
        let session = self.anonymous();
        let response = session.post("/api/register", &credentials).await?;
        let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await?;
        Ok(session.with_auth(auth, credentials))
    }

    /// Log in again with a new client
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let session = self.anonymous();
        let response = session.post("/api/login", credentials).await?;
        let auth: AuthResponse = assert_json(response, StatusCode::OK).await?;
        Ok(session.with_auth(auth, credentials.clone()))
    }
}

/// One simulated user: its own cookie jar plus what registration returned
pub struct Session {
    base_url: String,
    pub client: Client,
    pub auth: Option<AuthResponse>,
    pub credentials: Option<Credentials>,
}

impl Session {
    fn new(base_url: String, auth: Option<AuthResponse>) -> Self {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            base_url,
            client,
            auth,
            credentials: None,
        }
    }

    fn with_auth(mut self, auth: AuthResponse, credentials: Credentials) -> Self {
        self.auth = Some(auth);
        self.credentials = Some(credentials);
        self
    }

    pub fn user(&self) -> &CurrentUser {
        match &self.auth {
            Some(auth) => &auth.user,
            None => panic!("anonymous session has no user"),
        }
    }

    pub fn id(&self) -> &str {
        &self.user().id
    }

    pub fn username(&self) -> &str {
        &self.user().username
    }

    pub fn token(&self) -> &str {
        match &self.auth {
            Some(auth) => &auth.token,
            None => panic!("anonymous session has no token"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// POST without a body
    pub async fn post_empty(&self, path: &str) -> Result<Response> {
        Ok(self.client.post(self.url(path)).send().await?)
    }

    pub async fn patch<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.patch(self.url(path)).json(body).send().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).send().await?)
    }

    pub async fn delete_with<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).json(body).send().await?)
    }
}

/// Create a test configuration
///
/// Reads the environment, binds nowhere in particular, raises the rate limit
/// so bursts of test requests are not throttled, and uploads into a temp dir.
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::from_lookup(|key| match key {
        "API_PORT" => std::env::var(key).ok().or_else(|| Some("0".to_string())),
        _ => std::env::var(key).ok(),
    })
    .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    config.rate_limit.requests_per_second = 1000;
    config.rate_limit.burst = 1000;
    config.session.cookie_secure = false;
    config.storage.upload_dir = std::env::temp_dir()
        .join(format!("chat-uploads-{}", uuid::Uuid::new_v4().simple()))
        .to_string_lossy()
        .into_owned();

    Ok(config)
}

/// Helper to check if test environment is available
pub async fn check_test_env() -> bool {
    for var in ["DATABASE_URL", "JWT_SECRET"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}

/// Assert an error status and return the error code from the envelope
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<ErrorBody> {
    assert_json(response, expected_status).await
}
