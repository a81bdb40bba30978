use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use roombook_api::auth::{AccessLevel, JwtCodec};

pub const JWT_SECRET: &str = "integration-jwt-secret";
pub const CSRF_SECRET: &str = "integration-csrf-secret";

pub struct TestServer {
    pub base_url: String,
    child: Child,
}

impl TestServer {
    /// Spawn the server binary on a free port. The database URL points at a
    /// closed port, so anything reaching the store fails fast.
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_roombook-api"))
            .env("APP_ENV", "development")
            .env("ROOMBOOK_API_PORT", port.to_string())
            .env("DATABASE_URL", "postgres://roombook@127.0.0.1:1/roombook")
            .env("DATABASE_CONNECTION_TIMEOUT", "1")
            .env("JWT_SECRET", JWT_SECRET)
            .env("CSRF_SECRET", CSRF_SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        let server = Self { base_url, child };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                let status = resp.status();
                if status == StatusCode::OK || status == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn bearer(user: &str, level: AccessLevel) -> Result<String> {
    let token = JwtCodec::new(JWT_SECRET, 1).issue(user, level)?;
    Ok(format!("Bearer {}", token))
}
