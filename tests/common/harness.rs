//! Test server harness.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use concierge::config::{Config, EmbedderKind};
use concierge::gateway::{HandlerState, create_router_with_state};
use concierge::service::Concierge;

use super::fixtures;

const STARTUP_WAIT_TIMEOUT: Duration = Duration::from_secs(5);
const STARTUP_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct TestServer {
    pub addr: SocketAddr,
    pub concierge: Arc<Concierge>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _temp_dir: TempDir,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn index_dir(&self) -> PathBuf {
        self._temp_dir.path().join("index")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

async fn wait_for_server_ready(addr: SocketAddr) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();
    loop {
        if start.elapsed() > STARTUP_WAIT_TIMEOUT {
            return Err(ServerStartupError::Timeout);
        }
        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => tokio::time::sleep(STARTUP_POLL_INTERVAL).await,
        }
    }
}

/// Boots the real router on an ephemeral port: seeded JSON store, stub
/// embedder, no generative model.
pub async fn spawn_test_server() -> Result<TestServer, ServerStartupError> {
    let temp_dir = TempDir::new()?;
    let seed_path = temp_dir.path().join("seed.json");
    let seed = serde_json::to_vec(&fixtures::seed())
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    std::fs::write(&seed_path, seed)?;
    let index_dir = temp_dir.path().join("index");
    std::fs::create_dir_all(&index_dir)?;

    let config = Config {
        port: 0,
        index_dir,
        seed_path: Some(seed_path),
        embedder: EmbedderKind::Stub,
        embed_dim: Some(32),
        ..Default::default()
    };
    config
        .validate()
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let concierge = Arc::new(
        Concierge::from_config(&config)
            .await
            .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?,
    );
    let app = create_router_with_state(HandlerState::new(Arc::clone(&concierge)));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    wait_for_server_ready(addr).await?;

    Ok(TestServer {
        addr,
        concierge,
        _server_handle: handle,
        shutdown_tx: Some(shutdown_tx),
        _temp_dir: temp_dir,
    })
}
