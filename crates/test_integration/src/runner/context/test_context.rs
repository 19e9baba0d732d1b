use crate::runner::context::context_utils::create_test_settings;
use app_state::{AppSettings, init_constants, load_constants_from_path, load_settings_from_path};
use color_eyre::eyre::{Result, eyre};
use common_services::database::get_db_pool;
use reqwest::Client;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The main context for our integration tests.
#[allow(dead_code)]
pub struct TestContext {
    pub pool: SqlitePool,
    pub settings: AppSettings,
    pub http_client: Client,
    // Kept for cleanup on Drop
    data_dir: TempDir,
    api_handle: JoinHandle<()>,
}

impl TestContext {
    /// Starts the API on an ephemeral port, backed by a temporary database and media folder.
    pub async fn new() -> Result<Self> {
        info!("Setting up test environment...");

        let settings_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("assets/settings.yaml")
            .canonicalize()?;
        let base_settings = load_settings_from_path(&settings_path, false)?;
        if !init_constants(load_constants_from_path(&settings_path)?) {
            info!("AppConstants were already initialized.");
        }

        let data_dir = TempDir::new()?;
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let settings = create_test_settings(&base_settings, data_dir.path(), port)?;

        let pool = get_db_pool(&settings).await?;
        let api_handle = Self::spawn_api(listener, &pool, &settings);

        let http_client = Client::new();
        Self::wait_for_healthy_api(&settings, &http_client).await?;

        info!("Test environment is ready.");
        Ok(Self {
            pool,
            settings,
            http_client,
            data_dir,
            api_handle,
        })
    }

    fn spawn_api(listener: TcpListener, pool: &SqlitePool, settings: &AppSettings) -> JoinHandle<()> {
        let api_pool = pool.clone();
        let api_settings = settings.clone();
        tokio::spawn(async move {
            if let Err(e) = api::serve_on(listener, api_pool, api_settings).await {
                error!("API server failed: {}", e);
            }
        })
    }

    /// Polls the health endpoint until it answers successfully or times out.
    async fn wait_for_healthy_api(settings: &AppSettings, http_client: &Client) -> Result<()> {
        for attempt in 1..=20 {
            info!("Health check attempt {}...", attempt);
            let health_url = format!("{}/api/health", settings.api.base_url());
            match http_client.get(&health_url).send().await {
                Ok(response) if response.status().is_success() => {
                    info!("API is healthy!");
                    return Ok(());
                }
                Ok(response) => {
                    warn!(
                        "API health check returned non-success status: {}",
                        response.status()
                    );
                }
                Err(e) => {
                    warn!("API health check failed: {:?}. Retrying...", e);
                }
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        Err(eyre!(
            "API did not become healthy within the timeout period."
        ))
    }

    /// Absolute url for an api path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api.base_url(), path)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.api_handle.abort();
        info!("Teardown complete.");
    }
}
