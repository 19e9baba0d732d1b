use api::serve;
use app_state::load_app_settings;
use color_eyre::Result;
use common_services::database::get_db_pool;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = load_app_settings()?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "api={level},common_services={level},tower_http=debug",
                    level = settings.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    color_eyre::install()?;

    let pool = get_db_pool(&settings).await?;
    serve(pool, settings).await?;

    Ok(())
}
