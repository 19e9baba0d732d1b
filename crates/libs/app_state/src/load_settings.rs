use crate::{AppConstants, AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

const DEFAULT_SETTINGS_PATH: &str = "config/settings.yaml";

fn read_raw_settings(path: &Path, with_env: bool) -> Result<RawSettings> {
    let config_path = path.canonicalize()?;
    let mut builder = config::Config::builder().add_source(config::File::from(config_path));
    if with_env {
        builder = builder.add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );
    }

    Ok(builder.build()?.try_deserialize::<RawSettings>()?)
}

/// Load settings from `config/settings.yaml`, overlaid with `.env` and `APP__*` variables.
pub fn load_app_settings() -> Result<AppSettings> {
    // dotenv first, so its values reach the environment source below.
    dotenv::from_path(".env").ok();
    load_settings_from_path(Path::new(DEFAULT_SETTINGS_PATH), true)
}

pub fn load_settings_from_path(path: &Path, with_env: bool) -> Result<AppSettings> {
    let settings: AppSettings = read_raw_settings(path, with_env)?.into();
    std::fs::create_dir_all(&settings.storage.media_folder)?;
    Ok(settings)
}

pub fn load_constants_from_path(path: &Path) -> Result<AppConstants> {
    Ok(read_raw_settings(path, false)?.into())
}

pub static CONSTANTS: OnceLock<AppConstants> = OnceLock::new();

/// Install the constants used by [`constants`]. Returns `false` if they were already set.
pub fn init_constants(app_constants: AppConstants) -> bool {
    CONSTANTS.set(app_constants).is_ok()
}

#[must_use]
pub fn constants() -> &'static AppConstants {
    CONSTANTS.get_or_init(|| {
        match load_constants_from_path(Path::new(DEFAULT_SETTINGS_PATH)) {
            Ok(loaded) => {
                info!("Loaded app constants from {DEFAULT_SETTINGS_PATH}");
                loaded
            }
            Err(e) => {
                warn!("Cannot load app constants ({e}), using defaults.");
                AppConstants::default()
            }
        }
    })
}
