use app_state::AppSettings;
use color_eyre::eyre::Result;
use std::path::Path;

/// Points the settings at a scratch folder: a fresh SQLite file, its own media
/// folder and the port the server was bound to.
pub fn create_test_settings(
    base_settings: &AppSettings,
    data_dir: &Path,
    port: u16,
) -> Result<AppSettings> {
    let mut settings = base_settings.clone();

    let media_folder = data_dir.join("media");
    std::fs::create_dir_all(&media_folder)?;
    settings.storage.media_folder = media_folder;

    settings.api.port = port;
    settings.api.public_url = format!("http://127.0.0.1:{port}");
    settings.secrets.database_url = format!("sqlite://{}", data_dir.join("test.db").display());

    Ok(settings)
}
