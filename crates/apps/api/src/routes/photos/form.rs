use axum::extract::Multipart;
use common_services::api::photos::error::PhotoError;
use common_services::api::photos::interfaces::{ImageFile, PhotoUpload};
use serde_json::Value;

const IMAGE_FIELDS: [&str; 3] = ["image", "images", "images[]"];

fn parse_bool(value: &str) -> Result<bool, PhotoError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        other => Err(PhotoError::BadRequest(format!(
            "'{other}' is not a valid boolean."
        ))),
    }
}

fn parse_metadata(value: &str) -> Result<Value, PhotoError> {
    if value.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(value)
        .map_err(|e| PhotoError::BadRequest(format!("metadata is not valid JSON: {e}")))
}

/// Reads a multipart photo upload. Unknown fields are ignored.
pub async fn read_upload(mut multipart: Multipart) -> Result<PhotoUpload, PhotoError> {
    let mut upload = PhotoUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PhotoError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        if IMAGE_FIELDS.contains(&name.as_str()) {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| PhotoError::BadRequest(e.body_text()))?;
            upload.images.push(ImageFile {
                file_name,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        match name.as_str() {
            "is_bookmarked" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| PhotoError::BadRequest(e.body_text()))?;
                upload.is_bookmarked = parse_bool(&text)?;
            }
            "metadata" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| PhotoError::BadRequest(e.body_text()))?;
                upload.metadata = parse_metadata(&text)?;
            }
            _ => {}
        }
    }

    Ok(upload)
}
