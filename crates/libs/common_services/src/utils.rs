use std::path::Path;

/// Generate a URL-safe random ID of a given length.
#[must_use]
pub fn nice_id(length: usize) -> String {
    const URL_SAFE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_";
    (0..length)
        .map(|_| {
            let idx = rand::random_range(0..URL_SAFE.len());
            URL_SAFE[idx] as char
        })
        .collect()
}

/// Longest image format stored on a photo.
pub const MAX_FORMAT_LENGTH: usize = 10;

/// Lowercased extension of an uploaded file name, if it names an image type.
///
/// `"Holiday.JPG"` gives `Some("jpg")`, `"notes.txt"` and `"image"` give `None`.
#[must_use]
pub fn image_format(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name).extension()?.to_str()?.to_lowercase();
    if extension.is_empty() || extension.len() > MAX_FORMAT_LENGTH {
        return None;
    }
    let is_image = mime_guess::from_ext(&extension)
        .iter()
        .any(|mime| mime.type_() == mime_guess::mime::IMAGE);
    is_image.then_some(extension)
}
