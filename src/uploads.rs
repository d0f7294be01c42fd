use std::path::Path;

use uuid::Uuid;

use crate::error::AppError;

/// Persist one uploaded image under the uploads directory and return the
/// web path it will be served from. The directory is created on first use.
/// Filenames are a fresh UUID plus the (sanitized) original extension, so
/// two uploads can never collide.
pub async fn save_image(
    uploads_dir: &Path,
    original_name: &str,
    data: &[u8],
) -> Result<String, AppError> {
    tokio::fs::create_dir_all(uploads_dir).await?;

    let filename = format!("{}.{}", Uuid::new_v4(), file_extension(original_name));
    tokio::fs::write(uploads_dir.join(&filename), data).await?;

    Ok(format!("/uploads/{filename}"))
}

/// Lowercased alphanumeric extension of the client-supplied filename,
/// capped at 8 chars. Anything else falls back to `bin`; the original name
/// never reaches the filesystem.
fn file_extension(original_name: &str) -> String {
    let ext: String = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_lowercase();
    if ext.is_empty() {
        "bin".to_string()
    } else {
        ext
    }
}
