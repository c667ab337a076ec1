use std::path::Path;
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Extract the lowercase extension of an upload, if it is an accepted
/// picture type.
fn picture_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Store an uploaded profile picture under a random filename and return
/// the stored name. The bytes are written untouched; thumbnailing is out
/// of scope.
pub async fn save_picture(
    upload_dir: &Path,
    original_name: &str,
    data: &[u8],
) -> Result<String, AppError> {
    let Some(ext) = picture_extension(original_name) else {
        return Err(AppError::Validation(
            "profile pictures must be jpg or png files".to_string(),
        ));
    };

    let stored_name = format!("{}.{}", Uuid::new_v4().simple(), ext);
    let target = upload_dir.join(&stored_name);

    fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("could not create upload directory: {e}")))?;
    fs::write(&target, data)
        .await
        .map_err(|e| AppError::Internal(format!("could not store picture: {e}")))?;

    info!("stored profile picture {} ({} bytes)", stored_name, data.len());
    Ok(stored_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picture_extension_filtering() {
        assert_eq!(picture_extension("me.jpg"), Some("jpg".to_string()));
        assert_eq!(picture_extension("me.JPEG"), Some("jpeg".to_string()));
        assert_eq!(picture_extension("me.PNG"), Some("png".to_string()));
        assert_eq!(picture_extension("script.sh"), None);
        assert_eq!(picture_extension("noextension"), None);
        assert_eq!(picture_extension(""), None);
    }

    #[tokio::test]
    async fn test_save_rejects_unknown_extension() {
        let dir = std::env::temp_dir().join("travelbook-upload-test-reject");
        let result = save_picture(&dir, "payload.exe", b"MZ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_save_writes_bytes_under_random_name() {
        let dir = std::env::temp_dir().join(format!(
            "travelbook-upload-test-{}",
            Uuid::new_v4().simple()
        ));

        let stored = save_picture(&dir, "me.jpg", &[0xFF, 0xD8, 0xFF]).await.unwrap();
        assert!(stored.ends_with(".jpg"));
        assert_ne!(stored, "me.jpg");

        let written = tokio::fs::read(dir.join(&stored)).await.unwrap();
        assert_eq!(written, vec![0xFF, 0xD8, 0xFF]);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
