//! Upload guard for image attachments.

use crate::models::Upload;
use crate::{Error, Result};

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_MIME_PREFIX: &str = "image/";

pub const FILE_TOO_LARGE: &str = "File too large. Max size is 5MB";
pub const ONLY_IMAGES: &str = "Only images are allowed";

/// Size ceiling and MIME allow-list applied to every upload.
#[derive(Debug, Clone, Copy)]
pub struct UploadGuard {
    max_bytes: usize,
    mime_prefix: &'static str,
}

impl Default for UploadGuard {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
            mime_prefix: ALLOWED_MIME_PREFIX,
        }
    }
}

impl UploadGuard {
    /// Returns the upload unchanged when it is an image within the size limit.
    ///
    /// The declared type is checked first; the bytes themselves are never
    /// inspected.
    pub fn check(&self, upload: Upload) -> Result<Upload> {
        if !self.is_allowed_type(&upload.content_type) {
            tracing::warn!(
                "Rejected upload {:?}: content type {}",
                upload.file_name,
                upload.content_type
            );
            return Err(Error::client_input(ONLY_IMAGES));
        }

        if upload.size() > self.max_bytes {
            tracing::warn!(
                "Rejected upload {:?}: {} bytes exceeds {}",
                upload.file_name,
                upload.size(),
                self.max_bytes
            );
            return Err(Error::client_input(FILE_TOO_LARGE));
        }

        Ok(upload)
    }

    pub fn is_allowed_type(&self, content_type: &str) -> bool {
        content_type
            .get(..self.mime_prefix.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(self.mime_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: &str, size: usize) -> Upload {
        Upload {
            file_name: Some("leaf.png".to_string()),
            content_type: content_type.to_string(),
            bytes: vec![0u8; size],
        }
    }

    fn reason(err: Error) -> String {
        match err {
            Error::ClientInput(reason) => reason,
            other => panic!("expected client input error, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_image_within_limit() {
        let input = upload("image/png", 1024);
        let checked = UploadGuard::default().check(input.clone()).unwrap();
        assert_eq!(checked, input);
    }

    #[test]
    fn test_accepts_exactly_max_size() {
        assert!(UploadGuard::default()
            .check(upload("image/jpeg", MAX_UPLOAD_BYTES))
            .is_ok());
    }

    #[test]
    fn test_rejects_one_byte_over_limit() {
        let err = UploadGuard::default()
            .check(upload("image/jpeg", MAX_UPLOAD_BYTES + 1))
            .unwrap_err();
        assert_eq!(reason(err), FILE_TOO_LARGE);
    }

    #[test]
    fn test_rejects_non_image_regardless_of_content() {
        let mut input = upload("text/plain", 0);
        // PNG signature, declared as text
        input.bytes = vec![0x89, 0x50, 0x4E, 0x47];
        let err = UploadGuard::default().check(input).unwrap_err();
        assert_eq!(reason(err), ONLY_IMAGES);
    }

    #[test]
    fn test_type_checked_before_size() {
        let err = UploadGuard::default()
            .check(upload("application/pdf", MAX_UPLOAD_BYTES + 1))
            .unwrap_err();
        assert_eq!(reason(err), ONLY_IMAGES);
    }

    #[test]
    fn test_allowed_type_matching() {
        let guard = UploadGuard::default();
        assert!(guard.is_allowed_type("image/webp"));
        assert!(guard.is_allowed_type("IMAGE/PNG"));
        assert!(!guard.is_allowed_type("image"));
        assert!(!guard.is_allowed_type("video/mp4"));
        assert!(!guard.is_allowed_type(""));
    }
}
