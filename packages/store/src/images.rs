//! Rules for images attached to the site: upload limits, object naming, buckets and the
//! render-time fallback. Shared by the editor (to reject a file before sending it) and the
//! server (to enforce the same rules on what it receives).

use crate::error::ValidationError;

/// Largest accepted upload, inclusive.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Image shown wherever a project or preview image is missing or fails to load.
pub const FALLBACK_IMAGE: &str = "/assets/project-placeholder.svg";

/// Accepted upload formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Object storage buckets. Objects in both are publicly readable once written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bucket {
    /// Social preview images referenced by `metadata.og_image`.
    OgImages,
    /// Per-project images referenced by `projects.image_url`.
    ProjectImages,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OgImages => "og-images",
            Self::ProjectImages => "project-images",
        }
    }
}

/// Check size first, then type.
pub fn validate_upload(size: u64, mime: &str) -> Result<ImageKind, ValidationError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge { size });
    }
    ImageKind::from_mime(mime).ok_or_else(|| ValidationError::UnsupportedType {
        mime: mime.to_string(),
    })
}

/// Collision-resistant object name: `<entity>-<millis>.<ext>`.
///
/// The extension comes from the original file name when it has one, otherwise from the
/// detected kind.
pub fn object_name(entity: &str, uploaded_at_millis: u64, file_name: &str, kind: ImageKind) -> String {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| kind.extension().to_string());
    format!("{entity}-{uploaded_at_millis}.{extension}")
}

/// Whether a `Content-Type` header value names an image.
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.trim().to_ascii_lowercase().starts_with("image/")
}

/// The URL to render for an optional image reference.
pub fn image_or_fallback(url: &str) -> &str {
    if url.trim().is_empty() {
        FALLBACK_IMAGE
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_file_is_rejected_before_type_check() {
        let err = validate_upload(6 * 1024 * 1024, "image/jpeg").unwrap_err();
        assert_eq!(err, ValidationError::FileTooLarge { size: 6 * 1024 * 1024 });

        let err = validate_upload(6 * 1024 * 1024, "image/gif").unwrap_err();
        assert!(matches!(err, ValidationError::FileTooLarge { .. }));
    }

    #[test]
    fn limit_is_inclusive() {
        assert_eq!(validate_upload(MAX_UPLOAD_BYTES, "image/png"), Ok(ImageKind::Png));
        assert!(validate_upload(MAX_UPLOAD_BYTES + 1, "image/png").is_err());
    }

    #[test]
    fn only_jpeg_and_png_are_accepted() {
        assert_eq!(validate_upload(10, "image/jpeg"), Ok(ImageKind::Jpeg));
        assert_eq!(
            validate_upload(10, "image/webp"),
            Err(ValidationError::UnsupportedType {
                mime: "image/webp".to_string()
            })
        );
        assert!(validate_upload(10, "image/jpg").is_err());
    }

    #[test]
    fn object_names_keep_original_extension() {
        assert_eq!(
            object_name("7", 1_700_000_000_000, "Screen Shot.PNG", ImageKind::Png),
            "7-1700000000000.png"
        );
        assert_eq!(
            object_name("og", 42, "cover", ImageKind::Jpeg),
            "og-42.jpg"
        );
    }

    #[test]
    fn content_type_check() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("Image/JPEG; charset=binary"));
        assert!(!is_image_content_type("text/html"));
    }

    #[test]
    fn blank_image_falls_back() {
        assert_eq!(image_or_fallback(""), FALLBACK_IMAGE);
        assert_eq!(image_or_fallback("/uploads/a.png"), "/uploads/a.png");
    }
}
