//! Object-storage buckets, object path rules and upload validation.

use uuid::Uuid;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

pub const BUCKET_AVATARS: &str = "avatars";
pub const BUCKET_PROJECTS: &str = "projects";
pub const BUCKET_PRECONSTRUCTION_DOCS: &str = "preconstruction-docs";
pub const BUCKET_CONSTRUCTION_DOCS: &str = "construction-docs";
pub const BUCKET_ESG_REPORTS: &str = "esg-reports";

/// Every bucket the application reads or writes.
pub const ALL_BUCKETS: &[&str] = &[
    BUCKET_AVATARS,
    BUCKET_PROJECTS,
    BUCKET_PRECONSTRUCTION_DOCS,
    BUCKET_CONSTRUCTION_DOCS,
    BUCKET_ESG_REPORTS,
];

/// Default upload size limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Image types accepted for avatars, with the extension used for the object.
const AVATAR_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<user_id>/<token>.<ext>` inside the avatars bucket.
pub fn avatar_object_path(user_id: DbId, extension: &str) -> String {
    format!("{user_id}/{}.{extension}", Uuid::new_v4())
}

/// `<project_id>/<material_id>/<token>-<filename>` inside a document bucket.
pub fn document_object_path(project_id: DbId, material_id: DbId, filename: &str) -> String {
    format!(
        "{project_id}/{material_id}/{}-{}",
        Uuid::new_v4(),
        sanitize_filename(filename)
    )
}

/// Keep ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
///
/// Path separators never survive, so the result cannot escape its prefix.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Reject object paths that could walk outside a bucket.
pub fn validate_object_path(path: &str) -> Result<(), CoreError> {
    if path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..")
    {
        return Err(CoreError::Validation(format!(
            "Invalid object path '{path}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Upload validation
// ---------------------------------------------------------------------------

/// Map an avatar content type to its object extension.
pub fn avatar_extension(content_type: &str) -> Result<&'static str, CoreError> {
    AVATAR_TYPES
        .iter()
        .find(|(ct, _)| ct.eq_ignore_ascii_case(content_type))
        .map(|(_, ext)| *ext)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Unsupported avatar type '{content_type}'. Allowed: png, jpeg, webp, gif"
            ))
        })
}

/// Ensure an upload is non-empty and within the size limit.
pub fn validate_upload_size(len: usize, max_bytes: usize) -> Result<(), CoreError> {
    if len == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if len > max_bytes {
        return Err(CoreError::Validation(format!(
            "Uploaded file is {len} bytes; the limit is {max_bytes} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_path_is_keyed_by_user() {
        let user = Uuid::new_v4();
        let path = avatar_object_path(user, "png");
        assert!(path.starts_with(&format!("{user}/")));
        assert!(path.ends_with(".png"));
        assert_ne!(path, avatar_object_path(user, "png"));
    }

    #[test]
    fn document_path_embeds_sanitized_name() {
        let (p, m) = (Uuid::new_v4(), Uuid::new_v4());
        let path = document_object_path(p, m, "../../etc/Spec Sheet (v2).pdf");
        assert!(path.starts_with(&format!("{p}/{m}/")));
        assert!(path.ends_with("-Spec_Sheet__v2_.pdf"));
        assert!(validate_object_path(&path).is_ok());
    }

    #[test]
    fn sanitize_handles_degenerate_names() {
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("..."), "file");
        assert_eq!(sanitize_filename(".env"), "env");
        assert_eq!(sanitize_filename("dir\\report.csv"), "report.csv");
    }

    #[test]
    fn object_path_rejects_traversal() {
        assert!(validate_object_path("a/../b").is_err());
        assert!(validate_object_path("/abs").is_err());
        assert!(validate_object_path("a//b").is_err());
        assert!(validate_object_path("").is_err());
        assert!(validate_object_path("user/avatar.png").is_ok());
    }

    #[test]
    fn avatar_types() {
        assert_eq!(avatar_extension("image/jpeg").unwrap(), "jpg");
        assert_eq!(avatar_extension("IMAGE/PNG").unwrap(), "png");
        assert!(avatar_extension("application/pdf").is_err());
    }

    #[test]
    fn upload_size_bounds() {
        assert!(validate_upload_size(0, 10).is_err());
        assert!(validate_upload_size(11, 10).is_err());
        assert!(validate_upload_size(10, 10).is_ok());
    }
}
