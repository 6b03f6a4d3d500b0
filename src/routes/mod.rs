/**
 * Routes Module
 * API route handlers
 */

pub mod admin;
pub mod blog;
pub mod health;
pub mod inquiries;
pub mod projects;
pub mod upload;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

lazy_static! {
    /// Valid slug pattern: lowercase letters, numbers, and hyphens
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

/// Cheap shape check for URL fields; anything not http(s) is rejected.
pub fn is_valid_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Success response (for delete)
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Deserializer for nullable PATCH fields: with `#[serde(default)]` an
/// absent field stays `None` (keep the stored value), while an explicit
/// JSON `null` becomes `Some(None)` (clear it).
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("wofa"));
        assert!(is_valid_slug("kirana-connect"));
        assert!(is_valid_slug("mvp-2024"));
        assert!(!is_valid_slug("Hello-World"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn test_url_validation() {
        assert!(is_valid_url("https://example.com/a.jpg"));
        assert!(is_valid_url("http://localhost:3000"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("example.com"));
    }
}
