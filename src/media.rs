//! Dual-source media fields: an uploaded file path OR an external URL, with
//! the upload taking precedence. Absolute URLs are built from the current
//! request's scheme and host, passed in explicitly so nothing here depends
//! on ambient request state.

use axum::http::HeaderMap;

/// Default branding assets used when a project has neither an uploaded
/// hero/logo nor an external URL. These exact strings are part of the API
/// contract with the frontend.
pub const HERO_PLACEHOLDER: &str =
    "https://www.apple.com/newsroom/images/product/iphone/standard/Apple_announce-iphone12pro_10132020.jpg.og.jpg";
pub const LOGO_PLACEHOLDER: &str =
    "https://www.apple.com/ac/structured-data/images/knowledge_graph_logo.png";

/// A media field offering both an uploaded-file path (relative to the
/// uploads root) and an external URL.
#[derive(Debug, Clone, Copy)]
pub struct MediaRef<'a> {
    pub uploaded: Option<&'a str>,
    pub external: Option<&'a str>,
}

impl<'a> MediaRef<'a> {
    pub fn new(uploaded: &'a Option<String>, external: &'a Option<String>) -> Self {
        Self {
            uploaded: uploaded.as_deref().filter(|s| !s.is_empty()),
            external: external.as_deref().filter(|s| !s.is_empty()),
        }
    }

    /// Uploaded path only, no external alternative (e.g. gallery images,
    /// blog cover images).
    pub fn upload_only(uploaded: &'a Option<String>) -> Self {
        Self {
            uploaded: uploaded.as_deref().filter(|s| !s.is_empty()),
            external: None,
        }
    }

    /// Upload wins, else the external URL verbatim, else nothing.
    pub fn resolve(&self, base_url: &str) -> Option<String> {
        if let Some(path) = self.uploaded {
            return Some(format!("{}/uploads/{}", base_url, path));
        }
        self.external.map(|url| url.to_string())
    }

    /// Same resolution, falling back to a fixed placeholder. Only
    /// `Project.hero_image` and `Project.logo` use this branch.
    pub fn resolve_or(&self, base_url: &str, placeholder: &str) -> String {
        self.resolve(base_url)
            .unwrap_or_else(|| placeholder.to_string())
    }
}

/// Build the `scheme://host` prefix for the current request. Honors
/// `x-forwarded-proto`/`x-forwarded-host` so URLs survive a reverse proxy.
pub fn request_base_url(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");

    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get("host"))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{}://{}", scheme, host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_uploaded_path_wins_over_external_url() {
        let uploaded = Some("projects/hero/abc.jpg".to_string());
        let external = Some("https://example.com/a.jpg".to_string());
        let resolved = MediaRef::new(&uploaded, &external).resolve("http://localhost:8000");
        assert_eq!(
            resolved.as_deref(),
            Some("http://localhost:8000/uploads/projects/hero/abc.jpg")
        );
    }

    #[test]
    fn test_external_url_passes_through_verbatim() {
        let uploaded = None;
        let external = Some("https://example.com/a.jpg".to_string());
        let resolved = MediaRef::new(&uploaded, &external).resolve("http://localhost:8000");
        assert_eq!(resolved.as_deref(), Some("https://example.com/a.jpg"));
    }

    #[test]
    fn test_neither_source_resolves_to_none() {
        let resolved = MediaRef::new(&None, &None).resolve("http://localhost:8000");
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let uploaded = Some(String::new());
        let external = Some(String::new());
        let resolved = MediaRef::new(&uploaded, &external).resolve("http://localhost:8000");
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_placeholder_fallback() {
        let resolved = MediaRef::new(&None, &None).resolve_or("http://localhost", HERO_PLACEHOLDER);
        assert_eq!(resolved, HERO_PLACEHOLDER);
    }

    #[test]
    fn test_placeholder_not_used_when_url_present() {
        let external = Some("https://example.com/a.jpg".to_string());
        let resolved =
            MediaRef::new(&None, &external).resolve_or("http://localhost", HERO_PLACEHOLDER);
        assert_eq!(resolved, "https://example.com/a.jpg");
    }

    #[test]
    fn test_base_url_from_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("api.example.com"));
        assert_eq!(request_base_url(&headers), "http://api.example.com");
    }

    #[test]
    fn test_base_url_honors_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("api.example.com"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(request_base_url(&headers), "https://api.example.com");
    }
}
