//! API utilities for frontend-backend communication
//!
//! Helper functions for constructing API URLs and reading error bodies.

use contracts::api::ApiErrorBody;
use gloo_net::http::Response;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
///
/// # Arguments
/// * `path` - The API path (should start with "/api/")
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// URL of a stored file, as returned in a `FileRef` path
/// (e.g. "files/ab12-photo.png").
pub fn file_url(path: &str) -> String {
    format!("{}/{}", api_base(), path)
}

/// Read the server's message out of a failed response.
///
/// Error responses carry `{"error": "..."}`; when the body is not in that
/// shape the status code is reported instead.
pub async fn response_error(response: Response) -> String {
    let status = response.status();
    match response.json::<ApiErrorBody>().await {
        Ok(body) if !body.error.is_empty() => body.error,
        _ => format!("Request failed with status {}", status),
    }
}
