//! Shared HTTP client and auth utilities.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::AlmanacError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-200 HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> AlmanacError {
    match status {
        401 | 403 => AlmanacError::Authentication(body.to_string()),
        _ => AlmanacError::api(status, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication_error() {
        assert!(matches!(
            status_to_error(401, "invalid key"),
            AlmanacError::Authentication(_)
        ));
        assert!(matches!(
            status_to_error(403, "forbidden"),
            AlmanacError::Authentication(_)
        ));
    }

    #[test]
    fn other_statuses_map_to_api_error() {
        assert!(matches!(
            status_to_error(500, "oops"),
            AlmanacError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn bearer_headers_carry_key_and_content_type() {
        let headers = bearer_headers("sk-test");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer sk-test");
    }
}
