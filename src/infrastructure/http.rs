pub mod dto;
pub mod yahoo_client;

pub use dto::*;
pub use yahoo_client::*;

use crate::domain::logging::{LogComponent, get_logger};
use gloo_net::http::Request;

/// Status and body of a finished request
#[derive(Debug, Clone)]
pub struct HttpResponseText {
    pub status: u16,
    pub body: String,
}

/// HTTP client on top of gloo for WASM
#[derive(Debug, Clone)]
pub struct GlooHttpClient {
    base_url: String,
    default_headers: Vec<(String, String)>,
}

impl GlooHttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            // anything beyond CORS-safelisted headers triggers a preflight
            default_headers: vec![("Accept".to_string(), "application/json".to_string())],
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
        }
    }

    /// GET returning the body whatever the status; providers put error
    /// payloads in non-2xx responses.
    pub async fn get_text(&self, endpoint: &str) -> Result<HttpResponseText, String> {
        let url = self.url_for(endpoint);

        get_logger().debug(LogComponent::Infrastructure("HTTP"), &format!("GET {}", url));

        let mut request = Request::get(&url);
        for (key, value) in &self.default_headers {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {}", e))?;

        get_logger().debug(
            LogComponent::Infrastructure("HTTP"),
            &format!("GET {} -> {} ({} bytes)", url, status, body.len()),
        );

        Ok(HttpResponseText { status, body })
    }
}

/// HTTP helpers
pub struct HttpUtils;

impl HttpUtils {
    pub fn is_success_status(status: u16) -> bool {
        (200..300).contains(&status)
    }

    /// Appends `params` in the given order
    pub fn build_url_with_params(base_url: &str, params: &[(&str, String)]) -> String {
        if params.is_empty() {
            return base_url.to_string();
        }

        let query_string: String = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, Self::url_encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", base_url, query_string)
    }

    /// Percent-encodes everything outside the URL unreserved set
    pub fn url_encode(input: &str) -> String {
        let mut encoded = String::with_capacity(input.len());
        for byte in input.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    encoded.push(byte as char)
                }
                _ => encoded.push_str(&format!("%{:02X}", byte)),
            }
        }
        encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let url = HttpUtils::build_url_with_params(
            "https://query1.finance.yahoo.com/v8/finance/chart/QQQ",
            &[("interval", "1d".to_string()), ("events", "history".to_string())],
        );
        assert_eq!(
            url,
            "https://query1.finance.yahoo.com/v8/finance/chart/QQQ?interval=1d&events=history"
        );
    }

    #[test]
    fn test_url_encoding() {
        assert_eq!(HttpUtils::url_encode("hello world"), "hello%20world");
        assert_eq!(HttpUtils::url_encode("^GSPC"), "%5EGSPC");
        assert_eq!(HttpUtils::url_encode("EURUSD=X"), "EURUSD%3DX");
        assert_eq!(HttpUtils::url_encode("005930.KS"), "005930.KS");
    }

    #[test]
    fn endpoints_join_the_base_url() {
        let client = GlooHttpClient::new("https://proxy.example/");
        assert_eq!(client.url_for("/v8/x"), "https://proxy.example/v8/x");
        assert_eq!(client.url_for("https://other/y"), "https://other/y");
    }
}
