//! Endpoint URL helpers.
//!
//! Users paste endpoints with and without trailing slashes; every request URL
//! is built through [`construct_api_url`] so neither form produces `//`.

/// Strip trailing slashes and surrounding whitespace from a base URL.
///
/// ```
/// use reasonstream::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url(" https://api.example.com/v1/ "), "https://api.example.com/v1");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
///
/// ```
/// use reasonstream::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8080/v1/", "/models"),
///     "http://localhost:8080/v1/models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalize_base_url(base_url), endpoint)
}

/// Whether the value looks like an `http(s)` endpoint with a host.
pub fn is_http_endpoint(value: &str) -> bool {
    match reqwest::Url::parse(value.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}
