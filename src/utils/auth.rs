//! Authentication headers for API requests.

/// Attach the bearer credential to a request.
///
/// OpenAI-compatible servers all accept `Authorization: Bearer <key>`. An
/// empty key sends no header, which lets local servers that need no
/// credential work unchanged.
pub fn add_auth_headers(request: reqwest::RequestBuilder, api_key: &str) -> reqwest::RequestBuilder {
    if api_key.is_empty() {
        return request;
    }
    request.header("Authorization", format!("Bearer {api_key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_is_added() {
        let client = reqwest::Client::new();
        let request = add_auth_headers(client.get("https://example.com"), "test-key")
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("Authorization").unwrap(),
            "Bearer test-key"
        );
    }

    #[test]
    fn empty_key_sends_no_header() {
        let client = reqwest::Client::new();
        let request = add_auth_headers(client.get("https://example.com"), "")
            .build()
            .unwrap();
        assert!(request.headers().get("Authorization").is_none());
    }
}
