use axum::http::HeaderMap;

/// Extracts the originating client IP from proxy headers.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

/// Extracts the audit context (IP, user-agent) from request headers.
pub(crate) fn extract_request_context(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let ip_address = client_ip(headers);

    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);

    (ip_address, user_agent)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};

    use super::{client_ip, extract_request_context};

    #[test]
    fn first_forwarded_address_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.2"),
        );

        assert_eq!(client_ip(&headers), Some("203.0.113.7".to_owned()));
    }

    #[test]
    fn missing_header_yields_none() {
        let headers = HeaderMap::new();
        let (ip_address, user_agent) = extract_request_context(&headers);
        assert_eq!(ip_address, None);
        assert_eq!(user_agent, None);
    }
}
