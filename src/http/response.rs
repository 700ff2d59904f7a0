use crate::Result;
use crate::http::types::Status;
use reqwest::header::{CONTENT_TYPE, HeaderMap as Headers};
use std::borrow::Cow;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Response {
    pub status: Status,
    pub headers: Headers,
    /// 原始响应体字节
    pub body: Vec<u8>,
    pub duration: Duration,
}

impl Response {
    pub fn new(
        status: u16,
        headers: Headers,
        body: impl Into<Vec<u8>>,
        duration: Duration,
    ) -> Result<Self> {
        Ok(Self {
            status: Status::new(status)?,
            headers,
            body: body.into(),
            duration,
        })
    }

    /// 响应体文本，非法 UTF-8 替换为 U+FFFD
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.contains("application/json") || ct.contains("+json"))
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_redirect(&self) -> bool {
        self.status.is_redirect()
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_content_type() {
        let mut headers = Headers::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        let response =
            Response::new(200, headers, "{}".to_string(), Duration::from_millis(5)).unwrap();

        assert_eq!(
            response.content_type(),
            Some("application/json; charset=utf-8")
        );
        assert!(response.is_json());
        assert!(response.is_success());
    }

    #[test]
    fn test_plain_response() {
        let response =
            Response::new(404, Headers::new(), String::new(), Duration::ZERO).unwrap();
        assert_eq!(response.content_type(), None);
        assert!(!response.is_json());
        assert!(response.is_client_error());
    }

    #[test]
    fn test_binary_body_is_kept_raw() {
        let bytes = vec![137, 80, 78, 71, 255, 0, 254];
        let response =
            Response::new(200, Headers::new(), bytes.clone(), Duration::ZERO).unwrap();

        assert_eq!(response.body, bytes);
        assert!(response.text().contains('\u{FFFD}'));
    }

    #[test]
    fn test_invalid_status() {
        assert!(Response::new(42, Headers::new(), String::new(), Duration::ZERO).is_err());
    }
}
