//! The seam between the retry policy and the wire.

use std::future::Future;

use reqwest::{header, multipart};

use crate::request::{FormPart, Method, MultipartForm};

/// Payload handed to a [`Transport`].
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Already-serialized JSON bytes.
    Json(Vec<u8>),
    Multipart(MultipartForm),
}

/// A fully resolved request: absolute URL, merged headers, prepared payload.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub payload: Option<Payload>,
}

impl TransportRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and buffered body of a received response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Failure to obtain any response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// DNS, connect, reset or body-read failure.
    #[error("{0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The request could not be built: bad URL, header or part MIME type.
    /// Retrying cannot help.
    #[error("{0}")]
    InvalidRequest(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    pub fn network(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Network(err.into())
    }

    pub fn invalid_request(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::InvalidRequest(err.into())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::invalid_request(err)
        } else {
            Self::network(err)
        }
    }
}

/// Sends one HTTP request.
///
/// Implementations must not apply their own retry policy; timeouts are
/// enforced by the caller, which drops the returned future on expiry.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = std::result::Result<TransportResponse, TransportError>> + Send;
}

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = std::result::Result<TransportResponse, TransportError>> + Send {
        let http = self.http.clone();
        async move {
            let mut builder = http.request(to_reqwest_method(request.method), &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            builder = match request.payload {
                Some(Payload::Json(bytes)) => builder.body(bytes),
                Some(Payload::Multipart(form)) => builder.multipart(to_reqwest_form(form)?),
                None => builder,
            };

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;

            Ok(TransportResponse {
                status,
                body: body.to_vec(),
            })
        }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn to_reqwest_form(form: MultipartForm) -> std::result::Result<multipart::Form, TransportError> {
    let mut out = multipart::Form::new();
    for part in form.parts() {
        out = match part.clone() {
            FormPart::Text { name, value } => out.text(name, value),
            FormPart::File {
                name,
                file_name,
                bytes,
                mime,
            } => {
                let mut file = multipart::Part::bytes(bytes).file_name(file_name);
                if let Some(mime) = mime {
                    file = file.mime_str(&mime).map_err(TransportError::invalid_request)?;
                }
                out.part(name, file)
            }
        };
    }
    Ok(out)
}

/// Merges per-request headers over defaults; later names replace earlier
/// ones case-insensitively.
pub(crate) fn merge_headers(
    defaults: &[(String, String)],
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = Vec::with_capacity(defaults.len() + overrides.len());
    for (name, value) in defaults.iter().chain(overrides) {
        merged.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        merged.push((name.clone(), value.clone()));
    }
    merged
}

pub(crate) fn has_content_type(headers: &[(String, String)]) -> bool {
    headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case(header::CONTENT_TYPE.as_str()))
}

pub(crate) fn strip_content_type(headers: &mut Vec<(String, String)>) {
    headers.retain(|(name, _)| !name.eq_ignore_ascii_case(header::CONTENT_TYPE.as_str()));
}

#[cfg(test)]
mod tests {
    use super::{
        has_content_type, merge_headers, strip_content_type, to_reqwest_form, ReqwestTransport,
        Transport, TransportError, TransportRequest,
    };
    use crate::{Method, MultipartForm};

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_owned(), value.to_owned())
    }

    #[test]
    fn request_headers_override_defaults_case_insensitively() {
        let merged = merge_headers(
            &[pair("Accept", "application/json"), pair("X-Lang", "en")],
            &[pair("x-lang", "hi")],
        );
        assert_eq!(
            merged,
            vec![pair("Accept", "application/json"), pair("x-lang", "hi")]
        );
    }

    #[test]
    fn content_type_helpers_ignore_case() {
        let mut headers = vec![pair("content-TYPE", "text/plain"), pair("Accept", "*/*")];
        assert!(has_content_type(&headers));
        strip_content_type(&mut headers);
        assert_eq!(headers, vec![pair("Accept", "*/*")]);
        assert!(!has_content_type(&headers));
    }

    #[test]
    fn invalid_part_mime_is_an_invalid_request() {
        let form = MultipartForm::new().file_with_mime("photo", "a.jpg", vec![1], "not a mime");
        assert!(matches!(
            to_reqwest_form(form),
            Err(TransportError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn malformed_header_fails_before_sending() {
        let request = TransportRequest {
            method: Method::Get,
            url: "http://127.0.0.1:9/albums".to_owned(),
            headers: vec![pair("X-Bad", "a\nb")],
            payload: None,
        };

        let err = ReqwestTransport::default()
            .send(request)
            .await
            .expect_err("header with a newline must be rejected");
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn unparsable_url_fails_before_sending() {
        let request = TransportRequest {
            method: Method::Get,
            url: "not a url".to_owned(),
            headers: Vec::new(),
            payload: None,
        };

        let err = ReqwestTransport::default()
            .send(request)
            .await
            .expect_err("relative url must be rejected");
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }
}
