//! `portal-http` is an async HTTP client for the community portal REST API.
//!
//! Every call goes through [`PortalClient::request`], which:
//! - enforces a per-attempt timeout
//! - retries network failures, timeouts and 5xx responses with linear backoff
//! - reports every failure as an [`ApiError`] with a bilingual `user_message`
//!
//! [`Endpoint`] catalogues the portal resources, and [`PortalClient`] has a
//! named method for each of them.

mod client;
mod endpoints;
mod error;
mod messages;
mod options;
mod request;
mod resources;
mod retry;
pub mod transport;

pub use client::{join_url, PortalClient, DEFAULT_BASE_URL};
pub use endpoints::Endpoint;
pub use error::{ApiError, ErrorCode};
pub use options::ClientOptions;
pub use request::{Body, FormPart, Method, MultipartForm, RequestConfig};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse};

pub type Result<T> = std::result::Result<T, ApiError>;
