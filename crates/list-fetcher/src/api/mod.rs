//! HTTP plumbing shared by the service adapters.
//!
//! Provides the transport seam, request pacing, JSON:API document
//! flattening and the response types of each list service.

pub mod json_api;
pub mod pacer;
pub mod transport;
pub mod types;

pub use json_api::Document;
pub use pacer::RequestPacer;
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
pub use types::*;
