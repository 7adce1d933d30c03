//! HTTP API.

mod http;

pub use http::{routes, ApiError};
