//! # Quill Provider
//!
//! [`DocumentSource`](docsync_traits::DocumentSource) implementation for the
//! Quill collaboration platform's REST API.
//!
//! ## Endpoints
//!
//! - `GET /1/folders/{id}` - folder listing
//! - `GET /2/threads/?ids=a,b,c` - batched thread metadata, at most 100 ids
//! - `GET /1/threads/{id}` - thread content as HTML
//!
//! The connector is transport-agnostic: it talks to the API through the
//! [`HttpClient`](docsync_traits::http::HttpClient) trait and is tested
//! against a mock transport.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::QuillConnector;
pub use error::QuillError;
