//! # Platform Bridge
//!
//! Concrete transport and storage implementations behind the collaborator
//! traits: a reqwest-backed [`HttpClient`](docsync_traits::http::HttpClient)
//! and a filesystem-backed [`ObjectStore`](docsync_traits::ObjectStore).

pub mod fs_store;
pub mod http;

pub use fs_store::FsObjectStore;
pub use http::ReqwestHttpClient;
