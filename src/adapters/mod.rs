// Adapters layer: concrete implementations for external systems (filesystem, http).

pub mod http;
pub mod storage;

pub use http::RemoteFontSource;
pub use storage::LocalStorage;
