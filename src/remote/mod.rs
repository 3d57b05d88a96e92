pub mod backend;
pub mod client;
pub mod http;
pub mod memory;

pub use backend::RecordBackend;
pub use client::RemoteClient;
pub use http::HttpBackend;
pub use memory::MemoryBackend;
