pub mod download;
pub mod http;

pub use download::{download_asset, CHUNK_SIZE};
pub use http::{HttpResponse, HttpTransport, ReqwestTransport};
