//! I/O modules for catalog queries and asset downloads

pub mod download;
pub mod stac;

pub use download::AssetFetcher;
pub use stac::StacClient;
