//! sarfetch: A Small, Predictable Sentinel-1 GRD Scene Finder and Downloader
//!
//! This library locates the Sentinel-1 GRD scene closest in time to a
//! requested date at a given location, resolves its VV/VH assets from a
//! STAC-style catalog, and streams them to local storage. Each polarization
//! is fetched independently, so a missing or failing channel never costs you
//! the other one.

pub mod core;
pub mod io;
pub mod types;

// Re-export the main types
pub use types::{
    AssetRef, BoundingBox, ChannelOutcome, DownloadError, FetchError, FetchResult, Polarization,
    RetrievalOutcome, RetrievalReport, SceneRecord, SearchWindow,
};

pub use crate::core::{select_nearest, Retriever, DEFAULT_DAYS_MARGIN};
pub use io::stac::EARTH_SEARCH_URL;
pub use io::{AssetFetcher, StacClient};
