use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Polarization channels recognized for GRD retrieval
///
/// The set is closed: a scene may expose zero, one, or both of these, but no
/// other channel is ever requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarization {
    VV,
    VH,
}

impl Polarization {
    /// Both recognized channels, in download order
    pub const ALL: [Polarization; 2] = [Polarization::VV, Polarization::VH];

    /// Asset key used by the catalog for this channel
    pub fn asset_key(&self) -> &'static str {
        match self {
            Polarization::VV => "vv",
            Polarization::VH => "vh",
        }
    }

    /// Map a catalog asset key back to a recognized channel
    pub fn from_asset_key(key: &str) -> Option<Polarization> {
        match key {
            "vv" => Some(Polarization::VV),
            "vh" => Some(Polarization::VH),
            _ => None,
        }
    }
}

impl std::fmt::Display for Polarization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarization::VV => write!(f, "VV"),
            Polarization::VH => write!(f, "VH"),
        }
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Box centered on (`lon`, `lat`), expanded by `margin_deg` in both axes
    pub fn around(lon: f64, lat: f64, margin_deg: f64) -> Self {
        Self {
            min_lon: lon - margin_deg,
            max_lon: lon + margin_deg,
            min_lat: lat - margin_deg,
            max_lat: lat + margin_deg,
        }
    }

    /// Corner order expected by catalog search requests
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}

/// Spatial and temporal window for one catalog search
#[derive(Debug, Clone)]
pub struct SearchWindow {
    pub bbox: BoundingBox,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SearchWindow {
    /// Window around a center point and calendar day.
    ///
    /// The temporal interval spans `date` ± `days_margin` days, clamped to
    /// `00:00:00Z` of the first day and `23:59:59Z` of the last.
    pub fn around(
        lon: f64,
        lat: f64,
        margin_deg: f64,
        date: NaiveDate,
        days_margin: i64,
    ) -> Self {
        let first_day = date - chrono::Duration::days(days_margin);
        let last_day = date + chrono::Duration::days(days_margin);
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        Self {
            bbox: BoundingBox::around(lon, lat, margin_deg),
            start: DateTime::from_naive_utc_and_offset(first_day.and_time(NaiveTime::MIN), Utc),
            end: DateTime::from_naive_utc_and_offset(last_day.and_time(end_of_day), Utc),
        }
    }
}

/// Source location of one polarization's raster
///
/// The href may use a bucket-style scheme (`s3://...`) or be directly
/// fetchable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRef {
    pub href: String,
}

/// One catalog entry for a Sentinel-1 GRD acquisition
///
/// Built eagerly from the catalog response and read-only afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneRecord {
    pub id: String,
    /// Acquisition instant; `None` when the catalog entry carried no usable
    /// timestamp
    pub acquired: Option<DateTime<Utc>>,
    pub assets: HashMap<Polarization, AssetRef>,
}

impl SceneRecord {
    pub fn asset(&self, pol: Polarization) -> Option<&AssetRef> {
        self.assets.get(&pol)
    }
}

/// Failure of a single asset download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum DownloadError {
    #[error("download failed (status code: {0})")]
    Status(u16),

    #[error("malformed asset href: {0}")]
    MalformedHref(String),

    #[error("transfer failed: {0}")]
    Transport(String),
}

/// Outcome of one channel's retrieval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChannelOutcome {
    /// Asset fetched and saved at this path
    Downloaded(PathBuf),
    /// The selected scene does not expose this polarization
    Absent,
    /// The asset could not be resolved or fetched; the sibling channel is
    /// unaffected
    Failed(DownloadError),
}

impl std::fmt::Display for ChannelOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelOutcome::Downloaded(path) => write!(f, "{}", path.display()),
            ChannelOutcome::Absent => write!(f, "polarization not present in this scene"),
            ChannelOutcome::Failed(e) => write!(f, "{}", e),
        }
    }
}

/// Per-channel results plus the selected scene's acquisition instant
///
/// Every recognized channel has exactly one slot, even when the catalog never
/// returned that channel for the scene.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalOutcome {
    pub scene_id: String,
    pub acquired: Option<DateTime<Utc>>,
    pub vv: ChannelOutcome,
    pub vh: ChannelOutcome,
}

impl RetrievalOutcome {
    pub fn channel(&self, pol: Polarization) -> &ChannelOutcome {
        match pol {
            Polarization::VV => &self.vv,
            Polarization::VH => &self.vh,
        }
    }
}

/// Result of one retrieval invocation
#[derive(Debug, Clone, Serialize)]
pub enum RetrievalReport {
    /// A scene was selected and both channel outcomes recorded
    Complete(RetrievalOutcome),
    /// The search window yielded no candidate scenes; nothing was downloaded
    NoScenes {
        date: NaiveDate,
        lon: f64,
        lat: f64,
        days_margin: i64,
    },
}

impl RetrievalReport {
    /// Human-readable outcome summary
    pub fn summary(&self) -> String {
        match self {
            RetrievalReport::Complete(outcome) => {
                let acquired = outcome
                    .acquired
                    .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                    .unwrap_or_else(|| "unknown".to_string());
                format!(
                    "Download results:\n VV: {}\n VH: {}\nAcquired: {}",
                    outcome.vv, outcome.vh, acquired
                )
            }
            RetrievalReport::NoScenes {
                date,
                lon,
                lat,
                days_margin,
            } => format!(
                "No Sentinel-1 GRD scenes found within ±{} days.\n\
                 Requested date: {}, coordinates (lon={}, lat={})",
                days_margin, date, lon, lat
            ),
        }
    }
}

/// Error types for scene retrieval
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("processing error: {0}")]
    Processing(String),
}

/// Result type for retrieval operations
pub type FetchResult<T> = Result<T, FetchError>;
