use crate::core::select::select_nearest;
use crate::io::download::{s3_to_https, AssetFetcher};
use crate::io::stac::StacClient;
use crate::types::{
    ChannelOutcome, FetchError, FetchResult, Polarization, RetrievalOutcome, RetrievalReport,
    SceneRecord, SearchWindow,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Catalog collection holding Sentinel-1 GRD products
pub const COLLECTION: &str = "sentinel-1-grd";

/// Spatial search margin around the requested point, in degrees (~20 km)
pub const SEARCH_MARGIN_DEG: f64 = 0.2;

/// Cap on candidates fetched per search
pub const SEARCH_LIMIT: usize = 50;

/// Default temporal search margin, in days
pub const DEFAULT_DAYS_MARGIN: i64 = 10;

/// Finds the Sentinel-1 GRD scene nearest a requested location and date and
/// saves its polarization assets under a configured output directory.
///
/// The output directory and catalog endpoint are fixed at construction; each
/// [`retrieve`](Retriever::retrieve) call is independent and touches only its
/// own output files. Re-running the same request overwrites the same paths.
pub struct Retriever {
    catalog: StacClient,
    fetcher: AssetFetcher,
    output_dir: PathBuf,
}

impl Retriever {
    /// Create a retriever talking to `endpoint` and saving under `output_dir`
    pub fn new<P: AsRef<Path>>(endpoint: &str, output_dir: P) -> FetchResult<Self> {
        Ok(Self {
            catalog: StacClient::new(endpoint)?,
            fetcher: AssetFetcher::new()?,
            output_dir: output_dir.as_ref().to_path_buf(),
        })
    }

    /// Locate the scene nearest `date` at (`lon`, `lat`) and download its
    /// VV/VH assets.
    ///
    /// Searches ±`days_margin` days around `date` (a `YYYY-MM-DD` string) and
    /// ±0.2° around the point, then downloads each available polarization
    /// sequentially. Channel failures are contained: one polarization failing
    /// or being absent never stops the other. Nothing is retried.
    pub fn retrieve(
        &self,
        lon: f64,
        lat: f64,
        date: &str,
        days_margin: i64,
    ) -> FetchResult<RetrievalReport> {
        fs::create_dir_all(&self.output_dir)?;

        let center_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
            FetchError::InvalidInput(format!(
                "bad date {:?} (expected YYYY-MM-DD): {}",
                date, e
            ))
        })?;

        let window = SearchWindow::around(lon, lat, SEARCH_MARGIN_DEG, center_date, days_margin);
        let records = self.catalog.search(
            COLLECTION,
            &window.bbox,
            (window.start, window.end),
            SEARCH_LIMIT,
        )?;
        log::info!("found {} Sentinel-1 GRD candidates", records.len());

        // Proximity is measured against the requested day itself at midnight
        // UTC, not against a search-window edge.
        let target = DateTime::from_naive_utc_and_offset(center_date.and_time(NaiveTime::MIN), Utc);
        let scene = match select_nearest(&records, target) {
            Some(scene) => scene,
            None => {
                return Ok(RetrievalReport::NoScenes {
                    date: center_date,
                    lon,
                    lat,
                    days_margin,
                })
            }
        };
        log::info!(
            "selected scene {} (acquired {})",
            scene.id,
            scene
                .acquired
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown".to_string())
        );

        let vv = self.fetch_channel(scene, Polarization::VV);
        let vh = self.fetch_channel(scene, Polarization::VH);

        Ok(RetrievalReport::Complete(RetrievalOutcome {
            scene_id: scene.id.clone(),
            acquired: scene.acquired,
            vv,
            vh,
        }))
    }

    /// Resolve and download one polarization of `scene`.
    ///
    /// Absence and failure are both recorded in the outcome; neither
    /// propagates.
    fn fetch_channel(&self, scene: &SceneRecord, pol: Polarization) -> ChannelOutcome {
        let asset = match scene.asset(pol) {
            Some(asset) => asset,
            None => {
                log::info!("scene {} exposes no {} asset", scene.id, pol);
                return ChannelOutcome::Absent;
            }
        };

        let url = match s3_to_https(&asset.href) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("{} asset of {} is unusable: {}", pol, scene.id, e);
                return ChannelOutcome::Failed(e);
            }
        };
        log::info!("{} href: {} -> {}", pol, asset.href, url);

        let dest = self
            .output_dir
            .join(format!("{}_{}.tif", scene.id, pol.asset_key()));
        match self.fetcher.fetch(&url, &dest) {
            Ok(()) => {
                log::info!("saved {} to {}", pol, dest.display());
                ChannelOutcome::Downloaded(dest)
            }
            Err(e) => {
                log::warn!("{} download failed for {}: {}", pol, scene.id, e);
                ChannelOutcome::Failed(e)
            }
        }
    }
}
