use chrono::{TimeZone, Utc};
use sarfetch::{BoundingBox, StacClient, EARTH_SEARCH_URL};

/// Exercises the live earth-search endpoint when the network allows it.
/// Failures are reported, not asserted, so offline runs stay green.
#[test]
fn test_live_catalog_search() {
    let _ = env_logger::try_init();

    let client = StacClient::new(EARTH_SEARCH_URL).expect("failed to build catalog client");
    let bbox = BoundingBox::around(129.075, 35.1796, 0.2);
    let interval = (
        Utc.with_ymd_and_hms(2023, 5, 22, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 6, 11, 23, 59, 59).unwrap(),
    );

    match client.search("sentinel-1-grd", &bbox, interval, 50) {
        Ok(records) => {
            println!("catalog returned {} candidates", records.len());
            for record in records.iter().take(3) {
                println!("  {} acquired {:?}", record.id, record.acquired);
            }
        }
        Err(e) => {
            println!("catalog search failed: {}", e);
            println!("This is expected if:");
            println!("  - There is no internet connection");
            println!("  - The earth-search endpoint is down");
        }
    }
}
