use listing_metrics::listings::{ColumnNames, load_listings};
use listing_metrics::metrics::PropertyCategory;
use listing_metrics::output::write_records;
use listing_metrics::registry::{LocalRegistry, deploy_builtins, verify_builtins};
use listing_metrics::scoring::{ListingMetrics, score_listings};
use std::path::Path;
use std::time::Duration;

#[test]
fn test_full_pipeline() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/listings_sample.csv");
    let listings = load_listings(&path, &ColumnNames::default()).expect("Failed to load listings");
    assert_eq!(listings.len(), 6);

    let rows = score_listings(&listings, 100.0).expect("Failed to score listings");

    let categories: Vec<_> = rows.iter().map(|r| r.property_category).collect();
    assert_eq!(
        categories,
        vec![
            PropertyCategory::HighEnd,
            PropertyCategory::MidRange,
            PropertyCategory::MidRange,
            PropertyCategory::Luxury,
            PropertyCategory::Budget,
            PropertyCategory::Unknown,
        ]
    );

    let high: Vec<_> = rows.iter().map(|r| r.is_high_price).collect();
    assert_eq!(high, vec![true, false, false, true, false, false]);

    let scores: Vec<_> = rows.iter().map(|r| r.availability_score).collect();
    assert_eq!(scores, vec![5, 3, 1, 3, 1, 1]);

    assert_eq!(rows[0].price_per_review, 3.125);
    assert_eq!(rows[3].price_per_review, 1275.0);
    assert_eq!(rows[4].price_per_review, 0.0);
    assert_eq!(rows[5].price_per_review, 0.0);

    let out = std::env::temp_dir().join("listing_metrics_integration.csv");
    let out = out.to_str().unwrap();
    write_records(out, &rows).unwrap();

    let mut rdr = csv::Reader::from_path(out).unwrap();
    let read_back: Vec<ListingMetrics> = rdr.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(read_back, rows);

    std::fs::remove_file(out).unwrap();
}

#[tokio::test]
async fn test_local_registry_verifies_against_itself() {
    let remote = LocalRegistry::new();
    let local = LocalRegistry::new();
    deploy_builtins(&remote).unwrap();
    deploy_builtins(&local).unwrap();

    let results = verify_builtins(
        &remote,
        &local,
        Duration::from_millis(20),
        Duration::from_millis(5),
    )
    .await;

    assert!(results.iter().all(|(_, verdict)| verdict.is_ok()));
}
