use tracker_engine::{CatalogCache, UploadError};

const PLAN: &[u8] = b"Subject,ItemURL\nMath,u1\nSci,u2\n";

#[test]
fn identical_upload_reuses_parsed_catalog() {
    let mut cache = CatalogCache::new();
    let first = cache.load(PLAN, "plan.csv").unwrap();
    assert!(cache.is_cached(PLAN, "plan.csv"));
    let second = cache.load(PLAN, "renamed.csv").unwrap();
    assert!(first.shares_storage_with(&second));
}

#[test]
fn new_content_replaces_the_entry() {
    let mut cache = CatalogCache::new();
    let first = cache.load(PLAN, "plan.csv").unwrap();
    let other = b"Subject,ItemURL\nMath,u1\n";
    let second = cache.load(other, "plan.csv").unwrap();
    assert!(!first.shares_storage_with(&second));
    assert_eq!(second.len(), 1);
    assert!(!cache.is_cached(PLAN, "plan.csv"));
    assert!(cache.is_cached(other, "plan.csv"));
}

#[test]
fn failed_upload_clears_the_entry() {
    let mut cache = CatalogCache::new();
    cache.load(PLAN, "plan.csv").unwrap();
    let err = cache.load(PLAN, "plan.txt").unwrap_err();
    assert!(matches!(err, UploadError::UnsupportedFormat { .. }));
    assert!(!cache.is_cached(PLAN, "plan.csv"));

    cache.load(PLAN, "plan.csv").unwrap();
    let err = cache.load(b"Subject,ItemURL\nMa\xfft,u1\n", "plan.csv").unwrap_err();
    assert!(matches!(err, UploadError::Parse { .. }));
    assert!(!cache.is_cached(PLAN, "plan.csv"));
}

#[test]
fn same_bytes_with_other_format_are_not_a_hit() {
    let mut cache = CatalogCache::new();
    cache.load(PLAN, "plan.csv").unwrap();
    assert!(!cache.is_cached(PLAN, "plan.xlsx"));
    assert!(cache.load(PLAN, "plan.xlsx").is_err());
}

#[test]
fn explicit_invalidation() {
    let mut cache = CatalogCache::new();
    cache.load(PLAN, "plan.csv").unwrap();
    cache.invalidate();
    assert!(!cache.is_cached(PLAN, "plan.csv"));
}
