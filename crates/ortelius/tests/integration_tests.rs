//! Integration tests for Ortelius place-name resolution.
//!
//! These tests exercise the full public API - build, open, resolve - against
//! a real index built in a temporary directory from a small inline gazetteer
//! fixture in the `GeoNames` row layout.

use std::{fs, path::PathBuf};

use ortelius::{
    GazetteerIndex, GazetteerResolver, IndexError, OUT_OF_BOUNDS, build_index,
    error::OrteliusError,
};
use tempfile::TempDir;

fn setup_test_env() {
    let _ = ortelius::init_logging(tracing::Level::WARN);
}

/// One gazetteer row in the 19-column `GeoNames` layout. Columns the search
/// schema ignores are left empty.
#[allow(clippy::too_many_arguments)]
fn row(
    id: &str,
    name: &str,
    alternates: &str,
    latitude: &str,
    longitude: &str,
    feature_class: &str,
    feature_code: &str,
    country: &str,
    admin1: &str,
    admin2: &str,
    population: &str,
) -> String {
    [
        id, name, name, alternates, latitude, longitude, feature_class, feature_code, country,
        "", admin1, admin2, "", "", population, "", "", "", "",
    ]
    .join("\t")
}

/// Thirteen valid rows plus two malformed ones (a free-text line and a row
/// with a non-numeric id).
fn gazetteer_fixture() -> String {
    let rows = [
        row("2988507", "Paris", "Lutetia,Paris,Ville Lumiere", "48.85341", "2.3488", "P", "PPLC", "FR", "11", "75", "2000000"),
        row("4717560", "Paris", "", "33.66094", "-95.55551", "P", "PPL", "US", "TX", "277", "25000"),
        row("2643743", "London", "London Town,Londres", "51.50853", "-0.12574", "P", "PPLC", "GB", "ENG", "GLA", "7556900"),
        row("9000001", "Avalon", "", "47.0", "8.0", "P", "PPLC", "XA", "01", "", "100"),
        row("9000002", "Avalon", "", "46.0", "9.0", "P", "PPL", "XB", "02", "", "1000000"),
        row("9100001", "Springfield", "", "39.80172", "-89.64371", "P", "PPL", "US", "IL", "167", "116250"),
        row("9100002", "Springfield", "", "37.21533", "-93.29824", "P", "PPL", "US", "MO", "077", "159498"),
        row("9100003", "Springfield", "", "42.10148", "-72.58981", "P", "PPL", "US", "MA", "013", "155929"),
        row("9100004", "Springfield", "", "39.92423", "-83.80882", "P", "PPL", "US", "OH", "023", "58662"),
        row("9100005", "Springfield", "", "44.04624", "-123.02203", "P", "PPL", "US", "OR", "039", "59403"),
        row("5128581", "New York City", "NYC,Big Apple", "40.71427", "-74.00597", "P", "PPL", "US", "NY", "", "8175133"),
        row("9200001", "Unknownia", "", "10.0", "10.0", "P", "XQZV", "XC", "", "", "500"),
        row("9200002", "Nowhereville", "", "not-a-latitude", "not-a-longitude", "P", "PPL", "XD", "", "", "42"),
        "this row is garbage".to_owned(),
        row("notanid", "Badville", "", "0.0", "0.0", "P", "PPL", "XE", "", "", "10"),
    ];
    rows.join("\n")
}

const FIXTURE_VALID_ROWS: u64 = 13;

/// Builds an index from the fixture inside a fresh temp dir and returns the
/// dir (for lifetime) together with the index path.
fn build_fixture_index() -> (TempDir, PathBuf) {
    setup_test_env();
    let dir = TempDir::new().expect("create temp dir");
    let gazetteer_path = dir.path().join("gazetteer.txt");
    fs::write(&gazetteer_path, gazetteer_fixture()).expect("write fixture");
    let index_path = dir.path().join("index");
    build_index(&gazetteer_path, &index_path).expect("build index");
    (dir, index_path)
}

#[test]
fn build_skips_malformed_rows() {
    let (_dir, index_path) = build_fixture_index();
    let index = GazetteerIndex::open(&index_path).expect("open index");
    assert_eq!(index.num_docs(), FIXTURE_VALID_ROWS);
}

#[test]
fn build_is_idempotent() {
    let (dir, index_path) = build_fixture_index();

    // A second build against a grown source must be a no-op: the existing
    // index is neither merged into nor rebuilt.
    let grown_path = dir.path().join("gazetteer_grown.txt");
    let mut grown = gazetteer_fixture();
    grown.push('\n');
    grown.push_str(&row("9999999", "Newtown", "", "1.0", "1.0", "P", "PPL", "XF", "", "", "7"));
    fs::write(&grown_path, grown).expect("write grown fixture");
    build_index(&grown_path, &index_path).expect("second build");

    let index = GazetteerIndex::open(&index_path).expect("open index");
    assert_eq!(index.num_docs(), FIXTURE_VALID_ROWS);
}

#[test]
fn searching_without_an_index_is_fatal() {
    setup_test_env();
    let dir = TempDir::new().expect("create temp dir");
    let missing = dir.path().join("no-index-here");

    assert!(matches!(
        GazetteerIndex::open(&missing),
        Err(IndexError::IndexNotFound(_))
    ));
    assert!(matches!(
        GazetteerResolver::open(&missing),
        Err(OrteliusError::Index(IndexError::IndexNotFound(_)))
    ));
}

#[test]
fn capital_feature_code_outranks_larger_population() {
    let (_dir, index_path) = build_fixture_index();
    let resolver = GazetteerResolver::open(&index_path).unwrap();

    // Two Avalons: a capital with population 100 and a plain populated
    // place with population 1,000,000. The feature-code rank dominates the
    // retrieval sort ahead of population.
    let resolved = resolver.resolve(&["Avalon"], 1).unwrap();
    let places = &resolved["Avalon"];
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].country_code, "XA");
}

#[test]
fn paris_resolves_to_the_capital_first() {
    let (_dir, index_path) = build_fixture_index();
    let resolver = GazetteerResolver::open(&index_path).unwrap();

    let resolved = resolver.resolve(&["Paris"], 1).unwrap();
    let places = &resolved["Paris"];
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].country_code, "FR");
    assert_eq!(places[0].admin1_code, "11");
    assert!((places[0].latitude - 48.85341).abs() < 1e-6);
}

#[test]
fn unmatched_names_are_absent_from_the_result() {
    let (_dir, index_path) = build_fixture_index();
    let resolver = GazetteerResolver::open(&index_path).unwrap();

    let resolved = resolver.resolve(&["Paris", "Zxqvwt"], 1).unwrap();
    assert!(resolved.contains_key("Paris"));
    assert!(!resolved.contains_key("Zxqvwt"));
}

#[test]
fn results_truncate_to_the_requested_count() {
    let (_dir, index_path) = build_fixture_index();
    let resolver = GazetteerResolver::open(&index_path).unwrap();

    // Five Springfields indexed: count 2 keeps the two best, count 10
    // returns all five without padding.
    let two = resolver.resolve(&["Springfield"], 2).unwrap();
    assert_eq!(two["Springfield"].len(), 2);

    let all = resolver.resolve(&["Springfield"], 10).unwrap();
    assert_eq!(all["Springfield"].len(), 5);
}

#[test]
fn empty_batches_short_circuit() {
    let (_dir, index_path) = build_fixture_index();
    let resolver = GazetteerResolver::open(&index_path).unwrap();

    let empty: [&str; 0] = [];
    assert!(resolver.resolve(&empty, 3).unwrap().is_empty());
    assert!(resolver.resolve(&["", "Paris"], 3).unwrap().is_empty());
}

#[test]
fn duplicate_input_names_resolve_once() {
    let (_dir, index_path) = build_fixture_index();
    let resolver = GazetteerResolver::open(&index_path).unwrap();

    let resolved = resolver.resolve(&["Paris", "Paris", "Paris"], 1).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved["Paris"].len(), 1);
}

#[test]
fn multi_word_names_match_as_a_phrase() {
    let (_dir, index_path) = build_fixture_index();
    let resolver = GazetteerResolver::open(&index_path).unwrap();

    // Adjacent words of the stored name match as a unit...
    let resolved = resolver.resolve(&["New York"], 1).unwrap();
    assert_eq!(resolved["New York"][0].admin1_code, "NY");

    // ...but non-adjacent tokens of the same name do not.
    let resolved = resolver.resolve(&["New City"], 1).unwrap();
    assert!(!resolved.contains_key("New City"));
}

#[test]
fn unknown_feature_codes_still_resolve() {
    let (_dir, index_path) = build_fixture_index();
    let resolver = GazetteerResolver::open(&index_path).unwrap();

    // XQZV is not in the curated taxonomy; the record must still be
    // retrievable through the unknown-rank fallback.
    let resolved = resolver.resolve(&["Unknownia"], 1).unwrap();
    assert_eq!(resolved["Unknownia"][0].country_code, "XC");
}

#[test]
fn unparsable_coordinates_surface_the_sentinel() {
    let (_dir, index_path) = build_fixture_index();
    let resolver = GazetteerResolver::open(&index_path).unwrap();

    let resolved = resolver.resolve(&["Nowhereville"], 1).unwrap();
    let place = &resolved["Nowhereville"][0];
    assert!((place.latitude - OUT_OF_BOUNDS).abs() < f64::EPSILON);
    assert!((place.longitude - OUT_OF_BOUNDS).abs() < f64::EPSILON);
}

#[test]
fn large_batches_use_the_reduced_hit_budget() {
    let (_dir, index_path) = build_fixture_index();
    let resolver = GazetteerResolver::open(&index_path).unwrap();

    let mut names: Vec<String> = (0..249).map(|i| format!("NoSuchPlace{i}")).collect();
    names.push("London".to_owned());
    assert!(names.len() >= 250);

    // The budget drops from 8 to 5 for this batch size...
    assert_eq!(resolver.config().retrieval_params(names.len()).per_name_limit, 5);

    // ...without changing ranking correctness for the names that do match.
    let resolved = resolver.resolve(&names, 1).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved["London"][0].country_code, "GB");
}
