//! Gazetteer source-row parsing.
//!
//! The gazetteer is a tab-separated file in the `GeoNames` `allCountries.txt`
//! layout. Only the columns the search schema consumes are read; the rest of
//! the row is ignored. Field-level numeric failures degrade to sentinel
//! values so a single dirty field never costs the whole row, while structural
//! problems (too few columns, unparsable id) reject the row.

use thiserror::Error;

/// Sentinel coordinate stored when latitude/longitude cannot be parsed.
/// Deliberately far outside the valid coordinate range.
pub const OUT_OF_BOUNDS: f64 = 999_999.0;

const COL_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_ALTERNATE_NAMES: usize = 3;
const COL_LATITUDE: usize = 4;
const COL_LONGITUDE: usize = 5;
const COL_FEATURE_CLASS: usize = 6;
const COL_FEATURE_CODE: usize = 7;
const COL_COUNTRY_CODE: usize = 8;
const COL_ADMIN1_CODE: usize = 10;
const COL_ADMIN2_CODE: usize = 11;
const COL_POPULATION: usize = 14;

/// Minimum number of tab-separated columns a row must have to cover every
/// consumed field.
const MIN_COLUMNS: usize = 15;

/// A structurally invalid gazetteer row. The index builder logs and skips
/// these; they never abort a build.
#[derive(Error, Debug)]
pub enum GazetteerRowError {
    #[error("expected at least {MIN_COLUMNS} tab-separated columns, found {found}")]
    ColumnCount { found: usize },
    #[error("invalid geoname id {value:?}")]
    InvalidId {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// One parsed gazetteer row, field semantics per the `GeoNames` export.
#[derive(Debug, Clone, PartialEq)]
pub struct GazetteerRecord {
    pub id: u64,
    pub name: String,
    /// Comma-separated alternate names, possibly empty.
    pub alternate_names: String,
    pub latitude: f64,
    pub longitude: f64,
    pub feature_class: String,
    pub feature_code: String,
    pub country_code: String,
    pub admin1_code: String,
    pub admin2_code: String,
    pub population: u64,
}

impl GazetteerRecord {
    /// Parse one tab-separated gazetteer line.
    ///
    /// Latitude/longitude fall back to [`OUT_OF_BOUNDS`] and population to 0
    /// when unparsable; a short row or a non-numeric id is an error.
    pub fn parse_line(line: &str) -> Result<Self, GazetteerRowError> {
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < MIN_COLUMNS {
            return Err(GazetteerRowError::ColumnCount {
                found: columns.len(),
            });
        }

        let id = columns[COL_ID]
            .parse()
            .map_err(|source| GazetteerRowError::InvalidId {
                value: columns[COL_ID].to_owned(),
                source,
            })?;

        Ok(Self {
            id,
            name: columns[COL_NAME].to_owned(),
            alternate_names: columns[COL_ALTERNATE_NAMES].to_owned(),
            latitude: columns[COL_LATITUDE].parse().unwrap_or(OUT_OF_BOUNDS),
            longitude: columns[COL_LONGITUDE].parse().unwrap_or(OUT_OF_BOUNDS),
            feature_class: columns[COL_FEATURE_CLASS].to_owned(),
            feature_code: columns[COL_FEATURE_CODE].to_owned(),
            country_code: columns[COL_COUNTRY_CODE].to_owned(),
            admin1_code: columns[COL_ADMIN1_CODE].to_owned(),
            admin2_code: columns[COL_ADMIN2_CODE].to_owned(),
            // Absent or unparsable population means "population unknown".
            population: columns[COL_POPULATION].parse().unwrap_or(0),
        })
    }
}
