//! Ortelius - Gazetteer Place-Name Resolution
//!
//! Ortelius resolves free-text place names (for example the location strings a
//! named-entity recognizer extracts) to structured records from a
//! `GeoNames`-style gazetteer. It layers a feature-taxonomy-aware retrieval
//! order and a multi-factor relevance score on top of a Tantivy full-text
//! index.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ortelius::{GazetteerResolver, build_index};
//!
//! // One-shot: builds the index unless one already exists at the path.
//! build_index("allCountries.txt", "gazetteer-index")?;
//!
//! // Open read-only and resolve a batch of names.
//! let resolver = GazetteerResolver::open("gazetteer-index")?;
//! let resolved = resolver.resolve(&["Paris", "Oslo"], 1)?;
//! if let Some(best) = resolved.get("Paris").and_then(|places| places.first()) {
//!     println!("{} ({}, {})", best.name, best.latitude, best.longitude);
//! }
//! # Ok::<(), ortelius::error::OrteliusError>(())
//! ```
//!
//! # How results are ordered
//!
//! - **Retrieval**: the whole name is matched as a phrase over primary and
//!   alternate names; candidates are ordered by feature-class rank, then
//!   feature-code rank, then population descending, so administrative and
//!   populated places surface before obscure feature types.
//! - **Ranking**: candidates are re-weighted by whole-word/substring name
//!   containment, alternate-name breadth and edit distance, and a decay term
//!   that preserves the retrieval order as a deterministic tie-breaker.
//!
//! The pipeline is synchronous and single-threaded; the index handle is
//! read-only and safe to share across concurrent callers.

use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
pub mod error;
mod gazetteer;
mod index;
mod resolver;
mod search;
mod taxonomy;

pub use config::{
    DEFAULT_HITS_PER_NAME, DEFAULT_OVERFETCH_FACTOR, LARGE_BATCH_HITS_PER_NAME,
    LARGE_BATCH_THRESHOLD, ResolverConfig, ResolverConfigBuilder, RetrievalParams,
};
pub use gazetteer::{GazetteerRecord, GazetteerRowError, OUT_OF_BOUNDS};
pub use index::{GazetteerIndex, IndexError, build_index};
pub use resolver::{GazetteerResolver, ResolvedPlace};
pub use search::{
    Candidate, SearchError, WEIGHT_ALT_NAME, WEIGHT_NAME_MATCH, WEIGHT_NAME_PART_MATCH,
    WEIGHT_SORT_ORDER, calibrated_alt_name_weight,
};
pub use taxonomy::{TaxonomyField, TaxonomyRanker, UNKNOWN_RANK_MARGIN};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the Ortelius library.
///
/// Sets up structured logging with configurable levels and filtering. Call
/// once at the start of your application; later calls are no-ops.
///
/// # Arguments
///
/// * `level` - The minimum log level to display
///
/// # Examples
///
/// ```rust
/// use ortelius::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), ortelius::error::OrteliusError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::OrteliusError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("tantivy=warn".parse().unwrap());

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}
