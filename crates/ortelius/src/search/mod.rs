//! Candidate retrieval and ranking for place-name queries.
//!
//! This module contains the per-name search pipeline: a phrase query over
//! the gazetteer index produces a taxonomy-ordered candidate pool, which the
//! ranking stage weights and truncates to the caller's requested count.

pub use error::SearchError;
use error::Result;

mod rank;
mod retrieve;

pub use rank::{
    WEIGHT_ALT_NAME, WEIGHT_NAME_MATCH, WEIGHT_NAME_PART_MATCH, WEIGHT_SORT_ORDER,
    calibrated_alt_name_weight,
};
pub(crate) use rank::rank;
pub use retrieve::Candidate;
pub(crate) use retrieve::retrieve;

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum SearchError {
        #[error("Index error: {0}")]
        Index(#[from] crate::index::IndexError),
        #[error("Tantivy error: {0}")]
        Tantivy(#[from] tantivy::TantivyError),
        #[error(transparent)]
        Other(#[from] anyhow::Error),
    }
    pub type Result<T> = std::result::Result<T, SearchError>;
}
