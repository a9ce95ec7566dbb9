//! Batch place-name resolution against a built gazetteer index.
//!
//! [`GazetteerResolver`] is the main entry point: it opens the index
//! read-only once, holds the taxonomy rankers the retrieval sort consumes,
//! and runs the retrieve-then-rank pipeline for each distinct name in an
//! input batch.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ortelius::{GazetteerResolver, build_index};
//!
//! build_index("allCountries.txt", "gazetteer-index")?;
//!
//! let resolver = GazetteerResolver::open("gazetteer-index")?;
//! let resolved = resolver.resolve(&["Paris", "Kampala"], 2)?;
//! for (name, places) in &resolved {
//!     println!("{name}: {} candidates", places.len());
//! }
//! # Ok::<(), ortelius::error::OrteliusError>(())
//! ```

use std::{collections::HashMap, path::Path};

use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    config::ResolverConfig,
    error::Result,
    index::GazetteerIndex,
    search::{Candidate, rank, retrieve},
    taxonomy::TaxonomyRanker,
};

/// The externally exposed result record for one resolved place.
///
/// Alternate names and the feature taxonomy fields stay internal; they feed
/// ranking but are not part of the result shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPlace {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
    pub country_code: String,
    pub admin1_code: String,
    pub admin2_code: String,
}

impl From<Candidate> for ResolvedPlace {
    fn from(candidate: Candidate) -> Self {
        Self {
            name: candidate.name,
            longitude: candidate.longitude,
            latitude: candidate.latitude,
            country_code: candidate.country_code,
            admin1_code: candidate.admin1_code,
            admin2_code: candidate.admin2_code,
        }
    }
}

impl ResolvedPlace {
    /// Quoted-CSV line in the legacy output column order.
    #[must_use]
    pub fn to_csv_line(&self) -> String {
        format!(
            "\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\"",
            self.name,
            self.longitude,
            self.latitude,
            self.country_code,
            self.admin1_code,
            self.admin2_code
        )
    }
}

/// Resolves batches of free-text place names to ranked gazetteer records.
///
/// The index handle is read-only and safe to share across concurrent
/// callers; per-call tuning (the per-name hit budget) is derived from the
/// batch size on every call, so callers never observe each other's state.
#[derive(Clone)]
pub struct GazetteerResolver {
    index: GazetteerIndex,
    feature_class_ranker: TaxonomyRanker,
    feature_code_ranker: TaxonomyRanker,
    config: ResolverConfig,
}

impl GazetteerResolver {
    /// Open a resolver over the index at `index_path` with default tuning.
    ///
    /// Fails if no index has been built at that path.
    pub fn open(index_path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(index_path, ResolverConfig::default())
    }

    /// Open a resolver with explicit tuning.
    pub fn with_config(index_path: impl AsRef<Path>, config: ResolverConfig) -> Result<Self> {
        let index = GazetteerIndex::open(index_path)?;
        Ok(Self {
            index,
            feature_class_ranker: TaxonomyRanker::feature_class(),
            feature_code_ranker: TaxonomyRanker::feature_code(),
            config,
        })
    }

    /// The tuning this resolver was opened with.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Number of documents in the underlying index.
    #[must_use]
    pub fn num_docs(&self) -> u64 {
        self.index.num_docs()
    }

    /// Resolve each distinct name in the batch to at most `count` ranked
    /// places.
    ///
    /// Repeated input names are retrieved and ranked once. Names with no
    /// matching gazetteer entry are absent from the returned map. An empty
    /// batch, or one whose first element is the empty string, returns an
    /// empty map without touching the index.
    #[instrument(name = "Resolve Place Names", skip_all, fields(batch = names.len(), count))]
    pub fn resolve<S: AsRef<str>>(
        &self,
        names: &[S],
        count: usize,
    ) -> Result<HashMap<String, Vec<ResolvedPlace>>> {
        let mut resolved = HashMap::new();
        if names.is_empty() || names[0].as_ref().is_empty() {
            return Ok(resolved);
        }

        let params = self.config.retrieval_params(names.len());
        debug!(
            per_name_limit = params.per_name_limit,
            "Per-name hit budget for this batch"
        );

        for name in names.iter().map(AsRef::as_ref).unique() {
            let candidates = retrieve(
                &self.index,
                &self.feature_class_ranker,
                &self.feature_code_ranker,
                name,
                &params,
            )?;
            if candidates.is_empty() {
                // No hits: the name gets no entry in the result at all.
                continue;
            }
            let best = rank(name, candidates, count);
            resolved.insert(
                name.to_owned(),
                best.into_iter().map(ResolvedPlace::from).collect(),
            );
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_line_is_quoted_in_legacy_column_order() {
        let place = ResolvedPlace {
            name: "Paris".to_owned(),
            longitude: 2.3488,
            latitude: 48.85341,
            country_code: "FR".to_owned(),
            admin1_code: "11".to_owned(),
            admin2_code: "75".to_owned(),
        };
        assert_eq!(
            place.to_csv_line(),
            "\"Paris\",\"2.3488\",\"48.85341\",\"FR\",\"11\",\"75\""
        );
    }

    #[test]
    fn resolved_place_serializes_external_fields_only() {
        let place = ResolvedPlace {
            name: "Paris".to_owned(),
            longitude: 2.3488,
            latitude: 48.85341,
            country_code: "FR".to_owned(),
            admin1_code: "11".to_owned(),
            admin2_code: "75".to_owned(),
        };
        let json = serde_json::to_value(&place).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 6);
        assert!(object.contains_key("country_code"));
        assert!(!object.contains_key("feature_code"));
    }
}
