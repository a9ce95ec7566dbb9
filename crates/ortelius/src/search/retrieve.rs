//! Candidate retrieval: phrase query, composite taxonomy ordering, budget
//! truncation.
//!
//! The whole query name is matched as one phrase unit over the name and
//! alternate-name fields, never split into independent terms, so a
//! multi-word place name cannot match as disjoint tokens. The engine returns
//! an over-fetched pool ordered by population; the pool is then re-sorted by
//! the composite key (feature-class rank, feature-code rank, population
//! descending) and truncated to the per-name budget.

use anyhow::anyhow;
use tantivy::{
    Order, TantivyDocument,
    collector::TopDocs,
    query::QueryParser,
    schema::Value,
};
use tracing::{debug, instrument, warn};

use super::Result;
use crate::{
    config::RetrievalParams,
    gazetteer::OUT_OF_BOUNDS,
    index::{FIELD_POPULATION, GazetteerFields, GazetteerIndex},
    taxonomy::TaxonomyRanker,
};

/// A retrieved gazetteer entry being evaluated for relevance to one query
/// name. Lives only for the duration of a single ranking pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    /// Never empty: a record without alternate names gets its primary name
    /// here so the alternate-name scoring term sees the same shape for
    /// every candidate.
    pub alternate_names: Vec<String>,
    pub country_code: String,
    pub admin1_code: String,
    pub admin2_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub feature_class: String,
    pub feature_code: String,
    pub population: u64,
    /// Relevance weight, written by the ranking stage before selection.
    pub weight: f64,
}

/// Retrieve the raw candidate pool for one query name.
///
/// Zero hits yield an empty list, not an error. A query that cannot be
/// parsed contributes no candidates for this name only; other names in the
/// batch are unaffected.
#[instrument(name = "Retrieve Candidates", skip_all, level = "debug", fields(query = name, limit = params.per_name_limit))]
pub(crate) fn retrieve(
    index: &GazetteerIndex,
    class_ranker: &TaxonomyRanker,
    code_ranker: &TaxonomyRanker,
    name: &str,
    params: &RetrievalParams,
) -> Result<Vec<Candidate>> {
    let name = name.trim();
    if name.is_empty() || params.per_name_limit == 0 {
        return Ok(Vec::new());
    }

    let fields = index.fields();
    let parser = QueryParser::for_index(
        index.tantivy(),
        vec![fields.name, fields.alternate_names],
    );
    // Quote the whole name so it is parsed as a single phrase unit rather
    // than tokenized on whitespace.
    let phrase = format!("\"{}\"", name.replace(['"', '\\'], " "));
    let (query, parse_errors) = parser.parse_query_lenient(&phrase);
    if !parse_errors.is_empty() {
        warn!(query = name, errors = ?parse_errors, "Query construction failed, name contributes no candidates");
        return Ok(Vec::new());
    }

    let searcher = index.reader().searcher();
    let overfetch = params.per_name_limit * params.overfetch_factor;
    let collector =
        TopDocs::with_limit(overfetch).order_by_fast_field::<u64>(FIELD_POPULATION, Order::Desc);
    let hits = searcher.search(&*query, &collector)?;
    debug!(num_hits = hits.len(), overfetch, "Raw retrieval complete");

    let mut candidates = Vec::with_capacity(hits.len());
    for (population, doc_address) in hits {
        let doc: TantivyDocument = searcher.doc(doc_address)?;
        candidates.push(candidate_from_doc(&doc, fields, population)?);
    }

    // Composite retrieval order, fixed priority: feature-class rank, then
    // feature-code rank, then population descending. The sort is stable, so
    // candidates tied on the whole key keep the engine's population order.
    candidates.sort_by(|a, b| {
        class_ranker
            .compare(&a.feature_class, &b.feature_class)
            .then_with(|| code_ranker.compare(&a.feature_code, &b.feature_code))
            .then_with(|| b.population.cmp(&a.population))
    });
    candidates.truncate(params.per_name_limit);
    Ok(candidates)
}

fn candidate_from_doc(
    doc: &TantivyDocument,
    fields: &GazetteerFields,
    population: u64,
) -> Result<Candidate> {
    let name = doc
        .get_first(fields.name)
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("stored gazetteer document is missing its name field"))?;

    let raw_alternates = doc
        .get_first(fields.alternate_names)
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    let alternate_names = normalize_alternate_names(raw_alternates, &name);

    let stored_str = |field| {
        doc.get_first(field)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_owned()
    };
    let stored_f64 = |field| {
        doc.get_first(field)
            .and_then(|v| v.as_f64())
            .unwrap_or(OUT_OF_BOUNDS)
    };

    Ok(Candidate {
        alternate_names,
        country_code: stored_str(fields.country_code),
        admin1_code: stored_str(fields.admin1_code),
        admin2_code: stored_str(fields.admin2_code),
        latitude: stored_f64(fields.latitude),
        longitude: stored_f64(fields.longitude),
        feature_class: stored_str(fields.feature_class),
        feature_code: stored_str(fields.feature_code),
        population,
        weight: 0.0,
        name,
    })
}

/// Split the stored comma-separated alternate names, substituting the
/// primary name when the record has none. Keeps missing data from biasing
/// the alternate-name scoring term.
fn normalize_alternate_names(raw: &str, primary_name: &str) -> Vec<String> {
    if raw.is_empty() {
        vec![primary_name.to_owned()]
    } else {
        raw.split(',').map(str::to_owned).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_alternate_names_become_the_primary_name() {
        assert_eq!(normalize_alternate_names("", "Paris"), vec!["Paris"]);
    }

    #[test]
    fn alternate_names_split_on_commas() {
        assert_eq!(
            normalize_alternate_names("Lutetia,Ville Lumiere", "Paris"),
            vec!["Lutetia", "Ville Lumiere"]
        );
    }

    #[test]
    fn single_alternate_name_is_kept_verbatim() {
        assert_eq!(normalize_alternate_names("Londres", "London"), vec!["Londres"]);
    }
}
