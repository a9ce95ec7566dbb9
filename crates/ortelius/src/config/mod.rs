//! Resolver tuning parameters.
//!
//! Everything that shapes a resolution pass flows through [`ResolverConfig`]
//! and is turned into per-call [`RetrievalParams`] from the batch size; no
//! tuning state is held globally or mutated between calls.

/// Default per-name hit budget for the retrieval stage.
pub const DEFAULT_HITS_PER_NAME: usize = 8;
/// Reduced per-name hit budget applied to large batches.
pub const LARGE_BATCH_HITS_PER_NAME: usize = 5;
/// Batch size at which the reduced budget kicks in.
pub const LARGE_BATCH_THRESHOLD: usize = 200;
/// How many times the per-name budget the raw query over-fetches before the
/// pool is re-sorted and truncated. Buffers against the taxonomy/population
/// ordering alone excluding a candidate the ranking stage would score
/// highest.
pub const DEFAULT_OVERFETCH_FACTOR: usize = 3;

/// Tuning for a [`GazetteerResolver`](crate::GazetteerResolver) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Per-name hit budget for normal batches.
    pub hits_per_name: usize,
    /// Per-name hit budget once a batch reaches [`Self::large_batch_threshold`].
    /// A throughput/precision trade-off, not an error condition.
    pub large_batch_hits_per_name: usize,
    /// Batch size from which the reduced budget applies.
    pub large_batch_threshold: usize,
    /// Raw-query over-fetch multiplier.
    pub overfetch_factor: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            hits_per_name: DEFAULT_HITS_PER_NAME,
            large_batch_hits_per_name: LARGE_BATCH_HITS_PER_NAME,
            large_batch_threshold: LARGE_BATCH_THRESHOLD,
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
        }
    }
}

impl ResolverConfig {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::new()
    }

    /// Retrieval parameters for one resolution call over a batch of
    /// `batch_len` names. Computed per call so concurrent callers with
    /// different batch sizes never observe each other's budget.
    #[must_use]
    pub fn retrieval_params(&self, batch_len: usize) -> RetrievalParams {
        let per_name_limit = if batch_len >= self.large_batch_threshold {
            self.large_batch_hits_per_name
        } else {
            self.hits_per_name
        };
        RetrievalParams {
            per_name_limit,
            overfetch_factor: self.overfetch_factor.max(1),
        }
    }
}

/// Parameters for a single retrieval pass, derived from the configuration
/// and the batch size of the call in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalParams {
    /// Maximum candidates kept per name after composite sorting.
    pub per_name_limit: usize,
    /// Over-fetch multiplier applied to the raw query.
    pub overfetch_factor: usize,
}

/// Builder for creating resolver configurations with ergonomic defaults.
#[derive(Debug, Clone, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    /// Create a new builder with the default budgets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
        }
    }

    /// Create a builder optimized for throughput over precision: the reduced
    /// budget for every batch size.
    #[must_use]
    pub fn throughput() -> Self {
        let mut builder = Self::new();
        builder.config.hits_per_name = LARGE_BATCH_HITS_PER_NAME;
        builder
    }

    /// Set the per-name hit budget for normal batches.
    #[must_use]
    pub fn hits_per_name(mut self, hits: usize) -> Self {
        self.config.hits_per_name = hits;
        self
    }

    /// Set the per-name hit budget for large batches.
    #[must_use]
    pub fn large_batch_hits_per_name(mut self, hits: usize) -> Self {
        self.config.large_batch_hits_per_name = hits;
        self
    }

    /// Set the batch size at which the reduced budget applies.
    #[must_use]
    pub fn large_batch_threshold(mut self, threshold: usize) -> Self {
        self.config.large_batch_threshold = threshold;
        self
    }

    /// Set the raw-query over-fetch multiplier (clamped to at least 1).
    #[must_use]
    pub fn overfetch_factor(mut self, factor: usize) -> Self {
        self.config.overfetch_factor = factor.max(1);
        self
    }

    /// Build the final configuration.
    #[must_use]
    pub fn build(self) -> ResolverConfig {
        self.config
    }
}
