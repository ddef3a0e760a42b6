//! Token estimation for index entries.

/// Estimates how many LLM tokens a piece of text costs.
///
/// Implementations must be pure: the same input always yields the same count,
/// otherwise incremental updates and full reindexes would disagree.
pub trait TokenEstimator: Send + Sync {
    fn estimate_tokens(&self, content: &str) -> usize;
}

/// Byte-ratio heuristic: roughly four bytes of English text per token.
#[derive(Debug, Clone, Copy)]
pub struct CharRatioEstimator {
    bytes_per_token: usize,
}

impl CharRatioEstimator {
    pub fn new(bytes_per_token: usize) -> Self {
        Self {
            bytes_per_token: bytes_per_token.max(1),
        }
    }
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate_tokens(&self, content: &str) -> usize {
        content.len().div_ceil(self.bytes_per_token)
    }
}
