use serde::{Deserialize, Serialize};

use crate::document::Collation;

/// Per-query settings handed through, unmodified, from the pipeline compiler
/// and executor to the expression parser and the accumulator factories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpressionContext {
    pub collation: Collation,
    /// Cap on the state of the array-building accumulators ($push, $addToSet).
    pub memory_limit_bytes: Option<usize>,
}

impl ExpressionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit_bytes = Some(bytes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_query_settings() {
        let ctx = ExpressionContext::new()
            .with_collation(Collation::CaseInsensitive)
            .with_memory_limit(1024);
        assert_eq!(ctx.collation, Collation::CaseInsensitive);
        assert_eq!(ctx.memory_limit_bytes, Some(1024));
    }

    #[test]
    fn context_deserializes_from_query_settings() {
        let ctx: ExpressionContext =
            serde_json::from_str(r#"{"collation": "binary", "memory_limit_bytes": 512}"#).unwrap();
        assert_eq!(ctx.collation, Collation::Binary);
        assert_eq!(ctx.memory_limit_bytes, Some(512));
    }
}
