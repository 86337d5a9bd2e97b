use crate::{accumulation::Accumulator, expression::ExpressionContext};

/// Per-operator factory. One instance is registered per operator name at
/// startup; it is stateless and shared by every statement that resolves it.
pub trait AccumulatorImpl: Send + Sync {
    /// Registered operator name, including the leading sigil ("$sum", ...).
    fn name(&self) -> &'static str;

    /// Create a fresh accumulator for one group. The context carries the
    /// per-query settings (collation, memory cap) some operators need.
    fn create_accumulator(&self, ctx: &ExpressionContext) -> Box<dyn Accumulator>;
}
