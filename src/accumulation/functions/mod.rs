use std::sync::Arc;

use crate::accumulation::AccumulatorImpl;

pub mod add_to_set_impl;
pub use add_to_set_impl::*;

pub mod avg_impl;
pub use avg_impl::*;

pub mod first_last_impl;
pub use first_last_impl::*;

pub mod minmax_impl;
pub use minmax_impl::*;

pub mod push_impl;
pub use push_impl::*;

pub mod sum_impl;
pub use sum_impl::*;

/// Every built-in operator module's factory, in registration order.
pub fn built_in_factories() -> Vec<Arc<dyn AccumulatorImpl>> {
    vec![
        Arc::new(SumImpl),
        Arc::new(AvgImpl),
        Arc::new(FirstImpl),
        Arc::new(LastImpl),
        Arc::new(MinImpl),
        Arc::new(MaxImpl),
        Arc::new(PushImpl),
        Arc::new(AddToSetImpl),
    ]
}
