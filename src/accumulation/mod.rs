pub mod accumulator;
pub use accumulator::*;

pub mod accumulator_impl;
pub use accumulator_impl::*;

pub mod accumulator_registry;
pub use accumulator_registry::*;

pub mod accumulation_statement;
pub use accumulation_statement::*;

pub mod functions;
pub use functions::*;
