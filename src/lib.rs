pub mod document;
pub use document::Collation;

pub mod expression;
pub use expression::{Expression, ExpressionContext, ParseError, Variables, VariablesParseState};

pub mod accumulation;
pub use accumulation::{
    AccumulationStatement, Accumulator, AccumulatorImpl, AccumulatorRegistry,
};
