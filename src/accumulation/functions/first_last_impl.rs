use serde_json::Value;

use crate::{
    accumulation::{AccumulationError, Accumulator, AccumulatorImpl},
    expression::ExpressionContext,
};

pub struct FirstImpl;
pub struct LastImpl;

impl AccumulatorImpl for FirstImpl {
    fn name(&self) -> &'static str {
        "$first"
    }
    fn create_accumulator(&self, _ctx: &ExpressionContext) -> Box<dyn Accumulator> {
        Box::new(PositionalAcc { keep_first: true, value: None })
    }
}

impl AccumulatorImpl for LastImpl {
    fn name(&self) -> &'static str {
        "$last"
    }
    fn create_accumulator(&self, _ctx: &ExpressionContext) -> Box<dyn Accumulator> {
        Box::new(PositionalAcc { keep_first: false, value: None })
    }
}

// A Null input still counts as a value; only the absence of any input
// finalizes to Null. Hence Option, not Value::Null, for the empty state.
struct PositionalAcc {
    keep_first: bool,
    value: Option<Value>,
}

impl PositionalAcc {
    fn operator(&self) -> &'static str {
        if self.keep_first { "$first" } else { "$last" }
    }
}

impl Accumulator for PositionalAcc {
    fn accumulate(&mut self, input: Value) -> Result<(), AccumulationError> {
        if !self.keep_first || self.value.is_none() {
            self.value = Some(input);
        }
        Ok(())
    }

    // Partials are zero-or-one element arrays so "no value yet" survives the
    // round trip.
    fn merge(&mut self, partial: Value) -> Result<(), AccumulationError> {
        let Value::Array(items) = partial else {
            return Err(AccumulationError::MalformedPartial {
                operator: self.operator(),
                reason: "expected an array of at most one element".to_string(),
            });
        };
        for item in items {
            self.accumulate(item)?;
        }
        Ok(())
    }

    fn partial(&self) -> Value {
        Value::Array(self.value.iter().cloned().collect())
    }

    fn finalize(&self) -> Value {
        self.value.clone().unwrap_or(Value::Null)
    }
}
