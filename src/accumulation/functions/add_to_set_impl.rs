use serde_json::Value;

use crate::{
    accumulation::{AccumulationError, Accumulator, AccumulatorImpl},
    document::{approximate_size, Collation},
    expression::ExpressionContext,
};

pub struct AddToSetImpl;

impl AccumulatorImpl for AddToSetImpl {
    fn name(&self) -> &'static str {
        "$addToSet"
    }
    fn create_accumulator(&self, ctx: &ExpressionContext) -> Box<dyn Accumulator> {
        Box::new(SetAcc {
            values: Vec::new(),
            bytes: 0,
            limit: ctx.memory_limit_bytes,
            collation: ctx.collation,
        })
    }
}

// Insertion-ordered; membership uses the query collation.
struct SetAcc {
    values: Vec<Value>,
    bytes: usize,
    limit: Option<usize>,
    collation: Collation,
}

impl Accumulator for SetAcc {
    fn accumulate(&mut self, input: Value) -> Result<(), AccumulationError> {
        if self
            .values
            .iter()
            .any(|v| self.collation.values_equal(v, &input))
        {
            return Ok(());
        }
        self.bytes += approximate_size(&input);
        if let Some(limit) = self.limit {
            if self.bytes > limit {
                return Err(AccumulationError::MemoryLimitExceeded {
                    operator: "$addToSet",
                    limit_bytes: limit,
                });
            }
        }
        self.values.push(input);
        Ok(())
    }

    fn merge(&mut self, partial: Value) -> Result<(), AccumulationError> {
        let Value::Array(items) = partial else {
            return Err(AccumulationError::MalformedPartial {
                operator: "$addToSet",
                reason: "expected an array".to_string(),
            });
        };
        for item in items {
            self.accumulate(item)?;
        }
        Ok(())
    }

    fn partial(&self) -> Value {
        Value::Array(self.values.clone())
    }

    fn finalize(&self) -> Value {
        Value::Array(self.values.clone())
    }
}
