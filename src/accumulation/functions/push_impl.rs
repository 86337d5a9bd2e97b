use serde_json::Value;

use crate::{
    accumulation::{AccumulationError, Accumulator, AccumulatorImpl},
    document::approximate_size,
    expression::ExpressionContext,
};

pub struct PushImpl;

impl AccumulatorImpl for PushImpl {
    fn name(&self) -> &'static str {
        "$push"
    }
    fn create_accumulator(&self, ctx: &ExpressionContext) -> Box<dyn Accumulator> {
        Box::new(PushAcc {
            values: Vec::new(),
            bytes: 0,
            limit: ctx.memory_limit_bytes,
        })
    }
}

struct PushAcc {
    values: Vec<Value>,
    bytes: usize,
    limit: Option<usize>,
}

impl PushAcc {
    fn charge(&mut self, value: &Value) -> Result<(), AccumulationError> {
        self.bytes += approximate_size(value);
        match self.limit {
            Some(limit) if self.bytes > limit => Err(AccumulationError::MemoryLimitExceeded {
                operator: "$push",
                limit_bytes: limit,
            }),
            _ => Ok(()),
        }
    }
}

impl Accumulator for PushAcc {
    fn accumulate(&mut self, input: Value) -> Result<(), AccumulationError> {
        self.charge(&input)?;
        self.values.push(input);
        Ok(())
    }

    fn merge(&mut self, partial: Value) -> Result<(), AccumulationError> {
        let Value::Array(items) = partial else {
            return Err(AccumulationError::MalformedPartial {
                operator: "$push",
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
