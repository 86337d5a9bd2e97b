use serde_json::{Number, Value};

use crate::{
    accumulation::{AccumulationError, Accumulator, AccumulatorImpl},
    expression::ExpressionContext,
};

pub struct SumImpl;

impl AccumulatorImpl for SumImpl {
    fn name(&self) -> &'static str {
        "$sum"
    }
    fn create_accumulator(&self, _ctx: &ExpressionContext) -> Box<dyn Accumulator> {
        Box::new(SumAcc::Int(0))
    }
}

// Integral until a float input (or an i64 overflow) forces promotion.
enum SumAcc {
    Int(i64),
    Float(f64),
}

impl SumAcc {
    fn add(&mut self, n: &Number) {
        match (&mut *self, n.as_i64()) {
            (SumAcc::Int(acc), Some(i)) => match acc.checked_add(i) {
                Some(total) => *acc = total,
                None => *self = SumAcc::Float(*acc as f64 + i as f64),
            },
            (SumAcc::Int(acc), None) => {
                *self = SumAcc::Float(*acc as f64 + n.as_f64().unwrap_or(0.0));
            }
            (SumAcc::Float(acc), _) => {
                *acc += n.as_f64().unwrap_or(0.0);
            }
        }
    }
}

impl Accumulator for SumAcc {
    fn accumulate(&mut self, input: Value) -> Result<(), AccumulationError> {
        // Non-numeric inputs do not contribute.
        if let Value::Number(n) = &input {
            self.add(n);
        }
        Ok(())
    }

    fn merge(&mut self, partial: Value) -> Result<(), AccumulationError> {
        self.accumulate(partial)
    }

    fn partial(&self) -> Value {
        self.finalize()
    }

    fn finalize(&self) -> Value {
        match self {
            SumAcc::Int(i) => Value::Number(Number::from(*i)),
            SumAcc::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        }
    }
}
