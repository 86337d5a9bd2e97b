use serde_json::Value;

use crate::{
    accumulation::{AccumulationError, Accumulator, AccumulatorImpl},
    document::Collation,
    expression::ExpressionContext,
};

pub struct MinImpl;
pub struct MaxImpl;

impl AccumulatorImpl for MinImpl {
    fn name(&self) -> &'static str {
        "$min"
    }
    fn create_accumulator(&self, ctx: &ExpressionContext) -> Box<dyn Accumulator> {
        Box::new(ExtremaAcc { mode: Mode::Min, collation: ctx.collation, current: None })
    }
}

impl AccumulatorImpl for MaxImpl {
    fn name(&self) -> &'static str {
        "$max"
    }
    fn create_accumulator(&self, ctx: &ExpressionContext) -> Box<dyn Accumulator> {
        Box::new(ExtremaAcc { mode: Mode::Max, collation: ctx.collation, current: None })
    }
}

enum Mode {
    Min,
    Max,
}

struct ExtremaAcc {
    mode: Mode,
    collation: Collation,
    current: Option<Value>,
}

impl Accumulator for ExtremaAcc {
    fn accumulate(&mut self, input: Value) -> Result<(), AccumulationError> {
        // Nulls never win an extreme.
        if input.is_null() {
            return Ok(());
        }
        match &mut self.current {
            None => self.current = Some(input),
            Some(current) => {
                let ord = self.collation.compare(&input, current);
                let replace = match self.mode {
                    Mode::Min => ord.is_lt(),
                    Mode::Max => ord.is_gt(),
                };
                if replace {
                    *current = input;
                }
            }
        }
        Ok(())
    }

    // The extreme itself is the partial; an empty partial is Null, which
    // accumulate already ignores.
    fn merge(&mut self, partial: Value) -> Result<(), AccumulationError> {
        self.accumulate(partial)
    }

    fn partial(&self) -> Value {
        self.finalize()
    }

    fn finalize(&self) -> Value {
        self.current.clone().unwrap_or(Value::Null)
    }
}
