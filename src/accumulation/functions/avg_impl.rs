use serde_json::{json, Number, Value};

use crate::{
    accumulation::{AccumulationError, Accumulator, AccumulatorImpl},
    expression::ExpressionContext,
};

pub struct AvgImpl;

impl AccumulatorImpl for AvgImpl {
    fn name(&self) -> &'static str {
        "$avg"
    }
    fn create_accumulator(&self, _ctx: &ExpressionContext) -> Box<dyn Accumulator> {
        Box::new(AvgAcc { total: 0.0, count: 0 })
    }
}

struct AvgAcc {
    total: f64,
    count: u64,
}

impl Accumulator for AvgAcc {
    fn accumulate(&mut self, input: Value) -> Result<(), AccumulationError> {
        // Non-numeric inputs do not contribute to either the total or the count.
        if let Value::Number(n) = &input {
            if let Some(v) = n.as_f64() {
                self.total += v;
                self.count += 1;
            }
        }
        Ok(())
    }

    // Partials carry {count, total} so merged averages stay weighted.
    fn merge(&mut self, partial: Value) -> Result<(), AccumulationError> {
        let parts = partial.as_object().and_then(|map| {
            Some((
                map.get("count")?.as_u64()?,
                map.get("total")?.as_f64()?,
            ))
        });
        let Some((count, total)) = parts else {
            return Err(AccumulationError::MalformedPartial {
                operator: "$avg",
                reason: "expected {count, total}".to_string(),
            });
        };
        self.count += count;
        self.total += total;
        Ok(())
    }

    fn partial(&self) -> Value {
        json!({"count": self.count, "total": self.total})
    }

    fn finalize(&self) -> Value {
        if self.count == 0 {
            return Value::Null;
        }
        Number::from_f64(self.total / self.count as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acc() -> Box<dyn Accumulator> {
        AvgImpl.create_accumulator(&ExpressionContext::new())
    }

    #[test]
    fn empty_average_is_null() {
        assert_eq!(acc().finalize(), json!(null));
    }

    #[test]
    fn nulls_and_non_numerics_do_not_dilute() {
        let mut a = acc();
        for v in [json!(2), json!(null), json!("x"), json!(3)] {
            a.accumulate(v).unwrap();
        }
        assert_eq!(a.finalize(), json!(2.5));
    }

    #[test]
    fn merged_averages_are_weighted() {
        let mut a = acc();
        a.accumulate(json!(1)).unwrap();
        a.accumulate(json!(2)).unwrap();

        let mut b = acc();
        b.accumulate(json!(6)).unwrap();

        a.merge(b.partial()).unwrap();
        assert_eq!(a.finalize(), json!(3.0));
    }

    #[test]
    fn merging_an_empty_partial_is_a_no_op() {
        let mut a = acc();
        a.accumulate(json!(4)).unwrap();
        a.merge(acc().partial()).unwrap();
        assert_eq!(a.finalize(), json!(4.0));
    }

    #[test]
    fn malformed_partials_are_rejected() {
        let err = acc().merge(json!([1, 2])).unwrap_err();
        assert!(matches!(
            err,
            AccumulationError::MalformedPartial { operator: "$avg", .. }
        ));
    }
}
