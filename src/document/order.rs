use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde_json::Value;

use crate::document::Collation;

/// Total order over document values. Values of different types compare by
/// type bracket: Null < Bool < Number < String < Array < Object.
pub fn cmp_values(a: &Value, b: &Value, collation: &Collation) -> Ordering {
    use Value::*;
    match (a, b) {
        (Null, Null) => Ordering::Equal,
        (Bool(x), Bool(y)) => x.cmp(y),
        (Number(x), Number(y)) => {
            let fx = OrderedFloat(x.as_f64().unwrap_or(f64::NAN));
            let fy = OrderedFloat(y.as_f64().unwrap_or(f64::NAN));
            fx.cmp(&fy)
        }
        (String(x), String(y)) => collation.str_cmp(x, y),
        (Array(x), Array(y)) => {
            for (ax, bx) in x.iter().zip(y.iter()) {
                let ord = cmp_values(ax, bx, collation);
                if !ord.is_eq() {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Object(x), Object(y)) => {
            for ((ka, va), (kb, vb)) in x.iter().zip(y.iter()) {
                let ord = ka.cmp(kb).then_with(|| cmp_values(va, vb, collation));
                if !ord.is_eq() {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (lhs, rhs) => type_rank(lhs).cmp(&type_rank(rhs)),
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
