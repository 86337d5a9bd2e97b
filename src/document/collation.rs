use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::order::cmp_values;

/// String-comparison rule applied by order-sensitive accumulators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collation {
    #[default]
    Binary,
    CaseInsensitive,
}

impl Collation {
    pub fn str_cmp(&self, a: &str, b: &str) -> Ordering {
        match self {
            Collation::Binary => a.cmp(b),
            Collation::CaseInsensitive => a.to_lowercase().cmp(&b.to_lowercase()),
        }
    }

    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        cmp_values(a, b, self)
    }

    pub fn values_equal(&self, a: &Value, b: &Value) -> bool {
        self.compare(a, b).is_eq()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn case_insensitive_equality_folds_strings() {
        let c = Collation::CaseInsensitive;
        assert!(c.values_equal(&json!("Pear"), &json!("pear")));
        assert!(!c.values_equal(&json!("pear"), &json!("plum")));
        assert!(!Collation::Binary.values_equal(&json!("Pear"), &json!("pear")));
    }

    #[test]
    fn collation_round_trips_through_serde() {
        let raw = serde_json::to_string(&Collation::CaseInsensitive).unwrap();
        assert_eq!(raw, "\"case_insensitive\"");
        let back: Collation = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, Collation::CaseInsensitive);
    }
}
