use serde_json::Value;

use crate::expression::ParseError;

/// A dotted path into a document, stored without the leading sigil.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    parts: Vec<String>,
}

impl FieldPath {
    /// Parses `"a.b.c"` (sigil already stripped). The empty path and empty
    /// components (`"a..b"`, trailing dots) are rejected.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        if raw.is_empty() || raw.split('.').any(str::is_empty) {
            return Err(ParseError::EmptyFieldPath {
                path: format!("${raw}"),
            });
        }
        Ok(Self {
            parts: raw.split('.').map(str::to_string).collect(),
        })
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn full(&self) -> String {
        self.parts.join(".")
    }

    /// Walks the path into `doc`. Arrays are traversed element-wise and the
    /// matches collected; a missing field resolves to Null.
    pub fn extract(&self, doc: &Value) -> Value {
        Self::step(&self.parts, doc)
    }

    fn step(parts: &[String], v: &Value) -> Value {
        let Some((head, rest)) = parts.split_first() else {
            return v.clone();
        };
        match v {
            Value::Object(map) => match map.get(head) {
                Some(inner) => Self::step(rest, inner),
                None => Value::Null,
            },
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| Self::step(parts, item)).collect())
            }
            _ => Value::Null,
        }
    }
}
