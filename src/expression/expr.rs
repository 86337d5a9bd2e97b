use std::sync::Arc;

use serde_json::{Map, Value};

use crate::expression::{
    ExpressionContext, FieldPath, ParseError, Variables, VariablesParseState,
};

/// An already-parsed, evaluable value-producing tree. Statements share these
/// via `Arc`; the same tree may also be held by explain/serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(Value),
    FieldPath(FieldPath),
    Variable(String),
    Array(Vec<Arc<Expression>>),
    Object(Vec<(String, Arc<Expression>)>),
}

impl Expression {
    /// Parses a raw document value into an expression tree.
    ///
    /// Strings starting with `$` are field paths, `$$` variable references
    /// (checked against `scope`). `{"$literal": v}` escapes a constant. Any
    /// other `$`-keyed document belongs to the full expression-operator
    /// engine and is rejected here.
    pub fn parse(
        ctx: &ExpressionContext,
        raw: &Value,
        scope: &VariablesParseState,
    ) -> Result<Arc<Expression>, ParseError> {
        match raw {
            Value::String(s) if s.starts_with("$$") => {
                let name = &s[2..];
                scope.ensure_defined(name)?;
                Ok(Arc::new(Expression::Variable(name.to_string())))
            }
            Value::String(s) if s.starts_with('$') => {
                Ok(Arc::new(Expression::FieldPath(FieldPath::parse(&s[1..])?)))
            }
            Value::Array(items) => {
                let parsed = items
                    .iter()
                    .map(|item| Self::parse(ctx, item, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Arc::new(Expression::Array(parsed)))
            }
            Value::Object(map) => Self::parse_document(ctx, map, scope),
            scalar => Ok(Arc::new(Expression::Constant(scalar.clone()))),
        }
    }

    fn parse_document(
        ctx: &ExpressionContext,
        map: &Map<String, Value>,
        scope: &VariablesParseState,
    ) -> Result<Arc<Expression>, ParseError> {
        if map.len() == 1 {
            if let Some((op, arg)) = map.iter().next() {
                if op.starts_with('$') {
                    return match op.as_str() {
                        "$literal" => Ok(Arc::new(Expression::Constant(arg.clone()))),
                        _ => Err(ParseError::UnknownExpressionOperator { name: op.clone() }),
                    };
                }
            }
        } else if let Some(op) = map.keys().find(|k| k.starts_with('$')) {
            return Err(ParseError::InvalidDocument {
                reason: format!("the operator '{op}' cannot be mixed with other fields"),
            });
        }

        let mut fields = Vec::with_capacity(map.len());
        for (name, raw) in map {
            fields.push((name.clone(), Self::parse(ctx, raw, scope)?));
        }
        Ok(Arc::new(Expression::Object(fields)))
    }

    /// Evaluates against the group's current document.
    pub fn evaluate(&self, root: &Value, vars: &Variables) -> Value {
        match self {
            Expression::Constant(v) => v.clone(),
            Expression::FieldPath(path) => path.extract(root),
            Expression::Variable(name) => vars.resolve(name, root),
            Expression::Array(items) => {
                Value::Array(items.iter().map(|e| e.evaluate(root, vars)).collect())
            }
            Expression::Object(fields) => {
                let mut out = Map::new();
                for (name, expr) in fields {
                    out.insert(name.clone(), expr.evaluate(root, vars));
                }
                Value::Object(out)
            }
        }
    }
}
