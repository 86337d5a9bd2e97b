use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    accumulation::{global_registry, Accumulator, AccumulatorImpl, AccumulatorRegistry},
    expression::{Expression, ExpressionContext, ParseError, VariablesParseState},
};

/// A user-specified accumulation: the output field name, the expression that
/// produces the accumulator's input per document, and the factory resolved
/// for the operator at parse time.
///
/// Immutable once constructed and cheap to clone; a compiled pipeline may
/// share one statement across concurrent executions, each calling
/// `make_accumulator` to get its own instance.
#[derive(Clone)]
pub struct AccumulationStatement {
    pub field_name: String,
    pub expression: Arc<Expression>,
    factory: Arc<dyn AccumulatorImpl>,
}

impl AccumulationStatement {
    pub fn new(
        field_name: String,
        expression: Arc<Expression>,
        factory: Arc<dyn AccumulatorImpl>,
    ) -> Self {
        Self {
            field_name,
            expression,
            factory,
        }
    }

    /// Parses one accumulated field against the process-wide registry.
    pub fn parse(
        ctx: &ExpressionContext,
        field_name: &str,
        raw: &Value,
        scope: &VariablesParseState,
    ) -> Result<Self, ParseError> {
        Self::parse_with(global_registry(), ctx, field_name, raw, scope)
    }

    /// Parses one accumulated field, e.g. `total: {"$sum": "$price"}`.
    ///
    /// `raw` must be a document with exactly one field; its key names the
    /// operator, its value is handed to the expression parser with `scope`.
    /// Resolution happens here, once; the statement never consults the
    /// registry again.
    pub fn parse_with(
        registry: &AccumulatorRegistry,
        ctx: &ExpressionContext,
        field_name: &str,
        raw: &Value,
        scope: &VariablesParseState,
    ) -> Result<Self, ParseError> {
        let Value::Object(doc) = raw else {
            return Err(ParseError::MalformedAccumulatorExpression {
                field: field_name.to_string(),
                reason: "the aggregate field must be an operator expression inside an object"
                    .to_string(),
            });
        };
        let mut entries = doc.iter();
        let (operator, raw_arg) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(ParseError::MalformedAccumulatorExpression {
                    field: field_name.to_string(),
                    reason: format!(
                        "exactly one accumulator operator is required, found {}",
                        doc.len()
                    ),
                });
            }
        };
        let factory = registry.lookup(operator)?;
        let expression = Expression::parse(ctx, raw_arg, scope)?;
        Ok(Self::new(field_name.to_string(), expression, factory))
    }

    pub fn operator_name(&self) -> &'static str {
        self.factory.name()
    }

    pub fn factory(&self) -> &Arc<dyn AccumulatorImpl> {
        &self.factory
    }

    /// Invokes the bound factory. Every call returns a fresh accumulator;
    /// instances are never reused across groups or executions.
    pub fn make_accumulator(&self, ctx: &ExpressionContext) -> Box<dyn Accumulator> {
        self.factory.create_accumulator(ctx)
    }
}

impl fmt::Debug for AccumulationStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccumulationStatement")
            .field("field_name", &self.field_name)
            .field("operator", &self.factory.name())
            .field("expression", &self.expression)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Variables;
    use serde_json::json;

    fn ctx() -> ExpressionContext {
        ExpressionContext::new()
    }

    fn parse(field_name: &str, raw: Value) -> Result<AccumulationStatement, ParseError> {
        AccumulationStatement::parse(&ctx(), field_name, &raw, &VariablesParseState::new())
    }

    #[test]
    fn parse_binds_field_expression_and_factory() {
        let statement = parse("total", json!({"$sum": "$price"})).unwrap();
        assert_eq!(statement.field_name, "total");
        assert_eq!(statement.operator_name(), "$sum");

        let expected = Expression::parse(
            &ctx(),
            &json!("$price"),
            &VariablesParseState::new(),
        )
        .unwrap();
        assert_eq!(statement.expression, expected);

        let registered = global_registry().lookup("$sum").unwrap();
        assert!(Arc::ptr_eq(statement.factory(), &registered));
    }

    #[test]
    fn unknown_operators_fail_with_their_name() {
        assert!(matches!(
            parse("total", json!({"$bogus": 1})),
            Err(ParseError::UnknownOperator { name }) if name == "$bogus"
        ));
    }

    #[test]
    fn operator_documents_must_hold_exactly_one_field() {
        assert!(matches!(
            parse("total", json!({})),
            Err(ParseError::MalformedAccumulatorExpression { field, .. }) if field == "total"
        ));
        assert!(matches!(
            parse("total", json!({"$sum": 1, "$avg": 2})),
            Err(ParseError::MalformedAccumulatorExpression { .. })
        ));
        assert!(matches!(
            parse("total", json!("$price")),
            Err(ParseError::MalformedAccumulatorExpression { .. })
        ));
    }

    #[test]
    fn expression_errors_pass_through() {
        assert!(matches!(
            parse("total", json!({"$sum": "$$undeclared"})),
            Err(ParseError::UndefinedVariable { name }) if name == "undeclared"
        ));
    }

    #[test]
    fn parsing_creates_no_accumulators_and_no_side_effects() {
        let statement = parse("prices", json!({"$push": "$price"})).unwrap();
        // instantiation is deferred until the executor asks
        let acc = statement.make_accumulator(&ctx());
        assert_eq!(acc.finalize(), json!([]));
    }

    #[test]
    fn each_make_accumulator_call_is_independent() {
        let statement = parse("total", json!({"$sum": "$price"})).unwrap();
        let mut a = statement.make_accumulator(&ctx());
        let b = statement.make_accumulator(&ctx());
        a.accumulate(json!(5)).unwrap();
        assert_eq!(a.finalize(), json!(5));
        assert_eq!(b.finalize(), json!(0));
    }

    #[test]
    fn statement_drives_a_group_of_documents() {
        let statement = parse("total", json!({"$sum": "$price"})).unwrap();
        let vars = Variables::new();
        let mut acc = statement.make_accumulator(&ctx());
        for doc in [
            json!({"price": 2}),
            json!({"price": 3}),
            json!({"item": "unpriced"}),
        ] {
            acc.accumulate(statement.expression.evaluate(&doc, &vars))
                .unwrap();
        }
        assert_eq!(acc.finalize(), json!(5));
    }

    #[test]
    fn clones_share_the_expression_and_factory() {
        let statement = parse("total", json!({"$avg": "$price"})).unwrap();
        let copy = statement.clone();
        assert!(Arc::ptr_eq(&statement.expression, &copy.expression));
        assert!(Arc::ptr_eq(statement.factory(), copy.factory()));
        assert_eq!(copy.field_name, "total");
    }

    #[test]
    fn statements_are_shared_across_threads() {
        let statement = Arc::new(parse("total", json!({"$sum": "$price"})).unwrap());
        let handles: Vec<_> = (1..=4)
            .map(|n| {
                let statement = Arc::clone(&statement);
                std::thread::spawn(move || {
                    let mut acc = statement.make_accumulator(&ExpressionContext::new());
                    for _ in 0..n {
                        acc.accumulate(json!(1)).unwrap();
                    }
                    acc.finalize()
                })
            })
            .collect();
        let totals: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(totals, vec![json!(1), json!(2), json!(3), json!(4)]);
    }
}
