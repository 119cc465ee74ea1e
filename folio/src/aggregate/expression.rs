use crate::collection::Document;
use crate::common::{split_path, Value};
use crate::errors::{ErrorKind, FolioError, FolioResult};
use std::fmt::{Display, Formatter};

/// A computed value over one input document, used for group keys and
/// accumulator arguments.
///
/// Evaluation yields `Ok(None)` when a referenced field is missing or null,
/// or a literal is null, which excludes the document from whatever asked for the value. A
/// non-numeric operand to an arithmetic expression, or a zero divisor, is a
/// `TypeMismatch`.
///
/// # Examples
///
/// ```rust
/// use folio::aggregate::Expression;
/// use folio::common::Value;
/// use folio::doc;
///
/// // {decade: floor(published_year / 10)}
/// let decade = Expression::object(vec![(
///     "decade",
///     Expression::floor(Expression::divide(
///         Expression::field("published_year"),
///         Expression::literal(10),
///     )),
/// )]);
///
/// let key = decade.evaluate(&doc! { published_year: 1949 }, ".").unwrap();
/// assert_eq!(key, Some(Value::from(doc! { decade: 194 })));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Value of a (possibly dotted) field of the input document
    Field(String),
    /// A constant
    Literal(Value),
    /// Floating point division of two numeric expressions
    Divide(Box<Expression>, Box<Expression>),
    /// Largest integer not greater than a numeric expression
    Floor(Box<Expression>),
    /// A document built from named sub-expressions
    Object(Vec<(String, Expression)>),
}

impl Expression {
    pub fn field(name: &str) -> Expression {
        Expression::Field(name.to_string())
    }

    pub fn literal<T: Into<Value>>(value: T) -> Expression {
        Expression::Literal(value.into())
    }

    pub fn divide(dividend: Expression, divisor: Expression) -> Expression {
        Expression::Divide(Box::new(dividend), Box::new(divisor))
    }

    pub fn floor(operand: Expression) -> Expression {
        Expression::Floor(Box::new(operand))
    }

    pub fn object(fields: Vec<(&str, Expression)>) -> Expression {
        Expression::Object(
            fields
                .into_iter()
                .map(|(name, expression)| (name.to_string(), expression))
                .collect(),
        )
    }

    pub fn evaluate(&self, document: &Document, separator: &str) -> FolioResult<Option<Value>> {
        match self {
            Expression::Field(name) => {
                let path = split_path(name, separator);
                Ok(document.get_path(&path).filter(|v| !v.is_null()).cloned())
            }
            Expression::Literal(value) => Ok(Some(value).filter(|v| !v.is_null()).cloned()),
            Expression::Divide(dividend, divisor) => {
                let dividend = dividend.evaluate(document, separator)?;
                let divisor = divisor.evaluate(document, separator)?;
                match (dividend, divisor) {
                    (Some(dividend), Some(divisor)) => divide(&dividend, &divisor).map(Some),
                    _ => Ok(None),
                }
            }
            Expression::Floor(operand) => match operand.evaluate(document, separator)? {
                Some(value) => floor(&value).map(Some),
                None => Ok(None),
            },
            Expression::Object(fields) => {
                let mut result = Document::new();
                for (name, expression) in fields {
                    match expression.evaluate(document, separator)? {
                        Some(value) => result.put(name.as_str(), value)?,
                        None => return Ok(None),
                    }
                }
                Ok(Some(Value::Document(result)))
            }
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Field(name) => write!(f, "${}", name),
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Divide(a, b) => write!(f, "({} / {})", a, b),
            Expression::Floor(operand) => write!(f, "floor({})", operand),
            Expression::Object(fields) => {
                write!(f, "{{")?;
                for (i, (name, expression)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, expression)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn numeric(value: &Value, operation: &str) -> FolioResult<f64> {
    value.as_f64().ok_or_else(|| {
        FolioError::new(
            &format!("Cannot {} a value of type {}", operation, value.type_name()),
            ErrorKind::TypeMismatch,
        )
    })
}

fn divide(dividend: &Value, divisor: &Value) -> FolioResult<Value> {
    let dividend = numeric(dividend, "divide")?;
    let divisor = numeric(divisor, "divide by")?;
    if divisor == 0.0 {
        return Err(FolioError::new("Division by zero", ErrorKind::TypeMismatch));
    }
    Ok(Value::F64(dividend / divisor))
}

// An integral result is reported as an integer when it fits, so bucket keys
// such as decades compare and print as whole numbers.
fn floor(value: &Value) -> FolioResult<Value> {
    if let Value::I64(i) = value {
        return Ok(Value::I64(*i));
    }
    let floored = numeric(value, "floor")?.floor();
    if floored.is_finite() && floored >= i64::MIN as f64 && floored < i64::MAX as f64 {
        Ok(Value::I64(floored as i64))
    } else {
        Ok(Value::F64(floored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_field_reference() {
        let book = doc! { title: "1984", meta: { pages: 328 }, note: (Value::Null) };
        assert_eq!(
            Expression::field("title").evaluate(&book, ".").unwrap(),
            Some(Value::from("1984"))
        );
        assert_eq!(
            Expression::field("meta.pages").evaluate(&book, ".").unwrap(),
            Some(Value::from(328))
        );
        assert_eq!(Expression::field("price").evaluate(&book, ".").unwrap(), None);
        assert_eq!(Expression::field("note").evaluate(&book, ".").unwrap(), None);
    }

    #[test]
    fn test_divide_and_floor() {
        let book = doc! { published_year: 1965 };
        let expression = Expression::floor(Expression::divide(
            Expression::field("published_year"),
            Expression::literal(10),
        ));
        assert_eq!(expression.evaluate(&book, ".").unwrap(), Some(Value::I64(196)));

        let ratio = Expression::divide(Expression::field("published_year"), Expression::literal(10));
        assert_eq!(ratio.evaluate(&book, ".").unwrap(), Some(Value::F64(196.5)));
    }

    #[test]
    fn test_floor_of_negative() {
        let expression = Expression::floor(Expression::literal(-1.5));
        assert_eq!(expression.evaluate(&Document::new(), ".").unwrap(), Some(Value::I64(-2)));
    }

    #[test]
    fn test_divide_by_zero_is_type_mismatch() {
        let expression = Expression::divide(Expression::literal(1), Expression::literal(0));
        let err = expression.evaluate(&Document::new(), ".").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_non_numeric_operand_is_type_mismatch() {
        let expression = Expression::floor(Expression::field("title"));
        let err = expression.evaluate(&doc! { title: "Dune" }, ".").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_missing_operand_propagates_as_none() {
        let expression = Expression::divide(Expression::field("published_year"), Expression::literal(10));
        assert_eq!(expression.evaluate(&doc! { title: "Dune" }, ".").unwrap(), None);
    }

    #[test]
    fn test_null_literal_is_absent() {
        let expression = Expression::literal(Value::Null);
        assert_eq!(expression.evaluate(&Document::new(), ".").unwrap(), None);

        let ratio = Expression::divide(Expression::literal(Value::Null), Expression::literal(2));
        assert_eq!(ratio.evaluate(&Document::new(), ".").unwrap(), None);
    }

    #[test]
    fn test_object_with_missing_member_is_none() {
        let expression = Expression::object(vec![
            ("author", Expression::field("author")),
            ("genre", Expression::field("genre")),
        ]);
        assert_eq!(expression.evaluate(&doc! { author: "Orwell" }, ".").unwrap(), None);
        assert_eq!(
            expression
                .evaluate(&doc! { author: "Orwell", genre: "Fiction" }, ".")
                .unwrap(),
            Some(Value::from(doc! { author: "Orwell", genre: "Fiction" }))
        );
    }

    #[test]
    fn test_display() {
        let expression = Expression::object(vec![(
            "decade",
            Expression::floor(Expression::divide(
                Expression::field("published_year"),
                Expression::literal(10),
            )),
        )]);
        assert_eq!(expression.to_string(), "{decade: floor(($published_year / 10))}");
    }
}
