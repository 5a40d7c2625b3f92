//! Tree-walking evaluator.

use super::{Expr, ExpressionError, Scope, Value};

/// Evaluate an expression to a value.
///
/// `and`/`or`/`not`/`in`/`==`/`!=` always yield [`Value::Bool`]. Both sides of
/// `and`/`or` are evaluated so undefined names surface regardless of the
/// other operand's value.
pub fn eval(expr: &Expr, scope: &Scope<'_>) -> Result<Value, ExpressionError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Ref(name) => scope
            .lookup(name)
            .cloned()
            .ok_or_else(|| ExpressionError::Undefined(name.clone())),
        Expr::Dot => scope
            .dot()
            .map(|item| Value::Str(item.to_string()))
            .ok_or(ExpressionError::DotOutsideRange),
        Expr::Not(inner) => Ok(Value::Bool(!eval(inner, scope)?.truthy())),
        Expr::And(a, b) => {
            let left = eval(a, scope)?.truthy();
            let right = eval(b, scope)?.truthy();
            Ok(Value::Bool(left && right))
        }
        Expr::Or(a, b) => {
            let left = eval(a, scope)?.truthy();
            let right = eval(b, scope)?.truthy();
            Ok(Value::Bool(left || right))
        }
        Expr::Contains { needle, haystack } => {
            let needle = eval(needle, scope)?;
            let haystack = eval(haystack, scope)?;
            contains(&needle, &haystack).map(Value::Bool)
        }
        Expr::Eq(a, b) => Ok(Value::Bool(eval(a, scope)? == eval(b, scope)?)),
        Expr::Ne(a, b) => Ok(Value::Bool(eval(a, scope)? != eval(b, scope)?)),
    }
}

/// Evaluate an expression and apply truthiness.
pub fn eval_bool(expr: &Expr, scope: &Scope<'_>) -> Result<bool, ExpressionError> {
    eval(expr, scope).map(|v| v.truthy())
}

fn contains(needle: &Value, haystack: &Value) -> Result<bool, ExpressionError> {
    match haystack {
        Value::List(items) => Ok(match needle {
            Value::List(wanted) => wanted.iter().all(|w| items.contains(w)),
            scalar => scalar
                .as_scalar()
                .is_some_and(|s| items.iter().any(|item| *item == s)),
        }),
        Value::Str(text) => match needle.as_scalar() {
            Some(s) => Ok(text.contains(&s)),
            None => Err(ExpressionError::InvalidMembership("string")),
        },
        Value::Bool(_) => Err(ExpressionError::InvalidMembership("bool")),
    }
}
