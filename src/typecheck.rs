//! Static type checking.
//!
//! Four types — node-set, boolean, number, string — assigned by a pure
//! recursive function over the AST, run once ahead of evaluation. Returning
//! the type rather than mutating anything in place keeps `Expression`
//! immutable after parsing.

use crate::ast::{Expression, Type};
use crate::error::XPathError;
use crate::tree::TreeNode;
use crate::value::{PoolValue, ValuePool};

/// Assign a type to `expr`, or fail with `ETYPE` if it's not well-typed.
pub fn check<N: TreeNode>(expr: &Expression, pool: &ValuePool<N>) -> Result<Type, XPathError> {
    match expr {
        Expression::LocPath(path) => {
            for step in &path.steps {
                for predicate in &step.predicates {
                    match check(predicate, pool)? {
                        Type::NodeSet | Type::Number | Type::Boolean => {}
                        Type::String => {
                            return Err(XPathError::Type(
                                "a predicate must be a node-set, number, or boolean, not a string"
                                    .into(),
                            ));
                        }
                    }
                }
            }
            Ok(Type::NodeSet)
        }

        Expression::Value(handle) => Ok(match pool.get(*handle) {
            PoolValue::NodeSet(_) => Type::NodeSet,
            PoolValue::Number(_) => Type::Number,
            PoolValue::Str(_) => Type::String,
            PoolValue::Bool(_) => Type::Boolean,
        }),

        Expression::App { func, args } => {
            if args.len() != func.arity() {
                return Err(XPathError::Type(format!(
                    "{}() takes {} arguments, got {}",
                    func.name(),
                    func.arity(),
                    args.len()
                )));
            }
            for arg in args {
                check(arg, pool)?;
            }
            Ok(Type::Number)
        }

        Expression::Binary { op, left, right } => {
            let lt = check(left, pool)?;
            let rt = check(right, pool)?;
            if op.is_equality() {
                let comparable = matches!(
                    (lt, rt),
                    (Type::NodeSet, Type::NodeSet)
                        | (Type::NodeSet, Type::String)
                        | (Type::String, Type::NodeSet)
                        | (Type::String, Type::String)
                        | (Type::Number, Type::Number)
                );
                if !comparable {
                    return Err(XPathError::Type(format!(
                        "cannot compare {lt:?} to {rt:?} with {op:?}"
                    )));
                }
                Ok(Type::Boolean)
            } else {
                if lt != Type::Number || rt != Type::Number {
                    return Err(XPathError::Type(format!(
                        "{op:?} requires number operands, got {lt:?} and {rt:?}"
                    )));
                }
                Ok(Type::Number)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use crate::tree::mock::MockNode;

    fn type_of(text: &str) -> Type {
        let out = parser::parse::<MockNode>(text).unwrap();
        check(&out.expr, &out.pool).unwrap()
    }

    fn type_err(text: &str) -> XPathError {
        let out = parser::parse::<MockNode>(text).unwrap();
        check(&out.expr, &out.pool).unwrap_err()
    }

    #[test]
    fn location_path_is_nodeset() {
        assert_eq!(type_of("/a/b"), Type::NodeSet);
    }

    #[test]
    fn equality_of_two_numbers_is_boolean() {
        assert_eq!(type_of("1 = 2"), Type::Boolean);
    }

    #[test]
    fn arithmetic_is_number() {
        assert_eq!(type_of("1 + 2 - 3"), Type::Number);
    }

    #[test]
    fn comparing_nodeset_to_string_is_allowed() {
        assert_eq!(type_of("a = \"x\""), Type::Boolean);
    }

    #[test]
    fn comparing_nodeset_to_number_is_a_type_error() {
        let err = type_err("a = 1");
        assert_eq!(err.code(), "ETYPE");
    }

    #[test]
    fn arithmetic_on_strings_is_a_type_error() {
        let err = type_err("\"x\" + 1");
        assert_eq!(err.code(), "ETYPE");
    }

    #[test]
    fn predicate_must_not_be_a_string() {
        let err = type_err("a[\"x\"]");
        assert_eq!(err.code(), "ETYPE");
    }

    #[test]
    fn last_and_position_are_numbers() {
        assert_eq!(type_of("a[position() = last()]"), Type::NodeSet);
    }
}
