//! The evaluator: a recursive post-order walk of the AST that threads
//! context node/position/length through predicate evaluation and interns
//! every intermediate result into the value pool.
//!
//! Every sub-result is a [`ValueHandle`] rather than an owned value, per the
//! pool-backed design; `eval` implements the
//! evaluate/evaluate_location_path/evaluate_step/apply_predicates pipeline
//! for this grammar's four `Expression` variants, seven axes, and two
//! builtins.

use crate::ast::{BinaryOperator, BuiltinFunc, Expression, LocationPath, Step};
use crate::axes;
use crate::error::XPathError;
use crate::tree::TreeNode;
use crate::value::{PoolValue, ValueHandle, ValuePool};

/// Evaluation state threaded through one `eval` call: the value pool
/// everything is interned into, and the context triple (the current context
/// node, 1-based context position, and context length) that
/// `position()`/`last()` and predicate filtering read.
pub struct EvalState<'p, N: TreeNode> {
    pub pool: &'p mut ValuePool<N>,
    pub context_node: N,
    pub context_pos: usize,
    pub context_len: usize,
}

/// Absent strings and empty strings compare equal everywhere the engine
/// tests string equality — name matching (axes.rs) and the `=`/`!=`
/// operators alike.
pub fn streq(a: Option<&str>, b: Option<&str>) -> bool {
    a.unwrap_or("") == b.unwrap_or("")
}

/// Evaluate `expr` under `state`, returning a handle to the pushed result.
/// A complete top-level evaluation leaves exactly one value interned along
/// this call's path: `eval` never leaves partial results on the pool on
/// success, and callers propagate the first error instead of exposing one.
pub fn eval<N: TreeNode>(
    expr: &Expression,
    state: &mut EvalState<'_, N>,
) -> Result<ValueHandle, XPathError> {
    match expr {
        Expression::Value(handle) => Ok(*handle),

        Expression::App { func, args } => {
            if !args.is_empty() {
                return Err(XPathError::Internal(format!(
                    "{}() called with non-empty argument list after type check",
                    func.name()
                )));
            }
            let n = match func {
                BuiltinFunc::Last => state.context_len,
                BuiltinFunc::Position => state.context_pos,
            };
            Ok(state.pool.push(PoolValue::Number(n as i32)))
        }

        Expression::Binary { op, left, right } => {
            let l = eval(left, state)?;
            let r = eval(right, state)?;
            eval_binary(*op, l, r, state.pool)
        }

        Expression::LocPath(path) => {
            let nodes = eval_location_path(path, &state.context_node, state.pool)?;
            Ok(state.pool.push(PoolValue::NodeSet(nodes)))
        }
    }
}

fn eval_binary<N: TreeNode>(
    op: BinaryOperator,
    left: ValueHandle,
    right: ValueHandle,
    pool: &mut ValuePool<N>,
) -> Result<ValueHandle, XPathError> {
    if op.is_equality() {
        let eq = values_equal(pool.get(left), pool.get(right));
        let result = if op == BinaryOperator::Neq { !eq } else { eq };
        return Ok(if result { ValueHandle::TRUE } else { ValueHandle::FALSE });
    }
    let l = expect_number(pool.get(left))?;
    let r = expect_number(pool.get(right))?;
    // Wrapping rather than panicking/checked: integer overflow has no error
    // code to report through, so it silently wraps rather than panicking.
    let n = match op {
        BinaryOperator::Plus => l.wrapping_add(r),
        BinaryOperator::Minus => l.wrapping_sub(r),
        BinaryOperator::Star => l.wrapping_mul(r),
        BinaryOperator::Eq | BinaryOperator::Neq => unreachable!("handled above"),
    };
    Ok(pool.push(PoolValue::Number(n)))
}

fn expect_number<N: TreeNode>(value: &PoolValue<N>) -> Result<i32, XPathError> {
    match value {
        PoolValue::Number(n) => Ok(*n),
        other => Err(XPathError::Internal(format!(
            "expected a number after type check, found {other:?}"
        ))),
    }
}

/// The equality table: node-set/node-set compares any pair; node-set/
/// string and string/string both resolve through a node's `value`; number/
/// number is plain integer comparison. The type checker has already ruled
/// out every other pairing.
fn values_equal<N: TreeNode>(left: &PoolValue<N>, right: &PoolValue<N>) -> bool {
    match (left, right) {
        (PoolValue::NodeSet(l), PoolValue::NodeSet(r)) => {
            l.iter().any(|a| r.iter().any(|b| streq(a.value(), b.value())))
        }
        (PoolValue::NodeSet(ns), PoolValue::Str(s)) | (PoolValue::Str(s), PoolValue::NodeSet(ns)) => {
            ns.iter().any(|n| streq(n.value(), s.as_deref()))
        }
        (PoolValue::Str(a), PoolValue::Str(b)) => streq(a.as_deref(), b.as_deref()),
        (PoolValue::Number(a), PoolValue::Number(b)) => a == b,
        _ => false,
    }
}

/// The central algorithm: `k+1` working node-sets `N[0..k]`, seeded with
/// the context node, expanded and predicate-filtered one step at a time.
/// Only the final set is returned; the intermediates are dropped as soon as
/// the next step's expansion has consumed them.
pub(crate) fn eval_location_path<N: TreeNode>(
    path: &LocationPath,
    context_node: &N,
    pool: &mut ValuePool<N>,
) -> Result<Vec<N>, XPathError> {
    let mut working = vec![context_node.clone()];
    for step in &path.steps {
        working = eval_step(step, &working, pool)?;
    }
    Ok(working)
}

pub(crate) fn eval_step<N: TreeNode>(
    step: &Step,
    context_set: &[N],
    pool: &mut ValuePool<N>,
) -> Result<Vec<N>, XPathError> {
    let mut expanded = Vec::new();
    for node in context_set {
        axes::collect(step.axis, node, step.name.as_deref(), &mut expanded);
    }
    for predicate in &step.predicates {
        expanded = apply_predicate(predicate, expanded, pool)?;
    }
    Ok(expanded)
}

/// `context_pos` is numbered over the pre-filter working set, advancing on
/// every candidate whether or not it survives — only the retained
/// candidates are carried into the next predicate or the next step.
fn apply_predicate<N: TreeNode>(
    predicate: &Expression,
    candidates: Vec<N>,
    pool: &mut ValuePool<N>,
) -> Result<Vec<N>, XPathError> {
    let context_len = candidates.len();
    let mut kept = Vec::with_capacity(candidates.len());
    for (i, node) in candidates.into_iter().enumerate() {
        let mut state = EvalState {
            pool: &mut *pool,
            context_node: node.clone(),
            context_pos: i + 1,
            context_len,
        };
        let handle = eval(predicate, &mut state)?;
        if predicate_keeps(pool.get(handle), i + 1) {
            kept.push(node);
        }
    }
    Ok(kept)
}

/// Predicate semantics: boolean keeps iff true, number `n` keeps iff
/// `context_pos == n`, node-set keeps iff non-empty.
fn predicate_keeps<N: TreeNode>(value: &PoolValue<N>, context_pos: usize) -> bool {
    match value {
        PoolValue::Bool(b) => *b,
        PoolValue::Number(n) => *n == context_pos as i32,
        PoolValue::NodeSet(nodes) => !nodes.is_empty(),
        PoolValue::Str(_) => false, // ruled out by the type checker; never reached.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use crate::tree::TreeNode;
    use crate::tree::mock::MockTree;
    use crate::typecheck;

    fn eval_path(tree_root: &crate::tree::mock::MockNode, text: &str) -> Vec<crate::tree::mock::MockNode> {
        let parsed = parser::parse::<crate::tree::mock::MockNode>(text).unwrap();
        typecheck::check(&parsed.expr, &parsed.pool).unwrap();
        let mut pool = parsed.pool;
        let mut state = EvalState {
            pool: &mut pool,
            context_node: tree_root.clone(),
            context_pos: 1,
            context_len: 1,
        };
        let handle = eval(&parsed.expr, &mut state).unwrap();
        match pool.get(handle) {
            PoolValue::NodeSet(nodes) => nodes.clone(),
            other => panic!("expected a node-set, got {other:?}"),
        }
    }

    fn sample_tree() -> crate::tree::mock::MockNode {
        let root = MockTree::new();
        let a1 = root.add_child("a", Some("1"));
        root.add_child("b", Some("2"));
        let a2 = root.add_child("a", Some("1"));
        a2.add_child("c", None);
        let _ = a1;
        root
    }

    #[test]
    fn scenario_1_both_a_children_in_order() {
        let root = sample_tree();
        let result = eval_path(&root, "/a");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].label(), Some("a"));
        assert_eq!(result[1].label(), Some("a"));
    }

    #[test]
    fn scenario_2_positional_predicate_picks_second_a() {
        let root = sample_tree();
        let result = eval_path(&root, "/a[2]");
        assert_eq!(result.len(), 1);
        assert!(result[0].first_child().is_some());
    }

    #[test]
    fn scenario_3_self_value_predicate_keeps_both() {
        let root = sample_tree();
        let result = eval_path(&root, "/a[. = \"1\"]");
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn scenario_4_child_existence_predicate_finds_none() {
        let root = sample_tree();
        let result = eval_path(&root, "/a[b]");
        assert!(result.is_empty());
    }

    #[test]
    fn scenario_5_descendant_or_self_finds_single_c() {
        let root = sample_tree();
        let result = eval_path(&root, "//c");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].label(), Some("c"));
    }

    #[test]
    fn scenario_6_position_equals_last_picks_second_a() {
        let root = sample_tree();
        let result = eval_path(&root, "/a[position() = last()]");
        assert_eq!(result.len(), 1);
        assert!(result[0].first_child().is_some());
    }

    #[test]
    fn bare_slash_matches_only_the_root() {
        let root = sample_tree();
        let result = eval_path(&root, "/");
        assert_eq!(result, vec![root]);
    }

    #[test]
    fn empty_string_literal_equals_absent_value() {
        let root = sample_tree();
        let result = eval_path(&root, "/b[. = \"\"]");
        assert!(result.is_empty());
        let result = eval_path(&root, "//c[. = \"\"]");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn escaped_delimiter_in_name_matches_literal_label() {
        let root = MockTree::new();
        root.add_child("a[b", None);
        let result = eval_path(&root, r"a\[b");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn arithmetic_evaluates_left_associatively() {
        let root = sample_tree();
        // (4 - 1) - 1 == 2, not 4 - (1 - 1) == 4: selects the second `a`.
        let result = eval_path(&root, "/a[position() = 4 - 1 - 1]");
        assert_eq!(result.len(), 1);
        assert!(result[0].first_child().is_some());
    }
}
