//! The public API: a compiled path ties together a parsed, type-checked
//! expression, its value pool, and the origin node it will be evaluated
//! against.
//!
//! [`CompiledPath`] is a thin public-facing wrapper, owning no algorithmic
//! logic of its own beyond lazy-evaluation bookkeeping and the
//! prefix-expansion walk — it delegates all of the real work to
//! [`crate::parser`], [`crate::typecheck`], and [`crate::engine`].

use crate::ast::{Axis, Expression};
use crate::engine;
use crate::error::XPathError;
use crate::parser;
use crate::tree::{TreeNode, TreeNodeMut};
use crate::typecheck;
use crate::value::ValuePool;

/// A parsed, type-checked path expression bound to an origin node.
///
/// Evaluation is lazy (triggered against the origin on the first call to
/// [`CompiledPath::first`]); the resulting node-set is cached and walked
/// by [`CompiledPath::next`] via an internal cursor.
pub struct CompiledPath<N: TreeNode> {
    text: String,
    expr: Expression,
    pool: ValuePool<N>,
    origin: N,
    result: Option<Vec<N>>,
    cursor: Option<usize>,
    last_error: Option<XPathError>,
}

/// The message/text/offset triple exposed by [`CompiledPath::error`].
pub struct PathError<'a> {
    pub message: String,
    pub text: &'a str,
    pub offset: usize,
}

/// Compile `text` against `origin`'s tree: parse, then type-check. The
/// parsed root must be a `LocPath` of type `nodeset` — anything else (a
/// bare arithmetic or string expression with no location step) is rejected
/// with `ETYPE` even though it would type-check as a standalone expression,
/// since a compiled path can only ever produce a node-set.
pub fn parse<N: TreeNode>(origin: N, text: &str) -> Result<CompiledPath<N>, XPathError> {
    let parsed = parser::parse::<N>(text)?;
    typecheck::check(&parsed.expr, &parsed.pool)?;
    if !matches!(parsed.expr, Expression::LocPath(_)) {
        return Err(XPathError::Type(
            "a compiled path must be a location path, not a bare value expression".into(),
        ));
    }
    Ok(CompiledPath {
        text: text.to_string(),
        expr: parsed.expr,
        pool: parsed.pool,
        origin,
        result: None,
        cursor: None,
        last_error: None,
    })
}

impl<N: TreeNode> CompiledPath<N> {
    fn location_path(&self) -> &crate::ast::LocationPath {
        match &self.expr {
            Expression::LocPath(p) => p,
            _ => unreachable!("parse() rejects anything but a LocPath"),
        }
    }

    /// Evaluate against the origin on first use; afterwards a no-op. On
    /// error, the error is latched for [`CompiledPath::error`] and no
    /// partial result is ever exposed.
    fn ensure_evaluated(&mut self) -> Option<&Vec<N>> {
        if self.last_error.is_some() {
            return None;
        }
        if self.result.is_none() {
            let path = self.location_path().clone();
            match engine::eval_location_path(&path, &self.origin, &mut self.pool) {
                Ok(nodes) => self.result = Some(nodes),
                Err(e) => {
                    self.last_error = Some(e);
                    return None;
                }
            }
        }
        self.result.as_ref()
    }

    /// Trigger evaluation if needed, position the cursor at 0, and return
    /// the first result node, or `None` if the node-set is empty.
    pub fn first(&mut self) -> Option<N> {
        let first = self.ensure_evaluated().and_then(|nodes| nodes.first().cloned());
        self.cursor = Some(0);
        first
    }

    /// Advance the cursor and return the next result node, or `None` once
    /// exhausted. Calling `next` before `first` starts at index 0, same as
    /// calling `first`.
    pub fn next(&mut self) -> Option<N> {
        let idx = match self.cursor {
            Some(i) => i + 1,
            None => 0,
        };
        self.cursor = Some(idx);
        self.ensure_evaluated().and_then(|nodes| nodes.get(idx).cloned())
    }

    /// 1 if exactly one node matches (with that node), 0 if none, -1
    /// if more than one. Does not disturb the `first`/`next` cursor.
    pub fn find_one(&mut self) -> (i32, Option<N>) {
        match self.ensure_evaluated() {
            None => (-1, None),
            Some(nodes) => match nodes.len() {
                0 => (0, None),
                1 => (1, Some(nodes[0].clone())),
                _ => (-1, None),
            },
        }
    }

    /// The last error latched by a lazy evaluation, if any, as a
    /// message/text/offset triple. `None` means no error has occurred
    /// (including when evaluation hasn't run yet).
    pub fn error(&self) -> Option<PathError<'_>> {
        self.last_error.as_ref().map(|e| PathError {
            message: e.to_string(),
            text: &self.text,
            offset: e.offset(),
        })
    }
}

impl<N: TreeNodeMut> CompiledPath<N> {
    /// Create-if-missing expansion. Runs the same step-by-step
    /// expansion as evaluation, remembering the deepest non-empty working
    /// set, then materialises the remaining steps as a chain of new
    /// `child::name` nodes beneath the single surviving anchor.
    ///
    /// Returns 0 and sets `*out` to the deepest node (existing or newly
    /// created) on success; returns -1 and leaves the tree unchanged (any
    /// partially created chain is detached and freed) on failure.
    pub fn expand_tree(&mut self, out: &mut N) -> i32 {
        let path = self.location_path().clone();
        let steps = &path.steps;

        let mut working = vec![self.origin.clone()];
        let mut deepest_idx = 0usize;
        let mut deepest_set = working.clone();

        for (i, step) in steps.iter().enumerate() {
            let expanded = match engine::eval_step(step, &working, &mut self.pool) {
                Ok(v) => v,
                Err(e) => {
                    self.last_error = Some(e);
                    return -1;
                }
            };
            if expanded.is_empty() {
                break;
            }
            working = expanded;
            deepest_idx = i + 1;
            deepest_set = working.clone();
        }

        if deepest_set.len() > 1 {
            return -1;
        }

        let mut anchor = deepest_set.into_iter().next().unwrap_or_else(|| self.origin.clone());
        let original_parent = anchor.clone();
        let mut first_created: Option<N> = None;

        for step in &steps[deepest_idx..] {
            let label = match (step.axis, &step.name) {
                (Axis::Child, Some(name)) => name,
                _ => {
                    cleanup(&original_parent, first_created);
                    return -1;
                }
            };
            match anchor.make_child(label) {
                Some(child) => {
                    if first_created.is_none() {
                        first_created = Some(child.clone());
                    }
                    anchor = child;
                }
                None => {
                    cleanup(&original_parent, first_created);
                    self.last_error = Some(XPathError::NoMem);
                    return -1;
                }
            }
        }

        *out = anchor;
        0
    }
}

/// On a failed expansion, detach and free the chain rooted at the first
/// node this call created, leaving the tree exactly as it was found.
fn cleanup<N: TreeNodeMut>(original_parent: &N, first_created: Option<N>) {
    if let Some(first) = first_created {
        N::remove_child(original_parent.clone(), first.clone());
        N::free_subtree(first);
    }
}
