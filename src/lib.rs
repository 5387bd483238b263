//! A path-expression engine over an in-memory labelled tree (XPath 1.0,
//! loosely): parse, type-check, and evaluate a textual path against any
//! tree implementing [`tree::TreeNode`], plus a prefix-expansion operation
//! for materialising missing branches.

pub mod ast;
pub mod axes;
pub mod engine;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod path;
pub mod tree;
pub mod typecheck;
pub mod value;

pub use ast::{Axis, BinaryOperator, Expression, LocationPath, Step, Type};
pub use error::XPathError;
pub use path::{CompiledPath, PathError, parse};
pub use tree::{TreeNode, TreeNodeMut};
pub use value::{PoolValue, ValueHandle, ValuePool};

#[cfg(any(test, feature = "mock-tree"))]
pub use tree::mock;
