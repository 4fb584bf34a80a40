//! Generic containers shared by the preprocessor, parser, and AST (spec §4.7,
//! component C1).
//!
//! - [`queue`] - a circular, double-ended queue with O(1) push/pop on both
//!   ends, used as the preprocessor's token stream and macro/conditional
//!   stacks.
//! - [`tree`] - a parent-linked, ordered-children tree, used by the AST and
//!   symbol-table scope tree.
//!
//! The source this is distilled from keeps two near-identical
//! implementations, a "pointer queue" (elements stored by address, a
//! deleter callback runs on drop) and a "value queue" (elements stored
//! inline). Rust's ownership model collapses that distinction: `Queue<T>`
//! below stores `T` inline and drops it normally, so `Queue<Box<T>>` is the
//! idiomatic analogue of the original's pointer-queue (see
//! `cc_containers::queue::Queue`'s doc comment).

pub mod queue;
pub mod tree;

pub use queue::Queue;
pub use tree::{Tree, TreeNodeId};
