//! Token-stream reader (spec.md §4.6, component C6).
//!
//! Deserializes the preprocessor's serialized token file (spec.md §6;
//! written by `cc-cpp::output`) back into [`cc_lex::Token`]s for the parser,
//! and subtypes each `PpNumber` token into an integer or floating constant
//! per C23 §6.4.4 (spec.md §4.6's pp-number-to-constant classifier).

pub mod number;
pub mod reader;

pub use number::{FloatSuffix, IntSuffix, NumberClassifier, NumberConstant, NumberKind};
pub use reader::TokenStreamReader;
