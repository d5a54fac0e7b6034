//! glsltree is a lossless GLSL parser.
//!
//! [parse] turns a source string into a tree that keeps every terminal along with its trailing
//! whitespace and comments, so that [generate] reproduces the input exactly. While parsing, it
//! builds a [ScopeTree] registering the variables, types and functions of the program along with
//! every node that refers to them. The tree can then be rewritten with [visit], and symbols renamed
//! through the scope registries with [rename_bindings], [rename_types] and [rename_functions].
//!
//! ```
//! let mut program = glsltree::parse_default("float a = 1.0; void main() { a = 2.0; }").unwrap();
//!
//! program.rename_bindings(|name, _| format!("{}_renamed", name)).unwrap();
//! assert_eq!(
//!     program.generate(),
//!     "float a_renamed = 1.0; void main() { a_renamed = 2.0; }"
//! );
//! ```
//!
//! Preprocessor directives are kept verbatim as opaque nodes. Macros must be expanded before
//! parsing for the scope analysis to be accurate.

#[macro_use]
extern crate log;

mod diagnostics;
pub use diagnostics::*;

mod error;
pub use error::*;

mod generate;
pub use generate::*;

pub mod lexer;

mod location;
pub use location::{Position, Span};

mod parse;
pub use parse::*;

mod scope;
pub use scope::*;

mod syntax;
pub use syntax::*;

mod transform;
pub use transform::*;

pub mod util;

mod visitor;
pub use visitor::*;
