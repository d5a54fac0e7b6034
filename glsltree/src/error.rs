use std::fmt;

use thiserror::Error;

use crate::diagnostics::Diagnostic;
use crate::location::Span;
use crate::syntax::NodeTag;

/// Syntax error at the furthest position reached by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Sorted, de-duplicated descriptions of what was expected
    pub expected: Vec<String>,
    /// Text of the offending token, `None` at the end of input
    pub found: Option<String>,
    /// Location of the offending token
    pub span: Span,
    /// Label of the parsed source, from
    /// [ParseOptions::grammar_source](crate::ParseOptions::grammar_source)
    pub grammar_source: Option<String>,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.grammar_source {
            write!(f, "{}:", source)?;
        }

        write!(f, "{}: expected ", self.span.start)?;

        match self.expected.len() {
            0 => write!(f, "end of input")?,
            1 => write!(f, "{}", self.expected[0])?,
            n => {
                write!(f, "{}", self.expected[..n - 1].join(", "))?;
                write!(f, " or {}", self.expected[n - 1])?;
            }
        }

        match &self.found {
            Some(found) => write!(f, " but {:?} found", found),
            None => write!(f, " but end of input found"),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// GLSL tree error type
#[derive(Debug, Error)]
pub enum Error {
    /// The source could not be parsed
    #[error("syntax error: {0}")]
    Syntax(SyntaxError),
    /// A diagnostic was promoted to an error by
    /// [ParseOptions::fail_on_warn](crate::ParseOptions::fail_on_warn)
    #[error("{0}")]
    Diagnostic(Diagnostic),
    /// A scope without a parent was popped
    #[error("cannot pop the root scope")]
    PopRootScope,
    /// A node without a parent slot was removed or replaced
    #[error("cannot {operation} a node that has no parent")]
    DetachedNode {
        /// Attempted operation
        operation: &'static str,
    },
    /// A node occupying a non-nullable single child slot was removed
    #[error("cannot remove a node from the required {slot} slot of a {parent:?} node")]
    RequiredSlot {
        /// Kind of the parent node
        parent: NodeTag,
        /// Description of the slot
        slot: String,
    },
    /// A registry reference points to a node shape the rename utilities do not know
    #[error("cannot rename a reference of shape {0:?}")]
    UnrecognizedReference(NodeTag),
    /// A registry reference points to a node that is no longer in the tree
    #[error("reference to {name} was not found in the tree")]
    MissingReference {
        /// Name being renamed
        name: String,
    },
    /// A declarator was built from an unexpected node
    #[error("invalid declarator shape: {0:?}")]
    InvalidDeclarator(NodeTag),
    /// A switch body did not begin with a case or default label
    #[error("{0}: switch body must begin with a case or default label")]
    InvalidSwitchBody(Span),
    /// Expressions or statements are nested deeper than the parser supports
    #[error("{0}: nesting is too deep")]
    NestingTooDeep(Span),
}

/// GLSL tree Result
pub type Result<T> = std::result::Result<T, Error>;

impl From<SyntaxError> for Error {
    fn from(error: SyntaxError) -> Self {
        Self::Syntax(error)
    }
}
