//! Non-fatal semantic diagnostics

use std::fmt;

use crate::error::{Error, Result};
use crate::location::Span;
use crate::syntax::NodeId;

/// Category of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    UndeclaredVariable,
    UndeclaredType,
    UndeclaredFunction,
    DuplicateVariable,
    DuplicateType,
    DuplicateFunction,
    DuplicatePrototype,
    /// A call matched none of the declared overloads of a function
    NoMatchingOverload,
}

/// A semantic issue found while building scopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Node the diagnostic is about
    pub node: NodeId,
    /// Location of the node, if locations were requested
    pub span: Option<Span>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = &self.span {
            write!(f, "{}: ", span.start)?;
        }

        write!(f, "{}", self.message)
    }
}

/// Routes diagnostics according to the parse options
#[derive(Debug, Default)]
pub(crate) struct Reporter {
    fail_on_warn: bool,
    quiet: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new(fail_on_warn: bool, quiet: bool) -> Self {
        Self {
            fail_on_warn,
            quiet,
            diagnostics: Vec::new(),
        }
    }

    /// Report a diagnostic. Fails in strict mode, records and logs it otherwise.
    pub fn report(&mut self, diagnostic: Diagnostic) -> Result<()> {
        if self.fail_on_warn {
            return Err(Error::Diagnostic(diagnostic));
        }

        if !self.quiet {
            warn!("{}", diagnostic);
        }

        self.diagnostics.push(diagnostic);
        Ok(())
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
