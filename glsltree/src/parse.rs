//! Parsing entry points

use derive_builder::Builder;

use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::generate::generate;
use crate::scope::{Binder, Scope, ScopeTree};
use crate::syntax::{Node, NodeId, NodeKind, SlotMut};
use crate::transform::{rename_bindings, rename_functions, rename_types};
use crate::visitor::{visit, Visitor};

mod grammar;
use grammar::{PResult, Parser};

mod declaration;
mod expression;
mod statement;

/// Grammar rule to start parsing from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRule {
    /// A complete shader
    TranslationUnit,
    /// A single top-level declaration or function definition
    ExternalDeclaration,
    /// A single statement
    Statement,
    /// A single expression
    Expression,
}

impl Default for StartRule {
    fn default() -> Self {
        Self::TranslationUnit
    }
}

/// Parsing options
#[derive(Debug, Clone, Default, Builder)]
#[builder(default, setter(into))]
pub struct ParseOptions {
    /// Attach source spans to nodes and scopes
    pub include_location: bool,
    /// Turn every diagnostic into an error
    pub fail_on_warn: bool,
    /// Do not log diagnostics
    pub quiet: bool,
    /// Name of the source, for error messages
    #[builder(setter(into, strip_option))]
    pub grammar_source: Option<String>,
    /// Rule to start parsing from
    pub start_rule: StartRule,
}

/// Result of parsing a source string: the tree, its scopes and the diagnostics found while
/// building them
#[derive(Debug, Clone)]
pub struct Program {
    /// Root node, always a [NodeKind::Program]
    pub node: Node,
    pub scopes: ScopeTree,
    pub diagnostics: Vec<Diagnostic>,
}

impl Program {
    /// Source text of the tree
    pub fn generate(&self) -> String {
        generate(&self.node)
    }

    /// The global scope
    pub fn root_scope(&self) -> &Scope {
        self.scopes.root()
    }

    /// Find the node with the given id
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        find(&self.node, id)
    }

    /// Visit the tree, see [visit]
    pub fn visit(&mut self, visitor: &mut dyn Visitor) -> Result<()> {
        visit(&mut self.node, visitor)
    }

    /// Rename the global variables, see [rename_bindings]
    pub fn rename_bindings(&mut self, mangle: impl FnMut(&str, &Node) -> String) -> Result<()> {
        rename_bindings(&mut self.node, self.scopes.root(), mangle)
    }

    /// Rename the global types, see [rename_types]
    pub fn rename_types(&mut self, mangle: impl FnMut(&str, &Node) -> String) -> Result<()> {
        rename_types(&mut self.node, self.scopes.root(), mangle)
    }

    /// Rename all functions, see [rename_functions]
    pub fn rename_functions(&mut self, mangle: impl FnMut(&str, &Node) -> String) -> Result<()> {
        rename_functions(&mut self.node, self.scopes.root(), mangle)
    }
}

fn find(node: &Node, id: NodeId) -> Option<&Node> {
    if node.id == id {
        return Some(node);
    }

    node.children().into_iter().find_map(|child| find(child, id))
}

/// Number `node` and its descendants in pre-order, starting after `last`
fn assign_ids(node: &mut Node, last: &mut u32) {
    *last += 1;
    node.id = NodeId(*last);

    for slot in node.kind.slots_mut() {
        match slot {
            SlotMut::Required(child) => assign_ids(child, last),
            SlotMut::Optional(Some(child)) => assign_ids(child, last),
            SlotMut::Optional(None) => {}
            SlotMut::List(children) | SlotMut::Separated(children, _) => {
                for child in children {
                    assign_ids(child, last);
                }
            }
        }
    }
}

impl<'s> Parser<'s> {
    fn translation_unit(&mut self, pos: usize) -> PResult<Vec<Node>> {
        let (pos, program) = self.many(pos, Self::external_declaration);
        let (pos, ()) = self.end_of_input(pos)?;
        Some((pos, program))
    }

    /// Parse a single `rule` spanning the whole input
    fn entire(
        &mut self,
        pos: usize,
        rule: impl FnOnce(&mut Self, usize) -> PResult<Node>,
    ) -> PResult<Vec<Node>> {
        let (pos, node) = rule(self, pos)?;
        let (pos, ()) = self.end_of_input(pos)?;
        Some((pos, vec![node]))
    }

    fn program(&mut self, start_rule: StartRule) -> PResult<Node> {
        let (end, program) = match start_rule {
            StartRule::TranslationUnit => self.translation_unit(0),
            StartRule::ExternalDeclaration => self.entire(0, Self::external_declaration),
            StartRule::Statement => self.entire(0, Self::statement),
            StartRule::Expression => self.entire(0, Self::expression),
        }?;

        let whitespace = self.leading_trivia().into();
        Some((
            end,
            self.node(
                0,
                end,
                NodeKind::Program {
                    whitespace,
                    program,
                },
            ),
        ))
    }
}

/// Parse a GLSL source string and build its scopes
///
/// # Parameters
///
/// * `source`: GLSL source, with macros already expanded
/// * `options`: parsing options
///
/// # Returns
///
/// The parsed program, or the first error. With [ParseOptions::fail_on_warn], diagnostics are
/// errors too.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Program> {
    let mut parser = Parser::new(
        source,
        options.include_location,
        options.grammar_source.clone(),
    );

    let result = parser.program(options.start_rule);
    let mut node = parser.finish(result)?;

    let mut last = 0;
    assign_ids(&mut node, &mut last);

    let binder = Binder::new(options.fail_on_warn, options.quiet, last, &node);
    let (scopes, diagnostics) = binder.bind(&mut node)?;

    debug!(
        "parsed program with {} scopes and {} diagnostics",
        scopes.len(),
        diagnostics.len()
    );

    Ok(Program {
        node,
        scopes,
        diagnostics,
    })
}

/// Parse a complete shader with the default options
pub fn parse_default(source: &str) -> Result<Program> {
    parse(source, &ParseOptions::default())
}
