//! Renaming of variables, types and functions

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::error::{Error, Result};
use crate::scope::{Scope, ScopeEntry};
use crate::syntax::{Node, NodeId, NodeKind, Token};
use crate::visitor::{visit, Path, Visitor};

/// Which registry a rename applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Binding,
    Type,
    Function,
}

/// Find the node carrying the name of a reference
fn named_leaf(node: &Node, target: Target) -> Result<&Node> {
    let unrecognized = || Err(Error::UnrecognizedReference(node.tag()));

    match (&node.kind, target) {
        (NodeKind::Identifier { .. }, Target::Binding)
        | (NodeKind::Identifier { .. }, Target::Function)
        | (NodeKind::TypeName { .. }, Target::Type) => Ok(node),
        (NodeKind::Declaration { identifier, .. }, Target::Binding)
        | (NodeKind::QuantifiedIdentifier { identifier, .. }, Target::Binding)
        | (NodeKind::ConditionExpression { identifier, .. }, Target::Binding) => {
            named_leaf(identifier, target)
        }
        (
            NodeKind::ParameterDeclaration {
                identifier: Some(identifier),
                ..
            },
            Target::Binding,
        ) => named_leaf(identifier, target),
        (NodeKind::TypeSpecifier { specifier, .. }, Target::Type)
        | (NodeKind::FullySpecifiedType { specifier, .. }, Target::Type) => {
            named_leaf(specifier, target)
        }
        (
            NodeKind::Struct {
                type_name: Some(type_name),
                ..
            },
            Target::Type,
        ) => named_leaf(type_name, target),
        (NodeKind::Function { prototype, .. }, Target::Function) => named_leaf(prototype, target),
        (NodeKind::FunctionPrototype { header, .. }, Target::Function) => {
            named_leaf(header, target)
        }
        (NodeKind::FunctionHeader { name, .. }, Target::Function) => named_leaf(name, target),
        (NodeKind::FunctionCall { identifier, .. }, Target::Function) => {
            match &identifier.kind {
                NodeKind::Identifier { .. } => Ok(identifier),
                // Call that was never resolved, `f(x)` with `f` still parsed as a type
                NodeKind::TypeSpecifier {
                    specifier,
                    quantifier,
                } if quantifier.is_empty() => match &specifier.kind {
                    NodeKind::TypeName { .. } => Ok(specifier),
                    _ => unrecognized(),
                },
                _ => unrecognized(),
            }
        }
        _ => unrecognized(),
    }
}

/// Copy of a name-bearing leaf with its text replaced
fn renamed(leaf: &Node, name: String) -> Node {
    let rename = |token: &Token| Token {
        text: name.into(),
        trivia: token.trivia.clone(),
    };

    let kind = match &leaf.kind {
        NodeKind::Identifier { identifier } => NodeKind::Identifier {
            identifier: rename(identifier),
        },
        NodeKind::TypeName { identifier } => NodeKind::TypeName {
            identifier: rename(identifier),
        },
        other => other.clone(),
    };

    Node {
        id: leaf.id,
        kind,
        span: leaf.span,
    }
}

struct Rename<M> {
    target: Target,
    /// Reference nodes to the registered name they refer to
    references: HashMap<NodeId, SmolStr>,
    /// Leaves to rename, with their new names
    pending: HashMap<NodeId, String>,
    mangle: M,
}

impl<M: FnMut(&str, &Node) -> String> Visitor for Rename<M> {
    fn enter(&mut self, path: &mut Path<'_>) -> Result<()> {
        let node = path.node();

        if let Some(name) = self.references.remove(&node.id) {
            let new_name = (self.mangle)(&name, node);
            let leaf = named_leaf(node, self.target)?;
            debug!("renaming {} to {}", name, new_name);

            self.pending.insert(leaf.id, new_name);
        }

        if let Some(new_name) = self.pending.remove(&node.id) {
            path.replace_with(renamed(node, new_name))?;
        }

        Ok(())
    }
}

fn rename(
    tree: &mut Node,
    target: Target,
    entries: impl Iterator<Item = (SmolStr, Vec<NodeId>)>,
    mangle: impl FnMut(&str, &Node) -> String,
) -> Result<()> {
    let mut references = HashMap::new();
    for (name, ids) in entries {
        for id in ids {
            references.insert(id, name.clone());
        }
    }

    let mut rename = Rename {
        target,
        references,
        pending: HashMap::new(),
        mangle,
    };

    visit(tree, &mut rename)?;

    if let Some(name) = rename.references.values().next() {
        return Err(Error::MissingReference {
            name: name.to_string(),
        });
    }

    match rename.pending.into_iter().next() {
        Some((_, name)) => Err(Error::MissingReference { name }),
        None => Ok(()),
    }
}

fn entry_references<'s>(
    entries: impl Iterator<Item = (&'s SmolStr, &'s ScopeEntry)> + 's,
) -> impl Iterator<Item = (SmolStr, Vec<NodeId>)> + 's {
    entries.map(|(name, entry)| (name.clone(), entry.references.clone()))
}

/// Rename every reference of the variables declared in `scope`
///
/// # Parameters
///
/// * `tree`: tree the scope was built from
/// * `scope`: scope whose variables should be renamed
/// * `mangle`: function of the current name and the reference node, returning the new name
pub fn rename_bindings(
    tree: &mut Node,
    scope: &Scope,
    mangle: impl FnMut(&str, &Node) -> String,
) -> Result<()> {
    rename(
        tree,
        Target::Binding,
        entry_references(scope.bindings.iter()),
        mangle,
    )
}

/// Rename every reference of the types declared in `scope`
///
/// # Parameters
///
/// * `tree`: tree the scope was built from
/// * `scope`: scope whose types should be renamed
/// * `mangle`: function of the current name and the reference node, returning the new name
pub fn rename_types(
    tree: &mut Node,
    scope: &Scope,
    mangle: impl FnMut(&str, &Node) -> String,
) -> Result<()> {
    rename(tree, Target::Type, entry_references(scope.types.iter()), mangle)
}

/// Rename every prototype, definition and call of the functions registered in `scope`
///
/// # Parameters
///
/// * `tree`: tree the scope was built from
/// * `scope`: scope holding the functions, usually the root scope
/// * `mangle`: function of the current name and the reference node, returning the new name
pub fn rename_functions(
    tree: &mut Node,
    scope: &Scope,
    mangle: impl FnMut(&str, &Node) -> String,
) -> Result<()> {
    rename(
        tree,
        Target::Function,
        scope.functions.iter().map(|(name, overloads)| {
            (
                name.clone(),
                overloads
                    .values()
                    .flat_map(|overload| overload.references.iter().copied())
                    .collect(),
            )
        }),
        mangle,
    )
}
