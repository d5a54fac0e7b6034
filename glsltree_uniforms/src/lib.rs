//! Qualifier-based declaration scanning
//!
//! Finds the names declared by top-level declaration statements carrying a given qualifier, such
//! as the uniforms of a shader.

#[macro_use]
extern crate log;

use glsltree::{Node, NodeKind, ParseOptions};

/// `true` if one of `qualifiers` is the keyword `qualifier`
fn has_qualifier(qualifiers: &[Node], qualifier: &str) -> bool {
    qualifiers.iter().any(|node| match &node.kind {
        NodeKind::Keyword { token } => token.as_str() == qualifier,
        _ => false,
    })
}

/// Name of a declarator, `a` in `a[2] = ...`
fn declarator_name(node: &Node) -> Option<&str> {
    match &node.kind {
        NodeKind::Declaration { identifier, .. }
        | NodeKind::QuantifiedIdentifier { identifier, .. } => identifier.name(),
        _ => node.name(),
    }
}

fn interface_members(declarations: &[Node]) -> impl Iterator<Item = &str> {
    declarations
        .iter()
        .filter_map(|member| match &member.kind {
            NodeKind::StructDeclaration { declarations, .. } => Some(declarations),
            _ => None,
        })
        .flatten()
        .filter_map(declarator_name)
}

/// Names declared at the top level of `tree` with the given qualifier
///
/// Declarator lists contribute all their declared names. Interface blocks contribute their
/// instance name, or their member names when the block has no instance name.
///
/// # Parameters
///
/// * `tree`: root of a parsed program
/// * `qualifier`: storage qualifier to look for, e.g. `uniform`
///
/// # Returns
///
/// Declared names, in source order
pub fn declared_names(tree: &Node, qualifier: &str) -> Vec<String> {
    let mut names = Vec::new();

    let statements = match &tree.kind {
        NodeKind::Program { program, .. } => program.as_slice(),
        _ => std::slice::from_ref(tree),
    };

    for statement in statements {
        let declaration = match &statement.kind {
            NodeKind::DeclarationStatement { declaration, .. } => declaration,
            _ => continue,
        };

        match &declaration.kind {
            NodeKind::DeclaratorList {
                specified_type,
                declarations,
                ..
            } => {
                let qualified = match &specified_type.kind {
                    NodeKind::FullySpecifiedType { qualifiers, .. } => {
                        has_qualifier(qualifiers, qualifier)
                    }
                    _ => false,
                };

                if qualified {
                    names.extend(
                        declarations
                            .iter()
                            .filter_map(declarator_name)
                            .map(str::to_owned),
                    );
                }
            }
            NodeKind::InterfaceDeclarator {
                qualifiers,
                declarations,
                identifier,
                ..
            } if has_qualifier(qualifiers, qualifier) => match identifier {
                Some(instance) => names.extend(declarator_name(instance).map(str::to_owned)),
                None => names.extend(interface_members(declarations).map(str::to_owned)),
            },
            _ => {}
        }
    }

    debug!("found {} {} declarations", names.len(), qualifier);
    names
}

/// Parse `source` and return the names of its uniforms, in declaration order
///
/// Diagnostics are not logged, only syntax errors are reported.
pub fn uniform_names(source: &str) -> glsltree::Result<Vec<String>> {
    let options = ParseOptions {
        quiet: true,
        ..Default::default()
    };

    let program = glsltree::parse(source, &options)?;
    Ok(declared_names(&program.node, "uniform"))
}
