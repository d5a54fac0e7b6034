//! Lexical scopes and symbol registries
//!
//! Scopes are stored in a [ScopeTree] arena. Each scope only knows its parent, and registers the
//! variables, types and functions it declares along with every node that refers to them. Function
//! overloads are always registered on the root scope.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Reporter};
use crate::error::Result;
use crate::location::Span;
use crate::syntax::{Node, NodeId};
use crate::util::is_builtin_variable;

mod binder;
pub(crate) use binder::Binder;

mod signature;
pub use signature::*;

/// Index of a scope in its [ScopeTree]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    /// Id of the root scope of every tree
    pub const ROOT: ScopeId = ScopeId(0);
}

/// A registered variable or type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEntry {
    /// First declaration site, `None` if the name was used without being declared
    pub declaration: Option<NodeId>,
    /// Nodes referring to this entry in source order, declarations included
    pub references: Vec<NodeId>,
}

/// One overload of a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionOverload {
    pub signature: FunctionSignature,
    /// First prototype or definition, `None` for overloads only known from calls
    pub declaration: Option<NodeId>,
    /// `true` once a definition with a body was seen
    pub defined: bool,
    /// Prototypes, definitions and calls in source order
    pub references: Vec<NodeId>,
}

/// Overloads of a function, by signature key
pub type FunctionOverloads = IndexMap<SmolStr, FunctionOverload>;

/// A lexical block
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    /// Label of the scope: `global`, a function name, `compound statement`, `for`, ...
    pub name: SmolStr,
    pub parent: Option<ScopeId>,
    pub span: Option<Span>,
    pub bindings: IndexMap<SmolStr, ScopeEntry>,
    pub types: IndexMap<SmolStr, ScopeEntry>,
    pub functions: IndexMap<SmolStr, FunctionOverloads>,
}

impl Scope {
    fn new(id: ScopeId, name: SmolStr, parent: Option<ScopeId>, span: Option<Span>) -> Self {
        Self {
            id,
            name,
            parent,
            span,
            bindings: IndexMap::new(),
            types: IndexMap::new(),
            functions: IndexMap::new(),
        }
    }

    /// `true` for the root scope
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Location of the node being registered
#[derive(Debug, Clone, Copy)]
pub(crate) struct Site {
    pub id: NodeId,
    pub span: Option<Span>,
}

impl Site {
    pub fn of(node: &Node) -> Self {
        Self {
            id: node.id,
            span: node.span,
        }
    }

    fn diagnostic(self, kind: DiagnosticKind, message: String) -> Diagnostic {
        Diagnostic {
            kind,
            message,
            node: self.id,
            span: self.span,
        }
    }
}

/// Arena of all the scopes of a program
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ScopeTree {
    /// Create a tree with a single `global` root scope
    pub fn new(span: Option<Span>) -> Self {
        Self {
            scopes: vec![Scope::new(ScopeId::ROOT, "global".into(), None, span)],
        }
    }

    pub fn root(&self) -> &Scope {
        &self.scopes[0]
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    /// All scopes, in the order they were opened
    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Direct children of a scope
    pub fn children(&self, id: ScopeId) -> impl Iterator<Item = &Scope> {
        self.scopes
            .iter()
            .filter(move |scope| scope.parent == Some(id))
    }

    /// The scope `id` followed by its enclosing scopes, up to the root
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = &Scope> {
        let mut current = self.get(id);
        std::iter::from_fn(move || {
            let scope = current?;
            current = scope.parent.and_then(|parent| self.get(parent));
            Some(scope)
        })
    }

    /// Find the scope that declares the variable `name`, starting from `from`
    pub fn lookup_binding(&self, from: ScopeId, name: &str) -> Option<(&Scope, &ScopeEntry)> {
        self.ancestors(from)
            .find_map(|scope| scope.bindings.get(name).map(|entry| (scope, entry)))
    }

    /// Find the scope that declares the type `name`, starting from `from`
    pub fn lookup_type(&self, from: ScopeId, name: &str) -> Option<(&Scope, &ScopeEntry)> {
        self.ancestors(from)
            .find_map(|scope| scope.types.get(name).map(|entry| (scope, entry)))
    }

    /// Overloads of the function `name`
    pub fn lookup_function(&self, name: &str) -> Option<&FunctionOverloads> {
        self.root().functions.get(name)
    }

    /// Open a new scope inside `parent`
    pub(crate) fn push(&mut self, parent: ScopeId, name: &str, span: Option<Span>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes
            .push(Scope::new(id, name.into(), Some(parent), span));
        id
    }

    /// Register the declaration of the variable `name` in `scope`
    pub(crate) fn create_binding(
        &mut self,
        scope: ScopeId,
        name: &str,
        site: Site,
        reporter: &mut Reporter,
    ) -> Result<()> {
        if is_builtin_variable(name) {
            return Ok(());
        }

        let scope = self.scope_mut(scope);
        debug!("declaring variable {} in {}", name, scope.name);

        match scope.bindings.get_mut(name) {
            Some(entry) => {
                entry.references.push(site.id);

                match entry.declaration {
                    None => {
                        entry.declaration = Some(site.id);
                        Ok(())
                    }
                    Some(_) => reporter.report(site.diagnostic(
                        DiagnosticKind::DuplicateVariable,
                        format!("variable {} is already declared in {}", name, scope.name),
                    )),
                }
            }
            None => {
                scope.bindings.insert(
                    name.into(),
                    ScopeEntry {
                        declaration: Some(site.id),
                        references: vec![site.id],
                    },
                );
                Ok(())
            }
        }
    }

    /// Register a use of the variable `name` from `scope`
    pub(crate) fn reference_binding(
        &mut self,
        scope: ScopeId,
        name: &str,
        site: Site,
        reporter: &mut Reporter,
    ) -> Result<()> {
        if is_builtin_variable(name) {
            return Ok(());
        }

        let declaring = self.lookup_binding(scope, name).map(|(scope, _)| scope.id);
        match declaring {
            Some(declaring) => {
                if let Some(entry) = self.scope_mut(declaring).bindings.get_mut(name) {
                    entry.references.push(site.id);
                }

                Ok(())
            }
            None => {
                self.scope_mut(scope).bindings.insert(
                    name.into(),
                    ScopeEntry {
                        declaration: None,
                        references: vec![site.id],
                    },
                );

                reporter.report(site.diagnostic(
                    DiagnosticKind::UndeclaredVariable,
                    format!("variable {} is used before being declared", name),
                ))
            }
        }
    }

    /// Register the declaration of the type `name` in `scope`
    pub(crate) fn create_type(
        &mut self,
        scope: ScopeId,
        name: &str,
        site: Site,
        reporter: &mut Reporter,
    ) -> Result<()> {
        let scope = self.scope_mut(scope);
        debug!("declaring type {} in {}", name, scope.name);

        match scope.types.get_mut(name) {
            Some(entry) => {
                entry.references.push(site.id);

                match entry.declaration {
                    None => {
                        entry.declaration = Some(site.id);
                        Ok(())
                    }
                    Some(_) => reporter.report(site.diagnostic(
                        DiagnosticKind::DuplicateType,
                        format!("type {} is already declared in {}", name, scope.name),
                    )),
                }
            }
            None => {
                scope.types.insert(
                    name.into(),
                    ScopeEntry {
                        declaration: Some(site.id),
                        references: vec![site.id],
                    },
                );
                Ok(())
            }
        }
    }

    /// Register a use of the type `name` from `scope`
    pub(crate) fn reference_type(
        &mut self,
        scope: ScopeId,
        name: &str,
        site: Site,
        reporter: &mut Reporter,
    ) -> Result<()> {
        let declaring = self.lookup_type(scope, name).map(|(scope, _)| scope.id);
        match declaring {
            Some(declaring) => {
                if let Some(entry) = self.scope_mut(declaring).types.get_mut(name) {
                    entry.references.push(site.id);
                }

                Ok(())
            }
            None => {
                self.scope_mut(scope).types.insert(
                    name.into(),
                    ScopeEntry {
                        declaration: None,
                        references: vec![site.id],
                    },
                );

                reporter.report(site.diagnostic(
                    DiagnosticKind::UndeclaredType,
                    format!("type {} is used before being declared", name),
                ))
            }
        }
    }

    /// Find the overload of `name` a declaration with `signature` refers to: the overload with
    /// the same key, or a matching one that was only known from calls so far.
    fn declared_overload(
        &mut self,
        name: &str,
        signature: &FunctionSignature,
    ) -> Option<&mut FunctionOverload> {
        let overloads = self.scope_mut(ScopeId::ROOT).functions.get_mut(name)?;
        let key = signature.key();

        if !overloads.contains_key(&key) {
            // Upgrade the first call-only overload this declaration satisfies
            let implicit = overloads
                .iter()
                .position(|(_, o)| o.declaration.is_none() && o.signature.matches(signature))?;

            if let Some((_, mut overload)) = overloads.shift_remove_index(implicit) {
                overload.signature = signature.clone();
                overloads.insert(key.clone(), overload);
            }
        }

        overloads.get_mut(&key)
    }

    fn insert_overload(&mut self, name: &str, overload: FunctionOverload) {
        self.scope_mut(ScopeId::ROOT)
            .functions
            .entry(name.into())
            .or_default()
            .insert(overload.signature.key(), overload);
    }

    /// Register a function prototype (declaration without a body)
    pub(crate) fn declare_function_prototype(
        &mut self,
        name: &str,
        signature: FunctionSignature,
        site: Site,
        reporter: &mut Reporter,
    ) -> Result<()> {
        debug!("declaring prototype {} ({})", name, signature);

        match self.declared_overload(name, &signature) {
            Some(overload) => {
                overload.references.push(site.id);

                if overload.declaration.is_some() {
                    reporter.report(site.diagnostic(
                        DiagnosticKind::DuplicatePrototype,
                        format!("prototype {} ({}) is already declared", name, signature),
                    ))
                } else {
                    overload.declaration = Some(site.id);
                    Ok(())
                }
            }
            None => {
                self.insert_overload(
                    name,
                    FunctionOverload {
                        signature,
                        declaration: Some(site.id),
                        defined: false,
                        references: vec![site.id],
                    },
                );
                Ok(())
            }
        }
    }

    /// Register a function definition
    pub(crate) fn define_function(
        &mut self,
        name: &str,
        signature: FunctionSignature,
        site: Site,
        reporter: &mut Reporter,
    ) -> Result<()> {
        debug!("defining function {} ({})", name, signature);

        match self.declared_overload(name, &signature) {
            Some(overload) => {
                overload.references.push(site.id);

                if overload.defined {
                    reporter.report(site.diagnostic(
                        DiagnosticKind::DuplicateFunction,
                        format!("function {} ({}) is already defined", name, signature),
                    ))
                } else {
                    overload.defined = true;
                    overload.declaration.get_or_insert(site.id);
                    Ok(())
                }
            }
            None => {
                self.insert_overload(
                    name,
                    FunctionOverload {
                        signature,
                        declaration: Some(site.id),
                        defined: true,
                        references: vec![site.id],
                    },
                );
                Ok(())
            }
        }
    }

    /// Register a call to the user function `name` with `argument_count` arguments
    pub(crate) fn reference_function_call(
        &mut self,
        name: &str,
        argument_count: usize,
        site: Site,
        reporter: &mut Reporter,
    ) -> Result<()> {
        let signature = FunctionSignature::call(argument_count);

        let kind = match self.scope_mut(ScopeId::ROOT).functions.get_mut(name) {
            Some(overloads) => {
                if let Some(overload) = overloads
                    .values_mut()
                    .find(|overload| overload.signature.matches(&signature))
                {
                    debug!("call to {} resolved to ({})", name, overload.signature);
                    overload.references.push(site.id);
                    return Ok(());
                }

                DiagnosticKind::NoMatchingOverload
            }
            None => DiagnosticKind::UndeclaredFunction,
        };

        let message = match kind {
            DiagnosticKind::NoMatchingOverload => format!(
                "no overload of {} matches a call with {} argument(s)",
                name, argument_count
            ),
            _ => format!("function {} is called before being declared", name),
        };

        self.insert_overload(
            name,
            FunctionOverload {
                signature,
                declaration: None,
                defined: false,
                references: vec![site.id],
            },
        );

        reporter.report(site.diagnostic(kind, message))
    }
}
