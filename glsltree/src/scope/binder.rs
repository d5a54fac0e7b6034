//! Scope construction over a parsed tree
//!
//! The binder walks the tree in source order, opening scopes where the grammar does and
//! registering declarations and references as it meets them. It also settles what each call
//! refers to: constructor calls keep their type specifier callee, while calls to functions get a
//! new [NodeKind::Identifier] callee.

use crate::diagnostics::{Diagnostic, Reporter};
use crate::error::{Error, Result};
use crate::generate::generate;
use crate::location::Span;
use crate::syntax::{Node, NodeId, NodeKind, SlotMut, Token};
use crate::util::is_builtin_glsl_function;

use smol_str::SmolStr;

use super::{FunctionSignature, ScopeId, ScopeTree, Site};

pub(crate) struct Binder {
    scopes: ScopeTree,
    current: ScopeId,
    reporter: Reporter,
    next_id: u32,
}

/// Text of a type for signatures: the type name followed by its array dimensions
fn type_text(node: &Node, extra_quantifier: &[Node]) -> String {
    let (specifier, quantifier) = match &node.kind {
        NodeKind::FullySpecifiedType { specifier, .. } => {
            return type_text(specifier, extra_quantifier)
        }
        NodeKind::TypeSpecifier {
            specifier,
            quantifier,
        } => (specifier.as_ref(), quantifier.as_slice()),
        _ => (node, &[][..]),
    };

    let mut text = match &specifier.kind {
        NodeKind::Struct { type_name, .. } => type_name
            .as_ref()
            .and_then(|name| name.name())
            .unwrap_or("struct")
            .to_owned(),
        _ => specifier.name().unwrap_or_default().to_owned(),
    };

    for dimension in quantifier.iter().chain(extra_quantifier) {
        match &dimension.kind {
            NodeKind::ArraySpecifier {
                expression: Some(expression),
                ..
            } => {
                text.push('[');
                text.push_str(generate(expression).trim());
                text.push(']');
            }
            _ => text.push_str("[]"),
        }
    }

    text
}

/// Number of arguments of a call, `f(void)` having none
fn argument_count(args: &[Node]) -> usize {
    match args {
        [single] if single.name() == Some("void") => 0,
        _ => args.len(),
    }
}

fn declared_name(node: &Node) -> Result<&str> {
    match &node.kind {
        NodeKind::Identifier { identifier } | NodeKind::TypeName { identifier } => {
            Ok(identifier.as_str())
        }
        _ => Err(Error::InvalidDeclarator(node.tag())),
    }
}

impl Binder {
    /// Create a binder. `next_id` is the first id available for nodes built while binding.
    pub fn new(fail_on_warn: bool, quiet: bool, next_id: u32, program: &Node) -> Self {
        Self {
            scopes: ScopeTree::new(program.span),
            current: ScopeId::ROOT,
            reporter: Reporter::new(fail_on_warn, quiet),
            next_id,
        }
    }

    pub fn bind(mut self, program: &mut Node) -> Result<(ScopeTree, Vec<Diagnostic>)> {
        self.node(program)?;
        Ok((self.scopes, self.reporter.into_diagnostics()))
    }

    fn push(&mut self, name: &str, span: Option<Span>) {
        trace!("entering scope {}", name);
        self.current = self.scopes.push(self.current, name, span);
    }

    fn pop(&mut self) -> Result<()> {
        let scope = self.scopes.get(self.current).ok_or(Error::PopRootScope)?;
        trace!("leaving scope {}", scope.name);

        self.current = scope.parent.ok_or(Error::PopRootScope)?;
        Ok(())
    }

    fn fresh_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    fn children(&mut self, node: &mut Node) -> Result<()> {
        for slot in node.kind.slots_mut() {
            match slot {
                SlotMut::Required(child) => self.node(child)?,
                SlotMut::Optional(child) => {
                    if let Some(child) = child {
                        self.node(child)?;
                    }
                }
                SlotMut::List(children) | SlotMut::Separated(children, _) => {
                    for child in children.iter_mut() {
                        self.node(child)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn nodes(&mut self, nodes: &mut [Node]) -> Result<()> {
        for node in nodes {
            self.node(node)?;
        }

        Ok(())
    }

    /// Bind a loop or function body in the scope that is already open
    fn body(&mut self, body: &mut Node) -> Result<()> {
        match &mut body.kind {
            NodeKind::CompoundStatement { statements, .. } => self.nodes(statements),
            _ => self.node(body),
        }
    }

    fn node(&mut self, node: &mut Node) -> Result<()> {
        let site = Site::of(node);
        let span = node.span;

        match &mut node.kind {
            NodeKind::Identifier { identifier } => {
                let name = identifier.text.clone();
                self.scopes
                    .reference_binding(self.current, &name, site, &mut self.reporter)
            }
            NodeKind::TypeName { identifier } => {
                let name = identifier.text.clone();
                self.scopes
                    .reference_type(self.current, &name, site, &mut self.reporter)
            }
            NodeKind::FunctionCall { .. } => self.call(node),
            NodeKind::Function { prototype, body } => {
                let name =
                    self.prototype_signature(prototype, |scopes, name, signature, reporter| {
                        scopes.define_function(name, signature, site, reporter)
                    })?;

                self.push(&name, span);
                self.parameters(prototype)?;
                self.body(body)?;
                self.pop()
            }
            NodeKind::FunctionPrototype { .. } => {
                let name = self.prototype_signature(node, |scopes, name, signature, reporter| {
                    scopes.declare_function_prototype(name, signature, site, reporter)
                })?;

                self.push(&name, span);
                self.parameters(node)?;
                self.pop()
            }
            NodeKind::DeclaratorList {
                specified_type,
                declarations,
                ..
            } => {
                self.node(specified_type)?;

                for declaration in declarations {
                    match &mut declaration.kind {
                        NodeKind::Declaration {
                            identifier,
                            quantifier,
                            initializer,
                            ..
                        } => {
                            self.nodes(quantifier)?;
                            if let Some(initializer) = initializer {
                                self.node(initializer)?;
                            }

                            self.create_binding(identifier)?;
                        }
                        _ => return Err(Error::InvalidDeclarator(declaration.tag())),
                    }
                }

                Ok(())
            }
            NodeKind::Struct {
                type_name,
                declarations,
                ..
            } => {
                self.members(declarations)?;

                match type_name {
                    Some(type_name) => {
                        let name = declared_name(type_name)?.to_owned();
                        self.scopes.create_type(
                            self.current,
                            &name,
                            Site::of(type_name),
                            &mut self.reporter,
                        )
                    }
                    None => Ok(()),
                }
            }
            NodeKind::InterfaceDeclarator {
                qualifiers,
                declarations,
                identifier,
                ..
            } => {
                self.nodes(qualifiers)?;
                self.members(declarations)?;

                match identifier {
                    Some(instance) => self.quantified_binding(instance),
                    // Members of anonymous blocks are global variables
                    None => {
                        for declaration in declarations {
                            if let NodeKind::StructDeclaration { declarations, .. } =
                                &mut declaration.kind
                            {
                                for member in declarations {
                                    self.quantified_binding(member)?;
                                }
                            }
                        }

                        Ok(())
                    }
                }
            }
            NodeKind::ConditionExpression {
                specified_type,
                identifier,
                initializer,
                ..
            } => {
                self.node(specified_type)?;
                self.node(initializer)?;
                self.create_binding(identifier)
            }
            NodeKind::CompoundStatement { statements, .. } => {
                self.push("compound statement", span);
                self.nodes(statements)?;
                self.pop()
            }
            NodeKind::WhileStatement {
                condition, body, ..
            } => {
                self.push("while", span);
                self.node(condition)?;
                self.body(body)?;
                self.pop()
            }
            NodeKind::DoStatement {
                body, expression, ..
            } => {
                self.push("do", span);
                self.body(body)?;
                self.pop()?;
                self.node(expression)
            }
            NodeKind::ForStatement {
                init,
                condition,
                operation,
                body,
                ..
            } => {
                self.push("for", span);
                self.node(init)?;
                if let Some(condition) = condition {
                    self.node(condition)?;
                }
                if let Some(operation) = operation {
                    self.node(operation)?;
                }
                self.body(body)?;
                self.pop()
            }
            NodeKind::SwitchStatement {
                expression, cases, ..
            } => {
                self.node(expression)?;
                self.push("switch", span);
                self.nodes(cases)?;
                self.pop()
            }
            _ => self.children(node),
        }
    }

    fn create_binding(&mut self, identifier: &Node) -> Result<()> {
        let name = declared_name(identifier)?.to_owned();
        self.scopes.create_binding(
            self.current,
            &name,
            Site::of(identifier),
            &mut self.reporter,
        )
    }

    /// Declare the name of a [NodeKind::QuantifiedIdentifier] as a variable
    fn quantified_binding(&mut self, node: &mut Node) -> Result<()> {
        match &mut node.kind {
            NodeKind::QuantifiedIdentifier {
                identifier,
                quantifier,
            } => {
                self.nodes(quantifier)?;
                self.create_binding(identifier)
            }
            _ => Err(Error::InvalidDeclarator(node.tag())),
        }
    }

    /// Bind the types and array sizes of struct or block members. Member names are not
    /// variables.
    fn members(&mut self, declarations: &mut [Node]) -> Result<()> {
        for declaration in declarations {
            match &mut declaration.kind {
                NodeKind::StructDeclaration {
                    specified_type,
                    declarations,
                    ..
                } => {
                    self.node(specified_type)?;

                    for member in declarations {
                        if let NodeKind::QuantifiedIdentifier { quantifier, .. } = &mut member.kind
                        {
                            self.nodes(quantifier)?;
                        }
                    }
                }
                _ => return Err(Error::InvalidDeclarator(declaration.tag())),
            }
        }

        Ok(())
    }

    /// Bind the return type of a prototype and register it with `register`. Returns the
    /// function name.
    fn prototype_signature(
        &mut self,
        prototype: &mut Node,
        register: impl FnOnce(&mut ScopeTree, &str, FunctionSignature, &mut Reporter) -> Result<()>,
    ) -> Result<String> {
        let (header, parameters) = match &mut prototype.kind {
            NodeKind::FunctionPrototype {
                header, parameters, ..
            } => (header, parameters),
            _ => return Err(Error::InvalidDeclarator(prototype.tag())),
        };

        let (return_type, name) = match &mut header.kind {
            NodeKind::FunctionHeader {
                return_type, name, ..
            } => (return_type, name),
            _ => return Err(Error::InvalidDeclarator(header.tag())),
        };

        self.node(return_type)?;
        let name = declared_name(name)?.to_owned();

        let parameter_types = parameters
            .iter()
            .map(|parameter| match &parameter.kind {
                NodeKind::ParameterDeclaration {
                    specifier,
                    quantifier,
                    ..
                } => Ok(type_text(specifier, quantifier).into()),
                _ => Err(Error::InvalidDeclarator(parameter.tag())),
            })
            .collect::<Result<Vec<SmolStr>>>()?;

        // `f(void)` declares no parameters
        let parameter_types = match parameter_types.as_slice() {
            [single] if single == "void" => Vec::new(),
            _ => parameter_types,
        };

        let signature = FunctionSignature::new(type_text(return_type, &[]), parameter_types);
        register(&mut self.scopes, &name, signature, &mut self.reporter)?;

        Ok(name)
    }

    /// Declare the parameters of a prototype in the current scope
    fn parameters(&mut self, prototype: &mut Node) -> Result<()> {
        if let NodeKind::FunctionPrototype { parameters, .. } = &mut prototype.kind {
            for parameter in parameters {
                if let NodeKind::ParameterDeclaration {
                    qualifiers,
                    specifier,
                    identifier,
                    quantifier,
                } = &mut parameter.kind
                {
                    self.nodes(qualifiers)?;
                    self.node(specifier)?;
                    self.nodes(quantifier)?;

                    if let Some(identifier) = identifier {
                        self.create_binding(identifier)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Classify a call as a constructor, user function call or built-in function call
    fn call(&mut self, node: &mut Node) -> Result<()> {
        let site = Site::of(node);

        let (callee, args) = match &mut node.kind {
            NodeKind::FunctionCall {
                identifier, args, ..
            } => (identifier, args),
            _ => return self.children(node),
        };

        let function_name = match &callee.kind {
            NodeKind::TypeSpecifier {
                specifier,
                quantifier,
            } if quantifier.is_empty() => match &specifier.kind {
                NodeKind::TypeName { identifier } => Some((identifier.clone(), specifier.id)),
                _ => None,
            },
            NodeKind::Identifier { identifier } => Some((identifier.clone(), callee.id)),
            _ => None,
        };

        match function_name {
            Some((identifier, type_name_id)) => {
                let name = identifier.text.clone();

                if self.scopes.lookup_type(self.current, &name).is_some() {
                    debug!("{} is a constructor call", name);
                    let type_site = Site {
                        id: type_name_id,
                        span: callee.span,
                    };
                    self.scopes
                        .reference_type(self.current, &name, type_site, &mut self.reporter)?;
                } else {
                    let count = argument_count(args);

                    if self.scopes.lookup_function(&name).is_some()
                        || !is_builtin_glsl_function(&name)
                    {
                        self.scopes.reference_function_call(
                            &name,
                            count,
                            site,
                            &mut self.reporter,
                        )?;
                    } else {
                        debug!("{} is a built-in function call", name);
                    }

                    if let NodeKind::TypeSpecifier { .. } = callee.kind {
                        **callee = self.retag_callee(identifier, callee);
                    }
                }
            }
            None => self.node(callee)?,
        }

        self.nodes(args)
    }

    /// Build the identifier that replaces a type specifier callee
    fn retag_callee(&mut self, identifier: Token, callee: &Node) -> Node {
        Node {
            id: self.fresh_id(),
            kind: NodeKind::Identifier { identifier },
            span: callee.span,
        }
    }
}
