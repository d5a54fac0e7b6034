//! Type, declaration and function grammar

use crate::lexer::{is_precision_qualifier, KeywordClass, TokenKind};
use crate::syntax::{Node, NodeKind};

use super::grammar::{PResult, Parser, Rule};

/// `true` if a declarator list with this type may declare no names (`struct S { ... };`)
fn allows_bare_type(specified_type: &Node) -> bool {
    if let NodeKind::FullySpecifiedType { specifier, .. } = &specified_type.kind {
        if let NodeKind::TypeSpecifier { specifier, .. } = &specifier.kind {
            return matches!(
                specifier.kind,
                NodeKind::Keyword { .. } | NodeKind::Struct { .. }
            );
        }
    }

    false
}

impl Parser<'_> {
    /// Preprocessor line, function definition or declaration
    pub fn external_declaration(&mut self, start: usize) -> PResult<Node> {
        if self.kind(start) == TokenKind::Preprocessor {
            return self.preprocessor(start);
        }

        if let Some(definition) = self.function_definition(start) {
            return Some(definition);
        }

        self.declaration_statement(start)
    }

    fn function_definition(&mut self, start: usize) -> PResult<Node> {
        let (pos, prototype) = self.function_prototype(start)?;
        let (next, body) = self.compound_statement(pos)?;

        Some((
            next,
            self.node(start, next, NodeKind::Function {
                prototype: Box::new(prototype),
                body: Box::new(body),
            }),
        ))
    }

    pub fn declaration_statement(&mut self, start: usize) -> PResult<Node> {
        let (pos, declaration) = self.declaration(start)?;
        let (next, semi) = self.punct(pos, ";")?;

        Some((
            next,
            self.node(start, next, NodeKind::DeclarationStatement {
                declaration: Box::new(declaration),
                semi,
            }),
        ))
    }

    fn declaration(&mut self, pos: usize) -> PResult<Node> {
        self.memo(pos, Rule::Declaration, |p, start| {
            if let Some(prototype) = p.function_prototype(start) {
                return Some(prototype);
            }

            if let Some(block) = p.interface_declarator(start) {
                return Some(block);
            }

            if let Some(precision) = p.precision(start) {
                return Some(precision);
            }

            if let Some(list) = p.declarator_list(start) {
                return Some(list);
            }

            p.qualifier_declarator(start)
        })
    }

    fn function_prototype(&mut self, pos: usize) -> PResult<Node> {
        self.memo(pos, Rule::FunctionPrototype, |p, start| {
            let (pos, header) = p.function_header(start)?;
            let (pos, parameters, commas) =
                match p.separated(pos, Self::parameter_declaration) {
                    Some((next, (parameters, commas))) => (next, parameters, commas),
                    None => (pos, Vec::new(), Vec::new()),
                };
            let (next, rp) = p.punct(pos, ")")?;

            Some((
                next,
                p.node(start, next, NodeKind::FunctionPrototype {
                    header: Box::new(header),
                    parameters,
                    commas,
                    rp,
                }),
            ))
        })
    }

    fn function_header(&mut self, start: usize) -> PResult<Node> {
        let (pos, return_type) = self.fully_specified_type(start)?;
        let (pos, name) = self.identifier(pos)?;
        let (next, lp) = self.punct(pos, "(")?;

        Some((
            next,
            self.node(start, next, NodeKind::FunctionHeader {
                return_type: Box::new(return_type),
                name: Box::new(name),
                lp,
            }),
        ))
    }

    fn parameter_declaration(&mut self, start: usize) -> PResult<Node> {
        let (pos, qualifiers) = self.many(start, Self::type_qualifier);
        let (pos, specifier) = self.type_specifier(pos)?;

        let (next, identifier, quantifier) = match self.identifier(pos) {
            Some((pos, identifier)) => {
                let (next, quantifier) = self.many(pos, Self::array_specifier);
                (next, Some(Box::new(identifier)), quantifier)
            }
            None => (pos, None, Vec::new()),
        };

        Some((
            next,
            self.node(start, next, NodeKind::ParameterDeclaration {
                qualifiers,
                specifier: Box::new(specifier),
                identifier,
                quantifier,
            }),
        ))
    }

    /// `uniform Block { ... } instance[2]`
    fn interface_declarator(&mut self, start: usize) -> PResult<Node> {
        let (pos, qualifiers) = self.many(start, Self::type_qualifier);
        if qualifiers.is_empty() {
            return None;
        }

        let (pos, interface_type) = self.identifier_token(pos)?;
        let (pos, lb) = self.punct(pos, "{")?;
        let (pos, declarations) = self.many(pos, Self::struct_declaration);
        let (pos, rb) = self.punct(pos, "}")?;
        let (next, identifier) = self.optional(pos, Self::quantified_identifier);

        Some((
            next,
            self.node(start, next, NodeKind::InterfaceDeclarator {
                qualifiers,
                interface_type,
                lb,
                declarations,
                rb,
                identifier,
            }),
        ))
    }

    /// `precision highp float`
    fn precision(&mut self, start: usize) -> PResult<Node> {
        let (pos, prefix) = self.keyword(start, "precision")?;

        if !(self.kind(pos) == TokenKind::Keyword(KeywordClass::Qualifier)
            && is_precision_qualifier(self.text(pos)))
        {
            return self.fail(pos, "precision qualifier");
        }

        let token = self.token(pos);
        let qualifier = self.node(pos, pos + 1, NodeKind::Keyword { token });
        let (next, specifier) = self.type_specifier(pos + 1)?;

        Some((
            next,
            self.node(start, next, NodeKind::Precision {
                prefix,
                qualifier: Box::new(qualifier),
                specifier: Box::new(specifier),
            }),
        ))
    }

    fn declarator_list(&mut self, start: usize) -> PResult<Node> {
        let (pos, specified_type) = self.fully_specified_type(start)?;

        let (next, declarations, commas) = match self.separated(pos, Self::declarator) {
            Some((next, (declarations, commas))) => (next, declarations, commas),
            None if allows_bare_type(&specified_type) => (pos, Vec::new(), Vec::new()),
            None => return None,
        };

        Some((
            next,
            self.node(start, next, NodeKind::DeclaratorList {
                specified_type: Box::new(specified_type),
                declarations,
                commas,
            }),
        ))
    }

    /// `name[2] = value`
    fn declarator(&mut self, start: usize) -> PResult<Node> {
        let (pos, identifier) = self.identifier(start)?;
        let (pos, quantifier) = self.many(pos, Self::array_specifier);

        let (next, equal, initializer) = match self.punct(pos, "=") {
            Some((after_equal, equal)) => {
                let (next, initializer) = self.initializer(after_equal)?;
                (next, Some(equal), Some(Box::new(initializer)))
            }
            None => (pos, None, None),
        };

        Some((
            next,
            self.node(start, next, NodeKind::Declaration {
                identifier: Box::new(identifier),
                quantifier,
                equal,
                initializer,
            }),
        ))
    }

    /// `invariant gl_Position`, `layout(local_size_x = 8) in`
    fn qualifier_declarator(&mut self, start: usize) -> PResult<Node> {
        let (pos, qualifiers) = self.many(start, Self::type_qualifier);
        if qualifiers.is_empty() {
            return None;
        }

        let (next, identifiers, commas) = match self.separated(pos, Self::identifier) {
            Some((next, (identifiers, commas))) => (next, identifiers, commas),
            None => (pos, Vec::new(), Vec::new()),
        };

        Some((
            next,
            self.node(start, next, NodeKind::QualifierDeclarator {
                qualifiers,
                identifiers,
                commas,
            }),
        ))
    }

    pub fn initializer(&mut self, start: usize) -> PResult<Node> {
        if let Some(list) = self.initializer_list(start) {
            return Some(list);
        }

        self.assignment(start)
    }

    fn initializer_list(&mut self, start: usize) -> PResult<Node> {
        let (pos, lb) = self.punct(start, "{")?;
        let (pos, (initializers, mut commas)) = self.separated(pos, Self::initializer)?;

        let pos = match self.punct(pos, ",") {
            Some((next, comma)) => {
                commas.push(comma);
                next
            }
            None => pos,
        };

        let (next, rb) = self.punct(pos, "}")?;

        Some((
            next,
            self.node(start, next, NodeKind::InitializerList {
                lb,
                initializers,
                commas,
                rb,
            }),
        ))
    }

    pub fn fully_specified_type(&mut self, pos: usize) -> PResult<Node> {
        self.memo(pos, Rule::FullySpecifiedType, |p, start| {
            let (pos, qualifiers) = p.many(start, Self::type_qualifier);
            let (next, specifier) = p.type_specifier(pos)?;

            Some((
                next,
                p.node(start, next, NodeKind::FullySpecifiedType {
                    qualifiers,
                    specifier: Box::new(specifier),
                }),
            ))
        })
    }

    fn type_qualifier(&mut self, start: usize) -> PResult<Node> {
        if let Some(layout) = self.layout_qualifier(start) {
            return Some(layout);
        }

        self.keyword_of_class(start, KeywordClass::Qualifier)
    }

    fn layout_qualifier(&mut self, start: usize) -> PResult<Node> {
        let (pos, layout) = self.keyword(start, "layout")?;
        let (pos, lp) = self.punct(pos, "(")?;
        let (pos, (qualifiers, commas)) = self.separated(pos, Self::layout_qualifier_id)?;
        let (next, rp) = self.punct(pos, ")")?;

        Some((
            next,
            self.node(start, next, NodeKind::LayoutQualifier {
                layout,
                lp,
                qualifiers,
                commas,
                rp,
            }),
        ))
    }

    /// `std140`, `binding = 2`, `shared`
    fn layout_qualifier_id(&mut self, start: usize) -> PResult<Node> {
        let (pos, identifier) = if self.is_keyword(start, "shared") {
            (start + 1, self.token(start))
        } else {
            self.identifier_token(start)?
        };

        let (next, equal, expression) = match self.punct(pos, "=") {
            Some((after_equal, equal)) => {
                let (next, expression) = self.ternary(after_equal)?;
                (next, Some(equal), Some(Box::new(expression)))
            }
            None => (pos, None, None),
        };

        Some((
            next,
            self.node(start, next, NodeKind::LayoutQualifierId {
                identifier,
                equal,
                expression,
            }),
        ))
    }

    /// Built-in type, user type name or struct specifier, with optional array dimensions
    pub fn type_specifier(&mut self, pos: usize) -> PResult<Node> {
        self.memo(pos, Rule::TypeSpecifier, |p, start| {
            let (pos, specifier) = match p.kind(start) {
                TokenKind::Keyword(KeywordClass::Type) => {
                    p.keyword_of_class(start, KeywordClass::Type)?
                }
                TokenKind::Identifier => p.type_name(start)?,
                _ if p.is_keyword(start, "struct") => p.struct_specifier(start)?,
                _ => {
                    p.fail::<()>(start, "\"struct\"");
                    return p.fail(start, "type specifier");
                }
            };

            let (next, quantifier) = p.many(pos, Self::array_specifier);

            Some((
                next,
                p.node(start, next, NodeKind::TypeSpecifier {
                    specifier: Box::new(specifier),
                    quantifier,
                }),
            ))
        })
    }

    fn struct_specifier(&mut self, start: usize) -> PResult<Node> {
        let (pos, keyword) = self.keyword(start, "struct")?;
        let (pos, type_name) = self.optional(pos, Self::type_name);
        let (pos, lb) = self.punct(pos, "{")?;
        let (pos, declarations) = self.many(pos, Self::struct_declaration);
        let (next, rb) = self.punct(pos, "}")?;

        Some((
            next,
            self.node(start, next, NodeKind::Struct {
                keyword,
                type_name,
                lb,
                declarations,
                rb,
            }),
        ))
    }

    /// Member declaration of a struct or interface block
    fn struct_declaration(&mut self, start: usize) -> PResult<Node> {
        let (pos, specified_type) = self.fully_specified_type(start)?;
        let (pos, (declarations, commas)) = self.separated(pos, Self::quantified_identifier)?;
        let (next, semi) = self.punct(pos, ";")?;

        Some((
            next,
            self.node(start, next, NodeKind::StructDeclaration {
                specified_type: Box::new(specified_type),
                declarations,
                commas,
                semi,
            }),
        ))
    }

    fn quantified_identifier(&mut self, start: usize) -> PResult<Node> {
        let (pos, identifier) = self.identifier(start)?;
        let (next, quantifier) = self.many(pos, Self::array_specifier);

        Some((
            next,
            self.node(start, next, NodeKind::QuantifiedIdentifier {
                identifier: Box::new(identifier),
                quantifier,
            }),
        ))
    }
}
