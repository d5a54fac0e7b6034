//! Syntax tree definitions
//!
//! The tree is lossless: every terminal carries the trivia that followed it in the source, so
//! [crate::generate] can reproduce the input byte for byte. Each [NodeKind] variant corresponds to
//! one grammar production, and its fields are listed in source order.

use smol_str::SmolStr;

use crate::location::Span;

/// A terminal: its text and the whitespace/comments following it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Token {
    pub text: SmolStr,
    pub trivia: SmolStr,
}

impl Token {
    /// Create a token with no trailing trivia
    pub fn new(text: impl Into<SmolStr>) -> Self {
        Self {
            text: text.into(),
            trivia: SmolStr::default(),
        }
    }

    /// Create a token followed by the given trivia
    pub fn with_trivia(text: impl Into<SmolStr>, trivia: impl Into<SmolStr>) -> Self {
        Self {
            text: text.into(),
            trivia: trivia.into(),
        }
    }

    /// Text of this token, trivia excluded
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }
}

/// Identity of a node produced by the parser.
///
/// Scope registries refer to nodes by id. Nodes built by hand get [NodeId::DETACHED].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Id of nodes that were not produced by the parser
    pub const DETACHED: NodeId = NodeId(0);

    /// `true` if this node was not produced by the parser
    pub fn is_detached(self) -> bool {
        self == Self::DETACHED
    }
}

/// A syntax tree node
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Source range, when parsed with `include_location`
    pub span: Option<Span>,
}

// Identity and location are not part of a node's content
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Node {
    /// Create a detached node
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::DETACHED,
            kind,
            span: None,
        }
    }

    /// Kind tag of this node
    pub fn tag(&self) -> NodeTag {
        self.kind.tag()
    }

    /// Direct children of this node, in source order
    pub fn children(&self) -> Vec<&Node> {
        let mut children = Vec::new();
        for slot in self.kind.slots() {
            match slot {
                Slot::Required(node) => children.push(node),
                Slot::Optional(node) => children.extend(node),
                Slot::List(nodes) => children.extend(nodes.iter()),
            }
        }
        children
    }

    /// Name carried by an identifier-like leaf ([NodeKind::Identifier], [NodeKind::TypeName],
    /// [NodeKind::Keyword])
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier { identifier } | NodeKind::TypeName { identifier } => {
                Some(identifier.as_str())
            }
            NodeKind::Keyword { token } => Some(token.as_str()),
            _ => None,
        }
    }
}

/// Syntax tree node contents, one variant per grammar production
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Translation unit
    Program {
        /// Trivia before the first token
        whitespace: SmolStr,
        program: Vec<Node>,
    },
    /// Opaque preprocessor line, from `#` to the end of the line
    Preprocessor { line: Token },
    /// Built-in type name or qualifier keyword
    Keyword { token: Token },
    Identifier { identifier: Token },
    /// User type name in type position
    TypeName { identifier: Token },
    /// Numeric or boolean constant, suffix included
    Literal { literal: Token },

    /// Parenthesized expression
    Group {
        lp: Token,
        expression: Box<Node>,
        rp: Token,
    },
    Binary {
        left: Box<Node>,
        operator: Token,
        right: Box<Node>,
    },
    /// Prefix operator application
    Unary {
        operator: Token,
        expression: Box<Node>,
    },
    /// Expression followed by one suffix ([NodeKind::ArraySpecifier],
    /// [NodeKind::FieldSelection] or [NodeKind::PostfixOperator])
    Postfix {
        expression: Box<Node>,
        postfix: Box<Node>,
    },
    /// `.name` suffix (fields, swizzles, methods)
    FieldSelection { dot: Token, selection: Token },
    /// `[expr]`, used for array dimensions and indexing
    ArraySpecifier {
        lb: Token,
        expression: Option<Box<Node>>,
        rb: Token,
    },
    /// `++` or `--` suffix
    PostfixOperator { operator: Token },
    /// Function call or constructor
    ///
    /// `identifier` is a [NodeKind::TypeSpecifier] for constructors (and for calls before they are
    /// resolved), an [NodeKind::Identifier] for function calls, or a [NodeKind::Postfix] chain for
    /// method calls.
    FunctionCall {
        identifier: Box<Node>,
        lp: Token,
        args: Vec<Node>,
        commas: Vec<Token>,
        rp: Token,
    },
    Ternary {
        condition: Box<Node>,
        question: Token,
        expression: Box<Node>,
        colon: Token,
        alternate: Box<Node>,
    },
    Assignment {
        left: Box<Node>,
        operator: Token,
        right: Box<Node>,
    },
    /// Comma-separated expression list
    Sequence {
        expressions: Vec<Node>,
        commas: Vec<Token>,
    },
    /// `{ a, b, }` initializer; `commas` may hold a trailing comma
    InitializerList {
        lb: Token,
        initializers: Vec<Node>,
        commas: Vec<Token>,
        rb: Token,
    },

    TypeSpecifier {
        /// [NodeKind::Keyword], [NodeKind::TypeName] or [NodeKind::Struct]
        specifier: Box<Node>,
        /// Array dimensions
        quantifier: Vec<Node>,
    },
    FullySpecifiedType {
        qualifiers: Vec<Node>,
        specifier: Box<Node>,
    },
    LayoutQualifier {
        layout: Token,
        lp: Token,
        qualifiers: Vec<Node>,
        commas: Vec<Token>,
        rp: Token,
    },
    /// `name` or `name = value` inside a layout qualifier
    LayoutQualifierId {
        identifier: Token,
        equal: Option<Token>,
        expression: Option<Box<Node>>,
    },
    Struct {
        keyword: Token,
        type_name: Option<Box<Node>>,
        lb: Token,
        declarations: Vec<Node>,
        rb: Token,
    },
    /// Member declaration inside a struct or interface block
    StructDeclaration {
        specified_type: Box<Node>,
        declarations: Vec<Node>,
        commas: Vec<Token>,
        semi: Token,
    },
    /// Identifier with optional array dimensions
    QuantifiedIdentifier {
        identifier: Box<Node>,
        quantifier: Vec<Node>,
    },

    DeclarationStatement {
        declaration: Box<Node>,
        semi: Token,
    },
    DeclaratorList {
        specified_type: Box<Node>,
        declarations: Vec<Node>,
        commas: Vec<Token>,
    },
    /// One declarator of a [NodeKind::DeclaratorList]
    Declaration {
        identifier: Box<Node>,
        quantifier: Vec<Node>,
        equal: Option<Token>,
        initializer: Option<Box<Node>>,
    },
    /// `precision highp float`
    Precision {
        prefix: Token,
        qualifier: Box<Node>,
        specifier: Box<Node>,
    },
    /// Interface block, `uniform Block { ... } instance`
    InterfaceDeclarator {
        qualifiers: Vec<Node>,
        interface_type: Token,
        lb: Token,
        declarations: Vec<Node>,
        rb: Token,
        identifier: Option<Box<Node>>,
    },
    /// Qualifiers applied to existing names, or alone (`layout(...) in`)
    QualifierDeclarator {
        qualifiers: Vec<Node>,
        identifiers: Vec<Node>,
        commas: Vec<Token>,
    },

    FunctionPrototype {
        header: Box<Node>,
        parameters: Vec<Node>,
        commas: Vec<Token>,
        rp: Token,
    },
    FunctionHeader {
        return_type: Box<Node>,
        name: Box<Node>,
        lp: Token,
    },
    ParameterDeclaration {
        qualifiers: Vec<Node>,
        specifier: Box<Node>,
        identifier: Option<Box<Node>>,
        quantifier: Vec<Node>,
    },
    /// Function definition
    Function {
        prototype: Box<Node>,
        body: Box<Node>,
    },

    CompoundStatement {
        lb: Token,
        statements: Vec<Node>,
        rb: Token,
    },
    ExpressionStatement {
        expression: Option<Box<Node>>,
        semi: Token,
    },
    IfStatement {
        keyword: Token,
        lp: Token,
        condition: Box<Node>,
        rp: Token,
        body: Box<Node>,
        else_keyword: Option<Token>,
        alternate: Option<Box<Node>>,
    },
    SwitchStatement {
        keyword: Token,
        lp: Token,
        expression: Box<Node>,
        rp: Token,
        lb: Token,
        cases: Vec<Node>,
        rb: Token,
    },
    /// `case x:` or `default:` with the statements it labels
    SwitchCase {
        keyword: Token,
        test: Option<Box<Node>>,
        colon: Token,
        statements: Vec<Node>,
    },
    WhileStatement {
        keyword: Token,
        lp: Token,
        condition: Box<Node>,
        rp: Token,
        body: Box<Node>,
    },
    DoStatement {
        do_keyword: Token,
        body: Box<Node>,
        while_keyword: Token,
        lp: Token,
        expression: Box<Node>,
        rp: Token,
        semi: Token,
    },
    ForStatement {
        keyword: Token,
        lp: Token,
        /// Declaration or expression statement, semicolon included
        init: Box<Node>,
        condition: Option<Box<Node>>,
        condition_semi: Token,
        operation: Option<Box<Node>>,
        rp: Token,
        body: Box<Node>,
    },
    /// Declaration used as a loop or selection condition, `bool b = f()`
    ConditionExpression {
        specified_type: Box<Node>,
        identifier: Box<Node>,
        equal: Token,
        initializer: Box<Node>,
    },
    ReturnStatement {
        keyword: Token,
        expression: Option<Box<Node>>,
        semi: Token,
    },
    /// `break`, `continue` or `discard`
    JumpStatement { keyword: Token, semi: Token },
}

/// Discriminant of a [NodeKind], used for visitor dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeTag {
    Program,
    Preprocessor,
    Keyword,
    Identifier,
    TypeName,
    Literal,
    Group,
    Binary,
    Unary,
    Postfix,
    FieldSelection,
    ArraySpecifier,
    PostfixOperator,
    FunctionCall,
    Ternary,
    Assignment,
    Sequence,
    InitializerList,
    TypeSpecifier,
    FullySpecifiedType,
    LayoutQualifier,
    LayoutQualifierId,
    Struct,
    StructDeclaration,
    QuantifiedIdentifier,
    DeclarationStatement,
    DeclaratorList,
    Declaration,
    Precision,
    InterfaceDeclarator,
    QualifierDeclarator,
    FunctionPrototype,
    FunctionHeader,
    ParameterDeclaration,
    Function,
    CompoundStatement,
    ExpressionStatement,
    IfStatement,
    SwitchStatement,
    SwitchCase,
    WhileStatement,
    DoStatement,
    ForStatement,
    ConditionExpression,
    ReturnStatement,
    JumpStatement,
}

/// A child position of a node
#[derive(Debug, Clone, Copy)]
pub enum Slot<'a> {
    /// A child that must be present
    Required(&'a Node),
    /// A nullable child
    Optional(Option<&'a Node>),
    /// An ordered sequence of children
    List(&'a [Node]),
}

/// Mutable version of [Slot]
#[derive(Debug)]
pub enum SlotMut<'a> {
    Required(&'a mut Node),
    Optional(&'a mut Option<Box<Node>>),
    List(&'a mut Vec<Node>),
    /// A [Slot::List] and its separators, the separator at `i` following the node at `i`
    Separated(&'a mut Vec<Node>, &'a mut Vec<Token>),
}

fn req(node: &Node) -> Slot<'_> {
    Slot::Required(node)
}

fn opt(node: &Option<Box<Node>>) -> Slot<'_> {
    Slot::Optional(node.as_deref())
}

fn list(nodes: &[Node]) -> Slot<'_> {
    Slot::List(nodes)
}

impl NodeKind {
    /// Kind tag of this node
    pub fn tag(&self) -> NodeTag {
        match self {
            Self::Program { .. } => NodeTag::Program,
            Self::Preprocessor { .. } => NodeTag::Preprocessor,
            Self::Keyword { .. } => NodeTag::Keyword,
            Self::Identifier { .. } => NodeTag::Identifier,
            Self::TypeName { .. } => NodeTag::TypeName,
            Self::Literal { .. } => NodeTag::Literal,
            Self::Group { .. } => NodeTag::Group,
            Self::Binary { .. } => NodeTag::Binary,
            Self::Unary { .. } => NodeTag::Unary,
            Self::Postfix { .. } => NodeTag::Postfix,
            Self::FieldSelection { .. } => NodeTag::FieldSelection,
            Self::ArraySpecifier { .. } => NodeTag::ArraySpecifier,
            Self::PostfixOperator { .. } => NodeTag::PostfixOperator,
            Self::FunctionCall { .. } => NodeTag::FunctionCall,
            Self::Ternary { .. } => NodeTag::Ternary,
            Self::Assignment { .. } => NodeTag::Assignment,
            Self::Sequence { .. } => NodeTag::Sequence,
            Self::InitializerList { .. } => NodeTag::InitializerList,
            Self::TypeSpecifier { .. } => NodeTag::TypeSpecifier,
            Self::FullySpecifiedType { .. } => NodeTag::FullySpecifiedType,
            Self::LayoutQualifier { .. } => NodeTag::LayoutQualifier,
            Self::LayoutQualifierId { .. } => NodeTag::LayoutQualifierId,
            Self::Struct { .. } => NodeTag::Struct,
            Self::StructDeclaration { .. } => NodeTag::StructDeclaration,
            Self::QuantifiedIdentifier { .. } => NodeTag::QuantifiedIdentifier,
            Self::DeclarationStatement { .. } => NodeTag::DeclarationStatement,
            Self::DeclaratorList { .. } => NodeTag::DeclaratorList,
            Self::Declaration { .. } => NodeTag::Declaration,
            Self::Precision { .. } => NodeTag::Precision,
            Self::InterfaceDeclarator { .. } => NodeTag::InterfaceDeclarator,
            Self::QualifierDeclarator { .. } => NodeTag::QualifierDeclarator,
            Self::FunctionPrototype { .. } => NodeTag::FunctionPrototype,
            Self::FunctionHeader { .. } => NodeTag::FunctionHeader,
            Self::ParameterDeclaration { .. } => NodeTag::ParameterDeclaration,
            Self::Function { .. } => NodeTag::Function,
            Self::CompoundStatement { .. } => NodeTag::CompoundStatement,
            Self::ExpressionStatement { .. } => NodeTag::ExpressionStatement,
            Self::IfStatement { .. } => NodeTag::IfStatement,
            Self::SwitchStatement { .. } => NodeTag::SwitchStatement,
            Self::SwitchCase { .. } => NodeTag::SwitchCase,
            Self::WhileStatement { .. } => NodeTag::WhileStatement,
            Self::DoStatement { .. } => NodeTag::DoStatement,
            Self::ForStatement { .. } => NodeTag::ForStatement,
            Self::ConditionExpression { .. } => NodeTag::ConditionExpression,
            Self::ReturnStatement { .. } => NodeTag::ReturnStatement,
            Self::JumpStatement { .. } => NodeTag::JumpStatement,
        }
    }

    /// Child slots of this node, in source order
    pub fn slots(&self) -> Vec<Slot<'_>> {
        match self {
            Self::Program { program, .. } => vec![list(program)],
            Self::Preprocessor { .. }
            | Self::Keyword { .. }
            | Self::Identifier { .. }
            | Self::TypeName { .. }
            | Self::Literal { .. }
            | Self::FieldSelection { .. }
            | Self::PostfixOperator { .. }
            | Self::JumpStatement { .. } => vec![],
            Self::Group { expression, .. } => vec![req(expression)],
            Self::Binary { left, right, .. } | Self::Assignment { left, right, .. } => {
                vec![req(left), req(right)]
            }
            Self::Unary { expression, .. } => vec![req(expression)],
            Self::Postfix {
                expression,
                postfix,
            } => vec![req(expression), req(postfix)],
            Self::ArraySpecifier { expression, .. } => vec![opt(expression)],
            Self::FunctionCall {
                identifier, args, ..
            } => vec![req(identifier), list(args)],
            Self::Ternary {
                condition,
                expression,
                alternate,
                ..
            } => vec![req(condition), req(expression), req(alternate)],
            Self::Sequence { expressions, .. } => vec![list(expressions)],
            Self::InitializerList { initializers, .. } => vec![list(initializers)],
            Self::TypeSpecifier {
                specifier,
                quantifier,
            } => vec![req(specifier), list(quantifier)],
            Self::FullySpecifiedType {
                qualifiers,
                specifier,
            } => vec![list(qualifiers), req(specifier)],
            Self::LayoutQualifier { qualifiers, .. } => vec![list(qualifiers)],
            Self::LayoutQualifierId { expression, .. } => vec![opt(expression)],
            Self::Struct {
                type_name,
                declarations,
                ..
            } => vec![opt(type_name), list(declarations)],
            Self::StructDeclaration {
                specified_type,
                declarations,
                ..
            } => vec![req(specified_type), list(declarations)],
            Self::QuantifiedIdentifier {
                identifier,
                quantifier,
            } => vec![req(identifier), list(quantifier)],
            Self::DeclarationStatement { declaration, .. } => vec![req(declaration)],
            Self::DeclaratorList {
                specified_type,
                declarations,
                ..
            } => vec![req(specified_type), list(declarations)],
            Self::Declaration {
                identifier,
                quantifier,
                initializer,
                ..
            } => vec![req(identifier), list(quantifier), opt(initializer)],
            Self::Precision {
                qualifier,
                specifier,
                ..
            } => vec![req(qualifier), req(specifier)],
            Self::InterfaceDeclarator {
                qualifiers,
                declarations,
                identifier,
                ..
            } => vec![list(qualifiers), list(declarations), opt(identifier)],
            Self::QualifierDeclarator {
                qualifiers,
                identifiers,
                ..
            } => vec![list(qualifiers), list(identifiers)],
            Self::FunctionPrototype {
                header, parameters, ..
            } => vec![req(header), list(parameters)],
            Self::FunctionHeader {
                return_type, name, ..
            } => vec![req(return_type), req(name)],
            Self::ParameterDeclaration {
                qualifiers,
                specifier,
                identifier,
                quantifier,
            } => vec![
                list(qualifiers),
                req(specifier),
                opt(identifier),
                list(quantifier),
            ],
            Self::Function { prototype, body } => vec![req(prototype), req(body)],
            Self::CompoundStatement { statements, .. } => vec![list(statements)],
            Self::ExpressionStatement { expression, .. } => vec![opt(expression)],
            Self::IfStatement {
                condition,
                body,
                alternate,
                ..
            } => vec![req(condition), req(body), opt(alternate)],
            Self::SwitchStatement {
                expression, cases, ..
            } => vec![req(expression), list(cases)],
            Self::SwitchCase {
                test, statements, ..
            } => vec![opt(test), list(statements)],
            Self::WhileStatement {
                condition, body, ..
            } => vec![req(condition), req(body)],
            Self::DoStatement {
                body, expression, ..
            } => vec![req(body), req(expression)],
            Self::ForStatement {
                init,
                condition,
                operation,
                body,
                ..
            } => vec![req(init), opt(condition), opt(operation), req(body)],
            Self::ConditionExpression {
                specified_type,
                identifier,
                initializer,
                ..
            } => vec![req(specified_type), req(identifier), req(initializer)],
            Self::ReturnStatement { expression, .. } => vec![opt(expression)],
        }
    }

    /// Mutable child slots of this node, in the same order as [NodeKind::slots]
    pub fn slots_mut(&mut self) -> Vec<SlotMut<'_>> {
        use SlotMut::{List, Optional, Required, Separated};

        match self {
            Self::Program { program, .. } => vec![List(program)],
            Self::Preprocessor { .. }
            | Self::Keyword { .. }
            | Self::Identifier { .. }
            | Self::TypeName { .. }
            | Self::Literal { .. }
            | Self::FieldSelection { .. }
            | Self::PostfixOperator { .. }
            | Self::JumpStatement { .. } => vec![],
            Self::Group { expression, .. } => vec![Required(expression)],
            Self::Binary { left, right, .. } | Self::Assignment { left, right, .. } => {
                vec![Required(left), Required(right)]
            }
            Self::Unary { expression, .. } => vec![Required(expression)],
            Self::Postfix {
                expression,
                postfix,
            } => vec![Required(expression), Required(postfix)],
            Self::ArraySpecifier { expression, .. } => vec![Optional(expression)],
            Self::FunctionCall {
                identifier,
                args,
                commas,
                ..
            } => vec![Required(identifier), Separated(args, commas)],
            Self::Ternary {
                condition,
                expression,
                alternate,
                ..
            } => vec![
                Required(condition),
                Required(expression),
                Required(alternate),
            ],
            Self::Sequence {
                expressions,
                commas,
            } => vec![Separated(expressions, commas)],
            Self::InitializerList {
                initializers,
                commas,
                ..
            } => vec![Separated(initializers, commas)],
            Self::TypeSpecifier {
                specifier,
                quantifier,
            } => vec![Required(specifier), List(quantifier)],
            Self::FullySpecifiedType {
                qualifiers,
                specifier,
            } => vec![List(qualifiers), Required(specifier)],
            Self::LayoutQualifier {
                qualifiers, commas, ..
            } => vec![Separated(qualifiers, commas)],
            Self::LayoutQualifierId { expression, .. } => vec![Optional(expression)],
            Self::Struct {
                type_name,
                declarations,
                ..
            } => vec![Optional(type_name), List(declarations)],
            Self::StructDeclaration {
                specified_type,
                declarations,
                commas,
                ..
            } => vec![Required(specified_type), Separated(declarations, commas)],
            Self::QuantifiedIdentifier {
                identifier,
                quantifier,
            } => vec![Required(identifier), List(quantifier)],
            Self::DeclarationStatement { declaration, .. } => vec![Required(declaration)],
            Self::DeclaratorList {
                specified_type,
                declarations,
                commas,
            } => vec![Required(specified_type), Separated(declarations, commas)],
            Self::Declaration {
                identifier,
                quantifier,
                initializer,
                ..
            } => vec![
                Required(identifier),
                List(quantifier),
                Optional(initializer),
            ],
            Self::Precision {
                qualifier,
                specifier,
                ..
            } => vec![Required(qualifier), Required(specifier)],
            Self::InterfaceDeclarator {
                qualifiers,
                declarations,
                identifier,
                ..
            } => vec![List(qualifiers), List(declarations), Optional(identifier)],
            Self::QualifierDeclarator {
                qualifiers,
                identifiers,
                commas,
            } => vec![List(qualifiers), Separated(identifiers, commas)],
            Self::FunctionPrototype {
                header,
                parameters,
                commas,
                ..
            } => vec![Required(header), Separated(parameters, commas)],
            Self::FunctionHeader {
                return_type, name, ..
            } => vec![Required(return_type), Required(name)],
            Self::ParameterDeclaration {
                qualifiers,
                specifier,
                identifier,
                quantifier,
            } => vec![
                List(qualifiers),
                Required(specifier),
                Optional(identifier),
                List(quantifier),
            ],
            Self::Function { prototype, body } => vec![Required(prototype), Required(body)],
            Self::CompoundStatement { statements, .. } => vec![List(statements)],
            Self::ExpressionStatement { expression, .. } => vec![Optional(expression)],
            Self::IfStatement {
                condition,
                body,
                alternate,
                ..
            } => vec![Required(condition), Required(body), Optional(alternate)],
            Self::SwitchStatement {
                expression, cases, ..
            } => vec![Required(expression), List(cases)],
            Self::SwitchCase {
                test, statements, ..
            } => vec![Optional(test), List(statements)],
            Self::WhileStatement {
                condition, body, ..
            } => vec![Required(condition), Required(body)],
            Self::DoStatement {
                body, expression, ..
            } => vec![Required(body), Required(expression)],
            Self::ForStatement {
                init,
                condition,
                operation,
                body,
                ..
            } => vec![
                Required(init),
                Optional(condition),
                Optional(operation),
                Required(body),
            ],
            Self::ConditionExpression {
                specified_type,
                identifier,
                initializer,
                ..
            } => vec![
                Required(specified_type),
                Required(identifier),
                Required(initializer),
            ],
            Self::ReturnStatement { expression, .. } => vec![Optional(expression)],
        }
    }
}
