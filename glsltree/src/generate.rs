//! Source text generation
//!
//! [generate] is the inverse of [crate::parse]: it writes every terminal of the tree followed by
//! its trivia, in the order the grammar produced them.

use crate::syntax::{Node, NodeKind, Token};

/// Generate the source text of a tree
pub fn generate(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn token(out: &mut String, token: &Token) {
    out.push_str(&token.text);
    out.push_str(&token.trivia);
}

fn opt_token(out: &mut String, value: &Option<Token>) {
    if let Some(value) = value {
        token(out, value);
    }
}

fn opt_node(out: &mut String, node: &Option<Box<Node>>) {
    if let Some(node) = node {
        write_node(out, node);
    }
}

fn list(out: &mut String, nodes: &[Node]) {
    for node in nodes {
        write_node(out, node);
    }
}

/// Write `nodes` separated by `commas`. A comma beyond the last separator is written after the
/// last node; missing separators default to `,`.
fn separated(out: &mut String, nodes: &[Node], commas: &[Token]) {
    for (i, node) in nodes.iter().enumerate() {
        write_node(out, node);

        match commas.get(i) {
            Some(comma) => token(out, comma),
            None if i + 1 < nodes.len() => out.push(','),
            None => {}
        }
    }
}

fn write_node(out: &mut String, node: &Node) {
    match &node.kind {
        NodeKind::Program {
            whitespace,
            program,
        } => {
            out.push_str(whitespace);
            list(out, program);
        }
        NodeKind::Preprocessor { line } => token(out, line),
        NodeKind::Keyword { token: t } => token(out, t),
        NodeKind::Identifier { identifier } | NodeKind::TypeName { identifier } => {
            token(out, identifier)
        }
        NodeKind::Literal { literal } => token(out, literal),
        NodeKind::Group { lp, expression, rp } => {
            token(out, lp);
            write_node(out, expression);
            token(out, rp);
        }
        NodeKind::Binary {
            left,
            operator,
            right,
        }
        | NodeKind::Assignment {
            left,
            operator,
            right,
        } => {
            write_node(out, left);
            token(out, operator);
            write_node(out, right);
        }
        NodeKind::Unary {
            operator,
            expression,
        } => {
            token(out, operator);
            write_node(out, expression);
        }
        NodeKind::Postfix {
            expression,
            postfix,
        } => {
            write_node(out, expression);
            write_node(out, postfix);
        }
        NodeKind::FieldSelection { dot, selection } => {
            token(out, dot);
            token(out, selection);
        }
        NodeKind::ArraySpecifier { lb, expression, rb } => {
            token(out, lb);
            opt_node(out, expression);
            token(out, rb);
        }
        NodeKind::PostfixOperator { operator } => token(out, operator),
        NodeKind::FunctionCall {
            identifier,
            lp,
            args,
            commas,
            rp,
        } => {
            write_node(out, identifier);
            token(out, lp);
            separated(out, args, commas);
            token(out, rp);
        }
        NodeKind::Ternary {
            condition,
            question,
            expression,
            colon,
            alternate,
        } => {
            write_node(out, condition);
            token(out, question);
            write_node(out, expression);
            token(out, colon);
            write_node(out, alternate);
        }
        NodeKind::Sequence {
            expressions,
            commas,
        } => separated(out, expressions, commas),
        NodeKind::InitializerList {
            lb,
            initializers,
            commas,
            rb,
        } => {
            token(out, lb);
            separated(out, initializers, commas);
            token(out, rb);
        }
        NodeKind::TypeSpecifier {
            specifier,
            quantifier,
        } => {
            write_node(out, specifier);
            list(out, quantifier);
        }
        NodeKind::FullySpecifiedType {
            qualifiers,
            specifier,
        } => {
            list(out, qualifiers);
            write_node(out, specifier);
        }
        NodeKind::LayoutQualifier {
            layout,
            lp,
            qualifiers,
            commas,
            rp,
        } => {
            token(out, layout);
            token(out, lp);
            separated(out, qualifiers, commas);
            token(out, rp);
        }
        NodeKind::LayoutQualifierId {
            identifier,
            equal,
            expression,
        } => {
            token(out, identifier);
            opt_token(out, equal);
            opt_node(out, expression);
        }
        NodeKind::Struct {
            keyword,
            type_name,
            lb,
            declarations,
            rb,
        } => {
            token(out, keyword);
            opt_node(out, type_name);
            token(out, lb);
            list(out, declarations);
            token(out, rb);
        }
        NodeKind::StructDeclaration {
            specified_type,
            declarations,
            commas,
            semi,
        } => {
            write_node(out, specified_type);
            separated(out, declarations, commas);
            token(out, semi);
        }
        NodeKind::QuantifiedIdentifier {
            identifier,
            quantifier,
        } => {
            write_node(out, identifier);
            list(out, quantifier);
        }
        NodeKind::DeclarationStatement { declaration, semi } => {
            write_node(out, declaration);
            token(out, semi);
        }
        NodeKind::DeclaratorList {
            specified_type,
            declarations,
            commas,
        } => {
            write_node(out, specified_type);
            separated(out, declarations, commas);
        }
        NodeKind::Declaration {
            identifier,
            quantifier,
            equal,
            initializer,
        } => {
            write_node(out, identifier);
            list(out, quantifier);
            opt_token(out, equal);
            opt_node(out, initializer);
        }
        NodeKind::Precision {
            prefix,
            qualifier,
            specifier,
        } => {
            token(out, prefix);
            write_node(out, qualifier);
            write_node(out, specifier);
        }
        NodeKind::InterfaceDeclarator {
            qualifiers,
            interface_type,
            lb,
            declarations,
            rb,
            identifier,
        } => {
            list(out, qualifiers);
            token(out, interface_type);
            token(out, lb);
            list(out, declarations);
            token(out, rb);
            opt_node(out, identifier);
        }
        NodeKind::QualifierDeclarator {
            qualifiers,
            identifiers,
            commas,
        } => {
            list(out, qualifiers);
            separated(out, identifiers, commas);
        }
        NodeKind::FunctionPrototype {
            header,
            parameters,
            commas,
            rp,
        } => {
            write_node(out, header);
            separated(out, parameters, commas);
            token(out, rp);
        }
        NodeKind::FunctionHeader {
            return_type,
            name,
            lp,
        } => {
            write_node(out, return_type);
            write_node(out, name);
            token(out, lp);
        }
        NodeKind::ParameterDeclaration {
            qualifiers,
            specifier,
            identifier,
            quantifier,
        } => {
            list(out, qualifiers);
            write_node(out, specifier);
            opt_node(out, identifier);
            list(out, quantifier);
        }
        NodeKind::Function { prototype, body } => {
            write_node(out, prototype);
            write_node(out, body);
        }
        NodeKind::CompoundStatement { lb, statements, rb } => {
            token(out, lb);
            list(out, statements);
            token(out, rb);
        }
        NodeKind::ExpressionStatement { expression, semi } => {
            opt_node(out, expression);
            token(out, semi);
        }
        NodeKind::IfStatement {
            keyword,
            lp,
            condition,
            rp,
            body,
            else_keyword,
            alternate,
        } => {
            token(out, keyword);
            token(out, lp);
            write_node(out, condition);
            token(out, rp);
            write_node(out, body);

            // An else branch removed by a visitor takes its keyword with it
            if let Some(alternate) = alternate {
                match else_keyword {
                    Some(else_keyword) => token(out, else_keyword),
                    None => out.push_str("else "),
                }
                write_node(out, alternate);
            }
        }
        NodeKind::SwitchStatement {
            keyword,
            lp,
            expression,
            rp,
            lb,
            cases,
            rb,
        } => {
            token(out, keyword);
            token(out, lp);
            write_node(out, expression);
            token(out, rp);
            token(out, lb);
            list(out, cases);
            token(out, rb);
        }
        NodeKind::SwitchCase {
            keyword,
            test,
            colon,
            statements,
        } => {
            token(out, keyword);
            opt_node(out, test);
            token(out, colon);
            list(out, statements);
        }
        NodeKind::WhileStatement {
            keyword,
            lp,
            condition,
            rp,
            body,
        } => {
            token(out, keyword);
            token(out, lp);
            write_node(out, condition);
            token(out, rp);
            write_node(out, body);
        }
        NodeKind::DoStatement {
            do_keyword,
            body,
            while_keyword,
            lp,
            expression,
            rp,
            semi,
        } => {
            token(out, do_keyword);
            write_node(out, body);
            token(out, while_keyword);
            token(out, lp);
            write_node(out, expression);
            token(out, rp);
            token(out, semi);
        }
        NodeKind::ForStatement {
            keyword,
            lp,
            init,
            condition,
            condition_semi,
            operation,
            rp,
            body,
        } => {
            token(out, keyword);
            token(out, lp);
            write_node(out, init);
            opt_node(out, condition);
            token(out, condition_semi);
            opt_node(out, operation);
            token(out, rp);
            write_node(out, body);
        }
        NodeKind::ConditionExpression {
            specified_type,
            identifier,
            equal,
            initializer,
        } => {
            write_node(out, specified_type);
            write_node(out, identifier);
            token(out, equal);
            write_node(out, initializer);
        }
        NodeKind::ReturnStatement {
            keyword,
            expression,
            semi,
        } => {
            token(out, keyword);
            opt_node(out, expression);
            token(out, semi);
        }
        NodeKind::JumpStatement { keyword, semi } => {
            token(out, keyword);
            token(out, semi);
        }
    }
}
