//! Statement grammar

use crate::error::Error;
use crate::lexer::{KeywordClass, TokenKind};
use crate::syntax::{Node, NodeKind};

use super::grammar::{PResult, Parser, Rule};

impl Parser<'_> {
    pub fn statement(&mut self, pos: usize) -> PResult<Node> {
        self.memo(pos, Rule::Statement, |p, start| {
            match p.kind(start) {
                TokenKind::Preprocessor => return p.preprocessor(start),
                TokenKind::Keyword(KeywordClass::Reserved) => match p.text(start) {
                    "if" => return p.if_statement(start),
                    "switch" => return p.switch_statement(start),
                    "while" => return p.while_statement(start),
                    "do" => return p.do_statement(start),
                    "for" => return p.for_statement(start),
                    "return" => return p.return_statement(start),
                    "break" | "continue" | "discard" => return p.jump_statement(start),
                    _ => {}
                },
                _ if p.is_punct(start, "{") => return p.compound_statement(start),
                _ => {}
            }

            if let Some(declaration) = p.declaration_statement(start) {
                return Some(declaration);
            }

            p.expression_statement(start)
        })
    }

    pub fn compound_statement(&mut self, start: usize) -> PResult<Node> {
        let (pos, lb) = self.punct(start, "{")?;
        let (pos, statements) = self.many(pos, Self::statement);
        let (next, rb) = self.punct(pos, "}")?;

        Some((
            next,
            self.node(start, next, NodeKind::CompoundStatement { lb, statements, rb }),
        ))
    }

    fn expression_statement(&mut self, start: usize) -> PResult<Node> {
        let (pos, expression) = self.optional(start, Self::expression);
        let (next, semi) = self.punct(pos, ";")?;

        Some((
            next,
            self.node(start, next, NodeKind::ExpressionStatement { expression, semi }),
        ))
    }

    /// Expression, or a declaration with an initializer (`while (bool b = f())`)
    fn condition(&mut self, start: usize) -> PResult<Node> {
        if let Some(declaration) = self.condition_expression(start) {
            return Some(declaration);
        }

        self.expression(start)
    }

    fn condition_expression(&mut self, start: usize) -> PResult<Node> {
        let (pos, specified_type) = self.fully_specified_type(start)?;
        let (pos, identifier) = self.identifier(pos)?;
        let (pos, equal) = self.punct(pos, "=")?;
        let (next, initializer) = self.initializer(pos)?;

        Some((
            next,
            self.node(start, next, NodeKind::ConditionExpression {
                specified_type: Box::new(specified_type),
                identifier: Box::new(identifier),
                equal,
                initializer: Box::new(initializer),
            }),
        ))
    }

    fn if_statement(&mut self, start: usize) -> PResult<Node> {
        let (pos, keyword) = self.keyword(start, "if")?;
        let (pos, lp) = self.punct(pos, "(")?;
        let (pos, condition) = self.expression(pos)?;
        let (pos, rp) = self.punct(pos, ")")?;
        let (pos, body) = self.statement(pos)?;

        let (next, else_keyword, alternate) = match self.keyword(pos, "else") {
            Some((after_else, else_keyword)) => {
                let (next, alternate) = self.statement(after_else)?;
                (next, Some(else_keyword), Some(Box::new(alternate)))
            }
            None => (pos, None, None),
        };

        Some((
            next,
            self.node(start, next, NodeKind::IfStatement {
                keyword,
                lp,
                condition: Box::new(condition),
                rp,
                body: Box::new(body),
                else_keyword,
                alternate,
            }),
        ))
    }

    fn switch_statement(&mut self, start: usize) -> PResult<Node> {
        let (pos, keyword) = self.keyword(start, "switch")?;
        let (pos, lp) = self.punct(pos, "(")?;
        let (pos, expression) = self.expression(pos)?;
        let (pos, rp) = self.punct(pos, ")")?;
        let (mut pos, lb) = self.punct(pos, "{")?;

        let mut cases = Vec::new();
        loop {
            if let Some((next, case)) = self.switch_case(pos) {
                cases.push(case);
                pos = next;
                continue;
            }

            if self.is_punct(pos, "}") {
                break;
            }

            // Labels consume every statement that follows them, so this one has no label
            if self.statement(pos).is_some() {
                let span = self.span_at(pos);
                self.set_fatal(Error::InvalidSwitchBody(span));
                return None;
            }

            break;
        }

        let (next, rb) = self.punct(pos, "}")?;

        Some((
            next,
            self.node(start, next, NodeKind::SwitchStatement {
                keyword,
                lp,
                expression: Box::new(expression),
                rp,
                lb,
                cases,
                rb,
            }),
        ))
    }

    /// `case value:` or `default:`, with the statements that follow it
    fn switch_case(&mut self, start: usize) -> PResult<Node> {
        let (pos, keyword, test) = match self.keyword(start, "case") {
            Some((pos, keyword)) => {
                let (pos, test) = self.expression(pos)?;
                (pos, keyword, Some(Box::new(test)))
            }
            None => {
                let (pos, keyword) = self.keyword(start, "default")?;
                (pos, keyword, None)
            }
        };

        let (pos, colon) = self.punct(pos, ":")?;
        let (next, statements) = self.many(pos, Self::statement);

        Some((
            next,
            self.node(start, next, NodeKind::SwitchCase {
                keyword,
                test,
                colon,
                statements,
            }),
        ))
    }

    fn while_statement(&mut self, start: usize) -> PResult<Node> {
        let (pos, keyword) = self.keyword(start, "while")?;
        let (pos, lp) = self.punct(pos, "(")?;
        let (pos, condition) = self.condition(pos)?;
        let (pos, rp) = self.punct(pos, ")")?;
        let (next, body) = self.statement(pos)?;

        Some((
            next,
            self.node(start, next, NodeKind::WhileStatement {
                keyword,
                lp,
                condition: Box::new(condition),
                rp,
                body: Box::new(body),
            }),
        ))
    }

    fn do_statement(&mut self, start: usize) -> PResult<Node> {
        let (pos, do_keyword) = self.keyword(start, "do")?;
        let (pos, body) = self.statement(pos)?;
        let (pos, while_keyword) = self.keyword(pos, "while")?;
        let (pos, lp) = self.punct(pos, "(")?;
        let (pos, expression) = self.expression(pos)?;
        let (pos, rp) = self.punct(pos, ")")?;
        let (next, semi) = self.punct(pos, ";")?;

        Some((
            next,
            self.node(start, next, NodeKind::DoStatement {
                do_keyword,
                body: Box::new(body),
                while_keyword,
                lp,
                expression: Box::new(expression),
                rp,
                semi,
            }),
        ))
    }

    fn for_statement(&mut self, start: usize) -> PResult<Node> {
        let (pos, keyword) = self.keyword(start, "for")?;
        let (pos, lp) = self.punct(pos, "(")?;

        let (pos, init) = match self.declaration_statement(pos) {
            Some(declaration) => declaration,
            None => self.expression_statement(pos)?,
        };

        let (pos, condition) = self.optional(pos, Self::condition);
        let (pos, condition_semi) = self.punct(pos, ";")?;
        let (pos, operation) = self.optional(pos, Self::expression);
        let (pos, rp) = self.punct(pos, ")")?;
        let (next, body) = self.statement(pos)?;

        Some((
            next,
            self.node(start, next, NodeKind::ForStatement {
                keyword,
                lp,
                init: Box::new(init),
                condition,
                condition_semi,
                operation,
                rp,
                body: Box::new(body),
            }),
        ))
    }

    fn return_statement(&mut self, start: usize) -> PResult<Node> {
        let (pos, keyword) = self.keyword(start, "return")?;
        let (pos, expression) = self.optional(pos, Self::expression);
        let (next, semi) = self.punct(pos, ";")?;

        Some((
            next,
            self.node(start, next, NodeKind::ReturnStatement {
                keyword,
                expression,
                semi,
            }),
        ))
    }

    /// `break;`, `continue;` or `discard;`
    fn jump_statement(&mut self, start: usize) -> PResult<Node> {
        let keyword = self.token(start);
        let (next, semi) = self.punct(start + 1, ";")?;

        Some((
            next,
            self.node(start, next, NodeKind::JumpStatement { keyword, semi }),
        ))
    }
}
