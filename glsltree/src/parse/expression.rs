//! Expression grammar

use crate::lexer::TokenKind;
use crate::syntax::{Node, NodeKind, NodeTag, Token};

use super::grammar::{PResult, Parser, Rule};

/// Binary operators, from the loosest to the tightest binding level
static BINARY_LEVELS: &[&[&str]] = &[
    &["||"],
    &["^^"],
    &["&&"],
    &["|"],
    &["^"],
    &["&"],
    &["==", "!="],
    &["<", ">", "<=", ">="],
    &["<<", ">>"],
    &["+", "-"],
    &["*", "/", "%"],
];

static ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "*=", "/=", "%=", "+=", "-=", "<<=", ">>=", "&=", "^=", "|=",
];

static PREFIX_OPERATORS: &[&str] = &["++", "--", "+", "-", "!", "~"];

static POSTFIX_OPERATORS: &[&str] = &["++", "--"];

/// Argument list of a call, parentheses included
struct CallArguments {
    lp: Token,
    args: Vec<Node>,
    commas: Vec<Token>,
    rp: Token,
}

impl CallArguments {
    fn into_call(self, identifier: Node) -> NodeKind {
        NodeKind::FunctionCall {
            identifier: Box::new(identifier),
            lp: self.lp,
            args: self.args,
            commas: self.commas,
            rp: self.rp,
        }
    }
}

impl Parser<'_> {
    /// Comma-separated sequence of assignment expressions
    pub fn expression(&mut self, pos: usize) -> PResult<Node> {
        self.memo(pos, Rule::Expression, |p, start| {
            let (next, (mut expressions, commas)) = p.separated(start, Self::assignment)?;

            if commas.is_empty() {
                expressions.pop().map(|expression| (next, expression))
            } else {
                Some((
                    next,
                    p.node(start, next, NodeKind::Sequence {
                        expressions,
                        commas,
                    }),
                ))
            }
        })
    }

    pub fn assignment(&mut self, pos: usize) -> PResult<Node> {
        self.memo(pos, Rule::Assignment, |p, start| {
            p.assignment_operation(start)
                .or_else(|| p.ternary(start))
        })
    }

    fn assignment_operation(&mut self, start: usize) -> PResult<Node> {
        let (pos, left) = self.unary(start)?;
        let (pos, operator) = self.punct_one_of(pos, ASSIGNMENT_OPERATORS)?;
        let (next, right) = self.assignment(pos)?;

        Some((
            next,
            self.node(start, next, NodeKind::Assignment {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            }),
        ))
    }

    /// Conditional expression, `a ? b : c`
    pub fn ternary(&mut self, pos: usize) -> PResult<Node> {
        self.memo(pos, Rule::Ternary, |p, start| {
            let (pos, condition) = p.binary(start, 0)?;

            match p.ternary_branches(pos) {
                Some((next, (question, expression, colon, alternate))) => Some((
                    next,
                    p.node(start, next, NodeKind::Ternary {
                        condition: Box::new(condition),
                        question,
                        expression: Box::new(expression),
                        colon,
                        alternate: Box::new(alternate),
                    }),
                )),
                None => Some((pos, condition)),
            }
        })
    }

    fn ternary_branches(&mut self, pos: usize) -> PResult<(Token, Node, Token, Node)> {
        let (pos, question) = self.punct(pos, "?")?;
        let (pos, expression) = self.expression(pos)?;
        let (pos, colon) = self.punct(pos, ":")?;
        let (next, alternate) = self.assignment(pos)?;
        Some((next, (question, expression, colon, alternate)))
    }

    /// Left-associative binary expression at the given precedence level
    fn binary(&mut self, pos: usize, level: usize) -> PResult<Node> {
        self.memo(pos, Rule::Binary(level as u8), |p, start| {
            let (mut pos, mut left) = p.binary_operand(start, level)?;

            loop {
                let (after_operator, operator) = match p.punct_one_of(pos, BINARY_LEVELS[level]) {
                    Some(matched) => matched,
                    None => break,
                };

                let (next, right) = match p.binary_operand(after_operator, level) {
                    Some(matched) => matched,
                    None => break,
                };

                left = p.node(start, next, NodeKind::Binary {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                });
                pos = next;
            }

            Some((pos, left))
        })
    }

    fn binary_operand(&mut self, pos: usize, level: usize) -> PResult<Node> {
        if level + 1 < BINARY_LEVELS.len() {
            self.binary(pos, level + 1)
        } else {
            self.unary(pos)
        }
    }

    pub fn unary(&mut self, pos: usize) -> PResult<Node> {
        self.memo(pos, Rule::Unary, |p, start| {
            if let Some((pos, operator)) = p.punct_one_of(start, PREFIX_OPERATORS) {
                let (next, expression) = p.unary(pos)?;

                return Some((
                    next,
                    p.node(start, next, NodeKind::Unary {
                        operator,
                        expression: Box::new(expression),
                    }),
                ));
            }

            p.postfix(start)
        })
    }

    /// Primary expression or call followed by indexing, selections, method calls and
    /// increments, applied left to right
    fn postfix(&mut self, pos: usize) -> PResult<Node> {
        self.memo(pos, Rule::Postfix, |p, start| {
            let (mut pos, mut expression) = match p.function_call(start) {
                Some(call) => call,
                None => p.primary(start)?,
            };

            loop {
                let (next, postfix) = if let Some(matched) = p.array_specifier(pos) {
                    matched
                } else if let Some((next, operator)) = p.punct_one_of(pos, POSTFIX_OPERATORS) {
                    (
                        next,
                        p.node(pos, next, NodeKind::PostfixOperator { operator }),
                    )
                } else if let Some(matched) = p.field_selection(pos) {
                    matched
                } else {
                    break;
                };

                let is_selection = postfix.tag() == NodeTag::FieldSelection;
                expression = p.node(start, next, NodeKind::Postfix {
                    expression: Box::new(expression),
                    postfix: Box::new(postfix),
                });
                pos = next;

                // Method call, `v.length()`
                if is_selection {
                    if let Some((next, arguments)) = p.call_arguments(pos) {
                        expression = p.node(start, next, arguments.into_call(expression));
                        pos = next;
                    }
                }
            }

            Some((pos, expression))
        })
    }

    fn field_selection(&mut self, start: usize) -> PResult<Node> {
        let (pos, dot) = self.punct(start, ".")?;
        let (next, selection) = self.identifier_token(pos)?;
        Some((
            next,
            self.node(start, next, NodeKind::FieldSelection { dot, selection }),
        ))
    }

    /// Call of a function or constructor. The callee is parsed as a type specifier, and is
    /// classified once scopes are known.
    fn function_call(&mut self, pos: usize) -> PResult<Node> {
        self.memo(pos, Rule::FunctionCall, |p, start| {
            let (pos, identifier) = p.type_specifier(start)?;
            let (next, arguments) = p.call_arguments(pos)?;
            Some((next, p.node(start, next, arguments.into_call(identifier))))
        })
    }

    fn call_arguments(&mut self, start: usize) -> PResult<CallArguments> {
        let (pos, lp) = self.punct(start, "(")?;

        let (pos, args, commas) = if self.is_keyword(pos, "void") && self.is_punct(pos + 1, ")") {
            let token = self.token(pos);
            let void = self.node(pos, pos + 1, NodeKind::Keyword { token });
            (pos + 1, vec![void], Vec::new())
        } else if let Some((next, (args, commas))) = self.separated(pos, Self::assignment) {
            (next, args, commas)
        } else {
            (pos, Vec::new(), Vec::new())
        };

        let (next, rp) = self.punct(pos, ")")?;

        Some((
            next,
            CallArguments {
                lp,
                args,
                commas,
                rp,
            },
        ))
    }

    fn primary(&mut self, pos: usize) -> PResult<Node> {
        self.memo(pos, Rule::Primary, |p, start| match p.kind(start) {
            TokenKind::Identifier => p.identifier(start),
            TokenKind::IntConstant | TokenKind::FloatConstant | TokenKind::BoolConstant => {
                let literal = p.token(start);
                Some((
                    start + 1,
                    p.node(start, start + 1, NodeKind::Literal { literal }),
                ))
            }
            _ => {
                if let Some((pos, lp)) = p.punct(start, "(") {
                    let (pos, expression) = p.expression(pos)?;
                    let (next, rp) = p.punct(pos, ")")?;

                    return Some((
                        next,
                        p.node(start, next, NodeKind::Group {
                            lp,
                            expression: Box::new(expression),
                            rp,
                        }),
                    ));
                }

                p.fail::<()>(start, "identifier");
                p.fail(start, "literal")
            }
        })
    }

    /// `[expr]` or `[]`
    pub fn array_specifier(&mut self, start: usize) -> PResult<Node> {
        let (pos, lb) = self.punct(start, "[")?;
        let (pos, expression) = self.optional(pos, Self::expression);
        let (next, rb) = self.punct(pos, "]")?;

        Some((
            next,
            self.node(start, next, NodeKind::ArraySpecifier { lb, expression, rb }),
        ))
    }
}
