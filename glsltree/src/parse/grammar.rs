//! Parser engine: token access, terminal matchers, memoization and failure tracking

use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, SyntaxError};
use crate::lexer::{tokenize, KeywordClass, Lexeme, TokenKind};
use crate::location::{LineIndex, Span};
use crate::syntax::{Node, NodeKind, Token};

/// Outcome of a grammar rule: position after the match and the matched value
pub(crate) type PResult<T> = Option<(usize, T)>;

/// Memoized grammar rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Rule {
    FunctionPrototype,
    Declaration,
    FullySpecifiedType,
    TypeSpecifier,
    Statement,
    Expression,
    Assignment,
    Ternary,
    Binary(u8),
    Unary,
    Postfix,
    FunctionCall,
    Primary,
}

/// Outcome of a rule at a position
enum Memo {
    Failed,
    /// Matched up to the given position, the node is only kept once the rule is requested again
    Matched(usize),
    Cached(usize, Node),
}

/// Maximum number of nested memoized rules, about 30 levels of parenthesized expressions
const MAX_DEPTH: usize = 512;

pub(crate) struct Parser<'s> {
    source: &'s str,
    lexemes: Vec<Lexeme>,
    lines: LineIndex<'s>,
    include_location: bool,
    grammar_source: Option<String>,
    memo: HashMap<(usize, Rule), Memo>,
    memo_hits: usize,
    depth: usize,
    furthest: usize,
    expected: BTreeSet<String>,
    fatal: Option<Error>,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str, include_location: bool, grammar_source: Option<String>) -> Self {
        Self {
            source,
            lexemes: tokenize(source),
            lines: LineIndex::new(source),
            include_location,
            grammar_source,
            memo: HashMap::new(),
            memo_hits: 0,
            depth: 0,
            furthest: 0,
            expected: BTreeSet::new(),
            fatal: None,
        }
    }

    /// Trivia before the first token
    pub fn leading_trivia(&self) -> &'s str {
        let first = self.lexemes.first().map(|l| l.start).unwrap_or(0);
        &self.source[..first]
    }

    /// Turn the outcome of a start rule into a result, reporting the furthest failure
    pub fn finish<T>(mut self, result: PResult<T>) -> Result<T, Error> {
        trace!(
            "parsed {} tokens, {} memo entries, {} memo hits",
            self.lexemes.len(),
            self.memo.len(),
            self.memo_hits
        );

        if let Some(fatal) = self.fatal.take() {
            return Err(fatal);
        }

        match result {
            Some((_, value)) => Ok(value),
            None => Err(self.syntax_error().into()),
        }
    }

    fn syntax_error(&self) -> SyntaxError {
        let lexeme = self.lexeme(self.furthest);

        SyntaxError {
            expected: self.expected.iter().cloned().collect(),
            found: match lexeme.kind {
                TokenKind::EndOfInput => None,
                _ => Some(self.source[lexeme.start..lexeme.end].to_owned()),
            },
            span: self.lines.span(lexeme.start, lexeme.end),
            grammar_source: self.grammar_source.clone(),
        }
    }

    /// Abort parsing with an internal error
    pub fn set_fatal(&mut self, error: Error) {
        if self.fatal.is_none() {
            self.fatal = Some(error);
        }
    }

    pub fn lexeme(&self, pos: usize) -> &Lexeme {
        // tokenize always produces a final EndOfInput lexeme
        &self.lexemes[pos.min(self.lexemes.len() - 1)]
    }

    pub fn kind(&self, pos: usize) -> TokenKind {
        self.lexeme(pos).kind
    }

    pub fn text(&self, pos: usize) -> &'s str {
        let lexeme = self.lexeme(pos);
        &self.source[lexeme.start..lexeme.end]
    }

    /// Terminal at `pos`, with its trailing trivia
    pub fn token(&self, pos: usize) -> Token {
        let lexeme = self.lexeme(pos);
        Token::with_trivia(
            &self.source[lexeme.start..lexeme.end],
            &self.source[lexeme.end..lexeme.trivia_end],
        )
    }

    pub fn at_end(&self, pos: usize) -> bool {
        self.kind(pos) == TokenKind::EndOfInput
    }

    /// Build a node covering the tokens in `start..end`
    pub fn node(&self, start: usize, end: usize, kind: NodeKind) -> Node {
        let mut node = Node::new(kind);

        if self.include_location {
            let first = self.lexeme(start).start;
            let last = if end > start {
                self.lexeme(end - 1).end
            } else {
                first
            };

            node.span = Some(self.lines.span(first, last));
        }

        node
    }

    /// Location of the token at `pos`
    pub fn span_at(&self, pos: usize) -> Span {
        let lexeme = self.lexeme(pos);
        self.lines.span(lexeme.start, lexeme.end)
    }

    /// Record a failed expectation at `pos`
    pub fn fail<T>(&mut self, pos: usize, expected: &str) -> PResult<T> {
        self.fail_with(pos, || expected.to_owned())
    }

    /// Record a failed expectation at `pos`, describing it only if `pos` is the furthest yet
    pub fn fail_with<T>(&mut self, pos: usize, expected: impl FnOnce() -> String) -> PResult<T> {
        if pos > self.furthest {
            self.furthest = pos;
            self.expected.clear();
        }

        if pos == self.furthest {
            self.expected.insert(expected());
        }

        None
    }

    /// Run `rule` at `pos`, memoizing its outcome
    ///
    /// A rule runs once per position, and a second time if it matched and is requested again, at
    /// which point its node is cached. Nodes of rules that are never requested twice are not
    /// copied.
    pub fn memo(
        &mut self,
        pos: usize,
        rule: Rule,
        f: impl FnOnce(&mut Self, usize) -> PResult<Node>,
    ) -> PResult<Node> {
        if self.fatal.is_some() {
            return None;
        }

        let requested_again = match self.memo.get(&(pos, rule)) {
            Some(Memo::Failed) => {
                self.memo_hits += 1;
                return None;
            }
            Some(Memo::Cached(end, node)) => {
                self.memo_hits += 1;
                return Some((*end, node.clone()));
            }
            Some(Memo::Matched(_)) => true,
            None => false,
        };

        if self.depth >= MAX_DEPTH {
            let span = self.span_at(pos);
            self.set_fatal(Error::NestingTooDeep(span));
            return None;
        }

        self.depth += 1;
        let result = f(self, pos);
        self.depth -= 1;

        let entry = match &result {
            Some((end, node)) if requested_again => Memo::Cached(*end, node.clone()),
            Some((end, _)) => Memo::Matched(*end),
            None => Memo::Failed,
        };

        self.memo.insert((pos, rule), entry);
        result
    }

    pub fn is_punct(&self, pos: usize, punct: &str) -> bool {
        self.kind(pos) == TokenKind::Punctuation && self.text(pos) == punct
    }

    pub fn punct(&mut self, pos: usize, punct: &str) -> PResult<Token> {
        if self.is_punct(pos, punct) {
            Some((pos + 1, self.token(pos)))
        } else {
            self.fail_with(pos, || format!("{:?}", punct))
        }
    }

    pub fn is_keyword(&self, pos: usize, keyword: &str) -> bool {
        matches!(self.kind(pos), TokenKind::Keyword(_)) && self.text(pos) == keyword
    }

    pub fn keyword(&mut self, pos: usize, keyword: &str) -> PResult<Token> {
        if self.is_keyword(pos, keyword) {
            Some((pos + 1, self.token(pos)))
        } else {
            self.fail_with(pos, || format!("{:?}", keyword))
        }
    }

    pub fn keyword_of_class(&mut self, pos: usize, class: KeywordClass) -> PResult<Node> {
        if self.kind(pos) == TokenKind::Keyword(class) {
            let token = self.token(pos);
            Some((pos + 1, self.node(pos, pos + 1, NodeKind::Keyword { token })))
        } else {
            self.fail(
                pos,
                match class {
                    KeywordClass::Type => "type name",
                    KeywordClass::Qualifier => "qualifier",
                    KeywordClass::Reserved => "keyword",
                },
            )
        }
    }

    pub fn identifier_token(&mut self, pos: usize) -> PResult<Token> {
        if self.kind(pos) == TokenKind::Identifier {
            Some((pos + 1, self.token(pos)))
        } else {
            self.fail(pos, "identifier")
        }
    }

    pub fn identifier(&mut self, pos: usize) -> PResult<Node> {
        let (next, identifier) = self.identifier_token(pos)?;
        Some((next, self.node(pos, next, NodeKind::Identifier { identifier })))
    }

    pub fn type_name(&mut self, pos: usize) -> PResult<Node> {
        let (next, identifier) = self.identifier_token(pos)?;
        Some((next, self.node(pos, next, NodeKind::TypeName { identifier })))
    }

    pub fn preprocessor(&mut self, pos: usize) -> PResult<Node> {
        if self.kind(pos) == TokenKind::Preprocessor {
            let line = self.token(pos);
            Some((pos + 1, self.node(pos, pos + 1, NodeKind::Preprocessor { line })))
        } else {
            self.fail(pos, "preprocessor directive")
        }
    }

    pub fn end_of_input(&mut self, pos: usize) -> PResult<()> {
        if self.at_end(pos) {
            Some((pos, ()))
        } else {
            self.fail(pos, "end of input")
        }
    }

    /// Parse one or more `item`s separated by commas. A trailing comma is not consumed.
    pub fn separated(
        &mut self,
        pos: usize,
        mut item: impl FnMut(&mut Self, usize) -> PResult<Node>,
    ) -> PResult<(Vec<Node>, Vec<Token>)> {
        let (mut pos, first) = item(self, pos)?;
        let mut items = vec![first];
        let mut commas = Vec::new();

        while let Some((after_comma, comma)) = self.punct(pos, ",") {
            match item(self, after_comma) {
                Some((next, node)) => {
                    items.push(node);
                    commas.push(comma);
                    pos = next;
                }
                None => break,
            }
        }

        Some((pos, (items, commas)))
    }

    /// Parse an optional `item`
    pub fn optional(
        &mut self,
        pos: usize,
        item: impl FnOnce(&mut Self, usize) -> PResult<Node>,
    ) -> (usize, Option<Box<Node>>) {
        match item(self, pos) {
            Some((next, node)) => (next, Some(Box::new(node))),
            None => (pos, None),
        }
    }

    /// Match any of the punctuation tokens in `puncts`
    pub fn punct_one_of(&mut self, pos: usize, puncts: &[&str]) -> PResult<Token> {
        if self.kind(pos) == TokenKind::Punctuation {
            let text = self.text(pos);
            if puncts.contains(&text) {
                return Some((pos + 1, self.token(pos)));
            }
        }

        for punct in puncts {
            self.fail_with::<()>(pos, || format!("{:?}", punct));
        }

        None
    }

    /// Parse zero or more `item`s
    pub fn many(
        &mut self,
        mut pos: usize,
        mut item: impl FnMut(&mut Self, usize) -> PResult<Node>,
    ) -> (usize, Vec<Node>) {
        let mut items = Vec::new();
        while let Some((next, node)) = item(self, pos) {
            items.push(node);
            pos = next;
        }

        (pos, items)
    }
}
