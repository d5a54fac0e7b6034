//! Tokenization of GLSL source text
//!
//! Every lexeme records the trivia (whitespace and comments) that follows it, so the parser can
//! attach it to the terminal it produces. Leading trivia of the whole source is whatever comes
//! before the first lexeme.

/// Category of a reserved word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordClass {
    /// Built-in type name (`float`, `vec3`, `sampler2D`, ...)
    Type,
    /// Storage, interpolation, precision, memory or invariance qualifier
    Qualifier,
    /// Any other reserved word (`if`, `struct`, `layout`, ...)
    Reserved,
}

/// Kind of a lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword(KeywordClass),
    IntConstant,
    FloatConstant,
    BoolConstant,
    Punctuation,
    /// A whole preprocessor line, from `#` to the end of the line
    Preprocessor,
    /// A character that cannot start any token
    Invalid,
    EndOfInput,
}

/// A lexeme, as byte ranges into the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    /// End of the trivia following this lexeme
    pub trivia_end: usize,
}

/// Look up a reserved word
pub fn keyword_class(text: &str) -> Option<KeywordClass> {
    match text {
        "void" | "bool" | "int" | "uint" | "float" | "double" | "vec2" | "vec3" | "vec4"
        | "dvec2" | "dvec3" | "dvec4" | "bvec2" | "bvec3" | "bvec4" | "ivec2" | "ivec3"
        | "ivec4" | "uvec2" | "uvec3" | "uvec4" | "mat2" | "mat3" | "mat4" | "mat2x2"
        | "mat2x3" | "mat2x4" | "mat3x2" | "mat3x3" | "mat3x4" | "mat4x2" | "mat4x3"
        | "mat4x4" | "dmat2" | "dmat3" | "dmat4" | "dmat2x2" | "dmat2x3" | "dmat2x4"
        | "dmat3x2" | "dmat3x3" | "dmat3x4" | "dmat4x2" | "dmat4x3" | "dmat4x4"
        | "atomic_uint" | "sampler1D" | "sampler2D" | "sampler3D" | "samplerCube"
        | "sampler1DShadow" | "sampler2DShadow" | "samplerCubeShadow" | "sampler1DArray"
        | "sampler2DArray" | "sampler1DArrayShadow" | "sampler2DArrayShadow"
        | "samplerCubeArray" | "samplerCubeArrayShadow" | "sampler2DRect"
        | "sampler2DRectShadow" | "samplerBuffer" | "sampler2DMS" | "sampler2DMSArray"
        | "samplerExternalOES" | "isampler1D" | "isampler2D" | "isampler3D" | "isamplerCube"
        | "isampler1DArray" | "isampler2DArray" | "isamplerCubeArray" | "isampler2DRect"
        | "isamplerBuffer" | "isampler2DMS" | "isampler2DMSArray" | "usampler1D"
        | "usampler2D" | "usampler3D" | "usamplerCube" | "usampler1DArray"
        | "usampler2DArray" | "usamplerCubeArray" | "usampler2DRect" | "usamplerBuffer"
        | "usampler2DMS" | "usampler2DMSArray" | "image1D" | "image2D" | "image3D"
        | "imageCube" | "image1DArray" | "image2DArray" | "imageCubeArray" | "image2DRect"
        | "imageBuffer" | "image2DMS" | "image2DMSArray" | "iimage1D" | "iimage2D"
        | "iimage3D" | "iimageCube" | "iimage1DArray" | "iimage2DArray" | "iimageCubeArray"
        | "iimage2DRect" | "iimageBuffer" | "iimage2DMS" | "iimage2DMSArray" | "uimage1D"
        | "uimage2D" | "uimage3D" | "uimageCube" | "uimage1DArray" | "uimage2DArray"
        | "uimageCubeArray" | "uimage2DRect" | "uimageBuffer" | "uimage2DMS"
        | "uimage2DMSArray" => Some(KeywordClass::Type),
        "const" | "in" | "out" | "inout" | "attribute" | "uniform" | "varying" | "buffer"
        | "shared" | "centroid" | "sample" | "patch" | "smooth" | "flat" | "noperspective"
        | "invariant" | "precise" | "highp" | "mediump" | "lowp" | "coherent" | "volatile"
        | "restrict" | "readonly" | "writeonly" => Some(KeywordClass::Qualifier),
        "break" | "continue" | "do" | "for" | "while" | "switch" | "case" | "default" | "if"
        | "else" | "discard" | "return" | "struct" | "layout" | "precision" | "subroutine" => {
            Some(KeywordClass::Reserved)
        }
        _ => None,
    }
}

/// Returns `true` for the precision qualifiers accepted by `precision` statements
pub fn is_precision_qualifier(text: &str) -> bool {
    matches!(text, "highp" | "mediump" | "lowp")
}

// Longest first, so that the first match is the longest one
static PUNCTUATION: &[&str] = &[
    "<<=", ">>=", "++", "--", "<=", ">=", "==", "!=", "&&", "||", "^^", "+=", "-=", "*=", "/=",
    "%=", "&=", "^=", "|=", "<<", ">>", "(", ")", "[", "]", "{", "}", ".", ",", ";", ":", "=",
    "+", "-", "*", "/", "%", "<", ">", "!", "~", "&", "|", "^", "?",
];

struct Lexer<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
}

/// Split `source` into lexemes. The last lexeme is always [TokenKind::EndOfInput].
pub fn tokenize(source: &str) -> Vec<Lexeme> {
    let mut lexer = Lexer {
        source,
        bytes: source.as_bytes(),
        pos: 0,
    };

    lexer.skip_trivia();

    let mut lexemes = Vec::new();
    loop {
        let start = lexer.pos;
        let kind = lexer.next_kind();
        let end = lexer.pos;
        lexer.skip_trivia();

        lexemes.push(Lexeme {
            kind,
            start,
            end,
            trivia_end: lexer.pos,
        });

        if kind == TokenKind::EndOfInput {
            break;
        }
    }

    lexemes
}

fn is_ident_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

fn is_ident_continue(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

impl Lexer<'_> {
    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn rest(&self) -> &str {
        &self.source[self.pos..]
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek_at(0) {
                Some(b) if b.is_ascii_whitespace() || b == 0x0b => self.pos += 1,
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    self.pos += self.rest().find('\n').unwrap_or_else(|| self.rest().len());
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => match self.rest()[2..].find("*/") {
                    Some(close) => self.pos += close + 4,
                    // Unterminated comments are reported as invalid tokens
                    None => return,
                },
                _ => return,
            }
        }
    }

    fn next_kind(&mut self) -> TokenKind {
        let b = match self.peek_at(0) {
            Some(b) => b,
            None => return TokenKind::EndOfInput,
        };

        if b == b'#' {
            self.preprocessor_line();
            TokenKind::Preprocessor
        } else if is_ident_start(b) {
            let start = self.pos;
            self.consume_while(is_ident_continue);

            match &self.source[start..self.pos] {
                "true" | "false" => TokenKind::BoolConstant,
                text => keyword_class(text)
                    .map(TokenKind::Keyword)
                    .unwrap_or(TokenKind::Identifier),
            }
        } else if b.is_ascii_digit()
            || (b == b'.' && self.peek_at(1).map(|b| b.is_ascii_digit()).unwrap_or(false))
        {
            self.number()
        } else if b == b'/' && self.peek_at(1) == Some(b'*') {
            self.pos = self.source.len();
            TokenKind::Invalid
        } else if let Some(punct) = PUNCTUATION.iter().find(|p| self.rest().starts_with(**p)) {
            self.pos += punct.len();
            TokenKind::Punctuation
        } else {
            self.pos += self.rest().chars().next().map(char::len_utf8).unwrap_or(1);
            TokenKind::Invalid
        }
    }

    fn preprocessor_line(&mut self) {
        loop {
            match self.rest().find('\n') {
                Some(eol) => {
                    let line = &self.rest()[..eol];
                    let continued = line.trim_end_matches('\r').ends_with('\\');
                    self.pos += eol;

                    if continued {
                        self.pos += 1;
                    } else {
                        return;
                    }
                }
                None => {
                    self.pos = self.source.len();
                    return;
                }
            }
        }
    }

    fn consume_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek_at(0).map(&pred).unwrap_or(false) {
            self.pos += 1;
        }
    }

    fn number(&mut self) -> TokenKind {
        if self.peek_at(0) == Some(b'0') && matches!(self.peek_at(1), Some(b'x') | Some(b'X')) {
            self.pos += 2;
            self.consume_while(|b| b.is_ascii_hexdigit());
            if matches!(self.peek_at(0), Some(b'u') | Some(b'U')) {
                self.pos += 1;
            }
            return TokenKind::IntConstant;
        }

        let mut is_float = false;
        self.consume_while(|b| b.is_ascii_digit());

        if self.peek_at(0) == Some(b'.') {
            is_float = true;
            self.pos += 1;
            self.consume_while(|b| b.is_ascii_digit());
        }

        if matches!(self.peek_at(0), Some(b'e') | Some(b'E')) {
            let sign = matches!(self.peek_at(1), Some(b'+') | Some(b'-')) as usize;
            if self
                .peek_at(1 + sign)
                .map(|b| b.is_ascii_digit())
                .unwrap_or(false)
            {
                is_float = true;
                self.pos += 1 + sign;
                self.consume_while(|b| b.is_ascii_digit());
            }
        }

        match (self.peek_at(0), self.peek_at(1)) {
            (Some(b'f'), _) | (Some(b'F'), _) => {
                self.pos += 1;
                TokenKind::FloatConstant
            }
            (Some(b'l'), Some(b'f')) | (Some(b'L'), Some(b'F')) => {
                self.pos += 2;
                TokenKind::FloatConstant
            }
            (Some(b'u'), _) | (Some(b'U'), _) if !is_float => {
                self.pos += 1;
                TokenKind::IntConstant
            }
            _ if is_float => TokenKind::FloatConstant,
            _ => TokenKind::IntConstant,
        }
    }
}
