//! Tokenizer for C/C++ source text
//!
//! Produces a flat token stream with byte-accurate source ranges. Comments,
//! whitespace, and preprocessor directives are consumed as trivia; the parser
//! never sees them. The lexer is tolerant by design: anything it cannot
//! classify becomes a one-character punctuator rather than an error, so a
//! single exotic construct cannot fail a whole translation unit.

use crate::ast::{SourceLocation, SourceRange};
use thiserror::Error;

/// Errors that abort tokenization of a file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated block comment starting at line {line}")]
    UnterminatedComment { line: u32 },
    #[error("unterminated string literal at line {line}")]
    UnterminatedString { line: u32 },
    #[error("unterminated character literal at line {line}")]
    UnterminatedChar { line: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Keyword,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    Punct,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub range: SourceRange,
}

impl Token {
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == text
    }
}

const KEYWORDS: &[&str] = &[
    "auto", "bool", "break", "case", "char", "class", "const", "continue", "default", "do",
    "double", "else", "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long",
    "namespace", "operator", "private", "protected", "public", "return", "short", "signed",
    "sizeof", "static", "struct", "switch", "template", "typedef", "typename", "union",
    "unsigned", "using", "virtual", "void", "volatile", "while",
];

// Longest match first; single characters fall through to a one-char punct.
const PUNCT3: &[&str] = &["<<=", ">>=", "...", "->*"];
const PUNCT2: &[&str] = &[
    "->", "::", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=", "-=", "*=", "/=", "%=",
    "&=", "|=", "^=", "++", "--",
];

/// Tokenize a full translation unit.
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn peek_at(&self, lookahead: usize) -> Option<char> {
        self.chars.get(self.pos + lookahead).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|&(offset, _)| offset)
            .unwrap_or(self.src.len())
    }

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.offset())
    }

    fn bump(&mut self) -> Option<char> {
        let &(_, c) = self.chars.get(self.pos)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let start = self.location();
            let Some(c) = self.peek() else { break };
            let token = if c == '_' || c.is_alphabetic() {
                self.lex_word(start)
            } else if c.is_ascii_digit() || (c == '.' && self.next_is_digit()) {
                self.lex_number(start)
            } else if c == '"' {
                self.lex_string(start)?
            } else if c == '\'' {
                self.lex_char(start)?
            } else {
                self.lex_punct(start)
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_is_digit(&self) -> bool {
        self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let line = self.line;
                    self.bump();
                    self.bump();
                    let mut closed = false;
                    while let Some(c) = self.bump() {
                        if c == '*' && self.peek() == Some('/') {
                            self.bump();
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        return Err(LexError::UnterminatedComment { line });
                    }
                }
                Some('#') => self.skip_preprocessor_line(),
                _ => return Ok(()),
            }
        }
    }

    /// Consume a `#...` directive up to the end of line, honoring `\`
    /// line continuations. Included headers are not expanded.
    fn skip_preprocessor_line(&mut self) {
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    if self.peek() == Some('\r') {
                        self.bump();
                    }
                    if self.peek() == Some('\n') {
                        self.bump();
                    }
                }
                '\n' => break,
                _ => {}
            }
        }
    }

    fn lex_word(&mut self, start: SourceLocation) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '_' || c.is_alphanumeric() {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let kind = if KEYWORDS.contains(&text.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.finish(kind, text, start)
    }

    fn lex_number(&mut self, start: SourceLocation) -> Token {
        let mut text = String::new();
        let mut is_float = false;

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x') | Some('X')) {
            // hex literal
            text.push(self.bump().unwrap_or_default());
            text.push(self.bump().unwrap_or_default());
            while let Some(c) = self.peek() {
                if c.is_ascii_hexdigit() {
                    text.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
        } else {
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
            if self.peek() == Some('.') && !matches!(self.peek_at(1), Some('.')) {
                is_float = true;
                text.push('.');
                self.bump();
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        text.push(c);
                        self.bump();
                    } else {
                        break;
                    }
                }
            }
            if matches!(self.peek(), Some('e') | Some('E')) {
                let sign_ok = match self.peek_at(1) {
                    Some('+') | Some('-') => self.peek_at(2).is_some_and(|c| c.is_ascii_digit()),
                    Some(c) => c.is_ascii_digit(),
                    None => false,
                };
                if sign_ok {
                    is_float = true;
                    text.push(self.bump().unwrap_or_default());
                    if matches!(self.peek(), Some('+') | Some('-')) {
                        text.push(self.bump().unwrap_or_default());
                    }
                    while let Some(c) = self.peek() {
                        if c.is_ascii_digit() {
                            text.push(c);
                            self.bump();
                        } else {
                            break;
                        }
                    }
                }
            }
        }

        // integer/float suffixes
        while let Some(c) = self.peek() {
            match c {
                'u' | 'U' | 'l' | 'L' => {
                    text.push(c);
                    self.bump();
                }
                'f' | 'F' => {
                    is_float = true;
                    text.push(c);
                    self.bump();
                }
                _ => break,
            }
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.finish(kind, text, start)
    }

    fn lex_string(&mut self, start: SourceLocation) -> Result<Token, LexError> {
        let line = self.line;
        let mut text = String::new();
        text.push(self.bump().unwrap_or_default()); // opening quote
        loop {
            match self.bump() {
                None => return Err(LexError::UnterminatedString { line }),
                Some('\n') => return Err(LexError::UnterminatedString { line }),
                Some('\\') => {
                    text.push('\\');
                    if let Some(escaped) = self.bump() {
                        text.push(escaped);
                    }
                }
                Some('"') => {
                    text.push('"');
                    break;
                }
                Some(c) => text.push(c),
            }
        }
        Ok(self.finish(TokenKind::StringLiteral, text, start))
    }

    fn lex_char(&mut self, start: SourceLocation) -> Result<Token, LexError> {
        let line = self.line;
        let mut text = String::new();
        text.push(self.bump().unwrap_or_default()); // opening quote
        loop {
            match self.bump() {
                None => return Err(LexError::UnterminatedChar { line }),
                Some('\n') => return Err(LexError::UnterminatedChar { line }),
                Some('\\') => {
                    text.push('\\');
                    if let Some(escaped) = self.bump() {
                        text.push(escaped);
                    }
                }
                Some('\'') => {
                    text.push('\'');
                    break;
                }
                Some(c) => text.push(c),
            }
        }
        Ok(self.finish(TokenKind::CharLiteral, text, start))
    }

    fn lex_punct(&mut self, start: SourceLocation) -> Token {
        let lookahead: String = (0..3).filter_map(|i| self.peek_at(i)).collect();
        let matched = PUNCT3
            .iter()
            .find(|p| lookahead.starts_with(**p))
            .or_else(|| PUNCT2.iter().find(|p| lookahead.starts_with(**p)));
        let text = match matched {
            Some(p) => {
                for _ in 0..p.chars().count() {
                    self.bump();
                }
                (*p).to_string()
            }
            None => self.bump().map(String::from).unwrap_or_default(),
        };
        self.finish(TokenKind::Punct, text, start)
    }

    fn finish(&self, kind: TokenKind, text: String, start: SourceLocation) -> Token {
        Token {
            kind,
            text,
            range: SourceRange::new(start, self.location()),
        }
    }
}
