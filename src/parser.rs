//! Tolerant parser producing a cursor tree
//!
//! Recursive descent over the token stream from [`crate::lexer`]. The parser
//! recovers from anything it does not understand by skipping a token, so a
//! translation unit only fails outright when the lexer fails. The tree is
//! intentionally shallow: declarations, function definitions with parameter
//! and body cursors, class definitions with fields and methods, the
//! statement kinds the rules care about, and literal cursors placed under
//! their nearest enclosing declaration or statement.

use crate::ast::{Cursor, CursorKind, SourceLocation, SourceRange};
use crate::lexer::{tokenize, LexError, Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Keywords that can open a declaration statement.
const DECL_KEYWORDS: &[&str] = &[
    "auto", "bool", "char", "class", "const", "double", "enum", "extern", "float", "inline",
    "int", "long", "short", "signed", "static", "struct", "typedef", "union", "unsigned", "void",
    "volatile",
];

/// Parse a full translation unit into a cursor tree.
pub fn parse_translation_unit(src: &str) -> Result<Cursor, ParseError> {
    let tokens = tokenize(src)?;
    Ok(Parser::new(tokens).run())
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, lookahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + lookahead)
    }

    fn at_punct(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(text))
    }

    fn at_keyword(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(text))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn start_location(&self) -> SourceLocation {
        self.peek()
            .map(|t| t.range.start)
            .unwrap_or_else(|| self.end_location())
    }

    fn end_location(&self) -> SourceLocation {
        if self.pos == 0 {
            self.tokens
                .first()
                .map(|t| t.range.start)
                .unwrap_or_default()
        } else {
            self.tokens
                .get(self.pos - 1)
                .map(|t| t.range.end)
                .unwrap_or_default()
        }
    }

    fn run(mut self) -> Cursor {
        let start = self
            .tokens
            .first()
            .map(|t| t.range.start)
            .unwrap_or_default();
        let mut children = Vec::new();
        self.parse_items(&mut children, false);
        let end = self.end_location();
        let mut unit = Cursor::new(CursorKind::TranslationUnit, SourceRange::new(start, end));
        unit.children = children;
        unit
    }

    /// Top-level and namespace-body item loop.
    fn parse_items(&mut self, children: &mut Vec<Cursor>, stop_at_brace: bool) {
        while !self.at_end() {
            if stop_at_brace && self.at_punct("}") {
                self.bump();
                return;
            }
            let before = self.pos;
            if self.at_punct(";") {
                self.bump();
            } else if self.at_record_definition() {
                if let Some(record) = self.parse_record() {
                    children.push(record);
                }
            } else if self.at_keyword("namespace") {
                self.parse_namespace(children);
            } else if self.at_keyword("using") || self.at_keyword("typedef") {
                self.skip_to_semicolon();
            } else if self.at_punct("{") {
                // bare block (extern "C" bodies and the like): hoist contents
                self.bump();
                self.parse_items(children, true);
            } else if let Some(decl) = self.parse_declaration(false) {
                children.push(decl);
            }
            if self.pos == before {
                self.pos += 1; // guaranteed progress on unrecognized input
            }
        }
    }

    /// `class`/`struct` followed by a name and an opening brace.
    fn at_record_definition(&self) -> bool {
        if !(self.at_keyword("class") || self.at_keyword("struct")) {
            return false;
        }
        match (self.peek_at(1), self.peek_at(2)) {
            (Some(name), Some(brace)) => {
                name.kind == TokenKind::Identifier && brace.is_punct("{")
            }
            _ => false,
        }
    }

    fn parse_namespace(&mut self, children: &mut Vec<Cursor>) {
        self.bump(); // namespace
        while self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Identifier || t.is_punct("::"))
        {
            self.bump();
        }
        if self.at_punct("{") {
            self.bump();
            // namespace members are hoisted alongside top-level items
            self.parse_items(children, true);
        }
    }

    fn parse_record(&mut self) -> Option<Cursor> {
        let start = self.start_location();
        self.bump(); // class | struct
        let name = self.bump().map(|t| t.text); // identifier, checked by caller
        self.bump(); // {

        let mut members = Vec::new();
        while !self.at_end() && !self.at_punct("}") {
            let before = self.pos;
            if self.at_punct(";") {
                self.bump();
            } else if (self.at_keyword("public")
                || self.at_keyword("private")
                || self.at_keyword("protected"))
                && self.peek_at(1).is_some_and(|t| t.is_punct(":"))
            {
                self.bump();
                self.bump();
            } else if self.at_record_definition() {
                if let Some(nested) = self.parse_record() {
                    members.push(nested);
                }
            } else if let Some(member) = self.parse_declaration(true) {
                members.push(member);
            }
            if self.pos == before {
                self.pos += 1;
            }
        }
        if self.at_punct("}") {
            self.bump();
        }
        // trailing declarators between `}` and `;` are dropped
        self.skip_to_semicolon();

        let end = self.end_location();
        let mut record = Cursor::new(CursorKind::ClassDecl, SourceRange::new(start, end));
        record.children = members;
        if let Some(name) = name {
            record = record.with_spelling(name);
        }
        Some(record)
    }

    fn skip_to_semicolon(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            if depth == 0 && token.is_punct(";") {
                self.bump();
                return;
            }
            match token.text.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
        }
    }

    /// A top-level or member declaration: function, method, variable, field.
    fn parse_declaration(&mut self, in_class: bool) -> Option<Cursor> {
        let start = self.start_location();
        let mut last_ident: Option<String> = None;
        let mut token_count = 0usize;

        loop {
            let Some(token) = self.peek() else {
                return None;
            };
            match token.kind {
                TokenKind::Punct => match token.text.as_str() {
                    "(" if last_ident.is_some() => {
                        return self.parse_function(start, last_ident, in_class);
                    }
                    "=" => {
                        self.bump();
                        return Some(self.parse_initialized_decl(start, last_ident, in_class));
                    }
                    "," if last_ident.is_some() => {
                        // multi-declarator: remaining names fold into one cursor
                        return Some(self.parse_initialized_decl(start, last_ident, in_class));
                    }
                    ";" => {
                        self.bump();
                        if token_count >= 2 && last_ident.is_some() {
                            let kind = Self::variable_kind(in_class);
                            let end = self.end_location();
                            let mut decl = Cursor::new(kind, SourceRange::new(start, end));
                            if let Some(name) = last_ident {
                                decl = decl.with_spelling(name);
                            }
                            return Some(decl);
                        }
                        return None;
                    }
                    "{" => {
                        // stray brace without a declarator: skip the block
                        self.skip_balanced_braces();
                        return None;
                    }
                    "*" | "&" | "::" | "<" | ">" | "[" | "]" => {
                        self.bump();
                        token_count += 1;
                    }
                    _ => {
                        // not a declaration after all
                        return None;
                    }
                },
                TokenKind::Identifier => {
                    last_ident = Some(token.text.clone());
                    self.bump();
                    token_count += 1;
                }
                TokenKind::Keyword => {
                    if !DECL_KEYWORDS.contains(&token.text.as_str()) {
                        return None;
                    }
                    self.bump();
                    token_count += 1;
                }
                _ => return None,
            }
        }
    }

    fn variable_kind(in_class: bool) -> CursorKind {
        if in_class {
            CursorKind::FieldDecl
        } else {
            CursorKind::VarDecl
        }
    }

    fn skip_balanced_braces(&mut self) {
        debug_assert!(self.at_punct("{"));
        let mut depth = 0usize;
        while let Some(token) = self.bump() {
            match token.text.as_str() {
                "{" => depth += 1,
                "}" => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    /// `name = <expr> ;` with initializer literals as children.
    fn parse_initialized_decl(
        &mut self,
        start: SourceLocation,
        name: Option<String>,
        in_class: bool,
    ) -> Cursor {
        let mut literals = Vec::new();
        self.collect_expression(&mut literals, true);
        let end = self.end_location();
        let mut decl = Cursor::new(Self::variable_kind(in_class), SourceRange::new(start, end));
        decl.children = literals;
        if let Some(name) = name {
            decl = decl.with_spelling(name);
        }
        decl
    }

    fn parse_function(
        &mut self,
        start: SourceLocation,
        name: Option<String>,
        in_class: bool,
    ) -> Option<Cursor> {
        let params = self.parse_parameter_list();
        // post-declarator qualifiers (const, override, trailing return, ...)
        while !self.at_end() && !self.at_punct("{") && !self.at_punct(";") {
            self.bump();
        }

        let kind = if in_class {
            CursorKind::MethodDecl
        } else {
            CursorKind::FunctionDecl
        };
        let mut children = params;
        if self.at_punct("{") {
            children.push(self.parse_compound());
        } else if self.at_punct(";") {
            self.bump(); // prototype
        }
        let end = self.end_location();
        let mut function = Cursor::new(kind, SourceRange::new(start, end));
        function.children = children;
        if let Some(name) = name {
            function = function.with_spelling(name);
        }
        Some(function)
    }

    fn parse_parameter_list(&mut self) -> Vec<Cursor> {
        debug_assert!(self.at_punct("("));
        self.bump();
        let mut params = Vec::new();
        if self.at_punct(")") {
            self.bump();
            return params;
        }
        loop {
            let start = self.start_location();
            let mut last_ident: Option<String> = None;
            let mut literals = Vec::new();
            let mut token_count = 0usize;
            let mut lone_void = false;
            let mut depth = 0usize;

            while let Some(token) = self.peek() {
                if depth == 0 && (token.is_punct(",") || token.is_punct(")")) {
                    break;
                }
                match token.text.as_str() {
                    "(" | "[" => depth += 1,
                    ")" | "]" => depth = depth.saturating_sub(1),
                    _ => {}
                }
                match token.kind {
                    TokenKind::Identifier => last_ident = Some(token.text.clone()),
                    TokenKind::Keyword if token.text == "void" && token_count == 0 => {
                        lone_void = true
                    }
                    TokenKind::IntLiteral
                    | TokenKind::FloatLiteral
                    | TokenKind::StringLiteral
                    | TokenKind::CharLiteral => literals.push(Self::literal_cursor(token)),
                    _ => {}
                }
                token_count += 1;
                self.bump();
            }

            if token_count > 0 && !(lone_void && token_count == 1) {
                let end = self.end_location();
                let mut param = Cursor::new(CursorKind::ParmDecl, SourceRange::new(start, end));
                param.children = literals;
                if let Some(name) = last_ident {
                    param = param.with_spelling(name);
                }
                params.push(param);
            }

            if self.at_punct(",") {
                self.bump();
            } else {
                if self.at_punct(")") {
                    self.bump();
                }
                break;
            }
        }
        params
    }

    fn parse_compound(&mut self) -> Cursor {
        debug_assert!(self.at_punct("{"));
        let start = self.start_location();
        self.bump();
        let mut children = Vec::new();
        while !self.at_end() && !self.at_punct("}") {
            let before = self.pos;
            if let Some(stmt) = self.parse_statement() {
                children.push(stmt);
            }
            if self.pos == before {
                self.pos += 1;
            }
        }
        if self.at_punct("}") {
            self.bump();
        }
        let end = self.end_location();
        let mut block = Cursor::new(CursorKind::CompoundStmt, SourceRange::new(start, end));
        block.children = children;
        block
    }

    fn parse_statement(&mut self) -> Option<Cursor> {
        let token = self.peek()?;
        if token.is_punct(";") {
            self.bump();
            return None;
        }
        if token.is_punct("{") {
            return Some(self.parse_compound());
        }
        if token.is_punct("}") {
            return None;
        }
        if token.is_keyword("return") {
            return Some(self.parse_return());
        }
        if token.is_keyword("if") {
            return Some(self.parse_if());
        }
        if token.is_keyword("while") {
            return Some(self.parse_while());
        }
        if token.is_keyword("do") {
            return Some(self.parse_do());
        }
        if token.is_keyword("for") {
            return Some(self.parse_for());
        }
        if token.is_keyword("break") || token.is_keyword("continue") {
            self.bump();
            if self.at_punct(";") {
                self.bump();
            }
            return None;
        }
        if self.at_declaration_statement() {
            return Some(self.parse_declaration_statement());
        }
        Some(self.parse_expression_statement())
    }

    /// Heuristic: a statement is a declaration when it opens with a type
    /// keyword, or with two consecutive identifiers (`Foo bar`).
    fn at_declaration_statement(&self) -> bool {
        let Some(token) = self.peek() else {
            return false;
        };
        match token.kind {
            TokenKind::Keyword => DECL_KEYWORDS.contains(&token.text.as_str()),
            TokenKind::Identifier => self
                .peek_at(1)
                .is_some_and(|next| next.kind == TokenKind::Identifier),
            _ => false,
        }
    }

    fn parse_declaration_statement(&mut self) -> Cursor {
        let start = self.start_location();
        let mut name: Option<String> = None;
        let mut named = false;
        let mut literals = Vec::new();
        let mut depth = 0usize;

        while let Some(token) = self.peek() {
            if depth == 0 && token.is_punct(";") {
                self.bump();
                break;
            }
            if depth == 0 && (token.is_punct("{") || token.is_punct("}")) {
                break; // missing semicolon; let the block loop recover
            }
            match token.text.as_str() {
                "(" | "[" => depth += 1,
                ")" | "]" => depth = depth.saturating_sub(1),
                "=" => named = true,
                _ => {}
            }
            match token.kind {
                TokenKind::Identifier if !named => name = Some(token.text.clone()),
                TokenKind::IntLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral => literals.push(Self::literal_cursor(token)),
                _ => {}
            }
            self.bump();
        }

        let end = self.end_location();
        let mut decl = Cursor::new(CursorKind::VarDecl, SourceRange::new(start, end));
        decl.children = literals;
        if let Some(name) = name {
            decl = decl.with_spelling(name);
        }
        decl
    }

    fn parse_return(&mut self) -> Cursor {
        let start = self.start_location();
        self.bump(); // return
        let mut literals = Vec::new();
        self.collect_expression(&mut literals, true);
        let end = self.end_location();
        let mut stmt = Cursor::new(CursorKind::ReturnStmt, SourceRange::new(start, end));
        stmt.children = literals;
        stmt
    }

    fn parse_expression_statement(&mut self) -> Cursor {
        let start = self.start_location();
        let mut literals = Vec::new();
        self.collect_expression(&mut literals, true);
        let end = self.end_location();
        let mut stmt = Cursor::new(CursorKind::ExprStmt, SourceRange::new(start, end));
        stmt.children = literals;
        stmt
    }

    fn parse_if(&mut self) -> Cursor {
        let start = self.start_location();
        self.bump(); // if
        let mut children = Vec::new();
        self.collect_condition(&mut children);
        if let Some(then_branch) = self.parse_statement() {
            children.push(then_branch);
        }
        if self.at_keyword("else") {
            self.bump();
            if let Some(else_branch) = self.parse_statement() {
                children.push(else_branch);
            }
        }
        let end = self.end_location();
        let mut stmt = Cursor::new(CursorKind::IfStmt, SourceRange::new(start, end));
        stmt.children = children;
        stmt
    }

    fn parse_while(&mut self) -> Cursor {
        let start = self.start_location();
        self.bump(); // while
        let mut children = Vec::new();
        self.collect_condition(&mut children);
        if let Some(body) = self.parse_statement() {
            children.push(body);
        }
        let end = self.end_location();
        let mut stmt = Cursor::new(CursorKind::WhileStmt, SourceRange::new(start, end));
        stmt.children = children;
        stmt
    }

    fn parse_do(&mut self) -> Cursor {
        let start = self.start_location();
        self.bump(); // do
        let mut children = Vec::new();
        if let Some(body) = self.parse_statement() {
            children.push(body);
        }
        if self.at_keyword("while") {
            self.bump();
            self.collect_condition(&mut children);
        }
        if self.at_punct(";") {
            self.bump();
        }
        let end = self.end_location();
        let mut stmt = Cursor::new(CursorKind::DoStmt, SourceRange::new(start, end));
        stmt.children = children;
        stmt
    }

    fn parse_for(&mut self) -> Cursor {
        let start = self.start_location();
        self.bump(); // for
        let mut children = Vec::new();
        if self.at_punct("(") {
            self.bump();
            if self.at_declaration_statement() {
                children.push(self.parse_declaration_statement());
            }
            // condition and increment clauses up to the matching paren
            let mut depth = 1usize;
            while let Some(token) = self.peek() {
                if depth == 1 && token.is_punct("{") {
                    break; // unclosed paren (range-for and friends): recover at the body
                }
                match token.text.as_str() {
                    "(" => depth += 1,
                    ")" => {
                        depth -= 1;
                        if depth == 0 {
                            self.bump();
                            break;
                        }
                    }
                    _ => {}
                }
                if token.kind == TokenKind::IntLiteral
                    || token.kind == TokenKind::FloatLiteral
                    || token.kind == TokenKind::StringLiteral
                    || token.kind == TokenKind::CharLiteral
                {
                    children.push(Self::literal_cursor(token));
                }
                self.bump();
            }
        }
        if let Some(body) = self.parse_statement() {
            children.push(body);
        }
        let end = self.end_location();
        let mut stmt = Cursor::new(CursorKind::ForStmt, SourceRange::new(start, end));
        stmt.children = children;
        stmt
    }

    /// Parenthesized condition; literal cursors land in `children`.
    fn collect_condition(&mut self, children: &mut Vec<Cursor>) {
        if !self.at_punct("(") {
            return;
        }
        self.bump();
        let mut depth = 1usize;
        while let Some(token) = self.peek() {
            match token.text.as_str() {
                "(" => depth += 1,
                ")" => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                _ => {}
            }
            if matches!(
                token.kind,
                TokenKind::IntLiteral
                    | TokenKind::FloatLiteral
                    | TokenKind::StringLiteral
                    | TokenKind::CharLiteral
            ) {
                children.push(Self::literal_cursor(token));
            }
            self.bump();
        }
    }

    /// Consume an expression up to a depth-0 `;` (consumed) or a depth-0
    /// `{`/`}` (left in place for the statement loop).
    fn collect_expression(&mut self, literals: &mut Vec<Cursor>, stop_at_brace: bool) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            if depth == 0 {
                if token.is_punct(";") {
                    self.bump();
                    return;
                }
                if stop_at_brace && (token.is_punct("{") || token.is_punct("}")) {
                    return;
                }
            }
            match token.text.as_str() {
                "(" | "[" => depth += 1,
                ")" | "]" => depth = depth.saturating_sub(1),
                _ => {}
            }
            if matches!(
                token.kind,
                TokenKind::IntLiteral
                    | TokenKind::FloatLiteral
                    | TokenKind::StringLiteral
                    | TokenKind::CharLiteral
            ) {
                literals.push(Self::literal_cursor(token));
            }
            self.bump();
        }
    }

    fn literal_cursor(token: &Token) -> Cursor {
        let kind = match token.kind {
            TokenKind::IntLiteral => CursorKind::IntegerLiteral,
            TokenKind::FloatLiteral => CursorKind::FloatingLiteral,
            TokenKind::StringLiteral => CursorKind::StringLiteral,
            _ => CursorKind::CharLiteral,
        };
        Cursor::new(kind, token.range).with_spelling(token.text.clone())
    }
}
