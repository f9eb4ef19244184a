//! Cursor tree for C/C++ translation units
//!
//! The parser produces a lightweight tree of [`Cursor`] nodes modeled after
//! libclang cursors: every node carries a kind, a source range, an optional
//! spelling, and its children. Lint rules and the AST dump both operate on
//! this tree.

use std::fmt;

/// A position inside a source file.
///
/// Lines and columns are 1-based, the byte offset is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

/// A half-open `[start, end)` region of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceRange {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered by the range.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of line breaks between the start and the end of the range.
    pub fn line_span(&self) -> u32 {
        self.end.line.saturating_sub(self.start.line)
    }
}

/// The syntactic category of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    TranslationUnit,
    FunctionDecl,
    MethodDecl,
    ParmDecl,
    CompoundStmt,
    ClassDecl,
    FieldDecl,
    VarDecl,
    ReturnStmt,
    IfStmt,
    WhileStmt,
    DoStmt,
    ForStmt,
    ExprStmt,
    IntegerLiteral,
    FloatingLiteral,
    StringLiteral,
    CharLiteral,
}

impl CursorKind {
    /// Stable name used in reports and the AST dump.
    pub fn as_str(self) -> &'static str {
        match self {
            CursorKind::TranslationUnit => "TranslationUnit",
            CursorKind::FunctionDecl => "FunctionDecl",
            CursorKind::MethodDecl => "MethodDecl",
            CursorKind::ParmDecl => "ParmDecl",
            CursorKind::CompoundStmt => "CompoundStmt",
            CursorKind::ClassDecl => "ClassDecl",
            CursorKind::FieldDecl => "FieldDecl",
            CursorKind::VarDecl => "VarDecl",
            CursorKind::ReturnStmt => "ReturnStmt",
            CursorKind::IfStmt => "IfStmt",
            CursorKind::WhileStmt => "WhileStmt",
            CursorKind::DoStmt => "DoStmt",
            CursorKind::ForStmt => "ForStmt",
            CursorKind::ExprStmt => "ExprStmt",
            CursorKind::IntegerLiteral => "IntegerLiteral",
            CursorKind::FloatingLiteral => "FloatingLiteral",
            CursorKind::StringLiteral => "StringLiteral",
            CursorKind::CharLiteral => "CharLiteral",
        }
    }

    /// True for function-like declarations (free functions and methods).
    pub fn is_function_like(self) -> bool {
        matches!(self, CursorKind::FunctionDecl | CursorKind::MethodDecl)
    }

    /// True for numeric literal cursors.
    pub fn is_numeric_literal(self) -> bool {
        matches!(
            self,
            CursorKind::IntegerLiteral | CursorKind::FloatingLiteral
        )
    }
}

impl fmt::Display for CursorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the parsed translation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub kind: CursorKind,
    /// Declared name for declarations, literal text for literal cursors.
    pub spelling: Option<String>,
    pub range: SourceRange,
    pub children: Vec<Cursor>,
}

impl Cursor {
    pub fn new(kind: CursorKind, range: SourceRange) -> Self {
        Self {
            kind,
            spelling: None,
            range,
            children: Vec::new(),
        }
    }

    pub fn with_spelling(mut self, spelling: impl Into<String>) -> Self {
        self.spelling = Some(spelling.into());
        self
    }

    pub fn push_child(&mut self, child: Cursor) {
        self.children.push(child);
    }

    /// First child of the given kind, if any.
    pub fn child_of_kind(&self, kind: CursorKind) -> Option<&Cursor> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Number of children of the given kind.
    pub fn count_children(&self, kind: CursorKind) -> usize {
        self.children.iter().filter(|c| c.kind == kind).count()
    }

    /// Pre-order traversal over the subtree rooted at this cursor.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Iterator returned by [`Cursor::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Cursor>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Cursor;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.stack.pop()?;
        // reversed so children come out in source order
        self.stack.extend(cursor.children.iter().rev());
        Some(cursor)
    }
}
