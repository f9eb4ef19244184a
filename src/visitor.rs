//! Stack-based cursor traversal and diagnostic collection
//!
//! The visitor walks a parsed translation unit depth-first, keeping the
//! ancestor kinds on an explicit stack so rules can inspect their context,
//! and turns rule reports into [`Diagnostic`] records with the offending
//! code excerpt attached.

use crate::ast::{Cursor, CursorKind};
use crate::rules::Lint;
use crate::source_cache::SourceCache;
use std::path::{Path, PathBuf};

/// Maximum excerpt length carried in a diagnostic.
const SNIPPET_LIMIT: usize = 32;

/// A single rule finding at a source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub rule_id: String,
    pub rule_name: String,
    pub message: String,
    pub cursor_kind: CursorKind,
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    pub snippet: Option<String>,
}

impl Diagnostic {
    /// One-line rendering used by the text report.
    pub fn render(&self) -> String {
        format!(
            "{}:{}:{} [{}] {}: {}",
            self.file.display(),
            self.line,
            self.column,
            self.rule_id,
            self.rule_name,
            self.message
        )
    }
}

/// Traversal context handed to every [`Lint`] check.
pub struct AstVisitor<'a> {
    cache: &'a mut SourceCache,
    file: PathBuf,
    stack: Vec<CursorKind>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> AstVisitor<'a> {
    pub fn new(cache: &'a mut SourceCache, file: impl Into<PathBuf>) -> Self {
        Self {
            cache,
            file: file.into(),
            stack: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Kind of the immediate parent of the cursor under inspection.
    pub fn parent_kind(&self) -> Option<CursorKind> {
        self.stack.last().copied()
    }

    /// Depth of the cursor under inspection (0 at the translation unit).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Record a finding against `cursor`.
    pub fn report(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        message: impl Into<String>,
        cursor: &Cursor,
    ) {
        let snippet = self
            .cache
            .code_segment(
                &self.file,
                cursor.range.start.offset,
                cursor.range.len(),
            )
            .ok()
            .map(flatten_snippet);
        self.diagnostics.push(Diagnostic {
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            message: message.into(),
            cursor_kind: cursor.kind,
            file: self.file.clone(),
            line: cursor.range.start.line,
            column: cursor.range.start.column,
            snippet,
        });
    }

    /// Run every rule over every cursor of the tree, parents first.
    pub fn walk(&mut self, root: &Cursor, rules: &[Box<dyn Lint>]) {
        for rule in rules {
            rule.check(self, root);
        }
        self.stack.push(root.kind);
        for child in &root.children {
            self.walk(child, rules);
        }
        self.stack.pop();
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// Clamp an excerpt to [`SNIPPET_LIMIT`] characters and flatten whitespace.
fn flatten_snippet(code: &str) -> String {
    let mut snippet: String = code.chars().take(SNIPPET_LIMIT).collect();
    if code.chars().count() > SNIPPET_LIMIT {
        snippet.push_str("...");
    }
    snippet
        .replace('\n', " ")
        .replace('\t', " ")
        .replace('\r', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{SourceLocation, SourceRange};
    use crate::parser::parse_translation_unit;
    use crate::rules::Lint;

    struct LiteralSpy;

    impl Lint for LiteralSpy {
        fn name(&self) -> &'static str {
            "literal_spy"
        }

        fn check(&self, visitor: &mut AstVisitor, cursor: &Cursor) {
            if cursor.kind == CursorKind::IntegerLiteral {
                let parent = visitor
                    .parent_kind()
                    .map(|k| k.as_str().to_string())
                    .unwrap_or_default();
                visitor.report("TST-000000", "literal_spy", parent, cursor);
            }
        }
    }

    #[test]
    fn test_walk_reports_with_parent_context() {
        let src = "const int LIMIT = 4096;\nint f() { return 77; }\n";
        let mut cache = SourceCache::new();
        cache.insert_virtual("<mem>", src);
        let unit = parse_translation_unit(src).unwrap();

        let mut visitor = AstVisitor::new(&mut cache, "<mem>");
        let rules: Vec<Box<dyn Lint>> = vec![Box::new(LiteralSpy)];
        visitor.walk(&unit, &rules);

        let diagnostics = visitor.into_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].message, "VarDecl");
        assert_eq!(diagnostics[0].snippet.as_deref(), Some("4096"));
        assert_eq!(diagnostics[1].message, "ReturnStmt");
        assert_eq!(diagnostics[1].line, 2);
    }

    #[test]
    fn test_render_line() {
        let diagnostic = Diagnostic {
            rule_id: "CPP-000003".to_string(),
            rule_name: "magic_number_usage".to_string(),
            message: "magic number 100.0 should not be used".to_string(),
            cursor_kind: CursorKind::FloatingLiteral,
            file: PathBuf::from("demo.cpp"),
            line: 14,
            column: 31,
            snippet: Some("100.0".to_string()),
        };
        assert_eq!(
            diagnostic.render(),
            "demo.cpp:14:31 [CPP-000003] magic_number_usage: magic number 100.0 should not be used"
        );
    }

    #[test]
    fn test_snippet_truncation() {
        let long = "a".repeat(40);
        let flattened = flatten_snippet(&long);
        assert_eq!(flattened.len(), SNIPPET_LIMIT + 3);
        assert!(flattened.ends_with("..."));
    }

    #[test]
    fn test_snippet_flattens_whitespace() {
        assert_eq!(flatten_snippet("a\n\tb\rc"), "a  b c");
    }

    #[test]
    fn test_report_survives_missing_source() {
        let mut cache = SourceCache::new();
        let mut visitor = AstVisitor::new(&mut cache, "<gone>");
        let cursor = Cursor::new(
            CursorKind::IntegerLiteral,
            SourceRange::new(
                SourceLocation::new(1, 1, 0),
                SourceLocation::new(1, 3, 2),
            ),
        );
        visitor.report("TST-000000", "spy", "msg", &cursor);
        assert_eq!(visitor.diagnostics().len(), 1);
        assert!(visitor.diagnostics()[0].snippet.is_none());
    }
}
