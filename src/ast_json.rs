//! Cursor tree dump in JSON format (--dump-ast)
//!
//! Mirrors the report excerpt conventions: every node carries its kind, its
//! position, and a code snippet truncated to 32 characters with whitespace
//! flattened.

use crate::ast::Cursor;
use crate::source_cache::SourceCache;
use serde_json::{json, Map, Value};
use std::path::Path;

const SNIPPET_LIMIT: usize = 32;

/// Dump a parsed translation unit as a JSON value.
pub fn dump_translation_unit(cache: &mut SourceCache, file: &Path, root: &Cursor) -> Value {
    dump_cursor(cache, file, root)
}

fn dump_cursor(cache: &mut SourceCache, file: &Path, cursor: &Cursor) -> Value {
    let mut node = Map::new();
    node.insert("kind".to_string(), json!(cursor.kind.as_str()));
    if let Some(spelling) = &cursor.spelling {
        node.insert("spelling".to_string(), json!(spelling));
    }

    let start = cursor.range.start;
    let mut range = Map::new();
    range.insert("file".to_string(), json!(file.display().to_string()));
    range.insert("line".to_string(), json!(start.line));
    range.insert("cols".to_string(), json!(start.column));
    if let Ok(code) = cache.code_segment(file, start.offset, cursor.range.len()) {
        range.insert("code".to_string(), json!(clip(code)));
    }
    node.insert("range".to_string(), Value::Object(range));

    let children: Vec<Value> = cursor
        .children
        .iter()
        .map(|child| dump_cursor(cache, file, child))
        .collect();
    if !children.is_empty() {
        node.insert("children".to_string(), Value::Array(children));
    }
    Value::Object(node)
}

fn clip(code: &str) -> String {
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
    use crate::parser::parse_translation_unit;

    #[test]
    fn test_dump_shape() {
        let src = "const int EXIT_OK = 0;\n";
        let mut cache = SourceCache::new();
        cache.insert_virtual("<dump>", src);
        let unit = parse_translation_unit(src).unwrap();

        let value = dump_translation_unit(&mut cache, Path::new("<dump>"), &unit);
        assert_eq!(value["kind"], "TranslationUnit");
        assert_eq!(value["range"]["file"], "<dump>");
        assert_eq!(value["range"]["line"], 1);

        let decl = &value["children"][0];
        assert_eq!(decl["kind"], "VarDecl");
        assert_eq!(decl["spelling"], "EXIT_OK");
        assert_eq!(decl["children"][0]["kind"], "IntegerLiteral");
        assert_eq!(decl["children"][0]["range"]["code"], "0");
    }

    #[test]
    fn test_dump_clips_long_code() {
        let src = "int f() { return a + b + c + d + e + f + g + h; }\n";
        let mut cache = SourceCache::new();
        cache.insert_virtual("<dump>", src);
        let unit = parse_translation_unit(src).unwrap();

        let value = dump_translation_unit(&mut cache, Path::new("<dump>"), &unit);
        let code = value["children"][0]["range"]["code"].as_str().unwrap();
        assert!(code.ends_with("..."));
        assert!(!code.contains('\n'));
    }
}
