//! Built-in lint rules
//!
//! Every rule implements [`Lint`] and is called once per cursor during the
//! visitor walk. Rule identifiers are stable wire constants used by the
//! JSON report and the `-e rules=` filter.

use crate::ast::{Cursor, CursorKind};
use crate::config::{LintConfig, BASE_IGNORE_NUMBERS};
use crate::visitor::AstVisitor;

/// A single lint check over one cursor.
pub trait Lint {
    /// Stable rule name, also the filter key.
    fn name(&self) -> &'static str;

    fn check(&self, visitor: &mut AstVisitor, cursor: &Cursor);
}

/// `CPP-000000`: function bodies longer than a line budget.
pub struct FuncBodySizeLint {
    max_body_lines: u32,
}

impl FuncBodySizeLint {
    pub const ID: &'static str = "CPP-000000";
    pub const NAME: &'static str = "too_long_func_body";

    pub fn new(max_body_lines: u32) -> Self {
        Self { max_body_lines }
    }
}

impl Lint for FuncBodySizeLint {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, visitor: &mut AstVisitor, cursor: &Cursor) {
        if !cursor.kind.is_function_like() {
            return;
        }
        for child in &cursor.children {
            if child.kind != CursorKind::CompoundStmt {
                continue;
            }
            let length = child.range.line_span();
            if self.max_body_lines > 0 && length > self.max_body_lines {
                visitor.report(
                    Self::ID,
                    Self::NAME,
                    format!("too long function body: {length} lines"),
                    child,
                );
            }
        }
    }
}

/// `CPP-000001`: functions taking too many parameters.
pub struct FuncParamCountLint {
    max_params: u32,
}

impl FuncParamCountLint {
    pub const ID: &'static str = "CPP-000001";
    pub const NAME: &'static str = "too_many_params_in_func";

    pub fn new(max_params: u32) -> Self {
        Self { max_params }
    }
}

impl Lint for FuncParamCountLint {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, visitor: &mut AstVisitor, cursor: &Cursor) {
        if !cursor.kind.is_function_like() {
            return;
        }
        let param_count = cursor.count_children(CursorKind::ParmDecl) as u32;
        if self.max_params > 0 && param_count > self.max_params {
            visitor.report(
                Self::ID,
                Self::NAME,
                format!("there are too many parameters in func: {param_count} params found"),
                cursor,
            );
        }
    }
}

/// `CPP-000003`: numeric literals used outside a variable declaration.
pub struct MagicNumberLint {
    ignore_numbers: Vec<f64>,
}

impl MagicNumberLint {
    pub const ID: &'static str = "CPP-000003";
    pub const NAME: &'static str = "magic_number_usage";

    pub fn new(extra_ignored: &[f64]) -> Self {
        let mut ignore_numbers: Vec<f64> = BASE_IGNORE_NUMBERS.to_vec();
        ignore_numbers.extend_from_slice(extra_ignored);
        Self { ignore_numbers }
    }

    fn is_ignored_int(&self, value: i64) -> bool {
        if value.abs() < 10 {
            return true;
        }
        if self
            .ignore_numbers
            .iter()
            .any(|&n| n == value as f64 || n == -(value as f64))
        {
            return true;
        }
        value % 10 == 0 || value % 1024 == 0
    }

    fn is_ignored_float(&self, value: f64) -> bool {
        if value.abs() < 10.0 {
            return true;
        }
        self.ignore_numbers
            .iter()
            .any(|&n| n == value || n == -value)
    }
}

impl Lint for MagicNumberLint {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, visitor: &mut AstVisitor, cursor: &Cursor) {
        if !cursor.kind.is_numeric_literal() || visitor.parent_kind().is_none() {
            return;
        }
        let Some(spelling) = cursor.spelling.as_deref() else {
            return;
        };
        // plain decimal literals only; hex and suffixed forms are skipped
        let ignorable = match cursor.kind {
            CursorKind::IntegerLiteral => match spelling.parse::<i64>() {
                Ok(value) => self.is_ignored_int(value),
                Err(_) => return,
            },
            _ => match spelling.parse::<f64>() {
                Ok(value) => self.is_ignored_float(value),
                Err(_) => return,
            },
        };
        if ignorable {
            return;
        }
        // TODO: also ignore field and parameter default initializers
        if visitor.parent_kind() != Some(CursorKind::VarDecl) {
            visitor.report(
                Self::ID,
                Self::NAME,
                format!("magic number {spelling} should not be used"),
                cursor,
            );
        }
    }
}

/// The full rule set configured from `config`.
pub fn default_rules(config: &LintConfig) -> Vec<Box<dyn Lint>> {
    vec![
        Box::new(FuncBodySizeLint::new(config.max_body_lines)),
        Box::new(FuncParamCountLint::new(config.max_params)),
        Box::new(MagicNumberLint::new(&config.ignore_numbers)),
    ]
}

/// `(id, name)` pairs for every built-in rule, used by the filter.
pub fn rule_catalog() -> Vec<(&'static str, &'static str)> {
    vec![
        (FuncBodySizeLint::ID, FuncBodySizeLint::NAME),
        (FuncParamCountLint::ID, FuncParamCountLint::NAME),
        (MagicNumberLint::ID, MagicNumberLint::NAME),
    ]
}
