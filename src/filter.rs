//! Rule filtering for -e rules= expressions (Sprint 4)
//!
//! Supports:
//! - Individual rules by name: -e rules=magic_number_usage,too_long_func_body
//! - Rules by id: -e rules=CPP-000003
//! - Regex patterns over rule names: -e rules=/^too_/

use anyhow::{bail, Result};
use regex::Regex;
use std::collections::HashSet;

/// Rule filter that determines which lint rules run.
#[derive(Debug, Clone, Default)]
pub struct RuleFilter {
    /// Exact rule names or ids to include (`None` = all rules).
    include: Option<HashSet<String>>,
    /// Regex patterns matched against rule names.
    patterns: Vec<Regex>,
}

impl RuleFilter {
    /// Create a filter that runs every rule.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse a filter expression like "rules=magic_number_usage" or
    /// "rules=/^too_/".
    pub fn from_expr(expr: &str) -> Result<Self> {
        if let Some(spec) = expr.strip_prefix("rules=") {
            Self::from_rule_spec(spec)
        } else {
            bail!(
                "Invalid filter expression: {}. Expected format: rules=SPEC",
                expr
            );
        }
    }

    /// Parse a rule specification (the part after "rules=").
    fn from_rule_spec(spec: &str) -> Result<Self> {
        let mut include = HashSet::new();
        let mut patterns = Vec::new();

        for part in spec.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some(pattern) = part.strip_prefix('/').and_then(|p| p.strip_suffix('/')) {
                match Regex::new(pattern) {
                    Ok(regex) => patterns.push(regex),
                    Err(err) => bail!("Invalid regex pattern /{}/: {}", pattern, err),
                }
            } else {
                include.insert(part.to_string());
            }
        }

        Ok(Self {
            include: Some(include),
            patterns,
        })
    }

    /// Whether a rule with the given id and name should run.
    pub fn should_run(&self, rule_id: &str, rule_name: &str) -> bool {
        let Some(include) = &self.include else {
            return true;
        };
        if include.contains(rule_id) || include.contains(rule_name) {
            return true;
        }
        self.patterns.iter().any(|p| p.is_match(rule_name))
    }
}
