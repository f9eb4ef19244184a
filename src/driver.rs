//! Lint session orchestration
//!
//! A session walks the requested sources, parses each translation unit, runs
//! the filtered rule set through the visitor, and renders the report in the
//! requested format. Files that fail to decode or parse are logged, counted
//! against the pass rate, and never abort the session.

use crate::ast_json::dump_translation_unit;
use crate::cli::OutputFormat;
use crate::config::LintConfig;
use crate::filter::RuleFilter;
use crate::json_output::JsonOutput;
use crate::parser::parse_translation_unit;
use crate::rules::{default_rules, rule_catalog, Lint};
use crate::samples::embedded_samples;
use crate::source_cache::SourceCache;
use crate::stats::{percent, StatsTracker};
use crate::visitor::{AstVisitor, Diagnostic};
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Configuration for one lint session.
pub struct LintOptions {
    pub config: LintConfig,
    pub filter: RuleFilter,
    pub format: OutputFormat,
    pub summary_mode: bool,
    pub dump_ast: bool,
    pub output: Option<PathBuf>,
}

impl LintOptions {
    pub fn new(config: LintConfig, filter: RuleFilter) -> Self {
        Self {
            config,
            filter,
            format: OutputFormat::Text,
            summary_mode: false,
            dump_ast: false,
            output: None,
        }
    }
}

/// Outcome of a lint session, before rendering.
#[derive(Debug)]
pub struct SessionReport {
    pub diagnostics: Vec<Diagnostic>,
    pub files_checked: u64,
    pub files_failed: u64,
    pub duration: Duration,
    /// Per-file AST dumps collected in --dump-ast mode.
    pub ast_dumps: Vec<(PathBuf, serde_json::Value)>,
    /// Per-file diagnostic counts in session order.
    pub per_file: Vec<(PathBuf, u64)>,
}

/// Lint a file or directory tree on disk.
pub fn lint_path(root: &Path, options: &LintOptions) -> Result<SessionReport> {
    let mut cache = SourceCache::new();
    let files = if root.is_dir() {
        cache.source_files_in(root)
    } else if cache.is_source_file(root) {
        vec![root.to_path_buf()]
    } else {
        bail!("not a C/C++ source file or directory: {}", root.display());
    };
    run_session(&mut cache, &files, options)
}

/// Lint the embedded sample translation units (--self-check).
pub fn lint_samples(options: &LintOptions) -> Result<SessionReport> {
    let mut cache = SourceCache::new();
    let mut files = Vec::new();
    for (path, code) in embedded_samples() {
        cache.insert_virtual(path, code);
        files.push(PathBuf::from(path));
    }
    run_session(&mut cache, &files, options)
}

fn run_session(
    cache: &mut SourceCache,
    files: &[PathBuf],
    options: &LintOptions,
) -> Result<SessionReport> {
    let rules = filtered_rules(options);
    let started = Instant::now();
    let mut report = SessionReport {
        diagnostics: Vec::new(),
        files_checked: 0,
        files_failed: 0,
        duration: Duration::ZERO,
        ast_dumps: Vec::new(),
        per_file: Vec::new(),
    };

    for file in files {
        let code = match cache.code_of_file(file) {
            Ok(code) => code.to_string(),
            Err(err) => {
                tracing::error!("cannot read {}: {}", file.display(), err);
                report.files_failed += 1;
                continue;
            }
        };
        let unit = match parse_translation_unit(&code) {
            Ok(unit) => unit,
            Err(err) => {
                tracing::error!("cannot parse {}: {}", file.display(), err);
                report.files_failed += 1;
                continue;
            }
        };
        report.files_checked += 1;

        if options.dump_ast {
            let dump = dump_translation_unit(cache, file, &unit);
            report.ast_dumps.push((file.clone(), dump));
            continue;
        }

        let mut visitor = AstVisitor::new(cache, file.clone());
        visitor.walk(&unit, &rules);
        let found = visitor.into_diagnostics();
        tracing::debug!("{}: {} diagnostics", file.display(), found.len());
        report.per_file.push((file.clone(), found.len() as u64));
        report.diagnostics.extend(found);
    }

    report.duration = started.elapsed();
    Ok(report)
}

/// Instantiate the built-in rules that survive the filter.
fn filtered_rules(options: &LintOptions) -> Vec<Box<dyn Lint>> {
    let catalog = rule_catalog();
    default_rules(&options.config)
        .into_iter()
        .zip(catalog)
        .filter(|(_, (id, name))| options.filter.should_run(id, name))
        .map(|(rule, _)| rule)
        .collect()
}

/// Render a finished session to the configured destination.
pub fn render_report(report: &SessionReport, options: &LintOptions) -> Result<()> {
    let mut out: Box<dyn Write> = match &options.output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    if options.dump_ast {
        for (file, dump) in &report.ast_dumps {
            writeln!(out, "{}", serde_json::to_string_pretty(&json_dump(file, dump))?)?;
        }
        return Ok(());
    }

    match options.format {
        OutputFormat::Json => {
            let output = JsonOutput::new(
                &report.diagnostics,
                report.files_checked,
                report.files_failed,
                report.duration.as_secs(),
            );
            writeln!(out, "{}", output.render()?)?;
        }
        OutputFormat::Text => {
            if options.summary_mode {
                let mut tracker = StatsTracker::new();
                for diagnostic in &report.diagnostics {
                    tracker.record(&diagnostic.rule_id, &diagnostic.rule_name);
                }
                tracker.write_summary(&mut out)?;
            } else {
                let mut rendered = 0usize;
                for (file, count) in &report.per_file {
                    for diagnostic in report
                        .diagnostics
                        .iter()
                        .skip(rendered)
                        .take(*count as usize)
                    {
                        writeln!(out, "{}", diagnostic.render())?;
                    }
                    rendered += *count as usize;
                    if *count > 0 {
                        writeln!(out, "\tFind {} errors in: {}", count, file.display())?;
                    }
                }
            }
            writeln!(
                out,
                "\n{} pass; {} fail; {}% using {} seconds.",
                report.files_checked,
                report.files_failed,
                percent(report.files_checked, report.files_failed),
                report.duration.as_secs()
            )?;
        }
    }
    Ok(())
}

fn json_dump(file: &Path, dump: &serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "file": file.display().to_string(),
        "ast": dump,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn options() -> LintOptions {
        LintOptions::new(LintConfig::default(), RuleFilter::all())
    }

    #[test]
    fn test_lint_samples_finds_magic_threshold() {
        let report = lint_samples(&options()).unwrap();
        assert_eq!(report.files_checked, 2);
        assert_eq!(report.files_failed, 0);
        // both samples carry the bare 100.0 comparison in add()
        let magic: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.rule_name == "magic_number_usage")
            .collect();
        assert_eq!(magic.len(), 2);
        assert!(magic.iter().all(|d| d.snippet.as_deref() == Some("100.0")));
    }

    #[test]
    fn test_lint_samples_respects_filter() {
        let mut opts = options();
        opts.filter = RuleFilter::from_expr("rules=too_long_func_body").unwrap();
        let report = lint_samples(&opts).unwrap();
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_lint_path_over_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("many.cpp"),
            "int f(int a, int b, int c, int d, int e) { return 0; }\n",
        )
        .unwrap();
        fs::write(dir.path().join("ok.cpp"), "int g() { return 0; }\n").unwrap();

        let report = lint_path(dir.path(), &options()).unwrap();
        assert_eq!(report.files_checked, 2);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].rule_id, "CPP-000001");
    }

    #[test]
    fn test_lint_path_counts_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.cpp"), "int x; /* open\n").unwrap();
        fs::write(dir.path().join("good.cpp"), "int g();\n").unwrap();

        let report = lint_path(dir.path(), &options()).unwrap();
        assert_eq!(report.files_checked, 1);
        assert_eq!(report.files_failed, 1);
    }

    #[test]
    fn test_lint_path_rejects_non_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "x").unwrap();
        assert!(lint_path(&path, &options()).is_err());
    }

    #[test]
    fn test_dump_ast_mode_collects_dumps() {
        let mut opts = options();
        opts.dump_ast = true;
        let report = lint_samples(&opts).unwrap();
        assert_eq!(report.ast_dumps.len(), 2);
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.ast_dumps[0].1["kind"], "TranslationUnit");
    }

    #[test]
    fn test_render_text_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("report.txt");
        let mut opts = options();
        opts.output = Some(out_path.clone());

        let report = lint_samples(&opts).unwrap();
        render_report(&report, &opts).unwrap();

        let text = fs::read_to_string(&out_path).unwrap();
        assert!(text.contains("magic_number_usage"));
        assert!(text.contains("Find 1 errors in: <sample:basic.cpp>"));
        assert!(text.contains("2 pass; 0 fail; 100% using"));
    }

    #[test]
    fn test_render_json_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("report.json");
        let mut opts = options();
        opts.format = OutputFormat::Json;
        opts.output = Some(out_path.clone());

        let report = lint_samples(&opts).unwrap();
        render_report(&report, &opts).unwrap();

        let text = fs::read_to_string(&out_path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["format"], "revisar-json-v1");
        assert_eq!(parsed["summary"]["files_checked"], 2);
    }
}
