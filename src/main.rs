use anyhow::Result;
use clap::Parser;
use revisar::cli::{Cli, OutputFormat};
use revisar::config::LintConfig;
use revisar::driver::{self, LintOptions};
use revisar::filter::RuleFilter;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Resolve the session configuration from file and CLI overrides
fn resolve_config(args: &Cli) -> Result<LintConfig> {
    let mut config = match &args.config {
        Some(path) => LintConfig::from_file(path)?,
        None => LintConfig::default(),
    };
    if let Some(max_body_lines) = args.max_body_lines {
        config.max_body_lines = max_body_lines;
    }
    if let Some(max_params) = args.max_params {
        config.max_params = max_params;
    }
    config.ignore_numbers.extend(&args.ignore_numbers);
    Ok(config)
}

/// Greeting line printed ahead of text reports; JSON stays machine-clean
fn print_banner(options: &LintOptions) {
    if options.format == OutputFormat::Text && !options.dump_ast {
        println!("Hello, revisar.");
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = resolve_config(&args)?;
    let filter = match &args.filter {
        Some(expr) => RuleFilter::from_expr(expr)?,
        None => RuleFilter::all(),
    };

    let mut options = LintOptions::new(config, filter);
    options.format = args.format;
    options.summary_mode = args.statistics;
    options.dump_ast = args.dump_ast;
    options.output = args.output.clone();

    // Either lint a path or the embedded samples (mutually exclusive)
    let report = match (&args.path, args.self_check) {
        (Some(_), true) => {
            anyhow::bail!("Cannot specify both PATH and --self-check. Choose one.");
        }
        (None, false) => {
            // no inputs: greet and exit clean
            println!("Hello, revisar.");
            return Ok(());
        }
        (None, true) => {
            print_banner(&options);
            driver::lint_samples(&options)?
        }
        (Some(path), false) => {
            print_banner(&options);
            driver::lint_path(path, &options)?
        }
    };

    driver::render_report(&report, &options)?;
    Ok(())
}
