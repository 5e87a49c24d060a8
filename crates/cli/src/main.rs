mod config_file;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use simpleopt::{ArgParser, ParserConfig};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config_file::{load_config, write_default_config};
use crate::report::Report;

#[derive(Parser)]
#[command(name = "simpleopt")]
#[command(version, about = "Split command-line tokens into flags and positional arguments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse tokens with the built-in sample configuration (-t/--toggle, -f/--foobar)
    Demo(DemoArgs),

    /// Parse tokens with a parser configuration file
    Run(RunArgs),

    /// Write the sample parser configuration to simpleopt.json
    Init(InitArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
struct DemoArgs {
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Tokens to parse (put them after `--`)
    #[arg(value_name = "TOKENS", trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct RunArgs {
    /// Path to the parser configuration (default: ./simpleopt.json)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Tokens to parse (put them after `--`)
    #[arg(value_name = "TOKENS", trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct InitArgs {
    /// Directory to write simpleopt.json into (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Replace an existing simpleopt.json
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Demo(args) => demo(args)?,
        Commands::Run(args) => run(args)?,
        Commands::Init(args) => {
            init(args)?;
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn demo(args: DemoArgs) -> Result<bool> {
    tracing::debug!(tokens = args.tokens.len(), "executing demo command");
    let mut parser = ArgParser::from_config(&ParserConfig::demo());
    parse_and_report(&mut parser, &args.tokens, args.format)
}

fn run(args: RunArgs) -> Result<bool> {
    tracing::debug!(tokens = args.tokens.len(), "executing run command");
    let loaded = load_config(args.config.as_deref())?;
    let mut parser = ArgParser::from_config(&loaded.config);
    parse_and_report(&mut parser, &args.tokens, args.format)
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let (path, written) = write_default_config(&dir, args.force)?;
    if written {
        eprintln!("Created: {}", path.display());
        eprintln!("\nNext steps:");
        eprintln!("  1. Edit {} to declare your flags", display_name(&path));
        eprintln!("  2. Run: simpleopt run -- <tokens>");
    } else {
        eprintln!(
            "{} already exists (use --force to replace it)",
            path.display()
        );
    }
    Ok(())
}

/// Parse `tokens` and print the report. Returns whether parsing succeeded.
fn parse_and_report(parser: &mut ArgParser, tokens: &[String], format: OutputFormat) -> Result<bool> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let ok = match format {
        OutputFormat::Text => {
            let ok = parser
                .parse_to(tokens, &mut out)
                .context("failed to write to stdout")?;
            writeln!(out)?;
            out.write_all(Report::new(parser, None).render_text().as_bytes())?;
            ok
        }
        OutputFormat::Json => {
            let result = parser.try_parse(tokens);
            let report = Report::new(parser, result.as_ref().err());
            serde_json::to_writer_pretty(&mut out, &report)
                .context("failed to write JSON report")?;
            writeln!(out)?;
            result.is_ok()
        }
    };

    out.flush()?;
    tracing::debug!(ok, "parse finished");
    Ok(ok)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
