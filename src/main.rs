mod commands;
mod core;
mod icon;
mod package;
mod release;
mod sample;
mod ui;
mod utils;
mod wrap;

use clap::{Parser, Subcommand, ValueEnum};
use core::config::DependencyMode;
use core::context::ReleaseContext;
use core::error::{ReleaseError, print_error};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Release tooling for FEIS: version bumps, release archives, icons and build helpers
#[derive(Parser)]
#[command(name = "feis-release")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Project root (default: current directory)
  #[arg(long, global = true, value_name = "DIR")]
  root: Option<PathBuf>,

  /// Configuration file (default: release.toml under the root, if present)
  #[arg(long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Diagnostic log level (RUST_LOG takes precedence when set)
  #[arg(long, global = true, value_enum, default_value = "warn")]
  log_level: LogLevel,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Set the project version, then commit and tag it
  Bump {
    /// New version, e.g. 1.4.0 or 1.4.0-beta
    #[arg(id = "new_version", value_name = "VERSION")]
    version: String,
    /// Rewrite metadata files but do not commit or tag
    #[arg(long)]
    dry_run: bool,
    /// Create an annotated tag instead of a lightweight one
    #[arg(long)]
    annotate: bool,
    /// Output the result in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Build the release archive from a compiled binary
  Package {
    /// Release name (default: `git describe --tags`)
    #[arg(long)]
    release_version: Option<String>,
    /// Directory holding the compiled binary
    #[arg(long)]
    build_dir: Option<PathBuf>,
    /// Append a UTC timestamp to the archive name
    #[arg(long)]
    timestamp: bool,
    /// Where the staging directory and archive are written
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// How a failing dependency-copy script is treated
    #[arg(long, value_enum)]
    deps: Option<DependencyMode>,
    /// Merge into an existing staging directory instead of recreating it
    #[arg(long)]
    reuse_staging: bool,
    /// Do not write a .sha256 file
    #[arg(long)]
    no_checksum: bool,
    /// Remove the staging directory once the archive is written
    #[arg(long)]
    clean_staging: bool,
    /// Output the result in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Copy meson files of a wrap-git subproject into subprojects/packagefiles
  WrapSave {
    /// Subproject directory name
    wrap: String,
    /// File-name glob of the files to save (default: *meson*)
    #[arg(long)]
    pattern: Option<String>,
  },

  /// Draw a bad-sample dump from the audio engine
  SampleBug {
    /// 5 or 6 comma-separated integers
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    dump: Vec<String>,
    /// Print the parsed dump in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Rasterise an SVG logo into a Windows .ico file
  RenderIcon {
    /// Source SVG file
    svg: PathBuf,
    /// Destination .ico file (default: the SVG path with an .ico extension)
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Output the result in JSON format
    #[arg(long)]
    json: bool,
  },
}

/// Log levels
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
  Error,
  Warn,
  Info,
  Debug,
  Trace,
}

impl LogLevel {
  fn to_filter_directive(self) -> &'static str {
    match self {
      LogLevel::Error => "error",
      LogLevel::Warn => "warn",
      LogLevel::Info => "info",
      LogLevel::Debug => "debug",
      LogLevel::Trace => "trace",
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Diagnostics go to stderr so `--json` output on stdout stays parseable
fn initialize_tracing(log_level: LogLevel) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}

fn main() {
  let cli = Cli::parse();
  initialize_tracing(cli.log_level);

  let root = cli.root;
  let config = cli.config;
  let ctx = || build_context(root.as_deref(), config.as_deref());

  let result = match cli.command {
    // sample-bug and render-icon work on their arguments alone
    Commands::SampleBug { dump, json } => commands::run_sample(&dump, json),
    Commands::Bump {
      version,
      dry_run,
      annotate,
      json,
    } => commands::run_bump(&ctx(), &version, dry_run, annotate, json),
    Commands::Package {
      release_version,
      build_dir,
      timestamp,
      output_dir,
      deps,
      reuse_staging,
      no_checksum,
      clean_staging,
      json,
    } => commands::run_package(
      &ctx(),
      commands::PackageArgs {
        release_version,
        build_dir,
        output_dir,
        deps,
        timestamp,
        reuse_staging,
        no_checksum,
        clean_staging,
        json,
      },
    ),
    Commands::WrapSave { wrap, pattern } => commands::run_wrap_save(&ctx(), &wrap, pattern.as_deref()),
    Commands::RenderIcon { svg, output, json } => commands::run_render_icon(&svg, output.as_deref(), json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

/// Build the context once for commands that work on a project tree
fn build_context(root: Option<&Path>, config: Option<&Path>) -> ReleaseContext {
  let root = match root {
    Some(root) => root.to_path_buf(),
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => handle_error(ReleaseError::from(e).context("Failed to get current directory")),
    },
  };

  let mut ctx = match ReleaseContext::build(&root, config) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };
  ctx.progress = std::io::stderr().is_terminal();
  tracing::debug!(root = %ctx.root.display(), "release context ready");
  ctx
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code());
}
