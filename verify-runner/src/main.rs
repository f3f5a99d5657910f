use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use verify_harness::{Filter, Severity, Shard};
use verify_runner::artifacts::collect_artifacts;
use verify_runner::cargo::{CargoCommands, Scope, DEFAULT_PACKAGES, DEFAULT_SHARD_TOTAL};
use verify_runner::command::ProcessRunner;
use verify_runner::list::list_tests;
use verify_runner::report::{write_report, Report};
use verify_runner::runner::{run_tests, select_tests};

/// Runs one CI worker's share of the ignored verification tests.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
  /// Shard to run, 0-based; omit to run every test.
  shard_index: Option<usize>,

  /// Number of shards in the CI matrix.
  #[arg(long, default_value_t = DEFAULT_SHARD_TOTAL)]
  total: usize,

  /// Run only tests whose name contains this text (literal match).
  #[arg(short, long, value_name = "SUBSTRING")]
  name: Option<String>,

  /// Package to enumerate; repeat to enumerate several in order.
  #[arg(long = "package", value_name = "PKG", conflicts_with = "workspace")]
  packages: Vec<String>,

  /// Enumerate the whole workspace instead of per-package.
  #[arg(long)]
  workspace: bool,

  /// Move untracked files from the source root into the artifact directory
  /// after the batch.
  #[arg(long)]
  arrange: bool,

  /// Where collected artifacts land.
  #[arg(long, value_name = "PATH", default_value = "artifact")]
  artifact_dir: PathBuf,

  /// Tracked directory the tests write their outputs under.
  #[arg(long, value_name = "PATH", default_value = "crates")]
  source_root: String,

  /// How failed tests are annotated; `error` also fails the job.
  #[arg(long, value_enum, default_value_t = Severity::Error)]
  severity: Severity,

  /// Write a JSON run report to this path.
  #[arg(long, value_name = "PATH")]
  report: Option<PathBuf>,

  /// Directory to run cargo and git in.
  #[arg(long, value_name = "PATH", default_value = ".")]
  root: PathBuf,
}

fn main() -> ExitCode {
  match try_main() {
    Ok(code) => code,
    Err(err) => {
      eprintln!("{err:#}");
      ExitCode::FAILURE
    }
  }
}

fn try_main() -> Result<ExitCode> {
  let cli = Cli::parse();

  let shard = match cli.shard_index {
    Some(index) => Some(Shard::new(index, cli.total)?),
    None => None,
  };
  let filter = match cli.name {
    Some(needle) => Filter::Substring(needle),
    None => Filter::All,
  };
  let scope = if cli.workspace {
    Scope::Workspace
  } else if cli.packages.is_empty() {
    Scope::Packages(DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect())
  } else {
    Scope::Packages(cli.packages)
  };

  let runner = ProcessRunner;
  let commands = CargoCommands::new(&cli.root, scope);

  let tests = list_tests(&runner, &commands)?;
  if let Some(shard) = shard {
    eprintln!("running shard {} of {}", shard.index(), shard.total());
  }
  let selected = select_tests(tests, shard, &filter);
  eprintln!("selected {} of the enumerated tests", selected.len());

  let results = run_tests(&runner, &commands, &selected, cli.severity)?;
  let report = Report::new(results);

  if let Some(path) = &cli.report {
    write_report(&report, path)?;
  }

  if cli.arrange {
    let moved = collect_artifacts(&runner, &cli.root, &cli.source_root, &cli.artifact_dir)?;
    eprintln!("arranged {} artifact file(s)", moved.len());
  }

  let summary = report.summary;
  eprintln!(
    "{} passed, {} failed of {} selected",
    summary.passed, summary.failed, summary.selected
  );

  if summary.has_failures() && cli.severity.fails_job() {
    return Ok(ExitCode::FAILURE);
  }
  Ok(ExitCode::SUCCESS)
}
