use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// One external tool invocation: program, arguments, and the directory to run
/// it in. The directory is always explicit so nothing depends on the ambient
/// process cwd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
}

impl CommandLine {
  pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args,
      cwd: cwd.into(),
    }
  }
}

impl fmt::Display for CommandLine {
  // Diagnostic rendering only; arguments are not shell-quoted.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.program)?;
    for arg in &self.args {
      write!(f, " {arg}")?;
    }
    Ok(())
  }
}

/// Captured result of a finished invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
  /// Exit code; `None` when the process died to a signal.
  pub code: Option<i32>,
  pub stdout: Vec<u8>,
}

impl CapturedOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Human form of an exit code, covering signal deaths.
pub fn describe_exit(code: Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {code}"),
    None => "a signal".to_string(),
  }
}

/// Capability for running external tools.
///
/// Enumeration, execution, and collection all take this as an explicit
/// argument instead of spawning processes themselves, so tests can substitute
/// scripted fakes without touching real cargo or git.
pub trait CommandRunner {
  /// Runs to completion with stdout captured; stderr passes through.
  fn capture(&self, cmd: &CommandLine) -> Result<CapturedOutput>;

  /// Runs to completion with stdout and stderr streaming through untouched.
  fn passthrough(&self, cmd: &CommandLine) -> Result<Option<i32>>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
  fn capture(&self, cmd: &CommandLine) -> Result<CapturedOutput> {
    let output = Command::new(&cmd.program)
      .args(&cmd.args)
      .current_dir(&cmd.cwd)
      .stdin(Stdio::null())
      .stderr(Stdio::inherit())
      .output()
      .with_context(|| format!("spawn `{cmd}`"))?;

    Ok(CapturedOutput {
      code: output.status.code(),
      stdout: output.stdout,
    })
  }

  fn passthrough(&self, cmd: &CommandLine) -> Result<Option<i32>> {
    let status = Command::new(&cmd.program)
      .args(&cmd.args)
      .current_dir(&cmd.cwd)
      .status()
      .with_context(|| format!("spawn `{cmd}`"))?;

    Ok(status.code())
  }
}
