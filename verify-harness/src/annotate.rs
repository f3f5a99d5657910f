use clap::ValueEnum;

/// How failed tests are surfaced in the CI log.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum Severity {
  /// Annotate failures as errors; any failure fails the job.
  #[default]
  Error,
  /// Annotate failures as warnings; the job still succeeds.
  Warning,
}

impl Severity {
  fn keyword(self) -> &'static str {
    match self {
      Severity::Error => "error",
      Severity::Warning => "warning",
    }
  }

  /// Whether failures annotated at this severity fail the surrounding job.
  pub fn fails_job(self) -> bool {
    matches!(self, Severity::Error)
  }
}

/// Renders the workflow command the CI frontend turns into an annotation.
///
/// The command is a single stdout line; a newline inside `message` would cut
/// it short, so line breaks are flattened to spaces.
pub fn annotation(severity: Severity, message: &str) -> String {
  let message = message.replace(['\r', '\n'], " ");
  format!("::{}::{}", severity.keyword(), message)
}
