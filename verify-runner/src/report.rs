use crate::list::VerifyTest;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestOutcome {
  Passed,
  Failed {
    /// Exit code of the run invocation; `None` for a signal death.
    code: Option<i32>,
  },
}

impl TestOutcome {
  pub fn passed(self) -> bool {
    matches!(self, TestOutcome::Passed)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestResult {
  #[serde(flatten)]
  pub test: VerifyTest,
  pub outcome: TestOutcome,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
  pub selected: usize,
  pub passed: usize,
  pub failed: usize,
}

impl Summary {
  pub fn from_results(results: &[TestResult]) -> Self {
    let passed = results.iter().filter(|r| r.outcome.passed()).count();
    Self {
      selected: results.len(),
      passed,
      failed: results.len() - passed,
    }
  }

  pub fn has_failures(&self) -> bool {
    self.failed > 0
  }
}

/// Machine-readable record of one shard run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
  pub schema_version: u32,
  pub summary: Summary,
  pub results: Vec<TestResult>,
}

impl Report {
  pub fn new(results: Vec<TestResult>) -> Self {
    Self {
      schema_version: REPORT_SCHEMA_VERSION,
      summary: Summary::from_results(&results),
      results,
    }
  }
}

pub fn write_report(report: &Report, path: &Path) -> Result<()> {
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
  }
  let json = serde_json::to_string_pretty(report).context("serialize run report")?;
  fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
  Ok(())
}
