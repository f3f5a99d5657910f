use crate::cargo::CargoCommands;
use crate::command::CommandRunner;
use crate::list::VerifyTest;
use crate::report::{TestOutcome, TestResult};
use anyhow::{Context, Result};
use verify_harness::{annotation, apply_shard, Filter, Severity, Shard};

/// Applies the shard, then the name filter, preserving enumeration order.
///
/// Shard positions are defined against the full enumeration, so the stride
/// runs first; filtering inside a shard then narrows that worker's slice.
/// The CLI offers one mode at a time, but the composition stays expressible.
pub fn select_tests(
  tests: Vec<VerifyTest>,
  shard: Option<Shard>,
  filter: &Filter,
) -> Vec<VerifyTest> {
  apply_shard(tests, shard)
    .into_iter()
    .filter(|test| filter.matches(&test.name))
    .collect()
}

/// Runs every selected test in order, one blocking invocation each, with the
/// test's own output streaming through to the log.
///
/// A failed test never stops the batch: it is annotated on stdout, recorded,
/// and the next test runs. Only a runner that cannot be spawned at all
/// aborts.
pub fn run_tests(
  runner: &dyn CommandRunner,
  commands: &CargoCommands,
  tests: &[VerifyTest],
  severity: Severity,
) -> Result<Vec<TestResult>> {
  let mut results = Vec::with_capacity(tests.len());
  for test in tests {
    let cmd = commands.run_command(test);
    eprintln!("verifying {}", test.label());
    let code = runner
      .passthrough(&cmd)
      .with_context(|| format!("run test `{}`", test.label()))?;

    let outcome = if code == Some(0) {
      TestOutcome::Passed
    } else {
      let message = format!("verify failed `{}`", test.label());
      println!("{}", annotation(severity, &message));
      TestOutcome::Failed { code }
    };
    results.push(TestResult {
      test: test.clone(),
      outcome,
    });
  }
  Ok(results)
}
