use crate::cargo::CargoCommands;
use crate::command::{describe_exit, CommandRunner};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// One enumerated ignored test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyTest {
  /// Package the test lives in; `None` under workspace-scoped enumeration.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub package: Option<String>,
  pub name: String,
}

impl VerifyTest {
  /// Label used in progress lines and annotations.
  pub fn label(&self) -> String {
    match &self.package {
      Some(package) => format!("{package}::{}", self.name),
      None => self.name.clone(),
    }
  }
}

/// Enumerates the ignored tests of every group in the scope.
///
/// The returned order is load-bearing: shard membership is defined by the
/// position in this sequence, so groups are concatenated in scope order and
/// the runner's own listing order is preserved verbatim — no sorting, no
/// deduplication.
pub fn list_tests(runner: &dyn CommandRunner, commands: &CargoCommands) -> Result<Vec<VerifyTest>> {
  let mut tests = Vec::new();
  for group in commands.scope().groups() {
    let cmd = commands.list_command(group);
    let output = runner.capture(&cmd)?;
    if !output.success() {
      bail!(
        "test listing failed: `{cmd}` finished with {}",
        describe_exit(output.code)
      );
    }
    let stdout = String::from_utf8(output.stdout)
      .with_context(|| format!("test listing from `{cmd}` is not valid UTF-8"))?;
    let parsed =
      parse_list_output(group, &stdout).with_context(|| format!("bad test listing from `{cmd}`"))?;
    tests.extend(parsed);
  }
  Ok(tests)
}

/// Parses the runner's `--list` output.
///
/// Accepted lines, and nothing else:
///   `<name>: test`                 a test named `<name>`
///   `<name>: benchmark`            skipped
///   `<N> tests, <M> benchmarks`    the closing summary, skipped
///   (blank)                        skipped
///
/// An unrecognized line aborts enumeration: guessing at a changed listing
/// format would silently skew every shard.
fn parse_list_output(package: Option<&str>, stdout: &str) -> Result<Vec<VerifyTest>> {
  let mut tests = Vec::new();
  for line in stdout.lines() {
    let line = line.trim_end();
    if line.is_empty() {
      continue;
    }
    if let Some((name, kind)) = line.rsplit_once(": ") {
      match kind {
        "test" if !name.is_empty() => {
          tests.push(VerifyTest {
            package: package.map(str::to_string),
            name: name.to_string(),
          });
          continue;
        }
        "benchmark" | "bench" => continue,
        _ => {}
      }
    }
    if is_summary_line(line) {
      continue;
    }
    bail!("unrecognized listing line: `{line}`");
  }
  Ok(tests)
}

/// Matches the `<N> tests, <M> benchmarks` line the runner prints last.
fn is_summary_line(line: &str) -> bool {
  let Some((tests, benchmarks)) = line.split_once(", ") else {
    return false;
  };
  is_count(tests, "test") && is_count(benchmarks, "benchmark")
}

fn is_count(part: &str, noun: &str) -> bool {
  match part.split_once(' ') {
    Some((count, unit)) => {
      !count.is_empty()
        && count.bytes().all(|b| b.is_ascii_digit())
        && unit.strip_suffix('s').unwrap_or(unit) == noun
    }
    None => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_test_lines_in_listing_order() {
    let stdout = "tests::aoj_grl_1_a: test\ntests::aoj_alds1_1_c: test\n\n2 tests, 0 benchmarks\n";
    let tests = parse_list_output(Some("aizu_online_judge"), stdout).unwrap();

    let names: Vec<_> = tests.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["tests::aoj_grl_1_a", "tests::aoj_alds1_1_c"]);
    assert!(tests
      .iter()
      .all(|t| t.package.as_deref() == Some("aizu_online_judge")));
  }

  #[test]
  fn skips_benchmarks_and_singular_summary() {
    let stdout = "slow_path: benchmark\nonly: test\n\n1 test, 1 benchmark\n";
    let tests = parse_list_output(None, stdout).unwrap();
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].name, "only");
    assert_eq!(tests[0].package, None);
  }

  #[test]
  fn rejects_unrecognized_lines() {
    let err = parse_list_output(None, "error: could not compile\n").unwrap_err();
    assert!(err.to_string().contains("unrecognized listing line"));

    // A bare colon with no name is not a test.
    assert!(parse_list_output(None, ": test\n").is_err());
  }

  #[test]
  fn empty_listing_yields_no_tests() {
    let tests = parse_list_output(None, "\n0 tests, 0 benchmarks\n").unwrap();
    assert!(tests.is_empty());
  }

  #[test]
  fn label_includes_the_package_when_scoped() {
    let scoped = VerifyTest {
      package: Some("library_checker".to_string()),
      name: "unionfind".to_string(),
    };
    assert_eq!(scoped.label(), "library_checker::unionfind");

    let unscoped = VerifyTest {
      package: None,
      name: "unionfind".to_string(),
    };
    assert_eq!(unscoped.label(), "unionfind");
  }
}
