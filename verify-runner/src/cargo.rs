use crate::command::CommandLine;
use crate::list::VerifyTest;
use std::path::PathBuf;

/// Shard count the CI matrix is provisioned for.
pub const DEFAULT_SHARD_TOTAL: usize = 15;

/// Packages whose ignored tests make up the verification suite, in
/// enumeration order.
pub const DEFAULT_PACKAGES: &[&str] = &["aizu_online_judge", "library_checker"];

/// How enumeration and execution are scoped.
///
/// Package scoping lists each package separately and concatenates the results
/// in the given order; workspace scoping issues a single unscoped listing.
/// The selection and execution loop downstream is the same either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
  Packages(Vec<String>),
  Workspace,
}

impl Scope {
  /// Enumeration groups, in the order their tests are concatenated.
  pub fn groups(&self) -> Vec<Option<&str>> {
    match self {
      Scope::Packages(packages) => packages.iter().map(|p| Some(p.as_str())).collect(),
      Scope::Workspace => vec![None],
    }
  }
}

/// Builds the `cargo test` invocations for one scope.
#[derive(Debug, Clone)]
pub struct CargoCommands {
  root: PathBuf,
  scope: Scope,
}

impl CargoCommands {
  pub fn new(root: impl Into<PathBuf>, scope: Scope) -> Self {
    Self {
      root: root.into(),
      scope,
    }
  }

  pub fn scope(&self) -> &Scope {
    &self.scope
  }

  /// Listing query: `cargo test [-p <pkg>] --quiet --release -- --list
  /// --ignored`.
  pub fn list_command(&self, package: Option<&str>) -> CommandLine {
    let mut args = vec!["test".to_string()];
    if let Some(package) = package {
      args.push("--package".to_string());
      args.push(package.to_string());
    }
    args.extend(["--quiet", "--release", "--", "--list", "--ignored"].map(String::from));
    CommandLine::new("cargo", args, &self.root)
  }

  /// Execution query: `cargo test [-p <pkg>] --release <name> -- --ignored
  /// --exact --nocapture`.
  ///
  /// `--exact` pins the run to the named test; `--nocapture` streams the
  /// test's own diagnostics through to the CI log.
  pub fn run_command(&self, test: &VerifyTest) -> CommandLine {
    let mut args = vec!["test".to_string()];
    if let Some(package) = &test.package {
      args.push("--package".to_string());
      args.push(package.clone());
    }
    args.push("--release".to_string());
    args.push(test.name.clone());
    args.extend(["--", "--ignored", "--exact", "--nocapture"].map(String::from));
    CommandLine::new("cargo", args, &self.root)
  }
}
