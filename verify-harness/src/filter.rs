/// Test-name selection for ad-hoc runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
  /// Keep every test.
  All,
  /// Keep tests whose name contains the given text, matched literally.
  Substring(String),
}

impl Filter {
  pub fn matches(&self, name: &str) -> bool {
    match self {
      Filter::All => true,
      Filter::Substring(needle) => name.contains(needle.as_str()),
    }
  }
}
