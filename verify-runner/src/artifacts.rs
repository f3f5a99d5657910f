use crate::command::{describe_exit, CommandLine, CommandRunner};
use anyhow::{bail, Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Moves the files the verification runs left behind under `source_root`
/// into the same relative layout under `artifact_root`.
///
/// "Left behind" means untracked: present on disk, unknown to git, and not
/// ignored. Tracked files are never touched, and a file already moved no
/// longer shows up in a later query, so repeating the step is harmless.
/// Returns the relative paths that were moved.
pub fn collect_artifacts(
  runner: &dyn CommandRunner,
  root: &Path,
  source_root: &str,
  artifact_root: &Path,
) -> Result<Vec<PathBuf>> {
  let untracked = untracked_files(runner, root, source_root)?;
  // `join` keeps an absolute artifact_root as-is.
  let dest_root = root.join(artifact_root);

  let mut moved = Vec::with_capacity(untracked.len());
  for rel in untracked {
    let source = root.join(&rel);
    let dest = dest_root.join(&rel);
    if dest.exists() {
      bail!("artifact destination already exists: {}", dest.display());
    }
    if let Some(parent) = dest.parent() {
      fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    move_file(&source, &dest)
      .with_context(|| format!("move {} -> {}", source.display(), dest.display()))?;
    moved.push(rel);
  }
  Ok(moved)
}

/// Paths under `source_root` that exist on disk but are not tracked and not
/// ignored, relative to `root`. Delegated to git so ignore rules stay git's
/// concern; `-z` keeps paths with spaces intact.
fn untracked_files(
  runner: &dyn CommandRunner,
  root: &Path,
  source_root: &str,
) -> Result<Vec<PathBuf>> {
  let args = ["ls-files", "-o", "--exclude-standard", "-z", source_root]
    .map(String::from)
    .to_vec();
  let cmd = CommandLine::new("git", args, root);

  let output = runner.capture(&cmd)?;
  if !output.success() {
    bail!(
      "untracked-file query failed: `{cmd}` finished with {}",
      describe_exit(output.code)
    );
  }
  let stdout = String::from_utf8(output.stdout)
    .with_context(|| format!("`{cmd}` output is not valid UTF-8"))?;

  Ok(
    stdout
      .split('\0')
      .filter(|path| !path.is_empty())
      .map(PathBuf::from)
      .collect(),
  )
}

/// Relocates a file, falling back to copy+remove when the rename fails
/// (renames cannot cross filesystem boundaries).
fn move_file(source: &Path, dest: &Path) -> io::Result<()> {
  if fs::rename(source, dest).is_ok() {
    return Ok(());
  }
  fs::copy(source, dest)?;
  fs::remove_file(source)
}
