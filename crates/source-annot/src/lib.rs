//! Line-indexed annotations extracted from test source files.
//!
//! Failure messages in the `is` crate quote the test's own source: the
//! trailing comment on the assertion line, and the literal text of the
//! argument of a failing boolean assertion. This crate parses a source file
//! once and builds the two line-indexed tables behind that.
//!
//! Source files are assumed immutable while the process runs, so parsed
//! tables are cached process-wide and never invalidated. An unreadable or
//! unparsable file is a broken environment, not a recoverable condition, and
//! panics.

#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]

mod argument;
mod comment;

#[cfg(test)]
mod tests;

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

/// The annotations for one source file, indexed by 1-based line number.
#[derive(Debug)]
pub struct FileAnnotations {
  comments: FxHashMap<u32, String>,
  arguments: FxHashMap<u32, String>,
}

impl FileAnnotations {
  /// Parses `source` and returns its annotations.
  ///
  /// `target` is the function name whose calls get their argument text
  /// recorded; any call expression containing `target` anywhere in its source
  /// text counts.
  ///
  /// # Panics
  ///
  /// If `source` is not valid Rust.
  #[must_use]
  pub fn parse(source: &str, target: &str) -> FileAnnotations {
    let comments = comment::scan(source);
    let arguments = argument::extract(source, &comments, target);
    let comments = comments.into_iter().map(|c| (c.line, c.rendered())).collect();
    FileAnnotations { comments, arguments }
  }

  /// Returns the comment on `line`, rendered as `// text`.
  ///
  /// A block comment is returned on its starting line as a single composite
  /// string.
  #[must_use]
  pub fn comment(&self, line: u32) -> Option<&str> {
    self.comments.get(&line).map(String::as_str)
  }

  /// Returns the argument text of the target call starting on `line`, with
  /// line continuations collapsed to single spaces and comments removed.
  #[must_use]
  pub fn argument(&self, line: u32) -> Option<&str> {
    self.arguments.get(&line).map(String::as_str)
  }
}

type Cache = FxHashMap<PathBuf, Arc<FileAnnotations>>;

/// Returns the annotations for the file at `path`, which may be relative to
/// an ancestor of the current directory, as the file names reported by
/// [`std::panic::Location`] are.
///
/// Each file is read and parsed at most once per process; later calls get the
/// cached tables, whatever `target` they pass.
///
/// # Panics
///
/// If the file cannot be found, read, or parsed.
#[must_use]
pub fn file(path: &Path, target: &str) -> Arc<FileAnnotations> {
  static CACHE: OnceLock<Mutex<Cache>> = OnceLock::new();
  let path = resolve(path);
  let mut cache =
    CACHE.get_or_init(|| Mutex::new(Cache::default())).lock().expect("cache lock poisoned");
  if let Some(x) = cache.get(&path) {
    return Arc::clone(x);
  }
  log::debug!("annotating {}", path.display());
  let source = match std::fs::read_to_string(&path) {
    Ok(x) => x,
    Err(e) => panic!("couldn't read {}: {e}", path.display()),
  };
  let annotations = Arc::new(FileAnnotations::parse(&source, target));
  cache.insert(path, Arc::clone(&annotations));
  annotations
}

/// Resolves a possibly workspace-relative file name against the current
/// directory and its ancestors.
fn resolve(path: &Path) -> PathBuf {
  if path.is_absolute() {
    return path.to_owned();
  }
  let cwd = match std::env::current_dir() {
    Ok(x) => x,
    Err(e) => panic!("couldn't get the current directory: {e}"),
  };
  let mut dir = cwd.as_path();
  loop {
    let candidate = dir.join(path);
    if candidate.is_file() {
      return candidate;
    }
    match dir.parent() {
      Some(x) => dir = x,
      None => panic!("couldn't find {}", path.display()),
    }
  }
}
