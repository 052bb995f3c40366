//! Extraction of the literal argument text of interesting calls.

use crate::comment::Comment;
use proc_macro2::extra::DelimSpan;
use rustc_hash::FxHashMap;
use std::ops::Range;
use syn::spanned::Spanned as _;
use syn::visit::Visit;

/// Returns `line -> argument text` for every call expression whose raw source
/// text contains `target`, keyed by the call's 1-based starting line.
///
/// # Panics
///
/// If `source` is not valid Rust.
pub(crate) fn extract(
  source: &str,
  comments: &[Comment],
  target: &str,
) -> FxHashMap<u32, String> {
  let file = match syn::parse_file(source) {
    Ok(x) => x,
    Err(e) => panic!("couldn't parse source: {e}"),
  };
  let mut visitor = CallVisitor { source, comments, target, arguments: FxHashMap::default() };
  visitor.visit_file(&file);
  visitor.arguments
}

struct CallVisitor<'a> {
  source: &'a str,
  comments: &'a [Comment],
  target: &'a str,
  arguments: FxHashMap<u32, String>,
}

impl CallVisitor<'_> {
  fn record(&mut self, call: Range<usize>, line: usize, paren: &DelimSpan) {
    if !self.source[call].contains(self.target) {
      return;
    }
    let args = paren.open().byte_range().end..paren.close().byte_range().start;
    let line = u32::try_from(line).expect("line out of range");
    self.arguments.insert(line, self.render(args));
  }

  /// Slices the raw argument text, drops comment bytes, and joins the lines
  /// with single spaces.
  fn render(&self, range: Range<usize>) -> String {
    let mut raw = String::new();
    let mut pos = range.start;
    for c in self.comments {
      if c.end <= range.start || c.start >= range.end {
        continue;
      }
      raw.push_str(&self.source[pos..c.start.max(range.start)]);
      pos = c.end.min(range.end);
    }
    raw.push_str(&self.source[pos..range.end]);
    let mut out = String::new();
    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
      if !out.is_empty() {
        out.push(' ');
      }
      out.push_str(line);
    }
    out
  }
}

impl<'ast> Visit<'ast> for CallVisitor<'_> {
  fn visit_expr_call(&mut self, node: &'ast syn::ExprCall) {
    self.record(node.span().byte_range(), node.span().start().line, &node.paren_token.span);
    syn::visit::visit_expr_call(self, node);
  }

  fn visit_expr_method_call(&mut self, node: &'ast syn::ExprMethodCall) {
    self.record(node.span().byte_range(), node.span().start().line, &node.paren_token.span);
    syn::visit::visit_expr_method_call(self, node);
  }
}
