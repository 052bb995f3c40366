//! A lexical scan for comments.
//!
//! Comments are not in the syntax tree, so this walks the raw bytes. String,
//! char, and lifetime tokens are skipped so that a `//` inside a literal is
//! not taken for a comment.

use line_index::LineIndex;
use text_size::TextSize;

/// A comment and where it was in the source.
#[derive(Debug)]
pub(crate) struct Comment {
  /// 1-based line of the comment's first byte.
  pub(crate) line: u32,
  /// Byte offset of the opening `//` or `/*`.
  pub(crate) start: usize,
  /// Byte offset one past the comment's last byte.
  pub(crate) end: usize,
  text: String,
}

impl Comment {
  /// Returns the comment as it appears in a failure message.
  pub(crate) fn rendered(&self) -> String {
    format!("// {}", self.text)
  }
}

/// Returns every comment in `source`, in order of appearance.
pub(crate) fn scan(source: &str) -> Vec<Comment> {
  let index = LineIndex::new(source);
  let bs = source.as_bytes();
  let mut ret = Vec::<Comment>::new();
  let mut i = 0usize;
  while i < bs.len() {
    let b = bs[i];
    if b == b'/' && bs.get(i + 1) == Some(&b'/') {
      let start = i;
      while i < bs.len() && bs[i] != b'\n' {
        i += 1;
      }
      ret.push(line_comment(source, &index, start, i));
    } else if b == b'/' && bs.get(i + 1) == Some(&b'*') {
      let start = i;
      i = block_end(bs, i);
      ret.push(block_comment(source, &index, start, i));
    } else if b == b'"' {
      i = string_end(bs, i + 1);
    } else if b == b'\'' {
      i = char_or_lifetime_end(bs, i);
    } else if (b == b'r' || b == b'b') && !prev_is_ident(bs, i) {
      match literal_prefix_end(bs, i) {
        Some(end) => i = end,
        None => i += 1,
      }
    } else {
      i += 1;
    }
  }
  ret
}

fn prev_is_ident(bs: &[u8], i: usize) -> bool {
  i.checked_sub(1).map_or(false, |j| {
    let b = bs[j];
    b == b'_' || b.is_ascii_alphanumeric()
  })
}

/// Returns the index after the closing quote, given the index after the
/// opening quote.
fn string_end(bs: &[u8], mut i: usize) -> usize {
  while i < bs.len() {
    match bs[i] {
      b'\\' => i += 2,
      b'"' => return i + 1,
      _ => i += 1,
    }
  }
  i
}

/// Returns the index after a char literal, or after just the quote for a
/// lifetime or label, given the index of the opening quote.
fn char_or_lifetime_end(bs: &[u8], i: usize) -> usize {
  match bs.get(i + 1) {
    // escaped char literal, e.g. '\n' or '\u{1f600}'
    Some(b'\\') => {
      let mut j = i + 3;
      while j < bs.len() && bs[j] != b'\'' {
        j += 1;
      }
      j + 1
    }
    // multi-byte char literal, e.g. 'é'
    Some(&c) if c >= 0x80 => {
      let mut j = i + 1;
      while j < bs.len() && bs[j] != b'\'' {
        j += 1;
      }
      j + 1
    }
    // one-byte char literal
    Some(_) if bs.get(i + 2) == Some(&b'\'') => i + 3,
    // lifetime or label
    _ => i + 1,
  }
}

/// Handles the `r"`, `r#"`, `b"`, `br#"`, and `b'` literal prefixes. Returns
/// `None` if `i` does not start a literal after all.
fn literal_prefix_end(bs: &[u8], i: usize) -> Option<usize> {
  let mut j = i;
  if bs[j] == b'b' {
    j += 1;
    if bs.get(j) == Some(&b'\'') {
      return Some(char_or_lifetime_end(bs, j));
    }
  }
  let raw = bs.get(j) == Some(&b'r');
  if raw {
    j += 1;
  }
  let mut hashes = 0usize;
  while raw && bs.get(j) == Some(&b'#') {
    hashes += 1;
    j += 1;
  }
  if bs.get(j) != Some(&b'"') {
    return None;
  }
  j += 1;
  if raw {
    Some(raw_string_end(bs, j, hashes))
  } else {
    Some(string_end(bs, j))
  }
}

fn raw_string_end(bs: &[u8], mut i: usize, hashes: usize) -> usize {
  while i < bs.len() {
    let closed = bs[i] == b'"'
      && bs.get(i + 1..i + 1 + hashes).map_or(false, |s| s.iter().all(|&b| b == b'#'));
    if closed {
      return i + 1 + hashes;
    }
    i += 1;
  }
  i
}

/// Returns the index after the matching `*/`, honoring nesting.
fn block_end(bs: &[u8], start: usize) -> usize {
  let mut depth = 0usize;
  let mut i = start;
  while i < bs.len() {
    if bs[i] == b'/' && bs.get(i + 1) == Some(&b'*') {
      depth += 1;
      i += 2;
    } else if bs[i] == b'*' && bs.get(i + 1) == Some(&b'/') {
      depth -= 1;
      i += 2;
      if depth == 0 {
        return i;
      }
    } else {
      i += 1;
    }
  }
  i
}

fn line_comment(source: &str, index: &LineIndex, start: usize, end: usize) -> Comment {
  let text = source[start + 2..end].trim_start_matches(|c: char| c == '/' || c == '!');
  Comment { line: line_of(index, start), start, end, text: text.trim().to_owned() }
}

/// A block comment maps onto its starting line as a single composite string.
fn block_comment(source: &str, index: &LineIndex, start: usize, end: usize) -> Comment {
  let inner_end = end.saturating_sub(2).max(start + 2);
  let inner = source.get(start + 2..inner_end).unwrap_or_default();
  let mut text = String::new();
  for line in inner.lines() {
    let line = line.trim().trim_start_matches(|c: char| c == '*' || c == '!').trim();
    if line.is_empty() {
      continue;
    }
    if !text.is_empty() {
      text.push(' ');
    }
    text.push_str(line);
  }
  Comment { line: line_of(index, start), start, end, text }
}

fn line_of(index: &LineIndex, offset: usize) -> u32 {
  let offset = TextSize::new(u32::try_from(offset).expect("source too large"));
  index.line_col(offset).line + 1
}
