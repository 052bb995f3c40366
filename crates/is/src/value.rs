//! A dynamic value model, so assertions can compare and report values of
//! different types.

use std::any::Any;
use std::fmt;

/// The absent value. Compares equal only to itself and is reported as the
/// literal token `<nil>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nil;

/// A value an assertion can compare and report.
///
/// Implemented for every `'static` type that is `PartialEq` and `Debug`.
/// Values of different types are never equal, but both still render in the
/// failure message, annotated with their type names.
pub trait Value: fmt::Debug {
  /// Returns this as a dynamically typed value.
  fn as_any(&self) -> &dyn Any;

  /// Returns the full name of this value's type.
  fn type_name(&self) -> &'static str;

  /// Returns whether this equals `other`, which may be of any type.
  fn eq_any(&self, other: &dyn Any) -> bool;

  /// Returns whether this equals the other value.
  fn eq_value(&self, other: &dyn Value) -> bool {
    self.eq_any(other.as_any())
  }

  /// Returns whether this is the absent value.
  fn is_nil(&self) -> bool {
    self.as_any().is::<Nil>()
  }
}

impl<T> Value for T
where
  T: Any + PartialEq + fmt::Debug,
{
  fn as_any(&self) -> &dyn Any {
    self
  }

  fn type_name(&self) -> &'static str {
    std::any::type_name::<T>()
  }

  fn eq_any(&self, other: &dyn Any) -> bool {
    other.downcast_ref::<T>().map_or(false, |other| self == other)
  }
}

/// Renders the value as `Type(value)`, or `<nil>` for the absent value.
pub(crate) fn with_type(v: &dyn Value) -> String {
  if v.is_nil() {
    "<nil>".to_owned()
  } else {
    format!("{}({v:?})", short_type_name(v.type_name()))
  }
}

/// Strips module paths from every path segment of a type name, so
/// `alloc::vec::Vec<&str>` renders as `Vec<&str>`.
pub(crate) fn short_type_name(full: &str) -> String {
  let mut out = String::new();
  let mut start = 0;
  for (idx, c) in full.char_indices() {
    if matches!(c, '<' | '>' | '(' | ')' | '[' | ']' | ',' | ' ' | '&' | ';' | '*' | '\'') {
      push_segment(&mut out, &full[start..idx]);
      out.push(c);
      start = idx + c.len_utf8();
    }
  }
  push_segment(&mut out, &full[start..]);
  out
}

fn push_segment(out: &mut String, path: &str) {
  if let Some(x) = path.rsplit("::").next() {
    out.push_str(x);
  }
}
