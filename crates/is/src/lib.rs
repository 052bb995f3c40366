//! Test assertions whose failure messages quote the calling source.
//!
//! A trailing comment on the assertion line becomes the failure description,
//! keeping the call itself clean, and a failing boolean assertion reports the
//! literal text of its expression instead of a bare `false`:
//!
//! ```text
//! let mut t = is::Libtest::new();
//! let mut is = is::Is::new(&mut t);
//! let money = 0;
//! is.true_(money != 0); // money shouldn't be 0
//! ```
//!
//! fails with:
//!
//! ```text
//! is.true_: money != 0 // money shouldn't be 0
//! ```
//!
//! The calling source file is parsed at most once per process, lazily, on the
//! first failure in it. Subtests make their own [`Is`] and share that cache
//! automatically.

#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]

mod reporter;
mod value;


pub use reporter::{Libtest, Reporter};
pub use value::{Nil, Value};

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::panic::{Location, UnwindSafe};
use std::path::Path;
use value::{short_type_name, with_type};

/// The name of the boolean assertion, used to find its calls in source.
const TRUE_FN: &str = "true_";

/// The test helper. Failures go to the [`Reporter`] it holds.
#[derive(Debug)]
pub struct Is<'r, R> {
  r: &'r mut R,
}

enum FailKind {
  Fail,
  FailNow,
}

impl<'r, R> Is<'r, R>
where
  R: Reporter,
{
  /// Returns a new test helper reporting to `r`.
  ///
  /// Helpers are cheap to make: the source annotations they consult are
  /// parsed at most once per file per process, however many helpers a test
  /// and its subtests make.
  pub fn new(r: &'r mut R) -> Is<'r, R> {
    Is { r }
  }

  /// Asserts that `a` and `b` are equal.
  ///
  /// When the two sides have the same type, the failure message shows the
  /// bare values, as in `1 != 2`. When they differ, both sides are annotated
  /// with their type names, as in `i32(3) != bool(false)`. Pass [`Nil`] for
  /// an absent side; it is reported as `<nil>`.
  #[track_caller]
  #[allow(clippy::needless_pass_by_value)]
  pub fn equal<A, B>(&mut self, a: A, b: B)
  where
    A: Value,
    B: Value,
  {
    self.r.helper();
    let loc = Location::caller();
    if a.eq_value(&b) {
      return;
    }
    let plain = !a.is_nil() && !b.is_nil() && a.as_any().type_id() == b.as_any().type_id();
    let msg = if plain {
      format!("is.equal: {a:?} != {b:?}")
    } else {
      format!("is.equal: {} != {}", with_type(&a), with_type(&b))
    };
    self.report(FailKind::Fail, loc, msg);
  }

  /// Asserts that `result` is `Ok`.
  ///
  /// A failure aborts the test at once, since whatever follows builds on a
  /// broken precondition.
  #[track_caller]
  pub fn no_err<T, E>(&mut self, result: &Result<T, E>)
  where
    E: fmt::Display,
  {
    self.r.helper();
    let loc = Location::caller();
    if let Err(e) = result {
      self.report(FailKind::FailNow, loc, format!("is.no_err: {e}"));
    }
  }

  /// Asserts that `result` is `Err`, and if `expected` is non-empty, that
  /// the error matches one of them.
  ///
  /// Matching walks the error's `source` chain and compares display text at
  /// each link.
  #[track_caller]
  pub fn err<T, E>(&mut self, result: &Result<T, E>, expected: &[&dyn Error])
  where
    E: Error + 'static,
  {
    self.r.helper();
    let loc = Location::caller();
    let Err(got) = result else {
      self.report(FailKind::Fail, loc, "is.err: <nil>".to_owned());
      return;
    };
    if expected.is_empty() || expected.iter().any(|want| chain_matches(got, *want)) {
      return;
    }
    if let [want] = expected {
      self.report(FailKind::Fail, loc, format!("is.err: {got} != {want}"));
    } else {
      self.report(FailKind::Fail, loc, format!("is.err: {got} != one of the expected errors"));
    }
  }

  /// Asserts that the error's `source` chain contains a `Target`.
  #[track_caller]
  pub fn err_as<Target, T, E>(&mut self, result: &Result<T, E>)
  where
    Target: Error + 'static,
    E: Error + 'static,
  {
    self.r.helper();
    let loc = Location::caller();
    let found = match result {
      Ok(_) => false,
      Err(e) => chain_has::<Target>(e),
    };
    if !found {
      let name = short_type_name(std::any::type_name::<Target>());
      self.report(FailKind::Fail, loc, format!("is.err_as: err != {name}"));
    }
  }

  /// Asserts that `expression` is true.
  ///
  /// On failure the message quotes the expression as written at the call
  /// site, recovered from the source file. A call spanning several lines is
  /// reported with the continuations joined by single spaces.
  #[track_caller]
  pub fn true_(&mut self, expression: bool) {
    self.r.helper();
    let loc = Location::caller();
    if expression {
      return;
    }
    let annotations = source_annot::file(Path::new(loc.file()), TRUE_FN);
    let text = annotations.argument(loc.line()).unwrap_or_default();
    self.report(FailKind::Fail, loc, format!("is.true_: {text}"));
  }

  /// Asserts that `f` panics, and if `expected` is non-empty, that the panic
  /// payload matches one of them.
  ///
  /// String payloads (from `panic!` with a message) compare textually against
  /// `&str` and `String` expectations; other payloads compare by downcast.
  #[track_caller]
  pub fn panics<F>(&mut self, f: F, expected: &[&dyn Value])
  where
    F: FnOnce() + UnwindSafe,
  {
    self.r.helper();
    let loc = Location::caller();
    let payload = std::panic::catch_unwind(f).err();
    self.check_recovered(loc, payload.as_deref(), expected);
  }

  fn check_recovered(
    &mut self,
    loc: &Location<'_>,
    payload: Option<&(dyn Any + Send)>,
    expected: &[&dyn Value],
  ) {
    self.r.helper();
    let Some(payload) = payload else {
      self.report(FailKind::Fail, loc, "is.panics: the function did not panic".to_owned());
      return;
    };
    if expected.is_empty() || expected.iter().any(|want| payload_eq(payload, *want)) {
      return;
    }
    if let [want] = expected {
      let msg = format!("is.panics: {} != {want:?}", payload_text(payload));
      self.report(FailKind::Fail, loc, msg);
    } else {
      let msg = format!("is.panics: {} != one of the expected panic values", payload_text(payload));
      self.report(FailKind::Fail, loc, msg);
    }
  }

  /// Appends the caller's trailing line comment, logs, and fails.
  fn report(&mut self, kind: FailKind, loc: &Location<'_>, mut msg: String) {
    self.r.helper();
    let annotations = source_annot::file(Path::new(loc.file()), TRUE_FN);
    if let Some(comment) = annotations.comment(loc.line()) {
      msg.push(' ');
      msg.push_str(comment);
    }
    self.r.log(&msg);
    match kind {
      FailKind::Fail => self.r.fail(),
      FailKind::FailNow => self.r.fail_now(),
    };
  }
}

fn chain_matches(err: &(dyn Error + 'static), want: &dyn Error) -> bool {
  let want = want.to_string();
  let mut cur: Option<&(dyn Error + 'static)> = Some(err);
  while let Some(e) = cur {
    if e.to_string() == want {
      return true;
    }
    cur = e.source();
  }
  false
}

fn chain_has<Target>(err: &(dyn Error + 'static)) -> bool
where
  Target: Error + 'static,
{
  let mut cur: Option<&(dyn Error + 'static)> = Some(err);
  while let Some(e) = cur {
    if e.downcast_ref::<Target>().is_some() {
      return true;
    }
    cur = e.source();
  }
  false
}

fn payload_str(payload: &(dyn Any + Send)) -> Option<&str> {
  if let Some(s) = payload.downcast_ref::<&str>() {
    return Some(s);
  }
  payload.downcast_ref::<String>().map(String::as_str)
}

fn payload_eq(payload: &(dyn Any + Send), want: &dyn Value) -> bool {
  if let Some(s) = payload_str(payload) {
    if let Some(w) = want.as_any().downcast_ref::<&str>() {
      return s == *w;
    }
    if let Some(w) = want.as_any().downcast_ref::<String>() {
      return s == w.as_str();
    }
  }
  want.eq_any(payload)
}

fn payload_text(payload: &(dyn Any + Send)) -> String {
  match payload_str(payload) {
    Some(s) => format!("{s:?}"),
    None => "Box<dyn Any>".to_owned(),
  }
}
