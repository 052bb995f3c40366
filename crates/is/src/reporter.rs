//! Reporting failures to the host test framework.

/// What the assertion engine needs from the host test framework.
///
/// The host supplies the implementation; [`Libtest`] covers the standard
/// harness.
pub trait Reporter {
  /// Marks the test as failed and keeps going.
  fn fail(&mut self);

  /// Marks the test as failed and aborts it.
  fn fail_now(&mut self);

  /// Logs a message.
  fn log(&mut self, msg: &str);

  /// Marks the calling function as a test helper.
  ///
  /// Implementations that track failure locations can use this to skip the
  /// engine's own frames. Others may ignore it.
  fn helper(&mut self);
}

/// A reporter for the standard libtest harness.
///
/// `log` prints, `fail_now` panics at once, and dropping a reporter that saw
/// a failure panics, so the test fails after all its assertions ran.
#[derive(Debug, Default)]
pub struct Libtest {
  failed: bool,
}

impl Libtest {
  /// Returns a new reporter.
  #[must_use]
  pub fn new() -> Libtest {
    Libtest::default()
  }

  /// Returns whether a failure was reported.
  #[must_use]
  pub fn failed(&self) -> bool {
    self.failed
  }
}

impl Reporter for Libtest {
  fn fail(&mut self) {
    self.failed = true;
  }

  fn fail_now(&mut self) {
    self.failed = true;
    panic!("failing the test now");
  }

  fn log(&mut self, msg: &str) {
    println!("{msg}");
  }

  fn helper(&mut self) {}
}

impl Drop for Libtest {
  fn drop(&mut self) {
    if self.failed && !std::thread::panicking() {
      panic!("test failed");
    }
  }
}
