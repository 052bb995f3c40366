use crate::FileAnnotations;
use std::path::Path;
use std::sync::Arc;

fn annotations(source: &str) -> FileAnnotations {
  FileAnnotations::parse(source, "true_")
}

#[test]
fn trailing_comment() {
  let a = annotations("fn t(is: &mut Is) {\n  is.equal(1, 2); // expect to be the same\n}\n");
  assert_eq!(a.comment(2), Some("// expect to be the same"));
  assert_eq!(a.comment(1), None);
  assert_eq!(a.argument(2), None);
}

#[test]
fn missing_line() {
  let a = annotations("fn f() {}\n");
  assert_eq!(a.comment(99), None);
  assert_eq!(a.argument(99), None);
}

#[test]
fn doc_comment() {
  let a = annotations("/// a doc\nfn f() {}\n");
  assert_eq!(a.comment(1), Some("// a doc"));
}

#[test]
fn block_comment_is_composite() {
  let a = annotations("/* one\n * two\n */\nfn f() {}\n");
  assert_eq!(a.comment(1), Some("// one two"));
  assert_eq!(a.comment(2), None);
}

#[test]
fn comment_inside_string() {
  let a = annotations("fn f() -> &'static str {\n  \"// not a comment\"\n}\n");
  assert_eq!(a.comment(2), None);
}

#[test]
fn comment_inside_raw_string() {
  let a = annotations("fn f() -> &'static str {\n  r#\"// nope\"# // real\n}\n");
  assert_eq!(a.comment(2), Some("// real"));
}

#[test]
fn comment_after_char_literal() {
  let a = annotations("fn f() -> char {\n  '/' // a slash\n}\n");
  assert_eq!(a.comment(2), Some("// a slash"));
}

#[test]
fn comment_after_lifetime() {
  let a = annotations("fn f<'a>(x: &'a u8) -> u8 {\n  *x // deref\n}\n");
  assert_eq!(a.comment(2), Some("// deref"));
}

#[test]
fn single_line_argument() {
  let a = annotations("fn t(is: &mut Is) {\n  is.true_(1 == 2); // comment\n}\n");
  assert_eq!(a.argument(2), Some("1 == 2"));
  assert_eq!(a.comment(2), Some("// comment"));
}

#[test]
fn multi_line_argument() {
  let a = annotations(
    "fn t(is: &mut Is) {\n  is.true_((1 == 2) &&\n    false ||\n    false);\n}\n",
  );
  assert_eq!(a.argument(2), Some("(1 == 2) && false || false"));
  assert_eq!(a.argument(3), None);
}

#[test]
fn comment_inside_argument_is_dropped() {
  let a = annotations("fn t(is: &mut Is) {\n  is.true_((1 == 2) && // first\n    false);\n}\n");
  assert_eq!(a.argument(2), Some("(1 == 2) && false"));
  assert_eq!(a.comment(2), Some("// first"));
}

#[test]
fn free_function_call() {
  let a = annotations("fn t() {\n  true_(1 == 2);\n}\n");
  assert_eq!(a.argument(2), Some("1 == 2"));
}

#[test]
fn unrelated_call_not_recorded() {
  let a = annotations("fn t() {\n  other(1 == 2);\n}\n");
  assert_eq!(a.argument(2), None);
}

#[test]
fn argument_with_string() {
  let a = annotations("fn t(is: &mut Is) {\n  is.true_(s != \"// x\");\n}\n");
  assert_eq!(a.argument(2), Some("s != \"// x\""));
}

#[test]
#[should_panic(expected = "couldn't parse source")]
fn unparsable_source() {
  annotations("fn t( {\n");
}

#[test]
fn cached_file() {
  let first = crate::file(Path::new(file!()), "true_");
  let again = crate::file(Path::new(file!()), "true_");
  assert!(Arc::ptr_eq(&first, &again));
  let line = line!() + 1;
  // hello from the cache test
  assert_eq!(first.comment(line), Some("// hello from the cache test"));
}
