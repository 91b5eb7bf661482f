use ogmap_derive::ogmap_error;
use std::borrow::Cow;

#[ogmap_error]
pub enum LookupError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Lookup failed{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_missing() -> Result<(), std::io::Error> {
    Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
}

#[test]
fn context_is_attached_to_source_errors() {
    let err = read_missing().context("Reading fixture").expect_err("must fail");

    assert!(matches!(err, LookupError::Io { ref context, .. } if context.is_some()));
    assert_eq!(err.to_string(), "IO error (Reading fixture): gone");
}

#[test]
fn question_mark_converts_source_without_context() {
    fn run() -> Result<(), LookupError> {
        read_missing()?;
        Ok(())
    }

    let err = run().expect_err("must fail");
    assert_eq!(err.to_string(), "IO error: gone");
}

#[test]
fn strings_become_internal_errors() {
    let err = LookupError::from("no candidates");
    assert_eq!(err.to_string(), "Lookup failed: no candidates");

    let err: Result<(), LookupError> = Err(LookupError::from(format!("status {}", 42)));
    let err = err.context("Text search").expect_err("must fail");
    assert_eq!(err.to_string(), "Lookup failed (Text search): status 42");
}

#[test]
fn ogmap_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/ogmap_error_pass.rs");
}
