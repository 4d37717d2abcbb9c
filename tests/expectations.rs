use std::rc::Rc;

use pretty_assertions::assert_eq;
use serde_json::json;
use standin::{Class, Error, Expectation, Object};

fn subject() -> Object {
    Rc::new(
        Class::new("Subject")
            .define("foo", |_, _| json!("foo"))
            .define("baz", |_, args| args[0].clone()),
    )
    .instance()
}

#[test]
fn succeeds_if_expectations_are_met() {
    let subject = subject();

    standin::expect(
        &subject,
        "baz",
        Expectation::returns("result").with(["value"]),
        || assert_eq!(subject.call("baz", &[json!("value")]).unwrap(), json!("result")),
    )
    .unwrap();

    assert_eq!(subject.call("baz", &[json!("baz")]).unwrap(), json!("baz"));
}

#[test]
fn raises_if_expectations_are_not_met() {
    let subject = subject();

    standin::expect(
        &subject,
        "baz",
        Expectation::returns("result").with(["value"]),
        || {
            let err = subject.call("baz", &[json!("another")]).unwrap_err();

            match err {
                Error::ExpectationMismatch(mismatch) => {
                    assert_eq!(mismatch.expected, vec![json!("value")]);
                    assert_eq!(mismatch.actual, vec![json!("another")]);
                }
                other => panic!("unexpected error: {other}"),
            }
        },
    )
    .unwrap();
}

#[test]
fn expected_arguments_default_to_empty() {
    let subject = subject();

    standin::expect(&subject, "foo", Expectation::returns("new foo"), || {
        assert_eq!(subject.call("foo", &[]).unwrap(), json!("new foo"));

        let err = subject.call("foo", &[json!(1)]).unwrap_err();
        match err {
            Error::ExpectationMismatch(mismatch) => {
                assert_eq!(mismatch.expected, Vec::<serde_json::Value>::new());
                assert_eq!(mismatch.actual, vec![json!(1)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    })
    .unwrap();
}

#[test]
fn expectation_with_multiple_arguments() {
    let subject = subject();

    standin::expect(
        &subject,
        "foo",
        Expectation::returns("new foo").with([json!("new foo"), json!({ "optional": true })]),
        || {
            let args = [json!("new foo"), json!({ "optional": true })];
            assert_eq!(subject.call("foo", &args).unwrap(), json!("new foo"));
        },
    )
    .unwrap();
}

#[test]
fn restores_after_a_mismatch() {
    let subject = subject();

    standin::expect(
        &subject,
        "baz",
        Expectation::returns("result").with(["value"]),
        || {
            assert!(subject.call("baz", &[json!("wrong")]).is_err());
        },
    )
    .unwrap();

    assert_eq!(subject.call("baz", &[json!("echo")]).unwrap(), json!("echo"));
}

#[test]
fn expecting_an_undefined_method_is_rejected() {
    let subject = subject();

    let err =
        standin::expect(&subject, "nan", Expectation::returns("never"), || ()).unwrap_err();

    assert!(matches!(err, Error::MethodNotFound { .. }));
}

#[test]
fn mismatch_reports_both_argument_lists() {
    let subject = subject();

    standin::expect(
        &subject,
        "baz",
        Expectation::returns("result").with(["value"]),
        || {
            let err = subject.call("baz", &[json!("another")]).unwrap_err();

            assert_eq!(
                err.to_string(),
                "Arguments did not match\n  Expected: [\"value\"]\n  Actual:   [\"another\"]"
            );
        },
    )
    .unwrap();
}
