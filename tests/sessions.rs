use std::rc::Rc;

use serde_json::json;
use standin::{Answer, Class, Error, Expectation, Object};

fn subject() -> Object {
    Rc::new(
        Class::new("Subject")
            .define("foo", |_, _| json!("foo"))
            .define("bar", |_, _| json!("bar"))
            .define("baz", |_, args| args[0].clone()),
    )
    .instance()
}

#[test]
fn session_restores_on_request() {
    let subject = subject();

    let session = standin::install(&subject, [("foo", Answer::value("stubbed"))]).unwrap();
    assert_eq!(subject.call("foo", &[]).unwrap(), json!("stubbed"));

    session.restore();
    assert_eq!(subject.call("foo", &[]).unwrap(), json!("foo"));
}

#[test]
fn dropping_a_session_restores() {
    let subject = subject();

    let session = standin::install(&subject, [("foo", Answer::value("stubbed"))]).unwrap();
    drop(session);

    assert_eq!(subject.call("foo", &[]).unwrap(), json!("foo"));
}

#[test]
fn unstub_restores_only_the_named_overrides() {
    let subject = subject();

    let session = standin::install(
        &subject,
        [("foo", Answer::value(1)), ("bar", Answer::value(2))],
    )
    .unwrap();

    standin::unstub(&subject, &["foo"]).unwrap();
    assert_eq!(subject.call("foo", &[]).unwrap(), json!("foo"));
    assert_eq!(subject.call("bar", &[]).unwrap(), json!(2));

    session.restore();
    assert_eq!(subject.call("bar", &[]).unwrap(), json!("bar"));
}

#[test]
fn unstub_without_an_override_fails() {
    let subject = subject();

    let err = standin::unstub(&subject, &["foo"]).unwrap_err();

    match err {
        Error::NoActiveOverride { class, method } => {
            assert_eq!(class, "Subject");
            assert_eq!(method, "foo");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unstub_validates_before_restoring_anything() {
    let subject = subject();

    let _session = standin::install(&subject, [("foo", Answer::value("stubbed"))]).unwrap();

    let err = standin::unstub(&subject, &["foo", "bar"]).unwrap_err();
    assert!(matches!(err, Error::NoActiveOverride { .. }));

    // the valid name was left alone
    assert_eq!(subject.call("foo", &[]).unwrap(), json!("stubbed"));
}

#[test]
fn overlapping_stubs_are_rejected() {
    let subject = subject();

    let _session = standin::install(&subject, [("foo", Answer::value("first"))]).unwrap();

    let err = standin::install(&subject, [("foo", Answer::value("second"))]).unwrap_err();
    assert!(matches!(err, Error::AlreadyOverridden { .. }));

    // the live override is untouched
    assert_eq!(subject.call("foo", &[]).unwrap(), json!("first"));
}

#[test]
fn duplicate_names_in_one_batch_are_rejected() {
    let subject = subject();

    let err = standin::install(
        &subject,
        [("foo", Answer::value(1)), ("foo", Answer::value(2))],
    )
    .unwrap_err();

    assert!(matches!(err, Error::AlreadyOverridden { .. }));
    assert_eq!(subject.call("foo", &[]).unwrap(), json!("foo"));
}

#[test]
fn a_stale_session_does_not_clobber_a_newer_override() {
    let subject = subject();

    let first = standin::install(&subject, [("foo", Answer::value("first"))]).unwrap();
    standin::unstub(&subject, &["foo"]).unwrap();

    let second = standin::install(&subject, [("foo", Answer::value("second"))]).unwrap();

    // `first` no longer owns the override on `foo`
    drop(first);
    assert_eq!(subject.call("foo", &[]).unwrap(), json!("second"));

    second.restore();
    assert_eq!(subject.call("foo", &[]).unwrap(), json!("foo"));
}

#[test]
fn expect_install_keeps_the_expectation_live() {
    let subject = subject();

    let session = standin::expect_install(
        &subject,
        "baz",
        Expectation::returns("result").with(["value"]),
    )
    .unwrap();

    assert_eq!(subject.call("baz", &[json!("value")]).unwrap(), json!("result"));

    session.restore();
    assert_eq!(subject.call("baz", &[json!("echo")]).unwrap(), json!("echo"));
}

#[test]
fn scoped_stub_can_nest_on_different_methods() {
    let subject = subject();

    standin::stub(&subject, [("foo", Answer::value(1))], || {
        standin::stub(&subject, [("bar", Answer::value(2))], || {
            assert_eq!(subject.call("foo", &[]).unwrap(), json!(1));
            assert_eq!(subject.call("bar", &[]).unwrap(), json!(2));
        })
        .unwrap();

        assert_eq!(subject.call("bar", &[]).unwrap(), json!("bar"));
    })
    .unwrap();

    assert_eq!(subject.call("foo", &[]).unwrap(), json!("foo"));
}
