//! Argument-verifying stubs: compiles an expected call into a
//! replacement and hands everything else to the stub engine.

use serde_json::Value;

use crate::{
    error::{Mismatch, Result},
    object::Object,
    stub::{self, Answer, Session},
};

/// A single expected invocation: the arguments a call must arrive
/// with, and the result it produces when it does.
///
/// Expected arguments default to the empty list: an expectation
/// built with only [`Expectation::returns`] is an expectation of a
/// zero-argument call.
#[derive(Clone, Debug, PartialEq)]
pub struct Expectation {
    expected: Vec<Value>,
    result: Value,
}

impl Expectation {
    /// Starts an expectation that produces `result` when fulfilled.
    pub fn returns(result: impl Into<Value>) -> Self {
        Expectation {
            expected: Vec::new(),
            result: result.into(),
        }
    }

    /// Sets the exact arguments the call must arrive with, compared
    /// by ordered, element-wise equality.
    pub fn with<T, A>(mut self, args: A) -> Self
    where
        T: Into<Value>,
        A: IntoIterator<Item = T>,
    {
        self.expected = args.into_iter().map(Into::into).collect();
        self
    }

    // The mismatch check runs inside the intercepted call, so the
    // error surfaces at the call site that violated the expectation.
    fn into_answer(self) -> Answer {
        let Expectation { expected, result } = self;

        Answer::try_from_fn(move |actual| {
            if actual != expected.as_slice() {
                return Err(Mismatch {
                    expected: expected.clone(),
                    actual: actual.to_vec(),
                }
                .into());
            }

            Ok(result.clone())
        })
    }
}

/// Stubs `method` on `target` for the duration of `work`, verifying
/// the arguments of every invocation.
///
/// A call arriving with the expected arguments returns the declared
/// result; any other call raises [`Error::ExpectationMismatch`] out
/// of its call site, carrying both argument lists. Either way the
/// original implementation is restored when `work` finishes,
/// normally or by panic.
///
/// ```
/// use std::rc::Rc;
/// use standin::{json, Class, Expectation};
///
/// let class = Rc::new(Class::new("User").define("update", |_, _| json!(false)));
/// let user = class.instance();
///
/// standin::expect(
///     &user,
///     "update",
///     Expectation::returns(true).with(["new name"]),
///     || assert_eq!(user.call("update", &[json!("new name")]).unwrap(), json!(true)),
/// )
/// .unwrap();
/// ```
///
/// [`Error::ExpectationMismatch`]: crate::Error::ExpectationMismatch
pub fn expect<R>(
    target: &Object,
    method: impl Into<String>,
    expectation: Expectation,
    work: impl FnOnce() -> R,
) -> Result<R> {
    let method: String = method.into();
    stub::stub(target, [(method, expectation.into_answer())], work)
}

/// [`expect`] without a scoped block: the override stays live until
/// the returned [`Session`] restores it.
pub fn expect_install<'t>(
    target: &'t Object,
    method: impl Into<String>,
    expectation: Expectation,
) -> Result<Session<'t>> {
    let method: String = method.into();
    stub::install(target, [(method, expectation.into_answer())])
}
