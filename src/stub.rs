//! The stubbing engine: applies the redirect layer across a batch of
//! method replacements and governs when the originals come back.

use std::{
    fmt::{self, Formatter},
    rc::Rc,
};

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    object::{MethodFn, Object},
    redirect,
};

/// A replacement for a stubbed method.
///
/// A literal answer returns the same value on every invocation,
/// whatever the arguments. A callable answer is invoked with the
/// positional arguments of each call and its result is returned in
/// the method's place.
pub enum Answer {
    Value(Value),
    Fn(Rc<dyn Fn(&[Value]) -> Result<Value>>),
}

impl Answer {
    /// A literal replacement value.
    pub fn value(value: impl Into<Value>) -> Self {
        Answer::Value(value.into())
    }

    /// A replacement computed from the arguments of each call.
    ///
    /// ```
    /// use std::rc::Rc;
    /// use standin::{json, Answer, Class};
    ///
    /// let class = Rc::new(Class::new("Subject").define("baz", |_, args| args[0].clone()));
    /// let subject = class.instance();
    ///
    /// standin::stub(
    ///     &subject,
    ///     [("baz", Answer::from_fn(|args| json!([args.len()])))],
    ///     || assert_eq!(subject.call("baz", &[json!(1), json!(2)]).unwrap(), json!([2])),
    /// )
    /// .unwrap();
    /// ```
    pub fn from_fn(f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Answer::Fn(Rc::new(move |args| Ok(f(args))))
    }

    /// A callable replacement that may fail the intercepted call.
    ///
    /// The error is raised out of the call site, not swallowed. This
    /// is how expectations report a mismatch, and it doubles as a
    /// fault-injection stub.
    pub fn try_from_fn(f: impl Fn(&[Value]) -> Result<Value> + 'static) -> Self {
        Answer::Fn(Rc::new(f))
    }

    fn into_method(self) -> MethodFn {
        match self {
            Answer::Value(value) => Rc::new(move |_, _| Ok(value.clone())),
            Answer::Fn(f) => Rc::new(move |_, args| f(args)),
        }
    }
}

impl From<Value> for Answer {
    fn from(value: Value) -> Self {
        Answer::Value(value)
    }
}

impl fmt::Debug for Answer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Value(value) => write!(f, "literal {value}"),
            Answer::Fn(_) => f.write_str("callable"),
        }
    }
}

/// The overrides installed by one [`install`] or [`expect_install`]
/// call, restored together.
///
/// Dropping the handle restores every override the session still
/// owns, so an override cannot leak past its scope by accident;
/// [`Session::restore`] makes the restoration point explicit.
/// Overrides already restored through [`unstub`] are skipped: a
/// session only ever restores overrides it installed.
///
/// [`expect_install`]: crate::expect_install
#[must_use = "dropping a Session restores its overrides immediately"]
pub struct Session<'t> {
    target: &'t Object,
    overrides: Vec<(String, Uuid)>,
}

impl Session<'_> {
    /// Restores every override this session still owns.
    ///
    /// Equivalent to dropping the session; this just names the
    /// restoration point at the call site.
    pub fn restore(self) {}

    fn restore_all(&mut self) {
        debug!(class = self.target.class_name(), "closing stub session");

        for (method, token) in self.overrides.drain(..) {
            redirect::restore(self.target, &method, token);
        }
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.restore_all();
    }
}

impl fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("class", &self.target.class_name())
            .field(
                "methods",
                &self.overrides.iter().map(|(m, _)| m.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Stubs each method in `answers` on `target`, leaving the overrides
/// live until the returned [`Session`] restores them.
///
/// Installation is all-or-nothing: if any entry names a method
/// `target` does not define ([`Error::MethodNotFound`]) or one that
/// already carries an override, including a duplicate name within the
/// batch ([`Error::AlreadyOverridden`]), nothing is installed.
pub fn install<'t, N, A>(target: &'t Object, answers: A) -> Result<Session<'t>>
where
    N: Into<String>,
    A: IntoIterator<Item = (N, Answer)>,
{
    let answers: Vec<(String, Answer)> = answers
        .into_iter()
        .map(|(method, answer)| (method.into(), answer))
        .collect();

    // every entry is validated before any method table is touched
    let mut captures = Vec::with_capacity(answers.len());
    for (i, (method, _)) in answers.iter().enumerate() {
        let duplicate = answers[..i].iter().any(|(seen, _)| seen == method);
        if duplicate || redirect::is_active(target, method) {
            return Err(Error::AlreadyOverridden {
                class: target.class_name().to_owned(),
                method: method.clone(),
            });
        }

        captures.push(redirect::capture(target, method)?);
    }

    debug!(
        class = target.class_name(),
        methods = ?answers.iter().map(|(m, _)| m.as_str()).collect::<Vec<_>>(),
        "opening stub session"
    );

    let overrides = answers
        .into_iter()
        .zip(captures)
        .map(|((method, answer), captured)| {
            let token = redirect::install(target, &method, answer.into_method(), captured);
            (method, token)
        })
        .collect();

    Ok(Session { target, overrides })
}

/// Stubs each method in `answers` on `target` for the duration of
/// `work`, then restores the originals.
///
/// Restoration is unconditional: a panic unwinding out of `work`
/// still restores every override before it propagates, and a stub
/// that `work` never invoked restores like any other.
///
/// ```
/// use std::rc::Rc;
/// use standin::{json, Answer, Class};
///
/// let class = Rc::new(Class::new("SignupForm").define("valid", |_, _| json!(false)));
/// let signup = class.instance();
///
/// standin::stub(&signup, [("valid", Answer::value(true))], || {
///     assert_eq!(signup.call("valid", &[]).unwrap(), json!(true));
/// })
/// .unwrap();
///
/// assert_eq!(signup.call("valid", &[]).unwrap(), json!(false));
/// ```
pub fn stub<R, N, A>(target: &Object, answers: A, work: impl FnOnce() -> R) -> Result<R>
where
    N: Into<String>,
    A: IntoIterator<Item = (N, Answer)>,
{
    let session = install(target, answers)?;
    let result = work();
    session.restore();

    Ok(result)
}

/// Restores exactly the named overrides on `target`.
///
/// Fails with [`Error::NoActiveOverride`], restoring nothing, if any
/// name has no live override.
pub fn unstub(target: &Object, methods: &[&str]) -> Result<()> {
    let tokens: Vec<Uuid> = methods
        .iter()
        .map(|method| {
            redirect::active_token(target, method).ok_or_else(|| Error::NoActiveOverride {
                class: target.class_name().to_owned(),
                method: (*method).to_owned(),
            })
        })
        .collect::<Result<_>>()?;

    debug!(class = target.class_name(), ?methods, "unstubbing");

    for (method, token) in methods.iter().zip(tokens) {
        redirect::restore(target, method, token);
    }

    Ok(())
}
