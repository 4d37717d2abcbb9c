use std::fmt::{self, Formatter};

use serde_json::Value;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while stubbing, restoring, or
/// verifying a method.
///
/// Each variant is a distinct failure kind; callers are expected to
/// match on the variant rather than on the message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The target does not define the requested method, so there is
    /// nothing to invoke or intercept. Raised before anything is
    /// installed.
    #[error("undefined method `{method}` for class `{class}`")]
    MethodNotFound { class: String, method: String },

    /// Restoration was requested for a method that has no live
    /// override.
    #[error("no active override for method `{method}` on class `{class}`")]
    NoActiveOverride { class: String, method: String },

    /// The method already carries a live override. A method holds at
    /// most one override at a time; restore it before stubbing again.
    #[error("method `{method}` on class `{class}` is already stubbed")]
    AlreadyOverridden { class: String, method: String },

    /// An expected call arrived with different arguments.
    #[error(transparent)]
    ExpectationMismatch(#[from] Mismatch),
}

/// The argument report carried by [`Error::ExpectationMismatch`]:
/// what the expectation declared and what the call actually passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub expected: Vec<Value>,
    pub actual: Vec<Value>,
}

impl std::error::Error for Mismatch {}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Arguments did not match\n")?;
        f.write_str("  Expected: ")?;
        write_args(f, &self.expected)?;
        f.write_str("\n  Actual:   ")?;
        write_args(f, &self.actual)
    }
}

fn write_args(f: &mut Formatter<'_>, args: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    let mut args = args.iter();
    if let Some(first) = args.next() {
        write!(f, "{first}")?;
        args.try_for_each(|arg| write!(f, ", {arg}"))?;
    }
    f.write_str("]")
}
