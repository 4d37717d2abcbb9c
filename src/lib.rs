//! A library to stub and verify methods on dynamic objects, with
//! restoration guaranteed.
//!
//! A [`Class`] holds a shared method table and an [`Object`] is an
//! instance of one, with its own table layered in front. [`stub`]
//! temporarily replaces methods on a single object, [`expect`]
//! additionally verifies the arguments of the intercepted call, and
//! both always put the original behavior back, on normal exit and on
//! panic alike.
//!
//! Three rules shape the API:
//!
//! * stubbed methods are always restored, whether or not they were
//!   ever invoked
//! * a method the target does not define cannot be stubbed; the call
//!   fails before installing anything
//! * only the targeted instance changes; sibling instances and the
//!   class itself are untouched
//!
//! # Stubbing
//!
//! ```
//! use std::rc::Rc;
//! use standin::{json, Answer, Class};
//!
//! let class = Rc::new(Class::new("SignupForm").define("valid", |_, _| json!(false)));
//! let signup = class.instance();
//!
//! let seen = standin::stub(&signup, [("valid", Answer::value(true))], || {
//!     signup.call("valid", &[]).unwrap()
//! })
//! .unwrap();
//!
//! assert_eq!(seen, json!(true));
//! // the block is over; the original answers again
//! assert_eq!(signup.call("valid", &[]).unwrap(), json!(false));
//! ```
//!
//! A callable replacement receives the arguments of each call:
//!
//! ```
//! # use std::rc::Rc;
//! # use standin::{json, Answer, Class};
//! # let class = Rc::new(Class::new("Subject").define("bar", |_, _| json!("bar")));
//! # let subject = class.instance();
//! standin::stub(
//!     &subject,
//!     [("bar", Answer::from_fn(|args| args[0].clone()))],
//!     || assert_eq!(subject.call("bar", &[json!("echo")]).unwrap(), json!("echo")),
//! )
//! .unwrap();
//! ```
//!
//! Without a block, the overrides stay live until the returned
//! [`Session`] restores them, or until [`unstub`] restores them by
//! name.
//!
//! # Expecting
//!
//! ```
//! use std::rc::Rc;
//! use standin::{json, Class, Error, Expectation};
//!
//! let class = Rc::new(Class::new("User").define("update", |_, _| json!(false)));
//! let user = class.instance();
//!
//! standin::expect(
//!     &user,
//!     "update",
//!     Expectation::returns(true).with(["new name"]),
//!     || {
//!         let err = user.call("update", &[json!("unexpected")]).unwrap_err();
//!         assert!(matches!(err, Error::ExpectationMismatch(_)));
//!
//!         assert_eq!(user.call("update", &[json!("new name")]).unwrap(), json!(true));
//!     },
//! )
//! .unwrap();
//! ```
//!
//! A method holds at most one override at a time: stubbing an
//! already-stubbed method fails with [`Error::AlreadyOverridden`]
//! rather than stacking. See [`Error`] for the full failure taxonomy.

mod error;
mod expect;
mod object;
mod redirect;
mod stub;

pub use error::{Error, Mismatch, Result};
pub use expect::{expect, expect_install, Expectation};
pub use object::{Class, Object};
pub use stub::{install, stub, unstub, Answer, Session};

pub use serde_json::{json, Value};
