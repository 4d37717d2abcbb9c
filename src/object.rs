//! The dispatch facade the rest of the crate intercepts: a shared
//! class-level method table with a per-instance table layered in
//! front of it.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use serde_json::Value;

use crate::{
    error::{Error, Result},
    redirect::Registry,
};

/// An invocable method implementation. Captured and re-bound as a
/// whole, never looked up again by name.
pub(crate) type MethodFn = Rc<dyn Fn(&Object, &[Value]) -> Result<Value>>;

/// Where method resolution found an implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Bound directly on the instance.
    Own,
    /// Resolved through the instance's class.
    Inherited,
}

/// A named, immutable method table shared by its instances.
///
/// ```
/// use std::rc::Rc;
/// use standin::{json, Class};
///
/// let class = Rc::new(
///     Class::new("Subject")
///         .define("foo", |_, _| json!("foo"))
///         .define("baz", |_, args| args[0].clone()),
/// );
///
/// let subject = class.instance();
/// assert_eq!(subject.call("foo", &[]).unwrap(), json!("foo"));
/// ```
pub struct Class {
    name: String,
    methods: HashMap<String, MethodFn>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Class {
            name: name.into(),
            methods: HashMap::new(),
        }
    }

    /// Defines a method on the class. Every instance resolves it
    /// unless the instance carries its own binding under the same
    /// name.
    pub fn define(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&Object, &[Value]) -> Value + 'static,
    ) -> Self {
        self.methods
            .insert(name.into(), Rc::new(move |object, args| Ok(method(object, args))));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates an instance backed by this class's method table.
    pub fn instance(self: &Rc<Self>) -> Object {
        Object {
            class: Rc::clone(self),
            own: RefCell::default(),
            registry: Registry::default(),
        }
    }
}

/// An instance of a [`Class`]: the target of stubbing.
///
/// Objects are identity-compared and never copied; every entry point
/// in the crate takes `&Object` and mutates the instance's own method
/// table through interior mutability. Stubbing one instance never
/// affects its siblings or the class itself.
pub struct Object {
    class: Rc<Class>,
    own: RefCell<HashMap<String, MethodFn>>,
    pub(crate) registry: Registry,
}

impl Object {
    /// Binds a method directly on this instance, shadowing any
    /// class-level method of the same name.
    pub fn define(
        &self,
        name: impl Into<String>,
        method: impl Fn(&Object, &[Value]) -> Value + 'static,
    ) {
        self.own
            .borrow_mut()
            .insert(name.into(), Rc::new(move |object, args| Ok(method(object, args))));
    }

    /// Invokes `name` with `args`, resolving the instance's own table
    /// before the class.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let (method, _) = self
            .resolve(name)
            .ok_or_else(|| self.method_not_found(name))?;
        // the table borrow ends inside `resolve`; the body may itself
        // stub or restore methods on this object
        method(self, args)
    }

    pub fn class_name(&self) -> &str {
        &self.class.name
    }

    /// True if `name` would resolve to an implementation.
    pub fn has_method(&self, name: &str) -> bool {
        self.own.borrow().contains_key(name) || self.class.methods.contains_key(name)
    }

    /// True if `name` is bound directly on this instance rather than
    /// resolved through its class.
    pub fn has_own_method(&self, name: &str) -> bool {
        self.own.borrow().contains_key(name)
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<(MethodFn, Slot)> {
        if let Some(method) = self.own.borrow().get(name) {
            return Some((Rc::clone(method), Slot::Own));
        }

        self.class
            .methods
            .get(name)
            .map(|method| (Rc::clone(method), Slot::Inherited))
    }

    pub(crate) fn bind(&self, name: &str, method: MethodFn) {
        self.own.borrow_mut().insert(name.to_owned(), method);
    }

    pub(crate) fn unbind(&self, name: &str) {
        self.own.borrow_mut().remove(name);
    }

    pub(crate) fn method_not_found(&self, name: &str) -> Error {
        Error::MethodNotFound {
            class: self.class.name.clone(),
            method: name.to_owned(),
        }
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class.name)
            .field("own", &self.own.borrow().keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
