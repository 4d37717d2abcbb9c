//! Per-(target, method) interception: captures the implementation a
//! call would resolve to and binds a replacement in its place, until
//! the captured original is re-bound exactly.

use std::{cell::RefCell, collections::HashMap};

use tracing::trace;
use uuid::Uuid;

use crate::{
    error::Result,
    object::{MethodFn, Object, Slot},
};

/// The original implementation of an intercepted method, captured
/// immediately before installation.
///
/// Holding the implementation itself (not its name) keeps restoration
/// exact even if the name is rebound while the override is live. The
/// slot records where resolution found it, so restoring a
/// class-resolved method removes the temporary instance binding
/// instead of leaving one behind.
pub(crate) struct Captured {
    original: MethodFn,
    slot: Slot,
}

struct ActiveOverride {
    token: Uuid,
    captured: Captured,
}

/// The live overrides of one object, keyed by method name.
///
/// At most one override per method is ever recorded here; the engines
/// reject a second stub while one is live.
#[derive(Default)]
pub(crate) struct Registry {
    active: RefCell<HashMap<String, ActiveOverride>>,
}

/// Resolves the implementation `method` would invoke on `target`
/// right now. Fails with [`Error::MethodNotFound`] if nothing
/// resolves; never mutates.
///
/// [`Error::MethodNotFound`]: crate::Error::MethodNotFound
pub(crate) fn capture(target: &Object, method: &str) -> Result<Captured> {
    let (original, slot) = target
        .resolve(method)
        .ok_or_else(|| target.method_not_found(method))?;

    Ok(Captured { original, slot })
}

/// Token of the override currently live for `method`, if any.
pub(crate) fn active_token(target: &Object, method: &str) -> Option<Uuid> {
    target
        .registry
        .active
        .borrow()
        .get(method)
        .map(|live| live.token)
}

pub(crate) fn is_active(target: &Object, method: &str) -> bool {
    active_token(target, method).is_some()
}

/// Binds `replacement` over `method` and stashes the captured
/// original. The returned token must be presented to [`restore`].
pub(crate) fn install(
    target: &Object,
    method: &str,
    replacement: MethodFn,
    captured: Captured,
) -> Uuid {
    let token = Uuid::new_v4();
    trace!(method, %token, "installing override");

    target
        .registry
        .active
        .borrow_mut()
        .insert(method.to_owned(), ActiveOverride { token, captured });
    target.bind(method, replacement);

    token
}

/// Re-binds the captured original for `method`, provided the live
/// override still carries `token`.
///
/// Returns whether a restoration happened. A stale or unknown token
/// means this override was already restored (or a newer one took its
/// place after an unstub) and the method table is left alone; an
/// override never transitions out of the restored state twice.
pub(crate) fn restore(target: &Object, method: &str, token: Uuid) -> bool {
    let mut active = target.registry.active.borrow_mut();

    let live = match active.remove(method) {
        Some(live) if live.token == token => live,
        Some(other) => {
            trace!(method, %token, "restore token is stale, leaving newer override in place");
            active.insert(method.to_owned(), other);
            return false;
        }
        None => {
            trace!(method, %token, "override already restored");
            return false;
        }
    };
    drop(active);

    trace!(method, %token, "restoring original");
    match live.captured.slot {
        Slot::Own => target.bind(method, live.captured.original),
        Slot::Inherited => target.unbind(method),
    }

    true
}
