//! Namespace registry (§4.C).
//!
//! A `Namespace` is a first-class, reference-counted object: a name
//! symbol, a mutable bindings map, and an optional parent for resolution
//! fallback. `ns_resolve` walks the current namespace, then its parent
//! chain, which always bottoms out at the shared `core` namespace that
//! hosts the builtins `seq-runtime` installs at startup.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::symbol::Symbol;
use crate::value::Value;

struct NamespaceData {
    name: Symbol,
    bindings: RefCell<HashMap<Symbol, Value>>,
    parent: Option<Namespace>,
}

/// A namespace handle. Cheap to clone (`Rc` bump); two handles compare
/// equal iff they name the same underlying namespace object.
#[derive(Clone)]
pub struct Namespace(Rc<NamespaceData>);

impl Namespace {
    fn new(name: Symbol, parent: Option<Namespace>) -> Self {
        Namespace(Rc::new(NamespaceData {
            name,
            bindings: RefCell::new(HashMap::new()),
            parent,
        }))
    }

    pub fn name(&self) -> &Symbol {
        &self.0.name
    }

    /// Install or overwrite a binding in this namespace (`def`).
    pub fn define(&self, sym: Symbol, value: Value) {
        self.0.bindings.borrow_mut().insert(sym, value);
    }

    /// Look up a binding in this namespace only (no parent fallback).
    pub fn get_local(&self, sym: &Symbol) -> Option<Value> {
        self.0.bindings.borrow().get(sym).cloned()
    }

    /// `ns_resolve`: this namespace, then its parent chain.
    pub fn resolve(&self, sym: &Symbol) -> Option<Value> {
        if let Some(v) = self.get_local(sym) {
            return Some(v);
        }
        match &self.0.parent {
            Some(parent) => parent.resolve(sym),
            None => None,
        }
    }

    pub fn parent(&self) -> Option<&Namespace> {
        self.0.parent.as_ref()
    }
}

impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for Namespace {}

/// Process-(thread-)wide namespace registry, keyed by name. Mirrors the
/// symbol intern table's confinement strategy (§5): mutation of this
/// table (namespace creation) must be serialized across hosts sharing
/// an interpreter, which a single-threaded-per-interpreter deployment
/// gets for free via `thread_local!`.
thread_local! {
    static NAMESPACES: RefCell<HashMap<String, Namespace>> = RefCell::new(HashMap::new());
}

/// Name of the always-present root namespace that hosts builtins.
pub const CORE_NS: &str = "core";

/// Name of the namespace a fresh interpreter state starts in.
pub const DEFAULT_NS: &str = "user";

fn core_namespace() -> Namespace {
    NAMESPACES.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.entry(CORE_NS.to_string())
            .or_insert_with(|| Namespace::new(crate::symbol::intern_unqualified(CORE_NS), None))
            .clone()
    })
}

/// `ns_get_or_create(name)`: fetch the namespace named `name`, creating
/// it (parented to `core`) if it does not yet exist. Creating `core`
/// itself returns the singleton root.
pub fn ns_get_or_create(name: &str) -> Namespace {
    if name == CORE_NS {
        return core_namespace();
    }
    NAMESPACES.with(|reg| {
        if let Some(existing) = reg.borrow().get(name) {
            return existing.clone();
        }
        let parent = core_namespace();
        let ns = Namespace::new(crate::symbol::intern_unqualified(name), Some(parent));
        reg.borrow_mut().insert(name.to_string(), ns.clone());
        ns
    })
}

/// Reset the registry. Exposed for test isolation (`free_state`/tests
/// that want a clean namespace table between cases) and for sandboxes
/// that want to discard all `def`s.
pub fn reset_registry() {
    NAMESPACES.with(|reg| reg.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::intern_unqualified;

    #[test]
    fn get_or_create_returns_same_namespace() {
        reset_registry();
        let a = ns_get_or_create("test-a");
        let b = ns_get_or_create("test-a");
        assert_eq!(a, b);
    }

    #[test]
    fn define_and_resolve_local() {
        reset_registry();
        let ns = ns_get_or_create("test-b");
        let sym = intern_unqualified("x");
        ns.define(sym.clone(), Value::Int(42));
        assert_eq!(ns.resolve(&sym), Some(Value::Int(42)));
    }

    #[test]
    fn resolve_falls_back_to_core() {
        reset_registry();
        let core = ns_get_or_create(CORE_NS);
        let sym = intern_unqualified("the-builtin");
        core.define(sym.clone(), Value::Int(7));
        let user = ns_get_or_create("test-c");
        assert_eq!(user.resolve(&sym), Some(Value::Int(7)));
    }

    #[test]
    fn unresolved_symbol_returns_none() {
        reset_registry();
        let ns = ns_get_or_create("test-d");
        let sym = intern_unqualified("missing");
        assert_eq!(ns.resolve(&sym), None);
    }
}
