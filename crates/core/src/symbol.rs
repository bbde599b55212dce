//! Symbol interning (§4.C).
//!
//! Symbols are canonicalized in a process-wide table keyed by
//! `(namespace, name)`. `intern` returns the same `Symbol` handle for
//! repeated calls with equal arguments, so `Symbol`'s `PartialEq`/`Hash`
//! can be plain `Rc` pointer identity instead of string comparison — the
//! fast-dispatch hinge the evaluator relies on (§4.F).
//!
//! The table is `thread_local!`, the same confinement strategy this
//! lineage uses for its other process-wide mutable registry (the
//! runtime error slot in `seq-runtime`'s predecessor): single-interpreter-
//! per-thread deployments get a free, mutex-free fast path, and each
//! thread sees its own canonical symbols.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

struct SymbolData {
    ns: Option<Rc<str>>,
    name: Rc<str>,
}

/// An interned symbol. Cloning is a cheap `Rc` bump; equality and hashing
/// are by interned identity, not by the strings it carries.
#[derive(Clone)]
pub struct Symbol(Rc<SymbolData>);

impl Symbol {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.0.ns.as_deref()
    }

    /// True for keyword-shaped names (`:foo`). Used by the evaluator's
    /// "keyword head" dispatch rule; keywords themselves are a distinct
    /// heap variant (`Value::Keyword`), this just flags symbols that look
    /// like one in source text before the reader chooses a variant.
    pub fn is_keyword_shaped(&self) -> bool {
        self.0.name.starts_with(':')
    }

    pub fn ptr_eq(a: &Symbol, b: &Symbol) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Symbol::ptr_eq(self, other)
    }
}
impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.ns {
            Some(ns) => write!(f, "{ns}/{}", self.0.name),
            None => f.write_str(&self.0.name),
        }
    }
}

type InternKey = (Option<Rc<str>>, Rc<str>);

thread_local! {
    static SYMBOLS: RefCell<HashMap<InternKey, Symbol>> = RefCell::new(HashMap::new());
}

/// Intern a symbol, returning the process-(thread-)wide canonical handle.
pub fn intern(ns: Option<&str>, name: &str) -> Symbol {
    SYMBOLS.with(|table| {
        let mut table = table.borrow_mut();
        let ns_rc = ns.map(Rc::from);
        let key: InternKey = (ns_rc.clone(), Rc::from(name));
        if let Some(existing) = table.get(&key) {
            return existing.clone();
        }
        let sym = Symbol(Rc::new(SymbolData {
            ns: ns_rc,
            name: Rc::from(name),
        }));
        table.insert(key, sym.clone());
        sym
    })
}

pub fn intern_unqualified(name: &str) -> Symbol {
    intern(None, name)
}

thread_local! {
    static GENSYM_COUNTER: Cell<u64> = const { Cell::new(0) };
}

/// Manufacture a fresh, interned, unqualified symbol named `{prefix}__{n}`
/// for some `n` no other call on this thread has produced. Not reachable
/// from evaluated source — there is no `gensym` builtin in `core` — this
/// exists so generated test fixtures can build distinct `def`/`fn`/`let`
/// binding names without the test author picking them by hand and risking
/// a collision with a name some other test already installed in the same
/// namespace.
pub fn gensym(prefix: &str) -> Symbol {
    let n = GENSYM_COUNTER.with(|c| {
        let n = c.get();
        c.set(n + 1);
        n
    });
    intern_unqualified(&format!("{prefix}__{n}"))
}

/// Reserved symbols for special forms and core bindings, interned once
/// at first use so the evaluator's dispatch table compares `Symbol`s by
/// pointer, never by name (§4.C, §4.F "Fast dispatch").
pub struct Reserved {
    pub quote: Symbol,
    pub if_: Symbol,
    pub do_: Symbol,
    pub def: Symbol,
    pub fn_: Symbol,
    pub let_: Symbol,
    pub loop_: Symbol,
    pub recur: Symbol,
    pub try_: Symbol,
    pub catch: Symbol,
    pub throw: Symbol,
    pub finally: Symbol,
    pub and: Symbol,
    pub or: Symbol,
    pub ns: Symbol,
    pub when: Symbol,
    pub when_not: Symbol,
    pub cond: Symbol,
    pub for_: Symbol,
    pub doseq: Symbol,
    pub dotimes: Symbol,
    pub star_ns_star: Symbol,
}

thread_local! {
    static RESERVED: Reserved = Reserved {
        quote: intern_unqualified("quote"),
        if_: intern_unqualified("if"),
        do_: intern_unqualified("do"),
        def: intern_unqualified("def"),
        fn_: intern_unqualified("fn"),
        let_: intern_unqualified("let"),
        loop_: intern_unqualified("loop"),
        recur: intern_unqualified("recur"),
        try_: intern_unqualified("try"),
        catch: intern_unqualified("catch"),
        throw: intern_unqualified("throw"),
        finally: intern_unqualified("finally"),
        and: intern_unqualified("and"),
        or: intern_unqualified("or"),
        ns: intern_unqualified("ns"),
        when: intern_unqualified("when"),
        when_not: intern_unqualified("when-not"),
        cond: intern_unqualified("cond"),
        for_: intern_unqualified("for"),
        doseq: intern_unqualified("doseq"),
        dotimes: intern_unqualified("dotimes"),
        star_ns_star: intern_unqualified("*ns*"),
    };
}

/// Run `f` with access to the reserved-symbol table, interning it on
/// first use for the current thread.
pub fn with_reserved<T>(f: impl FnOnce(&Reserved) -> T) -> T {
    RESERVED.with(f)
}

/// The full set of names that may never be shadowed by `def` (§4.F
/// "Fast dispatch" — shadowing a reserved name is a `SyntaxError`).
pub fn is_reserved_name(name: &str) -> bool {
    matches!(
        name,
        "quote"
            | "if"
            | "do"
            | "def"
            | "fn"
            | "let"
            | "loop"
            | "recur"
            | "try"
            | "catch"
            | "throw"
            | "finally"
            | "and"
            | "or"
            | "ns"
            | "when"
            | "when-not"
            | "cond"
            | "for"
            | "doseq"
            | "dotimes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_returns_pointer_identical_symbols() {
        let a = intern(Some("user"), "foo");
        let b = intern(Some("user"), "foo");
        assert!(Symbol::ptr_eq(&a, &b));
    }

    #[test]
    fn different_namespaces_are_distinct() {
        let a = intern(Some("user"), "foo");
        let b = intern(Some("other"), "foo");
        assert!(!Symbol::ptr_eq(&a, &b));
        assert_ne!(a, b);
    }

    #[test]
    fn display_includes_namespace_when_present() {
        let a = intern(Some("user"), "foo");
        assert_eq!(a.to_string(), "user/foo");
        let b = intern_unqualified("bar");
        assert_eq!(b.to_string(), "bar");
    }

    #[test]
    fn reserved_names_are_recognized() {
        assert!(is_reserved_name("def"));
        assert!(is_reserved_name("recur"));
        assert!(!is_reserved_name("square"));
    }

    #[test]
    fn gensym_never_repeats_a_name() {
        let a = gensym("fixture");
        let b = gensym("fixture");
        assert_ne!(a, b);
        assert!(a.name().starts_with("fixture__"));
    }
}
