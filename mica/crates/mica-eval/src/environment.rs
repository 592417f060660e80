use std::cell::RefCell;
use std::rc::Rc;

use mica_util::Symbol;
use rustc_hash::FxHashMap;

use crate::value::Value;

/// A lexical scope: a name-to-value map plus an optional link to the
/// enclosing scope. Lookup walks inner-to-outer. `Rc<RefCell<_>>` lets a
/// closure hold a live, shared handle to its defining environment rather
/// than a snapshot: mutations made through one handle are visible through
/// every other handle to the same environment, including ones reachable
/// only via a cycle (a function bound into the very environment it
/// captures). Cycles are tolerated, not collected.
pub struct Environment {
    store: FxHashMap<Symbol, Value>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            store: FxHashMap::default(),
            outer: None,
        }))
    }

    /// A new scope enclosing `outer`, used both for function call frames
    /// and (conceptually) anywhere a nested environment would be needed.
    pub fn enclosed(outer: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            store: FxHashMap::default(),
            outer: Some(outer),
        }))
    }

    pub fn get(&self, name: Symbol) -> Option<Value> {
        if let Some(value) = self.store.get(&name) {
            return Some(value.clone());
        }
        self.outer.as_ref()?.borrow().get(name)
    }

    /// `let` always writes the innermost scope, even when shadowing an
    /// outer binding of the same name.
    pub fn bind(&mut self, name: Symbol, value: Value) {
        self.store.insert(name, value);
    }

    /// `=` locates the scope in the chain that already holds `name` and
    /// overwrites it there. Returns `false` (and leaves every scope
    /// untouched) if no scope in the chain binds `name`.
    pub fn assign(&mut self, name: Symbol, value: Value) -> bool {
        if self.store.contains_key(&name) {
            self.store.insert(name, value);
            return true;
        }
        match &self.outer {
            Some(outer) => outer.borrow_mut().assign(name, value),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn let_binds_in_the_innermost_scope() {
        let outer = Environment::new();
        outer.borrow_mut().bind(Symbol::intern("x"), Value::Integer(1));
        let inner = Environment::enclosed(outer.clone());
        inner.borrow_mut().bind(Symbol::intern("x"), Value::Integer(2));

        assert!(matches!(
            inner.borrow().get(Symbol::intern("x")),
            Some(Value::Integer(2))
        ));
        assert!(matches!(
            outer.borrow().get(Symbol::intern("x")),
            Some(Value::Integer(1))
        ));
    }

    #[test]
    fn lookup_walks_the_chain_to_an_outer_binding() {
        let outer = Environment::new();
        outer
            .borrow_mut()
            .bind(Symbol::intern("shared"), Value::Integer(42));
        let inner = Environment::enclosed(outer);

        assert!(matches!(
            inner.borrow().get(Symbol::intern("shared")),
            Some(Value::Integer(42))
        ));
    }

    #[test]
    fn assign_mutates_the_outer_scope_in_place() {
        let outer = Environment::new();
        outer
            .borrow_mut()
            .bind(Symbol::intern("counter"), Value::Integer(0));
        let inner = Environment::enclosed(outer.clone());

        assert!(inner.borrow_mut().assign(Symbol::intern("counter"), Value::Integer(1)));
        assert!(matches!(
            outer.borrow().get(Symbol::intern("counter")),
            Some(Value::Integer(1))
        ));
    }

    #[test]
    fn assign_to_an_unbound_name_fails_without_creating_it() {
        let env = Environment::new();
        assert!(!env.borrow_mut().assign(Symbol::intern("ghost"), Value::Integer(1)));
        assert!(env.borrow().get(Symbol::intern("ghost")).is_none());
    }

    #[test]
    fn a_closure_sees_mutations_made_through_another_handle() {
        let outer = Environment::new();
        outer.borrow_mut().bind(Symbol::intern("n"), Value::Integer(1));
        let captured = outer.clone();
        outer.borrow_mut().assign(Symbol::intern("n"), Value::Integer(2));
        assert!(matches!(
            captured.borrow().get(Symbol::intern("n")),
            Some(Value::Integer(2))
        ));
    }
}
