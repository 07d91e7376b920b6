use std::rc::Rc;

use crate::{
	common::{Names, Scope, Symbol},
	frontend::{elaborate::ElaborationErrorKind, evaluate::Evaluate as _},
	ir::{
		semantics::{Environment, Value},
		syntax::Core,
	},
};

/// What a name in a context stands for.
#[derive(Clone, Debug)]
pub enum Binder {
	/// Reserved by `claim`, waiting for its `define`.
	Claim(Value),
	/// Bound by an enclosing binder; it has a type but no value.
	Free(Value),
	Def(Value, Value),
}

impl Binder {
	pub fn ty(&self) -> &Value {
		match self {
			Self::Claim(ty) | Self::Free(ty) | Self::Def(ty, _) => ty,
		}
	}
}

/// The names in scope during elaboration.
///
/// The run-time environment a context projects to is maintained alongside the bindings, so that evaluating
/// in a context never has to rebuild it.
#[derive(Clone)]
pub struct Context {
	names: Rc<Names>,
	bindings: Scope<Binder>,
	environment: Environment,
}

impl Context {
	pub fn new(names: Rc<Names>) -> Self {
		Self { names, bindings: Scope::empty(), environment: Scope::empty() }
	}

	pub fn names(&self) -> &Rc<Names> { &self.names }

	pub fn bindings(&self) -> &Scope<Binder> { &self.bindings }

	/// Binds a variable without a value; the name must be new to the context.
	pub fn bind_free(&self, symbol: Symbol, ty: Value) -> Result<Self, ElaborationErrorKind> {
		if self.bindings.contains(symbol) {
			return Err(ElaborationErrorKind::DuplicateBinding(symbol));
		}
		Ok(self.extend_free(symbol, ty))
	}

	/// Binds a variable the caller already knows to be fresh.
	pub(super) fn extend_free(&self, symbol: Symbol, ty: Value) -> Self {
		Self {
			names: self.names.clone(),
			environment: self.environment.extend(symbol, Value::variable(symbol, ty.clone())),
			bindings: self.bindings.extend(symbol, Binder::Free(ty)),
		}
	}

	/// Defines a name; definitions may shadow.
	#[must_use]
	pub fn bind_value(&self, symbol: Symbol, ty: Value, value: Value) -> Self {
		Self {
			names: self.names.clone(),
			environment: self.environment.extend(symbol, value.clone()),
			bindings: self.bindings.extend(symbol, Binder::Def(ty, value)),
		}
	}

	#[must_use]
	pub fn claim(&self, symbol: Symbol, ty: Value) -> Self {
		Self {
			names: self.names.clone(),
			environment: self.environment.clone(),
			bindings: self.bindings.extend(symbol, Binder::Claim(ty)),
		}
	}

	/// The environment in which terms elaborated in this context evaluate: claims are dropped, definitions keep
	/// their values and free variables stand for themselves.
	pub fn to_environment(&self) -> Environment { self.environment.clone() }

	/// The most recent binder for a name, whatever its kind.
	pub fn binder(&self, symbol: Symbol) -> Option<&Binder> { self.bindings.lookup(symbol) }

	/// The type of a variable in scope. Claims are not in scope until they are defined.
	pub fn lookup_type(&self, symbol: Symbol) -> Result<&Value, ElaborationErrorKind> {
		self.bindings
			.iter()
			.find(|(key, binder)| *key == symbol && !matches!(binder, Binder::Claim(_)))
			.map(|(_, binder)| binder.ty())
			.ok_or(ElaborationErrorKind::UnboundVariable(symbol))
	}

	pub fn evaluate(&self, term: &Core) -> Value { term.evaluate_in(&self.environment) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn free_names_cannot_be_bound_twice() {
		let names = Names::new();
		let x = names.intern("x");
		let context = Context::new(names).bind_free(x, Value::Nat).unwrap();
		assert!(matches!(context.bind_free(x, Value::Atom), Err(ElaborationErrorKind::DuplicateBinding(_))));
		assert!(matches!(context.claim(Symbol::N, Value::Nat).bind_free(Symbol::N, Value::Nat), Err(_)));
	}

	#[test]
	fn claims_are_invisible_to_evaluation_and_lookup() {
		let names = Names::new();
		let (x, y) = (names.intern("x"), names.intern("y"));
		let context = Context::new(names).claim(x, Value::Nat).bind_value(y, Value::Nat, Value::Zero);
		assert!(context.to_environment().lookup(x).is_none());
		assert!(matches!(context.to_environment().lookup(y), Some(Value::Zero)));
		assert!(matches!(context.lookup_type(x), Err(ElaborationErrorKind::UnboundVariable(_))));
		assert!(matches!(context.binder(x), Some(Binder::Claim(_))));
	}

	#[test]
	fn free_variables_evaluate_to_themselves() {
		let names = Names::new();
		let x = names.intern("x");
		let context = Context::new(names).bind_free(x, Value::Nat).unwrap();
		let value = context.evaluate(&Core::Variable(x));
		assert!(matches!(value, Value::Neutral { ref ty, .. } if matches!(**ty, Value::Nat)));
	}

	#[test]
	fn definitions_shadow() {
		let names = Names::new();
		let x = names.intern("x");
		let context = Context::new(names)
			.bind_value(x, Value::Nat, Value::Zero)
			.bind_value(x, Value::Atom, Value::Quote(Symbol::X));
		assert!(matches!(context.lookup_type(x), Ok(Value::Atom)));
	}
}
