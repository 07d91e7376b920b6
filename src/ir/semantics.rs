use std::{cell::RefCell, fmt, rc::Rc};

use super::syntax::Core;
use crate::{
	common::{Range, Scope, Symbol},
	frontend::evaluate::Evaluate as _,
};

/// Run-time bindings, newest first.
pub type Environment = Scope<Value>;

#[derive(Clone, Debug)]
pub enum Value {
	// Neutrals.
	Neutral { ty: Rc<Self>, neutral: Rc<Neutral> },
	Delay(Rc<Delay>),

	Universe,

	// Natural numbers.
	Nat,
	Zero,
	Add1(Rc<Self>),

	// Dependent functions.
	Pi { parameter: Symbol, base: Rc<Self>, family: Rc<Closure> },
	Lambda { parameter: Symbol, body: Rc<Closure> },

	// Atoms.
	Atom,
	Quote(Symbol),

	// Dependent pairs.
	Sigma { parameter: Symbol, base: Rc<Self>, family: Rc<Closure> },
	Cons(Rc<Self>, Rc<Self>),

	Trivial,
	Sole,

	// Lists.
	List(Rc<Self>),
	Nil,
	ListCons(Rc<Self>, Rc<Self>),

	Absurd,

	// Equality.
	Equal { ty: Rc<Self>, from: Rc<Self>, to: Rc<Self> },
	Same(Rc<Self>),

	// Length-indexed lists.
	Vec { entry: Rc<Self>, length: Rc<Self> },
	VecNil,
	VecCons(Rc<Self>, Rc<Self>),

	// Sums.
	Either(Rc<Self>, Rc<Self>),
	Left(Rc<Self>),
	Right(Rc<Self>),
}

impl Value {
	/// Forces any outermost delay, so that the result is never `Delay`.
	pub fn now(&self) -> Self {
		match self {
			Self::Delay(delay) => delay.force(),
			value => value.clone(),
		}
	}

	pub fn variable(symbol: Symbol, ty: Self) -> Self {
		Self::Neutral { ty: ty.into(), neutral: Neutral::Variable(symbol).into() }
	}

	/// A stuck eliminator of type `ty`.
	pub fn stuck(ty: Self, neutral: Neutral) -> Self { Self::Neutral { ty: ty.into(), neutral: neutral.into() } }

	/// A closure that ignores its argument.
	pub fn constant(value: Self) -> Closure { Closure::Native(Rc::new(move |_| value.clone())) }

	/// The non-dependent function type.
	pub fn arrow(parameter: Symbol, base: Self, codomain: Self) -> Self {
		Self::Pi { parameter, base: base.into(), family: Self::constant(codomain).into() }
	}
}

/// A deferred substitution.
#[derive(Clone)]
pub enum Closure {
	/// A body waiting for its parameter in a captured environment.
	Captured { environment: Environment, parameter: Symbol, body: Rc<Core> },
	/// A host function, for closures built from values that are already computed.
	Native(Rc<dyn Fn(Value) -> Value>),
}

impl Closure {
	pub fn native(function: impl Fn(Value) -> Value + 'static) -> Self { Self::Native(Rc::new(function)) }

	/// Substitutes an argument into the closure.
	pub fn evaluate_with(&self, argument: Value) -> Value {
		match self {
			Self::Captured { environment, parameter, body } =>
				body.as_ref().evaluate_in(&environment.extend(*parameter, argument)),
			Self::Native(function) => function(argument),
		}
	}
}

impl fmt::Debug for Closure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Captured { parameter, body, .. } =>
				f.debug_struct("Captured").field("parameter", parameter).field("body", body).finish_non_exhaustive(),
			Self::Native(_) => f.write_str("Native(..)"),
		}
	}
}

/// A memoized suspended evaluation.
///
/// The cell is forced at most once; every holder of the same `Rc<Delay>` observes the same value afterwards.
pub struct Delay(RefCell<Thunk>);

enum Thunk {
	Pending(Environment, Rc<Core>),
	Forcing,
	Forced(Value),
}

impl Delay {
	pub fn new(environment: Environment, term: Rc<Core>) -> Self {
		Self(RefCell::new(Thunk::Pending(environment, term)))
	}

	pub fn is_forced(&self) -> bool { matches!(*self.0.borrow(), Thunk::Forced(_)) }

	pub fn force(&self) -> Value {
		if let Thunk::Forced(value) = &*self.0.borrow() {
			return value.clone();
		}
		let thunk = std::mem::replace(&mut *self.0.borrow_mut(), Thunk::Forcing);
		match thunk {
			Thunk::Pending(environment, term) => {
				let value = term.as_ref().evaluate_in(&environment).now();
				*self.0.borrow_mut() = Thunk::Forced(value.clone());
				value
			}
			Thunk::Forcing => panic!("a delayed value demanded itself while being forced"),
			Thunk::Forced(_) => unreachable!(),
		}
	}
}

impl fmt::Debug for Delay {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &*self.0.borrow() {
			Thunk::Pending(_, term) => f.debug_tuple("Pending").field(term).finish(),
			Thunk::Forcing => f.write_str("Forcing"),
			Thunk::Forced(value) => f.debug_tuple("Forced").field(value).finish(),
		}
	}
}

/// A value together with its type, stored wherever read-back must later recover a normal form.
#[derive(Clone, Debug)]
pub struct Normal {
	pub ty: Value,
	pub value: Value,
}

impl Normal {
	pub fn new(ty: Value, value: Value) -> Self { Self { ty, value } }
}

/// A computation stuck on a variable.
#[derive(Clone, Debug)]
pub enum Neutral {
	Variable(Symbol),
	/// A hole and its expected type.
	Todo(Range, Value),

	// Dependent functions.
	Apply(Rc<Self>, Normal),

	// Natural numbers.
	WhichNat { target: Rc<Self>, base: Normal, step: Normal },
	IterNat { target: Rc<Self>, base: Normal, step: Normal },
	RecNat { target: Rc<Self>, base: Normal, step: Normal },
	IndNat { target: Rc<Self>, motive: Normal, base: Normal, step: Normal },

	// Dependent pairs.
	Car(Rc<Self>),
	Cdr(Rc<Self>),

	// Lists.
	RecList { target: Rc<Self>, base: Normal, step: Normal },
	IndList { target: Rc<Self>, motive: Normal, base: Normal, step: Normal },

	IndAbsurd { target: Rc<Self>, motive: Normal },

	// Equality.
	Replace { target: Rc<Self>, motive: Normal, base: Normal },
	Trans1(Rc<Self>, Normal),
	Trans2(Normal, Rc<Self>),
	Trans12(Rc<Self>, Rc<Self>),
	Cong { target: Rc<Self>, result_type: Normal, function: Normal },
	Symm(Rc<Self>),
	IndEq { target: Rc<Self>, motive: Normal, base: Normal },

	// Length-indexed lists.
	Head(Rc<Self>),
	Tail(Rc<Self>),
	/// Stuck on the list while the length is known.
	IndVec2 { length: Normal, target: Rc<Self>, motive: Normal, base: Normal, step: Normal },
	/// Stuck on both the length and the list.
	IndVec12 { length: Rc<Self>, target: Rc<Self>, motive: Normal, base: Normal, step: Normal },

	// Sums.
	IndEither { target: Rc<Self>, motive: Normal, left: Normal, right: Normal },
}
