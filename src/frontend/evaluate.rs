use std::rc::Rc;

use crate::{
	common::Symbol,
	ir::{
		semantics::{Closure, Delay, Environment, Neutral, Normal, Value},
		syntax::Core,
	},
	utility::rc,
};

pub trait Evaluate {
	/// Transforms a core term into a value.
	fn evaluate(self) -> Value
	where
		Self: Sized,
	{
		self.evaluate_in(&Environment::empty())
	}

	fn evaluate_in(self, environment: &Environment) -> Value;
}

/// Suspends a subterm whose value may never be demanded.
fn later(environment: &Environment, term: &Rc<Core>) -> Rc<Value> {
	match term.as_ref() {
		Core::Variable(_)
		| Core::Universe
		| Core::Nat
		| Core::Zero
		| Core::Atom
		| Core::Quote(_)
		| Core::Trivial
		| Core::Sole
		| Core::Nil
		| Core::Absurd
		| Core::VecNil => rc!(term.as_ref().evaluate_in(environment)),
		_ => rc!(Value::Delay(rc!(Delay::new(environment.clone(), term.clone())))),
	}
}

fn capture(environment: &Environment, parameter: Symbol, body: &Rc<Core>) -> Rc<Closure> {
	rc!(Closure::Captured { environment: environment.clone(), parameter, body: body.clone() })
}

impl Evaluate for &Core {
	fn evaluate_in(self, environment: &Environment) -> Value {
		use Core as C;
		let now = |term: &Rc<Core>| term.as_ref().evaluate_in(environment);
		match self {
			C::The(_, term) => now(term),
			C::Variable(symbol) => environment
				.lookup(*symbol)
				.cloned()
				.unwrap_or_else(|| panic!("variable {symbol:?} is missing from the environment")),
			C::Todo(range, ty) => {
				let ty = now(ty);
				Value::stuck(ty.clone(), Neutral::Todo(*range, ty))
			}

			C::Universe => Value::Universe,

			// Natural numbers.
			C::Nat => Value::Nat,
			C::Zero => Value::Zero,
			C::Add1(previous) => Value::Add1(later(environment, previous)),
			C::WhichNat { target, base_type, base, step } =>
				now(target).which_nat(now(base_type), now(base), now(step)),
			C::IterNat { target, base_type, base, step } =>
				now(target).iter_nat(now(base_type), now(base), now(step)),
			C::RecNat { target, base_type, base, step } =>
				now(target).rec_nat(now(base_type), now(base), now(step)),
			C::IndNat { target, motive, base, step } => now(target).ind_nat(now(motive), now(base), now(step)),

			// Dependent functions.
			C::Pi { parameter, base, family } => Value::Pi {
				parameter: *parameter,
				base: now(base).into(),
				family: capture(environment, *parameter, family),
			},
			C::Lambda { parameter, body } =>
				Value::Lambda { parameter: *parameter, body: capture(environment, *parameter, body) },
			C::Apply(function, argument) => now(function).apply(later(environment, argument).as_ref().clone()),

			// Atoms.
			C::Atom => Value::Atom,
			C::Quote(symbol) => Value::Quote(*symbol),

			// Dependent pairs.
			C::Sigma { parameter, base, family } => Value::Sigma {
				parameter: *parameter,
				base: now(base).into(),
				family: capture(environment, *parameter, family),
			},
			C::Cons(car, cdr) => Value::Cons(later(environment, car), later(environment, cdr)),
			C::Car(pair) => now(pair).car(),
			C::Cdr(pair) => now(pair).cdr(),

			C::Trivial => Value::Trivial,
			C::Sole => Value::Sole,

			// Lists.
			C::List(entry) => Value::List(now(entry).into()),
			C::Nil => Value::Nil,
			C::ListCons(head, tail) => Value::ListCons(later(environment, head), later(environment, tail)),
			C::RecList { target, base_type, base, step } =>
				now(target).rec_list(now(base_type), now(base), now(step)),
			C::IndList { target, motive, base, step } => now(target).ind_list(now(motive), now(base), now(step)),

			C::Absurd => Value::Absurd,
			C::IndAbsurd { target, motive } => now(target).ind_absurd(now(motive)),

			// Equality.
			C::Equal { ty, from, to } =>
				Value::Equal { ty: now(ty).into(), from: later(environment, from), to: later(environment, to) },
			C::Same(point) => Value::Same(later(environment, point)),
			C::Replace { target, motive, base } => now(target).replace(now(motive), now(base)),
			C::Trans(left, right) => now(left).trans(&now(right)),
			C::Cong { target, result_type, function } => now(target).cong(now(result_type), now(function)),
			C::Symm(target) => now(target).symm(),
			C::IndEq { target, motive, base } => now(target).ind_eq(now(motive), now(base)),

			// Length-indexed lists.
			C::Vec { entry, length } => Value::Vec { entry: now(entry).into(), length: now(length).into() },
			C::VecNil => Value::VecNil,
			C::VecCons(head, tail) => Value::VecCons(later(environment, head), later(environment, tail)),
			C::Head(target) => now(target).head(),
			C::Tail(target) => now(target).tail(),
			C::IndVec { length, target, motive, base, step } =>
				now(target).ind_vec(now(length), now(motive), now(base), now(step)),

			// Sums.
			C::Either(left, right) => Value::Either(now(left).into(), now(right).into()),
			C::Left(value) => Value::Left(later(environment, value)),
			C::Right(value) => Value::Right(later(environment, value)),
			C::IndEither { target, motive, left, right } =>
				now(target).ind_either(now(motive), now(left), now(right)),
		}
	}
}

/// A dependent function type whose family is a host function.
pub fn pi(parameter: Symbol, base: Value, family: impl Fn(Value) -> Value + 'static) -> Value {
	Value::Pi { parameter, base: base.into(), family: rc!(Closure::native(family)) }
}

pub fn which_nat_step_type(base_type: Value) -> Value { Value::arrow(Symbol::N, Value::Nat, base_type) }

pub fn iter_nat_step_type(base_type: Value) -> Value { Value::arrow(Symbol::IH, base_type.clone(), base_type) }

/// The type of the step of `rec-Nat` at result type `base_type`.
pub fn rec_nat_step_type(base_type: Value) -> Value {
	Value::arrow(Symbol::PREVIOUS, Value::Nat, Value::arrow(Symbol::IH, base_type.clone(), base_type))
}

/// The type of the step of `ind-Nat` with the given motive.
pub fn ind_nat_step_type(motive: Value) -> Value {
	pi(Symbol::PREVIOUS, Value::Nat, move |previous| {
		let successor = Value::Add1(previous.clone().into());
		Value::arrow(Symbol::IH, motive.apply(previous), motive.apply(successor))
	})
}

pub fn rec_list_step_type(entry: Value, base_type: Value) -> Value {
	Value::arrow(
		Symbol::ENTRY,
		entry.clone(),
		Value::arrow(Symbol::ENTRIES, Value::List(entry.into()), Value::arrow(Symbol::IH, base_type.clone(), base_type)),
	)
}

pub fn ind_list_step_type(entry: Value, motive: Value) -> Value {
	let list = Value::List(entry.clone().into());
	pi(Symbol::ENTRY, entry, move |head| {
		let motive = motive.clone();
		pi(Symbol::ENTRIES, list.clone(), move |tail| {
			let cons = Value::ListCons(head.clone().into(), tail.clone().into());
			Value::arrow(Symbol::IH, motive.apply(tail), motive.apply(cons))
		})
	})
}

/// The type of the motive of `ind-=` for equalities starting at `from`.
pub fn ind_eq_motive_type(ty: Value, from: Value) -> Value {
	let space = ty.clone();
	pi(Symbol::TO, ty, move |to| {
		let equal = Value::Equal { ty: space.clone().into(), from: from.clone().into(), to: to.into() };
		Value::arrow(Symbol::PROOF, equal, Value::Universe)
	})
}

pub fn ind_vec_motive_type(entry: Value) -> Value {
	pi(Symbol::LENGTH, Value::Nat, move |length| {
		Value::arrow(Symbol::ENTRIES, Value::Vec { entry: entry.clone().into(), length: length.into() }, Value::Universe)
	})
}

pub fn ind_vec_step_type(entry: Value, motive: Value) -> Value {
	pi(Symbol::LENGTH, Value::Nat, move |length| {
		let (entry, motive) = (entry.clone(), motive.clone());
		pi(Symbol::ENTRY, entry.clone(), move |head| {
			let (length, motive) = (length.clone(), motive.clone());
			let vec = Value::Vec { entry: entry.clone().into(), length: length.clone().into() };
			pi(Symbol::ENTRIES, vec, move |tail| {
				let hypothesis = motive.apply(length.clone()).apply(tail.clone());
				let successor = Value::Add1(length.clone().into());
				let cons = Value::VecCons(head.clone().into(), tail.into());
				Value::arrow(Symbol::IH, hypothesis, motive.apply(successor).apply(cons))
			})
		})
	})
}

/// The types of the two methods of `ind-Either`.
pub fn ind_either_method_types(left: Value, right: Value, motive: Value) -> (Value, Value) {
	let left_motive = motive.clone();
	(
		pi(Symbol::X, left, move |value| left_motive.apply(Value::Left(value.into()))),
		pi(Symbol::X, right, move |value| motive.apply(Value::Right(value.into()))),
	)
}

/// The type of a non-indexed motive over `base`.
pub fn motive_type(base: Value) -> Value { Value::arrow(Symbol::X, base, Value::Universe) }

impl Value {
	pub fn apply(&self, argument: Value) -> Value {
		match self.now() {
			Value::Lambda { body, .. } => body.evaluate_with(argument),
			Value::Neutral { ty, neutral } => match ty.now() {
				Value::Pi { base, family, .. } => Value::stuck(
					family.evaluate_with(argument.clone()),
					Neutral::Apply(neutral, Normal::new(base.as_ref().clone(), argument)),
				),
				ty => panic!("applied a neutral of non-function type {ty:?}"),
			},
			value => panic!("applied a non-function {value:?}"),
		}
	}

	pub fn which_nat(&self, base_type: Value, base: Value, step: Value) -> Value {
		match self.now() {
			Value::Zero => base,
			Value::Add1(previous) => step.apply(previous.as_ref().clone()),
			Value::Neutral { neutral, .. } => Value::stuck(base_type.clone(), Neutral::WhichNat {
				target: neutral,
				base: Normal::new(base_type.clone(), base),
				step: Normal::new(which_nat_step_type(base_type), step),
			}),
			value => panic!("which-Nat on {value:?}"),
		}
	}

	pub fn iter_nat(&self, base_type: Value, base: Value, step: Value) -> Value {
		match self.now() {
			Value::Zero => base,
			Value::Add1(previous) => step.apply(previous.iter_nat(base_type, base, step.clone())),
			Value::Neutral { neutral, .. } => Value::stuck(base_type.clone(), Neutral::IterNat {
				target: neutral,
				base: Normal::new(base_type.clone(), base),
				step: Normal::new(iter_nat_step_type(base_type), step),
			}),
			value => panic!("iter-Nat on {value:?}"),
		}
	}

	pub fn rec_nat(&self, base_type: Value, base: Value, step: Value) -> Value {
		match self.now() {
			Value::Zero => base,
			Value::Add1(previous) => {
				let recursion = previous.rec_nat(base_type, base, step.clone());
				step.apply(previous.as_ref().clone()).apply(recursion)
			}
			Value::Neutral { neutral, .. } => Value::stuck(base_type.clone(), Neutral::RecNat {
				target: neutral,
				base: Normal::new(base_type.clone(), base),
				step: Normal::new(rec_nat_step_type(base_type), step),
			}),
			value => panic!("rec-Nat on {value:?}"),
		}
	}

	pub fn ind_nat(&self, motive: Value, base: Value, step: Value) -> Value {
		match self.now() {
			Value::Zero => base,
			Value::Add1(previous) => {
				let recursion = previous.ind_nat(motive, base, step.clone());
				step.apply(previous.as_ref().clone()).apply(recursion)
			}
			Value::Neutral { neutral, .. } => Value::stuck(motive.apply(self.clone()), Neutral::IndNat {
				target: neutral,
				motive: Normal::new(motive_type(Value::Nat), motive.clone()),
				base: Normal::new(motive.apply(Value::Zero), base),
				step: Normal::new(ind_nat_step_type(motive), step),
			}),
			value => panic!("ind-Nat on {value:?}"),
		}
	}

	pub fn car(&self) -> Value {
		match self.now() {
			Value::Cons(car, _) => car.as_ref().clone(),
			Value::Neutral { ty, neutral } => match ty.now() {
				Value::Sigma { base, .. } => Value::stuck(base.as_ref().clone(), Neutral::Car(neutral)),
				ty => panic!("car of a neutral of type {ty:?}"),
			},
			value => panic!("car of {value:?}"),
		}
	}

	pub fn cdr(&self) -> Value {
		match self.now() {
			Value::Cons(_, cdr) => cdr.as_ref().clone(),
			Value::Neutral { ty, neutral } => match ty.now() {
				Value::Sigma { family, .. } => Value::stuck(family.evaluate_with(self.car()), Neutral::Cdr(neutral)),
				ty => panic!("cdr of a neutral of type {ty:?}"),
			},
			value => panic!("cdr of {value:?}"),
		}
	}

	pub fn rec_list(&self, base_type: Value, base: Value, step: Value) -> Value {
		match self.now() {
			Value::Nil => base,
			Value::ListCons(head, tail) => {
				let recursion = tail.rec_list(base_type, base, step.clone());
				step.apply(head.as_ref().clone()).apply(tail.as_ref().clone()).apply(recursion)
			}
			Value::Neutral { ty, neutral } => match ty.now() {
				Value::List(entry) => Value::stuck(base_type.clone(), Neutral::RecList {
					target: neutral,
					base: Normal::new(base_type.clone(), base),
					step: Normal::new(rec_list_step_type(entry.as_ref().clone(), base_type), step),
				}),
				ty => panic!("rec-List on a neutral of type {ty:?}"),
			},
			value => panic!("rec-List on {value:?}"),
		}
	}

	pub fn ind_list(&self, motive: Value, base: Value, step: Value) -> Value {
		match self.now() {
			Value::Nil => base,
			Value::ListCons(head, tail) => {
				let recursion = tail.ind_list(motive, base, step.clone());
				step.apply(head.as_ref().clone()).apply(tail.as_ref().clone()).apply(recursion)
			}
			Value::Neutral { ty, neutral } => match ty.now() {
				Value::List(entry) => Value::stuck(motive.apply(self.clone()), Neutral::IndList {
					target: neutral,
					motive: Normal::new(motive_type(Value::List(entry.clone())), motive.clone()),
					base: Normal::new(motive.apply(Value::Nil), base),
					step: Normal::new(ind_list_step_type(entry.as_ref().clone(), motive), step),
				}),
				ty => panic!("ind-List on a neutral of type {ty:?}"),
			},
			value => panic!("ind-List on {value:?}"),
		}
	}

	pub fn ind_absurd(&self, motive: Value) -> Value {
		match self.now() {
			Value::Neutral { neutral, .. } => Value::stuck(motive.clone(), Neutral::IndAbsurd {
				target: neutral,
				motive: Normal::new(Value::Universe, motive),
			}),
			value => panic!("ind-Absurd on {value:?}"),
		}
	}

	pub fn replace(&self, motive: Value, base: Value) -> Value {
		match self.now() {
			Value::Same(_) => base,
			Value::Neutral { ty, neutral } => match ty.now() {
				Value::Equal { ty, from, to } => Value::stuck(motive.apply(to.as_ref().clone()), Neutral::Replace {
					target: neutral,
					motive: Normal::new(motive_type(ty.as_ref().clone()), motive.clone()),
					base: Normal::new(motive.apply(from.as_ref().clone()), base),
				}),
				ty => panic!("replace on a neutral of type {ty:?}"),
			},
			value => panic!("replace on {value:?}"),
		}
	}

	pub fn trans(&self, right: &Value) -> Value {
		let reflexive = |ty: &Rc<Value>, point: &Rc<Value>| {
			let ty = Value::Equal { ty: ty.clone(), from: point.clone(), to: point.clone() };
			Normal::new(ty, Value::Same(point.clone()))
		};
		match (self.now(), right.now()) {
			(Value::Same(from), Value::Same(_)) => Value::Same(from),
			(Value::Same(from), Value::Neutral { ty, neutral }) => match ty.now() {
				Value::Equal { ty, to, .. } => Value::stuck(
					Value::Equal { ty: ty.clone(), from: from.clone(), to },
					Neutral::Trans2(reflexive(&ty, &from), neutral),
				),
				ty => panic!("trans on a neutral of type {ty:?}"),
			},
			(Value::Neutral { ty, neutral }, Value::Same(to)) => match ty.now() {
				Value::Equal { ty, from, .. } => Value::stuck(
					Value::Equal { ty: ty.clone(), from, to: to.clone() },
					Neutral::Trans1(neutral, reflexive(&ty, &to)),
				),
				ty => panic!("trans on a neutral of type {ty:?}"),
			},
			(Value::Neutral { ty: left_ty, neutral: left }, Value::Neutral { ty: right_ty, neutral: right }) =>
				match (left_ty.now(), right_ty.now()) {
					(Value::Equal { ty, from, .. }, Value::Equal { to, .. }) =>
						Value::stuck(Value::Equal { ty, from, to }, Neutral::Trans12(left, right)),
					types => panic!("trans on neutrals of types {types:?}"),
				},
			values => panic!("trans on {values:?}"),
		}
	}

	pub fn cong(&self, result_type: Value, function: Value) -> Value {
		match self.now() {
			Value::Same(point) => Value::Same(function.apply(point.as_ref().clone()).into()),
			Value::Neutral { ty, neutral } => match ty.now() {
				Value::Equal { ty, from, to } => Value::stuck(
					Value::Equal {
						ty: result_type.clone().into(),
						from: function.apply(from.as_ref().clone()).into(),
						to: function.apply(to.as_ref().clone()).into(),
					},
					Neutral::Cong {
						target: neutral,
						result_type: Normal::new(Value::Universe, result_type.clone()),
						function: Normal::new(Value::arrow(Symbol::X, ty.as_ref().clone(), result_type), function),
					},
				),
				ty => panic!("cong on a neutral of type {ty:?}"),
			},
			value => panic!("cong on {value:?}"),
		}
	}

	pub fn symm(&self) -> Value {
		match self.now() {
			Value::Same(point) => Value::Same(point),
			Value::Neutral { ty, neutral } => match ty.now() {
				Value::Equal { ty, from, to } =>
					Value::stuck(Value::Equal { ty, from: to, to: from }, Neutral::Symm(neutral)),
				ty => panic!("symm on a neutral of type {ty:?}"),
			},
			value => panic!("symm on {value:?}"),
		}
	}

	pub fn ind_eq(&self, motive: Value, base: Value) -> Value {
		match self.now() {
			Value::Same(_) => base,
			Value::Neutral { ty, neutral } => match ty.now() {
				Value::Equal { ty, from, to } => {
					let (from, to) = (from.as_ref().clone(), to.as_ref().clone());
					let base_type = motive.apply(from.clone()).apply(Value::Same(from.clone().into()));
					Value::stuck(motive.apply(to).apply(self.clone()), Neutral::IndEq {
						target: neutral,
						motive: Normal::new(ind_eq_motive_type(ty.as_ref().clone(), from), motive),
						base: Normal::new(base_type, base),
					})
				}
				ty => panic!("ind-= on a neutral of type {ty:?}"),
			},
			value => panic!("ind-= on {value:?}"),
		}
	}

	pub fn head(&self) -> Value {
		match self.now() {
			Value::VecCons(head, _) => head.as_ref().clone(),
			Value::Neutral { ty, neutral } => match ty.now() {
				Value::Vec { entry, .. } => Value::stuck(entry.as_ref().clone(), Neutral::Head(neutral)),
				ty => panic!("head of a neutral of type {ty:?}"),
			},
			value => panic!("head of {value:?}"),
		}
	}

	pub fn tail(&self) -> Value {
		match self.now() {
			Value::VecCons(_, tail) => tail.as_ref().clone(),
			Value::Neutral { ty, neutral } => match ty.now() {
				Value::Vec { entry, length } => match length.now() {
					Value::Add1(previous) =>
						Value::stuck(Value::Vec { entry, length: previous }, Neutral::Tail(neutral)),
					length => panic!("tail of a neutral of length {length:?}"),
				},
				ty => panic!("tail of a neutral of type {ty:?}"),
			},
			value => panic!("tail of {value:?}"),
		}
	}

	pub fn ind_vec(&self, length: Value, motive: Value, base: Value, step: Value) -> Value {
		match (length.now(), self.now()) {
			(_, Value::VecNil) => base,
			(Value::Add1(previous), Value::VecCons(head, tail)) => {
				let recursion = tail.ind_vec(previous.as_ref().clone(), motive, base, step.clone());
				step.apply(previous.as_ref().clone())
					.apply(head.as_ref().clone())
					.apply(tail.as_ref().clone())
					.apply(recursion)
			}
			(length, Value::Neutral { ty, neutral }) => {
				let Value::Vec { entry, .. } = ty.now() else { panic!("ind-Vec on a neutral of type {ty:?}") };
				let entry = entry.as_ref().clone();
				let ty = motive.apply(length.clone()).apply(self.clone());
				let motive_normal = Normal::new(ind_vec_motive_type(entry.clone()), motive.clone());
				let base = Normal::new(motive.apply(Value::Zero).apply(Value::VecNil), base);
				let step = Normal::new(ind_vec_step_type(entry, motive), step);
				match length {
					Value::Neutral { neutral: length, .. } => Value::stuck(ty, Neutral::IndVec12 {
						length,
						target: neutral,
						motive: motive_normal,
						base,
						step,
					}),
					length => Value::stuck(ty, Neutral::IndVec2 {
						length: Normal::new(Value::Nat, length),
						target: neutral,
						motive: motive_normal,
						base,
						step,
					}),
				}
			}
			values => panic!("ind-Vec on {values:?}"),
		}
	}

	pub fn ind_either(&self, motive: Value, left: Value, right: Value) -> Value {
		match self.now() {
			Value::Left(value) => left.apply(value.as_ref().clone()),
			Value::Right(value) => right.apply(value.as_ref().clone()),
			Value::Neutral { ty, neutral } => match ty.now() {
				Value::Either(left_type, right_type) => {
					let either = Value::Either(left_type.clone(), right_type.clone());
					let (left_method, right_method) = ind_either_method_types(
						left_type.as_ref().clone(),
						right_type.as_ref().clone(),
						motive.clone(),
					);
					Value::stuck(motive.apply(self.clone()), Neutral::IndEither {
						target: neutral,
						motive: Normal::new(motive_type(either), motive),
						left: Normal::new(left_method, left),
						right: Normal::new(right_method, right),
					})
				}
				ty => panic!("ind-Either on a neutral of type {ty:?}"),
			},
			value => panic!("ind-Either on {value:?}"),
		}
	}
}
