use std::rc::Rc;

use crate::{
	common::Symbol,
	frontend::context::Context,
	ir::{
		semantics::{Neutral, Normal, Value},
		syntax::Core,
	},
};

impl Context {
	/// Binds a fresh variable of type `ty`, returning it alongside the extended context.
	pub fn bind_fresh(&self, suggestion: Symbol, ty: &Value) -> (Symbol, Value, Self) {
		let symbol = self.fresh(suggestion);
		(symbol, Value::variable(symbol, ty.clone()), self.extend_free(symbol, ty.clone()))
	}

	/// Transforms a value into its normal form, directed by its type.
	pub fn read_back(&self, ty: &Value, value: &Value) -> Core {
		match (ty.now(), value.now()) {
			(Value::Universe, value) => self.read_back_type(&value),

			(Value::Nat, Value::Zero) => Core::Zero,
			(Value::Nat, Value::Add1(previous)) => Core::Add1(self.read_back(&Value::Nat, &previous).into()),

			(Value::Pi { parameter, base, family }, value) => {
				let suggestion = match &value {
					Value::Lambda { parameter, .. } => *parameter,
					_ => parameter,
				};
				let (symbol, variable, context) = self.bind_fresh(suggestion, &base);
				let body = context.read_back(&family.evaluate_with(variable.clone()), &value.apply(variable));
				Core::Lambda { parameter: symbol, body: body.into() }
			}

			(Value::Sigma { base, family, .. }, value) => {
				let car = value.car();
				let cdr = self.read_back(&family.evaluate_with(car.clone()), &value.cdr());
				Core::Cons(self.read_back(&base, &car).into(), cdr.into())
			}

			(Value::Atom, Value::Quote(symbol)) => Core::Quote(symbol),

			(Value::Trivial, _) => Core::Sole,

			(Value::List(_), Value::Nil) => Core::Nil,
			(Value::List(entry), Value::ListCons(head, tail)) => Core::ListCons(
				self.read_back(&entry, &head).into(),
				self.read_back(&Value::List(entry), &tail).into(),
			),

			(Value::Absurd, Value::Neutral { neutral, .. }) =>
				Core::The(Core::Absurd.into(), self.read_back_neutral(&neutral).into()),
			(Value::Absurd, value) => panic!("a canonical value {value:?} inhabits Absurd"),

			(Value::Equal { ty, .. }, Value::Same(point)) => Core::Same(self.read_back(&ty, &point).into()),

			(Value::Vec { .. }, Value::VecNil) => Core::VecNil,
			(Value::Vec { entry, length }, Value::VecCons(head, tail)) => match length.now() {
				Value::Add1(previous) => Core::VecCons(
					self.read_back(&entry, &head).into(),
					self.read_back(&Value::Vec { entry, length: previous }, &tail).into(),
				),
				length => panic!("a non-empty list has length {length:?}"),
			},

			(Value::Either(left, _), Value::Left(value)) => Core::Left(self.read_back(&left, &value).into()),
			(Value::Either(_, right), Value::Right(value)) => Core::Right(self.read_back(&right, &value).into()),

			(_, Value::Neutral { neutral, .. }) => self.read_back_neutral(&neutral),

			(ty, value) => panic!("cannot read back {value:?} at type {ty:?}"),
		}
	}

	/// Transforms a type value into a core type.
	pub fn read_back_type(&self, value: &Value) -> Core {
		match value.now() {
			Value::Universe => Core::Universe,
			Value::Nat => Core::Nat,
			Value::Atom => Core::Atom,
			Value::Trivial => Core::Trivial,
			Value::Absurd => Core::Absurd,
			Value::Pi { parameter, base, family } => {
				let (symbol, variable, context) = self.bind_fresh(parameter, &base);
				Core::Pi {
					parameter: symbol,
					base: self.read_back_type(&base).into(),
					family: context.read_back_type(&family.evaluate_with(variable)).into(),
				}
			}
			Value::Sigma { parameter, base, family } => {
				let (symbol, variable, context) = self.bind_fresh(parameter, &base);
				Core::Sigma {
					parameter: symbol,
					base: self.read_back_type(&base).into(),
					family: context.read_back_type(&family.evaluate_with(variable)).into(),
				}
			}
			Value::List(entry) => Core::List(self.read_back_type(&entry).into()),
			Value::Equal { ty, from, to } => Core::Equal {
				ty: self.read_back_type(&ty).into(),
				from: self.read_back(&ty, &from).into(),
				to: self.read_back(&ty, &to).into(),
			},
			Value::Vec { entry, length } => Core::Vec {
				entry: self.read_back_type(&entry).into(),
				length: self.read_back(&Value::Nat, &length).into(),
			},
			Value::Either(left, right) =>
				Core::Either(self.read_back_type(&left).into(), self.read_back_type(&right).into()),
			Value::Neutral { neutral, .. } => self.read_back_neutral(&neutral),
			value => panic!("{value:?} is not a type"),
		}
	}

	fn read_back_normal(&self, normal: &Normal) -> Core { self.read_back(&normal.ty, &normal.value) }

	pub fn read_back_neutral(&self, neutral: &Neutral) -> Core {
		use Neutral as N;
		let normal = |normal: &Normal| -> Rc<Core> { self.read_back_normal(normal).into() };
		let spine = |neutral: &Neutral| -> Rc<Core> { self.read_back_neutral(neutral).into() };
		let annotation = |normal: &Normal| -> Rc<Core> { self.read_back_type(&normal.ty).into() };
		match neutral {
			N::Variable(symbol) => Core::Variable(*symbol),
			N::Todo(range, ty) => Core::Todo(*range, self.read_back_type(ty).into()),
			N::Apply(function, argument) => Core::Apply(spine(function), normal(argument)),

			N::WhichNat { target, base, step } => Core::WhichNat {
				target: spine(target),
				base_type: annotation(base),
				base: normal(base),
				step: normal(step),
			},
			N::IterNat { target, base, step } => Core::IterNat {
				target: spine(target),
				base_type: annotation(base),
				base: normal(base),
				step: normal(step),
			},
			N::RecNat { target, base, step } => Core::RecNat {
				target: spine(target),
				base_type: annotation(base),
				base: normal(base),
				step: normal(step),
			},
			N::IndNat { target, motive, base, step } =>
				Core::IndNat { target: spine(target), motive: normal(motive), base: normal(base), step: normal(step) },

			N::Car(pair) => Core::Car(spine(pair)),
			N::Cdr(pair) => Core::Cdr(spine(pair)),

			N::RecList { target, base, step } => Core::RecList {
				target: spine(target),
				base_type: annotation(base),
				base: normal(base),
				step: normal(step),
			},
			N::IndList { target, motive, base, step } =>
				Core::IndList { target: spine(target), motive: normal(motive), base: normal(base), step: normal(step) },

			N::IndAbsurd { target, motive } =>
				Core::IndAbsurd { target: Core::The(Core::Absurd.into(), spine(target)).into(), motive: normal(motive) },

			N::Replace { target, motive, base } =>
				Core::Replace { target: spine(target), motive: normal(motive), base: normal(base) },
			N::Trans1(left, right) => Core::Trans(spine(left), normal(right)),
			N::Trans2(left, right) => Core::Trans(normal(left), spine(right)),
			N::Trans12(left, right) => Core::Trans(spine(left), spine(right)),
			N::Cong { target, result_type, function } =>
				Core::Cong { target: spine(target), result_type: normal(result_type), function: normal(function) },
			N::Symm(target) => Core::Symm(spine(target)),
			N::IndEq { target, motive, base } =>
				Core::IndEq { target: spine(target), motive: normal(motive), base: normal(base) },

			N::Head(target) => Core::Head(spine(target)),
			N::Tail(target) => Core::Tail(spine(target)),
			N::IndVec2 { length, target, motive, base, step } => Core::IndVec {
				length: normal(length),
				target: spine(target),
				motive: normal(motive),
				base: normal(base),
				step: normal(step),
			},
			N::IndVec12 { length, target, motive, base, step } => Core::IndVec {
				length: spine(length),
				target: spine(target),
				motive: normal(motive),
				base: normal(base),
				step: normal(step),
			},

			N::IndEither { target, motive, left, right } => Core::IndEither {
				target: spine(target),
				motive: normal(motive),
				left: normal(left),
				right: normal(right),
			},
		}
	}

	/// Evaluates an elaborated term and its type here and reads both back, giving `(the T e)` in normal form.
	pub fn normal_form(&self, term: &Core, ty: &Value) -> Core {
		let value = self.evaluate(term);
		Core::The(self.read_back_type(ty).into(), self.read_back(ty, &value).into())
	}
}
