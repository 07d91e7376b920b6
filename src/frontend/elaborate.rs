use std::rc::Rc;

use tracing::trace;

use crate::{
	common::{Range, Scope, Symbol},
	frontend::{
		context::Context,
		evaluate::{
			ind_either_method_types, ind_eq_motive_type, ind_list_step_type, ind_nat_step_type, ind_vec_motive_type,
			ind_vec_step_type, iter_nat_step_type, motive_type, rec_list_step_type, rec_nat_step_type,
			which_nat_step_type,
		},
		message::Message,
	},
	ir::{
		presyntax::{BindingSite, Preterm, Src, TypedBinder},
		semantics::{Closure, Value},
		syntax::{Core, MAX_NUMERAL},
	},
};

#[derive(Debug, Clone, thiserror::Error)]
#[error("ill-typed expression at {range:?}")]
pub struct ElaborationError {
	pub range: Range,
	pub kind: ElaborationErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedFormer {
	Pi,
	Sigma,
	List,
	Equal,
	Vec,
	Either,
}

/// The shape a length index was required to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
	Zero,
	Successor,
}

#[derive(Debug, Clone)]
pub enum ElaborationErrorKind {
	UnboundVariable(Symbol),
	DuplicateBinding(Symbol),
	TypeMismatch { expected: Core, found: Core },
	NotTheSame { ty: Core, left: Core, right: Core },
	ExpectedFormer { expected: ExpectedFormer, found: Core },
	IllTypedMotive { expected: Core, cause: Box<Self> },
	CannotSynthesize,
	NotAType { found: Core },
	UniverseHasNoType,
	NumeralTooLarge(u64),
	VecLengthMismatch { expected: Length, found: Core },
	AlreadyDefined(Symbol),
	NotClaimed(Symbol),
}

impl ElaborationErrorKind {
	pub fn at(self, range: Range) -> ElaborationError { ElaborationError { range, kind: self } }

	/// Describes the error as text interleaved with the terms involved.
	pub fn message(&self) -> Message {
		use ElaborationErrorKind::*;
		let message = Message::default();
		match self {
			UnboundVariable(symbol) => message.text("unknown variable ").core(Core::Variable(*symbol)),
			DuplicateBinding(symbol) =>
				message.text("the name ").core(Core::Variable(*symbol)).text(" is already bound"),
			TypeMismatch { expected, found } =>
				message.text("expected ").core(expected.clone()).text(" but found ").core(found.clone()),
			NotTheSame { ty, left, right } => message
				.text("the expressions ")
				.core(left.clone())
				.text(" and ")
				.core(right.clone())
				.text(" are not the same ")
				.core(ty.clone()),
			ExpectedFormer { expected, found } => message
				.text(match expected {
					self::ExpectedFormer::Pi => "expected a function type (Π) but found ",
					self::ExpectedFormer::Sigma => "expected a pair type (Σ) but found ",
					self::ExpectedFormer::List => "expected a List type but found ",
					self::ExpectedFormer::Equal => "expected an equality type (=) but found ",
					self::ExpectedFormer::Vec => "expected a Vec type but found ",
					self::ExpectedFormer::Either => "expected an Either type but found ",
				})
				.core(found.clone()),
			IllTypedMotive { expected, cause } =>
				message.text("the motive should have type ").core(expected.clone()).text(": ").append(cause.message()),
			CannotSynthesize => message.text("cannot determine the type of this expression; annotate it with `the`"),
			NotAType { found } => message.text("expected a type but found an expression of type ").core(found.clone()),
			UniverseHasNoType => message.text("U is a type, but it does not have a type"),
			NumeralTooLarge(n) =>
				message.text(&format!("the numeral {n} is larger than the largest supported numeral {MAX_NUMERAL}")),
			VecLengthMismatch { expected, found } => message
				.text(match expected {
					Length::Zero => "expected a Vec of length zero",
					Length::Successor => "expected a Vec of length (add1 n)",
				})
				.text(" but its length is ")
				.core(found.clone()),
			AlreadyDefined(symbol) => message.text("the name ").core(Core::Variable(*symbol)).text(" is already defined"),
			NotClaimed(symbol) =>
				message.text("the name ").core(Core::Variable(*symbol)).text(" must be claimed before it is defined"),
		}
	}
}

/// An elaborated term together with its type.
#[derive(Debug, Clone)]
pub struct Synthesized {
	pub term: Core,
	pub ty: Value,
}

impl Synthesized {
	fn new(term: Core, ty: Value) -> Self { Self { term, ty } }
}

impl Context {
	/// Elaborates an expression whose type can be computed from the expression itself.
	pub fn synthesize(&self, source: &Src) -> Result<Synthesized, ElaborationError> {
		Elaborator::new(self).synthesize(source)
	}

	/// Elaborates an expression against an expected type.
	pub fn check(&self, source: &Src, ty: &Value) -> Result<Core, ElaborationError> {
		Elaborator::new(self).check(source, ty)
	}

	/// Elaborates an expression that must be a type.
	pub fn is_type(&self, source: &Src) -> Result<Core, ElaborationError> { Elaborator::new(self).is_type(source) }

	/// Synthesizes, then normalizes both the elaborated term and its type.
	pub fn normalize(&self, source: &Src) -> Result<Core, ElaborationError> {
		let Synthesized { term, ty } = self.synthesize(source)?;
		Ok(self.normal_form(&term, &ty))
	}
}

/// How the components of a type former are elaborated.
#[derive(Clone, Copy)]
enum Component {
	/// Each component must itself be a type.
	Type,
	/// Each component is checked against `U`.
	Universe,
}

/// The checker's state inside a single top-level elaboration.
///
/// Binders written by the user are renamed to names fresh for the context, and `renaming` records the
/// correspondence so that references in the body see the renamed binder.
#[derive(Clone)]
struct Elaborator {
	context: Context,
	renaming: Scope<Symbol>,
}

impl Elaborator {
	fn new(context: &Context) -> Self { Self { context: context.clone(), renaming: Scope::empty() } }

	fn evaluate(&self, term: &Core) -> Value { self.context.evaluate(term) }

	fn read_back_type(&self, ty: &Value) -> Rc<Core> { self.context.read_back_type(ty).into() }

	fn expected_former(&self, expected: ExpectedFormer, found: &Value, range: Range) -> ElaborationError {
		ElaborationErrorKind::ExpectedFormer { expected, found: self.context.read_back_type(found) }.at(range)
	}

	/// Binds a user-written name, renaming it to a name fresh for the context.
	fn bind(&self, site: BindingSite, ty: Value) -> Result<(Symbol, Self), ElaborationError> {
		let symbol = self.context.fresh(site.symbol);
		let context = self.context.bind_free(symbol, ty).map_err(|kind| kind.at(site.range))?;
		Ok((symbol, Self { context, renaming: self.renaming.extend(site.symbol, symbol) }))
	}

	/// Binds a name introduced by the checker itself, which no user-written name refers to.
	fn bind_hidden(&self, symbol: Symbol, ty: Value, range: Range) -> Result<Self, ElaborationError> {
		let context = self.context.bind_free(symbol, ty).map_err(|kind| kind.at(range))?;
		Ok(Self { context, renaming: self.renaming.clone() })
	}

	/// Maps a user-written name to the binder it refers to.
	fn resolve(&self, symbol: Symbol) -> Result<Symbol, ElaborationErrorKind> {
		if let Some(renamed) = self.renaming.lookup(symbol) {
			Ok(*renamed)
		} else if self.renaming.iter().any(|(_, renamed)| *renamed == symbol) {
			// A renamed binder cannot be referred to by its new name.
			Err(ElaborationErrorKind::UnboundVariable(symbol))
		} else {
			Ok(symbol)
		}
	}

	fn is_type(&self, source: &Src) -> Result<Core, ElaborationError> {
		match source.preterm {
			Preterm::Universe => Ok(Core::Universe),
			_ => self.former(source, Component::Type),
		}
	}

	fn component(&self, source: &Src, component: Component) -> Result<Core, ElaborationError> {
		match component {
			Component::Type => self.is_type(source),
			Component::Universe => self.check(source, &Value::Universe),
		}
	}

	/// Elaborates a type former. Any other expression is a type exactly when it checks against `U`.
	fn former(&self, source: &Src, component: Component) -> Result<Core, ElaborationError> {
		use Preterm as P;
		Ok(match &source.preterm {
			P::Nat => Core::Nat,
			P::Atom => Core::Atom,
			P::Trivial => Core::Trivial,
			P::Absurd => Core::Absurd,
			P::Arrow(domain, rest) =>
				self.nondependent(domain, rest, component, |parameter, base, family| Core::Pi { parameter, base, family })?,
			P::Pi(binders, body) =>
				self.telescope(binders, body, component, |parameter, base, family| Core::Pi { parameter, base, family })?,
			P::Sigma(binders, body) => self.telescope(binders, body, component, |parameter, base, family| {
				Core::Sigma { parameter, base, family }
			})?,
			P::Pair(car, cdr) => self.nondependent(car, std::slice::from_ref(&**cdr), component, |parameter, base, family| {
				Core::Sigma { parameter, base, family }
			})?,
			P::List(entry) => Core::List(self.component(entry, component)?.into()),
			P::Equal { ty, from, to } => {
				let ty = self.component(ty, component)?;
				let space = self.evaluate(&ty);
				Core::Equal { ty: ty.into(), from: self.check(from, &space)?.into(), to: self.check(to, &space)?.into() }
			}
			P::Vec(entry, length) => Core::Vec {
				entry: self.component(entry, component)?.into(),
				length: self.check(length, &Value::Nat)?.into(),
			},
			P::Either(left, right) =>
				Core::Either(self.component(left, component)?.into(), self.component(right, component)?.into()),
			_ => self.check(source, &Value::Universe).map_err(|error| match error.kind {
				ElaborationErrorKind::TypeMismatch { found, .. } if error.range == source.range =>
					ElaborationErrorKind::NotAType { found }.at(error.range),
				_ => error,
			})?,
		})
	}

	/// Elaborates `(-> A B ... Z)` and `(Pair A D)`, whose binders the user never names.
	fn nondependent(
		&self,
		domain: &Src,
		rest: &[Src],
		component: Component,
		build: fn(Symbol, Rc<Core>, Rc<Core>) -> Core,
	) -> Result<Core, ElaborationError> {
		let Some((codomain, rest_after)) = rest.split_first() else { return self.component(domain, component) };
		let parameter = self.context.fresh_binder(rest, Symbol::X);
		let base = self.component(domain, component)?;
		let inner = self.bind_hidden(parameter, self.evaluate(&base), domain.range)?;
		let family = inner.nondependent(codomain, rest_after, component, build)?;
		Ok(build(parameter, base.into(), family.into()))
	}

	/// Elaborates the binders of `Π` and `Σ` one at a time, each in the scope of the previous ones.
	fn telescope(
		&self,
		binders: &[TypedBinder],
		body: &Src,
		component: Component,
		build: fn(Symbol, Rc<Core>, Rc<Core>) -> Core,
	) -> Result<Core, ElaborationError> {
		let Some((binder, rest)) = binders.split_first() else { return self.component(body, component) };
		let base = self.component(&binder.ty, component)?;
		let (parameter, inner) = self.bind(binder.site, self.evaluate(&base))?;
		let family = inner.telescope(rest, body, component, build)?;
		Ok(build(parameter, base.into(), family.into()))
	}

	/// Checks a motive, reporting a failure to have the required type as an ill-typed motive.
	fn check_motive(&self, source: &Src, ty: &Value) -> Result<(Core, Value), ElaborationError> {
		let motive = self.check(source, ty).map_err(|error| match error.kind {
			kind @ (ElaborationErrorKind::TypeMismatch { .. }
			| ElaborationErrorKind::ExpectedFormer { .. }
			| ElaborationErrorKind::NotAType { .. }) =>
				ElaborationErrorKind::IllTypedMotive { expected: self.context.read_back_type(ty), cause: kind.into() }
					.at(error.range),
			_ => error,
		})?;
		let value = self.evaluate(&motive);
		Ok((motive, value))
	}

	/// Synthesizes a term whose type must have a particular former, extracting the parts of the type.
	fn synthesize_former<T>(
		&self,
		source: &Src,
		expected: ExpectedFormer,
		parts: impl FnOnce(Value) -> Option<T>,
	) -> Result<(Core, T), ElaborationError> {
		let Synthesized { term, ty } = self.synthesize(source)?;
		let ty = ty.now();
		match parts(ty.clone()) {
			Some(parts) => Ok((term, parts)),
			None => Err(self.expected_former(expected, &ty, source.range)),
		}
	}

	fn synthesize_equal(&self, source: &Src) -> Result<(Core, (Value, Value, Value)), ElaborationError> {
		self.synthesize_former(source, ExpectedFormer::Equal, |ty| match ty {
			Value::Equal { ty, from, to } => Some((ty.as_ref().clone(), from.as_ref().clone(), to.as_ref().clone())),
			_ => None,
		})
	}

	fn synthesize(&self, source: &Src) -> Result<Synthesized, ElaborationError> {
		use Preterm as P;
		let range = source.range;
		Ok(match &source.preterm {
			P::The(ty, term) => {
				let ty = self.is_type(ty)?;
				let ty_value = self.evaluate(&ty);
				let term = self.check(term, &ty_value)?;
				Synthesized::new(Core::The(ty.into(), term.into()), ty_value)
			}
			P::Variable(symbol) => {
				let symbol = self.resolve(*symbol).map_err(|kind| kind.at(range))?;
				let ty = self.context.lookup_type(symbol).map_err(|kind| kind.at(range))?;
				Synthesized::new(Core::Variable(symbol), ty.clone())
			}

			P::Universe => return Err(ElaborationErrorKind::UniverseHasNoType.at(range)),
			P::Nat
			| P::Atom
			| P::Trivial
			| P::Absurd
			| P::Arrow(..)
			| P::Pi(..)
			| P::Sigma(..)
			| P::Pair(..)
			| P::List(_)
			| P::Equal { .. }
			| P::Vec(..)
			| P::Either(..) => Synthesized::new(self.former(source, Component::Universe)?, Value::Universe),

			// Natural numbers.
			P::Zero => Synthesized::new(Core::Zero, Value::Nat),
			P::Number(n) if *n > MAX_NUMERAL => return Err(ElaborationErrorKind::NumeralTooLarge(*n).at(range)),
			P::Number(n) => Synthesized::new(Core::numeral(*n), Value::Nat),
			P::Add1(previous) => Synthesized::new(Core::Add1(self.check(previous, &Value::Nat)?.into()), Value::Nat),
			P::WhichNat { target, base, step } => {
				let target = self.check(target, &Value::Nat)?;
				let Synthesized { term: base, ty: base_type } = self.synthesize(base)?;
				let step = self.check(step, &which_nat_step_type(base_type.clone()))?;
				let term = Core::WhichNat {
					target: target.into(),
					base_type: self.read_back_type(&base_type),
					base: base.into(),
					step: step.into(),
				};
				Synthesized::new(term, base_type)
			}
			P::IterNat { target, base, step } => {
				let target = self.check(target, &Value::Nat)?;
				let Synthesized { term: base, ty: base_type } = self.synthesize(base)?;
				let step = self.check(step, &iter_nat_step_type(base_type.clone()))?;
				let term = Core::IterNat {
					target: target.into(),
					base_type: self.read_back_type(&base_type),
					base: base.into(),
					step: step.into(),
				};
				Synthesized::new(term, base_type)
			}
			P::RecNat { target, base, step } => {
				let target = self.check(target, &Value::Nat)?;
				let Synthesized { term: base, ty: base_type } = self.synthesize(base)?;
				let step = self.check(step, &rec_nat_step_type(base_type.clone()))?;
				let term = Core::RecNat {
					target: target.into(),
					base_type: self.read_back_type(&base_type),
					base: base.into(),
					step: step.into(),
				};
				Synthesized::new(term, base_type)
			}
			P::IndNat { target, motive, base, step } => {
				let target = self.check(target, &Value::Nat)?;
				let (motive, motive_value) = self.check_motive(motive, &motive_type(Value::Nat))?;
				let base = self.check(base, &motive_value.apply(Value::Zero))?;
				let step = self.check(step, &ind_nat_step_type(motive_value.clone()))?;
				let ty = motive_value.apply(self.evaluate(&target));
				let term =
					Core::IndNat { target: target.into(), motive: motive.into(), base: base.into(), step: step.into() };
				Synthesized::new(term, ty)
			}

			// Dependent functions.
			P::Apply(function, arguments) => {
				let Synthesized { mut term, mut ty } = self.synthesize(function)?;
				for argument in arguments {
					let (base, family) = match ty.now() {
						Value::Pi { base, family, .. } => (base, family),
						found => return Err(self.expected_former(ExpectedFormer::Pi, &found, range)),
					};
					let argument = self.check(argument, &base)?;
					ty = family.evaluate_with(self.evaluate(&argument));
					term = Core::Apply(term.into(), argument.into());
				}
				Synthesized::new(term, ty)
			}

			// Atoms.
			P::Quote(symbol) => Synthesized::new(Core::Quote(*symbol), Value::Atom),

			// Dependent pairs.
			P::Car(pair) => {
				let (pair, base) = self.synthesize_former(pair, ExpectedFormer::Sigma, |ty| match ty {
					Value::Sigma { base, .. } => Some(base),
					_ => None,
				})?;
				Synthesized::new(Core::Car(pair.into()), base.as_ref().clone())
			}
			P::Cdr(pair) => {
				let (pair, family) = self.synthesize_former(pair, ExpectedFormer::Sigma, |ty| match ty {
					Value::Sigma { family, .. } => Some(family),
					_ => None,
				})?;
				let ty = family.evaluate_with(self.evaluate(&pair).car());
				Synthesized::new(Core::Cdr(pair.into()), ty)
			}

			P::Sole => Synthesized::new(Core::Sole, Value::Trivial),

			// Lists.
			P::ListCons(head, tail) => {
				let Synthesized { term: head, ty: entry } = self.synthesize(head)?;
				let list = Value::List(entry.into());
				let tail = self.check(tail, &list)?;
				Synthesized::new(Core::ListCons(head.into(), tail.into()), list)
			}
			P::RecList { target, base, step } => {
				let (target, entry) = self.synthesize_list(target)?;
				let Synthesized { term: base, ty: base_type } = self.synthesize(base)?;
				let step = self.check(step, &rec_list_step_type(entry, base_type.clone()))?;
				let term = Core::RecList {
					target: target.into(),
					base_type: self.read_back_type(&base_type),
					base: base.into(),
					step: step.into(),
				};
				Synthesized::new(term, base_type)
			}
			P::IndList { target, motive, base, step } => {
				let (target, entry) = self.synthesize_list(target)?;
				let list = Value::List(entry.clone().into());
				let (motive, motive_value) = self.check_motive(motive, &motive_type(list))?;
				let base = self.check(base, &motive_value.apply(Value::Nil))?;
				let step = self.check(step, &ind_list_step_type(entry, motive_value.clone()))?;
				let ty = motive_value.apply(self.evaluate(&target));
				let term =
					Core::IndList { target: target.into(), motive: motive.into(), base: base.into(), step: step.into() };
				Synthesized::new(term, ty)
			}

			P::IndAbsurd { target, motive } => {
				let target = self.check(target, &Value::Absurd)?;
				let motive = self.is_type(motive)?;
				let ty = self.evaluate(&motive);
				Synthesized::new(Core::IndAbsurd { target: target.into(), motive: motive.into() }, ty)
			}

			// Equality.
			P::Replace { target, motive, base } => {
				let (target, (space, from, to)) = self.synthesize_equal(target)?;
				let (motive, motive_value) = self.check_motive(motive, &motive_type(space))?;
				let base = self.check(base, &motive_value.apply(from))?;
				let term = Core::Replace { target: target.into(), motive: motive.into(), base: base.into() };
				Synthesized::new(term, motive_value.apply(to))
			}
			P::Trans(left, right) => {
				let (left_term, (space, from, middle)) = self.synthesize_equal(left)?;
				let (right_term, (right_space, right_middle, to)) = self.synthesize_equal(right)?;
				self.context.same_type(&space, &right_space).map_err(|kind| kind.at(right.range))?;
				self.context.convert(&space, &middle, &right_middle).map_err(|kind| kind.at(range))?;
				let ty = Value::Equal { ty: space.into(), from: from.into(), to: to.into() };
				Synthesized::new(Core::Trans(left_term.into(), right_term.into()), ty)
			}
			P::Cong(target, function) => {
				let (target, (space, from, to)) = self.synthesize_equal(target)?;
				let (function_term, (base, family)) =
					self.synthesize_former(function, ExpectedFormer::Pi, |ty| match ty {
						Value::Pi { base, family, .. } => Some((base, family)),
						_ => None,
					})?;
				self.context.same_type(&space, &base).map_err(|kind| kind.at(function.range))?;
				let result_type = family.evaluate_with(from.clone());
				let function_value = self.evaluate(&function_term);
				let ty = Value::Equal {
					ty: result_type.clone().into(),
					from: function_value.apply(from).into(),
					to: function_value.apply(to).into(),
				};
				let term = Core::Cong {
					target: target.into(),
					result_type: self.read_back_type(&result_type),
					function: function_term.into(),
				};
				Synthesized::new(term, ty)
			}
			P::Symm(target) => {
				let (target, (space, from, to)) = self.synthesize_equal(target)?;
				let ty = Value::Equal { ty: space.into(), from: to.into(), to: from.into() };
				Synthesized::new(Core::Symm(target.into()), ty)
			}
			P::IndEq { target, motive, base } => {
				let (target, (space, from, to)) = self.synthesize_equal(target)?;
				let (motive, motive_value) = self.check_motive(motive, &ind_eq_motive_type(space, from.clone()))?;
				let reflexive = Value::Same(from.clone().into());
				let base = self.check(base, &motive_value.apply(from).apply(reflexive))?;
				let ty = motive_value.apply(to).apply(self.evaluate(&target));
				Synthesized::new(Core::IndEq { target: target.into(), motive: motive.into(), base: base.into() }, ty)
			}

			// Length-indexed lists.
			P::Head(target) => {
				let (target, (entry, _)) = self.synthesize_nonempty(target)?;
				Synthesized::new(Core::Head(target.into()), entry)
			}
			P::Tail(target) => {
				let (target, (entry, previous)) = self.synthesize_nonempty(target)?;
				let ty = Value::Vec { entry: entry.into(), length: previous.into() };
				Synthesized::new(Core::Tail(target.into()), ty)
			}
			P::IndVec { length, target, motive, base, step } => {
				let length_source = length;
				let length = self.check(length, &Value::Nat)?;
				let length_value = self.evaluate(&length);
				let (target, (entry, target_length)) =
					self.synthesize_former(target, ExpectedFormer::Vec, |ty| match ty {
						Value::Vec { entry, length } => Some((entry.as_ref().clone(), length.as_ref().clone())),
						_ => None,
					})?;
				self.context
					.convert(&Value::Nat, &length_value, &target_length)
					.map_err(|kind| kind.at(length_source.range))?;
				let (motive, motive_value) = self.check_motive(motive, &ind_vec_motive_type(entry.clone()))?;
				let base = self.check(base, &motive_value.apply(Value::Zero).apply(Value::VecNil))?;
				let step = self.check(step, &ind_vec_step_type(entry, motive_value.clone()))?;
				let ty = motive_value.apply(length_value).apply(self.evaluate(&target));
				let term = Core::IndVec {
					length: length.into(),
					target: target.into(),
					motive: motive.into(),
					base: base.into(),
					step: step.into(),
				};
				Synthesized::new(term, ty)
			}

			// Sums.
			P::IndEither { target, motive, left, right } => {
				let (target, (left_type, right_type)) =
					self.synthesize_former(target, ExpectedFormer::Either, |ty| match ty {
						Value::Either(left, right) => Some((left.as_ref().clone(), right.as_ref().clone())),
						_ => None,
					})?;
				let either = Value::Either(left_type.clone().into(), right_type.clone().into());
				let (motive, motive_value) = self.check_motive(motive, &motive_type(either))?;
				let (left_method, right_method) = ind_either_method_types(left_type, right_type, motive_value.clone());
				let left = self.check(left, &left_method)?;
				let right = self.check(right, &right_method)?;
				let ty = motive_value.apply(self.evaluate(&target));
				let term =
					Core::IndEither { target: target.into(), motive: motive.into(), left: left.into(), right: right.into() };
				Synthesized::new(term, ty)
			}

			P::Todo
			| P::Lambda(..)
			| P::Cons(..)
			| P::Nil
			| P::Same(_)
			| P::VecNil
			| P::VecCons(..)
			| P::Left(_)
			| P::Right(_) => return Err(ElaborationErrorKind::CannotSynthesize.at(range)),
		})
	}

	fn synthesize_list(&self, source: &Src) -> Result<(Core, Value), ElaborationError> {
		self.synthesize_former(source, ExpectedFormer::List, |ty| match ty {
			Value::List(entry) => Some(entry.as_ref().clone()),
			_ => None,
		})
	}

	/// Synthesizes a list whose length must be a successor, giving its entry type and the predecessor length.
	fn synthesize_nonempty(&self, source: &Src) -> Result<(Core, (Value, Value)), ElaborationError> {
		let (term, (entry, length)) = self.synthesize_former(source, ExpectedFormer::Vec, |ty| match ty {
			Value::Vec { entry, length } => Some((entry.as_ref().clone(), length.now())),
			_ => None,
		})?;
		match length {
			Value::Add1(previous) => Ok((term, (entry, previous.as_ref().clone()))),
			length => Err(ElaborationErrorKind::VecLengthMismatch {
				expected: Length::Successor,
				found: self.context.read_back(&Value::Nat, &length),
			}
			.at(source.range)),
		}
	}

	fn check(&self, source: &Src, ty: &Value) -> Result<Core, ElaborationError> {
		use Preterm as P;
		let range = source.range;
		let length_mismatch = |expected: Length, length: &Value| -> Result<Core, ElaborationError> {
			let found = self.context.read_back(&Value::Nat, length);
			Err(ElaborationErrorKind::VecLengthMismatch { expected, found }.at(range))
		};
		match (&source.preterm, ty.now()) {
			(P::Lambda(sites, body), ty) => self.check_lambda(sites, body, ty, range),

			(P::Cons(car, cdr), Value::Sigma { base, family, .. }) => {
				let car = self.check(car, &base)?;
				let cdr = self.check(cdr, &family.evaluate_with(self.evaluate(&car)))?;
				Ok(Core::Cons(car.into(), cdr.into()))
			}
			(P::Cons(..), ty) => Err(self.expected_former(ExpectedFormer::Sigma, &ty, range)),

			(P::Nil, Value::List(_)) => Ok(Core::Nil),
			(P::Nil, ty) => Err(self.expected_former(ExpectedFormer::List, &ty, range)),

			(P::Same(point), Value::Equal { ty, from, to }) => {
				let point = self.check(point, &ty)?;
				let value = self.evaluate(&point);
				self.context.convert(&ty, &from, &value).map_err(|kind| kind.at(range))?;
				self.context.convert(&ty, &value, &to).map_err(|kind| kind.at(range))?;
				Ok(Core::Same(point.into()))
			}
			(P::Same(_), ty) => Err(self.expected_former(ExpectedFormer::Equal, &ty, range)),

			(P::VecNil, Value::Vec { length, .. }) => match length.now() {
				Value::Zero => Ok(Core::VecNil),
				length => length_mismatch(Length::Zero, &length),
			},
			(P::VecCons(head, tail), Value::Vec { entry, length }) => match length.now() {
				Value::Add1(previous) => {
					let head = self.check(head, &entry)?;
					let tail = self.check(tail, &Value::Vec { entry, length: previous })?;
					Ok(Core::VecCons(head.into(), tail.into()))
				}
				length => length_mismatch(Length::Successor, &length),
			},
			(P::VecNil | P::VecCons(..), ty) => Err(self.expected_former(ExpectedFormer::Vec, &ty, range)),

			(P::Left(value), Value::Either(left, _)) => Ok(Core::Left(self.check(value, &left)?.into())),
			(P::Right(value), Value::Either(_, right)) => Ok(Core::Right(self.check(value, &right)?.into())),
			(P::Left(_) | P::Right(_), ty) => Err(self.expected_former(ExpectedFormer::Either, &ty, range)),

			(P::Todo, ty) => {
				let ty = self.context.read_back_type(&ty);
				trace!(?range, ?ty, "hole");
				Ok(Core::Todo(range, ty.into()))
			}

			(_, ty) => {
				let Synthesized { term, ty: found } = self.synthesize(source)?;
				self.context.same_type(&ty, &found).map_err(|kind| kind.at(range))?;
				Ok(term)
			}
		}
	}

	/// Checks `(λ (x y ...) body)` one parameter at a time.
	fn check_lambda(
		&self,
		sites: &[BindingSite],
		body: &Src,
		ty: Value,
		range: Range,
	) -> Result<Core, ElaborationError> {
		let Some((site, rest)) = sites.split_first() else { return self.check(body, &ty) };
		let (base, family): (Rc<Value>, Rc<Closure>) = match ty {
			Value::Pi { base, family, .. } => (base, family),
			ty => return Err(self.expected_former(ExpectedFormer::Pi, &ty, range)),
		};
		let (parameter, inner) = self.bind(*site, base.as_ref().clone())?;
		let codomain = family.evaluate_with(Value::variable(parameter, base.as_ref().clone())).now();
		let body = inner.check_lambda(rest, body, codomain, range)?;
		Ok(Core::Lambda { parameter, body: body.into() })
	}
}
