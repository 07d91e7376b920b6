use std::rc::Rc;

use crate::common::{Range, Symbol};

/// An elaborated term.
///
/// Core terms carry no source locations (except on holes) and every eliminator carries whatever type
/// information evaluation and read-back need, so a core term can be evaluated without consulting a context.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Core {
	The(Rc<Self>, Rc<Self>),
	Variable(Symbol),
	/// A hole, remembering where it was written and the type it was expected to have.
	Todo(Range, Rc<Self>),

	Universe,

	// Natural numbers.
	Nat,
	Zero,
	Add1(Rc<Self>),
	WhichNat { target: Rc<Self>, base_type: Rc<Self>, base: Rc<Self>, step: Rc<Self> },
	IterNat { target: Rc<Self>, base_type: Rc<Self>, base: Rc<Self>, step: Rc<Self> },
	RecNat { target: Rc<Self>, base_type: Rc<Self>, base: Rc<Self>, step: Rc<Self> },
	IndNat { target: Rc<Self>, motive: Rc<Self>, base: Rc<Self>, step: Rc<Self> },

	// Dependent functions.
	Pi { parameter: Symbol, base: Rc<Self>, family: Rc<Self> },
	Lambda { parameter: Symbol, body: Rc<Self> },
	Apply(Rc<Self>, Rc<Self>),

	// Atoms.
	Atom,
	Quote(Symbol),

	// Dependent pairs.
	Sigma { parameter: Symbol, base: Rc<Self>, family: Rc<Self> },
	Cons(Rc<Self>, Rc<Self>),
	Car(Rc<Self>),
	Cdr(Rc<Self>),

	Trivial,
	Sole,

	// Lists.
	List(Rc<Self>),
	Nil,
	ListCons(Rc<Self>, Rc<Self>),
	RecList { target: Rc<Self>, base_type: Rc<Self>, base: Rc<Self>, step: Rc<Self> },
	IndList { target: Rc<Self>, motive: Rc<Self>, base: Rc<Self>, step: Rc<Self> },

	Absurd,
	IndAbsurd { target: Rc<Self>, motive: Rc<Self> },

	// Equality.
	Equal { ty: Rc<Self>, from: Rc<Self>, to: Rc<Self> },
	Same(Rc<Self>),
	Replace { target: Rc<Self>, motive: Rc<Self>, base: Rc<Self> },
	Trans(Rc<Self>, Rc<Self>),
	/// `result_type` is the codomain of `function`, read back during elaboration.
	Cong { target: Rc<Self>, result_type: Rc<Self>, function: Rc<Self> },
	Symm(Rc<Self>),
	IndEq { target: Rc<Self>, motive: Rc<Self>, base: Rc<Self> },

	// Length-indexed lists.
	Vec { entry: Rc<Self>, length: Rc<Self> },
	VecNil,
	VecCons(Rc<Self>, Rc<Self>),
	Head(Rc<Self>),
	Tail(Rc<Self>),
	IndVec { length: Rc<Self>, target: Rc<Self>, motive: Rc<Self>, base: Rc<Self>, step: Rc<Self> },

	// Sums.
	Either(Rc<Self>, Rc<Self>),
	Left(Rc<Self>),
	Right(Rc<Self>),
	IndEither { target: Rc<Self>, motive: Rc<Self>, left: Rc<Self>, right: Rc<Self> },
}

/// The largest numeral literal accepted. Numerals are unary chains, and evaluation and read-back recurse along them.
pub const MAX_NUMERAL: u64 = 1000;

impl Core {
	/// The numeral `n` as a chain of `add1`s ending in `zero`.
	pub fn numeral(n: u64) -> Self { (0..n).fold(Self::Zero, |term, _| Self::Add1(term.into())) }

	/// Recognizes a closed numeral.
	pub fn as_numeral(&self) -> Option<u64> {
		let mut term = self;
		let mut n = 0;
		loop {
			match term {
				Self::Zero => return Some(n),
				Self::Add1(previous) => {
					term = previous;
					n += 1;
				}
				_ => return None,
			}
		}
	}

	/// The non-dependent function type from `base` to `codomain`.
	pub fn arrow(parameter: Symbol, base: Self, codomain: Self) -> Self {
		Self::Pi { parameter, base: base.into(), family: codomain.into() }
	}

	/// Decides whether `symbol` occurs free in this term.
	pub fn mentions(&self, symbol: Symbol) -> bool {
		use Core::*;
		match self {
			Variable(variable) => *variable == symbol,
			Pi { parameter, base, family } | Sigma { parameter, base, family } =>
				base.mentions(symbol) || (*parameter != symbol && family.mentions(symbol)),
			Lambda { parameter, body } => *parameter != symbol && body.mentions(symbol),
			Todo(_, ty) => ty.mentions(symbol),
			_ => self.children().iter().any(|child| child.mentions(symbol)),
		}
	}

	/// Collects the holes of this term in the order they were written.
	pub fn holes(&self) -> Vec<(Range, Rc<Self>)> {
		let mut holes = Vec::new();
		self.collect_holes(&mut holes);
		holes
	}

	fn collect_holes(&self, holes: &mut Vec<(Range, Rc<Self>)>) {
		match self {
			Self::Todo(range, ty) => holes.push((*range, ty.clone())),
			Self::Pi { base, family: body, .. } | Self::Sigma { base, family: body, .. } => {
				base.collect_holes(holes);
				body.collect_holes(holes);
			}
			Self::Lambda { body, .. } => body.collect_holes(holes),
			_ => self.children().iter().for_each(|child| child.collect_holes(holes)),
		}
	}

	/// The immediate subterms of a term without binders.
	pub(crate) fn children(&self) -> Vec<&Rc<Self>> {
		use Core::*;
		match self {
			Variable(_) | Todo(..) | Universe | Nat | Zero | Atom | Quote(_) | Trivial | Sole | Nil | Absurd
			| VecNil => vec![],
			Pi { .. } | Sigma { .. } | Lambda { .. } => vec![],
			Add1(a) | Car(a) | Cdr(a) | List(a) | Same(a) | Symm(a) | Head(a) | Tail(a) | Left(a) | Right(a) =>
				vec![a],
			The(a, b) | Apply(a, b) | Cons(a, b) | ListCons(a, b) | Trans(a, b) | VecCons(a, b) | Either(a, b) =>
				vec![a, b],
			Vec { entry, length } => vec![entry, length],
			WhichNat { target, base_type, base, step }
			| IterNat { target, base_type, base, step }
			| RecNat { target, base_type, base, step }
			| RecList { target, base_type, base, step } => vec![target, base_type, base, step],
			IndNat { target, motive, base, step } | IndList { target, motive, base, step } =>
				vec![target, motive, base, step],
			IndAbsurd { target, motive } => vec![target, motive],
			Equal { ty, from, to } => vec![ty, from, to],
			Replace { target, motive, base } | IndEq { target, motive, base } => vec![target, motive, base],
			Cong { target, result_type, function } => vec![target, result_type, function],
			IndVec { length, target, motive, base, step } => vec![length, target, motive, base, step],
			IndEither { target, motive, left, right } => vec![target, motive, left, right],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::common::Names;

	#[test]
	fn numerals_are_add1_chains() {
		assert_eq!(Core::numeral(2), Core::Add1(Core::Add1(Core::Zero.into()).into()));
		assert_eq!(Core::numeral(3).as_numeral(), Some(3));
		assert_eq!(Core::Add1(Core::Nat.into()).as_numeral(), None);
	}

	#[test]
	fn binders_hide_their_parameter() {
		let names = Names::new();
		let (x, y) = (names.intern("x"), names.intern("y"));
		let term = Core::Lambda { parameter: x, body: Core::Apply(Core::Variable(x).into(), Core::Variable(y).into()).into() };
		assert!(!term.mentions(x));
		assert!(term.mentions(y));
		let pi = Core::Pi { parameter: x, base: Core::Variable(x).into(), family: Core::Variable(x).into() };
		assert!(pi.mentions(x));
	}

	#[test]
	fn holes_are_collected_left_to_right() {
		let term = Core::Cons(Core::Todo((0, 4), Core::Nat.into()).into(), Core::Todo((5, 9), Core::Atom.into()).into());
		let holes = term.holes();
		assert_eq!(holes.iter().map(|(range, _)| *range).collect::<Vec<_>>(), vec![(0, 4), (5, 9)]);
		assert_eq!(*holes[1].1, Core::Atom);
	}
}
