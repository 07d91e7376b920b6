use crate::common::{Range, Symbol};

/// A surface expression together with the source range it was read from.
#[derive(Debug, Clone)]
pub struct Src {
	pub range: Range,
	pub preterm: Preterm,
}

/// An occurrence of a name in binding position.
#[derive(Debug, Clone, Copy)]
pub struct BindingSite {
	pub range: Range,
	pub symbol: Symbol,
}

/// A parenthesized `(x A)` binder of `Π` and `Σ`.
#[derive(Debug, Clone)]
pub struct TypedBinder {
	pub site: BindingSite,
	pub ty: Src,
}

#[derive(Debug, Clone)]
pub enum Preterm {
	The(Box<Src>, Box<Src>),
	Variable(Symbol),
	Todo,

	Universe,

	// Natural numbers.
	Nat,
	Zero,
	Number(u64),
	Add1(Box<Src>),
	WhichNat { target: Box<Src>, base: Box<Src>, step: Box<Src> },
	IterNat { target: Box<Src>, base: Box<Src>, step: Box<Src> },
	RecNat { target: Box<Src>, base: Box<Src>, step: Box<Src> },
	IndNat { target: Box<Src>, motive: Box<Src>, base: Box<Src>, step: Box<Src> },

	// Dependent functions.
	/// `(-> A B ... Z)`, holding the first domain and every type after it.
	Arrow(Box<Src>, Vec<Src>),
	Pi(Vec<TypedBinder>, Box<Src>),
	Lambda(Vec<BindingSite>, Box<Src>),
	Apply(Box<Src>, Vec<Src>),

	// Atoms.
	Atom,
	Quote(Symbol),

	// Dependent pairs.
	Sigma(Vec<TypedBinder>, Box<Src>),
	Pair(Box<Src>, Box<Src>),
	Cons(Box<Src>, Box<Src>),
	Car(Box<Src>),
	Cdr(Box<Src>),

	Trivial,
	Sole,

	// Lists.
	List(Box<Src>),
	Nil,
	ListCons(Box<Src>, Box<Src>),
	RecList { target: Box<Src>, base: Box<Src>, step: Box<Src> },
	IndList { target: Box<Src>, motive: Box<Src>, base: Box<Src>, step: Box<Src> },

	Absurd,
	IndAbsurd { target: Box<Src>, motive: Box<Src> },

	// Equality.
	Equal { ty: Box<Src>, from: Box<Src>, to: Box<Src> },
	Same(Box<Src>),
	Replace { target: Box<Src>, motive: Box<Src>, base: Box<Src> },
	Trans(Box<Src>, Box<Src>),
	Cong(Box<Src>, Box<Src>),
	Symm(Box<Src>),
	IndEq { target: Box<Src>, motive: Box<Src>, base: Box<Src> },

	// Length-indexed lists.
	Vec(Box<Src>, Box<Src>),
	VecNil,
	VecCons(Box<Src>, Box<Src>),
	Head(Box<Src>),
	Tail(Box<Src>),
	IndVec { length: Box<Src>, target: Box<Src>, motive: Box<Src>, base: Box<Src>, step: Box<Src> },

	// Sums.
	Either(Box<Src>, Box<Src>),
	Left(Box<Src>),
	Right(Box<Src>),
	IndEither { target: Box<Src>, motive: Box<Src>, left: Box<Src>, right: Box<Src> },
}

impl Preterm {
	pub fn at(self, range: Range) -> Src { Src { range, preterm: self } }
}

/// A form at the top level of a program.
#[derive(Debug, Clone)]
pub enum TopLevel {
	Claim(BindingSite, Src),
	Define(BindingSite, Src),
	CheckSame { ty: Src, left: Src, right: Src },
	Expression(Src),
}
