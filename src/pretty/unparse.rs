use std::fmt::{self, Display, Write};

use crate::{common::Names, ir::syntax::Core};

/// Renders a core term in surface notation.
pub fn pretty_print(term: &Core, names: &Names) -> String { Printed { term, names }.to_string() }

struct Printed<'a> {
	term: &'a Core,
	names: &'a Names,
}

impl Display for Printed<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { print(self.term, f, self.names) }
}

pub fn print(term: &Core, f: &mut impl Write, names: &Names) -> fmt::Result {
	use Core::*;
	match term {
		The(ty, term) => form(f, names, "the", &[ty, term])?,
		Variable(symbol) => write!(f, "{}", names.label(*symbol))?,
		Todo(..) => write!(f, "TODO")?,
		Universe => write!(f, "U")?,

		Nat => write!(f, "Nat")?,
		Zero => write!(f, "0")?,
		Add1(previous) =>
			if let Some(n) = term.as_numeral() {
				write!(f, "{n}")?
			} else {
				form(f, names, "add1", &[previous])?
			},
		WhichNat { target, base_type, base, step } => eliminator(f, names, "which-Nat", target, base_type, base, step)?,
		IterNat { target, base_type, base, step } => eliminator(f, names, "iter-Nat", target, base_type, base, step)?,
		RecNat { target, base_type, base, step } => eliminator(f, names, "rec-Nat", target, base_type, base, step)?,
		IndNat { target, motive, base, step } => form(f, names, "ind-Nat", &[target, motive, base, step])?,

		Pi { .. } => print_pi(term, f, names)?,
		Lambda { .. } => {
			write!(f, "(λ (")?;
			let mut body = term;
			let mut separator = "";
			while let Lambda { parameter, body: inner } = body {
				write!(f, "{separator}{}", names.label(*parameter))?;
				separator = " ";
				body = inner;
			}
			write!(f, ") ")?;
			print(body, f, names)?;
			write!(f, ")")?;
		}
		Apply(..) => {
			write!(f, "(")?;
			print_spine(term, f, names)?;
			write!(f, ")")?;
		}

		Atom => write!(f, "Atom")?,
		Quote(symbol) => write!(f, "'{}", names.label(*symbol))?,

		Sigma { parameter, base, family } =>
			if family.mentions(*parameter) {
				write!(f, "(Σ (")?;
				let mut body = term;
				let mut separator = "";
				while let Sigma { parameter, base, family } = body {
					if !family.mentions(*parameter) {
						break;
					}
					write!(f, "{separator}({} ", names.label(*parameter))?;
					print(base, f, names)?;
					write!(f, ")")?;
					separator = " ";
					body = family;
				}
				write!(f, ") ")?;
				print(body, f, names)?;
				write!(f, ")")?;
			} else {
				form(f, names, "Pair", &[base, family])?
			},
		Cons(car, cdr) => form(f, names, "cons", &[car, cdr])?,
		Car(pair) => form(f, names, "car", &[pair])?,
		Cdr(pair) => form(f, names, "cdr", &[pair])?,

		Trivial => write!(f, "Trivial")?,
		Sole => write!(f, "sole")?,

		List(entry) => form(f, names, "List", &[entry])?,
		Nil => write!(f, "nil")?,
		ListCons(head, tail) => form(f, names, "::", &[head, tail])?,
		RecList { target, base_type, base, step } => eliminator(f, names, "rec-List", target, base_type, base, step)?,
		IndList { target, motive, base, step } => form(f, names, "ind-List", &[target, motive, base, step])?,

		Absurd => write!(f, "Absurd")?,
		IndAbsurd { target, motive } => form(f, names, "ind-Absurd", &[target, motive])?,

		Equal { ty, from, to } => form(f, names, "=", &[ty, from, to])?,
		Same(point) => form(f, names, "same", &[point])?,
		Replace { target, motive, base } => form(f, names, "replace", &[target, motive, base])?,
		Trans(left, right) => form(f, names, "trans", &[left, right])?,
		Cong { target, function, .. } => form(f, names, "cong", &[target, function])?,
		Symm(target) => form(f, names, "symm", &[target])?,
		IndEq { target, motive, base } => form(f, names, "ind-=", &[target, motive, base])?,

		Vec { entry, length } => form(f, names, "Vec", &[entry, length])?,
		VecNil => write!(f, "vecnil")?,
		VecCons(head, tail) => form(f, names, "vec::", &[head, tail])?,
		Head(target) => form(f, names, "head", &[target])?,
		Tail(target) => form(f, names, "tail", &[target])?,
		IndVec { length, target, motive, base, step } =>
			form(f, names, "ind-Vec", &[length, target, motive, base, step])?,

		Either(left, right) => form(f, names, "Either", &[left, right])?,
		Left(value) => form(f, names, "left", &[value])?,
		Right(value) => form(f, names, "right", &[value])?,
		IndEither { target, motive, left, right } => form(f, names, "ind-Either", &[target, motive, left, right])?,
	}

	Ok(())
}

fn form(f: &mut impl Write, names: &Names, head: &str, arguments: &[&std::rc::Rc<Core>]) -> fmt::Result {
	write!(f, "({head}")?;
	for argument in arguments {
		write!(f, " ")?;
		print(argument, f, names)?;
	}
	write!(f, ")")
}

/// Prints an application without its parentheses, with all arguments at one level.
fn print_spine(term: &Core, f: &mut impl Write, names: &Names) -> fmt::Result {
	match term {
		Core::Apply(function, argument) => {
			print_spine(function, f, names)?;
			write!(f, " ")?;
			print(argument, f, names)
		}
		_ => print(term, f, names),
	}
}

/// Prints an eliminator whose base carries its type, as `(which-Nat t (the T b) s)`.
fn eliminator(
	f: &mut impl Write,
	names: &Names,
	head: &str,
	target: &Core,
	base_type: &Core,
	base: &Core,
	step: &Core,
) -> fmt::Result {
	write!(f, "({head} ")?;
	print(target, f, names)?;
	write!(f, " (the ")?;
	print(base_type, f, names)?;
	write!(f, " ")?;
	print(base, f, names)?;
	write!(f, ") ")?;
	print(step, f, names)?;
	write!(f, ")")
}

/// Prints a run of dependent `Π`s as one binder list and a run of non-dependent ones as a single arrow.
fn print_pi(term: &Core, f: &mut impl Write, names: &Names) -> fmt::Result {
	let Core::Pi { parameter, family, .. } = term else { return print(term, f, names) };
	let mut body = term;
	if family.mentions(*parameter) {
		write!(f, "(Π (")?;
		let mut separator = "";
		while let Core::Pi { parameter, base, family } = body {
			if !family.mentions(*parameter) {
				break;
			}
			write!(f, "{separator}({} ", names.label(*parameter))?;
			print(base, f, names)?;
			write!(f, ")")?;
			separator = " ";
			body = family;
		}
		write!(f, ") ")?;
	} else {
		write!(f, "(-> ")?;
		while let Core::Pi { parameter, base, family } = body {
			if family.mentions(*parameter) {
				break;
			}
			print(base, f, names)?;
			write!(f, " ")?;
			body = family;
		}
	}
	print(body, f, names)?;
	write!(f, ")")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::common::Symbol;

	fn print_string(term: &Core) -> String { pretty_print(term, &Names::default()) }

	#[test]
	fn numerals_and_atoms() {
		let term = Core::Cons(Core::numeral(3).into(), Core::Quote(Symbol::ENTRY).into());
		assert_eq!(print_string(&term), "(cons 3 'e)");
	}

	#[test]
	fn non_dependent_functions_are_arrows() {
		let term = Core::arrow(Symbol::X, Core::Nat, Core::arrow(Symbol::N, Core::Atom, Core::Nat));
		assert_eq!(print_string(&term), "(-> Nat Atom Nat)");
	}

	#[test]
	fn dependent_binders_are_regrouped() {
		let names = Names::default();
		let (a, b) = (names.intern("A"), names.intern("B"));
		let term = Core::Pi {
			parameter: a,
			base: Core::Universe.into(),
			family: Core::Pi {
				parameter: b,
				base: Core::Universe.into(),
				family: Core::arrow(Symbol::X, Core::Variable(a), Core::Variable(b)).into(),
			}
			.into(),
		};
		assert_eq!(pretty_print(&term, &names), "(Π ((A U) (B U)) (-> A B))");
		let lambda = Core::Lambda {
			parameter: a,
			body: Core::Lambda {
				parameter: b,
				body: Core::Apply(Core::Variable(a).into(), Core::Variable(b).into()).into(),
			}
			.into(),
		};
		assert_eq!(pretty_print(&lambda, &names), "(λ (A B) (A B))");
	}
}
