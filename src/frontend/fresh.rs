use crate::{
	common::{Names, Symbol},
	frontend::context::Context,
	ir::presyntax::{Preterm, Src},
};

const SUBSCRIPT_ZERO: u32 = '₀' as u32;

fn subscript(n: u64) -> String {
	n.to_string().chars().filter_map(|digit| char::from_u32(SUBSCRIPT_ZERO + digit.to_digit(10)?)).collect()
}

/// Splits a label into its stem and trailing subscript number, if any.
fn split_subscript(label: &str) -> (&str, u64) {
	let stem = label.trim_end_matches(|c: char| ('₀'..='₉').contains(&c));
	let n = label[stem.len()..]
		.chars()
		.fold(0, |n: u64, c| n.saturating_mul(10).saturating_add(u64::from(c as u32 - SUBSCRIPT_ZERO)));
	(stem, n)
}

/// Chooses a name avoiding `avoid`: the suggestion itself when it is unused, and otherwise the first of its
/// subscripted successors that is unused. `x` becomes `x₁`, and `x₁` becomes `x₂`.
pub fn freshen(names: &Names, avoid: &[Symbol], suggestion: Symbol) -> Symbol {
	if !avoid.contains(&suggestion) {
		return suggestion;
	}
	let label = names.label(suggestion);
	let (stem, mut n) = split_subscript(&label);
	loop {
		n += 1;
		let candidate = names.intern(&format!("{stem}{}", subscript(n)));
		if !avoid.contains(&candidate) {
			return candidate;
		}
	}
}

impl Context {
	pub fn names_bound(&self) -> Vec<Symbol> { self.bindings().symbols().collect() }

	/// A name unused in this context.
	pub fn fresh(&self, suggestion: Symbol) -> Symbol { freshen(self.names(), &self.names_bound(), suggestion) }

	/// A name unused in this context and not mentioned anywhere in `sources`, for binders the checker introduces
	/// around them.
	pub fn fresh_binder(&self, sources: &[Src], suggestion: Symbol) -> Symbol {
		let mut avoid = self.names_bound();
		for source in sources {
			source.collect_names(&mut avoid);
		}
		freshen(self.names(), &avoid, suggestion)
	}
}

impl Src {
	/// Every identifier mentioned in the expression, bound or free.
	pub fn occurring_names(&self) -> Vec<Symbol> {
		let mut names = Vec::new();
		self.collect_names(&mut names);
		names
	}

	fn collect_names(&self, names: &mut Vec<Symbol>) {
		use Preterm as P;
		fn all(sources: &[&Box<Src>], names: &mut Vec<Symbol>) {
			sources.iter().for_each(|source| source.collect_names(names))
		}
		match &self.preterm {
			P::Variable(symbol) => names.push(*symbol),
			P::Todo
			| P::Universe
			| P::Nat
			| P::Zero
			| P::Number(_)
			| P::Atom
			| P::Quote(_)
			| P::Trivial
			| P::Sole
			| P::Nil
			| P::Absurd
			| P::VecNil => (),
			P::Pi(binders, body) | P::Sigma(binders, body) => {
				for binder in binders {
					names.push(binder.site.symbol);
					binder.ty.collect_names(names);
				}
				body.collect_names(names);
			}
			P::Lambda(sites, body) => {
				names.extend(sites.iter().map(|site| site.symbol));
				body.collect_names(names);
			}
			P::Arrow(domain, rest) | P::Apply(domain, rest) => {
				domain.collect_names(names);
				rest.iter().for_each(|source| source.collect_names(names));
			}
			P::Add1(a) | P::Car(a) | P::Cdr(a) | P::List(a) | P::Same(a) | P::Symm(a) | P::Head(a) | P::Tail(a)
			| P::Left(a) | P::Right(a) => all(&[a], names),
			P::The(a, b)
			| P::Pair(a, b)
			| P::Cons(a, b)
			| P::ListCons(a, b)
			| P::Trans(a, b)
			| P::Cong(a, b)
			| P::Vec(a, b)
			| P::VecCons(a, b)
			| P::Either(a, b)
			| P::IndAbsurd { target: a, motive: b } => all(&[a, b], names),
			P::WhichNat { target, base, step }
			| P::IterNat { target, base, step }
			| P::RecNat { target, base, step }
			| P::RecList { target, base, step } => all(&[target, base, step], names),
			P::Replace { target, motive, base } | P::IndEq { target, motive, base } =>
				all(&[target, motive, base], names),
			P::Equal { ty, from, to } => all(&[ty, from, to], names),
			P::IndNat { target, motive, base, step } | P::IndList { target, motive, base, step } =>
				all(&[target, motive, base, step], names),
			P::IndVec { length, target, motive, base, step } => all(&[length, target, motive, base, step], names),
			P::IndEither { target, motive, left, right } => all(&[target, motive, left, right], names),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{frontend::parse::parse_expression, ir::semantics::Value};

	#[test]
	fn unused_suggestions_are_kept() {
		let names = Names::new();
		let (x, y) = (names.intern("x"), names.intern("y"));
		assert_eq!(freshen(&names, &[y], x), x);
	}

	#[test]
	fn subscripts_count_upwards() {
		let names = Names::new();
		let x = names.intern("x");
		let x1 = freshen(&names, &[x], x);
		assert_eq!(names.label(x1), "x₁");
		let x2 = freshen(&names, &[x, x1], x);
		assert_eq!(names.label(x2), "x₂");
		assert_eq!(names.label(freshen(&names, &[x1], x1)), "x₂");
	}

	#[test]
	fn multi_digit_subscripts() {
		let names = Names::new();
		let x9 = names.intern("x₉");
		assert_eq!(names.label(freshen(&names, &[x9], x9)), "x₁₀");
		assert_eq!(split_subscript("ih₁₂"), ("ih", 12));
	}

	#[test]
	fn occurring_names_include_binders_and_free_names() {
		let names = Names::new();
		let source = parse_expression("(Π ((A U)) (-> A (ind-Nat t (λ (k) (Vec A k)) base step)))", &names).unwrap();
		let labels = source.occurring_names().into_iter().map(|symbol| names.label(symbol)).collect::<Vec<_>>();
		assert_eq!(labels, ["A", "A", "t", "k", "A", "k", "base", "step"]);
		let quoted = parse_expression("(cons 'a (the Nat 3))", &names).unwrap();
		assert!(quoted.occurring_names().is_empty());
	}

	#[test]
	fn fresh_avoids_the_context() {
		let names = Names::new();
		let x = names.intern("x");
		let context = Context::new(names.clone()).bind_free(x, Value::Nat).unwrap();
		assert_eq!(names.label(context.fresh(x)), "x₁");
	}
}
