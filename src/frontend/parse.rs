use crate::{
	common::{Names, Range, Symbol},
	frontend::session::Error,
	ir::{
		presyntax::{BindingSite, Preterm, Src, TopLevel, TypedBinder},
		source::{lex, Keyword, LexedSource, Token},
	},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected one of: {}", expected.join(", "))]
pub struct ParseError {
	pub range: Range,
	pub expected: Vec<&'static str>,
}

/// Parses a sequence of top-level forms.
pub fn parse(source: &LexedSource, names: &Names) -> Result<Vec<TopLevel>, ParseError> {
	let parser = Parser { source: source.source, names, ranges: &source.ranges };
	pie::program(&source.tokens, &parser).map_err(|error| parser.error(error))
}

/// Lexes and parses a single expression.
pub fn parse_expression(source: &str, names: &Names) -> Result<Src, Error> {
	let lexed = lex(source)?;
	let parser = Parser { source, names, ranges: &lexed.ranges };
	Ok(pie::lone_expression(&lexed.tokens, &parser).map_err(|error| parser.error(error))?)
}

struct Parser<'s> {
	source: &'s str,
	names: &'s Names,
	ranges: &'s [Range],
}

impl<'s> Parser<'s> {
	fn text(&self, token_index: usize) -> &'s str {
		let range = self.ranges[token_index];
		&self.source[range.0..range.1]
	}

	fn symbol(&self, token_index: usize) -> Symbol { self.names.intern(self.text(token_index)) }

	fn number(&self, token_index: usize) -> Option<u64> { self.text(token_index).parse().ok() }

	fn site(&self, token_index: usize) -> BindingSite {
		BindingSite { range: self.ranges[token_index], symbol: self.symbol(token_index) }
	}

	/// The source range covered by the tokens `init..fini`.
	fn span(&self, init: usize, fini: usize) -> Range { (self.ranges[init].0, self.ranges[fini - 1].1) }

	fn error(&self, error: peg::error::ParseError<usize>) -> ParseError {
		let end = self.source.len();
		ParseError {
			range: self.ranges.get(error.location).copied().unwrap_or((end, end)),
			expected: error.expected.tokens().map(describe).collect(),
		}
	}
}

/// Trims the grammar's token patterns down to the token names.
fn describe(expected: &'static str) -> &'static str {
	expected
		.trim_start_matches("[Token::")
		.trim_end_matches(']')
		.trim_start_matches("Keyword(Keyword::")
		.trim_end_matches(')')
}

peg::parser! {
	grammar pie(parser: &Parser) for [Token] {
		rule _ = [Token::Whitespace]*

		rule identifier() -> Symbol
			= pos:position!() [Token::Identifier] {parser.symbol(pos)}

		rule site() -> BindingSite
			= pos:position!() [Token::Identifier] {parser.site(pos)}

		rule number() -> u64
			= pos:position!() [Token::Number] {? parser.number(pos).ok_or("a number below 2^64") }

		rule quoted() -> Symbol
			= [Token::Tick] pos:position!() [Token::Identifier | Token::Keyword(_)] {parser.symbol(pos)}

		rule typed_binder() -> TypedBinder
			= [Token::ParenL] _ site:site() _ ty:expression() _ [Token::ParenR] {TypedBinder { site, ty }}

		rule e() -> Box<Src>
			= expression:expression() {expression.into()}

		rule compound() -> Preterm
			= [Token::Keyword(Keyword::The)] _ ty:e() _ term:e() {Preterm::The(ty, term)}
			// Natural numbers.
			/ [Token::Keyword(Keyword::Add1)] _ n:e() {Preterm::Add1(n)}
			/ [Token::Keyword(Keyword::WhichNat)] _ target:e() _ base:e() _ step:e() {Preterm::WhichNat { target, base, step }}
			/ [Token::Keyword(Keyword::IterNat)] _ target:e() _ base:e() _ step:e() {Preterm::IterNat { target, base, step }}
			/ [Token::Keyword(Keyword::RecNat)] _ target:e() _ base:e() _ step:e() {Preterm::RecNat { target, base, step }}
			/ [Token::Keyword(Keyword::IndNat)] _ target:e() _ motive:e() _ base:e() _ step:e()
				{Preterm::IndNat { target, motive, base, step }}
			// Dependent functions.
			/ [Token::Keyword(Keyword::Arrow)] _ domain:e() _ rest:expression() ++ _ {Preterm::Arrow(domain, rest)}
			/ [Token::Keyword(Keyword::Pi)] _ [Token::ParenL] _ binders:typed_binder() ++ _ _ [Token::ParenR] _ body:e()
				{Preterm::Pi(binders, body)}
			/ [Token::Keyword(Keyword::Lambda)] _ [Token::ParenL] _ sites:site() ++ _ _ [Token::ParenR] _ body:e()
				{Preterm::Lambda(sites, body)}
			/ [Token::Keyword(Keyword::Quote)] _ pos:position!() [Token::Identifier | Token::Keyword(_)]
				{Preterm::Quote(parser.symbol(pos))}
			// Dependent pairs.
			/ [Token::Keyword(Keyword::Sigma)] _ [Token::ParenL] _ binders:typed_binder() ++ _ _ [Token::ParenR] _ body:e()
				{Preterm::Sigma(binders, body)}
			/ [Token::Keyword(Keyword::Pair)] _ car:e() _ cdr:e() {Preterm::Pair(car, cdr)}
			/ [Token::Keyword(Keyword::Cons)] _ car:e() _ cdr:e() {Preterm::Cons(car, cdr)}
			/ [Token::Keyword(Keyword::Car)] _ pair:e() {Preterm::Car(pair)}
			/ [Token::Keyword(Keyword::Cdr)] _ pair:e() {Preterm::Cdr(pair)}
			// Lists.
			/ [Token::Keyword(Keyword::List)] _ entry:e() {Preterm::List(entry)}
			/ [Token::Keyword(Keyword::ListCons)] _ head:e() _ tail:e() {Preterm::ListCons(head, tail)}
			/ [Token::Keyword(Keyword::RecList)] _ target:e() _ base:e() _ step:e() {Preterm::RecList { target, base, step }}
			/ [Token::Keyword(Keyword::IndList)] _ target:e() _ motive:e() _ base:e() _ step:e()
				{Preterm::IndList { target, motive, base, step }}
			/ [Token::Keyword(Keyword::IndAbsurd)] _ target:e() _ motive:e() {Preterm::IndAbsurd { target, motive }}
			// Equality.
			/ [Token::Keyword(Keyword::Equal)] _ ty:e() _ from:e() _ to:e() {Preterm::Equal { ty, from, to }}
			/ [Token::Keyword(Keyword::Same)] _ point:e() {Preterm::Same(point)}
			/ [Token::Keyword(Keyword::Replace)] _ target:e() _ motive:e() _ base:e() {Preterm::Replace { target, motive, base }}
			/ [Token::Keyword(Keyword::Trans)] _ left:e() _ right:e() {Preterm::Trans(left, right)}
			/ [Token::Keyword(Keyword::Cong)] _ target:e() _ function:e() {Preterm::Cong(target, function)}
			/ [Token::Keyword(Keyword::Symm)] _ target:e() {Preterm::Symm(target)}
			/ [Token::Keyword(Keyword::IndEq)] _ target:e() _ motive:e() _ base:e() {Preterm::IndEq { target, motive, base }}
			// Length-indexed lists.
			/ [Token::Keyword(Keyword::Vec)] _ entry:e() _ length:e() {Preterm::Vec(entry, length)}
			/ [Token::Keyword(Keyword::VecCons)] _ head:e() _ tail:e() {Preterm::VecCons(head, tail)}
			/ [Token::Keyword(Keyword::Head)] _ target:e() {Preterm::Head(target)}
			/ [Token::Keyword(Keyword::Tail)] _ target:e() {Preterm::Tail(target)}
			/ [Token::Keyword(Keyword::IndVec)] _ length:e() _ target:e() _ motive:e() _ base:e() _ step:e()
				{Preterm::IndVec { length, target, motive, base, step }}
			// Sums.
			/ [Token::Keyword(Keyword::Either)] _ left:e() _ right:e() {Preterm::Either(left, right)}
			/ [Token::Keyword(Keyword::Left)] _ value:e() {Preterm::Left(value)}
			/ [Token::Keyword(Keyword::Right)] _ value:e() {Preterm::Right(value)}
			/ [Token::Keyword(Keyword::IndEither)] _ target:e() _ motive:e() _ left:e() _ right:e()
				{Preterm::IndEither { target, motive, left, right }}
			// Applications.
			/ function:e() _ arguments:expression() ++ _ {Preterm::Apply(function, arguments)}

		pub rule expression() -> Src
			= init:position!() preterm:(
				  [Token::ParenL] _ preterm:compound() _ [Token::ParenR] {preterm}
				/ [Token::Keyword(Keyword::U)] {Preterm::Universe}
				/ [Token::Keyword(Keyword::Todo)] {Preterm::Todo}
				/ [Token::Keyword(Keyword::Nat)] {Preterm::Nat}
				/ [Token::Keyword(Keyword::Zero)] {Preterm::Zero}
				/ [Token::Keyword(Keyword::Atom)] {Preterm::Atom}
				/ [Token::Keyword(Keyword::Trivial)] {Preterm::Trivial}
				/ [Token::Keyword(Keyword::Sole)] {Preterm::Sole}
				/ [Token::Keyword(Keyword::Nil)] {Preterm::Nil}
				/ [Token::Keyword(Keyword::Absurd)] {Preterm::Absurd}
				/ [Token::Keyword(Keyword::VecNil)] {Preterm::VecNil}
				/ symbol:quoted() {Preterm::Quote(symbol)}
				/ n:number() {Preterm::Number(n)}
				/ symbol:identifier() {Preterm::Variable(symbol)}
			) fini:position!() {preterm.at(parser.span(init, fini))}

		rule top_level() -> TopLevel
			= [Token::ParenL] _ [Token::Keyword(Keyword::Claim)] _ site:site() _ ty:expression() _ [Token::ParenR]
				{TopLevel::Claim(site, ty)}
			/ [Token::ParenL] _ [Token::Keyword(Keyword::Define)] _ site:site() _ term:expression() _ [Token::ParenR]
				{TopLevel::Define(site, term)}
			/ [Token::ParenL] _ [Token::Keyword(Keyword::CheckSame)] _ ty:expression() _ left:expression() _ right:expression() _ [Token::ParenR]
				{TopLevel::CheckSame { ty, left, right }}
			/ expression:expression() {TopLevel::Expression(expression)}

		pub rule program() -> Vec<TopLevel>
			= _ forms:top_level() ** _ _ {forms}

		pub rule lone_expression() -> Src
			= _ expression:expression() _ {expression}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse_one(source: &str) -> (Names, Src) {
		let names = Names::default();
		let expression = parse_expression(source, &names).unwrap();
		(names, expression)
	}

	#[test]
	fn ranges_cover_the_expression() {
		let source = "(the Nat (add1 zero))";
		let (_, expression) = parse_one(source);
		assert_eq!(expression.range, (0, source.len()));
		let Preterm::The(_, term) = expression.preterm else { panic!("expected an annotation") };
		assert_eq!(&source[term.range.0..term.range.1], "(add1 zero)");
	}

	#[test]
	fn arrows_keep_every_type() {
		let (_, expression) = parse_one("(→ Nat Atom Nat)");
		let Preterm::Arrow(domain, rest) = expression.preterm else { panic!("expected an arrow") };
		assert!(matches!(domain.preterm, Preterm::Nat));
		assert_eq!(rest.len(), 2);
	}

	#[test]
	fn binders_and_applications() {
		let (names, expression) = parse_one("[λ (f x) (f x 'tick)]");
		let Preterm::Lambda(sites, body) = expression.preterm else { panic!("expected a lambda") };
		assert_eq!(sites.iter().map(|site| names.label(site.symbol)).collect::<Vec<_>>(), ["f", "x"]);
		let Preterm::Apply(function, arguments) = body.preterm else { panic!("expected an application") };
		assert!(matches!(function.preterm, Preterm::Variable(f) if f == sites[0].symbol));
		assert!(matches!(arguments[1].preterm, Preterm::Quote(tick) if names.label(tick) == "tick"));
	}

	#[test]
	fn numbers_are_literals() {
		let (_, expression) = parse_one("  42 ");
		assert!(matches!(expression.preterm, Preterm::Number(42)));
	}

	#[test]
	fn both_spellings_of_quotation() {
		let (names, expression) = parse_one("(cons 'pea (quote pod))");
		let Preterm::Cons(car, cdr) = expression.preterm else { panic!("expected a pair") };
		assert!(matches!(car.preterm, Preterm::Quote(pea) if names.label(pea) == "pea"));
		assert!(matches!(cdr.preterm, Preterm::Quote(pod) if names.label(pod) == "pod"));
	}

	#[test]
	fn programs_are_sequences_of_forms() {
		let names = Names::default();
		let source = "(claim one Nat)\n(define one 1)\n(check-same Nat one 1)\none";
		let lexed = lex(source).unwrap();
		let forms = parse(&lexed, &names).unwrap();
		assert!(matches!(
			forms.as_slice(),
			[TopLevel::Claim(..), TopLevel::Define(..), TopLevel::CheckSame { .. }, TopLevel::Expression(_)]
		));
	}

	#[test]
	fn parse_errors_point_at_the_offending_token() {
		let names = Names::default();
		let source = "(add1 zero zero)";
		let lexed = lex(source).unwrap();
		let error = parse(&lexed, &names).unwrap_err();
		assert_eq!(&source[error.range.0..error.range.1], "zero");
		assert_eq!(error.range.0, 11);
	}
}
