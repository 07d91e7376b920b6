use std::rc::Rc;

use tracing::debug;

use crate::{
	common::{Names, Range, Symbol},
	frontend::{
		context::{Binder, Context},
		elaborate::{ElaborationError, ElaborationErrorKind},
		parse::{parse, ParseError},
	},
	ir::{
		presyntax::TopLevel,
		source::{lex, LexError},
		syntax::Core,
	},
	pretty::unparse::pretty_print,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("lex error: {0}")]
	Lex(#[from] LexError),
	#[error("parse error: {0}")]
	Parse(#[from] ParseError),
	#[error("elaboration error: {0}")]
	Elaboration(#[from] ElaborationError),
	#[error("cannot read {path}: {source}")]
	Io { path: String, source: std::io::Error },
}

/// What processing a top-level form produced.
#[derive(Debug, Clone)]
pub enum Output {
	Claimed(Symbol),
	Defined(Symbol),
	/// A `check-same` succeeded.
	Same,
	/// The normal form `(the T e)` of an expression.
	Normalized(Core),
}

impl Output {
	pub fn render(&self, names: &Names) -> String {
		match self {
			Self::Claimed(symbol) => format!("claimed {}", names.label(*symbol)),
			Self::Defined(symbol) => format!("defined {}", names.label(*symbol)),
			Self::Same => "same".to_owned(),
			Self::Normalized(term) => pretty_print(term, names),
		}
	}
}

/// An unfinished part of a program and the type it must have.
#[derive(Debug, Clone)]
pub struct Hole {
	pub range: Range,
	pub ty: Core,
}

#[derive(Debug, Clone)]
pub struct Processed {
	pub output: Output,
	pub holes: Vec<Hole>,
}

fn holes(terms: &[&Core]) -> Vec<Hole> {
	terms
		.iter()
		.flat_map(|term| term.holes())
		.map(|(range, ty)| Hole { range, ty: ty.as_ref().clone() })
		.collect()
}

/// A sequence of top-level forms processed against a growing context.
pub struct Session {
	context: Context,
}

impl Default for Session {
	fn default() -> Self { Self::new() }
}

impl Session {
	pub fn new() -> Self { Self { context: Context::new(Names::new()) } }

	pub fn names(&self) -> &Rc<Names> { self.context.names() }

	pub fn context(&self) -> &Context { &self.context }

	pub fn process(&mut self, form: &TopLevel) -> Result<Processed, ElaborationError> {
		let names = self.names().clone();
		Ok(match form {
			TopLevel::Claim(site, ty) => {
				if self.context.binder(site.symbol).is_some() {
					return Err(ElaborationErrorKind::AlreadyDefined(site.symbol).at(site.range));
				}
				let ty = self.context.is_type(ty)?;
				debug!(name = %names.label(site.symbol), ty = %pretty_print(&ty, &names), "claim");
				self.context = self.context.claim(site.symbol, self.context.evaluate(&ty));
				Processed { output: Output::Claimed(site.symbol), holes: holes(&[&ty]) }
			}
			TopLevel::Define(site, term) => {
				let ty = match self.context.binder(site.symbol) {
					Some(Binder::Claim(ty)) => ty.clone(),
					Some(_) => return Err(ElaborationErrorKind::AlreadyDefined(site.symbol).at(site.range)),
					None => return Err(ElaborationErrorKind::NotClaimed(site.symbol).at(site.range)),
				};
				let term = self.context.check(term, &ty)?;
				debug!(name = %names.label(site.symbol), "define");
				let value = self.context.evaluate(&term);
				self.context = self.context.bind_value(site.symbol, ty, value);
				Processed { output: Output::Defined(site.symbol), holes: holes(&[&term]) }
			}
			TopLevel::CheckSame { ty, left, right } => {
				let ty = self.context.is_type(ty)?;
				let ty_value = self.context.evaluate(&ty);
				let left_term = self.context.check(left, &ty_value)?;
				let right_term = self.context.check(right, &ty_value)?;
				self.context
					.convert(&ty_value, &self.context.evaluate(&left_term), &self.context.evaluate(&right_term))
					.map_err(|kind| kind.at(right.range))?;
				Processed { output: Output::Same, holes: holes(&[&ty, &left_term, &right_term]) }
			}
			TopLevel::Expression(expression) => {
				let normal = self.context.normalize(expression)?;
				debug!(normal = %pretty_print(&normal, &names), "normalize");
				let holes = holes(&[&normal]);
				Processed { output: Output::Normalized(normal), holes }
			}
		})
	}

	/// Lexes, parses and processes a whole program, stopping at the first error.
	pub fn run(&mut self, source: &str) -> Result<Vec<Processed>, Error> {
		let lexed = lex(source)?;
		let forms = parse(&lexed, self.names())?;
		forms.iter().map(|form| self.process(form).map_err(Error::Elaboration)).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn outputs(source: &str) -> Result<Vec<String>, Error> {
		let mut session = Session::new();
		let processed = session.run(source)?;
		Ok(processed.iter().map(|processed| processed.output.render(session.names())).collect())
	}

	fn elaboration_error(source: &str) -> ElaborationErrorKind {
		match Session::new().run(source) {
			Err(Error::Elaboration(error)) => error.kind,
			other => panic!("expected an elaboration error, found {other:?}"),
		}
	}

	#[test]
	fn definitions_are_unfolded() {
		let outputs = outputs("(claim two Nat) (define two (add1 (add1 zero))) (add1 two)").unwrap();
		assert_eq!(outputs, ["claimed two", "defined two", "(the Nat 3)"]);
	}

	#[test]
	fn claimed_names_are_not_in_scope_until_defined() {
		assert!(matches!(
			elaboration_error("(claim x Nat) (define x x)"),
			ElaborationErrorKind::UnboundVariable(_)
		));
	}

	#[test]
	fn claims_and_definitions_are_checked_for_order() {
		assert!(matches!(elaboration_error("(define x zero)"), ElaborationErrorKind::NotClaimed(_)));
		assert!(matches!(
			elaboration_error("(claim x Nat) (claim x Atom)"),
			ElaborationErrorKind::AlreadyDefined(_)
		));
		assert!(matches!(
			elaboration_error("(claim x Nat) (define x 1) (define x 2)"),
			ElaborationErrorKind::AlreadyDefined(_)
		));
	}

	#[test]
	fn check_same_compares_normal_forms() {
		assert_eq!(outputs("(check-same Nat (iter-Nat 2 3 (λ (n) (add1 n))) 5)").unwrap(), ["same"]);
		assert!(matches!(elaboration_error("(check-same Nat 2 3)"), ElaborationErrorKind::NotTheSame { .. }));
	}

	#[test]
	fn oversized_numerals_are_rejected_where_they_are_written() {
		let mut session = Session::new();
		let Err(Error::Elaboration(error)) = session.run("(the Nat 200000)") else { panic!("expected an elaboration error") };
		assert!(matches!(error.kind, ElaborationErrorKind::NumeralTooLarge(200000)));
		assert_eq!(error.range, (9, 15));
		assert_eq!(outputs("(the Nat 1000)").unwrap().len(), 1);
	}

	#[test]
	fn holes_are_reported_with_their_types() {
		let mut session = Session::new();
		let processed = session.run("(claim f (-> Nat Atom)) (define f (λ (n) TODO))").unwrap();
		assert!(processed[0].holes.is_empty());
		assert_eq!(processed[1].holes.len(), 1);
		assert_eq!(processed[1].holes[0].ty, Core::Atom);
	}
}
