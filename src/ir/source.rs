use std::str::Chars;

use crate::common::Range;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Token {
	Whitespace,
	Keyword(Keyword),
	Identifier,
	Number,
	ParenL,
	ParenR,
	Tick,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Keyword {
	Claim,
	Define,
	CheckSame,

	The,
	Todo,
	U,

	Nat,
	Zero,
	Add1,
	WhichNat,
	IterNat,
	RecNat,
	IndNat,

	Arrow,
	Pi,
	Lambda,

	Atom,
	Quote,

	Sigma,
	Pair,
	Cons,
	Car,
	Cdr,

	Trivial,
	Sole,

	List,
	Nil,
	ListCons,
	RecList,
	IndList,

	Absurd,
	IndAbsurd,

	Equal,
	Same,
	Replace,
	Trans,
	Cong,
	Symm,
	IndEq,

	Vec,
	VecNil,
	VecCons,
	Head,
	Tail,
	IndVec,

	Either,
	Left,
	Right,
	IndEither,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected input at byte {0}")]
pub struct LexError(pub usize, pub LexErrorKind);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
	UnrecognizedLexemePrefix,
	/// A run of symbol characters of the given byte length that is neither a number nor a name.
	MalformedName(usize),
	/// A closing bracket that does not match the opening one.
	MismatchedBracket(char),
	UnexpectedEnd(char),
}

struct Scanner<'s> {
	len: usize,
	chars: Chars<'s>,
}

impl<'s> Scanner<'s> {
	pub fn new(source: &'s str) -> Self { Self { len: source.len(), chars: source.chars() } }

	pub fn position(&self) -> usize { self.len - self.chars.as_str().len() }

	pub fn next(&mut self) -> Option<(char, usize)> {
		let position = self.position();
		Some((self.chars.next()?, position))
	}

	pub fn pop(&mut self) -> Option<char> { self.chars.next() }

	pub fn peek(&mut self) -> Option<char> { self.chars.clone().next() }
}

pub struct LexedSource<'s> {
	pub source: &'s str,
	pub tokens: Box<[Token]>,
	pub ranges: Box<[Range]>,
}

fn is_delimiter(c: char) -> bool { c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '\'' | ';') }

fn keyword_or_identifier(string: &str) -> Option<Token> {
	use Token::*;

	use self::Keyword::*;
	Some(match string {
		"claim" => Keyword(Claim),
		"define" => Keyword(Define),
		"check-same" => Keyword(CheckSame),

		"the" => Keyword(The),
		"TODO" => Keyword(Todo),
		"U" => Keyword(U),

		"Nat" => Keyword(Nat),
		"zero" => Keyword(Zero),
		"add1" => Keyword(Add1),
		"which-Nat" => Keyword(WhichNat),
		"iter-Nat" => Keyword(IterNat),
		"rec-Nat" => Keyword(RecNat),
		"ind-Nat" => Keyword(IndNat),

		"->" | "→" => Keyword(Arrow),
		"Pi" | "Π" | "∏" => Keyword(Pi),
		"lambda" | "λ" => Keyword(Lambda),

		"Atom" => Keyword(Atom),
		"quote" => Keyword(Quote),

		"Sigma" | "Σ" => Keyword(Sigma),
		"Pair" => Keyword(Pair),
		"cons" => Keyword(Cons),
		"car" => Keyword(Car),
		"cdr" => Keyword(Cdr),

		"Trivial" => Keyword(Trivial),
		"sole" => Keyword(Sole),

		"List" => Keyword(List),
		"nil" => Keyword(Nil),
		"::" => Keyword(ListCons),
		"rec-List" => Keyword(RecList),
		"ind-List" => Keyword(IndList),

		"Absurd" => Keyword(Absurd),
		"ind-Absurd" => Keyword(IndAbsurd),

		"=" => Keyword(Equal),
		"same" => Keyword(Same),
		"replace" => Keyword(Replace),
		"trans" => Keyword(Trans),
		"cong" => Keyword(Cong),
		"symm" => Keyword(Symm),
		"ind-=" => Keyword(IndEq),

		"Vec" => Keyword(Vec),
		"vecnil" => Keyword(VecNil),
		"vec::" => Keyword(VecCons),
		"head" => Keyword(Head),
		"tail" => Keyword(Tail),
		"ind-Vec" => Keyword(IndVec),

		"Either" => Keyword(Either),
		"left" => Keyword(Left),
		"right" => Keyword(Right),
		"ind-Either" => Keyword(IndEither),

		_ if string.chars().all(|c| c.is_ascii_digit()) => Number,
		_ if is_identifier(string) => Identifier,
		_ => return None,
	})
}

/// Characters the reader gives no meaning to.
fn is_reserved(c: char) -> bool { matches!(c, '#' | '"' | ',' | '`' | '|' | '\\' | '{' | '}') }

/// Any other run of symbol characters is a name, as long as it does not begin with a digit.
fn is_identifier(string: &str) -> bool {
	!string.starts_with(|c: char| c.is_ascii_digit()) && !string.contains(is_reserved)
}

/// Splits source text into tokens. Square brackets are read as parentheses but must pair with each other.
pub fn lex(source: &str) -> Result<LexedSource<'_>, LexError> {
	use LexErrorKind::*;
	use Token::*;
	let mut scanner = Scanner::new(source);
	let mut tokens = Vec::new();
	let mut ranges = Vec::new();
	let mut brackets = Vec::new();
	while let Some((initial, start)) = scanner.next() {
		let token = match initial {
			c if c.is_whitespace() => {
				while scanner.peek().is_some_and(char::is_whitespace) {
					scanner.pop();
				}
				Whitespace
			}
			';' => {
				while let Some(c) = scanner.pop() {
					if c == '\n' {
						break;
					}
				}
				Whitespace
			}
			'(' | '[' => {
				brackets.push((initial, start));
				ParenL
			}
			')' | ']' => {
				let expected = if initial == ')' { '(' } else { '[' };
				match brackets.pop() {
					Some((opening, _)) if opening == expected => ParenR,
					_ => return Err(LexError(start, MismatchedBracket(initial))),
				}
			}
			'\'' => Tick,
			_ => {
				while scanner.peek().is_some_and(|c| !is_delimiter(c)) {
					scanner.pop();
				}
				let lexeme = &source[start..scanner.position()];
				keyword_or_identifier(lexeme).ok_or_else(|| {
					if lexeme.starts_with(is_reserved) {
						LexError(start, UnrecognizedLexemePrefix)
					} else {
						LexError(start, MalformedName(lexeme.len()))
					}
				})?
			}
		};
		tokens.push(token);
		ranges.push((start, scanner.position()));
	}

	if let Some((opening, start)) = brackets.pop() {
		return Err(LexError(start, UnexpectedEnd(if opening == '(' { ')' } else { ']' })));
	}

	debug_assert!(tokens.len() == ranges.len());
	Ok(LexedSource { source, tokens: tokens.into_boxed_slice(), ranges: ranges.into_boxed_slice() })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(source: &str) -> Vec<Token> {
		lex(source).unwrap().tokens.iter().copied().filter(|token| *token != Token::Whitespace).collect()
	}

	#[test]
	fn keywords_and_names() {
		use {Keyword as K, Token as T};
		assert_eq!(tokens("(λ (n-1 x₁) (which-Nat n-1 'a x₁))"), vec![
			T::ParenL,
			T::Keyword(K::Lambda),
			T::ParenL,
			T::Identifier,
			T::Identifier,
			T::ParenR,
			T::ParenL,
			T::Keyword(K::WhichNat),
			T::Identifier,
			T::Tick,
			T::Identifier,
			T::Identifier,
			T::ParenR,
			T::ParenR
		]);
	}

	#[test]
	fn brackets_and_comments() {
		use {Keyword as K, Token as T};
		assert_eq!(tokens("[Pi ((A U)) A] ; a comment\n 12"), vec![
			T::ParenL,
			T::Keyword(K::Pi),
			T::ParenL,
			T::ParenL,
			T::Identifier,
			T::Keyword(K::U),
			T::ParenR,
			T::ParenR,
			T::Identifier,
			T::ParenR,
			T::Number
		]);
	}

	#[test]
	fn ranges_are_byte_offsets() {
		let lexed = lex("(add1 λ)").unwrap();
		assert_eq!(&*lexed.ranges, &[(0, 1), (1, 5), (5, 6), (6, 8), (8, 9)]);
	}

	#[test]
	fn malformed_lexemes() {
		assert_eq!(lex("(add1 1x)").err(), Some(LexError(6, LexErrorKind::MalformedName(2))));
		assert_eq!(lex("(add1 zero]").err(), Some(LexError(10, LexErrorKind::MismatchedBracket(']'))));
		assert_eq!(lex("(add1 zero").err(), Some(LexError(0, LexErrorKind::UnexpectedEnd(')'))));
		assert_eq!(lex("#t").err(), Some(LexError(0, LexErrorKind::UnrecognizedLexemePrefix)));
	}

	#[test]
	fn symbolic_names() {
		let lexed = lex("(claim + Nat)").unwrap();
		assert_eq!(lexed.tokens[3], Token::Identifier);
		assert_eq!(lexed.ranges[3], (7, 8));
		assert_eq!(tokens("step-* <="), [Token::Identifier, Token::Identifier]);
	}
}
