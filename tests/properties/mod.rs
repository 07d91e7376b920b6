use pie::{
	common::Names,
	frontend::{
		context::Context,
		conversion::alpha_equivalent,
		elaborate::Synthesized,
		parse::parse_expression,
		session::Session,
	},
	ir::source::{lex, Token},
};
use proptest::prelude::*;

use crate::common::normalize;

/// Spells `n` as nested `add1`s around `zero`.
fn unary(n: u64) -> String { (0..n).fold("zero".to_owned(), |inner, _| format!("(add1 {inner})")) }

/// Closed natural-number expressions whose type can be synthesized.
fn nat_expression() -> impl Strategy<Value = String> {
	(0u64..8).prop_map(|n| n.to_string()).prop_recursive(3, 16, 2, |inner| {
		prop_oneof![
			inner.clone().prop_map(|n| format!("(add1 {n})")),
			(inner.clone(), inner.clone()).prop_map(|(a, b)| format!("(iter-Nat {a} {b} (λ (k) (add1 k)))")),
			(inner.clone(), inner.clone()).prop_map(|(a, b)| format!("(rec-Nat {a} {b} (λ (n-1 acc) (add1 acc)))")),
			(inner.clone(), inner.clone()).prop_map(|(a, b)| format!("(car (the (Pair Nat Nat) (cons {a} {b})))")),
			(inner.clone(), inner).prop_map(|(a, b)| {
				format!("((the (-> Nat Nat Nat) (λ (j k) (which-Nat j k (λ (n-1) n-1)))) {a} {b})")
			}),
		]
	})
}

fn closed_expression() -> impl Strategy<Value = String> {
	prop_oneof![
		nat_expression(),
		nat_expression().prop_map(|n| format!("(the (Pair Nat Atom) (cons {n} 'pea))")),
		nat_expression().prop_map(|n| format!("(the (Vec Nat 1) (vec:: {n} vecnil))")),
	]
}

proptest! {
	#[test]
	fn checking_agrees_with_synthesis(source in closed_expression()) {
		let names = Names::new();
		let expression = parse_expression(&source, &names).unwrap();
		let context = Context::new(names);
		let Synthesized { term, ty } = context.synthesize(&expression).unwrap();
		let checked = context.check(&expression, &ty).unwrap();
		prop_assert!(alpha_equivalent(&context.normal_form(&term, &ty), &context.normal_form(&checked, &ty)));
	}

	#[test]
	fn numerals_read_back_as_digits(n in 0u64..64) {
		prop_assert_eq!(normalize(&unary(n)), format!("(the Nat {n})"));
	}

	#[test]
	fn which_nat_takes_the_predecessor(n in 0u64..32) {
		let expected = n.saturating_sub(1);
		let source = format!("(which-Nat {n} 0 (λ (n-1) n-1))");
		prop_assert_eq!(normalize(&source), format!("(the Nat {expected})"));
	}

	#[test]
	fn iteration_adds(a in 0u64..24, b in 0u64..24) {
		let source = format!("(iter-Nat {a} {b} (λ (k) (add1 k)))");
		prop_assert_eq!(normalize(&source), format!("(the Nat {})", a + b));
	}

	#[test]
	fn binder_names_do_not_matter(name in "[a-z]{1,6}") {
		prop_assume!(lex(&name).is_ok_and(|lexed| lexed.tokens[..] == [Token::Identifier]));
		let source = format!("(check-same (-> Atom Atom) (λ (y) y) (λ ({name}) {name}))");
		let mut session = Session::new();
		prop_assert!(session.run(&source).is_ok());
	}

	#[test]
	fn normal_forms_are_stable(n in 0u64..16) {
		let once = normalize(&format!("(iter-Nat {n} zero (λ (k) (add1 k)))"));
		let inner = once.trim_start_matches("(the Nat ").trim_end_matches(')');
		prop_assert_eq!(normalize(&format!("(the Nat {inner})")), once);
	}
}
