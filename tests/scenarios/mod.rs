use pie::{
	frontend::{elaborate::ElaborationErrorKind, session::Error},
	report::format_elaboration_error,
};

use crate::common::{normalize, outputs, run};

#[test]
fn definitions_print_their_normal_forms() {
	let source = "(claim f (-> Nat Nat)) (define f (λ (y) y)) f";
	assert_eq!(outputs(source), ["claimed f", "defined f", "(the (-> Nat Nat) (λ (y) y))"]);
}

#[test]
fn functions_are_eta_expanded() {
	assert_eq!(
		normalize("(the (Π ((f (-> Nat Nat))) (-> Nat Nat)) (λ (f) f))"),
		"(the (-> (-> Nat Nat) Nat Nat) (λ (f x) (f x)))"
	);
}

#[test]
fn pairs_are_eta_expanded() {
	assert_eq!(
		normalize("(the (-> (Pair Nat Atom) (Pair Nat Atom)) (λ (p) p))"),
		"(the (-> (Pair Nat Atom) (Pair Nat Atom)) (λ (p) (cons (car p) (cdr p))))"
	);
}

#[test]
fn every_trivial_value_is_sole() {
	assert_eq!(normalize("(the (-> Trivial Trivial) (λ (t) t))"), "(the (-> Trivial Trivial) (λ (t) sole))");
}

#[test]
fn absurd_neutrals_keep_their_annotation() {
	assert_eq!(
		normalize("(the (-> Absurd Absurd) (λ (nope) nope))"),
		"(the (-> Absurd Absurd) (λ (nope) (the Absurd nope)))"
	);
}

#[test]
fn stuck_eliminators_carry_their_base_type() {
	assert_eq!(
		normalize("(the (-> Nat Nat) (λ (n) (iter-Nat n 0 (λ (k) (add1 k)))))"),
		"(the (-> Nat Nat) (λ (n) (iter-Nat n (the Nat 0) (λ (k) (add1 k)))))"
	);
}

#[test]
fn shadowed_parameters_are_renamed_in_output() {
	assert_eq!(normalize("(the (-> Nat Nat Nat) (λ (x x) x))"), "(the (-> Nat Nat Nat) (λ (x x₁) x₁))");
}

#[test]
fn quoted_atoms_are_printed_with_a_tick() {
	assert_eq!(normalize("(the (Pair Atom Atom) (cons 'olive 'oil))"), "(the (Pair Atom Atom) (cons 'olive 'oil))");
	assert_eq!(normalize("(quote ratatouille)"), "(the Atom 'ratatouille)");
}

#[test]
fn errors_are_reported_where_they_occur() {
	let source = "(claim x Nat)\n(define x y)\n";
	let (session, result) = run(source);
	let Err(Error::Elaboration(error)) = result else { panic!("expected an elaboration error") };
	let report = format_elaboration_error(source, session.names(), &error);
	assert_eq!(report.lines().next(), Some("[2:11] error: elaboration error: unknown variable y"));
}

#[test]
fn mismatches_name_both_types() {
	let source = "(the Nat 'a)";
	let (session, result) = run(source);
	let Err(Error::Elaboration(error)) = result else { panic!("expected an elaboration error") };
	assert_eq!(error.range, (9, 11));
	assert_eq!(error.kind.message().render(session.names()), "expected Nat but found Atom");
}

#[test]
fn ill_typed_motives_explain_the_cause() {
	let (_, result) = run("(claim f (-> Nat Nat)) (define f (λ (n) (ind-Nat n (λ (k) k) 0 (λ (n-1 ih) ih))))");
	let Err(Error::Elaboration(error)) = result else { panic!("expected an elaboration error") };
	let ElaborationErrorKind::IllTypedMotive { cause, .. } = error.kind else { panic!("{:?}", error.kind) };
	assert!(matches!(*cause, ElaborationErrorKind::TypeMismatch { .. }));
}

#[test]
fn holes_are_reported_in_order() {
	let (session, result) = run("(claim f (-> Nat Atom Nat)) (define f (λ (n a) TODO)) (claim g (Pair TODO Nat))");
	let processed = result.unwrap();
	let holes = processed.iter().flat_map(|processed| &processed.holes).collect::<Vec<_>>();
	assert_eq!(holes.len(), 2);
	assert_eq!(pie::pretty::unparse::pretty_print(&holes[0].ty, session.names()), "Nat");
	assert_eq!(pie::pretty::unparse::pretty_print(&holes[1].ty, session.names()), "U");
}
