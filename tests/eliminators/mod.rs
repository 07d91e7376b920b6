use crate::common::normalize;

#[test]
fn natural_numbers() {
	assert_eq!(normalize("(which-Nat 3 'zero (λ (n-1) 'more))"), "(the Atom 'more)");
	assert_eq!(normalize("(iter-Nat 3 2 (λ (k) (add1 (add1 k))))"), "(the Nat 8)");
	assert_eq!(normalize("(rec-Nat 3 0 (λ (n-1 sum) (iter-Nat n-1 sum (λ (k) (add1 k)))))"), "(the Nat 3)");
	assert_eq!(
		normalize("(ind-Nat 2 (λ (k) (Vec Atom k)) vecnil (λ (k so-far) (vec:: 'pea so-far)))"),
		"(the (Vec Atom 2) (vec:: 'pea (vec:: 'pea vecnil)))"
	);
}

#[test]
fn pairs_and_functions() {
	assert_eq!(normalize("(car (the (Pair Atom Nat) (cons 'a 1)))"), "(the Atom 'a)");
	assert_eq!(
		normalize("(cdr (the (Σ ((n Nat)) (Vec Atom n)) (cons 1 (vec:: 'b vecnil))))"),
		"(the (Vec Atom 1) (vec:: 'b vecnil))"
	);
	assert_eq!(normalize("((the (-> Nat Nat Nat) (λ (a b) a)) 4 5)"), "(the Nat 4)");
}

#[test]
fn lists() {
	assert_eq!(normalize("(rec-List (:: 1 (:: 2 nil)) 0 (λ (e es n) (add1 n)))"), "(the Nat 2)");
	assert_eq!(normalize("(ind-List (:: 'a nil) (λ (es) Nat) 0 (λ (e es n) (add1 n)))"), "(the Nat 1)");
}

#[test]
fn equality() {
	let same = "(the (= Nat 2 2) (same 2))";
	assert_eq!(normalize(&format!("(symm {same})")), "(the (= Nat 2 2) (same 2))");
	assert_eq!(normalize(&format!("(trans {same} {same})")), "(the (= Nat 2 2) (same 2))");
	assert_eq!(normalize(&format!("(cong {same} (the (-> Nat Nat) (λ (n) (add1 n))))")), "(the (= Nat 3 3) (same 3))");
	assert_eq!(
		normalize(&format!("(replace {same} (λ (k) (Vec Atom k)) (vec:: 'a (vec:: 'b vecnil)))")),
		"(the (Vec Atom 2) (vec:: 'a (vec:: 'b vecnil)))"
	);
	assert_eq!(normalize(&format!("(ind-= {same} (λ (to p) Atom) 'done)")), "(the Atom 'done)");
}

#[test]
fn vectors() {
	let peas = "(the (Vec Atom 2) (vec:: 'pea (vec:: 'pod vecnil)))";
	assert_eq!(normalize(&format!("(head {peas})")), "(the Atom 'pea)");
	assert_eq!(normalize(&format!("(tail {peas})")), "(the (Vec Atom 1) (vec:: 'pod vecnil))");
	assert_eq!(
		normalize(&format!("(ind-Vec 2 {peas} (λ (k es) Nat) 0 (λ (k e es n) (add1 n)))")),
		"(the Nat 2)"
	);
}

#[test]
fn sums() {
	let method = "(λ (n) (add1 n))";
	assert_eq!(
		normalize(&format!("(ind-Either (the (Either Nat Atom) (left 1)) (λ (x) Nat) {method} (λ (a) 0))")),
		"(the Nat 2)"
	);
	assert_eq!(
		normalize(&format!("(ind-Either (the (Either Nat Atom) (right 'b)) (λ (x) Nat) {method} (λ (a) 0))")),
		"(the Nat 0)"
	);
}

#[test]
fn neutral_targets_are_stuck() {
	assert_eq!(
		normalize("(the (-> (List Atom) Nat) (λ (es) (rec-List es 0 (λ (e rest n) (add1 n)))))"),
		"(the (-> (List Atom) Nat) (λ (es) (rec-List es (the Nat 0) (λ (e rest n) (add1 n)))))"
	);
	assert_eq!(
		normalize("(the (-> (Pair Nat Nat) Nat) (λ (p) (car p)))"),
		"(the (-> (Pair Nat Nat) Nat) (λ (p) (car p)))"
	);
}
