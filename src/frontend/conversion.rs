use std::mem::discriminant;

use crate::{
	common::Symbol,
	frontend::{context::Context, elaborate::ElaborationErrorKind},
	ir::{semantics::Value, syntax::Core},
};

/// Decides whether two core terms are equal up to a consistent renaming of bound variables.
///
/// A bound variable is identified by how many binders separate it from its binding site, so `λ x. x` and
/// `λ y. y` coincide while `λ x. λ y. x` and `λ x. λ y. y` do not.
pub fn alpha_equivalent(left: &Core, right: &Core) -> bool {
	Alpha { left: Vec::new(), right: Vec::new() }.equivalent(left, right)
}

struct Alpha {
	left: Vec<Symbol>,
	right: Vec<Symbol>,
}

impl Alpha {
	fn equivalent(&mut self, left: &Core, right: &Core) -> bool {
		use Core as C;
		match (left, right) {
			(C::Variable(left), C::Variable(right)) => {
				match (self.left.iter().rposition(|x| x == left), self.right.iter().rposition(|x| x == right)) {
					(Some(i), Some(j)) => i == j,
					(None, None) => left == right,
					_ => false,
				}
			}
			(C::Quote(left), C::Quote(right)) => left == right,
			(C::Todo(left_range, left), C::Todo(right_range, right)) =>
				left_range == right_range && self.equivalent(left, right),

			// Every proof of Absurd is the same.
			(C::The(left, _), C::The(right, _)) if matches!((&**left, &**right), (C::Absurd, C::Absurd)) => true,

			(
				C::Pi { parameter: left_parameter, base: left_base, family: left_family },
				C::Pi { parameter: right_parameter, base: right_base, family: right_family },
			)
			| (
				C::Sigma { parameter: left_parameter, base: left_base, family: left_family },
				C::Sigma { parameter: right_parameter, base: right_base, family: right_family },
			) =>
				self.equivalent(left_base, right_base)
					&& self.under(*left_parameter, *right_parameter, |alpha| {
						alpha.equivalent(left_family, right_family)
					}),
			(
				C::Lambda { parameter: left_parameter, body: left_body },
				C::Lambda { parameter: right_parameter, body: right_body },
			) => self.under(*left_parameter, *right_parameter, |alpha| alpha.equivalent(left_body, right_body)),

			(left, right) => {
				discriminant(left) == discriminant(right) && {
					let (left, right) = (left.children(), right.children());
					left.len() == right.len() && left.iter().zip(right).all(|(l, r)| self.equivalent(l, r))
				}
			}
		}
	}

	fn under(&mut self, left: Symbol, right: Symbol, f: impl FnOnce(&mut Self) -> bool) -> bool {
		self.left.push(left);
		self.right.push(right);
		let result = f(self);
		self.left.pop();
		self.right.pop();
		result
	}
}

impl Context {
	/// Decides definitional equality of two values of type `ty`.
	pub fn convert(&self, ty: &Value, left: &Value, right: &Value) -> Result<(), ElaborationErrorKind> {
		let (left, right) = (self.read_back(ty, left), self.read_back(ty, right));
		if alpha_equivalent(&left, &right) {
			Ok(())
		} else {
			tracing::trace!(?left, ?right, "conversion failed");
			Err(ElaborationErrorKind::NotTheSame { ty: self.read_back_type(ty), left, right })
		}
	}

	/// Decides definitional equality of two types.
	pub fn same_type(&self, expected: &Value, found: &Value) -> Result<(), ElaborationErrorKind> {
		let (expected, found) = (self.read_back_type(expected), self.read_back_type(found));
		if alpha_equivalent(&expected, &found) {
			Ok(())
		} else {
			tracing::trace!(?expected, ?found, "types differ");
			Err(ElaborationErrorKind::TypeMismatch { expected, found })
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::common::Names;

	fn lambda(parameter: Symbol, body: Core) -> Core { Core::Lambda { parameter, body: body.into() } }

	#[test]
	fn bound_names_do_not_matter() {
		let names = Names::new();
		let (x, y) = (names.intern("x"), names.intern("y"));
		assert!(alpha_equivalent(&lambda(x, Core::Variable(x)), &lambda(y, Core::Variable(y))));
		assert!(!alpha_equivalent(
			&lambda(x, lambda(y, Core::Variable(x))),
			&lambda(x, lambda(y, Core::Variable(y)))
		));
	}

	#[test]
	fn free_names_do() {
		let names = Names::new();
		let (x, y) = (names.intern("x"), names.intern("y"));
		assert!(!alpha_equivalent(&Core::Variable(x), &Core::Variable(y)));
		assert!(!alpha_equivalent(&lambda(y, Core::Variable(x)), &lambda(x, Core::Variable(x))));
	}

	#[test]
	fn absurd_proofs_are_all_equal() {
		let names = Names::new();
		let (x, y) = (names.intern("x"), names.intern("y"));
		let absurd = |symbol| Core::The(Core::Absurd.into(), Core::Variable(symbol).into());
		assert!(alpha_equivalent(&absurd(x), &absurd(y)));
	}

	#[test]
	fn shapes_must_agree() {
		assert!(!alpha_equivalent(&Core::Nil, &Core::VecNil));
		assert!(!alpha_equivalent(&Core::numeral(1), &Core::numeral(2)));
		assert!(alpha_equivalent(&Core::numeral(2), &Core::numeral(2)));
	}

	#[test]
	fn conversion_sees_through_computation() {
		let context = Context::new(Names::new());
		let four = Core::IterNat {
			target: Core::numeral(2).into(),
			base_type: Core::Nat.into(),
			base: Core::numeral(2).into(),
			step: Core::Lambda { parameter: Symbol::N, body: Core::Add1(Core::Variable(Symbol::N).into()).into() }.into(),
		};
		let four = context.evaluate(&four);
		assert!(context.convert(&Value::Nat, &four, &context.evaluate(&Core::numeral(4))).is_ok());
		assert!(context.same_type(&Value::Nat, &Value::Atom).is_err());
	}
}
