use std::{cell::RefCell, fmt, rc::Rc};

use lasso::{Key, Rodeo};

/// A byte range into the source text.
pub type Range = (usize, usize);

/// An identifier.
///
/// Symbols are interned, so the interner key is the identity of the binding: two symbols denote the same
/// binding iff their keys match. The printable label is recovered with [`Names::label`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

// SAFETY: `try_from_usize` and `into_usize` are inverse on every index that fits in a `u32`.
unsafe impl Key for Symbol {
	fn into_usize(self) -> usize { self.0 as usize }

	fn try_from_usize(int: usize) -> Option<Self> { u32::try_from(int).ok().map(Self) }
}

/// Labels interned by every [`Names`] before anything else, in this order.
const RESERVED: [&str; 10] = ["x", "n", "n-1", "ih", "e", "es", "k", "to", "p", "_"];

impl Symbol {
	pub const X: Self = Self(0);
	pub const N: Self = Self(1);
	pub const PREVIOUS: Self = Self(2);
	pub const IH: Self = Self(3);
	pub const ENTRY: Self = Self(4);
	pub const ENTRIES: Self = Self(5);
	pub const LENGTH: Self = Self(6);
	pub const TO: Self = Self(7);
	pub const PROOF: Self = Self(8);
	pub const IGNORED: Self = Self(9);
}

impl fmt::Debug for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Symbol({})", self.0) }
}

/// The interner shared by the reader, the checker and the printer.
pub struct Names(RefCell<Rodeo<Symbol>>);

impl Default for Names {
	fn default() -> Self {
		let mut rodeo = Rodeo::new();
		for label in RESERVED {
			rodeo.get_or_intern_static(label);
		}
		Self(RefCell::new(rodeo))
	}
}

impl Names {
	pub fn new() -> Rc<Self> { Rc::new(Self::default()) }

	pub fn intern(&self, label: &str) -> Symbol { self.0.borrow_mut().get_or_intern(label) }

	/// The printable label of a symbol.
	pub fn label(&self, symbol: Symbol) -> String { self.0.borrow().resolve(&symbol).to_owned() }
}

impl fmt::Debug for Names {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Names({})", self.0.borrow().len()) }
}

/// A persistent association list from symbols to items.
///
/// Extension allocates a new head and never touches the tail, so a scope can be extended inside a checking
/// branch and dropped on the way out without disturbing any other holder of the tail.
pub struct Scope<T>(Option<Rc<Link<T>>>);

struct Link<T> {
	symbol: Symbol,
	item: T,
	rest: Scope<T>,
}

impl<T> Clone for Scope<T> {
	fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Default for Scope<T> {
	fn default() -> Self { Self::empty() }
}

impl<T> Scope<T> {
	pub const fn empty() -> Self { Self(None) }

	#[must_use]
	pub fn extend(&self, symbol: Symbol, item: T) -> Self {
		Self(Some(Rc::new(Link { symbol, item, rest: self.clone() })))
	}

	/// Finds the most recent entry for a symbol.
	pub fn lookup(&self, symbol: Symbol) -> Option<&T> {
		self.iter().find_map(|(key, item)| (key == symbol).then_some(item))
	}

	pub fn contains(&self, symbol: Symbol) -> bool { self.iter().any(|(key, _)| key == symbol) }

	pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ { self.iter().map(|(symbol, _)| symbol) }

	/// Iterates from the newest entry to the oldest.
	pub fn iter(&self) -> ScopeIter<'_, T> { ScopeIter(self.0.as_deref()) }
}

impl<T: fmt::Debug> fmt::Debug for Scope<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_list().entries(self.iter()).finish() }
}

pub struct ScopeIter<'s, T>(Option<&'s Link<T>>);

impl<'s, T> Iterator for ScopeIter<'s, T> {
	type Item = (Symbol, &'s T);

	fn next(&mut self) -> Option<Self::Item> {
		let link = self.0?;
		self.0 = link.rest.0.as_deref();
		Some((link.symbol, &link.item))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn newer_entries_shadow_older_ones() {
		let names = Names::new();
		let x = names.intern("x");
		let scope = Scope::empty().extend(x, 1).extend(x, 2);
		assert_eq!(scope.lookup(x), Some(&2));
		assert_eq!(scope.iter().map(|(_, n)| *n).collect::<Vec<_>>(), vec![2, 1]);
	}

	#[test]
	fn extension_leaves_the_old_scope_untouched() {
		let names = Names::new();
		let (x, y) = (names.intern("x"), names.intern("y"));
		let outer = Scope::empty().extend(x, "outer");
		let inner = outer.extend(y, "inner");
		assert!(inner.contains(y));
		assert!(!outer.contains(y));
		assert_eq!(outer.lookup(x), Some(&"outer"));
	}

	#[test]
	fn reserved_labels_have_fixed_symbols() {
		let names = Names::new();
		assert_eq!(names.intern("x"), Symbol::X);
		assert_eq!(names.intern("n-1"), Symbol::PREVIOUS);
		assert_eq!(names.label(Symbol::IGNORED), "_");
	}

	#[test]
	fn interning_is_idempotent() {
		let names = Names::new();
		assert_eq!(names.intern("x₁"), names.intern("x₁"));
		assert_ne!(names.intern("x"), names.intern("x₁"));
		assert_eq!(names.label(names.intern("x₁")), "x₁");
	}
}
