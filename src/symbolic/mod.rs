//! A small exact computer-algebra core: just enough to build, differentiate, expand,
//! integrate and print closed-form orbitals.

mod calculus;
mod eval;
mod expr;
mod numeric;
mod render;

pub use eval::Bindings;
pub use expr::{Constant, Domain, Expr, Function, Symbol};
