//! Desugaring index-from-end access, `e[^n]`, into ordinary indexing.
//!
//! The output only uses constructs the host language already has: `local` bindings, property
//! reads, number coercion (unary `+`), subtraction, and ordinary subscript reads, writes and
//! updates. Every sub-expression of the sugar is evaluated exactly once, in source order, and
//! `length` is read exactly once per access.

mod error;
mod internal;
mod st;

pub use error::Error;

/// Desugars the expression `top` from `in_ar` into a fresh arena.
///
/// Strings and identifiers are shared with the input, and fresh temporaries are allocated from
/// `str_ar`.
pub fn get(
  str_ar: &mut caret_expr::StrArena,
  in_ar: &caret_expr::ExprArena,
  top: caret_expr::Expr,
) -> Desugar {
  let mut st = st::St::new(str_ar, in_ar);
  let top = internal::get(&mut st, top);
  let (ar, errors, count) = st.finish();
  log::debug!(
    "rewrote {count} index-from-end accesses into {} exprs with {} errors",
    ar.len(),
    errors.len()
  );
  Desugar { ar, top, errors, count }
}

/// The result of desugaring.
#[derive(Debug)]
pub struct Desugar {
  /// The output expressions.
  pub ar: caret_expr::ExprArena,
  /// The top expression, in `ar`.
  pub top: caret_expr::Expr,
  /// Malformed sugar, pointing into the input arena.
  pub errors: Vec<Error>,
  /// How many index-from-end accesses were rewritten.
  pub count: usize,
}
