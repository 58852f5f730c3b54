//! Errors.

use std::fmt;

/// An error when desugaring, because the input tree was malformed.
#[derive(Debug, Clone)]
pub struct Error {
  pub(crate) expr: caret_expr::ExprMust,
  pub(crate) kind: Kind,
}

impl Error {
  /// The input expression with the error.
  #[must_use]
  pub fn expr(&self) -> caret_expr::ExprMust {
    self.expr
  }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Kind {
  MissingOn,
  MissingOffset,
  MissingVal,
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kind {
      Kind::MissingOn => f.write_str("index-from-end access is missing the expression to index"),
      Kind::MissingOffset => f.write_str("index-from-end access is missing the offset after `^`"),
      Kind::MissingVal => f.write_str("assignment to index-from-end access is missing a value"),
    }
  }
}
