//! Errors.

use caret_expr::{Id, Str, StrArena};
use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone)]
pub enum Error {
  Exec { expr: caret_expr::ExprMust, kind: Kind },
  /// A sub-tree was missing.
  NoExpr,
  ManifestCycle,
}

impl Error {
  #[must_use]
  pub fn display<'a>(&'a self, ar: &'a StrArena) -> impl fmt::Display + 'a {
    DisplayError { error: self, ar }
  }
}

#[derive(Debug, Clone)]
pub enum Kind {
  /// Index-from-end access must be desugared before execution.
  Sugar,
  NotInScope(Id),
  /// Reading a property of `undefined` or `null`.
  GetOfNullish { key: Str, null: bool },
  SetOnPrim(Str),
  InvalidArrayLength,
  ArrayTooLarge,
}

struct DisplayError<'a> {
  error: &'a Error,
  ar: &'a StrArena,
}

impl fmt::Display for DisplayError<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.error {
      Error::Exec { kind, .. } => match kind {
        Kind::Sugar => f.write_str("index-from-end access was not desugared"),
        Kind::NotInScope(id) => write!(f, "not in scope: `{}`", id.display(self.ar)),
        Kind::GetOfNullish { key, null } => {
          let on = if *null { "null" } else { "undefined" };
          write!(f, "cannot read property `{}` of {on}", self.ar.get(*key))
        }
        Kind::SetOnPrim(key) => {
          write!(f, "cannot set property `{}` on a primitive", self.ar.get(*key))
        }
        Kind::InvalidArrayLength => f.write_str("invalid array length"),
        Kind::ArrayTooLarge => f.write_str("array too large"),
      },
      Error::NoExpr => f.write_str("no expr"),
      Error::ManifestCycle => f.write_str("cannot manifest a cyclic value"),
    }
  }
}
