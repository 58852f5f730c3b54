//! Errors.

use std::fmt;

/// An error from reading a tree.
#[derive(Debug)]
pub struct Error {
  /// Where in the JSON, like `/body/binds/0/1`. Empty for the whole document.
  pub path: String,
  pub(crate) kind: Kind,
}

#[derive(Debug)]
pub(crate) enum Kind {
  Json(String),
  Number,
  Expected(&'static str),
  NoType,
  NoKey(&'static str),
  UnknownType(String, Option<String>),
  Place,
  Op,
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let path = if self.path.is_empty() { "/" } else { self.path.as_str() };
    write!(f, "{path}: ")?;
    match &self.kind {
      Kind::Json(e) => write!(f, "invalid JSON: {e}"),
      Kind::Number => f.write_str("number out of range"),
      Kind::Expected(what) => write!(f, "expected {what}"),
      Kind::NoType => f.write_str("object has no `type`"),
      Kind::NoKey(key) => write!(f, "missing required key `{key}`"),
      Kind::UnknownType(ty, suggest) => {
        write!(f, "unknown node type `{ty}`")?;
        if let Some(suggest) = suggest {
          write!(f, "; did you mean `{suggest}`?")?;
        }
        Ok(())
      }
      Kind::Place => f.write_str("not assignable: expected `Id`, `Subscript`, or `SubscriptEnd`"),
      Kind::Op => f.write_str("unknown operator"),
    }
  }
}

impl std::error::Error for Error {}
