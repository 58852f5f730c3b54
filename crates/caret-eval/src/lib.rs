//! A reference evaluator for the host language.
//!
//! It supplies the ordinary semantics that desugared index-from-end access relies on: property
//! reads (including the array-like `length`), number coercion, key coercion for indexing, and
//! indexed reads, writes and updates. It refuses to execute the sugar itself.
//!
//! Every property read and write is recorded in a [`Trace`], so callers can check how many times,
//! and in what order, the host was asked to do things.

#![expect(missing_docs)]

pub mod error;
pub mod val;

mod exec;
mod manifest;

use caret_expr::{ExprMust, Id, Str, StrArena};
use std::fmt;

#[derive(Debug)]
pub struct Cx<'a> {
  pub str_ar: &'a mut StrArena,
  pub heap: val::Heap,
  pub trace: Trace,
  env: Vec<(Id, val::Val)>,
}

impl<'a> Cx<'a> {
  pub fn new(str_ar: &'a mut StrArena) -> Self {
    Self { str_ar, heap: val::Heap::default(), trace: Trace::default(), env: Vec::new() }
  }

  fn lookup(&self, id: Id) -> Option<val::Val> {
    self.env.iter().rev().find_map(|&(other, v)| (other == id).then_some(v))
  }

  fn assign(&mut self, expr: ExprMust, id: Id, v: val::Val) -> error::Result<()> {
    match self.env.iter_mut().rev().find(|(other, _)| *other == id) {
      Some((_, slot)) => {
        *slot = v;
        Ok(())
      }
      None => Err(error::Error::Exec { expr, kind: error::Kind::NotInScope(id) }),
    }
  }
}

/// The property accesses that happened, in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Trace(Vec<Event>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
  Get(Str),
  Set(Str),
}

impl Trace {
  fn push(&mut self, event: Event) {
    log::trace!("{event:?}");
    self.0.push(event);
  }

  #[must_use]
  pub fn events(&self) -> &[Event] {
    &self.0
  }

  /// Returns how many times the property `key` was read.
  #[must_use]
  pub fn gets(&self, key: Str) -> usize {
    self.0.iter().filter(|&&e| e == Event::Get(key)).count()
  }

  /// Displays the events like `get length, set 3`.
  #[must_use]
  pub fn display<'a>(&'a self, ar: &'a StrArena) -> impl fmt::Display + 'a {
    TraceDisplay { trace: self, ar }
  }
}

struct TraceDisplay<'a> {
  trace: &'a Trace,
  ar: &'a StrArena,
}

impl fmt::Display for TraceDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, event) in self.trace.0.iter().enumerate() {
      if i != 0 {
        f.write_str(", ")?;
      }
      match *event {
        Event::Get(key) => write!(f, "get {}", self.ar.get(key))?,
        Event::Set(key) => write!(f, "set {}", self.ar.get(key))?,
      }
    }
    Ok(())
  }
}

/// Executes the expression to produce a value.
///
/// # Errors
///
/// If execution failed.
pub fn get_exec(
  cx: &mut Cx<'_>,
  ar: &caret_expr::ExprArena,
  expr: caret_expr::Expr,
) -> error::Result<val::Val> {
  exec::get(cx, ar, expr)
}

/// Manifests the value into JSON.
///
/// # Errors
///
/// If the value was cyclic.
pub fn get_manifest(cx: &Cx<'_>, v: val::Val) -> error::Result<serde_json::Value> {
  manifest::get(cx, v)
}
