//! Displaying expressions in surface syntax.

use crate::{BinOp, Expr, ExprArena, ExprData, Fix, Place, Prim, Step, StrArena, UnOp, UpdateOp};
use std::fmt;

/// Displays an expression. Missing sub-trees are shown as `_`.
///
/// Parenthesizes conservatively, so e.g. `a - b - c` shows as `(a - b) - c`.
#[must_use]
pub fn expr<'a>(e: Expr, str_ar: &'a StrArena, expr_ar: &'a ExprArena) -> impl fmt::Display {
  ExprDisplay { e, str_ar, expr_ar, pos: Pos::Top }
}

/// Where an expression appears, which decides whether it needs parentheses.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Pos {
  Top,
  /// In a comma-separated list. A `local` would swallow the rest of the list.
  Item,
  /// An operand of an operator, or the thing being indexed.
  Operand,
}

#[derive(Clone, Copy)]
struct ExprDisplay<'a> {
  e: Expr,
  str_ar: &'a StrArena,
  expr_ar: &'a ExprArena,
  pos: Pos,
}

impl<'a> ExprDisplay<'a> {
  fn with(self, e: Expr, pos: Pos) -> ExprDisplay<'a> {
    ExprDisplay { e, pos, ..self }
  }

  fn place(self, place: &'a Place) -> PlaceDisplay<'a> {
    PlaceDisplay { place, cx: self }
  }

  fn needs_parens(&self, data: &ExprData) -> bool {
    match self.pos {
      Pos::Top => false,
      Pos::Item => matches!(data, ExprData::Local { .. }),
      Pos::Operand => matches!(
        data,
        ExprData::Local { .. }
          | ExprData::Assign { .. }
          | ExprData::Update { op: UpdateOp::Compound(..), .. }
          | ExprData::BinOp { .. }
      ),
    }
  }
}

impl fmt::Display for ExprDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let Some(e) = self.e else { return f.write_str("_") };
    let expr_ar = self.expr_ar;
    let data = &expr_ar[e];
    if self.needs_parens(data) {
      return write!(f, "({})", self.with(self.e, Pos::Top));
    }
    match data {
      ExprData::Prim(prim) => prim.display(self.str_ar).fmt(f),
      ExprData::Id(id) => id.display(self.str_ar).fmt(f),
      ExprData::Array(elems) => {
        f.write_str("[")?;
        for (i, &elem) in elems.iter().enumerate() {
          if i != 0 {
            f.write_str(", ")?;
          }
          self.with(elem, Pos::Item).fmt(f)?;
        }
        f.write_str("]")
      }
      ExprData::Object(fields) => {
        if fields.is_empty() {
          return f.write_str("{}");
        }
        f.write_str("{ ")?;
        for (i, &(key, val)) in fields.iter().enumerate() {
          if i != 0 {
            f.write_str(", ")?;
          }
          let key = self.str_ar.get(key);
          if is_ident(key) {
            f.write_str(key)?;
          } else {
            Quoted(key).fmt(f)?;
          }
          write!(f, ": {}", self.with(val, Pos::Item))?;
        }
        f.write_str(" }")
      }
      ExprData::Local { binds, body } => {
        f.write_str("local ")?;
        for (i, &(id, rhs)) in binds.iter().enumerate() {
          if i != 0 {
            f.write_str(", ")?;
          }
          write!(f, "{} = {}", id.display(self.str_ar), self.with(rhs, Pos::Item))?;
        }
        write!(f, "; {}", self.with(*body, Pos::Top))
      }
      ExprData::Seq(es) => {
        f.write_str("(")?;
        for (i, &e) in es.iter().enumerate() {
          if i != 0 {
            f.write_str(", ")?;
          }
          self.with(e, Pos::Item).fmt(f)?;
        }
        f.write_str(")")
      }
      ExprData::Field { on, name } => {
        write!(f, "{}.{}", self.with(*on, Pos::Operand), self.str_ar.get(*name))
      }
      ExprData::Subscript { on, idx } => {
        write!(f, "{}[{}]", self.with(*on, Pos::Operand), self.with(*idx, Pos::Top))
      }
      ExprData::SubscriptEnd { on, offset } => {
        write!(f, "{}[^{}]", self.with(*on, Pos::Operand), self.with(*offset, Pos::Top))
      }
      ExprData::Assign { place, val } => {
        write!(f, "{} = {}", self.place(place), self.with(*val, Pos::Item))
      }
      ExprData::Update { place, op } => match *op {
        UpdateOp::Compound(op, rhs) => {
          write!(f, "{} {op}= {}", self.place(place), self.with(rhs, Pos::Item))
        }
        UpdateOp::Step(step, Fix::Prefix) => write!(f, "{step}{}", self.place(place)),
        UpdateOp::Step(step, Fix::Postfix) => write!(f, "{}{step}", self.place(place)),
      },
      ExprData::BinOp { lhs, op, rhs } => {
        write!(f, "{} {op} {}", self.with(*lhs, Pos::Operand), self.with(*rhs, Pos::Operand))
      }
      ExprData::UnOp { op, inner } => write!(f, "{op}{}", self.with(*inner, Pos::Operand)),
    }
  }
}

struct PlaceDisplay<'a> {
  place: &'a Place,
  cx: ExprDisplay<'a>,
}

impl fmt::Display for PlaceDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self.place {
      Place::Id(id) => id.display(self.cx.str_ar).fmt(f),
      Place::Subscript { on, idx } => {
        write!(f, "{}[{}]", self.cx.with(on, Pos::Operand), self.cx.with(idx, Pos::Top))
      }
      Place::SubscriptEnd { on, offset } => {
        write!(f, "{}[^{}]", self.cx.with(on, Pos::Operand), self.cx.with(offset, Pos::Top))
      }
    }
  }
}

fn is_ident(s: &str) -> bool {
  s.as_bytes().split_first().is_some_and(|(&fst, rest)| {
    (fst.is_ascii_alphabetic() || fst == b'_' || fst == b'$')
      && rest.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
  })
}

/// A double-quoted string literal.
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("\"")?;
    for c in self.0.chars() {
      match c {
        '"' => f.write_str("\\\"")?,
        '\\' => f.write_str("\\\\")?,
        '\n' => f.write_str("\\n")?,
        '\r' => f.write_str("\\r")?,
        '\t' => f.write_str("\\t")?,
        c if c.is_control() => write!(f, "\\u{:04x}", u32::from(c))?,
        c => write!(f, "{c}")?,
      }
    }
    f.write_str("\"")
  }
}

impl fmt::Display for BinOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      BinOp::Add => "+",
      BinOp::Sub => "-",
      BinOp::Mul => "*",
      BinOp::Div => "/",
      BinOp::Rem => "%",
      BinOp::Eq => "==",
      BinOp::NotEq => "!=",
      BinOp::Lt => "<",
      BinOp::LtEq => "<=",
      BinOp::Gt => ">",
      BinOp::GtEq => ">=",
    };
    f.write_str(s)
  }
}

impl fmt::Display for UnOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      UnOp::Neg => "-",
      UnOp::Pos => "+",
      UnOp::LogicalNot => "!",
    };
    f.write_str(s)
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Step::Incr => f.write_str("++"),
      Step::Decr => f.write_str("--"),
    }
  }
}

impl Prim {
  #[must_use]
  pub fn display<'a>(&'a self, ar: &'a StrArena) -> impl fmt::Display {
    PrimDisplay { prim: self, ar }
  }
}

struct PrimDisplay<'a> {
  prim: &'a Prim,
  ar: &'a StrArena,
}

impl fmt::Display for PrimDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self.prim {
      Prim::Undefined => f.write_str("undefined"),
      Prim::Null => f.write_str("null"),
      Prim::Bool(b) => b.fmt(f),
      Prim::Number(n) => {
        // `-0` is a distinct literal, even though it converts to the string "0".
        if n == 0.0 && n.is_sign_negative() {
          f.write_str("-0")
        } else {
          f.write_str(&crate::num::to_string(n))
        }
      }
      Prim::String(s) => Quoted(self.ar.get(s)).fmt(f),
    }
  }
}
