//! Expressions of the host language, including the `e[^n]` index-from-end sugar.

#![allow(missing_docs)]

pub mod display;
pub mod num;
mod string;

pub use string::{Id, Str, StrArena};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExprMust(la_arena::Idx<ExprData>);

/// `None` means the sub-tree is missing, as in from malformed parser output.
pub type Expr = Option<ExprMust>;

#[derive(Debug, Default, Clone)]
pub struct ExprArena(la_arena::Arena<ExprData>);

impl std::ops::Index<ExprMust> for ExprArena {
  type Output = ExprData;

  fn index(&self, index: ExprMust) -> &Self::Output {
    &self.0[index.0]
  }
}

impl ExprArena {
  pub fn alloc(&mut self, data: ExprData) -> ExprMust {
    ExprMust(self.0.alloc(data))
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

#[derive(Debug, Clone)]
pub enum ExprData {
  Prim(Prim),
  Id(Id),
  Array(Vec<Expr>),
  Object(Vec<(Str, Expr)>),
  /// The binds are evaluated in order, each seeing the ones before it.
  Local {
    binds: Vec<(Id, Expr)>,
    body: Expr,
  },
  /// Evaluates each in order, yielding the last.
  Seq(Vec<Expr>),
  Field {
    on: Expr,
    name: Str,
  },
  Subscript {
    on: Expr,
    idx: Expr,
  },
  /// `on[^offset]`, read from the end.
  SubscriptEnd {
    on: Expr,
    offset: Expr,
  },
  /// Evaluates to the stored value.
  Assign {
    place: Place,
    val: Expr,
  },
  Update {
    place: Place,
    op: UpdateOp,
  },
  BinOp {
    lhs: Expr,
    op: BinOp,
    rhs: Expr,
  },
  UnOp {
    op: UnOp,
    inner: Expr,
  },
}

impl ExprData {
  /// Returns whether this node itself is index-from-end sugar, in either read or write position.
  #[must_use]
  pub fn is_sugar(&self) -> bool {
    match self {
      ExprData::SubscriptEnd { .. } => true,
      ExprData::Assign { place, .. } | ExprData::Update { place, .. } => place.is_sugar(),
      _ => false,
    }
  }

  /// Returns the direct children.
  #[must_use]
  pub fn children(&self) -> Vec<Expr> {
    match self {
      ExprData::Prim(_) | ExprData::Id(_) => Vec::new(),
      ExprData::Array(es) | ExprData::Seq(es) => es.clone(),
      ExprData::Object(fields) => fields.iter().map(|&(_, e)| e).collect(),
      ExprData::Local { binds, body } => {
        binds.iter().map(|&(_, e)| e).chain(std::iter::once(*body)).collect()
      }
      ExprData::Field { on, .. } => vec![*on],
      ExprData::Subscript { on, idx } => vec![*on, *idx],
      ExprData::SubscriptEnd { on, offset } => vec![*on, *offset],
      ExprData::Assign { place, val } => {
        let mut ret = place.children();
        ret.push(*val);
        ret
      }
      ExprData::Update { place, op } => {
        let mut ret = place.children();
        if let UpdateOp::Compound(_, rhs) = op {
          ret.push(*rhs);
        }
        ret
      }
      ExprData::BinOp { lhs, rhs, .. } => vec![*lhs, *rhs],
      ExprData::UnOp { inner, .. } => vec![*inner],
    }
  }
}

/// Returns whether no index-from-end sugar is reachable from `e`.
#[must_use]
pub fn sugar_free(ar: &ExprArena, e: Expr) -> bool {
  let mut stack = vec![e];
  while let Some(e) = stack.pop() {
    let Some(e) = e else { continue };
    let data = &ar[e];
    if data.is_sugar() {
      return false;
    }
    stack.extend(data.children());
  }
  true
}

/// Something that can be assigned to.
#[derive(Debug, Clone, Copy)]
pub enum Place {
  Id(Id),
  Subscript { on: Expr, idx: Expr },
  /// `on[^offset]`, written from the end.
  SubscriptEnd { on: Expr, offset: Expr },
}

impl Place {
  #[must_use]
  pub fn is_sugar(&self) -> bool {
    matches!(self, Place::SubscriptEnd { .. })
  }

  fn children(&self) -> Vec<Expr> {
    match *self {
      Place::Id(_) => Vec::new(),
      Place::Subscript { on, idx } => vec![on, idx],
      Place::SubscriptEnd { on, offset } => vec![on, offset],
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub enum UpdateOp {
  /// `place op= rhs`
  Compound(BinOp, Expr),
  /// `++place`, `place--`, etc.
  Step(Step, Fix),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  Incr,
  Decr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fix {
  /// Evaluates to the new value.
  Prefix,
  /// Evaluates to the old value, as a number.
  Postfix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
  Add,
  Sub,
  Mul,
  Div,
  Rem,
  Eq,
  NotEq,
  Lt,
  LtEq,
  Gt,
  GtEq,
}

impl BinOp {
  /// Returns whether `op=` is a valid compound assignment operator.
  #[must_use]
  pub fn is_arithmetic(self) -> bool {
    matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
  Neg,
  /// Coerces to a number.
  Pos,
  LogicalNot,
}

/// A primitive value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prim {
  /// The absent-value sentinel: what reading a missing property produces.
  Undefined,
  Null,
  Bool(bool),
  Number(f64),
  String(Str),
}
