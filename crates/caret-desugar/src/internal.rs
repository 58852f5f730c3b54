//! The internal impl.

use crate::error::Kind;
use crate::st::St;
use caret_expr::{BinOp, Expr, ExprData, ExprMust, Id, Place, Prim, Str, UnOp, UpdateOp};

pub(crate) fn get(st: &mut St<'_>, e: Expr) -> Expr {
  let e = e?;
  let data = match st.input(e) {
    ExprData::Prim(p) => ExprData::Prim(*p),
    ExprData::Id(id) => ExprData::Id(*id),
    ExprData::Array(elems) => ExprData::Array(elems.iter().map(|&x| get(st, x)).collect()),
    ExprData::Object(fields) => {
      ExprData::Object(fields.iter().map(|&(key, val)| (key, get(st, val))).collect())
    }
    ExprData::Local { binds, body } => {
      let binds: Vec<_> = binds.iter().map(|&(id, rhs)| (id, get(st, rhs))).collect();
      ExprData::Local { binds, body: get(st, *body) }
    }
    ExprData::Seq(es) => ExprData::Seq(es.iter().map(|&x| get(st, x)).collect()),
    ExprData::Field { on, name } => ExprData::Field { on: get(st, *on), name: *name },
    ExprData::Subscript { on, idx } => ExprData::Subscript { on: get(st, *on), idx: get(st, *idx) },
    ExprData::SubscriptEnd { on, offset } => return get_read(st, e, *on, *offset),
    ExprData::Assign { place, val } => match *place {
      Place::SubscriptEnd { on, offset } => return get_write(st, e, on, offset, *val),
      place => ExprData::Assign { place: get_place(st, place), val: get(st, *val) },
    },
    ExprData::Update { place, op } => match *place {
      Place::SubscriptEnd { on, offset } => return get_update(st, e, on, offset, *op),
      place => ExprData::Update { place: get_place(st, place), op: get_update_op(st, *op) },
    },
    ExprData::BinOp { lhs, op, rhs } => {
      ExprData::BinOp { lhs: get(st, *lhs), op: *op, rhs: get(st, *rhs) }
    }
    ExprData::UnOp { op, inner } => ExprData::UnOp { op: *op, inner: get(st, *inner) },
  };
  st.expr(data)
}

/// only for places that are not themselves sugar.
fn get_place(st: &mut St<'_>, place: Place) -> Place {
  match place {
    Place::Id(id) => Place::Id(id),
    Place::Subscript { on, idx } => Place::Subscript { on: get(st, on), idx: get(st, idx) },
    Place::SubscriptEnd { on, offset } => {
      Place::SubscriptEnd { on: get(st, on), offset: get(st, offset) }
    }
  }
}

fn get_update_op(st: &mut St<'_>, op: UpdateOp) -> UpdateOp {
  match op {
    UpdateOp::Compound(op, rhs) => UpdateOp::Compound(op, get(st, rhs)),
    UpdateOp::Step(step, fix) => UpdateOp::Step(step, fix),
  }
}

/// `on[^offset]` becomes
///
/// ```text
/// local $a = on, $n = offset; $a[+$a.length - +$n]
/// ```
fn get_read(st: &mut St<'_>, e: ExprMust, on: Expr, offset: Expr) -> Expr {
  let end = get_end(st, e, on, offset)?;
  let (on, idx) = end.subscript(st);
  let body = st.expr(ExprData::Subscript { on, idx });
  st.rewrote();
  st.expr(ExprData::Local { binds: end.binds, body })
}

/// `on[^offset] = val` becomes
///
/// ```text
/// local $a = on, $n = offset, $v = val; $a[+$a.length - +$n] = $v
/// ```
///
/// `val` is evaluated before `length` is read, since it may change the length.
fn get_write(st: &mut St<'_>, e: ExprMust, on: Expr, offset: Expr, val: Expr) -> Expr {
  let end = get_end(st, e, on, offset);
  let val_out = get(st, val);
  if val.is_none() {
    st.err(e, Kind::MissingVal);
  }
  let mut end = end?;
  let val = match val.map(|x| st.input(x)) {
    None => return None,
    Some(&ExprData::Prim(p)) => st.expr(ExprData::Prim(p)),
    Some(_) => {
      let v = st.fresh();
      end.binds.push((v, val_out));
      st.expr(ExprData::Id(v))
    }
  };
  let place = end.place(st);
  let body = st.expr(ExprData::Assign { place, val });
  st.rewrote();
  st.expr(ExprData::Local { binds: end.binds, body })
}

/// `on[^offset] op= rhs` becomes
///
/// ```text
/// local $a = on, $n = offset; $a[+$a.length - +$n] op= rhs
/// ```
///
/// The ordinary update coerces its index to a key once and uses it for both the fetch and the
/// store, so `length` is read only once. Likewise for `++on[^offset]` and friends.
fn get_update(st: &mut St<'_>, e: ExprMust, on: Expr, offset: Expr, op: UpdateOp) -> Expr {
  let end = get_end(st, e, on, offset);
  let op = match op {
    UpdateOp::Compound(bin_op, rhs) => {
      let rhs_out = get(st, rhs);
      if rhs.is_none() {
        st.err(e, Kind::MissingVal);
        return None;
      }
      UpdateOp::Compound(bin_op, rhs_out)
    }
    UpdateOp::Step(step, fix) => UpdateOp::Step(step, fix),
  };
  let end = end?;
  let place = end.place(st);
  let body = st.expr(ExprData::Update { place, op });
  st.rewrote();
  st.expr(ExprData::Local { binds: end.binds, body })
}

/// What every index-from-end rewrite shares.
struct End {
  /// Evaluate the indexed expression and the offset, in that order.
  binds: Vec<(Id, Expr)>,
  /// Bound to the indexed expression.
  arr: Id,
  /// The offset, already a number.
  offset: Expr,
}

impl End {
  /// Returns the parts of `$a[+$a.length - offset]`.
  fn subscript(&self, st: &mut St<'_>) -> (Expr, Expr) {
    let on = st.expr(ExprData::Id(self.arr));
    let idx = get_end_idx(st, self.arr, self.offset);
    (on, idx)
  }

  fn place(&self, st: &mut St<'_>) -> Place {
    let (on, idx) = self.subscript(st);
    Place::Subscript { on, idx }
  }
}

fn get_end(st: &mut St<'_>, e: ExprMust, on: Expr, offset: Expr) -> Option<End> {
  let on_out = get(st, on);
  let offset_out = get(st, offset);
  if on.is_none() {
    st.err(e, Kind::MissingOn);
  }
  if offset.is_none() {
    st.err(e, Kind::MissingOffset);
  }
  let (Some(_), Some(offset)) = (on, offset) else { return None };
  let arr = st.fresh();
  let mut binds = vec![(arr, on_out)];
  let offset = match st.input(offset) {
    // literals have no effects, so we need not bind them. numbers need not be coerced.
    &ExprData::Prim(Prim::Number(n)) => st.expr(ExprData::Prim(Prim::Number(n))),
    &ExprData::Prim(p) => {
      let inner = st.expr(ExprData::Prim(p));
      st.expr(ExprData::UnOp { op: UnOp::Pos, inner })
    }
    _ => {
      let n = st.fresh();
      binds.push((n, offset_out));
      let inner = st.expr(ExprData::Id(n));
      st.expr(ExprData::UnOp { op: UnOp::Pos, inner })
    }
  };
  Some(End { binds, arr, offset })
}

/// Returns `+arr.length - offset`. The length is read exactly once and subtracted as is, so `-0`
/// gets no special treatment: `^0` and `^-0` both index at `length`.
fn get_end_idx(st: &mut St<'_>, arr: Id, offset: Expr) -> Expr {
  let on = st.expr(ExprData::Id(arr));
  let length = st.expr(ExprData::Field { on, name: Str::LENGTH });
  let length = st.expr(ExprData::UnOp { op: UnOp::Pos, inner: length });
  st.expr(ExprData::BinOp { lhs: length, op: BinOp::Sub, rhs: offset })
}
