//! Executing expressions to produce values.

use crate::error::{Error, Kind, Result};
use crate::val::{self, Object, Val};
use crate::{Cx, Event};
use always::always;
use caret_expr::{
  BinOp, Expr, ExprArena, ExprData, ExprMust, Fix, Id, Place, Prim, Step, Str, UnOp, UpdateOp,
};
use rustc_hash::FxHashMap;

/// Arrays longer than this are refused, rather than allocating for every hole.
const MAX_ARRAY_LEN: usize = 1 << 24;

pub(crate) fn get(cx: &mut Cx<'_>, ar: &ExprArena, expr: Expr) -> Result<Val> {
  let Some(expr) = expr else { return Err(Error::NoExpr) };
  match &ar[expr] {
    ExprData::Prim(p) => Ok(Val::Prim(*p)),
    ExprData::Id(id) => match cx.lookup(*id) {
      Some(v) => Ok(v),
      None => Err(Error::Exec { expr, kind: Kind::NotInScope(*id) }),
    },
    ExprData::Array(elems) => {
      let mut vals = Vec::with_capacity(elems.len());
      for &elem in elems {
        vals.push(get(cx, ar, elem)?);
      }
      Ok(Val::Object(cx.heap.array(vals)))
    }
    ExprData::Object(fields) => {
      let mut props = FxHashMap::<Str, Val>::default();
      for &(key, val) in fields {
        let val = get(cx, ar, val)?;
        props.insert(key, val);
      }
      Ok(Val::Object(cx.heap.alloc(Object::Plain(props))))
    }
    ExprData::Local { binds, body } => {
      let mark = cx.env.len();
      let ret = get_local(cx, ar, binds, *body);
      cx.env.truncate(mark);
      ret
    }
    ExprData::Seq(es) => {
      let mut ret = Val::UNDEFINED;
      for &e in es {
        ret = get(cx, ar, e)?;
      }
      Ok(ret)
    }
    ExprData::Field { on, name } => {
      let on = get(cx, ar, *on)?;
      get_prop(cx, expr, on, *name)
    }
    ExprData::Subscript { on, idx } => {
      let on = get(cx, ar, *on)?;
      let idx = get(cx, ar, *idx)?;
      let key = val::to_key(&cx.heap, cx.str_ar, idx);
      get_prop(cx, expr, on, key)
    }
    ExprData::SubscriptEnd { .. } => Err(Error::Exec { expr, kind: Kind::Sugar }),
    ExprData::Assign { place, val } => match *place {
      Place::Id(id) => {
        let val = get(cx, ar, *val)?;
        cx.assign(expr, id, val)?;
        Ok(val)
      }
      Place::Subscript { on, idx } => {
        let on = get(cx, ar, on)?;
        let idx = get(cx, ar, idx)?;
        let key = val::to_key(&cx.heap, cx.str_ar, idx);
        let val = get(cx, ar, *val)?;
        set_prop(cx, expr, on, key, val)?;
        Ok(val)
      }
      Place::SubscriptEnd { .. } => Err(Error::Exec { expr, kind: Kind::Sugar }),
    },
    ExprData::Update { place, op } => match *place {
      Place::Id(id) => {
        let Some(old) = cx.lookup(id) else {
          return Err(Error::Exec { expr, kind: Kind::NotInScope(id) });
        };
        let (new, ret) = get_update(cx, ar, old, *op)?;
        cx.assign(expr, id, new)?;
        Ok(ret)
      }
      Place::Subscript { on, idx } => {
        let on = get(cx, ar, on)?;
        let idx = get(cx, ar, idx)?;
        // the key is computed once, and used for both the fetch and the store.
        let key = val::to_key(&cx.heap, cx.str_ar, idx);
        let old = get_prop(cx, expr, on, key)?;
        let (new, ret) = get_update(cx, ar, old, *op)?;
        set_prop(cx, expr, on, key, new)?;
        Ok(ret)
      }
      Place::SubscriptEnd { .. } => Err(Error::Exec { expr, kind: Kind::Sugar }),
    },
    ExprData::BinOp { lhs, op, rhs } => {
      let lhs = get(cx, ar, *lhs)?;
      let rhs = get(cx, ar, *rhs)?;
      Ok(bin_op(cx, lhs, *op, rhs))
    }
    ExprData::UnOp { op, inner } => {
      let inner = get(cx, ar, *inner)?;
      let ret = match op {
        UnOp::Neg => Val::number(-val::to_number(&cx.heap, cx.str_ar, inner)),
        UnOp::Pos => Val::number(val::to_number(&cx.heap, cx.str_ar, inner)),
        UnOp::LogicalNot => Val::Prim(Prim::Bool(!val::truthy(cx.str_ar, inner))),
      };
      Ok(ret)
    }
  }
}

fn get_local(cx: &mut Cx<'_>, ar: &ExprArena, binds: &[(Id, Expr)], body: Expr) -> Result<Val> {
  for &(id, rhs) in binds {
    let val = get(cx, ar, rhs)?;
    cx.env.push((id, val));
  }
  get(cx, ar, body)
}

/// Returns the new value to store and the value of the whole update expression.
fn get_update(cx: &mut Cx<'_>, ar: &ExprArena, old: Val, op: UpdateOp) -> Result<(Val, Val)> {
  match op {
    UpdateOp::Compound(op, rhs) => {
      always!(op.is_arithmetic(), "non-arithmetic compound op: {op}");
      let rhs = get(cx, ar, rhs)?;
      let new = bin_op(cx, old, op, rhs);
      Ok((new, new))
    }
    UpdateOp::Step(step, fix) => {
      let old = val::to_number(&cx.heap, cx.str_ar, old);
      let new = match step {
        Step::Incr => old + 1.0,
        Step::Decr => old - 1.0,
      };
      let ret = match fix {
        Fix::Prefix => new,
        Fix::Postfix => old,
      };
      Ok((Val::number(new), Val::number(ret)))
    }
  }
}

fn get_prop(cx: &mut Cx<'_>, expr: ExprMust, on: Val, key: Str) -> Result<Val> {
  cx.trace.push(Event::Get(key));
  let ret = match on {
    Val::Prim(Prim::Undefined) => {
      return Err(Error::Exec { expr, kind: Kind::GetOfNullish { key, null: false } });
    }
    Val::Prim(Prim::Null) => {
      return Err(Error::Exec { expr, kind: Kind::GetOfNullish { key, null: true } });
    }
    Val::Prim(Prim::String(s)) => {
      let s = cx.str_ar.get(s);
      if key == Str::LENGTH {
        Val::number(usize_to_f64(s.chars().count()))
      } else if let Some(c) = val::array_idx(cx.str_ar.get(key)).and_then(|i| s.chars().nth(i)) {
        let mut buf = [0u8; 4];
        let c = c.encode_utf8(&mut buf);
        Val::Prim(Prim::String(cx.str_ar.str(c)))
      } else {
        Val::UNDEFINED
      }
    }
    Val::Prim(Prim::Bool(_) | Prim::Number(_)) => Val::UNDEFINED,
    Val::Object(idx) => match cx.heap.get(idx) {
      Object::Array { elems, props } => {
        if key == Str::LENGTH {
          Val::number(usize_to_f64(elems.len()))
        } else if let Some(i) = val::array_idx(cx.str_ar.get(key)) {
          elems.get(i).copied().flatten().unwrap_or(Val::UNDEFINED)
        } else {
          props.get(&key).copied().unwrap_or(Val::UNDEFINED)
        }
      }
      Object::Plain(props) => props.get(&key).copied().unwrap_or(Val::UNDEFINED),
    },
  };
  Ok(ret)
}

fn set_prop(cx: &mut Cx<'_>, expr: ExprMust, on: Val, key: Str, val: Val) -> Result<()> {
  cx.trace.push(Event::Set(key));
  let Val::Object(idx) = on else {
    return Err(Error::Exec { expr, kind: Kind::SetOnPrim(key) });
  };
  // writing `length` only means something special for arrays.
  let is_array = matches!(cx.heap.get(idx), Object::Array { .. });
  let new_len = if is_array && key == Str::LENGTH {
    let n = val::to_number(&cx.heap, cx.str_ar, val);
    Some(array_len(n).ok_or(Error::Exec { expr, kind: Kind::InvalidArrayLength })?)
  } else {
    None
  };
  let elem_idx = val::array_idx(cx.str_ar.get(key));
  match cx.heap.get_mut(idx) {
    Object::Array { elems, props } => {
      if let Some(n) = new_len {
        if n > MAX_ARRAY_LEN {
          return Err(Error::Exec { expr, kind: Kind::ArrayTooLarge });
        }
        elems.resize(n, None);
      } else if let Some(i) = elem_idx {
        if i >= MAX_ARRAY_LEN {
          return Err(Error::Exec { expr, kind: Kind::ArrayTooLarge });
        }
        if i >= elems.len() {
          elems.resize(i + 1, None);
        }
        elems[i] = Some(val);
      } else {
        props.insert(key, val);
      }
    }
    Object::Plain(props) => {
      props.insert(key, val);
    }
  }
  Ok(())
}

/// Returns the length this number denotes, if it is a valid array length.
fn array_len(n: f64) -> Option<usize> {
  if n.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&n) {
    return None;
  }
  #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
  let n = n as u32;
  usize::try_from(n).ok()
}

#[expect(clippy::cast_precision_loss)]
fn usize_to_f64(n: usize) -> f64 {
  n as f64
}

fn bin_op(cx: &mut Cx<'_>, lhs: Val, op: BinOp, rhs: Val) -> Val {
  match op {
    BinOp::Add => {
      let is_str = |v: Val| matches!(v, Val::Prim(Prim::String(_)) | Val::Object(_));
      if is_str(lhs) || is_str(rhs) {
        let mut s = val::to_string(&cx.heap, cx.str_ar, lhs);
        s.push_str(&val::to_string(&cx.heap, cx.str_ar, rhs));
        return Val::Prim(Prim::String(cx.str_ar.str(&s)));
      }
      let [a, b] = numbers(cx, lhs, rhs);
      Val::number(a + b)
    }
    BinOp::Sub => {
      let [a, b] = numbers(cx, lhs, rhs);
      Val::number(a - b)
    }
    BinOp::Mul => {
      let [a, b] = numbers(cx, lhs, rhs);
      Val::number(a * b)
    }
    BinOp::Div => {
      let [a, b] = numbers(cx, lhs, rhs);
      Val::number(a / b)
    }
    BinOp::Rem => {
      let [a, b] = numbers(cx, lhs, rhs);
      Val::number(a % b)
    }
    BinOp::Eq => Val::Prim(Prim::Bool(strict_eq(cx, lhs, rhs))),
    BinOp::NotEq => Val::Prim(Prim::Bool(!strict_eq(cx, lhs, rhs))),
    BinOp::Lt => cmp(cx, lhs, rhs, std::cmp::Ordering::is_lt),
    BinOp::LtEq => cmp(cx, lhs, rhs, std::cmp::Ordering::is_le),
    BinOp::Gt => cmp(cx, lhs, rhs, std::cmp::Ordering::is_gt),
    BinOp::GtEq => cmp(cx, lhs, rhs, std::cmp::Ordering::is_ge),
  }
}

fn numbers(cx: &Cx<'_>, lhs: Val, rhs: Val) -> [f64; 2] {
  [lhs, rhs].map(|v| val::to_number(&cx.heap, cx.str_ar, v))
}

fn strict_eq(cx: &Cx<'_>, lhs: Val, rhs: Val) -> bool {
  match (lhs, rhs) {
    (Val::Prim(Prim::String(a)), Val::Prim(Prim::String(b))) => {
      cx.str_ar.get(a) == cx.str_ar.get(b)
    }
    // `==` on floats is what we want: NaN is unequal to itself, and the zeros are equal.
    (Val::Prim(Prim::Number(a)), Val::Prim(Prim::Number(b))) => a == b,
    (Val::Object(a), Val::Object(b)) => a == b,
    (Val::Prim(a), Val::Prim(b)) => a == b,
    _ => false,
  }
}

/// Strings compare by contents, everything else as numbers. Comparisons with NaN are false.
fn cmp<F>(cx: &Cx<'_>, lhs: Val, rhs: Val, f: F) -> Val
where
  F: FnOnce(std::cmp::Ordering) -> bool,
{
  let ord = match (lhs, rhs) {
    (Val::Prim(Prim::String(a)), Val::Prim(Prim::String(b))) => {
      Some(cx.str_ar.get(a).cmp(cx.str_ar.get(b)))
    }
    _ => {
      let [a, b] = numbers(cx, lhs, rhs);
      a.partial_cmp(&b)
    }
  };
  Val::Prim(Prim::Bool(ord.is_some_and(f)))
}
