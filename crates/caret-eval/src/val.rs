//! Values, and the conversions between them that the host does implicitly.

use caret_expr::{Prim, Str, StrArena};
use rustc_hash::{FxHashMap, FxHashSet};

/// A value. Objects live in a [`Heap`] and are shared by reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Val {
  Prim(Prim),
  Object(ObjIdx),
}

impl Val {
  pub const UNDEFINED: Self = Val::Prim(Prim::Undefined);

  #[must_use]
  pub fn number(n: f64) -> Self {
    Val::Prim(Prim::Number(n))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjIdx(la_arena::Idx<Object>);

#[derive(Debug, Clone)]
pub enum Object {
  /// Elements are `None` where there is a hole. Arrays may also have named properties.
  Array { elems: Vec<Option<Val>>, props: FxHashMap<Str, Val> },
  Plain(FxHashMap<Str, Val>),
}

/// All the objects.
#[derive(Debug, Default)]
pub struct Heap(la_arena::Arena<Object>);

impl Heap {
  pub fn alloc(&mut self, obj: Object) -> ObjIdx {
    ObjIdx(self.0.alloc(obj))
  }

  pub fn array(&mut self, elems: Vec<Val>) -> ObjIdx {
    let elems = elems.into_iter().map(Some).collect();
    self.alloc(Object::Array { elems, props: FxHashMap::default() })
  }

  #[must_use]
  pub fn get(&self, idx: ObjIdx) -> &Object {
    &self.0[idx.0]
  }

  pub fn get_mut(&mut self, idx: ObjIdx) -> &mut Object {
    &mut self.0[idx.0]
  }
}

/// Returns the element index this key names, if it is a canonical array index.
pub(crate) fn array_idx(key: &str) -> Option<usize> {
  if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  if key.len() > 1 && key.starts_with('0') {
    return None;
  }
  let n = key.parse::<u32>().ok()?;
  // 2^32 - 1 is the largest length, so it is not an index.
  if n == u32::MAX {
    return None;
  }
  usize::try_from(n).ok()
}

pub(crate) fn truthy(ar: &StrArena, val: Val) -> bool {
  match val {
    Val::Prim(Prim::Undefined | Prim::Null) => false,
    Val::Prim(Prim::Bool(b)) => b,
    Val::Prim(Prim::Number(n)) => !(n == 0.0 || n.is_nan()),
    Val::Prim(Prim::String(s)) => !ar.get(s).is_empty(),
    Val::Object(_) => true,
  }
}

/// Ordinary number coercion.
#[must_use]
pub fn to_number(heap: &Heap, ar: &StrArena, val: Val) -> f64 {
  match val {
    Val::Prim(Prim::Undefined) => f64::NAN,
    Val::Prim(Prim::Null) => 0.0,
    Val::Prim(Prim::Bool(b)) => f64::from(u8::from(b)),
    Val::Prim(Prim::Number(n)) => n,
    Val::Prim(Prim::String(s)) => str_to_number(ar.get(s)),
    Val::Object(_) => str_to_number(&to_string(heap, ar, val)),
  }
}

fn str_to_number(s: &str) -> f64 {
  let s = s.trim();
  if s.is_empty() {
    return 0.0;
  }
  match s {
    "Infinity" | "+Infinity" => return f64::INFINITY,
    "-Infinity" => return f64::NEG_INFINITY,
    _ => {}
  }
  let radix = match s.get(..2) {
    Some("0x" | "0X") => Some(16),
    Some("0o" | "0O") => Some(8),
    Some("0b" | "0B") => Some(2),
    _ => None,
  };
  if let Some(radix) = radix {
    let digits = &s[2..];
    if digits.is_empty() {
      return f64::NAN;
    }
    let mut ret = 0.0f64;
    for c in digits.chars() {
      let Some(d) = c.to_digit(radix) else { return f64::NAN };
      ret = ret * f64::from(radix) + f64::from(d);
    }
    return ret;
  }
  // rust would also accept things like `inf` and `NaN`, which the host does not.
  let ok = s.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    && s.bytes().any(|b| b.is_ascii_digit());
  if !ok {
    return f64::NAN;
  }
  s.parse().unwrap_or(f64::NAN)
}

/// Ordinary string conversion.
#[must_use]
pub fn to_string(heap: &Heap, ar: &StrArena, val: Val) -> String {
  let mut buf = String::new();
  let mut seen = FxHashSet::<ObjIdx>::default();
  push_string(heap, ar, &mut seen, &mut buf, val);
  buf
}

fn push_string(
  heap: &Heap,
  ar: &StrArena,
  seen: &mut FxHashSet<ObjIdx>,
  buf: &mut String,
  val: Val,
) {
  match val {
    Val::Prim(Prim::Undefined) => buf.push_str("undefined"),
    Val::Prim(Prim::Null) => buf.push_str("null"),
    Val::Prim(Prim::Bool(b)) => buf.push_str(if b { "true" } else { "false" }),
    Val::Prim(Prim::Number(n)) => buf.push_str(&caret_expr::num::to_string(n)),
    Val::Prim(Prim::String(s)) => buf.push_str(ar.get(s)),
    Val::Object(idx) => match heap.get(idx) {
      Object::Array { elems, .. } => {
        // a cyclic array shows as empty where it recurs.
        if !seen.insert(idx) {
          return;
        }
        for (i, elem) in elems.iter().enumerate() {
          if i != 0 {
            buf.push(',');
          }
          match elem {
            None | Some(Val::Prim(Prim::Undefined | Prim::Null)) => {}
            Some(elem) => push_string(heap, ar, seen, buf, *elem),
          }
        }
        seen.remove(&idx);
      }
      Object::Plain(_) => buf.push_str("[object Object]"),
    },
  }
}

/// Ordinary key coercion for indexed access.
pub fn to_key(heap: &Heap, ar: &mut StrArena, val: Val) -> Str {
  match val {
    Val::Prim(Prim::String(s)) => s,
    _ => {
      let s = to_string(heap, ar, val);
      ar.str(&s)
    }
  }
}
