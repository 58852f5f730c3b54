//! Manifesting values into JSON.

use crate::Cx;
use crate::error::{Error, Result};
use crate::val::{Object, ObjIdx, Val};
use caret_expr::Prim;
use rustc_hash::FxHashSet;

pub(crate) fn get(cx: &Cx<'_>, v: Val) -> Result<serde_json::Value> {
  let mut seen = FxHashSet::<ObjIdx>::default();
  get_(cx, &mut seen, v)
}

fn get_(cx: &Cx<'_>, seen: &mut FxHashSet<ObjIdx>, v: Val) -> Result<serde_json::Value> {
  let ret = match v {
    Val::Prim(prim) => prim_to_json(cx, prim),
    Val::Object(idx) => {
      if !seen.insert(idx) {
        return Err(Error::ManifestCycle);
      }
      let ret = match cx.heap.get(idx) {
        // holes, like `undefined`, become `null`. named props on arrays are not shown.
        Object::Array { elems, .. } => {
          let mut arr = Vec::with_capacity(elems.len());
          for elem in elems {
            let elem = match elem {
              None => serde_json::Value::Null,
              Some(elem) => get_(cx, seen, *elem)?,
            };
            arr.push(elem);
          }
          serde_json::Value::Array(arr)
        }
        Object::Plain(props) => {
          let mut map = serde_json::Map::new();
          for (&key, &val) in props {
            if val == Val::UNDEFINED {
              continue;
            }
            map.insert(cx.str_ar.get(key).to_owned(), get_(cx, seen, val)?);
          }
          serde_json::Value::Object(map)
        }
      };
      seen.remove(&idx);
      ret
    }
  };
  Ok(ret)
}

fn prim_to_json(cx: &Cx<'_>, prim: Prim) -> serde_json::Value {
  match prim {
    Prim::Undefined | Prim::Null => serde_json::Value::Null,
    Prim::Bool(b) => serde_json::Value::Bool(b),
    Prim::Number(n) => number_to_json(n),
    Prim::String(s) => serde_json::Value::String(cx.str_ar.get(s).to_owned()),
  }
}

/// Integers become JSON integers, so that `4` manifests as `4` and not `4.0`. Non-finite numbers
/// become `null`.
fn number_to_json(n: f64) -> serde_json::Value {
  if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
    #[expect(clippy::cast_possible_truncation)]
    let int = n as i64;
    return serde_json::Value::from(int);
  }
  serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}
