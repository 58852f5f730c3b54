//! Reading expression trees, as produced by a parser, from JSON.
//!
//! JSON `null`, booleans, numbers and strings are literals. Everything else is an object with a
//! `"type"`, like
//!
//! ```json
//! { "type": "SubscriptEnd", "on": { "type": "Id", "name": "a" }, "offset": 1 }
//! ```
//!
//! A child that is absent from its object is a missing sub-tree. That is not an error here: it is
//! left for later passes to report, since only they know whether it matters.

mod error;
mod suggestion;

pub use error::Error;

use caret_expr::{
  BinOp, Expr, ExprArena, ExprData, ExprMust, Fix, Place, Prim, Step, StrArena, UnOp, UpdateOp,
};
use error::Kind;
use serde_json::{Map, Value};

/// The result of reading a tree.
#[derive(Debug)]
pub struct Tree {
  /// The expressions.
  pub ar: ExprArena,
  /// The top expression.
  pub top: ExprMust,
}

/// Reads the tree from JSON text.
///
/// # Errors
///
/// If the text was not JSON, or the JSON was not a tree.
pub fn get_str(str_ar: &mut StrArena, contents: &str) -> Result<Tree, Error> {
  let json: Value = serde_json::from_str(contents)
    .map_err(|e| Error { path: String::new(), kind: Kind::Json(e.to_string()) })?;
  get(str_ar, &json)
}

/// Reads the tree from JSON.
///
/// # Errors
///
/// If the JSON was not a tree.
pub fn get(str_ar: &mut StrArena, json: &Value) -> Result<Tree, Error> {
  let mut st = St { str_ar, ar: ExprArena::default() };
  let top = get_expr(&mut st, "", json)?;
  Ok(Tree { ar: st.ar, top })
}

/// Every value of `"type"` we know.
const TYPES: [&str; 14] = [
  "Undefined",
  "Id",
  "Array",
  "Object",
  "Local",
  "Seq",
  "Field",
  "Subscript",
  "SubscriptEnd",
  "Assign",
  "Update",
  "Step",
  "Binary",
  "Unary",
];

struct St<'a> {
  str_ar: &'a mut StrArena,
  ar: ExprArena,
}

fn err<T>(path: &str, kind: Kind) -> Result<T, Error> {
  Err(Error { path: path.to_owned(), kind })
}

fn get_expr(st: &mut St<'_>, path: &str, json: &Value) -> Result<ExprMust, Error> {
  let data = match json {
    Value::Null => ExprData::Prim(Prim::Null),
    Value::Bool(b) => ExprData::Prim(Prim::Bool(*b)),
    Value::Number(n) => match n.as_f64() {
      Some(n) => ExprData::Prim(Prim::Number(n)),
      None => return err(path, Kind::Number),
    },
    Value::String(s) => ExprData::Prim(Prim::String(st.str_ar.str(s))),
    Value::Array(_) => return err(path, Kind::Expected("an expression, not an array")),
    Value::Object(obj) => get_node(st, path, obj)?,
  };
  Ok(st.ar.alloc(data))
}

fn get_node(st: &mut St<'_>, path: &str, obj: &Map<String, Value>) -> Result<ExprData, Error> {
  let ty = match obj.get("type") {
    Some(Value::String(ty)) => ty.as_str(),
    Some(_) => return err(&format!("{path}/type"), Kind::Expected("a string")),
    None => return err(path, Kind::NoType),
  };
  let ret = match ty {
    "Undefined" => ExprData::Prim(Prim::Undefined),
    "Id" => ExprData::Id(get_id(st, path, obj, "name")?),
    "Array" => ExprData::Array(get_list(st, path, obj, "elems")?),
    "Object" => {
      let fields = get_named(st, path, obj, "fields")?;
      ExprData::Object(fields.into_iter().map(|(key, val)| (st.str_ar.str(key), val)).collect())
    }
    "Local" => {
      let binds = get_named(st, path, obj, "binds")?;
      let binds = binds.into_iter().map(|(name, rhs)| (st.str_ar.id(name), rhs)).collect();
      ExprData::Local { binds, body: get_child(st, path, obj, "body")? }
    }
    "Seq" => ExprData::Seq(get_list(st, path, obj, "exprs")?),
    "Field" => {
      let on = get_child(st, path, obj, "on")?;
      let name = match obj.get("name") {
        Some(Value::String(name)) => st.str_ar.str(name),
        Some(_) => return err(&format!("{path}/name"), Kind::Expected("a string")),
        None => return err(path, Kind::NoKey("name")),
      };
      ExprData::Field { on, name }
    }
    "Subscript" => ExprData::Subscript {
      on: get_child(st, path, obj, "on")?,
      idx: get_child(st, path, obj, "idx")?,
    },
    "SubscriptEnd" => ExprData::SubscriptEnd {
      on: get_child(st, path, obj, "on")?,
      offset: get_child(st, path, obj, "offset")?,
    },
    "Assign" => {
      let place = get_place(st, path, obj)?;
      ExprData::Assign { place, val: get_child(st, path, obj, "val")? }
    }
    "Update" => {
      let place = get_place(st, path, obj)?;
      let op = match get_op_str(path, obj)?.strip_suffix('=').and_then(bin_op) {
        Some(op) if op.is_arithmetic() => op,
        _ => return err(&format!("{path}/op"), Kind::Op),
      };
      let val = get_child(st, path, obj, "val")?;
      ExprData::Update { place, op: UpdateOp::Compound(op, val) }
    }
    "Step" => {
      let place = get_place(st, path, obj)?;
      let step = match get_op_str(path, obj)? {
        "++" => Step::Incr,
        "--" => Step::Decr,
        _ => return err(&format!("{path}/op"), Kind::Op),
      };
      let fix = match obj.get("prefix") {
        Some(Value::Bool(true)) => Fix::Prefix,
        Some(Value::Bool(false)) => Fix::Postfix,
        Some(_) => return err(&format!("{path}/prefix"), Kind::Expected("a boolean")),
        None => return err(path, Kind::NoKey("prefix")),
      };
      ExprData::Update { place, op: UpdateOp::Step(step, fix) }
    }
    "Binary" => {
      let Some(op) = bin_op(get_op_str(path, obj)?) else {
        return err(&format!("{path}/op"), Kind::Op);
      };
      let lhs = get_child(st, path, obj, "lhs")?;
      let rhs = get_child(st, path, obj, "rhs")?;
      ExprData::BinOp { lhs, op, rhs }
    }
    "Unary" => {
      let op = match get_op_str(path, obj)? {
        "-" => UnOp::Neg,
        "+" => UnOp::Pos,
        "!" => UnOp::LogicalNot,
        _ => return err(&format!("{path}/op"), Kind::Op),
      };
      ExprData::UnOp { op, inner: get_child(st, path, obj, "inner")? }
    }
    _ => {
      let suggest = suggestion::approx(ty, TYPES.into_iter());
      return err(&format!("{path}/type"), Kind::UnknownType(ty.to_owned(), suggest));
    }
  };
  Ok(ret)
}

/// Returns `None` if the key is absent.
fn get_child(
  st: &mut St<'_>,
  path: &str,
  obj: &Map<String, Value>,
  key: &str,
) -> Result<Expr, Error> {
  match obj.get(key) {
    None => Ok(None),
    Some(json) => get_expr(st, &format!("{path}/{key}"), json).map(Some),
  }
}

fn get_list(
  st: &mut St<'_>,
  path: &str,
  obj: &Map<String, Value>,
  key: &str,
) -> Result<Vec<Expr>, Error> {
  let path = format!("{path}/{key}");
  let Some(json) = obj.get(key) else { return Ok(Vec::new()) };
  let Value::Array(elems) = json else { return err(&path, Kind::Expected("an array")) };
  let mut ret = Vec::with_capacity(elems.len());
  for (i, elem) in elems.iter().enumerate() {
    ret.push(Some(get_expr(st, &format!("{path}/{i}"), elem)?));
  }
  Ok(ret)
}

/// Returns the `[name, expr]` pairs under `key`.
fn get_named<'a>(
  st: &mut St<'_>,
  path: &str,
  obj: &'a Map<String, Value>,
  key: &str,
) -> Result<Vec<(&'a str, Expr)>, Error> {
  let path = format!("{path}/{key}");
  let Some(json) = obj.get(key) else { return Ok(Vec::new()) };
  let Value::Array(elems) = json else { return err(&path, Kind::Expected("an array")) };
  let mut ret = Vec::with_capacity(elems.len());
  for (i, elem) in elems.iter().enumerate() {
    let pair_path = format!("{path}/{i}");
    let Value::Array(pair) = elem else { return err(&pair_path, Kind::Expected("a pair")) };
    let [name, val] = pair.as_slice() else {
      return err(&pair_path, Kind::Expected("a pair"));
    };
    let Value::String(name) = name else {
      return err(&format!("{pair_path}/0"), Kind::Expected("a string"));
    };
    let val = get_expr(st, &format!("{pair_path}/1"), val)?;
    ret.push((name.as_str(), Some(val)));
  }
  Ok(ret)
}

fn get_id(
  st: &mut St<'_>,
  path: &str,
  obj: &Map<String, Value>,
  key: &'static str,
) -> Result<caret_expr::Id, Error> {
  match obj.get(key) {
    Some(Value::String(name)) => Ok(st.str_ar.id(name)),
    Some(_) => err(&format!("{path}/{key}"), Kind::Expected("a string")),
    None => err(path, Kind::NoKey(key)),
  }
}

fn get_op_str<'a>(path: &str, obj: &'a Map<String, Value>) -> Result<&'a str, Error> {
  match obj.get("op") {
    Some(Value::String(op)) => Ok(op.as_str()),
    Some(_) => err(&format!("{path}/op"), Kind::Expected("a string")),
    None => err(path, Kind::NoKey("op")),
  }
}

fn get_place(st: &mut St<'_>, path: &str, obj: &Map<String, Value>) -> Result<Place, Error> {
  let path = format!("{path}/place");
  let Some(json) = obj.get("place") else { return err(&path, Kind::NoKey("place")) };
  let Value::Object(place) = json else { return err(&path, Kind::Place) };
  let ret = match place.get("type").and_then(Value::as_str) {
    Some("Id") => Place::Id(get_id(st, &path, place, "name")?),
    Some("Subscript") => Place::Subscript {
      on: get_child(st, &path, place, "on")?,
      idx: get_child(st, &path, place, "idx")?,
    },
    Some("SubscriptEnd") => Place::SubscriptEnd {
      on: get_child(st, &path, place, "on")?,
      offset: get_child(st, &path, place, "offset")?,
    },
    _ => return err(&path, Kind::Place),
  };
  Ok(ret)
}

fn bin_op(s: &str) -> Option<BinOp> {
  let ret = match s {
    "+" => BinOp::Add,
    "-" => BinOp::Sub,
    "*" => BinOp::Mul,
    "/" => BinOp::Div,
    "%" => BinOp::Rem,
    "==" => BinOp::Eq,
    "!=" => BinOp::NotEq,
    "<" => BinOp::Lt,
    "<=" => BinOp::LtEq,
    ">" => BinOp::Gt,
    ">=" => BinOp::GtEq,
    _ => return None,
  };
  Some(ret)
}
