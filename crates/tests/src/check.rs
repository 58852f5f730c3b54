//! Helpers for building trees and checking what becomes of them.
//!
//! Trees are written as the JSON a parser would emit, with the constructors in [`t`].

use caret_expr::{Str, StrArena, display};
use pretty_assertions::assert_eq;

/// An input tree and the expectations about it.
#[derive(Debug)]
pub(crate) struct Input {
  tree: serde_json::Value,
  desugar: Option<&'static str>,
  rewrites: Option<usize>,
  outcome: Option<Outcome>,
  trace: Option<&'static str>,
  length_reads: Option<usize>,
}

#[derive(Debug)]
enum Outcome {
  Manifest(serde_json::Value),
  ExecErr(&'static str),
}

impl Input {
  pub(crate) fn new(tree: serde_json::Value) -> Self {
    Self {
      tree,
      desugar: None,
      rewrites: None,
      outcome: None,
      trace: None,
      length_reads: None,
    }
  }

  /// The desugared output should display as `want`.
  pub(crate) fn desugar(mut self, want: &'static str) -> Self {
    self.desugar = Some(want);
    self
  }

  /// This many accesses should be rewritten.
  pub(crate) fn rewrites(mut self, n: usize) -> Self {
    self.rewrites = Some(n);
    self
  }

  /// The desugared output should execute and manifest to `want`.
  pub(crate) fn manifest(mut self, want: serde_json::Value) -> Self {
    self.outcome = Some(Outcome::Manifest(want));
    self
  }

  /// The desugared output should fail to execute with the message `want`.
  pub(crate) fn exec_err(mut self, want: &'static str) -> Self {
    self.outcome = Some(Outcome::ExecErr(want));
    self
  }

  /// Executing should access properties exactly like `want`, e.g. `get length, get 2`.
  pub(crate) fn trace(mut self, want: &'static str) -> Self {
    self.trace = Some(want);
    self
  }

  /// Executing should read `length` exactly `n` times.
  pub(crate) fn length_reads(mut self, n: usize) -> Self {
    self.length_reads = Some(n);
    self
  }

  /// Runs the checks. Also checks that desugaring the output again changes nothing.
  pub(crate) fn check(self) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut str_ar = StrArena::default();
    let tree = match caret_tree::get(&mut str_ar, &self.tree) {
      Ok(x) => x,
      Err(e) => panic!("tree error: {e}"),
    };
    let ds = caret_desugar::get(&mut str_ar, &tree.ar, Some(tree.top));
    if let Some(e) = ds.errors.first() {
      panic!("desugar error: {e}");
    }
    assert!(caret_expr::sugar_free(&ds.ar, ds.top), "sugar left in output");
    let got = display::expr(ds.top, &str_ar, &ds.ar).to_string();
    let again = caret_desugar::get(&mut str_ar, &ds.ar, ds.top);
    assert!(again.errors.is_empty(), "errors when desugaring again");
    assert_eq!(0, again.count, "rewrote when desugaring again");
    assert_eq!(got, display::expr(again.top, &str_ar, &again.ar).to_string());
    if let Some(want) = self.desugar {
      assert_eq!(want, got.as_str());
    }
    if let Some(want) = self.rewrites {
      assert_eq!(want, ds.count);
    }
    if self.outcome.is_none() && self.trace.is_none() && self.length_reads.is_none() {
      return;
    }
    let mut cx = caret_eval::Cx::new(&mut str_ar);
    let val = caret_eval::get_exec(&mut cx, &ds.ar, ds.top);
    match (self.outcome, val) {
      (Some(Outcome::ExecErr(want)), Ok(_)) => panic!("no error, want: {want}"),
      (Some(Outcome::ExecErr(want)), Err(e)) => {
        let got = e.display(cx.str_ar).to_string();
        assert_eq!(want, got.as_str());
      }
      (_, Err(e)) => panic!("exec error: {}", e.display(cx.str_ar)),
      (outcome, Ok(val)) => {
        let got = match caret_eval::get_manifest(&cx, val) {
          Ok(x) => x,
          Err(e) => panic!("manifest error: {}", e.display(cx.str_ar)),
        };
        if let Some(Outcome::Manifest(want)) = outcome {
          assert_eq!(want, got);
        }
      }
    }
    if let Some(want) = self.trace {
      assert_eq!(want, cx.trace.display(cx.str_ar).to_string().as_str());
    }
    if let Some(want) = self.length_reads {
      assert_eq!(want, cx.trace.gets(Str::LENGTH), "length reads");
    }
  }
}

/// Tests that desugaring fails with exactly the messages `want`.
pub(crate) fn desugar_err(tree: &serde_json::Value, want: &[&str]) {
  let mut str_ar = StrArena::default();
  let tree = match caret_tree::get(&mut str_ar, tree) {
    Ok(x) => x,
    Err(e) => panic!("tree error: {e}"),
  };
  let ds = caret_desugar::get(&mut str_ar, &tree.ar, Some(tree.top));
  let got: Vec<_> = ds.errors.iter().map(ToString::to_string).collect();
  assert_eq!(want, got.as_slice());
}

/// Tests that reading the tree from `json` fails with the message `want`.
pub(crate) fn tree_err(json: &str, want: &str) {
  let mut str_ar = StrArena::default();
  let Err(e) = caret_tree::get_str(&mut str_ar, json) else { panic!("no error, want: {want}") };
  assert_eq!(want, e.to_string().as_str());
}

/// Tests that executing the tree without desugaring fails with the message `want`.
pub(crate) fn exec_raw_err(tree: &serde_json::Value, want: &str) {
  let mut str_ar = StrArena::default();
  let tree = match caret_tree::get(&mut str_ar, tree) {
    Ok(x) => x,
    Err(e) => panic!("tree error: {e}"),
  };
  let mut cx = caret_eval::Cx::new(&mut str_ar);
  let Err(e) = caret_eval::get_exec(&mut cx, &tree.ar, Some(tree.top)) else {
    panic!("no error, want: {want}")
  };
  assert_eq!(want, e.display(cx.str_ar).to_string().as_str());
}

/// Constructors for trees.
pub(crate) mod t {
  use serde_json::{Value, json};

  pub(crate) fn undefined() -> Value {
    json!({ "type": "Undefined" })
  }

  pub(crate) fn id(name: &str) -> Value {
    json!({ "type": "Id", "name": name })
  }

  pub(crate) fn array(elems: Vec<Value>) -> Value {
    json!({ "type": "Array", "elems": elems })
  }

  pub(crate) fn object(fields: Vec<(&str, Value)>) -> Value {
    let fields: Vec<_> = fields.into_iter().map(|(k, v)| json!([k, v])).collect();
    json!({ "type": "Object", "fields": fields })
  }

  pub(crate) fn local(binds: Vec<(&str, Value)>, body: Value) -> Value {
    let binds: Vec<_> = binds.into_iter().map(|(k, v)| json!([k, v])).collect();
    json!({ "type": "Local", "binds": binds, "body": body })
  }

  pub(crate) fn seq(exprs: Vec<Value>) -> Value {
    json!({ "type": "Seq", "exprs": exprs })
  }

  pub(crate) fn field(on: Value, name: &str) -> Value {
    json!({ "type": "Field", "on": on, "name": name })
  }

  pub(crate) fn sub(on: Value, idx: Value) -> Value {
    json!({ "type": "Subscript", "on": on, "idx": idx })
  }

  pub(crate) fn end(on: Value, offset: Value) -> Value {
    json!({ "type": "SubscriptEnd", "on": on, "offset": offset })
  }

  pub(crate) fn assign(place: Value, val: Value) -> Value {
    json!({ "type": "Assign", "place": place, "val": val })
  }

  pub(crate) fn update(place: Value, op: &str, val: Value) -> Value {
    json!({ "type": "Update", "place": place, "op": op, "val": val })
  }

  pub(crate) fn step(place: Value, op: &str, prefix: bool) -> Value {
    json!({ "type": "Step", "place": place, "op": op, "prefix": prefix })
  }

  pub(crate) fn bin(op: &str, lhs: Value, rhs: Value) -> Value {
    json!({ "type": "Binary", "op": op, "lhs": lhs, "rhs": rhs })
  }

  pub(crate) fn un(op: &str, inner: Value) -> Value {
    json!({ "type": "Unary", "op": op, "inner": inner })
  }

  /// `(name = name + 1, then)`, to count how many times this was evaluated.
  pub(crate) fn counted(name: &str, then: Value) -> Value {
    seq(vec![assign(id(name), bin("+", id(name), json!(1))), then])
  }

  /// `local a = [elems...]; body`
  pub(crate) fn with_a(elems: Vec<Value>, body: Value) -> Value {
    local(vec![("a", array(elems))], body)
  }
}
