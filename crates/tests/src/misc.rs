//! Miscellaneous tests.
//!
//! If you're not sure where a test should go, put it here.

use crate::check::{Input, t};
use caret_expr::StrArena;
use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn no_sugar() {
  let last = t::sub(t::id("a"), t::bin("-", t::field(t::id("a"), "length"), json!(1)));
  Input::new(t::with_a(vec![json!(1), json!(2), json!(3)], last))
    .desugar("local a = [1, 2, 3]; a[a.length - 1]")
    .rewrites(0)
    .manifest(json!(3))
    .check();
}

#[test]
fn operands() {
  let sum = t::bin("+", t::end(t::id("a"), json!(1)), t::end(t::id("a"), json!(2)));
  Input::new(t::with_a(vec![json!(1), json!(2), json!(3)], sum))
    .desugar(
      "local a = [1, 2, 3]; (local $0 = a; $0[+$0.length - 1]) + (local $1 = a; $1[+$1.length - 2])",
    )
    .rewrites(2)
    .manifest(json!(5))
    .length_reads(2)
    .check();
}

#[test]
fn field_of_result() {
  let inner = t::array(vec![json!(1), json!(2), json!(3)]);
  Input::new(t::with_a(vec![inner], t::field(t::end(t::id("a"), json!(1)), "length")))
    .desugar("local a = [[1, 2, 3]]; (local $0 = a; $0[+$0.length - 1]).length")
    .manifest(json!(3))
    .length_reads(2)
    .check();
}

#[test]
fn object_field() {
  let obj = t::object(vec![("x", t::end(t::id("a"), json!(1))), ("y", json!(true))]);
  Input::new(t::with_a(vec![json!(1), json!(2)], obj))
    .desugar("local a = [1, 2]; { x: (local $0 = a; $0[+$0.length - 1]), y: true }")
    .manifest(json!({ "x": 2, "y": true }))
    .check();
}

#[test]
fn from_text() {
  let text = indoc! {r#"
    {
      "type": "Local",
      "binds": [["xs", ["a", "b", "c"]]],
      "body": {
        "type": "SubscriptEnd",
        "on": { "type": "Id", "name": "xs" },
        "offset": 2
      }
    }
  "#};
  // arrays are only written with `Array` nodes, so this is not a tree.
  let mut str_ar = StrArena::default();
  assert!(caret_tree::get_str(&mut str_ar, text).is_err());
  let text = text.replace(r#"["a", "b", "c"]"#, r#"{ "type": "Array", "elems": ["a", "b", "c"] }"#);
  let tree = match caret_tree::get_str(&mut str_ar, &text) {
    Ok(x) => x,
    Err(e) => panic!("tree error: {e}"),
  };
  let ds = caret_desugar::get(&mut str_ar, &tree.ar, Some(tree.top));
  assert!(ds.errors.is_empty());
  let got = caret_expr::display::expr(ds.top, &str_ar, &ds.ar).to_string();
  assert_eq!(r#"local xs = ["a", "b", "c"]; local $0 = xs; $0[+$0.length - 2]"#, got.as_str());
}

#[test]
fn in_local_binding() {
  let tree = t::local(
    vec![("a", t::array(vec![json!(1), json!(2), json!(3)])), ("b", t::end(t::id("a"), json!(1)))],
    t::bin("*", t::id("b"), json!(2)),
  );
  Input::new(tree)
    .desugar("local a = [1, 2, 3], b = (local $0 = a; $0[+$0.length - 1]); b * 2")
    .manifest(json!(6))
    .check();
}
