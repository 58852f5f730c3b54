//! Assigning with `e[^n] = v`.

use crate::check::{Input, t};
use serde_json::json;

#[test]
fn last() {
  let arr = vec![json!(1), json!(2), json!(3), json!(4)];
  let body = t::array(vec![t::assign(t::end(t::id("a"), json!(1)), json!(10)), t::id("a")]);
  Input::new(t::with_a(arr, body))
    .desugar("local a = [1, 2, 3, 4]; [(local $0 = a; $0[+$0.length - 1] = 10), a]")
    .rewrites(1)
    .manifest(json!([10, [1, 2, 3, 10]]))
    .trace("get length, set 3")
    .check();
}

#[test]
fn zero_appends() {
  let body = t::seq(vec![t::assign(t::end(t::id("a"), json!(0)), json!(4)), t::id("a")]);
  Input::new(t::with_a(vec![json!(1), json!(2), json!(3)], body))
    .manifest(json!([1, 2, 3, 4]))
    .check();
}

#[test]
fn val_from_binding() {
  let tree = t::local(
    vec![("a", t::array(vec![json!(1), json!(2), json!(3)])), ("x", json!(9))],
    t::seq(vec![t::assign(t::end(t::id("a"), json!(1)), t::id("x")), t::id("a")]),
  );
  Input::new(tree)
    .desugar(
      "local a = [1, 2, 3], x = 9; ((local $0 = a, $1 = x; $0[+$0.length - 1] = $1), a)",
    )
    .manifest(json!([1, 2, 9]))
    .check();
}

#[test]
fn offset_and_val_from_bindings() {
  let tree = t::local(
    vec![("a", t::array(vec![json!(1), json!(2), json!(3)])), ("n", json!(3)), ("x", json!(0))],
    t::seq(vec![t::assign(t::end(t::id("a"), t::id("n")), t::id("x")), t::id("a")]),
  );
  Input::new(tree)
    .desugar(
      "local a = [1, 2, 3], n = 3, x = 0; ((local $0 = a, $1 = n, $2 = x; $0[+$0.length - +$1] = $2), a)",
    )
    .manifest(json!([0, 2, 3]))
    .check();
}

/// The value is evaluated before `length` is read, so it sees the array it grew.
#[test]
fn val_changes_length() {
  let val = t::seq(vec![t::assign(t::sub(t::id("a"), json!(3)), json!(4)), json!(9)]);
  let body = t::array(vec![t::assign(t::end(t::id("a"), json!(1)), val), t::id("a")]);
  Input::new(t::with_a(vec![json!(1), json!(2), json!(3)], body))
    .desugar(
      "local a = [1, 2, 3]; [(local $0 = a, $1 = (a[3] = 4, 9); $0[+$0.length - 1] = $1), a]",
    )
    .manifest(json!([9, [1, 2, 3, 9]]))
    .trace("set 3, get length, set 3")
    .length_reads(1)
    .check();
}

#[test]
fn array_like_object() {
  let tree = t::local(
    vec![("o", t::object(vec![("length", json!(2))]))],
    t::array(vec![t::assign(t::end(t::id("o"), json!(1)), json!("y")), t::id("o")]),
  );
  Input::new(tree).manifest(json!(["y", { "length": 2, "1": "y" }])).check();
}

#[test]
fn string() {
  Input::new(t::assign(t::end(json!("abc"), json!(1)), json!(1)))
    .exec_err("cannot set property `2` on a primitive")
    .check();
}
