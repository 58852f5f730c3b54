//! Every part of the access is evaluated exactly once, in order.

use crate::check::{Input, t};
use serde_json::{Value, json};

/// `local a = [1, 2, 3], ce = 0, cn = 0, cv = 0; body`
fn counters(body: Value) -> Value {
  t::local(
    vec![
      ("a", t::array(vec![json!(1), json!(2), json!(3)])),
      ("ce", json!(0)),
      ("cn", json!(0)),
      ("cv", json!(0)),
    ],
    body,
  )
}

/// `(ce = ce + 1, a)[^(cn = cn + 1, 1)]`
fn counted_end() -> Value {
  t::end(t::counted("ce", t::id("a")), t::counted("cn", json!(1)))
}

/// `(log[log.length] = s, then)`
fn logged(s: &str, then: Value) -> Value {
  let log = t::id("log");
  let push = t::assign(t::sub(log.clone(), t::field(log, "length")), json!(s));
  t::seq(vec![push, then])
}

#[test]
fn read() {
  let body = t::array(vec![counted_end(), t::id("ce"), t::id("cn")]);
  Input::new(counters(body)).manifest(json!([3, 1, 1])).length_reads(1).check();
}

#[test]
fn write() {
  let assign = t::assign(counted_end(), t::counted("cv", json!(9)));
  let body = t::array(vec![assign, t::id("ce"), t::id("cn"), t::id("cv"), t::id("a")]);
  Input::new(counters(body)).manifest(json!([9, 1, 1, 1, [1, 2, 9]])).length_reads(1).check();
}

#[test]
fn compound() {
  let update = t::update(counted_end(), "+=", t::counted("cv", json!(1)));
  let body = t::array(vec![update, t::id("ce"), t::id("cn"), t::id("cv"), t::id("a")]);
  Input::new(counters(body)).manifest(json!([4, 1, 1, 1, [1, 2, 4]])).length_reads(1).check();
}

#[test]
fn step() {
  let step = t::step(counted_end(), "--", false);
  let body = t::array(vec![step, t::id("ce"), t::id("cn"), t::id("a")]);
  Input::new(counters(body)).manifest(json!([3, 1, 1, [1, 2, 2]])).length_reads(1).check();
}

#[test]
fn order() {
  let end = t::end(logged("E", t::id("a")), logged("N", json!(1)));
  let assign = t::assign(end, logged("V", json!(0)));
  let tree = t::local(
    vec![("a", t::array(vec![json!(1), json!(2)])), ("log", t::array(vec![]))],
    t::seq(vec![assign, t::array(vec![t::id("log"), t::id("a")])]),
  );
  Input::new(tree).manifest(json!([["E", "N", "V"], [1, 0]])).check();
}
