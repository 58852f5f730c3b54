//! Suggestions for misspelled node types.

/// Returns a suggestion from a table of names other parsers use for the same thing.
pub(crate) fn exact(s: &str) -> Option<&'static str> {
  let ret = match s {
    "Identifier" | "Ident" | "Var" => "Id",
    "Index" | "Member" | "Computed" => "Subscript",
    "IndexFromEnd" | "Hat" | "FromEnd" => "SubscriptEnd",
    "Let" | "Bind" => "Local",
    "Sequence" | "Comma" => "Seq",
    "Dot" | "Property" => "Field",
    "Assignment" => "Assign",
    "CompoundAssign" | "OpAssign" => "Update",
    "Incr" | "Decr" | "Increment" | "Decrement" => "Step",
    "BinOp" | "BinaryOp" => "Binary",
    "UnOp" | "UnaryOp" => "Unary",
    "List" => "Array",
    "Record" | "Dict" | "Map" => "Object",
    _ => return None,
  };
  Some(ret)
}

/// Returns the best suggestion from the candidates that passes a certain goodness threshold.
pub(crate) fn approx<'a, I>(target: &str, candidates: I) -> Option<String>
where
  I: Iterator<Item = &'a str>,
{
  if let Some(s) = exact(target) {
    return Some(s.to_owned());
  }
  candidates
    .filter_map(|c| {
      let n = strsim::normalized_damerau_levenshtein(target, c);
      // arbitrary-ish threshold
      (n > 0.6).then_some((n, c))
    })
    .max_by(|(a, _), (b, _)| a.total_cmp(b))
    .map(|(_, c)| c.to_owned())
}
