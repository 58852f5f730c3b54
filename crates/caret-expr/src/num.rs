//! Numbers as the host language spells them.

/// Converts the number to a string the way the host does, which is also how a number becomes a
/// property key.
///
/// Both zeros are `"0"`. Integers have no fractional part. Very large and very small magnitudes
/// use exponent form with an explicit exponent sign, as in `1e+21` and `1.5e-7`.
#[must_use]
pub fn to_string(n: f64) -> String {
  if n.is_nan() {
    return "NaN".to_owned();
  }
  if n == 0.0 {
    return "0".to_owned();
  }
  if n.is_infinite() {
    let s = if n.is_sign_positive() { "Infinity" } else { "-Infinity" };
    return s.to_owned();
  }
  let abs = n.abs();
  if (1e-6..1e21).contains(&abs) {
    // rust prints the shortest round-tripping digits, and no `.0` for integers with `{}`.
    return format!("{n}");
  }
  let s = format!("{n:e}");
  match s.split_once('e') {
    Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
    _ => s,
  }
}
