//! Strings and identifiers.

use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::fmt;

/// A string, which may be interned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Str(StrRepr);

impl Str {
  /// The name of the array-like length property.
  pub const LENGTH: Self = Self(StrRepr::Builtin(Builtin::Length));
  /// The empty string.
  pub const EMPTY: Self = Self(StrRepr::Builtin(Builtin::Empty));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum StrRepr {
  Builtin(Builtin),
  Idx(StrIdx),
}

/// Strings that every arena knows about without interning them first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Builtin {
  Empty,
  Length,
}

impl Builtin {
  const VALUES: [Builtin; 2] = [Builtin::Empty, Builtin::Length];

  fn as_static_str(self) -> &'static str {
    match self {
      Builtin::Empty => "",
      Builtin::Length => "length",
    }
  }

  fn from_str(s: &str) -> Option<Self> {
    Self::VALUES.into_iter().find(|b| b.as_static_str() == s)
  }
}

/// An interned string, which is an index into a string arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct StrIdx(u32);

impl StrIdx {
  fn from_usize(n: usize) -> Self {
    Self(always::convert::usize_to_u32(n))
  }

  fn to_usize(self) -> usize {
    always::convert::u32_to_usize(self.0)
  }
}

/// Storage for all the strings and identifiers of some expressions.
#[derive(Debug, Default)]
pub struct StrArena {
  idx_to_data: Vec<Box<str>>,
  data_to_idx: FxHashMap<Box<str>, StrIdx>,
  fresh_idx: u32,
}

impl StrArena {
  fn mk_repr(&mut self, contents: &str) -> StrRepr {
    if let Some(b) = Builtin::from_str(contents) {
      return StrRepr::Builtin(b);
    }
    match self.data_to_idx.entry(contents.into()) {
      Entry::Occupied(entry) => StrRepr::Idx(*entry.get()),
      Entry::Vacant(entry) => {
        let ret = StrIdx::from_usize(self.idx_to_data.len());
        self.idx_to_data.push(entry.key().clone());
        entry.insert(ret);
        StrRepr::Idx(ret)
      }
    }
  }

  /// inserts the contents if it was not in the arena already
  pub fn str(&mut self, contents: &str) -> Str {
    Str(self.mk_repr(contents))
  }

  /// Returns the identifier with this name, which a user could have written.
  pub fn id(&mut self, name: &str) -> Id {
    Id(IdRepr::Named(self.mk_repr(name)))
  }

  /// Returns an identifier distinct from every other identifier, named or fresh. It has no
  /// source-level spelling, so it cannot capture or be captured by user bindings.
  pub fn id_fresh(&mut self) -> Id {
    let ret = Id(IdRepr::Fresh(self.fresh_idx));
    self.fresh_idx += 1;
    ret
  }

  fn get_repr(&self, repr: StrRepr) -> &str {
    match repr {
      StrRepr::Builtin(b) => b.as_static_str(),
      StrRepr::Idx(idx) => &self.idx_to_data[idx.to_usize()],
    }
  }

  #[must_use]
  pub fn get(&self, s: Str) -> &str {
    self.get_repr(s.0)
  }

  /// Returns the name of the id, or `None` if it was made fresh.
  #[must_use]
  pub fn get_id(&self, id: Id) -> Option<&str> {
    match id.0 {
      IdRepr::Named(repr) => Some(self.get_repr(repr)),
      IdRepr::Fresh(_) => None,
    }
  }
}

/// An identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(IdRepr);

impl Id {
  #[must_use]
  pub fn is_fresh(self) -> bool {
    matches!(self.0, IdRepr::Fresh(_))
  }

  #[must_use]
  pub fn display(self, ar: &StrArena) -> impl fmt::Display + use<'_> {
    IdDisplay { id: self, ar }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum IdRepr {
  Named(StrRepr),
  Fresh(u32),
}

struct IdDisplay<'a> {
  id: Id,
  ar: &'a StrArena,
}

impl fmt::Display for IdDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.id.0 {
      IdRepr::Named(repr) => f.write_str(self.ar.get_repr(repr)),
      IdRepr::Fresh(idx) => write!(f, "${idx}"),
    }
  }
}
