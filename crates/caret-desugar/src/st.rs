use crate::error::{Error, Kind};
use caret_expr::{Expr, ExprArena, ExprData, ExprMust, Id, StrArena};

#[derive(Debug)]
pub(crate) struct St<'a> {
  str_ar: &'a mut StrArena,
  in_ar: &'a ExprArena,
  out_ar: ExprArena,
  errors: Vec<Error>,
  count: usize,
}

impl<'a> St<'a> {
  pub(crate) fn new(str_ar: &'a mut StrArena, in_ar: &'a ExprArena) -> Self {
    Self { str_ar, in_ar, out_ar: ExprArena::default(), errors: Vec::new(), count: 0 }
  }

  pub(crate) fn input(&self, e: ExprMust) -> &'a ExprData {
    let in_ar = self.in_ar;
    &in_ar[e]
  }

  pub(crate) fn expr(&mut self, e: ExprData) -> Expr {
    Some(self.out_ar.alloc(e))
  }

  pub(crate) fn fresh(&mut self) -> Id {
    self.str_ar.id_fresh()
  }

  pub(crate) fn err(&mut self, expr: ExprMust, kind: Kind) {
    self.errors.push(Error { expr, kind });
  }

  pub(crate) fn rewrote(&mut self) {
    self.count += 1;
  }

  pub(crate) fn finish(self) -> (ExprArena, Vec<Error>, usize) {
    (self.out_ar, self.errors, self.count)
  }
}
