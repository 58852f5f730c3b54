//! A CLI for desugaring index-from-end access.

use caret_expr::{Str, StrArena};
use std::process::ExitCode;

fn main() -> ExitCode {
  better_panic::install();
  let args = match get_args() {
    Err(e) => {
      println!("error parsing args: {e}");
      return ExitCode::FAILURE;
    }
    Ok(None) => return ExitCode::SUCCESS,
    Ok(Some(x)) => x,
  };
  let quiet = args.quiet;
  let n = run(&args);
  if n == 0 {
    ExitCode::SUCCESS
  } else {
    if !quiet {
      let s = if n == 1 { "" } else { "s" };
      println!("{n} error{s}");
    }
    ExitCode::FAILURE
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
  /// Show the desugared expression.
  Show,
  /// Execute the desugared expression.
  Eval,
  /// Only report errors.
  Check,
}

struct Args {
  mode: Mode,
  quiet: bool,
  files: Vec<std::ffi::OsString>,
}

fn get_args() -> Result<Option<Args>, pico_args::Error> {
  env_logger::init();
  let mut args = pico_args::Arguments::from_env();
  if args.contains(["-h", "--help"]) {
    println!("usage:");
    println!("  caret [<option>...] <file>...");
    println!();
    println!("each <file> is a JSON expression tree");
    println!();
    println!("options:");
    println!("  -h, --help");
    println!("    show this help");
    println!("  -q, --quiet");
    println!("    emit no output");
    println!("  --eval");
    println!("    execute the desugared expression and show the result as JSON");
    println!("  --check");
    println!("    only report errors");
    println!();
    return Ok(None);
  }
  let quiet = args.contains(["-q", "--quiet"]);
  let eval = args.contains("--eval");
  let check = args.contains("--check");
  let mode = match (eval, check) {
    (true, true) => {
      let cause = "--eval and --check are mutually exclusive".to_owned();
      return Err(pico_args::Error::ArgumentParsingFailed { cause });
    }
    (true, false) => Mode::Eval,
    (false, true) => Mode::Check,
    (false, false) => Mode::Show,
  };
  let files = args.finish();
  Ok(Some(Args { mode, quiet, files }))
}

/// Returns the number of errors.
fn run(args: &Args) -> usize {
  let mut ret = 0usize;
  for arg in &args.files {
    let Some(arg) = arg.to_str() else {
      if !args.quiet {
        println!("{}: not valid UTF-8", arg.to_string_lossy());
      }
      ret += 1;
      continue;
    };
    let contents = match std::fs::read_to_string(arg) {
      Ok(x) => x,
      Err(e) => {
        if !args.quiet {
          println!("{arg}: couldn't read path: {e}");
        }
        ret += 1;
        continue;
      }
    };
    let errors = file(args, arg, &contents);
    ret += errors.len();
    if !args.quiet {
      for e in errors {
        println!("{arg}: {e}");
      }
    }
  }
  ret
}

/// Processes one file, returning its errors.
fn file(args: &Args, arg: &str, contents: &str) -> Vec<String> {
  let mut str_ar = StrArena::default();
  let tree = match caret_tree::get_str(&mut str_ar, contents) {
    Ok(x) => x,
    Err(e) => return vec![e.to_string()],
  };
  let ds = caret_desugar::get(&mut str_ar, &tree.ar, Some(tree.top));
  log::info!("{arg}: rewrote {} index-from-end accesses", ds.count);
  if !ds.errors.is_empty() {
    return ds.errors.iter().map(ToString::to_string).collect();
  }
  match args.mode {
    Mode::Check => {}
    Mode::Show => {
      if !args.quiet {
        println!("{}", caret_expr::display::expr(ds.top, &str_ar, &ds.ar));
      }
    }
    Mode::Eval => {
      let mut cx = caret_eval::Cx::new(&mut str_ar);
      let val = match caret_eval::get_exec(&mut cx, &ds.ar, ds.top) {
        Ok(x) => x,
        Err(e) => return vec![e.display(cx.str_ar).to_string()],
      };
      let json = match caret_eval::get_manifest(&cx, val) {
        Ok(x) => x,
        Err(e) => return vec![e.display(cx.str_ar).to_string()],
      };
      if !args.quiet {
        match serde_json::to_string_pretty(&json) {
          Ok(s) => println!("{s}"),
          Err(e) => return vec![e.to_string()],
        }
        let events = cx.trace.events().len();
        let lengths = cx.trace.gets(Str::LENGTH);
        println!("{events} property accesses, {lengths} reads of length");
      }
    }
  }
  Vec::new()
}
