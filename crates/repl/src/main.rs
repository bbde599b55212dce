//! seqr - line-oriented REPL and batch runner for the Seq Lisp.
//!
//! This binary exists only to exercise `seq-runtime`'s library API end to
//! end (`new_state`, `eval_string`, `pr_str`, `set_ns`) and to give the
//! exit-code contract somewhere to live; the evaluator itself has no
//! opinion about line editing or process exit codes.
//!
//! Usage:
//!   seqr                     # interactive REPL on stdin
//!   seqr script.seq          # evaluate a file, print the last value
//!   seqr -e '(+ 1 2)'        # evaluate a one-shot expression
//!   seqr --ns scratch        # start in a namespace other than `user`

use std::path::PathBuf;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use seq_core::error::EvalError;

#[derive(Parser)]
#[command(name = "seqr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "REPL and batch runner for the Seq Lisp", long_about = None)]
struct Args {
    /// Seq source file to evaluate. Omit for an interactive REPL.
    file: Option<PathBuf>,

    /// Evaluate a single expression and print its value.
    #[arg(short, long, value_name = "EXPR")]
    eval: Option<String>,

    /// Starting namespace (default: user).
    #[arg(long, value_name = "NAME")]
    ns: Option<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("SEQ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// §6 "Exit code contract": 0 on clean evaluation, non-zero with a
/// single-line `kind: message (file:line:col)` on the error stream
/// otherwise.
fn report_error(err: &EvalError) {
    eprintln!("{err}");
}

fn main() {
    init_logging();
    let args = Args::parse();

    let mut state = seq_runtime::new_state();
    if let Some(ns) = &args.ns {
        seq_runtime::set_ns(&mut state, ns);
    }

    let exit_code = if let Some(expr) = &args.eval {
        run_batch(expr, &state)
    } else if let Some(path) = &args.file {
        match std::fs::read_to_string(path) {
            Ok(src) => run_batch(&src, &state),
            Err(e) => {
                eprintln!("error: cannot read {}: {e}", path.display());
                1
            }
        }
    } else {
        run_repl(&mut state);
        0
    };

    std::process::exit(exit_code);
}

fn run_batch(src: &str, state: &seq_runtime::InterpreterState) -> i32 {
    match seq_runtime::eval_string(src, state) {
        Ok(value) => {
            println!("{}", seq_runtime::pr_str(&value));
            0
        }
        Err(e) => {
            report_error(&e);
            1
        }
    }
}

fn run_repl(state: &mut seq_runtime::InterpreterState) {
    let mut rl = DefaultEditor::new().expect("failed to initialize line editor");
    let history_path = home::home_dir().map(|home| home.join(".seqr_history"));
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = format!("{}=> ", current_ns_name(state));
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                if let Some(name) = line.trim().strip_prefix(":ns ") {
                    seq_runtime::set_ns(state, name.trim());
                    continue;
                }
                match seq_runtime::eval_string(&line, state) {
                    Ok(value) => println!("{}", seq_runtime::pr_str(&value)),
                    Err(e) => report_error(&e),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("readline error: {e}");
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        let _ = rl.save_history(path);
    }
}

fn current_ns_name(state: &seq_runtime::InterpreterState) -> String {
    seq_runtime::pr_str_fn(&seq_core::value::Value::Symbol(state.current_ns_name()))
}
