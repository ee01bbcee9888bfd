use std::fs;

use aplite::{
    config::{
        Config, DEFAULT_COMPARISON_TOLERANCE, DEFAULT_INDEX_ORIGIN, DEFAULT_MAX_DEPTH,
        DEFAULT_MAX_NESTING, DEFAULT_MAX_POWER_ITERATIONS,
    },
    interpreter::{session::Session, symbol_table::SymbolKind, value::display::DEFAULT_PRINT_PRECISION},
};
use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};

/// aplite is a small interpreter for an APL-family array language.
///
/// Without CONTENTS it starts an interactive session.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells aplite to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Pipe mode is a feature that automatically prints out the value of the
    /// last statement of a script.
    #[arg(short, long)]
    pipe_mode: bool,

    /// Initial value of ⎕IO.
    #[arg(long, default_value_t = DEFAULT_INDEX_ORIGIN)]
    index_origin: usize,

    /// Initial value of ⎕PP.
    #[arg(long, default_value_t = DEFAULT_PRINT_PRECISION)]
    print_precision: usize,

    /// Initial value of ⎕CT.
    #[arg(long, default_value_t = DEFAULT_COMPARISON_TOLERANCE)]
    comparison_tolerance: f64,

    /// Maximum nesting of user-defined function calls.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum nesting of expressions.
    #[arg(long, default_value_t = DEFAULT_MAX_NESTING)]
    max_nesting: usize,

    /// Maximum iterations of a power operator with a convergence test.
    #[arg(long, default_value_t = DEFAULT_MAX_POWER_ITERATIONS)]
    max_power_iterations: usize,

    /// Log evaluation at debug level. `APLITE_LOG` takes precedence.
    #[arg(short, long)]
    verbose: bool,

    contents: Option<String>,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default = if verbose { "aplite=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("APLITE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry().with(fmt::layer().with_target(true)
                                                     .with_level(true)
                                                     .with_writer(std::io::stderr))
                                  .with(filter)
                                  .init();
}

fn repl(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    println!("aplite {}. Type )off to quit.", env!("CARGO_PKG_VERSION"));
    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline("      ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line)?;

                match line {
                    ")off" => break,
                    ")vars" => println!("{}", session.names(SymbolKind::Data).join(" ")),
                    ")fns" => println!("{}", session.names(SymbolKind::Function).join(" ")),
                    ")clear" => {
                        session.clear()?;
                        println!("CLEAR WS");
                    },
                    source => match session.echo(source) {
                        Ok(Some(text)) => println!("{text}"),
                        Ok(None) => {},
                        Err(e) => eprintln!("{e}"),
                    },
                }
            },
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = Config { index_origin:         args.index_origin,
                          comparison_tolerance: args.comparison_tolerance,
                          print_precision:      args.print_precision,
                          max_depth:            args.max_depth,
                          max_nesting:          args.max_nesting,
                          max_power_iterations: args.max_power_iterations, };

    let mut session = Session::new(config).unwrap_or_else(|e| {
                                              eprintln!("{e}");
                                              std::process::exit(2);
                                          });

    let Some(contents) = args.contents else {
        if let Err(e) = repl(&mut session) {
            eprintln!("{e}");
            std::process::exit(1);
        }
        return;
    };

    let script = if args.file {
        fs::read_to_string(&contents).unwrap_or_else(|_| {
                                         eprintln!("Failed to read the input file '{contents}'. Perhaps this file does not exist?");
                                         std::process::exit(1);
                                     })
    } else {
        contents
    };

    match session.echo(&script) {
        Ok(Some(text)) if args.pipe_mode => println!("{text}"),
        Ok(_) => {},
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}
