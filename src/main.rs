use clap::{Arg, Command};
use coda::{repl, runner};
use std::fs;
use std::path::Path;
use std::process;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs a stderr subscriber, but only when `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

fn main() {
    init_tracing();

    let matches = Command::new("coda")
        .about("A small expression language with an incremental REPL")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("file")
                .help("Source file to run as a single submission")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("eval")
                .short('e')
                .long("eval")
                .value_name("SOURCE")
                .help("Evaluate SOURCE and print the result")
                .conflicts_with("file"),
        )
        .arg(
            Arg::new("show-tree")
                .long("show-tree")
                .help("Print the parse tree of each REPL submission")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let show_tree = matches.get_flag("show-tree");

    let succeeded = if let Some(source) = matches.get_one::<String>("eval") {
        exit_on_io_error(runner::run(source, Some("<eval>")))
    } else if let Some(file_path) = matches.get_one::<String>("file") {
        run_file(file_path)
    } else {
        exit_on_io_error(repl::start(show_tree).map(|()| true))
    };

    if !succeeded {
        process::exit(1);
    }

    // A file or --eval can be followed by an interactive session
    let ran_source = matches.contains_id("file") || matches.contains_id("eval");
    if matches.get_flag("interactive") && ran_source {
        exit_on_io_error(repl::start(show_tree).map(|()| true));
    }
}

fn run_file(path: &str) -> bool {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            let name = path.display().to_string();
            exit_on_io_error(runner::run(&source, Some(&name)))
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn exit_on_io_error(result: std::io::Result<bool>) -> bool {
    match result {
        Ok(succeeded) => succeeded,
        Err(e) => {
            eprintln!("I/O error: {}", e);
            process::exit(1);
        }
    }
}
