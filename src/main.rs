use std::{path::PathBuf, process, sync::Once};

use clap::{ArgAction, Parser};
use quill::{host::SystemHost, interpreter::session::Session};

static TRACING_INIT: Once = Once::new();

/// quill runs line-oriented scripts, or reads statements interactively.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, disable_version_flag = true)]
struct Args {
    /// Print version information.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Start the interactive loop.
    #[arg(short, long)]
    repl: bool,

    /// Execute a single line and print its result.
    #[arg(short, long, value_name = "LINE")]
    parse: Option<String>,

    /// Enable experimental options.
    #[arg(short = 'x', long)]
    experimental: bool,

    /// Start the interactive loop in experimental mode.
    #[arg(long = "x-repl")]
    x_repl: bool,

    /// Define an indestructible variable before the session starts.
    #[arg(short = 'X', value_name = "NAME=VALUE", requires = "experimental",
          value_parser = parse_definition)]
    define: Vec<(String, String)>,

    /// The script to run.
    script: Option<PathBuf>,

    /// Arguments available to the script as `args[1]`, `args[2]`, ...
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    script_args: Vec<String>,
}

fn parse_definition(text: &str) -> Result<(String, String), String> {
    text.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, found '{text}'"))
}

/// Installs a log subscriber when `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
                    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

                    if std::env::var("RUST_LOG").is_ok() {
                        tracing_subscriber::registry()
                            .with(fmt::layer().with_writer(std::io::stderr)
                                              .with_target(true))
                            .with(EnvFilter::from_default_env())
                            .init();
                    }
                });
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let mut session = Session::new(SystemHost::new());
    for (name, value) in &args.define {
        session.define_argument(name, value);
    }

    let code = if let Some(line) = &args.parse {
        session.execute_source(line);
        let result = session.last_value().to_string();
        if !result.is_empty() {
            println!("{result}");
        }
        session.exit_code()
    } else if let Some(path) = &args.script {
        session.run_script(path, &args.script_args).unwrap_or_else(|e| {
                                                        eprintln!("Error: {e}");
                                                        e.code()
                                                    })
    } else {
        tracing::debug!(experimental = args.experimental || args.x_repl,
                        repl = args.repl,
                        "interactive session");
        session.repl()
    };

    process::exit(code);
}
