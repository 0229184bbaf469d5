//! pith - headless host for Pith programs
//!
//! Loads a project, walks it through the lifecycle phases and prints the
//! mounted view tree as text. Also evaluates one-off snippets and hosts an
//! interactive REPL.
//!
//! Usage:
//!   pith run [PATH]            # load, init, mount ui, main, exit
//!   pith run --watch           # keep running, dispatch file changes
//!   pith eval '1 2 add'        # evaluate a snippet, print the stack
//!   pith repl [PATH]           # line editor against a loaded project
//!   pith check PATH            # load only, print the debug state

use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{Shell, generate};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use pith_runtime::{Event, Runtime, RuntimeConfig, Value};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Project-level configuration file
const CONFIG_FILE: &str = "pith.toml";

#[derive(ClapParser, Debug)]
#[command(name = "pith")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pith - run stack-based dictionary programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a project through its lifecycle phases
    Run {
        /// Project directory or .pith source file
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Print the runtime state after loading and log at debug level
        #[arg(short, long)]
        debug: bool,

        /// Keep running and dispatch file changes to on-file-change
        #[arg(long)]
        watch: bool,

        /// Runtime configuration (TOML); defaults to pith.toml in the project
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Evaluate a snippet in a fresh runtime and print the stack
    Eval {
        /// Pith source to evaluate
        code: String,
    },

    /// Interactive line editor against a loaded project
    Repl {
        /// Project directory or .pith source file to load first
        path: Option<PathBuf>,
    },

    /// Load a project and print its runtime state
    Check {
        /// Project directory or .pith source file
        path: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Run { debug: true, .. });
    init_tracing(verbose);

    let code = match cli.command {
        Commands::Run {
            path,
            debug,
            watch,
            config,
        } => run_project(&path, debug, watch, config.as_deref()),
        Commands::Eval { code } => run_eval(&code),
        Commands::Repl { path } => run_repl(path.as_deref()),
        Commands::Check { path } => run_check(&path),
        Commands::Completions { shell } => {
            run_completions(shell);
            0
        }
    };
    process::exit(code);
}

/// `RUST_LOG` wins; otherwise pith crates log at info (debug with `-d`)
fn init_tracing(verbose: bool) {
    let default = if verbose { "pith=debug" } else { "pith=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "pith", &mut io::stdout());
}

/// Directory that holds the project's files
///
/// A source file's project is the directory it lives in.
fn project_dir(path: &Path) -> PathBuf {
    if path.is_file() {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    } else {
        path.to_path_buf()
    }
}

/// Read `--config` or the project's `pith.toml` over the defaults
fn load_config(project: &Path, explicit: Option<&Path>) -> Result<RuntimeConfig, String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = project_dir(project).join(CONFIG_FILE);
            if !candidate.exists() {
                return Ok(RuntimeConfig::default());
            }
            candidate
        }
    };
    let content = fs::read_to_string(&path)
        .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;
    debug!("Using config {}", path.display());
    RuntimeConfig::from_toml(&content)
}

/// Print and clear the error left by a phase; true when there was one
fn report(rt: &mut Runtime, phase: &str) -> bool {
    match rt.take_error() {
        Some(err) => {
            eprintln!("Error in {}: {}", phase, err);
            true
        }
        None => false,
    }
}

/// Load a project with its configuration, exiting on failure
fn load_runtime(path: &Path, explicit: Option<&Path>, debug: bool) -> Runtime {
    let config = match load_config(path, explicit) {
        Ok(config) => config.with_debug(debug),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    let mut rt = Runtime::with_config(config);
    if !rt.load_project(path) {
        report(&mut rt, "load");
        process::exit(1);
    }
    rt
}

fn run_project(path: &Path, debug: bool, watch: bool, config: Option<&Path>) -> i32 {
    let mut rt = load_runtime(path, config, debug);
    if debug {
        eprint!("{}", rt.debug_state());
    }

    rt.run_slot("init");
    if report(&mut rt, "init") {
        return 1;
    }

    let mut failed = false;
    if rt.mount_ui() {
        print!("{}", rt.debug_view());
    }
    failed |= report(&mut rt, "ui");

    rt.run_slot("main");
    failed |= report(&mut rt, "main");

    if watch {
        let root = rt
            .project_root()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        failed |= watch_project(&mut rt, &root);
    }

    rt.run_slot("exit");
    failed |= report(&mut rt, "exit");

    i32::from(failed)
}

/// Start a watcher that forwards modified paths
fn start_watcher(root: &Path) -> Option<(RecommendedWatcher, Receiver<PathBuf>)> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = match RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res
                && event.kind.is_modify()
            {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        },
        notify::Config::default().with_poll_interval(Duration::from_millis(500)),
    ) {
        Ok(w) => w,
        Err(e) => {
            warn!("Could not start file watcher: {}", e);
            return None;
        }
    };

    if let Err(e) = watcher.watch(root, RecursiveMode::Recursive) {
        warn!("Could not watch {}: {}", root.display(), e);
        return None;
    }
    Some((watcher, rx))
}

/// Dispatch file changes until the watcher goes away; true on any error
fn watch_project(rt: &mut Runtime, root: &Path) -> bool {
    let Some((_watcher, rx)) = start_watcher(root) else {
        return true;
    };
    info!("Watching {}", root.display());

    let mut failed = false;
    for path in rx {
        let path = path.display().to_string();
        debug!("File changed: {}", path);
        rt.handle_event(Event::FileChange { path });
        failed |= report(rt, "on-file-change");
        if rt.refresh() {
            print!("{}", rt.debug_view());
        }
        failed |= report(rt, "ui");
    }
    failed
}

/// Stack contents as `[a, "b", c]`
fn format_stack(stack: &[Value]) -> String {
    let items: Vec<String> = stack
        .iter()
        .map(|value| match value {
            Value::String(s) => format!("{:?}", s.as_ref()),
            other => other.to_string(),
        })
        .collect();
    format!("[{}]", items.join(", "))
}

fn run_eval(code: &str) -> i32 {
    let mut rt = Runtime::new();
    let ok = rt.eval(code);
    println!("{}", format_stack(rt.stack()));
    if ok {
        0
    } else {
        report(&mut rt, "eval");
        1
    }
}

fn run_check(path: &Path) -> i32 {
    let rt = load_runtime(path, None, false);
    print!("{}", rt.debug_state());
    0
}

fn run_repl(path: Option<&Path>) -> i32 {
    let mut rt = match path {
        Some(path) => load_runtime(path, None, false),
        None => Runtime::new(),
    };

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error initializing readline: {}", e);
            return 1;
        }
    };

    println!("pith {} - :help for commands", env!("CARGO_PKG_VERSION"));
    loop {
        match rl.readline("pith> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match line {
                    ":quit" | ":q" => break,
                    ":stack" => println!("{}", format_stack(rt.stack())),
                    ":clear" => {
                        rt.clear_stack();
                        rt.clear_error();
                    }
                    ":state" => print!("{}", rt.debug_state()),
                    ":help" => print_help(),
                    _ if line.starts_with(':') => {
                        println!("Unknown command: {}. Type :help for available commands.", line);
                    }
                    _ => {
                        if !rt.eval(line) {
                            report(&mut rt, "eval");
                        }
                        println!("{}", format_stack(rt.stack()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }
    0
}

fn print_help() {
    println!(
        r#"
Pith REPL Commands:
  :stack        Show the stack
  :clear        Empty the stack and clear the error
  :state        Dump root slots and dictionaries
  :quit, :q     Exit the REPL
  :help         Show this help

Anything else is evaluated against the loaded project; the stack persists
between lines.

Examples:
  pith> 1 2 add
  [3]
  pith> "hi" " there" concat
  [3, "hi there"]
"#
    );
}
