mod alias;
mod builtins;
mod color;
mod config;
mod error;
mod history;
mod parse;
mod process_exec;
mod prompt;
mod shell;

use std::io;

use anyhow::Context as _;
use reedline::{Reedline, Signal};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    alias::JsonAliasStore,
    color::error_text,
    history::FileHistoryStore,
    process_exec::SystemLauncher,
    prompt::CwdPrompt,
    shell::{Context, Flow, Shell},
};

fn main() -> anyhow::Result<()> {
    init_logging();

    // [1] Load configuration and session state
    let cfg = config::init();
    let ctx = Context::new(
        Box::new(JsonAliasStore::new(&cfg.alias_file)),
        Box::new(FileHistoryStore::new(&cfg.history_file)),
    )
    .context("failed to load shell state")?;
    let mut shell = Shell::new(ctx, Box::new(SystemLauncher));
    debug!(
        aliases = shell.context().aliases.len(),
        history = shell.context().history.entries().len(),
        "session ready"
    );

    // [2] Ctrl-C must only reach the foreground child, startup lines included
    process_exec::install_interrupt_handler();

    let mut stdout = io::stdout();
    shell.run_startup(&cfg.startup, &mut stdout);

    // [3] Main REPL loop
    let mut editor = Reedline::create();
    let prompt = CwdPrompt;
    loop {
        match editor.read_line(&prompt) {
            Ok(Signal::Success(buf)) => {
                if shell.handle_line(&buf, &mut stdout) == Flow::Exit {
                    break;
                }
            }
            Ok(Signal::CtrlC) => println!(),
            Ok(Signal::CtrlD) => break,
            Err(e) => {
                // the terminal is gone; nothing more can be read
                eprintln!("{}", error_text(format!("Error: {e}")));
                warn!("line editor failed: {e}");
                break;
            }
        }
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("BETTERCMD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
