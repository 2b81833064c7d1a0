use std::io::Write;

use tracing::{debug, warn};

use crate::{
    alias::{self, AliasStore, AliasTable},
    builtins::Builtin,
    color::{error_text, parse_color_command, render_error},
    error::{Result, ShellError},
    history::{HistoryLog, HistoryStore},
    parse::{ParsedCommand, parse_input},
    process_exec::{Launcher, Outcome, interrupted, run_external},
};

/// Raw inputs that end the session.
const SENTINELS: [&str; 2] = ["exit", "quit"];

/// What the read loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Session state handed to every built-in.
pub struct Context {
    pub aliases: AliasTable,
    alias_store: Box<dyn AliasStore>,
    pub history: HistoryLog,
}

impl Context {
    pub fn new(alias_store: Box<dyn AliasStore>, history_store: Box<dyn HistoryStore>) -> Result<Self> {
        Ok(Self {
            aliases: alias_store.load()?,
            alias_store,
            history: HistoryLog::load(history_store)?,
        })
    }

    /// Insert or overwrite an alias and persist the whole table.
    pub fn set_alias(&mut self, name: &str, expansion: &str) -> Result<()> {
        self.aliases.insert(name, expansion);
        self.alias_store.save(&self.aliases)
    }
}

pub struct Shell {
    ctx: Context,
    launcher: Box<dyn Launcher>,
}

impl Shell {
    pub fn new(ctx: Context, launcher: Box<dyn Launcher>) -> Self {
        Self { ctx, launcher }
    }

    // One submitted line: record, check sentinels, then execute
    pub fn handle_line(&mut self, raw: &str, out: &mut dyn Write) -> Flow {
        if raw.trim().is_empty() {
            return Flow::Continue;
        }

        if let Err(e) = self.ctx.history.record(raw) {
            warn!("failed to save history: {e}");
            report(out, &e);
        }

        if SENTINELS.iter().any(|&s| s == raw) {
            return Flow::Exit;
        }

        if let Err(e) = self.exec(raw, out) {
            report(out, &e);
        }
        Flow::Continue
    }

    // Config startup lines: executed like input, never recorded
    pub fn run_startup(&mut self, lines: &[String], out: &mut dyn Write) {
        for line in lines.iter().filter(|l| !l.trim().is_empty()) {
            if let Err(e) = self.exec(line, out) {
                report(out, &e);
            }
        }
    }

    pub fn exec(&mut self, raw: &str, out: &mut dyn Write) -> Result<()> {
        // Step 1: colour pseudo-command, matched on the raw text
        if let Some(rendered) = parse_color_command(raw) {
            writeln!(out, "{}", rendered?)?;
            return Ok(());
        }

        // Step 2: tokenize and expand one alias level
        let Some(parsed) = parse_input(raw) else {
            return Ok(());
        };
        let ParsedCommand { command, args } = alias::expand(parsed, &self.ctx.aliases)?;

        // Step 3: builtin or external
        self.dispatch(&command, &args, out)
    }

    pub fn dispatch(&mut self, command: &str, args: &[String], out: &mut dyn Write) -> Result<()> {
        if let Some(builtin) = Builtin::from_name(command) {
            return builtin.execute(args, &mut self.ctx, out);
        }

        out.flush()?;
        match run_external(self.launcher.as_ref(), command, args) {
            Outcome::Success(status) => {
                debug!(command, %status, "external command finished");
                if interrupted(&status) {
                    writeln!(out)?;
                }
                Ok(())
            }
            Outcome::NotFound => {
                writeln!(out, "{}", error_text(format!("Command not found: {command}")))?;
                Ok(())
            }
            Outcome::LaunchError(source) => Err(ShellError::Launch {
                command: command.to_string(),
                source,
            }),
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }
}

fn report(out: &mut dyn Write, err: &ShellError) {
    if let Err(e) = writeln!(out, "{}", render_error(err)) {
        warn!("failed to write error message: {e}");
    }
}
