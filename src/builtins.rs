use std::{
    env, fs,
    io::Write,
    path::PathBuf,
};

use crate::{
    error::{Result, ShellError},
    shell::Context,
};

/// Clear screen, cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";

/// The fixed set of commands the shell implements itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Ls,
    Cd,
    Pwd,
    Echo,
    Alias,
    History,
    Cls,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ls" => Some(Self::Ls),
            "cd" => Some(Self::Cd),
            "pwd" => Some(Self::Pwd),
            "echo" => Some(Self::Echo),
            "alias" => Some(Self::Alias),
            "h" => Some(Self::History),
            "cls" => Some(Self::Cls),
            _ => None,
        }
    }

    pub fn execute(self, args: &[String], ctx: &mut Context, out: &mut dyn Write) -> Result<()> {
        match self {
            Self::Ls => ls(args, out),
            Self::Cd => cd(args),
            Self::Pwd => pwd(out),
            Self::Echo => {
                writeln!(out, "{}", args.join(" "))?;
                Ok(())
            }
            Self::Alias => alias(args, ctx, out),
            Self::History => {
                for entry in ctx.history.entries() {
                    writeln!(out, "{entry}")?;
                }
                Ok(())
            }
            Self::Cls => {
                write!(out, "{CLEAR_SCREEN}")?;
                out.flush()?;
                Ok(())
            }
        }
    }
}

// A leading ~ means the home directory
fn expand_tilde(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Print entry names of a directory, sorted
fn ls(args: &[String], out: &mut dyn Write) -> Result<()> {
    let path = expand_tilde(args.first().map_or(".", String::as_str));

    let mut names = fs::read_dir(&path)
        .and_then(|entries| {
            entries
                .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
                .collect::<std::io::Result<Vec<_>>>()
        })
        .map_err(|e| ShellError::path(&path, e))?;
    names.sort();

    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// Change current working directory; no argument means home
fn cd(args: &[String]) -> Result<()> {
    let path = match args.first() {
        Some(dir) => expand_tilde(dir),
        None => dirs::home_dir().ok_or(ShellError::NoHomeDir)?,
    };

    env::set_current_dir(&path).map_err(|e| ShellError::path(&path, e))
}

fn pwd(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", env::current_dir()?.display())?;
    Ok(())
}

/// `alias` lists, `alias name=expansion` defines, `alias name` looks up.
fn alias(args: &[String], ctx: &mut Context, out: &mut dyn Write) -> Result<()> {
    if args.is_empty() {
        for (name, expansion) in ctx.aliases.iter() {
            writeln!(out, "{name} = {expansion}")?;
        }
        return Ok(());
    }

    let spec = args.join(" ");
    let Some((name, expansion)) = spec.split_once('=') else {
        let name = &args[0];
        match ctx.aliases.get(name) {
            Some(expansion) => writeln!(out, "{name} = {expansion}")?,
            None => writeln!(out, "Alias not found: {name}")?,
        }
        return Ok(());
    };

    let (name, expansion) = (name.trim(), expansion.trim());
    if name.is_empty() || expansion.is_empty() {
        return Err(ShellError::AliasSyntax(spec));
    }

    ctx.set_alias(name, expansion)?;
    writeln!(out, "Alias set: {name} = {expansion}")?;
    Ok(())
}
