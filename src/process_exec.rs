use std::{
    io,
    process::{Command, ExitStatus, Stdio},
};

use tracing::debug;

/// Internal commands of `cmd` that `where` cannot see.
#[cfg(windows)]
const CMD_BUILTINS: &[&str] = &[
    "assoc", "call", "cd", "chdir", "cls", "color", "copy", "date", "del", "dir", "echo",
    "erase", "ftype", "md", "mkdir", "mklink", "move", "path", "pause", "popd", "pushd", "rd",
    "ren", "rename", "rmdir", "set", "start", "time", "title", "type", "ver", "vol",
];

/// What one launch attempt came to.
#[derive(Debug)]
pub enum Outcome {
    /// The program ran; its exit status is its own business.
    Success(ExitStatus),
    NotFound,
    LaunchError(io::Error),
}

/// The two ways of starting an external program.
pub trait Launcher {
    /// Run `command` directly, resolved through PATH.
    fn direct(&self, command: &str, args: &[String]) -> Outcome;
    /// Hand `line`, an invocation of `command`, to the platform interpreter.
    fn shell(&self, command: &str, line: &str) -> Outcome;
}

/// Launches real processes in the foreground and waits for them.
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn direct(&self, command: &str, args: &[String]) -> Outcome {
        match Command::new(command).args(args).status() {
            Ok(status) => Outcome::Success(status),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Outcome::NotFound,
            Err(e) => Outcome::LaunchError(e),
        }
    }

    fn shell(&self, command: &str, line: &str) -> Outcome {
        // Only the resolution check decides NotFound; once the line runs,
        // whatever it exits with belongs to the program
        match resolvable(command) {
            Ok(true) => {}
            Ok(false) => return Outcome::NotFound,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Outcome::NotFound,
            Err(e) => return Outcome::LaunchError(e),
        }

        match interpreter(line).status() {
            Ok(status) => Outcome::Success(status),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Outcome::NotFound,
            Err(e) => Outcome::LaunchError(e),
        }
    }
}

/// Asks the interpreter whether it can resolve `command`, without running it.
#[cfg(unix)]
fn resolvable(command: &str) -> io::Result<bool> {
    let status = Command::new("sh")
        .args(["-c", "command -v \"$1\"", "sh", command])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    debug!(command, %status, "interpreter resolution check");
    Ok(status.success())
}

#[cfg(windows)]
fn resolvable(command: &str) -> io::Result<bool> {
    if CMD_BUILTINS.contains(&command.to_ascii_lowercase().as_str()) {
        return Ok(true);
    }
    let status = Command::new("where")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    debug!(command, %status, "where resolution check");
    Ok(status.success())
}

#[cfg(unix)]
fn interpreter(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(windows)]
fn interpreter(line: &str) -> Command {
    use std::os::windows::process::CommandExt;
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").raw_arg(line);
    cmd
}

/// `"command" arg1 arg2 ...`, quoted so a command path may contain spaces.
pub fn quoted_invocation(command: &str, args: &[String]) -> String {
    std::iter::once(format!("\"{command}\""))
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Direct invocation first; only a NotFound falls back to the quoted
/// interpreter form. Any other outcome is final.
pub fn run_external(launcher: &dyn Launcher, command: &str, args: &[String]) -> Outcome {
    match launcher.direct(command, args) {
        Outcome::NotFound => {
            let line = quoted_invocation(command, args);
            debug!(command, %line, "direct launch not found, retrying through interpreter");
            launcher.shell(command, &line)
        }
        outcome => outcome,
    }
}

/// True if the child was stopped by an interrupt from the terminal.
pub fn interrupted(status: &ExitStatus) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status.signal() == Some(libc::SIGINT)
    }
    #[cfg(not(unix))]
    {
        let _ = status;
        false
    }
}

/// Keep the shell alive on Ctrl-C while a foreground child runs.
///
/// Must not be SIG_IGN, which children would inherit through exec.
#[cfg(unix)]
pub fn install_interrupt_handler() {
    extern "C" fn on_interrupt(_: libc::c_int) {}

    unsafe {
        libc::signal(libc::SIGINT, on_interrupt as extern "C" fn(libc::c_int) as libc::sighandler_t);
    }
}

#[cfg(not(unix))]
pub fn install_interrupt_handler() {}
