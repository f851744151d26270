//! Declared build/install commands, run through the platform shell.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Result, SkmError};

/// Run `command` with `cwd` as the working directory. A non-zero exit is a
/// [`SkmError::Command`] carrying the command's stderr.
pub fn run_shell(command: &str, cwd: &Path) -> Result<()> {
    debug!(command, cwd = %cwd.display(), "running command");
    let output = shell(command)
        .current_dir(cwd)
        .output()
        .map_err(|err| SkmError::Command(format!("run `{command}`: {err}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let code = output
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |code| code.to_string());
        return Err(SkmError::Command(format!(
            "`{command}` exited with {code}: {}",
            stderr.trim()
        )));
    }
    info!(command, "command finished");
    Ok(())
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}
