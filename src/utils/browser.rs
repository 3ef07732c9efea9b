//! Open URLs with the platform's default handler.
//!
//! Only absolute URLs with a known scheme are opened. Relative link targets
//! are left alone: the preview does not resolve links against the source file.

use anyhow::{Context, Result, anyhow, bail};
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use url::Url;

/// Schemes handed to the system opener.
const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "gemini", "mailto"];

/// Validate a link target, returning it as an absolute URL.
pub fn openable(target: &str) -> Option<Url> {
    let url = Url::parse(target.trim()).ok()?;
    ALLOWED_SCHEMES.contains(&url.scheme()).then_some(url)
}

/// Open `target` in the default handler for its scheme.
pub fn open_url(target: &str) -> Result<()> {
    let Some(url) = openable(target) else {
        bail!("refusing to open `{target}`: not an absolute http, https, gemini or mailto URL");
    };

    let (program, args) = opener()?;
    let mut command = Command::new(program);
    command.args(args).arg(url.as_str());
    spawn_reaped(command).with_context(|| format!("failed to run `{program}`"))?;

    crate::debug!("open"; "{}", url);
    Ok(())
}

/// Spawn `command` detached from stdio, waiting on it from a background
/// thread so it does not linger as a zombie.
fn spawn_reaped(mut command: Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(std::thread::spawn(move || child.wait()))
}

/// The opener command and its leading arguments for this platform.
fn opener() -> Result<(&'static str, &'static [&'static str])> {
    if cfg!(target_os = "macos") {
        return Ok(("open", &[]));
    }
    if cfg!(windows) {
        return Ok(("cmd", &["/C", "start", ""]));
    }

    const CANDIDATES: [(&str, &[&str]); 3] =
        [("xdg-open", &[]), ("gio", &["open"]), ("wslview", &[])];
    CANDIDATES
        .into_iter()
        .find(|(cmd, _)| which::which(cmd).is_ok())
        .ok_or_else(|| anyhow!("no URL opener found (tried xdg-open, gio, wslview)"))
}
