use anyhow::{Result, bail};
use std::{path::Path, process::Command};

use crate::error::MyError;

/// Runs `player` (a program optionally followed by arguments) on `playlist`
/// and waits for it to exit.
pub fn launch(player: &str, playlist: &Path) -> Result<()> {
    let mut words = player.split_whitespace();
    let Some(program) = words.next() else {
        bail!(MyError::Player("no player command configured".into()));
    };
    log::info!("opening {} with `{}`", playlist.display(), player);
    let status = Command::new(program)
        .args(words)
        .arg(playlist)
        .status()
        .map_err(|e| MyError::Player(format!("`{}`: {}", program, e)))?;
    if !status.success() {
        log::warn!("`{}` exited with {}", player, status);
    }

    Ok(())
}
