use anyhow::Result;
use std::{
    fs::File,
    io::prelude::*,
    path::{Path, PathBuf},
};

use crate::{error::MyError, utils};

const M3U_HEADER: &str = "#EXTM3U";

pub struct Playlist(Vec<PathBuf>);

fn playlist_entry(episode: &Path) -> String {
    format!(
        "#EXTINFO:0,{}\n{}",
        utils::file_name_lossy(episode),
        episode.display()
    )
}

/// Extended m3u with one `#EXTINFO` line per episode, no trailing newline.
pub fn playlist_contents(episodes: &[PathBuf]) -> String {
    let entries: Vec<_> = episodes.iter().map(|ep| playlist_entry(ep)).collect();

    format!("{}\n{}", M3U_HEADER, entries.join("\n"))
}

impl Playlist {
    pub fn new(episodes: Vec<PathBuf>) -> Self {
        Self(episodes)
    }

    pub fn contents(&self) -> String {
        playlist_contents(&self.0)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file =
            File::create(path).map_err(|e| MyError::File(format!("{}: {}", path.display(), e)))?;
        file.write_all(self.contents().as_bytes())
            .map_err(|e| MyError::File(format!("{}: {}", path.display(), e)))?;
        log::info!("wrote {} episode(s) to {}", self.0.len(), path.display());

        Ok(())
    }
}
