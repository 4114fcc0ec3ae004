use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::utils;

#[derive(Debug)]
pub struct Show {
    pub name: String,
    pub path: PathBuf,
    enabled: bool,
    // None until the first scan, never invalidated afterwards
    episodes: Option<Vec<PathBuf>>,
}

impl Show {
    pub fn new(name: impl Into<String>, base_path: impl AsRef<Path>) -> Self {
        let name = name.into();
        let path = base_path.as_ref().join(&name);

        Self {
            name,
            path,
            enabled: false,
            episodes: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_scanned(&self) -> bool {
        self.episodes.is_some()
    }

    /// Paths of this show's media files, scanned on the first call.
    pub fn episodes(&mut self) -> Result<&[PathBuf]> {
        if self.episodes.is_none() {
            self.episodes = Some(utils::walk_dir(&self.path)?);
        }

        Ok(self.episodes.as_deref().unwrap_or_default())
    }

    /// `name (count)`, with the name green if enabled and red otherwise.
    pub fn describe(&mut self) -> Result<String> {
        let n_episodes = self.episodes()?.len();
        let name = if self.enabled {
            self.name.green()
        } else {
            self.name.red()
        };

        Ok(format!("{} {}", name, format!("({})", n_episodes).dimmed()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn episodes_are_cached() {
        let dir = tempdir().unwrap();
        let show_dir = dir.path().join("qi");
        fs::create_dir(&show_dir).unwrap();
        File::create(show_dir.join("s01e01.avi")).unwrap();

        let mut show = Show::new("qi", dir.path());
        assert!(!show.is_scanned());
        assert_eq!(show.episodes().unwrap().len(), 1);
        assert!(show.is_scanned());

        // later changes on disk are not picked up
        File::create(show_dir.join("s01e02.avi")).unwrap();
        assert_eq!(show.episodes().unwrap(), &[show_dir.join("s01e01.avi")]);
    }

    #[test]
    fn missing_show_dir() {
        let dir = tempdir().unwrap();
        let mut show = Show::new("gone", dir.path());
        assert!(show.episodes().is_err());
        assert!(!show.is_scanned());
    }

    #[test]
    fn describe_marks_state() {
        let dir = tempdir().unwrap();
        let show_dir = dir.path().join("qi");
        fs::create_dir(&show_dir).unwrap();
        for i in 1..=3 {
            File::create(show_dir.join(format!("ep{}.mkv", i))).unwrap();
        }

        colored::control::set_override(true);
        let mut show = Show::new("qi", dir.path());
        let disabled = show.describe().unwrap();
        show.enable(true);
        let enabled = show.describe().unwrap();

        assert!(disabled.contains("qi") && disabled.contains("(3)"));
        assert!(enabled.contains("qi") && enabled.contains("(3)"));
        assert!(enabled.contains("\x1b[32m"));
        assert!(disabled.contains("\x1b[31m"));
        assert_ne!(enabled, disabled);
    }
}
