use anyhow::{Result, bail};
use jwalk::{Parallelism, WalkDir};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{constants, error::MyError};

lazy_static! {
    // matches the end of the whole path, so `weirdavi` counts as an episode too
    static ref EPISODE_RE: Regex =
        Regex::new(&format!("({})$", constants::EPISODE_EXTS.join("|"))).unwrap();
}

pub fn is_episode(path: &Path) -> bool {
    EPISODE_RE.is_match(&path.to_string_lossy())
}

/// Last component of `path`, or an empty string if there is none.
pub fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Returns paths of all episode files in `root_dir` and its subdirectories,
/// in directory-listing order.
/// Symlinks are followed and cycles among them are not detected.
pub fn walk_dir(root_dir: &Path) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(root_dir)
        .map_err(|e| MyError::File(format!("{}: {}", root_dir.display(), e)))?;
    if !meta.is_dir() {
        bail!(MyError::File(format!(
            "{}: not a directory",
            root_dir.display()
        )));
    }

    let list = WalkDir::new(root_dir)
        .parallelism(Parallelism::Serial)
        .follow_links(true)
        .skip_hidden(false);
    let mut files = Vec::new();
    for entry in list {
        let entry = entry.map_err(|e| MyError::File(e.to_string()))?;
        let path = entry.path();
        // jwalk hands out unreadable directories as Ok entries
        if let Some(e) = &entry.read_children_error {
            bail!(MyError::File(format!("{}: {}", path.display(), e)));
        }
        if entry.file_type.is_file() && is_episode(&path) {
            files.push(path);
        }
    }
    log::info!("found {} episode(s) in {}", files.len(), root_dir.display());

    Ok(files)
}

fn same_file(a: &Path, b: &Path) -> Result<bool> {
    let canonical = |path: &Path| {
        fs::canonicalize(path).map_err(|e| MyError::File(format!("{}: {}", path.display(), e)))
    };

    Ok(canonical(a)? == canonical(b)?)
}

/// Copies `episode` into `dir`, keeping its file name.
/// Returns the path of the copy.
pub fn copy_into(episode: &Path, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| MyError::File(format!("{}: {}", dir.display(), e)))?;
    let new_path = dir.join(file_name_lossy(episode));
    // fs::copy truncates the target first, which would empty a file copied onto itself
    if new_path.exists() && same_file(episode, &new_path)? {
        bail!(MyError::File(format!(
            "{} is already in {}",
            episode.display(),
            dir.display()
        )));
    }
    fs::copy(episode, &new_path).map_err(|e| {
        MyError::File(format!(
            "copying {} to {}: {}",
            episode.display(),
            new_path.display(),
            e
        ))
    })?;
    log::info!("copied {} to {}", episode.display(), new_path.display());

    Ok(new_path)
}
