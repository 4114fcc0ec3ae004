use anyhow::Result;
use rand::seq::SliceRandom;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    config::{LibraryConfig, ShowEntry},
    constants,
    model::{
        shortcut::{Filter, Group, Shortcut},
        show::Show,
    },
};

// groups that (indirectly) replay themselves recurse forever,
// test builds trip this instead of overflowing the stack
#[cfg(test)]
const MAX_GROUP_DEPTH: usize = 64;

/// All known shows plus the filters and groups that toggle them.
/// Both maps are ordered by key, so shortcuts are tried in lexicographic order.
#[derive(Debug, Default)]
pub struct ShowList {
    shows: BTreeMap<String, Show>,
    shortcuts: BTreeMap<String, Shortcut>,
}

/// Tokens starting with `-` disable, everything else (even "") enables.
pub fn is_enabling(token: &str) -> bool {
    !token.starts_with(constants::DISABLE_MARKER)
}

fn is_all(token: &str) -> bool {
    token.strip_prefix(constants::DISABLE_MARKER).unwrap_or(token) == constants::ALL_TOKEN
}

impl TryFrom<&LibraryConfig> for ShowList {
    type Error = anyhow::Error;

    // groups go in last, so they replace show filters with the same key
    fn try_from(config: &LibraryConfig) -> Result<Self> {
        let mut list = Self::new();
        for ShowEntry { name, filter } in config.shows.iter() {
            list.add_show(name, filter.as_deref(), &config.shows_dir)?;
        }
        for (key, filter_string) in config.groups.iter() {
            list.add_group(key, filter_string)?;
        }

        Ok(list)
    }
}

impl ShowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a show living in `<base_path>/<name>`, and a filter for it if `filter` is given.
    pub fn add_show(
        &mut self,
        name: &str,
        filter: Option<&str>,
        base_path: impl AsRef<Path>,
    ) -> Result<&mut Self> {
        self.shows.insert(name.to_string(), Show::new(name, base_path));
        match filter {
            Some(key) => self.add_filter(key, vec![name.to_string()]),
            None => Ok(self),
        }
    }

    // an existing shortcut with the same key is silently replaced
    pub fn add_filter(&mut self, key: &str, shows: Vec<String>) -> Result<&mut Self> {
        let filter = Filter::try_new(key, shows)?;
        self.shortcuts.insert(key.to_string(), Shortcut::Filter(filter));

        Ok(self)
    }

    // an existing shortcut with the same key is silently replaced
    pub fn add_group(&mut self, key: &str, filter_string: &str) -> Result<&mut Self> {
        let group = Group::try_new(key, filter_string)?;
        self.shortcuts.insert(key.to_string(), Shortcut::Group(group));

        Ok(self)
    }

    pub fn show(&self, name: &str) -> Option<&Show> {
        self.shows.get(name)
    }

    pub fn enabled_shows(&self) -> impl Iterator<Item = &Show> {
        self.shows.values().filter(|show| show.is_enabled())
    }

    /// Enables and disables shows according to the whitespace-separated tokens
    /// of `filter_string`, processed left to right.
    ///
    /// `all` and `-all` toggle every show. Any other token is handed to the first
    /// shortcut (by key) that matches it: a filter toggles its shows, a group
    /// replays its own filter string. Tokens nothing matches are ignored.
    pub fn filter(&mut self, filter_string: &str) -> &mut Self {
        self.filter_nested(filter_string, 0);

        self
    }

    fn filter_nested(&mut self, filter_string: &str, depth: usize) {
        #[cfg(test)]
        assert!(
            depth <= MAX_GROUP_DEPTH,
            "groups nested deeper than {} levels",
            MAX_GROUP_DEPTH
        );

        for token in filter_string.split_whitespace() {
            let enable = is_enabling(token);
            if is_all(token) {
                log::debug!("`{}`: setting all shows to enabled={}", token, enable);
                for show in self.shows.values_mut() {
                    show.enable(enable);
                }
                continue;
            }

            let replay = match self.shortcuts.iter().find(|(_, sc)| sc.matches(token)) {
                Some((key, Shortcut::Filter(filter))) => {
                    log::debug!("`{}`: filter `{}`, enabled={}", token, key, enable);
                    filter.apply(&mut self.shows, enable);
                    continue;
                }
                Some((key, Shortcut::Group(group))) => {
                    log::debug!("`{}`: group `{}` -> `{}`", token, key, group.filter_string);
                    group.filter_string.clone()
                }
                None => {
                    log::debug!("`{}`: no matching filter, ignored", token);
                    continue;
                }
            };
            self.filter_nested(&replay, depth + 1);
        }
    }

    /// Up to `count` distinct episodes of enabled shows, in random order.
    pub fn random_episodes(&mut self, count: usize) -> Result<Vec<PathBuf>> {
        let mut pool = Vec::new();
        for show in self.shows.values_mut().filter(|show| show.is_enabled()) {
            pool.extend_from_slice(show.episodes()?);
        }
        log::info!("drawing {} of {} episode(s)", count.min(pool.len()), pool.len());

        pool.shuffle(&mut rand::rng());
        pool.truncate(count);

        Ok(pool)
    }

    /// Human-readable list of group keys followed by every filter and the shows it toggles.
    pub fn shortcuts(&mut self) -> Result<String> {
        let mut groups = Vec::new();
        let mut filters = Vec::new();
        for (key, shortcut) in self.shortcuts.iter() {
            match shortcut {
                Shortcut::Group(_) => groups.push(key.as_str()),
                Shortcut::Filter(filter) => {
                    let mut labels = Vec::new();
                    for name in filter.shows.iter() {
                        if let Some(show) = self.shows.get_mut(name) {
                            labels.push(show.describe()?);
                        }
                    }
                    filters.push(format!("{:>20} : {}", key, labels.join(", ")));
                }
            }
        }

        Ok(format!(
            "{:>23}{}\n\n{}",
            "Groups : ",
            groups.join(" "),
            filters.join("\n")
        ))
    }
}
