use anyhow::Result;
use regex::Regex;
use std::collections::BTreeMap;

use crate::{error::MyError, model::show::Show};

// enables or disables a fixed set of shows
// matches iff the token starts with the key, optionally after a `-`
#[derive(Clone, Debug)]
pub struct Filter {
    regex: Regex,
    pub shows: Vec<String>,
}

// replays `filter_string` against the whole show list
// matches iff the token starts with a match of the key, which is a regex
#[derive(Clone, Debug)]
pub struct Group {
    regex: Regex,
    pub filter_string: String,
}

#[derive(Clone, Debug)]
pub enum Shortcut {
    Filter(Filter),
    Group(Group),
}

impl Filter {
    pub fn try_new(key: &str, shows: Vec<String>) -> Result<Self> {
        let regex = Regex::new(&format!("^-?{}", regex::escape(key)))
            .map_err(|e| MyError::Pattern(e.to_string()))?;

        Ok(Self { regex, shows })
    }

    pub fn matches(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }

    // names with no matching show are skipped
    pub fn apply(&self, shows: &mut BTreeMap<String, Show>, enable: bool) {
        for name in self.shows.iter() {
            if let Some(show) = shows.get_mut(name) {
                show.enable(enable);
            }
        }
    }
}

impl Group {
    pub fn try_new(key: &str, filter_string: impl Into<String>) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})", key))
            .map_err(|e| MyError::Pattern(format!("group `{}`: {}", key, e)))?;

        Ok(Self {
            regex,
            filter_string: filter_string.into(),
        })
    }

    pub fn matches(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }
}

impl Shortcut {
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Self::Filter(filter) => filter.matches(token),
            Self::Group(group) => group.matches(token),
        }
    }
}
