use anyhow::{Result, anyhow, bail};
use clap::Parser;
use std::{
    fs,
    iter,
    path::{Path, PathBuf},
};
use toml::{Table, Value};

use crate::{constants, error::MyError};

#[derive(Debug, Default, Parser)]
#[command(version, about, author, long_about = None)]
pub struct CliOptions {
    /// Filters applied left to right, e.g. `-all qi fav` (must come after the options;
    /// put `--` before them if the first one looks like a flag, e.g. `-- -q`).
    #[arg(allow_hyphen_values = true)]
    pub filters: Vec<String>,

    /// Number of episodes to put in the playlist (default: 5).
    #[arg(short = 'c', long = "count")]
    pub count: Option<usize>,

    /// Don't launch the player.
    #[arg(short = 'q', long = "no-play")]
    pub no_play: bool,

    /// List all the filters and groups instead of making a playlist.
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Copy the chosen episodes to this directory and create the playlist there.
    #[arg(long = "copy")]
    pub copy_dir: Option<PathBuf>,

    /// Directory containing one subdirectory per show (default: the config's `path`).
    #[arg(short = 'd', long = "dir")]
    pub shows_dir: Option<PathBuf>,

    /// Command used to open the playlist (default: the config's `player`, or the system opener).
    #[arg(long = "player")]
    pub player: Option<String>,

    /// Path to the config file (default: <config_dir>/reruns/reruns.toml).
    #[arg(long = "config")]
    pub config_file: Option<PathBuf>,

    /// Path to the log file (default: <cache_dir>/reruns.log).
    #[arg(long = "log")]
    pub log_file: Option<PathBuf>,

    /// Print logs to stderr (default: false).
    #[arg(long = "stderr")]
    pub log_stderr: bool,
}

#[derive(Debug, PartialEq)]
pub struct ShowEntry {
    pub name: String,
    pub filter: Option<String>,
}

#[derive(Debug)]
pub struct LibraryConfig {
    pub shows_dir: PathBuf,
    pub shows: Vec<ShowEntry>,
    pub groups: Vec<(String, String)>,
}

#[derive(Debug)]
pub struct PlaylistConfig {
    pub count: usize,
    pub file_name: PathBuf,
    pub copy_dir: Option<PathBuf>,
    pub player: String,
    pub play: bool,
}

#[derive(Debug, Default)]
pub struct Config {
    pub library_config: LibraryConfig,
    pub playlist_config: PlaylistConfig,
    // spliced in front of the command line
    pub default_args: Vec<String>,
    pub filter_string: String,
    pub list: bool,
}

impl CliOptions {
    /// Parses `args` as if they were given on the command line.
    /// Options that are needed before the config is read aren't allowed.
    pub fn try_from_args(args: &[String]) -> Result<Self> {
        let argv = iter::once(env!("CARGO_PKG_NAME")).chain(args.iter().map(|a| a.as_str()));
        let opts = Self::try_parse_from(argv)
            .map_err(|e| anyhow!(MyError::Config(format!("default args: {}", e))))?;
        if opts.config_file.is_some() || opts.log_file.is_some() || opts.log_stderr {
            bail!(MyError::Config(
                "default args: `--config`, `--log` and `--stderr` only work on the command line"
                    .into()
            ));
        }

        Ok(opts)
    }

    /// Combines options parsed from the config's default args (`self`) with the ones
    /// from the actual command line. Filters are concatenated, other options
    /// given on the command line win.
    pub fn followed_by(self, later: CliOptions) -> Self {
        let mut filters = self.filters;
        filters.extend(later.filters);

        Self {
            filters,
            count: later.count.or(self.count),
            no_play: self.no_play || later.no_play,
            list: self.list || later.list,
            copy_dir: later.copy_dir.or(self.copy_dir),
            shows_dir: later.shows_dir.or(self.shows_dir),
            player: later.player.or(self.player),
            config_file: later.config_file,
            log_file: later.log_file,
            log_stderr: later.log_stderr,
        }
    }
}

impl TryFrom<Value> for ShowEntry {
    type Error = anyhow::Error;

    fn try_from(v: Value) -> Result<Self> {
        let Value::Table(mut table) = v else {
            bail!(MyError::Config("a show must be a table".into()));
        };
        let name = match table.remove("name") {
            Some(Value::String(name)) => name,
            Some(_) => bail!(MyError::Config("`name` must be a string".into())),
            None => bail!(MyError::Config("key `name` not found in a show".into())),
        };
        let filter = match table.remove("filter") {
            Some(Value::String(filter)) => Some(filter),
            Some(_) => bail!(MyError::Config(format!(
                "`filter` of show `{}` must be a string",
                name
            ))),
            None => None,
        };

        Ok(Self { name, filter })
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            shows_dir: PathBuf::from(constants::DEFAULT_SHOWS_DIR),
            shows: Vec::new(),
            groups: Vec::new(),
        }
    }
}

impl LibraryConfig {
    pub fn try_new(table: &Table) -> Result<Self> {
        let mut config = Self::default();
        for (key, val) in table.iter() {
            match (key.as_str(), val) {
                ("path", Value::String(path)) => {
                    config.shows_dir = path.into();
                }
                ("shows", Value::Array(shows)) => {
                    for show in shows.iter() {
                        config.shows.push(ShowEntry::try_from(show.clone())?);
                    }
                }
                ("groups", Value::Table(groups)) => {
                    for (group, filter_string) in groups.iter() {
                        let Value::String(filter_string) = filter_string else {
                            bail!(MyError::Config(format!(
                                "group `{}` must be a string of filters",
                                group
                            )));
                        };
                        config.groups.push((group.clone(), filter_string.clone()));
                    }
                }
                ("path" | "shows" | "groups", _) => {
                    bail!(MyError::Config(format!("invalid value of key `{}`", key)));
                }
                _ => (),
            }
        }

        Ok(config)
    }
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            count: constants::DEFAULT_COUNT,
            file_name: PathBuf::from(constants::DEFAULT_PLAYLIST_FILE),
            copy_dir: None,
            player: constants::DEFAULT_PLAYER.into(),
            play: true,
        }
    }
}

impl PlaylistConfig {
    pub fn try_new(table: &Table) -> Result<Self> {
        let mut config = Self::default();
        for (key, val) in table.iter() {
            match (key.as_str(), val) {
                ("playlist", Value::String(file_name)) => {
                    config.file_name = file_name.into();
                }
                ("player", Value::String(player)) => {
                    config.player = player.clone();
                }
                ("playlist" | "player", _) => {
                    bail!(MyError::Config(format!("invalid value of key `{}`", key)));
                }
                _ => (),
            }
        }

        Ok(config)
    }

    /// Where the playlist gets written: next to the copies if there are any.
    pub fn playlist_path(&self) -> PathBuf {
        match &self.copy_dir {
            Some(dir) => dir.join(&self.file_name),
            None => self.file_name.clone(),
        }
    }
}

impl Config {
    pub fn try_new(content: impl AsRef<str>) -> Result<Self> {
        let table = content
            .as_ref()
            .parse::<Table>()
            .map_err(|e| MyError::Config(e.to_string()))?;
        let library_config = LibraryConfig::try_new(&table)?;
        let playlist_config = PlaylistConfig::try_new(&table)?;
        let default_args = match table.get("args") {
            Some(Value::String(args)) => args.split_whitespace().map(String::from).collect(),
            Some(_) => bail!(MyError::Config("`args` must be a string".into())),
            None => Vec::new(),
        };

        Ok(Self {
            library_config,
            playlist_config,
            default_args,
            ..Default::default()
        })
    }

    pub fn try_from_file(path: Option<&Path>) -> Result<Self> {
        let default_path = dirs::config_dir()
            .ok_or(anyhow!("no config dir found on the system"))?
            .join(constants::DEFAULT_CONFIG_DIR)
            .join(constants::DEFAULT_CONFIG_FILE);
        let path = path.unwrap_or(&default_path);
        let content = fs::read_to_string(path)
            .map_err(|e| MyError::Config(format!("{}: {}", path.display(), e)))?;
        log::info!("loaded config from {}", path.display());

        Self::try_new(content)
    }

    pub fn merge_with_cli(self, cli_opts: CliOptions) -> Self {
        let library_config = LibraryConfig {
            shows_dir: cli_opts.shows_dir.unwrap_or(self.library_config.shows_dir),
            ..self.library_config
        };
        let playlist_config = PlaylistConfig {
            count: cli_opts.count.unwrap_or(self.playlist_config.count),
            file_name: self.playlist_config.file_name,
            copy_dir: cli_opts.copy_dir.or(self.playlist_config.copy_dir),
            player: cli_opts.player.unwrap_or(self.playlist_config.player),
            play: self.playlist_config.play && !cli_opts.no_play,
        };

        Self {
            library_config,
            playlist_config,
            default_args: self.default_args,
            filter_string: cli_opts.filters.join(" "),
            list: cli_opts.list,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CONFIG: &str = r#"
        path = "/media/tv"
        args = "-c 10 -all fav"
        player = "vlc"

        [[shows]]
        name = "Whose Line Is It Anyway"
        filter = "wliia"

        [[shows]]
        name = "Extras"

        [groups]
        fav = "-all wliia qi"
    "#;

    fn cli(args: &[&str]) -> CliOptions {
        CliOptions::try_parse_from(iter::once("reruns").chain(args.iter().cloned())).unwrap()
    }

    #[test]
    fn parse_config() {
        let config = Config::try_new(CONFIG).unwrap();
        let library = &config.library_config;
        assert_eq!(library.shows_dir, PathBuf::from("/media/tv"));
        assert_eq!(
            library.shows,
            [
                ShowEntry {
                    name: "Whose Line Is It Anyway".into(),
                    filter: Some("wliia".into()),
                },
                ShowEntry {
                    name: "Extras".into(),
                    filter: None,
                },
            ]
        );
        assert_eq!(
            library.groups,
            [(String::from("fav"), String::from("-all wliia qi"))]
        );
        assert_eq!(config.default_args, ["-c", "10", "-all", "fav"]);
        assert_eq!(config.playlist_config.player, "vlc");
        assert_eq!(
            config.playlist_config.file_name,
            PathBuf::from(constants::DEFAULT_PLAYLIST_FILE)
        );
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::try_new("").unwrap();
        assert_eq!(
            config.library_config.shows_dir,
            PathBuf::from(constants::DEFAULT_SHOWS_DIR)
        );
        assert!(config.library_config.shows.is_empty());
        assert_eq!(config.playlist_config.count, constants::DEFAULT_COUNT);
        assert!(config.default_args.is_empty());
    }

    #[test]
    fn malformed_config() {
        for content in [
            "path = 3",
            "args = [\"-all\"]",
            "[[shows]]\nfilter = \"x\"",
            "[[shows]]\nname = 1",
            "[groups]\nfav = 2",
            "player = 3",
            "playlist = [\"a.m3u\"]",
            "this is not toml",
        ] {
            let err = Config::try_new(content).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<MyError>(), Some(MyError::Config(_))),
                "{}",
                content
            );
        }
    }

    #[test]
    fn hyphenated_filters() {
        let opts = cli(&["-c", "3", "-q", "-all", "qi", "-bb"]);
        assert_eq!(opts.count, Some(3));
        assert!(opts.no_play);
        assert!(!opts.list);
        assert_eq!(opts.filters, ["-all", "qi", "-bb"]);
    }

    #[test]
    fn command_line_follows_default_args() {
        let config = Config::try_new(CONFIG).unwrap();
        let defaults = CliOptions::try_from_args(&config.default_args).unwrap();
        let opts = defaults.followed_by(cli(&["--copy", "/mnt/usb", "-l", "qi"]));
        assert_eq!(opts.filters, ["-all", "fav", "qi"]);
        assert_eq!(opts.count, Some(10));

        let config = config.merge_with_cli(opts);
        assert_eq!(config.filter_string, "-all fav qi");
        assert!(config.list);
        assert_eq!(config.playlist_config.count, 10);
        assert_eq!(
            config.playlist_config.playlist_path(),
            PathBuf::from("/mnt/usb").join(constants::DEFAULT_PLAYLIST_FILE)
        );
    }

    #[test]
    fn command_line_overrides_config() {
        let config = Config::try_new(CONFIG).unwrap();
        let config =
            config.merge_with_cli(cli(&["-c", "2", "-q", "-d", "/tmp/tv", "--player", "mpv"]));
        assert_eq!(config.playlist_config.count, 2);
        assert!(!config.playlist_config.play);
        assert_eq!(config.playlist_config.player, "mpv");
        assert_eq!(config.library_config.shows_dir, PathBuf::from("/tmp/tv"));
        assert_eq!(
            config.playlist_config.playlist_path(),
            PathBuf::from(constants::DEFAULT_PLAYLIST_FILE)
        );
        assert!(config.filter_string.is_empty());
    }

    #[test]
    fn bad_default_args() {
        for args in [
            vec!["--count", "many"],
            vec!["--stderr"],
            vec!["--log", "/tmp/reruns.log"],
            vec!["--config", "other.toml", "qi"],
        ] {
            let args: Vec<String> = args.into_iter().map(String::from).collect();
            let err = CliOptions::try_from_args(&args).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<MyError>(), Some(MyError::Config(_))),
                "{:?}",
                args
            );
        }
    }

    #[test]
    fn flag_like_filters_after_separator() {
        let opts = cli(&["-q"]);
        assert!(opts.no_play);
        assert!(opts.filters.is_empty());

        let opts = cli(&["--", "-q", "-l"]);
        assert!(!opts.no_play && !opts.list);
        assert_eq!(opts.filters, ["-q", "-l"]);
    }
}
