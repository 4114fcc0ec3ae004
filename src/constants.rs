pub const DEFAULT_COUNT: usize = 5;
pub const DEFAULT_SHOWS_DIR: &str = ".";
pub const DEFAULT_PLAYLIST_FILE: &str = "playlist.m3u";
pub const DEFAULT_CONFIG_DIR: &str = "reruns";
pub const DEFAULT_CONFIG_FILE: &str = "reruns.toml";
pub const DEFAULT_LOG_FILE: &str = "reruns.log";
#[cfg(target_os = "macos")]
pub const DEFAULT_PLAYER: &str = "open";
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_PLAYER: &str = "xdg-open";
pub const EPISODE_EXTS: [&str; 6] = ["avi", "mpg", "mpeg", "mp4", "mkv", "vob"];
pub const ALL_TOKEN: &str = "all";
pub const DISABLE_MARKER: char = '-';
