use std::fmt::{self, Display, Formatter};

#[derive(Debug)]
pub enum MyError {
    Config(String),
    File(String),
    Pattern(String),
    Player(String),
}

impl Display for MyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "ConfigError: {}", e),
            Self::File(e) => write!(f, "FileSystemError: {}", e),
            Self::Pattern(e) => write!(f, "PatternError: {}", e),
            Self::Player(e) => write!(f, "PlayerError: {}", e),
        }
    }
}

impl std::error::Error for MyError {}
