use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::{
    config::{CliOptions, Config},
    model::{playlist::Playlist, show_list::ShowList},
};

mod config;
mod constants;
mod error;
mod player;
mod utils;

mod model;

fn run(config: Config) -> Result<()> {
    let Config {
        library_config,
        playlist_config,
        filter_string,
        list,
        ..
    } = config;

    let mut shows = ShowList::try_from(&library_config)?;
    shows.filter(&filter_string);
    let enabled: Vec<_> = shows.enabled_shows().map(|show| show.name.as_str()).collect();
    log::info!("`{}` enabled: {}", filter_string, enabled.join(", "));
    if list {
        println!("{}", shows.shortcuts()?);
        return Ok(());
    }

    let mut episodes = shows.random_episodes(playlist_config.count)?;
    if let Some(dir) = &playlist_config.copy_dir {
        episodes = episodes
            .iter()
            .map(|episode| {
                println!("Copying {}", utils::file_name_lossy(episode));
                utils::copy_into(episode, dir)
            })
            .collect::<Result<_>>()?;
    }

    let playlist_path = playlist_config.playlist_path();
    Playlist::new(episodes).save(&playlist_path)?;
    if playlist_config.play {
        player::launch(&playlist_config.player, &playlist_path)?;
    }

    Ok(())
}

fn load_config(cli_options: CliOptions) -> Result<Config> {
    let config = Config::try_from_file(cli_options.config_file.as_deref())?;
    let default_options = CliOptions::try_from_args(&config.default_args)?;

    Ok(config.merge_with_cli(default_options.followed_by(cli_options)))
}

fn main() {
    let cli_options = CliOptions::parse();
    let _ = if cli_options.log_stderr {
        simple_logging::log_to_stderr(log::LevelFilter::max());
        Ok(())
    } else {
        simple_logging::log_to_file(
            cli_options.log_file.clone().unwrap_or_else(|| {
                dirs::cache_dir()
                    .unwrap_or(PathBuf::from("."))
                    .join(constants::DEFAULT_LOG_FILE)
            }),
            log::LevelFilter::max(),
        )
    };

    if let Err(e) = load_config(cli_options).and_then(run) {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
