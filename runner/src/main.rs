mod commands;
mod terminal_broadcaster;

use std::path::PathBuf;

use clap::Parser;
use snake_common::config::get_config_manager;
use snake_common::games::snake::{GameController, SnakeSessionSettings};
use snake_common::log;
use snake_common::logger::{self, LogTarget};
use snake_common::scores::HighScoreStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use commands::{PlayerCommand, parse_command};
use terminal_broadcaster::TerminalBroadcaster;

#[derive(Parser)]
#[command(name = "rainbow_snake", about = "Snake on a 20x20 grid, one command per line")]
struct Args {
    /// YAML config file; defaults are used when it does not exist.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Let the bot play one game and exit.
    #[arg(long)]
    autopilot: bool,

    /// Overrides the seed from the config file.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = args.use_log_prefix.then(|| "Snake".to_string());
    logger::init_logger(prefix, LogTarget::Stderr);

    let config = get_config_manager(args.config.clone()).get_config()?;
    let mut settings = SnakeSessionSettings::from(&config);
    settings.autopilot = args.autopilot;
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    let store = HighScoreStore::from_yaml_file(&config.high_score_file);
    match store.load() {
        Ok(record) => log!("Current high score: {}", record.high_score),
        Err(e) => log!("High score unavailable: {}", e),
    }

    let (game_over_tx, mut game_over_rx) = mpsc::unbounded_channel();
    let broadcaster = TerminalBroadcaster::new(game_over_tx);
    let mut controller = GameController::new(settings, broadcaster, store);

    println!("w/a/s/d to steer, p to pause, r for a new game, q to quit (press Enter after each)");
    controller.start().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(_summary) = game_over_rx.recv() => {
                if args.autopilot {
                    break;
                }
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        log!("Failed to read input: {}", e);
                        break;
                    }
                };

                let Some(command) = parse_command(&line) else {
                    continue;
                };

                let result = match command {
                    PlayerCommand::Turn(direction) => {
                        controller.change_direction(direction).await;
                        Ok(())
                    }
                    PlayerCommand::TogglePause => controller.toggle_pause().await,
                    PlayerCommand::Start => controller.start().await,
                    PlayerCommand::Reset => {
                        controller.reset().await;
                        Ok(())
                    }
                    PlayerCommand::Quit => break,
                };

                if let Err(e) = result {
                    log!("{}", e);
                }
            }
        }
    }

    controller.shutdown();
    log!("Bye");
    Ok(())
}
