// src/main.rs
use nexus_scoreboard::config::Config;
use nexus_scoreboard::data_fetcher::EspnClient;
use nexus_scoreboard::error::AppError;
use nexus_scoreboard::logging::setup_logging;
use nexus_scoreboard::scheduler::{BoardFrame, RefreshOrchestrator, SystemClock};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::load().await?;

    // The guard must outlive the loop so buffered log lines are flushed
    let (log_file_path, _guard) = setup_logging(&config).await?;
    info!(
        "{} v{} starting, logging to {}",
        nexus_scoreboard::NAME,
        nexus_scoreboard::VERSION,
        log_file_path
    );
    info!("Using API domain {}", config.api_domain);

    let source = EspnClient::from_config(&config)?;
    log_favorite_teams(&source, &config).await;
    let mut orchestrator = RefreshOrchestrator::new(source, SystemClock, &config);

    tokio::spawn(log_frames(orchestrator.subscribe()));

    orchestrator.run().await;
    Ok(())
}

/// Resolves configured favorite team ids to names so typos show up at startup
async fn log_favorite_teams(client: &EspnClient, config: &Config) {
    for (sport, sport_config) in config.sports.iter().filter(|(_, s)| s.enabled) {
        for league in &sport_config.leagues {
            if league.favorite_team_ids.is_empty() {
                continue;
            }
            let teams = match client.fetch_teams(sport, &league.id).await {
                Ok(teams) => teams,
                Err(e) => {
                    warn!("Could not load teams for {}/{}: {}", sport, league.id, e);
                    continue;
                }
            };
            for team_id in &league.favorite_team_ids {
                match teams.find_team(team_id) {
                    Some(team) => info!(
                        "Favorite team in {}/{}: {} (id {})",
                        sport,
                        league.id,
                        team.display_name.as_deref().unwrap_or("unnamed"),
                        team_id
                    ),
                    None => warn!(
                        "Favorite team id {} not found in {}/{}",
                        team_id, sport, league.id
                    ),
                }
            }
        }
    }
}

/// Stand-in board consumer until a renderer subscribes to the frames
async fn log_frames(mut frames: watch::Receiver<Option<BoardFrame>>) {
    while frames.changed().await.is_ok() {
        let Some(frame) = frames.borrow_and_update().clone() else {
            continue;
        };
        info!(
            "Would now display {:?} for mode {} ({} games)",
            frame.boards,
            frame.mode,
            frame.games.len()
        );
        for game in &frame.games {
            debug!(
                "  {} {} [{}] {}",
                game.league,
                game.matchup(),
                game.status_detail,
                game.score_line().unwrap_or_default()
            );
        }
    }
}
