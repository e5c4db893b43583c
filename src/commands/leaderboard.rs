use arena_views::ViewState;
use colored::Colorize;

use super::App;

pub async fn show(app: &App, limit: Option<u32>) -> anyhow::Result<()> {
    let leaderboard = app.leaderboard();

    let state = match limit {
        Some(limit) => leaderboard.load_with_limit(limit).await,
        None => leaderboard.load().await,
    };

    let entries = match state {
        ViewState::Ready(entries) => entries,
        ViewState::Failed(message) => anyhow::bail!(message),
        ViewState::Loading => Vec::new(),
    };

    for entry in entries {
        let rank = format!("{:>3}.", entry.rank);
        let rank = match entry.rank {
            1 => rank.yellow().bold(),
            2 | 3 => rank.bold(),
            _ => rank.normal(),
        };

        println!(
            "{} {:<20} {:>7} {}",
            rank,
            entry.username,
            entry.trophies,
            entry.clan_tag.unwrap_or_default().bright_black()
        );
    }

    Ok(())
}
