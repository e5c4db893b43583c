use arena_core::{Clan, ClanQuery};
use arena_views::{ClanDraft, ViewState};
use colored::Colorize;

use super::{report, App};

pub async fn list(app: &App, search: Option<String>, tag: Option<String>) -> anyhow::Result<()> {
    let clans = app.clans();

    let clans = match clans.set_query(ClanQuery { search, tag }).await {
        ViewState::Loading => clans.refresh().await,
        state => state,
    };

    let clans = match clans {
        ViewState::Ready(clans) => clans,
        ViewState::Failed(message) => anyhow::bail!(message),
        ViewState::Loading => Vec::new(),
    };

    if clans.is_empty() {
        println!("{}", "No clans found".bright_black());
    }

    for clan in &clans {
        print_clan(clan);
    }

    Ok(())
}

pub async fn show(app: &App, id: u32) -> anyhow::Result<()> {
    match app.clans().clan(id).await {
        ViewState::Ready(clan) => print_clan(&clan),
        ViewState::Failed(message) => anyhow::bail!(message),
        ViewState::Loading => {}
    }

    Ok(())
}

pub async fn create(
    app: &App,
    name: String,
    tag: String,
    description: Option<String>,
) -> anyhow::Result<()> {
    let draft = ClanDraft {
        name,
        tag,
        description,
    };

    let clan = app.clans().create(&draft).await?;
    println!("Created {} {}", clan.name.bold(), clan.tag.cyan());

    Ok(())
}

pub async fn join(app: &App, id: u32) -> anyhow::Result<()> {
    report(app.clans().join(id).await, "You joined the clan")
}

fn print_clan(clan: &Clan) {
    println!(
        "{:>5} {:<24} {:<12} {:>3} members {:>7} trophies",
        format!("#{}", clan.id).bright_black(),
        clan.name.bold(),
        clan.tag.cyan(),
        clan.members_count,
        clan.trophies
    );

    if let Some(description) = clan.description.as_deref().filter(|d| !d.is_empty()) {
        println!("      {}", description.bright_black());
    }
}
