use arena_core::{TournamentMode, TournamentStatus};
use arena_views::{
    date_label, prize_label, DetailState, ModeFilter, StatusFilter, TournamentDraft,
    TournamentFilters, TournamentRow, ViewState,
};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use colored::{ColoredString, Colorize};

use super::{report, App};
use crate::prompt::TerminalConfirm;

pub async fn list(app: &App, status: StatusFilter, mode: ModeFilter) -> anyhow::Result<()> {
    let list = app.tournaments();

    // Unchanged filters don't fetch on their own
    let rows = match list.set_filters(TournamentFilters { status, mode }).await {
        ViewState::Loading => list.refresh().await,
        rows => rows,
    };

    let rows = match rows {
        ViewState::Ready(rows) => rows,
        ViewState::Failed(message) => anyhow::bail!(message),
        ViewState::Loading => Vec::new(),
    };

    if rows.is_empty() {
        println!("{}", "No tournaments found".bright_black());
    }

    for row in rows {
        print_row(&row);
    }

    Ok(())
}

pub async fn show(app: &App, id: u32) -> anyhow::Result<()> {
    let detail = app.tournament(id);

    let view = match detail.load().await {
        DetailState::Ready(view) => view,
        DetailState::NotFound => anyhow::bail!("Tournament #{} does not exist", id),
        DetailState::Failed(message) => anyhow::bail!(message),
        DetailState::Loading => return Ok(()),
    };

    let tournament = &view.tournament;

    println!("{} {}", format!("#{}", tournament.id).bright_black(), tournament.name.bold());
    println!("Status:  {}", status_label(tournament.status));
    println!("Date:    {}", date_label(&tournament.date));
    println!("Mode:    {}", tournament.mode.as_str());
    println!("Prize:   {}", prize_label(tournament.prize));
    println!("Players: {}", view.occupancy());

    if let Some(label) = view.affordance(false).label() {
        println!("Action:  {}", label);
    }

    println!();

    if view.participants.is_empty() {
        println!("{}", "Nobody has joined yet".bright_black());
    }

    for (i, participant) in view.participants.iter().enumerate() {
        let tag = participant.clash_tag.as_deref().unwrap_or_default();

        println!(
            "{:>3}. {} {} {}",
            i + 1,
            participant.username,
            tag.bright_black(),
            date_label(&participant.joined_at).bright_black()
        );
    }

    Ok(())
}

pub async fn join(app: &App, id: u32) -> anyhow::Result<()> {
    let detail = app.tournament(id);
    ensure_loaded(detail.load().await)?;

    report(detail.join().await, "You joined the tournament")
}

pub async fn leave(app: &App, id: u32, yes: bool) -> anyhow::Result<()> {
    let detail = app.tournament(id);
    ensure_loaded(detail.load().await)?;

    let outcome = if yes {
        detail.leave(&|_: &str| true).await
    } else {
        detail.leave(&TerminalConfirm).await
    };

    report(outcome, "You left the tournament")
}

pub async fn create(
    app: &App,
    name: String,
    date: &str,
    prize: i64,
    mode: TournamentMode,
    max_players: i64,
) -> anyhow::Result<()> {
    let draft = TournamentDraft {
        name,
        date: parse_local_date(date),
        prize,
        mode,
        max_players,
    };

    let tournament = app.tournament_form().submit(&draft).await?;
    println!(
        "Created {} {}",
        format!("#{}", tournament.id).bright_black(),
        tournament.name.bold()
    );

    Ok(())
}

fn ensure_loaded(state: DetailState) -> anyhow::Result<()> {
    match state {
        DetailState::Ready(_) | DetailState::Loading => Ok(()),
        DetailState::NotFound => anyhow::bail!("That tournament does not exist"),
        DetailState::Failed(message) => anyhow::bail!(message),
    }
}

fn print_row(row: &TournamentRow) {
    let action = row.affordance.label().unwrap_or_default();

    println!(
        "{:>5} {:<28} {:<16} {:<3} {:<11} {:>7} {:>12} {}",
        format!("#{}", row.id).bright_black(),
        row.name,
        row.date,
        row.mode,
        status_label(row.status),
        row.occupancy,
        row.prize,
        action.cyan()
    );
}

fn status_label(status: TournamentStatus) -> ColoredString {
    match status {
        TournamentStatus::Future => status.label().blue(),
        TournamentStatus::Active => status.label().green(),
        TournamentStatus::Past => status.label().bright_black(),
    }
}

/// Reads a local time as written by the user. An unreadable date counts as missing.
fn parse_local_date(value: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M").ok()?;

    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|date| date.with_timezone(&Utc))
}
