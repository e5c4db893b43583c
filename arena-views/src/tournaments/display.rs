use arena_core::{PrimaryKey, Tournament, TournamentStatus};
use chrono::{DateTime, Utc};

/// Which membership control a tournament offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipAction {
    /// Finished tournaments offer neither join nor leave
    Hidden,
    Join,
    /// Join, but every seat is taken
    Full,
    Leave,
}

/// The join/leave control of a tournament, as it should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordance {
    pub action: MembershipAction,
    /// A join or leave request of this view is in flight
    pub busy: bool,
}

impl Affordance {
    pub fn for_tournament(tournament: &Tournament, busy: bool) -> Self {
        let action = if tournament.status == TournamentStatus::Past {
            MembershipAction::Hidden
        } else if tournament.is_joined {
            MembershipAction::Leave
        } else if tournament.is_full() {
            MembershipAction::Full
        } else {
            MembershipAction::Join
        };

        Self { action, busy }
    }

    pub fn is_visible(&self) -> bool {
        self.action != MembershipAction::Hidden
    }

    pub fn is_enabled(&self) -> bool {
        !self.busy && matches!(self.action, MembershipAction::Join | MembershipAction::Leave)
    }

    /// The label of the control, or [None] if it is not shown
    pub fn label(&self) -> Option<&'static str> {
        if !self.is_visible() {
            return None;
        }

        if self.busy {
            return Some("...");
        }

        match self.action {
            MembershipAction::Join => Some("join"),
            MembershipAction::Full => Some("full"),
            MembershipAction::Leave => Some("leave"),
            MembershipAction::Hidden => None,
        }
    }
}

/// A tournament mapped for display in a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentRow {
    pub id: PrimaryKey,
    pub name: String,
    pub date: String,
    pub mode: &'static str,
    pub status: TournamentStatus,
    pub status_label: &'static str,
    pub occupancy: String,
    pub prize: String,
    pub affordance: Affordance,
}

impl TournamentRow {
    pub fn new(tournament: &Tournament, busy: bool) -> Self {
        Self {
            id: tournament.id,
            name: tournament.name.clone(),
            date: date_label(&tournament.date),
            mode: tournament.mode.as_str(),
            status: tournament.status,
            status_label: tournament.status.label(),
            occupancy: occupancy_label(tournament.participants_count, tournament.max_players),
            prize: prize_label(tournament.prize),
            affordance: Affordance::for_tournament(tournament, busy),
        }
    }
}

pub fn date_label(date: &DateTime<Utc>) -> String {
    date.format("%d.%m.%Y %H:%M").to_string()
}

pub fn prize_label(prize: u32) -> String {
    if prize > 0 {
        format!("{} coins", prize)
    } else {
        "—".to_string()
    }
}

pub fn occupancy_label(participants: u32, max_players: u32) -> String {
    format!("{} / {}", participants, max_players)
}
