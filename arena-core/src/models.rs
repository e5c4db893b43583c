use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The type used for identifiers by the remote service.
pub type PrimaryKey = u32;

/// An account on the platform, as returned by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: PrimaryKey,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// The in-game player tag, if the user linked one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clash_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Where a tournament is in its lifecycle.
/// This is derived by the server from the tournament date and is never computed locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    Future,
    Active,
    Past,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TournamentMode {
    #[serde(rename = "1v1")]
    OneVsOne,
    #[serde(rename = "2v2")]
    TwoVsTwo,
}

/// A tournament summary.
/// Note: `participants_count` and `is_joined` are only valid as of the last fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: PrimaryKey,
    pub name: String,
    pub date: DateTime<Utc>,
    pub mode: TournamentMode,
    pub max_players: u32,
    pub prize: u32,
    pub status: TournamentStatus,
    #[serde(default)]
    pub participants_count: u32,
    #[serde(default)]
    pub is_joined: bool,
    /// The id of the user that created the tournament
    pub created_by: PrimaryKey,
}

/// A user's membership within one tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: PrimaryKey,
    pub username: String,
    #[serde(default)]
    pub clash_tag: Option<String>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clan {
    pub id: PrimaryKey,
    pub name: String,
    /// A unique tag like `#ABC123`
    pub tag: String,
    #[serde(default)]
    pub description: Option<String>,
    pub members_count: u32,
    pub trophies: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub trophies: u32,
    #[serde(default)]
    pub clan_tag: Option<String>,
}

/// The response of a successful login or registration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: Option<Identity>,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTournament {
    pub name: String,
    pub date: DateTime<Utc>,
    pub prize: u32,
    pub mode: TournamentMode,
    pub max_players: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewClan {
    pub name: String,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Server-side filters for the tournament list. `None` means the filter is not sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TournamentQuery {
    pub status: Option<TournamentStatus>,
    pub mode: Option<TournamentMode>,
}

/// Server-side filters for the clan list. Empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClanQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
}

impl TournamentStatus {
    /// The value used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Future => "future",
            Self::Active => "active",
            Self::Past => "past",
        }
    }

    /// A human friendly label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Future => "upcoming",
            Self::Active => "in progress",
            Self::Past => "finished",
        }
    }
}

impl TournamentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneVsOne => "1v1",
            Self::TwoVsTwo => "2v2",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "1v1" => Some(Self::OneVsOne),
            "2v2" => Some(Self::TwoVsTwo),
            _ => None,
        }
    }
}

impl Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for TournamentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Tournament {
    /// Returns true if no more players can join
    pub fn is_full(&self) -> bool {
        self.participants_count >= self.max_players
    }
}

impl TournamentQuery {
    /// Returns the query parameters, leaving out any filter that isn't set
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![];

        if let Some(status) = self.status {
            params.push(("status_filter".to_string(), status.as_str().to_string()));
        }

        if let Some(mode) = self.mode {
            params.push(("mode_filter".to_string(), mode.as_str().to_string()));
        }

        params
    }
}

impl ClanQuery {
    pub fn to_params(&self) -> Vec<(String, String)> {
        let fields = [("search", &self.search), ("tag", &self.tag)];

        fields
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_deserialization() {
        let tournament: Tournament = serde_json::from_str(
            r#"{
                "id": 42,
                "name": "Friday Cup",
                "date": "2030-05-01T18:00:00Z",
                "mode": "2v2",
                "max_players": 8,
                "prize": 500,
                "status": "active",
                "participants_count": 3,
                "is_joined": true,
                "created_by": 7
            }"#,
        )
        .expect("tournament is parsed");

        assert_eq!(tournament.mode, TournamentMode::TwoVsTwo);
        assert_eq!(tournament.status, TournamentStatus::Active);
        assert!(tournament.is_joined);
        assert!(!tournament.is_full());
    }

    #[test]
    fn test_missing_snapshot_fields_default() {
        let tournament: Tournament = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Cup",
                "date": "2030-05-01T18:00:00Z",
                "mode": "1v1",
                "max_players": 2,
                "prize": 0,
                "status": "future",
                "created_by": 1
            }"#,
        )
        .expect("tournament is parsed");

        assert_eq!(tournament.participants_count, 0);
        assert!(!tournament.is_joined);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(TournamentStatus::Future.label(), "upcoming");
        assert_eq!(TournamentStatus::Active.label(), "in progress");
        assert_eq!(TournamentStatus::Past.label(), "finished");
    }

    #[test]
    fn test_tournament_query_params() {
        assert!(TournamentQuery::default().to_params().is_empty());

        let query = TournamentQuery {
            status: Some(TournamentStatus::Past),
            mode: Some(TournamentMode::OneVsOne),
        };

        assert_eq!(
            query.to_params(),
            vec![
                ("status_filter".to_string(), "past".to_string()),
                ("mode_filter".to_string(), "1v1".to_string())
            ]
        );
    }

    #[test]
    fn test_clan_query_elides_blank_values() {
        let query = ClanQuery {
            search: Some("  ".to_string()),
            tag: Some("#ABC".to_string()),
        };

        assert_eq!(
            query.to_params(),
            vec![("tag".to_string(), "#ABC".to_string())]
        );
    }
}
