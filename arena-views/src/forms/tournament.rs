use arena_core::{NewTournament, TournamentMode};
use chrono::{DateTime, Utc};

use super::{char_len, FormError};

/// The raw input of the tournament creation form
#[derive(Debug, Clone)]
pub struct TournamentDraft {
    pub name: String,
    pub date: Option<DateTime<Utc>>,
    pub prize: i64,
    pub mode: TournamentMode,
    pub max_players: i64,
}

impl TournamentDraft {
    /// Checks the draft against the given time, stopping at the first problem.
    /// The order is fixed: name, date presence, date in the future, prize, player count.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<NewTournament, FormError> {
        if char_len(&self.name) < 3 {
            return Err(FormError::NameTooShort);
        }

        let date = self.date.ok_or(FormError::DateMissing)?;

        if date <= now {
            return Err(FormError::DateNotInFuture);
        }

        if self.prize < 0 {
            return Err(FormError::NegativePrize);
        }

        if self.max_players < 2 {
            return Err(FormError::NotEnoughPlayers);
        }

        let prize =
            u32::try_from(self.prize).map_err(|_| FormError::OutOfRange { field: "prize" })?;
        let max_players = u32::try_from(self.max_players).map_err(|_| FormError::OutOfRange {
            field: "max_players",
        })?;

        Ok(NewTournament {
            name: self.name.trim().to_string(),
            date,
            prize,
            mode: self.mode,
            max_players,
        })
    }
}

impl Default for TournamentDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            date: None,
            prize: 0,
            mode: TournamentMode::OneVsOne,
            max_players: 8,
        }
    }
}
