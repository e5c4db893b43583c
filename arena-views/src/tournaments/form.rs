use std::sync::atomic::AtomicBool;

use arena_core::{Route, Tournament, Transport};
use chrono::Utc;
use log::info;

use crate::{ArenaContext, InFlight, SubmitError, TournamentDraft};

/// Validates and submits new tournaments.
///
/// Validation here only spares the user a round trip. The server has the final
/// say, and its message is shown as is when it refuses a draft.
pub struct TournamentForm<T> {
    context: ArenaContext<T>,
    in_flight: AtomicBool,
}

impl<T> TournamentForm<T>
where
    T: Transport,
{
    pub fn new(context: &ArenaContext<T>) -> Self {
        Self {
            context: context.clone(),
            in_flight: Default::default(),
        }
    }

    /// Validates the draft and creates the tournament.
    /// Nothing is sent if validation fails.
    pub async fn submit(&self, draft: &TournamentDraft) -> Result<Tournament, SubmitError> {
        let new_tournament = draft.validate(Utc::now())?;

        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            return Err(SubmitError::Busy);
        };

        let tournament = self
            .context
            .client
            .create_tournament(&new_tournament)
            .await
            .map_err(|e| SubmitError::Rejected(e.user_message("Could not create the tournament")))?;

        info!("Created tournament {} ({})", tournament.name, tournament.id);
        self.context.navigate(Route::Tournament(tournament.id));

        Ok(tournament)
    }
}
