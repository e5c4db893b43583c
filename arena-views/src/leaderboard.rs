use arena_core::{LeaderboardEntry, Transport};
use parking_lot::Mutex;

use crate::{ArenaContext, ViewState};

/// The top players, in the order the server ranks them
pub struct Leaderboard<T> {
    context: ArenaContext<T>,
    state: Mutex<ViewState<Vec<LeaderboardEntry>>>,
}

impl<T> Leaderboard<T>
where
    T: Transport,
{
    pub fn new(context: &ArenaContext<T>) -> Self {
        Self {
            context: context.clone(),
            state: Default::default(),
        }
    }

    /// Loads as many entries as configured
    pub async fn load(&self) -> ViewState<Vec<LeaderboardEntry>> {
        self.load_with_limit(self.context.config.leaderboard_limit)
            .await
    }

    pub async fn load_with_limit(&self, limit: u32) -> ViewState<Vec<LeaderboardEntry>> {
        *self.state.lock() = ViewState::Loading;

        let new_state = match self.context.client.leaderboard(limit).await {
            Ok(entries) => ViewState::Ready(entries),
            Err(e) => ViewState::Failed(e.user_message("Could not load the leaderboard")),
        };

        *self.state.lock() = new_state.clone();
        new_state
    }

    pub fn state(&self) -> ViewState<Vec<LeaderboardEntry>> {
        self.state.lock().clone()
    }
}
