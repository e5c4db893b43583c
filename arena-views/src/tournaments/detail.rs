use std::sync::atomic::{AtomicBool, Ordering};

use arena_core::{ApiError, Participant, PrimaryKey, Route, Tournament, Transport};
use futures_util::future::join;
use log::{debug, info};
use parking_lot::Mutex;

use crate::{
    occupancy_label, ActionOutcome, Affordance, ArenaContext, Confirm, InFlight, Membership,
    Notice,
};

/// Presents one tournament and mediates the user's membership in it.
///
/// Join and leave never patch local state. On success the whole view is
/// loaded again, so what is shown always matches what the server holds.
pub struct TournamentDetail<T> {
    context: ArenaContext<T>,
    id: PrimaryKey,
    state: Mutex<DetailState>,
    in_flight: AtomicBool,
    notice: Mutex<Option<Notice>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Ready(TournamentView),
    /// The tournament doesn't exist, the front-end was sent back to the list
    NotFound,
    /// Loading failed, and may be retried
    Failed(String),
}

/// A tournament together with its roster, as of the last load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentView {
    pub tournament: Tournament,
    /// In join order
    pub participants: Vec<Participant>,
}

enum LoadError {
    Missing,
    Failed(ApiError),
}

impl<T> TournamentDetail<T>
where
    T: Transport,
{
    pub fn new(context: &ArenaContext<T>, id: PrimaryKey) -> Self {
        Self {
            context: context.clone(),
            id,
            state: Mutex::new(DetailState::Loading),
            in_flight: Default::default(),
            notice: Default::default(),
        }
    }

    pub fn id(&self) -> PrimaryKey {
        self.id
    }

    /// Fetches the tournament and its roster
    pub async fn load(&self) -> DetailState {
        *self.state.lock() = DetailState::Loading;

        let mut result = self.fetch().await;

        // A count that disagrees with the roster means one of them is outdated
        if matches!(&result, Ok(view) if view.is_stale()) {
            debug!("Tournament {} is stale, fetching again", self.id);
            result = self.fetch().await;
        }

        let new_state = match result {
            Ok(view) => DetailState::Ready(view),
            Err(LoadError::Missing) => {
                info!("Tournament {} does not exist", self.id);
                self.context.navigate(Route::Tournaments);
                DetailState::NotFound
            }
            Err(LoadError::Failed(e)) => {
                DetailState::Failed(e.user_message("Could not load the tournament"))
            }
        };

        *self.state.lock() = new_state.clone();
        new_state
    }

    /// Joins the tournament.
    /// Nothing is sent if joining is not currently offered.
    pub async fn join(&self) -> ActionOutcome {
        self.apply(Membership::Join, &|_: &str| true).await
    }

    /// Leaves the tournament, if the user confirms.
    pub async fn leave<C>(&self, confirm: &C) -> ActionOutcome
    where
        C: Confirm,
    {
        self.apply(Membership::Leave, confirm).await
    }

    pub fn state(&self) -> DetailState {
        self.state.lock().clone()
    }

    pub fn view(&self) -> Option<TournamentView> {
        match &*self.state.lock() {
            DetailState::Ready(view) => Some(view.clone()),
            _ => None,
        }
    }

    /// The membership control, once the tournament is loaded
    pub fn affordance(&self) -> Option<Affordance> {
        let busy = self.in_flight.load(Ordering::Acquire);

        match &*self.state.lock() {
            DetailState::Ready(view) => Some(view.affordance(busy)),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice.lock().clone()
    }

    pub fn dismiss_notice(&self) {
        *self.notice.lock() = None;
    }

    async fn apply(&self, membership: Membership, confirm: &dyn Confirm) -> ActionOutcome {
        let offered = self
            .affordance()
            .map(|a| membership.is_offered_by(&a))
            .unwrap_or_default();

        if !offered {
            return ActionOutcome::Blocked;
        }

        if !membership.is_confirmed(confirm) {
            return ActionOutcome::Declined;
        }

        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            return ActionOutcome::Blocked;
        };

        let outcome = membership.perform(&self.context.client, self.id).await;

        if outcome.is_completed() {
            self.load().await;
        }

        if let Some(notice) = membership.notice(&outcome) {
            *self.notice.lock() = Some(notice);
        }

        outcome
    }

    async fn fetch(&self) -> Result<TournamentView, LoadError> {
        let client = &self.context.client;
        let (tournament, participants) =
            join(client.tournament(self.id), client.participants(self.id)).await;

        let tournament = tournament.map_err(|e| match e {
            e if e.is_not_found() => LoadError::Missing,
            e => LoadError::Failed(e),
        })?;

        let participants = participants.map_err(LoadError::Failed)?;

        Ok(TournamentView {
            tournament,
            participants,
        })
    }
}

impl TournamentView {
    /// Returns true if the summary count disagrees with the roster
    pub fn is_stale(&self) -> bool {
        self.tournament.participants_count as usize != self.participants.len()
    }

    pub fn affordance(&self, busy: bool) -> Affordance {
        Affordance::for_tournament(&self.tournament, busy)
    }

    /// Seats taken out of the maximum, counted from the roster
    pub fn occupancy(&self) -> String {
        occupancy_label(self.participants.len() as u32, self.tournament.max_players)
    }
}
