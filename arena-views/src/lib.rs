mod auth;
mod clans;
mod forms;
mod leaderboard;
mod state;
mod tournaments;

use std::sync::Arc;

pub use auth::*;
pub use clans::*;
pub use forms::*;
pub use leaderboard::*;
pub use state::*;
pub use tournaments::*;

use arena_core::{
    emit, event_channel, Client, ClientEvent, Config, EventReceiver, EventSender, PrimaryKey,
    Route, Session, Storage, Transport,
};

/// The arena client, giving access to the session and every view-model.
pub struct Arena<T> {
    context: ArenaContext<T>,

    pub auth: Auth<T>,
}

/// A type passed to the view-models, to reach the remote service, read the session, and emit events.
pub struct ArenaContext<T> {
    pub client: Arc<Client<T>>,
    pub session: Arc<Session>,
    pub config: Config,

    events: EventSender,
}

impl<T> Arena<T>
where
    T: Transport,
{
    /// Creates the client and hydrates the session from storage.
    /// The returned receiver yields navigation and session events.
    pub fn new<S>(transport: T, storage: S, config: Config) -> (Self, EventReceiver)
    where
        S: Storage + 'static,
    {
        let (events, receiver) = event_channel();

        let session = Arc::new(Session::restore(storage, events.clone()));
        let client = Arc::new(Client::new(transport, &session));

        let context = ArenaContext {
            client,
            session,
            config,
            events,
        };

        let arena = Self {
            auth: Auth::new(&context),
            context,
        };

        (arena, receiver)
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.context.session
    }

    pub fn tournaments(&self) -> TournamentList<T> {
        TournamentList::new(&self.context)
    }

    pub fn tournament(&self, id: PrimaryKey) -> TournamentDetail<T> {
        TournamentDetail::new(&self.context, id)
    }

    pub fn tournament_form(&self) -> TournamentForm<T> {
        TournamentForm::new(&self.context)
    }

    pub fn clans(&self) -> Clans<T> {
        Clans::new(&self.context)
    }

    pub fn leaderboard(&self) -> Leaderboard<T> {
        Leaderboard::new(&self.context)
    }
}

impl<T> ArenaContext<T> {
    /// Tells the front-end to show the given route
    pub fn navigate(&self, route: Route) {
        emit(&self.events, ClientEvent::Navigate(route));
    }
}

impl<T> Clone for ArenaContext<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            session: self.session.clone(),
            config: self.config.clone(),
            events: self.events.clone(),
        }
    }
}
