use std::sync::atomic::AtomicBool;

use arena_core::{Clan, ClanQuery, PrimaryKey, Transport};
use parking_lot::Mutex;

use crate::{ActionOutcome, ArenaContext, ClanDraft, InFlight, Notice, SubmitError, ViewState};

/// The clan directory, searchable by name and tag.
pub struct Clans<T> {
    context: ArenaContext<T>,
    query: Mutex<ClanQuery>,
    state: Mutex<ViewState<Vec<Clan>>>,
    in_flight: AtomicBool,
    notice: Mutex<Option<Notice>>,
}

impl<T> Clans<T>
where
    T: Transport,
{
    pub fn new(context: &ArenaContext<T>) -> Self {
        Self {
            context: context.clone(),
            query: Default::default(),
            state: Default::default(),
            in_flight: Default::default(),
            notice: Default::default(),
        }
    }

    pub async fn refresh(&self) -> ViewState<Vec<Clan>> {
        let query = self.query.lock().clone();
        *self.state.lock() = ViewState::Loading;

        let new_state = match self.context.client.clans(&query).await {
            Ok(clans) => ViewState::Ready(clans),
            Err(e) => ViewState::Failed(e.user_message("Could not load clans")),
        };

        *self.state.lock() = new_state.clone();
        new_state
    }

    /// Changes the search text, fetching again if it changed
    pub async fn set_search(&self, search: Option<String>) -> ViewState<Vec<Clan>> {
        let changed = {
            let mut query = self.query.lock();
            let changed = query.search != search;
            query.search = search;
            changed
        };

        if changed {
            self.refresh().await
        } else {
            self.state()
        }
    }

    /// Changes the tag filter, fetching again if it changed
    pub async fn set_tag(&self, tag: Option<String>) -> ViewState<Vec<Clan>> {
        let changed = {
            let mut query = self.query.lock();
            let changed = query.tag != tag;
            query.tag = tag;
            changed
        };

        if changed {
            self.refresh().await
        } else {
            self.state()
        }
    }

    /// Replaces the whole query, fetching again if it changed
    pub async fn set_query(&self, query: ClanQuery) -> ViewState<Vec<Clan>> {
        let changed = {
            let mut current = self.query.lock();
            let changed = *current != query;
            *current = query;
            changed
        };

        if changed {
            self.refresh().await
        } else {
            self.state()
        }
    }

    /// Fetches a single clan, independently of the directory
    pub async fn clan(&self, id: PrimaryKey) -> ViewState<Clan> {
        match self.context.client.clan(id).await {
            Ok(clan) => ViewState::Ready(clan),
            Err(e) => ViewState::Failed(e.user_message("Could not load the clan")),
        }
    }

    pub fn query(&self) -> ClanQuery {
        self.query.lock().clone()
    }

    /// Validates and creates a clan, then fetches the directory again
    pub async fn create(&self, draft: &ClanDraft) -> Result<Clan, SubmitError> {
        let new_clan = draft.validate()?;

        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            return Err(SubmitError::Busy);
        };

        let clan = self
            .context
            .client
            .create_clan(&new_clan)
            .await
            .map_err(|e| SubmitError::Rejected(e.user_message("Could not create the clan")))?;

        self.refresh().await;
        Ok(clan)
    }

    /// Joins a clan. The directory is fetched again on success.
    pub async fn join(&self, id: PrimaryKey) -> ActionOutcome {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            return ActionOutcome::Blocked;
        };

        match self.context.client.join_clan(id).await {
            Ok(_) => {
                self.refresh().await;
                *self.notice.lock() = Some(Notice::Success("You joined the clan".to_string()));
                ActionOutcome::Completed
            }
            Err(e) => {
                let message = e.user_message("Could not join the clan");
                *self.notice.lock() = Some(Notice::Error(message.clone()));
                ActionOutcome::Failed(message)
            }
        }
    }

    pub fn state(&self) -> ViewState<Vec<Clan>> {
        self.state.lock().clone()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice.lock().clone()
    }

    pub fn dismiss_notice(&self) {
        *self.notice.lock() = None;
    }
}
