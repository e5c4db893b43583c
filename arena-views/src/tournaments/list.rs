use std::sync::atomic::{AtomicBool, Ordering};

use arena_core::{
    PrimaryKey, Tournament, TournamentMode, TournamentQuery, TournamentStatus, Transport,
};
use parking_lot::Mutex;

use crate::{
    ActionOutcome, Affordance, ArenaContext, Confirm, InFlight, Membership, Notice,
    TournamentRow, ViewState,
};

/// The status dimension of the list filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    #[default]
    Future,
    Active,
    Past,
}

/// The mode dimension of the list filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModeFilter {
    #[default]
    All,
    OneVsOne,
    TwoVsTwo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TournamentFilters {
    pub status: StatusFilter,
    pub mode: ModeFilter,
}

/// The tournament list, filtered server-side.
pub struct TournamentList<T> {
    context: ArenaContext<T>,
    filters: Mutex<TournamentFilters>,
    state: Mutex<ViewState<Vec<Tournament>>>,
    in_flight: AtomicBool,
    notice: Mutex<Option<Notice>>,
}

impl<T> TournamentList<T>
where
    T: Transport,
{
    pub fn new(context: &ArenaContext<T>) -> Self {
        Self {
            context: context.clone(),
            filters: Default::default(),
            state: Default::default(),
            in_flight: Default::default(),
            notice: Default::default(),
        }
    }

    /// Fetches the list for the current filters
    pub async fn refresh(&self) -> ViewState<Vec<TournamentRow>> {
        let query = self.filters.lock().query();
        *self.state.lock() = ViewState::Loading;

        let new_state = match self.context.client.tournaments(&query).await {
            Ok(tournaments) => ViewState::Ready(tournaments),
            Err(e) => ViewState::Failed(e.user_message("Could not load tournaments")),
        };

        *self.state.lock() = new_state;
        self.rows()
    }

    /// Changes the status filter, fetching the list again if it changed
    pub async fn set_status(&self, status: StatusFilter) -> ViewState<Vec<TournamentRow>> {
        let changed = {
            let mut filters = self.filters.lock();
            let changed = filters.status != status;
            filters.status = status;
            changed
        };

        if changed {
            self.refresh().await
        } else {
            self.rows()
        }
    }

    /// Changes the mode filter, fetching the list again if it changed
    pub async fn set_mode(&self, mode: ModeFilter) -> ViewState<Vec<TournamentRow>> {
        let changed = {
            let mut filters = self.filters.lock();
            let changed = filters.mode != mode;
            filters.mode = mode;
            changed
        };

        if changed {
            self.refresh().await
        } else {
            self.rows()
        }
    }

    /// Replaces both filters at once, fetching the list again if either changed
    pub async fn set_filters(&self, filters: TournamentFilters) -> ViewState<Vec<TournamentRow>> {
        let changed = {
            let mut current = self.filters.lock();
            let changed = *current != filters;
            *current = filters;
            changed
        };

        if changed {
            self.refresh().await
        } else {
            self.rows()
        }
    }

    /// Joins a tournament from its row
    pub async fn join(&self, id: PrimaryKey) -> ActionOutcome {
        self.apply(id, Membership::Join, &|_: &str| true).await
    }

    /// Leaves a tournament from its row, if the user confirms
    pub async fn leave<C>(&self, id: PrimaryKey, confirm: &C) -> ActionOutcome
    where
        C: Confirm,
    {
        self.apply(id, Membership::Leave, confirm).await
    }

    pub fn filters(&self) -> TournamentFilters {
        *self.filters.lock()
    }

    /// The list mapped to display records
    pub fn rows(&self) -> ViewState<Vec<TournamentRow>> {
        let busy = self.in_flight.load(Ordering::Acquire);

        self.state
            .lock()
            .map(|list| list.iter().map(|t| TournamentRow::new(t, busy)).collect())
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice.lock().clone()
    }

    pub fn dismiss_notice(&self) {
        *self.notice.lock() = None;
    }

    async fn apply(
        &self,
        id: PrimaryKey,
        membership: Membership,
        confirm: &dyn Confirm,
    ) -> ActionOutcome {
        let busy = self.in_flight.load(Ordering::Acquire);

        let affordance = self.state.lock().ready().and_then(|list| {
            list.iter()
                .find(|t| t.id == id)
                .map(|t| Affordance::for_tournament(t, busy))
        });

        let offered = affordance
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

        let outcome = membership.perform(&self.context.client, id).await;

        if outcome.is_completed() {
            self.refresh().await;
        }

        if let Some(notice) = membership.notice(&outcome) {
            *self.notice.lock() = Some(notice);
        }

        outcome
    }
}

impl TournamentFilters {
    /// Builds the server query. `All` is never sent.
    pub fn query(&self) -> TournamentQuery {
        TournamentQuery {
            status: self.status.to_status(),
            mode: self.mode.to_mode(),
        }
    }
}

impl StatusFilter {
    pub fn to_status(&self) -> Option<TournamentStatus> {
        match self {
            Self::All => None,
            Self::Future => Some(TournamentStatus::Future),
            Self::Active => Some(TournamentStatus::Active),
            Self::Past => Some(TournamentStatus::Past),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "future" => Some(Self::Future),
            "active" => Some(Self::Active),
            "past" => Some(Self::Past),
            _ => None,
        }
    }
}

impl ModeFilter {
    pub fn to_mode(&self) -> Option<TournamentMode> {
        match self {
            Self::All => None,
            Self::OneVsOne => Some(TournamentMode::OneVsOne),
            Self::TwoVsTwo => Some(TournamentMode::TwoVsTwo),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            other => TournamentMode::parse(other).map(|mode| match mode {
                TournamentMode::OneVsOne => Self::OneVsOne,
                TournamentMode::TwoVsTwo => Self::TwoVsTwo,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use arena_core::Method;
    use serde_json::json;

    use super::*;
    use crate::{
        test_support::{arena, tournament},
        MembershipAction,
    };

    fn params(request: &arena_core::Request) -> Vec<(&str, &str)> {
        request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn test_default_filters() {
        let (arena, transport, _, _) = arena();
        transport.respond(
            Method::Get,
            "tournaments",
            200,
            json!([tournament(1, "future", 0, 8, false)]),
        );

        let list = arena.tournaments();
        assert_eq!(list.filters(), TournamentFilters::default());

        let rows = list.refresh().await;

        assert_eq!(rows.ready().map(|r| r.len()), Some(1));
        assert_eq!(
            params(&transport.requests()[0]),
            vec![("status_filter", "future")]
        );
    }

    #[tokio::test]
    async fn test_all_is_never_sent() {
        let (arena, transport, _, _) = arena();
        transport.respond(Method::Get, "tournaments", 200, json!([]));

        let list = arena.tournaments();
        list.set_status(StatusFilter::All).await;
        list.set_mode(ModeFilter::TwoVsTwo).await;
        list.set_status(StatusFilter::Past).await;
        list.set_mode(ModeFilter::All).await;

        let requests = transport.requests();
        let sent: Vec<Vec<(&str, &str)>> = requests
            .iter()
            .map(|r| &r.query)
            .map(|q| q.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect())
            .collect();

        assert_eq!(
            sent,
            vec![
                vec![],
                vec![("mode_filter", "2v2")],
                vec![("status_filter", "past"), ("mode_filter", "2v2")],
                vec![("status_filter", "past")],
            ]
        );

        for query in sent.iter().flatten() {
            assert_ne!(query.1, "all");
        }
    }

    #[tokio::test]
    async fn test_unchanged_filter_does_not_fetch() {
        let (arena, transport, _, _) = arena();
        transport.respond(Method::Get, "tournaments", 200, json!([]));

        let list = arena.tournaments();
        list.set_status(StatusFilter::Future).await;
        list.set_mode(ModeFilter::All).await;

        assert_eq!(transport.count(Method::Get, "tournaments"), 0);
    }

    #[tokio::test]
    async fn test_set_filters_fetches_once() {
        let (arena, transport, _, _) = arena();
        transport.respond(Method::Get, "tournaments", 200, json!([]));

        let list = arena.tournaments();
        let filters = TournamentFilters {
            status: StatusFilter::Active,
            mode: ModeFilter::OneVsOne,
        };

        list.set_filters(filters).await;
        list.set_filters(filters).await;

        assert_eq!(transport.count(Method::Get, "tournaments"), 1);
        assert_eq!(
            params(&transport.requests()[0]),
            vec![("status_filter", "active"), ("mode_filter", "1v1")]
        );
    }

    #[tokio::test]
    async fn test_row_join_refetches_list() {
        let (arena, transport, _, _) = arena();
        transport.respond(
            Method::Get,
            "tournaments",
            200,
            json!([tournament(3, "future", 1, 4, false)]),
        );
        transport.respond(
            Method::Get,
            "tournaments",
            200,
            json!([tournament(3, "future", 2, 4, true)]),
        );
        transport.respond(Method::Post, "tournaments/3/join", 200, json!({}));

        let list = arena.tournaments();
        list.refresh().await;

        assert_eq!(list.join(3).await, ActionOutcome::Completed);

        let rows = list.rows();
        let row = &rows.ready().unwrap()[0];
        assert_eq!(row.occupancy, "2 / 4");
        assert_eq!(row.affordance.action, MembershipAction::Leave);
        assert_eq!(transport.count(Method::Get, "tournaments"), 2);
    }

    #[tokio::test]
    async fn test_unknown_row_is_blocked() {
        let (arena, transport, _, _) = arena();
        transport.respond(Method::Get, "tournaments", 200, json!([]));

        let list = arena.tournaments();
        list.refresh().await;

        assert_eq!(list.join(99).await, ActionOutcome::Blocked);
        assert_eq!(transport.count(Method::Post, "tournaments/99/join"), 0);
    }

    #[tokio::test]
    async fn test_failed_refresh() {
        let (arena, transport, _, _) = arena();
        transport.respond(Method::Get, "tournaments", 500, json!({ "detail": "Database is down" }));

        let list = arena.tournaments();

        assert_eq!(
            list.refresh().await,
            ViewState::Failed("Database is down".to_string())
        );
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!(StatusFilter::parse("all"), Some(StatusFilter::All));
        assert_eq!(StatusFilter::parse("soon"), None);
        assert_eq!(ModeFilter::parse("2v2"), Some(ModeFilter::TwoVsTwo));
        assert_eq!(ModeFilter::parse("3v3"), None);
    }
}
