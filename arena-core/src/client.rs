use std::sync::Arc;

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::{
    ApiError, ApiResult, AuthPayload, Clan, ClanQuery, Credentials, Identity, LeaderboardEntry,
    NewClan, NewTournament, NewUser, Participant, PrimaryKey, Request, Session, Tournament,
    TournamentQuery, Transport,
};

/// The remote API client.
///
/// Attaches the current credential to every request, and tears down the
/// session whenever the server answers with 401, no matter which call it was.
pub struct Client<T> {
    transport: T,
    session: Arc<Session>,
}

impl<T> Client<T>
where
    T: Transport,
{
    pub fn new(transport: T, session: &Arc<Session>) -> Self {
        Self {
            transport,
            session: session.clone(),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Authenticates with the given credentials.
    /// The auth endpoint only accepts form encoded payloads.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthPayload> {
        let request = Request::post("login").form(vec![
            ("username".to_string(), credentials.username.clone()),
            ("password".to_string(), credentials.password.clone()),
        ]);

        self.fetch(request).await
    }

    pub async fn register(&self, new_user: &NewUser) -> ApiResult<AuthPayload> {
        self.fetch(Request::post("register").json(to_value(new_user)?))
            .await
    }

    /// Fetches the identity associated with the current credential
    pub async fn me(&self) -> ApiResult<Identity> {
        self.fetch(Request::get("users/me")).await
    }

    pub async fn tournaments(&self, query: &TournamentQuery) -> ApiResult<Vec<Tournament>> {
        self.fetch(Request::get("tournaments").query(query.to_params()))
            .await
    }

    pub async fn tournament(&self, id: PrimaryKey) -> ApiResult<Tournament> {
        self.fetch(Request::get(format!("tournaments/{}", id)))
            .await
    }

    pub async fn create_tournament(&self, new_tournament: &NewTournament) -> ApiResult<Tournament> {
        self.fetch(Request::post("tournaments").json(to_value(new_tournament)?))
            .await
    }

    pub async fn join_tournament(&self, id: PrimaryKey) -> ApiResult<()> {
        self.execute(Request::post(format!("tournaments/{}/join", id)))
            .await
            .map(|_| ())
    }

    pub async fn leave_tournament(&self, id: PrimaryKey) -> ApiResult<()> {
        self.execute(Request::post(format!("tournaments/{}/leave", id)))
            .await
            .map(|_| ())
    }

    /// Fetches the roster of a tournament, in join order
    pub async fn participants(&self, id: PrimaryKey) -> ApiResult<Vec<Participant>> {
        self.fetch(Request::get(format!("tournaments/{}/participants", id)))
            .await
    }

    pub async fn clans(&self, query: &ClanQuery) -> ApiResult<Vec<Clan>> {
        self.fetch(Request::get("clans").query(query.to_params()))
            .await
    }

    pub async fn clan(&self, id: PrimaryKey) -> ApiResult<Clan> {
        self.fetch(Request::get(format!("clans/{}", id))).await
    }

    pub async fn create_clan(&self, new_clan: &NewClan) -> ApiResult<Clan> {
        self.fetch(Request::post("clans").json(to_value(new_clan)?))
            .await
    }

    pub async fn join_clan(&self, id: PrimaryKey) -> ApiResult<()> {
        self.execute(Request::post(format!("clans/{}/join", id)))
            .await
            .map(|_| ())
    }

    pub async fn leaderboard(&self, limit: u32) -> ApiResult<Vec<LeaderboardEntry>> {
        let params = vec![("limit".to_string(), limit.to_string())];

        self.fetch(Request::get("leaderboard").query(params)).await
    }

    async fn fetch<R>(&self, request: Request) -> ApiResult<R>
    where
        R: DeserializeOwned,
    {
        let body = self.execute(request).await?;

        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Sends the request and returns the body of a successful response
    async fn execute(&self, mut request: Request) -> ApiResult<String> {
        request.bearer = self.session.token();

        let bearer = request.bearer.clone();
        let method = request.method;
        let path = request.path.clone();

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        debug!("{:?} /{} -> {}", method, path, response.status);

        if response.is_success() {
            return Ok(response.body);
        }

        if response.status == 401 {
            self.session.force_logout(bearer.as_deref());
            return Err(ApiError::Unauthorized);
        }

        let error = ApiError::from_status(response.status, &response.body);
        warn!("{:?} /{} failed: {}", method, path, error);

        Err(error)
    }
}

fn to_value<S>(value: &S) -> ApiResult<serde_json::Value>
where
    S: serde::Serialize,
{
    serde_json::to_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        event_channel, testing::ScriptedTransport, Body, ClientEvent, MemoryStorage, Method,
        Route, SessionData, Storage, TournamentMode, TournamentStatus, TOKEN_KEY,
    };

    fn identity() -> Identity {
        Identity {
            id: 3,
            username: "hog_rider".to_string(),
            email: "hog@arena.gg".to_string(),
            role: None,
            clash_tag: None,
            created_at: None,
        }
    }

    fn logged_in() -> (Arc<MemoryStorage>, Arc<Session>, crate::EventReceiver) {
        let storage = Arc::new(MemoryStorage::new());
        let (sender, receiver) = event_channel();
        let session = Arc::new(Session::restore(storage.clone(), sender));

        session
            .establish(SessionData {
                token: "secret".to_string(),
                user: identity(),
            })
            .unwrap();

        (storage, session, receiver)
    }

    #[tokio::test]
    async fn test_attaches_bearer_credential() {
        let (_, session, _) = logged_in();
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, "users/me", 200, json!(identity()));

        let client = Client::new(transport.clone(), &session);
        let me = client.me().await.unwrap();

        assert_eq!(me, identity());
        assert_eq!(transport.requests()[0].bearer.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_no_bearer_when_logged_out() {
        let (sender, _receiver) = event_channel();
        let session = Arc::new(Session::restore(MemoryStorage::new(), sender));
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, "leaderboard", 200, json!([]));

        let client = Client::new(transport.clone(), &session);
        client.leaderboard(10).await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.bearer, None);
        assert_eq!(
            request.query,
            vec![("limit".to_string(), "10".to_string())]
        );
    }

    #[tokio::test]
    async fn test_login_is_form_encoded() {
        let (sender, _receiver) = event_channel();
        let session = Arc::new(Session::restore(MemoryStorage::new(), sender));
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::Post,
            "login",
            200,
            json!({ "access_token": "t", "token_type": "bearer", "user": identity() }),
        );

        let client = Client::new(transport.clone(), &session);
        let payload = client
            .login(&Credentials {
                username: "hog_rider".to_string(),
                password: "Secret123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(payload.access_token, "t");
        assert_eq!(
            transport.requests()[0].body,
            Body::Form(vec![
                ("username".to_string(), "hog_rider".to_string()),
                ("password".to_string(), "Secret123".to_string())
            ])
        );
    }

    #[tokio::test]
    async fn test_unauthorized_from_any_call_forces_logout() {
        let calls: Vec<(Method, &str)> = vec![
            (Method::Get, "tournaments"),
            (Method::Post, "tournaments/5/join"),
            (Method::Get, "clans"),
            (Method::Get, "users/me"),
        ];

        for (method, path) in calls {
            let (storage, session, receiver) = logged_in();
            receiver.try_iter().for_each(drop);

            let transport = ScriptedTransport::new();
            transport.respond(method, path, 401, json!({ "detail": "Not authenticated" }));
            let client = Client::new(transport, &session);

            let result = match path {
                "tournaments" => client
                    .tournaments(&TournamentQuery::default())
                    .await
                    .map(|_| ()),
                "tournaments/5/join" => client.join_tournament(5).await,
                "clans" => client.clans(&ClanQuery::default()).await.map(|_| ()),
                _ => client.me().await.map(|_| ()),
            };

            assert_eq!(result, Err(ApiError::Unauthorized));
            assert!(!session.is_authenticated());
            assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

            let navigations = receiver
                .try_iter()
                .filter(|e| *e == ClientEvent::Navigate(Route::Login))
                .count();
            assert_eq!(navigations, 1, "{} navigates to login once", path);
        }
    }

    #[tokio::test]
    async fn test_filters_are_sent_as_query() {
        let (_, session, _) = logged_in();
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, "tournaments", 200, json!([]));

        let client = Client::new(transport.clone(), &session);
        client
            .tournaments(&TournamentQuery {
                status: Some(TournamentStatus::Active),
                mode: Some(TournamentMode::TwoVsTwo),
            })
            .await
            .unwrap();

        assert_eq!(
            transport.requests()[0].query,
            vec![
                ("status_filter".to_string(), "active".to_string()),
                ("mode_filter".to_string(), "2v2".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_server_errors_are_classified() {
        let (_, session, _) = logged_in();
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::Post,
            "tournaments/5/join",
            400,
            json!({ "detail": "Tournament is full" }),
        );

        let client = Client::new(transport, &session);
        let error = client.join_tournament(5).await.unwrap_err();

        assert_eq!(error.detail(), Some("Tournament is full"));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_network_failure() {
        let (_, session, _) = logged_in();
        let transport = ScriptedTransport::new();
        transport.fail(Method::Get, "clans/1", "connection refused");

        let client = Client::new(transport, &session);
        let error = client.clan(1).await.unwrap_err();

        assert!(matches!(error, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (_, session, _) = logged_in();
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, "clans/1", 200, json!({ "id": "nope" }));

        let client = Client::new(transport, &session);
        let error = client.clan(1).await.unwrap_err();

        assert!(matches!(error, ApiError::Parse(_)));
    }
}
