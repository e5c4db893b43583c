use crossbeam::channel::{unbounded, Receiver, Sender};
use log::debug;

use crate::PrimaryKey;

pub type EventSender = Sender<ClientEvent>;
pub type EventReceiver = Receiver<ClientEvent>;

/// Events emitted by the client for the front-end to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The front-end should show the given route
    Navigate(Route),
    /// The session was established or torn down
    SessionChanged { authenticated: bool },
}

/// The entry points of the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Tournaments,
    Tournament(PrimaryKey),
    Clans,
    Leaderboard,
}

/// Creates a new event channel
pub fn event_channel() -> (EventSender, EventReceiver) {
    unbounded()
}

/// Sends an event, ignoring the case where nobody is listening anymore
pub fn emit(sender: &EventSender, event: ClientEvent) {
    if sender.send(event).is_err() {
        debug!("Event dropped, receiver is gone");
    }
}
