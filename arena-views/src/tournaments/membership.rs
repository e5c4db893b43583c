use arena_core::{Client, PrimaryKey, Transport};

use crate::{ActionOutcome, Affordance, Confirm, MembershipAction, Notice};

/// A change to the user's membership in a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Join,
    Leave,
}

impl Membership {
    pub const LEAVE_PROMPT: &'static str = "Are you sure you want to leave this tournament?";

    /// Returns true if the control currently allows this change
    pub fn is_offered_by(&self, affordance: &Affordance) -> bool {
        let expected = match self {
            Self::Join => MembershipAction::Join,
            Self::Leave => MembershipAction::Leave,
        };

        affordance.is_enabled() && affordance.action == expected
    }

    /// Leaving must be confirmed, joining never asks
    pub fn is_confirmed(&self, confirm: &dyn Confirm) -> bool {
        match self {
            Self::Join => true,
            Self::Leave => confirm.confirm(Self::LEAVE_PROMPT),
        }
    }

    /// Sends the change to the server
    pub(crate) async fn perform<T>(&self, client: &Client<T>, id: PrimaryKey) -> ActionOutcome
    where
        T: Transport,
    {
        let result = match self {
            Self::Join => client.join_tournament(id).await,
            Self::Leave => client.leave_tournament(id).await,
        };

        match result {
            Ok(_) => ActionOutcome::Completed,
            Err(e) => ActionOutcome::Failed(e.user_message(self.failure_message())),
        }
    }

    /// The notice to show for an outcome, if any
    pub fn notice(&self, outcome: &ActionOutcome) -> Option<Notice> {
        match outcome {
            ActionOutcome::Completed => Some(Notice::Success(self.success_message().to_string())),
            ActionOutcome::Failed(message) => Some(Notice::Error(message.clone())),
            _ => None,
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            Self::Join => "You joined the tournament",
            Self::Leave => "You left the tournament",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Self::Join => "Could not join the tournament",
            Self::Leave => "Could not leave the tournament",
        }
    }
}
