use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

mod account;
mod clan;
mod tournament;

pub use account::*;
pub use clan::*;
pub use tournament::*;

lazy_static! {
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_]+$").unwrap();
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref CLAN_TAG_REGEX: Regex = Regex::new(r"^#[A-Z0-9]{3,10}$").unwrap();
}

/// A form input that was rejected before anything was sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Fill in all fields")]
    MissingFields,
    #[error("Username must be between 3 and 20 characters")]
    UsernameLength,
    #[error("Username may only contain letters, digits and underscores")]
    UsernameCharacters,
    #[error("Email address is invalid")]
    InvalidEmail,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Password must contain an uppercase letter")]
    PasswordNeedsUppercase,
    #[error("Password must contain a digit")]
    PasswordNeedsDigit,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Name must be at least 3 characters")]
    NameTooShort,
    #[error("Pick a date")]
    DateMissing,
    #[error("The date must be in the future")]
    DateNotInFuture,
    #[error("Prize cannot be negative")]
    NegativePrize,
    #[error("At least 2 players are required")]
    NotEnoughPlayers,
    #[error("The {field} is too large")]
    OutOfRange { field: &'static str },
    #[error("Tag must be # followed by 3 to 10 letters or digits")]
    InvalidClanTag,
}

/// A submission that did not go through
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] FormError),
    /// The server refused the submission, with its message
    #[error("{0}")]
    Rejected(String),
    #[error("A submission is already in progress")]
    Busy,
}

impl FormError {
    /// The form field this error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingFields => "form",
            Self::UsernameLength | Self::UsernameCharacters => "username",
            Self::InvalidEmail => "email",
            Self::PasswordTooShort | Self::PasswordNeedsUppercase | Self::PasswordNeedsDigit => {
                "password"
            }
            Self::PasswordMismatch => "confirm_password",
            Self::NameTooShort => "name",
            Self::DateMissing | Self::DateNotInFuture => "date",
            Self::NegativePrize => "prize",
            Self::NotEnoughPlayers => "max_players",
            Self::OutOfRange { field } => *field,
            Self::InvalidClanTag => "tag",
        }
    }
}

/// Counts characters rather than bytes, ignoring surrounding whitespace
fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}
