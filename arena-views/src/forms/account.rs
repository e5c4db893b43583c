use arena_core::{Credentials, NewUser};

use super::{char_len, FormError, EMAIL_REGEX, USERNAME_REGEX};

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, FormError> {
        let username = self.username.trim();

        if username.is_empty() || self.password.is_empty() {
            return Err(FormError::MissingFields);
        }

        Ok(Credentials {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

impl RegistrationForm {
    const USERNAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=20;
    const MIN_PASSWORD_LENGTH: usize = 8;

    /// Checks the fields in order, stopping at the first problem
    pub fn validate(&self) -> Result<NewUser, FormError> {
        let username = self.username.trim();
        let email = self.email.trim();

        if !Self::USERNAME_LENGTH.contains(&char_len(username)) {
            return Err(FormError::UsernameLength);
        }

        if !USERNAME_REGEX.is_match(username) {
            return Err(FormError::UsernameCharacters);
        }

        if !EMAIL_REGEX.is_match(email) {
            return Err(FormError::InvalidEmail);
        }

        if self.password.chars().count() < Self::MIN_PASSWORD_LENGTH {
            return Err(FormError::PasswordTooShort);
        }

        if !self.password.chars().any(char::is_uppercase) {
            return Err(FormError::PasswordNeedsUppercase);
        }

        if !self.password.chars().any(|c| c.is_ascii_digit()) {
            return Err(FormError::PasswordNeedsDigit);
        }

        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }

        Ok(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        })
    }
}
