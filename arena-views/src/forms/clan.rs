use arena_core::NewClan;

use super::{char_len, FormError, CLAN_TAG_REGEX};

#[derive(Debug, Clone, Default)]
pub struct ClanDraft {
    pub name: String,
    pub tag: String,
    pub description: Option<String>,
}

impl ClanDraft {
    pub fn validate(&self) -> Result<NewClan, FormError> {
        if char_len(&self.name) < 3 {
            return Err(FormError::NameTooShort);
        }

        let tag = self.tag.trim().to_uppercase();

        if !CLAN_TAG_REGEX.is_match(&tag) {
            return Err(FormError::InvalidClanTag);
        }

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);

        Ok(NewClan {
            name: self.name.trim().to_string(),
            tag,
            description,
        })
    }
}
