//! User profile and avatar upload rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest avatar the upload endpoint accepts (5 MiB).
pub const MAX_AVATAR_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_AVATAR_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/jpg", "image/webp"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub role: String,
    pub bio: String,
    pub jurisdiction: String,
    pub language: String,
    pub timezone: String,
    pub avatar_url: String,
}

impl Profile {
    /// Merge server-provided fields over the local ones.
    ///
    /// Keys the server omits or sends as null keep their current value, so a
    /// partial user object never blanks the form.
    pub fn merge_from(&mut self, user: &serde_json::Value) {
        let Some(obj) = user.as_object() else {
            return;
        };
        let mut current = match serde_json::to_value(&*self) {
            Ok(serde_json::Value::Object(m)) => m,
            _ => return,
        };
        for (k, v) in obj {
            if current.contains_key(k) && v.is_string() {
                current.insert(k.clone(), v.clone());
            }
        }
        if let Ok(merged) = serde_json::from_value(serde_json::Value::Object(current)) {
            *self = merged;
        }
    }

    /// Two-letter avatar fallback.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let slot = match key.trim() {
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "company" => &mut self.company,
            "role" => &mut self.role,
            "bio" => &mut self.bio,
            "jurisdiction" => &mut self.jurisdiction,
            "language" => &mut self.language,
            "timezone" => &mut self.timezone,
            "avatarUrl" => &mut self.avatar_url,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvatarError {
    #[error("Please select a PNG, JPG or WEBP image.")]
    UnsupportedType(String),
    #[error("File too large. Max 5MB.")]
    TooLarge(u64),
}

/// Check an avatar before it is uploaded.
pub fn validate_avatar(content_type: &str, size: u64) -> Result<(), AvatarError> {
    if !ALLOWED_AVATAR_TYPES.contains(&content_type) {
        return Err(AvatarError::UnsupportedType(content_type.to_string()));
    }
    if size > MAX_AVATAR_BYTES {
        return Err(AvatarError::TooLarge(size));
    }
    Ok(())
}

/// Content type guessed from a file extension, for local avatar files.
pub fn content_type_for(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" => Some("image/jpg"),
        "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
