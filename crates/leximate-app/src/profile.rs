//! Profile editor with avatar upload.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use leximate_client::ProfileBackend;
use leximate_core::Profile;
use leximate_core::profile::validate_avatar;
use tracing::{error, info, warn};

use crate::notice::{Notice, Notifier};

pub const UPLOAD_FAILED: &str = "Image upload failed";
pub const PROFILE_UPDATED: &str = "Profile updated successfully";
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile";

/// An avatar file chosen but not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarSelection {
    pub path: PathBuf,
    pub content_type: String,
    pub size: u64,
}

pub struct ProfileEditor<B> {
    backend: Arc<B>,
    notifier: Arc<dyn Notifier>,
    profile: Profile,
    avatar: Option<AvatarSelection>,
}

impl<B: ProfileBackend> ProfileEditor<B> {
    pub fn new(backend: Arc<B>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            profile: Profile::default(),
            avatar: None,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn avatar(&self) -> Option<&AvatarSelection> {
        self.avatar.as_ref()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        self.profile.set(key, value)
    }

    pub async fn load(&mut self) -> bool {
        match self.backend.get_profile().await {
            Ok(user) => {
                self.profile.merge_from(&user);
                true
            }
            Err(e) => {
                warn!(error = %e, "could not load profile");
                false
            }
        }
    }

    pub fn select_avatar(&mut self, path: &Path, content_type: &str, size: u64) -> bool {
        match validate_avatar(content_type, size) {
            Ok(()) => {
                self.avatar = Some(AvatarSelection {
                    path: path.to_path_buf(),
                    content_type: content_type.to_string(),
                    size,
                });
                true
            }
            Err(e) => {
                self.notifier.notify(Notice::failure(e.to_string()));
                false
            }
        }
    }

    /// Upload the selected avatar (if any), then persist the profile.
    ///
    /// A failed upload is reported and the save goes ahead with the old URL.
    pub async fn save(&mut self) -> bool {
        if let Some(sel) = self.avatar.clone() {
            match self.upload(&sel).await {
                Ok(url) => {
                    info!(url = %url, "avatar uploaded");
                    self.profile.avatar_url = url;
                }
                Err(e) => {
                    error!(path = %sel.path.display(), error = %e, "avatar upload failed");
                    self.notifier.notify(Notice::failure(UPLOAD_FAILED));
                }
            }
        }

        match self.backend.update_profile(&self.profile).await {
            Ok(user) => {
                self.profile.merge_from(&user);
                self.avatar = None;
                self.notifier.notify(Notice::info(PROFILE_UPDATED));
                true
            }
            Err(e) => {
                error!(error = %e, "profile update failed");
                self.notifier.notify(Notice::failure(PROFILE_UPDATE_FAILED));
                false
            }
        }
    }

    async fn upload(&self, sel: &AvatarSelection) -> Result<String, leximate_client::ApiError> {
        let bytes = tokio::fs::read(&sel.path).await?;
        let file_name = sel
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_string());
        self.backend
            .upload_avatar(&file_name, &sel.content_type, bytes)
            .await
    }
}
