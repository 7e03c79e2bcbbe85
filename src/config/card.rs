use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_AVATAR_MAX_BYTES: usize = 5 * 1024 * 1024; // 5MB

#[derive(Debug, Clone, Deserialize)]
pub struct CardSettings {
    pub assets_dir: String,
    #[serde(default = "default_avatar_timeout_secs")]
    pub avatar_timeout_secs: u64,
    #[serde(default = "default_avatar_max_bytes")]
    pub avatar_max_bytes: usize,
    #[serde(default = "default_head_to_head_limit")]
    pub head_to_head_limit: i64,
    /// Lets avatars be fetched from loopback and private network hosts.
    #[serde(default)]
    pub avatar_allow_private_hosts: bool,
}

fn default_avatar_timeout_secs() -> u64 {
    6
}

fn default_avatar_max_bytes() -> usize {
    DEFAULT_AVATAR_MAX_BYTES
}

fn default_head_to_head_limit() -> i64 {
    3
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            assets_dir: "assets".to_string(),
            avatar_timeout_secs: default_avatar_timeout_secs(),
            avatar_max_bytes: default_avatar_max_bytes(),
            head_to_head_limit: default_head_to_head_limit(),
            avatar_allow_private_hosts: false,
        }
    }
}

impl CardSettings {
    pub fn avatar_timeout(&self) -> Duration {
        Duration::from_secs(self.avatar_timeout_secs)
    }

    /// Resolve the assets directory.
    ///
    /// Absolute paths are used as-is. Relative paths are looked up next to the
    /// running executable first and then under the crate root, so the server
    /// never depends on the caller's working directory.
    pub fn resolved_assets_dir(&self) -> PathBuf {
        let configured = PathBuf::from(&self.assets_dir);
        if configured.is_absolute() {
            return configured;
        }

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        {
            let candidate = exe_dir.join(&configured);
            if candidate.is_dir() {
                return candidate;
            }
        }

        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(configured)
    }
}
