//! Configuration schema for bdapt.
//!
//! Pure types only. Loading lives in `crate::infra::config`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::manifest::DEFAULT_MAINTAINER;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_DATA_DIR: &str = "/etc/bdapt";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/bdapt/config.yaml";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `/etc/bdapt/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BdaptConfig {
    /// Directory holding `bundles.json` and the process lock.
    pub data_dir: PathBuf,
    /// Package manager used for previews and applies.
    pub apt_program: String,
    /// Metapackage build tool.
    pub equivs_program: String,
    /// Tool that reads and sets the manual-install mark.
    pub apt_mark_program: String,
    /// `Maintainer` field of generated metapackages.
    pub maintainer: String,
    /// Re-run through `sudo` when a mutating command starts unprivileged.
    pub escalate: bool,
}

impl Default for BdaptConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            apt_program: "apt-get".to_string(),
            equivs_program: "equivs-build".to_string(),
            apt_mark_program: "apt-mark".to_string(),
            maintainer: DEFAULT_MAINTAINER.to_string(),
            escalate: true,
        }
    }
}
