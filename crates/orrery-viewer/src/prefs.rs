// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved viewer preferences.

use orrery_demos::DemoKind;
use serde::{Deserialize, Serialize};

/// Preferences persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerPrefs {
    /// Demo page shown on startup.
    pub demo: DemoKind,
    /// Present in vsync mode.
    pub vsync: bool,
}

impl Default for ViewerPrefs {
    fn default() -> Self {
        Self {
            demo: DemoKind::Cube,
            vsync: true,
        }
    }
}
