// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scripted asset-port double.

use orrery_core::{AssetPort, AssetStatus, Resources, TextureData};
use std::collections::{HashMap, VecDeque};

/// One step of a scripted load.
#[derive(Clone, Debug)]
pub enum ScriptedLoad {
    /// Report the load as still in flight.
    Pending,
    /// Resolve with the given pixels.
    Ready(TextureData),
    /// Resolve as failed.
    Failed,
}

/// Asset port replaying a per-path script. Paths with no script fail on
/// first poll; resolved statuses are sticky, matching the port contract.
#[derive(Debug, Default)]
pub struct ScriptedAssets {
    scripts: HashMap<String, VecDeque<ScriptedLoad>>,
    resolved: HashMap<String, AssetStatus>,
}

impl ScriptedAssets {
    /// Empty script set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: program `path` with `steps`.
    pub fn script(mut self, path: &str, steps: Vec<ScriptedLoad>) -> Self {
        self.scripts.insert(path.to_string(), steps.into());
        self
    }

    /// Builder: `path` resolves to a white pixel on the first poll.
    pub fn immediate(self, path: &str) -> Self {
        self.script(path, vec![ScriptedLoad::Ready(crate::white_pixel())])
    }

    /// Builder: `path` stays pending for `ticks` polls, then resolves.
    pub fn delayed(self, path: &str, ticks: usize) -> Self {
        let mut steps = vec![ScriptedLoad::Pending; ticks];
        steps.push(ScriptedLoad::Ready(crate::white_pixel()));
        self.script(path, steps)
    }

    /// Builder: `path` fails on the first poll.
    pub fn failing(self, path: &str) -> Self {
        self.script(path, vec![ScriptedLoad::Failed])
    }
}

impl AssetPort for ScriptedAssets {
    fn poll_texture(&mut self, path: &str, resources: &mut Resources) -> AssetStatus {
        if let Some(status) = self.resolved.get(path) {
            return *status;
        }
        let step = self
            .scripts
            .get_mut(path)
            .and_then(VecDeque::pop_front)
            .unwrap_or(ScriptedLoad::Failed);
        match step {
            ScriptedLoad::Pending => AssetStatus::Pending,
            ScriptedLoad::Ready(data) => {
                let handle = resources.create_texture(data);
                let status = AssetStatus::Ready(handle);
                self.resolved.insert(path.to_string(), status);
                status
            }
            ScriptedLoad::Failed => {
                self.resolved.insert(path.to_string(), AssetStatus::Failed);
                AssetStatus::Failed
            }
        }
    }
}
