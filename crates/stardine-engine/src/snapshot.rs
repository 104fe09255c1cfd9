//! Scene snapshots for debugging and test assertions.
//!
//! A [`SceneSnapshot`] captures everything needed to understand a frame
//! after the fact: the frame number, every customer's full state, and the
//! tray flags they are reading. It serializes to JSON so it can be logged
//! or diffed between runs.

use serde::{Deserialize, Serialize};
use stardine_scene::customer::Customer;
use stardine_scene::tray::{OrderTrays, TrayId, TrayStatus};

use crate::frame::FrameLoop;

/// A serializable capture of a [`FrameLoop`] at a frame boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Frames executed when the snapshot was taken.
    pub frame: u64,
    /// Scene time in seconds.
    pub scene_time: f64,
    /// Active customers in spawn order.
    pub customers: Vec<Customer>,
    /// Status of every tray a customer is bound to, sorted by tray id.
    /// Trays unknown to the board are omitted.
    pub trays: Vec<(TrayId, TrayStatus)>,
}

impl SceneSnapshot {
    /// Capture the current state of `frames`.
    pub fn capture(frames: &FrameLoop) -> Self {
        let customers = frames.customers().customers().to_vec();
        let mut trays: Vec<(TrayId, TrayStatus)> = customers
            .iter()
            .filter_map(|c| frames.trays().status(c.tray()).map(|s| (c.tray(), s)))
            .collect();
        trays.sort_by_key(|(id, _)| *id);
        trays.dedup_by_key(|(id, _)| *id);

        Self {
            frame: frames.frame_count(),
            scene_time: frames.scene_time(),
            customers,
            trays,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
