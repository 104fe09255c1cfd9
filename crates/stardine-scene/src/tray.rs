//! Order tray handles and status lookup.
//!
//! Trays belong to the game layer that moves them down the conveyor and
//! matches orders. The scene only ever *reads* three flags from a tray, so a
//! customer holds a [`TrayId`] handle instead of a reference and resolves it
//! through an [`OrderTrays`] lookup each frame.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TrayId
// ---------------------------------------------------------------------------

/// Opaque, non-owning handle to an externally owned order tray.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrayId(pub u32);

impl fmt::Debug for TrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrayId({})", self.0)
    }
}

impl fmt::Display for TrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tray#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TrayStatus
// ---------------------------------------------------------------------------

/// The flags a customer watches on its tray.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayStatus {
    /// The player has declared the order finished.
    pub done: bool,
    /// The tray has ridden the conveyor past the finish line.
    pub passed_finish: bool,
    /// The order on the tray matched what the customer asked for.
    pub completed: bool,
}

impl TrayStatus {
    /// Whether the customer waiting on this tray should leave.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.done || self.passed_finish
    }
}

// ---------------------------------------------------------------------------
// OrderTrays
// ---------------------------------------------------------------------------

/// Read-only lookup from tray handles to their current status.
///
/// Returning `None` means the tray is unknown to the collaborator. The scene
/// treats an unknown tray as still in progress.
pub trait OrderTrays {
    /// Current status of `tray`, if the collaborator knows about it.
    fn status(&self, tray: TrayId) -> Option<TrayStatus>;
}

impl<F> OrderTrays for F
where
    F: Fn(TrayId) -> Option<TrayStatus>,
{
    fn status(&self, tray: TrayId) -> Option<TrayStatus> {
        self(tray)
    }
}

// ---------------------------------------------------------------------------
// TrayBoard
// ---------------------------------------------------------------------------

/// A simple map-backed [`OrderTrays`] implementation.
///
/// Hosts that do not have their own tray store (demos, tests) use this to
/// allocate handles and flip flags.
#[derive(Debug, Default, Clone)]
pub struct TrayBoard {
    trays: HashMap<TrayId, TrayStatus>,
    next_id: u32,
}

impl TrayBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh, unfinished tray and return its handle.
    pub fn open(&mut self) -> TrayId {
        let id = TrayId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.trays.insert(id, TrayStatus::default());
        id
    }

    /// Overwrite the status of a tray. Unknown handles are inserted.
    pub fn set(&mut self, tray: TrayId, status: TrayStatus) {
        self.trays.insert(tray, status);
    }

    /// Mutable access to a tray's flags.
    pub fn get_mut(&mut self, tray: TrayId) -> Option<&mut TrayStatus> {
        self.trays.get_mut(&tray)
    }

    /// Mark a tray done, recording whether the order was correct.
    ///
    /// Returns `false` if the tray is unknown.
    pub fn finish(&mut self, tray: TrayId, completed: bool) -> bool {
        match self.trays.get_mut(&tray) {
            Some(status) => {
                status.done = true;
                status.completed = completed;
                true
            }
            None => false,
        }
    }

    /// Forget a tray. Customers still bound to it read as unfinished.
    pub fn close(&mut self, tray: TrayId) -> Option<TrayStatus> {
        self.trays.remove(&tray)
    }

    /// Keep only the trays for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(TrayId, &TrayStatus) -> bool) {
        self.trays.retain(|&id, status| keep(id, status));
    }

    /// Number of trays on the board.
    pub fn len(&self) -> usize {
        self.trays.len()
    }

    /// Whether the board has no trays.
    pub fn is_empty(&self) -> bool {
        self.trays.is_empty()
    }
}

impl OrderTrays for TrayBoard {
    fn status(&self, tray: TrayId) -> Option<TrayStatus> {
        self.trays.get(&tray).copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_allocates_distinct_unfinished_trays() {
        let mut board = TrayBoard::new();
        let a = board.open();
        let b = board.open();
        assert_ne!(a, b);
        assert_eq!(board.len(), 2);
        assert_eq!(board.status(a), Some(TrayStatus::default()));
        assert!(!board.status(b).unwrap().is_finished());
    }

    #[test]
    fn finish_sets_done_and_outcome() {
        let mut board = TrayBoard::new();
        let tray = board.open();
        assert!(board.finish(tray, true));
        let status = board.status(tray).unwrap();
        assert!(status.done);
        assert!(status.completed);
        assert!(status.is_finished());
    }

    #[test]
    fn finish_unknown_tray_is_rejected() {
        let mut board = TrayBoard::new();
        assert!(!board.finish(TrayId(42), true));
        assert!(board.is_empty());
    }

    #[test]
    fn retain_drops_rejected_trays() {
        let mut board = TrayBoard::new();
        let keep = board.open();
        let gone = board.open();
        board.finish(gone, false);
        board.retain(|_, status| !status.is_finished());
        assert!(board.status(keep).is_some());
        assert!(board.status(gone).is_none());
    }

    #[test]
    fn passed_finish_alone_counts_as_finished() {
        let status = TrayStatus {
            passed_finish: true,
            ..Default::default()
        };
        assert!(status.is_finished());
    }

    #[test]
    fn closures_act_as_tray_lookups() {
        let lookup = |id: TrayId| {
            (id == TrayId(1)).then_some(TrayStatus {
                done: true,
                ..Default::default()
            })
        };
        assert!(lookup.status(TrayId(1)).unwrap().done);
        assert!(lookup.status(TrayId(2)).is_none());
    }
}
