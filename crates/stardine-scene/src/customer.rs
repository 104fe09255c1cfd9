//! Alien customer entities.
//!
//! A [`Customer`] walks in from the left, waits at the bar while its tray is
//! being prepared, and walks out to the right once the tray is finished. The
//! lifecycle is an explicit three-state machine:
//!
//! ```text
//! Approaching --(x reaches target_x)--> Idle --(tray finished)--> Leaving --(x > exit_x)--> removed
//!      \______________________(tray finished)________________________/
//! ```
//!
//! The mood a customer leaves with lives inside [`CustomerState::Leaving`],
//! so it can only be written by the transition itself.

use std::f32::consts::TAU;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::CustomerConfig;
use crate::draw::Point;
use crate::silhouette::Silhouette;
use crate::tray::TrayId;

// ---------------------------------------------------------------------------
// CustomerId
// ---------------------------------------------------------------------------

/// Identifier assigned to each customer at spawn. Never reused by a manager.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub u32);

impl fmt::Debug for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomerId({})", self.0)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alien#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Mood
// ---------------------------------------------------------------------------

/// How a customer feels about its order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    #[default]
    Neutral,
    Unhappy,
}

impl Mood {
    /// Mood implied by a finished tray: happy iff the order was correct.
    #[inline]
    pub fn from_outcome(completed: bool) -> Self {
        if completed {
            Mood::Happy
        } else {
            Mood::Unhappy
        }
    }

    /// Signed score: `+1`, `0` or `-1`.
    #[inline]
    pub fn score(self) -> i8 {
        match self {
            Mood::Happy => 1,
            Mood::Neutral => 0,
            Mood::Unhappy => -1,
        }
    }
}

// ---------------------------------------------------------------------------
// CustomerState
// ---------------------------------------------------------------------------

/// Lifecycle state of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerState {
    /// Walking in toward the bar.
    Approaching,
    /// At the bar, swaying in place.
    Idle,
    /// Walking out. Terminal until removal.
    Leaving { mood: Mood },
}

impl CustomerState {
    #[inline]
    pub fn is_leaving(&self) -> bool {
        matches!(self, CustomerState::Leaving { .. })
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, CustomerState::Idle)
    }

    /// Mood shown while in this state. Only leaving customers have one.
    #[inline]
    pub fn mood(&self) -> Mood {
        match *self {
            CustomerState::Leaving { mood } => mood,
            _ => Mood::Neutral,
        }
    }
}

// ---------------------------------------------------------------------------
// CustomerTraits
// ---------------------------------------------------------------------------

/// Everything about a customer that is decided once, at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomerTraits {
    /// Bar position the customer walks to.
    pub target_x: f32,
    /// Standing height on screen.
    pub y: f32,
    /// X advance per frame while approaching.
    pub walk_speed: f32,
    pub silhouette: Silhouette,
    /// Starting phase of the bob animation, in `[0, 2pi)`.
    pub bob_phase: f32,
    /// Phase increment per frame.
    pub bob_speed: f32,
}

impl CustomerTraits {
    /// Draw a fresh set of traits from the configured ranges.
    pub fn roll<R: Rng>(config: &CustomerConfig, rng: &mut R) -> Self {
        Self {
            target_x: config.target_x.sample(rng),
            y: config.y.sample(rng),
            walk_speed: config.walk_speed.sample(rng),
            silhouette: Silhouette::ALL[rng.gen_range(0..Silhouette::ALL.len())],
            bob_phase: rng.gen_range(0.0..TAU),
            bob_speed: config.bob_speed.sample(rng),
        }
    }
}

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

/// One alien on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    tray: TrayId,
    x: f32,
    traits: CustomerTraits,
    bob_phase: f32,
    state: CustomerState,
}

impl Customer {
    pub(crate) fn new(id: CustomerId, tray: TrayId, entry_x: f32, traits: CustomerTraits) -> Self {
        Self {
            id,
            tray,
            x: entry_x,
            bob_phase: traits.bob_phase,
            traits,
            state: CustomerState::Approaching,
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    /// The tray this customer is waiting on.
    pub fn tray(&self) -> TrayId {
        self.tray
    }

    pub fn state(&self) -> CustomerState {
        self.state
    }

    pub fn mood(&self) -> Mood {
        self.state.mood()
    }

    pub fn traits(&self) -> &CustomerTraits {
        &self.traits
    }

    pub fn silhouette(&self) -> Silhouette {
        self.traits.silhouette
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    /// Resting y, without the bob.
    pub fn y(&self) -> f32 {
        self.traits.y
    }

    pub fn target_x(&self) -> f32 {
        self.traits.target_x
    }

    pub fn bob_phase(&self) -> f32 {
        self.bob_phase
    }

    /// Where the silhouette is drawn this frame: resting position plus the
    /// vertical bob.
    pub fn render_position(&self, bob_amplitude: f32) -> Point {
        Point::new(self.x, self.traits.y + bob_amplitude * self.bob_phase.sin())
    }

    // -- lifecycle ----------------------------------------------------------

    pub(crate) fn advance_phase(&mut self) {
        self.bob_phase += self.traits.bob_speed;
    }

    /// Enter `Leaving` with `mood`. Returns `false` (and changes nothing) if
    /// the customer is already leaving.
    pub(crate) fn begin_leaving(&mut self, mood: Mood) -> bool {
        if self.state.is_leaving() {
            return false;
        }
        self.state = CustomerState::Leaving { mood };
        true
    }

    /// Move one frame according to the current state. Returns `true` on the
    /// frame the customer arrives at the bar.
    pub(crate) fn step(&mut self, config: &CustomerConfig) -> bool {
        match self.state {
            CustomerState::Approaching => {
                self.x += self.traits.walk_speed;
                if self.x >= self.traits.target_x {
                    self.x = self.traits.target_x;
                    self.state = CustomerState::Idle;
                    return true;
                }
                false
            }
            CustomerState::Idle => {
                let sway = (self.bob_phase * config.sway_dampening).sin();
                self.x = self.traits.target_x + config.sway_amplitude * sway;
                false
            }
            CustomerState::Leaving { .. } => {
                self.x += config.leave_speed_factor * self.traits.walk_speed;
                false
            }
        }
    }

    /// Whether a leaving customer has walked past `exit_x`.
    pub(crate) fn has_exited(&self, exit_x: f32) -> bool {
        self.state.is_leaving() && self.x > exit_x
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
