//! The customer lifecycle manager.
//!
//! [`CustomerLifecycleManager`] owns every customer on screen. The host calls
//! [`spawn`](CustomerLifecycleManager::spawn) when a new order comes in,
//! [`update`](CustomerLifecycleManager::update) once per frame, and
//! [`render`](CustomerLifecycleManager::render) after clearing its surface.
//!
//! The manager never owns trays. Each frame it asks an [`OrderTrays`] lookup
//! whether a customer's tray is done or has passed the finish line, and if
//! so sends the customer away with a mood derived from the outcome.
//!
//! # Example
//!
//! ```
//! use stardine_scene::prelude::*;
//!
//! let mut trays = TrayBoard::new();
//! let mut customers = CustomerLifecycleManager::new(CustomerConfig::default(), 7);
//!
//! let tray = trays.open();
//! let id = customers.spawn(tray);
//!
//! trays.finish(tray, true);
//! let report = customers.update(&trays);
//! assert_eq!(report.departed, vec![(id, Mood::Happy)]);
//! ```

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::CustomerConfig;
use crate::customer::{Customer, CustomerId, CustomerState, CustomerTraits, Mood};
use crate::draw::RenderSurface;
use crate::tray::{OrderTrays, TrayId, TrayStatus};

// ---------------------------------------------------------------------------
// FrameReport
// ---------------------------------------------------------------------------

/// What happened to customers during one [`update`](CustomerLifecycleManager::update).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameReport {
    /// Customers that reached the bar this frame.
    pub arrived: Vec<CustomerId>,
    /// Customers that started leaving because their tray finished.
    pub departed: Vec<(CustomerId, Mood)>,
    /// Customers that walked off screen and were dropped.
    pub removed: Vec<CustomerId>,
}

impl FrameReport {
    /// Whether nothing changed state this frame.
    pub fn is_quiet(&self) -> bool {
        self.arrived.is_empty() && self.departed.is_empty() && self.removed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CustomerLifecycleManager
// ---------------------------------------------------------------------------

/// Spawns, moves, dismisses and draws alien customers.
///
/// All randomness comes from a seeded [`Pcg32`], so two managers built with
/// the same config and seed spawn identical customers.
#[derive(Debug, Clone)]
pub struct CustomerLifecycleManager {
    config: CustomerConfig,
    customers: Vec<Customer>,
    rng: Pcg32,
    next_id: u32,
}

impl CustomerLifecycleManager {
    /// Create an empty manager.
    ///
    /// The config is expected to have passed
    /// [`CustomerConfig::validate`]. An invalid one never panics, but spans
    /// that cannot be sampled collapse to their `min` and customers may
    /// never arrive.
    pub fn new(config: CustomerConfig, seed: u64) -> Self {
        Self {
            config,
            customers: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Spawn a customer waiting on `tray`, with randomly drawn traits.
    ///
    /// The visible-customer cap is the caller's business; check
    /// [`has_room`](Self::has_room) first.
    pub fn spawn(&mut self, tray: TrayId) -> CustomerId {
        let traits = CustomerTraits::roll(&self.config, &mut self.rng);
        self.spawn_with(tray, traits)
    }

    /// Spawn a customer with explicit traits.
    pub fn spawn_with(&mut self, tray: TrayId, traits: CustomerTraits) -> CustomerId {
        let id = CustomerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        debug!(
            customer = %id,
            %tray,
            silhouette = ?traits.silhouette,
            target_x = traits.target_x,
            walk_speed = traits.walk_speed,
            "customer spawned"
        );
        self.customers
            .push(Customer::new(id, tray, self.config.entry_x, traits));
        id
    }

    /// Dismiss the customer waiting on `tray`, if it is standing at the bar.
    ///
    /// The customer leaves with a neutral mood since no outcome is known.
    /// Customers still walking in, already leaving, or not bound to `tray`
    /// are left alone. Returns whether a customer was dismissed.
    pub fn mark_departing(&mut self, tray: TrayId) -> bool {
        let Some(customer) = self
            .customers
            .iter_mut()
            .find(|c| c.tray() == tray && c.state().is_idle())
        else {
            trace!(%tray, "dismissal ignored: no customer at the bar for tray");
            return false;
        };
        customer.begin_leaving(Mood::Neutral);
        debug!(%tray, customer = %customer.id(), "customer dismissed");
        true
    }

    /// Advance every customer by one frame.
    ///
    /// 1. Bob phases advance for everyone.
    /// 2. Each customer not already leaving checks its tray; a done or
    ///    passed-finish tray sends it away with a mood from `completed`.
    ///    This applies to approaching customers as well.
    /// 3. Each customer moves according to its state.
    /// 4. Leaving customers past `exit_x` are removed.
    ///
    /// Steps 2-4 run in a single retaining pass, so removals never skip or
    /// repeat a neighbour.
    pub fn update<T: OrderTrays + ?Sized>(&mut self, trays: &T) -> FrameReport {
        for customer in &mut self.customers {
            customer.advance_phase();
        }

        let mut report = FrameReport::default();
        let config = &self.config;

        self.customers.retain_mut(|customer| {
            if !customer.state().is_leaving() {
                let finished = trays
                    .status(customer.tray())
                    .filter(TrayStatus::is_finished);
                if let Some(status) = finished {
                    let mood = Mood::from_outcome(status.completed);
                    let was = customer.state();
                    customer.begin_leaving(mood);
                    debug!(
                        customer = %customer.id(),
                        tray = %customer.tray(),
                        from = ?was,
                        ?mood,
                        "customer leaving"
                    );
                    report.departed.push((customer.id(), mood));
                }
            }

            if customer.step(config) {
                debug!(customer = %customer.id(), x = customer.x(), "customer arrived at bar");
                report.arrived.push(customer.id());
            }

            if customer.has_exited(config.exit_x) {
                debug!(customer = %customer.id(), mood = ?customer.mood(), "customer removed");
                report.removed.push(customer.id());
                return false;
            }
            true
        });

        report
    }

    /// Draw every active customer onto `surface` at
    /// [`Depth::CUSTOMERS`](crate::draw::Depth::CUSTOMERS).
    ///
    /// Does not clear the surface; the host clears once per frame before
    /// drawing all layers.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        for customer in &self.customers {
            let position = customer.render_position(self.config.bob_amplitude);
            customer
                .silhouette()
                .draw(surface, position, customer.mood(), customer.bob_phase());
        }
    }

    // -- accessors ----------------------------------------------------------

    /// Active customers in spawn order.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// The active customer with `id`, if it has not been removed.
    pub fn get(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id() == id)
    }

    /// The first customer waiting on `tray`.
    pub fn find_by_tray(&self, tray: TrayId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.tray() == tray)
    }

    /// Number of active customers.
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Whether no customers are active.
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Whether another customer fits under `max_visible`.
    pub fn has_room(&self) -> bool {
        self.customers.len() < self.config.max_visible
    }

    /// Number of customers in each state: approaching, idle, leaving.
    pub fn state_counts(&self) -> (usize, usize, usize) {
        self.customers
            .iter()
            .fold((0, 0, 0), |(a, i, l), c| match c.state() {
                CustomerState::Approaching => (a + 1, i, l),
                CustomerState::Idle => (a, i + 1, l),
                CustomerState::Leaving { .. } => (a, i, l + 1),
            })
    }

    /// The config customers are rolled and moved with.
    pub fn config(&self) -> &CustomerConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::silhouette::Silhouette;
    use crate::tray::TrayBoard;

    fn traits(target_x: f32, walk_speed: f32) -> CustomerTraits {
        CustomerTraits {
            target_x,
            y: 270.0,
            walk_speed,
            silhouette: Silhouette::Tentacle,
            bob_phase: 0.0,
            bob_speed: 0.08,
        }
    }

    #[test]
    fn spawn_starts_off_screen_left_and_approaching() {
        let config = CustomerConfig::default();
        let mut mgr = CustomerLifecycleManager::new(config.clone(), 1);
        let id = mgr.spawn(TrayId(3));
        let c = mgr.get(id).unwrap();
        assert_eq!(c.x(), config.entry_x);
        assert_eq!(c.state(), CustomerState::Approaching);
        assert_eq!(c.tray(), TrayId(3));
        assert_eq!(c.mood(), Mood::Neutral);
    }

    #[test]
    fn ids_are_unique() {
        let mut mgr = CustomerLifecycleManager::new(CustomerConfig::default(), 1);
        let a = mgr.spawn(TrayId(0));
        let b = mgr.spawn(TrayId(0));
        assert_ne!(a, b);
    }

    #[test]
    fn same_seed_same_customers() {
        let mut a = CustomerLifecycleManager::new(CustomerConfig::default(), 42);
        let mut b = CustomerLifecycleManager::new(CustomerConfig::default(), 42);
        for i in 0..5 {
            a.spawn(TrayId(i));
            b.spawn(TrayId(i));
        }
        assert_eq!(a.customers(), b.customers());
    }

    #[test]
    fn manager_does_not_enforce_visible_cap() {
        let mut mgr = CustomerLifecycleManager::new(CustomerConfig::default(), 1);
        for i in 0..3 {
            assert!(mgr.has_room());
            mgr.spawn(TrayId(i));
        }
        assert!(!mgr.has_room());
        mgr.spawn(TrayId(9));
        assert_eq!(mgr.len(), 4);
    }

    #[test]
    fn mark_departing_ignores_approaching_customer() {
        let mut mgr = CustomerLifecycleManager::new(CustomerConfig::default(), 1);
        mgr.spawn_with(TrayId(0), traits(300.0, 1.0));
        let before = mgr.customers().to_vec();
        assert!(!mgr.mark_departing(TrayId(0)));
        assert_eq!(mgr.customers(), before.as_slice());
    }

    #[test]
    fn mark_departing_sends_idle_customer_away_neutral() {
        let mut config = CustomerConfig::default();
        config.entry_x = 0.0;
        let mut mgr = CustomerLifecycleManager::new(config, 1);
        let id = mgr.spawn_with(TrayId(0), traits(4.0, 2.0));
        let board = TrayBoard::new();
        mgr.update(&board);
        let report = mgr.update(&board);
        assert_eq!(report.arrived, vec![id]);

        assert!(mgr.mark_departing(TrayId(0)));
        assert_eq!(
            mgr.get(id).unwrap().state(),
            CustomerState::Leaving { mood: Mood::Neutral }
        );
        // Already leaving: a second dismissal changes nothing.
        assert!(!mgr.mark_departing(TrayId(0)));
    }

    #[test]
    fn mark_departing_finds_idle_customer_behind_a_leaving_one() {
        let mut config = CustomerConfig::default();
        config.entry_x = 0.0;
        let mut mgr = CustomerLifecycleManager::new(config, 1);
        let shared = TrayId(5);
        let first = mgr.spawn_with(shared, traits(2.0, 2.0));
        let second = mgr.spawn_with(shared, traits(2.0, 2.0));
        mgr.update(&TrayBoard::new());
        assert!(mgr.mark_departing(shared));
        assert!(mgr.get(first).unwrap().state().is_leaving());

        assert!(mgr.mark_departing(shared));
        assert_eq!(
            mgr.get(second).unwrap().state(),
            CustomerState::Leaving { mood: Mood::Neutral }
        );
    }

    #[test]
    fn spawn_survives_unsampleable_spans() {
        let config = CustomerConfig {
            target_x: crate::config::Span::new(-f32::MAX, f32::MAX),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let mut mgr = CustomerLifecycleManager::new(config, 1);
        let id = mgr.spawn(TrayId(0));
        assert_eq!(mgr.get(id).unwrap().target_x(), -f32::MAX);
    }

    #[test]
    fn unknown_tray_reads_as_unfinished() {
        let mut mgr = CustomerLifecycleManager::new(CustomerConfig::default(), 1);
        mgr.spawn(TrayId(77));
        let report = mgr.update(&TrayBoard::new());
        assert!(report.departed.is_empty());
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn state_counts_tally_each_state() {
        let mut config = CustomerConfig::default();
        config.entry_x = 0.0;
        let mut mgr = CustomerLifecycleManager::new(config, 1);
        let mut board = TrayBoard::new();
        let t0 = board.open();
        let t1 = board.open();
        let t2 = board.open();
        mgr.spawn_with(t0, traits(1.0, 1.0));
        mgr.spawn_with(t1, traits(500.0, 1.0));
        mgr.spawn_with(t2, traits(500.0, 1.0));
        board.finish(t2, false);
        mgr.update(&board);
        assert_eq!(mgr.state_counts(), (1, 1, 1));
    }
}
