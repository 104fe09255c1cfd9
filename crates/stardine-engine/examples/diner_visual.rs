//! Watch aliens queue up at the star diner.
//!
//! Run with:
//!   cargo run --example diner_visual --features renderer -p stardine-engine [scene.json]
//!
//! A scripted host stands in for the game: it seats a new customer whenever
//! there is room, and each order resolves a few seconds later. Orders
//! alternate between served correctly, served wrong, missed on the conveyor,
//! and dismissed before the tray resolves, so every mood shows up.

use std::collections::HashMap;

use stardine_engine::prelude::*;

/// Frames between a customer sitting down and their order resolving.
const ORDER_FRAMES: u64 = 360;

/// Frames to wait after a departure before seating someone new.
const SEAT_GAP_FRAMES: u64 = 90;

struct DinerScript {
    /// Open trays and the frame their order was placed.
    orders: HashMap<TrayId, u64>,
    /// Trays whose customer should be dismissed once they reach the bar.
    dismissals: Vec<TrayId>,
    served: u32,
    next_seat_at: u64,
}

impl DinerScript {
    fn new() -> Self {
        Self {
            orders: HashMap::new(),
            dismissals: Vec::new(),
            served: 0,
            next_seat_at: 0,
        }
    }

    fn drive(&mut self, frames: &mut FrameLoop) {
        let now = frames.frame_count();

        if now >= self.next_seat_at {
            if let Some((tray, customer)) = frames.spawn_customer() {
                tracing::info!(%tray, %customer, "customer seated");
                self.orders.insert(tray, now);
                self.next_seat_at = now + SEAT_GAP_FRAMES;
            }
        }

        let due: Vec<TrayId> = self
            .orders
            .iter()
            .filter(|(_, &placed)| now.saturating_sub(placed) >= ORDER_FRAMES)
            .map(|(&tray, _)| tray)
            .collect();

        for tray in due {
            self.orders.remove(&tray);
            let outcome = self.served % 4;
            self.served += 1;
            match outcome {
                0 => {
                    frames.trays_mut().finish(tray, true);
                }
                1 => {
                    frames.trays_mut().finish(tray, false);
                }
                2 => {
                    if let Some(status) = frames.trays_mut().get_mut(tray) {
                        status.passed_finish = true;
                    }
                }
                _ => self.dismissals.push(tray),
            }
            tracing::info!(%tray, outcome, "order resolved");
        }

        // A customer still walking in cannot be dismissed yet.
        self.dismissals.retain(|&tray| !frames.dismiss_customer(tray));
    }
}

fn main() -> Result<(), anyhow::Error> {
    stardine_engine::init_tracing("warn")?;

    let scene = match std::env::args().nth(1) {
        Some(path) => SceneConfig::from_path(&path)?,
        None => SceneConfig::default(),
    };
    let width = scene.backdrop.width as u32;
    let height = scene.backdrop.height as u32;

    let frames = FrameLoop::new(scene, 0x00D1_7E57, FrameConfig::default());
    let mut script = DinerScript::new();

    run_windowed(
        frames,
        move |frames| script.drive(frames),
        "Stardine",
        width,
        height,
    )
}
