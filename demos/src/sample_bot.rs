use anyhow::Result;

use tankrc::prelude::*;

/// Drives a square patrol, shooting from each corner, and reacts to the
/// backend's notifications.
struct PatrolBot {
    laps: usize,
}

impl Robot for PatrolBot {
    fn run(&mut self, tank: &mut Tank) {
        tracing::info!(
            players = ?tank.players(),
            size = tank.battlefield_size(),
            "entering the field"
        );
        tank.set_speed(0.8);
        tank.execute();
        while self.laps < 4 && tank.is_connected() {
            tank.ahead(60.0);
            tank.fire();
            tank.turn_left(90.0);
            tank.dispatch_events(self);
            self.laps += 1;
        }
    }

    fn on_hit_wall(&mut self, tank: &mut Tank, bearing_deg: f64) {
        tracing::warn!(bearing_deg, "wall contact, backing off");
        tank.back(20.0);
    }

    fn on_death(&mut self, _tank: &mut Tank) {
        tracing::error!("destroyed");
    }

    fn on_spawn(&mut self, _tank: &mut Tank) {
        tracing::info!("back on the field");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:5555".to_string());

    let tank = Tank::connect(addr.parse()?, FrontendOption::default())?;
    let handle = spawn_robot(PatrolBot { laps: 0 }, tank)?;
    let mut tank = handle
        .join()
        .map_err(|_| anyhow::anyhow!("bot thread panicked"))?;
    tracing::info!(x = tank.x(), y = tank.y(), "patrol finished");
    tank.close();
    Ok(())
}
