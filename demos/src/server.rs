use std::time::{Duration, Instant};

use anyhow::Result;

use tankrc::protocol::{requests, vehicle::Obstacle};
use tankrc_emulator::{EmulatorOption, TankEmulator};
use tankrc_link::{
    sleep::{Sleep, SpinSleeper},
    BackendLink, BackendOption,
};

const TICK: Duration = Duration::from_millis(20);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:5555".to_string());

    let mut link = BackendLink::new(requests::registry(), BackendOption::default());
    link.listen(addr.parse()?)?;
    tracing::info!(addr = %link.local_addr()?, "battle server up");

    let mut vehicle = TankEmulator::new(EmulatorOption {
        players: vec!["sample".to_string()],
        obstacles: vec![
            Obstacle::new(150.0, 0.0, 20.0, 20.0),
            Obstacle::new(-150.0, 150.0, 40.0, 10.0),
        ],
        ..EmulatorOption::default()
    });

    let sleeper = SpinSleeper::default();
    let mut next = Instant::now() + TICK;
    loop {
        link.update(&mut vehicle);
        vehicle.tick(TICK.as_secs_f64());
        sleeper.sleep_until(next);
        next += TICK;
    }
}
