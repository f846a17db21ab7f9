use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use approx::{assert_abs_diff_eq, assert_relative_eq};
use tankrc::prelude::*;
use tankrc_emulator::{EmulatorOption, TankEmulator};
use tankrc_link::{BackendLink, BackendOption};
use tankrc_protocol::requests;

/// Backend and emulator on their own thread, one millisecond of simulated
/// time per frame.
struct Server {
    addr: SocketAddr,
    stop: Arc<AtomicBool>,
    kill: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Server {
    fn spawn(option: EmulatorOption) -> anyhow::Result<Self> {
        let mut link = BackendLink::new(requests::registry(), BackendOption::default());
        link.listen("127.0.0.1:0".parse()?)?;
        let addr = link.local_addr()?;
        let stop = Arc::new(AtomicBool::new(false));
        let kill = Arc::new(AtomicBool::new(false));
        let thread = std::thread::Builder::new()
            .name("bot-test-server".to_string())
            .spawn({
                let stop = Arc::clone(&stop);
                let kill = Arc::clone(&kill);
                move || {
                    let mut vehicle = TankEmulator::new(option);
                    while !stop.load(Ordering::Relaxed) {
                        if kill.swap(false, Ordering::Relaxed) {
                            vehicle.kill();
                        }
                        link.update(&mut vehicle);
                        vehicle.tick(0.001);
                        std::thread::sleep(Duration::from_millis(1));
                    }
                }
            })?;
        Ok(Self {
            addr,
            stop,
            kill,
            thread: Some(thread),
        })
    }

    fn connect_tank(&self) -> Result<Tank, BotError> {
        Tank::connect(
            self.addr,
            FrontendOption {
                resend_interval: Duration::from_millis(10),
                ..FrontendOption::default()
            },
        )
    }

    fn kill_vehicle(&self) {
        self.kill.store(true, Ordering::Relaxed);
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[test]
fn blocking_drive_completes_and_reports_position() -> anyhow::Result<()> {
    let server = Server::spawn(EmulatorOption::default())?;
    let mut tank = server.connect_tank()?;

    tank.ahead(5.0);
    assert_eq!(0.0, tank.distance_remaining());
    assert_relative_eq!(5.0, tank.x(), epsilon = 1e-9);
    assert_abs_diff_eq!(0.0, tank.y(), epsilon = 1e-9);
    Ok(())
}

#[test]
fn blocking_turn_then_drive_moves_on_the_new_heading() -> anyhow::Result<()> {
    let option = EmulatorOption {
        top_turn_rate: std::f64::consts::PI,
        ..EmulatorOption::default()
    };
    let server = Server::spawn(option)?;
    let mut tank = server.connect_tank()?;

    tank.turn_left(90.0);
    assert_eq!(0.0, tank.turn_remaining());
    assert_relative_eq!(90.0, tank.heading(), epsilon = 1e-6);

    tank.ahead(5.0);
    assert_relative_eq!(5.0, tank.y(), epsilon = 1e-6);
    assert_abs_diff_eq!(0.0, tank.x(), epsilon = 1e-6);
    Ok(())
}

#[test]
fn fire_heats_the_gun() -> anyhow::Result<()> {
    let server = Server::spawn(EmulatorOption::default())?;
    let mut tank = server.connect_tank()?;

    tank.fire();
    // Cooling runs while the state-guarded query waits out the tick.
    let heat = tank.gun_heat();
    assert!(heat > 3.0 && heat <= 3.5, "gun heat was {heat}");
    Ok(())
}

#[test]
fn death_event_reaches_the_robot_callback() -> anyhow::Result<()> {
    #[derive(Default)]
    struct Recorder {
        deaths: usize,
    }

    impl Robot for Recorder {
        fn run(&mut self, _tank: &mut Tank) {}

        fn on_death(&mut self, _tank: &mut Tank) {
            self.deaths += 1;
        }
    }

    let server = Server::spawn(EmulatorOption::default())?;
    let mut tank = server.connect_tank()?;
    let mut recorder = Recorder::default();
    server.kill_vehicle();

    let deadline = Instant::now() + Duration::from_secs(2);
    while recorder.deaths == 0 {
        assert!(Instant::now() < deadline, "no callback within two seconds");
        tank.dispatch_events(&mut recorder);
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(1, recorder.deaths);
    Ok(())
}

#[test]
fn spawned_robot_runs_and_returns_the_tank() -> anyhow::Result<()> {
    struct Dash;

    impl Robot for Dash {
        fn run(&mut self, tank: &mut Tank) {
            tank.ahead(2.0);
        }
    }

    let server = Server::spawn(EmulatorOption::default())?;
    let tank = server.connect_tank()?;
    let handle = spawn_robot(Dash, tank)?;
    let mut tank = handle.join().expect("bot thread panicked");
    assert_relative_eq!(2.0, tank.x(), epsilon = 1e-9);
    Ok(())
}

#[test]
fn getters_fall_back_to_defaults_once_closed() -> anyhow::Result<()> {
    let server = Server::spawn(EmulatorOption::default())?;
    let mut tank = server.connect_tank()?;
    assert_eq!(800.0, tank.battlefield_size());

    tank.close();
    assert!(!tank.is_connected());
    assert_eq!(0.0, tank.battlefield_size());
    assert!(tank.players().is_empty());
    Ok(())
}
