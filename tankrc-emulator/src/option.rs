use std::f64::consts::FRAC_PI_4;

use tankrc_protocol::vehicle::Obstacle;

/// Arena and hull parameters of a [`TankEmulator`](crate::TankEmulator).
#[derive(Debug, Clone, PartialEq)]
pub struct EmulatorOption {
    /// Side length of the square arena, centered on the origin.
    pub battlefield_size: f64,
    /// Hull dimensions reported to the bot.
    pub width: f64,
    pub length: f64,
    pub height: f64,
    /// Full-throttle drive speed, world units per second.
    pub top_speed: f64,
    /// Full-throttle turn rate, radians per second.
    pub top_turn_rate: f64,
    /// Heat one shot adds; the gun refuses to fire until it is cold.
    pub heat_per_shot: f64,
    /// Heat shed per second.
    pub cooling_rate: f64,
    /// Initial control tick length, seconds.
    pub tick_duration: f64,
    /// Roster reported by `GetPlayers`.
    pub players: Vec<String>,
    /// Boxes reported by `GetObstacles`.
    pub obstacles: Vec<Obstacle>,
}

impl Default for EmulatorOption {
    fn default() -> Self {
        Self {
            battlefield_size: 800.0,
            width: 2.8,
            length: 6.0,
            height: 2.05,
            top_speed: 25.0,
            top_turn_rate: FRAC_PI_4,
            heat_per_shot: 3.5,
            cooling_rate: 1.0,
            tick_duration: 0.05,
            players: Vec::new(),
            obstacles: Vec::new(),
        }
    }
}
