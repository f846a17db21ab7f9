use derive_new::new;
use tankrc_core::error::LinkError;

use crate::{events::Event, replies::Reply};

/// Whether a command handler accepted the request this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Handled; any replies were posted to the sink.
    Done,
    /// The vehicle is mid-tick and the request was dropped. Silent on
    /// purpose: the caller re-sends the identical line until a steady
    /// tick answers it.
    NotReady,
}

/// Where request handlers post their replies.
pub trait ReplySink {
    fn post_reply(&mut self, reply: &dyn Reply) -> Result<(), LinkError>;
}

/// An axis-aligned box on the battlefield floor.
#[derive(new, Debug, Default, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Simulation handle the backend dispatches requests into.
///
/// Immediate setters stage *pending* values that only take effect when an
/// `Execute` commits them; queries read the live kinematic state. Angles
/// cross this trait in radians; degree conversion happens at the wire.
pub trait Vehicle {
    /// Not mid-tick: state-guarded requests may be answered.
    fn steady_state(&self) -> bool;

    fn set_pending_speed(&mut self, speed: f64);
    fn set_pending_turn_rate(&mut self, rate: f64);
    /// Negative distance drives backward.
    fn set_pending_distance(&mut self, distance: f64);
    /// Positive radians turn left.
    fn set_pending_turn(&mut self, radians: f64);
    fn queue_fire(&mut self);
    /// Commit all pending values and start a new control tick.
    fn execute_pending(&mut self);

    /// Pause motion, saving the interrupted residue. `overwrite` replaces
    /// a residue saved by an earlier stop.
    fn stop(&mut self, overwrite: bool);
    /// Continue the motion interrupted by [`Vehicle::stop`].
    fn resume(&mut self);

    fn position(&self) -> (f64, f64, f64);
    /// Heading in radians.
    fn heading(&self) -> f64;
    fn gun_heat(&self) -> f64;
    fn distance_remaining(&self) -> f64;
    /// Remaining turn in radians, positive to the left.
    fn turn_remaining(&self) -> f64;

    /// Side length of the square battlefield.
    fn battlefield_size(&self) -> f64;
    fn width(&self) -> f64;
    fn length(&self) -> f64;
    fn height(&self) -> f64;
    fn players(&self) -> Vec<String>;
    fn obstacles(&self) -> Vec<Obstacle>;

    fn tick_duration(&self) -> f64;
    fn set_tick_duration(&mut self, seconds: f64);
    /// Seconds until the current control tick elapses.
    fn tick_remaining(&self) -> f64;

    /// Unsolicited notifications generated since the last drain, oldest
    /// first.
    fn take_events(&mut self) -> Vec<Box<dyn Event>>;
}
