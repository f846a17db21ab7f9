use std::{
    collections::VecDeque,
    f64::consts::{FRAC_PI_2, PI, TAU},
};

use getset::CopyGetters;
use tankrc_protocol::{
    events::{Death, Event, HitWall, Spawn},
    vehicle::{Obstacle, Vehicle},
};

use crate::EmulatorOption;

/// Residual motion smaller than this is treated as arrived.
const MOTION_EPSILON: f64 = 1e-3;

/// Hull collision radius as a fraction of hull length.
const RADIUS_FACTOR: f64 = 0.72;

/// Queued events are dropped oldest-first past this depth.
const EVENT_QUEUE_CAP: usize = 64;

#[derive(Debug, Default, Clone, Copy)]
struct Pending {
    speed: Option<f64>,
    turn_rate: Option<f64>,
    distance: Option<f64>,
    turn: Option<f64>,
    fire: bool,
}

/// The emulated hull. Advance it with [`TankEmulator::tick`]; drive it
/// through the [`Vehicle`] impl.
#[derive(Debug, CopyGetters)]
pub struct TankEmulator {
    option: EmulatorOption,
    /// Simulation time, seconds since creation.
    #[getset(get_copy = "pub")]
    clock: f64,
    #[getset(get_copy = "pub")]
    x: f64,
    #[getset(get_copy = "pub")]
    y: f64,
    heading: f64,
    speed_frac: f64,
    turn_rate_frac: f64,
    distance_remaining: f64,
    turn_remaining: f64,
    stopped: bool,
    saved_distance: f64,
    saved_turn: f64,
    pending: Pending,
    last_execute: f64,
    tick_duration: f64,
    gun_heat: f64,
    #[getset(get_copy = "pub")]
    alive: bool,
    events: VecDeque<Box<dyn Event>>,
}

impl TankEmulator {
    #[must_use]
    pub fn new(option: EmulatorOption) -> Self {
        let tick_duration = option.tick_duration;
        Self {
            option,
            clock: 0.0,
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            speed_frac: 1.0,
            turn_rate_frac: 1.0,
            distance_remaining: 0.0,
            turn_remaining: 0.0,
            stopped: false,
            saved_distance: 0.0,
            saved_turn: 0.0,
            pending: Pending::default(),
            last_execute: f64::NEG_INFINITY,
            tick_duration,
            gun_heat: 0.0,
            alive: true,
            events: VecDeque::new(),
        }
    }

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        self.clock += dt;
        self.gun_heat = (self.gun_heat - dt * self.option.cooling_rate).max(0.0);
        if self.alive && !self.stopped {
            self.advance_turn(dt);
            self.advance_drive(dt);
        }
    }

    /// Destroy the hull: motion halts and a `Death` event is queued.
    pub fn kill(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.distance_remaining = 0.0;
        self.turn_remaining = 0.0;
        tracing::debug!("vehicle destroyed");
        self.push_event(Box::new(Death));
    }

    /// Put the hull back at the origin and queue a `Spawn` event.
    pub fn respawn(&mut self) {
        if self.alive {
            return;
        }
        self.alive = true;
        self.x = 0.0;
        self.y = 0.0;
        self.heading = 0.0;
        self.gun_heat = 0.0;
        self.push_event(Box::new(Spawn));
    }

    fn radius(&self) -> f64 {
        RADIUS_FACTOR * self.option.length
    }

    fn advance_turn(&mut self, dt: f64) {
        if self.turn_remaining.abs() < MOTION_EPSILON {
            self.turn_remaining = 0.0;
            return;
        }
        let step = self.option.top_turn_rate * self.turn_rate_frac * dt;
        let step = step.min(self.turn_remaining.abs()) * self.turn_remaining.signum();
        self.heading = (self.heading + step).rem_euclid(TAU);
        self.turn_remaining -= step;
    }

    fn advance_drive(&mut self, dt: f64) {
        if self.distance_remaining.abs() < MOTION_EPSILON {
            self.distance_remaining = 0.0;
            return;
        }
        let step = self.option.top_speed * self.speed_frac * dt;
        let step = step.min(self.distance_remaining.abs()) * self.distance_remaining.signum();
        self.x += self.heading.cos() * step;
        self.y += self.heading.sin() * step;
        self.distance_remaining -= step;
        self.check_walls();
    }

    fn check_walls(&mut self) {
        let bound = self.option.battlefield_size / 2.0 - self.radius();
        let mut wall_heading = None;
        if self.x > bound {
            self.x = bound;
            wall_heading = Some(0.0);
        } else if self.x < -bound {
            self.x = -bound;
            wall_heading = Some(PI);
        }
        if self.y > bound {
            self.y = bound;
            wall_heading = Some(FRAC_PI_2);
        } else if self.y < -bound {
            self.y = -bound;
            wall_heading = Some(-FRAC_PI_2);
        }
        if let Some(wall) = wall_heading {
            self.distance_remaining = 0.0;
            let bearing = normalize_relative(wall - self.heading).to_degrees();
            tracing::debug!(bearing, "hull hit a wall");
            self.push_event(Box::new(HitWall::new(bearing)));
        }
    }

    fn push_event(&mut self, event: Box<dyn Event>) {
        self.events.push_back(event);
        while self.events.len() > EVENT_QUEUE_CAP {
            self.events.pop_front();
        }
    }
}

impl Default for TankEmulator {
    fn default() -> Self {
        Self::new(EmulatorOption::default())
    }
}

/// Fold an angle into (-π, π].
fn normalize_relative(angle: f64) -> f64 {
    let folded = angle.rem_euclid(TAU);
    if folded > PI {
        folded - TAU
    } else {
        folded
    }
}

impl Vehicle for TankEmulator {
    fn steady_state(&self) -> bool {
        self.clock >= self.last_execute + self.tick_duration
    }

    fn set_pending_speed(&mut self, speed: f64) {
        self.pending.speed = Some(speed);
    }

    fn set_pending_turn_rate(&mut self, rate: f64) {
        self.pending.turn_rate = Some(rate);
    }

    fn set_pending_distance(&mut self, distance: f64) {
        self.pending.distance = Some(distance);
    }

    fn set_pending_turn(&mut self, radians: f64) {
        self.pending.turn = Some(radians);
    }

    fn queue_fire(&mut self) {
        self.pending.fire = true;
    }

    fn execute_pending(&mut self) {
        if let Some(speed) = self.pending.speed.take() {
            self.speed_frac = speed;
        }
        if let Some(rate) = self.pending.turn_rate.take() {
            self.turn_rate_frac = rate;
        }
        if let Some(distance) = self.pending.distance.take() {
            self.distance_remaining = distance;
        }
        if let Some(turn) = self.pending.turn.take() {
            self.turn_remaining = turn;
        }
        if std::mem::take(&mut self.pending.fire) && self.alive && self.gun_heat == 0.0 {
            self.gun_heat = self.option.heat_per_shot;
            tracing::debug!("shot fired");
        }
        self.last_execute = self.clock;
    }

    fn stop(&mut self, overwrite: bool) {
        if self.stopped && !overwrite {
            return;
        }
        self.stopped = true;
        self.saved_distance = self.distance_remaining;
        self.saved_turn = self.turn_remaining;
        self.distance_remaining = 0.0;
        self.turn_remaining = 0.0;
    }

    fn resume(&mut self) {
        if !self.stopped {
            return;
        }
        self.stopped = false;
        self.distance_remaining = self.saved_distance;
        self.turn_remaining = self.saved_turn;
        self.saved_distance = 0.0;
        self.saved_turn = 0.0;
    }

    fn position(&self) -> (f64, f64, f64) {
        (self.x, self.y, 0.0)
    }

    fn heading(&self) -> f64 {
        self.heading
    }

    fn gun_heat(&self) -> f64 {
        self.gun_heat
    }

    fn distance_remaining(&self) -> f64 {
        self.distance_remaining
    }

    fn turn_remaining(&self) -> f64 {
        self.turn_remaining
    }

    fn battlefield_size(&self) -> f64 {
        self.option.battlefield_size
    }

    fn width(&self) -> f64 {
        self.option.width
    }

    fn length(&self) -> f64 {
        self.option.length
    }

    fn height(&self) -> f64 {
        self.option.height
    }

    fn players(&self) -> Vec<String> {
        self.option.players.clone()
    }

    fn obstacles(&self) -> Vec<Obstacle> {
        self.option.obstacles.clone()
    }

    fn tick_duration(&self) -> f64 {
        self.tick_duration
    }

    fn set_tick_duration(&mut self, seconds: f64) {
        self.tick_duration = seconds;
    }

    fn tick_remaining(&self) -> f64 {
        (self.last_execute + self.tick_duration - self.clock).max(0.0)
    }

    fn take_events(&mut self) -> Vec<Box<dyn Event>> {
        self.events.drain(..).collect()
    }
}
