//! Shared test doubles for the command handler tests.

use tankrc_core::{error::LinkError, message::Message};

use crate::{
    events::Event,
    replies::Reply,
    vehicle::{Obstacle, ReplySink, Vehicle},
};

/// Scripted vehicle that records every mutation and answers queries from
/// canned fields.
#[derive(Debug, Default)]
pub struct MockVehicle {
    pub steady: bool,
    pub pending_speed: Option<f64>,
    pub pending_turn_rate: Option<f64>,
    pub pending_distance: Option<f64>,
    pub pending_turn: Option<f64>,
    pub fire_count: usize,
    pub execute_count: usize,
    pub stops: Vec<bool>,
    pub resume_count: usize,
    pub position: (f64, f64, f64),
    pub heading_rad: f64,
    pub gun_heat: f64,
    pub distance_remaining: f64,
    pub turn_remaining_rad: f64,
    pub battlefield_size: f64,
    pub width: f64,
    pub length: f64,
    pub height: f64,
    pub players: Vec<String>,
    pub obstacles: Vec<Obstacle>,
    pub tick_duration: f64,
    pub tick_remaining: f64,
    pub queued_events: Vec<Box<dyn Event>>,
}

impl Vehicle for MockVehicle {
    fn steady_state(&self) -> bool {
        self.steady
    }

    fn set_pending_speed(&mut self, speed: f64) {
        self.pending_speed = Some(speed);
    }

    fn set_pending_turn_rate(&mut self, rate: f64) {
        self.pending_turn_rate = Some(rate);
    }

    fn set_pending_distance(&mut self, distance: f64) {
        self.pending_distance = Some(distance);
    }

    fn set_pending_turn(&mut self, radians: f64) {
        self.pending_turn = Some(radians);
    }

    fn queue_fire(&mut self) {
        self.fire_count += 1;
    }

    fn execute_pending(&mut self) {
        self.execute_count += 1;
    }

    fn stop(&mut self, overwrite: bool) {
        self.stops.push(overwrite);
    }

    fn resume(&mut self) {
        self.resume_count += 1;
    }

    fn position(&self) -> (f64, f64, f64) {
        self.position
    }

    fn heading(&self) -> f64 {
        self.heading_rad
    }

    fn gun_heat(&self) -> f64 {
        self.gun_heat
    }

    fn distance_remaining(&self) -> f64 {
        self.distance_remaining
    }

    fn turn_remaining(&self) -> f64 {
        self.turn_remaining_rad
    }

    fn battlefield_size(&self) -> f64 {
        self.battlefield_size
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn players(&self) -> Vec<String> {
        self.players.clone()
    }

    fn obstacles(&self) -> Vec<Obstacle> {
        self.obstacles.clone()
    }

    fn tick_duration(&self) -> f64 {
        self.tick_duration
    }

    fn set_tick_duration(&mut self, seconds: f64) {
        self.tick_duration = seconds;
    }

    fn tick_remaining(&self) -> f64 {
        self.tick_remaining
    }

    fn take_events(&mut self) -> Vec<Box<dyn Event>> {
        std::mem::take(&mut self.queued_events)
    }
}

/// Sink that keeps the serialized form of every posted reply.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
}

impl ReplySink for RecordingSink {
    fn post_reply(&mut self, reply: &dyn Reply) -> Result<(), LinkError> {
        self.lines.push(reply.to_wire());
        Ok(())
    }
}
