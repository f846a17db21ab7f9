use std::net::SocketAddr;

use tankrc_core::{message::Message, state::LinkState};
use tankrc_link::{FrontendLink, FrontendOption};
use tankrc_protocol::{
    cache::TankState,
    events::{self, Event, EventListener},
    replies,
    requests::{self, Request},
    vehicle::Obstacle,
};

use crate::{error::BotError, robot::Robot};

/// Notification decoded off the wire, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TankEvent {
    /// The hull touched a wall; bearing is degrees relative to heading.
    HitWall { bearing_deg: f64 },
    Death,
    Spawn,
}

#[derive(Default)]
struct Collector(Vec<TankEvent>);

impl EventListener for Collector {
    fn hit_wall(&mut self, bearing_deg: f64) {
        self.0.push(TankEvent::HitWall { bearing_deg });
    }

    fn death(&mut self) {
        self.0.push(TankEvent::Death);
    }

    fn spawn(&mut self) {
        self.0.push(TankEvent::Spawn);
    }
}

macro_rules! query {
    ($(#[$doc:meta])* $name:ident, $request:expr, $cached:ident) => {
        $(#[$doc])*
        pub fn $name(&mut self) -> f64 {
            if self.send(&$request) {
                self.state.$cached()
            } else {
                0.0
            }
        }
    };
}

/// Blocking remote control of one tank.
///
/// Every command is a synchronous wire exchange; compound motions like
/// [`Tank::ahead`] additionally poll until the backend reports the motion
/// spent. Queries refresh a local [`TankState`] cache and fall back to
/// zero values whenever the link is down, so a bot loop never hangs on a
/// dead connection.
#[derive(Debug)]
pub struct Tank {
    link: FrontendLink,
    state: TankState,
}

impl Tank {
    /// Connect to a backend and complete the identity exchange.
    pub fn connect(addr: SocketAddr, option: FrontendOption) -> Result<Self, BotError> {
        let link = FrontendLink::connect(addr, replies::registry(), events::registry(), option)?;
        Ok(Self {
            link,
            state: TankState::default(),
        })
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    /// Connection state of the underlying link.
    #[must_use]
    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Drop the connection. Commands issued afterwards log and do nothing.
    pub fn close(&mut self) {
        self.link.close();
    }

    /// One synchronous exchange. A failed call is logged and absorbed:
    /// retries belong to bot logic, not here.
    fn send(&mut self, request: &dyn Request) -> bool {
        match self.link.call(request, &mut self.state) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(command = request.command_name(), %err, "command failed");
                false
            }
        }
    }

    /// Stage a drive for the next commit. Negative distance drives
    /// backward.
    pub fn set_ahead(&mut self, distance: f64) {
        self.send(&requests::SetAhead::new(distance));
    }

    pub fn set_back(&mut self, distance: f64) {
        self.set_ahead(-distance);
    }

    /// Stage a left turn in degrees; negative degrees turn right.
    pub fn set_turn_left(&mut self, degrees: f64) {
        self.send(&requests::SetTurnLeft::new(degrees));
    }

    pub fn set_turn_right(&mut self, degrees: f64) {
        self.set_turn_left(-degrees);
    }

    pub fn set_fire(&mut self) {
        self.send(&requests::SetFire);
    }

    /// Cap the drive speed to a fraction of top speed. The backend clamps
    /// the fraction into [0, 1].
    pub fn set_speed(&mut self, fraction: f64) {
        self.send(&requests::SetSpeed::new(fraction));
    }

    pub fn set_turn_rate(&mut self, fraction: f64) {
        self.send(&requests::SetTurnRate::new(fraction));
    }

    pub fn set_stop(&mut self, overwrite: bool) {
        self.send(&requests::SetStop::new(overwrite));
    }

    pub fn set_resume(&mut self) {
        self.send(&requests::SetResume);
    }

    pub fn set_tick_duration(&mut self, seconds: f64) {
        self.send(&requests::SetTickDuration::new(seconds));
    }

    /// Commit staged values and start a new control tick. Blocks until
    /// the backend reaches a steady tick and acknowledges.
    pub fn execute(&mut self) {
        self.send(&requests::Execute);
    }

    /// A commit cycle with nothing staged: wait out one control tick.
    pub fn do_nothing(&mut self) {
        self.execute();
    }

    /// Drive, blocking until the motion is spent or the link drops.
    /// Negative distance drives backward.
    pub fn ahead(&mut self, distance: f64) {
        self.set_ahead(distance);
        self.execute();
        while self.distance_remaining() != 0.0 {
            self.do_nothing();
        }
    }

    pub fn back(&mut self, distance: f64) {
        self.ahead(-distance);
    }

    /// Turn left, blocking until the turn is spent or the link drops.
    pub fn turn_left(&mut self, degrees: f64) {
        self.set_turn_left(degrees);
        self.execute();
        while self.turn_remaining() != 0.0 {
            self.do_nothing();
        }
    }

    pub fn turn_right(&mut self, degrees: f64) {
        self.turn_left(-degrees);
    }

    /// Fire one shot if the gun is cold.
    pub fn fire(&mut self) {
        self.set_fire();
        self.execute();
    }

    /// Halt, saving the interrupted motion for [`Tank::resume`].
    pub fn stop(&mut self, overwrite: bool) {
        self.set_stop(overwrite);
        self.execute();
    }

    pub fn resume(&mut self) {
        self.set_resume();
        self.execute();
    }

    query!(x, requests::GetX, x);
    query!(y, requests::GetY, y);
    query!(z, requests::GetZ, z);
    query!(
        /// Heading in degrees, counterclockwise from east.
        heading,
        requests::GetHeading,
        heading_deg
    );
    query!(
        /// Remaining gun cooldown. State-guarded: answers only between
        /// control ticks.
        gun_heat,
        requests::GetGunHeat,
        gun_heat
    );
    query!(
        /// Signed remaining drive distance; zero once the motion is spent.
        distance_remaining,
        requests::GetDistanceRemaining,
        distance_remaining
    );
    query!(
        /// Signed remaining turn in degrees, positive to the left.
        turn_remaining,
        requests::GetTurnRemaining,
        turn_remaining_deg
    );
    query!(battlefield_size, requests::GetBattleFieldSize, battlefield_size);
    query!(width, requests::GetWidth, width);
    query!(length, requests::GetLength, length);
    query!(height, requests::GetHeight, height);
    query!(tick_duration, requests::GetTickDuration, tick_duration);
    query!(tick_remaining, requests::GetTickRemaining, tick_remaining);

    /// Names of everyone on the field.
    pub fn players(&mut self) -> Vec<String> {
        if self.send(&requests::GetPlayers) {
            self.state.players().clone()
        } else {
            Vec::new()
        }
    }

    pub fn obstacles(&mut self) -> Vec<Obstacle> {
        if self.send(&requests::GetObstacles) {
            self.state.obstacles().clone()
        } else {
            Vec::new()
        }
    }

    /// Next queued notification, if any.
    pub fn poll_event(&mut self) -> Option<TankEvent> {
        let event = self.link.poll_event()?;
        let mut collector = Collector::default();
        event.deliver(&mut collector);
        collector.0.pop()
    }

    /// Drain queued notifications into the robot's `on_` callbacks. The
    /// callbacks get this tank back, so handlers can steer.
    pub fn dispatch_events(&mut self, robot: &mut dyn Robot) {
        let mut collector = Collector::default();
        while let Some(event) = self.link.poll_event() {
            event.deliver(&mut collector);
        }
        for event in collector.0 {
            match event {
                TankEvent::HitWall { bearing_deg } => robot.on_hit_wall(self, bearing_deg),
                TankEvent::Death => robot.on_death(self),
                TankEvent::Spawn => robot.on_spawn(self),
            }
        }
    }
}
