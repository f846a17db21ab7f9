mod motion;
mod query;

pub use motion::{
    Execute, SetAhead, SetFire, SetResume, SetSpeed, SetStop, SetTickDuration, SetTurnLeft,
    SetTurnRate,
};
pub use query::{
    GetBattleFieldSize, GetDistanceRemaining, GetGunHeat, GetHeading, GetHeight, GetLength,
    GetObstacles, GetPlayers, GetTickDuration, GetTickRemaining, GetTurnRemaining, GetWidth, GetX,
    GetY, GetZ,
};

use tankrc_core::{error::LinkError, message::Message, registry::Registry};

use crate::vehicle::{ProcessOutcome, ReplySink, Vehicle};

/// Frontend → backend command family.
pub trait Request: Message {
    /// Run the command against the vehicle, posting any replies to `sink`.
    ///
    /// State-guarded commands return [`ProcessOutcome::NotReady`] while the
    /// vehicle is mid-tick; the dispatcher drops them without a reply.
    fn process(
        &self,
        vehicle: &mut dyn Vehicle,
        sink: &mut dyn ReplySink,
    ) -> Result<ProcessOutcome, LinkError>;

    /// Wire name of the reply that completes this request.
    fn reply_name(&self) -> &'static str {
        self.command_name()
    }
}

/// The request vocabulary, explicitly registered once at startup.
#[must_use]
pub fn registry() -> Registry<dyn Request> {
    let mut registry: Registry<dyn Request> = Registry::new();
    registry.register("Execute", || Box::new(Execute));
    registry.register("SetAhead", || Box::new(SetAhead::default()));
    registry.register("SetTurnLeft", || Box::new(SetTurnLeft::default()));
    registry.register("SetFire", || Box::new(SetFire));
    registry.register("SetSpeed", || Box::new(SetSpeed::default()));
    registry.register("SetTurnRate", || Box::new(SetTurnRate::default()));
    registry.register("SetResume", || Box::new(SetResume));
    registry.register("SetStop", || Box::new(SetStop::default()));
    registry.register("SetTickDuration", || Box::new(SetTickDuration::default()));
    registry.register("GetX", || Box::new(GetX));
    registry.register("GetY", || Box::new(GetY));
    registry.register("GetZ", || Box::new(GetZ));
    registry.register("GetHeading", || Box::new(GetHeading));
    registry.register("GetGunHeat", || Box::new(GetGunHeat));
    registry.register("GetDistanceRemaining", || Box::new(GetDistanceRemaining));
    registry.register("GetTurnRemaining", || Box::new(GetTurnRemaining));
    registry.register("GetBattleFieldSize", || Box::new(GetBattleFieldSize));
    registry.register("GetWidth", || Box::new(GetWidth));
    registry.register("GetLength", || Box::new(GetLength));
    registry.register("GetHeight", || Box::new(GetHeight));
    registry.register("GetPlayers", || Box::new(GetPlayers));
    registry.register("GetObstacles", || Box::new(GetObstacles));
    registry.register("GetTickDuration", || Box::new(GetTickDuration));
    registry.register("GetTickRemaining", || Box::new(GetTickRemaining));
    registry
}
