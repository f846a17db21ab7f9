use tankrc_core::{
    error::{LinkError, ParseFailure},
    message::{parse, Message},
};

use crate::{
    replies::{CommandDone, COMMAND_DONE},
    requests::Request,
    vehicle::{ProcessOutcome, ReplySink, Vehicle},
};

fn acknowledge(
    command: &'static str,
    sink: &mut dyn ReplySink,
) -> Result<ProcessOutcome, LinkError> {
    sink.post_reply(&CommandDone::new(command))?;
    Ok(ProcessOutcome::Done)
}

/// Commit all pending control values and start a new tick. State-guarded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Execute;

impl Message for Execute {
    fn command_name(&self) -> &'static str {
        "Execute"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 0)
    }

    fn write_parameters(&self, _out: &mut String) {}
}

impl Request for Execute {
    fn process(
        &self,
        vehicle: &mut dyn Vehicle,
        sink: &mut dyn ReplySink,
    ) -> Result<ProcessOutcome, LinkError> {
        if !vehicle.steady_state() {
            return Ok(ProcessOutcome::NotReady);
        }
        vehicle.execute_pending();
        acknowledge(self.command_name(), sink)
    }

    fn reply_name(&self) -> &'static str {
        COMMAND_DONE
    }
}

/// Stage a drive distance for the next `Execute`. Negative is backward.
#[derive(derive_new::new, Debug, Default, Clone, Copy, PartialEq)]
pub struct SetAhead {
    pub distance: f64,
}

impl Message for SetAhead {
    fn command_name(&self) -> &'static str {
        "SetAhead"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 1)?;
        self.distance = parse::float(args[0])?;
        Ok(())
    }

    fn write_parameters(&self, out: &mut String) {
        use std::fmt::Write;
        let _ = write!(out, " {}", self.distance);
    }
}

impl Request for SetAhead {
    fn process(
        &self,
        vehicle: &mut dyn Vehicle,
        sink: &mut dyn ReplySink,
    ) -> Result<ProcessOutcome, LinkError> {
        vehicle.set_pending_distance(self.distance);
        acknowledge(self.command_name(), sink)
    }

    fn reply_name(&self) -> &'static str {
        COMMAND_DONE
    }
}

/// Stage a turn for the next `Execute`. Degrees on the wire, positive
/// turns left.
#[derive(derive_new::new, Debug, Default, Clone, Copy, PartialEq)]
pub struct SetTurnLeft {
    pub degrees: f64,
}

impl Message for SetTurnLeft {
    fn command_name(&self) -> &'static str {
        "SetTurnLeft"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 1)?;
        self.degrees = parse::float(args[0])?;
        Ok(())
    }

    fn write_parameters(&self, out: &mut String) {
        use std::fmt::Write;
        let _ = write!(out, " {}", self.degrees);
    }
}

impl Request for SetTurnLeft {
    fn process(
        &self,
        vehicle: &mut dyn Vehicle,
        sink: &mut dyn ReplySink,
    ) -> Result<ProcessOutcome, LinkError> {
        vehicle.set_pending_turn(self.degrees.to_radians());
        acknowledge(self.command_name(), sink)
    }

    fn reply_name(&self) -> &'static str {
        COMMAND_DONE
    }
}

/// Queue one shot for the next `Execute`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SetFire;

impl Message for SetFire {
    fn command_name(&self) -> &'static str {
        "SetFire"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 0)
    }

    fn write_parameters(&self, _out: &mut String) {}
}

impl Request for SetFire {
    fn process(
        &self,
        vehicle: &mut dyn Vehicle,
        sink: &mut dyn ReplySink,
    ) -> Result<ProcessOutcome, LinkError> {
        vehicle.queue_fire();
        acknowledge(self.command_name(), sink)
    }

    fn reply_name(&self) -> &'static str {
        COMMAND_DONE
    }
}

/// Stage a speed fraction. The argument is clamped into [0, 1] at parse
/// time rather than rejected.
#[derive(derive_new::new, Debug, Default, Clone, Copy, PartialEq)]
pub struct SetSpeed {
    pub speed: f64,
}

impl Message for SetSpeed {
    fn command_name(&self) -> &'static str {
        "SetSpeed"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 1)?;
        self.speed = parse::float_clamped(args[0], 0.0, 1.0)?;
        Ok(())
    }

    fn write_parameters(&self, out: &mut String) {
        use std::fmt::Write;
        let _ = write!(out, " {}", self.speed);
    }
}

impl Request for SetSpeed {
    fn process(
        &self,
        vehicle: &mut dyn Vehicle,
        sink: &mut dyn ReplySink,
    ) -> Result<ProcessOutcome, LinkError> {
        vehicle.set_pending_speed(self.speed);
        acknowledge(self.command_name(), sink)
    }

    fn reply_name(&self) -> &'static str {
        COMMAND_DONE
    }
}

/// Stage a turn-rate fraction, clamped into [0, 1] at parse time.
#[derive(derive_new::new, Debug, Default, Clone, Copy, PartialEq)]
pub struct SetTurnRate {
    pub rate: f64,
}

impl Message for SetTurnRate {
    fn command_name(&self) -> &'static str {
        "SetTurnRate"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 1)?;
        self.rate = parse::float_clamped(args[0], 0.0, 1.0)?;
        Ok(())
    }

    fn write_parameters(&self, out: &mut String) {
        use std::fmt::Write;
        let _ = write!(out, " {}", self.rate);
    }
}

impl Request for SetTurnRate {
    fn process(
        &self,
        vehicle: &mut dyn Vehicle,
        sink: &mut dyn ReplySink,
    ) -> Result<ProcessOutcome, LinkError> {
        vehicle.set_pending_turn_rate(self.rate);
        acknowledge(self.command_name(), sink)
    }

    fn reply_name(&self) -> &'static str {
        COMMAND_DONE
    }
}

/// Continue the motion interrupted by a stop. State-guarded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SetResume;

impl Message for SetResume {
    fn command_name(&self) -> &'static str {
        "SetResume"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 0)
    }

    fn write_parameters(&self, _out: &mut String) {}
}

impl Request for SetResume {
    fn process(
        &self,
        vehicle: &mut dyn Vehicle,
        sink: &mut dyn ReplySink,
    ) -> Result<ProcessOutcome, LinkError> {
        if !vehicle.steady_state() {
            return Ok(ProcessOutcome::NotReady);
        }
        vehicle.resume();
        acknowledge(self.command_name(), sink)
    }

    fn reply_name(&self) -> &'static str {
        COMMAND_DONE
    }
}

/// Pause motion, saving the residue. With `overwrite` set, a residue
/// saved by an earlier stop is replaced. State-guarded.
#[derive(derive_new::new, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SetStop {
    pub overwrite: bool,
}

impl Message for SetStop {
    fn command_name(&self) -> &'static str {
        "SetStop"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 1)?;
        self.overwrite = parse::flag(args[0])?;
        Ok(())
    }

    fn write_parameters(&self, out: &mut String) {
        use std::fmt::Write;
        let _ = write!(out, " {}", u8::from(self.overwrite));
    }
}

impl Request for SetStop {
    fn process(
        &self,
        vehicle: &mut dyn Vehicle,
        sink: &mut dyn ReplySink,
    ) -> Result<ProcessOutcome, LinkError> {
        if !vehicle.steady_state() {
            return Ok(ProcessOutcome::NotReady);
        }
        vehicle.stop(self.overwrite);
        acknowledge(self.command_name(), sink)
    }

    fn reply_name(&self) -> &'static str {
        COMMAND_DONE
    }
}

/// Change the control tick length. Negative arguments clamp to zero.
#[derive(derive_new::new, Debug, Default, Clone, Copy, PartialEq)]
pub struct SetTickDuration {
    pub seconds: f64,
}

impl Message for SetTickDuration {
    fn command_name(&self) -> &'static str {
        "SetTickDuration"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 1)?;
        self.seconds = parse::float(args[0])?.max(0.0);
        Ok(())
    }

    fn write_parameters(&self, out: &mut String) {
        use std::fmt::Write;
        let _ = write!(out, " {}", self.seconds);
    }
}

impl Request for SetTickDuration {
    fn process(
        &self,
        vehicle: &mut dyn Vehicle,
        sink: &mut dyn ReplySink,
    ) -> Result<ProcessOutcome, LinkError> {
        vehicle.set_tick_duration(self.seconds);
        acknowledge(self.command_name(), sink)
    }

    fn reply_name(&self) -> &'static str {
        COMMAND_DONE
    }
}
