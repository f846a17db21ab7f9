use tankrc_core::{
    error::{LinkError, ParseFailure},
    message::{parse, Message},
};

use crate::{
    replies::{
        GetBattleFieldSizeReply, GetDistanceRemainingReply, GetGunHeatReply, GetHeadingReply,
        GetHeightReply, GetLengthReply, GetObstaclesReply, GetPlayersReply, GetTickDurationReply,
        GetTickRemainingReply, GetTurnRemainingReply, GetWidthReply, GetXReply, GetYReply,
        GetZReply,
    },
    requests::Request,
    vehicle::{ProcessOutcome, ReplySink, Vehicle},
};

macro_rules! get_request {
    (@define $(#[$doc:meta])* $ty:ident, $name:literal, { $($guard:tt)* }, |$vehicle:ident| $reply:expr) => {
        $(#[$doc])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        pub struct $ty;

        impl Message for $ty {
            fn command_name(&self) -> &'static str {
                $name
            }

            fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
                parse::expect_args(args, 0)
            }

            fn write_parameters(&self, _out: &mut String) {}
        }

        impl Request for $ty {
            fn process(
                &self,
                $vehicle: &mut dyn Vehicle,
                sink: &mut dyn ReplySink,
            ) -> Result<ProcessOutcome, LinkError> {
                $($guard)*
                sink.post_reply(&$reply)?;
                Ok(ProcessOutcome::Done)
            }
        }
    };
    ($(#[$doc:meta])* $ty:ident, $name:literal, |$vehicle:ident| $reply:expr) => {
        get_request!(@define $(#[$doc])* $ty, $name, {}, |$vehicle| $reply);
    };
    ($(#[$doc:meta])* $ty:ident, $name:literal, steady, |$vehicle:ident| $reply:expr) => {
        get_request!(
            @define $(#[$doc])* $ty, $name,
            {
                if !$vehicle.steady_state() {
                    return Ok(ProcessOutcome::NotReady);
                }
            },
            |$vehicle| $reply
        );
    };
}

get_request!(GetX, "GetX", |vehicle| GetXReply::new(vehicle.position().0));
get_request!(GetY, "GetY", |vehicle| GetYReply::new(vehicle.position().1));
get_request!(GetZ, "GetZ", |vehicle| GetZReply::new(vehicle.position().2));
get_request!(
    /// Replies in degrees; the vehicle tracks radians.
    GetHeading, "GetHeading",
    |vehicle| GetHeadingReply::new(vehicle.heading().to_degrees())
);
get_request!(
    /// State-guarded: heat is only meaningful on a steady tick.
    GetGunHeat, "GetGunHeat", steady,
    |vehicle| GetGunHeatReply::new(vehicle.gun_heat())
);
get_request!(
    /// State-guarded.
    GetDistanceRemaining, "GetDistanceRemaining", steady,
    |vehicle| GetDistanceRemainingReply::new(vehicle.distance_remaining())
);
get_request!(
    /// State-guarded. Replies in degrees, positive to the left.
    GetTurnRemaining, "GetTurnRemaining", steady,
    |vehicle| GetTurnRemainingReply::new(vehicle.turn_remaining().to_degrees())
);
get_request!(
    GetBattleFieldSize, "GetBattleFieldSize",
    |vehicle| GetBattleFieldSizeReply::new(vehicle.battlefield_size())
);
get_request!(GetWidth, "GetWidth", |vehicle| GetWidthReply::new(vehicle.width()));
get_request!(GetLength, "GetLength", |vehicle| GetLengthReply::new(vehicle.length()));
get_request!(GetHeight, "GetHeight", |vehicle| GetHeightReply::new(vehicle.height()));
get_request!(
    GetPlayers, "GetPlayers",
    |vehicle| GetPlayersReply::new(vehicle.players())
);
get_request!(
    GetObstacles, "GetObstacles",
    |vehicle| GetObstaclesReply::new(vehicle.obstacles())
);
get_request!(
    GetTickDuration, "GetTickDuration",
    |vehicle| GetTickDurationReply::new(vehicle.tick_duration())
);
get_request!(
    GetTickRemaining, "GetTickRemaining",
    |vehicle| GetTickRemainingReply::new(vehicle.tick_remaining())
);

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::testing::{MockVehicle, RecordingSink};

    fn reply_value(line: &str) -> f64 {
        line.split_whitespace()
            .nth(1)
            .and_then(|token| token.parse().ok())
            .unwrap()
    }

    #[test]
    fn queries_reply_with_the_live_value() -> anyhow::Result<()> {
        let mut vehicle = MockVehicle::default();
        vehicle.position = (5.0, -3.0, 0.25);
        vehicle.battlefield_size = 800.0;
        let mut sink = RecordingSink::default();
        GetX.process(&mut vehicle, &mut sink)?;
        GetY.process(&mut vehicle, &mut sink)?;
        GetBattleFieldSize.process(&mut vehicle, &mut sink)?;
        assert_eq!(
            vec!["GetX 5\n", "GetY -3\n", "GetBattleFieldSize 800\n"],
            sink.lines
        );
        Ok(())
    }

    #[test]
    fn angles_cross_the_wire_in_degrees() -> anyhow::Result<()> {
        let mut vehicle = MockVehicle::default();
        vehicle.steady = true;
        vehicle.heading_rad = std::f64::consts::FRAC_PI_2;
        vehicle.turn_remaining_rad = -std::f64::consts::PI;
        let mut sink = RecordingSink::default();
        GetHeading.process(&mut vehicle, &mut sink)?;
        GetTurnRemaining.process(&mut vehicle, &mut sink)?;
        assert_relative_eq!(90.0, reply_value(&sink.lines[0]));
        assert_relative_eq!(-180.0, reply_value(&sink.lines[1]));
        Ok(())
    }

    #[test]
    fn guarded_queries_wait_for_a_steady_vehicle() -> anyhow::Result<()> {
        let mut vehicle = MockVehicle::default();
        vehicle.steady = false;
        vehicle.gun_heat = 2.5;
        let mut sink = RecordingSink::default();
        assert_eq!(
            ProcessOutcome::NotReady,
            GetGunHeat.process(&mut vehicle, &mut sink)?
        );
        assert_eq!(
            ProcessOutcome::NotReady,
            GetDistanceRemaining.process(&mut vehicle, &mut sink)?
        );
        assert!(sink.lines.is_empty());

        vehicle.steady = true;
        GetGunHeat.process(&mut vehicle, &mut sink)?;
        assert_eq!(vec!["GetGunHeat 2.5\n"], sink.lines);
        Ok(())
    }

    #[test]
    fn list_queries_serialize_the_roster_and_boxes() -> anyhow::Result<()> {
        let mut vehicle = MockVehicle::default();
        vehicle.players = vec!["alpha".into(), "bravo".into()];
        vehicle.obstacles = vec![crate::vehicle::Obstacle::new(0.0, 0.0, 10.0, 10.0)];
        let mut sink = RecordingSink::default();
        GetPlayers.process(&mut vehicle, &mut sink)?;
        GetObstacles.process(&mut vehicle, &mut sink)?;
        assert_eq!(
            vec!["GetPlayers 2 alpha bravo\n", "GetObstacles 1 0 0 10 10\n"],
            sink.lines
        );
        Ok(())
    }

    #[test]
    fn queries_take_no_arguments() {
        let mut request = GetX;
        assert_eq!(
            Err(ParseFailure::InvalidArgumentCount {
                expected: 0,
                got: 1
            }),
            request.parse(&["junk"])
        );
    }
}
