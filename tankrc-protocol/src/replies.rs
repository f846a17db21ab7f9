use itertools::Itertools;
use tankrc_core::{
    error::ParseFailure,
    message::{parse, Message},
    registry::Registry,
};

use crate::{cache::TankState, vehicle::Obstacle};

/// Backend → frontend answer family.
pub trait Reply: Message {
    /// Copy this reply's payload into the caller's cached state.
    fn apply(&self, state: &mut TankState);
}

/// Wire name of the acknowledgement that completes every non-query
/// request.
pub const COMMAND_DONE: &str = "CommandDone";

/// Acknowledges a non-query request by echoing its command name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandDone {
    pub command: String,
}

impl CommandDone {
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Message for CommandDone {
    fn command_name(&self) -> &'static str {
        COMMAND_DONE
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 1)?;
        self.command = args[0].to_string();
        Ok(())
    }

    fn write_parameters(&self, out: &mut String) {
        out.push(' ');
        out.push_str(&self.command);
    }
}

impl Reply for CommandDone {
    fn apply(&self, _state: &mut TankState) {}
}

macro_rules! float_reply {
    ($(#[$doc:meta])* $ty:ident, $name:literal, $field:ident) => {
        $(#[$doc])*
        #[derive(derive_new::new, Debug, Default, Clone, Copy, PartialEq)]
        pub struct $ty {
            pub value: f64,
        }

        impl Message for $ty {
            fn command_name(&self) -> &'static str {
                $name
            }

            fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
                parse::expect_args(args, 1)?;
                self.value = parse::float(args[0])?;
                Ok(())
            }

            fn write_parameters(&self, out: &mut String) {
                use std::fmt::Write;
                let _ = write!(out, " {}", self.value);
            }
        }

        impl Reply for $ty {
            fn apply(&self, state: &mut TankState) {
                state.$field = self.value;
            }
        }
    };
}

float_reply!(
    /// Answer to `GetX`.
    GetXReply, "GetX", x
);
float_reply!(
    /// Answer to `GetY`.
    GetYReply, "GetY", y
);
float_reply!(
    /// Answer to `GetZ`.
    GetZReply, "GetZ", z
);
float_reply!(
    /// Answer to `GetHeading`; degrees.
    GetHeadingReply, "GetHeading", heading_deg
);
float_reply!(
    /// Answer to `GetGunHeat`.
    GetGunHeatReply, "GetGunHeat", gun_heat
);
float_reply!(
    /// Answer to `GetDistanceRemaining`; world units.
    GetDistanceRemainingReply, "GetDistanceRemaining", distance_remaining
);
float_reply!(
    /// Answer to `GetTurnRemaining`; degrees, positive to the left.
    GetTurnRemainingReply, "GetTurnRemaining", turn_remaining_deg
);
float_reply!(
    /// Answer to `GetBattleFieldSize`.
    GetBattleFieldSizeReply, "GetBattleFieldSize", battlefield_size
);
float_reply!(
    /// Answer to `GetWidth`.
    GetWidthReply, "GetWidth", width
);
float_reply!(
    /// Answer to `GetLength`.
    GetLengthReply, "GetLength", length
);
float_reply!(
    /// Answer to `GetHeight`.
    GetHeightReply, "GetHeight", height
);
float_reply!(
    /// Answer to `GetTickDuration`; seconds.
    GetTickDurationReply, "GetTickDuration", tick_duration
);
float_reply!(
    /// Answer to `GetTickRemaining`; seconds.
    GetTickRemainingReply, "GetTickRemaining", tick_remaining
);

/// Answer to `GetPlayers`: the roster as `<n> <callsign>...`.
#[derive(derive_new::new, Debug, Default, Clone, PartialEq, Eq)]
pub struct GetPlayersReply {
    pub players: Vec<String>,
}

impl Message for GetPlayersReply {
    fn command_name(&self) -> &'static str {
        "GetPlayers"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        if args.is_empty() {
            return Err(ParseFailure::InvalidArgumentCount {
                expected: 1,
                got: 0,
            });
        }
        let n = parse::count(args[0])?;
        parse::expect_args(args, 1 + n)?;
        self.players = args[1..].iter().map(ToString::to_string).collect();
        Ok(())
    }

    fn write_parameters(&self, out: &mut String) {
        use std::fmt::Write;
        let _ = write!(out, " {}", self.players.len());
        if !self.players.is_empty() {
            let _ = write!(out, " {}", self.players.iter().join(" "));
        }
    }
}

impl Reply for GetPlayersReply {
    fn apply(&self, state: &mut TankState) {
        state.players = self.players.clone();
    }
}

/// Answer to `GetObstacles`: `<n>` then `<x> <y> <width> <height>` per box.
#[derive(derive_new::new, Debug, Default, Clone, PartialEq)]
pub struct GetObstaclesReply {
    pub obstacles: Vec<Obstacle>,
}

impl Message for GetObstaclesReply {
    fn command_name(&self) -> &'static str {
        "GetObstacles"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        if args.is_empty() {
            return Err(ParseFailure::InvalidArgumentCount {
                expected: 1,
                got: 0,
            });
        }
        let n = parse::count(args[0])?;
        parse::expect_args(args, 1 + 4 * n)?;
        self.obstacles = args[1..]
            .iter()
            .tuples()
            .map(|(x, y, w, h)| {
                Ok(Obstacle::new(
                    parse::float(x)?,
                    parse::float(y)?,
                    parse::float(w)?,
                    parse::float(h)?,
                ))
            })
            .collect::<Result<_, ParseFailure>>()?;
        Ok(())
    }

    fn write_parameters(&self, out: &mut String) {
        use std::fmt::Write;
        let _ = write!(out, " {}", self.obstacles.len());
        for ob in &self.obstacles {
            let _ = write!(out, " {} {} {} {}", ob.x, ob.y, ob.width, ob.height);
        }
    }
}

impl Reply for GetObstaclesReply {
    fn apply(&self, state: &mut TankState) {
        state.obstacles = self.obstacles.clone();
    }
}

/// The reply vocabulary, explicitly registered once at startup.
#[must_use]
pub fn registry() -> Registry<dyn Reply> {
    let mut registry: Registry<dyn Reply> = Registry::new();
    registry.register(COMMAND_DONE, || Box::new(CommandDone::default()));
    registry.register("GetX", || Box::new(GetXReply::default()));
    registry.register("GetY", || Box::new(GetYReply::default()));
    registry.register("GetZ", || Box::new(GetZReply::default()));
    registry.register("GetHeading", || Box::new(GetHeadingReply::default()));
    registry.register("GetGunHeat", || Box::new(GetGunHeatReply::default()));
    registry.register("GetDistanceRemaining", || {
        Box::new(GetDistanceRemainingReply::default())
    });
    registry.register("GetTurnRemaining", || {
        Box::new(GetTurnRemainingReply::default())
    });
    registry.register("GetBattleFieldSize", || {
        Box::new(GetBattleFieldSizeReply::default())
    });
    registry.register("GetWidth", || Box::new(GetWidthReply::default()));
    registry.register("GetLength", || Box::new(GetLengthReply::default()));
    registry.register("GetHeight", || Box::new(GetHeightReply::default()));
    registry.register("GetTickDuration", || {
        Box::new(GetTickDurationReply::default())
    });
    registry.register("GetTickRemaining", || {
        Box::new(GetTickRemainingReply::default())
    });
    registry.register("GetPlayers", || Box::new(GetPlayersReply::default()));
    registry.register("GetObstacles", || Box::new(GetObstaclesReply::default()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("GetX 12.5\n")]
    #[case("GetHeading -90\n")]
    #[case("GetGunHeat 0\n")]
    #[case("GetTurnRemaining 45.25\n")]
    #[case("CommandDone SetAhead\n")]
    #[case("GetPlayers 0\n")]
    #[case("GetPlayers 2 alpha bravo\n")]
    #[case("GetObstacles 0\n")]
    #[case("GetObstacles 2 0 0 10 10 -40 25.5 3 8\n")]
    #[test]
    fn serialized_form_survives_a_parse_cycle(#[case] wire: &str) -> anyhow::Result<()> {
        let registry = registry();
        let tokens: Vec<&str> = wire.split_whitespace().collect();
        let reply = registry.create(tokens[0], &tokens[1..])?;
        assert_eq!(wire, reply.to_wire());
        Ok(())
    }

    #[test]
    fn float_replies_apply_to_their_cache_field() {
        let mut state = TankState::default();
        GetXReply::new(5.5).apply(&mut state);
        GetHeadingReply::new(270.0).apply(&mut state);
        GetDistanceRemainingReply::new(12.0).apply(&mut state);
        assert_eq!(5.5, state.x());
        assert_eq!(270.0, state.heading_deg());
        assert_eq!(12.0, state.distance_remaining());
        // CommandDone is a pure completion signal.
        CommandDone::new("SetAhead").apply(&mut state);
        assert_eq!(5.5, state.x());
    }

    #[test]
    fn list_replies_apply_their_payload() {
        let mut state = TankState::default();
        GetPlayersReply::new(vec!["alpha".into(), "bravo".into()]).apply(&mut state);
        GetObstaclesReply::new(vec![Obstacle::new(1.0, 2.0, 3.0, 4.0)]).apply(&mut state);
        assert_eq!(&vec!["alpha".to_string(), "bravo".to_string()], state.players());
        assert_eq!(1, state.obstacles().len());
        assert_eq!(3.0, state.obstacles()[0].width);
    }

    #[test]
    fn obstacle_count_must_match_the_payload() {
        let mut reply = GetObstaclesReply::default();
        assert_eq!(
            Err(ParseFailure::InvalidArgumentCount {
                expected: 5,
                got: 3
            }),
            reply.parse(&["1", "0", "0"])
        );
    }

    #[test]
    fn nan_payloads_are_rejected() {
        let mut reply = GetXReply::default();
        assert!(matches!(
            reply.parse(&["nan"]),
            Err(ParseFailure::InvalidArguments(_))
        ));
    }
}
