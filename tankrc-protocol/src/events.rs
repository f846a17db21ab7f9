use tankrc_core::{
    error::ParseFailure,
    message::{parse, Message},
    registry::Registry,
};

/// Backend → frontend notification family.
///
/// Events arrive outside the request/reply rhythm and are queued on the
/// frontend until the bot drains them.
pub trait Event: Message {
    /// Route this event to the matching [`EventListener`] callback.
    fn deliver(&self, listener: &mut dyn EventListener);
}

/// Receiver side of [`Event::deliver`]. Every callback has an empty
/// default body so listeners only override what they care about.
pub trait EventListener {
    fn hit_wall(&mut self, _bearing_deg: f64) {}
    fn death(&mut self) {}
    fn spawn(&mut self) {}
}

/// The hull touched a battlefield wall.
#[derive(derive_new::new, Debug, Default, Clone, Copy, PartialEq)]
pub struct HitWall {
    /// Bearing of the wall relative to the hull, in degrees.
    pub bearing_deg: f64,
}

impl Message for HitWall {
    fn command_name(&self) -> &'static str {
        "HitWall"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 1)?;
        self.bearing_deg = parse::float(args[0])?;
        Ok(())
    }

    fn write_parameters(&self, out: &mut String) {
        use std::fmt::Write;
        let _ = write!(out, " {}", self.bearing_deg);
    }
}

impl Event for HitWall {
    fn deliver(&self, listener: &mut dyn EventListener) {
        listener.hit_wall(self.bearing_deg);
    }
}

/// The vehicle was destroyed.
#[derive(derive_new::new, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Death;

impl Message for Death {
    fn command_name(&self) -> &'static str {
        "Death"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 0)
    }

    fn write_parameters(&self, _out: &mut String) {}
}

impl Event for Death {
    fn deliver(&self, listener: &mut dyn EventListener) {
        listener.death();
    }
}

/// The vehicle re-entered the battlefield.
#[derive(derive_new::new, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Spawn;

impl Message for Spawn {
    fn command_name(&self) -> &'static str {
        "Spawn"
    }

    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure> {
        parse::expect_args(args, 0)
    }

    fn write_parameters(&self, _out: &mut String) {}
}

impl Event for Spawn {
    fn deliver(&self, listener: &mut dyn EventListener) {
        listener.spawn();
    }
}

/// The event vocabulary, explicitly registered once at startup.
#[must_use]
pub fn registry() -> Registry<dyn Event> {
    let mut registry: Registry<dyn Event> = Registry::new();
    registry.register("HitWall", || Box::new(HitWall::default()));
    registry.register("Death", || Box::new(Death));
    registry.register("Spawn", || Box::new(Spawn));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        bearings: Vec<f64>,
        deaths: usize,
        spawns: usize,
    }

    impl EventListener for Recorder {
        fn hit_wall(&mut self, bearing_deg: f64) {
            self.bearings.push(bearing_deg);
        }

        fn death(&mut self) {
            self.deaths += 1;
        }

        fn spawn(&mut self) {
            self.spawns += 1;
        }
    }

    #[rstest::rstest]
    #[case("HitWall -135.5\n")]
    #[case("Death\n")]
    #[case("Spawn\n")]
    #[test]
    fn serialized_form_survives_a_parse_cycle(#[case] wire: &str) -> anyhow::Result<()> {
        let registry = registry();
        let tokens: Vec<&str> = wire.split_whitespace().collect();
        let event = registry.create(tokens[0], &tokens[1..])?;
        assert_eq!(wire, event.to_wire());
        Ok(())
    }

    #[test]
    fn delivery_routes_to_the_matching_callback() -> anyhow::Result<()> {
        let registry = registry();
        let mut recorder = Recorder::default();
        for line in ["HitWall 90", "Death", "Spawn", "HitWall -45"] {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            registry.create(tokens[0], &tokens[1..])?.deliver(&mut recorder);
        }
        assert_eq!(vec![90.0, -45.0], recorder.bearings);
        assert_eq!(1, recorder.deaths);
        assert_eq!(1, recorder.spawns);
        Ok(())
    }

    #[test]
    fn events_with_payload_reject_a_missing_argument() {
        let mut event = HitWall::default();
        assert_eq!(
            Err(ParseFailure::InvalidArgumentCount {
                expected: 1,
                got: 0
            }),
            event.parse(&[])
        );
    }
}
