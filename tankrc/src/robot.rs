use crate::tank::Tank;

/// A bot program.
///
/// `run` is the robot's main and is called once on the bot thread; it
/// gets the tank for as long as it wants it. The `on_` callbacks fire
/// from [`Tank::dispatch_events`], which bot code calls wherever in its
/// loop it wants notifications handled.
pub trait Robot {
    /// Drive the tank.
    fn run(&mut self, tank: &mut Tank);

    fn on_hit_wall(&mut self, _tank: &mut Tank, _bearing_deg: f64) {}

    fn on_death(&mut self, _tank: &mut Tank) {}

    fn on_spawn(&mut self, _tank: &mut Tank) {}
}
