use std::thread::JoinHandle;

use crate::{error::BotError, robot::Robot, tank::Tank};

/// Handle on a running bot thread.
#[derive(Debug)]
pub struct BotHandle {
    thread: JoinHandle<Tank>,
}

impl BotHandle {
    /// Wait for the robot's `run` to return and take the tank back.
    pub fn join(self) -> std::thread::Result<Tank> {
        self.thread.join()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

/// Put a robot on its own thread and hand it the tank.
///
/// Robot and tank move in whole; the tank comes back out of
/// [`BotHandle::join`] once `run` returns.
pub fn spawn_robot<R>(mut robot: R, mut tank: Tank) -> Result<BotHandle, BotError>
where
    R: Robot + Send + 'static,
{
    let thread = std::thread::Builder::new()
        .name("tankrc-bot".to_string())
        .spawn(move || {
            tracing::debug!("robot thread up");
            robot.run(&mut tank);
            tracing::debug!("robot finished");
            tank
        })?;
    Ok(BotHandle { thread })
}
