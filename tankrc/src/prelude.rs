pub use crate::{
    error::BotError,
    robot::Robot,
    runtime::{spawn_robot, BotHandle},
    tank::{Tank, TankEvent},
};

pub use tankrc_core::state::LinkState;
pub use tankrc_link::FrontendOption;
pub use tankrc_protocol::vehicle::Obstacle;
