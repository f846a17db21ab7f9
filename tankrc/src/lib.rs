//! Blocking robot API over the tankrc remote-control link.
//!
//! A [`Tank`] wraps a [`tankrc_link::FrontendLink`] and turns the wire
//! protocol into the classic robot calls: `ahead`, `turn_left`, `fire`
//! and friends block until the backend reports the motion finished. A
//! bot implements [`Robot`] and is put on its own thread with
//! [`spawn_robot`].

pub mod error;
pub mod prelude;
pub mod robot;
pub mod runtime;
pub mod tank;

pub use tankrc_link as link;
pub use tankrc_protocol as protocol;

pub use robot::Robot;
pub use runtime::{spawn_robot, BotHandle};
pub use tank::{Tank, TankEvent};
