//! The two ends of a tankrc TCP link.
//!
//! [`backend::BackendLink`] lives inside the simulation process: it owns the
//! listening socket, accepts one frontend at a time, and is pumped once per
//! simulation frame from the host's own loop. [`frontend::FrontendLink`]
//! lives in the bot process: a background thread services the socket while
//! bot code blocks on [`frontend::FrontendLink::call`].

mod connection;

pub mod backend;
pub mod frontend;
pub mod option;
pub mod sleep;

pub use backend::BackendLink;
pub use frontend::FrontendLink;
pub use option::{BackendOption, FrontendOption};
