//! Core contracts of the tankrc remote-control protocol: the message and
//! registry plumbing, the fixed-capacity framing buffers, and the link
//! state machine shared by both connection roles.

pub mod error;
pub mod framing;
pub mod message;
pub mod protocol;
pub mod registry;
pub mod state;
