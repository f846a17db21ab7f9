//! Concrete message vocabulary of the tankrc wire protocol: the request,
//! reply and event families, the simulation handle requests dispatch into,
//! and the cached state replies write back out.

pub mod cache;
pub mod events;
pub mod replies;
pub mod requests;
pub mod vehicle;

pub use tankrc_core::message::Message;

#[cfg(test)]
pub(crate) mod testing;
