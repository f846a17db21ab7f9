use getset::{CopyGetters, Getters};

use crate::vehicle::Obstacle;

/// Values replies write into and the blocking bot API reads back out.
///
/// Every reply popped by a waiting call is applied here in pop order, so
/// the cache always holds the newest answer seen and a duplicate or stale
/// ack can never corrupt it. Angles are cached in degrees, the unit they
/// cross the wire in.
#[derive(Debug, Default, Clone, Getters, CopyGetters)]
pub struct TankState {
    #[getset(get_copy = "pub")]
    pub(crate) x: f64,
    #[getset(get_copy = "pub")]
    pub(crate) y: f64,
    #[getset(get_copy = "pub")]
    pub(crate) z: f64,
    #[getset(get_copy = "pub")]
    pub(crate) heading_deg: f64,
    #[getset(get_copy = "pub")]
    pub(crate) gun_heat: f64,
    #[getset(get_copy = "pub")]
    pub(crate) distance_remaining: f64,
    #[getset(get_copy = "pub")]
    pub(crate) turn_remaining_deg: f64,
    #[getset(get_copy = "pub")]
    pub(crate) battlefield_size: f64,
    #[getset(get_copy = "pub")]
    pub(crate) width: f64,
    #[getset(get_copy = "pub")]
    pub(crate) length: f64,
    #[getset(get_copy = "pub")]
    pub(crate) height: f64,
    #[getset(get_copy = "pub")]
    pub(crate) tick_duration: f64,
    #[getset(get_copy = "pub")]
    pub(crate) tick_remaining: f64,
    #[getset(get = "pub")]
    pub(crate) players: Vec<String>,
    #[getset(get = "pub")]
    pub(crate) obstacles: Vec<Obstacle>,
}
