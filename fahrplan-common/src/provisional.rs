//! Client-minted provisional ids.
//!
//! An optimistic record needs an id before the server has assigned one. A
//! provisional id packs milliseconds since the fahrplan epoch and a small
//! per-generator increment, and sets the high bit so it can never collide
//! with a server-issued id.

use crate::model::Id;
use time::{OffsetDateTime, macros::datetime};

pub const PROVISIONAL_BIT: u64 = 1 << 63;
pub const TIMESTAMP_OFFSET: u64 = 12;
pub const INCREMENT_LENGTH: u64 = 12;

const EPOCH_TIME: OffsetDateTime = datetime!(2025-01-01 00:00 UTC);

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct ProvisionalIdGenerator {
    next_increment: u16,
}

impl ProvisionalIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self { next_increment: 0 }
    }

    pub fn generate_at<Marker>(&mut self, time: OffsetDateTime) -> Id<Marker> {
        let increment = u64::from(self.next_increment);
        self.next_increment = (self.next_increment + 1) % (1 << INCREMENT_LENGTH);

        let millis = (time - EPOCH_TIME).whole_milliseconds();
        let millis = u64::try_from(millis.max(0)).unwrap_or(0);

        Id::new(PROVISIONAL_BIT | (millis << TIMESTAMP_OFFSET) | increment)
    }

    pub fn generate<Marker>(&mut self) -> Id<Marker> {
        self.generate_at(OffsetDateTime::now_utc())
    }
}
