pub mod assist;
pub mod post;

use crate::{
    model::post::{
        EmptyPlatformSetError, EmptyTextContentError, InvalidImagePathError,
        InvalidScheduledTimeError,
    },
    provisional::PROVISIONAL_BIT,
    util::ZeroPollIntervalError,
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData};
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    Platforms(#[from] EmptyPlatformSetError),
    #[error(transparent)]
    TextContent(#[from] EmptyTextContentError),
    #[error(transparent)]
    Image(#[from] InvalidImagePathError),
    #[error(transparent)]
    ScheduledTime(#[from] InvalidScheduledTimeError),
    #[error(transparent)]
    PollInterval(#[from] ZeroPollIntervalError),
}

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id<Marker>(u64, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw, PhantomData)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    /// Whether this id was minted locally for an optimistic record rather
    /// than issued by the server.
    #[must_use]
    pub fn is_provisional(self) -> bool {
        self.0 & PROVISIONAL_BIT != 0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<u64> for Id<Marker> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<Id<Marker>> for u64 {
    fn from(value: Id<Marker>) -> Self {
        value.get()
    }
}
