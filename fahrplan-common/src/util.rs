use std::time::Duration;
use thiserror::Error;

/// How often the sync loop pulls a fresh snapshot from the remote.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct PollInterval(Duration);

impl PollInterval {
    pub const DEFAULT: Self = Self(Duration::from_secs(5));

    #[must_use]
    pub fn new(duration: Duration) -> Option<Self> {
        (!duration.is_zero()).then_some(Self(duration))
    }

    #[must_use]
    pub fn new_unchecked(duration: Duration) -> Self {
        Self::new(duration).expect("Poll interval was zero.")
    }

    #[must_use]
    pub fn get(self) -> Duration {
        self.0
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The poll interval must not be zero.")]
pub struct ZeroPollIntervalError;

impl TryFrom<Duration> for PollInterval {
    type Error = ZeroPollIntervalError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ZeroPollIntervalError)
    }
}
