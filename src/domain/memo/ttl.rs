use std::fmt;
use std::time::Duration;

use crate::domain::MemoError;

/// A validated, strictly positive time-to-live
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ttl(Duration);

impl Ttl {
    /// Longest accepted TTL, one hundred years
    pub const MAX_SECS: i64 = 100 * 365 * 24 * 60 * 60;

    /// Creates a TTL from whole seconds; zero, negative or above [`Self::MAX_SECS`] is rejected
    pub fn from_secs(seconds: i64) -> Result<Self, MemoError> {
        if seconds <= 0 || seconds > Self::MAX_SECS {
            return Err(MemoError::invalid_ttl(seconds));
        }

        Ok(Self(Duration::from_secs(seconds as u64)))
    }

    /// Creates a TTL from a duration; zero or above [`Self::MAX_SECS`] is rejected
    pub fn new(duration: Duration) -> Result<Self, MemoError> {
        if duration.is_zero() {
            return Err(MemoError::invalid_ttl(0));
        }
        if duration > Duration::from_secs(Self::MAX_SECS as u64) {
            let seconds = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
            return Err(MemoError::invalid_ttl(seconds));
        }

        Ok(Self(duration))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0.as_secs_f64()
    }
}

impl TryFrom<i64> for Ttl {
    type Error = MemoError;

    fn try_from(seconds: i64) -> Result<Self, Self::Error> {
        Self::from_secs(seconds)
    }
}

impl TryFrom<Duration> for Ttl {
    type Error = MemoError;

    fn try_from(duration: Duration) -> Result<Self, Self::Error> {
        Self::new(duration)
    }
}

impl From<Ttl> for Duration {
    fn from(ttl: Ttl) -> Self {
        ttl.0
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_seconds() {
        let ttl = Ttl::from_secs(10).unwrap();
        assert_eq!(ttl.as_duration(), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_is_rejected() {
        assert_eq!(Ttl::from_secs(0), Err(MemoError::InvalidTtl { seconds: 0 }));
        assert!(Ttl::new(Duration::ZERO).is_err());
    }

    #[test]
    fn test_negative_is_rejected() {
        assert_eq!(Ttl::from_secs(-5), Err(MemoError::InvalidTtl { seconds: -5 }));
    }

    #[test]
    fn test_upper_bound() {
        assert!(Ttl::from_secs(Ttl::MAX_SECS).is_ok());
        assert_eq!(
            Ttl::from_secs(i64::MAX),
            Err(MemoError::InvalidTtl { seconds: i64::MAX })
        );
        assert_eq!(
            Ttl::new(Duration::MAX),
            Err(MemoError::InvalidTtl { seconds: i64::MAX })
        );
    }

    #[test]
    fn test_sub_second_duration() {
        let ttl = Ttl::try_from(Duration::from_millis(250)).unwrap();
        assert_eq!(Duration::from(ttl), Duration::from_millis(250));
    }
}
