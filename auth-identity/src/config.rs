use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Lifetime of an ordinary login session
    pub session_ttl_hours: i64,
    /// Lifetime of a session created with "remember me" ticked
    pub remember_me_days: i64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: 24,
            remember_me_days: 30,
        }
    }
}

impl IdentityConfig {
    /// Lifetime of a new session, or `None` when the configured value is not
    /// a positive, representable duration
    pub fn session_lifetime(&self, remember: bool) -> Option<Duration> {
        let lifetime = if remember {
            Duration::try_days(self.remember_me_days)?
        } else {
            Duration::try_hours(self.session_ttl_hours)?
        };
        (lifetime > Duration::zero()).then_some(lifetime)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.session_lifetime(false).is_none() {
            return Err(format!(
                "identity.session_ttl_hours must be a positive number of hours, got {}",
                self.session_ttl_hours
            ));
        }
        if self.session_lifetime(true).is_none() {
            return Err(format!(
                "identity.remember_me_days must be a positive number of days, got {}",
                self.remember_me_days
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetimes() {
        let config = IdentityConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session_lifetime(false), Some(Duration::hours(24)));
        assert_eq!(config.session_lifetime(true), Some(Duration::days(30)));
    }

    #[test]
    fn test_out_of_range_lifetimes_are_rejected() {
        for (hours, days) in [(0, 30), (-5, 30), (24, -1), (24, 1_000_000_000_000), (i64::MAX, 30)] {
            let config = IdentityConfig {
                session_ttl_hours: hours,
                remember_me_days: days,
            };
            assert!(config.validate().is_err(), "{hours}h / {days}d");
        }
    }
}
