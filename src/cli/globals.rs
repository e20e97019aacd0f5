use std::fmt;
use std::str::FromStr;

/// What a lookup failure means for the caller.
///
/// `FailOpen` allows the password change when the breach service cannot
/// answer (availability wins); `FailClosed` reports `service_error`
/// (security wins). Applied uniformly to every failure subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreachPolicy {
    #[default]
    FailOpen,
    FailClosed,
}

impl FromStr for BreachPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail-open" => Ok(Self::FailOpen),
            "fail-closed" => Ok(Self::FailClosed),
            _ => Err(format!("invalid breach policy: {s}")),
        }
    }
}

impl fmt::Display for BreachPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailOpen => write!(f, "fail-open"),
            Self::FailClosed => write!(f, "fail-closed"),
        }
    }
}

/// Process-wide configuration, immutable after startup.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub hibp_url: String,
    pub lookup_timeout: u64,
    pub policy: BreachPolicy,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(hibp_url: String, lookup_timeout: u64, policy: BreachPolicy) -> Self {
        Self {
            hibp_url,
            lookup_timeout,
            policy,
        }
    }
}
