use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// How a [`Singleton`](crate::Singleton) guards its one-time construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Built together with the handle.
    Eager,
    /// Built on first access with an unguarded check-then-act. Concurrent
    /// first callers may each run the producer; one value is published.
    Naive,
    /// Built on first access; every access takes the lock.
    Locked,
    /// Built on first access; the lock is taken only while the value is
    /// missing and the check is repeated under it.
    #[default]
    DoubleChecked,
    /// Built on first access through a [`OnceGuard`](crate::OnceGuard).
    Holder,
    /// A fixed value known when the handle is built.
    Constant,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Eager,
        Strategy::Naive,
        Strategy::Locked,
        Strategy::DoubleChecked,
        Strategy::Holder,
        Strategy::Constant,
    ];

    /// Whether construction waits for the first access.
    pub fn is_lazy(self) -> bool {
        !matches!(self, Strategy::Eager | Strategy::Constant)
    }

    /// Whether concurrent first access is guaranteed to construct once.
    pub fn is_thread_safe(self) -> bool {
        !matches!(self, Strategy::Naive)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Eager => "eager",
            Strategy::Naive => "naive",
            Strategy::Locked => "locked",
            Strategy::DoubleChecked => "double_checked",
            Strategy::Holder => "holder",
            Strategy::Constant => "constant",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown initialization strategy `{0}`")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}
