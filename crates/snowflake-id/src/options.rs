use crate::Error;
use core::{fmt, str::FromStr};

/// What a generator does once every sequence value of the current tick has
/// been handed out.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverflowStrategy {
    /// Return [`Error::SequenceOverflow`] to the caller.
    Fail,
    /// Busy-poll the time source, yielding the thread between polls, until the
    /// tick advances.
    #[default]
    SpinWait,
    /// Sleep for roughly one tick and try again.
    Sleep,
}

impl OverflowStrategy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::SpinWait => "spin-wait",
            Self::Sleep => "sleep",
        }
    }
}

impl fmt::Display for OverflowStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverflowStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "spin-wait" | "spin_wait" | "spin" => Ok(Self::SpinWait),
            "sleep" => Ok(Self::Sleep),
            _ => Err(Error::InvalidOverflowStrategy(s.to_owned())),
        }
    }
}

/// Generator configuration.
///
/// ```
/// use snowflake_id::{Options, OverflowStrategy};
///
/// let options = Options::new(OverflowStrategy::Sleep);
/// assert_eq!(Options::default().sequence_overflow_strategy, OverflowStrategy::SpinWait);
/// assert_ne!(options, Options::default());
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Options {
    pub sequence_overflow_strategy: OverflowStrategy,
}

impl Options {
    pub const fn new(sequence_overflow_strategy: OverflowStrategy) -> Self {
        Self {
            sequence_overflow_strategy,
        }
    }
}

impl From<OverflowStrategy> for Options {
    fn from(strategy: OverflowStrategy) -> Self {
        Self::new(strategy)
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Options {{ sequence_overflow_strategy: {} }}",
            self.sequence_overflow_strategy
        )
    }
}
