use crate::{NdPickleError, Result, TimeUnit};
use std::fmt;
use std::str::FromStr;

/// Unit of a regular datetime step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreqUnit {
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl FreqUnit {
    fn word(&self) -> &'static str {
        match self {
            FreqUnit::Day => "day",
            FreqUnit::Hour => "hour",
            FreqUnit::Minute => "minute",
            FreqUnit::Second => "second",
            FreqUnit::Millisecond => "millisecond",
            FreqUnit::Microsecond => "microsecond",
            FreqUnit::Nanosecond => "nanosecond",
        }
    }

    fn nanos(&self) -> i128 {
        match self {
            FreqUnit::Day => 86_400_000_000_000,
            FreqUnit::Hour => 3_600_000_000_000,
            FreqUnit::Minute => 60_000_000_000,
            FreqUnit::Second => 1_000_000_000,
            FreqUnit::Millisecond => 1_000_000,
            FreqUnit::Microsecond => 1_000,
            FreqUnit::Nanosecond => 1,
        }
    }
}

/// Regular step of a datetime index, e.g. "1 second" or "15 minutes"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frequency {
    multiple: u32,
    unit: FreqUnit,
}

impl Frequency {
    pub const DAY: Frequency = Frequency {
        multiple: 1,
        unit: FreqUnit::Day,
    };
    pub const SECOND: Frequency = Frequency {
        multiple: 1,
        unit: FreqUnit::Second,
    };

    pub fn new(multiple: u32, unit: FreqUnit) -> Result<Self> {
        if multiple == 0 {
            return Err(NdPickleError::invalid_argument(
                "frequency multiple must be positive",
            ));
        }
        Ok(Self { multiple, unit })
    }

    pub fn multiple(&self) -> u32 {
        self.multiple
    }

    pub fn unit(&self) -> FreqUnit {
        self.unit
    }

    /// Step length in nanoseconds
    pub fn step_nanos(&self) -> i128 {
        i128::from(self.multiple) * self.unit.nanos()
    }

    /// Step length counted in ticks of `unit`; `None` when the step is not a
    /// whole number of ticks
    pub fn step_in(&self, unit: TimeUnit) -> Option<i64> {
        let step = self.step_nanos();
        if step % unit.nanos() != 0 {
            return None;
        }
        i64::try_from(step / unit.nanos()).ok()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.multiple == 1 { "" } else { "s" };
        write!(f, "{} {}{}", self.multiple, self.unit.word(), plural)
    }
}

impl FromStr for Frequency {
    type Err = NdPickleError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || NdPickleError::format(format!("invalid frequency '{}'", s));
        let mut parts = s.split_whitespace();
        let (Some(multiple), Some(word), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let multiple = multiple.parse::<u32>().map_err(|_| invalid())?;
        let word = word.strip_suffix('s').unwrap_or(word);
        let unit = match word {
            "day" => FreqUnit::Day,
            "hour" => FreqUnit::Hour,
            "minute" => FreqUnit::Minute,
            "second" => FreqUnit::Second,
            "millisecond" => FreqUnit::Millisecond,
            "microsecond" => FreqUnit::Microsecond,
            "nanosecond" => FreqUnit::Nanosecond,
            _ => return Err(invalid()),
        };
        Frequency::new(multiple, unit).map_err(|_| invalid())
    }
}
