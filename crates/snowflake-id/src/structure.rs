use crate::{Error, Result, TimeSource};
use core::{fmt, time::Duration};
use jiff::{SignedDuration, Timestamp};

/// Number of usable bits in an ID. The sign bit of an `i64` is always zero.
pub const TOTAL_BITS: u32 = 63;

/// Largest width the generator and sequence fields may take.
pub const MAX_FIELD_BITS: u32 = 31;

/// The bit layout of a 63-bit Snowflake ID.
///
/// ```text
///  Bit Index:  63           62                                                  0
///              +--------------+---------------+-----------------+---------------+
///  Field:      | reserved (1) | timestamp (t) | generator (g)   | sequence (s)  |
///              +--------------+---------------+-----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
/// ```
///
/// A `Structure` is validated once when it is created and is immutable after
/// that, so it can be copied freely between generators.
///
/// # Example
///
/// ```
/// use snowflake_id::Structure;
///
/// let structure = Structure::new(41, 10, 12)?;
/// assert_eq!(structure.max_generators(), 1024);
/// assert_eq!(structure.max_sequence_ids(), 4096);
/// # Ok::<(), snowflake_id::Error>(())
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "StructureRepr", rename_all = "camelCase")
)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Structure {
    timestamp_bits: u32,
    generator_bits: u32,
    sequence_bits: u32,
}

impl Default for Structure {
    fn default() -> Self {
        Self::TWITTER
    }
}

impl Structure {
    /// The classic Twitter split: 41 timestamp bits, 10 generator bits and 12
    /// sequence bits.
    pub const TWITTER: Self = Self {
        timestamp_bits: 41,
        generator_bits: 10,
        sequence_bits: 12,
    };

    /// Creates a validated layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] naming the offending field if
    /// - `timestamp_bits` is zero,
    /// - `generator_bits` or `sequence_bits` is outside `1..=31`, or
    /// - the three widths do not add up to 63.
    pub fn new(timestamp_bits: u32, generator_bits: u32, sequence_bits: u32) -> Result<Self> {
        if timestamp_bits < 1 {
            return Err(invalid("timestamp_bits", "must be at least 1", timestamp_bits));
        }
        if !(1..=MAX_FIELD_BITS).contains(&generator_bits) {
            return Err(invalid(
                "generator_bits",
                "must be between 1 (inclusive) and 31 (inclusive)",
                generator_bits,
            ));
        }
        if !(1..=MAX_FIELD_BITS).contains(&sequence_bits) {
            return Err(invalid(
                "sequence_bits",
                "must be between 1 (inclusive) and 31 (inclusive)",
                sequence_bits,
            ));
        }

        let sum = u64::from(timestamp_bits) + u64::from(generator_bits) + u64::from(sequence_bits);
        if sum != u64::from(TOTAL_BITS) {
            return Err(Error::InvalidLayout {
                field: "timestamp_bits + generator_bits + sequence_bits",
                constraint: "must be 63",
                actual: sum,
            });
        }

        Ok(Self {
            timestamp_bits,
            generator_bits,
            sequence_bits,
        })
    }

    pub const fn timestamp_bits(&self) -> u32 {
        self.timestamp_bits
    }

    pub const fn generator_bits(&self) -> u32 {
        self.generator_bits
    }

    pub const fn sequence_bits(&self) -> u32 {
        self.sequence_bits
    }

    /// Number of distinct generator ids this layout can encode.
    pub const fn max_generators(&self) -> u64 {
        1 << self.generator_bits
    }

    /// Number of IDs a single generator can mint within one tick.
    pub const fn max_sequence_ids(&self) -> u64 {
        1 << self.sequence_bits
    }

    /// Number of distinct timestamps before the field wraps around.
    pub const fn max_timestamps(&self) -> u64 {
        1 << self.timestamp_bits
    }

    /// Returns how long `time` can tick before the timestamp field wraps
    /// around, i.e. `tick_duration * max_timestamps`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WraparoundOverflow`] if the product does not fit in a
    /// [`Duration`].
    pub fn wraparound_duration<T>(&self, time: &T) -> Result<Duration>
    where
        T: TimeSource + ?Sized,
    {
        const NANOS_PER_SEC: u128 = 1_000_000_000;

        let nanos = time
            .tick_duration()
            .as_nanos()
            .checked_mul(u128::from(self.max_timestamps()))
            .ok_or(Error::WraparoundOverflow)?;
        let secs = u64::try_from(nanos / NANOS_PER_SEC).map_err(|_| Error::WraparoundOverflow)?;
        Ok(Duration::new(secs, (nanos % NANOS_PER_SEC) as u32))
    }

    /// Returns the instant at which the timestamp field wraps around, i.e.
    /// `epoch + wraparound_duration`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WraparoundOverflow`] if the instant lies beyond the
    /// range [`Timestamp`] can represent.
    pub fn wraparound_date<T>(&self, time: &T) -> Result<Timestamp>
    where
        T: TimeSource + ?Sized,
    {
        let duration = SignedDuration::try_from(self.wraparound_duration(time)?)
            .map_err(|_| Error::WraparoundOverflow)?;
        time.epoch()
            .checked_add(duration)
            .map_err(|_| Error::WraparoundOverflow)
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structure {{ timestamp_bits: {}, generator_bits: {}, sequence_bits: {} }}",
            self.timestamp_bits, self.generator_bits, self.sequence_bits
        )
    }
}

fn invalid(field: &'static str, constraint: &'static str, actual: u32) -> Error {
    Error::InvalidLayout {
        field,
        constraint,
        actual: u64::from(actual),
    }
}

/// Unvalidated wire form; deserialization goes through [`Structure::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct StructureRepr {
    timestamp_bits: u32,
    generator_bits: u32,
    sequence_bits: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<StructureRepr> for Structure {
    type Error = Error;

    fn try_from(repr: StructureRepr) -> Result<Self> {
        Self::new(repr.timestamp_bits, repr.generator_bits, repr.sequence_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;

    fn assert_invalid(result: Result<Structure>, expected_field: &str) {
        match result {
            Err(Error::InvalidLayout { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected invalid layout for {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn timestamp_bits_cant_be_zero() {
        assert_invalid(Structure::new(0, 31, 32), "timestamp_bits");
        assert_invalid(Structure::new(0, 31, 31), "timestamp_bits");
    }

    #[test]
    fn generator_bits_must_be_between_1_and_31() {
        assert_invalid(Structure::new(31, 0, 32), "generator_bits");
        assert_invalid(Structure::new(31, 32, 0), "generator_bits");
    }

    #[test]
    fn sequence_bits_must_be_between_1_and_31() {
        assert_invalid(Structure::new(31, 31, 0), "sequence_bits");
        assert_invalid(Structure::new(31, 1, 32), "sequence_bits");
    }

    #[test]
    fn parts_must_sum_to_63() {
        let err = Structure::new(1, 1, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { actual: 3, .. }));
        assert!(err.to_string().contains("must be 63"), "{err}");
    }

    #[test]
    fn huge_timestamp_bits_do_not_overflow_the_sum() {
        assert_invalid(
            Structure::new(u32::MAX, 31, 31),
            "timestamp_bits + generator_bits + sequence_bits",
        );
    }

    #[test]
    fn error_message_names_field_and_value() {
        let err = Structure::new(31, 1, 32).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("sequence_bits"), "{msg}");
        assert!(msg.contains("32"), "{msg}");
    }

    #[test]
    fn twitter_layout_capacities() {
        let structure = Structure::new(41, 10, 12).unwrap();
        assert_eq!(structure, Structure::TWITTER);
        assert_eq!(structure, Structure::default());
        assert_eq!(structure.max_generators(), 1024);
        assert_eq!(structure.max_sequence_ids(), 4096);
        assert_eq!(structure.max_timestamps(), 2_199_023_255_552);
    }

    #[test]
    fn custom_layout_capacities() {
        let structure = Structure::new(31, 10, 22).unwrap();
        assert_eq!(structure.max_timestamps(), 2_147_483_648);
        assert_eq!(structure.max_generators(), 1024);
        assert_eq!(structure.max_sequence_ids(), 4_194_304);
    }

    #[test]
    fn wraparound_duration() {
        let structure = Structure::new(31, 10, 22).unwrap();
        let clock = ManualClock::with_ticks(0);
        assert_eq!(
            structure.wraparound_duration(&clock).unwrap(),
            Duration::from_millis(2_147_483_648)
        );
    }

    #[test]
    fn wraparound_date() {
        let structure = Structure::new(31, 10, 22).unwrap();
        let epoch: Timestamp = "2020-01-01T00:00:00Z".parse().unwrap();
        let clock = ManualClock::new(epoch, 0);
        let expected: Timestamp = "2020-01-25T20:31:23.648Z".parse().unwrap();
        assert_eq!(structure.wraparound_date(&clock).unwrap(), expected);
    }

    #[test]
    fn wraparound_date_past_timestamp_range_is_an_error() {
        let structure = Structure::new(61, 1, 1).unwrap();
        let clock = ManualClock::with_ticks(0);
        assert!(structure.wraparound_duration(&clock).is_ok());
        assert_eq!(
            structure.wraparound_date(&clock).unwrap_err(),
            Error::WraparoundOverflow
        );
    }

    #[test]
    fn display_lists_widths() {
        assert_eq!(
            Structure::TWITTER.to_string(),
            "Structure { timestamp_bits: 41, generator_bits: 10, sequence_bits: 12 }"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_validates_layout() {
        let structure: Structure = serde_json::from_str(
            r#"{"timestampBits":50,"generatorBits":3,"sequenceBits":10}"#,
        )
        .unwrap();
        assert_eq!(structure.max_generators(), 8);

        let err = serde_json::from_str::<Structure>(
            r#"{"timestampBits":1,"generatorBits":1,"sequenceBits":1}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("must be 63"), "{err}");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialize_uses_camel_case() {
        let json = serde_json::to_string(&Structure::TWITTER).unwrap();
        assert_eq!(
            json,
            r#"{"timestampBits":41,"generatorBits":10,"sequenceBits":12}"#
        );
    }
}
