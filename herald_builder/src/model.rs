use std::str::FromStr;
use thiserror::Error;

/// Milliseconds between the unix epoch and the first platform snowflake.
pub const SNOWFLAKE_EPOCH: u64 = 1_420_070_400_000;

/// A platform entity ID (users, roles, channels, guilds, tags, messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Snowflake(pub u64);

impl Snowflake {
    /// The creation time encoded in the ID, in milliseconds since the unix epoch.
    pub fn timestamp_millis(&self) -> u64 {
        (self.0 >> 22) + SNOWFLAKE_EPOCH
    }
}

impl std::fmt::Display for Snowflake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Snowflake {
    fn from(value: u64) -> Self {
        Snowflake(value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a snowflake.")]
#[doc(hidden)]
pub struct ParseSnowflakeError(String);

impl FromStr for Snowflake {
    type Err = ParseSnowflakeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        // u64::from_str accepts a leading '+', which IDs never carry.
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseSnowflakeError(value.to_string()));
        }

        u64::from_str(value)
            .map(Snowflake)
            .map_err(|_| ParseSnowflakeError(value.to_string()))
    }
}

/// The ID of an event reported to the error tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SentryId(pub uuid::Uuid);

impl std::fmt::Display for SentryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", Snowflake(0))]
    #[case("175928847299117063", Snowflake(175928847299117063))]
    fn snowflake_from_str(#[case] value: &str, #[case] expected: Snowflake) {
        assert_eq!(Snowflake::from_str(value).unwrap(), expected);
        assert_eq!(expected.to_string(), value);
    }

    #[rstest]
    #[case("")]
    #[case("+1")]
    #[case("-1")]
    #[case("12a")]
    #[case("99999999999999999999999")]
    fn snowflake_invalid(#[case] value: &str) {
        assert_matches!(Snowflake::from_str(value), Err(ParseSnowflakeError(v)) if v == value);
    }

    #[test]
    fn snowflake_timestamp() {
        assert_eq!(Snowflake(175928847299117063).timestamp_millis(), 1462015105796);
    }

    #[test]
    fn sentry_id_display() {
        let id = SentryId(uuid::Uuid::from_u128(0xfeedbeef));
        assert_eq!(id.to_string(), "000000000000000000000000feedbeef");
    }
}
