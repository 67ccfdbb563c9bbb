use async_trait::async_trait;
use uuid::Uuid;

use crate::arguments::ArgumentInfo;
use crate::context::CommandContext;
use crate::converter::SingleConverter;
use crate::error::RelayedError;
use crate::model::SentryId;
use crate::slash::{OptionType, SlashOption};

/// Converts the ID of an error-tracker event, in simple (32 hex digits) or hyphenated form.
#[derive(Debug, Clone, Default)]
pub struct SentryIdConverter;

#[async_trait]
impl SingleConverter for SentryIdConverter {
    type Output = SentryId;

    fn signature_type(&self, context: &CommandContext) -> String {
        context.translate("converters.sentryId.signatureType", &[])
    }

    async fn parse(&self, input: &str, context: &CommandContext) -> Result<SentryId, RelayedError> {
        Uuid::parse_str(input).map(SentryId).map_err(|_| {
            RelayedError::new(context.translate("converters.sentryId.error.invalid", &[&input]))
        })
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        SlashOption::new(OptionType::String, argument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::context;
    use rstest::rstest;

    #[rstest]
    #[case("a2a1a1b0c0d04e8f9a0b1c2d3e4f5a6b")]
    #[case("a2a1a1b0-c0d0-4e8f-9a0b-1c2d3e4f5a6b")]
    #[case("A2A1A1B0C0D04E8F9A0B1C2D3E4F5A6B")]
    #[tokio::test]
    async fn parse(#[case] input: &str) {
        let id = SentryIdConverter.parse(input, &context()).await.unwrap();
        assert_eq!(id.to_string(), "a2a1a1b0c0d04e8f9a0b1c2d3e4f5a6b");
    }

    #[rstest]
    #[case("a2a1a1b0")]
    #[case("z2a1a1b0c0d04e8f9a0b1c2d3e4f5a6b")]
    #[case("")]
    #[tokio::test]
    async fn parse_invalid(#[case] input: &str) {
        let error = SentryIdConverter.parse(input, &context()).await.unwrap_err();
        assert_eq!(error.message(), format!("Value `{input}` is not a valid Sentry event ID."));
    }
}
