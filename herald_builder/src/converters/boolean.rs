use async_trait::async_trait;

use crate::arguments::ArgumentInfo;
use crate::context::CommandContext;
use crate::converter::{wrong_option_type, SingleConverter};
use crate::error::RelayedError;
use crate::slash::{OptionType, OptionValue, SlashOption};

const TRUTHY: [&str; 5] = ["true", "yes", "y", "on", "1"];
const FALSY: [&str; 5] = ["false", "no", "n", "off", "0"];

/// Converts yes/no style values.
#[derive(Debug, Clone, Default)]
pub struct BooleanConverter;

#[async_trait]
impl SingleConverter for BooleanConverter {
    type Output = bool;

    fn signature_type(&self, context: &CommandContext) -> String {
        context.translate("converters.boolean.signatureType", &[])
    }

    async fn parse(&self, input: &str, context: &CommandContext) -> Result<bool, RelayedError> {
        let lowered = input.to_lowercase();

        if TRUTHY.contains(&lowered.as_str()) {
            Ok(true)
        } else if FALSY.contains(&lowered.as_str()) {
            Ok(false)
        } else {
            Err(RelayedError::new(
                context.translate("converters.boolean.error.invalid", &[&input]),
            ))
        }
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<bool, RelayedError> {
        match option {
            OptionValue::Boolean(value) => Ok(*value),
            OptionValue::String(text) => self.parse(text, context).await,
            _ => Err(wrong_option_type(&self.signature_type(context), option, context)),
        }
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        SlashOption::new(OptionType::Boolean, argument)
    }
}
