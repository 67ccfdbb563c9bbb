use async_trait::async_trait;

use crate::arguments::ArgumentInfo;
use crate::context::CommandContext;
use crate::converter::{wrong_option_type, SingleConverter};
use crate::error::RelayedError;
use crate::slash::{Attachment, OptionType, OptionValue, SlashOption};

/// Accepts a file uploaded with a slash command.
///
/// Chat messages cannot carry attachments as arguments, so chat parsing always fails.
#[derive(Debug, Clone, Default)]
pub struct AttachmentConverter;

#[async_trait]
impl SingleConverter for AttachmentConverter {
    type Output = Attachment;

    fn signature_type(&self, context: &CommandContext) -> String {
        context.translate("converters.attachment.signatureType", &[])
    }

    async fn parse(&self, _input: &str, context: &CommandContext) -> Result<Attachment, RelayedError> {
        Err(RelayedError::new(context.translate(
            "converters.attachment.error.slashCommandsOnly",
            &[],
        )))
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Attachment, RelayedError> {
        match option {
            OptionValue::Attachment(attachment) => Ok(attachment.clone()),
            _ => Err(wrong_option_type(&self.signature_type(context), option, context)),
        }
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        SlashOption::new(OptionType::Attachment, argument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Snowflake;
    use crate::test::context;

    #[tokio::test]
    async fn chat_input_rejected() {
        let error = AttachmentConverter.parse("file.png", &context()).await.unwrap_err();
        assert_eq!(error.message(), "Attachments can only be given to slash commands.");
    }

    #[tokio::test]
    async fn option() {
        let attachment = Attachment {
            id: Snowflake(1),
            filename: "log.txt".to_string(),
            url: "https://cdn.example/log.txt".to_string(),
            size: 12,
            content_type: Some("text/plain".to_string()),
        };
        let value = AttachmentConverter
            .parse_option(&OptionValue::Attachment(attachment.clone()), &context())
            .await
            .unwrap();
        assert_eq!(value, attachment);

        let error = AttachmentConverter
            .parse_option(&OptionValue::String("log.txt".into()), &context())
            .await
            .unwrap_err();
        assert_eq!(error.message(), "Expected attachment, but received a value of type string.");
    }
}
