use async_trait::async_trait;
use herald_parser::StringParser;

use crate::arguments::ArgumentInfo;
use crate::context::CommandContext;
use crate::converter::{wrong_option_type, CoalescingConverter, Parsed, SingleConverter};
use crate::error::RelayedError;
use crate::slash::{OptionType, OptionValue, SlashOption};

/// Converts one token of text, optionally within length bounds (counted in characters).
#[derive(Debug, Clone, Default)]
pub struct StringConverter {
    min_length: Option<u16>,
    max_length: Option<u16>,
}

impl StringConverter {
    /// The shortest accepted length.
    pub fn min_length(mut self, min_length: u16) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// The longest accepted length.
    pub fn max_length(mut self, max_length: u16) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

fn check_length(
    input: &str,
    min_length: Option<u16>,
    max_length: Option<u16>,
    context: &CommandContext,
) -> Result<(), RelayedError> {
    let length = input.chars().count();

    match (min_length, max_length) {
        (Some(min), _) if length < min as usize => Err(RelayedError::new(
            context.translate("converters.string.error.tooShort", &[&min]),
        )),
        (_, Some(max)) if length > max as usize => Err(RelayedError::new(
            context.translate("converters.string.error.tooLong", &[&max]),
        )),
        _ => Ok(()),
    }
}

#[async_trait]
impl SingleConverter for StringConverter {
    type Output = String;

    fn signature_type(&self, context: &CommandContext) -> String {
        context.translate("converters.string.signatureType", &[])
    }

    async fn parse(&self, input: &str, context: &CommandContext) -> Result<String, RelayedError> {
        check_length(input, self.min_length, self.max_length, context)?;
        Ok(input.to_string())
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        SlashOption::new(OptionType::String, argument).length_range(self.min_length, self.max_length)
    }
}

/// Converts all remaining input into one piece of text, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct CoalescingStringConverter {
    max_length: Option<u16>,
}

impl CoalescingStringConverter {
    /// The longest accepted length.
    pub fn max_length(mut self, max_length: u16) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

#[async_trait]
impl CoalescingConverter for CoalescingStringConverter {
    type Output = String;

    fn signature_type(&self, context: &CommandContext) -> String {
        context.translate("converters.coalescingString.signatureType", &[])
    }

    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<String>>, RelayedError> {
        let (text, consumed) = match named.filter(|values| !values.is_empty()) {
            Some(values) => (values.join(" "), values.len()),
            None => match parser {
                Some(parser) if parser.has_next() => {
                    let mut counter = parser.clone();
                    let mut consumed = 0;

                    while counter.parse_next().is_some() {
                        consumed += 1;
                    }

                    (parser.consume_remaining(), consumed)
                }
                _ => return Ok(None),
            },
        };

        check_length(&text, None, self.max_length, context)?;
        Ok(Some(Parsed::new(text, consumed)))
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<String, RelayedError> {
        match option.as_str() {
            Some(text) => {
                check_length(text, None, self.max_length, context)?;
                Ok(text.to_string())
            }
            None => Err(wrong_option_type(&self.signature_type(context), option, context)),
        }
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        SlashOption::new(OptionType::String, argument).length_range(None, self.max_length)
    }
}
