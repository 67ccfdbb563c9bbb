use async_trait::async_trait;
use herald_parser::{StringParser, Token};

use crate::arguments::ArgumentInfo;
use crate::context::CommandContext;
use crate::converter::{AnyValue, Candidate, CoalescingConverter, Parsed};
use crate::error::{ConfigError, RelayedError};
use crate::slash::{OptionType, OptionValue, SlashOption};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Tries an ordered list of differently typed converters against the same input, taking the first that succeeds.
///
/// The result is type-erased; downcast it to the output type of the candidate you expect.
/// Optional and defaulting candidates may only appear last, since they would otherwise accept everything.
///
/// ### Example
/// ```
/// # use herald_builder::*;
/// # use std::sync::Arc;
/// # futures::executor::block_on(async {
/// let context = CommandContext::new("find", Arc::new(BundledTranslations::default()));
/// let union = UnionConverter::new(vec![
///     Single::new(IntConverter::default()).into(),
///     Single::new(StringConverter::default()).into(),
/// ])
/// .unwrap();
///
/// let mut parser = StringParser::new("42");
/// let parsed = union.parse(Some(&mut parser), &context, None).await.unwrap().unwrap();
/// assert_eq!(parsed.value.downcast_ref::<i64>(), Some(&42));
///
/// let mut parser = StringParser::new("answer");
/// let parsed = union.parse(Some(&mut parser), &context, None).await.unwrap().unwrap();
/// assert_eq!(parsed.value.downcast_ref::<String>().map(String::as_str), Some("answer"));
/// # });
/// ```
#[derive(Debug)]
pub struct UnionConverter {
    candidates: Vec<Candidate>,
    type_name: Option<String>,
    should_throw: bool,
}

impl UnionConverter {
    /// Create a union of `candidates`, tried in order.
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, ConfigError> {
        if candidates.is_empty() {
            return Err(ConfigError::new("a union converter needs at least one candidate."));
        }

        let last = candidates.len() - 1;

        if let Some((index, candidate)) = candidates[..last]
            .iter()
            .enumerate()
            .find(|(_, candidate)| candidate.kind().is_lenient())
        {
            return Err(ConfigError::new(format!(
                "union candidate {index} is {:?}; optional and defaulting candidates must be last.",
                candidate.kind()
            )));
        }

        Ok(Self {
            candidates,
            type_name: None,
            should_throw: false,
        })
    }

    /// Describe accepted values with `type_name` instead of the candidates' signature types.
    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Propagate the first candidate failure instead of moving on to the next candidate.
    pub fn should_throw(mut self, should_throw: bool) -> Self {
        self.should_throw = should_throw;
        self
    }

    fn no_match(&self, input: &dyn std::fmt::Display, context: &CommandContext) -> RelayedError {
        RelayedError::new(context.translate(
            "converters.union.error.noMatch",
            &[input, &self.signature_type(context)],
        ))
    }
}

#[async_trait]
impl CoalescingConverter for UnionConverter {
    type Output = AnyValue;

    fn signature_type(&self, context: &CommandContext) -> String {
        match &self.type_name {
            Some(type_name) => type_name.clone(),
            None => self
                .candidates
                .iter()
                .map(|candidate| candidate.0.signature_type(context))
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<AnyValue>>, RelayedError> {
        let mut parser = parser;
        let input = match (named.and_then(|values| values.first()), parser.as_deref()) {
            (Some(value), _) => Some(value.clone()),
            (None, Some(parser)) => parser.peek_next().map(Token::into_text),
            (None, None) => None,
        };

        for (_index, candidate) in self.candidates.iter().enumerate() {
            if let Some(parser) = parser.as_deref_mut() {
                parser.mark();
            }

            let outcome = candidate
                .0
                .parse_present(parser.as_deref_mut(), context, named)
                .await;

            match outcome {
                // An empty list or coalesced value took nothing, so it must not shadow later candidates.
                Ok(Some(parsed)) if parsed.consumed == 0 && candidate.kind().takes_many() => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Union candidate {_index} consumed nothing.");
                    }

                    if let Some(parser) = parser.as_deref_mut() {
                        parser.restore();
                    }
                }
                Ok(Some(parsed)) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Union candidate {_index} matched, consuming {}.", parsed.consumed);
                    }

                    if let Some(parser) = parser.as_deref_mut() {
                        parser.commit();
                    }

                    return Ok(Some(parsed));
                }
                Ok(None) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Union candidate {_index} produced nothing.");
                    }

                    if let Some(parser) = parser.as_deref_mut() {
                        parser.restore();
                    }
                }
                Err(error) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Union candidate {_index} failed: {error}");
                    }

                    if let Some(parser) = parser.as_deref_mut() {
                        parser.restore();
                    }

                    if self.should_throw {
                        return Err(error);
                    }
                }
            }
        }

        match input {
            Some(input) => Err(self.no_match(&input, context)),
            None => Ok(None),
        }
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<AnyValue, RelayedError> {
        for candidate in &self.candidates {
            if candidate.kind().is_list() {
                return Err(RelayedError::new(context.translate(
                    "converters.union.error.unknownConverterType",
                    &[&format!("{:?}", candidate.kind())],
                )));
            }

            match candidate.0.parse_option_present(option, context).await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(error) if self.should_throw => return Err(error),
                Err(_) => {}
            }
        }

        Err(self.no_match(option, context))
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        SlashOption::new(OptionType::String, argument).required(true)
    }
}
