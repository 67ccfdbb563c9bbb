use std::sync::Arc;

use async_trait::async_trait;
use herald_parser::StringParser;

use crate::arguments::ArgumentInfo;
use crate::context::CommandContext;
use crate::converter::*;
use crate::error::RelayedError;
use crate::slash::{OptionValue, SlashOption};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

async fn convert<C: SingleConverter>(
    converter: &C,
    validator: &Option<Validator<C::Output>>,
    input: &str,
    context: &CommandContext,
) -> Result<C::Output, RelayedError> {
    let value = converter.parse(input, context).await?;
    validate(validator, context, &value)?;
    Ok(value)
}

async fn convert_option<C: SingleConverter>(
    converter: &C,
    validator: &Option<Validator<C::Output>>,
    option: &OptionValue,
    context: &CommandContext,
) -> Result<C::Output, RelayedError> {
    let value = converter.parse_option(option, context).await?;
    validate(validator, context, &value)?;
    Ok(value)
}

// Convert the first named value, or else the next token.
async fn convert_one<C: SingleConverter>(
    converter: &C,
    validator: &Option<Validator<C::Output>>,
    parser: Option<&mut StringParser>,
    context: &CommandContext,
    named: Option<&[String]>,
) -> Result<Option<Parsed<C::Output>>, RelayedError> {
    let input = match named.and_then(|values| values.first()) {
        Some(value) => value.clone(),
        None => match parser.and_then(|p| p.parse_next()) {
            Some(token) => token.into_text(),
            None => return Ok(None),
        },
    };

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Converting '{input}'.");
    }

    let value = convert(converter, validator, &input, context).await?;
    Ok(Some(Parsed::new(value, 1)))
}

fn validate<T>(
    validator: &Option<Validator<T>>,
    context: &CommandContext,
    value: &T,
) -> Result<(), RelayedError> {
    match validator {
        Some(validator) => validator(context, value),
        None => Ok(()),
    }
}

fn log_fallback<T>(_outcome: &Result<Option<Parsed<T>>, RelayedError>, _fallback: &str) {
    #[cfg(feature = "tracing_debug")]
    {
        match _outcome {
            Err(error) => debug!("Falling back to {_fallback}: {error}"),
            _ => debug!("Falling back to {_fallback}: nothing to convert."),
        }
    }
}

fn mark(parser: &mut Option<&mut StringParser>) {
    if let Some(parser) = parser.as_deref_mut() {
        parser.mark();
    }
}

fn commit(parser: &mut Option<&mut StringParser>) {
    if let Some(parser) = parser.as_deref_mut() {
        parser.commit();
    }
}

fn restore(parser: &mut Option<&mut StringParser>) {
    if let Some(parser) = parser.as_deref_mut() {
        parser.restore();
    }
}

macro_rules! validated {
    ($output:ty) => {
        /// Layer a check on top of the conversion, run on every converted value.
        pub fn validate(
            mut self,
            validator: impl Fn(&CommandContext, &$output) -> Result<(), RelayedError> + Send + Sync + 'static,
        ) -> Self {
            self.validator = Some(Arc::new(validator));
            self
        }
    };
}

/// A required argument taking exactly one value.
///
/// ### Example
/// ```
/// # use herald_builder::*;
/// # use std::sync::Arc;
/// # futures::executor::block_on(async {
/// let context = CommandContext::new("roll", Arc::new(BundledTranslations::default()));
/// let mut parser = StringParser::new("6 extra");
/// let sides = Single::new(IntConverter::default());
///
/// let parsed = sides.parse(Some(&mut parser), &context, None).await.unwrap().unwrap();
/// assert_eq!(parsed.value, 6);
/// assert_eq!(parser.remaining(), " extra");
/// # });
/// ```
pub struct Single<C: SingleConverter> {
    converter: C,
    validator: Option<Validator<C::Output>>,
}

impl<C: SingleConverter> Single<C> {
    /// Create a single value argument.
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            validator: None,
        }
    }

    validated!(C::Output);
}

#[async_trait]
impl<C: SingleConverter> Converter for Single<C> {
    type Output = C::Output;

    fn kind(&self) -> ConverterKind {
        ConverterKind::Single
    }

    fn signature_type(&self, context: &CommandContext) -> String {
        self.converter.signature_type(context)
    }

    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<Self::Output>>, RelayedError> {
        convert_one(&self.converter, &self.validator, parser, context, named).await
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Self::Output, RelayedError> {
        convert_option(&self.converter, &self.validator, option, context).await
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        self.converter.to_slash_option(argument).required(true)
    }
}

/// An argument taking at most one value, resolving to `None` when it is missing or cannot be converted.
///
/// A value that cannot be converted is left in the input for later arguments.
pub struct Optional<C: SingleConverter> {
    converter: C,
    validator: Option<Validator<C::Output>>,
}

impl<C: SingleConverter> Optional<C> {
    /// Create an optional argument.
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            validator: None,
        }
    }

    validated!(C::Output);
}

#[async_trait]
impl<C: SingleConverter> Converter for Optional<C> {
    type Output = Option<C::Output>;

    fn kind(&self) -> ConverterKind {
        ConverterKind::Optional
    }

    fn signature_type(&self, context: &CommandContext) -> String {
        self.converter.signature_type(context)
    }

    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<Self::Output>>, RelayedError> {
        let mut parser = parser;
        mark(&mut parser);

        let outcome =
            convert_one(&self.converter, &self.validator, parser.as_deref_mut(), context, named).await;

        match outcome {
            Ok(Some(parsed)) => {
                commit(&mut parser);
                Ok(Some(parsed.map(Some)))
            }
            outcome => {
                log_fallback(&outcome, "none");
                restore(&mut parser);
                Ok(Some(Parsed::new(None, 0)))
            }
        }
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Self::Output, RelayedError> {
        Ok(convert_option(&self.converter, &self.validator, option, context)
            .await
            .ok())
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        self.converter.to_slash_option(argument).required(false)
    }

    fn absent(&self) -> Option<Self::Output> {
        Some(None)
    }

    fn erase(&self, value: Self::Output) -> Option<AnyValue> {
        value.map(AnyValue::new)
    }
}

/// An argument taking at most one value, resolving to a default when it is missing or cannot be converted.
pub struct Defaulting<C: SingleConverter> {
    converter: C,
    default: C::Output,
    validator: Option<Validator<C::Output>>,
}

impl<C: SingleConverter> Defaulting<C>
where
    C::Output: Clone,
{
    /// Create a defaulting argument.
    pub fn new(converter: C, default: C::Output) -> Self {
        Self {
            converter,
            default,
            validator: None,
        }
    }

    validated!(C::Output);
}

#[async_trait]
impl<C: SingleConverter> Converter for Defaulting<C>
where
    C::Output: Clone,
{
    type Output = C::Output;

    fn kind(&self) -> ConverterKind {
        ConverterKind::Defaulting
    }

    fn signature_type(&self, context: &CommandContext) -> String {
        self.converter.signature_type(context)
    }

    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<Self::Output>>, RelayedError> {
        let mut parser = parser;
        mark(&mut parser);

        let outcome =
            convert_one(&self.converter, &self.validator, parser.as_deref_mut(), context, named).await;

        match outcome {
            Ok(Some(parsed)) => {
                commit(&mut parser);
                Ok(Some(parsed))
            }
            outcome => {
                log_fallback(&outcome, "the default");
                restore(&mut parser);
                Ok(Some(Parsed::new(self.default.clone(), 0)))
            }
        }
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Self::Output, RelayedError> {
        Ok(convert_option(&self.converter, &self.validator, option, context)
            .await
            .unwrap_or_else(|_| self.default.clone()))
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        self.converter.to_slash_option(argument).required(false)
    }

    fn absent(&self) -> Option<Self::Output> {
        Some(self.default.clone())
    }
}

/// An argument taking consecutive values until one cannot be converted.
///
/// A required list needs at least one value; an optional list may resolve to an empty `Vec`.
pub struct List<C: SingleConverter> {
    converter: C,
    required: bool,
    validator: Option<Validator<C::Output>>,
}

impl<C: SingleConverter> List<C> {
    /// Create a list argument needing at least one value.
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            required: true,
            validator: None,
        }
    }

    /// Allow the list to be empty.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    validated!(C::Output);

    fn empty(&self) -> Option<Parsed<Vec<C::Output>>> {
        if self.required {
            None
        } else {
            Some(Parsed::new(Vec::default(), 0))
        }
    }
}

#[async_trait]
impl<C: SingleConverter> Converter for List<C> {
    type Output = Vec<C::Output>;

    fn kind(&self) -> ConverterKind {
        ConverterKind::List
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn signature_type(&self, context: &CommandContext) -> String {
        self.converter.signature_type(context)
    }

    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<Self::Output>>, RelayedError> {
        if let Some(named) = named.filter(|values| !values.is_empty()) {
            let mut values = Vec::default();

            for input in named {
                values.push(convert(&self.converter, &self.validator, input, context).await?);
            }

            return Ok(Some(Parsed::new(values, named.len())));
        }

        let Some(parser) = parser else {
            return Ok(self.empty());
        };
        let mut values = Vec::default();
        let mut failure = None;

        while parser.has_next() {
            parser.mark();
            let Some(token) = parser.parse_next() else {
                parser.restore();
                break;
            };

            match convert(&self.converter, &self.validator, &token.into_text(), context).await {
                Ok(value) => {
                    parser.commit();
                    values.push(value);
                }
                Err(error) => {
                    parser.restore();
                    failure = Some(error);
                    break;
                }
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("List took {} values, stopping on {failure:?}.", values.len());
        }

        if values.is_empty() {
            match failure {
                Some(error) if self.required => Err(error),
                _ => Ok(self.empty()),
            }
        } else {
            let consumed = values.len();
            Ok(Some(Parsed::new(values, consumed)))
        }
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Self::Output, RelayedError> {
        // A slash option carries one value; text values are split like chat input.
        match option.as_str() {
            Some(text) => {
                let mut parser = StringParser::new(text);
                let mut values = Vec::default();

                while let Some(token) = parser.parse_next() {
                    values.push(convert(&self.converter, &self.validator, &token.into_text(), context).await?);
                }

                Ok(values)
            }
            None => Ok(vec![
                convert_option(&self.converter, &self.validator, option, context).await?,
            ]),
        }
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        self.converter
            .to_slash_option(argument)
            .required(self.required)
    }

    fn absent(&self) -> Option<Self::Output> {
        self.empty().map(|parsed| parsed.value)
    }
}

/// A required argument combining a variable number of tokens into one value.
pub struct Coalescing<C: CoalescingConverter> {
    converter: C,
    validator: Option<Validator<C::Output>>,
}

impl<C: CoalescingConverter> Coalescing<C> {
    /// Create a coalescing argument.
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            validator: None,
        }
    }

    validated!(C::Output);
}

async fn coalesce<C: CoalescingConverter>(
    converter: &C,
    validator: &Option<Validator<C::Output>>,
    parser: Option<&mut StringParser>,
    context: &CommandContext,
    named: Option<&[String]>,
) -> Result<Option<Parsed<C::Output>>, RelayedError> {
    match converter.parse(parser, context, named).await? {
        Some(parsed) => {
            validate(validator, context, &parsed.value)?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

async fn coalesce_option<C: CoalescingConverter>(
    converter: &C,
    validator: &Option<Validator<C::Output>>,
    option: &OptionValue,
    context: &CommandContext,
) -> Result<C::Output, RelayedError> {
    let value = converter.parse_option(option, context).await?;
    validate(validator, context, &value)?;
    Ok(value)
}

#[async_trait]
impl<C: CoalescingConverter> Converter for Coalescing<C> {
    type Output = C::Output;

    fn kind(&self) -> ConverterKind {
        ConverterKind::Coalescing
    }

    fn signature_type(&self, context: &CommandContext) -> String {
        self.converter.signature_type(context)
    }

    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<Self::Output>>, RelayedError> {
        coalesce(&self.converter, &self.validator, parser, context, named).await
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Self::Output, RelayedError> {
        coalesce_option(&self.converter, &self.validator, option, context).await
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        self.converter.to_slash_option(argument).required(true)
    }
}

/// A coalescing argument resolving to `None` when it is missing or cannot be converted.
pub struct OptionalCoalescing<C: CoalescingConverter> {
    converter: C,
    validator: Option<Validator<C::Output>>,
}

impl<C: CoalescingConverter> OptionalCoalescing<C> {
    /// Create an optional coalescing argument.
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            validator: None,
        }
    }

    validated!(C::Output);
}

#[async_trait]
impl<C: CoalescingConverter> Converter for OptionalCoalescing<C> {
    type Output = Option<C::Output>;

    fn kind(&self) -> ConverterKind {
        ConverterKind::OptionalCoalescing
    }

    fn signature_type(&self, context: &CommandContext) -> String {
        self.converter.signature_type(context)
    }

    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<Self::Output>>, RelayedError> {
        let mut parser = parser;
        mark(&mut parser);

        let outcome =
            coalesce(&self.converter, &self.validator, parser.as_deref_mut(), context, named).await;

        match outcome {
            Ok(Some(parsed)) => {
                commit(&mut parser);
                Ok(Some(parsed.map(Some)))
            }
            outcome => {
                log_fallback(&outcome, "none");
                restore(&mut parser);
                Ok(Some(Parsed::new(None, 0)))
            }
        }
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Self::Output, RelayedError> {
        Ok(coalesce_option(&self.converter, &self.validator, option, context)
            .await
            .ok())
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        self.converter.to_slash_option(argument).required(false)
    }

    fn absent(&self) -> Option<Self::Output> {
        Some(None)
    }

    fn erase(&self, value: Self::Output) -> Option<AnyValue> {
        value.map(AnyValue::new)
    }
}

/// A coalescing argument resolving to a default when it is missing or cannot be converted.
pub struct DefaultingCoalescing<C: CoalescingConverter> {
    converter: C,
    default: C::Output,
    validator: Option<Validator<C::Output>>,
}

impl<C: CoalescingConverter> DefaultingCoalescing<C>
where
    C::Output: Clone,
{
    /// Create a defaulting coalescing argument.
    pub fn new(converter: C, default: C::Output) -> Self {
        Self {
            converter,
            default,
            validator: None,
        }
    }

    validated!(C::Output);
}

#[async_trait]
impl<C: CoalescingConverter> Converter for DefaultingCoalescing<C>
where
    C::Output: Clone,
{
    type Output = C::Output;

    fn kind(&self) -> ConverterKind {
        ConverterKind::DefaultingCoalescing
    }

    fn signature_type(&self, context: &CommandContext) -> String {
        self.converter.signature_type(context)
    }

    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<Self::Output>>, RelayedError> {
        let mut parser = parser;
        mark(&mut parser);

        let outcome =
            coalesce(&self.converter, &self.validator, parser.as_deref_mut(), context, named).await;

        match outcome {
            Ok(Some(parsed)) => {
                commit(&mut parser);
                Ok(Some(parsed))
            }
            outcome => {
                log_fallback(&outcome, "the default");
                restore(&mut parser);
                Ok(Some(Parsed::new(self.default.clone(), 0)))
            }
        }
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Self::Output, RelayedError> {
        Ok(coalesce_option(&self.converter, &self.validator, option, context)
            .await
            .unwrap_or_else(|_| self.default.clone()))
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        self.converter.to_slash_option(argument).required(false)
    }

    fn absent(&self) -> Option<Self::Output> {
        Some(self.default.clone())
    }
}
