use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use herald_parser::StringParser;

use crate::arguments::ArgumentInfo;
use crate::context::CommandContext;
use crate::error::RelayedError;
use crate::slash::{OptionValue, SlashOption};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A check layered on top of a converter, run on every successfully converted value.
pub type Validator<T> = Arc<dyn Fn(&CommandContext, &T) -> Result<(), RelayedError> + Send + Sync>;

/// A converted value, and how many tokens it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    /// The converted value.
    pub value: T,
    /// The number of tokens consumed.
    pub consumed: usize,
}

impl<T> Parsed<T> {
    /// Create a parsed value.
    pub fn new(value: T, consumed: usize) -> Self {
        Self { value, consumed }
    }

    /// Map the value, keeping the consumed count.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            value: f(self.value),
            consumed: self.consumed,
        }
    }
}

/// The closed set of converter variants.
///
/// Variants differ in cardinality (one value or many) and in their failure policy (surface the failure, or fall back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConverterKind {
    /// Exactly one token, required.
    Single,
    /// At most one token, resolving to `None` on failure.
    Optional,
    /// At most one token, resolving to a default on failure.
    Defaulting,
    /// Any number of tokens.
    List,
    /// A variable number of tokens combined into one value, required.
    Coalescing,
    /// A coalescing converter resolving to `None` on failure.
    OptionalCoalescing,
    /// A coalescing converter resolving to a default on failure.
    DefaultingCoalescing,
}

impl ConverterKind {
    /// Whether failures fall back to `None` or a default instead of surfacing.
    pub fn is_lenient(&self) -> bool {
        matches!(
            self,
            ConverterKind::Optional
                | ConverterKind::Defaulting
                | ConverterKind::OptionalCoalescing
                | ConverterKind::DefaultingCoalescing
        )
    }

    /// Whether the converter reads a variable number of tokens (lists and required coalescing converters).
    pub fn takes_many(&self) -> bool {
        matches!(self, ConverterKind::List | ConverterKind::Coalescing)
    }

    /// Whether the converter produces a list.
    pub fn is_list(&self) -> bool {
        matches!(self, ConverterKind::List)
    }
}

/// Converts one piece of text, or one slash option value, into `Output`.
#[async_trait]
pub trait SingleConverter: Send + Sync {
    /// The converted type.
    type Output: Send + Sync + 'static;

    /// The short, translated description of accepted values shown in help and errors.
    fn signature_type(&self, context: &CommandContext) -> String;

    /// Convert a single token's text.
    async fn parse(&self, input: &str, context: &CommandContext) -> Result<Self::Output, RelayedError>;

    /// Convert a value received with a slash command.
    ///
    /// By default only string values are accepted, and are converted via [`SingleConverter::parse`].
    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Self::Output, RelayedError> {
        match option.as_str() {
            Some(text) => self.parse(text, context).await,
            None => Err(wrong_option_type(&self.signature_type(context), option, context)),
        }
    }

    /// The registration descriptor for this converter.
    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption;
}

/// Converts a variable number of tokens into one `Output`.
#[async_trait]
pub trait CoalescingConverter: Send + Sync {
    /// The converted type.
    type Output: Send + Sync + 'static;

    /// The short, translated description of accepted values shown in help and errors.
    fn signature_type(&self, context: &CommandContext) -> String;

    /// Convert tokens from `parser`, or the `named` values when given.
    ///
    /// Returns `Ok(None)` when there was nothing to convert.
    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<Self::Output>>, RelayedError>;

    /// Convert a value received with a slash command.
    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Self::Output, RelayedError>;

    /// The registration descriptor for this converter.
    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption;
}

/// The uniform contract of the converter variants ([`crate::Single`], [`crate::Optional`], [`crate::List`], ...).
///
/// Arguments and unions are declared with these.
#[async_trait]
pub trait Converter: Send + Sync {
    /// The resolved type of the argument.
    type Output: Send + Sync + 'static;

    /// The variant of this converter.
    fn kind(&self) -> ConverterKind;

    /// Whether the argument must be supplied.
    fn is_required(&self) -> bool {
        !self.kind().is_lenient()
    }

    /// The short, translated description of accepted values shown in help and errors.
    fn signature_type(&self, context: &CommandContext) -> String;

    /// Resolve the argument from `parser`, or the `named` values when given.
    ///
    /// `Ok(None)` means nothing was available to resolve.
    /// Lenient variants never fail, and never return `Ok(None)`.
    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<Self::Output>>, RelayedError>;

    /// Resolve the argument from a value received with a slash command.
    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Self::Output, RelayedError>;

    /// The registration descriptor for this converter.
    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption;

    /// The value of the argument when a slash option is not given, or `None` if it must be given.
    fn absent(&self) -> Option<Self::Output> {
        None
    }

    /// Erase a resolved value, dropping the `None` of optional variants.
    fn erase(&self, value: Self::Output) -> Option<AnyValue> {
        Some(AnyValue::new(value))
    }
}

/// A type-erased converted value.
pub struct AnyValue {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl AnyValue {
    /// Erase `value`.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The name of the erased type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the erased value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Borrow the value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Take the value as a `T`, or get `self` back.
    pub fn downcast<T: Any>(self) -> Result<T, AnyValue> {
        let type_name = self.type_name;

        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(AnyValue { value, type_name }),
        }
    }
}

impl std::fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AnyValue<{}>", self.type_name)
    }
}

/// Behaviour of a converter with its output type erased.
///
/// We use this at the top of the argument object graph, so schemas and unions can hold differently typed converters.
#[doc(hidden)]
#[async_trait]
pub trait AnonymousConverter: Send + Sync {
    fn kind(&self) -> ConverterKind;

    fn is_required(&self) -> bool;

    fn signature_type(&self, context: &CommandContext) -> String;

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption;

    fn absent(&self) -> Option<AnyValue>;

    /// Resolve, erasing the full output (`Option<T>` stays `Option<T>`).
    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<AnyValue>>, RelayedError>;

    /// Resolve, erasing only present values (`Some(t)` becomes `t`, `None` becomes no match).
    async fn parse_present(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<AnyValue>>, RelayedError>;

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<AnyValue, RelayedError>;

    async fn parse_option_present(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Option<AnyValue>, RelayedError>;
}

pub(crate) struct AnonymousConversion<C> {
    converter: C,
}

impl<C: Converter> AnonymousConversion<C> {
    pub(crate) fn bind(converter: C) -> Self {
        Self { converter }
    }
}

#[async_trait]
impl<C: Converter> AnonymousConverter for AnonymousConversion<C> {
    fn kind(&self) -> ConverterKind {
        self.converter.kind()
    }

    fn is_required(&self) -> bool {
        self.converter.is_required()
    }

    fn signature_type(&self, context: &CommandContext) -> String {
        self.converter.signature_type(context)
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        self.converter.to_slash_option(argument)
    }

    fn absent(&self) -> Option<AnyValue> {
        self.converter.absent().map(AnyValue::new)
    }

    async fn parse(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<AnyValue>>, RelayedError> {
        let parsed = self.converter.parse(parser, context, named).await?;
        Ok(parsed.map(|p| p.map(AnyValue::new)))
    }

    async fn parse_present(
        &self,
        parser: Option<&mut StringParser>,
        context: &CommandContext,
        named: Option<&[String]>,
    ) -> Result<Option<Parsed<AnyValue>>, RelayedError> {
        match self.converter.parse(parser, context, named).await? {
            Some(Parsed { value, consumed }) => Ok(self
                .converter
                .erase(value)
                .map(|value| Parsed::new(value, consumed))),
            None => Ok(None),
        }
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<AnyValue, RelayedError> {
        let value = self.converter.parse_option(option, context).await?;
        Ok(AnyValue::new(value))
    }

    async fn parse_option_present(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Option<AnyValue>, RelayedError> {
        let value = self.converter.parse_option(option, context).await?;
        Ok(self.converter.erase(value))
    }
}

/// A type-erased converter, as held by a [`crate::UnionConverter`].
///
/// Any [`Converter`] turns into a candidate with `.into()`.
pub struct Candidate(pub(crate) Box<dyn AnonymousConverter>);

impl Candidate {
    /// The variant of the wrapped converter.
    pub fn kind(&self) -> ConverterKind {
        self.0.kind()
    }
}

impl<C: Converter + 'static> From<C> for Candidate {
    fn from(converter: C) -> Self {
        Candidate(Box::new(AnonymousConversion::bind(converter)))
    }
}

impl std::fmt::Debug for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Candidate({:?})", self.kind())
    }
}

pub(crate) fn wrong_option_type(
    expected: &str,
    option: &OptionValue,
    context: &CommandContext,
) -> RelayedError {
    #[cfg(feature = "tracing_debug")]
    {
        debug!("Rejecting {:?} option for '{expected}'.", option.option_type());
    }

    RelayedError::new(context.translate(
        "converters.error.wrongOptionType",
        &[&expected, &option.option_type()],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ConverterKind::Single, false)]
    #[case(ConverterKind::List, false)]
    #[case(ConverterKind::Coalescing, false)]
    #[case(ConverterKind::Optional, true)]
    #[case(ConverterKind::Defaulting, true)]
    #[case(ConverterKind::OptionalCoalescing, true)]
    #[case(ConverterKind::DefaultingCoalescing, true)]
    fn lenient(#[case] kind: ConverterKind, #[case] expected: bool) {
        assert_eq!(kind.is_lenient(), expected);
    }

    #[rstest]
    #[case(ConverterKind::Single, false)]
    #[case(ConverterKind::List, true)]
    #[case(ConverterKind::Coalescing, true)]
    #[case(ConverterKind::OptionalCoalescing, false)]
    fn takes_many(#[case] kind: ConverterKind, #[case] expected: bool) {
        assert_eq!(kind.takes_many(), expected);
    }

    #[test]
    fn any_value() {
        let value = AnyValue::new(42i64);
        assert!(value.is::<i64>());
        assert!(!value.is::<i32>());
        assert_eq!(value.type_name(), "i64");
        assert_eq!(value.downcast_ref::<i64>(), Some(&42));

        let value = value.downcast::<String>().unwrap_err();
        assert_eq!(value.downcast::<i64>().unwrap(), 42);
    }

    #[test]
    fn parsed_map() {
        let parsed = Parsed::new(2, 3).map(|v| v * 10);
        assert_eq!(parsed, Parsed::new(20, 3));
    }
}
