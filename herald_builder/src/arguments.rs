use std::any::Any;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use herald_parser::StringParser;
use regex::Regex;

use crate::context::CommandContext;
use crate::converter::{AnonymousConversion, AnonymousConverter, AnyValue, Converter, ConverterKind};
use crate::error::{ConfigError, RelayedError};
use crate::parser;
use crate::slash::{CommandOption, SlashOption};

// Platform limits on slash command options.
const MAX_OPTIONS: usize = 25;
const MAX_DESCRIPTION: usize = 100;

fn option_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[-_\p{L}\p{N}]{1,32}$")
            .expect("internal error - the option name pattern must compile")
    })
}

pub(crate) fn is_option_name(name: &str) -> bool {
    option_name_pattern().is_match(name) && name.to_lowercase() == name
}

/// The user-facing name and description of an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentInfo {
    display_name: String,
    description: String,
}

impl ArgumentInfo {
    /// Create argument info.
    pub fn new(display_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            description: description.into(),
        }
    }

    /// The argument name, as shown to users and matched against named values.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The argument description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// One argument of a schema: its info, and the converter resolving it.
pub struct Argument {
    pub(crate) info: ArgumentInfo,
    pub(crate) converter: Box<dyn AnonymousConverter>,
}

impl Argument {
    /// The argument's name and description.
    pub fn info(&self) -> &ArgumentInfo {
        &self.info
    }

    /// The variant of the argument's converter.
    pub fn kind(&self) -> ConverterKind {
        self.converter.kind()
    }

    /// Whether the argument must be supplied.
    pub fn is_required(&self) -> bool {
        self.converter.is_required()
    }

    /// The translated description of values the argument accepts.
    pub fn signature_type(&self, context: &CommandContext) -> String {
        self.converter.signature_type(context)
    }
}

impl std::fmt::Debug for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argument")
            .field("info", &self.info)
            .field("kind", &self.kind())
            .finish()
    }
}

/// A typed handle to an argument, used to read its resolved value from [`ParsedArguments`].
pub struct Arg<T> {
    index: usize,
    name: String,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Arg<T> {
    /// The argument name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for Arg<T> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            name: self.name.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Arg<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Arg<{}>({})", std::any::type_name::<T>(), self.name)
    }
}

/// The ordered argument schema of a command.
///
/// Arguments are resolved one after another, in declaration order.
///
/// ### Example
/// ```
/// # use herald_builder::*;
/// # use std::sync::Arc;
/// # futures::executor::block_on(async {
/// let mut arguments = Arguments::default();
/// let target = arguments.arg("target", "Who to ban", Single::new(MentionConverter::user())).unwrap();
/// let days = arguments.arg("days", "Days of messages to delete", Defaulting::new(IntConverter::default(), 0)).unwrap();
/// let reason = arguments.arg("reason", "Why", OptionalCoalescing::new(CoalescingStringConverter::default())).unwrap();
///
/// let context = CommandContext::new("ban", Arc::new(BundledTranslations::default()));
/// let mut parser = StringParser::new("<@80351110224678912> being rude days:7");
/// let parsed = arguments.parse(&mut parser, &context).await.unwrap();
///
/// assert_eq!(parsed.get(&target), Some(&Snowflake(80351110224678912)));
/// assert_eq!(parsed.get(&days), Some(&7));
/// assert_eq!(parsed.get(&reason), Some(&Some("being rude".to_string())));
/// # });
/// ```
#[derive(Debug, Default)]
pub struct Arguments {
    arguments: Vec<Argument>,
}

impl Arguments {
    /// Append an argument resolved by `converter`, returning the handle to read its value with.
    ///
    /// Names must be non-empty, made of letters, digits, `_` or `-` (not first), and unique (case-insensitively).
    pub fn arg<C: Converter + 'static>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        converter: C,
    ) -> Result<Arg<C::Output>, ConfigError> {
        let name = name.into();

        if name.is_empty()
            || name.starts_with('-')
            || !name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::new(format!(
                "argument name '{name}' must be non-empty, and only contain letters, digits, '_' or '-' (not first)."
            )));
        }

        let lowered = name.to_lowercase();

        if self
            .arguments
            .iter()
            .any(|argument| argument.info.display_name.to_lowercase() == lowered)
        {
            return Err(ConfigError::new(format!("duplicate argument name '{name}'.")));
        }

        let index = self.arguments.len();
        self.arguments.push(Argument {
            info: ArgumentInfo::new(name.clone(), description),
            converter: Box::new(AnonymousConversion::bind(converter)),
        });

        Ok(Arg {
            index,
            name,
            _phantom: PhantomData,
        })
    }

    /// The declared arguments, in order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Whether no arguments are declared.
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Resolve every argument from chat input.
    ///
    /// Named values (`name:value`) for declared arguments are taken out first.
    /// The first required argument that fails stops resolution, and input left over after the last argument is an error.
    pub async fn parse(
        &self,
        parser: &mut StringParser,
        context: &CommandContext,
    ) -> Result<ParsedArguments, RelayedError> {
        parser::resolve(&self.arguments, parser, context).await
    }

    /// Resolve every argument from the option values of a slash command.
    pub async fn parse_options(
        &self,
        context: &CommandContext,
        options: &[CommandOption],
    ) -> Result<ParsedArguments, RelayedError> {
        parser::resolve_options(&self.arguments, context, options).await
    }

    /// The slash command options registering this schema.
    pub fn to_slash_options(&self) -> Result<Vec<SlashOption>, ConfigError> {
        if self.arguments.len() > MAX_OPTIONS {
            return Err(ConfigError::new(format!(
                "slash commands take at most {MAX_OPTIONS} options, not {}.",
                self.arguments.len()
            )));
        }

        let mut options = Vec::with_capacity(self.arguments.len());
        let mut names = HashSet::new();
        let mut optional_seen = false;

        for argument in &self.arguments {
            let option = argument.converter.to_slash_option(&argument.info);

            if !is_option_name(&option.name) {
                return Err(ConfigError::new(format!(
                    "'{}' is not a valid option name: use 1 to 32 lowercase letters, digits, '_' or '-'.",
                    option.name
                )));
            }

            if !names.insert(option.name.clone()) {
                return Err(ConfigError::new(format!("duplicate option name '{}'.", option.name)));
            }

            let description_length = option.description.chars().count();

            if description_length == 0 || description_length > MAX_DESCRIPTION {
                return Err(ConfigError::new(format!(
                    "the description of option '{}' must be 1 to {MAX_DESCRIPTION} characters.",
                    option.name
                )));
            }

            if option.required && optional_seen {
                return Err(ConfigError::new(format!(
                    "required option '{}' must not follow an optional one.",
                    option.name
                )));
            }

            optional_seen |= !option.required;
            options.push(option);
        }

        Ok(options)
    }
}

/// The resolved values of a command's arguments.
///
/// Clones share the values; while resolving, [`CommandContext::resolved`] holds such a clone of the arguments resolved so far.
#[derive(Debug, Default, Clone)]
pub struct ParsedArguments {
    values: Vec<Option<Arc<AnyValue>>>,
}

impl ParsedArguments {
    #[cfg(test)]
    pub(crate) fn new(values: Vec<Option<AnyValue>>) -> Self {
        Self {
            values: values.into_iter().map(|value| value.map(Arc::new)).collect(),
        }
    }

    pub(crate) fn push(&mut self, value: Option<AnyValue>) {
        self.values.push(value.map(Arc::new));
    }

    /// The number of arguments resolved.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no argument has been resolved.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the value of `arg`.
    pub fn get<T: Any>(&self, arg: &Arg<T>) -> Option<&T> {
        self.values.get(arg.index)?.as_deref()?.downcast_ref()
    }

    /// Take the value of `arg`; later reads of it return `None`.
    ///
    /// Returns `None`, leaving the value in place, while a clone of these arguments still shares it.
    pub fn take<T: Any>(&mut self, arg: &Arg<T>) -> Option<T> {
        let slot = self.values.get_mut(arg.index)?;
        let value = Arc::try_unwrap(slot.take()?)
            .map_err(|shared| *slot = Some(shared))
            .ok()?;
        value.downcast().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::*;
    use crate::slash::OptionType;
    use crate::test::assert_contains;
    use crate::variants::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("two words")]
    #[case("name:")]
    #[case("-flag")]
    fn arg_name_invalid(#[case] name: &str) {
        let mut arguments = Arguments::default();
        let error = arguments
            .arg(name, "description", Single::new(BooleanConverter))
            .unwrap_err();
        assert_contains!(error.to_string(), "must be non-empty");
    }

    #[test]
    fn arg_name_duplicate() {
        let mut arguments = Arguments::default();
        arguments
            .arg("count", "A count", Single::new(IntConverter::default()))
            .unwrap();
        let error = arguments
            .arg("Count", "Another", Single::new(IntConverter::default()))
            .unwrap_err();
        assert_eq!(error.to_string(), "Config error: duplicate argument name 'Count'.");
    }

    #[test]
    fn parsed_get_take() {
        let mut arguments = Arguments::default();
        let first = arguments.arg("first", "", Single::new(IntConverter::default())).unwrap();
        let second = arguments.arg("second", "", Optional::new(StringConverter::default())).unwrap();
        let mut parsed = ParsedArguments::new(vec![Some(AnyValue::new(1i64)), Some(AnyValue::new(None::<String>))]);

        assert_eq!(parsed.get(&first), Some(&1));
        assert_eq!(parsed.get(&second), Some(&None));
        assert_eq!(parsed.take(&first), Some(1));
        assert_eq!(parsed.get(&first), None);
        assert_eq!(format!("{first:?}"), "Arg<i64>(first)");
    }

    #[test]
    fn parsed_take_shared() {
        let mut arguments = Arguments::default();
        let first = arguments.arg("first", "", Single::new(IntConverter::default())).unwrap();
        let mut parsed = ParsedArguments::new(vec![Some(AnyValue::new(1i64))]);
        let view = parsed.clone();

        assert_eq!(parsed.take(&first), None);
        assert_eq!(view.get(&first), Some(&1));
        drop(view);
        assert_eq!(parsed.take(&first), Some(1));
    }

    #[test]
    fn slash_options() {
        let mut arguments = Arguments::default();
        arguments.arg("user", "The user", Single::new(MentionConverter::user())).unwrap();
        arguments.arg("days", "Days", Defaulting::new(IntConverter::default().max(7), 0)).unwrap();
        arguments.arg("tags", "Tags", List::new(StringConverter::default()).optional()).unwrap();
        let options = arguments.to_slash_options().unwrap();

        assert_eq!(options.len(), 3);
        assert_eq!((options[0].kind, options[0].required), (OptionType::User, true));
        assert_eq!((options[1].kind, options[1].required), (OptionType::Integer, false));
        assert_eq!((options[2].kind, options[2].required), (OptionType::String, false));
    }

    #[test]
    fn slash_options_required_after_optional() {
        let mut arguments = Arguments::default();
        arguments.arg("maybe", "Maybe", Optional::new(BooleanConverter)).unwrap();
        arguments.arg("surely", "Surely", Single::new(BooleanConverter)).unwrap();
        let error = arguments.to_slash_options().unwrap_err();
        assert_contains!(error.to_string(), "required option 'surely' must not follow an optional one");
    }

    #[rstest]
    #[case("Upper", "desc", "not a valid option name")]
    #[case("a-very-long-option-name-over-32-chars", "desc", "not a valid option name")]
    #[case("fine", "", "must be 1 to 100 characters")]
    fn slash_options_invalid(#[case] name: &str, #[case] description: &str, #[case] message: &str) {
        let mut arguments = Arguments::default();
        arguments.arg(name, description, Single::new(BooleanConverter)).unwrap();
        let error = arguments.to_slash_options().unwrap_err();
        assert_contains!(error.to_string(), message);
    }

    #[test]
    fn slash_options_too_many() {
        let mut arguments = Arguments::default();

        for i in 0..26 {
            arguments
                .arg(format!("arg{i}"), "An argument", Single::new(BooleanConverter))
                .unwrap();
        }

        let error = arguments.to_slash_options().unwrap_err();
        assert_contains!(error.to_string(), "at most 25 options, not 26");
    }
}
