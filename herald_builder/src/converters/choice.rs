use async_trait::async_trait;

use crate::arguments::ArgumentInfo;
use crate::context::CommandContext;
use crate::converter::SingleConverter;
use crate::error::{ConfigError, RelayedError};
use crate::slash::{OptionChoice, OptionType, SlashOption};

// The platform accepts at most this many choices per option.
const MAX_CHOICES: usize = 25;

/// Converts one of a fixed set of names (case-insensitive) into its value.
///
/// ### Example
/// ```
/// # use herald_builder::*;
/// # use std::sync::Arc;
/// #[derive(Debug, Clone, PartialEq)]
/// enum Speed { Slow, Fast }
///
/// # futures::executor::block_on(async {
/// let context = CommandContext::new("race", Arc::new(BundledTranslations::default()));
/// let converter = ChoiceConverter::new([("slow", Speed::Slow), ("fast", Speed::Fast)]).unwrap();
///
/// assert_eq!(converter.parse("FAST", &context).await.unwrap(), Speed::Fast);
/// assert_eq!(converter.signature_type(&context), "slow/fast");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct ChoiceConverter<T> {
    choices: Vec<(String, T)>,
}

impl<T> ChoiceConverter<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a choice converter.
    ///
    /// Names must be present, unique (case-insensitively), and there may be at most 25 of them.
    pub fn new<S: Into<String>>(choices: impl IntoIterator<Item = (S, T)>) -> Result<Self, ConfigError> {
        let choices: Vec<(String, T)> = choices
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();

        if choices.is_empty() || choices.len() > MAX_CHOICES {
            return Err(ConfigError::new(format!(
                "a choice converter needs 1 to {MAX_CHOICES} choices, not {}.",
                choices.len()
            )));
        }

        for (i, (name, _)) in choices.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::new("choice names must not be blank."));
            }

            if choices[..i]
                .iter()
                .any(|(other, _)| other.to_lowercase() == name.to_lowercase())
            {
                return Err(ConfigError::new(format!("duplicate choice '{name}'.")));
            }
        }

        Ok(Self { choices })
    }

    fn names(&self) -> String {
        self.choices
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl<T> SingleConverter for ChoiceConverter<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = T;

    fn signature_type(&self, _context: &CommandContext) -> String {
        self.choices
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }

    async fn parse(&self, input: &str, context: &CommandContext) -> Result<T, RelayedError> {
        let lowered = input.to_lowercase();

        match self
            .choices
            .iter()
            .find(|(name, _)| name.to_lowercase() == lowered)
        {
            Some((_, value)) => Ok(value.clone()),
            None => Err(RelayedError::new(context.translate(
                "converters.choice.error.invalid",
                &[&input, &self.names()],
            ))),
        }
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        let choices = self
            .choices
            .iter()
            .map(|(name, _)| OptionChoice {
                name: name.clone(),
                value: name.clone(),
            })
            .collect();
        SlashOption::new(OptionType::String, argument).choices(choices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slash::OptionValue;
    use crate::test::{assert_contains, context};
    use rstest::rstest;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Colour {
        Red,
        Green,
    }

    fn colours() -> ChoiceConverter<Colour> {
        ChoiceConverter::new([("red", Colour::Red), ("Green", Colour::Green)]).unwrap()
    }

    #[rstest]
    #[case("red", Colour::Red)]
    #[case("RED", Colour::Red)]
    #[case("green", Colour::Green)]
    #[tokio::test]
    async fn parse(#[case] input: &str, #[case] expected: Colour) {
        assert_eq!(colours().parse(input, &context()).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn parse_invalid() {
        let error = colours().parse("blue", &context()).await.unwrap_err();
        assert_eq!(error.message(), "Value `blue` is not one of: red, Green");
    }

    #[tokio::test]
    async fn parse_option() {
        let value = colours()
            .parse_option(&OptionValue::String("Green".into()), &context())
            .await
            .unwrap();
        assert_eq!(value, Colour::Green);
    }

    #[test]
    fn signature_and_slash() {
        let converter = colours();
        assert_eq!(converter.signature_type(&context()), "red/Green");

        let option = converter.to_slash_option(&ArgumentInfo::new("colour", "A colour"));
        assert_eq!(option.choices.len(), 2);
        assert_eq!(option.choices[1].value, "Green");
    }

    #[rstest]
    #[case(vec![], "needs 1 to 25 choices, not 0")]
    #[case(vec![("a", 1), ("A", 2)], "duplicate choice 'A'")]
    #[case(vec![(" ", 1)], "must not be blank")]
    fn new_invalid(#[case] choices: Vec<(&str, u8)>, #[case] message: &str) {
        let error = ChoiceConverter::new(choices).unwrap_err();
        assert_contains!(error.to_string(), message);
    }

    #[test]
    fn new_too_many() {
        let choices: Vec<(String, usize)> = (0..26).map(|i| (format!("c{i}"), i)).collect();
        assert_matches!(ChoiceConverter::new(choices), Err(ConfigError(_)));
    }
}
