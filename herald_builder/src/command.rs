use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use herald_parser::StringParser;

use crate::arguments::{Arguments, ParsedArguments};
use crate::checks::{run_checks, Check};
use crate::context::CommandContext;
use crate::error::{CommandError, ConfigError};
use crate::slash::{CommandOption, SlashCommandPayload};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

const MAX_DESCRIPTION: usize = 100;

type Action =
    Arc<dyn Fn(CommandContext, ParsedArguments) -> BoxFuture<'static, Result<(), CommandError>> + Send + Sync>;

fn boxed_action<F, Fut>(action: F) -> Action
where
    F: Fn(CommandContext, ParsedArguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
{
    Arc::new(
        move |context: CommandContext, arguments: ParsedArguments| -> BoxFuture<'static, Result<(), CommandError>> {
            Box::pin(action(context, arguments))
        },
    )
}

/// A command invoked by a prefixed chat message, such as `!ban @user spam`.
///
/// ### Example
/// ```
/// # use herald_builder::*;
/// let mut arguments = Arguments::default();
/// let sides = arguments.arg("sides", "Sides of the die", Defaulting::new(IntConverter::default().min(2), 6)).unwrap();
///
/// let command = ChatCommand::new("roll", arguments, move |_context, parsed| {
///     let sides = parsed.get(&sides).copied();
///     async move {
///         assert!(sides.is_some());
///         Ok(())
///     }
/// })
/// .alias("r")
/// .description("Roll a die.");
///
/// assert_eq!(command.aliases(), ["r"]);
/// ```
pub struct ChatCommand {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) description: Option<String>,
    pub(crate) arguments: Arguments,
    checks: Vec<Box<dyn Check>>,
    action: Action,
}

impl ChatCommand {
    /// Create a command resolving `arguments`, then running `action`.
    pub fn new<F, Fut>(name: impl Into<String>, arguments: Arguments, action: F) -> Self
    where
        F: Fn(CommandContext, ParsedArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            aliases: Vec::default(),
            description: None,
            arguments,
            checks: Vec::default(),
            action: boxed_action(action),
        }
    }

    /// Add another name the command answers to.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the description shown in help.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a check, run before arguments are resolved.
    pub fn check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// The command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The other names of the command.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The argument schema.
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for name in std::iter::once(&self.name).chain(self.aliases.iter()) {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ConfigError::new(format!(
                    "command name '{name}' must be non-empty and contain no whitespace."
                )));
            }
        }

        Ok(())
    }

    pub(crate) async fn invoke(
        &self,
        context: CommandContext,
        parser: &mut StringParser,
    ) -> Result<(), CommandError> {
        run_checks(&self.checks, &context).await?;
        let arguments = self.arguments.parse(parser, &context).await?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Running chat command '{}'.", self.name);
        }

        (self.action)(context, arguments).await
    }
}

impl std::fmt::Debug for ChatCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCommand")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// A command registered with the platform and invoked through its slash command interface.
pub struct SlashCommand {
    name: String,
    description: String,
    arguments: Arguments,
    checks: Vec<Box<dyn Check>>,
    action: Action,
}

impl SlashCommand {
    /// Create a slash command resolving `arguments` from option values, then running `action`.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        arguments: Arguments,
        action: F,
    ) -> Self
    where
        F: Fn(CommandContext, ParsedArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            arguments,
            checks: Vec::default(),
            action: boxed_action(action),
        }
    }

    /// Add a check, run before arguments are resolved.
    pub fn check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// The command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The argument schema.
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// The payload registering this command with the platform.
    pub fn to_registration(&self) -> Result<SlashCommandPayload, ConfigError> {
        if !crate::arguments::is_option_name(&self.name) {
            return Err(ConfigError::new(format!(
                "'{}' is not a valid slash command name: use 1 to 32 lowercase letters, digits, '_' or '-'.",
                self.name
            )));
        }

        let description_length = self.description.chars().count();

        if description_length == 0 || description_length > MAX_DESCRIPTION {
            return Err(ConfigError::new(format!(
                "the description of slash command '{}' must be 1 to {MAX_DESCRIPTION} characters.",
                self.name
            )));
        }

        let options = self.arguments.to_slash_options()?;
        Ok(SlashCommandPayload::new(
            self.name.clone(),
            self.description.clone(),
            options,
        ))
    }

    pub(crate) async fn invoke(
        &self,
        context: CommandContext,
        options: &[CommandOption],
    ) -> Result<(), CommandError> {
        run_checks(&self.checks, &context).await?;
        let arguments = self.arguments.parse_options(&context, options).await?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Running slash command '{}'.", self.name);
        }

        (self.action)(context, arguments).await
    }
}

impl std::fmt::Debug for SlashCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlashCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arguments", &self.arguments)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::checks::CheckOutcome;
    use crate::converters::*;
    use crate::error::RelayedError;
    use crate::slash::OptionValue;
    use crate::test::{assert_contains, context};
    use crate::variants::*;
    use rstest::rstest;

    fn recording(seen: Arc<Mutex<Vec<i64>>>) -> (Arguments, impl Fn(CommandContext, ParsedArguments) -> BoxFuture<'static, Result<(), CommandError>> + Send + Sync + 'static) {
        let mut arguments = Arguments::default();
        let count = arguments.arg("count", "How many", Single::new(IntConverter::default())).unwrap();
        let action = move |_context: CommandContext, parsed: ParsedArguments| -> BoxFuture<'static, Result<(), CommandError>> {
            let seen = seen.clone();
            let count = parsed.get(&count).copied();
            Box::pin(async move {
                match count {
                    Some(count) if count < 0 => Err(CommandError::internal("negative count")),
                    Some(count) => {
                        seen.lock().unwrap().push(count);
                        Ok(())
                    }
                    None => Err(RelayedError::new("no count").into()),
                }
            })
        };
        (arguments, action)
    }

    #[tokio::test]
    async fn chat_invoke() {
        let seen = Arc::new(Mutex::new(Vec::default()));
        let (arguments, action) = recording(seen.clone());
        let command = ChatCommand::new("count", arguments, action);
        let mut parser = StringParser::new("3");

        command.invoke(context(), &mut parser).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![3]);
    }

    #[rstest]
    #[case("x", "Invalid value for argument `count`")]
    #[case("", "Missing required argument `count`")]
    #[tokio::test]
    async fn chat_invoke_relayed(#[case] input: &str, #[case] message: &str) {
        let seen = Arc::new(Mutex::new(Vec::default()));
        let (arguments, action) = recording(seen.clone());
        let command = ChatCommand::new("count", arguments, action);
        let mut parser = StringParser::new(input);

        let error = command.invoke(context(), &mut parser).await.unwrap_err();

        assert_matches!(error, CommandError::Relayed(error) => {
            assert_contains!(error.message(), message);
        });
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn chat_invoke_internal() {
        let (arguments, action) = recording(Arc::new(Mutex::new(Vec::default())));
        let command = ChatCommand::new("count", arguments, action);
        let mut parser = StringParser::new("-1");

        let error = command.invoke(context(), &mut parser).await.unwrap_err();

        assert_matches!(error, CommandError::Internal(_));
    }

    #[tokio::test]
    async fn chat_check_before_arguments() {
        let seen = Arc::new(Mutex::new(Vec::default()));
        let (arguments, action) = recording(seen.clone());
        let command = ChatCommand::new("count", arguments, action)
            .check(|_: CommandContext| async { CheckOutcome::Failed(Some("nope".to_string())) });
        let mut parser = StringParser::new("not a number");

        let error = command.invoke(context(), &mut parser).await.unwrap_err();

        assert_eq!(error.to_string(), "nope");
        assert!(seen.lock().unwrap().is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("two words")]
    fn chat_validate(#[case] alias: &str) {
        let command = ChatCommand::new("fine", Arguments::default(), |_, _| async { Ok(()) }).alias(alias);
        let error = command.validate().unwrap_err();
        assert_contains!(error.to_string(), "must be non-empty and contain no whitespace");
    }

    #[tokio::test]
    async fn slash_invoke() {
        let seen = Arc::new(Mutex::new(Vec::default()));
        let (arguments, action) = recording(seen.clone());
        let command = SlashCommand::new("count", "Count things", arguments, action);
        let options = vec![CommandOption::new("count", OptionValue::Integer(12))];

        command.invoke(context(), &options).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![12]);
    }

    #[test]
    fn slash_registration() {
        let (arguments, action) = recording(Arc::new(Mutex::new(Vec::default())));
        let command = SlashCommand::new("count", "Count things", arguments, action);

        let payload = command.to_registration().unwrap();

        assert_eq!(payload.name, "count");
        assert_eq!(payload.kind, 1);
        assert_eq!(payload.options.len(), 1);
        assert!(payload.options[0].required);
    }

    #[rstest]
    #[case("Count", "Count things", "not a valid slash command name")]
    #[case("count it", "Count things", "not a valid slash command name")]
    #[case("count", "", "must be 1 to 100 characters")]
    fn slash_registration_invalid(#[case] name: &str, #[case] description: &str, #[case] message: &str) {
        let command = SlashCommand::new(name, description, Arguments::default(), |_, _| async { Ok(()) });
        let error = command.to_registration().unwrap_err();
        assert_contains!(error.to_string(), message);
    }
}
