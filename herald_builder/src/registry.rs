use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use herald_parser::StringParser;

use crate::command::{ChatCommand, SlashCommand};
use crate::context::{Channel, CommandContext, Invoker};
use crate::error::{CommandError, ConfigError};
use crate::i18n::{Locale, TranslationsProvider};
use crate::settings::Settings;
use crate::slash::{CommandOption, SlashCommandPayload};

#[cfg(feature = "tracing_debug")]
use tracing::{debug, error};

/// Sends user-facing messages back to wherever a command was invoked.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Send `message` in reply to the invocation described by `context`.
    async fn respond(&self, context: &CommandContext, message: String);
}

/// A [`Responder`] keeping every message in memory, for tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryResponder {
    messages: Mutex<Vec<String>>,
}

impl InMemoryResponder {
    /// The messages sent so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Responder for InMemoryResponder {
    async fn respond(&self, _context: &CommandContext, message: String) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }
}

/// A chat message that may invoke a command.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    /// The message text.
    pub content: String,
    /// Who sent the message.
    pub author: Invoker,
    /// Where the message was sent, when known.
    pub channel: Option<Channel>,
    /// The author's locale, when known.
    pub locale: Option<Locale>,
}

impl MessageEvent {
    /// Create a message event without a channel or locale.
    pub fn new(content: impl Into<String>, author: Invoker) -> Self {
        Self {
            content: content.into(),
            author,
            channel: None,
            locale: None,
        }
    }
}

/// A slash command invocation.
#[derive(Debug, Clone)]
pub struct InteractionEvent {
    /// The invoked command name.
    pub command: String,
    /// The option values given.
    pub options: Vec<CommandOption>,
    /// Who invoked the command.
    pub invoker: Invoker,
    /// Where the command was invoked, when known.
    pub channel: Option<Channel>,
    /// The invoker's locale, when known.
    pub locale: Option<Locale>,
}

impl InteractionEvent {
    /// Create an interaction event without a channel or locale.
    pub fn new(command: impl Into<String>, options: Vec<CommandOption>, invoker: Invoker) -> Self {
        Self {
            command: command.into(),
            options,
            invoker,
            channel: None,
            locale: None,
        }
    }
}

/// What handling an event amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The event did not invoke a known command.
    Ignored,
    /// The command ran to completion.
    Completed,
    /// The command stopped with a message for the user.
    Relayed,
    /// The command failed internally; the user got a generic message.
    Failed,
}

/// The set of commands a bot answers to, and their dispatch.
///
/// ### Example
/// ```
/// # use herald_builder::*;
/// # use std::sync::Arc;
/// # futures::executor::block_on(async {
/// let responder = Arc::new(InMemoryResponder::default());
/// let mut registry = CommandRegistry::new(
///     Settings::default(),
///     Arc::new(BundledTranslations::default()),
///     responder.clone(),
/// )
/// .unwrap();
/// registry.register_chat(ChatCommand::new("ping", Arguments::default(), |_, _| async { Ok(()) })).unwrap();
///
/// let outcome = registry.handle_message(MessageEvent::new("!ping now", Invoker::new(1u64))).await;
/// assert_eq!(outcome, Dispatch::Relayed);
/// assert_eq!(responder.messages(), vec!["Unexpected input: `now`"]);
/// # });
/// ```
pub struct CommandRegistry {
    settings: Settings,
    translations: Arc<dyn TranslationsProvider>,
    responder: Arc<dyn Responder>,
    chat_commands: Vec<ChatCommand>,
    chat_names: HashMap<String, usize>,
    slash_commands: Vec<SlashCommand>,
    slash_names: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Create an empty registry, once `settings` pass [`Settings::validate`].
    pub fn new(
        settings: Settings,
        translations: Arc<dyn TranslationsProvider>,
        responder: Arc<dyn Responder>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;

        Ok(Self {
            settings,
            translations,
            responder,
            chat_commands: Vec::default(),
            chat_names: HashMap::default(),
            slash_commands: Vec::default(),
            slash_names: HashMap::default(),
        })
    }

    /// The registry settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Add a chat command; its name and aliases must not clash with another's.
    pub fn register_chat(&mut self, command: ChatCommand) -> Result<(), ConfigError> {
        command.validate()?;
        let index = self.chat_commands.len();
        let mut names = Vec::default();

        for name in std::iter::once(command.name()).chain(command.aliases().iter().map(String::as_str)) {
            let key = name.to_lowercase();

            if self.chat_names.contains_key(&key) || names.contains(&key) {
                return Err(ConfigError::new(format!(
                    "chat command name or alias '{name}' is already registered."
                )));
            }

            names.push(key);
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Registering chat command '{}' as {names:?}.", command.name());
        }

        for key in names {
            self.chat_names.insert(key, index);
        }

        self.chat_commands.push(command);
        Ok(())
    }

    /// Add a slash command; it must produce a valid registration, and its name must be unused.
    pub fn register_slash(&mut self, command: SlashCommand) -> Result<(), ConfigError> {
        command.to_registration()?;

        if self.slash_names.contains_key(command.name()) {
            return Err(ConfigError::new(format!(
                "slash command '{}' is already registered.",
                command.name()
            )));
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Registering slash command '{}'.", command.name());
        }

        self.slash_names
            .insert(command.name().to_string(), self.slash_commands.len());
        self.slash_commands.push(command);
        Ok(())
    }

    /// Find a chat command by name or alias, case-insensitively.
    pub fn chat_command(&self, name: &str) -> Option<&ChatCommand> {
        self.chat_names
            .get(&name.to_lowercase())
            .map(|index| &self.chat_commands[*index])
    }

    /// The help text of a chat command, in `locale` (or the default locale).
    pub fn help(&self, name: &str, locale: Option<Locale>) -> Option<String> {
        let command = self.chat_command(name)?;
        let context = self.context(command.name(), locale, None, None);
        Some(command.help(&context, &self.settings))
    }

    /// The registration payloads of every slash command, in registration order.
    pub fn registration_payload(&self) -> Result<Vec<SlashCommandPayload>, ConfigError> {
        self.slash_commands
            .iter()
            .map(SlashCommand::to_registration)
            .collect()
    }

    /// Run the chat command a message invokes, if any.
    pub async fn handle_message(&self, event: MessageEvent) -> Dispatch {
        let MessageEvent {
            content,
            author,
            channel,
            locale,
        } = event;

        let Some(rest) = content.strip_prefix(self.settings.prefix.as_str()) else {
            return Dispatch::Ignored;
        };

        let mut parser = StringParser::new(rest);
        let Some(token) = parser.parse_next() else {
            return Dispatch::Ignored;
        };
        let name = token.into_text();

        let Some(command) = self.chat_command(&name) else {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("No chat command named '{name}'.");
            }

            return Dispatch::Ignored;
        };

        let context = self.context(command.name(), locale, Some(author), channel);
        let result = command.invoke(context.clone(), &mut parser).await;
        self.conclude(&context, result).await
    }

    /// Run the slash command an interaction invokes, if any.
    pub async fn handle_interaction(&self, event: InteractionEvent) -> Dispatch {
        let InteractionEvent {
            command,
            options,
            invoker,
            channel,
            locale,
        } = event;

        let Some(index) = self.slash_names.get(&command) else {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("No slash command named '{command}'.");
            }

            return Dispatch::Ignored;
        };
        let command = &self.slash_commands[*index];

        let context = self.context(command.name(), locale, Some(invoker), channel);
        let result = command.invoke(context.clone(), &options).await;
        self.conclude(&context, result).await
    }

    fn context(
        &self,
        command_name: &str,
        locale: Option<Locale>,
        invoker: Option<Invoker>,
        channel: Option<Channel>,
    ) -> CommandContext {
        let mut context = CommandContext::new(command_name, self.translations.clone())
            .with_locale(locale.unwrap_or_else(|| self.settings.default_locale.clone()));

        if let Some(invoker) = invoker {
            context = context.with_invoker(invoker);
        }

        if let Some(channel) = channel {
            context = context.with_channel(channel);
        }

        context
    }

    async fn conclude(&self, context: &CommandContext, result: Result<(), CommandError>) -> Dispatch {
        match result {
            Ok(()) => Dispatch::Completed,
            Err(CommandError::Relayed(relayed)) => {
                self.responder
                    .respond(context, relayed.message().to_string())
                    .await;
                Dispatch::Relayed
            }
            Err(CommandError::Internal(_internal)) => {
                #[cfg(feature = "tracing_debug")]
                {
                    error!("Command '{}' failed: {_internal}", context.command_name());
                }

                self.responder
                    .respond(context, context.translate("commands.error.internal", &[]))
                    .await;
                Dispatch::Failed
            }
        }
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("settings", &self.settings)
            .field("chat_commands", &self.chat_commands)
            .field("slash_commands", &self.slash_commands)
            .finish()
    }
}
