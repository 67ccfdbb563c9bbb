use std::fmt::Display;
use std::sync::Arc;

use crate::arguments::ParsedArguments;
use crate::i18n::{Locale, TranslationsProvider};
use crate::model::Snowflake;

/// The kind of channel a command was invoked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// A regular text channel on a server.
    GuildText,
    /// A direct message channel.
    DirectMessage,
    /// A forum channel on a server.
    GuildForum,
    /// A thread, whether public or private.
    Thread,
    /// Any other kind of channel.
    Other,
}

/// A tag that may be applied to posts in a forum channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumTag {
    /// The tag ID.
    pub id: Snowflake,
    /// The tag name.
    pub name: String,
    /// The unicode emoji shown alongside the tag, if any.
    pub emoji: Option<String>,
}

impl ForumTag {
    /// Create a tag without an emoji.
    pub fn new(id: impl Into<Snowflake>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            emoji: None,
        }
    }
}

/// What the bot knows about a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// The channel ID.
    pub id: Snowflake,
    /// The channel kind.
    pub kind: ChannelKind,
    /// The channel containing this one, for threads.
    pub parent: Option<Arc<Channel>>,
    /// The tags available in a forum channel.
    pub available_tags: Vec<ForumTag>,
}

impl Channel {
    /// Create a channel without a parent or tags.
    pub fn new(id: impl Into<Snowflake>, kind: ChannelKind) -> Self {
        Self {
            id: id.into(),
            kind,
            parent: None,
            available_tags: Vec::default(),
        }
    }

    /// Set the parent channel.
    pub fn with_parent(mut self, parent: Channel) -> Self {
        self.parent = Some(Arc::new(parent));
        self
    }

    /// Set the available forum tags.
    pub fn with_tags(mut self, tags: Vec<ForumTag>) -> Self {
        self.available_tags = tags;
        self
    }
}

/// The user who invoked a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    /// The user ID.
    pub user_id: Snowflake,
    /// The server the command was invoked on, or `None` in direct messages.
    pub guild_id: Option<Snowflake>,
    /// The user's role IDs on that server.
    pub roles: Vec<Snowflake>,
}

impl Invoker {
    /// Create an invoker outside of any server.
    pub fn new(user_id: impl Into<Snowflake>) -> Self {
        Self {
            user_id: user_id.into(),
            guild_id: None,
            roles: Vec::default(),
        }
    }

    /// Place the invoker on a server, with the given roles.
    pub fn in_guild(mut self, guild_id: impl Into<Snowflake>, roles: Vec<Snowflake>) -> Self {
        self.guild_id = Some(guild_id.into());
        self.roles = roles;
        self
    }
}

/// The per-invocation state passed through checks, argument parsing and the command action.
#[derive(Clone)]
pub struct CommandContext {
    command_name: String,
    locale: Locale,
    translations: Arc<dyn TranslationsProvider>,
    invoker: Option<Invoker>,
    channel: Option<Channel>,
    resolved: ParsedArguments,
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("command_name", &self.command_name)
            .field("locale", &self.locale)
            .field("invoker", &self.invoker)
            .field("channel", &self.channel)
            .field("resolved", &self.resolved.len())
            .finish()
    }
}

impl CommandContext {
    /// Create a context in the translations' default locale.
    pub fn new(command_name: impl Into<String>, translations: Arc<dyn TranslationsProvider>) -> Self {
        Self {
            command_name: command_name.into(),
            locale: translations.default_locale().clone(),
            translations,
            invoker: None,
            channel: None,
            resolved: ParsedArguments::default(),
        }
    }

    /// Set the locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set the invoker.
    pub fn with_invoker(mut self, invoker: Invoker) -> Self {
        self.invoker = Some(invoker);
        self
    }

    /// Set the current channel.
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    pub(crate) fn with_resolved(mut self, resolved: ParsedArguments) -> Self {
        self.resolved = resolved;
        self
    }

    /// The name of the command being invoked.
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// The locale user-facing text is produced in.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The invoking user, when known.
    pub fn invoker(&self) -> Option<&Invoker> {
        self.invoker.as_ref()
    }

    /// The current channel, when known.
    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    /// The arguments resolved before the one currently being converted.
    ///
    /// Converters run in declaration order, so a converter can read the values of earlier arguments here.
    /// Outside argument resolution this is empty.
    pub fn resolved(&self) -> &ParsedArguments {
        &self.resolved
    }

    /// The translations provider.
    pub fn translations(&self) -> &Arc<dyn TranslationsProvider> {
        &self.translations
    }

    /// Translate `key` into this context's locale.
    pub fn translate(&self, key: &str, replacements: &[&dyn Display]) -> String {
        self.translations.translate(key, &self.locale, replacements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::BundledTranslations;

    #[test]
    fn translate_in_locale() {
        let mut translations = BundledTranslations::default();
        translations.insert("fr", "commands.help.usage", "Utilisation");
        let context = CommandContext::new("ping", Arc::new(translations));

        assert_eq!(context.locale(), &Locale::new("en"));
        assert_eq!(context.translate("commands.help.usage", &[]), "Usage");

        let context = context.with_locale(Locale::new("fr-CA"));
        assert_eq!(context.translate("commands.help.usage", &[]), "Utilisation");
    }

    #[test]
    fn builders() {
        let thread = Channel::new(2u64, ChannelKind::Thread)
            .with_parent(Channel::new(1u64, ChannelKind::GuildForum).with_tags(vec![ForumTag::new(9u64, "bug")]));
        let context = CommandContext::new("tag", Arc::new(BundledTranslations::default()))
            .with_invoker(Invoker::new(5u64).in_guild(7u64, vec![Snowflake(8)]))
            .with_channel(thread);

        assert_eq!(context.command_name(), "tag");
        assert_eq!(context.invoker().unwrap().guild_id, Some(Snowflake(7)));
        let parent = context.channel().unwrap().parent.as_ref().unwrap();
        assert_eq!(parent.available_tags[0].name, "bug");
        assert!(context.resolved().is_empty());
    }
}
