use std::str::FromStr;

use async_trait::async_trait;

use crate::arguments::ArgumentInfo;
use crate::context::CommandContext;
use crate::converter::{wrong_option_type, SingleConverter};
use crate::error::RelayedError;
use crate::model::Snowflake;
use crate::slash::{OptionType, OptionValue, SlashOption};

/// Converts a bare platform ID.
#[derive(Debug, Clone, Default)]
pub struct SnowflakeConverter;

#[async_trait]
impl SingleConverter for SnowflakeConverter {
    type Output = Snowflake;

    fn signature_type(&self, context: &CommandContext) -> String {
        context.translate("converters.snowflake.signatureType", &[])
    }

    async fn parse(&self, input: &str, context: &CommandContext) -> Result<Snowflake, RelayedError> {
        Snowflake::from_str(input).map_err(|_| {
            RelayedError::new(context.translate("converters.snowflake.error.invalid", &[&input]))
        })
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Snowflake, RelayedError> {
        match option {
            OptionValue::String(text) => self.parse(text, context).await,
            OptionValue::User(id)
            | OptionValue::Channel(id)
            | OptionValue::Role(id)
            | OptionValue::Mentionable(id) => Ok(*id),
            _ => Err(wrong_option_type(&self.signature_type(context), option, context)),
        }
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        SlashOption::new(OptionType::String, argument)
    }
}

/// The kind of entity a [`MentionConverter`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionKind {
    /// `<@id>` or `<@!id>`.
    User,
    /// `<@&id>`.
    Role,
    /// `<#id>`.
    Channel,
}

impl MentionKind {
    fn prefixes(&self) -> &'static [&'static str] {
        match self {
            MentionKind::User => &["<@!", "<@"],
            MentionKind::Role => &["<@&"],
            MentionKind::Channel => &["<#"],
        }
    }

    fn signature_key(&self) -> &'static str {
        match self {
            MentionKind::User => "converters.mention.signatureType.user",
            MentionKind::Role => "converters.mention.signatureType.role",
            MentionKind::Channel => "converters.mention.signatureType.channel",
        }
    }
}

/// Converts a mention of a user, role or channel (or its bare ID) into the mentioned ID.
#[derive(Debug, Clone)]
pub struct MentionConverter {
    kind: MentionKind,
}

impl MentionConverter {
    /// Accept user mentions.
    pub fn user() -> Self {
        Self {
            kind: MentionKind::User,
        }
    }

    /// Accept role mentions.
    pub fn role() -> Self {
        Self {
            kind: MentionKind::Role,
        }
    }

    /// Accept channel mentions.
    pub fn channel() -> Self {
        Self {
            kind: MentionKind::Channel,
        }
    }

    /// The accepted kind.
    pub fn kind(&self) -> MentionKind {
        self.kind
    }

    fn extract<'i>(&self, input: &'i str) -> &'i str {
        for prefix in self.kind.prefixes() {
            if let Some(id) = input
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix('>'))
            {
                return id;
            }
        }

        input
    }
}

#[async_trait]
impl SingleConverter for MentionConverter {
    type Output = Snowflake;

    fn signature_type(&self, context: &CommandContext) -> String {
        context.translate(self.kind.signature_key(), &[])
    }

    async fn parse(&self, input: &str, context: &CommandContext) -> Result<Snowflake, RelayedError> {
        Snowflake::from_str(self.extract(input)).map_err(|_| {
            RelayedError::new(context.translate(
                "converters.mention.error.invalid",
                &[&input, &self.signature_type(context)],
            ))
        })
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<Snowflake, RelayedError> {
        match (self.kind, option) {
            (_, OptionValue::String(text)) => self.parse(text, context).await,
            (MentionKind::User, OptionValue::User(id))
            | (MentionKind::User, OptionValue::Mentionable(id))
            | (MentionKind::Role, OptionValue::Role(id))
            | (MentionKind::Role, OptionValue::Mentionable(id))
            | (MentionKind::Channel, OptionValue::Channel(id)) => Ok(*id),
            _ => Err(wrong_option_type(&self.signature_type(context), option, context)),
        }
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        let kind = match self.kind {
            MentionKind::User => OptionType::User,
            MentionKind::Role => OptionType::Role,
            MentionKind::Channel => OptionType::Channel,
        };
        SlashOption::new(kind, argument)
    }
}
