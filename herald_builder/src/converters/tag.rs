use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::arguments::ArgumentInfo;
use crate::context::{Channel, ChannelKind, CommandContext, ForumTag};
use crate::converter::SingleConverter;
use crate::error::RelayedError;
use crate::slash::{OptionType, SlashOption};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Looks up the forum channel whose tags are offered.
///
/// The context carries the values of earlier arguments in [`CommandContext::resolved`], so the forum can be one picked by a previous argument.
pub type ChannelGetter = Arc<dyn Fn(CommandContext) -> BoxFuture<'static, Option<Channel>> + Send + Sync>;

/// Converts a forum tag name into the tag.
///
/// Tags come from the channel returned by the configured getter, or else from the forum containing the current thread.
/// A name matches exactly first, then as a prefix (a suffix in right-to-left locales), then anywhere; always case-insensitively.
#[derive(Clone, Default)]
pub struct TagConverter {
    getter: Option<ChannelGetter>,
}

impl std::fmt::Debug for TagConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagConverter")
            .field("getter", &self.getter.is_some())
            .finish()
    }
}

impl TagConverter {
    /// Take tags from the channel `getter` resolves, which must be a forum.
    pub fn channel_getter<F, Fut>(mut self, getter: F) -> Self
    where
        F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<Channel>> + Send + 'static,
    {
        self.getter = Some(Arc::new(move |context| getter(context).boxed()));
        self
    }

    async fn tags(&self, context: &CommandContext) -> Result<Vec<ForumTag>, RelayedError> {
        let forum = match &self.getter {
            Some(getter) => getter(context.clone()).await,
            None => context
                .channel()
                .filter(|channel| channel.kind == ChannelKind::Thread)
                .and_then(|thread| thread.parent.as_deref())
                .cloned(),
        };

        match forum {
            Some(channel) if channel.kind == ChannelKind::GuildForum => Ok(channel.available_tags),
            _ => {
                let key = if self.getter.is_some() {
                    "converters.tag.error.wrongChannelTypeWithGetter"
                } else {
                    "converters.tag.error.wrongChannelType"
                };
                Err(RelayedError::new(context.translate(key, &[])))
            }
        }
    }
}

fn find_tag(tags: Vec<ForumTag>, input: &str, right_to_left: bool) -> Option<ForumTag> {
    let needle = input.to_lowercase();
    let lowered: Vec<String> = tags.iter().map(|tag| tag.name.to_lowercase()).collect();
    let position = lowered
        .iter()
        .position(|name| *name == needle)
        .or_else(|| {
            lowered.iter().position(|name| {
                if right_to_left {
                    name.ends_with(&needle)
                } else {
                    name.starts_with(&needle)
                }
            })
        })
        .or_else(|| lowered.iter().position(|name| name.contains(&needle)))?;

    tags.into_iter().nth(position)
}

#[async_trait]
impl SingleConverter for TagConverter {
    type Output = ForumTag;

    fn signature_type(&self, context: &CommandContext) -> String {
        context.translate("converters.tag.signatureType", &[])
    }

    async fn parse(&self, input: &str, context: &CommandContext) -> Result<ForumTag, RelayedError> {
        let tags = self.tags(context).await?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Matching '{input}' against {} tags.", tags.len());
        }

        find_tag(tags, input, context.locale().is_right_to_left()).ok_or_else(|| {
            RelayedError::new(context.translate("converters.tag.error.unknownTag", &[&input]))
        })
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        SlashOption::new(OptionType::String, argument)
    }
}
