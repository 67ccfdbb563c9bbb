mod attachment;
mod boolean;
mod choice;
mod number;
mod sentry;
mod snowflake;
mod string;
mod tag;

pub use attachment::AttachmentConverter;
pub use boolean::BooleanConverter;
pub use choice::ChoiceConverter;
pub use number::{DecimalConverter, IntConverter};
pub use sentry::SentryIdConverter;
pub use snowflake::{MentionConverter, MentionKind, SnowflakeConverter};
pub use string::{CoalescingStringConverter, StringConverter};
pub use tag::{ChannelGetter, TagConverter};
