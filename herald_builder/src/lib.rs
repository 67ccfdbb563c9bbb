//! Builder module for `herald`.
//! See the `herald` crate documentation for full details.
#![deny(missing_docs)]
mod arguments;
mod checks;
mod command;
mod context;
mod converter;
mod converters;
mod error;
mod help;
mod i18n;
mod model;
mod parser;
mod registry;
mod settings;
mod slash;
mod union;
mod variants;

pub use arguments::{Arg, Argument, ArgumentInfo, Arguments, ParsedArguments};
pub use checks::*;
pub use command::{ChatCommand, SlashCommand};
pub use context::*;
pub use converter::*;
pub use converters::*;
pub use error::*;
pub use i18n::*;
pub use model::*;
pub use registry::*;
pub use settings::Settings;
pub use slash::*;
pub use union::UnionConverter;
pub use variants::*;

pub use herald_parser::{NamedArguments, StringParser, Token};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Arc;

    use crate::context::CommandContext;
    use crate::i18n::BundledTranslations;

    macro_rules! assert_contains {
        ($base:expr, $sub:expr) => {
            assert!(
                $base.contains($sub),
                "'{b}' does not contain '{s}'",
                b = $base,
                s = $sub,
            );
        };
    }

    pub(crate) use assert_contains;

    pub(crate) fn context() -> CommandContext {
        CommandContext::new("test", Arc::new(BundledTranslations::default()))
    }
}
