//! `herald` parses the arguments of chat-bot commands into typed values.
//!
//! Chat input is messy: users forget arguments, quote some words and not others, and put things in the wrong order.
//! `herald` is built around the following concerns:
//! * *Type safe arguments*:
//! Commands declare their arguments with converters, and read back typed values (`i64`, `Snowflake`, `Option<String>`, ..).
//! * *Lenient resolution*:
//! Optional and defaulting arguments fall back quietly when the input does not suit them, leaving that input for later arguments.
//! * *One schema, two surfaces*:
//! The same argument schema resolves prefixed chat messages (`!ban @user spam`) and slash command options, and produces the slash command registration.
//! * *Translated messages*:
//! Every user-facing message goes through a [`TranslationsProvider`], with English built in.
//!
//! # Usage
//! The demo reads chat lines from stdin (see `demos/dice.rs`):
//! ```no_run
#![doc = include_str!("../demos/dice.rs")]
//! ```
//!
//! ```console
//! $ cargo run --example dice
//! !roll 2 20
//! Rolled [7, 19], total 26.
//! !roll 2 d20
//! [roll] Unexpected input: `d20`
//! ?roll
//! Usage: !roll [count] [sides]
//! Aliases: r
//! Roll some dice, such as `!roll 2 20` for two twenty-sided dice.
//!
//! Arguments:
//!   count  How many dice to roll.                                             number
//!   sides  How many sides each die has.                                       number
//! ```
//!
//! # Tokens
//! The input after the prefix and command name is split by a [`StringParser`]:
//! * whitespace separates tokens;
//! * `"double"` or `'single'` quotes group words, and a backslash escapes a quote, a space or another backslash;
//! * `name:value` or `name=value` gives a value to the argument `name`, wherever it appears in the input.
//!
//! A quote that is never closed does not fail parsing; the rest of the input is taken literally.
//!
//! # Converters
//! Converters turn text (or slash option values) into typed values.
//! Each is wrapped in a variant deciding how many tokens it takes, and what happens when conversion fails:
//! * [`Single`]: exactly one value; failures are reported.
//! * [`Optional`]: at most one value; failures resolve to `None`.
//! * [`Defaulting`]: at most one value; failures resolve to a default.
//! * [`List`]: consecutive values until one does not convert.
//! * [`Coalescing`], [`OptionalCoalescing`], [`DefaultingCoalescing`]: many tokens combined into one value, such as [`CoalescingStringConverter`].
//!
//! Variants accept a validator, run on every converted value:
//! ```
//! # use herald::*;
//! let mut arguments = Arguments::default();
//! let even = arguments
//!     .arg(
//!         "even",
//!         "An even number",
//!         Single::new(IntConverter::default()).validate(|_, value| {
//!             if value % 2 == 0 {
//!                 Ok(())
//!             } else {
//!                 Err(RelayedError::new(format!("{value} is odd.")))
//!             }
//!         }),
//!     )
//!     .unwrap();
//! ```
//!
//! ### Unions
//! A [`UnionConverter`] tries several converters in order, and resolves to the first that accepts the input.
//! Its value is an [`AnyValue`] to downcast:
//! ```
//! # use herald::*;
//! # use std::sync::Arc;
//! # tokio_test_block_on(async {
//! let union = UnionConverter::new(vec![
//!     Single::new(IntConverter::default()).into(),
//!     Single::new(BooleanConverter).into(),
//! ])
//! .unwrap();
//! let mut arguments = Arguments::default();
//! let amount = arguments.arg("amount", "A number, or yes/no", Coalescing::new(union)).unwrap();
//!
//! let context = CommandContext::new("poke", Arc::new(BundledTranslations::default()));
//! let parsed = arguments.parse(&mut StringParser::new("yes"), &context).await.unwrap();
//! assert_eq!(parsed.get(&amount).and_then(|value| value.downcast_ref::<bool>()), Some(&true));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(future: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future)
//! # }
//! ```
//!
//! # Commands
//! A [`ChatCommand`] or [`SlashCommand`] pairs an [`Arguments`] schema with checks and an async action.
//! A [`CommandRegistry`] dispatches events to them, and sends relayed errors through a [`Responder`].
//!
//! # Logging
//! With the (default) `tracing_debug` feature, converter attempts, union candidates and argument resolution are logged at `debug` level via `tracing`.
//! Internal command failures are logged at `error` level.
pub use herald_builder::*;
