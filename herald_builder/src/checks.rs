use std::future::Future;

use async_trait::async_trait;

use crate::context::{ChannelKind, CommandContext};
use crate::error::RelayedError;
use crate::model::Snowflake;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The result of a [`Check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The command may run.
    Passed,
    /// The command must not run, optionally explaining why.
    Failed(Option<String>),
}

impl CheckOutcome {
    /// Pass when `condition` holds, otherwise fail with `message`.
    pub fn passed_if(condition: bool, message: impl FnOnce() -> String) -> Self {
        if condition {
            CheckOutcome::Passed
        } else {
            CheckOutcome::Failed(Some(message()))
        }
    }
}

/// A predicate deciding whether a command may run in a context.
///
/// Any `Fn(CommandContext) -> impl Future<Output = CheckOutcome>` is a check.
///
/// ### Example
/// ```
/// # use herald_builder::*;
/// let weekend_only = |context: CommandContext| async move {
///     CheckOutcome::Failed(Some(format!("`{}` only runs on weekends.", context.command_name())))
/// };
/// let command = ChatCommand::new("party", Arguments::default(), |_, _| async { Ok(()) })
///     .check(weekend_only)
///     .check(in_guild());
/// ```
#[async_trait]
pub trait Check: Send + Sync {
    /// Decide whether the command may run.
    async fn check(&self, context: &CommandContext) -> CheckOutcome;
}

#[async_trait]
impl<F, Fut> Check for F
where
    F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CheckOutcome> + Send + 'static,
{
    async fn check(&self, context: &CommandContext) -> CheckOutcome {
        self(context.clone()).await
    }
}

/// Pass only on a server.
pub fn in_guild() -> impl Check {
    |context: CommandContext| async move {
        let in_guild = context
            .invoker()
            .map(|invoker| invoker.guild_id.is_some())
            .unwrap_or(false);
        CheckOutcome::passed_if(in_guild, || context.translate("checks.inGuild.failed", &[]))
    }
}

/// Pass only in direct messages.
pub fn in_direct_message() -> impl Check {
    |context: CommandContext| async move {
        let in_direct_message = match context.channel() {
            Some(channel) => channel.kind == ChannelKind::DirectMessage,
            None => context
                .invoker()
                .map(|invoker| invoker.guild_id.is_none())
                .unwrap_or(false),
        };
        CheckOutcome::passed_if(in_direct_message, || {
            context.translate("checks.inDirectMessage.failed", &[])
        })
    }
}

/// Pass only when the invoker has `role`.
pub fn has_role(role: impl Into<Snowflake>) -> impl Check {
    let role = role.into();

    move |context: CommandContext| async move {
        let has_role = context
            .invoker()
            .map(|invoker| invoker.roles.contains(&role))
            .unwrap_or(false);
        CheckOutcome::passed_if(has_role, || context.translate("checks.hasRole.failed", &[&role]))
    }
}

/// Pass only when the invoker does not have `role`.
pub fn not_has_role(role: impl Into<Snowflake>) -> impl Check {
    let role = role.into();

    move |context: CommandContext| async move {
        let has_role = context
            .invoker()
            .map(|invoker| invoker.roles.contains(&role))
            .unwrap_or(false);
        CheckOutcome::passed_if(!has_role, || {
            context.translate("checks.notHasRole.failed", &[&role])
        })
    }
}

/// Pass only for one of `users`.
pub fn is_user(users: impl IntoIterator<Item = Snowflake>) -> impl Check {
    let users: Vec<Snowflake> = users.into_iter().collect();

    move |context: CommandContext| {
        let allowed = context
            .invoker()
            .map(|invoker| users.contains(&invoker.user_id))
            .unwrap_or(false);

        async move {
            CheckOutcome::passed_if(allowed, || context.translate("checks.isUser.failed", &[]))
        }
    }
}

// Run every check in order, stopping at the first failure.
pub(crate) async fn run_checks(
    checks: &[Box<dyn Check>],
    context: &CommandContext,
) -> Result<(), RelayedError> {
    for (_index, check) in checks.iter().enumerate() {
        if let CheckOutcome::Failed(message) = check.check(context).await {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Check {_index} of '{}' failed: {message:?}.", context.command_name());
            }

            let message = message.unwrap_or_else(|| context.translate("checks.failed", &[]));
            return Err(RelayedError::new(message));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::context::{Channel, Invoker};
    use crate::test::context;
    use rstest::rstest;

    fn guild_member(roles: Vec<Snowflake>) -> CommandContext {
        context().with_invoker(Invoker::new(1u64).in_guild(100u64, roles))
    }

    fn direct_message() -> CommandContext {
        context()
            .with_invoker(Invoker::new(1u64))
            .with_channel(Channel::new(50u64, ChannelKind::DirectMessage))
    }

    #[tokio::test]
    async fn in_guild_outcomes() {
        assert_eq!(in_guild().check(&guild_member(vec![])).await, CheckOutcome::Passed);
        assert_eq!(
            in_guild().check(&direct_message()).await,
            CheckOutcome::Failed(Some("This command can only be used on a server.".to_string()))
        );
        assert_matches!(in_guild().check(&context()).await, CheckOutcome::Failed(_));
    }

    #[tokio::test]
    async fn in_direct_message_outcomes() {
        assert_eq!(in_direct_message().check(&direct_message()).await, CheckOutcome::Passed);
        assert_eq!(
            in_direct_message().check(&guild_member(vec![])).await,
            CheckOutcome::Failed(Some("This command can only be used in direct messages.".to_string()))
        );
    }

    #[rstest]
    #[case(vec![], false)]
    #[case(vec![Snowflake(7)], true)]
    #[case(vec![Snowflake(3), Snowflake(7)], true)]
    #[tokio::test]
    async fn role_checks(#[case] roles: Vec<Snowflake>, #[case] has: bool) {
        let context = guild_member(roles);

        assert_eq!(has_role(7).check(&context).await == CheckOutcome::Passed, has);
        assert_eq!(not_has_role(7).check(&context).await == CheckOutcome::Passed, !has);
    }

    #[tokio::test]
    async fn role_check_message() {
        assert_eq!(
            has_role(7).check(&guild_member(vec![])).await,
            CheckOutcome::Failed(Some("You need the <@&7> role to use this command.".to_string()))
        );
    }

    #[rstest]
    #[case(1, true)]
    #[case(2, false)]
    #[tokio::test]
    async fn is_user_outcomes(#[case] user: u64, #[case] passed: bool) {
        let context = context().with_invoker(Invoker::new(user));

        assert_eq!(
            is_user([Snowflake(1), Snowflake(9)]).check(&context).await == CheckOutcome::Passed,
            passed
        );
    }

    #[tokio::test]
    async fn run_checks_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let checks: Vec<Box<dyn Check>> = vec![
            Box::new(|_: CommandContext| async { CheckOutcome::Passed }),
            Box::new(|_: CommandContext| async { CheckOutcome::Failed(None) }),
            Box::new(move |_: CommandContext| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { CheckOutcome::Passed }
            }),
        ];

        let error = run_checks(&checks, &context()).await.unwrap_err();

        assert_eq!(error.message(), "You are not allowed to use this command.");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn run_checks_passed() {
        let checks: Vec<Box<dyn Check>> = vec![Box::new(in_guild()), Box::new(has_role(7))];

        assert_matches!(run_checks(&checks, &guild_member(vec![Snowflake(7)])).await, Ok(()));
        assert_matches!(run_checks(&[], &context()).await, Ok(()));
    }
}
