use std::io::BufRead;
use std::sync::Arc;

use async_trait::async_trait;
use herald::*;
use rand::seq::SliceRandom;
use rand::Rng;

// Prints replies instead of sending them to a chat platform.
struct StdoutResponder;

#[async_trait]
impl Responder for StdoutResponder {
    async fn respond(&self, context: &CommandContext, message: String) {
        println!("[{}] {message}", context.command_name());
    }
}

fn roll() -> Result<ChatCommand, ConfigError> {
    let mut arguments = Arguments::default();
    let count = arguments.arg(
        "count",
        "How many dice to roll.",
        Defaulting::new(IntConverter::default().min(1).max(20), 1),
    )?;
    let sides = arguments.arg(
        "sides",
        "How many sides each die has.",
        Defaulting::new(IntConverter::default().min(2).max(1000), 6),
    )?;

    Ok(ChatCommand::new("roll", arguments, move |_, parsed| {
        let count = parsed.get(&count).copied().unwrap_or(1);
        let sides = parsed.get(&sides).copied().unwrap_or(6);

        async move {
            let mut rng = rand::thread_rng();
            let rolls: Vec<i64> = (0..count).map(|_| rng.gen_range(1..=sides)).collect();
            let total: i64 = rolls.iter().sum();
            println!("Rolled {rolls:?}, total {total}.");
            Ok(())
        }
    })
    .alias("r")
    .description("Roll some dice, such as `!roll 2 20` for two twenty-sided dice."))
}

fn pick() -> Result<ChatCommand, ConfigError> {
    let mut arguments = Arguments::default();
    let options = arguments.arg(
        "options",
        "The things to pick from.",
        List::new(StringConverter::default().max_length(100)),
    )?;

    Ok(ChatCommand::new("pick", arguments, move |_, mut parsed| {
        let options = parsed.take(&options).unwrap_or_default();

        async move {
            match options.choose(&mut rand::thread_rng()) {
                Some(choice) => {
                    println!("I pick {choice}.");
                    Ok(())
                }
                None => Err(CommandError::internal("no options to pick from")),
            }
        }
    })
    .description("Pick one of the given options."))
}

fn flip() -> Result<SlashCommand, ConfigError> {
    let mut arguments = Arguments::default();
    let call = arguments.arg(
        "call",
        "Heads or tails.",
        Single::new(ChoiceConverter::new([("heads", true), ("tails", false)])?),
    )?;

    Ok(SlashCommand::new("flip", "Flip a coin.", arguments, move |_, parsed| {
        let call = parsed.get(&call).copied();

        async move {
            let heads = rand::thread_rng().gen_bool(0.5);
            let outcome = if heads { "heads" } else { "tails" };

            if call == Some(heads) {
                println!("It's {outcome}, you win!");
                Ok(())
            } else {
                Err(RelayedError::new(format!("It's {outcome}, better luck next time.")).into())
            }
        }
    }))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("HERALD_DEBUG").is_some() {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut registry = CommandRegistry::new(
        Settings::default(),
        Arc::new(BundledTranslations::default()),
        Arc::new(StdoutResponder),
    )?;
    registry.register_chat(roll()?)?;
    registry.register_chat(pick()?)?;
    registry.register_slash(flip()?)?;

    if std::env::args().any(|argument| argument == "--registration") {
        println!("{}", serde_json::to_string_pretty(&registry.registration_payload()?)?);
        return Ok(());
    }

    println!("Type commands such as `!roll 3`, `!pick tea coffee`, `/flip heads` or `?roll` for help.");

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let author = Invoker::new(1u64);

        if let Some(name) = line.strip_prefix('?') {
            match registry.help(name.trim(), None) {
                Some(help) => println!("{help}"),
                None => println!("No command named `{}`.", name.trim()),
            }
        } else if let Some(rest) = line.strip_prefix('/') {
            let mut parts = rest.splitn(2, ' ');
            let command = parts.next().unwrap_or_default();
            let options = parts
                .next()
                .map(|value| vec![CommandOption::new("call", OptionValue::String(value.trim().to_string()))])
                .unwrap_or_default();
            registry
                .handle_interaction(InteractionEvent::new(command, options, author))
                .await;
        } else {
            registry.handle_message(MessageEvent::new(line, author)).await;
        }
    }

    Ok(())
}
