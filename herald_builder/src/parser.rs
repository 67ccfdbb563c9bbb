use herald_parser::StringParser;

use crate::arguments::{Argument, ParsedArguments};
use crate::context::CommandContext;
use crate::error::RelayedError;
use crate::slash::CommandOption;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

pub(crate) async fn resolve(
    arguments: &[Argument],
    parser: &mut StringParser,
    context: &CommandContext,
) -> Result<ParsedArguments, RelayedError> {
    let names: Vec<String> = arguments
        .iter()
        .map(|argument| argument.info.display_name().to_lowercase())
        .collect();
    let named = parser.take_named(&names);
    let mut resolved = ParsedArguments::default();

    for (argument, name) in arguments.iter().zip(names.iter()) {
        let named_values = named.get(name).map(Vec::as_slice);

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Resolving '{name}' ({:?}) from named {named_values:?}, remaining '{}'.",
                argument.kind(),
                parser.remaining()
            );
        }

        let scoped = context.clone().with_resolved(resolved.clone());
        let outcome = argument
            .converter
            .parse(Some(&mut *parser), &scoped, named_values)
            .await;

        match outcome {
            Ok(Some(parsed)) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Resolved '{name}' from {} tokens.", parsed.consumed);
                }

                resolved.push(Some(parsed.value));
            }
            Ok(None) => {
                if argument.is_required() {
                    return Err(missing_argument(argument, context));
                }

                resolved.push(argument.converter.absent());
            }
            Err(error) => return Err(invalid_value(argument, context, error)),
        }
    }

    if parser.has_next() {
        let leftover = parser.remaining().trim().to_string();

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Unexpected input left after the last argument: '{leftover}'.");
        }

        return Err(RelayedError::new(
            context.translate("argumentParser.error.unexpectedInput", &[&leftover]),
        ));
    }

    Ok(resolved)
}

pub(crate) async fn resolve_options(
    arguments: &[Argument],
    context: &CommandContext,
    options: &[CommandOption],
) -> Result<ParsedArguments, RelayedError> {
    let mut resolved = ParsedArguments::default();

    for argument in arguments {
        let name = argument.info.display_name().to_lowercase();
        let option = options
            .iter()
            .find(|option| option.name.to_lowercase() == name);

        match option {
            Some(option) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Resolving '{name}' from option {:?}.", option.value);
                }

                let scoped = context.clone().with_resolved(resolved.clone());
                let value = argument
                    .converter
                    .parse_option(&option.value, &scoped)
                    .await
                    .map_err(|error| invalid_value(argument, context, error))?;
                resolved.push(Some(value));
            }
            None => match argument.converter.absent() {
                Some(value) => resolved.push(Some(value)),
                None => return Err(missing_argument(argument, context)),
            },
        }
    }

    Ok(resolved)
}

fn invalid_value(argument: &Argument, context: &CommandContext, error: RelayedError) -> RelayedError {
    RelayedError::new(context.translate(
        "argumentParser.error.invalidValue",
        &[
            &argument.info.display_name(),
            &argument.signature_type(context),
            &error,
        ],
    ))
}

fn missing_argument(argument: &Argument, context: &CommandContext) -> RelayedError {
    RelayedError::new(context.translate(
        "argumentParser.error.missingArgument",
        &[&argument.info.display_name(), &argument.signature_type(context)],
    ))
}
