use crate::arguments::Argument;
use crate::command::ChatCommand;
use crate::context::CommandContext;
use crate::converter::ConverterKind;
use crate::settings::Settings;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

const INDENT: usize = 2;
const PADDING: usize = 2;

// Room for about three words of average length.
const MINIMUM_MIDDLE_WIDTH: usize = 17;

impl ChatCommand {
    /// The argument signature, such as `<target> [days] <tags...>`.
    ///
    /// Required arguments are wrapped in `<>`, others in `[]`; lists and coalescing arguments end with `...`.
    pub fn signature(&self) -> String {
        self.arguments
            .arguments()
            .iter()
            .map(signature_part)
            .collect::<Vec<String>>()
            .join(" ")
    }

    /// The help text of the command, wrapped to [`Settings::help_width`].
    ///
    /// ### Example
    /// ```
    /// # use herald_builder::*;
    /// # use std::sync::Arc;
    /// let mut arguments = Arguments::default();
    /// arguments.arg("sides", "Sides of the die", Defaulting::new(IntConverter::default(), 6)).unwrap();
    /// let command = ChatCommand::new("roll", arguments, |_, _| async { Ok(()) }).description("Roll a die.");
    /// let context = CommandContext::new("roll", Arc::new(BundledTranslations::default()));
    ///
    /// let help = command.help(&context, &Settings::default());
    /// assert!(help.starts_with("Usage: !roll [sides]\nRoll a die.\n\nArguments:\n  sides  Sides of the die"));
    /// ```
    pub fn help(&self, context: &CommandContext, settings: &Settings) -> String {
        let usage = format!(
            "{}: {}{} {}",
            context.translate("commands.help.usage", &[]),
            settings.prefix,
            self.name,
            self.signature()
        );
        let mut lines = vec![usage.trim_end().to_string()];

        if !self.aliases.is_empty() {
            lines.push(format!(
                "{}: {}",
                context.translate("commands.help.aliases", &[]),
                self.aliases.join(", ")
            ));
        }

        let description = match &self.description {
            Some(description) => description.clone(),
            None => context.translate("commands.help.noDescription", &[]),
        };
        lines.extend(chunk(&description, settings.help_width));

        let arguments = self.arguments.arguments();

        if !arguments.is_empty() {
            let rows: Vec<(&str, &str, String)> = arguments
                .iter()
                .map(|argument| {
                    (
                        argument.info.display_name(),
                        argument.info.description(),
                        argument.signature_type(context),
                    )
                })
                .collect();
            let left = rows
                .iter()
                .map(|(name, _, _)| name.chars().count())
                .max()
                .unwrap_or_default();
            let right = rows
                .iter()
                .map(|(_, _, kind)| kind.chars().count())
                .max()
                .unwrap_or_default();
            let renderer = ColumnRenderer::guided(left, right, settings.help_width);

            lines.push(String::default());
            lines.push(format!("{}:", context.translate("commands.help.arguments", &[])));

            for (name, description, kind) in &rows {
                lines.extend(renderer.render(name, description, kind));
            }
        }

        lines.join("\n")
    }
}

fn signature_part(argument: &Argument) -> String {
    let name = argument.info.display_name();
    let repeated = matches!(
        argument.kind(),
        ConverterKind::List
            | ConverterKind::Coalescing
            | ConverterKind::OptionalCoalescing
            | ConverterKind::DefaultingCoalescing
    );
    let ellipsis = if repeated { "..." } else { "" };

    if argument.is_required() {
        format!("<{name}{ellipsis}>")
    } else {
        format!("[{name}{ellipsis}]")
    }
}

// Lays out `indent | left | middle | right` rows, wrapping the middle column.
#[derive(Debug)]
struct ColumnRenderer {
    left: usize,
    middle: usize,
    right: usize,
}

impl ColumnRenderer {
    fn guided(left: usize, right: usize, total: usize) -> Self {
        let non_middle = INDENT + left + PADDING + PADDING + right;

        let middle = if non_middle + MINIMUM_MIDDLE_WIDTH <= total {
            total - non_middle
        } else {
            MINIMUM_MIDDLE_WIDTH
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Columns {non_middle} within total {total}.  Selecting middle: {middle}.");
        }

        Self {
            left,
            middle,
            right,
        }
    }

    fn render(&self, left: &str, middle: &str, right: &str) -> Vec<String> {
        let indent = " ".repeat(INDENT);
        let padding = " ".repeat(PADDING);
        let left_width = self.left;
        let middle_width = self.middle;
        let right_width = self.right;
        let mut out = Vec::default();

        for (i, part) in chunk(middle, middle_width).iter().enumerate() {
            if i == 0 {
                out.push(format!(
                    "{indent}{left:left_width$}{padding}{part:middle_width$}{padding}{right:right_width$}"
                ));
            } else {
                out.push(format!("{indent}{:left_width$}{padding}{part}", ""));
            }
        }

        if out.is_empty() {
            out.push(format!(
                "{indent}{left:left_width$}{padding}{:middle_width$}{padding}{right:right_width$}",
                ""
            ));
        }

        out.into_iter()
            .map(|line| line.trim_end().to_string())
            .collect()
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + word.chars().count() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

// Break words longer than `width` across lines, ending each broken piece with a hyphen.
// A piece needs one character besides its hyphen, so widths below 2 are treated as 2.
fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let width = width.max(2);
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut start = 0;

    while characters.len() - start > width {
        let piece: String = characters[start..start + increment].iter().collect();
        lines.push(format!("{piece}-"));
        start += increment;
    }

    current.extend(&characters[start..]);
}
