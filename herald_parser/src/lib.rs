//! The tokenizer behind `herald` chat commands.
//!
//! Command input is split on whitespace, with a few lenient extensions:
//! * `"double"` or `'single'` quotes group words into a single token.
//! * A backslash escapes whitespace, a quote, or another backslash; any other backslash is literal.
//! * `name:value` and `name=value` lex as named tokens (names are letters, digits, `_`, and `-` after the first character), which argument parsers may pull out ahead of positional parsing.
//! * Malformed input never fails: an unterminated quote simply takes the rest of the line literally.
//!
//! [`StringParser`] additionally keeps a stack of checkpoints so that speculative conversions can rewind.
#![deny(missing_docs)]

mod parser;
mod token;

pub use parser::{NamedArguments, StringParser, NAMED_SEPARATORS, QUOTES};
pub use token::Token;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reexports() {
        let mut parser = StringParser::new("x:1");
        assert_matches!(parser.parse_next(), Some(Token::Named { separator: ':', .. }));
    }
}
