use std::collections::HashMap;
use std::ops::Range;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::token::Token;

/// Characters separating the name from the value of a named token.
pub const NAMED_SEPARATORS: [char; 2] = [':', '='];
/// Characters that open (and close) a quoted token.
pub const QUOTES: [char; 2] = ['"', '\''];
const ESCAPE: char = '\\';

/// Named values pulled out of the input, keyed by lowercased name, in input order.
pub type NamedArguments = HashMap<String, Vec<String>>;

/// A cursor over the raw text of a command invocation (everything after the command name).
///
/// Tokens are lexed lazily, left to right.
/// The cursor only moves forward, except when rewound to a checkpoint via [`StringParser::restore`].
///
/// ### Example
/// ```
/// # use herald_parser::{StringParser, Token};
/// let mut parser = StringParser::new(r#""hello world" count:5"#);
///
/// assert_eq!(parser.parse_next(), Some(Token::positional("hello world")));
/// parser.mark();
/// assert_eq!(parser.parse_next(), Some(Token::named("count", ':', "5")));
/// parser.restore();
/// assert_eq!(parser.parse_next(), Some(Token::named("count", ':', "5")));
/// assert_eq!(parser.parse_next(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringParser {
    input: String,
    cursor: usize,
    checkpoints: Vec<usize>,
}

impl StringParser {
    /// Create a parser positioned at the start of `input`.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            cursor: 0,
            checkpoints: Vec::default(),
        }
    }

    /// The full input this parser works over.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The byte offset of the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The raw, not yet consumed, input.
    pub fn remaining(&self) -> &str {
        &self.input[self.cursor..]
    }

    /// Whether any token remains.
    pub fn has_next(&self) -> bool {
        self.remaining().chars().any(|c| !c.is_whitespace())
    }

    /// Consume and return the next token, or `None` once the input is exhausted.
    pub fn parse_next(&mut self) -> Option<Token> {
        let (token, span) = lex(&self.input, self.cursor)?;
        self.cursor = span.end;
        Some(token)
    }

    /// Return the next token without consuming it.
    pub fn peek_next(&self) -> Option<Token> {
        lex(&self.input, self.cursor).map(|(token, _)| token)
    }

    /// Push the current cursor onto the checkpoint stack.
    pub fn mark(&mut self) {
        self.checkpoints.push(self.cursor);
    }

    /// Pop the newest checkpoint and rewind the cursor to it.
    /// Returns `false` (and does nothing) when no checkpoint is marked.
    pub fn restore(&mut self) -> bool {
        match self.checkpoints.pop() {
            Some(cursor) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Restoring cursor {} -> {cursor}.", self.cursor);
                }

                self.cursor = cursor;
                true
            }
            None => false,
        }
    }

    /// Pop the newest checkpoint, keeping the cursor where it is.
    /// Returns `false` when no checkpoint is marked.
    pub fn commit(&mut self) -> bool {
        self.checkpoints.pop().is_some()
    }

    /// The number of outstanding checkpoints.
    pub fn checkpoints(&self) -> usize {
        self.checkpoints.len()
    }

    /// Consume the rest of the input as raw text, trimmed of surrounding whitespace.
    pub fn consume_remaining(&mut self) -> String {
        let remaining = self.remaining().trim().to_string();
        self.cursor = self.input.len();
        remaining
    }

    /// Pull every named token whose (case-insensitive) name is in `names` out of the remaining input.
    ///
    /// The other tokens keep their raw source text, so lexing the remainder afterwards produces the same positional tokens as before.
    /// The cursor is reset to the start of that remainder and all checkpoints are dropped.
    ///
    /// ### Example
    /// ```
    /// # use herald_parser::{StringParser, Token};
    /// let mut parser = StringParser::new("5 reason:\"bad day\" https://example.com");
    /// let named = parser.take_named(&["reason"]);
    ///
    /// assert_eq!(named["reason"], vec!["bad day".to_string()]);
    /// assert_eq!(parser.input(), "5 https://example.com");
    /// ```
    pub fn take_named<S: AsRef<str>>(&mut self, names: &[S]) -> NamedArguments {
        let wanted: Vec<String> = names.iter().map(|n| n.as_ref().to_lowercase()).collect();
        let mut named = NamedArguments::default();
        let mut kept: Vec<&str> = Vec::default();
        let mut offset = self.cursor;

        while let Some((token, span)) = lex(&self.input, offset) {
            offset = span.end;

            match token {
                Token::Named { name, data, .. } => {
                    let key = name.to_lowercase();

                    if wanted.contains(&key) {
                        named.entry(key).or_default().push(data);
                    } else {
                        kept.push(&self.input[span]);
                    }
                }
                Token::Positional { .. } => kept.push(&self.input[span]),
            }
        }

        let input = kept.join(" ");

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Took named values {named:?}, leaving '{input}'.");
        }

        self.input = input;
        self.cursor = 0;
        self.checkpoints.clear();
        named
    }
}

// Lex the token at or after `offset`, returning it alongside its source span.
fn lex(input: &str, offset: usize) -> Option<(Token, Range<usize>)> {
    let start = skip_whitespace(input, offset);

    if start >= input.len() {
        return None;
    }

    if let Some((name_length, separator)) = named_prefix(&input[start..]) {
        let value_start = start + name_length + separator.len_utf8();

        // `name:` must be directly followed by its value to count as a named token.
        if let Some(c) = input[value_start..].chars().next() {
            if !c.is_whitespace() {
                let (data, end) = lex_value(input, value_start);
                let token = Token::Named {
                    name: input[start..start + name_length].to_string(),
                    separator,
                    data,
                };
                return Some((token, start..end));
            }
        }
    }

    let (data, end) = lex_value(input, start);
    Some((Token::Positional { data }, start..end))
}

fn skip_whitespace(input: &str, offset: usize) -> usize {
    match input[offset..].char_indices().find(|(_, c)| !c.is_whitespace()) {
        Some((index, _)) => offset + index,
        None => input.len(),
    }
}

// The byte length of a leading identifier and the separator right after it.
// `-` may appear in the name after its first character, as in `dry-run:yes`.
fn named_prefix(text: &str) -> Option<(usize, char)> {
    for (index, c) in text.char_indices() {
        if c.is_alphanumeric() || c == '_' || (index > 0 && c == '-') {
            continue;
        }

        if index > 0 && NAMED_SEPARATORS.contains(&c) {
            return Some((index, c));
        }

        return None;
    }

    None
}

fn lex_value(input: &str, start: usize) -> (String, usize) {
    match input[start..].chars().next() {
        Some(quote) if QUOTES.contains(&quote) => lex_quoted(input, start, quote),
        _ => lex_bare(input, start),
    }
}

fn lex_quoted(input: &str, start: usize, quote: char) -> (String, usize) {
    let body = start + quote.len_utf8();
    let mut data = String::default();
    let mut chars = input[body..].char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if c == ESCAPE {
            match chars.peek() {
                Some(&(_, next)) if is_escapable(next) => {
                    data.push(next);
                    chars.next();
                }
                _ => data.push(c),
            }
        } else if c == quote {
            return (data, body + index + c.len_utf8());
        } else {
            data.push(c);
        }
    }

    // Unterminated quote: the rest of the input is taken literally.
    (input[start..].trim_end().to_string(), input.len())
}

fn lex_bare(input: &str, start: usize) -> (String, usize) {
    let mut data = String::default();
    let mut chars = input[start..].char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if c == ESCAPE {
            match chars.peek() {
                Some(&(_, next)) if is_escapable(next) => {
                    data.push(next);
                    chars.next();
                }
                _ => data.push(c),
            }
        } else if c.is_whitespace() {
            return (data, start + index);
        } else {
            data.push(c);
        }
    }

    (data, input.len())
}

fn is_escapable(c: char) -> bool {
    c == ESCAPE || c.is_whitespace() || QUOTES.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{seq::SliceRandom, thread_rng, Rng};
    use rstest::rstest;

    fn drain(parser: &mut StringParser) -> Vec<Token> {
        let mut tokens = Vec::default();

        while let Some(token) = parser.parse_next() {
            tokens.push(token);
        }

        tokens
    }

    fn positionals(values: &[&str]) -> Vec<Token> {
        values.iter().map(|v| Token::positional(*v)).collect()
    }

    #[test]
    fn unquoted_whitespace_split() {
        let alphabet: Vec<char> = "abcdefghijklmnopqrstuvwxyz0123456789_-.,!?"
            .chars()
            .collect();
        let whitespace = [' ', '\t', '\n', '\r', '\u{3000}'];
        let mut rng = thread_rng();

        for _ in 0..200 {
            let words: Vec<String> = (0..rng.gen_range(0..10))
                .map(|_| {
                    (0..rng.gen_range(1..8))
                        .map(|_| *alphabet.choose(&mut rng).unwrap())
                        .collect()
                })
                .collect();
            let mut input = String::default();

            for word in &words {
                for _ in 0..rng.gen_range(1..4) {
                    input.push(*whitespace.choose(&mut rng).unwrap());
                }

                input.push_str(word);
            }

            for _ in 0..rng.gen_range(0..3) {
                input.push(*whitespace.choose(&mut rng).unwrap());
            }

            let mut parser = StringParser::new(input.as_str());
            let tokens: Vec<String> = drain(&mut parser)
                .into_iter()
                .map(Token::into_text)
                .collect();
            assert_eq!(tokens, words, "input: {input:?}");
        }
    }

    #[rstest]
    #[case("", vec![])]
    #[case("   ", vec![])]
    #[case("a", vec!["a"])]
    #[case(" a  b ", vec!["a", "b"])]
    #[case(r#""hello world" foo"#, vec!["hello world", "foo"])]
    #[case("'hello world' foo", vec!["hello world", "foo"])]
    #[case(r#"'say "hi"' x"#, vec![r#"say "hi""#, "x"])]
    #[case(r#""it's""#, vec!["it's"])]
    #[case("don't stop", vec!["don't", "stop"])]
    #[case(r#""""#, vec![""])]
    #[case(r#""ab"cd"#, vec!["ab", "cd"])]
    #[case(r#""a \" b""#, vec![r#"a " b"#])]
    #[case(r"a\ b c", vec!["a b", "c"])]
    #[case(r"a\\b", vec![r"a\b"])]
    #[case(r"a\b", vec![r"a\b"])]
    #[case(r"trailing\", vec![r"trailing\"])]
    #[case(r#"\"quoted\" no"#, vec![r#""quoted""#, "no"])]
    fn positional_tokens(#[case] input: &str, #[case] expected: Vec<&str>) {
        let mut parser = StringParser::new(input);
        assert_eq!(drain(&mut parser), positionals(&expected));
    }

    #[rstest]
    #[case(r#""abc def"#, vec![r#""abc def"#])]
    #[case("foo 'bar baz  ", vec!["foo", "'bar baz"])]
    #[case(r#"" "#, vec![r#"""#])]
    fn unterminated_quote(#[case] input: &str, #[case] expected: Vec<&str>) {
        let mut parser = StringParser::new(input);
        assert_eq!(drain(&mut parser), positionals(&expected));
        assert_eq!(parser.cursor(), input.len());
    }

    #[rstest]
    #[case("count:5", Token::named("count", ':', "5"))]
    #[case("count=5", Token::named("count", '=', "5"))]
    #[case("Count_2:five", Token::named("Count_2", ':', "five"))]
    #[case(r#"reason:"two words""#, Token::named("reason", ':', "two words"))]
    #[case("reason='x y'", Token::named("reason", '=', "x y"))]
    #[case("größe:3", Token::named("größe", ':', "3"))]
    #[case("a:b:c", Token::named("a", ':', "b:c"))]
    #[case("dry-run:yes", Token::named("dry-run", ':', "yes"))]
    #[case("a-b=c", Token::named("a-b", '=', "c"))]
    fn named_tokens(#[case] input: &str, #[case] expected: Token) {
        let mut parser = StringParser::new(input);
        assert_eq!(drain(&mut parser), vec![expected]);
    }

    #[rstest]
    #[case("count: 5", vec!["count:", "5"])]
    #[case("count :5", vec!["count", ":5"])]
    #[case("count:", vec!["count:"])]
    #[case(":5", vec![":5"])]
    #[case("-a:c", vec!["-a:c"])]
    #[case("--verbose", vec!["--verbose"])]
    #[case("=", vec!["="])]
    fn not_named(#[case] input: &str, #[case] expected: Vec<&str>) {
        let mut parser = StringParser::new(input);
        assert_eq!(drain(&mut parser), positionals(&expected));
    }

    #[rstest]
    #[case("https://example.com")]
    #[case(r"C:\new")]
    #[case("12:30")]
    fn named_text_survives(#[case] input: &str) {
        let mut parser = StringParser::new(input);
        let token = parser.parse_next().unwrap();
        assert!(token.is_named());
        assert_eq!(token.into_text(), input);
    }

    #[rstest]
    #[case("a b c", 0)]
    #[case("a b c", 1)]
    #[case("a b c", 3)]
    #[case(r#""x y" z:1 'w"#, 1)]
    #[case(r#""x y" z:1 'w"#, 2)]
    fn mark_restore(#[case] input: &str, #[case] skip: usize) {
        let mut parser = StringParser::new(input);

        for _ in 0..skip {
            parser.parse_next();
        }

        let mut expected = parser.clone();
        parser.mark();
        drain(&mut parser);
        assert!(parser.restore());
        assert_eq!(parser.parse_next(), expected.parse_next());
        assert_eq!(parser.checkpoints(), 0);
    }

    #[test]
    fn nested_checkpoints() {
        let mut parser = StringParser::new("a b c d");
        parser.mark();
        parser.parse_next();
        parser.mark();
        parser.parse_next();
        parser.mark();
        parser.parse_next();
        assert_eq!(parser.checkpoints(), 3);

        assert!(parser.restore());
        assert_eq!(parser.peek_next(), Some(Token::positional("c")));
        assert!(parser.commit());
        assert_eq!(parser.peek_next(), Some(Token::positional("c")));
        assert!(parser.restore());
        assert_eq!(parser.peek_next(), Some(Token::positional("a")));
        assert!(!parser.restore());
        assert!(!parser.commit());
    }

    #[test]
    fn peek_does_not_consume() {
        let mut parser = StringParser::new("one two");
        assert_eq!(parser.peek_next(), Some(Token::positional("one")));
        assert_eq!(parser.peek_next(), Some(Token::positional("one")));
        assert_eq!(parser.parse_next(), Some(Token::positional("one")));
        assert_eq!(parser.peek_next(), Some(Token::positional("two")));
    }

    #[rstest]
    #[case("one  two   three ", 1, "two   three")]
    #[case("one", 1, "")]
    #[case("  \"keep\" 'quotes'  ", 0, "\"keep\" 'quotes'")]
    fn consume_remaining(#[case] input: &str, #[case] skip: usize, #[case] expected: &str) {
        let mut parser = StringParser::new(input);

        for _ in 0..skip {
            parser.parse_next();
        }

        assert_eq!(parser.consume_remaining(), expected);
        assert!(!parser.has_next());
        assert_eq!(parser.parse_next(), None);
    }

    #[rstest]
    #[case("", false)]
    #[case(" \t\n", false)]
    #[case(" x ", true)]
    fn has_next(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(StringParser::new(input).has_next(), expected);
    }

    #[test]
    fn take_named() {
        let mut parser =
            StringParser::new(r#"5 Reason:"bad day" count=3 https://x.y "a b" reason:again"#);
        parser.mark();
        let named = parser.take_named(&["reason", "COUNT"]);

        assert_eq!(named.len(), 2);
        assert_eq!(
            named["reason"],
            vec!["bad day".to_string(), "again".to_string()]
        );
        assert_eq!(named["count"], vec!["3".to_string()]);
        assert_eq!(parser.cursor(), 0);
        assert_eq!(parser.checkpoints(), 0);
        assert_eq!(
            drain(&mut parser),
            vec![
                Token::positional("5"),
                Token::named("https", ':', "//x.y"),
                Token::positional("a b"),
            ]
        );
    }

    #[test]
    fn take_named_after_cursor() {
        let mut parser = StringParser::new("first:1 second:2");
        parser.parse_next();
        let named = parser.take_named(&["first", "second"]);

        assert_eq!(named.get("first"), None);
        assert_eq!(named["second"], vec!["2".to_string()]);
        assert_eq!(parser.input(), "");
    }

    #[test]
    fn take_named_none() {
        let mut parser = StringParser::new("a  b:c");
        let named = parser.take_named::<&str>(&[]);

        assert!(named.is_empty());
        assert_eq!(parser.input(), "a b:c");
    }
}
