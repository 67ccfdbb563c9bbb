/// A single lexed piece of command input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A plain (possibly quoted) value.
    Positional {
        /// The unescaped value.
        data: String,
    },
    /// A `name:value` or `name=value` keyword value.
    Named {
        /// The name, exactly as typed.
        name: String,
        /// The separator between the name and the value.
        separator: char,
        /// The unescaped value.
        data: String,
    },
}

impl Token {
    /// Create a positional token.
    pub fn positional(data: impl Into<String>) -> Self {
        Token::Positional { data: data.into() }
    }

    /// Create a named token.
    pub fn named(name: impl Into<String>, separator: char, data: impl Into<String>) -> Self {
        Token::Named {
            name: name.into(),
            separator,
            data: data.into(),
        }
    }

    /// The value carried by this token.
    pub fn data(&self) -> &str {
        match self {
            Token::Positional { data } | Token::Named { data, .. } => data,
        }
    }

    /// The name of a named token.
    pub fn name(&self) -> Option<&str> {
        match self {
            Token::Positional { .. } => None,
            Token::Named { name, .. } => Some(name),
        }
    }

    /// Whether this token is a keyword value.
    pub fn is_named(&self) -> bool {
        matches!(self, Token::Named { .. })
    }

    /// Take the value, dropping any name.
    pub fn into_data(self) -> String {
        match self {
            Token::Positional { data } | Token::Named { data, .. } => data,
        }
    }

    /// Take the text this token stands for.
    ///
    /// Positional tokens yield their value; named tokens are re-joined as `name`, separator, value.
    /// This is what converters read, so a `name:value` shape that is not a declared keyword still arrives whole.
    pub fn into_text(self) -> String {
        match self {
            Token::Positional { data } => data,
            Token::Named {
                name,
                separator,
                data,
            } => format!("{name}{separator}{data}"),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Positional { data } => write!(f, "{data}"),
            Token::Named {
                name,
                separator,
                data,
            } => write!(f, "{name}{separator}{data}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn positional() {
        let token = Token::positional("abc");
        assert_eq!(token.data(), "abc");
        assert_eq!(token.name(), None);
        assert!(!token.is_named());
        assert_eq!(token.into_text(), "abc");
    }

    #[rstest]
    #[case(':', "count:5")]
    #[case('=', "count=5")]
    fn named(#[case] separator: char, #[case] expected: &str) {
        let token = Token::named("count", separator, "5");
        assert_eq!(token.data(), "5");
        assert_eq!(token.name(), Some("count"));
        assert!(token.is_named());
        assert_eq!(token.to_string(), expected);
        assert_eq!(token.clone().into_data(), "5");
        assert_eq!(token.into_text(), expected);
    }
}
