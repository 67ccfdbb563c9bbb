use serde::{Serialize, Serializer};

use crate::arguments::ArgumentInfo;
use crate::model::Snowflake;

/// The type of a slash command option, with the platform's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    /// Text.
    String = 3,
    /// A whole number.
    Integer = 4,
    /// A yes/no value.
    Boolean = 5,
    /// A user ID.
    User = 6,
    /// A channel ID.
    Channel = 7,
    /// A role ID.
    Role = 8,
    /// A user or a role.
    Mentionable = 9,
    /// A decimal number.
    Number = 10,
    /// An uploaded file.
    Attachment = 11,
}

impl OptionType {
    /// The platform code for this type.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OptionType::String => "string",
            OptionType::Integer => "integer",
            OptionType::Boolean => "boolean",
            OptionType::User => "user",
            OptionType::Channel => "channel",
            OptionType::Role => "role",
            OptionType::Mentionable => "mentionable",
            OptionType::Number => "number",
            OptionType::Attachment => "attachment",
        };
        write!(f, "{name}")
    }
}

impl Serialize for OptionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// A numeric bound on an integer or number option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NumericBound {
    /// A whole number.
    Integer(i64),
    /// A decimal number.
    Number(f64),
}

/// A fixed choice offered for a string option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionChoice {
    /// The name shown to the user.
    pub name: String,
    /// The value sent back when picked.
    pub value: String,
}

/// The registration descriptor of one slash command option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlashOption {
    /// The option type.
    #[serde(rename = "type")]
    pub kind: OptionType,
    /// The option name.
    pub name: String,
    /// The option description.
    pub description: String,
    /// Whether the option must be given.
    pub required: bool,
    /// The fixed choices, if any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    /// The minimum numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<NumericBound>,
    /// The maximum numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<NumericBound>,
    /// The minimum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    /// The maximum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
}

impl SlashOption {
    /// Create a required option named and described after `argument`.
    pub fn new(kind: OptionType, argument: &ArgumentInfo) -> Self {
        Self {
            kind,
            name: argument.display_name().to_string(),
            description: argument.description().to_string(),
            required: true,
            choices: Vec::default(),
            min_value: None,
            max_value: None,
            min_length: None,
            max_length: None,
        }
    }

    /// Set whether the option must be given.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the fixed choices.
    pub fn choices(mut self, choices: Vec<OptionChoice>) -> Self {
        self.choices = choices;
        self
    }

    /// Set the numeric bounds.
    pub fn value_range(mut self, min: Option<NumericBound>, max: Option<NumericBound>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Set the string length bounds.
    pub fn length_range(mut self, min: Option<u16>, max: Option<u16>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }
}

/// A file uploaded alongside a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// The attachment ID.
    pub id: Snowflake,
    /// The file name.
    pub filename: String,
    /// Where the file can be downloaded.
    pub url: String,
    /// The size in bytes.
    pub size: u64,
    /// The media type, if the platform knows it.
    pub content_type: Option<String>,
}

/// A typed option value received with a slash command invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Text.
    String(String),
    /// A whole number.
    Integer(i64),
    /// A decimal number.
    Number(f64),
    /// A yes/no value.
    Boolean(bool),
    /// A user ID.
    User(Snowflake),
    /// A channel ID.
    Channel(Snowflake),
    /// A role ID.
    Role(Snowflake),
    /// A user or role ID.
    Mentionable(Snowflake),
    /// An uploaded file.
    Attachment(Attachment),
}

impl OptionValue {
    /// The platform type of this value.
    pub fn option_type(&self) -> OptionType {
        match self {
            OptionValue::String(_) => OptionType::String,
            OptionValue::Integer(_) => OptionType::Integer,
            OptionValue::Number(_) => OptionType::Number,
            OptionValue::Boolean(_) => OptionType::Boolean,
            OptionValue::User(_) => OptionType::User,
            OptionValue::Channel(_) => OptionType::Channel,
            OptionValue::Role(_) => OptionType::Role,
            OptionValue::Mentionable(_) => OptionType::Mentionable,
            OptionValue::Attachment(_) => OptionType::Attachment,
        }
    }

    /// The text of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::String(value) => write!(f, "{value}"),
            OptionValue::Integer(value) => write!(f, "{value}"),
            OptionValue::Number(value) => write!(f, "{value}"),
            OptionValue::Boolean(value) => write!(f, "{value}"),
            OptionValue::User(id)
            | OptionValue::Channel(id)
            | OptionValue::Role(id)
            | OptionValue::Mentionable(id) => write!(f, "{id}"),
            OptionValue::Attachment(attachment) => write!(f, "{}", attachment.filename),
        }
    }
}

/// A named option value received with a slash command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    /// The option name.
    pub name: String,
    /// The option value.
    pub value: OptionValue,
}

impl CommandOption {
    /// Create a named option value.
    pub fn new(name: impl Into<String>, value: OptionValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The registration payload of a chat-input slash command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlashCommandPayload {
    /// The command name.
    pub name: String,
    /// The command description.
    pub description: String,
    /// Always `1`, the chat-input command type.
    #[serde(rename = "type")]
    pub kind: u8,
    /// The command options.
    pub options: Vec<SlashOption>,
}

impl SlashCommandPayload {
    pub(crate) fn new(name: impl Into<String>, description: impl Into<String>, options: Vec<SlashOption>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: 1,
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn option_serialize_minimal() {
        let info = ArgumentInfo::new("target", "Who to poke");
        let option = SlashOption::new(OptionType::User, &info).required(false);

        assert_eq!(
            serde_json::to_value(&option).unwrap(),
            json!({"type": 6, "name": "target", "description": "Who to poke", "required": false})
        );
    }

    #[test]
    fn option_serialize_constraints() {
        let info = ArgumentInfo::new("count", "How many");
        let option = SlashOption::new(OptionType::Integer, &info)
            .value_range(Some(NumericBound::Integer(1)), Some(NumericBound::Integer(10)));
        let text = SlashOption::new(OptionType::String, &ArgumentInfo::new("mode", "Mode"))
            .choices(vec![OptionChoice {
                name: "fast".to_string(),
                value: "fast".to_string(),
            }])
            .length_range(None, Some(5));

        assert_eq!(
            serde_json::to_value(&option).unwrap(),
            json!({"type": 4, "name": "count", "description": "How many", "required": true, "min_value": 1, "max_value": 10})
        );
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            json!({"type": 3, "name": "mode", "description": "Mode", "required": true, "choices": [{"name": "fast", "value": "fast"}], "max_length": 5})
        );
    }

    #[test]
    fn payload_serialize() {
        let payload = SlashCommandPayload::new("ping", "Pong!", Vec::default());
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"name": "ping", "description": "Pong!", "type": 1, "options": []})
        );
    }

    #[test]
    fn option_value_types() {
        assert_eq!(OptionValue::Number(1.5).option_type(), OptionType::Number);
        assert_eq!(OptionValue::Number(1.5).option_type().code(), 10);
        assert_eq!(OptionValue::String("x".into()).as_str(), Some("x"));
        assert_eq!(OptionValue::Boolean(true).as_str(), None);
        assert_eq!(OptionValue::Role(Snowflake(7)).to_string(), "7");
    }
}
