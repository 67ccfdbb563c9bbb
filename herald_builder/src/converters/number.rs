use async_trait::async_trait;

use crate::arguments::ArgumentInfo;
use crate::context::CommandContext;
use crate::converter::{wrong_option_type, SingleConverter};
use crate::error::{ConfigError, RelayedError};
use crate::slash::{NumericBound, OptionType, OptionValue, SlashOption};

/// Converts whole numbers, optionally in another radix and within bounds.
#[derive(Debug, Clone)]
pub struct IntConverter {
    radix: u32,
    min: Option<i64>,
    max: Option<i64>,
}

impl Default for IntConverter {
    fn default() -> Self {
        Self {
            radix: 10,
            min: None,
            max: None,
        }
    }
}

impl IntConverter {
    /// Parse in `radix` (2 to 36) instead of decimal.
    ///
    /// Slash commands only carry decimal integers, so a non-decimal converter registers a string option.
    pub fn radix(mut self, radix: u32) -> Result<Self, ConfigError> {
        if !(2..=36).contains(&radix) {
            return Err(ConfigError::new(format!(
                "radix {radix} must be within 2 to 36."
            )));
        }

        self.radix = radix;
        Ok(self)
    }

    /// The smallest accepted value.
    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// The largest accepted value.
    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    fn check_bounds(&self, value: i64, context: &CommandContext) -> Result<i64, RelayedError> {
        check_bounds(value, self.min, self.max, context)
    }
}

fn check_bounds<T: PartialOrd + std::fmt::Display>(
    value: T,
    min: Option<T>,
    max: Option<T>,
    context: &CommandContext,
) -> Result<T, RelayedError> {
    if let Some(min) = min {
        if value < min {
            return Err(RelayedError::new(context.translate(
                "converters.number.error.tooLow",
                &[&value, &min],
            )));
        }
    }

    if let Some(max) = max {
        if value > max {
            return Err(RelayedError::new(context.translate(
                "converters.number.error.tooHigh",
                &[&value, &max],
            )));
        }
    }

    Ok(value)
}

#[async_trait]
impl SingleConverter for IntConverter {
    type Output = i64;

    fn signature_type(&self, context: &CommandContext) -> String {
        context.translate("converters.number.signatureType", &[])
    }

    async fn parse(&self, input: &str, context: &CommandContext) -> Result<i64, RelayedError> {
        let value = i64::from_str_radix(input, self.radix).map_err(|_| {
            if self.radix == 10 {
                RelayedError::new(context.translate("converters.number.error.invalid", &[&input]))
            } else {
                RelayedError::new(context.translate(
                    "converters.number.error.invalid.radix",
                    &[&input, &self.radix],
                ))
            }
        })?;
        self.check_bounds(value, context)
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<i64, RelayedError> {
        match option {
            OptionValue::Integer(value) => self.check_bounds(*value, context),
            OptionValue::String(text) => self.parse(text, context).await,
            _ => Err(wrong_option_type(&self.signature_type(context), option, context)),
        }
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        if self.radix == 10 {
            SlashOption::new(OptionType::Integer, argument).value_range(
                self.min.map(NumericBound::Integer),
                self.max.map(NumericBound::Integer),
            )
        } else {
            SlashOption::new(OptionType::String, argument)
        }
    }
}

/// Converts finite decimal numbers, optionally within bounds.
#[derive(Debug, Clone, Default)]
pub struct DecimalConverter {
    min: Option<f64>,
    max: Option<f64>,
}

impl DecimalConverter {
    /// The smallest accepted value.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// The largest accepted value.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

#[async_trait]
impl SingleConverter for DecimalConverter {
    type Output = f64;

    fn signature_type(&self, context: &CommandContext) -> String {
        context.translate("converters.decimal.signatureType", &[])
    }

    async fn parse(&self, input: &str, context: &CommandContext) -> Result<f64, RelayedError> {
        match input.parse::<f64>() {
            Ok(value) if value.is_finite() => check_bounds(value, self.min, self.max, context),
            _ => Err(RelayedError::new(
                context.translate("converters.decimal.error.invalid", &[&input]),
            )),
        }
    }

    async fn parse_option(
        &self,
        option: &OptionValue,
        context: &CommandContext,
    ) -> Result<f64, RelayedError> {
        match option {
            OptionValue::Number(value) => check_bounds(*value, self.min, self.max, context),
            OptionValue::Integer(value) => check_bounds(*value as f64, self.min, self.max, context),
            OptionValue::String(text) => self.parse(text, context).await,
            _ => Err(wrong_option_type(&self.signature_type(context), option, context)),
        }
    }

    fn to_slash_option(&self, argument: &ArgumentInfo) -> SlashOption {
        SlashOption::new(OptionType::Number, argument).value_range(
            self.min.map(NumericBound::Number),
            self.max.map(NumericBound::Number),
        )
    }
}
