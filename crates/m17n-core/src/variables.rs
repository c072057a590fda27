//! Backend input-method variables, edited as plain text.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariableError {
    #[error("not an integer: {0:?}")]
    NotInteger(String),
    #[error("empty symbol")]
    EmptySymbol,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableValue {
    Text(String),
    Symbol(String),
    Integer(i64),
}

impl VariableValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Symbol(_) => "symbol",
            Self::Integer(_) => "integer",
        }
    }

    /// Plain-text rendering for an editor field.
    pub fn format(&self) -> String {
        match self {
            Self::Text(s) | Self::Symbol(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
        }
    }

    /// Parse `text` into a value of the same kind as `template`.
    pub fn parse_as(template: &Self, text: &str) -> Result<Self, VariableError> {
        match template {
            Self::Text(_) => Ok(Self::Text(text.to_string())),
            Self::Symbol(_) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(VariableError::EmptySymbol);
                }
                Ok(Self::Symbol(text.to_string()))
            }
            Self::Integer(_) => text
                .trim()
                .parse()
                .map(Self::Integer)
                .map_err(|_| VariableError::NotInteger(text.to_string())),
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// A named variable with its description and current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub key: String,
    pub description: String,
    pub value: VariableValue,
}
