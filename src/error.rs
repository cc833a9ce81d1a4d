use crate::diag::DiagContext;
use crate::resolver::ResolveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    /// A form was given the wrong number or shape of arguments.
    #[error("compile error: {message}{}", at(.location))]
    Structural {
        message: String,
        location: Option<String>,
    },

    /// A variable binding targets a name the shell cannot use.
    #[error("compile error: invalid shell identifier `{symbol}`: hyphens are not allowed{}", at(.location))]
    InvalidIdentifier {
        symbol: String,
        location: Option<String>,
    },

    /// The installed resolver rejected a call.
    #[error("compile error: {call}: {source}{}", at(.location))]
    Extension {
        call: String,
        location: Option<String>,
        #[source]
        source: ResolveError,
    },

    /// Input could not be decoded into a tree.
    #[error("interchange error: {message}")]
    Interchange { message: String },
}

fn at(location: &Option<String>) -> String {
    match location {
        Some(loc) => format!(" at {}", loc),
        None => String::new(),
    }
}

impl CompileError {
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural {
            message: message.into(),
            location: None,
        }
    }

    pub fn invalid_identifier(symbol: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            symbol: symbol.into(),
            location: None,
        }
    }

    pub fn interchange(message: impl Into<String>) -> Self {
        Self::Interchange {
            message: message.into(),
        }
    }

    /// Attach a location unless one is already set.
    pub fn with_location(mut self, diag: &DiagContext) -> Self {
        let loc = diag.location();
        match &mut self {
            Self::Structural { location, .. }
            | Self::InvalidIdentifier { location, .. }
            | Self::Extension { location, .. } => {
                if location.is_none() {
                    *location = loc;
                }
            }
            Self::Interchange { .. } => {}
        }
        self
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Structural { location, .. }
            | Self::InvalidIdentifier { location, .. }
            | Self::Extension { location, .. } => location.as_deref(),
            Self::Interchange { .. } => None,
        }
    }
}
