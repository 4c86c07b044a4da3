use std::fmt;

/// Represents errors that can occur when registering a new route.
///
/// A rejected pattern leaves the router unchanged. Matching itself has no
/// error type; a path that matches nothing is reported as a plain `false`.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum InsertError {
    /// Patterns must contain at least one byte.
    Empty,
    /// Placeholders must be registered with a name.
    UnnamedParam,
    /// Catch-all parameters are only allowed at the end of a pattern.
    InvalidCatchAll,
    /// Two placeholders, or a placeholder and a catch-all, must be separated
    /// by at least one literal byte.
    AdjacentParams,
    /// Attempted to register a pattern that reuses a placeholder name.
    DuplicateParam {
        /// The name that appears more than once.
        name: String,
    },
    /// A single pattern may declare at most 64 placeholders.
    TooManyParams,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "patterns must not be empty"),
            Self::UnnamedParam => write!(f, "placeholders must be registered with a name"),
            Self::InvalidCatchAll => write!(
                f,
                "catch-all parameters are only allowed at the end of a pattern"
            ),
            Self::AdjacentParams => write!(
                f,
                "placeholders must be separated by at least one literal byte"
            ),
            Self::DuplicateParam { name } => {
                write!(f, "placeholder name used more than once: {}", name)
            }
            Self::TooManyParams => write!(f, "patterns may declare at most 64 placeholders"),
        }
    }
}

impl std::error::Error for InsertError {}
