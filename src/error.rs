//! Level load errors
//!
//! Every variant is fatal for the level being built: construction aborts and
//! no partial state is kept.

use std::fmt;

/// Error type for level loading and validation
#[derive(Debug)]
pub enum LevelError {
    /// No start point was declared
    MissingStart,
    /// No exit was declared
    MissingExit,
    /// A location did not have the `x - y` shape
    MalformedLocation(String),
    /// A location fell outside the declared grid
    OutOfBounds { x: i32, y: i32 },
    /// Grid narrower or shorter than the allowed minimum
    GridTooSmall { width: usize, height: usize },
    UnknownTile(String),
    UnknownEnemy(String),
    UnknownTrap(String),
    UnknownItem(String),
    /// An entity was placed inside an impassable tile
    Unreachable { what: &'static str, x: i32, y: i32 },
    /// An exit was placed where a visible tile already is
    ExitOnTile { x: i32, y: i32 },
    /// A record lacked an attribute its kind requires
    MissingAttribute { record: &'static str, attribute: &'static str },
    /// A heal amount was neither an integer nor an `<int>%` percentage
    InvalidHealAmount(String),
    /// Time budget that is negative or not a number
    InvalidTime(f64),
    /// Weighted choices with no positive total weight
    InvalidWeights(&'static str),
    /// A text layout contained a character with no meaning
    UnknownLayoutChar { ch: char, x: usize, y: usize },
    /// A text layout line differs in length from the first grid line
    RaggedLayout { line: usize },
    /// A level source has no level by this identifier
    UnknownLevel(String),
    /// Reading a descriptor from disk failed
    Io(std::io::Error),
    /// Descriptor JSON failed to parse
    Parse(serde_json::Error),
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Parse(e)
    }
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::Io(e)
    }
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::MissingStart => write!(f, "a level must have a starting point"),
            LevelError::MissingExit => write!(f, "a level must have an exit"),
            LevelError::MalformedLocation(s) => {
                write!(f, "location '{}' must be formatted as '# - #'", s)
            }
            LevelError::OutOfBounds { x, y } => {
                write!(f, "location {} - {} lies outside the grid", x, y)
            }
            LevelError::GridTooSmall { width, height } => write!(
                f,
                "grid {}x{} is smaller than the minimum {}x{}",
                width,
                height,
                crate::consts::MIN_LEVEL_WIDTH,
                crate::consts::MIN_LEVEL_HEIGHT
            ),
            LevelError::UnknownTile(name) => write!(f, "tile type '{}' doesn't exist", name),
            LevelError::UnknownEnemy(name) => write!(f, "enemy type '{}' doesn't exist", name),
            LevelError::UnknownTrap(name) => write!(f, "trap type '{}' is not supported", name),
            LevelError::UnknownItem(name) => write!(f, "item type '{}' doesn't exist", name),
            LevelError::Unreachable { what, x, y } => write!(
                f,
                "{} at location '{} - {}' cannot be reached by the player",
                what, x, y
            ),
            LevelError::ExitOnTile { x, y } => {
                write!(f, "an exit cannot exist where a tile already is ({} - {})", x, y)
            }
            LevelError::MissingAttribute { record, attribute } => {
                write!(f, "each {} must contain an attribute '{}'", record, attribute)
            }
            LevelError::InvalidHealAmount(s) => {
                write!(f, "heal amount '{}' is neither an integer nor a percentage", s)
            }
            LevelError::InvalidTime(secs) => {
                write!(f, "time budget of {} seconds is not a valid duration", secs)
            }
            LevelError::InvalidWeights(what) => {
                write!(f, "{} weights must sum to a positive value", what)
            }
            LevelError::UnknownLayoutChar { ch, x, y } => write!(
                f,
                "unsupported tile type character '{}' at position {}, {}",
                ch, x, y
            ),
            LevelError::RaggedLayout { line } => write!(
                f,
                "the length of line {} is different from all preceding lines",
                line
            ),
            LevelError::UnknownLevel(id) => write!(f, "level '{}' doesn't exist", id),
            LevelError::Io(e) => write!(f, "descriptor read error: {}", e),
            LevelError::Parse(e) => write!(f, "descriptor parse error: {}", e),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Parse(e) => Some(e),
            LevelError::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offending_value() {
        let err = LevelError::UnknownTrap("spinning".to_string());
        assert_eq!(err.to_string(), "trap type 'spinning' is not supported");

        let err = LevelError::GridTooSmall { width: 10, height: 15 };
        assert!(err.to_string().contains("10x15"));
    }

    #[test]
    fn test_json_errors_convert_and_chain() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: LevelError = json_err.into();
        assert!(matches!(err, LevelError::Parse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
