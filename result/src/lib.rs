#[macro_use]
extern crate paste;

use serde_json::Error as SerdeJsonError;

#[derive(Debug)]
pub enum Error {
    DuplicateDirectedEdge,
    DuplicateShape(String),
    EdgeInUse,
    EmptyAtlas(String),
    InvalidColorPattern(String),
    InvalidShape(String),
    InvalidSourcePoint(String),
    MalformedComponent(String),
    PlaceholderColors,
    SerdeJson(SerdeJsonError),
    SigmaExhausted(usize),
    UnknownShape(String),
    UnknownTile,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::DuplicateDirectedEdge => write!(f, "Directed edge already present in rings."),
            Error::DuplicateShape(name) => write!(f, "Duplicate shape: {}.", name),
            Error::EdgeInUse => write!(f, "Edge already in use."),
            Error::EmptyAtlas(name) => write!(f, "Atlas {} has no vertex patterns.", name),
            Error::InvalidColorPattern(msg) => write!(f, "Invalid color pattern: {}.", msg),
            Error::InvalidShape(msg) => write!(f, "Invalid shape: {}.", msg),
            Error::InvalidSourcePoint(msg) => write!(f, "Invalid source point: {}.", msg),
            Error::MalformedComponent(component) => write!(f, "Malformed vertex component: {}.", component),
            Error::PlaceholderColors => write!(f, "Placeholders cannot be colored."),
            Error::SerdeJson(err) => write!(f, "{}", err),
            Error::SigmaExhausted(attempts) => write!(f, "No generic pentagrid shifts found after {} attempts.", attempts),
            Error::UnknownShape(name) => write!(f, "Unknown shape: {}.", name),
            Error::UnknownTile => write!(f, "Unknown tile."),
        }
    }
}

impl std::error::Error for Error {}

#[macro_export]
macro_rules! error_type {
    ($($name:ident),*) => {
        paste! {
            $(
                impl From<[<$name Error>]> for Error {
                    fn from(err: [<$name Error>]) -> Error {
                        Error::$name(err)
                    }
                }
            )*
        }
    }
}

error_type!{
    SerdeJson
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_json() {
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: Error = parsed.unwrap_err().into();
        assert!(matches!(err, Error::SerdeJson(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!("Unknown shape: Q.", format!("{}", Error::UnknownShape(String::from("Q"))));
        assert_eq!("Edge already in use.", format!("{}", Error::EdgeInUse));
    }
}
