//! Bidirectional mapping between the XML document tree and typed records

pub mod decode;
pub mod encode;

pub use decode::Decoder;
pub use encode::Encoder;

use std::fmt;

/// Validation strictness for the decode direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Unknown elements and attributes fail with a schema violation
    #[default]
    Strict,
    /// Unknown elements and attributes are skipped and reported as warnings.
    /// Type and cardinality failures still fail.
    Lenient,
}

/// Configuration for the decoder
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
}

impl Config {
    pub const fn lenient() -> Self {
        Self {
            mode: Mode::Lenient,
        }
    }
}

/// A schema deviation collected in lenient mode
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    /// Path of the offending element or attribute
    pub path: String,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
