use crate::parser::Span;
use std::{error, fmt};

pub type Result<T> = std::result::Result<T, SchemeError>;

/// A fatal translation error. The language has no exception handling, so
/// every variant unwinds the whole `main` invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum SchemeError {
    Syntax {
        message: String,
        span: Option<Span>,
    },
    UnboundName {
        name: String,
        span: Option<Span>,
    },
    ArityMismatch {
        name: String,
        expected: usize,
        given: usize,
    },
    RowLengthMismatch {
        domains: usize,
        annotations: usize,
    },
    Pairing {
        message: String,
    },
    MisalignedBreak,
    LengthMismatch {
        builtin: &'static str,
        expected: usize,
        found: usize,
    },
    EmptyList {
        builtin: &'static str,
    },
    Index {
        index: i64,
        len: usize,
    },
    UnmatchedBranch {
        span: Option<Span>,
    },
    Recursion {
        name: String,
    },
    PatternMismatch {
        message: String,
    },
    Type {
        message: String,
    },
    UnknownAttribute {
        name: String,
        span: Option<Span>,
    },
    Abort {
        message: String,
    },
}

impl SchemeError {
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Syntax { span, .. }
            | Self::UnboundName { span, .. }
            | Self::UnmatchedBranch { span }
            | Self::UnknownAttribute { span, .. } => span.clone(),
            _ => None,
        }
    }
}

impl fmt::Display for SchemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { message, .. } => write!(f, "syntax error: {}", message),
            Self::UnboundName { name, .. } => {
                write!(f, "cannot find a binding for `{}'", name)
            }
            Self::ArityMismatch {
                name,
                expected,
                given,
            } => write!(
                f,
                "`{}' requires {} argument(s) but got {}",
                name, expected, given
            ),
            Self::RowLengthMismatch {
                domains,
                annotations,
            } => write!(
                f,
                "domain row has {} token(s) but annotation row has {}",
                domains, annotations
            ),
            Self::Pairing { message } => write!(f, "pairing error: {}", message),
            Self::MisalignedBreak => {
                write!(f, "strand break tokens must align in both rows")
            }
            Self::LengthMismatch {
                builtin,
                expected,
                found,
            } => write!(
                f,
                "`{}' requires lists of length {} but got {}",
                builtin, expected, found
            ),
            Self::EmptyList { builtin } => {
                write!(f, "`{}' got an empty list", builtin)
            }
            Self::Index { index, len } => write!(
                f,
                "index {} out of range for a list of length {}",
                index, len
            ),
            Self::UnmatchedBranch { .. } => {
                write!(f, "no conditional branch matched and no `else' is present")
            }
            Self::Recursion { name } => write!(
                f,
                "cyclic `where' bindings while evaluating `{}'",
                name
            ),
            Self::PatternMismatch { message } => {
                write!(f, "pattern matching failed: {}", message)
            }
            Self::Type { message } => write!(f, "{}", message),
            Self::UnknownAttribute { name, .. } => {
                write!(f, "the attribute `{}' could not be found", name)
            }
            Self::Abort { message } => write!(f, "abort: {}", message),
        }
    }
}

impl error::Error for SchemeError {}
