//! The solver's error surface is deliberately small: most arguments are
//! caller errors that fail fast rather than degrade silently. No error
//! variant exists for fitness-function failure — the user's function is
//! trusted and called directly.

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrString(Cow<'static, str>);

impl<T: Into<Cow<'static, str>>> From<T> for ErrString {
    fn from(v: T) -> Self {
        Self(v.into())
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Caller-supplied configuration cannot produce a valid search: an
    /// empty gene set, a non-positive chromosome length or chromosome
    /// count, or a `bestPossibleFitness` the configured comparator can
    /// never reach.
    InvalidConfiguration { message: ErrString },

    /// The initial pool could not be filled to at least one distinct entry
    /// after bounded retries — symptomatic of a pathological gene set (e.g.
    /// a single-symbol alphabet with `L` too small to admit any variety).
    InitialSeedingExhausted { message: ErrString },
}

impl SolverError {
    pub fn invalid_configuration(message: impl Into<ErrString>) -> Self {
        SolverError::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub fn seeding_exhausted(message: impl Into<ErrString>) -> Self {
        SolverError::InitialSeedingExhausted {
            message: message.into(),
        }
    }
}

impl Display for SolverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { message } => {
                write!(f, "invalid configuration: {message}")
            }
            Self::InitialSeedingExhausted { message } => {
                write!(f, "initial seeding exhausted: {message}")
            }
        }
    }
}

impl std::error::Error for SolverError {}
