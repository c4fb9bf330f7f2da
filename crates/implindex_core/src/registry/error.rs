//! Registry protocol errors.

use crate::model::fragment::FragmentError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors surfaced synchronously by `submit` and `attach`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Fragment failed validation; it was neither queued nor forwarded.
    MalformedFragment(FragmentError),
    /// A consumer is already attached; the original one is unaffected.
    DuplicateAttachment,
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedFragment(err) => write!(f, "malformed fragment: {err}"),
            Self::DuplicateAttachment => {
                write!(f, "a fragment consumer is already attached to this registry")
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedFragment(err) => Some(err),
            Self::DuplicateAttachment => None,
        }
    }
}

impl From<FragmentError> for RegistryError {
    fn from(value: FragmentError) -> Self {
        Self::MalformedFragment(value)
    }
}
