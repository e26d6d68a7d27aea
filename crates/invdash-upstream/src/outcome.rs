//! Three-way result type returned at every service boundary.
//!
//! A dashboard needs to tell "the catalog is really empty" apart from "the
//! upstream API is down" and from "the payload had a shape we do not know".
//! [`Fetched`] keeps those paths distinct; callers that only want the old
//! "show nothing" behaviour can collapse it with
//! [`Fetched::into_data_or_default`].

use crate::error::UpstreamError;

/// Why an operation produced no data without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// No base URL or token; no request was made.
    NotConfigured,
    /// The payload had a recognized container holding zero records.
    NoRecords,
    /// The payload matched none of the known container shapes.
    UnrecognizedShape,
}

#[derive(Debug)]
pub enum Fetched<T> {
    Data(T),
    /// A multi-request operation failed part way; `data` holds what was
    /// gathered before `error`.
    Partial { data: T, error: UpstreamError },
    Empty(EmptyReason),
    Failed(UpstreamError),
}

impl<T> Fetched<T> {
    /// Borrow the payload of `Data` or `Partial`.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) | Self::Partial { data, .. } => Some(data),
            Self::Empty(_) | Self::Failed(_) => None,
        }
    }

    /// The upstream error carried by `Partial` or `Failed`.
    #[must_use]
    pub fn error(&self) -> Option<&UpstreamError> {
        match self {
            Self::Partial { error, .. } | Self::Failed(error) => Some(error),
            Self::Data(_) | Self::Empty(_) => None,
        }
    }

    /// `true` for `Partial` and `Failed`.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.error().is_some()
    }

    #[must_use]
    pub fn map<U, F>(self, f: F) -> Fetched<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Data(data) => Fetched::Data(f(data)),
            Self::Partial { data, error } => Fetched::Partial {
                data: f(data),
                error,
            },
            Self::Empty(reason) => Fetched::Empty(reason),
            Self::Failed(error) => Fetched::Failed(error),
        }
    }
}

impl<T: Default> Fetched<T> {
    /// Collapse every non-data outcome into `T::default()`.
    #[must_use]
    pub fn into_data_or_default(self) -> T {
        match self {
            Self::Data(data) | Self::Partial { data, .. } => data,
            Self::Empty(_) | Self::Failed(_) => T::default(),
        }
    }
}
