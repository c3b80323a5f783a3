use crate::utils::error::GhostError;

/// Outcome of a content operation.
///
/// Callers that only render can use [`Fetch::into_value`] and treat an empty
/// value as an empty state; diagnostics can still tell a real "not found"
/// from a CMS outage through [`Fetch::cause`].
#[derive(Debug)]
pub enum Fetch<T> {
    /// The CMS answered and the response decoded.
    Fetched(T),
    /// The request failed; `value` is the safe default.
    Fallback { value: T, cause: GhostError },
}

impl<T> Fetch<T> {
    pub fn value(&self) -> &T {
        match self {
            Fetch::Fetched(value) | Fetch::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Fetch::Fetched(value) | Fetch::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Fetch::Fallback { .. })
    }

    pub fn cause(&self) -> Option<&GhostError> {
        match self {
            Fetch::Fetched(_) => None,
            Fetch::Fallback { cause, .. } => Some(cause),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Fetch<U> {
        match self {
            Fetch::Fetched(value) => Fetch::Fetched(f(value)),
            Fetch::Fallback { value, cause } => Fetch::Fallback {
                value: f(value),
                cause,
            },
        }
    }
}

impl<T: Default> Fetch<T> {
    pub fn fallback(cause: GhostError) -> Self {
        Fetch::Fallback {
            value: T::default(),
            cause,
        }
    }
}
