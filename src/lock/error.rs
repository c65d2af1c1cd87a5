use std::fmt;

/// Why a collection lock could not be taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    /// A thread panicked while holding the named lock.
    Poisoned(&'static str),
    /// The calling thread already holds this collection's lock.
    Reentrant(&'static str),
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::Poisoned(name) => write!(f, "{} lock poisoned", name),
            LockError::Reentrant(name) => {
                write!(f, "{} is already locked by the calling thread", name)
            }
        }
    }
}

impl std::error::Error for LockError {}
