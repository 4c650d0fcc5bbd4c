use std::fmt;

/// Which collection an id-based lookup missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Todo,
    Habit,
    Notification,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Todo => write!(f, "todo"),
            EntityKind::Habit => write!(f, "habit"),
            EntityKind::Notification => write!(f, "notification"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    LockPoisoned(&'static str),
    NotFound { kind: EntityKind, id: String },
    InvalidInput(String),
}

impl StoreError {
    pub(crate) fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::NotFound { kind, id } => {
                write!(f, "{} {} not found", kind, id)
            }
            StoreError::InvalidInput(message) => write!(f, "invalid input: {}", message),
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = StoreError::not_found(EntityKind::Todo, "abc");
        assert_eq!(err.to_string(), "todo abc not found");

        let err = StoreError::LockPoisoned("commit");
        assert_eq!(err.to_string(), "store lock poisoned during commit");

        let err = StoreError::InvalidInput("title must not be blank".to_string());
        assert_eq!(err.to_string(), "invalid input: title must not be blank");
    }
}
