//! Error types for component storage and the simulation driver.

use crate::entity::EntityId;

/// The kind of access that was refused by a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Shared (read-only) access.
    Read,
    /// Exclusive (mutable) access.
    Write,
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}

/// Errors raised by the storage engine and the simulation driver.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The entity has no live slot in the pool of this component type.
    ///
    /// Recoverable: callers are expected to test `has` first or handle it
    /// locally. The pool cannot tell a removed entity from one that never
    /// had the component.
    #[error("{entity} has no '{component}' component")]
    NoComponent {
        /// The entity that was looked up.
        entity: EntityId,
        /// The component type name.
        component: &'static str,
    },

    /// Compaction tried to reclaim a slot that is not marked empty.
    ///
    /// This is an internal invariant violation of the pool, never a user
    /// error. It aborts the run.
    #[error("invalid compaction of '{component}' pool: slot {slot} is not empty")]
    InvalidCompaction {
        /// The component type name.
        component: &'static str,
        /// The dense slot that was wrongly reclaimed.
        slot: usize,
    },

    /// The pool storage is already borrowed in a conflicting way, e.g. a
    /// mutable view pass over the same component type is still open.
    #[error("'{component}' pool is already borrowed; {access} access refused")]
    BorrowConflict {
        /// The component type name.
        component: &'static str,
        /// The access that was refused.
        access: Access,
    },

    /// The directory has no free slot left for another component type.
    #[error("directory is full: at most {capacity} component types per simulation")]
    TooManyComponentTypes {
        /// The configured number of component type slots.
        capacity: usize,
    },

    /// Every entity ID has been issued; IDs are never recycled.
    #[error("entity id space exhausted")]
    EntityIdsExhausted,

    /// `run` was called on a simulation that already finished.
    #[error("simulation already finished")]
    AlreadyFinished,

    /// A configuration override could not be parsed.
    #[error("invalid configuration value for {key}: '{value}'")]
    InvalidConfig {
        /// The configuration key (environment variable name).
        key: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },
}

/// Convenience alias used across the storage engine.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_component_message() {
        let err = SimError::NoComponent {
            entity: EntityId::from_raw(3),
            component: "Position",
        };
        assert_eq!(err.to_string(), "Entity(3) has no 'Position' component");
    }

    #[test]
    fn test_borrow_conflict_message() {
        let err = SimError::BorrowConflict {
            component: "Velocity",
            access: Access::Write,
        };
        assert_eq!(
            err.to_string(),
            "'Velocity' pool is already borrowed; write access refused"
        );
    }

    #[test]
    fn test_converts_into_anyhow_and_back() {
        let err: anyhow::Error = SimError::AlreadyFinished.into();
        assert!(matches!(
            err.downcast_ref::<SimError>(),
            Some(SimError::AlreadyFinished)
        ));
    }
}
