//! Object model: tile-type descriptors, dynamic objects and their store.
//!
//! Every grid cell and every object refers to one `ObjectType` from a single
//! static table. Objects are owned by a room's `ObjectStore`, which keeps
//! them dense and in draw order.
//!
//! # Invariants
//! - Exactly one descriptor exists per `TypeId`; descriptors never change.
//! - Removal is deferred: objects are tombstoned during a frame and only
//!   physically dropped by `ObjectStore::compact`.
//! - Compaction and depth sorting are stable.

mod object;
mod store;
mod types;

pub use object::{Animation, AnimationMode, Object, ObjectId, Removal};
pub use store::{Compaction, ObjectStore};
pub use types::{BehaviorId, Kind, ObjectType, TYPE_COUNT, TypeId, object_type};

pub fn crate_info() -> &'static str {
    "tileworld-objects v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("objects"));
    }
}
