use serde::Serialize;

use crate::object::{Object, ObjectId, Removal};

/// Counts reported by one compaction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Compaction {
    /// Objects that were pending free and have been dropped.
    pub freed: usize,
    /// Slots whose object had already moved elsewhere.
    pub dropped: usize,
}

impl Compaction {
    pub fn removed(&self) -> usize {
        self.freed + self.dropped
    }
}

/// Dense, growable collection of the objects owned by one room.
///
/// Iteration order is draw order. Removal is deferred: callers tombstone
/// objects during a frame, and `compact` reclaims the slots at a frame
/// boundary. Appending during iteration by index is safe.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects: Vec<Object>,
    next_id: u32,
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore {
    const INITIAL_CAPACITY: usize = 16;

    pub fn new() -> Self {
        Self {
            objects: Vec::with_capacity(Self::INITIAL_CAPACITY),
            next_id: 1,
        }
    }

    /// Append an object, assigning it a fresh id.
    pub fn push(&mut self, mut object: Object) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        object.id = id;
        self.objects.push(object);
        id
    }

    /// Append an object and hand it back for further customisation.
    pub fn push_mut(&mut self, object: Object) -> &mut Object {
        let index = self.objects.len();
        self.push(object);
        &mut self.objects[index]
    }

    /// Number of slots, including tombstoned objects not yet compacted.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of objects that are not tombstoned.
    pub fn alive_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_alive()).count()
    }

    pub fn get(&self, index: usize) -> Option<&Object> {
        self.objects.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Object> {
        self.objects.get_mut(index)
    }

    /// Current slot of the object with handle `id`.
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn by_id(&self, id: ObjectId) -> Option<&Object> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn by_id_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Object> {
        self.objects.iter_mut()
    }

    pub fn as_slice(&self) -> &[Object] {
        &self.objects
    }

    /// Drop tombstoned objects in one forward pass, shifting survivors left
    /// in their original relative order.
    pub fn compact(&mut self) -> Compaction {
        let mut stats = Compaction::default();
        self.objects.retain(|o| match o.removal {
            Removal::Alive => true,
            Removal::PendingFree => {
                stats.freed += 1;
                false
            }
            Removal::Freed => {
                stats.dropped += 1;
                false
            }
        });
        if stats.removed() > 0 {
            tracing::debug!(
                freed = stats.freed,
                dropped = stats.dropped,
                remaining = self.objects.len(),
                "object store compacted"
            );
        }
        stats
    }

    /// Order by type id, highest first. Stable for equal ids.
    pub fn sort_by_depth(&mut self) {
        self.objects.sort_by(|a, b| b.ty.id.cmp(&a.ty.id));
    }
}

impl<'a> IntoIterator for &'a ObjectStore {
    type Item = &'a Object;
    type IntoIter = std::slice::Iter<'a, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeId;

    fn store_of(types: &[TypeId]) -> ObjectStore {
        let mut store = ObjectStore::new();
        for t in types {
            store.push(Object::new(*t));
        }
        store
    }

    #[test]
    fn push_assigns_increasing_ids() {
        let mut store = ObjectStore::new();
        let a = store.push(Object::new(TypeId::Coin));
        let b = store.push(Object::new(TypeId::Coin));
        assert!(b > a);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn growth_past_initial_capacity() {
        let mut store = ObjectStore::new();
        for _ in 0..100 {
            store.push(Object::new(TypeId::Rat));
        }
        assert_eq!(store.len(), 100);
        assert_eq!(store.alive_count(), 100);
    }

    #[test]
    fn compaction_keeps_survivors_in_order() {
        let mut store = store_of(&[TypeId::Coin, TypeId::Rat, TypeId::Key, TypeId::Bat, TypeId::Gem]);
        let ids: Vec<ObjectId> = store.iter().map(|o| o.id).collect();
        store.get_mut(1).unwrap().removal = Removal::PendingFree;
        store.get_mut(3).unwrap().removal = Removal::Freed;

        let stats = store.compact();

        assert_eq!(stats, Compaction { freed: 1, dropped: 1 });
        assert_eq!(store.len(), 3);
        let survivors: Vec<ObjectId> = store.iter().map(|o| o.id).collect();
        assert_eq!(survivors, vec![ids[0], ids[2], ids[4]]);
        let types: Vec<TypeId> = store.iter().map(|o| o.type_id()).collect();
        assert_eq!(types, vec![TypeId::Coin, TypeId::Key, TypeId::Gem]);
    }

    #[test]
    fn compaction_of_clean_store_is_noop() {
        let mut store = store_of(&[TypeId::Coin, TypeId::Key]);
        assert_eq!(store.compact().removed(), 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn ids_survive_compaction() {
        let mut store = store_of(&[TypeId::Coin, TypeId::Key, TypeId::Gem]);
        let gem = store.get(2).unwrap().id;
        store.get_mut(0).unwrap().remove();
        store.compact();
        assert_eq!(store.index_of(gem), Some(1));
        assert_eq!(store.by_id(gem).unwrap().type_id(), TypeId::Gem);
    }

    #[test]
    fn depth_sort_is_descending_and_stable() {
        let mut store = store_of(&[TypeId::Coin, TypeId::Rat, TypeId::Coin, TypeId::Heart]);
        let first_coin = store.get(0).unwrap().id;
        let second_coin = store.get(2).unwrap().id;

        store.sort_by_depth();

        let types: Vec<TypeId> = store.iter().map(|o| o.type_id()).collect();
        assert_eq!(types, vec![TypeId::Heart, TypeId::Coin, TypeId::Coin, TypeId::Rat]);
        assert_eq!(store.get(1).unwrap().id, first_coin);
        assert_eq!(store.get(2).unwrap().id, second_coin);
    }
}
