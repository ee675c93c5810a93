//! Ordered object storage with deferred mutation
//!
//! Objects live in a slot map keyed by [`ObjectKey`]. Insertion order is kept
//! separately and is the default dispatch order; the draw pass re-sorts by
//! `z_index` and the update pass by `update_priority`, both stable. The
//! per-pass orders only change when [`ObjectCollection::refresh_order`] runs
//! or the membership changes outside a pass.
//!
//! Mutations requested while a pass is running go through the pending queue
//! and land on [`ObjectCollection::flush_pending`].

use std::collections::HashMap;

use slotmap::SlotMap;

use super::{
    Capabilities, Capability, CapabilityDispatchError, CollectionError, DuplicateObjectError,
    FailurePolicy, GameObject, ObjectCommand, ObjectError, ObjectId, PassReport,
};

slotmap::new_key_type! {
    /// Stable handle of an object slot
    pub struct ObjectKey;
}

/// An object waiting to be inserted, with an optional fixed identity
pub struct Spawn {
    id: Option<ObjectId>,
    object: Box<dyn GameObject>,
}

impl Spawn {
    /// Spawn with a fixed identity
    pub fn named(id: impl Into<ObjectId>, object: impl GameObject) -> Self {
        Self::boxed(Some(id.into()), Box::new(object))
    }

    /// Spawn with an identity generated by the collection
    pub fn anonymous(object: impl GameObject) -> Self {
        Self::boxed(None, Box::new(object))
    }

    /// Spawn an already boxed object
    pub fn boxed(id: Option<ObjectId>, object: Box<dyn GameObject>) -> Self {
        Self { id, object }
    }

    /// Requested identity, if any
    pub fn id(&self) -> Option<&ObjectId> {
        self.id.as_ref()
    }
}

impl std::fmt::Debug for Spawn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spawn")
            .field("id", &self.id)
            .field("type", &self.object.type_name())
            .finish()
    }
}

struct Slot {
    id: ObjectId,
    capabilities: Capabilities,
    object: Box<dyn GameObject>,
}

/// Result of applying the pending queue
#[derive(Debug, Default)]
pub struct FlushReport {
    /// Identities inserted
    pub added: Vec<ObjectId>,
    /// Identities removed
    pub removed: Vec<ObjectId>,
    /// Insertions that were refused
    pub rejected: Vec<CollectionError>,
}

impl FlushReport {
    /// Whether the flush changed nothing and refused nothing
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.rejected.is_empty()
    }
}

/// Live objects owned by one scene
#[derive(Default)]
pub struct ObjectCollection {
    slots: SlotMap<ObjectKey, Slot>,
    index: HashMap<ObjectId, ObjectKey>,
    order: Vec<ObjectKey>,
    draw_order: Vec<ObjectKey>,
    update_order: Vec<ObjectKey>,
    event_order: Vec<ObjectKey>,
    pending: Vec<ObjectCommand>,
    next_anonymous: u64,
}

impl std::fmt::Debug for ObjectCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectCollection")
            .field("ids", &self.ids().collect::<Vec<_>>())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl ObjectCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert immediately with a fixed identity
    pub fn add(&mut self, id: impl Into<ObjectId>, object: impl GameObject) -> Result<(), CollectionError> {
        self.insert(Spawn::named(id, object)).map(|_| ())
    }

    /// Insert immediately and return the assigned identity
    pub fn insert(&mut self, spawn: Spawn) -> Result<ObjectId, CollectionError> {
        let id = self.insert_slot(spawn)?;
        self.refresh_order();
        Ok(id)
    }

    /// Insert everything from `spawns`, stopping at the first refusal
    pub fn extend(&mut self, spawns: impl IntoIterator<Item = Spawn>) -> Result<usize, CollectionError> {
        let mut count = 0;
        let result = spawns.into_iter().try_for_each(|spawn| {
            self.insert_slot(spawn)?;
            count += 1;
            Ok(())
        });
        self.refresh_order();
        result.map(|()| count)
    }

    /// Remove immediately. Unknown identities are ignored.
    pub fn remove(&mut self, id: &ObjectId) -> Option<Box<dyn GameObject>> {
        let key = self.index.remove(id)?;
        self.order.retain(|k| *k != key);
        self.draw_order.retain(|k| *k != key);
        self.update_order.retain(|k| *k != key);
        self.event_order.retain(|k| *k != key);
        self.slots.remove(key).map(|slot| slot.object)
    }

    /// Queue an insertion for the next flush
    pub fn defer_add(&mut self, spawn: Spawn) {
        self.pending.push(ObjectCommand::Spawn(spawn));
    }

    /// Queue a removal for the next flush
    pub fn defer_remove(&mut self, id: impl Into<ObjectId>) {
        self.pending.push(ObjectCommand::Despawn(id.into()));
    }

    /// Queue commands collected from callbacks
    pub fn defer_commands(&mut self, commands: impl IntoIterator<Item = ObjectCommand>) {
        self.pending.extend(commands);
    }

    /// Number of queued changes
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Apply queued changes in the order they were requested
    pub fn flush_pending(&mut self) -> FlushReport {
        let mut report = FlushReport::default();
        if self.pending.is_empty() {
            return report;
        }
        for command in std::mem::take(&mut self.pending) {
            match command {
                ObjectCommand::Spawn(spawn) => match self.insert_slot(spawn) {
                    Ok(id) => report.added.push(id),
                    Err(err) => {
                        log::warn!("Deferred insert refused: {}", err);
                        report.rejected.push(err);
                    }
                },
                ObjectCommand::Despawn(id) => {
                    if self.remove(&id).is_some() {
                        report.removed.push(id);
                    }
                }
            }
        }
        self.refresh_order();
        report
    }

    /// Whether `id` is live
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.index.contains_key(id)
    }

    /// Borrow a live object
    pub fn get(&self, id: &ObjectId) -> Option<&dyn GameObject> {
        let key = self.index.get(id)?;
        self.slots.get(*key).map(|slot| slot.object.as_ref())
    }

    /// Mutably borrow a live object
    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut dyn GameObject> {
        let key = self.index.get(id)?;
        self.slots.get_mut(*key).map(|slot| slot.object.as_mut())
    }

    /// Cached capability set of a live object
    pub fn capabilities_of(&self, id: &ObjectId) -> Option<Capabilities> {
        let key = self.index.get(id)?;
        self.slots.get(*key).map(|slot| slot.capabilities)
    }

    /// Identities in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> + '_ {
        self.order.iter().filter_map(|key| self.slots.get(*key)).map(|slot| &slot.id)
    }

    /// Every object in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &dyn GameObject)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.slots.get(*key))
            .map(|slot| (&slot.id, slot.object.as_ref()))
    }

    /// Objects holding `capability`, lazily, in that pass's dispatch order
    pub fn iter_for(&self, capability: Capability) -> impl Iterator<Item = (&ObjectId, &dyn GameObject)> + '_ {
        self.pass_order(capability)
            .iter()
            .filter_map(|key| self.slots.get(*key))
            .map(|slot| (&slot.id, slot.object.as_ref()))
    }

    /// Number of objects holding `capability`
    pub fn count_for(&self, capability: Capability) -> usize {
        self.pass_order(capability).len()
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no objects are live
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every object and every queued change
    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.order.clear();
        self.draw_order.clear();
        self.update_order.clear();
        self.event_order.clear();
        self.pending.clear();
    }

    /// Re-read `z_index` and `update_priority` and rebuild the pass orders
    pub fn refresh_order(&mut self) {
        let mut draw = Vec::new();
        let mut update = Vec::new();
        self.event_order.clear();

        for &key in &self.order {
            let Some(slot) = self.slots.get_mut(key) else {
                continue;
            };
            if slot.capabilities.contains(Capabilities::DRAWABLE) {
                let z = slot.object.as_drawable().map_or(0, |d| d.z_index());
                draw.push((z, key));
            }
            if slot.capabilities.contains(Capabilities::LOGICAL) {
                let priority = slot.object.as_logical().map_or(0, |l| l.update_priority());
                update.push((priority, key));
            }
            if slot.capabilities.contains(Capabilities::EVENTFUL) {
                self.event_order.push(key);
            }
        }

        // sort_by_key is stable: equal keys keep insertion order
        draw.sort_by_key(|(z, _)| *z);
        update.sort_by_key(|(priority, _)| *priority);
        self.draw_order = draw.into_iter().map(|(_, key)| key).collect();
        self.update_order = update.into_iter().map(|(_, key)| key).collect();
    }

    /// Run `call` over every object holding `capability`, in pass order
    ///
    /// `call` returns `Ok(true)` when it invoked the callback and `Ok(false)`
    /// when the object opted out (disabled or filtered). Membership is frozen
    /// for the duration of the pass.
    pub fn dispatch<F>(
        &mut self,
        capability: Capability,
        policy: FailurePolicy,
        mut call: F,
    ) -> Result<PassReport, CapabilityDispatchError>
    where
        F: FnMut(&ObjectId, &mut dyn GameObject) -> Result<bool, ObjectError>,
    {
        let mut report = PassReport::new(capability);
        let order = match capability {
            Capability::Drawable => &self.draw_order,
            Capability::Logical => &self.update_order,
            Capability::Eventful => &self.event_order,
        };
        for &key in order {
            let Some(slot) = self.slots.get_mut(key) else {
                continue;
            };
            match call(&slot.id, slot.object.as_mut()) {
                Ok(true) => report.calls += 1,
                Ok(false) => {}
                Err(source) => {
                    let error = CapabilityDispatchError {
                        object: slot.id.clone(),
                        capability,
                        source,
                    };
                    match policy {
                        FailurePolicy::FailFast => return Err(error),
                        FailurePolicy::Continue => report.record(error),
                    }
                }
            }
        }
        Ok(report)
    }

    fn pass_order(&self, capability: Capability) -> &[ObjectKey] {
        match capability {
            Capability::Drawable => &self.draw_order,
            Capability::Logical => &self.update_order,
            Capability::Eventful => &self.event_order,
        }
    }

    fn insert_slot(&mut self, spawn: Spawn) -> Result<ObjectId, CollectionError> {
        let Spawn { id, mut object } = spawn;
        let id = match id {
            Some(id) => id,
            None => self.next_anonymous_id(),
        };
        if self.index.contains_key(&id) {
            return Err(DuplicateObjectError { id }.into());
        }
        let capabilities = Capabilities::probe(object.as_mut());
        if capabilities.is_empty() {
            return Err(CollectionError::NoCapabilities(id));
        }

        log::trace!("Inserting {} ({}) with {:?}", id, object.type_name(), capabilities);
        let key = self.slots.insert(Slot {
            id: id.clone(),
            capabilities,
            object,
        });
        self.index.insert(id.clone(), key);
        self.order.push(key);
        Ok(id)
    }

    fn next_anonymous_id(&mut self) -> ObjectId {
        loop {
            let id = ObjectId::anonymous(self.next_anonymous);
            self.next_anonymous += 1;
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }
}
