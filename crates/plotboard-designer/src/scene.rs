//! The scene store: the ordered object collection and current selection.
//!
//! Mutation happens through commands (and the drag path); the store itself
//! only enforces the structural invariants: ids are unique, the selection
//! always references a live object, and paint order is the z-index-sorted
//! view with insertion order breaking ties.

use uuid::Uuid;

use crate::model::PlotObject;

/// Snapshot of the full scene state, used by the clear command.
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    pub(crate) objects: Vec<PlotObject>,
    pub(crate) selected_id: Option<Uuid>,
}

/// Ordered object collection plus selection.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<PlotObject>,
    selected_id: Option<Uuid>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true when the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PlotObject> {
        self.objects.iter()
    }

    /// Gets an object by id.
    pub fn get(&self, id: Uuid) -> Option<&PlotObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Gets a mutable object by id.
    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut PlotObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Checks whether an id is live.
    pub fn contains(&self, id: Uuid) -> bool {
        self.objects.iter().any(|o| o.id == id)
    }

    /// Appends an object. Ids must be unique; a duplicate is rejected.
    pub fn add(&mut self, object: PlotObject) {
        if self.contains(object.id) {
            tracing::warn!(id = %object.id, "duplicate object id rejected");
            return;
        }
        self.objects.push(object);
    }

    /// Inserts an object at a specific position in insertion order, used
    /// when undoing a delete so ordering is preserved exactly.
    pub fn insert_at(&mut self, index: usize, object: PlotObject) {
        if self.contains(object.id) {
            tracing::warn!(id = %object.id, "duplicate object id rejected");
            return;
        }
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
    }

    /// Removes an object by id, returning its position and the object.
    /// Clears the selection when it pointed at the removed object.
    pub fn remove(&mut self, id: Uuid) -> Option<(usize, PlotObject)> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        let object = self.objects.remove(index);
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        Some((index, object))
    }

    /// Objects in paint order: stable-sorted by z-index, so equal z keeps
    /// insertion order.
    pub fn paint_order(&self) -> Vec<&PlotObject> {
        let mut ordered: Vec<&PlotObject> = self.objects.iter().collect();
        ordered.sort_by_key(|o| o.z_index);
        ordered
    }

    /// Gets the selected object id, if any.
    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected_id
    }

    /// Sets the selection. Selecting a dead id clears the selection.
    pub fn set_selected(&mut self, id: Option<Uuid>) {
        match id {
            Some(id) if !self.contains(id) => {
                tracing::warn!(%id, "selection target is not live, clearing");
                self.selected_id = None;
            }
            other => self.selected_id = other,
        }
    }

    /// Captures the full scene state.
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            objects: self.objects.clone(),
            selected_id: self.selected_id,
        }
    }

    /// Replaces the scene state with a snapshot.
    pub fn restore(&mut self, snapshot: SceneSnapshot) {
        self.objects = snapshot.objects;
        self.selected_id = snapshot.selected_id;
    }

    /// Removes everything, returning the prior state for undo.
    pub fn clear(&mut self) -> SceneSnapshot {
        SceneSnapshot {
            objects: std::mem::take(&mut self.objects),
            selected_id: self.selected_id.take(),
        }
    }
}
