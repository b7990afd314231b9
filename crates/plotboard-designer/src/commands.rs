//! Reversible scene mutations and the bounded undo/redo history.
//!
//! Every user action becomes a [`SceneCommand`] that knows how to apply and
//! undo itself against the scene. Commands shuttle removed objects between
//! themselves and the store, so undoing a delete restores the exact object
//! at its exact position. A command whose target has gone missing is a
//! no-op, never a panic; history traversal cannot corrupt the scene.

use uuid::Uuid;

use plotboard_core::constants::HISTORY_LIMIT;

use crate::model::{MoveCoords, PlotObject, PlotShape, PropertyValue};
use crate::scene::{Scene, SceneSnapshot};

/// A reversible mutation of the scene.
#[derive(Debug, Clone)]
pub enum SceneCommand {
    Add(AddObject),
    Delete(DeleteObject),
    Modify(ModifyProperty),
    Move(MoveObject),
    Clear(ClearScene),
}

/// Inserts an object at the end of the scene; undo removes it by id.
#[derive(Debug, Clone)]
pub struct AddObject {
    pub id: Uuid,
    label: String,
    /// Holds the object while it is off the scene.
    object: Option<PlotObject>,
}

impl AddObject {
    pub fn new(object: PlotObject) -> Self {
        Self {
            id: object.id,
            label: object.name.clone(),
            object: Some(object),
        }
    }
}

/// Removes an object; undo re-inserts it at the recorded index so
/// insertion order survives, and restores the selection it had.
#[derive(Debug, Clone)]
pub struct DeleteObject {
    pub id: Uuid,
    label: String,
    index: Option<usize>,
    object: Option<PlotObject>,
    was_selected: bool,
}

impl DeleteObject {
    pub fn new(id: Uuid, label: String) -> Self {
        Self {
            id,
            label,
            index: None,
            object: None,
            was_selected: false,
        }
    }
}

/// Sets a single property; undo restores the prior value. Callers skip
/// creating the command when old and new are equal.
#[derive(Debug, Clone)]
pub struct ModifyProperty {
    pub id: Uuid,
    pub name: String,
    pub old: PropertyValue,
    pub new: PropertyValue,
}

/// Repositions an object using absolute before/after coordinate bundles.
#[derive(Debug, Clone)]
pub struct MoveObject {
    pub id: Uuid,
    label: String,
    pub from: MoveCoords,
    pub to: MoveCoords,
}

impl MoveObject {
    pub fn new(id: Uuid, label: String, from: MoveCoords, to: MoveCoords) -> Self {
        Self {
            id,
            label,
            from,
            to,
        }
    }
}

/// Empties the scene; undo restores the full snapshot, selection included.
#[derive(Debug, Clone, Default)]
pub struct ClearScene {
    snapshot: Option<SceneSnapshot>,
}

impl ClearScene {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneCommand {
    /// Applies the forward effect.
    pub fn apply(&mut self, scene: &mut Scene) {
        match self {
            SceneCommand::Add(cmd) => match cmd.object.take() {
                Some(obj) => scene.add(obj),
                None => tracing::warn!(id = %cmd.id, "add command has no object to insert"),
            },
            SceneCommand::Delete(cmd) => {
                cmd.was_selected = scene.selected_id() == Some(cmd.id);
                match scene.remove(cmd.id) {
                    Some((index, obj)) => {
                        cmd.index = Some(index);
                        cmd.object = Some(obj);
                    }
                    None => tracing::warn!(id = %cmd.id, "delete target not found"),
                }
            }
            SceneCommand::Modify(cmd) => match scene.get_mut(cmd.id) {
                Some(obj) => {
                    obj.shape.set_property(&cmd.name, &cmd.new);
                }
                None => tracing::warn!(id = %cmd.id, "modify target not found"),
            },
            SceneCommand::Move(cmd) => match scene.get_mut(cmd.id) {
                Some(obj) => obj.shape.set_anchor_coords(cmd.to),
                None => tracing::warn!(id = %cmd.id, "move target not found"),
            },
            SceneCommand::Clear(cmd) => {
                cmd.snapshot = Some(scene.clear());
            }
        }
    }

    /// Applies the inverse effect.
    pub fn undo(&mut self, scene: &mut Scene) {
        match self {
            SceneCommand::Add(cmd) => match scene.remove(cmd.id) {
                Some((_, obj)) => cmd.object = Some(obj),
                None => tracing::warn!(id = %cmd.id, "undo-add target not found"),
            },
            SceneCommand::Delete(cmd) => match cmd.object.take() {
                Some(obj) => {
                    let index = cmd.index.unwrap_or(scene.len());
                    scene.insert_at(index, obj);
                    if cmd.was_selected {
                        scene.set_selected(Some(cmd.id));
                    }
                }
                None => tracing::warn!(id = %cmd.id, "undo-delete has no object to restore"),
            },
            SceneCommand::Modify(cmd) => match scene.get_mut(cmd.id) {
                Some(obj) => {
                    obj.shape.set_property(&cmd.name, &cmd.old);
                }
                None => tracing::warn!(id = %cmd.id, "undo-modify target not found"),
            },
            SceneCommand::Move(cmd) => match scene.get_mut(cmd.id) {
                Some(obj) => obj.shape.set_anchor_coords(cmd.from),
                None => tracing::warn!(id = %cmd.id, "undo-move target not found"),
            },
            SceneCommand::Clear(cmd) => match cmd.snapshot.take() {
                Some(snapshot) => scene.restore(snapshot),
                None => tracing::warn!("undo-clear has no snapshot to restore"),
            },
        }
    }

    /// Human-readable description for the undo/redo UI.
    pub fn description(&self) -> String {
        match self {
            SceneCommand::Add(cmd) => format!("Add {}", cmd.label),
            SceneCommand::Delete(cmd) => format!("Delete {}", cmd.label),
            SceneCommand::Modify(cmd) => format!("Change {}", cmd.name),
            SceneCommand::Move(cmd) => format!("Move {}", cmd.label),
            SceneCommand::Clear(_) => "Clear diagram".to_string(),
        }
    }
}

/// Bounded undo/redo history over scene commands.
///
/// Executing a new command discards the redo branch. When the undo depth
/// exceeds the limit, the oldest command is evicted and becomes
/// unrecoverable.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<SceneCommand>,
    redo_stack: Vec<SceneCommand>,
    limit: usize,
}

impl History {
    /// Creates a history bounded to the default limit.
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    /// Creates a history with an explicit depth limit.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Applies a command and records it.
    pub fn execute(&mut self, mut command: SceneCommand, scene: &mut Scene) {
        command.apply(scene);
        self.push(command);
    }

    /// Records a command whose effect has already happened.
    ///
    /// This is the drag-commit path: the object was mutated live during the
    /// drag, so only the bookkeeping is appended here. Re-applying the
    /// forward effect would double the move.
    pub fn record_without_executing(&mut self, command: SceneCommand) {
        self.push(command);
    }

    fn push(&mut self, command: SceneCommand) {
        self.undo_stack.push(command);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    /// Undoes the most recent command. Returns false when there is none.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        match self.undo_stack.pop() {
            Some(mut command) => {
                command.undo(scene);
                self.redo_stack.push(command);
                true
            }
            None => false,
        }
    }

    /// Re-applies the most recently undone command.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        match self.redo_stack.pop() {
            Some(mut command) => {
                command.apply(scene);
                self.undo_stack.push(command);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the command `undo` would revert.
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|c| c.description())
    }

    /// Description of the command `redo` would re-apply.
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Number of undoable commands.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redoable commands.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drops all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
