//! Session orchestrator and public API
//!
//! This module provides the main `Session` struct that owns the shared
//! state, the level catalog, and the event channel, and exposes the public
//! interface for editing, running, and inspecting the puzzle.
//!
//! Every editing entry point is a silent no-op while a run is in progress
//! or (for append) once the session has a terminal outcome. That guard is
//! the whole synchronization story: there is no parallelism, only a
//! re-entrancy check against a user editing mid-run.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, trace};

// Submodules
pub mod actor;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod grid;
pub mod history;
pub mod level;
pub mod state;

use actor::{Sprite, SPRITE_TEMPLATES};
use catalog::InstructionCatalog;
use engine::Engine;
use error::Result;
use history::ScriptHistory;
use state::{Outcome, SessionState};

// Re-export commonly used types
pub use actor::SpriteId;
pub use catalog::InstructionKind;
pub use engine::{RunRecord, StepEvent};
pub use grid::CellCoord;
pub use level::LevelCatalog;
pub use state::{EditBrush, StateView};

/// Capacity of the step-event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Configuration for a puzzle session
///
/// By default steps hold 400 ms for animation,
/// settle for 50 ms, and a win holds 800 ms before the outcome flips so
/// celebration feedback can play.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long each step's state is held, in milliseconds
    pub step_hold_ms: u64,

    /// Pause between steps after highlighting clears, in milliseconds
    pub settle_hold_ms: u64,

    /// Delay before a win flips the outcome, in milliseconds
    pub win_hold_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            step_hold_ms: 400,
            settle_hold_ms: 50,
            win_hold_ms: 800,
        }
    }
}

/// The main session orchestrator
///
/// Owns the shared state, the level catalog, and the step-event channel.
/// Cheap to share: all methods take `&self`, so a `Session` can sit in an
/// `Arc` with the engine running in one task and collaborators reading
/// from others.
pub struct Session {
    config: SessionConfig,
    levels: LevelCatalog,
    state: Arc<RwLock<SessionState>>,
    events: broadcast::Sender<StepEvent>,
}

impl Session {
    /// Create a session on the first built-in level
    pub fn new(config: SessionConfig) -> Self {
        let levels = LevelCatalog::builtin();
        let level = levels
            .levels()
            .first()
            .cloned()
            .expect("builtin catalog is non-empty");
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            levels,
            state: Arc::new(RwLock::new(SessionState::new(level))),
            events,
        }
    }

    /// Create a session on the given level of a custom catalog
    pub fn with_catalog(config: SessionConfig, levels: LevelCatalog, level_id: u32) -> Result<Self> {
        let level = levels.get(level_id)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            config,
            levels,
            state: Arc::new(RwLock::new(SessionState::new(level))),
            events,
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the level catalog
    pub fn levels(&self) -> &LevelCatalog {
        &self.levels
    }

    /// Subscribe to per-step events
    pub fn subscribe(&self) -> broadcast::Receiver<StepEvent> {
        self.events.subscribe()
    }

    /// Read model snapshot for collaborators
    pub fn view(&self) -> StateView {
        self.state.read().view()
    }

    // --- editing ---

    /// Append an instruction of the given kind to the active script
    ///
    /// No-op while running or once the session has a terminal outcome.
    pub fn append(&self, kind: InstructionKind) {
        let mut state = self.state.write();
        if state.running || state.outcome != Outcome::Playing {
            trace!(%kind, "append rejected");
            return;
        }
        let mut script = state.active().script.clone();
        script.push(InstructionCatalog::global().create(kind));
        state.history.commit(script.clone());
        state.active_mut().script = script;
    }

    /// Clear the active script
    ///
    /// No-op while running.
    pub fn clear(&self) {
        let mut state = self.state.write();
        if state.running {
            trace!("clear rejected");
            return;
        }
        state.history.commit(Vec::new());
        state.active_mut().script.clear();
    }

    /// Step the script back one edit
    ///
    /// No-op while running or at the oldest snapshot.
    pub fn undo(&self) {
        let mut state = self.state.write();
        if state.running {
            trace!("undo rejected");
            return;
        }
        if let Some(snapshot) = state.history.undo() {
            let script = snapshot.to_vec();
            state.active_mut().script = script;
        }
    }

    /// Step the script forward one edit
    ///
    /// No-op while running or at the newest snapshot.
    pub fn redo(&self) {
        let mut state = self.state.write();
        if state.running {
            trace!("redo rejected");
            return;
        }
        if let Some(snapshot) = state.history.redo() {
            let script = snapshot.to_vec();
            state.active_mut().script = script;
        }
    }

    // --- execution ---

    /// Run the active sprite's script to completion
    ///
    /// Silent no-op (returns `None`) when the outcome is not `Playing`, a
    /// run is already in progress, or the script is empty. Also returns
    /// `None` when a reset abandons the run mid-flight.
    pub async fn run(&self) -> Option<RunRecord> {
        Engine::new(Arc::clone(&self.state), self.config, self.events.clone())
            .run()
            .await
    }

    // --- lifecycle ---

    /// Return every sprite to the start cell and clear scripts and history
    ///
    /// Also abandons any in-flight run: its later step completions observe
    /// the generation bump and leave state untouched.
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.reset();
        info!(level_id = state.level.id, "session reset");
    }

    /// Swap in the level with the given id, then reset
    ///
    /// No-op while running. Unknown ids are rejected; this is the only
    /// operation with an error return.
    pub fn load_level(&self, level_id: u32) -> Result<()> {
        let level = self.levels.get(level_id)?;
        let mut state = self.state.write();
        if state.running {
            trace!(level_id, "load rejected: run in progress");
            return Ok(());
        }
        state.install_level(level);
        info!(level_id, "level loaded");
        Ok(())
    }

    // --- sprite roster ---

    /// Add a sprite from the next template and make it active
    ///
    /// No-op while running; returns the new sprite's id otherwise.
    pub fn add_sprite(&self) -> Option<SpriteId> {
        let mut state = self.state.write();
        if state.running {
            trace!("add sprite rejected");
            return None;
        }
        let template = &SPRITE_TEMPLATES[state.sprites.len() % SPRITE_TEMPLATES.len()];
        let sprite = Sprite::from_template(template, state.level.start);
        let id = sprite.id;
        state.sprites.push(sprite);
        state.active_sprite = id;
        state.history = ScriptHistory::new();
        Some(id)
    }

    /// Remove a sprite from the roster
    ///
    /// No-op while running, for unknown ids, and for the last remaining
    /// sprite. Removing the active sprite activates the first remaining
    /// one.
    pub fn remove_sprite(&self, id: SpriteId) {
        let mut state = self.state.write();
        if state.running || state.sprites.len() <= 1 {
            trace!(%id, "remove sprite rejected");
            return;
        }
        let Some(index) = state.sprites.iter().position(|sprite| sprite.id == id) else {
            trace!(%id, "remove sprite rejected: unknown id");
            return;
        };
        state.sprites.remove(index);
        if state.active_sprite == id {
            state.active_sprite = state.sprites[0].id;
            state.history = ScriptHistory::seeded(state.sprites[0].script.clone());
        }
    }

    /// Make the given sprite the active (editable/executable) one
    ///
    /// No-op while running or for unknown ids. History reseeds from the
    /// newly active sprite's script.
    pub fn select_sprite(&self, id: SpriteId) {
        let mut state = self.state.write();
        if state.running || state.active_sprite == id {
            return;
        }
        let Some(sprite) = state.sprite(id) else {
            trace!(%id, "select sprite rejected: unknown id");
            return;
        };
        let script = sprite.script.clone();
        state.active_sprite = id;
        state.history = ScriptHistory::seeded(script);
    }

    /// Rename a sprite
    ///
    /// No-op while running or for unknown ids.
    pub fn rename_sprite(&self, id: SpriteId, name: impl Into<String>) {
        let mut state = self.state.write();
        if state.running {
            return;
        }
        if let Some(sprite) = state.sprite_mut(id) {
            sprite.name = name.into();
        }
    }

    /// Advance a sprite's glyph through the template table
    ///
    /// No-op while running or for unknown ids.
    pub fn cycle_glyph(&self, id: SpriteId) {
        let mut state = self.state.write();
        if state.running {
            return;
        }
        if let Some(sprite) = state.sprite_mut(id) {
            sprite.glyph = sprite.next_glyph().to_string();
        }
    }

    // --- level editor brush ---

    /// Toggle the level-editor brush on or off
    pub fn set_edit_mode(&self, enabled: bool) {
        self.state.write().edit_mode = enabled;
    }

    /// Select which brush `paint` applies
    pub fn set_brush(&self, brush: EditBrush) {
        self.state.write().brush = brush;
    }

    /// Apply the selected brush at the given cell
    ///
    /// No-op while running, outside edit mode, or outside grid bounds. The
    /// wall brush toggles the cell unless it is the start or goal; the
    /// start and goal brushes move their marker unless the cell is a wall,
    /// preserving wall/start/goal disjointness.
    pub fn paint(&self, cell: CellCoord) {
        let mut state = self.state.write();
        if state.running || !state.edit_mode || !cell.in_bounds(state.level.grid_size) {
            trace!(%cell, "paint rejected");
            return;
        }
        match state.brush {
            EditBrush::Wall => {
                if cell == state.level.start || cell == state.level.goal {
                    return;
                }
                if !state.level.walls.remove(&cell) {
                    state.level.walls.insert(cell);
                }
            }
            EditBrush::Start => {
                if !state.level.walls.contains(&cell) {
                    state.level.start = cell;
                }
            }
            EditBrush::Goal => {
                if !state.level.walls.contains(&cell) {
                    state.level.goal = cell;
                }
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
