//! Session state container and read model
//!
//! Pure state: mutated by the editing entry points (script, history,
//! roster, brush) and by the execution engine (position, animation flags,
//! running, outcome). The `running` flag is the single-writer guard; every
//! mutating editor path checks it before touching state. The generation
//! counter is bumped by reset/load so an in-flight run can recognize that
//! its world is gone and abandon itself.

use serde::{Deserialize, Serialize};

use super::actor::{Sprite, SpriteId, SPRITE_TEMPLATES};
use super::catalog::{Instruction, InstructionId};
use super::grid::CellCoord;
use super::history::ScriptHistory;
use super::level::Level;

/// Terminal status of the puzzle session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The puzzle is still open
    Playing,
    /// A run reached the goal cell
    Won,
    /// A run exhausted its script without reaching the goal
    Lost,
}

/// Level-editor brush selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditBrush {
    /// Toggle walls
    Wall,
    /// Move the start cell
    Start,
    /// Move the goal cell
    Goal,
}

/// The complete mutable session state
#[derive(Debug)]
pub struct SessionState {
    /// Current maze fixture (session-local copy)
    pub level: Level,
    /// All sprites; never empty
    pub sprites: Vec<Sprite>,
    /// The sprite whose script is edited and executed
    pub active_sprite: SpriteId,
    /// Undo/redo history over the active sprite's script
    pub history: ScriptHistory,
    /// Terminal status
    pub outcome: Outcome,
    /// Whether a run is in progress (re-entrancy guard for the editor)
    pub running: bool,
    /// Sprite whose last move was rejected, for the duration of that step
    pub blocked: Option<SpriteId>,
    /// Instruction currently executing, for highlighting
    pub active_instruction: Option<InstructionId>,
    /// Whether the level-editor brush is live
    pub edit_mode: bool,
    /// Selected brush
    pub brush: EditBrush,
    /// Bumped on reset/load; in-flight runs compare against their capture
    pub generation: u64,
}

impl SessionState {
    /// Fresh state on the given level with one template sprite
    pub fn new(level: Level) -> Self {
        let sprite = Sprite::from_template(&SPRITE_TEMPLATES[0], level.start);
        let active_sprite = sprite.id;
        Self {
            level,
            sprites: vec![sprite],
            active_sprite,
            history: ScriptHistory::new(),
            outcome: Outcome::Playing,
            running: false,
            blocked: None,
            active_instruction: None,
            edit_mode: false,
            brush: EditBrush::Wall,
            generation: 0,
        }
    }

    /// The active sprite
    ///
    /// The roster is never empty and `active_sprite` always names a member,
    /// so the lookup cannot fail.
    pub fn active(&self) -> &Sprite {
        self.sprites
            .iter()
            .find(|sprite| sprite.id == self.active_sprite)
            .expect("active sprite is always a roster member")
    }

    /// Mutable access to the active sprite
    pub fn active_mut(&mut self) -> &mut Sprite {
        let id = self.active_sprite;
        self.sprites
            .iter_mut()
            .find(|sprite| sprite.id == id)
            .expect("active sprite is always a roster member")
    }

    /// Sprite lookup by id
    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|sprite| sprite.id == id)
    }

    /// Mutable sprite lookup by id
    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|sprite| sprite.id == id)
    }

    /// Return to the pristine pre-run state on the current level
    ///
    /// Every sprite moves to the start cell with a cleared script; outcome,
    /// running, blocked, and highlighting reset; history reinitializes; the
    /// generation bump orphans any in-flight run.
    pub fn reset(&mut self) {
        let start = self.level.start;
        for sprite in &mut self.sprites {
            sprite.position = start;
            sprite.is_moving = false;
            sprite.script.clear();
        }
        self.outcome = Outcome::Playing;
        self.running = false;
        self.blocked = None;
        self.active_instruction = None;
        self.history = ScriptHistory::new();
        self.generation += 1;
    }

    /// Swap in a new level fixture, then reset
    pub fn install_level(&mut self, level: Level) {
        self.level = level;
        self.reset();
    }

    /// Read model snapshot for collaborators
    pub fn view(&self) -> StateView {
        StateView {
            level_id: self.level.id,
            theme_name: self.level.theme.name.clone(),
            start: self.level.start,
            goal: self.level.goal,
            walls: self.level.walls.iter().copied().collect(),
            sprites: self
                .sprites
                .iter()
                .map(|sprite| SpriteView {
                    id: sprite.id,
                    name: sprite.name.clone(),
                    glyph: sprite.glyph.clone(),
                    position: sprite.position,
                    is_moving: sprite.is_moving,
                })
                .collect(),
            active_sprite: self.active_sprite,
            script: self.active().script.clone(),
            active_instruction: self.active_instruction,
            blocked: self.blocked,
            running: self.running,
            outcome: self.outcome,
            edit_mode: self.edit_mode,
            brush: self.brush,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }
}

/// Immutable per-tick snapshot of everything collaborators render
#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    /// Current level id
    pub level_id: u32,
    /// Current theme name
    pub theme_name: String,
    /// Start cell of the current maze
    pub start: CellCoord,
    /// Goal cell of the current maze
    pub goal: CellCoord,
    /// Wall cells of the current maze (unordered)
    pub walls: Vec<CellCoord>,
    /// All sprites
    pub sprites: Vec<SpriteView>,
    /// Active sprite id
    pub active_sprite: SpriteId,
    /// The active sprite's live script
    pub script: Vec<Instruction>,
    /// Instruction currently executing, if any
    pub active_instruction: Option<InstructionId>,
    /// Sprite currently flagged as blocked, if any
    pub blocked: Option<SpriteId>,
    /// Whether a run is in progress
    pub running: bool,
    /// Terminal status
    pub outcome: Outcome,
    /// Whether the level-editor brush is live
    pub edit_mode: bool,
    /// Selected brush
    pub brush: EditBrush,
    /// Whether undo would change state
    pub can_undo: bool,
    /// Whether redo would change state
    pub can_redo: bool,
}

/// Renderable sprite state
#[derive(Debug, Clone, Serialize)]
pub struct SpriteView {
    /// Sprite id
    pub id: SpriteId,
    /// Display name
    pub name: String,
    /// Display glyph
    pub glyph: String,
    /// Grid position
    pub position: CellCoord,
    /// Animation flag
    pub is_moving: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::catalog::{InstructionCatalog, InstructionKind};
    use crate::session::level::LevelCatalog;

    fn state() -> SessionState {
        SessionState::new(LevelCatalog::builtin().get(1).unwrap())
    }

    #[test]
    fn test_new_state_is_pristine() {
        let state = state();

        assert_eq!(state.outcome, Outcome::Playing);
        assert!(!state.running);
        assert!(state.blocked.is_none());
        assert_eq!(state.sprites.len(), 1);
        assert_eq!(state.active().position, state.level.start);
    }

    #[test]
    fn test_reset_restores_start_and_bumps_generation() {
        let mut state = state();
        let catalog = InstructionCatalog::global();

        state.active_mut().position = CellCoord::new(5, 5);
        state
            .active_mut()
            .script
            .push(catalog.create(InstructionKind::MoveUp));
        state.outcome = Outcome::Lost;
        state.running = true;
        let generation = state.generation;

        state.reset();

        assert_eq!(state.active().position, state.level.start);
        assert!(state.active().script.is_empty());
        assert_eq!(state.outcome, Outcome::Playing);
        assert!(!state.running);
        assert_eq!(state.generation, generation + 1);
    }

    #[test]
    fn test_view_mirrors_state() {
        let mut state = state();
        state.blocked = Some(state.active_sprite);

        let view = state.view();
        assert_eq!(view.level_id, 1);
        assert_eq!(view.blocked, Some(state.active_sprite));
        assert_eq!(view.sprites.len(), 1);
        assert!(!view.can_undo);
    }
}
