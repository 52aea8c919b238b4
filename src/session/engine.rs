//! Sequential script execution
//!
//! Runs the active sprite's full instruction sequence to completion, one
//! instruction at a time, against the maze. Each step holds state for a
//! fixed duration so collaborators can animate, then settles briefly before
//! the next instruction. A blocked move consumes its instruction without
//! halting the run; the player watches the whole plan play out.
//!
//! The engine captures the session generation at run start and re-checks it
//! after every hold. Reset and level load bump the generation, so a run
//! whose world was torn down abandons itself without mutating state.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, trace};
use uuid::Uuid;

use super::actor::SpriteId;
use super::catalog::{Instruction, InstructionId, InstructionKind};
use super::grid::CellCoord;
use super::state::{Outcome, SessionState};
use super::SessionConfig;

/// Per-step notification emitted while a run is in progress
#[derive(Debug, Clone, Serialize)]
pub enum StepEvent {
    /// A run began for the given sprite
    RunStarted {
        /// Sprite whose script is executing
        sprite: SpriteId,
    },
    /// An instruction became the currently-executing one
    StepBegan {
        /// Zero-based position in the run snapshot
        index: usize,
        /// Instruction instance id, for highlighting
        instruction: InstructionId,
        /// Instruction kind, for cue selection
        kind: InstructionKind,
    },
    /// The sprite committed a move (wait steps re-commit the same cell)
    Moved {
        /// Sprite that moved
        sprite: SpriteId,
        /// Cell before the step
        from: CellCoord,
        /// Cell after the step
        to: CellCoord,
    },
    /// The sprite's move was rejected by maze geometry
    Blocked {
        /// Sprite that stayed put
        sprite: SpriteId,
        /// Cell the sprite occupies
        at: CellCoord,
        /// Cell the instruction aimed for
        toward: CellCoord,
    },
    /// The step hold elapsed and highlighting cleared
    StepSettled {
        /// Zero-based position in the run snapshot
        index: usize,
    },
    /// The run reached a terminal outcome
    RunFinished {
        /// Won or lost
        outcome: Outcome,
    },
}

/// One executed step in a run record
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    /// Zero-based position in the run snapshot
    pub index: usize,
    /// Instruction instance id
    pub instruction: InstructionId,
    /// Instruction kind
    pub kind: InstructionKind,
    /// Cell before the step
    pub from: CellCoord,
    /// Cell after the step (equals `from` for blocked and wait steps)
    pub to: CellCoord,
    /// Whether maze geometry rejected the move
    pub blocked: bool,
}

/// Summary of one completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    /// Unique run id
    pub run_id: Uuid,
    /// Level the run executed on
    pub level_id: u32,
    /// Sprite whose script executed
    pub sprite: SpriteId,
    /// Wall-clock start (informational only)
    pub started_at: DateTime<Utc>,
    /// Every executed step, in order
    pub steps: Vec<StepRecord>,
    /// Terminal outcome
    pub outcome: Outcome,
}

/// Executes one run against the shared session state
pub(crate) struct Engine {
    state: Arc<RwLock<SessionState>>,
    config: SessionConfig,
    events: broadcast::Sender<StepEvent>,
}

struct StepApplied {
    from: CellCoord,
    to: CellCoord,
    blocked: bool,
}

impl Engine {
    pub(crate) fn new(
        state: Arc<RwLock<SessionState>>,
        config: SessionConfig,
        events: broadcast::Sender<StepEvent>,
    ) -> Self {
        Self {
            state,
            config,
            events,
        }
    }

    /// Run the active sprite's script to completion
    ///
    /// Returns `None` when the run preconditions are not met (silent no-op)
    /// or when the session was reset mid-run and the record is moot.
    pub(crate) async fn run(&self) -> Option<RunRecord> {
        let (generation, sprite_id, script, goal, level_id) = {
            let mut state = self.state.write();
            if state.running || state.outcome != Outcome::Playing {
                trace!(running = state.running, "run rejected: session not idle");
                return None;
            }
            if state.active().script.is_empty() {
                trace!("run rejected: empty script");
                return None;
            }
            state.running = true;
            // Later edits are locked out by the running guard; the snapshot
            // makes the run independent of them regardless.
            let script: Vec<Instruction> = state.active().script.clone();
            (
                state.generation,
                state.active_sprite,
                script,
                state.level.goal,
                state.level.id,
            )
        };

        info!(%sprite_id, level_id, steps = script.len(), "run started");
        let _ = self.events.send(StepEvent::RunStarted { sprite: sprite_id });

        let mut record = RunRecord {
            run_id: Uuid::new_v4(),
            level_id,
            sprite: sprite_id,
            started_at: Utc::now(),
            steps: Vec::with_capacity(script.len()),
            outcome: Outcome::Playing,
        };

        let mut won = false;
        for (index, instruction) in script.iter().enumerate() {
            let applied = match self.begin_step(generation, sprite_id, index, instruction) {
                Some(applied) => applied,
                None => return None,
            };

            record.steps.push(StepRecord {
                index,
                instruction: instruction.id,
                kind: instruction.kind,
                from: applied.from,
                to: applied.to,
                blocked: applied.blocked,
            });

            tokio::time::sleep(Duration::from_millis(self.config.step_hold_ms)).await;

            if !self.settle_step(generation, sprite_id, index) {
                return None;
            }

            tokio::time::sleep(Duration::from_millis(self.config.settle_hold_ms)).await;

            if applied.to == goal {
                won = true;
                break;
            }
        }

        if won {
            // Let the celebration cue play before the outcome flips.
            tokio::time::sleep(Duration::from_millis(self.config.win_hold_ms)).await;
            if !self.finish(generation, Outcome::Won) {
                return None;
            }
            record.outcome = Outcome::Won;
        } else {
            if !self.finish(generation, Outcome::Lost) {
                return None;
            }
            record.outcome = Outcome::Lost;
        }

        info!(%sprite_id, outcome = ?record.outcome, "run finished");
        let _ = self.events.send(StepEvent::RunFinished {
            outcome: record.outcome,
        });
        Some(record)
    }

    /// Mark an instruction active and resolve its move against the maze
    fn begin_step(
        &self,
        generation: u64,
        sprite_id: SpriteId,
        index: usize,
        instruction: &Instruction,
    ) -> Option<StepApplied> {
        let (applied, event) = {
            let mut state = self.state.write();
            if state.generation != generation {
                trace!(index, "run abandoned: session was reset");
                return None;
            }
            state.active_instruction = Some(instruction.id);

            let from = state.active().position;
            let target = from.offset(instruction.kind.direction());

            if state.level.is_blocked(target) {
                state.blocked = Some(sprite_id);
                (
                    StepApplied {
                        from,
                        to: from,
                        blocked: true,
                    },
                    StepEvent::Blocked {
                        sprite: sprite_id,
                        at: from,
                        toward: target,
                    },
                )
            } else {
                let sprite = state.active_mut();
                sprite.position = target;
                sprite.is_moving = true;
                state.blocked = None;
                (
                    StepApplied {
                        from,
                        to: target,
                        blocked: false,
                    },
                    StepEvent::Moved {
                        sprite: sprite_id,
                        from,
                        to: target,
                    },
                )
            }
        };

        debug!(
            index,
            kind = %instruction.kind,
            from = %applied.from,
            to = %applied.to,
            blocked = applied.blocked,
            "step"
        );
        let _ = self.events.send(StepEvent::StepBegan {
            index,
            instruction: instruction.id,
            kind: instruction.kind,
        });
        let _ = self.events.send(event);
        Some(applied)
    }

    /// Clear the per-step flags after the step hold
    fn settle_step(&self, generation: u64, sprite_id: SpriteId, index: usize) -> bool {
        {
            let mut state = self.state.write();
            if state.generation != generation {
                trace!(index, "run abandoned: session was reset");
                return false;
            }
            state.blocked = None;
            if let Some(sprite) = state.sprite_mut(sprite_id) {
                sprite.is_moving = false;
            }
            state.active_instruction = None;
        }
        let _ = self.events.send(StepEvent::StepSettled { index });
        true
    }

    /// Flip the session to its terminal outcome
    fn finish(&self, generation: u64, outcome: Outcome) -> bool {
        let mut state = self.state.write();
        if state.generation != generation {
            trace!("run abandoned before terminal outcome");
            return false;
        }
        state.running = false;
        state.outcome = outcome;
        true
    }
}
