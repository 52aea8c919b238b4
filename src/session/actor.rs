//! Sprites: the player-controlled characters
//!
//! A sprite owns a grid position, one script, and a transient animation
//! flag. Exactly one sprite is active (editable/executable) at a time; the
//! session tracks which. New sprites are stamped from a fixed template
//! table.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::catalog::Instruction;
use super::grid::CellCoord;

/// Unique sprite identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub Uuid);

impl SpriteId {
    /// Create a new random SpriteId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SpriteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name and glyph for stamping new sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteTemplate {
    /// Default display name
    pub name: &'static str,
    /// Display glyph
    pub glyph: &'static str,
}

/// The fixed roster of sprite templates, cycled by glyph changes
pub const SPRITE_TEMPLATES: &[SpriteTemplate] = &[
    SpriteTemplate {
        name: "Hen",
        glyph: "🐔",
    },
    SpriteTemplate {
        name: "Chick",
        glyph: "🐥",
    },
    SpriteTemplate {
        name: "Hamster",
        glyph: "🐹",
    },
    SpriteTemplate {
        name: "Robot",
        glyph: "🤖",
    },
    SpriteTemplate {
        name: "Frog",
        glyph: "🐸",
    },
];

/// A player-controlled character on the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    /// Stable identifier
    pub id: SpriteId,
    /// Display name, editable
    pub name: String,
    /// Display glyph
    pub glyph: String,
    /// Grid position; within maze bounds while not mid-transition
    pub position: CellCoord,
    /// The sprite's script, executed in order
    pub script: Vec<Instruction>,
    /// Transient animation flag, set only during a step hold
    pub is_moving: bool,
}

impl Sprite {
    /// Create a sprite from a template at the given start cell
    pub fn from_template(template: &SpriteTemplate, start: CellCoord) -> Self {
        Self {
            id: SpriteId::new(),
            name: template.name.to_string(),
            glyph: template.glyph.to_string(),
            position: start,
            script: Vec::new(),
            is_moving: false,
        }
    }

    /// Glyph of the next template in the cycle after this sprite's glyph
    ///
    /// Unknown glyphs restart the cycle at the first template.
    pub fn next_glyph(&self) -> &'static str {
        let index = SPRITE_TEMPLATES
            .iter()
            .position(|template| template.glyph == self.glyph)
            .map(|index| (index + 1) % SPRITE_TEMPLATES.len())
            .unwrap_or(0);
        SPRITE_TEMPLATES[index].glyph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_template() {
        let start = CellCoord::new(1, 1);
        let sprite = Sprite::from_template(&SPRITE_TEMPLATES[0], start);

        assert_eq!(sprite.name, "Hen");
        assert_eq!(sprite.glyph, "🐔");
        assert_eq!(sprite.position, start);
        assert!(sprite.script.is_empty());
        assert!(!sprite.is_moving);
    }

    #[test]
    fn test_glyph_cycle_wraps() {
        let start = CellCoord::new(0, 0);
        let mut sprite = Sprite::from_template(&SPRITE_TEMPLATES[0], start);

        for expected in ["🐥", "🐹", "🤖", "🐸", "🐔"] {
            let next = sprite.next_glyph();
            assert_eq!(next, expected);
            sprite.glyph = next.to_string();
        }
    }

    #[test]
    fn test_unknown_glyph_restarts_cycle() {
        let mut sprite = Sprite::from_template(&SPRITE_TEMPLATES[0], CellCoord::new(0, 0));
        sprite.glyph = "🦖".to_string();
        assert_eq!(sprite.next_glyph(), "🐔");
    }
}
