//! Instruction catalog and construction
//!
//! The catalog is the sole constructor of script instructions: every
//! instruction copies its display metadata (label, icon, palette category)
//! from the catalog entry for its kind at creation time. Kind names arriving
//! as strings (CLI arguments, fixture files) are validated here and unknown
//! names are rejected at the boundary.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::{CatalogError, CatalogResult};
use super::grid::Direction;

/// The closed set of instruction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstructionKind {
    /// Move one cell up
    MoveUp,
    /// Move one cell down
    MoveDown,
    /// Move one cell left
    MoveLeft,
    /// Move one cell right
    MoveRight,
    /// Hold position for one step
    Wait,
}

impl InstructionKind {
    /// The movement delta of this kind; `None` for the wait no-op
    pub fn direction(self) -> Option<Direction> {
        match self {
            InstructionKind::MoveUp => Some(Direction::Up),
            InstructionKind::MoveDown => Some(Direction::Down),
            InstructionKind::MoveLeft => Some(Direction::Left),
            InstructionKind::MoveRight => Some(Direction::Right),
            InstructionKind::Wait => None,
        }
    }

    /// Canonical kebab-case name, as used in fixtures and on the CLI
    pub fn name(self) -> &'static str {
        match self {
            InstructionKind::MoveUp => "move-up",
            InstructionKind::MoveDown => "move-down",
            InstructionKind::MoveLeft => "move-left",
            InstructionKind::MoveRight => "move-right",
            InstructionKind::Wait => "wait",
        }
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Palette category an instruction belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    /// Movement instructions
    Motion,
    /// Flow/pacing instructions
    Control,
}

/// Display metadata for one catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMetadata {
    /// Instruction kind this entry describes
    pub kind: InstructionKind,
    /// Palette category
    pub category: BlockCategory,
    /// Human-readable label
    pub label: &'static str,
    /// Palette icon glyph
    pub icon: &'static str,
}

/// Unique identifier for one instruction instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstructionId(pub Uuid);

impl InstructionId {
    /// Create a new random InstructionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstructionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One queued script instruction
///
/// Immutable once created. The id is assigned at creation and carries no
/// meaning beyond list diffing and "currently executing" highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Unique instance id
    pub id: InstructionId,
    /// Instruction kind
    pub kind: InstructionKind,
    /// Palette category, copied from the catalog
    pub category: BlockCategory,
    /// Display label, copied from the catalog
    pub label: String,
    /// Display icon, copied from the catalog
    pub icon: String,
}

static CATALOG: Lazy<InstructionCatalog> = Lazy::new(InstructionCatalog::new);

/// Registry mapping instruction kinds to display metadata
pub struct InstructionCatalog {
    entries: Vec<BlockMetadata>,
}

impl InstructionCatalog {
    fn new() -> Self {
        Self {
            entries: vec![
                BlockMetadata {
                    kind: InstructionKind::MoveUp,
                    category: BlockCategory::Motion,
                    label: "Move Up",
                    icon: "↑",
                },
                BlockMetadata {
                    kind: InstructionKind::MoveDown,
                    category: BlockCategory::Motion,
                    label: "Move Down",
                    icon: "↓",
                },
                BlockMetadata {
                    kind: InstructionKind::MoveLeft,
                    category: BlockCategory::Motion,
                    label: "Move Left",
                    icon: "←",
                },
                BlockMetadata {
                    kind: InstructionKind::MoveRight,
                    category: BlockCategory::Motion,
                    label: "Move Right",
                    icon: "→",
                },
                BlockMetadata {
                    kind: InstructionKind::Wait,
                    category: BlockCategory::Control,
                    label: "Wait",
                    icon: "⏳",
                },
            ],
        }
    }

    /// Access the global catalog singleton
    pub fn global() -> &'static Self {
        &CATALOG
    }

    /// Metadata for one instruction kind
    pub fn metadata(&self, kind: InstructionKind) -> &BlockMetadata {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind)
            .expect("catalog covers every instruction kind")
    }

    /// All palette entries in display order
    pub fn entries(&self) -> &[BlockMetadata] {
        &self.entries
    }

    /// Construct a fresh instruction of the given kind
    pub fn create(&self, kind: InstructionKind) -> Instruction {
        let meta = self.metadata(kind);
        Instruction {
            id: InstructionId::new(),
            kind,
            category: meta.category,
            label: meta.label.to_string(),
            icon: meta.icon.to_string(),
        }
    }

    /// Resolve a kind by its canonical name, rejecting unknown names
    pub fn parse_kind(&self, name: &str) -> CatalogResult<InstructionKind> {
        let needle = name.trim().to_ascii_lowercase();
        self.entries
            .iter()
            .map(|entry| entry.kind)
            .find(|kind| kind.name() == needle)
            .ok_or_else(|| CatalogError::UnknownKind(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_all_kinds() {
        let catalog = InstructionCatalog::global();
        for kind in [
            InstructionKind::MoveUp,
            InstructionKind::MoveDown,
            InstructionKind::MoveLeft,
            InstructionKind::MoveRight,
            InstructionKind::Wait,
        ] {
            assert_eq!(catalog.metadata(kind).kind, kind);
        }
    }

    #[test]
    fn test_create_copies_metadata() {
        let catalog = InstructionCatalog::global();
        let instruction = catalog.create(InstructionKind::MoveRight);

        assert_eq!(instruction.kind, InstructionKind::MoveRight);
        assert_eq!(instruction.category, BlockCategory::Motion);
        assert_eq!(instruction.label, "Move Right");
        assert_eq!(instruction.icon, "→");
    }

    #[test]
    fn test_instruction_ids_unique() {
        let catalog = InstructionCatalog::global();
        let a = catalog.create(InstructionKind::Wait);
        let b = catalog.create(InstructionKind::Wait);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_parse_kind_known_names() {
        let catalog = InstructionCatalog::global();
        assert_eq!(
            catalog.parse_kind("move-left").unwrap(),
            InstructionKind::MoveLeft
        );
        assert_eq!(catalog.parse_kind(" WAIT ").unwrap(), InstructionKind::Wait);
    }

    #[test]
    fn test_parse_kind_rejects_unknown() {
        let catalog = InstructionCatalog::global();
        assert!(matches!(
            catalog.parse_kind("teleport"),
            Err(CatalogError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_wait_has_no_direction() {
        assert!(InstructionKind::Wait.direction().is_none());
        assert!(InstructionKind::MoveUp.direction().is_some());
    }
}
