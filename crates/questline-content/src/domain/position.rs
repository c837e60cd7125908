//! Dialog positions and branch path ranges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// A `(scene, dialog)` pair identifying one dialog in a quest.
///
/// Ordering is lexicographic: scene first, then dialog. That is also reading
/// order, so a contiguous range of positions is simply `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Index of the scene in the quest.
    pub scene_index: usize,
    /// Index of the dialog within its scene.
    pub dialog_index: usize,
}

impl Position {
    /// The first dialog of the first scene.
    pub const START: Self = Self::new(0, 0);

    /// Creates a position.
    #[must_use]
    pub const fn new(scene_index: usize, dialog_index: usize) -> Self {
        Self {
            scene_index,
            dialog_index,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.scene_index, self.dialog_index)
    }
}

impl FromStr for Position {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ContentError::MalformedPosition {
            input: s.to_owned(),
        };
        let (scene, dialog) = s.trim().split_once('_').ok_or_else(malformed)?;
        let scene_index = scene.parse().map_err(|_| malformed())?;
        let dialog_index = dialog.parse().map_err(|_| malformed())?;
        Ok(Self::new(scene_index, dialog_index))
    }
}

/// An inclusive range of positions forming one alternative branch, authored
/// as `"startScene_startDialog,endScene_endDialog"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchPath {
    start: Position,
    end: Position,
}

impl BranchPath {
    /// Creates a path from its endpoints.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::MalformedBranchReference` if `end` precedes
    /// `start`.
    pub fn new(start: Position, end: Position) -> Result<Self, ContentError> {
        if end < start {
            return Err(ContentError::MalformedBranchReference {
                reference: format!("{start},{end}"),
                reason: "end position precedes start position".to_owned(),
            });
        }
        Ok(Self { start, end })
    }

    /// First position of the branch.
    #[must_use]
    pub const fn start(&self) -> Position {
        self.start
    }

    /// Last position of the branch.
    #[must_use]
    pub const fn end(&self) -> Position {
        self.end
    }

    /// Number of scenes the branch touches, counting partial scenes.
    #[must_use]
    pub const fn scene_span(&self) -> usize {
        self.end.scene_index - self.start.scene_index + 1
    }

    /// Whether `position` lies inside the range.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

impl fmt::Display for BranchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.start, self.end)
    }
}

impl FromStr for BranchPath {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| ContentError::MalformedBranchReference {
            reference: s.to_owned(),
            reason: reason.to_owned(),
        };
        let parts: Vec<&str> = s.split(',').collect();
        let [start, end] = parts.as_slice() else {
            return Err(malformed("expected exactly two `scene_dialog` endpoints"));
        };
        let start: Position = start
            .parse()
            .map_err(|_| malformed("start is not a `scene_dialog` pair"))?;
        let end: Position = end
            .parse()
            .map_err(|_| malformed("end is not a `scene_dialog` pair"))?;
        if end < start {
            return Err(malformed("end position precedes start position"));
        }
        Ok(Self { start, end })
    }
}

impl TryFrom<String> for BranchPath {
    type Error = ContentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BranchPath> for String {
    fn from(path: BranchPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_orders_by_scene_then_dialog() {
        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
        assert_eq!(Position::START, Position::new(0, 0));
    }

    #[test]
    fn test_position_parses_key_form() {
        let position: Position = "12_3".parse().unwrap();
        assert_eq!(position, Position::new(12, 3));
        assert_eq!(position.to_string(), "12_3");
    }

    #[test]
    fn test_position_rejects_non_numeric_parts() {
        let result = "a_1".parse::<Position>();
        assert!(matches!(result, Err(ContentError::MalformedPosition { .. })));

        let result = "3".parse::<Position>();
        assert!(matches!(result, Err(ContentError::MalformedPosition { .. })));
    }

    #[test]
    fn test_branch_path_parses_range() {
        // Arrange
        let raw = "1_1,2_0";

        // Act
        let path: BranchPath = raw.parse().unwrap();

        // Assert
        assert_eq!(path.start(), Position::new(1, 1));
        assert_eq!(path.end(), Position::new(2, 0));
        assert_eq!(path.scene_span(), 2);
        assert_eq!(path.to_string(), raw);
    }

    #[test]
    fn test_branch_path_tolerates_whitespace_around_endpoints() {
        let path: BranchPath = " 3_0 , 3_1 ".parse().unwrap();
        assert_eq!(path.start(), Position::new(3, 0));
        assert_eq!(path.end(), Position::new(3, 1));
    }

    #[test]
    fn test_branch_path_rejects_wrong_token_count() {
        for raw in ["1_1", "1_1,2_0,3_0", ""] {
            match raw.parse::<BranchPath>() {
                Err(ContentError::MalformedBranchReference { reference, .. }) => {
                    assert_eq!(reference, raw);
                }
                other => panic!("expected MalformedBranchReference for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_branch_path_rejects_non_numeric_indices() {
        let result = "1_x,2_0".parse::<BranchPath>();
        assert!(matches!(
            result,
            Err(ContentError::MalformedBranchReference { .. })
        ));
    }

    #[test]
    fn test_branch_path_rejects_reversed_range() {
        let result = "4_0,3_2".parse::<BranchPath>();
        match result {
            Err(ContentError::MalformedBranchReference { reason, .. }) => {
                assert!(reason.contains("precedes"));
            }
            other => panic!("expected MalformedBranchReference, got {other:?}"),
        }
    }

    #[test]
    fn test_branch_path_contains_whole_intermediate_scenes() {
        let path: BranchPath = "1_2,3_0".parse().unwrap();

        assert!(!path.contains(Position::new(1, 1)));
        assert!(path.contains(Position::new(1, 2)));
        assert!(path.contains(Position::new(2, 40)));
        assert!(path.contains(Position::new(3, 0)));
        assert!(!path.contains(Position::new(3, 1)));
    }

    #[test]
    fn test_branch_path_deserializes_from_string() {
        let path: BranchPath = serde_json::from_str("\"0_1,0_2\"").unwrap();
        assert_eq!(path.start(), Position::new(0, 1));

        let result = serde_json::from_str::<BranchPath>("\"0_1\"");
        assert!(result.is_err());
    }
}
