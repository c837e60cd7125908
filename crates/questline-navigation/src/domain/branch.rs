//! Branch registry.
//!
//! Built once per quest from the typed `destinations` of each dialog and the
//! destination markers embedded in its translated rich text. A dialog that
//! offers destinations is a branch point; each destination is a branch, an
//! inclusive range of positions. Every position lies on at most one branch.

use std::collections::HashMap;

use questline_content::domain::markers::extract_destinations;
use questline_content::{BranchPath, ContentError, Position, Quest, Translate};
use serde::Serialize;
use tracing::debug;

use crate::error::NavigationError;

/// One alternative path offered at a branch point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    /// Range of positions making up the branch.
    pub path: BranchPath,
    /// Whether the learner has reached the end of this branch in this pass.
    pub is_completed: bool,
}

/// A dialog offering one or more branches, in authoring order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchPoint {
    /// The dialog offering the choice.
    pub root: Position,
    /// Offered branches.
    pub branches: Vec<Branch>,
}

/// Which branch a position lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BranchAssignment {
    /// Root of the owning branch point.
    pub root: Position,
    /// Index of the branch within its branch point.
    pub branch_index: usize,
}

/// Branch points of a quest plus the position-to-branch map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchRegistry {
    points: Vec<BranchPoint>,
    roots: HashMap<Position, usize>,
    map: HashMap<Position, BranchAssignment>,
}

impl BranchRegistry {
    /// Scans `quest` and registers every destination it declares. Rich text
    /// is resolved through `translator` before markers are extracted.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::MalformedBranchReference`,
    /// `NavigationError::BranchOutOfBounds` or
    /// `NavigationError::OverlappingBranch` on the first bad destination.
    pub fn build(quest: &Quest, translator: &dyn Translate) -> Result<Self, NavigationError> {
        let mut registry = Self::default();

        for (scene_index, scene) in quest.scenes.iter().enumerate() {
            for (dialog_index, dialog) in scene.dialogs.iter().enumerate() {
                let root = Position::new(scene_index, dialog_index);
                for path in &dialog.destinations {
                    registry.register(quest, root, *path)?;
                }
                let Some(key) = dialog.body_as_html.as_deref() else {
                    continue;
                };
                for reference in extract_destinations(translator.t(key)) {
                    let path = reference.parse::<BranchPath>().map_err(|error| {
                        malformed_reference(root, &reference, error)
                    })?;
                    registry.register(quest, root, path)?;
                }
            }
        }

        debug!(
            quest_id = %quest.id,
            branch_points = registry.points.len(),
            branched_positions = registry.map.len(),
            "built branch registry"
        );
        Ok(registry)
    }

    /// Registers `path` under the branch point rooted at `root`. A path
    /// already registered at that root is ignored.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::BranchOutOfBounds` if either endpoint lies
    /// outside `quest`, or `NavigationError::OverlappingBranch` if the range
    /// covers a position owned by another branch. The registry is unchanged
    /// on error.
    pub fn register(
        &mut self,
        quest: &Quest,
        root: Position,
        path: BranchPath,
    ) -> Result<(), NavigationError> {
        if !quest.contains(path.start()) || !quest.contains(path.end()) {
            return Err(NavigationError::BranchOutOfBounds { root, path });
        }
        if self
            .point(root)
            .is_some_and(|point| point.branches.iter().any(|b| b.path == path))
        {
            return Ok(());
        }

        let positions = quest.positions_in(&path);
        if let Some((position, existing)) = positions
            .iter()
            .find_map(|p| self.map.get(p).map(|assignment| (*p, *assignment)))
        {
            return Err(NavigationError::OverlappingBranch {
                position,
                path,
                existing: self.path_of(existing),
            });
        }

        let point_index = *self.roots.entry(root).or_insert_with(|| {
            self.points.push(BranchPoint {
                root,
                branches: Vec::new(),
            });
            self.points.len() - 1
        });
        let point = &mut self.points[point_index];
        let assignment = BranchAssignment {
            root,
            branch_index: point.branches.len(),
        };
        point.branches.push(Branch {
            path,
            is_completed: false,
        });
        self.map.extend(positions.into_iter().map(|p| (p, assignment)));
        Ok(())
    }

    /// Whether the quest declares any branch.
    #[must_use]
    pub fn has_branches(&self) -> bool {
        !self.points.is_empty()
    }

    /// Branch points in discovery order.
    #[must_use]
    pub fn branch_points(&self) -> &[BranchPoint] {
        &self.points
    }

    /// The branch point rooted at `root`.
    #[must_use]
    pub fn point(&self, root: Position) -> Option<&BranchPoint> {
        self.roots.get(&root).map(|&index| &self.points[index])
    }

    /// Which branch `position` lies on, if any.
    #[must_use]
    pub fn assignment(&self, position: Position) -> Option<BranchAssignment> {
        self.map.get(&position).copied()
    }

    /// The branch `position` lies on.
    #[must_use]
    pub fn branch(&self, position: Position) -> Option<&Branch> {
        let assignment = self.assignment(position)?;
        self.point(assignment.root)?
            .branches
            .get(assignment.branch_index)
    }

    /// Whether `position` is the last position of its branch.
    #[must_use]
    pub fn is_end_of_branch(&self, position: Position) -> bool {
        self.branch(position).is_some_and(|b| b.path.end() == position)
    }

    /// Marks the branch containing `position` completed. Returns the
    /// assignment only when the flag actually flipped.
    pub fn complete_branch(&mut self, position: Position) -> Option<BranchAssignment> {
        let assignment = self.assignment(position)?;
        let index = *self.roots.get(&assignment.root)?;
        let branch = self.points[index].branches.get_mut(assignment.branch_index)?;
        if branch.is_completed {
            return None;
        }
        branch.is_completed = true;
        Some(assignment)
    }

    /// Path of the first incomplete sibling of the branch containing
    /// `position`, in authoring order.
    #[must_use]
    pub fn next_branch(&self, position: Position) -> Option<BranchPath> {
        let assignment = self.assignment(position)?;
        self.point(assignment.root)?
            .branches
            .iter()
            .find(|b| !b.is_completed)
            .map(|b| b.path)
    }

    /// The greatest end position among the siblings of the branch containing
    /// `position`. Linear content resumes after it.
    #[must_use]
    pub fn highest_end(&self, position: Position) -> Option<Position> {
        let assignment = self.assignment(position)?;
        self.point(assignment.root)?
            .branches
            .iter()
            .map(|b| b.path.end())
            .max()
    }

    /// Number of scenes spanned by the siblings of the branch containing
    /// `position`, excluding that branch.
    #[must_use]
    pub fn other_branches_scene_count(&self, position: Position) -> usize {
        let Some(assignment) = self.assignment(position) else {
            return 0;
        };
        self.point(assignment.root).map_or(0, |point| {
            point
                .branches
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != assignment.branch_index)
                .map(|(_, b)| b.path.scene_span())
                .sum()
        })
    }

    /// Clears every completion flag. Topology is kept.
    pub fn reset(&mut self) {
        for branch in self.points.iter_mut().flat_map(|p| p.branches.iter_mut()) {
            branch.is_completed = false;
        }
    }

    fn path_of(&self, assignment: BranchAssignment) -> BranchPath {
        self.points[self.roots[&assignment.root]].branches[assignment.branch_index].path
    }
}

fn malformed_reference(root: Position, reference: &str, error: ContentError) -> NavigationError {
    let reason = match error {
        ContentError::MalformedBranchReference { reason, .. } => reason,
        other => other.to_string(),
    };
    NavigationError::MalformedBranchReference {
        root,
        reference: reference.to_owned(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questline_content::{IdentityTranslator, Translations};
    use questline_test_support::QuestBuilder;

    fn path(raw: &str) -> BranchPath {
        raw.parse().unwrap()
    }

    /// Root at (1,0) offering "1_1,2_0" and "3_0,3_1".
    fn branching_quest() -> Quest {
        QuestBuilder::new("branching")
            .scenes(&[1, 2, 1, 2, 2])
            .destination(Position::new(1, 0), "1_1,2_0")
            .destination(Position::new(1, 0), "3_0,3_1")
            .build()
    }

    #[test]
    fn test_build_registers_typed_destinations_in_authoring_order() {
        // Arrange
        let quest = branching_quest();

        // Act
        let registry = BranchRegistry::build(&quest, &IdentityTranslator).unwrap();

        // Assert
        assert!(registry.has_branches());
        let point = registry.point(Position::new(1, 0)).unwrap();
        assert_eq!(point.branches.len(), 2);
        assert_eq!(point.branches[0].path, path("1_1,2_0"));
        assert_eq!(point.branches[1].path, path("3_0,3_1"));
        assert_eq!(
            registry.assignment(Position::new(2, 0)),
            Some(BranchAssignment {
                root: Position::new(1, 0),
                branch_index: 0
            })
        );
        assert_eq!(registry.assignment(Position::new(4, 0)), None);
    }

    #[test]
    fn test_build_reads_translated_markers_and_dedupes_by_path() {
        // Arrange
        let quest = QuestBuilder::new("markers")
            .scenes(&[2, 2, 1])
            .body_as_html(Position::new(0, 1), "scenes.choice")
            .destination(Position::new(0, 1), "1_0,1_1")
            .build();
        let translations: Translations = [(
            "scenes.choice",
            "<button data-destination='1_0,1_1'>A</button><button data-destination='2_0,2_0'>B</button>",
        )]
        .into_iter()
        .collect();

        // Act
        let registry = BranchRegistry::build(&quest, &translations).unwrap();

        // Assert
        let point = registry.point(Position::new(0, 1)).unwrap();
        let paths: Vec<BranchPath> = point.branches.iter().map(|b| b.path).collect();
        assert_eq!(paths, vec![path("1_0,1_1"), path("2_0,2_0")]);
    }

    #[test]
    fn test_build_rejects_malformed_marker_with_root() {
        let quest = QuestBuilder::new("bad")
            .scenes(&[2])
            .body_as_html(Position::new(0, 0), "<button data-destination='1_1'>x</button>")
            .build();

        let result = BranchRegistry::build(&quest, &IdentityTranslator);

        match result {
            Err(NavigationError::MalformedBranchReference { root, reference, .. }) => {
                assert_eq!(root, Position::new(0, 0));
                assert_eq!(reference, "1_1");
            }
            other => panic!("expected MalformedBranchReference, got {other:?}"),
        }
    }

    #[test]
    fn test_build_rejects_out_of_bounds_destination() {
        let quest = QuestBuilder::new("oob")
            .scenes(&[1, 2])
            .destination(Position::new(0, 0), "1_0,1_5")
            .build();

        let result = BranchRegistry::build(&quest, &IdentityTranslator);

        assert!(matches!(result, Err(NavigationError::BranchOutOfBounds { .. })));
    }

    #[test]
    fn test_register_rejects_overlap_and_leaves_registry_unchanged() {
        // Arrange
        let quest = QuestBuilder::new("overlap").scenes(&[1, 2, 2]).build();
        let mut registry = BranchRegistry::default();
        registry
            .register(&quest, Position::new(0, 0), path("1_0,1_1"))
            .unwrap();
        let before = registry.clone();

        // Act
        let result = registry.register(&quest, Position::new(0, 0), path("1_1,2_1"));

        // Assert
        match result {
            Err(NavigationError::OverlappingBranch {
                position, existing, ..
            }) => {
                assert_eq!(position, Position::new(1, 1));
                assert_eq!(existing, path("1_0,1_1"));
            }
            other => panic!("expected OverlappingBranch, got {other:?}"),
        }
        assert_eq!(registry, before);
    }

    #[test]
    fn test_branch_map_positions_belong_to_exactly_one_branch() {
        let quest = branching_quest();
        let registry = BranchRegistry::build(&quest, &IdentityTranslator).unwrap();

        for scene_index in 0..quest.scene_count() {
            for dialog_index in 0..quest.scenes[scene_index].dialogs.len() {
                let position = Position::new(scene_index, dialog_index);
                let owners = registry
                    .branch_points()
                    .iter()
                    .flat_map(|p| p.branches.iter())
                    .filter(|b| b.path.contains(position))
                    .count();
                assert!(owners <= 1, "{position} owned by {owners} branches");
                assert_eq!(owners == 1, registry.assignment(position).is_some());
            }
        }
    }

    #[test]
    fn test_end_of_branch_queries() {
        let quest = branching_quest();
        let registry = BranchRegistry::build(&quest, &IdentityTranslator).unwrap();

        assert!(registry.is_end_of_branch(Position::new(2, 0)));
        assert!(registry.is_end_of_branch(Position::new(3, 1)));
        assert!(!registry.is_end_of_branch(Position::new(1, 1)));
        assert!(!registry.is_end_of_branch(Position::new(4, 1)));
        assert_eq!(
            registry.highest_end(Position::new(1, 1)),
            Some(Position::new(3, 1))
        );
        assert_eq!(registry.other_branches_scene_count(Position::new(2, 0)), 1);
        assert_eq!(registry.other_branches_scene_count(Position::new(3, 0)), 2);
        assert_eq!(registry.other_branches_scene_count(Position::new(0, 0)), 0);
    }

    #[test]
    fn test_complete_branch_is_idempotent_and_next_branch_skips_completed() {
        // Arrange
        let quest = branching_quest();
        let mut registry = BranchRegistry::build(&quest, &IdentityTranslator).unwrap();

        // Act
        let first = registry.complete_branch(Position::new(2, 0));
        let second = registry.complete_branch(Position::new(1, 1));

        // Assert
        assert!(first.is_some());
        assert_eq!(second, None);
        assert!(registry.branch(Position::new(2, 0)).unwrap().is_completed);
        assert_eq!(registry.next_branch(Position::new(2, 0)), Some(path("3_0,3_1")));

        registry.complete_branch(Position::new(3, 1));
        assert_eq!(registry.next_branch(Position::new(2, 0)), None);
    }

    #[test]
    fn test_reset_clears_flags_and_keeps_topology() {
        let quest = branching_quest();
        let mut registry = BranchRegistry::build(&quest, &IdentityTranslator).unwrap();
        registry.complete_branch(Position::new(2, 0));
        registry.complete_branch(Position::new(3, 1));

        registry.reset();

        assert!(registry
            .branch_points()
            .iter()
            .flat_map(|p| p.branches.iter())
            .all(|b| !b.is_completed));
        assert_eq!(registry.branch_points().len(), 1);
        assert!(registry.assignment(Position::new(3, 0)).is_some());
    }

    #[test]
    fn test_quest_without_destinations_has_no_branches() {
        let quest = QuestBuilder::new("linear").scenes(&[2, 1, 3]).build();

        let registry = BranchRegistry::build(&quest, &IdentityTranslator).unwrap();

        assert!(!registry.has_branches());
        assert!(!registry.is_end_of_branch(Position::new(0, 1)));
        assert_eq!(registry.next_branch(Position::new(0, 1)), None);
    }
}
