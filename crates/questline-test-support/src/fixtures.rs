//! Quest fixtures.

use questline_content::{Background, BranchPath, Dialog, Position, Quest, Scene, SceneType};

/// Builds quests by shape: one scene per entry, each with that many dialogs.
///
/// ```
/// use questline_content::Position;
/// use questline_test_support::QuestBuilder;
///
/// let quest = QuestBuilder::new("demo")
///     .scenes(&[2, 1])
///     .skip_navigation(Position::new(0, 1))
///     .build();
/// assert_eq!(quest.dialog_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct QuestBuilder {
    quest: Quest,
}

impl QuestBuilder {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            quest: Quest {
                id: id.to_owned(),
                title: format!("{id}.title"),
                scenes: Vec::new(),
            },
        }
    }

    /// Appends scenes with the given dialog counts.
    #[must_use]
    pub fn scenes(mut self, shape: &[usize]) -> Self {
        for &dialogs in shape {
            let scene_index = self.quest.scenes.len();
            self.quest.scenes.push(Scene {
                name: Some(format!("scenesList.scene_{}", scene_index + 1)),
                scene_type: SceneType::OneAtATime,
                background: Background {
                    url: format!("/assets/backgrounds/bg{}.webp", scene_index + 1),
                    alt: None,
                },
                dialogs: (0..dialogs)
                    .map(|dialog_index| Dialog {
                        heading: format!("scenes.s{scene_index}.d{dialog_index}.heading"),
                        ..Dialog::default()
                    })
                    .collect(),
            });
        }
        self
    }

    /// Marks the dialog at `position` as a non-stopping dialog.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not part of the quest built so far.
    #[must_use]
    pub fn skip_navigation(mut self, position: Position) -> Self {
        self.dialog_mut(position).skip_navigation = true;
        self
    }

    /// Adds a typed destination to the dialog at `root`.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not part of the quest or `path` does not parse.
    #[must_use]
    pub fn destination(mut self, root: Position, path: &str) -> Self {
        let path: BranchPath = path.parse().expect("fixture branch path must parse");
        self.dialog_mut(root).destinations.push(path);
        self
    }

    /// Sets the rich body of the dialog at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not part of the quest built so far.
    #[must_use]
    pub fn body_as_html(mut self, position: Position, text: &str) -> Self {
        self.dialog_mut(position).body_as_html = Some(text.to_owned());
        self
    }

    #[must_use]
    pub fn build(self) -> Quest {
        self.quest
    }

    fn dialog_mut(&mut self, position: Position) -> &mut Dialog {
        self.quest
            .scenes
            .get_mut(position.scene_index)
            .and_then(|scene| scene.dialogs.get_mut(position.dialog_index))
            .unwrap_or_else(|| panic!("fixture position {position} is outside the quest"))
    }
}

/// Five scenes shaped `[1, 2, 1, 2, 2]` with a branch point at `(1,0)`
/// offering `1_1,2_0` and `3_0,3_1`. Linear content resumes at `(4,0)`.
/// Returns the quest and the branch root.
#[must_use]
pub fn branching_quest() -> (Quest, Position) {
    let root = Position::new(1, 0);
    let quest = QuestBuilder::new("branching")
        .scenes(&[1, 2, 1, 2, 2])
        .destination(root, "1_1,2_0")
        .destination(root, "3_0,3_1")
        .build();
    (quest, root)
}
