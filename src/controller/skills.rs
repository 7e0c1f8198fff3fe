use super::CollectionController;
use crate::models::{group_by_category, Skill, SkillGroup};

pub type SkillsController = CollectionController<Skill>;

impl CollectionController<Skill> {
    /// Mirror grouped by category, groups in first-seen order
    pub fn groups(&self) -> Vec<SkillGroup> {
        group_by_category(self.items())
    }
}
