use serde::{Deserialize, Serialize};

use super::{Entity, Record, RecordError};
use crate::error::{AdminError, AdminResult};
use crate::gateway::OrderBy;
use crate::types::{Collection, RecordId};

pub const MIN_PROFICIENCY: i64 = 0;
pub const MAX_PROFICIENCY: i64 = 100;
const DEFAULT_PROFICIENCY: i64 = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub proficiency: i64,
    pub order_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillForm {
    pub name: String,
    pub category: String,
    pub proficiency: i64,
    pub order_index: i64,
}

impl Default for SkillForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            proficiency: DEFAULT_PROFICIENCY,
            order_index: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillPayload {
    pub name: String,
    pub category: String,
    pub proficiency: i64,
    pub order_index: i64,
}

impl Entity for Skill {
    type Form = SkillForm;
    type Payload = SkillPayload;

    const COLLECTION: Collection = Collection::Skills;
    const LABEL: &'static str = "Skill";

    fn order() -> Vec<OrderBy> {
        vec![OrderBy::asc("category"), OrderBy::asc("order_index")]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        let id = record.id()?;
        let raw = record.require_i64("proficiency")?;
        let proficiency = raw.clamp(MIN_PROFICIENCY, MAX_PROFICIENCY);
        if proficiency != raw {
            tracing::warn!("Skill {} has proficiency {} outside 0-100, clamped to {}", id, raw, proficiency);
        }

        Ok(Self {
            id,
            name: record.require_str("name")?,
            category: record.require_str("category")?,
            proficiency,
            order_index: record.opt_i64("order_index")?.unwrap_or(0),
        })
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_form(&self) -> SkillForm {
        SkillForm {
            name: self.name.clone(),
            category: self.category.clone(),
            proficiency: self.proficiency,
            order_index: self.order_index,
        }
    }

    fn payload(form: &SkillForm) -> AdminResult<SkillPayload> {
        if form.name.trim().is_empty() {
            return Err(AdminError::validation("Skill name is required"));
        }
        if form.category.trim().is_empty() {
            return Err(AdminError::validation("Category is required"));
        }
        if !(MIN_PROFICIENCY..=MAX_PROFICIENCY).contains(&form.proficiency) {
            return Err(AdminError::validation(format!(
                "Proficiency must be between {} and {}, got {}",
                MIN_PROFICIENCY, MAX_PROFICIENCY, form.proficiency
            )));
        }

        Ok(SkillPayload {
            name: form.name.clone(),
            category: form.category.clone(),
            proficiency: form.proficiency,
            order_index: form.order_index,
        })
    }
}

/// Skills sharing one category label, in fetched order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<Skill>,
}

/// Partition skills by category. Categories appear in first-seen order and
/// members keep their input order. Derived on demand, never stored.
pub fn group_by_category(skills: &[Skill]) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();
    for skill in skills {
        match groups.iter_mut().find(|g| g.category == skill.category) {
            Some(group) => group.skills.push(skill.clone()),
            None => groups.push(SkillGroup {
                category: skill.category.clone(),
                skills: vec![skill.clone()],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn skill(id: &str, category: &str, order_index: i64) -> Skill {
        Skill {
            id: RecordId::new(id),
            name: format!("skill {}", id),
            category: category.to_string(),
            proficiency: 50,
            order_index,
        }
    }

    #[test]
    fn groups_in_first_seen_order() {
        let skills = vec![
            skill("1", "Backend", 0),
            skill("2", "Frontend", 0),
            skill("3", "Backend", 1),
            skill("4", "Tools", 0),
            skill("5", "Frontend", 1),
        ];
        let groups = group_by_category(&skills);

        let categories: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, vec!["Backend", "Frontend", "Tools"]);

        let backend: Vec<&str> = groups[0].skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(backend, vec!["1", "3"]);
        let frontend: Vec<&str> = groups[1].skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(frontend, vec!["2", "5"]);
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(group_by_category(&[]).is_empty());
    }

    #[test]
    fn payload_rejects_out_of_range_proficiency() {
        let mut form = SkillForm {
            name: "Rust".to_string(),
            category: "Backend".to_string(),
            ..Default::default()
        };
        assert_eq!(form.proficiency, 80);
        assert!(Skill::payload(&form).is_ok());

        form.proficiency = 101;
        assert!(matches!(Skill::payload(&form), Err(AdminError::Validation(_))));
        form.proficiency = -1;
        assert!(matches!(Skill::payload(&form), Err(AdminError::Validation(_))));
        form.proficiency = 100;
        assert_eq!(Skill::payload(&form).unwrap().proficiency, 100);
    }

    #[test]
    fn payload_requires_name_and_category() {
        let form = SkillForm { category: "Backend".to_string(), ..Default::default() };
        assert!(Skill::payload(&form).is_err());
        let form = SkillForm { name: "Rust".to_string(), ..Default::default() };
        assert!(Skill::payload(&form).is_err());
    }

    #[test]
    fn ingest_clamps_stored_proficiency() {
        let record = Record::from_json(json!({
            "id": "s1", "name": "Rust", "category": "Backend", "proficiency": 140
        }))
        .unwrap();
        let skill = Skill::from_record(&record).unwrap();
        assert_eq!(skill.proficiency, 100);
        assert_eq!(skill.order_index, 0);
    }
}
