//! In-memory `ProgressStore` used by the engine tests.
//!
//! Implements the same idempotence contracts as the PostgreSQL store:
//! instance inserts deduplicate on `(challenge, day, template)`, unlock
//! inserts deduplicate on `(user, achievement)`, and the completion latch
//! flips at most once.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use stryv_core::achievement::{Achievement, RequirementType};
use stryv_core::challenge::Challenge;
use stryv_core::error::CoreError;
use stryv_core::ledger::{NewTaskInstance, TaskInstance};
use stryv_core::store::ProgressStore;
use stryv_core::template::{TaskTemplate, TemplateScope};
use stryv_core::types::{DbId, Timestamp};

struct StoredTemplate {
    template: TaskTemplate,
    archived: bool,
}

#[derive(Default)]
struct Inner {
    challenges: HashMap<DbId, Challenge>,
    templates: Vec<StoredTemplate>,
    instances: Vec<TaskInstance>,
    next_instance_id: DbId,
    achievements: Vec<Achievement>,
    unlocked: BTreeSet<(DbId, DbId)>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_challenge(&self, challenge: Challenge) {
        self.inner
            .lock()
            .unwrap()
            .challenges
            .insert(challenge.id, challenge);
    }

    pub fn add_template(&self, template: TaskTemplate) {
        self.inner.lock().unwrap().templates.push(StoredTemplate {
            template,
            archived: false,
        });
    }

    pub fn archive_template(&self, template_id: DbId) {
        let mut inner = self.inner.lock().unwrap();
        for stored in &mut inner.templates {
            if stored.template.id == template_id {
                stored.archived = true;
            }
        }
    }

    /// Drop a template entirely, leaving any instances dangling.
    pub fn forget_template(&self, template_id: DbId) {
        self.inner
            .lock()
            .unwrap()
            .templates
            .retain(|stored| stored.template.id != template_id);
    }

    pub fn add_achievement(&self, achievement: Achievement) {
        self.inner.lock().unwrap().achievements.push(achievement);
    }

    pub fn completion_shown(&self, challenge_id: DbId) -> bool {
        self.inner.lock().unwrap().challenges[&challenge_id].completion_shown
    }

    pub fn instance_count(&self) -> usize {
        self.inner.lock().unwrap().instances.len()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn task_templates(&self, scope: &TemplateScope) -> Result<Vec<TaskTemplate>, CoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .templates
            .iter()
            .filter(|stored| !stored.archived && stored.template.scope == *scope)
            .map(|stored| stored.template.clone())
            .collect())
    }

    async fn task_templates_by_ids(&self, ids: &[DbId]) -> Result<Vec<TaskTemplate>, CoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .templates
            .iter()
            .filter(|stored| ids.contains(&stored.template.id))
            .map(|stored| stored.template.clone())
            .collect())
    }

    async fn task_instances(
        &self,
        challenge_id: DbId,
        day_number: i32,
    ) -> Result<Vec<TaskInstance>, CoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .instances
            .iter()
            .filter(|i| i.challenge_id == challenge_id && i.day_number == day_number)
            .cloned()
            .collect())
    }

    async fn challenge_task_instances(
        &self,
        challenge_id: DbId,
    ) -> Result<Vec<TaskInstance>, CoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .instances
            .iter()
            .filter(|i| i.challenge_id == challenge_id)
            .cloned()
            .collect())
    }

    async fn insert_task_instances(
        &self,
        instances: &[NewTaskInstance],
    ) -> Result<(), CoreError> {
        let mut inner = self.inner.lock().unwrap();
        for new in instances {
            let duplicate = inner.instances.iter().any(|existing| {
                existing.challenge_id == new.challenge_id
                    && existing.day_number == new.day_number
                    && existing.template_id == new.template_id
            });
            if duplicate {
                continue;
            }
            inner.next_instance_id += 1;
            let id = inner.next_instance_id;
            inner.instances.push(TaskInstance {
                id,
                challenge_id: new.challenge_id,
                template_id: new.template_id,
                day_number: new.day_number,
                completed: false,
                completed_at: None,
            });
        }
        Ok(())
    }

    async fn set_task_completion(
        &self,
        instance_id: DbId,
        completed: bool,
        completed_at: Option<Timestamp>,
    ) -> Result<TaskInstance, CoreError> {
        let mut inner = self.inner.lock().unwrap();
        let instance = inner
            .instances
            .iter_mut()
            .find(|i| i.id == instance_id)
            .ok_or(CoreError::NotFound {
                entity: "task_instance",
                id: instance_id,
            })?;
        instance.completed = completed;
        instance.completed_at = completed_at;
        Ok(instance.clone())
    }

    async fn challenge(&self, challenge_id: DbId) -> Result<Challenge, CoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .challenges
            .get(&challenge_id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "challenge",
                id: challenge_id,
            })
    }

    async fn mark_completion_shown(&self, challenge_id: DbId) -> Result<bool, CoreError> {
        let mut inner = self.inner.lock().unwrap();
        let challenge = inner
            .challenges
            .get_mut(&challenge_id)
            .ok_or(CoreError::NotFound {
                entity: "challenge",
                id: challenge_id,
            })?;
        if challenge.completion_shown {
            return Ok(false);
        }
        challenge.completion_shown = true;
        Ok(true)
    }

    async fn achievement_catalog(&self) -> Result<Vec<Achievement>, CoreError> {
        Ok(self.inner.lock().unwrap().achievements.clone())
    }

    async fn unlocked_achievement_ids(&self, user_id: DbId) -> Result<HashSet<DbId>, CoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .unlocked
            .iter()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, achievement)| *achievement)
            .collect())
    }

    async fn insert_unlocked_achievement(
        &self,
        user_id: DbId,
        achievement_id: DbId,
        _unlocked_at: Timestamp,
    ) -> Result<bool, CoreError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.unlocked.insert((user_id, achievement_id)))
    }
}

// ---------------------------------------------------------------------------
// Fixture builders
// ---------------------------------------------------------------------------

pub fn challenge(id: DbId, user_id: DbId, start: NaiveDate, total_days: i32) -> Challenge {
    Challenge {
        id,
        user_id,
        group_id: None,
        start_date: start,
        total_days,
        is_active: true,
        completion_shown: false,
    }
}

pub fn template(id: DbId, name: &str, weight: i32, scope: TemplateScope) -> TaskTemplate {
    TaskTemplate {
        id,
        name: name.to_string(),
        description: None,
        weight,
        scope,
    }
}

pub fn achievement(
    id: DbId,
    name: &str,
    requirement_type: RequirementType,
    requirement_value: i64,
) -> Achievement {
    Achievement {
        id,
        name: name.to_string(),
        description: None,
        requirement_type,
        requirement_value,
        points: 10,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32) -> Timestamp {
    use chrono::TimeZone;
    chrono::Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}
