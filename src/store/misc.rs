use crate::error::CoreResult;
use crate::models::{Guideline, MemoryFact};

use super::Store;

impl Store {
    pub async fn create_guideline(&self, rule: &str, priority: i64) -> CoreResult<Guideline> {
        sqlx::query_as::<_, Guideline>(
            "INSERT INTO guidelines (rule, priority) VALUES (?, ?) RETURNING *",
        )
        .bind(rule)
        .bind(priority)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn active_guidelines(&self) -> CoreResult<Vec<Guideline>> {
        sqlx::query_as::<_, Guideline>(
            "SELECT * FROM guidelines WHERE active = 1 ORDER BY priority DESC",
        )
        .fetch_all(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn set_memory_fact(&self, category: &str, key: &str, value: &str) -> CoreResult<MemoryFact> {
        sqlx::query_as::<_, MemoryFact>(
            "INSERT INTO memory_facts (category, key, value) VALUES (?, ?, ?)
             ON CONFLICT(category, key) DO UPDATE SET value = excluded.value
             RETURNING *",
        )
        .bind(category)
        .bind(key)
        .bind(value)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn memory_facts_by_category(&self, category: &str) -> CoreResult<Vec<MemoryFact>> {
        sqlx::query_as::<_, MemoryFact>("SELECT * FROM memory_facts WHERE category = ?")
            .bind(category)
            .fetch_all(self.pool())
            .await
            .map_err(Into::into)
    }
}
