use crate::config::subject_code_is_valid;
use crate::error::{CoreError, CoreResult};
use crate::models::{Subject, SubjectType};

use super::Store;

impl Store {
    pub async fn create_subject(
        &self,
        user_id: i64,
        code: &str,
        name: &str,
        credits: i64,
        subject_type: SubjectType,
        color: Option<&str>,
    ) -> CoreResult<Subject> {
        if !subject_code_is_valid(code) {
            return Err(CoreError::validation(format!("invalid subject code: {code}")));
        }
        if !(1..=6).contains(&credits) {
            return Err(CoreError::validation("credits must be between 1 and 6"));
        }

        let subject = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (user_id, code, name, credits, subject_type, color)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(user_id)
        .bind(code)
        .bind(name)
        .bind(credits)
        .bind(subject_type)
        .bind(color)
        .fetch_one(self.pool())
        .await?;

        Ok(subject)
    }

    pub async fn get_subject(&self, code: &str) -> CoreResult<Subject> {
        sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE code = ?")
            .bind(code)
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    pub async fn list_subjects(&self, user_id: i64) -> CoreResult<Vec<Subject>> {
        sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE user_id = ? ORDER BY code")
            .bind(user_id)
            .fetch_all(self.pool())
            .await
            .map_err(Into::into)
    }
}
