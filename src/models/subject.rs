use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::sql_enum::sqlite_str_enum;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    PracticeHeavy,
    ConceptHeavy,
}

sqlite_str_enum!(SubjectType {
    PracticeHeavy => "practice_heavy",
    ConceptHeavy => "concept_heavy",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Subject {
    pub id: i64,
    pub user_id: i64,
    pub code: String,
    pub name: String,
    pub credits: i64,
    pub subject_type: SubjectType,
    pub color: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_type_serde_roundtrip() {
        let json = serde_json::to_string(&SubjectType::ConceptHeavy).unwrap();
        assert_eq!(json, "\"concept_heavy\"");
        let parsed: SubjectType = serde_json::from_str("\"practice_heavy\"").unwrap();
        assert_eq!(parsed, SubjectType::PracticeHeavy);
    }
}
