use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Consumed only by the policy caller (the chat/AI layer) -- the Store
/// still owns CRUD for both, since the policy caller is just another
/// client of the operation surface.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Guideline {
    pub id: i64,
    pub rule: String,
    pub priority: i64,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct MemoryFact {
    pub category: String,
    pub key: String,
    pub value: String,
}
