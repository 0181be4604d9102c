use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A course students can enroll in. Equality is by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub credits: u32,
}

impl Course {
    pub fn new(id: impl Into<String>, name: impl Into<String>, credits: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            credits,
        }
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Course {}

impl Hash for Course {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Course[id={},name={},credits={}]",
            self.id, self.name, self.credits
        )
    }
}
