use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// A person enrolled at the institution.
///
/// Identity is the `id` alone: two students with the same id are equal even
/// when every other field differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Case-sensitive, immutable once created
    pub id: String,

    pub name: String,

    pub email: String,

    pub date_of_birth: NaiveDate,

    /// Undergraduate or graduate (with thesis)
    pub kind: StudentKind,

    /// course_id -> grade, one entry per graded course
    #[serde(default)]
    grades: BTreeMap<String, f64>,
}

/// Academic level. A graduate student always carries a thesis title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum StudentKind {
    Undergraduate,
    Graduate { thesis_title: String },
}

impl Student {
    pub fn undergraduate(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            date_of_birth,
            kind: StudentKind::Undergraduate,
            grades: BTreeMap::new(),
        }
    }

    pub fn graduate(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        date_of_birth: NaiveDate,
        thesis_title: impl Into<String>,
    ) -> Self {
        Self {
            kind: StudentKind::Graduate {
                thesis_title: thesis_title.into(),
            },
            ..Self::undergraduate(id, name, email, date_of_birth)
        }
    }

    /// Factory choosing the variant: a non-blank thesis title makes a graduate.
    pub fn create(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        date_of_birth: NaiveDate,
        thesis_title: Option<String>,
    ) -> Self {
        match thesis_title {
            Some(thesis) if !thesis.trim().is_empty() => {
                Self::graduate(id, name, email, date_of_birth, thesis)
            }
            _ => Self::undergraduate(id, name, email, date_of_birth),
        }
    }

    pub fn thesis_title(&self) -> Option<&str> {
        match &self.kind {
            StudentKind::Graduate { thesis_title } => Some(thesis_title),
            StudentKind::Undergraduate => None,
        }
    }

    pub fn is_graduate(&self) -> bool {
        matches!(self.kind, StudentKind::Graduate { .. })
    }

    pub fn set_grade(&mut self, course_id: impl Into<String>, grade: f64) {
        self.grades.insert(course_id.into(), grade);
    }

    pub fn grade(&self, course_id: &str) -> Option<f64> {
        self.grades.get(course_id).copied()
    }

    pub fn grades(&self) -> &BTreeMap<String, f64> {
        &self.grades
    }
}

impl PartialEq for Student {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Student {}

impl Hash for Student {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Student[id={},name={},email={},dob={}]",
            self.id, self.name, self.email, self.date_of_birth
        )?;
        if let Some(thesis) = self.thesis_title() {
            write!(f, " thesis={}", thesis)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(2002, 5, 1).unwrap()
    }

    #[test]
    fn factory_picks_graduate_only_for_non_blank_thesis() {
        let grad = Student::create("G001", "Carol", "carol@example.com", dob(), Some("Quantum".into()));
        assert!(grad.is_graduate());
        assert_eq!(grad.thesis_title(), Some("Quantum"));

        let blank = Student::create("S001", "Alice", "alice@example.com", dob(), Some("   ".into()));
        assert!(!blank.is_graduate());

        let none = Student::create("S002", "Bob", "bob@example.com", dob(), None);
        assert_eq!(none.kind, StudentKind::Undergraduate);
    }

    #[test]
    fn equality_and_hash_use_id_only() {
        let a = Student::undergraduate("S001", "Alice", "alice@example.com", dob());
        let b = Student::graduate("S001", "Other", "other@example.com", dob(), "Thesis");
        let c = Student::undergraduate("s001", "Alice", "alice@example.com", dob());

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Student> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn grade_map_keeps_latest_value_per_course() {
        let mut s = Student::undergraduate("S001", "Alice", "alice@example.com", dob());
        assert_eq!(s.grade("C101"), None);

        s.set_grade("C101", 70.0);
        s.set_grade("C101", 88.5);
        s.set_grade("C102", 91.0);

        assert_eq!(s.grade("C101"), Some(88.5));
        assert_eq!(s.grades().len(), 2);
    }
}
