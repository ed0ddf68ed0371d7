use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_ROLE: &str = "Siswa";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
}

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
        }
    }

    /// Case-insensitive name comparison, ignoring surrounding whitespace.
    pub fn name_matches(&self, name: &str) -> bool {
        names_equal(&self.name, name)
    }
}

pub fn names_equal(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<Student>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn contains(&self, student_id: &str) -> bool {
        self.members.iter().any(|m| m.id == student_id)
    }
}

/// The persisted site document. Other parts of the site store their own keys
/// in the same blob, so unknown fields are tolerated and missing ones default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteState {
    pub class_name: String,
    pub students: Vec<Student>,
    pub groups: Vec<Group>,
    /// Keys owned by other parts of the site, written back untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SiteState {
    pub fn find_student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }
}

/// Slot index within the group being built -> anchor name.
pub type ReservedSlotMap = BTreeMap<usize, String>;

/// Students drawn so far for the group being assembled, in slot order.
pub type DrawBuffer = Vec<Student>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matching_ignores_case_and_padding() {
        let s = Student::new("1", "Rizky Ramadhan", DEFAULT_ROLE);
        assert!(s.name_matches("rizky ramadhan"));
        assert!(s.name_matches("  RIZKY RAMADHAN "));
        assert!(!s.name_matches("Rizky"));
    }

    #[test]
    fn test_site_state_tolerates_foreign_keys() {
        let json = r#"{
            "className": "X TJKT 2",
            "students": [{"id": "s1", "name": "Ayu", "role": "Siswa"}],
            "gallery": [{"url": "a.png"}],
            "announcements": []
        }"#;

        let mut state: SiteState = serde_json::from_str(json).unwrap();
        assert_eq!(state.class_name, "X TJKT 2");
        assert_eq!(state.students.len(), 1);
        assert!(state.groups.is_empty());
        assert!(state.extra.contains_key("gallery"));

        state.students.push(Student::new("s2", "Bima", DEFAULT_ROLE));
        let saved = serde_json::to_value(&state).unwrap();
        assert_eq!(saved["gallery"][0]["url"], "a.png");
        assert!(saved["announcements"].as_array().unwrap().is_empty());
        assert!(saved.get("extra").is_none());

        let reloaded: SiteState = serde_json::from_value(saved).unwrap();
        assert_eq!(reloaded, state);
    }

    #[test]
    fn test_group_serializes_camel_case() {
        let group = Group {
            id: "g1".into(),
            name: "Group 1".into(),
            members: vec![Student::new("s1", "Ayu", DEFAULT_ROLE)],
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&group).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(group.contains("s1"));
        assert!(!group.contains("s2"));
    }
}
