use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A student as returned by the backend's student listing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<GroupRef>,
}

/// An enrollment entry: either a bare group name or a `{ id, name }` object.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GroupRef {
    Name(String),
    Group {
        #[serde(default)]
        id: Option<i64>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl GroupRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            GroupRef::Name(name) => Some(name.as_str()),
            GroupRef::Group { name, .. } => name.as_deref(),
        }
    }
}

impl Student {
    pub fn new(id: i64, full_name: &str) -> Self {
        Self {
            id,
            full_name: full_name.to_string(),
            phone: None,
            email: None,
            active: None,
            group_name: None,
            groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, name: &str) -> Self {
        self.groups.push(GroupRef::Name(name.to_string()));
        self
    }

    /// Name to show in tables; falls back to the id when the backend sent none.
    pub fn display_name(&self) -> String {
        let name = self.full_name.trim();
        if name.is_empty() {
            format!("Student #{}", self.id)
        } else {
            name.to_string()
        }
    }

    /// Group names in enrollment order, `groupName` first, without duplicates.
    pub fn group_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let candidates = self
            .group_name
            .as_deref()
            .into_iter()
            .chain(self.groups.iter().filter_map(GroupRef::name));

        for name in candidates {
            let name = name.trim();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.group_names()
            .iter()
            .any(|name| name.eq_ignore_ascii_case(group.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_group_name_and_mixed_groups() {
        let json = r#"{
            "id": 7,
            "fullName": "Aziza Karimova",
            "phone": "+998901234567",
            "groupName": "Math A",
            "groups": ["Math A", {"id": 3, "name": "English B"}, {"id": 4}]
        }"#;
        let student: Student = serde_json::from_str(json).unwrap();

        assert_eq!(student.display_name(), "Aziza Karimova");
        assert_eq!(student.group_names(), vec!["Math A", "English B"]);
        assert!(student.in_group("english b"));
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let json = r#"{"id": 9, "fullName": null, "groups": null}"#;
        let student: Student = serde_json::from_str(json).unwrap();

        assert_eq!(student.display_name(), "Student #9");
        assert!(student.group_names().is_empty());
    }

    #[test]
    fn missing_id_is_rejected() {
        let json = r#"{"fullName": "No Id"}"#;
        assert!(serde_json::from_str::<Student>(json).is_err());
    }
}
