use serde::{Deserialize, Serialize};

/// A person who can be made responsible for a node.
///
/// People come from an external roster; the planner only references them by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Find a person in a roster by id.
pub fn find_person<'a>(roster: &'a [Person], id: &str) -> Option<&'a Person> {
    roster.iter().find(|p| p.id == id)
}
