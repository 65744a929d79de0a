use std::fmt;

use serde::{Deserialize, Serialize};

/// Grade levels a member can belong to.
pub const GRADES: [i32; 4] = [9, 10, 11, 12];

/// Subteam filter value meaning "member has no subteam assigned".
pub const NO_SUBTEAM: &str = "None";

/// Subteams offered when the configuration does not provide its own list.
pub const DEFAULT_SUBTEAMS: [&str; 6] = [
    "Finance",
    "Marketing",
    "Business Administration",
    "Principles",
    "Hospitality & Tourism",
    "Writtens",
];

/// A single roster entry.
///
/// String fields are trimmed by the constructors only; the setters store
/// their argument as given. Equality compares all six fields exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Member {
    #[serde(rename = "First Name")]
    first_name: String,
    #[serde(rename = "Last Name")]
    last_name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Grade")]
    grade: i32,
    #[serde(rename = "Subteam")]
    subteam: String,
    #[serde(rename = "Event ID")]
    event_id: String,
}

impl Member {
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: &str,
        grade: i32,
        subteam: &str,
        event_id: &str,
    ) -> Self {
        Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: email.trim().to_string(),
            grade,
            subteam: subteam.trim().to_string(),
            event_id: event_id.trim().to_string(),
        }
    }

    /// Member without a subteam or event yet.
    pub fn with_contact(first_name: &str, last_name: &str, email: &str, grade: i32) -> Self {
        Self::new(first_name, last_name, email, grade, "", "")
    }

    /// Member known only by name; grade is 0 and everything else is empty.
    pub fn named(first_name: &str, last_name: &str) -> Self {
        Self::with_contact(first_name, last_name, "", 0)
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn grade(&self) -> i32 {
        self.grade
    }

    pub fn subteam(&self) -> &str {
        &self.subteam
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn full_name_last_first(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }

    /// Text matched by roster search: name, email and event.
    pub fn search_string(&self) -> String {
        format!(
            "{} {} {} {}",
            self.first_name, self.last_name, self.email, self.event_id
        )
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_grade(&mut self, grade: i32) {
        self.grade = grade;
    }

    pub fn set_subteam(&mut self, subteam: impl Into<String>) {
        self.subteam = subteam.into();
    }

    pub fn set_event_id(&mut self, event_id: impl Into<String>) {
        self.event_id = event_id.into();
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// Ordering of the roster. Also decides which name the delete lookup
/// binary-searches on, so sorting and lookup always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    FirstName,
    LastName,
}

impl SortOrder {
    /// Key the roster is sorted by.
    pub fn sort_key(&self, member: &Member) -> String {
        match self {
            SortOrder::FirstName => member.full_name(),
            SortOrder::LastName => member.full_name_last_first(),
        }
    }

    /// Name compared during the delete lookup.
    pub fn lookup_name<'a>(&self, member: &'a Member) -> &'a str {
        match self {
            SortOrder::FirstName => member.first_name(),
            SortOrder::LastName => member.last_name(),
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            SortOrder::FirstName => SortOrder::LastName,
            SortOrder::LastName => SortOrder::FirstName,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::FirstName => write!(f, "First name"),
            SortOrder::LastName => write!(f, "Last name"),
        }
    }
}
