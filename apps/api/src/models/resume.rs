//! Resume Data Model: the canonical snapshot handed to every renderer.
//!
//! Pure data. Field names follow the browser client's camelCase wire format.
//! Snapshots are replaced wholesale, never patched in place, so two states can be
//! compared by value (`PartialEq`).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::presets::default_styling;

// ────────────────────────────────────────────────────────────────────────────
// Identifiers
// ────────────────────────────────────────────────────────────────────────────

/// Opaque, stable identifier of an entry within its collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    /// Issues a fresh identifier. Never reused. Entries arriving without an id get one.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Content
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalDetails {
    pub name: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub linkedin: String,
    pub github: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(default = "EntryId::generate")]
    pub id: EntryId,
    pub university: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: String,
    pub coursework: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    #[serde(default = "EntryId::generate")]
    pub id: EntryId,
    pub role: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(default = "EntryId::generate")]
    pub id: EntryId,
    pub name: String,
    pub url: String,
    pub description: String,
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSection {
    #[serde(default = "EntryId::generate")]
    pub id: EntryId,
    pub title: String,
    pub content: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    #[serde(default = "EntryId::generate")]
    pub id: EntryId,
    pub category: String,
    pub skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Section ordering keys
// ────────────────────────────────────────────────────────────────────────────

/// A logical section that can appear in `sectionOrder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    Experience,
    Education,
    Projects,
    Skills,
    CustomSections,
}

impl SectionKey {
    /// Template default order.
    pub const ALL: [SectionKey; 5] = [
        SectionKey::Experience,
        SectionKey::Education,
        SectionKey::Projects,
        SectionKey::Skills,
        SectionKey::CustomSections,
    ];

    /// Fixed section title. Custom sections are titled by their own `title` field.
    pub fn title(self) -> Option<&'static str> {
        match self {
            SectionKey::Experience => Some("Experience"),
            SectionKey::Education => Some("Education"),
            SectionKey::Projects => Some("Projects"),
            SectionKey::Skills => Some("Skills"),
            SectionKey::CustomSections => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Experience => "experience",
            SectionKey::Education => "education",
            SectionKey::Projects => "projects",
            SectionKey::Skills => "skills",
            SectionKey::CustomSections => "customSections",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_section_order() -> Vec<SectionKey> {
    SectionKey::ALL.to_vec()
}

// ────────────────────────────────────────────────────────────────────────────
// Styling
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl<'de> Deserialize<'de> for FontWeight {
    /// Anything other than `"bold"` is treated as the regular weight.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().eq_ignore_ascii_case("bold") {
            Ok(FontWeight::Bold)
        } else {
            Ok(FontWeight::Normal)
        }
    }
}

/// Typography for one style role.
///
/// `size` is in points. It is `None` when the client sent something that is not a
/// number; Style Resolution substitutes the role default in that case.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontStyle {
    pub family: String,
    #[serde(deserialize_with = "lenient_number")]
    pub size: Option<f32>,
    pub color: String,
    pub weight: FontWeight,
}

impl FontStyle {
    pub fn new(family: &str, size: f32, color: &str, weight: FontWeight) -> Self {
        Self {
            family: family.to_string(),
            size: Some(size),
            color: color.to_string(),
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylingOptions {
    /// Body text.
    pub font: FontStyle,
    /// The name in the header.
    pub heading: FontStyle,
    /// Role, university and project names.
    pub subheading: FontStyle,
    /// "Experience", "Education", ...
    pub section_title: FontStyle,
    #[serde(deserialize_with = "lenient_number")]
    pub line_height: Option<f32>,
}

impl Default for StylingOptions {
    fn default() -> Self {
        default_styling()
    }
}

/// Accepts a JSON number or a numeric string; anything else becomes `None`.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().map(|v| v as f32),
        serde_json::Value::String(s) => s.trim().parse::<f32>().ok(),
        _ => None,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub personal_details: PersonalDetails,
    pub summary: String,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub custom_sections: Vec<CustomSection>,
    pub skills: Vec<Skill>,
    pub section_order: Vec<SectionKey>,
    pub styling: StylingOptions,
}

impl Default for ResumeData {
    /// An empty resume with the template's styling and section order.
    fn default() -> Self {
        Self {
            personal_details: PersonalDetails::default(),
            summary: String::new(),
            education: Vec::new(),
            experience: Vec::new(),
            projects: Vec::new(),
            custom_sections: Vec::new(),
            skills: Vec::new(),
            section_order: default_section_order(),
            styling: StylingOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("personalDetails.name is required")]
    MissingName,

    #[error("sectionOrder lists '{0}' more than once")]
    DuplicateSection(SectionKey),
}

impl ResumeData {
    /// Checks the structural invariants a renderer relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.personal_details.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        self.validate_section_order()
    }

    /// Each section key may appear at most once.
    pub fn validate_section_order(&self) -> Result<(), ValidationError> {
        let mut seen = Vec::with_capacity(self.section_order.len());
        for key in &self.section_order {
            if seen.contains(key) {
                return Err(ValidationError::DuplicateSection(*key));
            }
            seen.push(*key);
        }
        Ok(())
    }
}
