//! Section Ordering & Filtering: the one place that decides what a resume shows.
//!
//! `ResumeOutline::build` turns a `ResumeData` snapshot into a renderer-agnostic outline:
//! blank entries dropped, sub-field lists cleaned, sections placed in `sectionOrder`.
//! The PDF, DOCX, LaTeX and preview renderers only ever read the outline, so they
//! cannot disagree about which sections and entries exist.

use serde::Serialize;

use crate::models::resume::{
    CustomSection, Education, Experience, PersonalDetails, Project, ResumeData, SectionKey, Skill,
};

pub const SUMMARY_TITLE: &str = "Summary";
pub const CONTACT_SEPARATOR: &str = " | ";
/// Joins an entry title to its detail: "Role, Company — Location".
pub const DETAIL_SEPARATOR: &str = ", ";
/// Joins company and location inside an experience detail.
pub const LOCATION_SEPARATOR: &str = " \u{2014} ";
/// Unicode en dash with surrounding spaces. LaTeX uses `--` instead.
pub const DATE_SEPARATOR: &str = " \u{2013} ";

// ────────────────────────────────────────────────────────────────────────────
// Visibility predicates
// ────────────────────────────────────────────────────────────────────────────

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn trimmed(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Drops blank and whitespace-only strings, trimming the rest.
pub fn non_blank(items: &[String]) -> Vec<String> {
    items.iter().filter_map(|s| trimmed(s)).collect()
}

pub fn experience_is_visible(entry: &Experience) -> bool {
    !is_blank(&entry.role)
}

pub fn education_is_visible(entry: &Education) -> bool {
    !is_blank(&entry.university)
}

pub fn project_is_visible(entry: &Project) -> bool {
    !is_blank(&entry.name)
}

pub fn custom_section_is_visible(entry: &CustomSection) -> bool {
    !is_blank(&entry.title)
}

pub fn skill_group_is_visible(entry: &Skill) -> bool {
    entry.skills.iter().any(|s| !is_blank(s))
}

/// Whether `key` contributes at least one section to the output.
pub fn section_is_visible(data: &ResumeData, key: SectionKey) -> bool {
    match key {
        SectionKey::Experience => data.experience.iter().any(experience_is_visible),
        SectionKey::Education => data.education.iter().any(education_is_visible),
        SectionKey::Projects => data.projects.iter().any(project_is_visible),
        SectionKey::Skills => data.skills.iter().any(skill_group_is_visible),
        SectionKey::CustomSections => data.custom_sections.iter().any(custom_section_is_visible),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outline types
// ────────────────────────────────────────────────────────────────────────────

/// A start/end pair with blank parts removed. Never constructed empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn new(start: &str, end: &str) -> Option<Self> {
        let range = Self {
            start: trimmed(start),
            end: trimmed(end),
        };
        (range.start.is_some() || range.end.is_some()).then_some(range)
    }

    /// `start<sep>end`, or whichever part is present. A missing end stays missing.
    pub fn join(&self, separator: &str) -> String {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => format!("{start}{separator}{end}"),
            (Some(only), None) | (None, Some(only)) => only.clone(),
            (None, None) => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectLink {
    /// The URL as the user typed it.
    pub label: String,
    /// Absolute URL used as the link target.
    pub href: String,
}

/// Prefixes `https://` unless the URL already carries a scheme.
pub fn absolute_url(raw: &str) -> String {
    let url = raw.trim();
    let has_scheme = url
        .split_once("://")
        .map(|(scheme, _)| {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        })
        .unwrap_or(false);
    if has_scheme || url.starts_with("mailto:") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// The bold left half of a two-column entry line, plus its right-aligned dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryHeading {
    pub title: String,
    pub detail: Option<String>,
    pub dates: Option<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub heading: EntryHeading,
    pub link: Option<ProjectLink>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillLine {
    pub category: Option<String>,
    /// Non-blank skills joined with ", ".
    pub items: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "camelCase")]
pub enum SectionBody {
    Entries(Vec<OutlineEntry>),
    Skills(Vec<SkillLine>),
    /// Free bullet lines of a custom section. May be empty.
    Bullets(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineSection {
    pub key: SectionKey,
    pub title: String,
    pub body: SectionBody,
}

/// One header contact item and, for email, phone and web profiles, its link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub text: String,
    pub href: Option<String>,
}

impl Contact {
    fn plain(text: String) -> Self {
        Self { text, href: None }
    }

    fn email(text: String) -> Self {
        let href = format!("mailto:{text}");
        Self { text, href: Some(href) }
    }

    fn phone(text: String) -> Self {
        let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        Self {
            href: Some(format!("tel:{digits}")),
            text,
        }
    }

    fn web(text: String) -> Self {
        let href = absolute_url(&text);
        Self { text, href: Some(href) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineHeader {
    pub name: String,
    pub contacts: Vec<Contact>,
}

impl OutlineHeader {
    fn from_details(details: &PersonalDetails) -> Self {
        let kinds: [(&String, fn(String) -> Contact); 6] = [
            (&details.location, Contact::plain),
            (&details.email, Contact::email),
            (&details.phone, Contact::phone),
            (&details.website, Contact::web),
            (&details.linkedin, Contact::web),
            (&details.github, Contact::web),
        ];
        let contacts = kinds
            .into_iter()
            .filter_map(|(value, kind)| trimmed(value).map(kind))
            .collect();
        Self {
            name: details.name.trim().to_string(),
            contacts,
        }
    }

    /// `None` when there is no contact information at all.
    pub fn contact_line(&self) -> Option<String> {
        (!self.contacts.is_empty()).then(|| {
            self.contacts
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join(CONTACT_SEPARATOR)
        })
    }
}

/// Filtered, ordered view of a resume shared by every renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeOutline {
    pub header: OutlineHeader,
    pub summary: Option<String>,
    pub sections: Vec<OutlineSection>,
}

// ────────────────────────────────────────────────────────────────────────────
// Construction
// ────────────────────────────────────────────────────────────────────────────

impl ResumeOutline {
    pub fn build(data: &ResumeData) -> Self {
        let mut sections = Vec::new();
        for key in &data.section_order {
            match key {
                SectionKey::Experience => push_entries(
                    &mut sections,
                    *key,
                    data.experience
                        .iter()
                        .filter(|e| experience_is_visible(e))
                        .map(experience_entry)
                        .collect(),
                ),
                SectionKey::Education => push_entries(
                    &mut sections,
                    *key,
                    data.education
                        .iter()
                        .filter(|e| education_is_visible(e))
                        .map(education_entry)
                        .collect(),
                ),
                SectionKey::Projects => push_entries(
                    &mut sections,
                    *key,
                    data.projects
                        .iter()
                        .filter(|p| project_is_visible(p))
                        .map(project_entry)
                        .collect(),
                ),
                SectionKey::Skills => {
                    let lines: Vec<SkillLine> = data
                        .skills
                        .iter()
                        .filter(|s| skill_group_is_visible(s))
                        .map(|s| SkillLine {
                            category: trimmed(&s.category),
                            items: non_blank(&s.skills).join(", "),
                        })
                        .collect();
                    if !lines.is_empty() {
                        sections.push(OutlineSection {
                            key: *key,
                            title: "Skills".to_string(),
                            body: SectionBody::Skills(lines),
                        });
                    }
                }
                SectionKey::CustomSections => {
                    sections.extend(
                        data.custom_sections
                            .iter()
                            .filter(|c| custom_section_is_visible(c))
                            .map(|c| OutlineSection {
                                key: *key,
                                title: c.title.trim().to_string(),
                                body: SectionBody::Bullets(non_blank(&c.content)),
                            }),
                    );
                }
            }
        }

        Self {
            header: OutlineHeader::from_details(&data.personal_details),
            summary: trimmed(&data.summary),
            sections,
        }
    }

    /// Titles in emission order, summary first when present.
    pub fn section_titles(&self) -> Vec<&str> {
        self.summary
            .iter()
            .map(|_| SUMMARY_TITLE)
            .chain(self.sections.iter().map(|s| s.title.as_str()))
            .collect()
    }
}

fn push_entries(sections: &mut Vec<OutlineSection>, key: SectionKey, entries: Vec<OutlineEntry>) {
    if entries.is_empty() {
        return;
    }
    // Fixed titles exist for every key that reaches this helper.
    let title = key.title().unwrap_or_default().to_string();
    sections.push(OutlineSection {
        key,
        title,
        body: SectionBody::Entries(entries),
    });
}

fn experience_entry(entry: &Experience) -> OutlineEntry {
    let detail_parts: Vec<String> = [&entry.company, &entry.location]
        .into_iter()
        .filter_map(|s| trimmed(s))
        .collect();
    OutlineEntry {
        heading: EntryHeading {
            title: entry.role.trim().to_string(),
            detail: (!detail_parts.is_empty()).then(|| detail_parts.join(LOCATION_SEPARATOR)),
            dates: DateRange::new(&entry.start_date, &entry.end_date),
        },
        link: None,
        bullets: non_blank(&entry.highlights),
    }
}

fn education_entry(entry: &Education) -> OutlineEntry {
    let mut bullets = Vec::new();
    if let Some(gpa) = trimmed(&entry.gpa) {
        bullets.push(format!("GPA: {gpa}"));
    }
    let coursework = non_blank(&entry.coursework);
    if !coursework.is_empty() {
        bullets.push(format!("Coursework: {}", coursework.join(", ")));
    }
    OutlineEntry {
        heading: EntryHeading {
            title: entry.university.trim().to_string(),
            detail: trimmed(&entry.degree),
            dates: DateRange::new(&entry.start_date, &entry.end_date),
        },
        link: None,
        bullets,
    }
}

fn project_entry(entry: &Project) -> OutlineEntry {
    let mut bullets = Vec::new();
    if let Some(description) = trimmed(&entry.description) {
        bullets.push(description);
    }
    let tools = non_blank(&entry.tools);
    if !tools.is_empty() {
        bullets.push(format!("Tools Used: {}", tools.join(", ")));
    }
    OutlineEntry {
        heading: EntryHeading {
            title: entry.name.trim().to_string(),
            detail: None,
            dates: None,
        },
        link: trimmed(&entry.url).map(|label| ProjectLink {
            href: absolute_url(&label),
            label,
        }),
        bullets,
    }
}
