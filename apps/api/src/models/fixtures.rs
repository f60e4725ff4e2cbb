//! Shared test data: hand-built snapshots and proptest strategies.

use proptest::prelude::*;
use proptest::sample::subsequence;

use crate::models::resume::{
    CustomSection, Education, Experience, Project, ResumeData, SectionKey, Skill,
};

pub fn minimal_resume() -> ResumeData {
    let mut data = ResumeData::default();
    data.personal_details.name = "Jane Doe".into();
    data
}

/// Enough experience content to overflow one Letter page.
pub fn long_resume() -> ResumeData {
    let mut data = minimal_resume();
    data.personal_details.email = "jane@example.com".into();
    data.experience = (0..12)
        .map(|i| Experience {
            role: format!("Staff Engineer {i}"),
            company: "Acme Corporation".into(),
            location: "Remote".into(),
            start_date: format!("Jan {}", 2000 + i),
            end_date: format!("Dec {}", 2000 + i),
            highlights: (0..4)
                .map(|j| {
                    format!(
                        "Highlight {i}-{j}: led a cross-functional migration of the billing \
                         platform to an event-sourced architecture, cutting reconciliation \
                         incidents by forty percent across three regions"
                    )
                })
                .collect(),
            ..Default::default()
        })
        .collect();
    data
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[A-Za-z][A-Za-z0-9 ]{0,16}",
    ]
}

fn arb_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_text(), 0..3)
}

fn arb_experience() -> impl Strategy<Value = Experience> {
    (arb_text(), arb_text(), arb_text(), arb_list()).prop_map(|(role, company, start, highlights)| {
        Experience {
            role,
            company,
            start_date: start,
            highlights,
            ..Default::default()
        }
    })
}

fn arb_education() -> impl Strategy<Value = Education> {
    (arb_text(), arb_text(), arb_text(), arb_list()).prop_map(|(university, degree, gpa, coursework)| {
        Education {
            university,
            degree,
            gpa,
            coursework,
            ..Default::default()
        }
    })
}

fn arb_project() -> impl Strategy<Value = Project> {
    (arb_text(), arb_text(), arb_list()).prop_map(|(name, description, tools)| Project {
        name,
        description,
        tools,
        ..Default::default()
    })
}

fn arb_skill() -> impl Strategy<Value = Skill> {
    (arb_text(), arb_list()).prop_map(|(category, skills)| Skill {
        category,
        skills,
        ..Default::default()
    })
}

fn arb_custom() -> impl Strategy<Value = CustomSection> {
    (arb_text(), arb_list()).prop_map(|(title, content)| CustomSection {
        title,
        content,
        ..Default::default()
    })
}

/// Any subset of the section keys, in any order, each key at most once.
pub fn arb_section_order() -> impl Strategy<Value = Vec<SectionKey>> {
    subsequence(SectionKey::ALL.to_vec(), 0..=SectionKey::ALL.len()).prop_shuffle()
}

pub fn arb_resume() -> impl Strategy<Value = ResumeData> {
    (
        arb_text(),
        prop::collection::vec(arb_experience(), 0..3),
        prop::collection::vec(arb_education(), 0..3),
        prop::collection::vec(arb_project(), 0..3),
        prop::collection::vec(arb_skill(), 0..3),
        prop::collection::vec(arb_custom(), 0..3),
        arb_section_order(),
    )
        .prop_map(
            |(summary, experience, education, projects, skills, custom_sections, section_order)| {
                ResumeData {
                    summary,
                    experience,
                    education,
                    projects,
                    skills,
                    custom_sections,
                    section_order,
                    ..minimal_resume()
                }
            },
        )
}
