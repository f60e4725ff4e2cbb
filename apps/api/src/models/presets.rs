//! Theme presets and the template-default resume.

use serde::Serialize;

use crate::models::resume::{
    Education, EntryId, Experience, FontStyle, FontWeight, PersonalDetails, Project, ResumeData,
    SectionKey, Skill, StylingOptions,
};

#[derive(Debug, Clone, Serialize)]
pub struct ThemePreset {
    pub name: &'static str,
    pub styling: StylingOptions,
}

/// "Default" preset: Helvetica throughout, 1.15 line height.
pub fn default_styling() -> StylingOptions {
    StylingOptions {
        font: FontStyle::new("Helvetica", 10.0, "#333333", FontWeight::Normal),
        heading: FontStyle::new("Helvetica", 25.0, "#333333", FontWeight::Bold),
        subheading: FontStyle::new("Helvetica", 11.0, "#333333", FontWeight::Bold),
        section_title: FontStyle::new("Helvetica", 12.0, "#000000", FontWeight::Bold),
        line_height: Some(1.15),
    }
}

pub fn theme_presets() -> Vec<ThemePreset> {
    vec![
        ThemePreset {
            name: "Default",
            styling: default_styling(),
        },
        ThemePreset {
            name: "Modern Sans",
            styling: StylingOptions {
                font: FontStyle::new("Roboto", 10.0, "#404040", FontWeight::Normal),
                heading: FontStyle::new("Roboto", 22.0, "#171717", FontWeight::Bold),
                subheading: FontStyle::new("Roboto", 11.0, "#171717", FontWeight::Bold),
                section_title: FontStyle::new("Roboto", 11.0, "#007BFF", FontWeight::Bold),
                line_height: Some(1.4),
            },
        },
        ThemePreset {
            name: "Classic Serif",
            styling: StylingOptions {
                font: FontStyle::new("Times New Roman", 11.0, "#000000", FontWeight::Normal),
                heading: FontStyle::new("Times New Roman", 28.0, "#000000", FontWeight::Normal),
                subheading: FontStyle::new("Times New Roman", 12.0, "#000000", FontWeight::Bold),
                section_title: FontStyle::new("Times New Roman", 13.0, "#000000", FontWeight::Bold),
                line_height: Some(1.2),
            },
        },
    ]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Sample resume a new session starts from.
pub fn template_resume() -> ResumeData {
    ResumeData {
        personal_details: PersonalDetails {
            name: "John Doe".into(),
            location: "Your Location".into(),
            email: "youremail@yourdomain.com".into(),
            phone: "0541 999 99 99".into(),
            website: "yourwebsite.com".into(),
            linkedin: "linkedin.com/in/yourusername".into(),
            github: "github.com/yourusername".into(),
        },
        summary: "Software engineer with a track record of shipping fast, reliable desktop \
                  and collaboration features used by millions."
            .into(),
        education: vec![Education {
            id: EntryId::from("edu1"),
            university: "University of Pennsylvania".into(),
            degree: "BS in Computer Science".into(),
            start_date: "Sept 2000".into(),
            end_date: "May 2005".into(),
            gpa: "3.9/4.0".into(),
            coursework: strings(&[
                "Computer Architecture",
                "Comparison of Learning Algorithms",
                "Computational Theory",
            ]),
        }],
        experience: vec![
            Experience {
                id: EntryId::from("exp1"),
                role: "Software Engineer".into(),
                company: "Apple".into(),
                location: "Cupertino, CA".into(),
                start_date: "June 2005".into(),
                end_date: "Aug 2007".into(),
                highlights: strings(&[
                    "Reduced time to render user buddy lists by 75% by implementing a prediction algorithm",
                    "Integrated iChat with Spotlight Search by creating a tool to extract metadata from saved chat transcripts",
                    "Redesigned chat file format and implemented backward compatibility for search",
                ]),
            },
            Experience {
                id: EntryId::from("exp2"),
                role: "Software Engineer Intern".into(),
                company: "Microsoft".into(),
                location: "Redmond, WA".into(),
                start_date: "June 2003".into(),
                end_date: "Aug 2003".into(),
                highlights: strings(&[
                    "Designed a UI for the VS open file switcher (Ctrl-Tab) and extended it to tool windows",
                    "Created a service to provide gradient across VS and VS add-ins, optimizing its performance via caching",
                ]),
            },
        ],
        projects: vec![
            Project {
                id: EntryId::from("proj1"),
                name: "Multi-User Drawing Tool".into(),
                url: "github.com/name/repo".into(),
                description: "Developed an electronic classroom where multiple users can simultaneously \
                              view and draw on a \"chalkboard\" with each person's edits synchronized"
                    .into(),
                tools: strings(&["C++", "MFC"]),
            },
            Project {
                id: EntryId::from("proj2"),
                name: "Synchronized Desktop Calendar".into(),
                url: "github.com/name/repo".into(),
                description: "Developed a desktop calendar with globally shared and synchronized \
                              calendars, allowing users to schedule meetings with other users"
                    .into(),
                tools: strings(&["C#", ".NET", "SQL", "XML"]),
            },
        ],
        custom_sections: Vec::new(),
        skills: vec![
            Skill {
                id: EntryId::from("skills1"),
                category: "Programming Languages".into(),
                skills: strings(&["C++", "C", "Java", "Objective-C", "C#", "SQL", "JavaScript"]),
            },
            Skill {
                id: EntryId::from("skills2"),
                category: "Technologies".into(),
                skills: strings(&[".NET", "Microsoft SQL Server", "XCode", "Interface Builder"]),
            },
        ],
        section_order: SectionKey::ALL.to_vec(),
        styling: default_styling(),
    }
}
