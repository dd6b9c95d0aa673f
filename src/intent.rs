use std::collections::BTreeSet;

use crate::catalog::ProjectRecord;

pub const PROJECTS_INTRO: &str = "Here are a few of the projects I can tell you about:";

pub const SKILLS_ANSWER: &str = "My toolbox covers manual testing with TestRail and \
spreadsheets, automation with Playwright, WebdriverIO, Cypress and Selenium, and \
reporting with mochawesome and HTML dashboards.";

pub const CONTACT_ANSWER: &str = "The best way to reach me is through the profile links \
in the header; the contact section of the portfolio has the details.";

pub const GENERAL_ANSWER: &str = "I can walk you through my projects and skills. Ask me \
about a specific project or tool.";

/// Fixed message categories recognized by keyword matching. Checked in
/// declaration order; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Projects,
    Skills,
    Contact,
    General,
}

pub fn classify(message: &str) -> Intent {
    let lowered = message.to_lowercase();
    let tokens = token_set(&lowered);
    let has = |term: &str| tokens.contains(term);

    if has("project") || has("projects") || has("portfolio") || has("work") {
        Intent::Projects
    } else if has("skill") || has("skills") || has("tool") || has("tools") || has("stack") {
        Intent::Skills
    } else if has("contact") || has("email") || has("reach") {
        Intent::Contact
    } else {
        Intent::General
    }
}

/// Produce the canned answer for a message. Total: every input maps to
/// non-empty text, even with an empty catalog.
pub fn respond(message: &str, records: &[ProjectRecord]) -> String {
    match classify(message) {
        Intent::Projects => projects_answer(records),
        Intent::Skills => SKILLS_ANSWER.to_string(),
        Intent::Contact => CONTACT_ANSWER.to_string(),
        Intent::General => GENERAL_ANSWER.to_string(),
    }
}

/// Intro sentence plus up to five highlight lines from the catalog.
pub fn projects_answer(records: &[ProjectRecord]) -> String {
    let mut answer = String::from(PROJECTS_INTRO);
    for record in records.iter().take(5) {
        answer.push_str(&format!("\n- {}: {}", record.title, record.description));
    }
    answer
}

fn token_set(text: &str) -> BTreeSet<&str> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records(count: usize) -> Vec<ProjectRecord> {
        (0..count)
            .map(|i| ProjectRecord {
                title: format!("Project {i}"),
                description: format!("Description {i}"),
                category: "Automation".to_string(),
                tags: Vec::new(),
                url: None,
                icon: None,
            })
            .collect()
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("Show me your PORTFOLIO"), Intent::Projects);
        assert_eq!(classify("What TOOLS do you use?"), Intent::Skills);
        assert_eq!(classify("EMAIL?"), Intent::Contact);
    }

    #[test]
    fn first_matching_category_wins() {
        // Mentions both projects and skills; projects is checked first.
        assert_eq!(
            classify("which skills did your projects need?"),
            Intent::Projects
        );
    }

    #[test]
    fn unrecognized_messages_fall_through_to_general() {
        assert_eq!(classify("hello there"), Intent::General);
        assert_eq!(classify(""), Intent::General);
    }

    #[test]
    fn projects_answer_lists_at_most_five_highlights() {
        let answer = projects_answer(&sample_records(8));
        assert!(answer.starts_with(PROJECTS_INTRO));
        assert_eq!(answer.lines().count(), 6);
        assert!(answer.contains("- Project 0: Description 0"));
        assert!(answer.contains("- Project 4: Description 4"));
        assert!(!answer.contains("Project 5"));
    }

    #[test]
    fn projects_answer_with_empty_catalog_is_just_the_intro() {
        assert_eq!(projects_answer(&[]), PROJECTS_INTRO);
    }

    #[test]
    fn respond_is_never_empty() {
        let records = sample_records(2);
        for message in ["projects?", "skills", "contact", "???", "", "   "] {
            assert!(!respond(message, &records).is_empty());
        }
    }
}
