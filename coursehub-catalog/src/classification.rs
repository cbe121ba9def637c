//! Freshman/introductory course classification
//!
//! Decides whether a material belongs under the freshman filter. The
//! decision is a short-circuit cascade, first match wins:
//!
//! 1. administrator override for the material id
//! 2. well-known introductory course codes (substring of the course code)
//! 3. introductory patterns in the course code or title
//! 4. general-education department labels
//! 5. "1st"/"first" in the department name
//!
//! Steps 2-5 live in [`HEURISTICS`], an ordered table of named predicates.
//! There is no scoring: classification is deterministic for a fixed
//! override snapshot and never fails; malformed input falls through to
//! `false`.

use coursehub_common::Material;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::overrides::OverrideStore;

/// Course codes that are introductory at most universities
const FRESHMAN_COURSE_CODES: &[&str] = &[
    // Computer Science
    "CSEN101", "CSEN102", "CS101", "COSC101", "COMP101",
    // Mathematics
    "MATH101", "MATH102", "MATH100", "CALC1", "CAL1",
    // Physics
    "PHYS101", "PHYS102", "PH101",
    // Chemistry
    "CHEM101", "CHEM102",
    // English
    "ENG101", "ENGL101", "WRIT101",
    // General Education
    "GENED", "GEN101", "GE101",
    // Biology
    "BIOL101", "BIO101",
    // History
    "HIST101",
    // Psychology
    "PSY101", "PSYC101",
    // Sociology
    "SOC101", "SOCY101",
];

/// Department labels used for common first-year programmes
const FRESHMAN_DEPARTMENTS: &[&str] = &[
    "General Education",
    "Foundation Studies",
    "Common Courses",
    "Mandatory Courses",
    "Basic Sciences",
    "Introductory Studies",
];

/// Introductory-level patterns, matched against course code and title
///
/// The `1xx` pattern also fires for any letter prefix followed by a
/// three-digit number starting with 1, whatever the actual level.
static INTRO_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Course codes: letter prefix + 100/101/102 or any 1xx
        r"(?i)\b\w*[A-Z]{2,}\s*101\b",
        r"(?i)\b\w*[A-Z]{2,}\s*100\b",
        r"(?i)\b\w*[A-Z]{2,}\s*102\b",
        r"(?i)\b\w*[A-Z]{2,}\s*1[0-9]{2}\b",
        // Title keywords
        r"(?i)\bintro\b",
        r"(?i)\bintroduction\b",
        r"(?i)\bbasic\b",
        r"(?i)\bfundament(al|als)\b",
        r"(?i)\bfirst year\b",
        r"(?i)\bfreshman\b",
        r"(?i)\bbeginner\b",
        r"(?i)\blevel 1\b",
        r"(?i)\b1st year\b",
        r"(?i)\bundergraduate level\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid introductory pattern"))
    .collect()
});

static FIRST_YEAR_DEPARTMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(1st|first)\b").expect("Invalid first-year pattern"));

/// Inputs inspected by the heuristics
#[derive(Debug, Clone, Copy)]
pub struct CourseSignals<'a> {
    pub course_code: &'a str,
    pub title: &'a str,
    pub department: &'a str,
}

/// Named classification heuristic
pub struct Heuristic {
    pub name: &'static str,
    pub matches: fn(&CourseSignals<'_>) -> bool,
}

/// Heuristics in precedence order (most specific first)
pub static HEURISTICS: &[Heuristic] = &[
    Heuristic {
        name: "known_course_code",
        matches: known_course_code,
    },
    Heuristic {
        name: "introductory_pattern",
        matches: introductory_pattern,
    },
    Heuristic {
        name: "general_education_department",
        matches: general_education_department,
    },
    Heuristic {
        name: "first_year_department",
        matches: first_year_department,
    },
];

fn known_course_code(signals: &CourseSignals<'_>) -> bool {
    let code = signals.course_code.to_uppercase();
    FRESHMAN_COURSE_CODES.iter().any(|known| code.contains(known))
}

fn introductory_pattern(signals: &CourseSignals<'_>) -> bool {
    INTRO_PATTERNS
        .iter()
        .any(|p| p.is_match(signals.course_code) || p.is_match(signals.title))
}

fn general_education_department(signals: &CourseSignals<'_>) -> bool {
    let department = signals.department.to_lowercase();
    FRESHMAN_DEPARTMENTS
        .iter()
        .any(|label| department.contains(&label.to_lowercase()))
}

fn first_year_department(signals: &CourseSignals<'_>) -> bool {
    FIRST_YEAR_DEPARTMENT.is_match(signals.department)
}

/// Name of the first heuristic that fires, `None` when none does
///
/// Ignores overrides.
pub fn matching_heuristic(signals: &CourseSignals<'_>) -> Option<&'static str> {
    HEURISTICS
        .iter()
        .find(|h| (h.matches)(signals))
        .map(|h| h.name)
}

/// Freshman classifier bound to an override store
pub struct CourseClassifier<'a> {
    overrides: &'a dyn OverrideStore,
}

impl<'a> CourseClassifier<'a> {
    pub fn new(overrides: &'a dyn OverrideStore) -> Self {
        Self { overrides }
    }

    /// Classify a course as freshman-level
    ///
    /// An override for `material_id` always wins over the heuristics.
    pub fn classify(
        &self,
        course_code: &str,
        title: &str,
        department: &str,
        material_id: Option<&str>,
    ) -> bool {
        if let Some(id) = material_id {
            if let Some(value) = self.overrides.get(id) {
                trace!(material_id = %id, value, "Freshman override applied");
                return value;
            }
        }

        let signals = CourseSignals {
            course_code,
            title,
            department,
        };

        match matching_heuristic(&signals) {
            Some(rule) => {
                trace!(course_code, rule, "Classified as freshman");
                true
            }
            None => false,
        }
    }

    pub fn classify_material(&self, material: &Material) -> bool {
        self.classify(
            &material.course,
            &material.title,
            &material.department,
            Some(&material.id),
        )
    }

    /// Keep only freshman materials, preserving input order
    ///
    /// Does not sort or paginate; callers page the result themselves.
    pub fn freshman_materials<'m>(&self, materials: &'m [Material]) -> Vec<&'m Material> {
        materials
            .iter()
            .filter(|m| self.classify_material(m))
            .collect()
    }

    /// Record an administrator override (no check against the heuristics)
    pub fn set_override(&self, material_id: &str, value: bool) {
        self.overrides.set(material_id, value);
    }

    /// Remove an override so the heuristics apply again
    pub fn clear_override(&self, material_id: &str) -> bool {
        self.overrides.clear(material_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::MemoryOverrideStore;

    fn signals<'a>(course_code: &'a str, title: &'a str, department: &'a str) -> CourseSignals<'a> {
        CourseSignals {
            course_code,
            title,
            department,
        }
    }

    #[test]
    fn test_known_code_is_case_insensitive_substring() {
        assert!(known_course_code(&signals("cs101", "", "")));
        assert!(known_course_code(&signals("MATH101-A", "", "")));
        assert!(known_course_code(&signals("GENED 12", "", "")));
        assert!(!known_course_code(&signals("CS450", "", "")));
    }

    #[test]
    fn test_course_number_patterns() {
        assert!(introductory_pattern(&signals("MATH 100", "", "")));
        assert!(introductory_pattern(&signals("ECON102", "", "")));
        assert!(introductory_pattern(&signals("STAT 150", "", "")));
        assert!(!introductory_pattern(&signals("STAT 250", "", "")));
        // Single-letter prefix is not a course code
        assert!(!introductory_pattern(&signals("A101", "", "")));
    }

    #[test]
    fn test_title_keywords() {
        for title in [
            "Intro to Databases",
            "An Introduction to Law",
            "Basic Accounting",
            "Fundamentals of Nursing",
            "Fundamental Physics",
            "First Year Seminar",
            "Freshman Writing",
            "Beginner Spanish",
            "Chemistry Level 1",
            "1st Year Biology",
            "Undergraduate Level Statistics",
        ] {
            assert!(
                introductory_pattern(&signals("XYZ", title, "")),
                "expected '{}' to match",
                title
            );
        }
    }

    #[test]
    fn test_keywords_need_word_boundaries() {
        assert!(!introductory_pattern(&signals("", "Introspection in AI", "")));
        assert!(!introductory_pattern(&signals("", "Basically Advanced", "")));
        assert!(!introductory_pattern(&signals("", "Level 10 Topics", "")));
    }

    #[test]
    fn test_department_heuristics() {
        assert!(general_education_department(&signals("", "", "general education")));
        assert!(general_education_department(&signals("", "", "Dept. of Basic Sciences")));
        assert!(first_year_department(&signals("", "", "1st Year Program")));
        assert!(first_year_department(&signals("", "", "First-Year Studies")));
        assert!(!first_year_department(&signals("", "", "Firsthand Studies")));
    }

    #[test]
    fn test_heuristic_order() {
        let names: Vec<_> = HEURISTICS.iter().map(|h| h.name).collect();
        assert_eq!(
            names,
            [
                "known_course_code",
                "introductory_pattern",
                "general_education_department",
                "first_year_department"
            ]
        );

        // Known code wins even when a pattern would also fire
        assert_eq!(
            matching_heuristic(&signals("CS101", "Intro to Programming", "Computer Science")),
            Some("known_course_code")
        );
        assert_eq!(
            matching_heuristic(&signals("GE305", "Capstone", "General Education")),
            Some("general_education_department")
        );
    }

    #[test]
    fn test_malformed_codes_fall_through() {
        let store = MemoryOverrideStore::new();
        let classifier = CourseClassifier::new(&store);

        assert!(!classifier.classify("", "", "", None));
        assert!(!classifier.classify("!!!---", "", "Law", None));
        assert!(!classifier.classify("   ", "Advanced Torts", "Law", Some("m-1")));
        assert!(classifier.classify("", "", "Foundation Studies", None));
    }

    #[test]
    fn test_override_ignored_without_material_id() {
        let store = MemoryOverrideStore::new();
        store.set("m-1", false);
        let classifier = CourseClassifier::new(&store);

        assert!(classifier.classify("CS101", "", "", None));
        assert!(!classifier.classify("CS101", "", "", Some("m-1")));
    }

    #[test]
    fn test_clear_override_restores_heuristic() {
        let store = MemoryOverrideStore::new();
        let classifier = CourseClassifier::new(&store);

        classifier.set_override("m-1", true);
        assert!(classifier.classify("CS450", "Distributed Systems", "Computer Science", Some("m-1")));

        assert!(classifier.clear_override("m-1"));
        assert!(!classifier.classify("CS450", "Distributed Systems", "Computer Science", Some("m-1")));
    }
}
