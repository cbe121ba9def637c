//! Classification and filtering behavior over realistic catalogs
//!
//! Tests cover:
//! - Override authority over every heuristic
//! - Determinism for a fixed override snapshot
//! - Freshman selection containment and order
//! - Filter identity/empty results
//! - Known imprecision of the 1xx course-number pattern

use chrono::{TimeZone, Utc};
use coursehub_catalog::classification::{matching_heuristic, CourseClassifier, CourseSignals};
use coursehub_catalog::filtering::{filter_materials, Selection};
use coursehub_catalog::overrides::{MemoryOverrideStore, OverrideStore};
use coursehub_catalog::pagination::paginate;
use coursehub_common::taxonomy::ALL_DEPARTMENTS;
use coursehub_common::{FileType, Material, Taxonomy};

fn material(id: &str, course: &str, title: &str, department: &str) -> Material {
    Material {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        department: department.to_string(),
        course: course.to_string(),
        file_type: FileType::from_file_name(&format!("{}.pdf", id)),
        file_name: format!("{}.pdf", id),
        file_size: Some(1024),
        file_path: format!("uploads/{}.pdf", id),
        created_at: Utc.with_ymd_and_hms(2024, 9, 15, 9, 0, 0).unwrap(),
        uploaded_by: None,
        uploaded_by_user_id: None,
    }
}

fn catalog() -> Vec<Material> {
    vec![
        material("m-01", "CS101", "Intro to Programming", "Computer Science"),
        material("m-02", "CS450", "Distributed Systems", "Computer Science"),
        material("m-03", "GE305", "Capstone", "General Education"),
        material("m-04", "MATH 100", "Pre-Calculus", "Mathematics"),
        material("m-05", "ACC310", "Auditing", "Accounting"),
        material("m-06", "LAW405", "Moot Court", "Law"),
        material("m-07", "SOC220", "Urban Sociology", "1st Year Program"),
        material("m-08", "PHYS301", "Fundamentals of Optics", "Physics"),
        material("m-09", "", "", ""),
        material("m-10", "???", "Seminar", "History"),
    ]
}

fn ids(materials: &[&Material]) -> Vec<String> {
    materials.iter().map(|m| m.id.clone()).collect()
}

#[test]
fn test_scenario_intro_programming_is_freshman() {
    let store = MemoryOverrideStore::new();
    let classifier = CourseClassifier::new(&store);
    assert!(classifier.classify("CS101", "Intro to Programming", "Computer Science", None));
}

#[test]
fn test_scenario_distributed_systems_is_not_freshman() {
    let store = MemoryOverrideStore::new();
    let classifier = CourseClassifier::new(&store);
    assert!(!classifier.classify("CS450", "Distributed Systems", "Computer Science", None));
}

#[test]
fn test_scenario_override_false_beats_known_code() {
    let store = MemoryOverrideStore::new();
    let classifier = CourseClassifier::new(&store);
    classifier.set_override("m-01", false);

    assert!(!classifier.classify("CS101", "Intro to Programming", "Computer Science", Some("m-01")));
}

#[test]
fn test_scenario_general_education_department() {
    let store = MemoryOverrideStore::new();
    let classifier = CourseClassifier::new(&store);
    assert!(classifier.classify("GE305", "Capstone", "General Education", None));
}

#[test]
fn test_override_always_determines_result() {
    let materials = catalog();

    for value in [true, false] {
        let store = MemoryOverrideStore::new();
        for m in &materials {
            store.set(&m.id, value);
        }
        let classifier = CourseClassifier::new(&store);

        for m in &materials {
            assert_eq!(
                classifier.classify_material(m),
                value,
                "override {} ignored for {}",
                value,
                m.id
            );
        }
    }
}

#[test]
fn test_classification_is_deterministic() {
    let materials = catalog();
    let store = MemoryOverrideStore::new();
    store.set("m-05", true);
    let classifier = CourseClassifier::new(&store);

    let first: Vec<bool> = materials.iter().map(|m| classifier.classify_material(m)).collect();
    for _ in 0..5 {
        let again: Vec<bool> = materials.iter().map(|m| classifier.classify_material(m)).collect();
        assert_eq!(first, again);
    }
}

#[test]
fn test_freshman_materials_subset_in_order() {
    let materials = catalog();
    let before = materials.clone();
    let store = MemoryOverrideStore::new();
    let classifier = CourseClassifier::new(&store);

    let freshman = classifier.freshman_materials(&materials);

    assert_eq!(ids(&freshman), ["m-01", "m-03", "m-04", "m-07", "m-08"]);

    // Containment and relative order
    let mut cursor = materials.iter();
    for selected in &freshman {
        assert!(cursor.any(|m| m.id == selected.id), "{} out of order", selected.id);
    }

    // Input untouched
    assert_eq!(materials, before);
}

#[test]
fn test_freshman_then_paginate() {
    let materials: Vec<Material> = (0..25)
        .map(|i| material(&format!("x-{:02}", i), &format!("CS1{:02}", i), "Lecture", "Computer Science"))
        .collect();
    let store = MemoryOverrideStore::new();
    let classifier = CourseClassifier::new(&store);

    let freshman = classifier.freshman_materials(&materials);
    assert_eq!(freshman.len(), 25);

    let page = paginate(&freshman, 3, 9);
    assert_eq!(page.pagination.total_pages, 3);
    assert_eq!(page.items.len(), 7);
    assert_eq!(page.items[0].id, "x-18");
}

#[test]
fn test_filter_identity_and_nonexistent_query() {
    let materials = catalog();
    let taxonomy = Taxonomy::default();

    let all = Selection::from_menu(Some(ALL_DEPARTMENTS), None);
    let result = filter_materials(&materials, "", &all, &taxonomy);
    let expected: Vec<&Material> = materials.iter().collect();
    assert_eq!(result, expected);

    for department in ["Computer Science", "Law", "Nowhere"] {
        let selection = Selection::from_menu(Some(department), None);
        assert!(filter_materials(&materials, "nonexistent-zzz", &selection, &taxonomy).is_empty());
    }
}

#[test]
fn test_one_hundred_level_pattern_imprecision_is_bounded() {
    let classify = |code: &str| {
        matching_heuristic(&CourseSignals {
            course_code: code,
            title: "",
            department: "",
        })
    };

    // Any 1xx number after a letter prefix counts, whatever the real level
    assert_eq!(classify("HIST150"), Some("introductory_pattern"));
    assert_eq!(classify("STAT 199"), Some("introductory_pattern"));
    // A known code embedded in a longer number still matches by substring
    assert_eq!(classify("CHEM1020"), Some("known_course_code"));
    // A "1" buried inside a four-digit number does not
    assert_eq!(classify("ENG2101"), None);
    assert_eq!(classify("CS2100"), None);
}
