//! Material filtering by free-text query and department/school selection
//!
//! Both predicates are ANDed and the output keeps input order (the data
//! source already orders by recency).

use coursehub_common::taxonomy::{ALL_DEPARTMENTS, ALL_SCHOOLS};
use coursehub_common::{Material, Taxonomy};

/// Department/school selection of the browse view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// No department or school restriction
    #[default]
    All,
    /// Exact department match
    Department(String),
    /// Any department listed under the school
    School(String),
}

impl Selection {
    /// Build a selection from raw menu values
    ///
    /// Missing values and the "All Departments"/"All Schools" sentinels mean
    /// no restriction. A department takes precedence over a school.
    pub fn from_menu(department: Option<&str>, school: Option<&str>) -> Self {
        let department = department
            .map(str::trim)
            .filter(|d| !d.is_empty() && *d != ALL_DEPARTMENTS);
        let school = school
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != ALL_SCHOOLS);

        match (department, school) {
            (Some(d), _) => Selection::Department(d.to_string()),
            (None, Some(s)) => Selection::School(s.to_string()),
            (None, None) => Selection::All,
        }
    }

    fn matches(&self, material: &Material, taxonomy: &Taxonomy) -> bool {
        match self {
            Selection::All => true,
            Selection::Department(department) => material.department == *department,
            Selection::School(school) => taxonomy
                .departments_of(school)
                .is_some_and(|departments| departments.iter().any(|d| *d == material.department)),
        }
    }
}

/// Case-insensitive substring match of the query against the searchable
/// fields; an empty or whitespace-only query matches everything
///
/// A non-blank query is matched as typed, surrounding spaces included.
pub fn matches_query(material: &Material, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let query = query.to_lowercase();

    [
        material.title.as_str(),
        material.description_or_empty(),
        material.course.as_str(),
        material.department.as_str(),
        material.uploaded_by.as_deref().unwrap_or(""),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&query))
}

/// Filter materials by query and selection, keeping input order
pub fn filter_materials<'m, I>(
    materials: I,
    query: &str,
    selection: &Selection,
    taxonomy: &Taxonomy,
) -> Vec<&'m Material>
where
    I: IntoIterator<Item = &'m Material>,
{
    materials
        .into_iter()
        .filter(|m| matches_query(m, query) && selection.matches(m, taxonomy))
        .collect()
}
