//! School/department taxonomy
//!
//! Static two-level classification of academic units used for filter menus
//! and the school filter. Loaded once at startup, either from the built-in
//! default or from a TOML file, and validated so that every department
//! belongs to exactly one school.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Sentinel department selection meaning "no department filter"
pub const ALL_DEPARTMENTS: &str = "All Departments";

/// Sentinel school selection meaning "no school filter"
pub const ALL_SCHOOLS: &str = "All Schools";

/// Taxonomy validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("school name must not be empty")]
    EmptySchoolName,

    #[error("school '{0}' is listed more than once")]
    DuplicateSchool(String),

    #[error("school '{0}' has an empty department name")]
    EmptyDepartmentName(String),

    #[error("department '{department}' is listed under both '{first}' and '{second}'")]
    DepartmentInMultipleSchools {
        department: String,
        first: String,
        second: String,
    },

    #[error("failed to parse taxonomy file: {0}")]
    Parse(String),
}

/// One school and its ordered departments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    pub departments: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    schools: Vec<School>,
}

/// Validated school → departments mapping
#[derive(Debug, Clone)]
pub struct Taxonomy {
    schools: Vec<School>,
    /// department name → index into `schools`
    department_index: HashMap<String, usize>,
}

impl Taxonomy {
    /// Build a taxonomy, rejecting duplicate schools and departments that
    /// appear under more than one school
    pub fn new(schools: Vec<School>) -> Result<Self, TaxonomyError> {
        let mut school_names = HashSet::new();
        let mut department_index: HashMap<String, usize> = HashMap::new();

        for (idx, school) in schools.iter().enumerate() {
            if school.name.trim().is_empty() {
                return Err(TaxonomyError::EmptySchoolName);
            }
            if !school_names.insert(school.name.as_str()) {
                return Err(TaxonomyError::DuplicateSchool(school.name.clone()));
            }

            for department in &school.departments {
                if department.trim().is_empty() {
                    return Err(TaxonomyError::EmptyDepartmentName(school.name.clone()));
                }
                if let Some(&first) = department_index.get(department.as_str()) {
                    return Err(TaxonomyError::DepartmentInMultipleSchools {
                        department: department.clone(),
                        first: schools[first].name.clone(),
                        second: school.name.clone(),
                    });
                }
                department_index.insert(department.clone(), idx);
            }
        }

        Ok(Self {
            schools,
            department_index,
        })
    }

    /// Parse and validate a TOML taxonomy document
    ///
    /// ```toml
    /// [[schools]]
    /// name = "School of EiTm"
    /// departments = ["Computer Science", "Software Engineering"]
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, TaxonomyError> {
        let file: TaxonomyFile =
            toml::from_str(content).map_err(|e| TaxonomyError::Parse(e.to_string()))?;
        Self::new(file.schools)
    }

    /// Load and validate a TOML taxonomy file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let taxonomy = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            schools = taxonomy.schools.len(),
            departments = taxonomy.department_index.len(),
            "Loaded taxonomy file"
        );
        Ok(taxonomy)
    }

    /// Schools in display order
    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    /// Departments of a school, `None` for unknown schools
    pub fn departments_of(&self, school: &str) -> Option<&[String]> {
        self.schools
            .iter()
            .find(|s| s.name == school)
            .map(|s| s.departments.as_slice())
    }

    /// School owning a department, `None` for departments outside the taxonomy
    pub fn school_of(&self, department: &str) -> Option<&str> {
        self.department_index
            .get(department)
            .map(|&idx| self.schools[idx].name.as_str())
    }

    pub fn contains_department(&self, department: &str) -> bool {
        self.department_index.contains_key(department)
    }
}

impl Default for Taxonomy {
    /// Built-in taxonomy of the university's schools
    fn default() -> Self {
        let schools = DEFAULT_SCHOOLS
            .iter()
            .map(|(name, departments)| School {
                name: name.to_string(),
                departments: departments.iter().map(|d| d.to_string()).collect(),
            })
            .collect();

        // The built-in table is covered by test_default_taxonomy_is_valid
        Self::new(schools).expect("built-in taxonomy is valid")
    }
}

const DEFAULT_SCHOOLS: &[(&str, &[&str])] = &[
    (
        "School of Business and Economics",
        &["Accounting", "Economics", "Management", "Finance", "Marketing"],
    ),
    (
        "School of Agriculture and Natural Resources",
        &[
            "Agriculture",
            "Natural Resources Management",
            "Dryland Agriculture",
            "Environmental Science",
        ],
    ),
    (
        "School of Law and Governance",
        &[
            "Law",
            "Public Administration",
            "Political Science",
            "International Relations",
        ],
    ),
    (
        "School of Social Sciences and Languages",
        &["Sociology", "Psychology", "Linguistics", "Anthropology", "History"],
    ),
    (
        "School of Natural and Computational Sciences",
        &["Mathematics", "Physics", "Chemistry", "Biology", "Statistics"],
    ),
    (
        "School of EiTm",
        &[
            "Computer Science",
            "Software Engineering",
            "Information Systems",
            "Data Science",
            "Artificial Intelligence",
            "Cybersecurity",
        ],
    ),
    (
        "School of Health Sciences",
        &[
            "Medicine",
            "Nursing",
            "Public Health",
            "Pharmacy",
            "Biomedical Sciences",
        ],
    ),
    (
        "School of Veterinary Science",
        &["Veterinary Medicine", "Veterinary Public Health", "Animal Science"],
    ),
];
