//! Role catalog and fuzzy reconciliation of classifier labels

use log::debug;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

/// Static metadata for a known job-role category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RoleProfile {
    pub fn new(name: &str, description: &str, tags: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Ordered, immutable set of role profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleCatalog {
    profiles: Vec<RoleProfile>,
}

/// Outcome of reconciling a raw label with the catalog
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult<'a> {
    Matched(&'a RoleProfile),
    Unmatched { raw_label: String },
}

impl<'a> MatchResult<'a> {
    pub fn profile(&self) -> Option<&'a RoleProfile> {
        match self {
            MatchResult::Matched(profile) => Some(*profile),
            MatchResult::Unmatched { .. } => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }
}

impl RoleCatalog {
    pub fn new(profiles: Vec<RoleProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[RoleProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RoleProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Closest profile by Jaro-Winkler similarity of lowercased names.
    ///
    /// Display hint for unmatched labels only; matching never uses it.
    pub fn closest(&self, label: &str) -> Option<(&RoleProfile, f64)> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }

        self.profiles
            .iter()
            .map(|p| (p, jaro_winkler(&label, &p.name.to_lowercase())))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::new(default_roles())
    }
}

/// Match `raw_label` against the catalog by case-insensitive substring
/// containment in either direction; the first entry in catalog order wins.
pub fn match_role<'a>(raw_label: &str, catalog: &'a RoleCatalog) -> MatchResult<'a> {
    let label = raw_label.trim().to_lowercase();

    let matched = if label.is_empty() {
        None
    } else {
        catalog.profiles.iter().find(|profile| {
            let key = profile.name.trim().to_lowercase();
            !key.is_empty() && (key.contains(&label) || label.contains(&key))
        })
    };

    match matched {
        Some(profile) => {
            debug!("Label '{}' matched role '{}'", raw_label, profile.name);
            MatchResult::Matched(profile)
        }
        None => {
            debug!("Label '{}' matched no catalog role", raw_label);
            MatchResult::Unmatched {
                raw_label: raw_label.to_string(),
            }
        }
    }
}

/// Built-in catalog of the role categories the classifier is trained on
pub fn default_roles() -> Vec<RoleProfile> {
    vec![
        RoleProfile::new(
            "Workday Consultant",
            "Implements and configures Workday HCM and Financials modules for enterprise clients.",
            &["workday", "hcm", "integrations", "eib", "business process"],
        ),
        RoleProfile::new(
            "PeopleSoft Consultant",
            "Customizes and supports Oracle PeopleSoft applications across HR and finance.",
            &["peoplesoft", "peoplecode", "application engine", "oracle", "fscm"],
        ),
        RoleProfile::new(
            "SQL Developer",
            "Designs schemas, writes queries and tunes relational database performance.",
            &["sql", "t-sql", "pl/sql", "stored procedures", "ssis", "query tuning"],
        ),
        RoleProfile::new(
            "React Developer",
            "Builds interactive web front ends with React and the JavaScript ecosystem.",
            &["react", "javascript", "redux", "typescript", "html", "css"],
        ),
        RoleProfile::new(
            "Java Developer",
            "Develops backend services and enterprise applications on the JVM.",
            &["java", "spring", "hibernate", "microservices", "maven"],
        ),
        RoleProfile::new(
            "Data Scientist",
            "Builds statistical and machine learning models to answer business questions.",
            &["python", "machine learning", "pandas", "statistics", "scikit-learn"],
        ),
        RoleProfile::new(
            "DevOps Engineer",
            "Automates build, deployment and infrastructure operations.",
            &["ci/cd", "docker", "kubernetes", "terraform", "aws"],
        ),
        RoleProfile::new(
            "Business Analyst",
            "Gathers requirements and translates business needs into specifications.",
            &["requirements", "stakeholders", "process mapping", "uat", "jira"],
        ),
    ]
}
