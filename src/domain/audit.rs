//! Consistency checks over a loaded catalog.
//!
//! The [`Catalog`] accepts prerequisite references without validating them,
//! so dangling references and cycles can only be found after loading. The
//! audit reports both in one pass.

use std::{collections::BTreeMap, fmt};

use nonempty::NonEmpty;
use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};

use super::{Catalog, CourseNumber};

/// A single finding from a catalog audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// A course lists a prerequisite with no record in the catalog.
    UnknownPrerequisite {
        /// The course whose prerequisite list is at fault.
        course: CourseNumber,
        /// The prerequisite number that has no record.
        prerequisite: CourseNumber,
    },
    /// A group of courses whose prerequisites depend on each other.
    PrerequisiteCycle {
        /// The members of the cycle, in ascending number order.
        members: Vec<CourseNumber>,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPrerequisite {
                course,
                prerequisite,
            } => {
                write!(
                    f,
                    "{course} requires {prerequisite}, which is not in the catalog"
                )
            }
            Self::PrerequisiteCycle { members } => {
                let members = members
                    .iter()
                    .map(CourseNumber::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "prerequisite cycle involving {members}")
            }
        }
    }
}

/// Error returned by [`audit`] when the catalog has findings.
#[derive(Debug, thiserror::Error)]
pub struct AuditError {
    issues: NonEmpty<Issue>,
}

impl AuditError {
    /// The findings: unknown prerequisites first, then cycles.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_DISPLAY: usize = 5;

        write!(f, "catalog audit failed: ")?;

        let total = self.issues.len();

        let displayed: Vec<String> = self
            .issues
            .iter()
            .take(MAX_DISPLAY)
            .map(ToString::to_string)
            .collect();

        let msg = displayed.join("; ");

        if total <= MAX_DISPLAY {
            write!(f, "{msg}")
        } else {
            write!(f, "{msg}... (and {} more)", total - MAX_DISPLAY)
        }
    }
}

/// Audits every course reachable through the catalog's listing.
///
/// Reports a finding for each prerequisite that names no catalog record, and
/// one per cycle in the prerequisite graph (including self-references).
/// Records shadowed by a duplicate number are not audited, matching what
/// lookups can reach.
///
/// # Errors
///
/// Returns [`AuditError`] carrying every finding; `Ok(())` means a clean
/// catalog.
pub fn audit(catalog: &Catalog) -> Result<(), AuditError> {
    let mut issues = Vec::new();

    for course in catalog.courses() {
        for prerequisite in course.prerequisites() {
            if catalog.get(prerequisite).is_none() {
                issues.push(Issue::UnknownPrerequisite {
                    course: course.number().clone(),
                    prerequisite: prerequisite.clone(),
                });
            }
        }
    }

    issues.extend(
        cycles(catalog)
            .into_iter()
            .map(|members| Issue::PrerequisiteCycle { members }),
    );

    NonEmpty::from_vec(issues).map_or(Ok(()), |issues| Err(AuditError { issues }))
}

/// All cycles in the prerequisite graph, as sorted member groups.
fn cycles(catalog: &Catalog) -> Vec<Vec<CourseNumber>> {
    let mut index: BTreeMap<&str, &CourseNumber> = BTreeMap::new();
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for course in catalog.courses() {
        index.insert(course.number().as_str(), course.number());
        graph.add_node(course.number().as_str());
        for prerequisite in course.prerequisites() {
            // Unknown prerequisites are reported separately; edges join
            // known records only.
            if catalog.get(prerequisite).is_some() {
                graph.add_edge(course.number().as_str(), prerequisite.as_str(), ());
            }
        }
    }

    let mut cycles = Vec::new();

    for component in tarjan_scc(&graph) {
        if component.len() > 1 {
            let mut members: Vec<CourseNumber> = component
                .iter()
                .filter_map(|node| index.get(node).copied().cloned())
                .collect();
            members.sort();
            cycles.push(members);
            continue;
        }

        let Some(&node) = component.first() else {
            continue;
        };

        if graph.contains_edge(node, node) {
            if let Some(&number) = index.get(node) {
                cycles.push(vec![number.clone()]);
            }
        }
    }

    cycles.sort();
    cycles
}

#[cfg(test)]
mod tests {
    use non_empty_string::NonEmptyString;

    use super::*;
    use crate::domain::Course;

    fn course(number: &str, name: &str, prerequisites: &[&str]) -> Course {
        let mut course = Course::new(
            number.parse().unwrap(),
            NonEmptyString::new(name.to_string()).unwrap(),
        );
        for prerequisite in prerequisites {
            course.add_prerequisite(prerequisite.parse().unwrap());
        }
        course
    }

    #[test]
    fn empty_catalog_is_clean() {
        assert!(audit(&Catalog::new()).is_ok());
    }

    #[test]
    fn consistent_catalog_is_clean() {
        let mut catalog = Catalog::new();
        catalog.insert(course("CS101", "Intro to CS", &[]));
        catalog.insert(course("CS201", "Data Structures", &["CS101"]));
        catalog.insert(course("CS300", "Algorithms", &["CS201", "CS101"]));

        assert!(audit(&catalog).is_ok());
    }

    #[test]
    fn unknown_prerequisite_is_reported() {
        let mut catalog = Catalog::new();
        catalog.insert(course("CS201", "Data Structures", &["CS101"]));

        let error = audit(&catalog).unwrap_err();
        let issues: Vec<&Issue> = error.issues().collect();
        assert_eq!(
            issues,
            vec![&Issue::UnknownPrerequisite {
                course: "CS201".parse().unwrap(),
                prerequisite: "CS101".parse().unwrap(),
            }]
        );
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let mut catalog = Catalog::new();
        catalog.insert(course("CS101", "Intro to CS", &["CS101"]));

        let error = audit(&catalog).unwrap_err();
        let issues: Vec<&Issue> = error.issues().collect();
        assert_eq!(
            issues,
            vec![&Issue::PrerequisiteCycle {
                members: vec!["CS101".parse().unwrap()],
            }]
        );
    }

    #[test]
    fn mutual_prerequisites_are_a_cycle() {
        let mut catalog = Catalog::new();
        catalog.insert(course("CS101", "Intro to CS", &["CS201"]));
        catalog.insert(course("CS201", "Data Structures", &["CS101"]));

        let error = audit(&catalog).unwrap_err();
        let issues: Vec<&Issue> = error.issues().collect();
        assert_eq!(
            issues,
            vec![&Issue::PrerequisiteCycle {
                members: vec!["CS101".parse().unwrap(), "CS201".parse().unwrap()],
            }]
        );
    }

    #[test]
    fn display_truncates_long_issue_lists() {
        let mut catalog = Catalog::new();
        catalog.insert(course(
            "CS400",
            "Capstone",
            &["X1", "X2", "X3", "X4", "X5", "X6", "X7"],
        ));

        let message = audit(&catalog).unwrap_err().to_string();
        assert!(message.starts_with("catalog audit failed: "));
        assert!(message.ends_with("... (and 2 more)"));
    }
}
