//! Target method and unit test identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single test case, identified by its class and method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitTest {
    pub class_name: String,
    pub method_name: String,
}

impl UnitTest {
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
        }
    }
}

impl fmt::Display for UnitTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class_name, self.method_name)
    }
}

/// The routine under improvement together with the tests that exercise it.
///
/// Supplied once per method by the profiling collaborator and never modified
/// during a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMethod {
    /// Owning class or module.
    pub class_name: String,
    /// Method signature, e.g. `sort(int[])`.
    pub method_name: String,
    /// Fixed test set used for every fitness evaluation of this method.
    #[serde(default)]
    pub tests: Vec<UnitTest>,
}

impl TargetMethod {
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            tests: Vec::new(),
        }
    }

    pub fn with_tests(mut self, tests: Vec<UnitTest>) -> Self {
        self.tests = tests;
        self
    }
}

impl fmt::Display for TargetMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class_name, self.method_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_identifier() {
        let method = TargetMethod::new("org.example.Sorter", "sort(int[])")
            .with_tests(vec![UnitTest::new("org.example.SorterTest", "sortsEmpty")]);
        assert_eq!(method.to_string(), "org.example.Sorter.sort(int[])");
        assert_eq!(method.tests[0].to_string(), "org.example.SorterTest.sortsEmpty");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let method: TargetMethod =
            serde_json::from_str(r#"{"class_name":"A","method_name":"f()"}"#).unwrap();
        assert!(method.tests.is_empty());
    }
}
