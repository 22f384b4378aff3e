//! Population of surviving patches keyed by identity.

use super::patch::{Patch, Program};

/// Surviving patches of one generation with their fitness.
///
/// Each entry is a distinct patch object; two entries with equal edit
/// sequences are still two members. Apart from the baseline fallback, every
/// member has passed the survival threshold.
pub struct Population<P: Program> {
    members: Vec<(Patch<P>, f64)>,
}

impl<P: Program> Population<P> {
    /// Empty population.
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Population holding only the baseline.
    pub fn baseline(baseline: &Patch<P>, fitness: f64) -> Self {
        let mut population = Self::new();
        population.insert(baseline.clone(), fitness);
        population
    }

    /// Append a member; equal patches are kept as separate members.
    pub fn insert(&mut self, patch: Patch<P>, fitness: f64) {
        self.members.push((patch, fitness));
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no patch survived.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members with their fitness, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Patch<P>, f64)> {
        self.members.iter().map(|(p, f)| (p, *f))
    }

    /// Member patches, in insertion order.
    pub fn patches(&self) -> impl Iterator<Item = &Patch<P>> {
        self.members.iter().map(|(p, _)| p)
    }
}

impl<P: Program> Default for Population<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EditKind;
    use crate::search::patch::tests::{SiteEdit, Sites, baseline};

    #[test]
    fn test_members_keep_insertion_order() {
        let base = baseline();
        let mut population = Population::baseline(&base, 10.0);

        let mut faster = base.clone();
        faster.add(SiteEdit(EditKind::Line, 1));
        population.insert(faster.clone(), 8.0);
        // Equal patches are distinct members.
        population.insert(faster, 8.0);

        let members: Vec<(String, f64)> = population
            .iter()
            .map(|(patch, fitness)| (patch.to_string(), fitness))
            .collect();
        assert_eq!(
            members,
            vec![
                ("|".to_string(), 10.0),
                ("| LINE@1 |".to_string(), 8.0),
                ("| LINE@1 |".to_string(), 8.0),
            ]
        );
        assert_eq!(population.len(), 3);
    }

    #[test]
    fn test_new_population_is_empty() {
        let population: Population<Sites> = Population::default();
        assert!(population.is_empty());
        assert_eq!(population.patches().count(), 0);
    }
}
