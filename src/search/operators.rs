//! Genetic operators: mutation, tournament selection, uniform crossover, padding.
//!
//! Every operator takes the random stream it draws from explicitly, so the
//! sequence of draws (and therefore a whole run) is fixed by the two seeds.

use rand::prelude::*;

use crate::schema::{ConfigError, EditKind};

use super::fitness::FitnessPolicy;
use super::patch::{Patch, Program};
use super::population::Population;
use super::rng::RngStreams;

/// Number of candidates inspected per tournament.
pub fn tournament_size(individuals: usize, fraction: f64) -> usize {
    ((individuals as f64 * fraction).ceil() as usize).max(1)
}

/// Clone `patch` and append one random edit of an allowed kind.
pub fn mutate<P: Program>(
    patch: &Patch<P>,
    kinds: &[EditKind],
    rng: &mut StdRng,
) -> Result<Patch<P>, ConfigError> {
    let mut mutant = patch.clone();
    mutant.add_random_edit_of_kinds(rng, kinds)?;
    Ok(mutant)
}

/// Tournament selection of `individuals / 2` winners.
///
/// If the population holds fewer than `individuals` members, the candidate
/// list is padded with the baseline so every tournament has enough entrants.
/// Each winner is returned as an independent clone.
pub fn select<P: Program, F: FitnessPolicy + ?Sized>(
    population: &Population<P>,
    baseline: &Patch<P>,
    baseline_fitness: f64,
    individuals: usize,
    tournament_fraction: f64,
    policy: &F,
    rng: &mut StdRng,
) -> Vec<Patch<P>> {
    let mut candidates: Vec<(&Patch<P>, f64)> = population.iter().collect();
    while candidates.len() < individuals {
        candidates.push((baseline, baseline_fitness));
    }

    let size = tournament_size(individuals, tournament_fraction).min(candidates.len());
    let mut selected = Vec::with_capacity(individuals / 2);

    for _ in 0..individuals / 2 {
        candidates.shuffle(rng);

        let (mut best_patch, mut best) = candidates[0];
        for &(patch, fitness) in &candidates[1..size] {
            if policy.compare(fitness, best) > 0.0 {
                best_patch = patch;
                best = fitness;
            }
        }

        selected.push(best_patch.clone());
    }

    selected
}

/// Uniform crossover over shuffled pairs of the selected patches.
///
/// The list is shuffled and split in half; entry `i` is paired with
/// `i + half`. Each pair yields both parents unchanged plus two children
/// grown from the baseline, each parent edit being offered to each child
/// with probability `probability`. An odd trailing patch is dropped.
///
/// `probability` must lie in `[0, 1]`; nothing is drawn otherwise.
pub fn crossover<P: Program>(
    mut selected: Vec<Patch<P>>,
    baseline: &Patch<P>,
    probability: f64,
    rng: &mut RngStreams,
) -> Result<Vec<Patch<P>>, ConfigError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(ConfigError::InvalidCrossoverProbability(probability));
    }
    selected.shuffle(&mut rng.individual);

    let half = selected.len() / 2;
    selected.truncate(half * 2);
    let second = selected.split_off(half);

    let mut crossed = Vec::with_capacity(half * 4);
    for (parent1, parent2) in selected.into_iter().zip(second) {
        let mut child1 = baseline.clone();
        let mut child2 = baseline.clone();
        let draw = &mut rng.mutation;

        for edit in parent1.edits() {
            if draw.gen_bool(probability) {
                child1.add(edit.clone());
            }
        }
        for edit in parent2.edits() {
            if draw.gen_bool(probability) {
                child1.add(edit.clone());
            }
            if draw.gen_bool(probability) {
                child2.add(edit.clone());
            }
        }
        for edit in parent1.edits() {
            if draw.gen_bool(probability) {
                child2.add(edit.clone());
            }
        }

        crossed.push(parent1);
        crossed.push(parent2);
        crossed.push(child1);
        crossed.push(child2);
    }

    Ok(crossed)
}

/// Top `patches` up to `individuals` with clones drawn uniformly from `previous`.
pub fn pad<P: Program>(
    patches: &mut Vec<Patch<P>>,
    previous: &[Patch<P>],
    individuals: usize,
    rng: &mut StdRng,
) {
    while patches.len() < individuals {
        match previous.choose(rng) {
            Some(patch) => patches.push(patch.clone()),
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fitness::RuntimeFitness;
    use crate::search::patch::tests::{SiteEdit, Sites, baseline};
    use proptest::prelude::*;

    fn population_of(fitnesses: &[f64]) -> Population<Sites> {
        let base = baseline();
        let mut population = Population::new();
        for (i, fitness) in fitnesses.iter().enumerate() {
            let mut patch = base.clone();
            patch.add(SiteEdit(EditKind::Statement, i));
            population.insert(patch, *fitness);
        }
        population
    }

    #[test]
    fn test_tournament_size() {
        assert_eq!(tournament_size(10, 0.2), 2);
        assert_eq!(tournament_size(4, 0.2), 1);
        assert_eq!(tournament_size(1, 0.2), 1);
        assert_eq!(tournament_size(11, 0.2), 3);
        assert_eq!(tournament_size(10, 1.0), 10);
    }

    #[test]
    fn test_mutate_adds_exactly_one_edit() {
        let mut rng = StdRng::seed_from_u64(1);
        let base = baseline();
        let once = mutate(&base, &[EditKind::Statement], &mut rng).unwrap();
        let twice = mutate(&once, &[EditKind::Line, EditKind::Statement], &mut rng).unwrap();

        assert!(base.is_empty());
        assert_eq!(once.len(), 1);
        assert_eq!(twice.len(), 2);
        assert_eq!(twice.edits()[0], once.edits()[0]);
    }

    #[test]
    fn test_mutate_without_kinds_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            mutate(&baseline(), &[], &mut rng),
            Err(ConfigError::EmptyEditKinds)
        ));
    }

    #[test]
    fn test_crossover_rejects_bad_probability() {
        let selected: Vec<_> = population_of(&[1.0, 2.0]).patches().cloned().collect();
        for probability in [1.5, -0.1, f64::NAN] {
            let mut rng = RngStreams::new(1, 1);
            assert!(matches!(
                crossover(selected.clone(), &baseline(), probability, &mut rng),
                Err(ConfigError::InvalidCrossoverProbability(_))
            ));
        }
    }

    #[test]
    fn test_full_tournament_picks_best() {
        let population = population_of(&[5.0, 1.0, 3.0, 4.0]);
        let mut rng = StdRng::seed_from_u64(3);
        let selected = select(
            &population,
            &baseline(),
            10.0,
            4,
            1.0,
            &RuntimeFitness::new(),
            &mut rng,
        );
        assert_eq!(selected.len(), 2);
        for patch in &selected {
            assert_eq!(patch.to_string(), "| STATEMENT@1 |");
        }
    }

    #[test]
    fn test_select_pads_with_baseline() {
        let population = population_of(&[]);
        let mut rng = StdRng::seed_from_u64(3);
        let selected = select(
            &population,
            &baseline(),
            10.0,
            6,
            0.2,
            &RuntimeFitness::new(),
            &mut rng,
        );
        assert_eq!(selected.len(), 3);
        assert!(selected.iter().all(|p| p.is_empty()));
    }

    #[test]
    fn test_crossover_keeps_parents_and_builds_children_from_parent_edits() {
        let base = baseline();
        let mut rng = RngStreams::new(11, 13);
        let selected: Vec<_> = population_of(&[1.0, 2.0, 3.0, 4.0])
            .patches()
            .cloned()
            .collect();

        let crossed = crossover(selected, &base, 0.5, &mut rng).unwrap();
        assert_eq!(crossed.len(), 8);

        for pair in crossed.chunks(4) {
            assert_eq!(pair[0].len(), 1);
            assert_eq!(pair[1].len(), 1);
            for child in &pair[2..] {
                assert!(child.len() <= 2);
                for edit in child.edits() {
                    assert!(pair[0].contains(edit) || pair[1].contains(edit));
                }
            }
        }
    }

    #[test]
    fn test_crossover_certain_inclusion() {
        let base = baseline();
        let mut rng = RngStreams::new(1, 1);
        let selected: Vec<_> = population_of(&[1.0, 2.0]).patches().cloned().collect();

        let crossed = crossover(selected, &base, 1.0, &mut rng).unwrap();
        assert_eq!(crossed[2].len(), 2);
        assert_eq!(crossed[3].len(), 2);
        // child1 takes parent1's edits first, child2 parent2's.
        assert_eq!(crossed[2].edits()[0], crossed[0].edits()[0]);
        assert_eq!(crossed[3].edits()[0], crossed[1].edits()[0]);
    }

    #[test]
    fn test_pad_draws_from_previous() {
        let previous: Vec<_> = population_of(&[1.0, 2.0]).patches().cloned().collect();
        let mut patches = Vec::new();
        let mut rng = StdRng::seed_from_u64(5);
        pad(&mut patches, &previous, 5, &mut rng);
        assert_eq!(patches.len(), 5);
        for patch in &patches {
            assert!(previous.iter().any(|p| p.edits() == patch.edits()));
        }
    }

    proptest! {
        #[test]
        fn mutation_adds_exactly_one_edit(
            sites in proptest::collection::vec(0usize..50, 0..12),
            kind_count in 1usize..=4,
            seed in any::<u64>(),
        ) {
            let mut patch = baseline();
            for site in &sites {
                patch.add(SiteEdit(EditKind::Line, *site));
            }
            let kinds = &EditKind::BUILTIN[..kind_count];
            let mut rng = StdRng::seed_from_u64(seed);

            let mutant = mutate(&patch, kinds, &mut rng).unwrap();
            prop_assert_eq!(mutant.len(), patch.len() + 1);
            prop_assert_eq!(&mutant.edits()[..patch.len()], patch.edits());
            prop_assert!(kinds.contains(&mutant.edits()[patch.len()].0));
        }

        #[test]
        fn select_returns_half_of_individuals(
            fitnesses in proptest::collection::vec(0.0f64..100.0, 1..20),
            individuals in 1usize..30,
            seed in any::<u64>(),
        ) {
            let population = population_of(&fitnesses);
            let mut rng = StdRng::seed_from_u64(seed);
            let selected = select(
                &population,
                &baseline(),
                50.0,
                individuals,
                0.2,
                &RuntimeFitness::new(),
                &mut rng,
            );
            prop_assert_eq!(selected.len(), individuals / 2);
        }

        #[test]
        fn crossover_of_even_list_doubles_it(pairs in 0usize..10, seed in any::<u64>()) {
            let fitnesses = vec![1.0; pairs * 2];
            let selected: Vec<_> = population_of(&fitnesses).patches().cloned().collect();
            let mut rng = RngStreams::new(seed, seed.wrapping_add(1));
            let crossed = crossover(selected, &baseline(), 0.5, &mut rng).unwrap();
            prop_assert_eq!(crossed.len(), pairs * 4);
        }
    }
}
