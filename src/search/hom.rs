//! Higher-order mutant construction from validated first-order patches.

use rand::prelude::*;

use super::patch::{Patch, Program};
use super::runner::Evaluated;

/// First-order patches whose evaluation passed every test.
pub fn qualifying_foms<P: Program>(sampled: &[Evaluated<P>]) -> Vec<Patch<P>> {
    sampled
        .iter()
        .filter(|e| e.result.all_passed)
        .map(|e| e.patch.clone())
        .collect()
}

/// Union of the edits of `patches`, in order, skipping edits already present.
///
/// Returns `None` for an empty slice.
pub fn combine_foms<P: Program>(patches: &[&Patch<P>]) -> Option<Patch<P>> {
    let (first, rest) = patches.split_first()?;
    let mut combined = (*first).clone();
    for patch in rest {
        for edit in patch.edits() {
            if !combined.contains(edit) {
                combined.add(edit.clone());
            }
        }
    }
    Some(combined)
}

/// Draw how many first-order patches go into the next HOM.
///
/// Uniform in `2..=max(2, min(available, hom_size))`.
pub fn combination_size(available: usize, hom_size: usize, rng: &mut StdRng) -> usize {
    let bound = available.min(hom_size).max(2);
    rng.gen_range(2..=bound)
}

/// Sample `size` first-order patches with replacement and combine them.
pub fn sample_hom<P: Program>(foms: &[Patch<P>], size: usize, rng: &mut StdRng) -> Option<Patch<P>> {
    let picked: Vec<&Patch<P>> = (0..size).filter_map(|_| foms.choose(rng)).collect();
    combine_foms(&picked)
}
