//! Patch model: an ordered sequence of opaque edits bound to one program.

use std::fmt;
use std::sync::Arc;

use rand::prelude::*;

use crate::schema::{ConfigError, EditKind};

/// Program representation a patch is bound to.
///
/// The engine never looks inside an edit. It only asks the program to
/// synthesize a random edit of a given kind and hands the finished patch to
/// a [`TestRunner`](super::TestRunner), which is responsible for applying it.
pub trait Program: Send + Sync {
    /// Edit token produced by this program.
    type Edit: Clone + PartialEq + fmt::Display + Send + Sync;

    /// Synthesize one random edit of `kind` against this program.
    fn random_edit(&self, kind: &EditKind, rng: &mut StdRng) -> Self::Edit;
}

/// An ordered sequence of edits over a base program.
///
/// Cloning copies the edit sequence, so a clone can be extended without
/// affecting the original. The program itself is shared.
pub struct Patch<P: Program> {
    program: Arc<P>,
    edits: Vec<P::Edit>,
}

impl<P: Program> Patch<P> {
    /// Empty patch over `program`; this is the unmodified baseline.
    pub fn new(program: Arc<P>) -> Self {
        Self {
            program,
            edits: Vec::new(),
        }
    }

    /// Program this patch applies to.
    pub fn program(&self) -> &Arc<P> {
        &self.program
    }

    /// Edits in application order.
    pub fn edits(&self) -> &[P::Edit] {
        &self.edits
    }

    /// Number of edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether this is the unmodified baseline.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Append an edit.
    pub fn add(&mut self, edit: P::Edit) {
        self.edits.push(edit);
    }

    /// Pick one kind uniformly among `kinds`, synthesize an edit of it and append it.
    ///
    /// An empty `kinds` is rejected and leaves the patch untouched.
    pub fn add_random_edit_of_kinds(
        &mut self,
        rng: &mut StdRng,
        kinds: &[EditKind],
    ) -> Result<(), ConfigError> {
        let kind = kinds.choose(rng).ok_or(ConfigError::EmptyEditKinds)?;
        let edit = self.program.random_edit(kind, rng);
        self.edits.push(edit);
        Ok(())
    }

    /// Whether `edit` is already part of this patch.
    pub fn contains(&self, edit: &P::Edit) -> bool {
        self.edits.contains(edit)
    }
}

impl<P: Program> Clone for Patch<P> {
    fn clone(&self) -> Self {
        Self {
            program: Arc::clone(&self.program),
            edits: self.edits.clone(),
        }
    }
}

impl<P: Program> fmt::Debug for Patch<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Patch").field(&self.to_string()).finish()
    }
}

impl<P: Program> fmt::Display for Patch<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edit in &self.edits {
            write!(f, "| {} ", edit)?;
        }
        f.write_str("|")
    }
}
