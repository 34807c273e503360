//! Append-only log of executed trials.

use crate::domain::models::Trial;

/// Ordered history of every trial, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ReplayStore {
    trials: Vec<Trial>,
}

impl ReplayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, trial: Trial) {
        self.trials.push(trial);
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trial> {
        self.trials.iter()
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }
}

impl FromIterator<Trial> for ReplayStore {
    fn from_iter<I: IntoIterator<Item = Trial>>(iter: I) -> Self {
        Self {
            trials: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ReplayStore {
    type Item = &'a Trial;
    type IntoIter = std::slice::Iter<'a, Trial>;

    fn into_iter(self) -> Self::IntoIter {
        self.trials.iter()
    }
}
