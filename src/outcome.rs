use std::path::PathBuf;

/// Result of processing one file during caching or committing
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// The file was written to `dest`
    Done {
        source: PathBuf,
        dest: PathBuf,
    },

    /// The file was left out of the run
    Skipped {
        source: PathBuf,
        reason: String,
    },
}

impl ItemOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, ItemOutcome::Done { .. })
    }
}

/// Per-item outcomes of a caching or commit run, in processing order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Summary {
    pub outcomes: Vec<ItemOutcome>,
}

impl Summary {
    pub fn record(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn done_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_done()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.done_count()
    }

    /// Sources that were skipped, with the reason
    #[cfg(test)]
    pub fn skipped(&self) -> Vec<(&std::path::Path, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ItemOutcome::Skipped { source, reason } => Some((source.as_path(), reason.as_str())),
                ItemOutcome::Done { .. } => None,
            })
            .collect()
    }
}
