use std::collections::BTreeSet;
use std::sync::Arc;

use crate::layout::SectionView;

/// Indices of the sections that start open: all but those marked collapsed.
pub fn initial_open_sections(sections: &[SectionView]) -> BTreeSet<usize> {
    sections
        .iter()
        .enumerate()
        .filter(|(_, section)| section.initially_open)
        .map(|(index, _)| index)
        .collect()
}

/// Which sections of one tab are open. Local UI state: it resets whenever
/// the tab is handed a different section list.
#[derive(Debug, Clone)]
pub struct SectionOpenState {
    sections: Arc<Vec<SectionView>>,
    open: BTreeSet<usize>,
}

impl SectionOpenState {
    pub fn new(sections: &Arc<Vec<SectionView>>) -> Self {
        Self {
            sections: Arc::clone(sections),
            open: initial_open_sections(sections),
        }
    }

    /// Point the state at `sections`. Returns true when that is a different
    /// list than before, in which case the open set was recomputed.
    pub fn sync(&mut self, sections: &Arc<Vec<SectionView>>) -> bool {
        if Arc::ptr_eq(&self.sections, sections) {
            return false;
        }
        *self = Self::new(sections);
        true
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open.contains(&index)
    }

    /// Flip one section. Indices outside the list are ignored.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.sections.len() {
            return;
        }
        if !self.open.remove(&index) {
            self.open.insert(index);
        }
    }

    pub fn open_sections(&self) -> &BTreeSet<usize> {
        &self.open
    }
}
