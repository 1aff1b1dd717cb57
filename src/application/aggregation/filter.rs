//! Change kind filter applied before the engine does any work.

use crate::domain::ChangeKind;

/// Set of change kinds admitted to aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    kinds: Vec<ChangeKind>,
}

impl EventFilter {
    pub fn new(kinds: impl IntoIterator<Item = ChangeKind>) -> Self {
        let mut kinds: Vec<ChangeKind> = kinds.into_iter().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds.dedup();
        Self { kinds }
    }

    #[must_use]
    pub fn admits(&self, kind: ChangeKind) -> bool {
        self.kinds.contains(&kind)
    }

    #[must_use]
    pub fn kinds(&self) -> &[ChangeKind] {
        &self.kinds
    }
}

/// Inserts and modifies only. Removals never reach the engine.
impl Default for EventFilter {
    fn default() -> Self {
        Self::new([ChangeKind::Insert, ChangeKind::Modify])
    }
}
