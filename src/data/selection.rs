use super::model::Region;

// ---------------------------------------------------------------------------
// SelectionSet – regions the user chose to compare
// ---------------------------------------------------------------------------

/// Ordered set of distinct regions owned by one session.
///
/// Insertion order is kept for display; adding a region that is already
/// present does nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    regions: Vec<Region>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `region` unless it is already selected.  Returns `true` when
    /// the set changed.
    pub fn add(&mut self, region: Region) -> bool {
        if self.regions.contains(&region) {
            return false;
        }
        self.regions.push(region);
        true
    }

    /// Drop every selected region.
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Selected regions in first-added order.
    pub fn all(&self) -> &[Region] {
        &self.regions
    }

    pub fn contains(&self, region: &Region) -> bool {
        self.regions.contains(region)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
