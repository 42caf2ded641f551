//! Registry of pellets keyed by the cell they occupy.

use pellet_rush_core::{CellCoord, PelletState, PelletValue};

/// Pellet registry rebuilt from visibility every turn.
///
/// Entries are kept in first-sighting order, which doubles as the tie-break
/// order for nearest-pellet scans.
#[derive(Clone, Debug, Default)]
pub struct PelletTracker {
    pellets: Vec<PelletState>,
}

/// Pellet picked by [`PelletTracker::closest_available`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PelletCandidate {
    /// Cell holding the pellet.
    pub cell: CellCoord,
    /// Point value of the pellet.
    pub value: PelletValue,
    /// Path length from the search origin, in hops.
    pub distance: u32,
}

impl PelletTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked pellets, consumed ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pellets.len()
    }

    /// Whether the tracker holds no pellets at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pellets.is_empty()
    }

    /// Iterator over all tracked pellets in first-sighting order.
    pub fn iter(&self) -> impl Iterator<Item = &PelletState> {
        self.pellets.iter()
    }

    /// Marks every known pellet consumed ahead of a new turn's sightings.
    ///
    /// Pellets that are not reported again stay consumed.
    pub fn reset_visibility(&mut self) {
        for pellet in &mut self.pellets {
            pellet.consumed = true;
        }
    }

    /// Records a sighting, reviving the pellet at `cell` or inserting a new one.
    ///
    /// Returns `true` when a new entry was inserted. The `targeted` flag of an
    /// existing entry is preserved.
    pub fn upsert(&mut self, cell: CellCoord, value: PelletValue) -> bool {
        if let Some(pellet) = self.get_mut(cell) {
            pellet.value = value;
            pellet.consumed = false;
            return false;
        }

        self.pellets.push(PelletState {
            cell,
            value,
            consumed: false,
            targeted: false,
        });
        true
    }

    /// Pellet tracked at the cell, whatever its state.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&PelletState> {
        self.pellets.iter().find(|pellet| pellet.cell == cell)
    }

    /// Pellet at the cell if it has not been eaten.
    #[must_use]
    pub fn live_at(&self, cell: CellCoord) -> Option<&PelletState> {
        self.get(cell).filter(|pellet| pellet.is_live())
    }

    /// Flags the live pellet at `cell` as eaten. Returns `true` if one was.
    pub fn mark_consumed_at(&mut self, cell: CellCoord) -> bool {
        match self.get_mut(cell) {
            Some(pellet) if pellet.is_live() => {
                pellet.consumed = true;
                true
            }
            _ => false,
        }
    }

    /// Claims the pellet at `cell` for an owned unit. Returns `true` on change.
    pub fn mark_targeted(&mut self, cell: CellCoord) -> bool {
        match self.get_mut(cell) {
            Some(pellet) if !pellet.targeted => {
                pellet.targeted = true;
                true
            }
            _ => false,
        }
    }

    /// Releases the claim on the pellet at `cell`. Returns `true` on change.
    pub fn clear_targeted(&mut self, cell: CellCoord) -> bool {
        match self.get_mut(cell) {
            Some(pellet) if pellet.targeted => {
                pellet.targeted = false;
                true
            }
            _ => false,
        }
    }

    /// Finds the nearest live, unclaimed pellet whose value passes `filter`.
    ///
    /// `distance` reports the path length from `from` to a pellet cell, or
    /// `None` when the pellet is unreachable, in which case it is skipped.
    /// Exact ties keep the pellet seen first.
    pub fn closest_available<P, D>(
        &self,
        from: CellCoord,
        mut filter: P,
        mut distance: D,
    ) -> Option<PelletCandidate>
    where
        P: FnMut(PelletValue) -> bool,
        D: FnMut(CellCoord, CellCoord) -> Option<u32>,
    {
        let mut best: Option<PelletCandidate> = None;

        for pellet in &self.pellets {
            if !pellet.is_available() || !filter(pellet.value) {
                continue;
            }

            let Some(hops) = distance(from, pellet.cell) else {
                continue;
            };

            if best.map_or(true, |current| hops < current.distance) {
                best = Some(PelletCandidate {
                    cell: pellet.cell,
                    value: pellet.value,
                    distance: hops,
                });
            }
        }

        best
    }

    fn get_mut(&mut self, cell: CellCoord) -> Option<&mut PelletState> {
        self.pellets.iter_mut().find(|pellet| pellet.cell == cell)
    }
}
