//! Registry of owned and opposing units with their target commitments.

use pellet_rush_core::{CellCoord, Side, UnitAttributes, UnitId, UnitSnapshot};

#[derive(Clone, Debug)]
pub(crate) struct Unit {
    id: UnitId,
    side: Side,
    cell: CellCoord,
    attributes: UnitAttributes,
    target: CellCoord,
    target_distance: Option<u32>,
}

impl Unit {
    fn sighted(id: UnitId, side: Side, cell: CellCoord, attributes: UnitAttributes) -> Self {
        Self {
            id,
            side,
            cell,
            attributes,
            target: cell,
            target_distance: None,
        }
    }

    pub(crate) fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) fn target(&self) -> CellCoord {
        self.target
    }

    pub(crate) fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            side: self.side,
            cell: self.cell,
            attributes: self.attributes.clone(),
            target: self.target,
            target_distance: self.target_distance,
        }
    }
}

/// Outcome of [`UnitTracker::upsert_or_create`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Sighting {
    New,
    Updated,
}

/// Units are inserted on first sighting and never removed.
#[derive(Clone, Debug, Default)]
pub(crate) struct UnitTracker {
    mine: Vec<Unit>,
    opponents: Vec<Unit>,
}

impl UnitTracker {
    /// Overwrites position and attributes of a known unit, keeping its
    /// target, or starts tracking a new unit that targets its own cell.
    pub(crate) fn upsert_or_create(
        &mut self,
        id: UnitId,
        side: Side,
        cell: CellCoord,
        attributes: UnitAttributes,
    ) -> Sighting {
        let units = self.side_mut(side);
        if let Some(unit) = units.iter_mut().find(|unit| unit.id == id) {
            unit.cell = cell;
            unit.attributes = attributes;
            return Sighting::Updated;
        }

        units.push(Unit::sighted(id, side, cell, attributes));
        Sighting::New
    }

    pub(crate) fn mine(&self, id: UnitId) -> Option<&Unit> {
        self.mine.iter().find(|unit| unit.id == id)
    }

    /// Resets the target of an owned unit to its own cell and forgets the
    /// cached distance. Returns the previous target.
    pub(crate) fn clear_target(&mut self, id: UnitId) -> Option<CellCoord> {
        let unit = self.mine_mut(id)?;
        let previous = unit.target;
        unit.target = unit.cell;
        unit.target_distance = None;
        Some(previous)
    }

    /// Commits an owned unit to `target`. Returns the previous target.
    pub(crate) fn assign_target(
        &mut self,
        id: UnitId,
        target: CellCoord,
        distance: u32,
    ) -> Option<CellCoord> {
        let unit = self.mine_mut(id)?;
        let previous = unit.target;
        unit.target = target;
        unit.target_distance = Some(distance);
        Some(previous)
    }

    /// Parks an owned unit on its cell with a zero distance. Returns the
    /// previous target.
    pub(crate) fn hold_position(&mut self, id: UnitId) -> Option<CellCoord> {
        let unit = self.mine_mut(id)?;
        let previous = unit.target;
        unit.target = unit.cell;
        unit.target_distance = Some(0);
        Some(previous)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.mine.iter().chain(self.opponents.iter())
    }

    fn mine_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.mine.iter_mut().find(|unit| unit.id == id)
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<Unit> {
        match side {
            Side::Mine => &mut self.mine,
            Side::Opponent => &mut self.opponents,
        }
    }
}
