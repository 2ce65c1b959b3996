//! Location pick store.
//!
//! Holds the start and end picks with their display addresses, and which of
//! the two the next map tap should fill. A single `PickTarget` replaces a
//! pair of "selecting start"/"selecting end" flags, so selecting both at
//! once cannot be expressed.

use serde::{Deserialize, Serialize};

use crate::domain::Coordinate;

/// One of the two pick slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickSlot {
    Start,
    End,
}

/// Which pick the next resolved location should populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickTarget {
    #[default]
    None,
    Start,
    End,
}

impl PickTarget {
    /// The slot this target fills, if any.
    pub fn slot(self) -> Option<PickSlot> {
        match self {
            PickTarget::None => None,
            PickTarget::Start => Some(PickSlot::Start),
            PickTarget::End => Some(PickSlot::End),
        }
    }
}

impl From<PickSlot> for PickTarget {
    fn from(slot: PickSlot) -> Self {
        match slot {
            PickSlot::Start => PickTarget::Start,
            PickSlot::End => PickTarget::End,
        }
    }
}

/// A pick slot's coordinate and the address shown for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pick {
    pub coordinate: Option<Coordinate>,
    /// Reverse-geocoded address; empty until a lookup succeeds.
    pub address: String,
}

/// The start and end picks plus the active pick target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationPicks {
    start: Pick,
    end: Pick,
    target: PickTarget,
}

impl LocationPicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<Coordinate> {
        self.start.coordinate
    }

    pub fn end(&self) -> Option<Coordinate> {
        self.end.coordinate
    }

    pub fn target(&self) -> PickTarget {
        self.target
    }

    /// The pick stored in `slot`.
    pub fn pick(&self, slot: PickSlot) -> &Pick {
        match slot {
            PickSlot::Start => &self.start,
            PickSlot::End => &self.end,
        }
    }

    fn pick_mut(&mut self, slot: PickSlot) -> &mut Pick {
        match slot {
            PickSlot::Start => &mut self.start,
            PickSlot::End => &mut self.end,
        }
    }

    /// Both picks, when both are present.
    pub fn pair(&self) -> Option<(Coordinate, Coordinate)> {
        Some((self.start.coordinate?, self.end.coordinate?))
    }

    /// Returns true when both start and end are present.
    pub fn is_complete(&self) -> bool {
        self.pair().is_some()
    }

    /// Record which pick the next resolution should fill.
    pub fn set_target(&mut self, target: PickTarget) {
        self.target = target;
    }

    /// Store `coordinate` in `slot`.
    ///
    /// Clears the pick target if it pointed at `slot`. Returns true if the
    /// stored pick changed; a new coordinate also resets the address, which
    /// belonged to the previous pick.
    pub fn resolve(&mut self, slot: PickSlot, coordinate: Coordinate) -> bool {
        if self.target == PickTarget::from(slot) {
            self.target = PickTarget::None;
        }

        let pick = self.pick_mut(slot);
        if pick.coordinate == Some(coordinate) {
            return false;
        }

        pick.coordinate = Some(coordinate);
        pick.address.clear();
        true
    }

    /// Set the address for `slot` if it still holds `coordinate`.
    ///
    /// Returns false for a lookup that no longer matches the pick.
    pub fn set_address(&mut self, slot: PickSlot, coordinate: Coordinate, address: String) -> bool {
        let pick = self.pick_mut(slot);
        if pick.coordinate != Some(coordinate) {
            return false;
        }
        pick.address = address;
        true
    }
}
