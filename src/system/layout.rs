use indexmap::IndexMap;

use super::error::SystemError;

/// Ordered phase names. The order is part of the system contract: phase
/// slots trail the velocity/pressure block in roster order, so closure
/// handling knows which phase occupies the trailing slot. There is no
/// mutation API; the roster is fixed for the life of the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseRoster {
    phases: Vec<String>,
}

impl PhaseRoster {
    pub fn new(phases: Vec<String>) -> Self {
        Self { phases }
    }

    pub fn from_names(names: &[&str]) -> Self {
        Self::new(names.iter().map(|name| name.to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn phase(&self, index: usize) -> Option<&str> {
        self.phases.get(index).map(|name| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.phases.iter().map(|name| name.as_str())
    }

    /// Field name of a phase fraction, `alpha.<phase>`.
    pub fn field_name(phase: &str) -> String {
        format!("alpha.{}", phase)
    }

    /// Per-phase fraction field names in roster order.
    pub fn field_names(&self) -> Vec<String> {
        self.phases
            .iter()
            .map(|phase| Self::field_name(phase))
            .collect()
    }
}

/// Position of one field inside the per-cell block: first equation row and
/// number of consecutive rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    offset: usize,
    components: usize,
}

impl Slot {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn components(&self) -> usize {
        self.components
    }
}

/// Field name to block-row mapping. The layout is fixed: velocity
/// components first, pressure next, then one row per phase fraction in
/// roster order. Slot ranges partition `0..n_eqns` with no gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMap {
    slots: IndexMap<String, Slot>,
    n_eqns: usize,
}

impl SlotMap {
    pub fn build(
        roster: &PhaseRoster,
        velocity_name: &str,
        pressure_name: &str,
    ) -> Result<Self, SystemError> {
        let mut entries: Vec<(String, usize)> = Vec::with_capacity(roster.len() + 2);
        entries.push((velocity_name.to_string(), 3));
        entries.push((pressure_name.to_string(), 1));
        for field in roster.field_names() {
            entries.push((field, 1));
        }

        let mut slots = IndexMap::with_capacity(entries.len());
        let mut offset = 0;
        for (name, components) in entries {
            if slots.contains_key(&name) {
                return Err(SystemError::DuplicateField { field: name });
            }
            slots.insert(name, Slot { offset, components });
            offset += components;
        }

        Ok(Self {
            slots,
            n_eqns: offset,
        })
    }

    /// Equation rows per cell.
    pub fn n_eqns(&self) -> usize {
        self.n_eqns
    }

    /// Number of named slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, name: &str) -> Option<Slot> {
        self.slots.get(name).copied()
    }

    pub fn offset_for(&self, name: &str) -> Option<usize> {
        self.slot(name).map(|slot| slot.offset())
    }

    /// Slot names in layout order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.keys().map(|name| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Slot)> + '_ {
        self.slots.iter().map(|(name, slot)| (name.as_str(), *slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_phase_layout_puts_phases_in_trailing_slots() {
        let roster = PhaseRoster::from_names(&["air", "water"]);
        let map = SlotMap::build(&roster, "U", "p").unwrap();
        assert_eq!(map.n_eqns(), 6);
        assert_eq!(map.len(), 4);
        assert_eq!(map.offset_for("U"), Some(0));
        assert_eq!(map.slot("U").unwrap().components(), 3);
        assert_eq!(map.offset_for("p"), Some(3));
        assert_eq!(map.offset_for("alpha.air"), Some(4));
        assert_eq!(map.offset_for("alpha.water"), Some(5));
        assert_eq!(map.offset_for("alpha.oil"), None);
    }

    #[test]
    fn empty_roster_keeps_the_fixed_block() {
        let roster = PhaseRoster::new(Vec::new());
        let map = SlotMap::build(&roster, "U", "p").unwrap();
        assert_eq!(map.n_eqns(), 4);
        let names: Vec<&str> = map.names().collect();
        assert_eq!(names, ["U", "p"]);
    }

    #[test]
    fn slot_ranges_partition_the_block() {
        let roster = PhaseRoster::from_names(&["a", "b", "c"]);
        let map = SlotMap::build(&roster, "U", "p").unwrap();
        let mut covered = vec![0usize; map.n_eqns()];
        for (_, slot) in map.iter() {
            for row in slot.offset()..slot.offset() + slot.components() {
                covered[row] += 1;
            }
        }
        assert!(covered.iter().all(|&count| count == 1));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let roster = PhaseRoster::from_names(&["air", "air"]);
        let err = SlotMap::build(&roster, "U", "p").unwrap_err();
        assert!(matches!(
            err,
            SystemError::DuplicateField { field } if field == "alpha.air"
        ));

        let roster = PhaseRoster::from_names(&["air"]);
        let err = SlotMap::build(&roster, "U", "U").unwrap_err();
        assert!(matches!(err, SystemError::DuplicateField { field } if field == "U"));
    }

    #[test]
    fn roster_field_names_follow_roster_order() {
        let roster = PhaseRoster::from_names(&["water", "air"]);
        assert_eq!(roster.field_names(), ["alpha.water", "alpha.air"]);
        assert_eq!(roster.phase(0), Some("water"));
        assert_eq!(roster.phase(2), None);
        assert_eq!(PhaseRoster::field_name("oil"), "alpha.oil");
    }
}
