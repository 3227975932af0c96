//! In-memory entity graph built during a compile run.
//!
//! [`Catalog`] is both the faction registry and the unit resolver. Factions
//! and units are only ever appended, so the id index stores slot positions
//! that stay valid for the whole run.

use std::collections::HashMap;

use codex_catalog::{Faction, Unit};

use crate::error::LinkError;

const REGISTRY: &str = "Factions";
const RESOLVER: &str = "Units";

/// Factions keyed by id, plus a global unit id index.
#[derive(Debug, Default)]
pub struct Catalog {
    factions: Vec<Faction>,
    faction_index: HashMap<String, usize>,
    /// unit id → (faction slot, unit slot)
    unit_index: HashMap<String, (usize, usize)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registry ────────────────────────────────────────────────────────────

    /// Create a faction with empty collections.
    ///
    /// Fails if `id` or `name` is empty. Initializing a known id again only
    /// updates its name.
    pub fn initialize_faction(&mut self, id: &str, name: &str) -> Result<&mut Faction, LinkError> {
        if id.is_empty() {
            return Err(LinkError::empty(REGISTRY, "id"));
        }
        if name.is_empty() {
            return Err(LinkError::empty(REGISTRY, "name"));
        }

        let slot = match self.faction_index.get(id) {
            Some(&slot) => {
                self.factions[slot].name = name.to_string();
                slot
            }
            None => {
                self.factions.push(Faction::new(id, name));
                let slot = self.factions.len() - 1;
                self.faction_index.insert(id.to_string(), slot);
                slot
            }
        };
        Ok(&mut self.factions[slot])
    }

    pub fn faction(&self, id: &str) -> Option<&Faction> {
        self.faction_index.get(id).map(|&slot| &self.factions[slot])
    }

    pub fn faction_mut(&mut self, id: &str) -> Option<&mut Faction> {
        self.faction_index
            .get(id)
            .map(|&slot| &mut self.factions[slot])
    }

    /// Factions in registration order.
    pub fn factions(&self) -> &[Faction] {
        &self.factions
    }

    pub fn into_factions(self) -> Vec<Faction> {
        self.factions
    }

    pub fn faction_count(&self) -> usize {
        self.factions.len()
    }

    // ── Resolver ────────────────────────────────────────────────────────────

    /// Add a unit under its owning faction.
    pub fn register_unit(&mut self, unit: Unit) -> Result<&mut Unit, LinkError> {
        if self.unit_index.contains_key(&unit.id) {
            return Err(LinkError::DuplicateUnit { id: unit.id });
        }
        let Some(&faction_slot) = self.faction_index.get(&unit.faction_id) else {
            return Err(LinkError::missing(RESOLVER, "faction_id", unit.faction_id));
        };

        let units = &mut self.factions[faction_slot].units;
        units.push(unit);
        let unit_slot = units.len() - 1;
        let id = units[unit_slot].id.clone();
        self.unit_index.insert(id, (faction_slot, unit_slot));
        Ok(&mut self.factions[faction_slot].units[unit_slot])
    }

    /// Return the unit with `unit_id`, creating a placeholder under
    /// `faction_id` if it has not been seen yet.
    pub fn ensure_unit(&mut self, faction_id: &str, unit_id: &str) -> Result<&mut Unit, LinkError> {
        if unit_id.is_empty() {
            return Err(LinkError::empty(RESOLVER, "id"));
        }
        match self.unit_index.get(unit_id).copied() {
            Some((faction_slot, unit_slot)) => {
                let owner = &self.factions[faction_slot].id;
                if owner != faction_id {
                    return Err(LinkError::FactionMismatch {
                        id: unit_id.to_string(),
                        owner: owner.clone(),
                        requested: faction_id.to_string(),
                    });
                }
                Ok(&mut self.factions[faction_slot].units[unit_slot])
            }
            None => {
                log::debug!("Creating unit '{unit_id}' under faction '{faction_id}'");
                self.register_unit(Unit::placeholder(unit_id, faction_id))
            }
        }
    }

    /// Look up a unit and its owning faction.
    pub fn find_unit(&self, unit_id: &str) -> Option<(&Faction, &Unit)> {
        self.unit_index
            .get(unit_id)
            .map(|&(faction_slot, unit_slot)| {
                let faction = &self.factions[faction_slot];
                (faction, &faction.units[unit_slot])
            })
    }

    pub fn find_unit_mut(&mut self, unit_id: &str) -> Option<&mut Unit> {
        self.unit_index
            .get(unit_id)
            .map(|&(faction_slot, unit_slot)| &mut self.factions[faction_slot].units[unit_slot])
    }

    pub fn unit_count(&self) -> usize {
        self.unit_index.len()
    }
}
