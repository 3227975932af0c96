//! Data model types for the compiled rules catalog.
//!
//! These types are the document schema consumed by browsing clients: one
//! [`Faction`] document per faction, each carrying its full unit graph, plus a
//! list of [`FactionSummary`] entries for navigation.

use serde::{Deserialize, Serialize};

// ── Faction ─────────────────────────────────────────────────────────────────

/// A top-level army grouping, emitted as one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faction {
    pub id: String,
    pub name: String,
    /// Units in the order they were first registered.
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub detachments: Vec<Detachment>,
    /// Flat mirror of every detachment's stratagems.
    #[serde(default)]
    pub stratagems: Vec<Stratagem>,
    /// Flat mirror of every detachment's abilities.
    #[serde(default)]
    pub detachment_abilities: Vec<DetachmentAbility>,
}

impl Faction {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Summary entry for the navigation document.
    pub fn summary(&self) -> FactionSummary {
        FactionSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    /// Find a detachment by name, creating it on first reference.
    pub fn detachment_mut(&mut self, name: &str) -> &mut Detachment {
        let pos = match self.detachments.iter().position(|d| d.name == name) {
            Some(pos) => pos,
            None => {
                self.detachments.push(Detachment::new(name));
                self.detachments.len() - 1
            }
        };
        &mut self.detachments[pos]
    }

    /// Find a detachment by name.
    pub fn detachment(&self, name: &str) -> Option<&Detachment> {
        self.detachments.iter().find(|d| d.name == name)
    }
}

/// Lightweight `{id, name}` entry of the summary document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionSummary {
    pub id: String,
    pub name: String,
}

// ── Unit ────────────────────────────────────────────────────────────────────

/// A datasheet: one kind of unit with its stats, weapons and rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    /// Owning faction. A unit belongs to exactly one faction.
    pub faction_id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub loadout: String,
    #[serde(default)]
    pub transport: String,
    #[serde(default)]
    pub damaged_w: String,
    #[serde(default)]
    pub damaged_description: String,
    /// Curator-owned artwork reference. Never supplied by the relational
    /// source; recovered from previously written documents.
    #[serde(default, alias = "unit_img")]
    pub image: String,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub ranged_weapons: Vec<Weapon>,
    #[serde(default)]
    pub melee_weapons: Vec<Weapon>,
    #[serde(default)]
    pub abilities: Abilities,
    #[serde(default)]
    pub costs: Vec<Cost>,
    #[serde(default)]
    pub keywords: Keywords,
    #[serde(default)]
    pub options: Vec<UnitOption>,
    #[serde(default)]
    pub compositions: Vec<Composition>,
    /// Units this unit can lead. Display references only.
    #[serde(default)]
    pub leads: Vec<UnitRef>,
}

impl Unit {
    /// A minimal unit carrying only its identity.
    pub fn placeholder(id: impl Into<String>, faction_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            faction_id: faction_id.into(),
            ..Default::default()
        }
    }

    /// File a weapon under ranged or melee according to its type.
    pub fn add_weapon(&mut self, weapon: Weapon) {
        if weapon.is_melee() {
            self.melee_weapons.push(weapon);
        } else {
            self.ranged_weapons.push(weapon);
        }
    }

    /// Non-owning reference suitable for another unit's `leads` list.
    pub fn as_ref_entry(&self) -> UnitRef {
        UnitRef {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

/// Denormalized display reference to another unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRef {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "unit_img")]
    pub image: String,
}

/// One row of core statistics for a unit or one of its model configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub movement: String,
    pub toughness: String,
    pub save: String,
    #[serde(default)]
    pub invulnerable_save: String,
    #[serde(default)]
    pub invulnerable_description: String,
    pub wounds: String,
    pub leadership: String,
    pub objective_control: String,
    #[serde(default)]
    pub base_size: String,
    #[serde(default)]
    pub base_size_description: String,
}

// ── Weapons ─────────────────────────────────────────────────────────────────

/// Literal weapon type that marks a melee weapon.
pub const MELEE: &str = "Melee";

/// A weapon profile. Stat values stay textual (`D6+1`, `User`, `2+`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    #[serde(default)]
    pub special_rules: Vec<String>,
    pub range: String,
    #[serde(rename = "type")]
    pub weapon_type: String,
    pub attacks: String,
    pub skill: String,
    pub strength: String,
    #[serde(rename = "AP")]
    pub ap: String,
    pub damage: String,
}

impl Weapon {
    pub fn is_melee(&self) -> bool {
        self.weapon_type == MELEE
    }
}

// ── Abilities ───────────────────────────────────────────────────────────────

/// Category an ability is filed under on its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityType {
    Core,
    Faction,
    Datasheet,
    Wargear,
    Special,
    Fortification,
    Primarch,
}

impl AbilityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Faction => "faction",
            Self::Datasheet => "datasheet",
            Self::Wargear => "wargear",
            Self::Special => "special",
            Self::Fortification => "fortification",
            Self::Primarch => "primarch",
        }
    }

    /// Classify a source type label. Returns `None` for labels that match no
    /// known category.
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        if lower.contains("primarch") {
            Some(Self::Primarch)
        } else if lower.contains("fortification") {
            Some(Self::Fortification)
        } else if lower.starts_with("core") {
            Some(Self::Core)
        } else if lower.starts_with("faction") {
            Some(Self::Faction)
        } else if lower.starts_with("wargear") {
            Some(Self::Wargear)
        } else if lower.starts_with("special") {
            Some(Self::Special)
        } else if lower.starts_with("datasheet") {
            Some(Self::Datasheet)
        } else {
            None
        }
    }
}

/// A rule attached to a datasheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub datasheet_id: String,
    pub line: String,
    #[serde(default)]
    pub ability_id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub ability_type: String,
    #[serde(default)]
    pub parameter: String,
}

impl Ability {
    /// Two abilities are the same entry when name, description and line agree.
    pub fn same_entry(&self, other: &Ability) -> bool {
        self.name == other.name && self.description == other.description && self.line == other.line
    }
}

/// A unit's abilities, grouped by [`AbilityType`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    #[serde(default)]
    pub core: Vec<Ability>,
    #[serde(default)]
    pub faction: Vec<Ability>,
    #[serde(default)]
    pub datasheet: Vec<Ability>,
    #[serde(default)]
    pub wargear: Vec<Ability>,
    #[serde(default)]
    pub special: Vec<Ability>,
    #[serde(default)]
    pub fortification: Vec<Ability>,
    #[serde(default)]
    pub primarch: Vec<Ability>,
}

impl Abilities {
    pub fn of_type(&self, kind: AbilityType) -> &Vec<Ability> {
        match kind {
            AbilityType::Core => &self.core,
            AbilityType::Faction => &self.faction,
            AbilityType::Datasheet => &self.datasheet,
            AbilityType::Wargear => &self.wargear,
            AbilityType::Special => &self.special,
            AbilityType::Fortification => &self.fortification,
            AbilityType::Primarch => &self.primarch,
        }
    }

    fn of_type_mut(&mut self, kind: AbilityType) -> &mut Vec<Ability> {
        match kind {
            AbilityType::Core => &mut self.core,
            AbilityType::Faction => &mut self.faction,
            AbilityType::Datasheet => &mut self.datasheet,
            AbilityType::Wargear => &mut self.wargear,
            AbilityType::Special => &mut self.special,
            AbilityType::Fortification => &mut self.fortification,
            AbilityType::Primarch => &mut self.primarch,
        }
    }

    /// Add an ability unless an identical entry of the same type exists.
    ///
    /// Returns `false` when the ability was suppressed as a duplicate.
    pub fn insert(&mut self, kind: AbilityType, ability: Ability) -> bool {
        let list = self.of_type_mut(kind);
        if list.iter().any(|a| a.same_entry(&ability)) {
            return false;
        }
        list.push(ability);
        true
    }

    pub fn len(&self) -> usize {
        self.core.len()
            + self.faction.len()
            + self.datasheet.len()
            + self.wargear.len()
            + self.special.len()
            + self.fortification.len()
            + self.primarch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Unit details ────────────────────────────────────────────────────────────

/// A points cost line (e.g. "5 models" → "90").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub line: String,
    pub description: String,
    pub cost: String,
}

/// Keywords split into faction keywords and everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keywords {
    #[serde(default)]
    pub faction: Vec<String>,
    #[serde(default)]
    pub other: Vec<String>,
}

impl Keywords {
    /// Add a keyword to the matching list. Returns `false` if already present.
    pub fn insert(&mut self, keyword: &str, is_faction: bool) -> bool {
        let list = if is_faction {
            &mut self.faction
        } else {
            &mut self.other
        };
        if list.iter().any(|k| k == keyword) {
            return false;
        }
        list.push(keyword.to_string());
        true
    }
}

/// A wargear option line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOption {
    pub line: String,
    #[serde(default)]
    pub button: String,
    pub description: String,
}

/// A unit composition line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub line: String,
    pub description: String,
}

// ── Detachments ─────────────────────────────────────────────────────────────

/// A named rules package within a faction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detachment {
    pub name: String,
    #[serde(default)]
    pub stratagems: Vec<Stratagem>,
    #[serde(default)]
    pub abilities: Vec<DetachmentAbility>,
}

impl Detachment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A tactical effect bought with command points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stratagem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub stratagem_type: String,
    pub cp_cost: String,
    #[serde(default)]
    pub legend: String,
    pub turn: String,
    pub phase: String,
    pub when: String,
    pub target: String,
    pub effect: String,
    pub full_description: String,
}

/// A rule granted by a detachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetachmentAbility {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub legend: String,
    pub description: String,
}
