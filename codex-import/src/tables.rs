//! Source table layouts.
//!
//! Field order is the documented positional order of each export. When a
//! file starts with a header row, the header takes precedence and columns are
//! matched by name instead.

use crate::source::Schema;

/// A source table: its default file name and schema.
#[derive(Debug, Clone, Copy)]
pub struct SourceTable {
    pub file_name: &'static str,
    pub schema: Schema,
}

pub const FACTIONS: SourceTable = SourceTable {
    file_name: "Factions.csv",
    schema: Schema {
        table: "Factions",
        fields: &["id", "name"],
    },
};

pub const DATASHEETS: SourceTable = SourceTable {
    file_name: "Datasheets.csv",
    schema: Schema {
        table: "Datasheets",
        fields: &[
            "id",
            "faction_id",
            "name",
            "role",
            "loadout",
            "transport",
            "damaged_w",
            "damaged_description",
        ],
    },
};

/// Read with the raw-buffer strategy: `name` may hold several `\n`-separated
/// profile names, rows end in `\r\n`.
pub const MODELS: SourceTable = SourceTable {
    file_name: "Datasheets_models.csv",
    schema: Schema {
        table: "Datasheets_models",
        fields: &[
            "datasheet_id",
            "line",
            "name",
            "M",
            "T",
            "Sv",
            "inv_sv",
            "inv_sv_descr",
            "W",
            "Ld",
            "OC",
            "base_size",
            "base_size_descr",
        ],
    },
};

/// Row separator of [`MODELS`].
pub const MODELS_ROW_SEPARATOR: &str = "\r\n";

pub const WARGEAR: SourceTable = SourceTable {
    file_name: "Datasheets_wargear.csv",
    schema: Schema {
        table: "Datasheets_wargear",
        fields: &[
            "datasheet_id",
            "line",
            "line_in_wargear",
            "dice",
            "name",
            "description",
            "range",
            "type",
            "A",
            "BS_WS",
            "S",
            "AP",
            "D",
        ],
    },
};

pub const ABILITY_CATALOG: SourceTable = SourceTable {
    file_name: "Abilities.csv",
    schema: Schema {
        table: "Abilities",
        fields: &["id", "name", "legend", "faction_id", "description"],
    },
};

pub const ABILITIES: SourceTable = SourceTable {
    file_name: "Datasheets_abilities.csv",
    schema: Schema {
        table: "Datasheets_abilities",
        fields: &[
            "datasheet_id",
            "line",
            "ability_id",
            "model",
            "name",
            "description",
            "type",
            "parameter",
        ],
    },
};

pub const KEYWORDS: SourceTable = SourceTable {
    file_name: "Datasheets_keywords.csv",
    schema: Schema {
        table: "Datasheets_keywords",
        fields: &["datasheet_id", "keyword", "model", "is_faction_keyword"],
    },
};

pub const OPTIONS: SourceTable = SourceTable {
    file_name: "Datasheets_options.csv",
    schema: Schema {
        table: "Datasheets_options",
        fields: &["datasheet_id", "line", "button", "description"],
    },
};

pub const COMPOSITIONS: SourceTable = SourceTable {
    file_name: "Datasheets_unit_composition.csv",
    schema: Schema {
        table: "Datasheets_unit_composition",
        fields: &["datasheet_id", "line", "description"],
    },
};

pub const COSTS: SourceTable = SourceTable {
    file_name: "Datasheets_models_cost.csv",
    schema: Schema {
        table: "Datasheets_models_cost",
        fields: &["datasheet_id", "line", "description", "cost"],
    },
};

pub const LEADERS: SourceTable = SourceTable {
    file_name: "Datasheets_leader.csv",
    schema: Schema {
        table: "Datasheets_leader",
        fields: &["leader_id", "attached_id"],
    },
};

pub const STRATAGEMS: SourceTable = SourceTable {
    file_name: "Stratagems.csv",
    schema: Schema {
        table: "Stratagems",
        fields: &[
            "faction_id",
            "name",
            "id",
            "type",
            "cp_cost",
            "legend",
            "turn",
            "phase",
            "detachment",
            "description",
        ],
    },
};

pub const DETACHMENT_ABILITIES: SourceTable = SourceTable {
    file_name: "Detachment_abilities.csv",
    schema: Schema {
        table: "Detachment_abilities",
        fields: &["id", "faction_id", "name", "legend", "description", "detachment"],
    },
};
