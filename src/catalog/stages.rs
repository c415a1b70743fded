//! Symbolic stage names and their physical identifiers.

use crate::store::StageRef;

/// A stage whose physical name and in-stage folder predate the generic
/// naming rule. Files uploaded before the migration sit under `folder/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LegacyStage {
    symbol: &'static str,
    physical: &'static str,
    folder: &'static str,
}

/// Consulted before the generic `<SYMBOL>_STAGE` rule.
const LEGACY_STAGES: &[LegacyStage] = &[
    LegacyStage {
        symbol: "DANCE_IMAGES",
        physical: "DANCE_IMAGES_STAGE",
        folder: "dance_images_stage",
    },
    LegacyStage {
        symbol: "FESTIVAL_IMAGES",
        physical: "FESTIVAL_IMAGES_STAGE",
        folder: "festival_images_stage",
    },
    LegacyStage {
        symbol: "HERITAGE_IMAGES",
        physical: "HERITAGE_IMAGES_STAGE",
        folder: "heritage_images_stage",
    },
];

/// Symbolic stage for dance images.
pub const DANCE_IMAGES: &str = "DANCE_IMAGES";
/// Symbolic stage for festival images.
pub const FESTIVAL_IMAGES: &str = "FESTIVAL_IMAGES";
/// Symbolic stage for heritage site images.
pub const HERITAGE_IMAGES: &str = "HERITAGE_IMAGES";

/// Maps symbolic stage names (`DANCE_IMAGES`) to fully-qualified stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCatalog {
    database: String,
    schema: String,
}

impl StageCatalog {
    pub fn new(database: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
        }
    }

    fn legacy(symbol: &str) -> Option<&'static LegacyStage> {
        LEGACY_STAGES.iter().find(|s| s.symbol == symbol)
    }

    /// Physical stage for a symbol: the legacy table first, then `<SYMBOL>_STAGE`.
    pub fn physical(&self, symbol: &str) -> StageRef {
        let name = match Self::legacy(symbol) {
            Some(stage) => stage.physical.to_string(),
            None => format!("{symbol}_STAGE"),
        };
        StageRef::new(&self.database, &self.schema, name)
    }

    /// Folder that pre-migration uploads of `symbol` live under, if any.
    pub fn legacy_folder(&self, symbol: &str) -> Option<&'static str> {
        Self::legacy(symbol).map(|s| s.folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StageCatalog {
        StageCatalog::new("CULTURE_TOURISM_DB", "ASSETS")
    }

    #[test]
    fn legacy_symbols_map_explicitly() {
        let stage = catalog().physical(DANCE_IMAGES);
        assert_eq!(stage.name, "DANCE_IMAGES_STAGE");
        assert_eq!(
            catalog().legacy_folder(FESTIVAL_IMAGES),
            Some("festival_images_stage")
        );
    }

    #[test]
    fn unknown_symbols_use_generic_rule() {
        let stage = catalog().physical("CRAFT_IMAGES");
        assert_eq!(
            stage.to_string(),
            r#"@"CULTURE_TOURISM_DB"."ASSETS"."CRAFT_IMAGES_STAGE""#
        );
        assert_eq!(catalog().legacy_folder("CRAFT_IMAGES"), None);
    }
}
