//! Logical dataset names and the physical identifiers behind them.
//!
//! The presentation layer only ever asks for logical names (`"festivals"`,
//! `"heritage_sites"`). [`DatasetCatalog`] is the single declarative table
//! that maps those names to fully-qualified store tables, plus the aliases
//! and composite datasets kept for older callers. It is built once at
//! process start (optionally with `[tables]` overrides from config) and is
//! not re-resolved afterwards.

pub mod stages;

pub use stages::StageCatalog;

use std::collections::BTreeMap;

use crate::store::TableRef;
use crate::types::FetchDescriptor;
use crate::{Result, SanskritiError};

/// Database every default identifier lives in.
pub const DEFAULT_DATABASE: &str = "CULTURE_TOURISM_DB";

const CULTURAL: &str = "CULTURAL_DATA";
const TOURISM: &str = "TOURISM_DATA";

/// Years with a `Y<year>_LEAN_PEAK_MONTH` table.
pub const LEAN_PEAK_YEARS: [u16; 7] = [2017, 2018, 2019, 2020, 2021, 2022, 2023];

// ============================================================================
// Declarations
// ============================================================================

/// `(logical name, schema, table, label)`
const TABLES: &[(&str, &str, &str, &str)] = &[
    // Cultural
    ("festivals", CULTURAL, "FESTIVALS", "festivals data"),
    ("dance", CULTURAL, "DANCE_FORMS", "dance data"),
    ("heritage_sites", CULTURAL, "HERITAGE_SITES", "heritage sites data"),
    // Tourism
    ("age_wise_statistics", TOURISM, "AGE_WISE_STATISTICS", "age-wise statistics data"),
    (
        "centrally_protected_domestic",
        TOURISM,
        "CENTRALLY_PROTECTED_MONUMENTS_DOMESTIC_VISITS",
        "centrally protected domestic data",
    ),
    (
        "centrally_protected_foreign",
        TOURISM,
        "CENTRALLY_PROTECTED_MONUMENTS_FOREIGN_VISITS",
        "centrally protected foreign data",
    ),
    ("duration_stay", TOURISM, "DURATION_STAY", "duration stay data"),
    ("fee_earnings", TOURISM, "FEE_EARNINGS", "fee earnings data"),
    ("india_world_share", TOURISM, "INDIA_WORLD_SHARE", "India world share data"),
    ("ita_monthwise", TOURISM, "ITA_MONTHWISE", "ITA monthwise data"),
    ("ita_yearly", TOURISM, "ITA_YEARLY", "ITA yearly data"),
    (
        "state_domestic_tourist_arrivals",
        TOURISM,
        "STATE_DOMESTIC_TOURIST_ARRIVAL",
        "state domestic tourist arrivals data",
    ),
    (
        "state_foreign_tourist_arrivals",
        TOURISM,
        "STATE_FOREIGN_TOURIST_ARRIVAL",
        "state foreign tourist arrivals data",
    ),
    (
        "state_total_tourist_arrivals",
        TOURISM,
        "STATE_TOTAL_TOURIST_ARRIVAL",
        "state total tourist arrivals data",
    ),
    (
        "top_monuments_domestic",
        TOURISM,
        "TOP_MONUMENTS_DOMESTIC_VISITORS",
        "top monuments domestic data",
    ),
    (
        "top_monuments_foreign",
        TOURISM,
        "TOP_MONUMENTS_FOREIGN_VISITS",
        "top monuments foreign data",
    ),
    ("tourism_employment", TOURISM, "TOURISM_EMPLOYMENT", "tourism employment data"),
    ("tourism_gdp", TOURISM, "TOURISM_GDP", "tourism GDP data"),
    ("unesco_sites", TOURISM, "UNESCO_SITES", "UNESCO sites data"),
];

/// `(alias, logical name)`
const ALIASES: &[(&str, &str)] = &[
    ("unesco", "unesco_sites"),
    ("ita", "ita_yearly"),
    ("ita_monthly", "ita_monthwise"),
    ("age_statistics", "age_wise_statistics"),
];

/// Logical names of the cultural group.
pub const CULTURAL_GROUP: [&str; 3] = ["festivals", "dance", "heritage_sites"];

/// Logical name of the lean/peak table for `year`.
pub fn lean_peak_name(year: u16) -> String {
    format!("y{year}_lean_peak_month")
}

fn composites() -> Vec<(&'static str, DatasetSource)> {
    let table = |name: &str| DatasetSource::Table(name.to_string());
    vec![
        (
            "centrally_protected",
            DatasetSource::Union(vec![
                table("centrally_protected_domestic"),
                table("centrally_protected_foreign"),
            ]),
        ),
        (
            "top_monuments",
            DatasetSource::Union(vec![
                table("top_monuments_domestic"),
                table("top_monuments_foreign"),
            ]),
        ),
        (
            "state_tourism",
            DatasetSource::FirstNonEmpty(vec![
                table("state_total_tourist_arrivals"),
                DatasetSource::Union(vec![
                    table("state_domestic_tourist_arrivals"),
                    table("state_foreign_tourist_arrivals"),
                ]),
            ]),
        ),
    ]
}

// ============================================================================
// Catalog
// ============================================================================

/// One store-backed logical dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Cache identity; the descriptor name is the logical name.
    pub descriptor: FetchDescriptor,
    /// Physical table.
    pub table: TableRef,
    /// Human-readable name used in diagnostics.
    pub label: String,
}

impl TableEntry {
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }
}

/// How a logical dataset is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// A single cached table fetch.
    Table(String),
    /// Concatenation of the non-empty parts.
    Union(Vec<DatasetSource>),
    /// The first part that is not empty.
    FirstNonEmpty(Vec<DatasetSource>),
}

impl DatasetSource {
    /// Every table the source reads, depth first.
    pub fn table_names(&self) -> Vec<&str> {
        match self {
            DatasetSource::Table(name) => vec![name.as_str()],
            DatasetSource::Union(parts) | DatasetSource::FirstNonEmpty(parts) => {
                parts.iter().flat_map(DatasetSource::table_names).collect()
            }
        }
    }
}

/// A fixed invalidation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Festivals, dance and heritage sites.
    Cultural,
    /// Every table dataset plus the image fetches.
    All,
}

/// Static `{logical name → physical identifier}` table.
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    tables: Vec<TableEntry>,
    composites: Vec<(&'static str, DatasetSource)>,
}

impl DatasetCatalog {
    /// The default identifiers under `database`.
    pub fn new(database: &str) -> Self {
        let mut tables: Vec<TableEntry> = TABLES
            .iter()
            .map(|(name, schema, table, label)| TableEntry {
                descriptor: FetchDescriptor::dataset(*name),
                table: TableRef::new(database, *schema, *table),
                label: label.to_string(),
            })
            .collect();

        tables.extend(LEAN_PEAK_YEARS.iter().map(|year| TableEntry {
            descriptor: FetchDescriptor::dataset(lean_peak_name(*year)),
            table: TableRef::new(database, TOURISM, format!("Y{year}_LEAN_PEAK_MONTH")),
            label: format!("{year} lean peak month data"),
        }));

        Self {
            tables,
            composites: composites(),
        }
    }

    /// Replace physical identifiers from config.
    ///
    /// Keys are logical names (aliases accepted); values are `SCHEMA.TABLE`
    /// or `DATABASE.SCHEMA.TABLE`.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Result<Self> {
        for (name, target) in overrides {
            let canonical = canonical_name(name);
            let entry = self
                .tables
                .iter_mut()
                .find(|t| t.name() == canonical)
                .ok_or_else(|| SanskritiError::UnknownDataset(name.clone()))?;

            let parts: Vec<&str> = target.split('.').map(str::trim).collect();
            entry.table = match parts.as_slice() {
                [schema, table] if !schema.is_empty() && !table.is_empty() => {
                    TableRef::new(entry.table.database.clone(), *schema, *table)
                }
                [db, schema, table] if parts.iter().all(|p| !p.is_empty()) => {
                    TableRef::new(*db, *schema, *table)
                }
                _ => {
                    return Err(SanskritiError::Configuration(format!(
                        "table override for '{name}' must be SCHEMA.TABLE or DB.SCHEMA.TABLE, got '{target}'"
                    )));
                }
            };
        }
        Ok(self)
    }

    /// Store-backed datasets in declaration order.
    pub fn tables(&self) -> &[TableEntry] {
        &self.tables
    }

    /// The store-backed dataset called `name` (aliases accepted).
    pub fn table(&self, name: &str) -> Option<&TableEntry> {
        let canonical = canonical_name(name);
        self.tables.iter().find(|t| t.name() == canonical)
    }

    /// How `name` is produced, or `None` if the catalog does not know it.
    pub fn source(&self, name: &str) -> Option<DatasetSource> {
        let canonical = canonical_name(name);
        if self.tables.iter().any(|t| t.name() == canonical) {
            return Some(DatasetSource::Table(canonical.to_string()));
        }
        self.composites
            .iter()
            .find(|(n, _)| *n == canonical)
            .map(|(_, source)| source.clone())
    }

    /// Alias pairs `(alias, logical name)`.
    pub fn aliases(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        ALIASES.iter().copied()
    }

    /// Names of composite datasets.
    pub fn composite_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.composites.iter().map(|(n, _)| *n)
    }

    /// The descriptor named `name`: a table dataset or one of the image fetches.
    pub fn descriptor(&self, name: &str) -> Option<FetchDescriptor> {
        if let Some(entry) = self.table(name) {
            return Some(entry.descriptor.clone());
        }
        FetchDescriptor::image_descriptors()
            .into_iter()
            .find(|d| d.name() == name)
    }

    /// The fixed descriptor list of an invalidation group.
    pub fn group(&self, group: Group) -> Vec<FetchDescriptor> {
        match group {
            Group::Cultural => CULTURAL_GROUP
                .iter()
                .filter_map(|name| self.table(name))
                .map(|t| t.descriptor.clone())
                .collect(),
            Group::All => self
                .tables
                .iter()
                .map(|t| t.descriptor.clone())
                .chain(FetchDescriptor::image_descriptors())
                .collect(),
        }
    }
}

impl Default for DatasetCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE)
    }
}

/// Resolve an alias to its logical name; other names pass through.
pub fn canonical_name(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, target)| *target)
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_identifiers() {
        let catalog = DatasetCatalog::default();
        assert_eq!(
            catalog.table("dance").unwrap().table.to_string(),
            "CULTURE_TOURISM_DB.CULTURAL_DATA.DANCE_FORMS"
        );
        assert_eq!(
            catalog.table("y2019_lean_peak_month").unwrap().table.table,
            "Y2019_LEAN_PEAK_MONTH"
        );
        assert_eq!(catalog.tables().len(), TABLES.len() + LEAN_PEAK_YEARS.len());
    }

    #[test]
    fn aliases_resolve_to_tables() {
        let catalog = DatasetCatalog::default();
        assert_eq!(catalog.table("unesco").unwrap().name(), "unesco_sites");
        assert_eq!(
            catalog.source("ita_monthly"),
            Some(DatasetSource::Table("ita_monthwise".into()))
        );
    }

    #[test]
    fn composites_are_sources_not_tables() {
        let catalog = DatasetCatalog::default();
        assert!(catalog.table("top_monuments").is_none());
        assert!(matches!(
            catalog.source("state_tourism"),
            Some(DatasetSource::FirstNonEmpty(parts)) if parts.len() == 2
        ));
        assert!(catalog.source("nope").is_none());
    }

    #[test]
    fn groups_are_fixed_lists() {
        let catalog = DatasetCatalog::default();
        let cultural: Vec<_> = catalog
            .group(Group::Cultural)
            .into_iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(cultural, ["festivals", "dance", "heritage_sites"]);

        let all = catalog.group(Group::All);
        assert_eq!(all.len(), catalog.tables().len() + 3);
        assert!(all.contains(&FetchDescriptor::STAGE_IMAGE));
    }

    #[test]
    fn overrides_replace_physical_table() {
        let overrides = BTreeMap::from([
            ("festivals".to_string(), "CULTURAL_DATA.FESTIVAL".to_string()),
            ("ita".to_string(), "OTHER_DB.TOURISM_DATA.ITA_YEAR".to_string()),
        ]);
        let catalog = DatasetCatalog::default().with_overrides(&overrides).unwrap();
        assert_eq!(
            catalog.table("festivals").unwrap().table.to_string(),
            "CULTURE_TOURISM_DB.CULTURAL_DATA.FESTIVAL"
        );
        assert_eq!(
            catalog.table("ita_yearly").unwrap().table.to_string(),
            "OTHER_DB.TOURISM_DATA.ITA_YEAR"
        );
    }

    #[test]
    fn overrides_reject_unknown_and_malformed() {
        let unknown = BTreeMap::from([("nope".to_string(), "A.B".to_string())]);
        assert!(matches!(
            DatasetCatalog::default().with_overrides(&unknown),
            Err(SanskritiError::UnknownDataset(_))
        ));

        let malformed = BTreeMap::from([("dance".to_string(), "DANCE_FORMS".to_string())]);
        assert!(matches!(
            DatasetCatalog::default().with_overrides(&malformed),
            Err(SanskritiError::Configuration(_))
        ));
    }
}
