//! Static content tables: aliases, message pools and category tiers.
//!
//! Everything here is loaded once at startup and shared read-only between
//! requests. A missing or empty pool is not a load error; the selector routes
//! such categories to the fallback resolver at request time.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

use super::fallback::FallbackResolver;
use crate::error::AppError;
use crate::fs_manager::ContentPaths;

/// Tier assigned to categories absent from the tier table.
pub const LOWEST_PRIORITY_TIER: u32 = 999;

/// Built-in priority tiers used when no `categoryTiers.json` is shipped.
/// Heavier life events outrank everyday worries on equal scores.
static BUILTIN_TIERS: LazyLock<HashMap<String, u32>> = LazyLock::new(|| {
    [
        ("Grief", 1),
        ("Health", 1),
        ("Anxiety", 2),
        ("Love", 2),
        ("Family", 3),
        ("Money", 3),
        ("Career", 3),
        ("Friendship", 4),
        ("Purpose", 5),
        ("Faith", 5),
    ]
    .into_iter()
    .map(|(category, tier)| (category.to_string(), tier))
    .collect()
});

/// A four-part poetic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Whisper {
    /// Opening line reflecting the user's situation back to them.
    pub mirror: String,
    /// Setup line leading into the reveal.
    pub whisper_start: String,
    /// Core truth, shown blurred until the reveal is paid for.
    pub blurred_reveal: String,
    /// Closing reassurance.
    pub encouragement: String,
}

impl Whisper {
    pub fn new(
        mirror: impl Into<String>,
        whisper_start: impl Into<String>,
        blurred_reveal: impl Into<String>,
        encouragement: impl Into<String>,
    ) -> Self {
        Self {
            mirror: mirror.into(),
            whisper_start: whisper_start.into(),
            blurred_reveal: blurred_reveal.into(),
            encouragement: encouragement.into(),
        }
    }

    /// All four parts carry visible text.
    pub fn is_complete(&self) -> bool {
        [
            &self.mirror,
            &self.whisper_start,
            &self.blurred_reveal,
            &self.encouragement,
        ]
        .iter()
        .all(|part| !part.trim().is_empty())
    }
}

/// Category name → keywords and phrases that point at it.
///
/// Categories keep the order they were written in: a full tie on score and
/// tier goes to the category listed first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct AliasTable(Vec<(String, Vec<String>)>);

impl AliasTable {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.iter().any(|(k, _)| k == category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for AliasTable {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let entries = map
            .into_iter()
            .map(|(category, keywords)| {
                let keywords: Vec<String> = serde_json::from_value(keywords)?;
                Ok((category, keywords))
            })
            .collect::<Result<Vec<_>, Self::Error>>()?;
        Ok(Self(entries))
    }
}

impl<K, V, S> FromIterator<(K, V)> for AliasTable
where
    K: Into<String>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}

/// Category name → whispers that may be served for it.
///
/// Records that do not parse are skipped at load and counted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct MessagePool {
    pools: BTreeMap<String, Vec<Whisper>>,
    malformed: usize,
}

impl MessagePool {
    /// Finds a category's whispers by exact key, then case-insensitively.
    pub fn lookup(&self, category: &str) -> Option<&[Whisper]> {
        if let Some(whispers) = self.pools.get(category) {
            return Some(whispers);
        }
        let wanted = category.to_lowercase();
        self.pools
            .iter()
            .find(|(key, _)| key.to_lowercase() == wanted)
            .map(|(_, whispers)| whispers.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Whisper])> {
        self.pools.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Total number of whispers across all categories.
    pub fn whisper_count(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    /// Records dropped at load because they did not parse as a [`Whisper`].
    pub fn malformed_count(&self) -> usize {
        self.malformed
    }
}

impl TryFrom<Map<String, Value>> for MessagePool {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut pool = Self::default();
        for (category, records) in map {
            let records: Vec<Value> = serde_json::from_value(records)?;
            let mut whispers = Vec::with_capacity(records.len());
            for (index, record) in records.into_iter().enumerate() {
                match serde_json::from_value::<Whisper>(record) {
                    Ok(whisper) => whispers.push(whisper),
                    Err(e) => {
                        warn!(category = %category, index, error = %e, "Skipping malformed whisper record");
                        pool.malformed += 1;
                    }
                }
            }
            pool.pools.insert(category, whispers);
        }
        Ok(pool)
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Whisper>)> for MessagePool {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Whisper>)>>(iter: I) -> Self {
        Self {
            pools: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            malformed: 0,
        }
    }
}

/// Category name → priority tier (lower wins ties).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CategoryTierTable(HashMap<String, u32>);

impl CategoryTierTable {
    pub fn builtin() -> Self {
        Self(BUILTIN_TIERS.clone())
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(category, tier)| (category.to_string(), tier))
                .collect(),
        )
    }

    pub fn tier_of(&self, category: &str) -> u32 {
        self.0.get(category).copied().unwrap_or(LOWEST_PRIORITY_TIER)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Referential consistency findings between the content tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentReport {
    /// Alias categories with no pool under any casing.
    pub categories_without_pool: Vec<String>,
    /// Alias categories whose pool exists but is empty.
    pub empty_pools: Vec<String>,
    /// Pool categories no alias can ever select.
    pub pools_without_aliases: Vec<String>,
    /// Tier entries naming categories absent from the alias table.
    pub tiers_without_aliases: Vec<String>,
    /// Whispers with at least one blank part.
    pub incomplete_whispers: usize,
    /// Whisper records skipped at load because they did not parse.
    pub malformed_whispers: usize,
}

impl ContentReport {
    pub fn is_consistent(&self) -> bool {
        self.categories_without_pool.is_empty()
            && self.empty_pools.is_empty()
            && self.pools_without_aliases.is_empty()
            && self.tiers_without_aliases.is_empty()
            && self.incomplete_whispers == 0
            && self.malformed_whispers == 0
    }
}

/// Immutable bundle of everything the selector reads.
#[derive(Debug)]
pub struct ContentStore {
    pub aliases: AliasTable,
    pub pool: MessagePool,
    pub tiers: CategoryTierTable,
    pub fallback: FallbackResolver,
}

impl ContentStore {
    pub fn new(
        aliases: AliasTable,
        pool: MessagePool,
        tiers: CategoryTierTable,
        fallback: FallbackResolver,
    ) -> Self {
        Self {
            aliases,
            pool,
            tiers,
            fallback,
        }
    }

    /// Loads all tables from disk.
    ///
    /// The alias map and the whisper pool are required; malformed whisper
    /// records inside the pool are skipped and reported. The tier file is
    /// optional (built-in tiers apply when it is absent). The fallback source
    /// is only opened on first use and never fails the load.
    pub fn load(paths: &ContentPaths) -> Result<Self, AppError> {
        let aliases: AliasTable = read_json(&paths.alias_map)?;
        let pool: MessagePool = read_json(&paths.whispers)?;

        let tiers = if paths.tiers.exists() {
            read_json(&paths.tiers)?
        } else {
            info!("No tier file at {:?}, using built-in tiers", paths.tiers);
            CategoryTierTable::builtin()
        };

        let store = Self::new(
            aliases,
            pool,
            tiers,
            FallbackResolver::from_path(paths.fallback.clone()),
        );

        info!(
            categories = store.aliases.len(),
            whispers = store.pool.whisper_count(),
            "Content loaded"
        );
        store.log_report();
        Ok(store)
    }

    /// Cross-checks the tables against each other.
    pub fn report(&self) -> ContentReport {
        let mut report = ContentReport::default();

        for category in self.aliases.categories() {
            match self.pool.lookup(category) {
                None => report.categories_without_pool.push(category.to_string()),
                Some([]) => report.empty_pools.push(category.to_string()),
                Some(_) => {}
            }
        }

        for category in self.pool.categories() {
            let reachable = self
                .aliases
                .categories()
                .any(|alias| alias == category || alias.to_lowercase() == category.to_lowercase());
            if !reachable {
                report.pools_without_aliases.push(category.to_string());
            }
        }

        let mut stray_tiers: Vec<String> = self
            .tiers
            .categories()
            .filter(|category| !self.aliases.contains(category))
            .map(str::to_string)
            .collect();
        stray_tiers.sort();
        report.tiers_without_aliases = stray_tiers;

        report.incomplete_whispers = self
            .pool
            .iter()
            .flat_map(|(_, whispers)| whispers.iter())
            .filter(|w| !w.is_complete())
            .count();
        report.malformed_whispers = self.pool.malformed_count();

        report
    }

    fn log_report(&self) {
        let report = self.report();
        if report.is_consistent() {
            info!("Content tables are consistent");
            return;
        }
        for category in &report.categories_without_pool {
            warn!(category = %category, "Alias category has no whisper pool; it will use the fallback");
        }
        for category in &report.empty_pools {
            warn!(category = %category, "Whisper pool is empty; it will use the fallback");
        }
        for category in &report.pools_without_aliases {
            warn!(category = %category, "Whisper pool has no aliases and can never be selected");
        }
        for category in &report.tiers_without_aliases {
            warn!(category = %category, "Tier entry names an unknown category");
        }
        if report.incomplete_whispers > 0 {
            warn!(count = report.incomplete_whispers, "Whispers with blank parts found");
        }
        if report.malformed_whispers > 0 {
            warn!(count = report.malformed_whispers, "Malformed whisper records were skipped");
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::ContentSource(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::ContentSource(format!("{}: {}", path.display(), e)))
}
