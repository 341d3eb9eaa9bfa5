//! Data models for extracted monster drop data.

use std::collections::BTreeSet;

/// One row of a monster's drop table.
///
/// Quantity and rarity stay opaque text because the source notation is not
/// uniform: quantities encode ranges ("5-10") or special values ("Nothing"),
/// rarities mix fractions ("1/128") with named tiers ("Common").
#[derive(Debug, Clone, PartialEq)]
pub struct DropEntry {
    pub item: String,
    pub quantity: String,
    pub rarity: String,
    pub members_only: bool,
}

/// One monster page from the wiki export.
#[derive(Debug, Clone)]
pub struct Monster {
    pub name: String,
    pub members_only: bool,
    /// Maximum over all `slaylvl` fields on the page, 1 if none.
    pub slayer_lvl: u32,
    /// Combat levels of the monster's variants, duplicates collapsed.
    pub combat_lvls: BTreeSet<u32>,
    pub drop_list: Vec<DropEntry>,
}

/// Result of the extraction pass: monsters in document order plus the
/// deduplicated union of item names seen across every drop table.
#[derive(Debug, Default)]
pub struct Extraction {
    pub item_names: BTreeSet<String>,
    pub monsters: Vec<Monster>,
}

/// Optional filters for a drop query. An absent field emits no clause at
/// all, so an empty `QueryFilters` returns the full drop table.
#[derive(Debug, Default, Clone)]
pub struct QueryFilters {
    /// SQL LIKE pattern against the monster name; may contain `%`/`_`.
    pub monster: Option<String>,
    /// SQL LIKE pattern against the item name; may contain `%`/`_`.
    pub item: Option<String>,
    /// Restrict to drops whose members-only flag is false.
    pub f2p: bool,
    /// Restrict to monsters with slayer level at or below this value.
    pub max_slayer_lvl: Option<u32>,
    /// Restrict to monsters whose highest combat variant is at or below
    /// this value. Monsters with no recorded variants always pass.
    pub max_combat_lvl: Option<u32>,
}

/// One result row from a drop query.
#[derive(Debug, Clone, PartialEq)]
pub struct DropRow {
    pub monster: String,
    pub item: String,
    /// Comma-joined combat levels, `None` when the monster has no variants.
    pub combat_lvls: Option<String>,
    pub rarity: String,
    pub quantity: String,
}
