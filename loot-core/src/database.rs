//! SQLite schema creation, loading, and drop queries.

use crate::error::{LootError, Result};
use crate::models::{DropRow, Extraction, QueryFilters};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, ToSql, params};
use std::collections::HashMap;
use std::path::Path;

/// Columns every drop query returns, regardless of which filters are
/// active. Combat levels collapse into one comma-joined field per
/// (monster, item) pair; NULL when the monster has no recorded variants.
const RESULT_COLUMNS: &str = "monsters.name AS monster, \
     items.name AS item, \
     GROUP_CONCAT(CAST(monster_combat_lvls.combat_lvl AS TEXT), ',') AS combat_lvls, \
     monster_item_drops.item_rarity AS rarity, \
     monster_item_drops.item_quantity AS quantity";

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
    path: String,
}

impl Database {
    pub fn new(path: &Path) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        });
        // Single-shot batch tool; one connection is all it ever needs.
        let pool = Pool::builder().max_size(1).build(manager)?;

        Ok(Self {
            pool,
            path: path.display().to_string(),
        })
    }

    fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(LootError::Pool)
    }

    /// Create the schema and load one extraction in a single all-or-nothing
    /// transaction. Fails without touching the file if the schema already
    /// exists: the build step is deliberately not idempotent, re-running it
    /// against an existing store must error rather than duplicate data.
    pub fn build(&self, extraction: &Extraction) -> Result<()> {
        let mut conn = self.connection()?;

        if schema_exists(&conn)? {
            return Err(LootError::SchemaExists(self.path.clone()));
        }

        let tx = conn.transaction()?;
        create_schema(&tx)?;
        let item_ids = insert_items(&tx, extraction)?;
        insert_monsters(&tx, extraction, &item_ids)?;
        tx.commit()?;

        tracing::info!(
            monsters = extraction.monsters.len(),
            items = extraction.item_names.len(),
            "Loot database built"
        );
        Ok(())
    }

    /// Build and run one drop query from the given filters.
    ///
    /// Absent filters emit no clause at all, so an empty `QueryFilters`
    /// dumps the whole drop table. Results are grouped per (monster, item)
    /// pair and ordered by the rarity's textual representation; free-text
    /// rarities have no numeric collation, so "2/100" sorts after "1/128".
    /// Known limitation, kept for output stability.
    pub fn query_drops(&self, filters: &QueryFilters) -> Result<Vec<DropRow>> {
        let conn = self.connection()?;

        let mut where_clauses: Vec<&str> = Vec::new();
        let mut having_clauses: Vec<&str> = Vec::new();
        let mut params: Vec<(&str, &dyn ToSql)> = Vec::new();

        if let Some(monster) = &filters.monster {
            where_clauses.push("monsters.name LIKE :monster");
            params.push((":monster", monster));
        }
        if let Some(item) = &filters.item {
            where_clauses.push("items.name LIKE :item");
            params.push((":item", item));
        }
        if filters.f2p {
            where_clauses.push("NOT monster_item_drops.members_only");
        }
        if let Some(slayer_lvl) = &filters.max_slayer_lvl {
            where_clauses.push("monsters.slayer_lvl <= :slayer_lvl");
            params.push((":slayer_lvl", slayer_lvl));
        }
        if let Some(combat_lvl) = &filters.max_combat_lvl {
            // Monsters with no combat-level variants are never excluded by
            // this filter, hence the NULL arm.
            having_clauses.push(
                "(monster_combat_lvls.combat_lvl IS NULL \
                 OR MAX(monster_combat_lvls.combat_lvl) <= :combat_lvl)",
            );
            params.push((":combat_lvl", combat_lvl));
        }

        let mut sql = format!(
            "SELECT {RESULT_COLUMNS} \
             FROM monster_item_drops \
             INNER JOIN monsters ON monsters.monster_id = monster_item_drops.monster_id \
             INNER JOIN items ON items.item_id = monster_item_drops.item_id \
             LEFT JOIN monster_combat_lvls ON monster_combat_lvls.monster_id = monsters.monster_id"
        );
        if !where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clauses.join(" AND "));
        }
        sql.push_str(" GROUP BY monsters.monster_id, items.item_id");
        if !having_clauses.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&having_clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY monster_item_drops.item_rarity");

        tracing::debug!(sql, "Executing drop query");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params.as_slice(), |row| {
                Ok(DropRow {
                    monster: row.get(0)?,
                    item: row.get(1)?,
                    combat_lvls: row.get(2)?,
                    rarity: row.get(3)?,
                    quantity: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

fn schema_exists(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'monsters'",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE monsters (
            monster_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            members_only BOOLEAN NOT NULL CHECK (members_only IN (0, 1)),
            slayer_lvl INTEGER NOT NULL
        );

        CREATE TABLE monster_combat_lvls (
            monster_id INTEGER NOT NULL,
            combat_lvl INTEGER NOT NULL,
            FOREIGN KEY (monster_id) REFERENCES monsters(monster_id)
        );

        CREATE TABLE items (
            item_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );

        CREATE TABLE monster_item_drops (
            monster_id INTEGER NOT NULL,
            item_id INTEGER NOT NULL,
            item_quantity TEXT NOT NULL,
            item_rarity TEXT NOT NULL,
            members_only BOOLEAN NOT NULL CHECK (members_only IN (0, 1)),
            FOREIGN KEY (monster_id) REFERENCES monsters(monster_id),
            FOREIGN KEY (item_id) REFERENCES items(item_id)
        );
        "#,
    )?;
    Ok(())
}

/// Insert one row per distinct item name, returning the name-to-id map the
/// drop inserts resolve against. Names are unique here by construction:
/// the extraction hands over a set.
fn insert_items(conn: &Connection, extraction: &Extraction) -> Result<HashMap<String, i64>> {
    let mut item_ids = HashMap::new();
    for name in &extraction.item_names {
        conn.execute("INSERT INTO items (name) VALUES (?)", params![name])?;
        item_ids.insert(name.clone(), conn.last_insert_rowid());
    }
    Ok(item_ids)
}

fn insert_monsters(
    conn: &Connection,
    extraction: &Extraction,
    item_ids: &HashMap<String, i64>,
) -> Result<()> {
    for monster in &extraction.monsters {
        conn.execute(
            "INSERT INTO monsters (name, members_only, slayer_lvl) VALUES (?, ?, ?)",
            params![monster.name, monster.members_only, monster.slayer_lvl],
        )?;
        let monster_id = conn.last_insert_rowid();

        for combat_lvl in &monster.combat_lvls {
            conn.execute(
                "INSERT INTO monster_combat_lvls (monster_id, combat_lvl) VALUES (?, ?)",
                params![monster_id, combat_lvl],
            )?;
        }

        for drop in &monster.drop_list {
            let item_id = item_ids.get(&drop.item).ok_or_else(|| {
                LootError::MissingField(format!("item id for '{}'", drop.item))
            })?;
            conn.execute(
                "INSERT INTO monster_item_drops \
                 (monster_id, item_id, item_quantity, item_rarity, members_only) \
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    monster_id,
                    item_id,
                    drop.quantity,
                    drop.rarity,
                    drop.members_only
                ],
            )?;
        }
    }
    Ok(())
}
