use rusqlite::{params, Connection, OptionalExtension};

use crate::models::Dish;

// ── Menu ──

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub inserted: usize,
    pub skipped: usize,
}

pub fn get_all_dishes(conn: &Connection) -> anyhow::Result<Vec<Dish>> {
    let mut stmt =
        conn.prepare("SELECT name, description, price, image, category FROM menu ORDER BY id ASC")?;

    let rows = stmt.query_map([], |row| {
        Ok(Dish {
            name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
            description: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            price: row.get::<_, Option<f64>>(2)?.unwrap_or_default(),
            image: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            category: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        })
    })?;

    let mut dishes = vec![];
    for row in rows {
        dishes.push(row?);
    }
    Ok(dishes)
}

pub fn dish_exists(conn: &Connection, name: &str) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM menu WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn insert_dish(conn: &Connection, dish: &Dish) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO menu (name, description, price, image, category) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![dish.name, dish.description, dish.price, dish.image, dish.category],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn count_dishes(conn: &Connection) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM menu", [], |row| row.get(0))?;
    Ok(count)
}

/// Insert-if-absent for a whole batch. Each name check and insert runs in a
/// single transaction, so a concurrent merge cannot slip a duplicate in
/// between the check and the write.
pub fn merge_dishes(conn: &mut Connection, dishes: &[Dish]) -> anyhow::Result<MergeOutcome> {
    let tx = conn.transaction()?;
    let mut outcome = MergeOutcome::default();

    for dish in dishes {
        if dish_exists(&tx, &dish.name)? {
            outcome.skipped += 1;
        } else {
            insert_dish(&tx, dish)?;
            outcome.inserted += 1;
        }
    }

    tx.commit()?;
    Ok(outcome)
}

// ── Key-Value ──

pub fn get_value(conn: &Connection, key: &str) -> anyhow::Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn set_value(conn: &Connection, key: &str, value: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

pub fn remove_value(conn: &Connection, key: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
    Ok(count > 0)
}
