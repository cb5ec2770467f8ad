//! SQLite persistence for user-authored special dates.

use super::{RepoError, RepoResult};
use crate::model::special_date::{
    CustomSpecialDate, SpecialDateCategory, SpecialDateId, SpecialDateStore,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

pub(super) fn load_custom_dates(conn: &Connection, user_id: &str) -> RepoResult<SpecialDateStore> {
    let mut stmt = conn.prepare(
        "SELECT uuid, name, anchor_date, category, is_recurring, notes
         FROM custom_special_dates
         WHERE user_id = ?1
         ORDER BY anchor_date ASC, uuid ASC;",
    )?;
    let mut rows = stmt.query([user_id])?;
    let mut store = SpecialDateStore::new();

    while let Some(row) = rows.next()? {
        let date = parse_custom_date_row(row)?;
        store.upsert(date).map_err(|err| {
            RepoError::InvalidData(format!("invalid custom special date row: {err}"))
        })?;
    }

    Ok(store)
}

pub(super) fn save_custom_date(
    conn: &Connection,
    user_id: &str,
    date: &CustomSpecialDate,
) -> RepoResult<()> {
    date.validate()?;

    let changed = conn.execute(
        "INSERT INTO custom_special_dates (
            uuid,
            user_id,
            name,
            anchor_date,
            category,
            is_recurring,
            notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(uuid) DO UPDATE SET
            name = excluded.name,
            anchor_date = excluded.anchor_date,
            category = excluded.category,
            is_recurring = excluded.is_recurring,
            notes = excluded.notes,
            updated_at = (strftime('%s', 'now') * 1000)
        WHERE custom_special_dates.user_id = excluded.user_id;",
        params![
            date.id.to_string(),
            user_id,
            date.name.as_str(),
            date.date,
            date.category.as_str(),
            date.is_recurring,
            date.notes.as_deref(),
        ],
    )?;

    // The upsert is filtered by owner; zero rows means another user owns the id.
    if changed == 0 {
        return Err(RepoError::NotFound {
            kind: "special date",
            id: date.id.to_string(),
        });
    }
    Ok(())
}

pub(super) fn delete_custom_date(
    conn: &Connection,
    user_id: &str,
    id: SpecialDateId,
) -> RepoResult<()> {
    let changed = conn.execute(
        "DELETE FROM custom_special_dates WHERE uuid = ?1 AND user_id = ?2;",
        params![id.to_string(), user_id],
    )?;
    if changed == 0 {
        return Err(RepoError::NotFound {
            kind: "special date",
            id: id.to_string(),
        });
    }
    Ok(())
}

fn parse_custom_date_row(row: &Row<'_>) -> RepoResult<CustomSpecialDate> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "custom_special_dates.uuid")?;

    let category_text: String = row.get("category")?;
    let category = SpecialDateCategory::parse(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in custom_special_dates.category"
        ))
    })?;

    Ok(CustomSpecialDate {
        id,
        name: row.get("name")?,
        date: row.get("anchor_date")?,
        category,
        is_recurring: row.get("is_recurring")?,
        notes: row.get("notes")?,
    })
}

pub(super) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
