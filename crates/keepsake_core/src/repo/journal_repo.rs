//! SQLite persistence for goal and memory journal entries.
//!
//! # Invariants
//! - A goal row carries a reminder iff `reminder_frequency` is not NULL.
//! - Goal-to-memory conversion inserts the memory and deletes the goal in one
//!   transaction.

use super::special_date_repo::parse_uuid;
use super::{RepoError, RepoResult};
use crate::model::goal::{EntryId, GoalEntry, MemoryEntry};
use crate::model::reminder::{LeadTime, LeadTimeUnit, ReminderFrequency, ReminderSpec};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const GOAL_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    target_date,
    notes,
    completed,
    completed_at,
    convert_to_memory,
    origin_special_date,
    reminder_target,
    reminder_frequency,
    reminder_lead_magnitude,
    reminder_lead_unit,
    reminder_end_date,
    reminder_recurring,
    reminder_origin
FROM goals";

pub(super) fn load_goals(conn: &Connection, user_id: &str) -> RepoResult<Vec<GoalEntry>> {
    let mut stmt = conn.prepare(&format!(
        "{GOAL_SELECT_SQL}
         WHERE user_id = ?1
         ORDER BY target_date ASC, uuid ASC;"
    ))?;
    let mut rows = stmt.query([user_id])?;
    let mut goals = Vec::new();
    while let Some(row) = rows.next()? {
        goals.push(parse_goal_row(row)?);
    }
    Ok(goals)
}

pub(super) fn load_goal(
    conn: &Connection,
    user_id: &str,
    id: EntryId,
) -> RepoResult<Option<GoalEntry>> {
    let mut stmt = conn.prepare(&format!(
        "{GOAL_SELECT_SQL}
         WHERE user_id = ?1 AND uuid = ?2;"
    ))?;
    let mut rows = stmt.query(params![user_id, id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_goal_row(row)?)),
        None => Ok(None),
    }
}

pub(super) fn save_goal(conn: &Connection, user_id: &str, goal: &GoalEntry) -> RepoResult<()> {
    goal.validate()?;
    let reminder = goal.reminder.as_ref();

    let changed = conn.execute(
        "INSERT INTO goals (
            uuid,
            user_id,
            title,
            target_date,
            notes,
            completed,
            completed_at,
            convert_to_memory,
            origin_special_date,
            reminder_target,
            reminder_frequency,
            reminder_lead_magnitude,
            reminder_lead_unit,
            reminder_end_date,
            reminder_recurring,
            reminder_origin
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
        ON CONFLICT(uuid) DO UPDATE SET
            title = excluded.title,
            target_date = excluded.target_date,
            notes = excluded.notes,
            completed = excluded.completed,
            completed_at = COALESCE(goals.completed_at, excluded.completed_at),
            convert_to_memory = excluded.convert_to_memory,
            origin_special_date = excluded.origin_special_date,
            reminder_target = excluded.reminder_target,
            reminder_frequency = excluded.reminder_frequency,
            reminder_lead_magnitude = excluded.reminder_lead_magnitude,
            reminder_lead_unit = excluded.reminder_lead_unit,
            reminder_end_date = excluded.reminder_end_date,
            reminder_recurring = excluded.reminder_recurring,
            reminder_origin = excluded.reminder_origin,
            updated_at = (strftime('%s', 'now') * 1000)
        WHERE goals.user_id = excluded.user_id
          AND (goals.completed = 0 OR excluded.completed = 1);",
        params![
            goal.id.to_string(),
            user_id,
            goal.title.as_str(),
            goal.target_date,
            goal.notes.as_deref(),
            goal.completed,
            goal.completed_at_ms,
            goal.convert_to_memory_when_passed,
            goal.origin.map(|id| id.to_string()),
            reminder.map(|spec| spec.target),
            reminder.map(|spec| spec.frequency.as_str()),
            reminder.map(|spec| spec.lead_time.magnitude()),
            reminder.map(|spec| spec.lead_time.unit().as_str()),
            reminder.and_then(|spec| spec.end_date),
            reminder.map(|spec| spec.is_recurring),
            reminder.and_then(|spec| spec.origin).map(|id| id.to_string()),
        ],
    )?;

    if changed == 0 {
        return Err(RepoError::InvalidData(format!(
            "goal {} is owned by another user or already completed",
            goal.id
        )));
    }
    Ok(())
}

pub(super) fn delete_goal(conn: &Connection, user_id: &str, id: EntryId) -> RepoResult<()> {
    let changed = conn.execute(
        "DELETE FROM goals WHERE uuid = ?1 AND user_id = ?2;",
        params![id.to_string(), user_id],
    )?;
    if changed == 0 {
        return Err(RepoError::NotFound {
            kind: "goal",
            id: id.to_string(),
        });
    }
    Ok(())
}

pub(super) fn convert_goal_to_memory(
    conn: &mut Connection,
    user_id: &str,
    memory: &MemoryEntry,
) -> RepoResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let exists = tx
        .query_row(
            "SELECT 1 FROM goals WHERE uuid = ?1 AND user_id = ?2;",
            params![memory.id.to_string(), user_id],
            |_| Ok(()),
        )
        .optional()?;
    if exists.is_none() {
        return Err(RepoError::NotFound {
            kind: "goal",
            id: memory.id.to_string(),
        });
    }

    tx.execute(
        "INSERT INTO memories (
            uuid,
            user_id,
            title,
            memory_date,
            notes,
            origin_special_date,
            converted_from_goal
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            memory.id.to_string(),
            user_id,
            memory.title.as_str(),
            memory.date,
            memory.notes.as_deref(),
            memory.origin.map(|id| id.to_string()),
            memory.converted_from_goal,
        ],
    )?;
    tx.execute(
        "DELETE FROM goals WHERE uuid = ?1 AND user_id = ?2;",
        params![memory.id.to_string(), user_id],
    )?;
    tx.commit()?;
    Ok(())
}

pub(super) fn load_memories(conn: &Connection, user_id: &str) -> RepoResult<Vec<MemoryEntry>> {
    let mut stmt = conn.prepare(
        "SELECT uuid, title, memory_date, notes, origin_special_date, converted_from_goal
         FROM memories
         WHERE user_id = ?1
         ORDER BY memory_date DESC, uuid ASC;",
    )?;
    let mut rows = stmt.query([user_id])?;
    let mut memories = Vec::new();
    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get("uuid")?;
        memories.push(MemoryEntry {
            id: parse_uuid(&uuid_text, "memories.uuid")?,
            title: row.get("title")?,
            date: row.get("memory_date")?,
            notes: row.get("notes")?,
            origin: parse_optional_uuid(row, "origin_special_date", "memories")?,
            converted_from_goal: row.get("converted_from_goal")?,
        });
    }
    Ok(memories)
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<GoalEntry> {
    let uuid_text: String = row.get("uuid")?;
    let goal = GoalEntry {
        id: parse_uuid(&uuid_text, "goals.uuid")?,
        title: row.get("title")?,
        target_date: row.get("target_date")?,
        notes: row.get("notes")?,
        completed: row.get("completed")?,
        completed_at_ms: row.get("completed_at")?,
        convert_to_memory_when_passed: row.get("convert_to_memory")?,
        reminder: parse_reminder_columns(row)?,
        origin: parse_optional_uuid(row, "origin_special_date", "goals")?,
    };
    goal.validate()?;
    Ok(goal)
}

fn parse_reminder_columns(row: &Row<'_>) -> RepoResult<Option<ReminderSpec>> {
    let Some(frequency_text) = row.get::<_, Option<String>>("reminder_frequency")? else {
        return Ok(None);
    };
    let frequency = ReminderFrequency::parse(&frequency_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid frequency `{frequency_text}` in goals.reminder_frequency"
        ))
    })?;

    let unit_text: String = required(row, "reminder_lead_unit")?;
    let unit = LeadTimeUnit::parse(&unit_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid lead unit `{unit_text}` in goals.reminder_lead_unit"
        ))
    })?;
    let lead_time = LeadTime::new(required(row, "reminder_lead_magnitude")?, unit)
        .map_err(|err| RepoError::InvalidData(format!("goals.reminder_lead_magnitude: {err}")))?;

    let spec = ReminderSpec {
        target: required(row, "reminder_target")?,
        frequency,
        lead_time,
        end_date: row.get("reminder_end_date")?,
        is_recurring: required(row, "reminder_recurring")?,
        origin: parse_optional_uuid(row, "reminder_origin", "goals")?,
    };
    spec.validate()
        .map_err(|err| RepoError::InvalidData(format!("goals reminder: {err}")))?;
    Ok(Some(spec))
}

fn required<T: rusqlite::types::FromSql>(row: &Row<'_>, column: &'static str) -> RepoResult<T> {
    row.get::<_, Option<T>>(column)?
        .ok_or_else(|| RepoError::InvalidData(format!("missing value in goals.{column}")))
}

fn parse_optional_uuid(
    row: &Row<'_>,
    column: &'static str,
    table: &'static str,
) -> RepoResult<Option<uuid::Uuid>> {
    match row.get::<_, Option<String>>(column)? {
        Some(value) => Ok(Some(parse_uuid(&value, &format!("{table}.{column}"))?)),
        None => Ok(None),
    }
}
