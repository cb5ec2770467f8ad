//! SQLite persistence for biographical profiles.
//!
//! # Invariants
//! - Saving replaces the whole profile, children and pets included, in one
//!   transaction.
//! - Child/pet order is kept through the `position` column.

use super::RepoResult;
use crate::model::profile::{BiographicalProfile, Child, Pet};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

pub(super) fn load_profile(
    conn: &Connection,
    user_id: &str,
) -> RepoResult<Option<BiographicalProfile>> {
    let profile = conn
        .query_row(
            "SELECT
                birth_date,
                marriage_date,
                spouse_name,
                spouse_birth_date,
                school_name,
                graduation_year
             FROM profiles
             WHERE user_id = ?1;",
            [user_id],
            |row| {
                Ok(BiographicalProfile {
                    birth_date: row.get("birth_date")?,
                    marriage_date: row.get("marriage_date")?,
                    spouse_name: row.get("spouse_name")?,
                    spouse_birth_date: row.get("spouse_birth_date")?,
                    children: Vec::new(),
                    pets: Vec::new(),
                    school_name: row.get("school_name")?,
                    graduation_year: row.get("graduation_year")?,
                })
            },
        )
        .optional()?;

    let Some(mut profile) = profile else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT name, birth_date
         FROM profile_children
         WHERE user_id = ?1
         ORDER BY position ASC;",
    )?;
    profile.children = stmt
        .query_map([user_id], |row| {
            Ok(Child {
                name: row.get("name")?,
                birth_date: row.get("birth_date")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT name, birth_date
         FROM profile_pets
         WHERE user_id = ?1
         ORDER BY position ASC;",
    )?;
    profile.pets = stmt
        .query_map([user_id], |row| {
            Ok(Pet {
                name: row.get("name")?,
                birth_date: row.get("birth_date")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(profile))
}

pub(super) fn save_profile(
    conn: &mut Connection,
    user_id: &str,
    profile: &BiographicalProfile,
) -> RepoResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    tx.execute(
        "INSERT INTO profiles (
            user_id,
            birth_date,
            marriage_date,
            spouse_name,
            spouse_birth_date,
            school_name,
            graduation_year
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(user_id) DO UPDATE SET
            birth_date = excluded.birth_date,
            marriage_date = excluded.marriage_date,
            spouse_name = excluded.spouse_name,
            spouse_birth_date = excluded.spouse_birth_date,
            school_name = excluded.school_name,
            graduation_year = excluded.graduation_year,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![
            user_id,
            profile.birth_date,
            profile.marriage_date,
            profile.spouse_name.as_deref(),
            profile.spouse_birth_date,
            profile.school_name.as_deref(),
            profile.graduation_year,
        ],
    )?;

    tx.execute("DELETE FROM profile_children WHERE user_id = ?1;", [user_id])?;
    tx.execute("DELETE FROM profile_pets WHERE user_id = ?1;", [user_id])?;

    {
        let mut insert_child = tx.prepare(
            "INSERT INTO profile_children (user_id, position, name, birth_date)
             VALUES (?1, ?2, ?3, ?4);",
        )?;
        for (position, child) in profile.children.iter().enumerate() {
            insert_child.execute(params![
                user_id,
                position as i64,
                child.name.as_deref(),
                child.birth_date,
            ])?;
        }

        let mut insert_pet = tx.prepare(
            "INSERT INTO profile_pets (user_id, position, name, birth_date)
             VALUES (?1, ?2, ?3, ?4);",
        )?;
        for (position, pet) in profile.pets.iter().enumerate() {
            insert_pet.execute(params![
                user_id,
                position as i64,
                pet.name.as_deref(),
                pet.birth_date,
            ])?;
        }
    }

    tx.commit()?;
    Ok(())
}
