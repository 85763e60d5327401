//! pure schema definitions for the Postgres-backed durable store. no I/O
//! here, only metadata about table structure, as a free function since this
//! domain has exactly one table.

pub const SKILLS: &str = "skills";

/// idempotent DDL for the skills table, run once at connection time (see
/// `crate::db`).
pub fn creates() -> String {
    const_format::formatcp!(
        "CREATE TABLE IF NOT EXISTS {SKILLS} (
            key   TEXT             PRIMARY KEY,
            mu    DOUBLE PRECISION NOT NULL,
            sigma DOUBLE PRECISION NOT NULL,
            gamma DOUBLE PRECISION NOT NULL,
            floor DOUBLE PRECISION NOT NULL,
            ceil  DOUBLE PRECISION NOT NULL
        );"
    )
    .to_string()
}
