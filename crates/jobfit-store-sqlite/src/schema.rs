//! SQL schema for the jobfit SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Upserted by email; the id survives every update.
CREATE TABLE IF NOT EXISTS candidates (
    candidate_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name           TEXT NOT NULL DEFAULT '',
    email          TEXT NOT NULL DEFAULT '',  -- trimmed, lower-cased
    phone          TEXT NOT NULL DEFAULT '',
    linkedin       TEXT NOT NULL DEFAULT '',
    skills         TEXT NOT NULL DEFAULT '',
    qualifications TEXT NOT NULL DEFAULT '',
    projects       TEXT NOT NULL DEFAULT '',
    experience     TEXT NOT NULL DEFAULT '',
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

-- Empty email means no identity; any number of such rows may exist.
CREATE UNIQUE INDEX IF NOT EXISTS candidates_email_idx
    ON candidates(email) WHERE email <> '';

-- Insert-only. AUTOINCREMENT keeps ids strictly ascending.
CREATE TABLE IF NOT EXISTS jobs (
    job_id           INTEGER PRIMARY KEY AUTOINCREMENT,
    job_title        TEXT NOT NULL DEFAULT '',
    company          TEXT NOT NULL DEFAULT '',
    location         TEXT NOT NULL DEFAULT '',
    required_skills  TEXT NOT NULL DEFAULT '',
    experience       TEXT NOT NULL DEFAULT '',
    qualifications   TEXT NOT NULL DEFAULT '',
    responsibilities TEXT NOT NULL DEFAULT '',
    benefits         TEXT NOT NULL DEFAULT '',
    other_details    TEXT NOT NULL DEFAULT '',
    created_at       TEXT NOT NULL
);

-- Derived; rows are only ever replaced per candidate, never updated.
CREATE TABLE IF NOT EXISTS scores (
    score_id          INTEGER PRIMARY KEY AUTOINCREMENT,
    candidate_id      INTEGER NOT NULL REFERENCES candidates(candidate_id),
    job_id            INTEGER NOT NULL REFERENCES jobs(job_id),
    skill_score       REAL NOT NULL,
    education_score   REAL NOT NULL,
    project_score     REAL NOT NULL,
    experience_score  REAL NOT NULL,
    eligibility_score REAL NOT NULL,
    computed_at       TEXT NOT NULL,
    UNIQUE (candidate_id, job_id)
);

CREATE INDEX IF NOT EXISTS scores_job_idx ON scores(job_id);

PRAGMA user_version = 1;
";
