//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; ids as SQLite integers.
//! Rows are first read into `Raw*` structs inside the connection thread and
//! decoded into domain types afterwards.

use chrono::{DateTime, Utc};
use jobfit_core::{
  profile::{Candidate, CandidateId, Job, JobId},
  score::{RankedCandidate, RankedMatch, Score, SubScores},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Limits ──────────────────────────────────────────────────────────────────

/// SQLite treats a negative LIMIT as "no limit".
pub fn encode_limit(limit: Option<usize>) -> i64 {
  limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX))
}

/// Offsets past `i64::MAX` saturate; they skip every row either way.
pub fn encode_offset(offset: Option<usize>) -> i64 {
  offset.map_or(0, |o| i64::try_from(o).unwrap_or(i64::MAX))
}

fn sub_scores(row: &rusqlite::Row<'_>, first: usize) -> rusqlite::Result<SubScores> {
  Ok(SubScores {
    skill_score:      row.get(first)?,
    education_score:  row.get(first + 1)?,
    project_score:    row.get(first + 2)?,
    experience_score: row.get(first + 3)?,
  })
}

// ─── Candidates ──────────────────────────────────────────────────────────────

pub const CANDIDATE_COLUMNS: &str = "candidate_id, name, email, phone, linkedin, \
   skills, qualifications, projects, experience, created_at, updated_at";

/// Raw values read directly from a `candidates` row.
pub struct RawCandidate {
  pub candidate_id:   i64,
  pub name:           String,
  pub email:          String,
  pub phone:          String,
  pub linkedin:       String,
  pub skills:         String,
  pub qualifications: String,
  pub projects:       String,
  pub experience:     String,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawCandidate {
  /// Row mapper for queries selecting [`CANDIDATE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      candidate_id:   row.get(0)?,
      name:           row.get(1)?,
      email:          row.get(2)?,
      phone:          row.get(3)?,
      linkedin:       row.get(4)?,
      skills:         row.get(5)?,
      qualifications: row.get(6)?,
      projects:       row.get(7)?,
      experience:     row.get(8)?,
      created_at:     row.get(9)?,
      updated_at:     row.get(10)?,
    })
  }

  pub fn into_candidate(self) -> Result<Candidate> {
    Ok(Candidate {
      candidate_id:   CandidateId(self.candidate_id),
      name:           self.name,
      email:          self.email,
      phone:          self.phone,
      linkedin:       self.linkedin,
      skills:         self.skills,
      qualifications: self.qualifications,
      projects:       self.projects,
      experience:     self.experience,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

// ─── Jobs ────────────────────────────────────────────────────────────────────

pub const JOB_COLUMNS: &str = "job_id, job_title, company, location, \
   required_skills, experience, qualifications, responsibilities, benefits, \
   other_details, created_at";

/// Raw values read directly from a `jobs` row.
pub struct RawJob {
  pub job_id:           i64,
  pub title:            String,
  pub company:          String,
  pub location:         String,
  pub required_skills:  String,
  pub experience:       String,
  pub qualifications:   String,
  pub responsibilities: String,
  pub benefits:         String,
  pub other_details:    String,
  pub created_at:       String,
}

impl RawJob {
  /// Row mapper for queries selecting [`JOB_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      job_id:           row.get(0)?,
      title:            row.get(1)?,
      company:          row.get(2)?,
      location:         row.get(3)?,
      required_skills:  row.get(4)?,
      experience:       row.get(5)?,
      qualifications:   row.get(6)?,
      responsibilities: row.get(7)?,
      benefits:         row.get(8)?,
      other_details:    row.get(9)?,
      created_at:       row.get(10)?,
    })
  }

  pub fn into_job(self) -> Result<Job> {
    Ok(Job {
      job_id:           JobId(self.job_id),
      title:            self.title,
      company:          self.company,
      location:         self.location,
      required_skills:  self.required_skills,
      experience:       self.experience,
      qualifications:   self.qualifications,
      responsibilities: self.responsibilities,
      benefits:         self.benefits,
      other_details:    self.other_details,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}

// ─── Scores ──────────────────────────────────────────────────────────────────

/// Raw values read directly from a `scores` row.
pub struct RawScore {
  pub candidate_id:      i64,
  pub job_id:            i64,
  pub sub_scores:        SubScores,
  pub eligibility_score: f64,
  pub computed_at:       String,
}

impl RawScore {
  /// Row mapper for `candidate_id, job_id, <4 sub-scores>, eligibility_score,
  /// computed_at`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      candidate_id:      row.get(0)?,
      job_id:            row.get(1)?,
      sub_scores:        sub_scores(row, 2)?,
      eligibility_score: row.get(6)?,
      computed_at:       row.get(7)?,
    })
  }

  pub fn into_score(self) -> Result<Score> {
    Ok(Score {
      candidate_id:      CandidateId(self.candidate_id),
      job_id:            JobId(self.job_id),
      sub_scores:        self.sub_scores,
      eligibility_score: self.eligibility_score,
      computed_at:       decode_dt(&self.computed_at)?,
    })
  }
}

/// Row mapper for `job_id, job_title, company, location, <4 sub-scores>,
/// eligibility_score`.
pub fn ranked_match(row: &rusqlite::Row<'_>) -> rusqlite::Result<RankedMatch> {
  Ok(RankedMatch {
    job_id:            JobId(row.get(0)?),
    title:             row.get(1)?,
    company:           row.get(2)?,
    location:          row.get(3)?,
    sub_scores:        sub_scores(row, 4)?,
    eligibility_score: row.get(8)?,
  })
}

/// Row mapper for `candidate_id, name, email, <4 sub-scores>,
/// eligibility_score`.
pub fn ranked_candidate(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RankedCandidate> {
  Ok(RankedCandidate {
    candidate_id:      CandidateId(row.get(0)?),
    name:              row.get(1)?,
    email:             row.get(2)?,
    sub_scores:        sub_scores(row, 3)?,
    eligibility_score: row.get(7)?,
  })
}
