//! [`SqliteStore`], the SQLite implementation of [`ProfileStore`] and
//! [`ScoreMatrix`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use jobfit_core::{
  profile::{Candidate, CandidateId, Job, JobId, NewCandidate, NewJob},
  score::{NewScore, RankedCandidate, RankedMatch, Score},
  store::{JobFacets, JobQuery, ProfileStore, ScoreMatrix, Upserted},
};

use crate::{
  Result,
  encode::{
    CANDIDATE_COLUMNS, JOB_COLUMNS, RawCandidate, RawJob, RawScore, encode_dt,
    encode_limit, encode_offset, ranked_candidate, ranked_match,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A jobfit store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All
/// statements run on the connection's single thread, so each `call` closure
/// is a single-writer critical section.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ProfileStore impl ───────────────────────────────────────────────────────

impl ProfileStore for SqliteStore {
  type Error = crate::Error;

  async fn upsert_candidate(&self, input: NewCandidate) -> Result<Upserted> {
    let email          = input.identity();
    let name           = input.name.unwrap_or_default();
    let phone          = input.phone.unwrap_or_default();
    let linkedin       = input.linkedin.unwrap_or_default();
    let skills         = input.skills.unwrap_or_default();
    let qualifications = input.qualifications.unwrap_or_default();
    let projects       = input.projects.unwrap_or_default();
    let experience     = input.experience.unwrap_or_default();
    let now            = encode_dt(Utc::now());

    let (raw, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing: Option<i64> = match &email {
          Some(e) => tx
            .query_row(
              "SELECT candidate_id FROM candidates WHERE email = ?1",
              rusqlite::params![e],
              |r| r.get(0),
            )
            .optional()?,
          None => None,
        };

        let (id, created) = match existing {
          Some(id) => {
            tx.execute(
              "UPDATE candidates
               SET name = ?1, phone = ?2, linkedin = ?3, skills = ?4,
                   qualifications = ?5, projects = ?6, experience = ?7,
                   updated_at = ?8
               WHERE candidate_id = ?9",
              rusqlite::params![
                name, phone, linkedin, skills, qualifications, projects,
                experience, now, id,
              ],
            )?;
            (id, false)
          }
          None => {
            tx.execute(
              "INSERT INTO candidates (
                 name, email, phone, linkedin, skills, qualifications,
                 projects, experience, created_at, updated_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
              rusqlite::params![
                name,
                email.unwrap_or_default(),
                phone,
                linkedin,
                skills,
                qualifications,
                projects,
                experience,
                now,
              ],
            )?;
            (tx.last_insert_rowid(), true)
          }
        };

        let raw = tx.query_row(
          &format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE candidate_id = ?1"),
          rusqlite::params![id],
          RawCandidate::from_row,
        )?;

        tx.commit()?;
        Ok((raw, created))
      })
      .await?;

    Ok(Upserted { candidate: raw.into_candidate()?, created })
  }

  async fn insert_job(&self, input: NewJob) -> Result<Job> {
    let title            = input.title.unwrap_or_default();
    let company          = input.company.unwrap_or_default();
    let location         = input.location.unwrap_or_default();
    let required_skills  = input.required_skills.unwrap_or_default();
    let experience       = input.experience.unwrap_or_default();
    let qualifications   = input.qualifications.unwrap_or_default();
    let responsibilities = input.responsibilities.unwrap_or_default();
    let benefits         = input.benefits.unwrap_or_default();
    let other_details    = input.other_details.unwrap_or_default();
    let now              = encode_dt(Utc::now());

    let raw: RawJob = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO jobs (
             job_title, company, location, required_skills, experience,
             qualifications, responsibilities, benefits, other_details,
             created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            title,
            company,
            location,
            required_skills,
            experience,
            qualifications,
            responsibilities,
            benefits,
            other_details,
            now,
          ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
          &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = ?1"),
          rusqlite::params![id],
          RawJob::from_row,
        )?)
      })
      .await?;

    raw.into_job()
  }

  async fn get_candidate(&self, id: CandidateId) -> Result<Option<Candidate>> {
    let raw: Option<RawCandidate> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE candidate_id = ?1"),
            rusqlite::params![id.0],
            RawCandidate::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCandidate::into_candidate).transpose()
  }

  async fn get_job(&self, id: JobId) -> Result<Option<Job>> {
    let raw: Option<RawJob> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = ?1"),
            rusqlite::params![id.0],
            RawJob::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawJob::into_job).transpose()
  }

  async fn list_candidates(&self) -> Result<Vec<Candidate>> {
    let raws: Vec<RawCandidate> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CANDIDATE_COLUMNS} FROM candidates ORDER BY candidate_id"
        ))?;
        let rows = stmt
          .query_map([], RawCandidate::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCandidate::into_candidate).collect()
  }

  async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>> {
    let text_pattern = query.text.as_deref().map(|t| format!("%{t}%"));
    let company      = query.company.clone();
    let location     = query.location.clone();
    let limit_val    = encode_limit(query.limit);
    let offset_val   = encode_offset(query.offset);

    let raws: Vec<RawJob> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {JOB_COLUMNS} FROM jobs
           WHERE (?1 IS NULL OR job_title LIKE ?1 OR company LIKE ?1
                  OR required_skills LIKE ?1)
             AND (?2 IS NULL OR company = ?2)
             AND (?3 IS NULL OR location = ?3)
           ORDER BY job_id
           LIMIT ?4 OFFSET ?5"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![text_pattern, company, location, limit_val, offset_val],
            RawJob::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawJob::into_job).collect()
  }

  async fn job_facets(&self) -> Result<JobFacets> {
    let facets = self
      .conn
      .call(|conn| {
        let distinct = |column: &str| -> rusqlite::Result<Vec<String>> {
          let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT {column} FROM jobs WHERE {column} <> '' ORDER BY {column}"
          ))?;
          let values = stmt
            .query_map([], |r| r.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
          Ok(values)
        };
        Ok(JobFacets {
          companies: distinct("company")?,
          locations: distinct("location")?,
        })
      })
      .await?;
    Ok(facets)
  }
}

// ─── ScoreMatrix impl ────────────────────────────────────────────────────────

impl ScoreMatrix for SqliteStore {
  type Error = crate::Error;

  async fn replace_scores_for_candidate(
    &self,
    candidate_id: CandidateId,
    rows:         Vec<NewScore>,
  ) -> Result<()> {
    let id     = candidate_id.0;
    let at_str = encode_dt(Utc::now());

    let (deleted, inserted) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let deleted = tx.execute(
          "DELETE FROM scores WHERE candidate_id = ?1",
          rusqlite::params![id],
        )?;

        {
          let mut stmt = tx.prepare(
            "INSERT INTO scores (
               candidate_id, job_id, skill_score, education_score,
               project_score, experience_score, eligibility_score, computed_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          )?;
          for row in &rows {
            let s = &row.sub_scores;
            stmt.execute(rusqlite::params![
              id,
              row.job_id.0,
              s.skill_score,
              s.education_score,
              s.project_score,
              s.experience_score,
              row.eligibility_score,
              at_str,
            ])?;
          }
        }

        tx.commit()?;
        Ok((deleted, rows.len()))
      })
      .await?;

    debug!(candidate_id = id, deleted, inserted, "scores replaced");
    Ok(())
  }

  async fn ranked_for_candidate(
    &self,
    candidate_id: CandidateId,
    limit:        Option<usize>,
  ) -> Result<Vec<RankedMatch>> {
    let id        = candidate_id.0;
    let limit_val = encode_limit(limit);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT s.job_id, j.job_title, j.company, j.location,
                  s.skill_score, s.education_score, s.project_score,
                  s.experience_score, s.eligibility_score
           FROM scores s
           JOIN jobs j ON j.job_id = s.job_id
           WHERE s.candidate_id = ?1
           ORDER BY s.eligibility_score DESC, s.job_id ASC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id, limit_val], ranked_match)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn ranked_for_job(
    &self,
    job_id: JobId,
    limit:  Option<usize>,
  ) -> Result<Vec<RankedCandidate>> {
    let id        = job_id.0;
    let limit_val = encode_limit(limit);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT s.candidate_id, c.name, c.email,
                  s.skill_score, s.education_score, s.project_score,
                  s.experience_score, s.eligibility_score
           FROM scores s
           JOIN candidates c ON c.candidate_id = s.candidate_id
           WHERE s.job_id = ?1
           ORDER BY s.eligibility_score DESC, s.candidate_id ASC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id, limit_val], ranked_candidate)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn scores_for_candidate(&self, candidate_id: CandidateId) -> Result<Vec<Score>> {
    let id = candidate_id.0;

    let raws: Vec<RawScore> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT candidate_id, job_id, skill_score, education_score,
                  project_score, experience_score, eligibility_score,
                  computed_at
           FROM scores
           WHERE candidate_id = ?1
           ORDER BY job_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id], RawScore::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawScore::into_score).collect()
  }

  async fn count_scores_for_job(&self, job_id: JobId) -> Result<usize> {
    let id = job_id.0;
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM scores WHERE job_id = ?1",
          rusqlite::params![id],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(count as usize)
  }
}
