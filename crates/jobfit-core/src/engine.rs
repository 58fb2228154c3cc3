//! [`MatchingEngine`]: recompute fan-out and ranked retrieval.
//!
//! Every ingestion event regenerates scores eagerly and exhaustively:
//!
//! - a candidate upsert rescores that candidate against every job;
//! - a job insertion rescores every candidate against every job.
//!
//! All rows for a trigger are computed before anything is written. An
//! embedding failure therefore aborts the trigger with the matrix untouched,
//! and each candidate's row set is swapped in with one atomic replacement.
//!
//! Triggers run one at a time. A job trigger that read a candidate's old
//! text can never write after that candidate's own, newer trigger.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
  Error, Result,
  eligibility::EligibilityWeights,
  embedding::EmbeddingProvider,
  profile::{Candidate, CandidateId, Job, JobId, NewCandidate, NewJob},
  score::{NewScore, RankedCandidate, RankedMatch, SubScores},
  similarity::{SimilarityScorer, similarity_score},
  store::{JobQuery, ProfileStore, ScoreMatrix, Upserted},
};

// ─── Embedded profiles ───────────────────────────────────────────────────────

struct CandidateVectors {
  skills:         Vec<f32>,
  qualifications: Vec<f32>,
  projects:       Vec<f32>,
  experience:     Vec<f32>,
}

struct JobVectors {
  job_id:          JobId,
  required_skills: Vec<f32>,
  qualifications:  Vec<f32>,
  experience:      Vec<f32>,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Keeps the score matrix consistent with current profile text.
pub struct MatchingEngine<S, E> {
  store:    Arc<S>,
  scorer:   SimilarityScorer<E>,
  weights:  EligibilityWeights,
  /// Held for the whole read-compute-write span of every trigger.
  triggers: Mutex<()>,
}

impl<S, E> MatchingEngine<S, E>
where
  S: ProfileStore + ScoreMatrix,
  E: EmbeddingProvider,
{
  pub fn new(store: Arc<S>, embedder: E) -> Self {
    Self {
      store,
      scorer: SimilarityScorer::new(embedder),
      weights: EligibilityWeights::default(),
      triggers: Mutex::new(()),
    }
  }

  pub fn with_weights(mut self, weights: EligibilityWeights) -> Self {
    self.weights = weights;
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn weights(&self) -> EligibilityWeights { self.weights }

  // ── Ingestion triggers ────────────────────────────────────────────────

  /// Upsert a candidate by email, then rescore it against every job.
  pub async fn ingest_candidate(&self, input: NewCandidate) -> Result<Upserted> {
    let _trigger = self.triggers.lock().await;
    let upserted = self
      .store
      .upsert_candidate(input)
      .await
      .map_err(Error::store)?;

    info!(
      candidate_id = %upserted.candidate.candidate_id,
      created = upserted.created,
      "candidate upserted"
    );

    self.rescore_candidate(upserted.candidate.candidate_id).await?;
    Ok(upserted)
  }

  /// Insert a job, then rescore every candidate against every job.
  pub async fn ingest_job(&self, input: NewJob) -> Result<Job> {
    let _trigger = self.triggers.lock().await;
    let job = self.store.insert_job(input).await.map_err(Error::store)?;
    info!(job_id = %job.job_id, title = %job.title, "job inserted");

    self.rescore_all().await?;
    Ok(job)
  }

  // ── Recompute ─────────────────────────────────────────────────────────

  /// Replace a candidate's full score set. Returns the number of rows
  /// written (one per job).
  pub async fn recompute_for_candidate(&self, id: CandidateId) -> Result<usize> {
    let _trigger = self.triggers.lock().await;
    self.rescore_candidate(id).await
  }

  /// Replace every candidate's full score set. Returns the number of
  /// candidates rescored.
  pub async fn recompute_for_all_candidates(&self) -> Result<usize> {
    let _trigger = self.triggers.lock().await;
    self.rescore_all().await
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Jobs ranked for a candidate. Read-only.
  pub async fn ranked_matches(
    &self,
    id: CandidateId,
    limit: Option<usize>,
  ) -> Result<Vec<RankedMatch>> {
    self.require_candidate(id).await?;
    self
      .store
      .ranked_for_candidate(id, limit)
      .await
      .map_err(Error::store)
  }

  /// Candidates ranked for a job. Read-only.
  pub async fn ranked_candidates(
    &self,
    id: JobId,
    limit: Option<usize>,
  ) -> Result<Vec<RankedCandidate>> {
    self
      .store
      .get_job(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::JobNotFound(id))?;
    self.store.ranked_for_job(id, limit).await.map_err(Error::store)
  }

  /// Score a single pair without touching the store.
  pub async fn score(&self, candidate: &Candidate, job: &Job) -> Result<NewScore> {
    let c = self.embed_candidate(candidate).await?;
    let j = self.embed_job(job).await?;
    Ok(self.score_pair(&c, &j))
  }

  // ── Internals ─────────────────────────────────────────────────────────

  /// Caller holds `triggers`.
  async fn rescore_candidate(&self, id: CandidateId) -> Result<usize> {
    let candidate = self.require_candidate(id).await?;
    let jobs = self.job_vectors().await?;
    let rows = self.score_candidate(&candidate, &jobs).await?;
    let written = rows.len();

    self
      .store
      .replace_scores_for_candidate(id, rows)
      .await
      .map_err(Error::store)?;

    info!(candidate_id = %id, rows = written, "candidate rescored");
    Ok(written)
  }

  /// Caller holds `triggers`.
  async fn rescore_all(&self) -> Result<usize> {
    let candidates = self.store.list_candidates().await.map_err(Error::store)?;
    let jobs = self.job_vectors().await?;

    let mut pending = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
      let rows = self.score_candidate(candidate, &jobs).await?;
      pending.push((candidate.candidate_id, rows));
    }

    for (id, rows) in pending {
      self
        .store
        .replace_scores_for_candidate(id, rows)
        .await
        .map_err(Error::store)?;
    }

    info!(
      candidates = candidates.len(),
      jobs = jobs.len(),
      embedder = self.scorer.embedder().name(),
      "score matrix rebuilt"
    );
    Ok(candidates.len())
  }

  async fn require_candidate(&self, id: CandidateId) -> Result<Candidate> {
    self
      .store
      .get_candidate(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::CandidateNotFound(id))
  }

  async fn job_vectors(&self) -> Result<Vec<JobVectors>> {
    let jobs = self
      .store
      .list_jobs(&JobQuery::default())
      .await
      .map_err(Error::store)?;

    let mut out = Vec::with_capacity(jobs.len());
    for job in &jobs {
      out.push(self.embed_job(job).await?);
    }
    Ok(out)
  }

  async fn score_candidate(
    &self,
    candidate: &Candidate,
    jobs: &[JobVectors],
  ) -> Result<Vec<NewScore>> {
    let c = self.embed_candidate(candidate).await?;
    Ok(
      jobs
        .iter()
        .map(|j| {
          let row = self.score_pair(&c, j);
          debug!(
            candidate_id = %candidate.candidate_id,
            job_id = %j.job_id,
            eligibility = row.eligibility_score,
            "pair scored"
          );
          row
        })
        .collect(),
    )
  }

  async fn embed_candidate(&self, c: &Candidate) -> Result<CandidateVectors> {
    Ok(CandidateVectors {
      skills:         self.scorer.embed(&c.skills).await?,
      qualifications: self.scorer.embed(&c.qualifications).await?,
      projects:       self.scorer.embed(&c.projects).await?,
      experience:     self.scorer.embed(&c.experience).await?,
    })
  }

  async fn embed_job(&self, j: &Job) -> Result<JobVectors> {
    Ok(JobVectors {
      job_id:          j.job_id,
      required_skills: self.scorer.embed(&j.required_skills).await?,
      qualifications:  self.scorer.embed(&j.qualifications).await?,
      experience:      self.scorer.embed(&j.experience).await?,
    })
  }

  fn score_pair(&self, c: &CandidateVectors, j: &JobVectors) -> NewScore {
    let sub_scores = SubScores {
      skill_score:      similarity_score(&c.skills, &j.required_skills),
      education_score:  similarity_score(&c.qualifications, &j.qualifications),
      // Project domains are compared against the job's required skills.
      project_score:    similarity_score(&c.projects, &j.required_skills),
      experience_score: similarity_score(&c.experience, &j.experience),
    };
    NewScore {
      job_id: j.job_id,
      eligibility_score: self.weights.eligibility(&sub_scores),
      sub_scores,
    }
  }
}
