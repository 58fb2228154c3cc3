//! Integration tests for `SqliteStore` and the matching engine against an
//! in-memory database.

use std::{
  future::Future,
  io,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
  time::Duration,
};

use jobfit_core::{
  Error as CoreError,
  embedding::EmbeddingProvider,
  engine::MatchingEngine,
  profile::{CandidateId, JobId, NewCandidate, NewJob},
  score::{NewScore, SubScores},
  store::{JobQuery, ProfileStore, ScoreMatrix},
};
use jobfit_embed::LexicalEmbedder;
use tokio::sync::Notify;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn engine() -> MatchingEngine<SqliteStore, LexicalEmbedder> {
  MatchingEngine::new(Arc::new(store().await), LexicalEmbedder::default())
}

fn candidate(email: &str, skills: &str) -> NewCandidate {
  NewCandidate {
    name: Some("Ada".into()),
    email: Some(email.into()),
    skills: Some(skills.into()),
    ..NewCandidate::default()
  }
}

fn job(title: &str, skills: &str) -> NewJob {
  NewJob {
    title: Some(title.into()),
    company: Some("Acme".into()),
    location: Some("Remote".into()),
    required_skills: Some(skills.into()),
    ..NewJob::default()
  }
}

fn row(job_id: JobId, eligibility: f64) -> NewScore {
  NewScore {
    job_id,
    sub_scores: SubScores::default(),
    eligibility_score: eligibility,
  }
}

// ─── Candidates ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_same_email_preserves_id_and_overwrites() {
  let s = store().await;

  let first = s.upsert_candidate(candidate("a@x.com", "Python")).await.unwrap();
  let second = s.upsert_candidate(candidate("a@x.com", "Go")).await.unwrap();

  assert!(first.created);
  assert!(!second.created);
  assert_eq!(first.candidate.candidate_id, second.candidate.candidate_id);
  assert_eq!(first.candidate.created_at, second.candidate.created_at);

  let all = s.list_candidates().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].skills, "Go");
}

#[tokio::test]
async fn upsert_matches_email_case_insensitively() {
  let s = store().await;

  let a = s.upsert_candidate(candidate("Alice@Example.com", "Rust")).await.unwrap();
  let b = s.upsert_candidate(candidate("  alice@example.COM ", "Go")).await.unwrap();

  assert_eq!(a.candidate.candidate_id, b.candidate.candidate_id);
  assert_eq!(b.candidate.email, "alice@example.com");
}

#[tokio::test]
async fn upsert_without_email_always_inserts() {
  let s = store().await;

  let a = s.upsert_candidate(candidate("", "Rust")).await.unwrap();
  let b = s.upsert_candidate(candidate("", "Rust")).await.unwrap();
  let c = s.upsert_candidate(NewCandidate::default()).await.unwrap();

  assert!(a.created && b.created && c.created);
  assert_ne!(a.candidate.candidate_id, b.candidate.candidate_id);
  assert_eq!(s.list_candidates().await.unwrap().len(), 3);
}

#[tokio::test]
async fn upsert_overwrites_absent_fields_with_empty() {
  let s = store().await;

  let mut full = candidate("a@x.com", "Python");
  full.phone = Some("555".into());
  s.upsert_candidate(full).await.unwrap();

  let updated = s.upsert_candidate(candidate("a@x.com", "Go")).await.unwrap();
  assert_eq!(updated.candidate.phone, "");
}

#[tokio::test]
async fn get_candidate_missing_returns_none() {
  let s = store().await;
  assert!(s.get_candidate(CandidateId(42)).await.unwrap().is_none());
}

// ─── Jobs ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_job_never_deduplicates() {
  let s = store().await;

  let a = s.insert_job(job("Backend", "Rust")).await.unwrap();
  let b = s.insert_job(job("Backend", "Rust")).await.unwrap();

  assert!(b.job_id > a.job_id);
  assert_eq!(s.list_jobs(&JobQuery::default()).await.unwrap().len(), 2);

  let fetched = s.get_job(a.job_id).await.unwrap().unwrap();
  assert_eq!(fetched.title, "Backend");
  assert_eq!(fetched.benefits, "");
}

#[tokio::test]
async fn list_jobs_filters_and_pages() {
  let s = store().await;
  s.insert_job(job("Backend Engineer", "Rust, SQL")).await.unwrap();
  s.insert_job(NewJob {
    company: Some("Globex".into()),
    location: Some("Berlin".into()),
    ..job("Data Scientist", "Python")
  })
  .await
  .unwrap();
  s.insert_job(job("Frontend Engineer", "TypeScript")).await.unwrap();

  let by_text = JobQuery { text: Some("Engineer".into()), ..JobQuery::default() };
  assert_eq!(s.list_jobs(&by_text).await.unwrap().len(), 2);

  let by_skill = JobQuery { text: Some("Python".into()), ..JobQuery::default() };
  assert_eq!(s.list_jobs(&by_skill).await.unwrap()[0].title, "Data Scientist");

  let by_company = JobQuery { company: Some("Acme".into()), ..JobQuery::default() };
  assert_eq!(s.list_jobs(&by_company).await.unwrap().len(), 2);

  let by_location = JobQuery { location: Some("Berlin".into()), ..JobQuery::default() };
  assert_eq!(s.list_jobs(&by_location).await.unwrap().len(), 1);

  let paged = JobQuery { limit: Some(1), offset: Some(1), ..JobQuery::default() };
  let page = s.list_jobs(&paged).await.unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].title, "Data Scientist");
}

#[tokio::test]
async fn oversized_paging_saturates() {
  let s = store().await;
  s.insert_job(job("A", "")).await.unwrap();
  s.insert_job(job("B", "")).await.unwrap();

  let past_end = JobQuery { offset: Some(usize::MAX), ..JobQuery::default() };
  assert!(s.list_jobs(&past_end).await.unwrap().is_empty());

  let unbounded = JobQuery { limit: Some(usize::MAX), ..JobQuery::default() };
  assert_eq!(s.list_jobs(&unbounded).await.unwrap().len(), 2);
}

#[tokio::test]
async fn job_facets_are_distinct_and_sorted() {
  let s = store().await;
  s.insert_job(job("A", "")).await.unwrap();
  s.insert_job(job("B", "")).await.unwrap();
  s.insert_job(NewJob {
    company: Some("Globex".into()),
    location: Some("Berlin".into()),
    ..job("C", "")
  })
  .await
  .unwrap();
  s.insert_job(NewJob::default()).await.unwrap();

  let facets = s.job_facets().await.unwrap();
  assert_eq!(facets.companies, vec!["Acme", "Globex"]);
  assert_eq!(facets.locations, vec!["Berlin", "Remote"]);
}

// ─── Score matrix ────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_scores_never_duplicates() {
  let s = store().await;
  let c = s.upsert_candidate(candidate("a@x.com", "Rust")).await.unwrap();
  let id = c.candidate.candidate_id;
  let j1 = s.insert_job(job("One", "Rust")).await.unwrap().job_id;
  let j2 = s.insert_job(job("Two", "Go")).await.unwrap().job_id;

  for _ in 0..3 {
    s.replace_scores_for_candidate(id, vec![row(j1, 10.0), row(j2, 20.0)])
      .await
      .unwrap();
  }

  let scores = s.scores_for_candidate(id).await.unwrap();
  assert_eq!(scores.len(), 2);
  assert_eq!(scores[0].job_id, j1);
  assert_eq!(scores[1].job_id, j2);

  s.replace_scores_for_candidate(id, vec![row(j2, 5.0)]).await.unwrap();
  let scores = s.scores_for_candidate(id).await.unwrap();
  assert_eq!(scores.len(), 1);
  assert_eq!(scores[0].eligibility_score, 5.0);
}

#[tokio::test]
async fn replace_scores_rolls_back_on_failure() {
  let s = store().await;
  let c = s.upsert_candidate(candidate("a@x.com", "Rust")).await.unwrap();
  let id = c.candidate.candidate_id;
  let j1 = s.insert_job(job("One", "Rust")).await.unwrap().job_id;

  s.replace_scores_for_candidate(id, vec![row(j1, 10.0)]).await.unwrap();

  // The second row violates UNIQUE(candidate_id, job_id).
  let result = s
    .replace_scores_for_candidate(id, vec![row(j1, 50.0), row(j1, 60.0)])
    .await;
  assert!(result.is_err());

  let scores = s.scores_for_candidate(id).await.unwrap();
  assert_eq!(scores.len(), 1);
  assert_eq!(scores[0].eligibility_score, 10.0);
}

#[tokio::test]
async fn ranked_breaks_ties_by_ascending_id() {
  let s = store().await;
  let id = s
    .upsert_candidate(candidate("a@x.com", "Rust"))
    .await
    .unwrap()
    .candidate
    .candidate_id;
  let j1 = s.insert_job(job("One", "")).await.unwrap().job_id;
  let j2 = s.insert_job(job("Two", "")).await.unwrap().job_id;
  let j3 = s.insert_job(job("Three", "")).await.unwrap().job_id;

  s.replace_scores_for_candidate(id, vec![
    row(j3, 40.0),
    row(j2, 70.0),
    row(j1, 40.0),
  ])
  .await
  .unwrap();

  let ranked = s.ranked_for_candidate(id, None).await.unwrap();
  let order: Vec<JobId> = ranked.iter().map(|m| m.job_id).collect();
  assert_eq!(order, vec![j2, j1, j3]);
  assert_eq!(ranked[0].title, "Two");
  assert_eq!(ranked[0].company, "Acme");

  let top = s.ranked_for_candidate(id, Some(1)).await.unwrap();
  assert_eq!(top.len(), 1);
  assert_eq!(top[0].job_id, j2);
}

// ─── Engine ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn job_insertion_scores_every_candidate() {
  let e = engine().await;
  for i in 0..4 {
    e.ingest_candidate(candidate(&format!("c{i}@x.com"), "Rust, SQL"))
      .await
      .unwrap();
  }

  let j = e.ingest_job(job("Backend", "Rust, Postgres")).await.unwrap();
  assert_eq!(e.store().count_scores_for_job(j.job_id).await.unwrap(), 4);

  let k = e.ingest_job(job("Frontend", "TypeScript")).await.unwrap();
  assert_eq!(e.store().count_scores_for_job(j.job_id).await.unwrap(), 4);
  assert_eq!(e.store().count_scores_for_job(k.job_id).await.unwrap(), 4);
}

#[tokio::test]
async fn candidate_upsert_scores_every_job() {
  let e = engine().await;
  e.ingest_job(job("One", "Rust")).await.unwrap();
  e.ingest_job(job("Two", "Go")).await.unwrap();
  e.ingest_job(job("Three", "Python")).await.unwrap();

  let c = e.ingest_candidate(candidate("a@x.com", "Rust")).await.unwrap();
  let scores = e
    .store()
    .scores_for_candidate(c.candidate.candidate_id)
    .await
    .unwrap();
  assert_eq!(scores.len(), 3);
}

#[tokio::test]
async fn repeated_recompute_keeps_one_row_per_pair() {
  let e = engine().await;
  e.ingest_job(job("One", "Rust")).await.unwrap();
  e.ingest_job(job("Two", "Go")).await.unwrap();
  let id = e
    .ingest_candidate(candidate("a@x.com", "Rust"))
    .await
    .unwrap()
    .candidate
    .candidate_id;

  for _ in 0..3 {
    assert_eq!(e.recompute_for_candidate(id).await.unwrap(), 2);
  }
  e.recompute_for_all_candidates().await.unwrap();
  e.ingest_candidate(candidate("a@x.com", "Go")).await.unwrap();

  assert_eq!(e.store().scores_for_candidate(id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn reingesting_candidate_refreshes_scores() {
  let e = engine().await;
  let rust = e.ingest_job(job("Rust job", "Rust")).await.unwrap().job_id;
  let go = e.ingest_job(job("Go job", "Go")).await.unwrap().job_id;

  let id = e
    .ingest_candidate(candidate("a@x.com", "Rust"))
    .await
    .unwrap()
    .candidate
    .candidate_id;
  assert_eq!(e.ranked_matches(id, Some(1)).await.unwrap()[0].job_id, rust);

  e.ingest_candidate(candidate("a@x.com", "Go")).await.unwrap();
  assert_eq!(e.ranked_matches(id, Some(1)).await.unwrap()[0].job_id, go);
}

#[tokio::test]
async fn worked_example_scores() {
  let e = engine().await;
  e.ingest_job(NewJob {
    title: Some("Backend Developer".into()),
    required_skills: Some("Python, Django, SQL".into()),
    qualifications: Some("Bachelor's degree in CS".into()),
    experience: Some("2+ years backend".into()),
    ..NewJob::default()
  })
  .await
  .unwrap();

  let id = e
    .ingest_candidate(NewCandidate {
      email: Some("dev@x.com".into()),
      skills: Some("Python, SQL".into()),
      qualifications: Some("BSc Computer Science".into()),
      experience: Some("2 years backend developer".into()),
      ..NewCandidate::default()
    })
    .await
    .unwrap()
    .candidate
    .candidate_id;

  let matches = e.ranked_matches(id, None).await.unwrap();
  assert_eq!(matches.len(), 1);
  let m = &matches[0];
  let s = &m.sub_scores;

  assert!(s.skill_score > 60.0, "skill {}", s.skill_score);
  assert!(s.education_score > 60.0, "education {}", s.education_score);

  let expected = 0.4 * s.skill_score
    + 0.2 * s.education_score
    + 0.2 * s.project_score
    + 0.1 * s.experience_score;
  assert!((m.eligibility_score - expected).abs() < 1e-6);

  for v in [
    s.skill_score,
    s.education_score,
    s.project_score,
    s.experience_score,
  ] {
    assert!((0.0..=100.0).contains(&v));
  }
  assert!((0.0..=90.0).contains(&m.eligibility_score));
}

#[tokio::test]
async fn empty_skills_score_is_defined_and_does_not_dominate() {
  let e = engine().await;
  let j = e
    .ingest_job(NewJob {
      required_skills: Some("Rust, SQL".into()),
      qualifications: Some("BSc Computer Science".into()),
      experience: Some("3 years backend".into()),
      ..job("Backend", "")
    })
    .await
    .unwrap()
    .job_id;

  let profile = |email: &str, skills: &str| NewCandidate {
    email: Some(email.into()),
    skills: Some(skills.into()),
    qualifications: Some("BSc Computer Science".into()),
    projects: Some("Rust services".into()),
    experience: Some("3 years backend".into()),
    ..NewCandidate::default()
  };

  let empty = e.ingest_candidate(profile("empty@x.com", "")).await.unwrap();
  let sentinel = e
    .ingest_candidate(profile("none@x.com", "Not mentioned"))
    .await
    .unwrap();
  let full = e.ingest_candidate(profile("full@x.com", "Rust, SQL")).await.unwrap();

  let ranked = e.ranked_candidates(j, None).await.unwrap();
  assert_eq!(ranked.len(), 3);
  assert_eq!(ranked[0].candidate_id, full.candidate.candidate_id);

  for r in &ranked[1..] {
    assert_eq!(r.sub_scores.skill_score, 0.0);
  }
  let ids: Vec<_> = ranked[1..].iter().map(|r| r.candidate_id).collect();
  assert_eq!(ids, vec![
    empty.candidate.candidate_id,
    sentinel.candidate.candidate_id
  ]);
}

#[tokio::test]
async fn ranked_matches_are_non_increasing() {
  let e = engine().await;
  for (title, skills) in [
    ("A", "Rust"),
    ("B", "Rust, SQL"),
    ("C", "Python"),
    ("D", "Rust, SQL, Docker"),
    ("E", ""),
  ] {
    e.ingest_job(job(title, skills)).await.unwrap();
  }
  let id = e
    .ingest_candidate(candidate("a@x.com", "Rust, SQL"))
    .await
    .unwrap()
    .candidate
    .candidate_id;

  let ranked = e.ranked_matches(id, None).await.unwrap();
  assert_eq!(ranked.len(), 5);
  assert!(
    ranked
      .windows(2)
      .all(|w| w[0].eligibility_score >= w[1].eligibility_score)
  );
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
  let e = engine().await;

  let err = e.recompute_for_candidate(CandidateId(7)).await.unwrap_err();
  assert!(matches!(err, CoreError::CandidateNotFound(CandidateId(7))));

  let err = e.ranked_matches(CandidateId(7), None).await.unwrap_err();
  assert!(err.is_not_found());

  let err = e.ranked_candidates(JobId(3), None).await.unwrap_err();
  assert!(matches!(err, CoreError::JobNotFound(JobId(3))));
}

// ─── Embedding failure ───────────────────────────────────────────────────────

/// Lexical embeddings, except any text mentioning `COBOL` fails.
struct Flaky(LexicalEmbedder);

impl EmbeddingProvider for Flaky {
  type Error = io::Error;

  fn name(&self) -> &str { "flaky" }

  fn dimension(&self) -> usize { self.0.dimension() }

  fn embed<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<f32>, io::Error>> + Send + 'a {
    async move {
      if text.contains("COBOL") {
        Err(io::Error::other("model offline"))
      } else {
        Ok(self.0.embed_text(text))
      }
    }
  }
}

#[tokio::test]
async fn embedding_failure_leaves_matrix_untouched() {
  let e = MatchingEngine::new(Arc::new(store().await), Flaky(LexicalEmbedder::default()));

  let first = e.ingest_job(job("Rust job", "Rust")).await.unwrap().job_id;
  let a = e
    .ingest_candidate(candidate("a@x.com", "Rust"))
    .await
    .unwrap()
    .candidate
    .candidate_id;
  let b = e
    .ingest_candidate(candidate("b@x.com", "Go"))
    .await
    .unwrap()
    .candidate
    .candidate_id;
  let before_a = e.store().scores_for_candidate(a).await.unwrap();
  let before_b = e.store().scores_for_candidate(b).await.unwrap();

  let err = e.ingest_job(job("Legacy", "COBOL")).await.unwrap_err();
  assert!(matches!(err, CoreError::EmbeddingUnavailable(_)));

  // The job row exists, but no candidate was rescored.
  let jobs = e.store().list_jobs(&JobQuery::default()).await.unwrap();
  assert_eq!(jobs.len(), 2);
  assert_eq!(e.store().scores_for_candidate(a).await.unwrap(), before_a);
  assert_eq!(e.store().scores_for_candidate(b).await.unwrap(), before_b);
  assert_eq!(before_a.len(), 1);
  assert_eq!(before_a[0].job_id, first);
}

#[tokio::test]
async fn candidate_embedding_failure_keeps_previous_scores() {
  let e = MatchingEngine::new(Arc::new(store().await), Flaky(LexicalEmbedder::default()));
  e.ingest_job(job("Rust job", "Rust")).await.unwrap();

  let id = e
    .ingest_candidate(candidate("a@x.com", "Rust"))
    .await
    .unwrap()
    .candidate
    .candidate_id;
  let before = e.store().scores_for_candidate(id).await.unwrap();

  let err = e
    .ingest_candidate(candidate("a@x.com", "COBOL"))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::EmbeddingUnavailable(_)));

  // Profile text was updated; scores are the previous, complete set.
  let stored = e.store().get_candidate(id).await.unwrap().unwrap();
  assert_eq!(stored.skills, "COBOL");
  assert_eq!(e.store().scores_for_candidate(id).await.unwrap(), before);
}

// ─── Concurrent triggers ─────────────────────────────────────────────────────

/// Pauses inside `embed` on any text containing "gate" while armed.
struct Gated {
  inner:   LexicalEmbedder,
  armed:   AtomicBool,
  entered: Notify,
  release: Notify,
}

impl EmbeddingProvider for Gated {
  type Error = io::Error;

  fn name(&self) -> &str { "gated" }

  fn dimension(&self) -> usize { self.inner.dimension() }

  fn embed<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<f32>, io::Error>> + Send + 'a {
    async move {
      if text.contains("gate") && self.armed.swap(false, Ordering::SeqCst) {
        self.entered.notify_one();
        self.release.notified().await;
      }
      Ok(self.inner.embed_text(text))
    }
  }
}

#[tokio::test]
async fn job_trigger_never_overwrites_newer_candidate_scores() {
  let gated = Arc::new(Gated {
    inner:   LexicalEmbedder::default(),
    armed:   AtomicBool::new(false),
    entered: Notify::new(),
    release: Notify::new(),
  });
  let e = Arc::new(MatchingEngine::new(Arc::new(store().await), gated.clone()));

  let go_job = e.ingest_job(job("Go job", "Go")).await.unwrap().job_id;
  let id = e
    .ingest_candidate(candidate("a@x.com", "gate python"))
    .await
    .unwrap()
    .candidate
    .candidate_id;

  // The job trigger reads the old text, then stalls while embedding it.
  gated.armed.store(true, Ordering::SeqCst);
  let job_trigger = tokio::spawn({
    let e = e.clone();
    async move { e.ingest_job(job("Python job", "Python")).await }
  });
  gated.entered.notified().await;

  let reingest = tokio::spawn({
    let e = e.clone();
    async move { e.ingest_candidate(candidate("a@x.com", "Go")).await }
  });
  tokio::time::sleep(Duration::from_millis(50)).await;
  gated.release.notify_one();

  let python_job = job_trigger.await.unwrap().unwrap().job_id;
  reingest.await.unwrap().unwrap();

  let stored = e.store().get_candidate(id).await.unwrap().unwrap();
  assert_eq!(stored.skills, "Go");

  let skill = |scores: &[jobfit_core::score::Score], job_id: JobId| {
    scores
      .iter()
      .find(|s| s.job_id == job_id)
      .map(|s| s.sub_scores.skill_score)
  };
  let scores = e.store().scores_for_candidate(id).await.unwrap();
  assert_eq!(scores.len(), 2);
  assert!((skill(&scores, go_job).unwrap() - 100.0).abs() < 1e-6);
  assert!(skill(&scores, python_job).unwrap() < 1e-6);
}
