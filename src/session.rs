//! Per-process session state shared by every request handler.
//!
//! Holds the uploaded playbooks, the current transcript text and the most
//! recent analysis. Nothing here is persisted; a restart starts empty.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use uuid::Uuid;

use crate::models::{AnalysisResult, Playbook};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("An analysis is already running")]
    AnalysisInProgress,
    #[error("Playbook not found: {0}")]
    PlaybookNotFound(Uuid),
}

// ═══════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════

/// In-memory dashboard state.
///
/// Wrapped in `Arc` at startup and cloned into the router state.
#[derive(Default)]
pub struct Session {
    /// Uploaded playbooks in upload order.
    playbooks: RwLock<Vec<Playbook>>,
    /// Transcript text as last uploaded. Empty when none.
    transcript: RwLock<String>,
    /// Latest successful analysis. Replaced wholesale, never merged.
    current_analysis: RwLock<Option<AnalysisResult>>,
    /// Set while an analysis request is outstanding.
    analysis_running: AtomicBool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Playbooks ───────────────────────────────────────────

    fn read_playbooks(&self) -> Result<RwLockReadGuard<'_, Vec<Playbook>>, SessionError> {
        self.playbooks.read().map_err(|_| SessionError::LockPoisoned)
    }

    fn write_playbooks(&self) -> Result<RwLockWriteGuard<'_, Vec<Playbook>>, SessionError> {
        self.playbooks.write().map_err(|_| SessionError::LockPoisoned)
    }

    /// Append a playbook. Duplicate names are allowed; ids are unique.
    pub fn add_playbook(&self, playbook: Playbook) -> Result<(), SessionError> {
        let mut playbooks = self.write_playbooks()?;
        tracing::info!(
            playbook_id = %playbook.id,
            name = %playbook.name,
            size = %playbook.size,
            "Playbook added"
        );
        playbooks.push(playbook);
        Ok(())
    }

    /// Remove the playbook with `id`, returning it.
    pub fn remove_playbook(&self, id: Uuid) -> Result<Playbook, SessionError> {
        let mut playbooks = self.write_playbooks()?;
        let pos = playbooks
            .iter()
            .position(|p| p.id == id)
            .ok_or(SessionError::PlaybookNotFound(id))?;
        let removed = playbooks.remove(pos);
        tracing::info!(playbook_id = %id, name = %removed.name, "Playbook removed");
        Ok(removed)
    }

    /// Snapshot of all playbooks in upload order.
    pub fn playbooks(&self) -> Result<Vec<Playbook>, SessionError> {
        Ok(self.read_playbooks()?.clone())
    }

    /// Names of all playbooks in upload order.
    pub fn playbook_names(&self) -> Result<Vec<String>, SessionError> {
        Ok(self.read_playbooks()?.iter().map(|p| p.name.clone()).collect())
    }

    pub fn playbook_count(&self) -> Result<usize, SessionError> {
        Ok(self.read_playbooks()?.len())
    }

    // ── Transcript ──────────────────────────────────────────

    pub fn set_transcript(&self, text: String) -> Result<(), SessionError> {
        let mut transcript = self.transcript.write().map_err(|_| SessionError::LockPoisoned)?;
        tracing::info!(chars = text.chars().count(), "Transcript loaded");
        *transcript = text;
        Ok(())
    }

    pub fn transcript(&self) -> Result<String, SessionError> {
        Ok(self
            .transcript
            .read()
            .map_err(|_| SessionError::LockPoisoned)?
            .clone())
    }

    pub fn has_transcript(&self) -> Result<bool, SessionError> {
        Ok(!self
            .transcript
            .read()
            .map_err(|_| SessionError::LockPoisoned)?
            .trim()
            .is_empty())
    }

    // ── Analysis ────────────────────────────────────────────

    /// Store a fresh analysis, replacing any previous one.
    pub fn set_analysis(&self, result: AnalysisResult) -> Result<(), SessionError> {
        let mut current = self
            .current_analysis
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        *current = Some(result);
        Ok(())
    }

    pub fn current_analysis(&self) -> Result<Option<AnalysisResult>, SessionError> {
        Ok(self
            .current_analysis
            .read()
            .map_err(|_| SessionError::LockPoisoned)?
            .clone())
    }

    /// Claim the single analysis slot.
    ///
    /// Fails with `AnalysisInProgress` while another guard is alive. The slot
    /// is released when the returned guard drops, whatever the outcome. The
    /// guard owns its session handle so it can move into the blocking task
    /// that performs the request.
    pub fn begin_analysis(self: &Arc<Self>) -> Result<AnalysisGuard, SessionError> {
        self.analysis_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::AnalysisInProgress)?;
        Ok(AnalysisGuard {
            session: Arc::clone(self),
        })
    }

    pub fn is_analyzing(&self) -> bool {
        self.analysis_running.load(Ordering::Acquire)
    }
}

// ═══════════════════════════════════════════════════════════
// AnalysisGuard: RAII in-flight marker
// ═══════════════════════════════════════════════════════════

/// Held until the outbound analysis call has returned.
pub struct AnalysisGuard {
    session: Arc<Session>,
}

impl AnalysisGuard {
    /// The session this slot belongs to.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl Drop for AnalysisGuard {
    fn drop(&mut self) {
        self.session.analysis_running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricScores;

    fn sample_result(score: u8) -> AnalysisResult {
        AnalysisResult::new(
            "Sales".into(),
            "Demo".into(),
            "30 minutes".into(),
            MetricScores::new([score; 5]).unwrap(),
            vec![],
        )
    }

    #[test]
    fn new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.playbook_count().unwrap(), 0);
        assert!(!session.has_transcript().unwrap());
        assert!(session.current_analysis().unwrap().is_none());
        assert!(!session.is_analyzing());
    }

    #[test]
    fn playbooks_keep_upload_order() {
        let session = Session::new();
        session.add_playbook(Playbook::new("a.pdf", vec![1])).unwrap();
        session.add_playbook(Playbook::new("b.pdf", vec![2])).unwrap();
        session.add_playbook(Playbook::new("a.pdf", vec![3])).unwrap();

        assert_eq!(
            session.playbook_names().unwrap(),
            vec!["a.pdf".to_string(), "b.pdf".into(), "a.pdf".into()]
        );
    }

    #[test]
    fn remove_playbook_by_id() {
        let session = Session::new();
        let first = Playbook::new("a.pdf", vec![1]);
        let first_id = first.id;
        session.add_playbook(first).unwrap();
        session.add_playbook(Playbook::new("b.pdf", vec![2])).unwrap();

        let removed = session.remove_playbook(first_id).unwrap();
        assert_eq!(removed.name, "a.pdf");
        assert_eq!(session.playbook_names().unwrap(), vec!["b.pdf".to_string()]);
    }

    #[test]
    fn remove_unknown_playbook_fails() {
        let session = Session::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            session.remove_playbook(id),
            Err(SessionError::PlaybookNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn whitespace_transcript_counts_as_absent() {
        let session = Session::new();
        session.set_transcript("  \n\t ".into()).unwrap();
        assert!(!session.has_transcript().unwrap());
        session.set_transcript("Rep: hello".into()).unwrap();
        assert!(session.has_transcript().unwrap());
        assert_eq!(session.transcript().unwrap(), "Rep: hello");
    }

    #[test]
    fn new_analysis_replaces_previous() {
        let session = Session::new();
        session.set_analysis(sample_result(40)).unwrap();
        session.set_analysis(sample_result(90)).unwrap();
        let current = session.current_analysis().unwrap().unwrap();
        assert_eq!(current.overall_score(), 90);
    }

    #[test]
    fn only_one_analysis_at_a_time() {
        let session = Arc::new(Session::new());
        let guard = session.begin_analysis().unwrap();
        assert!(session.is_analyzing());
        assert!(matches!(
            session.begin_analysis(),
            Err(SessionError::AnalysisInProgress)
        ));
        drop(guard);
        assert!(!session.is_analyzing());
        assert!(session.begin_analysis().is_ok());
    }

    #[test]
    fn guard_outlives_the_caller_on_another_thread() {
        let session = Arc::new(Session::new());
        let guard = session.begin_analysis().unwrap();

        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let worker = std::thread::spawn(move || {
            let _slot = guard;
            release_rx.recv().unwrap();
        });

        assert!(session.is_analyzing());
        assert!(matches!(
            session.begin_analysis(),
            Err(SessionError::AnalysisInProgress)
        ));

        release_tx.send(()).unwrap();
        worker.join().unwrap();
        assert!(!session.is_analyzing());
    }

    #[test]
    fn add_playbook_on_poisoned_lock_fails_without_adding() {
        let session = Arc::new(Session::new());
        let poisoner = Arc::clone(&session);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.playbooks.write().unwrap();
            panic!("poison the playbook lock");
        })
        .join();

        assert!(matches!(
            session.add_playbook(Playbook::new("a.pdf", vec![1])),
            Err(SessionError::LockPoisoned)
        ));
        assert!(session.playbooks.read().is_err());
        assert!(matches!(
            session.playbook_count(),
            Err(SessionError::LockPoisoned)
        ));
    }
}
