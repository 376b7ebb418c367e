use std::sync::{Arc, RwLock, Weak, mpsc};

use crate::{
    painting::history::{Painting, SharedPainting, read_painting},
    scoring::policy::{RoundOutcome, ScoringSettings, determine_result},
    similarity::scorer::SimilarityScorer,
};

/// Handle to a round being scored on the rayon pool.
#[derive(Debug)]
pub struct PendingResult {
    rx: mpsc::Receiver<RoundOutcome>,
    done: Option<RoundOutcome>,
}

impl PendingResult {
    /// Non-blocking poll; returns the outcome once the job has finished.
    pub fn try_take(&mut self) -> Option<RoundOutcome> {
        if self.done.is_none() {
            match self.rx.try_recv() {
                Ok(outcome) => self.done = Some(outcome),
                Err(mpsc::TryRecvError::Empty) => return None,
                Err(mpsc::TryRecvError::Disconnected) => self.done = Some(RoundOutcome::neutral()),
            }
        }
        self.done
    }

    /// Block until the job has finished.
    pub fn wait(mut self) -> RoundOutcome {
        if let Some(outcome) = self.done.take() {
            return outcome;
        }
        self.rx.recv().unwrap_or_else(|_| RoundOutcome::neutral())
    }
}

/// Score a round without blocking the caller.
///
/// The job holds weak references only. If either painting is dropped before the job reads it
/// the outcome is [`RoundOutcome::neutral`].
pub fn spawn_determine_result(
    reference: &SharedPainting,
    forgery: &SharedPainting,
    settings: ScoringSettings,
    scorer: SimilarityScorer,
) -> PendingResult {
    let reference = Arc::downgrade(reference);
    let forgery = Arc::downgrade(forgery);
    let (tx, rx) = mpsc::sync_channel(1);

    rayon::spawn(move || {
        let mut scorer = scorer;
        let outcome = score_weak(&reference, &forgery, &settings, &mut scorer);
        // The receiver may have been dropped; nobody is waiting then.
        let _ = tx.send(outcome);
    });

    PendingResult { rx, done: None }
}

fn score_weak(
    reference: &Weak<RwLock<Painting>>,
    forgery: &Weak<RwLock<Painting>>,
    settings: &ScoringSettings,
    scorer: &mut SimilarityScorer,
) -> RoundOutcome {
    let (Some(reference), Some(forgery)) = (reference.upgrade(), forgery.upgrade()) else {
        tracing::debug!("painting dropped before scoring, returning neutral outcome");
        return RoundOutcome::neutral();
    };
    if Arc::ptr_eq(&reference, &forgery) {
        let painting = read_painting(&reference);
        return determine_result(&painting, &painting, settings, scorer);
    }
    let reference = read_painting(&reference);
    let forgery = read_painting(&forgery);
    determine_result(&reference, &forgery, settings, scorer)
}

#[cfg(test)]
#[path = "../../tests/unit/scoring/pending.rs"]
mod tests;
