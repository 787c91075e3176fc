//! Diagnosis provider boundary.
//!
//! The shipped backend is a canned stand-in: it holds each request for a
//! fixed latency window and then yields the same recommendation text every
//! time, regardless of what was recorded or attached. A real inference
//! backend would implement the same trait.

use crossbeam_channel::{bounded, Receiver};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Latency simulated before a recommendation is produced.
pub const ANALYSIS_LATENCY: Duration = Duration::from_millis(1500);

/// The recommendation produced for every consultation.
pub const RECOMMENDATION: &str = "\
Based on your symptoms and the photo provided, you may be experiencing a mild \
viral infection or a seasonal allergic reaction.

Recommendations:
1. Rest and stay hydrated; aim for at least eight glasses of water a day.
2. An over-the-counter antihistamine may help if allergies are suspected.
3. Monitor your temperature; seek care if fever exceeds 38.5 degrees Celsius.
4. Apply a cool compress to the affected area if there is swelling.

Important: this is an automatically generated recommendation. Please consult \
a healthcare professional for an accurate diagnosis and treatment plan.";

/// Everything gathered on the screen for one consultation.
#[derive(Clone, Debug, Default)]
pub struct ConsultRequest {
    /// Captured audio location, if any (never transcribed here)
    pub audio: Option<PathBuf>,
    /// Attached photo location, if any
    pub image: Option<PathBuf>,
}

/// Outcome of a diagnosis request.
#[derive(Clone, Debug)]
pub enum DiagnosisEvent {
    /// Recommendation text is ready
    Ready(String),
    /// The provider failed; the panel degrades to idle
    Failed(String),
}

/// Asynchronous diagnosis backend.
///
/// `request` returns immediately; exactly one event is later delivered on
/// the returned channel.
pub trait DiagnosisProvider: Send {
    fn request(&self, request: ConsultRequest) -> Receiver<DiagnosisEvent>;
}

/// Fixed-latency, fixed-text provider.
pub struct CannedDiagnosis {
    latency: Duration,
}

impl CannedDiagnosis {
    pub fn new() -> Self {
        Self {
            latency: ANALYSIS_LATENCY,
        }
    }

    /// Override the latency window (tests use zero).
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for CannedDiagnosis {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosisProvider for CannedDiagnosis {
    fn request(&self, request: ConsultRequest) -> Receiver<DiagnosisEvent> {
        let (tx, rx) = bounded(1);
        let latency = self.latency;

        thread::spawn(move || {
            debug!(
                audio = ?request.audio,
                image = ?request.image,
                "analysis requested"
            );
            thread::sleep(latency);
            let _ = tx.send(DiagnosisEvent::Ready(RECOMMENDATION.to_string()));
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_latency_is_fixed() {
        let provider = CannedDiagnosis::new();
        assert_eq!(provider.latency, Duration::from_millis(1500));
    }

    #[test]
    fn test_recommendation_is_invariant() {
        let provider = CannedDiagnosis::with_latency(Duration::ZERO);

        let with_both = ConsultRequest {
            audio: Some(PathBuf::from("/tmp/a.wav")),
            image: Some(PathBuf::from("/tmp/b.jpg")),
        };
        let with_neither = ConsultRequest::default();

        for request in [with_both, with_neither] {
            let rx = provider.request(request);
            match rx.recv_timeout(Duration::from_secs(2)) {
                Ok(DiagnosisEvent::Ready(text)) => assert_eq!(text, RECOMMENDATION),
                other => panic!("expected Ready, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_exactly_one_event_per_request() {
        let provider = CannedDiagnosis::with_latency(Duration::ZERO);
        let rx = provider.request(ConsultRequest::default());

        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
        // worker exits after the single event, closing the channel
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }
}
