//! Consultation panel behavior tests.
//!
//! These drive the panel with scripted providers: an instant diagnosis
//! backend, a deterministic picker, and a counting speech engine. UI-level
//! tests use egui_kittest and AccessKit labels, in addition to direct
//! state-machine assertions.

use carevoice::audio::AudioRecorder;
use carevoice::providers::{
    CannedDiagnosis, ImagePicker, PickOutcome, PickerOptions, SpeechEngine, SpeechParams,
    SpeechPipeline, RECOMMENDATION,
};
use carevoice::state::ConsultPhase;
use carevoice::ui::{ConsultationPanel, Theme};
use carevoice::{CareVoiceError, Result};
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Recorder that never touches a device; optionally refuses to start.
struct ScriptedRecorder {
    fail_start: bool,
}

impl AudioRecorder for ScriptedRecorder {
    fn start(&mut self) -> Result<()> {
        if self.fail_start {
            Err(CareVoiceError::AudioDevice("no input device".into()))
        } else {
            Ok(())
        }
    }

    fn poll(&mut self) {}

    fn finish(&mut self) -> Result<PathBuf> {
        Ok(PathBuf::from("/tmp/consult.wav"))
    }
}

/// Picker that always answers with the same outcome.
struct ScriptedPicker {
    outcome: PickOutcome,
}

impl ImagePicker for ScriptedPicker {
    fn pick(&self, _options: &PickerOptions) -> Result<PickOutcome> {
        Ok(self.outcome.clone())
    }
}

/// Speech engine that records how often it was invoked.
struct CountingSpeech {
    spoken: Arc<AtomicUsize>,
    hold: Duration,
}

impl SpeechEngine for CountingSpeech {
    fn speak(&mut self, _text: &str, _params: &SpeechParams) -> Result<()> {
        self.spoken.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.hold);
        Ok(())
    }
}

struct TestRig {
    panel: ConsultationPanel,
    spoken: Arc<AtomicUsize>,
}

fn build_rig(
    recorder: Box<dyn AudioRecorder>,
    picker_outcome: PickOutcome,
    speech_hold: Duration,
) -> TestRig {
    let spoken = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&spoken);
    let speech = SpeechPipeline::spawn(
        move || {
            Ok(Box::new(CountingSpeech {
                spoken: counter,
                hold: speech_hold,
            }) as Box<dyn SpeechEngine>)
        },
        SpeechParams::default(),
    );
    let panel = ConsultationPanel::new(
        recorder,
        Box::new(ScriptedPicker {
            outcome: picker_outcome,
        }),
        Box::new(CannedDiagnosis::with_latency(Duration::ZERO)),
        speech,
    );
    TestRig { panel, spoken }
}

fn rig_with(picker_outcome: PickOutcome, speech_hold: Duration) -> TestRig {
    build_rig(
        Box::new(ScriptedRecorder { fail_start: false }),
        picker_outcome,
        speech_hold,
    )
}

fn rig() -> TestRig {
    rig_with(PickOutcome::Canceled, Duration::ZERO)
}

/// Poll the panel until the predicate holds or a generous deadline passes.
fn poll_until(panel: &mut ConsultationPanel, pred: impl Fn(&ConsultationPanel) -> bool) -> bool {
    for _ in 0..400 {
        panel.poll_events();
        if pred(panel) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

// === State-machine behavior ===

#[test]
fn test_start_recording_transitions_once() {
    let mut rig = rig();
    assert_eq!(rig.panel.state().phase(), ConsultPhase::Idle);

    rig.panel.start_recording();
    assert_eq!(rig.panel.state().phase(), ConsultPhase::Recording);

    // a stray second start must not restart the capture
    rig.panel.start_recording();
    assert_eq!(rig.panel.state().phase(), ConsultPhase::Recording);
}

#[test]
fn test_stop_without_recording_is_noop() {
    let mut rig = rig();
    rig.panel.stop_recording();
    assert_eq!(rig.panel.state().phase(), ConsultPhase::Idle);
    assert!(rig.panel.state().audio_path.is_none());
}

#[test]
fn test_stop_enters_processing_then_diagnosis_arrives() {
    let mut rig = rig();
    rig.panel.start_recording();
    rig.panel.stop_recording();
    assert_eq!(rig.panel.state().phase(), ConsultPhase::Processing);
    assert_eq!(
        rig.panel.state().audio_path,
        Some(PathBuf::from("/tmp/consult.wav"))
    );

    assert!(poll_until(&mut rig.panel, |p| p.state().phase().has_diagnosis()));
    assert_eq!(rig.panel.state().diagnosis, RECOMMENDATION);
    assert!(!rig.panel.state().phase().is_processing());
}

#[test]
fn test_capture_start_failure_keeps_idle() {
    let mut rig = build_rig(
        Box::new(ScriptedRecorder { fail_start: true }),
        PickOutcome::Canceled,
        Duration::ZERO,
    );

    rig.panel.start_recording();
    assert_eq!(rig.panel.state().phase(), ConsultPhase::Idle);

    // nothing was submitted, so nothing can ever come back
    rig.panel.stop_recording();
    for _ in 0..20 {
        rig.panel.poll_events();
        std::thread::sleep(Duration::from_millis(2));
    }
    assert_eq!(rig.panel.state().phase(), ConsultPhase::Idle);
    assert!(rig.panel.state().audio_path.is_none());
    assert!(rig.panel.state().diagnosis.is_empty());
    assert_eq!(rig.spoken.load(Ordering::SeqCst), 0);
}

#[test]
fn test_diagnosis_triggers_speech_automatically() {
    let mut rig = rig();
    rig.panel.start_recording();
    rig.panel.stop_recording();

    assert!(poll_until(&mut rig.panel, |p| {
        p.state().phase() == ConsultPhase::HasDiagnosis
    }));
    // playback started (and finished) without a manual speak click
    assert_eq!(rig.spoken.load(Ordering::SeqCst), 1);
}

#[test]
fn test_start_blocked_while_processing() {
    let mut rig = rig();
    rig.panel.start_recording();
    rig.panel.stop_recording();
    assert_eq!(rig.panel.state().phase(), ConsultPhase::Processing);

    rig.panel.start_recording();
    assert_eq!(rig.panel.state().phase(), ConsultPhase::Processing);
}

#[test]
fn test_picker_cancel_keeps_prior_state() {
    let mut rig = rig_with(PickOutcome::Canceled, Duration::ZERO);
    assert!(rig.panel.state().image_path.is_none());

    rig.panel.pick_image();
    assert!(rig.panel.state().image_path.is_none());
}

#[test]
fn test_picker_selection_stores_location() {
    let chosen = PathBuf::from("/tmp/rash.jpg");
    let mut rig = rig_with(PickOutcome::Selected(chosen.clone()), Duration::ZERO);

    rig.panel.pick_image();
    assert_eq!(rig.panel.state().image_path, Some(chosen));
}

#[test]
fn test_recommendation_invariant_across_attachments() {
    // with a photo attached
    let mut with_photo = rig_with(
        PickOutcome::Selected(PathBuf::from("/tmp/rash.jpg")),
        Duration::ZERO,
    );
    with_photo.panel.pick_image();
    with_photo.panel.start_recording();
    with_photo.panel.stop_recording();
    assert!(poll_until(&mut with_photo.panel, |p| {
        p.state().phase().has_diagnosis()
    }));

    // with nothing attached
    let mut bare = rig();
    bare.panel.start_recording();
    bare.panel.stop_recording();
    assert!(poll_until(&mut bare.panel, |p| p.state().phase().has_diagnosis()));

    assert_eq!(with_photo.panel.state().diagnosis, bare.panel.state().diagnosis);
    assert_eq!(bare.panel.state().diagnosis, RECOMMENDATION);
}

#[test]
fn test_no_overlapping_speech_sessions() {
    // hold the engine long enough to attempt a second speak mid-playback
    let mut rig = rig_with(PickOutcome::Canceled, Duration::from_millis(150));
    rig.panel.start_recording();
    rig.panel.stop_recording();

    assert!(poll_until(&mut rig.panel, |p| p.state().phase().is_speaking()));
    rig.panel.speak_diagnosis();
    rig.panel.speak_diagnosis();

    assert!(poll_until(&mut rig.panel, |p| {
        p.state().phase() == ConsultPhase::HasDiagnosis
    }));
    assert_eq!(rig.spoken.load(Ordering::SeqCst), 1);
}

#[test]
fn test_manual_replay_after_playback() {
    let mut rig = rig();
    rig.panel.start_recording();
    rig.panel.stop_recording();
    assert!(poll_until(&mut rig.panel, |p| {
        p.state().phase() == ConsultPhase::HasDiagnosis
    }));
    assert_eq!(rig.spoken.load(Ordering::SeqCst), 1);

    rig.panel.speak_diagnosis();
    assert!(poll_until(&mut rig.panel, |p| {
        p.state().phase() == ConsultPhase::HasDiagnosis
    }));
    assert_eq!(rig.spoken.load(Ordering::SeqCst), 2);
}

// === Widget-level behavior via egui_kittest ===

struct Stage {
    panel: ConsultationPanel,
    theme: Theme,
}

fn harness(rig: TestRig) -> Harness<'static, Stage> {
    let stage = Stage {
        panel: rig.panel,
        theme: Theme::dark(),
    };
    Harness::builder()
        .with_size(egui::Vec2::new(420.0, 680.0))
        .build_state(
            |ctx, stage: &mut Stage| {
                stage.panel.poll_events();
                egui::CentralPanel::default().show(ctx, |ui| {
                    stage.panel.show(ui, &stage.theme);
                });
            },
            stage,
        )
}

// Frames are driven with explicit `step()` calls rather than `run()`: the
// record button animates while recording, so the context keeps requesting
// repaints and `run()` would never settle.

/// Click the labeled control, then render two frames: one to deliver the
/// click, one so the tree reflects the resulting phase.
fn click_label(harness: &mut Harness<'static, Stage>, label: &str) {
    harness.get_by_label(label).click();
    harness.step();
    harness.step();
}

fn step_until(
    harness: &mut Harness<'static, Stage>,
    pred: impl Fn(&Stage) -> bool,
) -> bool {
    for _ in 0..400 {
        harness.step();
        if pred(harness.state()) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_record_button_click_starts_and_stops() {
    let mut harness = harness(rig());
    harness.step();

    click_label(&mut harness, "Record");
    assert_eq!(harness.state().panel.state().phase(), ConsultPhase::Recording);

    click_label(&mut harness, "Stop recording");
    assert!(matches!(
        harness.state().panel.state().phase(),
        ConsultPhase::Processing | ConsultPhase::HasDiagnosis | ConsultPhase::Speaking
    ));
}

#[test]
fn test_record_click_without_microphone_stays_idle() {
    let rig = build_rig(
        Box::new(ScriptedRecorder { fail_start: true }),
        PickOutcome::Canceled,
        Duration::ZERO,
    );
    let mut harness = harness(rig);
    harness.step();

    click_label(&mut harness, "Record");
    assert_eq!(harness.state().panel.state().phase(), ConsultPhase::Idle);
    // the control still offers to record rather than claiming to listen
    let _record = harness.get_by_label("Record");
}

#[test]
fn test_attach_button_with_cancel_keeps_state() {
    let mut harness = harness(rig());
    harness.step();

    click_label(&mut harness, "Attach photo");
    assert!(harness.state().panel.state().image_path.is_none());
}

#[test]
fn test_recommendation_rendered_after_session() {
    let mut harness = harness(rig());
    harness.step();

    click_label(&mut harness, "Record");
    click_label(&mut harness, "Stop recording");

    assert!(step_until(&mut harness, |stage| {
        stage.panel.state().phase() == ConsultPhase::HasDiagnosis
    }));
    harness.step();

    // the card and its speak control are on screen
    let _text = harness.get_by_label("Recommendation text");
    let _speak = harness.get_by_label("Speak recommendation");
}

#[test]
fn test_speak_control_inert_while_speaking() {
    let rig = rig_with(PickOutcome::Canceled, Duration::from_millis(200));
    let spoken = Arc::clone(&rig.spoken);
    let mut harness = harness(rig);
    harness.step();

    click_label(&mut harness, "Record");
    click_label(&mut harness, "Stop recording");

    assert!(step_until(&mut harness, |stage| {
        stage.panel.state().phase().is_speaking()
    }));
    harness.step();

    // the control is disabled mid-playback; clicking must not queue another
    click_label(&mut harness, "Speak recommendation");

    assert!(step_until(&mut harness, |stage| {
        stage.panel.state().phase() == ConsultPhase::HasDiagnosis
    }));
    assert_eq!(spoken.load(Ordering::SeqCst), 1);
}
