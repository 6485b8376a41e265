use common::test_utils::{RecordingBar, assert_close};
use instant::Duration;
use portal_scene::{
    config::SceneConfig,
    loading_bar::apply_events,
    resources::progress::{LoadingManager, Progress},
    scene::SceneState,
    stats::FrameStats,
    transition::{Ease, FadeStep, FadeTimings, LoadPhase, LoadingSequence, Tween},
};

mod common;

const FRAME: Duration = Duration::from_millis(16);

fn run_frames(state: &mut SceneState, bar: &mut RecordingBar, frames: usize) {
    for _ in 0..frames {
        let events = state.advance(FRAME);
        apply_events(bar, &events);
    }
}

#[test]
fn should_report_monotone_progress_ending_at_one() {
    let mut manager = LoadingManager::new(2);
    assert_eq!(manager.progress().ratio(), 0.0);

    let first = manager.item_loaded();
    let second = manager.item_loaded();
    assert_eq!(first.ratio(), 0.5);
    assert_eq!(second.ratio(), 1.0);
    assert!(second.is_complete());

    // over-reporting stays at 1
    let extra = manager.item_loaded();
    assert_eq!(extra, Progress { loaded: 2, total: 2 });
    assert_eq!(extra.ratio(), 1.0);
}

#[test]
fn should_treat_nothing_to_load_as_complete() {
    let progress = LoadingManager::new(0).progress();
    assert_eq!(progress.ratio(), 1.0);
    assert!(progress.is_complete());
}

#[test]
fn should_ease_between_endpoints() {
    for ease in [Ease::Linear, Ease::Power2InOut] {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
        assert_close(ease.apply(0.5), 0.5, 1e-6);
    }
    assert!(Ease::Power2InOut.apply(0.25) < 0.25);
    assert!(Ease::Power2InOut.apply(0.75) > 0.75);
}

#[test]
fn should_hold_tween_start_value_during_delay() {
    let tween = Tween::new(1.0, 0.0, Duration::from_millis(300), Ease::Linear)
        .delayed(Duration::from_millis(300));
    assert_eq!(tween.total(), Duration::from_millis(600));
    assert_eq!(tween.sample(Duration::from_millis(200)), 1.0);
    assert_close(tween.sample(Duration::from_millis(450)), 0.5, 1e-4);
    assert_eq!(tween.sample(Duration::from_secs(1)), 0.0);
    assert!(!tween.is_done(Duration::from_millis(599)));
    assert!(tween.is_done(Duration::from_millis(600)));
}

#[test]
fn should_move_bar_toward_partial_progress_without_transition() {
    let mut sequence = LoadingSequence::new(FadeTimings::default());
    sequence.on_progress(0.5);
    sequence.advance(Duration::from_secs(1));

    assert_eq!(sequence.phase(), LoadPhase::Loading);
    assert_close(sequence.bar_scale(), 0.5, 1e-6);
}

#[test]
fn should_walk_through_every_fade_step_in_order() {
    let mut sequence = LoadingSequence::new(FadeTimings::default());
    sequence.on_progress(1.0);
    assert_eq!(sequence.phase(), LoadPhase::Transitioning(FadeStep::FillBar));

    let mut seen = vec![sequence.phase()];
    for _ in 0..400 {
        sequence.advance(FRAME);
        if seen.last() != Some(&sequence.phase()) {
            seen.push(sequence.phase());
        }
    }
    assert_eq!(
        seen,
        vec![
            LoadPhase::Transitioning(FadeStep::FillBar),
            LoadPhase::Transitioning(FadeStep::FadeBar),
            LoadPhase::Transitioning(FadeStep::FadeOverlay),
            LoadPhase::SteadyRender,
        ]
    );
}

#[test]
fn should_not_fade_before_the_bar_is_full() {
    let mut sequence = LoadingSequence::new(FadeTimings::default());
    sequence.on_progress(1.0);
    sequence.advance(Duration::from_millis(250));
    assert_eq!(sequence.phase(), LoadPhase::Transitioning(FadeStep::FillBar));
    assert!(sequence.bar_scale() < 1.0);
}

#[test]
fn should_remove_overlay_exactly_once() {
    let mut state = SceneState::new(&SceneConfig::default()).unwrap();
    let mut bar = RecordingBar::default();
    assert_eq!(state.overlay_alpha(), Some(1.0));

    state.on_progress(Progress { loaded: 1, total: 2 });
    run_frames(&mut state, &mut bar, 10);
    assert_eq!(state.phase(), LoadPhase::Loading);
    assert_eq!(state.overlay_alpha(), Some(1.0));

    state.on_progress(Progress { loaded: 2, total: 2 });
    run_frames(&mut state, &mut bar, 60);
    // completion reported a second time while fading
    state.on_progress(Progress { loaded: 2, total: 2 });
    run_frames(&mut state, &mut bar, 300);

    assert_eq!(state.phase(), LoadPhase::SteadyRender);
    assert_eq!(state.overlay_alpha(), None);
    assert_eq!(state.overlay_removals(), 1);

    state.on_progress(Progress { loaded: 2, total: 2 });
    run_frames(&mut state, &mut bar, 100);
    assert_eq!(state.phase(), LoadPhase::SteadyRender);
    assert_eq!(state.overlay_removals(), 1);
}

#[test]
fn should_fade_overlay_monotonically() {
    let mut state = SceneState::new(&SceneConfig::default()).unwrap();
    state.on_progress(Progress { loaded: 2, total: 2 });

    let mut alphas = Vec::new();
    for _ in 0..300 {
        state.advance(FRAME);
        if let Some(alpha) = state.overlay_alpha() {
            alphas.push(alpha);
        }
    }
    assert!(alphas.windows(2).all(|pair| pair[1] <= pair[0]));
    assert!(alphas.iter().all(|alpha| (0.0..=1.0).contains(alpha)));
    assert_eq!(state.overlay_alpha(), None);
}

#[test]
fn should_fill_fade_and_hide_the_bar() {
    let mut state = SceneState::new(&SceneConfig::default()).unwrap();
    let mut bar = RecordingBar::default();

    state.on_progress(Progress { loaded: 1, total: 2 });
    run_frames(&mut state, &mut bar, 5);
    state.on_progress(Progress { loaded: 2, total: 2 });
    run_frames(&mut state, &mut bar, 300);

    assert!(bar.scales.windows(2).all(|pair| pair[1] >= pair[0]));
    assert_close(*bar.scales.last().unwrap(), 1.0, 1e-6);
    assert_close(*bar.opacities.last().unwrap(), 0.0, 1e-6);
    assert_eq!(bar.hide_calls, 1);
}

#[test]
fn should_report_fps_once_per_second() {
    let mut stats = FrameStats::new();
    for _ in 0..49 {
        assert_eq!(stats.tick(Duration::from_millis(20)), None);
    }
    let fps = stats.tick(Duration::from_millis(20)).unwrap();
    assert_close(fps, 50.0, 1e-3);
    assert_eq!(stats.last_fps(), Some(fps));
    assert_eq!(stats.tick(Duration::from_millis(20)), None);
}
