//! Loading bar and overlay fade-out.
//!
//! Once loading completes the bar fills, then fades, then the overlay fades.
//! The chain is an explicit step sequence advanced by
//! [`LoadingSequence::advance`] once per frame; a step only starts after the
//! previous one's deadline has passed.

use instant::Duration;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    /// Cubic ease-in-out (GSAP's `power2.inOut`).
    Power2InOut,
}

impl Ease {
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// A single value animation with an optional start delay.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub delay: Duration,
    pub duration: Duration,
    pub ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration, ease: Ease) -> Self {
        Self {
            from,
            to,
            delay: Duration::ZERO,
            duration,
            ease,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }

    /// Value at `elapsed` since the tween was started (delay included).
    pub fn sample(&self, elapsed: Duration) -> f32 {
        if elapsed <= self.delay {
            return self.from;
        }
        let t = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed - self.delay).as_secs_f32() / self.duration.as_secs_f32()
        };
        self.from + (self.to - self.from) * self.ease.apply(t)
    }

    pub fn is_done(&self, elapsed: Duration) -> bool {
        elapsed >= self.total()
    }
}

/// Durations of the fade sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct FadeTimings {
    pub bar_fill: Duration,
    pub bar_fade_delay: Duration,
    pub bar_fade: Duration,
    pub overlay_fade_delay: Duration,
    pub overlay_fade: Duration,
}

impl Default for FadeTimings {
    fn default() -> Self {
        Self {
            bar_fill: Duration::from_millis(500),
            bar_fade_delay: Duration::from_millis(300),
            bar_fade: Duration::from_millis(300),
            overlay_fade_delay: Duration::from_millis(300),
            overlay_fade: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeStep {
    /// Waiting for the bar to reach full width.
    FillBar,
    /// Bar opacity going to zero.
    FadeBar,
    /// Overlay alpha going to zero.
    FadeOverlay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Transitioning(FadeStep),
    SteadyRender,
}

/// What the sequence asks the view to change this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionEvent {
    BarScale(f32),
    BarOpacity(f32),
    BarHidden,
    OverlayAlpha(f32),
    OverlayRemoved,
}

#[derive(Debug)]
pub struct LoadingSequence {
    phase: LoadPhase,
    timings: FadeTimings,
    bar_scale: f32,
    bar_tween: Option<(Tween, Duration)>,
    step_elapsed: Duration,
}

impl LoadingSequence {
    pub fn new(timings: FadeTimings) -> Self {
        Self {
            phase: LoadPhase::Loading,
            timings,
            bar_scale: 0.0,
            bar_tween: None,
            step_elapsed: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn bar_scale(&self) -> f32 {
        self.bar_scale
    }

    /// Feed a new progress ratio. Starts a bar tween toward it; the first
    /// ratio of 1 moves the sequence into its transition. Anything after that
    /// is ignored.
    pub fn on_progress(&mut self, ratio: f32) {
        if self.phase != LoadPhase::Loading {
            log::debug!("Ignoring progress {ratio} outside of the loading phase");
            return;
        }
        let ratio = ratio.clamp(0.0, 1.0);
        let tween = Tween::new(
            self.bar_scale,
            ratio,
            self.timings.bar_fill,
            Ease::Power2InOut,
        );
        self.bar_tween = Some((tween, Duration::ZERO));
        if ratio >= 1.0 {
            log::info!("All assets loaded, starting transition");
            self.phase = LoadPhase::Transitioning(FadeStep::FillBar);
            self.step_elapsed = Duration::ZERO;
        }
    }

    /// Advance by one frame's `dt` and report what changed.
    pub fn advance(&mut self, dt: Duration) -> Vec<TransitionEvent> {
        let mut events = Vec::new();
        let bar_done = self.advance_bar(dt, &mut events);

        let mut budget = dt;
        loop {
            match self.phase {
                LoadPhase::Loading | LoadPhase::SteadyRender => break,
                LoadPhase::Transitioning(FadeStep::FillBar) => {
                    if !bar_done {
                        break;
                    }
                    self.enter(FadeStep::FadeBar);
                    // the fill tween consumed this frame's time
                    budget = Duration::ZERO;
                }
                LoadPhase::Transitioning(FadeStep::FadeBar) => {
                    let tween = self.bar_fade();
                    self.step_elapsed += budget;
                    events.push(TransitionEvent::BarOpacity(tween.sample(self.step_elapsed)));
                    if !tween.is_done(self.step_elapsed) {
                        break;
                    }
                    events.push(TransitionEvent::BarHidden);
                    budget = self.step_elapsed - tween.total();
                    self.enter(FadeStep::FadeOverlay);
                }
                LoadPhase::Transitioning(FadeStep::FadeOverlay) => {
                    let tween = self.overlay_fade();
                    self.step_elapsed += budget;
                    events.push(TransitionEvent::OverlayAlpha(tween.sample(self.step_elapsed)));
                    if !tween.is_done(self.step_elapsed) {
                        break;
                    }
                    events.push(TransitionEvent::OverlayRemoved);
                    log::info!("Overlay faded out");
                    self.phase = LoadPhase::SteadyRender;
                }
            }
        }
        events
    }

    fn advance_bar(&mut self, dt: Duration, events: &mut Vec<TransitionEvent>) -> bool {
        match self.bar_tween.as_mut() {
            Some((tween, elapsed)) => {
                *elapsed += dt;
                self.bar_scale = tween.sample(*elapsed);
                events.push(TransitionEvent::BarScale(self.bar_scale));
                if tween.is_done(*elapsed) {
                    self.bar_tween = None;
                    true
                } else {
                    false
                }
            }
            None => true,
        }
    }

    fn enter(&mut self, step: FadeStep) {
        self.phase = LoadPhase::Transitioning(step);
        self.step_elapsed = Duration::ZERO;
    }

    fn bar_fade(&self) -> Tween {
        Tween::new(1.0, 0.0, self.timings.bar_fade, Ease::Power2InOut)
            .delayed(self.timings.bar_fade_delay)
    }

    fn overlay_fade(&self) -> Tween {
        Tween::new(1.0, 0.0, self.timings.overlay_fade, Ease::Linear)
            .delayed(self.timings.overlay_fade_delay)
    }
}
