//! The loading bar the fade sequence animates.

use crate::transition::TransitionEvent;

pub trait LoadingBar {
    fn set_scale_x(&mut self, scale: f32);
    fn set_opacity(&mut self, opacity: f32);
    fn hide(&mut self);
}

/// Forward the bar-related events of one frame. Overlay events are handled
/// by the scene.
pub fn apply_events(bar: &mut dyn LoadingBar, events: &[TransitionEvent]) {
    for event in events {
        match *event {
            TransitionEvent::BarScale(scale) => bar.set_scale_x(scale),
            TransitionEvent::BarOpacity(opacity) => bar.set_opacity(opacity),
            TransitionEvent::BarHidden => bar.hide(),
            TransitionEvent::OverlayAlpha(_) | TransitionEvent::OverlayRemoved => (),
        }
    }
}

/// Stand-in used where there is no DOM: reports whole-percent steps in the log.
#[derive(Debug, Default)]
pub struct LogLoadingBar {
    last_percent: Option<u32>,
    hidden: bool,
}

impl LoadingBar for LogLoadingBar {
    fn set_scale_x(&mut self, scale: f32) {
        let percent = (scale.clamp(0.0, 1.0) * 100.0).round() as u32;
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            log::info!("Loading {}%", percent);
        }
    }

    fn set_opacity(&mut self, _opacity: f32) {}

    fn hide(&mut self) {
        if !self.hidden {
            self.hidden = true;
            log::info!("Loading bar hidden");
        }
    }
}

/// The page's loading bar element, driven through its inline style.
#[cfg(target_arch = "wasm32")]
#[derive(Debug)]
pub struct DomLoadingBar {
    element: web_sys::HtmlElement,
}

#[cfg(target_arch = "wasm32")]
impl DomLoadingBar {
    pub fn find(selector: &str) -> Option<Self> {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?.document()?;
        let element = document.query_selector(selector).ok()??;
        let element = element.dyn_into::<web_sys::HtmlElement>().ok()?;
        Some(Self { element })
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(e) = self.element.style().set_property(property, value) {
            log::warn!("Cannot set {} on the loading bar: {:?}", property, e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl LoadingBar for DomLoadingBar {
    fn set_scale_x(&mut self, scale: f32) {
        self.set_style("transform", &format!("scaleX({})", scale));
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.set_style("opacity", &opacity.to_string());
    }

    fn hide(&mut self) {
        self.set_style("display", "none");
    }
}

/// The DOM bar when the page has one, the logging bar otherwise.
pub fn find_loading_bar(selector: &str) -> Box<dyn LoadingBar> {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(bar) = DomLoadingBar::find(selector) {
            return Box::new(bar);
        }
        log::warn!("No element matches {:?}, logging progress instead", selector);
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = selector;
    Box::new(LogLoadingBar::default())
}
