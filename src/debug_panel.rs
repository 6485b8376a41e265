//! Debug colour panel.
//!
//! Three colour controls tweak the scene at runtime: the clear colour (which
//! also tints the test box) and the two portal colours. The panel model is
//! platform independent; in the browser it is mounted as `<input type=color>`
//! elements, natively tweaks can only be fed in programmatically.

use crate::{config::Palette, data_structures::color::Color};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorKey {
    ClearColor,
    PortalColorStart,
    PortalColorEnd,
}

impl ColorKey {
    pub const ALL: [ColorKey; 3] = [
        ColorKey::ClearColor,
        ColorKey::PortalColorStart,
        ColorKey::PortalColorEnd,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ColorKey::ClearColor => "clearColor",
            ColorKey::PortalColorStart => "portalColorStart",
            ColorKey::PortalColorEnd => "portalColorEnd",
        }
    }

    pub fn from_label(label: &str) -> Option<ColorKey> {
        Self::ALL.into_iter().find(|key| key.label() == label)
    }
}

/// One accepted change from the panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tweak {
    pub key: ColorKey,
    pub color: Color,
}

impl Tweak {
    pub fn parse(key: ColorKey, input: &str) -> anyhow::Result<Tweak> {
        Ok(Tweak {
            key,
            color: Color::from_hex(input)?,
        })
    }
}

/// Current value of every control, as shown to the user.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugPanel {
    values: Vec<(ColorKey, String)>,
}

impl DebugPanel {
    pub fn new(palette: &Palette) -> Self {
        Self {
            values: vec![
                (ColorKey::ClearColor, palette.clear_color.clone()),
                (ColorKey::PortalColorStart, palette.portal_color_start.clone()),
                (ColorKey::PortalColorEnd, palette.portal_color_end.clone()),
            ],
        }
    }

    pub fn value(&self, key: ColorKey) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Validate a raw control value. Malformed input is logged and dropped,
    /// leaving the stored value as it was.
    pub fn update(&mut self, key: ColorKey, input: &str) -> Option<Tweak> {
        match Tweak::parse(key, input) {
            Ok(tweak) => {
                if let Some((_, value)) = self.values.iter_mut().find(|(k, _)| *k == key) {
                    *value = input.trim().to_string();
                }
                Some(tweak)
            }
            Err(e) => {
                log::warn!("Ignoring {} = {:?}: {}", key.label(), input, e);
                None
            }
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (ColorKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Append the panel to the page body. Every accepted change is passed to
/// `on_change`.
#[cfg(target_arch = "wasm32")]
pub fn mount(panel: DebugPanel, on_change: impl Fn(Tweak) + 'static) -> anyhow::Result<()> {
    use std::{cell::RefCell, rc::Rc};

    use anyhow::Context;
    use wasm_bindgen::{JsCast, prelude::Closure};

    let js_err = |e: wasm_bindgen::JsValue| anyhow::anyhow!("{:?}", e);

    let window = web_sys::window().context("No browser window")?;
    let document = window.document().context("No document")?;
    let body = document.body().context("The page has no body")?;

    let container = document.create_element("div").map_err(js_err)?;
    container.set_class_name("debug-panel");
    container
        .set_attribute(
            "style",
            "position:fixed;top:0;right:0;padding:8px;background:rgba(0,0,0,0.6);\
             color:#eee;font:12px sans-serif;z-index:10;",
        )
        .map_err(js_err)?;

    let panel = Rc::new(RefCell::new(panel));
    let on_change: Rc<dyn Fn(Tweak)> = Rc::new(on_change);
    let entries: Vec<(ColorKey, String)> = panel
        .borrow()
        .entries()
        .map(|(key, value)| (key, value.to_string()))
        .collect();

    for (key, value) in entries {
        let row = document.create_element("label").map_err(js_err)?;
        row.set_attribute("style", "display:block;margin:2px 0;")
            .map_err(js_err)?;
        row.set_text_content(Some(key.label()));

        let input: web_sys::HtmlInputElement = document
            .create_element("input")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| anyhow::anyhow!("created element is not an input"))?;
        input.set_type("color");
        input.set_value(&value);

        let panel = panel.clone();
        let on_change = on_change.clone();
        let source = input.clone();
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            let tweak = panel.borrow_mut().update(key, &source.value());
            if let Some(tweak) = tweak {
                on_change(tweak);
            }
        });
        input
            .add_event_listener_with_callback("input", callback.as_ref().unchecked_ref())
            .map_err(js_err)?;
        // the listener lives as long as the page
        callback.forget();

        row.append_child(&input).map_err(js_err)?;
        container.append_child(&row).map_err(js_err)?;
    }
    body.append_child(&container).map_err(js_err)?;
    log::info!("Debug panel mounted");
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn mount(panel: DebugPanel, _on_change: impl Fn(Tweak) + 'static) -> anyhow::Result<()> {
    log::info!(
        "No debug panel outside the browser; starting with {}",
        panel
            .entries()
            .map(|(key, value)| format!("{}={}", key.label(), value))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}
