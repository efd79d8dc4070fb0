//! Floating blessing text
//!
//! The simulation decides when a blessing appears and when it is dismissed;
//! an [`Overlay`] only knows how to show and remove text.

/// Handle for one shown blessing
pub type OverlayId = u32;

/// Phrases floated during the ambient phase
pub const BLESSINGS: [&str; 16] = [
    "万事如意", "心想事成", "身体健康", "笑口常开",
    "步步高升", "财源广进", "大吉大利", "年年有余",
    "岁岁平安", "合家欢乐", "龙马精神", "前程似锦",
    "新春快乐", "心平气和", "好运连连", "梦想成真",
];

/// Sink for blessing overlays
pub trait Overlay {
    /// Show `text` at `left_percent` of the viewport width
    fn show(&mut self, id: OverlayId, text: &str, left_percent: f32);

    /// Remove a blessing. Unknown or already removed ids are ignored.
    fn dismiss(&mut self, id: OverlayId);
}

/// Overlay that only logs and remembers what is on screen (headless runs)
#[derive(Debug, Default)]
pub struct LogOverlay {
    live: Vec<(OverlayId, String)>,
}

impl LogOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blessings currently shown, oldest first
    pub fn live(&self) -> impl Iterator<Item = (OverlayId, &str)> {
        self.live.iter().map(|(id, text)| (*id, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl Overlay for LogOverlay {
    fn show(&mut self, id: OverlayId, text: &str, left_percent: f32) {
        log::debug!("Blessing #{} at {:.0}%: {}", id, left_percent, text);
        self.live.push((id, text.to_string()));
    }

    fn dismiss(&mut self, id: OverlayId) {
        self.live.retain(|(live_id, _)| *live_id != id);
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomOverlay;

#[cfg(target_arch = "wasm32")]
mod dom {
    use std::collections::HashMap;

    use wasm_bindgen::JsCast;
    use web_sys::{Element, HtmlElement};

    use super::{Overlay, OverlayId};

    /// Appends `div.blessing` elements to a container; CSS animates them
    pub struct DomOverlay {
        container: Element,
        shown: HashMap<OverlayId, Element>,
    }

    impl DomOverlay {
        pub fn new(container: Element) -> Self {
            Self {
                container,
                shown: HashMap::new(),
            }
        }

        fn create(&self, text: &str, left_percent: f32) -> Option<Element> {
            let document = self.container.owner_document()?;
            let el = document.create_element("div").ok()?;
            el.set_class_name("blessing");
            el.set_text_content(Some(text));
            if let Some(html) = el.dyn_ref::<HtmlElement>() {
                let _ = html
                    .style()
                    .set_property("left", &format!("{}%", left_percent));
            }
            self.container.append_child(&el).ok()?;
            Some(el)
        }
    }

    impl Overlay for DomOverlay {
        fn show(&mut self, id: OverlayId, text: &str, left_percent: f32) {
            match self.create(text, left_percent) {
                Some(el) => {
                    self.shown.insert(id, el);
                }
                None => log::warn!("Could not attach blessing #{}", id),
            }
        }

        fn dismiss(&mut self, id: OverlayId) {
            if let Some(el) = self.shown.remove(&id) {
                if el.parent_node().is_some() {
                    el.remove();
                }
            }
        }
    }
}
