use folio_core::config::PageIds;
use folio_core::{Environment, Inventory};
use folio_protocol::{NodeGroup, Rect, Size, Target};
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlAnchorElement, HtmlButtonElement, HtmlElement, HtmlFormElement, Window,
};

pub const REVEAL: &str = ".reveal";
pub const EXPERIENCE_CARD: &str = ".experience-card";
pub const TIMELINE_DOT: &str = ".timeline__dot";
pub const TILT: &str = "[data-tilt]";
pub const FALLBACK_IMAGE: &str = "img[data-fallback-src]";
pub const COPY: &str = "[data-copy]";
pub const IN_PAGE_LINK: &str = "a[href^=\"#\"]";
pub const LOGO: &str = ".logo";
pub const BACKGROUND_LAYER: &str = ".bg-layer";

pub fn js_err(value: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{value:?}")
}

/// Every element the page works with, discovered once at boot.
pub struct Nodes {
    pub theme_toggle: Option<HtmlButtonElement>,
    pub menu_toggle: Option<HtmlButtonElement>,
    pub mobile_nav: Option<HtmlElement>,
    pub logo: Option<HtmlAnchorElement>,
    pub year: Option<Element>,
    pub images: Vec<Element>,
    pub reveal: Vec<Element>,
    pub experience: Vec<Element>,
    pub dots: Vec<Option<Element>>,
    pub tilt: Vec<Element>,
    pub anchors: Vec<Element>,
    pub background: Option<Element>,
    pub typing_text: Option<Element>,
    pub typing_cursor: Option<Element>,
    pub contact_form: Option<HtmlFormElement>,
    pub copy: Vec<Element>,
}

impl Nodes {
    pub fn discover(document: &Document, ids: &PageIds) -> Self {
        let experience = query_all(document, EXPERIENCE_CARD);
        let dots = experience
            .iter()
            .map(|card| card.query_selector(TIMELINE_DOT).ok().flatten())
            .collect();
        Self {
            theme_toggle: by_id(document, &ids.theme_toggle),
            menu_toggle: by_id(document, &ids.menu_toggle),
            mobile_nav: by_id(document, &ids.mobile_nav),
            logo: document
                .query_selector(LOGO)
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into().ok()),
            year: document.get_element_by_id(&ids.year),
            images: query_all(document, FALLBACK_IMAGE),
            reveal: query_all(document, REVEAL),
            experience,
            dots,
            tilt: query_all(document, TILT),
            anchors: query_all(document, IN_PAGE_LINK),
            background: document.query_selector(BACKGROUND_LAYER).ok().flatten(),
            typing_text: document.get_element_by_id(&ids.typing_text),
            typing_cursor: document.get_element_by_id(&ids.typing_cursor),
            contact_form: by_id(document, &ids.contact_form),
            copy: query_all(document, COPY),
        }
    }

    pub fn group(&self, group: NodeGroup, index: usize) -> Option<Element> {
        match group {
            NodeGroup::Reveal => self.reveal.get(index).cloned(),
            NodeGroup::ExperienceCard => self.experience.get(index).cloned(),
            NodeGroup::TimelineDot => self.dots.get(index).cloned().flatten(),
            NodeGroup::Tilt => self.tilt.get(index).cloned(),
            NodeGroup::Image => self.images.get(index).cloned(),
            NodeGroup::CopyButton => self.copy.get(index).cloned(),
            NodeGroup::BackgroundLayer => self.background.clone().filter(|_| index == 0),
        }
    }

    /// Position of `element` inside an observed group.
    pub fn index_of(&self, group: NodeGroup, element: &Element) -> Option<usize> {
        let list = match group {
            NodeGroup::Reveal => &self.reveal,
            NodeGroup::ExperienceCard => &self.experience,
            _ => return None,
        };
        list.iter().position(|candidate| candidate == element)
    }

    pub fn inventory(&self) -> Inventory {
        Inventory {
            theme_toggle: self.theme_toggle.is_some(),
            menu_toggle: self.menu_toggle.is_some(),
            mobile_nav: self.mobile_nav.is_some(),
            logo: self.logo.is_some(),
            year: self.year.is_some(),
            images: self
                .images
                .iter()
                .map(|img| img.get_attribute("data-fallback-src"))
                .collect(),
            reveal: rects(&self.reveal),
            experience: rects(&self.experience),
            experience_dots: self.dots.iter().map(Option::is_some).collect(),
            tilt: self.tilt.len(),
            background_layer: self.background.is_some(),
            typing_text: self.typing_text.is_some(),
            typing_cursor: self.typing_cursor.is_some(),
            contact_form: self.contact_form.is_some(),
            copy: self
                .copy
                .iter()
                .map(|btn| btn.get_attribute("data-copy"))
                .collect(),
        }
    }
}

pub fn resolve(document: &Document, nodes: &Nodes, target: &Target) -> Option<Element> {
    match target {
        Target::Root => document.document_element(),
        Target::Id(id) => document.get_element_by_id(id),
        Target::Node { group, index } => nodes.group(*group, *index),
    }
}

pub fn environment(window: &Window) -> Environment {
    Environment {
        reduced_motion: media_matches(window, "(prefers-reduced-motion: reduce)"),
        pointer_fine: media_matches(window, "(pointer: fine)"),
        prefers_dark: media_matches(window, "(prefers-color-scheme: dark)"),
        observer_available: Reflect::has(window, &JsValue::from_str("IntersectionObserver"))
            .unwrap_or(false),
        viewport: viewport(window),
        year: i32::try_from(js_sys::Date::new_0().get_full_year()).unwrap_or_default(),
    }
}

pub fn media_matches(window: &Window, query: &str) -> bool {
    window
        .match_media(query)
        .ok()
        .flatten()
        .is_some_and(|mq| mq.matches())
}

pub fn viewport(window: &Window) -> Size {
    let dim = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Size::new(dim(window.inner_width()), dim(window.inner_height()))
}

pub fn rect(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.x(), r.y(), r.width(), r.height())
}

pub fn rects(elements: &[Element]) -> Vec<Rect> {
    elements.iter().map(rect).collect()
}

fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        log::warn!("bad selector {selector}");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}
