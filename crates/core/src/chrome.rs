//! Small page chores: logo reload, footer year, broken image fallback and
//! the hero parallax.

use folio_protocol::{Effect, NodeGroup, Point, ScrollBehavior, Size, Target};

use crate::config::ParallaxConfig;
use crate::tilt::to_fixed;

/// Clicking the logo jumps to the top and reloads the page.
pub fn logo_click() -> Vec<Effect> {
    vec![
        Effect::ScrollToTop {
            behavior: ScrollBehavior::Instant,
        },
        Effect::Reload,
    ]
}

pub fn year_stamp(target: Target, year: i32) -> Effect {
    Effect::SetText {
        target,
        text: year.to_string(),
    }
}

/// Swaps a broken image for its `data-fallback-src`, at most once per image.
#[derive(Debug, Clone)]
pub struct ImageFallbacks {
    sources: Vec<Option<String>>,
    applied: Vec<bool>,
}

impl ImageFallbacks {
    /// One entry per `img[data-fallback-src]`; empty sources are ignored.
    pub fn new(sources: Vec<Option<String>>) -> Self {
        let sources: Vec<Option<String>> = sources
            .into_iter()
            .map(|src| src.filter(|s| !s.is_empty()))
            .collect();
        let applied = vec![false; sources.len()];
        Self { sources, applied }
    }

    /// Whether image `index` gets an error listener at all.
    pub fn watches(&self, index: usize) -> bool {
        matches!(self.sources.get(index), Some(Some(_)))
    }

    /// `already_applied` mirrors the image's `data-fallback-applied` attribute,
    /// which markup may set ahead of time.
    pub fn on_error(&mut self, index: usize, already_applied: bool) -> Vec<Effect> {
        let Some(Some(src)) = self.sources.get(index) else {
            return Vec::new();
        };
        if already_applied || std::mem::replace(&mut self.applied[index], true) {
            return Vec::new();
        }
        let target = Target::node(NodeGroup::Image, index);
        log::debug!("image {index}: falling back to {src}");
        vec![
            Effect::SetAttribute {
                target: target.clone(),
                name: "data-fallback-applied".into(),
                value: "true".into(),
            },
            Effect::SetSource {
                target,
                src: src.clone(),
            },
        ]
    }
}

/// Background layer drift following the pointer across the window.
#[derive(Debug, Clone)]
pub struct Parallax {
    config: ParallaxConfig,
}

impl Parallax {
    pub fn new(config: ParallaxConfig) -> Self {
        Self { config }
    }

    pub fn on_move(&self, pointer: Point, viewport: Size) -> Vec<Effect> {
        if !(viewport.width > 0.0 && viewport.height > 0.0) {
            return Vec::new();
        }
        let strength = self.config.strength_px;
        let x = (pointer.x / viewport.width - 0.5) * strength;
        let y = (pointer.y / viewport.height - 0.5) * strength;
        let target = Target::node(NodeGroup::BackgroundLayer, 0);
        vec![
            Effect::SetStyle {
                target: target.clone(),
                property: "--px".into(),
                value: format!("{}px", to_fixed(x)),
            },
            Effect::SetStyle {
                target,
                property: "--py".into(),
                value: format!("{}px", to_fixed(y)),
            },
        ]
    }
}
