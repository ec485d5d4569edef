use folio_protocol::{Effect, NodeGroup, Rect, Target};
use thiserror::Error;

use crate::config::RevealGroupConfig;

#[derive(Debug, Error, PartialEq)]
pub enum RevealError {
    #[error("expected {expected} bounding boxes, got {got}")]
    GeometryMismatch { expected: usize, got: usize },
    #[error("viewport height {0} is not usable")]
    BadViewport(f64),
}

/// What the browser can do for a reveal group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealSignals {
    pub observer_available: bool,
    pub reduced_motion: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealMode {
    /// `setup` has not run yet.
    Pending,
    /// Elements are watched by an intersection observer.
    Observing,
    /// Everything was revealed up front.
    Static,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealSetup {
    pub effects: Vec<Effect>,
    /// Attach an intersection observer to every element of the group.
    pub observe: bool,
    /// Re-run the fold check on window resize.
    pub track_resize: bool,
}

/// One-way reveal of a group of elements as they scroll into view.
///
/// An element is revealed at most once and never hidden again.
#[derive(Debug, Clone)]
pub struct RevealEngine {
    group: NodeGroup,
    config: RevealGroupConfig,
    revealed: Vec<bool>,
    observed: Vec<bool>,
    has_dot: Vec<bool>,
    mode: RevealMode,
}

impl RevealEngine {
    /// `has_dot[i]` tells whether element `i` carries a timeline dot; a
    /// shorter (or empty) list means the remaining elements have none.
    pub fn new(group: NodeGroup, config: RevealGroupConfig, count: usize, has_dot: Vec<bool>) -> Self {
        Self {
            group,
            config,
            revealed: vec![false; count],
            observed: vec![false; count],
            has_dot,
            mode: RevealMode::Pending,
        }
    }

    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }

    pub fn mode(&self) -> RevealMode {
        self.mode
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn setup(
        &mut self,
        signals: RevealSignals,
        rects: &[Rect],
        viewport_height: f64,
    ) -> Result<RevealSetup, RevealError> {
        if rects.len() != self.len() {
            return Err(RevealError::GeometryMismatch {
                expected: self.len(),
                got: rects.len(),
            });
        }
        if !(viewport_height.is_finite() && viewport_height >= 0.0) {
            return Err(RevealError::BadViewport(viewport_height));
        }

        let mut effects = self.mark_above_fold(rects, viewport_height);
        if let Some(marker) = &self.config.root_marker {
            effects.push(Effect::AddClass {
                target: Target::Root,
                class: marker.clone(),
            });
        }

        if signals.reduced_motion || !signals.observer_available {
            log::debug!(
                "{:?}: revealing {} elements up front (reduced motion: {}, observer: {})",
                self.group,
                self.len(),
                signals.reduced_motion,
                signals.observer_available
            );
            effects.extend(self.reveal_all());
            self.mode = RevealMode::Static;
            return Ok(RevealSetup {
                effects,
                observe: false,
                track_resize: false,
            });
        }

        self.mode = RevealMode::Observing;
        self.observed.iter_mut().for_each(|o| *o = true);
        Ok(RevealSetup {
            effects,
            observe: !self.is_empty(),
            track_resize: self.config.track_resize && !self.is_empty(),
        })
    }

    /// Reveal every element that is at least partly inside the stretched
    /// fold. Safe to call repeatedly.
    pub fn mark_above_fold(&mut self, rects: &[Rect], viewport_height: f64) -> Vec<Effect> {
        let fold = viewport_height * self.config.fold_factor;
        let mut effects = Vec::new();
        for (i, rect) in rects.iter().enumerate().take(self.len()) {
            if rect.bottom() >= 0.0 && rect.top() <= fold {
                effects.extend(self.reveal(i));
            }
        }
        effects
    }

    pub fn on_resize(&mut self, rects: &[Rect], viewport_height: f64) -> Vec<Effect> {
        if self.mode != RevealMode::Observing || !self.config.track_resize {
            return Vec::new();
        }
        self.mark_above_fold(rects, viewport_height)
    }

    /// An intersection observer entry for element `index`.
    pub fn on_intersection(&mut self, index: usize, intersecting: bool) -> Vec<Effect> {
        if !intersecting || index >= self.len() {
            return Vec::new();
        }
        let mut effects = self.reveal(index);
        if std::mem::replace(&mut self.observed[index], false) {
            effects.push(Effect::Unobserve {
                target: Target::node(self.group, index),
            });
        }
        effects
    }

    pub fn reveal_all(&mut self) -> Vec<Effect> {
        (0..self.len()).flat_map(|i| self.reveal(i)).collect()
    }

    /// Setup went wrong: never leave content hidden.
    pub fn fail_open(&mut self) -> Vec<Effect> {
        self.mode = RevealMode::Static;
        self.observed.iter_mut().for_each(|o| *o = false);
        let mut effects = Vec::new();
        if let Some(marker) = &self.config.root_marker {
            effects.push(Effect::RemoveClass {
                target: Target::Root,
                class: marker.clone(),
            });
        }
        effects.extend(self.reveal_all());
        effects
    }

    fn reveal(&mut self, index: usize) -> Vec<Effect> {
        if std::mem::replace(&mut self.revealed[index], true) {
            return Vec::new();
        }
        let target = Target::node(self.group, index);
        let mut effects: Vec<Effect> = self
            .config
            .classes
            .iter()
            .map(|class| Effect::AddClass {
                target: target.clone(),
                class: class.clone(),
            })
            .collect();
        if let Some(dot_class) = &self.config.dot_class
            && self.has_dot.get(index).copied().unwrap_or(false)
        {
            effects.push(Effect::AddClass {
                target: Target::node(NodeGroup::TimelineDot, index),
                class: dot_class.clone(),
            });
        }
        effects
    }
}
