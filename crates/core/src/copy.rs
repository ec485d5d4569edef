use folio_protocol::{Effect, NodeGroup, Target, TimerKind};

use crate::config::CopyConfig;

#[derive(Debug, Clone, Default)]
struct CopyButton {
    text: Option<String>,
    /// Label to put back once feedback expires.
    original: Option<String>,
    /// Clicks whose restore timer has not fired yet.
    pending: u32,
}

/// `[data-copy]` buttons: copy their payload and flash a short status label.
#[derive(Debug, Clone)]
pub struct CopyButtons {
    config: CopyConfig,
    buttons: Vec<CopyButton>,
}

impl CopyButtons {
    /// One entry per button, holding its `data-copy` value.
    pub fn new(config: CopyConfig, payloads: Vec<Option<String>>) -> Self {
        let buttons = payloads
            .into_iter()
            .map(|text| CopyButton {
                text: text.filter(|t| !t.is_empty()),
                ..CopyButton::default()
            })
            .collect();
        Self { config, buttons }
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn on_click(&mut self, index: usize, label: Option<&str>) -> Vec<Effect> {
        let fallback = &self.config.fallback_label;
        let Some(button) = self.buttons.get_mut(index) else {
            return Vec::new();
        };
        let Some(text) = button.text.clone() else {
            return Vec::new();
        };
        // while feedback is showing, the label on screen is not the real one
        if button.pending == 0 || button.original.is_none() {
            button.original = Some(
                label
                    .filter(|l| !l.is_empty())
                    .unwrap_or(fallback.as_str())
                    .to_owned(),
            );
        }
        button.pending += 1;
        vec![Effect::WriteClipboard {
            button: index,
            text,
        }]
    }

    /// The clipboard write finished, successfully or not.
    pub fn on_settled(&mut self, index: usize, ok: bool) -> Vec<Effect> {
        if index >= self.buttons.len() {
            return Vec::new();
        }
        let label = if ok {
            &self.config.success_label
        } else {
            log::warn!("copy button {index}: clipboard write rejected");
            &self.config.failure_label
        };
        vec![
            Effect::SetText {
                target: Target::node(NodeGroup::CopyButton, index),
                text: label.clone(),
            },
            Effect::Schedule {
                delay_ms: self.config.restore_ms,
                timer: TimerKind::CopyRestore { button: index },
            },
        ]
    }

    pub fn on_restore(&mut self, index: usize) -> Vec<Effect> {
        let Some(button) = self.buttons.get_mut(index) else {
            return Vec::new();
        };
        let Some(original) = button.original.clone() else {
            return Vec::new();
        };
        button.pending = button.pending.saturating_sub(1);
        if button.pending == 0 {
            button.original = None;
        }
        vec![Effect::SetText {
            target: Target::node(NodeGroup::CopyButton, index),
            text: original,
        }]
    }
}
