use folio_protocol::{Effect, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    ToggleClick,
    /// A click landed inside the open panel. `in_page_link` is true when the
    /// click target is, or sits inside, an `a[href^="#"]`.
    PanelClick { in_page_link: bool },
    KeyDown { key: String },
    /// The breakpoint media query changed, in either direction.
    BreakpointCrossed,
}

/// Mobile navigation panel and its toggle button.
#[derive(Debug, Clone)]
pub struct MobileNav {
    state: NavState,
    toggle: Target,
    panel: Target,
    close_key: String,
}

impl MobileNav {
    pub fn new(toggle: Target, panel: Target, close_key: impl Into<String>) -> Self {
        Self {
            state: NavState::Closed,
            toggle,
            panel,
            close_key: close_key.into(),
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn handle(&mut self, event: &NavEvent) -> Vec<Effect> {
        match event {
            NavEvent::ToggleClick => match self.state {
                NavState::Open => self.close(),
                NavState::Closed => self.open(),
            },
            NavEvent::PanelClick { in_page_link: true } => self.close(),
            NavEvent::PanelClick { in_page_link: false } => Vec::new(),
            NavEvent::KeyDown { key } if *key == self.close_key => self.close(),
            NavEvent::KeyDown { .. } => Vec::new(),
            NavEvent::BreakpointCrossed => self.close(),
        }
    }

    pub fn close(&mut self) -> Vec<Effect> {
        self.state = NavState::Closed;
        self.render(true)
    }

    fn open(&mut self) -> Vec<Effect> {
        self.state = NavState::Open;
        self.render(false)
    }

    fn render(&self, hidden: bool) -> Vec<Effect> {
        vec![
            Effect::SetHidden {
                target: self.panel.clone(),
                hidden,
            },
            Effect::SetAttribute {
                target: self.toggle.clone(),
                name: "aria-expanded".into(),
                value: (!hidden).to_string(),
            },
        ]
    }
}
