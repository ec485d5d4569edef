use folio_protocol::{Effect, NodeGroup, Point, Rect, Size, Target, TimerKind};

use crate::anchor;
use crate::chrome::{self, ImageFallbacks, Parallax};
use crate::config::SiteConfig;
use crate::contact::{self, ContactFields};
use crate::copy::CopyButtons;
use crate::error::BootError;
use crate::nav::{MobileNav, NavEvent, NavState};
use crate::reveal::{RevealEngine, RevealSignals};
use crate::settings::{Settings, ThemeStore};
use crate::tilt::Tilt;
use crate::typewriter::{Phase, Typewriter};

/// Media signals and clock values sampled once at boot.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub reduced_motion: bool,
    pub pointer_fine: bool,
    pub prefers_dark: bool,
    /// `IntersectionObserver` exists in this browser.
    pub observer_available: bool,
    pub viewport: Size,
    pub year: i32,
}

/// What the markup actually contains. Absent elements switch their feature off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub theme_toggle: bool,
    pub menu_toggle: bool,
    pub mobile_nav: bool,
    pub logo: bool,
    pub year: bool,
    /// `data-fallback-src` of every `img[data-fallback-src]`.
    pub images: Vec<Option<String>>,
    /// Bounding boxes of `.reveal` elements at boot.
    pub reveal: Vec<Rect>,
    /// Bounding boxes of `.experience-card` elements at boot.
    pub experience: Vec<Rect>,
    /// Whether each experience card has a timeline dot.
    pub experience_dots: Vec<bool>,
    pub tilt: usize,
    pub background_layer: bool,
    pub typing_text: bool,
    pub typing_cursor: bool,
    pub contact_form: bool,
    /// `data-copy` of every `[data-copy]` element.
    pub copy: Vec<Option<String>>,
}

/// Which listeners the bridge should attach after boot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listeners {
    pub theme_toggle: bool,
    pub nav: bool,
    /// Media query for the nav breakpoint, when `nav` is set.
    pub nav_breakpoint: Option<String>,
    pub logo: bool,
    /// Indices of images that get an error listener.
    pub images: Vec<usize>,
    /// Observer threshold for `.reveal`, when observed.
    pub observe_reveal: Option<f64>,
    /// Observer threshold for `.experience-card`, when observed.
    pub observe_experience: Option<f64>,
    pub resize: bool,
    pub tilt: bool,
    pub anchors: bool,
    pub parallax: bool,
    pub contact_form: bool,
    pub copy: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boot {
    pub effects: Vec<Effect>,
    pub listeners: Listeners,
}

/// A DOM event, reduced to the data the handlers need.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    ThemeToggle { root_marker: Option<String> },
    Nav(NavEvent),
    LogoClick,
    ImageError { index: usize, already_applied: bool },
    Intersection {
        group: NodeGroup,
        index: usize,
        intersecting: bool,
    },
    Resize {
        viewport: Size,
        reveal: Vec<Rect>,
        experience: Vec<Rect>,
    },
    TiltMove {
        index: usize,
        rect: Rect,
        pointer: Point,
    },
    TiltLeave { index: usize },
    PointerMove { pointer: Point, viewport: Size },
    AnchorClick { href: String, target_exists: bool },
    ContactSubmit(ContactFields),
    CopyClick { index: usize, label: Option<String> },
    ClipboardSettled { index: usize, ok: bool },
    Timer(TimerKind),
}

/// What the bridge must do in response to an event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub prevent_default: bool,
    pub effects: Vec<Effect>,
}

impl Outcome {
    fn effects(effects: Vec<Effect>) -> Self {
        Self {
            prevent_default: false,
            effects,
        }
    }

    fn prevented(effects: Vec<Effect>) -> Self {
        Self {
            prevent_default: true,
            effects,
        }
    }
}

/// The whole page: every behaviour's state, fed by `PageEvent`s.
pub struct Page<S> {
    config: SiteConfig,
    env: Environment,
    inventory: Inventory,
    settings: Settings<S>,
    nav: Option<MobileNav>,
    images: ImageFallbacks,
    reveal: RevealEngine,
    experience: RevealEngine,
    tilt: Option<Tilt>,
    parallax: Option<Parallax>,
    typewriter: Option<Typewriter>,
    copy: CopyButtons,
}

impl<S: ThemeStore> Page<S> {
    pub fn new(config: SiteConfig, env: Environment, inventory: Inventory, store: S) -> Self {
        let settings = Settings::new(config.theme.clone(), store);
        let nav = (inventory.menu_toggle && inventory.mobile_nav).then(|| {
            MobileNav::new(
                Target::id(&config.ids.menu_toggle),
                Target::id(&config.ids.mobile_nav),
                config.nav.close_key.clone(),
            )
        });
        let images = ImageFallbacks::new(inventory.images.clone());
        let reveal = RevealEngine::new(
            NodeGroup::Reveal,
            config.reveal.clone(),
            inventory.reveal.len(),
            Vec::new(),
        );
        let experience = RevealEngine::new(
            NodeGroup::ExperienceCard,
            config.experience.clone(),
            inventory.experience.len(),
            inventory.experience_dots.clone(),
        );
        let tilt = Tilt::enabled(env.pointer_fine, env.reduced_motion)
            .then(|| Tilt::new(config.tilt.clone()));
        let parallax = (inventory.background_layer && !env.reduced_motion)
            .then(|| Parallax::new(config.parallax.clone()));
        let copy = CopyButtons::new(config.copy.clone(), inventory.copy.clone());
        Self {
            config,
            env,
            inventory,
            settings,
            nav,
            images,
            reveal,
            experience,
            tilt,
            parallax,
            typewriter: None,
            copy,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings<S> {
        &self.settings
    }

    pub fn nav_state(&self) -> Option<NavState> {
        self.nav.as_ref().map(MobileNav::state)
    }

    pub fn is_revealed(&self, group: NodeGroup, index: usize) -> bool {
        match group {
            NodeGroup::Reveal => self.reveal.is_revealed(index),
            NodeGroup::ExperienceCard => self.experience.is_revealed(index),
            _ => false,
        }
    }

    pub fn typewriter_phase(&self) -> Option<Phase> {
        self.typewriter.as_ref().map(Typewriter::phase)
    }

    /// Initial effects and the listeners to wire up, in page order.
    pub fn boot(&mut self) -> Boot {
        let mut effects = Vec::new();
        let mut listeners = Listeners {
            anchors: true,
            ..Listeners::default()
        };

        let theme = self.settings.resolve_initial(self.env.prefers_dark);
        effects.push(self.settings.set_theme(theme));
        listeners.theme_toggle = self.inventory.theme_toggle;

        if let Some(nav) = &mut self.nav {
            effects.extend(nav.close());
            listeners.nav = true;
            listeners.nav_breakpoint = Some(self.config.nav.media_query());
        }

        listeners.logo = self.inventory.logo;
        if self.inventory.year {
            effects.push(chrome::year_stamp(
                Target::id(&self.config.ids.year),
                self.env.year,
            ));
        }
        listeners.images = (0..self.inventory.images.len())
            .filter(|&i| self.images.watches(i))
            .collect();

        let signals = RevealSignals {
            observer_available: self.env.observer_available,
            reduced_motion: self.env.reduced_motion,
        };
        let height = self.env.viewport.height;
        for (engine, rects, observe) in [
            (
                &mut self.reveal,
                &self.inventory.reveal,
                &mut listeners.observe_reveal,
            ),
            (
                &mut self.experience,
                &self.inventory.experience,
                &mut listeners.observe_experience,
            ),
        ] {
            // runs for empty groups too: the root marker is page-wide
            match engine.setup(signals, rects, height) {
                Ok(setup) => {
                    effects.extend(setup.effects);
                    if setup.observe {
                        *observe = Some(engine.threshold());
                    }
                    listeners.resize |= setup.track_resize;
                }
                Err(err) => {
                    log::warn!("reveal setup failed, showing everything: {err}");
                    effects.extend(engine.fail_open());
                }
            }
        }

        listeners.tilt = self.tilt.is_some() && self.inventory.tilt > 0;
        listeners.parallax = self.parallax.is_some();
        listeners.contact_form = self.inventory.contact_form;
        listeners.copy = !self.copy.is_empty();

        Boot { effects, listeners }
    }

    /// Start the typewriter. Unlike every other feature it requires its
    /// elements and reports their absence as an error.
    pub fn start_typewriter(&mut self) -> Result<Vec<Effect>, BootError> {
        let ids = &self.config.ids;
        if !self.inventory.typing_text {
            return Err(BootError::MissingTypewriterElement(ids.typing_text.clone()));
        }
        if !self.inventory.typing_cursor {
            return Err(BootError::MissingTypewriterElement(
                ids.typing_cursor.clone(),
            ));
        }
        let typewriter = self.typewriter.get_or_insert_with(|| {
            Typewriter::new(
                &self.config.typewriter,
                self.env.viewport.width,
                Target::id(&ids.typing_text),
                Target::id(&ids.typing_cursor),
            )
        });
        let step = typewriter.start();
        let mut effects = step.effects.clone();
        effects.extend(step.schedule());
        Ok(effects)
    }

    /// The bridge could not set up observation for `group`.
    pub fn reveal_failed(&mut self, group: NodeGroup) -> Vec<Effect> {
        log::warn!("{group:?}: observer setup failed, showing everything");
        match group {
            NodeGroup::Reveal => self.reveal.fail_open(),
            NodeGroup::ExperienceCard => self.experience.fail_open(),
            _ => Vec::new(),
        }
    }

    pub fn dispatch(&mut self, event: PageEvent) -> Outcome {
        match event {
            PageEvent::ThemeToggle { root_marker } => {
                Outcome::effects(vec![self.settings.toggle(root_marker.as_deref())])
            }
            PageEvent::Nav(event) => match &mut self.nav {
                Some(nav) => Outcome::effects(nav.handle(&event)),
                None => Outcome::default(),
            },
            PageEvent::LogoClick => Outcome::prevented(chrome::logo_click()),
            PageEvent::ImageError {
                index,
                already_applied,
            } => Outcome::effects(self.images.on_error(index, already_applied)),
            PageEvent::Intersection {
                group,
                index,
                intersecting,
            } => Outcome::effects(match group {
                NodeGroup::Reveal => self.reveal.on_intersection(index, intersecting),
                NodeGroup::ExperienceCard => self.experience.on_intersection(index, intersecting),
                _ => Vec::new(),
            }),
            PageEvent::Resize {
                viewport,
                reveal,
                experience,
            } => {
                self.env.viewport = viewport;
                let mut effects = self.reveal.on_resize(&reveal, viewport.height);
                effects.extend(self.experience.on_resize(&experience, viewport.height));
                Outcome::effects(effects)
            }
            PageEvent::TiltMove {
                index,
                rect,
                pointer,
            } => match &self.tilt {
                Some(tilt) => Outcome::effects(tilt.on_move(index, &rect, pointer)),
                None => Outcome::default(),
            },
            PageEvent::TiltLeave { index } => match &self.tilt {
                Some(tilt) => Outcome::effects(tilt.on_leave(index)),
                None => Outcome::default(),
            },
            PageEvent::PointerMove { pointer, viewport } => match &self.parallax {
                Some(parallax) => Outcome::effects(parallax.on_move(pointer, viewport)),
                None => Outcome::default(),
            },
            PageEvent::AnchorClick {
                href,
                target_exists,
            } => {
                let outcome = anchor::resolve(&href, self.env.reduced_motion, |_| target_exists);
                Outcome {
                    prevent_default: outcome.prevent_default,
                    effects: outcome.effects,
                }
            }
            PageEvent::ContactSubmit(fields) => {
                if !self.inventory.contact_form {
                    return Outcome::default();
                }
                Outcome::prevented(contact::submit(&fields, &self.config.contact))
            }
            PageEvent::CopyClick { index, label } => {
                Outcome::effects(self.copy.on_click(index, label.as_deref()))
            }
            PageEvent::ClipboardSettled { index, ok } => {
                Outcome::effects(self.copy.on_settled(index, ok))
            }
            PageEvent::Timer(TimerKind::Typewriter) => match &mut self.typewriter {
                Some(typewriter) => {
                    let step = typewriter.tick();
                    let mut effects = step.effects.clone();
                    effects.extend(step.schedule());
                    Outcome::effects(effects)
                }
                None => Outcome::default(),
            },
            PageEvent::Timer(TimerKind::CopyRestore { button }) => {
                Outcome::effects(self.copy.on_restore(button))
            }
        }
    }
}
