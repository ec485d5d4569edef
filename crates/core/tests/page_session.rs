//! Integration test: boot a whole page against an in-memory store and drive
//! it with events the way the browser bridge would.

use folio_core::contact::ContactFields;
use folio_core::nav::{NavEvent, NavState};
use folio_core::typewriter::Phase;
use folio_core::{Environment, Inventory, MemoryStore, Page, PageEvent, SiteConfig, ThemeStore};
use folio_protocol::{Effect, NodeGroup, Point, Rect, ScrollBehavior, Size, Target, Theme, TimerKind};

fn env() -> Environment {
    Environment {
        reduced_motion: false,
        pointer_fine: true,
        prefers_dark: false,
        observer_available: true,
        viewport: Size::new(1280.0, 800.0),
        year: 2026,
    }
}

fn full_inventory() -> Inventory {
    Inventory {
        theme_toggle: true,
        menu_toggle: true,
        mobile_nav: true,
        logo: true,
        year: true,
        images: vec![Some("/img/avatar.png".into())],
        reveal: vec![
            Rect::new(0.0, 100.0, 800.0, 300.0),
            Rect::new(0.0, 2400.0, 800.0, 300.0),
        ],
        experience: vec![Rect::new(0.0, 3000.0, 600.0, 200.0)],
        experience_dots: vec![true],
        tilt: 2,
        background_layer: true,
        typing_text: true,
        typing_cursor: true,
        contact_form: true,
        copy: vec![Some("me@site.dev".into())],
    }
}

fn page_with(store: MemoryStore, env: Environment) -> Page<MemoryStore> {
    Page::new(SiteConfig::default(), env, full_inventory(), store)
}

fn root_theme(effects: &[Effect]) -> Option<String> {
    effects.iter().rev().find_map(|e| match e {
        Effect::SetAttribute {
            target: Target::Root,
            name,
            value,
        } if name == "data-theme" => Some(value.clone()),
        _ => None,
    })
}

#[test]
fn invalid_stored_theme_boots_dark() {
    for stored in ["", "blue", "LIGHT", "undefined"] {
        let mut page = page_with(MemoryStore::with("theme", stored), env());
        let boot = page.boot();
        assert_eq!(root_theme(&boot.effects).as_deref(), Some("dark"), "stored {stored:?}");
        assert_eq!(page.settings().store().load("theme").as_deref(), Some("dark"));
    }
}

#[test]
fn default_is_dark_even_when_system_prefers_light() {
    let mut page = page_with(MemoryStore::new(), env());
    assert_eq!(root_theme(&page.boot().effects).as_deref(), Some("dark"));
}

#[test]
fn double_toggle_restores_marker() {
    let mut page = page_with(MemoryStore::with("theme", "light"), env());
    let start = root_theme(&page.boot().effects);
    let once = page.dispatch(PageEvent::ThemeToggle {
        root_marker: start.clone(),
    });
    let middle = root_theme(&once.effects);
    assert_eq!(middle.as_deref(), Some("dark"));
    let twice = page.dispatch(PageEvent::ThemeToggle {
        root_marker: middle,
    });
    assert_eq!(root_theme(&twice.effects), start);
    assert_eq!(page.settings().theme(), Some(Theme::Light));
}

#[test]
fn nav_transitions() {
    let mut page = page_with(MemoryStore::new(), env());
    let boot = page.boot();
    assert!(boot.listeners.nav);
    assert_eq!(boot.listeners.nav_breakpoint.as_deref(), Some("(min-width: 820px)"));
    assert_eq!(page.nav_state(), Some(NavState::Closed));

    page.dispatch(PageEvent::Nav(NavEvent::ToggleClick));
    assert_eq!(page.nav_state(), Some(NavState::Open));
    page.dispatch(PageEvent::Nav(NavEvent::KeyDown {
        key: "Escape".into(),
    }));
    assert_eq!(page.nav_state(), Some(NavState::Closed));

    page.dispatch(PageEvent::Nav(NavEvent::ToggleClick));
    page.dispatch(PageEvent::Nav(NavEvent::BreakpointCrossed));
    assert_eq!(page.nav_state(), Some(NavState::Closed));
}

#[test]
fn nav_needs_both_elements() {
    let inventory = Inventory {
        mobile_nav: false,
        ..full_inventory()
    };
    let mut page = Page::new(SiteConfig::default(), env(), inventory, MemoryStore::new());
    assert!(!page.boot().listeners.nav);
    assert!(page.dispatch(PageEvent::Nav(NavEvent::ToggleClick)).effects.is_empty());
    assert_eq!(page.nav_state(), None);
}

#[test]
fn reveal_above_fold_then_on_intersection() {
    let mut page = page_with(MemoryStore::new(), env());
    let boot = page.boot();
    assert!(page.is_revealed(NodeGroup::Reveal, 0));
    assert!(!page.is_revealed(NodeGroup::Reveal, 1));
    assert_eq!(boot.listeners.observe_reveal, Some(0.25));
    assert_eq!(boot.listeners.observe_experience, Some(0.35));
    assert!(boot.listeners.resize);

    page.dispatch(PageEvent::Intersection {
        group: NodeGroup::Reveal,
        index: 1,
        intersecting: true,
    });
    page.dispatch(PageEvent::Intersection {
        group: NodeGroup::Reveal,
        index: 1,
        intersecting: false,
    });
    assert!(page.is_revealed(NodeGroup::Reveal, 1));

    let card = page.dispatch(PageEvent::Intersection {
        group: NodeGroup::ExperienceCard,
        index: 0,
        intersecting: true,
    });
    assert!(card.effects.contains(&Effect::AddClass {
        target: Target::node(NodeGroup::TimelineDot, 0),
        class: "active".into(),
    }));
}

#[test]
fn reduced_motion_disables_motion_and_reveals_all() {
    let reduced = Environment {
        reduced_motion: true,
        ..env()
    };
    let mut page = page_with(MemoryStore::new(), reduced);
    let boot = page.boot();
    assert!(!boot.listeners.tilt);
    assert!(!boot.listeners.parallax);
    assert_eq!(boot.listeners.observe_reveal, None);
    assert!(page.is_revealed(NodeGroup::Reveal, 0));
    assert!(page.is_revealed(NodeGroup::Reveal, 1));
    assert!(page.is_revealed(NodeGroup::ExperienceCard, 0));

    let moved = page.dispatch(PageEvent::TiltMove {
        index: 0,
        rect: Rect::new(0.0, 0.0, 100.0, 100.0),
        pointer: Point::new(10.0, 10.0),
    });
    assert!(moved.effects.is_empty());
}

#[test]
fn bad_viewport_fails_open() {
    let broken = Environment {
        viewport: Size::new(1280.0, f64::NAN),
        ..env()
    };
    let mut page = page_with(MemoryStore::new(), broken);
    let boot = page.boot();
    assert!(page.is_revealed(NodeGroup::Reveal, 1));
    assert!(boot.effects.contains(&Effect::RemoveClass {
        target: Target::Root,
        class: "js".into(),
    }));
    assert_eq!(boot.listeners.observe_reveal, None);
}

#[test]
fn bridge_reported_observer_failure_fails_open() {
    let mut page = page_with(MemoryStore::new(), env());
    page.boot();
    page.reveal_failed(NodeGroup::ExperienceCard);
    assert!(page.is_revealed(NodeGroup::ExperienceCard, 0));
}

#[test]
fn typewriter_runs_to_completion() {
    let mut config = SiteConfig::default();
    config.typewriter.lines = vec!["Hi".into(), "Bye".into()];
    let mut page = Page::new(config, env(), full_inventory(), MemoryStore::new());
    page.boot();

    let mut text = String::new();
    let mut cursor_removed = false;
    let mut pending = page.start_typewriter().unwrap();
    let mut guard = 0;
    loop {
        let mut timer_due = false;
        for effect in &pending {
            match effect {
                Effect::SetText { text: t, .. } => text = t.clone(),
                Effect::AppendText { text: t, .. } => text.push_str(t),
                Effect::Remove {
                    target: Target::Id(id),
                } if id == "typing-cursor" => cursor_removed = true,
                Effect::Schedule {
                    timer: TimerKind::Typewriter,
                    ..
                } => timer_due = true,
                _ => {}
            }
        }
        if !timer_due {
            break;
        }
        guard += 1;
        assert!(guard < 100, "typewriter never finished");
        pending = page.dispatch(PageEvent::Timer(TimerKind::Typewriter)).effects;
    }
    assert_eq!(text, "Bye");
    assert!(cursor_removed);
    assert_eq!(page.typewriter_phase(), Some(Phase::Done));
}

#[test]
fn typewriter_without_cursor_is_an_error() {
    let inventory = Inventory {
        typing_cursor: false,
        ..full_inventory()
    };
    let mut page = Page::new(SiteConfig::default(), env(), inventory, MemoryStore::new());
    page.boot();
    let err = page.start_typewriter().unwrap_err();
    assert_eq!(err.to_string(), "typewriter element #typing-cursor is missing");
}

#[test]
fn typewriter_without_text_is_an_error() {
    let inventory = Inventory {
        typing_text: false,
        ..full_inventory()
    };
    let mut page = Page::new(SiteConfig::default(), env(), inventory, MemoryStore::new());
    page.boot();
    let err = page.start_typewriter().unwrap_err();
    assert_eq!(err.to_string(), "typewriter element #typing-text is missing");
    assert_eq!(page.typewriter_phase(), None);
}

#[test]
fn root_marker_without_reveal_elements() {
    let inventory = Inventory {
        reveal: Vec::new(),
        ..full_inventory()
    };
    let mut page = Page::new(SiteConfig::default(), env(), inventory, MemoryStore::new());
    let boot = page.boot();
    assert!(boot.effects.contains(&Effect::AddClass {
        target: Target::Root,
        class: "js".into(),
    }));
    assert_eq!(boot.listeners.observe_reveal, None);
    assert!(boot.listeners.observe_experience.is_some());
    assert!(!boot.listeners.resize);
}

#[test]
fn contact_name_is_clamped_to_80() {
    let mut page = page_with(MemoryStore::new(), env());
    page.boot();
    let outcome = page.dispatch(PageEvent::ContactSubmit(ContactFields {
        name: Some("A".repeat(100)),
        email: Some("a@b.c".into()),
        message: Some("hello".into()),
    }));
    assert!(outcome.prevent_default);
    let [Effect::ComposeMail { body, .. }] = outcome.effects.as_slice() else {
        panic!("expected a single mail draft, got {:?}", outcome.effects);
    };
    assert!(body.starts_with(&format!("Name: {}\n", "A".repeat(80))));
    assert!(!body.contains(&"A".repeat(81)));
}

#[test]
fn bare_hash_anchor_is_inert() {
    let mut page = page_with(MemoryStore::new(), env());
    page.boot();
    let outcome = page.dispatch(PageEvent::AnchorClick {
        href: "#".into(),
        target_exists: false,
    });
    assert!(outcome.effects.is_empty());
    assert!(outcome.prevent_default);

    let top = page.dispatch(PageEvent::AnchorClick {
        href: "#top".into(),
        target_exists: false,
    });
    assert_eq!(
        top.effects,
        vec![Effect::ScrollToTop {
            behavior: ScrollBehavior::Smooth,
        }]
    );
}

#[test]
fn reduced_motion_anchor_scrolls_instantly() {
    let mut page = page_with(
        MemoryStore::new(),
        Environment {
            reduced_motion: true,
            ..env()
        },
    );
    page.boot();
    let outcome = page.dispatch(PageEvent::AnchorClick {
        href: "#projects".into(),
        target_exists: true,
    });
    assert!(outcome.prevent_default);
    assert_eq!(
        outcome.effects,
        vec![Effect::ScrollIntoView {
            target: Target::id("projects"),
            behavior: ScrollBehavior::Instant,
        }]
    );
}

#[test]
fn copy_button_feedback_and_restore() {
    let mut page = page_with(MemoryStore::new(), env());
    assert!(page.boot().listeners.copy);

    let click = page.dispatch(PageEvent::CopyClick {
        index: 0,
        label: Some("Copy email".into()),
    });
    assert_eq!(
        click.effects,
        vec![Effect::WriteClipboard {
            button: 0,
            text: "me@site.dev".into(),
        }]
    );

    let settled = page.dispatch(PageEvent::ClipboardSettled { index: 0, ok: true });
    assert!(settled.effects.contains(&Effect::SetText {
        target: Target::node(NodeGroup::CopyButton, 0),
        text: "Copied".into(),
    }));
    assert!(settled.effects.contains(&Effect::Schedule {
        delay_ms: 1400,
        timer: TimerKind::CopyRestore { button: 0 },
    }));

    let restored = page.dispatch(PageEvent::Timer(TimerKind::CopyRestore { button: 0 }));
    assert_eq!(
        restored.effects,
        vec![Effect::SetText {
            target: Target::node(NodeGroup::CopyButton, 0),
            text: "Copy email".into(),
        }]
    );
}

#[test]
fn chores_at_boot_and_on_click() {
    let mut page = page_with(MemoryStore::new(), env());
    let boot = page.boot();
    assert!(boot.effects.contains(&Effect::SetText {
        target: Target::id("year"),
        text: "2026".into(),
    }));
    assert_eq!(boot.listeners.images, vec![0]);
    assert!(boot.listeners.logo);

    let logo = page.dispatch(PageEvent::LogoClick);
    assert!(logo.prevent_default);
    assert_eq!(logo.effects.last(), Some(&Effect::Reload));

    let img = page.dispatch(PageEvent::ImageError {
        index: 0,
        already_applied: false,
    });
    assert_eq!(img.effects.len(), 2);
    assert!(page
        .dispatch(PageEvent::ImageError {
            index: 0,
            already_applied: false,
        })
        .effects
        .is_empty());
}

#[test]
fn parallax_follows_window_pointer() {
    let mut page = page_with(MemoryStore::new(), env());
    assert!(page.boot().listeners.parallax);
    let outcome = page.dispatch(PageEvent::PointerMove {
        pointer: Point::new(640.0, 400.0),
        viewport: Size::new(1280.0, 800.0),
    });
    assert_eq!(outcome.effects.len(), 2);
    assert!(matches!(
        &outcome.effects[0],
        Effect::SetStyle { value, .. } if value == "0.00px"
    ));
}
