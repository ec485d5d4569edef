use std::rc::Rc;

use folio_core::contact::ContactFields;
use folio_core::nav::NavEvent;
use folio_core::{Listeners, PageEvent};
use folio_protocol::{NodeGroup, Point};
use gloo::events::{EventListener, EventListenerOptions};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, Event, FormData, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, MouseEvent,
};

use crate::dom::{self, IN_PAGE_LINK, js_err};
use crate::runtime::Runtime;

/// Listeners live as long as the page, so every handle is leaked on purpose.
pub fn attach(runtime: &Rc<Runtime>, listeners: &Listeners) {
    if listeners.theme_toggle {
        theme_toggle(runtime);
    }
    if listeners.nav {
        nav(runtime, listeners.nav_breakpoint.as_deref());
    }
    if listeners.logo {
        logo(runtime);
    }
    images(runtime, &listeners.images);
    for (group, threshold) in [
        (NodeGroup::Reveal, listeners.observe_reveal),
        (NodeGroup::ExperienceCard, listeners.observe_experience),
    ] {
        let Some(threshold) = threshold else {
            continue;
        };
        if let Err(err) = observe(runtime, group, threshold) {
            log::warn!("{group:?}: {err:#}");
            let effects = runtime.page.borrow_mut().reveal_failed(group);
            runtime.apply(&effects);
        }
    }
    if listeners.resize {
        resize(runtime);
    }
    if listeners.tilt {
        tilt(runtime);
    }
    if listeners.anchors {
        anchors(runtime);
    }
    if listeners.parallax {
        parallax(runtime);
    }
    if listeners.contact_form {
        contact_form(runtime);
    }
    if listeners.copy {
        copy(runtime);
    }
}

fn on_click_prevent<F>(target: &Element, mut handler: F)
where
    F: FnMut(&Event) -> bool + 'static,
{
    EventListener::new_with_options(
        target,
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            if handler(event) {
                event.prevent_default();
            }
        },
    )
    .forget();
}

fn theme_toggle(runtime: &Rc<Runtime>) {
    let Some(button) = &runtime.nodes.theme_toggle else {
        return;
    };
    let rt = Rc::clone(runtime);
    EventListener::new(button, "click", move |_| {
        let attribute = rt.page.borrow().config().theme.attribute.clone();
        let root_marker = rt
            .document
            .document_element()
            .and_then(|root| root.get_attribute(&attribute));
        rt.dispatch(PageEvent::ThemeToggle { root_marker });
    })
    .forget();
}

fn nav(runtime: &Rc<Runtime>, breakpoint: Option<&str>) {
    let (Some(toggle), Some(panel)) = (&runtime.nodes.menu_toggle, &runtime.nodes.mobile_nav) else {
        return;
    };

    let rt = Rc::clone(runtime);
    EventListener::new(toggle, "click", move |_| {
        rt.dispatch(PageEvent::Nav(NavEvent::ToggleClick));
    })
    .forget();

    let rt = Rc::clone(runtime);
    EventListener::new(panel, "click", move |event| {
        let in_page_link = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(IN_PAGE_LINK).ok().flatten())
            .is_some();
        rt.dispatch(PageEvent::Nav(NavEvent::PanelClick { in_page_link }));
    })
    .forget();

    let rt = Rc::clone(runtime);
    EventListener::new(&runtime.window, "keydown", move |event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) {
            rt.dispatch(PageEvent::Nav(NavEvent::KeyDown { key }));
        }
    })
    .forget();

    let Some(query) = breakpoint else {
        return;
    };
    let Some(mq) = runtime.window.match_media(query).ok().flatten() else {
        log::warn!("matchMedia({query}) unavailable, nav will not close on resize");
        return;
    };
    let rt = Rc::clone(runtime);
    if Reflect::has(&mq, &JsValue::from_str("addEventListener")).unwrap_or(false) {
        EventListener::new(&mq, "change", move |_| {
            rt.dispatch(PageEvent::Nav(NavEvent::BreakpointCrossed));
        })
        .forget();
    } else {
        // Safari < 14 only has the legacy listener API
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| {
            rt.dispatch(PageEvent::Nav(NavEvent::BreakpointCrossed));
        });
        if let Err(err) = mq.add_listener_with_opt_callback(Some(callback.as_ref().unchecked_ref())) {
            log::warn!("matchMedia listener: {err:?}");
        }
        callback.forget();
    }
}

fn logo(runtime: &Rc<Runtime>) {
    let Some(logo) = &runtime.nodes.logo else {
        return;
    };
    let rt = Rc::clone(runtime);
    on_click_prevent(logo, move |_| rt.dispatch(PageEvent::LogoClick));
}

fn images(runtime: &Rc<Runtime>, indices: &[usize]) {
    for &index in indices {
        let Some(img) = runtime.nodes.images.get(index) else {
            continue;
        };
        let rt = Rc::clone(runtime);
        let el = img.clone();
        EventListener::once(img, "error", move |_| {
            let already_applied = el.get_attribute("data-fallback-applied").as_deref() == Some("true");
            rt.dispatch(PageEvent::ImageError {
                index,
                already_applied,
            });
        })
        .forget();
    }
}

fn observe(runtime: &Rc<Runtime>, group: NodeGroup, threshold: f64) -> anyhow::Result<()> {
    let elements = match group {
        NodeGroup::Reveal => &runtime.nodes.reveal,
        NodeGroup::ExperienceCard => &runtime.nodes.experience,
        _ => anyhow::bail!("{group:?} cannot be observed"),
    };

    let rt = Rc::clone(runtime);
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let Some(index) = rt.nodes.index_of(group, &entry.target()) else {
                    continue;
                };
                rt.dispatch(PageEvent::Intersection {
                    group,
                    index,
                    intersecting: entry.is_intersecting(),
                });
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer = IntersectionObserver::new_with_options(
        callback.as_ref().unchecked_ref::<Function>(),
        &options,
    )
    .map_err(js_err)?;
    callback.forget();

    for element in elements {
        observer.observe(element);
    }
    runtime.observers.borrow_mut().insert(group, observer);
    log::debug!("{group:?}: observing {} elements", elements.len());
    Ok(())
}

fn resize(runtime: &Rc<Runtime>) {
    let rt = Rc::clone(runtime);
    EventListener::new(&runtime.window, "resize", move |_| {
        rt.dispatch(PageEvent::Resize {
            viewport: dom::viewport(&rt.window),
            reveal: dom::rects(&rt.nodes.reveal),
            experience: dom::rects(&rt.nodes.experience),
        });
    })
    .forget();
}

fn tilt(runtime: &Rc<Runtime>) {
    for (index, el) in runtime.nodes.tilt.iter().enumerate() {
        let rt = Rc::clone(runtime);
        let target = el.clone();
        EventListener::new(el, "mousemove", move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            rt.dispatch(PageEvent::TiltMove {
                index,
                rect: dom::rect(&target),
                pointer: pointer(mouse),
            });
        })
        .forget();

        let rt = Rc::clone(runtime);
        EventListener::new(el, "mouseleave", move |_| {
            rt.dispatch(PageEvent::TiltLeave { index });
        })
        .forget();
    }
}

fn anchors(runtime: &Rc<Runtime>) {
    for link in &runtime.nodes.anchors {
        let rt = Rc::clone(runtime);
        let el = link.clone();
        on_click_prevent(link, move |_| {
            let Some(href) = el.get_attribute("href") else {
                return false;
            };
            let target_exists = href
                .strip_prefix('#')
                .filter(|id| !id.is_empty())
                .is_some_and(|id| rt.document.get_element_by_id(id).is_some());
            rt.dispatch(PageEvent::AnchorClick {
                href,
                target_exists,
            })
        });
    }
}

fn parallax(runtime: &Rc<Runtime>) {
    let rt = Rc::clone(runtime);
    EventListener::new(&runtime.window, "mousemove", move |event| {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        rt.dispatch(PageEvent::PointerMove {
            pointer: pointer(mouse),
            viewport: dom::viewport(&rt.window),
        });
    })
    .forget();
}

fn contact_form(runtime: &Rc<Runtime>) {
    let Some(form) = &runtime.nodes.contact_form else {
        return;
    };
    let rt = Rc::clone(runtime);
    let el = form.clone();
    EventListener::new_with_options(
        form,
        "submit",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let fields = match FormData::new_with_form(&el) {
                Ok(data) => ContactFields {
                    name: data.get("name").as_string(),
                    email: data.get("email").as_string(),
                    message: data.get("message").as_string(),
                },
                Err(err) => {
                    log::warn!("contact form unreadable: {err:?}");
                    ContactFields::default()
                }
            };
            if rt.dispatch(PageEvent::ContactSubmit(fields)) {
                event.prevent_default();
            }
        },
    )
    .forget();
}

fn copy(runtime: &Rc<Runtime>) {
    for (index, button) in runtime.nodes.copy.iter().enumerate() {
        let rt = Rc::clone(runtime);
        let el = button.clone();
        EventListener::new(button, "click", move |_| {
            rt.dispatch(PageEvent::CopyClick {
                index,
                label: el.text_content(),
            });
        })
        .forget();
    }
}

fn pointer(mouse: &MouseEvent) -> Point {
    Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()))
}
