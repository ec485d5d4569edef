use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Context;
use folio_core::{Page, PageEvent};
use folio_protocol::{Effect, NodeGroup, ScrollBehavior, Target};
use gloo::timers::callback::Timeout;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, IntersectionObserver, ScrollIntoViewOptions,
    ScrollLogicalPosition, ScrollToOptions, Window,
};

use crate::dom::{self, Nodes, js_err};
use crate::mail;
use crate::storage::LocalStore;

/// Owns the page state and the DOM handles; shared by every listener.
pub struct Runtime {
    pub window: Window,
    pub document: Document,
    pub nodes: Nodes,
    pub page: RefCell<Page<LocalStore>>,
    pub observers: RefCell<HashMap<NodeGroup, IntersectionObserver>>,
}

impl Runtime {
    /// Run an event through the page and apply what comes back. Returns
    /// whether the browser default should be prevented.
    pub fn dispatch(self: &Rc<Self>, event: PageEvent) -> bool {
        let outcome = self.page.borrow_mut().dispatch(event);
        self.apply(&outcome.effects);
        outcome.prevent_default
    }

    pub fn apply(self: &Rc<Self>, effects: &[Effect]) {
        for effect in effects {
            if let Err(err) = self.apply_one(effect) {
                log::warn!("{effect:?} failed: {err:#}");
            }
        }
    }

    fn element(&self, target: &Target) -> Option<Element> {
        let element = dom::resolve(&self.document, &self.nodes, target);
        if element.is_none() {
            log::debug!("{target:?} is not in the document");
        }
        element
    }

    fn apply_one(self: &Rc<Self>, effect: &Effect) -> anyhow::Result<()> {
        match effect {
            Effect::AddClass { target, class } => {
                if let Some(el) = self.element(target) {
                    el.class_list().add_1(class).map_err(js_err)?;
                }
            }
            Effect::RemoveClass { target, class } => {
                if let Some(el) = self.element(target) {
                    el.class_list().remove_1(class).map_err(js_err)?;
                }
            }
            Effect::SetAttribute {
                target,
                name,
                value,
            } => {
                if let Some(el) = self.element(target) {
                    el.set_attribute(name, value).map_err(js_err)?;
                }
            }
            Effect::SetHidden { target, hidden } => {
                if let Some(el) = self.html_element(target) {
                    el.set_hidden(*hidden);
                }
            }
            Effect::SetText { target, text } => {
                if let Some(el) = self.element(target) {
                    el.set_text_content(Some(text.as_str()));
                }
            }
            Effect::AppendText { target, text } => {
                if let Some(el) = self.element(target) {
                    let mut current = el.text_content().unwrap_or_default();
                    current.push_str(text);
                    el.set_text_content(Some(current.as_str()));
                }
            }
            Effect::SetStyle {
                target,
                property,
                value,
            } => {
                if let Some(el) = self.html_element(target) {
                    el.style().set_property(property, value).map_err(js_err)?;
                }
            }
            Effect::SetSource { target, src } => {
                if let Some(el) = self.element(target) {
                    match el.dyn_ref::<HtmlImageElement>() {
                        Some(img) => img.set_src(src),
                        None => el.set_attribute("src", src).map_err(js_err)?,
                    }
                }
            }
            Effect::Remove { target } => {
                if let Some(el) = self.element(target) {
                    el.remove();
                }
            }
            Effect::Unobserve { target } => {
                if let Target::Node { group, .. } = target
                    && let Some(el) = self.element(target)
                    && let Some(observer) = self.observers.borrow().get(group)
                {
                    observer.unobserve(&el);
                }
            }
            Effect::ScrollToTop { behavior } => {
                let options = ScrollToOptions::new();
                options.set_top(0.0);
                options.set_behavior(scroll_behavior(*behavior));
                self.window.scroll_to_with_scroll_to_options(&options);
            }
            Effect::ScrollIntoView { target, behavior } => {
                if let Some(el) = self.element(target) {
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(scroll_behavior(*behavior));
                    options.set_block(ScrollLogicalPosition::Start);
                    el.scroll_into_view_with_scroll_into_view_options(&options);
                }
            }
            Effect::ComposeMail {
                recipient,
                subject,
                body,
            } => {
                let url = mail::mailto(recipient, subject, body);
                self.window.location().set_href(&url).map_err(js_err)?;
            }
            Effect::Reload => {
                self.window.location().reload().map_err(js_err)?;
            }
            Effect::WriteClipboard { button, text } => {
                let runtime = Rc::clone(self);
                let index = *button;
                let text = text.clone();
                spawn_local(async move {
                    let ok = match write_clipboard(&runtime.window, &text).await {
                        Ok(()) => true,
                        Err(err) => {
                            log::warn!("clipboard: {err:#}");
                            false
                        }
                    };
                    runtime.dispatch(PageEvent::ClipboardSettled { index, ok });
                });
            }
            Effect::Schedule { delay_ms, timer } => {
                let runtime = Rc::clone(self);
                let timer = *timer;
                Timeout::new(*delay_ms, move || {
                    runtime.dispatch(PageEvent::Timer(timer));
                })
                .forget();
            }
        }
        Ok(())
    }

    fn html_element(&self, target: &Target) -> Option<HtmlElement> {
        self.element(target)?.dyn_into::<HtmlElement>().ok()
    }
}

fn scroll_behavior(behavior: ScrollBehavior) -> web_sys::ScrollBehavior {
    match behavior {
        ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
    }
}

/// `navigator.clipboard.writeText(text)`, looked up dynamically since the
/// API is missing on insecure origins.
async fn write_clipboard(window: &Window, text: &str) -> anyhow::Result<()> {
    let navigator = window.navigator();
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard")).map_err(js_err)?;
    if clipboard.is_undefined() || clipboard.is_null() {
        anyhow::bail!("navigator.clipboard is not available");
    }
    let write_text = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .map_err(js_err)?
        .dyn_into::<Function>()
        .map_err(js_err)
        .context("clipboard.writeText is not a function")?;
    let promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(js_err)?
        .dyn_into::<Promise>()
        .map_err(js_err)?;
    JsFuture::from(promise).await.map_err(js_err)?;
    Ok(())
}
