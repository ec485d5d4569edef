mod dom;
mod listeners;
mod mail;
mod runtime;
mod storage;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Context;
use folio_core::{Page, SiteConfig};
use gloo::events::EventListener;
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::dom::Nodes;
use crate::runtime::Runtime;
use crate::storage::LocalStore;

/// Optional `<script type="application/json">` block overriding `SiteConfig`.
const CONFIG_ELEMENT_ID: &str = "folio-config";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    if console_log::init_with_level(level).is_err() {
        web_sys::console::warn_1(&"logger already installed".into());
    }

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsError::new("no document"))?;
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| {
            if let Err(err) = boot() {
                log::error!("{err:#}");
            }
        })
        .forget();
        return Ok(());
    }
    boot().map_err(|err| JsError::new(&format!("{err:#}")).into())
}

/// Wire the whole page. Every feature degrades on its own; only a missing
/// typewriter element is reported as an error, after everything else is up.
fn boot() -> anyhow::Result<()> {
    let window = web_sys::window().context("no window")?;
    let document = window.document().context("no document")?;
    let config = load_config(&document);
    let nodes = Nodes::discover(&document, &config.ids);
    let env = dom::environment(&window);
    log::debug!("boot: {env:?}");
    let page = Page::new(config, env, nodes.inventory(), LocalStore::new(&window));

    let runtime = Rc::new(Runtime {
        window,
        document,
        nodes,
        page: RefCell::new(page),
        observers: RefCell::new(HashMap::new()),
    });

    let boot = runtime.page.borrow_mut().boot();
    runtime.apply(&boot.effects);
    listeners::attach(&runtime, &boot.listeners);

    let typewriter = runtime.page.borrow_mut().start_typewriter();
    let effects = typewriter.map_err(folio_core::Error::from)?;
    runtime.apply(&effects);
    Ok(())
}

fn load_config(document: &Document) -> SiteConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&text) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {err}");
            SiteConfig::default()
        }
    }
}
