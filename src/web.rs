//! Browser glue: the control buttons, the loading overlay and URL configuration.

use wasm_bindgen::{JsCast, prelude::*};
use winit::event_loop::EventLoopProxy;

use crate::{
    config::{Config, Variant},
    controls::BUTTONS,
    flow::FlowEvent,
    indicator::LoadingIndicator,
};

pub const LOADING_ID: &str = "loading";
pub const PROGRESS_BAR_ID: &str = "progressBar";

fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

fn html_element(id: &str) -> Option<web_sys::HtmlElement> {
    document()?.get_element_by_id(id)?.dyn_into().ok()
}

fn set_style(element: &web_sys::HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::debug!("Could not set {property}: {value} on #{}: {e:?}", element.id());
    }
}

/// Forwards clicks on the control buttons into the event loop. Missing
/// buttons are skipped; buttons whose action does not exist in `variant` are
/// hidden.
pub fn bind_buttons(proxy: &EventLoopProxy<FlowEvent>, variant: Variant) {
    let Some(document) = document() else {
        log::warn!("No document, the control buttons stay inactive");
        return;
    };
    for (id, action) in BUTTONS {
        let Some(button) = document.get_element_by_id(id) else {
            log::debug!("No #{id} button on the page");
            continue;
        };
        if !action.applies_to(variant) {
            if let Ok(button) = button.dyn_into::<web_sys::HtmlElement>() {
                set_style(&button, "display", "none");
            }
            continue;
        }
        let proxy = proxy.clone();
        let on_click = Closure::<dyn FnMut()>::new(move || {
            if proxy.send_event(FlowEvent::Action(action)).is_err() {
                log::warn!("Event loop closed, dropping {action:?}");
            }
        });
        if let Err(e) =
            button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        {
            log::warn!("Could not listen to #{id}: {e:?}");
        }
        // the listener lives as long as the page
        on_click.forget();
    }
}

/// Mirrors the indicator onto the `#loading` overlay and its progress bar.
pub fn sync_indicator(indicator: &LoadingIndicator) {
    if let Some(bar) = html_element(PROGRESS_BAR_ID) {
        set_style(&bar, "width", &format!("{:.0}%", indicator.progress()));
    }
    if !indicator.is_visible()
        && let Some(overlay) = html_element(LOADING_ID)
    {
        set_style(&overlay, "display", "none");
    }
}

/// Builds the configuration from the page URL, e.g. `?variant=tower&seed=7`.
pub fn config_from_location() -> Config {
    let search = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();
    match web_sys::UrlSearchParams::new_with_str(&search) {
        Ok(params) => Config::from_params(|key| params.get(key)),
        Err(e) => {
            log::warn!("Could not read the page URL ({e:?}), using defaults");
            Config::default()
        }
    }
}
