//! The browser document, backed by `web-sys`.

use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Document, Element, HtmlInputElement};

use crate::contract::InsertPosition;
use crate::dispatch::RowActions;
use crate::document::{RowDocument, RowEvent, RowEventKind, TriggerEvent};
use crate::error::{Result, RowError};
use crate::token::TokenSource;

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn js_error(context: &str, value: &JsValue) -> RowError {
    RowError::browser(format!("{context}: {}", describe(value)))
}

/// The page's live DOM.
#[derive(Debug, Clone)]
pub struct BrowserDocument {
    document: Document,
}

impl BrowserDocument {
    /// Wrap a document.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The document of the current window.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::Browser`] outside a window context (e.g. in a worker).
    pub fn current() -> Result<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
            .ok_or_else(|| RowError::browser("no window document available"))
    }

    /// The wrapped document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl RowDocument for BrowserDocument {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_selector(&self, selector: &str) -> Result<Option<Element>> {
        self.document
            .query_selector(selector)
            .map_err(|e| RowError::invalid_selector(selector, describe(&e)))
    }

    fn query_selector_within(&self, scope: &Element, selector: &str) -> Result<Option<Element>> {
        scope
            .query_selector(selector)
            .map_err(|e| RowError::invalid_selector(selector, describe(&e)))
    }

    fn closest(&self, element: &Element, selector: &str) -> Result<Option<Element>> {
        element
            .closest(selector)
            .map_err(|e| RowError::invalid_selector(selector, describe(&e)))
    }

    fn parent_element(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn inner_html(&self, element: &Element) -> Result<String> {
        Ok(element.inner_html())
    }

    fn insert_adjacent_html(
        &mut self,
        target: &Element,
        position: InsertPosition,
        html: &str,
    ) -> Result<()> {
        target
            .insert_adjacent_html(position.as_str(), html)
            .map_err(|e| js_error("insertAdjacentHTML", &e))
    }

    fn remove(&mut self, element: &Element) -> Result<()> {
        element.remove();
        Ok(())
    }

    fn set_value(&mut self, element: &Element, value: &str) -> Result<()> {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
            return Ok(());
        }
        element
            .set_attribute("value", value)
            .map_err(|e| js_error("setting value", &e))
    }

    fn add_class(&mut self, element: &Element, class: &str) -> Result<()> {
        element
            .class_list()
            .add_1(class)
            .map_err(|e| js_error("classList.add", &e))
    }

    fn dispatch(&mut self, event: RowEvent<Element>) -> Result<()> {
        let key = match event.kind {
            RowEventKind::RowRemoved => "parent",
            RowEventKind::RowMarkedForDestruction => "row",
        };
        let detail = js_sys::Object::new();
        js_sys::Reflect::set(&detail, &JsValue::from_str(key), &event.subject)
            .map_err(|e| js_error("building event detail", &e))?;

        let init = CustomEventInit::new();
        init.set_bubbles(true);
        init.set_detail(&detail);
        let custom = CustomEvent::new_with_event_init_dict(&event.name(), &init)
            .map_err(|e| js_error("creating event", &e))?;

        event
            .subject
            .dispatch_event(&custom)
            .map(|_| ())
            .map_err(|e| js_error("dispatching event", &e))
    }
}

/// Install `actions` as one delegated click listener on the current document.
///
/// Failed actions are logged; the listener stays installed for the life of the page.
///
/// # Errors
///
/// Returns [`RowError::Browser`] if there is no document or the listener cannot be added.
pub fn install<T>(mut actions: RowActions<Element, T>) -> Result<()>
where
    T: TokenSource + 'static,
{
    let mut document = BrowserDocument::current()?;
    let root = document.document().clone();

    let listener: Closure<dyn FnMut(web_sys::Event)> =
        Closure::new(move |event: web_sys::Event| {
            let Some(target) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
            else {
                return;
            };

            let mut trigger = TriggerEvent::new(target);
            let result = actions.handle(&mut document, &mut trigger);
            if trigger.default_prevented() {
                event.prevent_default();
            }
            if let Err(err) = result {
                warn!(error = %err, "Row action failed");
            }
        });

    root.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
        .map_err(|e| js_error("installing click listener", &e))?;
    listener.forget();
    Ok(())
}
