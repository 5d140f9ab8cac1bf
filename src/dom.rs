//! Browser glue: binds a `LetterBook` to the card markup.
//!
//! Looks up the guide, letter body and card, wires a MutationObserver on the guide's
//! class attribute, mouseenter / mouseleave on the card, and a
//! requestAnimationFrame loop that drives the typing timelines while they animate.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, MutationObserver, MutationObserverInit, MutationRecord,
    ScrollBehavior, ScrollToOptions, window,
};

use crate::book::{GuideState, LetterBook};
use crate::config::BookConfig;
use crate::content::{ContentError, ContentSource, LetterField};
use crate::scroll::{ScrollMetrics, scroll_target};
use crate::segment::{CharSpan, char_markup};
use crate::typing::BookSurface;

// --- Content ----------------------------------------------------------------

/// Reads `window[global][field]`, e.g. `window.apiData.letterContent`.
pub struct ApiDataSource {
    global: String,
    field: String,
}

impl ApiDataSource {
    pub fn new(global: impl Into<String>, field: impl Into<String>) -> Self {
        Self { global: global.into(), field: field.into() }
    }
}

fn access_error(e: JsValue) -> ContentError {
    ContentError::Access(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

impl ContentSource for ApiDataSource {
    fn letter_field(&self) -> Result<LetterField, ContentError> {
        let Some(win) = window() else { return Ok(LetterField::Missing) };
        let data = Reflect::get(&win, &JsValue::from_str(&self.global)).map_err(access_error)?;
        if !data.is_object() {
            return Ok(LetterField::Missing);
        }
        let obj: &Object = data.unchecked_ref();
        let key = JsValue::from_str(&self.field);
        if !obj.has_own_property(&key) {
            return Ok(LetterField::Missing);
        }
        let value = Reflect::get(obj, &key).map_err(access_error)?;
        Ok(match value.as_string() {
            Some(s) => LetterField::Text(s),
            None => LetterField::NotText(value.js_typeof().as_string().unwrap_or_default()),
        })
    }
}

// --- Surface ----------------------------------------------------------------

pub struct DomLine {
    element: Option<HtmlElement>, // None only if the document refused to create a <p>
    chars: Vec<HtmlElement>,
}

pub struct DomBook {
    doc: Document,
    guide: Element,
    content: Element,
    card: Element,
    cfg: BookConfig,
}

impl DomBook {
    fn new_paragraph(&self) -> Option<HtmlElement> {
        let p = self.doc.create_element("p").ok()?.dyn_into::<HtmlElement>().ok()?;
        self.content.append_child(&p).ok()?;
        Some(p)
    }

    fn guide_state(&self) -> GuideState {
        guide_state(&self.guide, &self.cfg)
    }
}

fn guide_state(guide: &Element, cfg: &BookConfig) -> GuideState {
    let classes = guide.class_list();
    GuideState::from_classes(classes.contains(&cfg.shown_class), classes.contains(&cfg.hidden_class))
}

impl BookSurface for DomBook {
    type Line = DomLine;

    fn clear_lines(&mut self) {
        self.content.set_inner_html("");
    }

    fn append_line(&mut self) -> DomLine {
        let element = self.new_paragraph();
        if element.is_none() {
            log::error!("could not append a line to #{}", self.cfg.content_id);
        }
        DomLine { element, chars: Vec::new() }
    }

    fn fill_placeholders(&mut self, count: usize) {
        self.content.set_inner_html("");
        for _ in 0..count {
            self.new_paragraph();
        }
    }

    fn render_chars(&mut self, line: &mut DomLine, spans: &[CharSpan<'_>]) -> usize {
        line.chars.clear();
        let Some(el) = &line.element else { return 0 };
        el.set_inner_html(&char_markup(spans));
        if let Ok(list) = el.query_selector_all(".char") {
            for i in 0..list.length() {
                if let Some(c) = list.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                    line.chars.push(c);
                }
            }
        }
        line.chars.len()
    }

    fn set_char_opacity(&mut self, line: &DomLine, idx: usize, opacity: f64) {
        if let Some(c) = line.chars.get(idx) {
            c.style().set_property("opacity", &opacity.to_string()).ok();
        }
    }

    fn scroll_into_view(&mut self, line: &DomLine) {
        let Some(el) = &line.element else { return };
        let Ok(Some(container)) = el.closest(&self.cfg.scroll_container_selector) else { return };
        let metrics = ScrollMetrics {
            element_top: el.offset_top() as f64,
            element_height: el.offset_height() as f64,
            container_height: container.client_height() as f64,
            scroll_top: container.scroll_top() as f64,
        };
        if let Some(top) = scroll_target(metrics, self.cfg.typing.scroll_margin_px) {
            let opts = ScrollToOptions::new();
            opts.set_top(top);
            opts.set_behavior(ScrollBehavior::Smooth);
            container.scroll_to_with_scroll_to_options(&opts);
        }
    }

    fn hide_guide(&mut self) {
        let classes = self.guide.class_list();
        classes.remove_1(&self.cfg.shown_class).ok();
        classes.add_1(&self.cfg.hidden_class).ok();
    }

    fn set_card_opened(&mut self, opened: bool) {
        let classes = self.card.class_list();
        if opened {
            classes.add_1(&self.cfg.opened_class).ok();
        } else {
            classes.remove_1(&self.cfg.opened_class).ok();
        }
    }
}

// --- Mounting ---------------------------------------------------------------

type SharedBook = Rc<RefCell<LetterBook<DomBook>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Mount with the given config. Call once the card markup is in the document.
/// Missing guide or card makes this a no-op.
pub fn mount(cfg: BookConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let Some(guide) = doc.get_element_by_id(&cfg.guide_id) else { return Ok(()) };
    let Some(card) = doc.query_selector(&cfg.card_selector)? else { return Ok(()) };
    let Some(content) = doc.get_element_by_id(&cfg.content_id) else {
        log::warn!("#{} not found; letter book not mounted", cfg.content_id);
        return Ok(());
    };

    let source = ApiDataSource::new(cfg.content_global.clone(), cfg.content_field.clone());
    let typing_cfg = cfg.typing.clone();
    let surface = DomBook { doc, guide: guide.clone(), content, card: card.clone(), cfg };
    let book: SharedBook = Rc::new(RefCell::new(LetterBook::new(surface, Box::new(source), typing_cfg)));

    let frames = FrameLoop::new(book.clone());
    observe_guide(&book, &guide)?;
    listen_pointer(&book, &frames, &card, "mouseenter", |b, state| b.on_pointer_enter(state))?;
    listen_pointer(&book, &frames, &card, "mouseleave", |b, state| b.on_pointer_leave(state))?;
    Ok(())
}

fn observe_guide(book: &SharedBook, guide: &Element) -> Result<(), JsValue> {
    let b = book.clone();
    let callback = Closure::wrap(Box::new(move |records: Array, _observer: MutationObserver| {
        for record in records.iter() {
            let record: MutationRecord = record.unchecked_into();
            if record.type_() == "attributes" && record.attribute_name().as_deref() == Some("class") {
                let mut book = b.borrow_mut();
                let state = book.typing().surface().guide_state();
                book.on_guide_class_changed(state);
            }
        }
    }) as Box<dyn FnMut(Array, MutationObserver)>);
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_attributes(true);
    init.set_attribute_filter(&Array::of1(&JsValue::from_str("class")));
    observer.observe_with_options(guide, &init)?;
    callback.forget();
    Ok(())
}

fn listen_pointer(
    book: &SharedBook,
    frames: &FrameLoop,
    card: &Element,
    event: &str,
    handler: fn(&mut LetterBook<DomBook>, GuideState),
) -> Result<(), JsValue> {
    let b = book.clone();
    let frames = frames.clone();
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        {
            let mut book = b.borrow_mut();
            let state = book.typing().surface().guide_state();
            handler(&mut book, state);
        }
        frames.wake();
    }) as Box<dyn FnMut(_)>);
    card.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// --- Frame loop -------------------------------------------------------------

/// requestAnimationFrame loop that only runs while the book animates. It parks
/// itself when idle and is woken again by pointer events.
#[derive(Clone)]
struct FrameLoop {
    callback: FrameCallback,
    running: Rc<Cell<bool>>,
}

impl FrameLoop {
    fn new(book: SharedBook) -> Self {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let running = Rc::new(Cell::new(false));
        let f = callback.clone();
        let r = running.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            let busy = {
                let mut book = book.borrow_mut();
                book.tick(ts);
                let busy = book.is_animating();
                if !busy {
                    // next wake starts from a zero delta instead of the idle gap
                    book.typing_mut().stop_clock();
                }
                busy
            };
            if busy {
                request_frame(&f);
            } else {
                r.set(false);
            }
        }) as Box<dyn FnMut(f64)>));
        Self { callback, running }
    }

    fn wake(&self) {
        if !self.running.replace(true) {
            request_frame(&self.callback);
        }
    }
}

fn request_frame(callback: &FrameCallback) {
    if let (Some(w), Some(cb)) = (window(), callback.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
