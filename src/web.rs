//! Browser host: wires a [`Session`] to the page.
//!
//! The page provides `#gameArea` (required) and optionally `#character` (the
//! net that follows the cursor), `#score` and `#statistics`. Entities are
//! plain `div`s tagged with `data-entity`; a single delegated `mouseover`
//! listener on the game area turns pointer contact into `Session::hover`.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Storage, Window, window};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::game::{
    Effect, EntityId, EntityKind, GameEvent, Renderer, Session, SessionStats, Viewport, present, stats,
};
use crate::storage::{MemoryStore, StatsStore};

const NET_SWING_MS: f64 = 200.0;
const MESSAGE_MS: f64 = 2_000.0;

// --- Persistence --------------------------------------------------------------

/// `window.localStorage` behind the [`StatsStore`] seam.
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self> {
        let win = window().ok_or(GameError::MissingCollaborator("window"))?;
        let storage = win
            .local_storage()
            .map_err(js_storage_error)?
            .ok_or(GameError::MissingCollaborator("localStorage"))?;
        Ok(Self { storage })
    }
}

impl StatsStore for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_storage_error)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_storage_error)
    }
}

fn js_storage_error(err: JsValue) -> GameError {
    GameError::Storage(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn to_js(err: GameError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub(crate) fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Move an element through its inline style, leaving other properties alone.
fn set_position(el: &Element, x: f64, y: f64) {
    if let Some(el) = el.dyn_ref::<HtmlElement>() {
        let style = el.style();
        style.set_property("left", &format!("{x}px")).ok();
        style.set_property("top", &format!("{y}px")).ok();
    }
}

fn window_size(win: &Window) -> (f64, f64) {
    let dim = |v: std::result::Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (dim(win.inner_width()), dim(win.inner_height()))
}

// --- DOM renderer -------------------------------------------------------------

struct DomRenderer {
    doc: Document,
    area: Element,
    viewport: (f64, f64),
    nodes: HashMap<EntityId, Element>,
    // Transient nodes (effects, messages) and when to drop them.
    transient: Vec<(Element, f64)>,
    net_swing_until_ms: Option<f64>,
    now_ms: f64,
}

impl DomRenderer {
    fn new(doc: Document, area: Element, viewport: (f64, f64)) -> Self {
        Self {
            doc,
            area,
            viewport,
            nodes: HashMap::new(),
            transient: Vec::new(),
            net_swing_until_ms: None,
            now_ms: 0.0,
        }
    }

    fn div(&self, class: &str, text: &str) -> Option<Element> {
        let el = self.doc.create_element("div").ok()?;
        el.set_class_name(class);
        el.set_text_content(Some(text));
        Some(el)
    }

    fn transient_at(&mut self, class: &str, text: &str, x: f64, y: f64, ttl_ms: f64) {
        if let Some(el) = self.div(class, text) {
            el.set_attribute("style", &format!("position:absolute; left:{x}px; top:{y}px;"))
                .ok();
            self.area.append_child(&el).ok();
            self.transient.push((el, self.now_ms + ttl_ms));
        }
    }

    fn message(&mut self, text: &str) {
        let Some(body) = self.doc.body() else { return };
        if let Some(el) = self.div("power-up-message", text) {
            el.set_attribute(
                "style",
                "position:fixed; top:20%; left:50%; transform:translateX(-50%); z-index:1000;",
            )
            .ok();
            body.append_child(&el).ok();
            self.transient.push((el, self.now_ms + MESSAGE_MS));
        }
    }

    /// Drop expired effects and finish the net swing.
    fn prune(&mut self, now_ms: f64) {
        self.transient.retain(|(el, until)| {
            let keep = now_ms < *until;
            if !keep {
                el.remove();
            }
            keep
        });
        if self.net_swing_until_ms.is_some_and(|until| now_ms >= until) {
            self.net_swing_until_ms = None;
            if let Some(net) = self.doc.get_element_by_id("character") {
                net.class_list().remove_1("catching").ok();
            }
        }
    }

    fn show_stats(&self, stats: &SessionStats) {
        let Some(panel) = self.doc.get_element_by_id("statistics") else { return };
        panel.set_inner_html(&format!(
            "<h3>Game Statistics</h3>\
             <p>Games Played: {}</p>\
             <p>Total Bugs Caught: {}</p>\
             <p>Highest Score: {}</p>\
             <p>Best Streak: {}</p>\
             <p>Rare Bugs Caught: {}</p>\
             <p>Ultra Rare Bugs: {}</p>\
             <p>Total Play Time: {}m {}s</p>",
            stats.games_played,
            stats.total_bugs_caught,
            stats.highest_score,
            stats.longest_streak,
            stats.rare_bugs_caught,
            stats.ultra_rare_bugs_caught,
            stats.total_play_time / 60,
            stats.total_play_time % 60,
        ));
    }

    fn game_over(&self, final_score: u64) {
        if let Some(net) = self.doc.get_element_by_id("character").and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
            net.style().set_property("display", "none").ok();
        }
        let Some(body) = self.doc.body() else { return };
        let Ok(screen) = self.doc.create_element("div") else { return };
        screen.set_id("game-over");
        screen.set_attribute("style", "position:fixed; inset:0; display:flex; flex-direction:column; justify-content:center; align-items:center; z-index:1000; background:linear-gradient(45deg,#FF0000,#FF4444); text-align:center;").ok();
        screen.set_inner_html(&format!(
            "<div style='background:rgba(0,0,0,0.8); padding:40px; border-radius:20px;'>\
             <h1 style='color:white;'>🚨 CRITICAL ALERT 🚨</h1>\
             <h2 style='color:#FFD700;'>SEV 1 INCIDENT ASSIGNED</h2>\
             <p style='color:white;'>Production Bug Escaped to Wild! 🐛💥</p>\
             <p style='color:#FFB6C1;'>Final Score: {final_score} bugs caught</p>\
             <button onclick='location.reload()'>🔄 RESTART DEBUGGING SESSION</button>\
             </div>"
        ));
        body.append_child(&screen).ok();
    }

    /// Take everything this renderer put on the page back off it, so a new
    /// session starts from a clean area (entity ids restart at 0).
    fn teardown(&mut self) {
        for (_, el) in self.nodes.drain() {
            el.remove();
        }
        for (el, _) in self.transient.drain(..) {
            el.remove();
        }
        if let Some(screen) = self.doc.get_element_by_id("game-over") {
            screen.remove();
        }
        if let Some(net) = self.doc.get_element_by_id("character") {
            net.class_list().remove_1("catching").ok();
            if let Some(net) = net.dyn_ref::<HtmlElement>() {
                net.style().remove_property("display").ok();
            }
        }
        if let Some(body) = self.doc.body() {
            body.class_list().remove_1("konami-mode").ok();
        }
        self.net_swing_until_ms = None;
    }
}

impl Renderer for DomRenderer {
    fn viewport_size(&self) -> (f64, f64) {
        self.viewport
    }

    fn spawn_entity(&mut self, id: EntityId, kind: EntityKind, glyph: &str, x: f64, y: f64) {
        let class = match kind {
            EntityKind::Bug { rarity } => match rarity.css_class() {
                Some(tier) => format!("bug {tier}"),
                None => "bug".to_owned(),
            },
            EntityKind::PowerUp(p) => format!("power-up {}", p.css_class()),
            EntityKind::Bomb => kind.css_class().to_owned(),
        };
        let Some(el) = self.div(&class, glyph) else { return };
        el.set_attribute("data-entity", &id.to_string()).ok();
        self.area.append_child(&el).ok();
        self.nodes.insert(id, el);
        self.place_entity(id, x, y);
    }

    fn place_entity(&mut self, id: EntityId, x: f64, y: f64) {
        if let Some(el) = self.nodes.get(&id) {
            set_position(el, x, y);
        }
    }

    fn remove_entity(&mut self, id: EntityId) {
        if let Some(el) = self.nodes.remove(&id) {
            el.remove();
        }
    }

    fn show_effect(&mut self, effect: &Effect, x: f64, y: f64) {
        let ttl = effect.duration_ms();
        match effect {
            Effect::Sparkle(kind) => self.transient_at(kind.css_class(), "", x, y, ttl),
            Effect::Points(points) => {
                let class = if *points > 1 { "caught-bug bonus" } else { "caught-bug" };
                self.transient_at(class, &effect.label(), x, y, ttl);
            }
            Effect::Explosion => self.transient_at("caught-bug bomb-hit", &effect.label(), x, y, ttl),
            Effect::Shielded => self.message(&effect.label()),
        }
    }

    fn display(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ScoreChanged { score } => {
                if let Some(el) = self.doc.get_element_by_id("score") {
                    el.set_text_content(Some(&score.to_string()));
                }
            }
            GameEvent::StatsChanged(stats) => self.show_stats(stats),
            GameEvent::NetMoved { x, y } => {
                if let Some(net) = self.doc.get_element_by_id("character") {
                    set_position(&net, *x, *y);
                }
            }
            GameEvent::NetSwung => {
                if let Some(net) = self.doc.get_element_by_id("character") {
                    net.class_list().add_1("catching").ok();
                    self.net_swing_until_ms = Some(self.now_ms + NET_SWING_MS);
                }
            }
            GameEvent::PowerUpActivated { kind } => self.message(kind.message()),
            GameEvent::KonamiMode { active } => {
                if let Some(body) = self.doc.body() {
                    if *active {
                        body.class_list().add_1("konami-mode").ok();
                    } else {
                        body.class_list().remove_1("konami-mode").ok();
                    }
                }
                if *active {
                    self.message("🌈 KONAMI MODE ACTIVATED! 🌈");
                }
            }
            GameEvent::SessionEnded { final_score } => self.game_over(*final_score),
            _ => {}
        }
    }
}

// --- Host loop ----------------------------------------------------------------

struct Host {
    session: Session,
    renderer: DomRenderer,
}

impl Host {
    /// Hand pending events to the DOM.
    fn flush(&mut self, now_ms: f64) {
        let events = self.session.drain_events();
        self.renderer.now_ms = now_ms;
        present(&mut self.renderer, &events);
        self.renderer.prune(now_ms);
    }

    fn frame(&mut self, now_ms: f64) {
        self.session.tick(now_ms);
        self.flush(now_ms);
    }
}

thread_local! {
    static HOST: std::cell::RefCell<Option<Host>> = const { std::cell::RefCell::new(None) };
}

fn with_host(f: impl FnOnce(&mut Host)) {
    HOST.with(|cell| {
        if let Some(host) = cell.borrow_mut().as_mut() {
            f(host);
        }
    });
}

/// Start (or restart) a session on the current page.
pub(crate) fn start(config: GameConfig) -> std::result::Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let area = doc
        .get_element_by_id("gameArea")
        .ok_or_else(|| to_js(GameError::MissingCollaborator("#gameArea element")))?;

    let renderer = DomRenderer::new(doc.clone(), area.clone(), window_size(&win));
    let viewport = Viewport::of(&renderer).map_err(to_js)?;

    let store: Box<dyn StatsStore> = match LocalStorage::open() {
        Ok(store) => Box::new(store),
        Err(err) => {
            tracing::warn!("stats will not persist: {err}");
            Box::new(MemoryStore::new())
        }
    };
    let session = Session::new(config, viewport, store, StdRng::from_entropy(), performance_now());
    renderer.show_stats(session.stats());

    let previous = HOST.with(|cell| cell.replace(Some(Host { session, renderer })));
    let first_start = previous.is_none();
    if let Some(mut old) = previous {
        old.renderer.teardown();
    }
    if first_start {
        install_listeners(&win, &doc, &area)?;
        start_loop();
    }
    Ok(())
}

/// Lifetime stats as JSON, from the running session or from storage.
pub(crate) fn current_stats() -> String {
    let mut json = None;
    with_host(|host| json = Some(host.session.stats().to_json()));
    json.unwrap_or_else(|| {
        LocalStorage::open()
            .map(|store| stats::load_stats(&store))
            .unwrap_or_default()
            .to_json()
    })
}

fn install_listeners(win: &Window, doc: &Document, area: &Element) -> std::result::Result<(), JsValue> {
    // Net follows the cursor.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let (x, y) = (evt.client_x() as f64, evt.client_y() as f64);
            with_host(|host| {
                host.session.pointer_moved(x, y);
                let now = host.session.now_ms();
                host.flush(now);
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Delegated hover: `mouseover` bubbles from the entity div up to the area.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let id = evt
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-entity]").ok().flatten())
                .and_then(|el| el.get_attribute("data-entity"))
                .and_then(|raw| raw.parse::<u32>().ok())
                .map(EntityId::from_raw);
            let Some(id) = id else { return };
            with_host(|host| {
                host.session.hover(id);
                let now = host.session.now_ms();
                host.flush(now);
            });
        }) as Box<dyn FnMut(_)>);
        area.add_event_listener_with_callback("mouseover", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let code = evt.key_code();
            with_host(|host| {
                host.session.key_down(code);
                let now = host.session.now_ms();
                host.flush(now);
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let Some(win) = window() else { return };
            let (w, h) = window_size(&win);
            with_host(|host| match Viewport::new(w, h) {
                Ok(viewport) => {
                    host.renderer.viewport = (w, h);
                    host.session.set_viewport(viewport);
                }
                Err(err) => tracing::debug!("ignoring resize: {err}"),
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_host(|host| host.frame(ts));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}


// --- Console logging ------------------------------------------------------------

/// Route `tracing` events to the browser console. Later calls do nothing.
pub fn init_console_logging() {
    install_console_subscriber();
}

#[cfg(all(feature = "tracing-wasm", target_arch = "wasm32"))]
fn install_console_subscriber() {
    if !tracing::dispatcher::has_been_set() {
        tracing_wasm::set_as_global_default();
    }
}

#[cfg(not(all(feature = "tracing-wasm", target_arch = "wasm32")))]
fn install_console_subscriber() {}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::game::rarity::Rarity;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn renderer() -> DomRenderer {
        let doc = window().unwrap().document().unwrap();
        let area = doc.create_element("div").unwrap();
        doc.body().unwrap().append_child(&area).unwrap();
        DomRenderer::new(doc, area, (800.0, 600.0))
    }

    fn inline_style(el: &Element) -> web_sys::CssStyleDeclaration {
        el.dyn_ref::<HtmlElement>().unwrap().style()
    }

    #[wasm_bindgen_test]
    fn teardown_clears_entities_effects_and_game_over() {
        let mut r = renderer();
        let bug = EntityKind::Bug { rarity: Rarity::Common };
        r.spawn_entity(EntityId::from_raw(0), bug, "🐛", 10.0, 10.0);
        r.spawn_entity(EntityId::from_raw(1), EntityKind::Bomb, "💣", 20.0, 20.0);
        r.show_effect(&Effect::Points(1), 10.0, 10.0);
        r.game_over(3);
        assert_eq!(r.area.child_element_count(), 3);
        assert!(r.doc.get_element_by_id("game-over").is_some());

        r.teardown();
        assert_eq!(r.area.child_element_count(), 0);
        assert!(r.area.query_selector("[data-entity]").unwrap().is_none());
        assert!(r.doc.get_element_by_id("game-over").is_none());
        r.area.remove();
    }

    #[wasm_bindgen_test]
    fn positioning_keeps_other_inline_styles() {
        let mut r = renderer();
        let id = EntityId::from_raw(4);
        r.spawn_entity(id, EntityKind::Bomb, "💣", 1.0, 2.0);
        let el = r.nodes[&id].clone();
        inline_style(&el).set_property("opacity", "0.5").unwrap();
        r.place_entity(id, 30.0, 40.0);
        let style = inline_style(&el);
        assert_eq!(style.get_property_value("left").unwrap(), "30px");
        assert_eq!(style.get_property_value("top").unwrap(), "40px");
        assert_eq!(style.get_property_value("opacity").unwrap(), "0.5");

        let net = r.doc.create_element("div").unwrap();
        net.set_id("character");
        r.doc.body().unwrap().append_child(&net).unwrap();
        r.game_over(0);
        r.display(&GameEvent::NetMoved { x: 5.0, y: 6.0 });
        assert_eq!(inline_style(&net).get_property_value("display").unwrap(), "none");
        assert_eq!(inline_style(&net).get_property_value("left").unwrap(), "5px");

        r.teardown();
        net.remove();
        r.area.remove();
    }

    #[cfg(feature = "tracing-wasm")]
    #[wasm_bindgen_test]
    fn console_logging_installs_a_subscriber_once() {
        init_console_logging();
        init_console_logging();
        assert!(tracing::dispatcher::has_been_set());
    }
}
