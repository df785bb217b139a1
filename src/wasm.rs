//! Browser bindings
//!
//! The page owns rendering and `requestAnimationFrame`; it forwards frame
//! timestamps and button edges here and reads snapshots back as JSON.

use wasm_bindgen::prelude::*;

use crate::catalog::{CatalogError, TokenCatalog};
use crate::config::{GameConfig, Viewport};
use crate::engine::GameEngine;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Already set when the module is re-instantiated
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("River Swimmer core loaded");
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WasmGame {
    engine: GameEngine,
}

#[wasm_bindgen]
impl WasmGame {
    /// `viewport` is "desktop" or "mobile"; unknown values use desktop
    #[wasm_bindgen(constructor)]
    pub fn new(viewport: &str) -> WasmGame {
        let viewport = Viewport::parse(viewport).unwrap_or_default();
        let seed = js_sys::Date::now() as u64;
        log::info!("New {} game, seed {seed}", viewport.as_str());
        WasmGame {
            engine: GameEngine::with_seed(GameConfig::from_viewport(viewport), seed),
        }
    }

    #[wasm_bindgen(js_name = splashComplete)]
    pub fn splash_complete(&mut self) -> Result<(), JsValue> {
        self.engine.splash_complete().map_err(js_err)
    }

    /// Feed the raw trending-token response body
    #[wasm_bindgen(js_name = catalogLoaded)]
    pub fn catalog_loaded(&mut self, body: &str, now_ms: f64) -> Result<(), JsValue> {
        let limit = self.engine.config().catalog_limit;
        let catalog = TokenCatalog::from_trending_json(body, limit);
        self.engine.catalog_loaded(catalog, now_ms).map_err(js_err)
    }

    /// Report a failed fetch (network error, bad status)
    #[wasm_bindgen(js_name = catalogFailed)]
    pub fn catalog_failed(&mut self, reason: &str, now_ms: f64) -> Result<(), JsValue> {
        let failure = Err(CatalogError::Unavailable(reason.to_string()));
        self.engine.catalog_loaded(failure, now_ms).map_err(js_err)
    }

    #[wasm_bindgen(js_name = catalogError)]
    pub fn catalog_error(&self) -> Option<String> {
        self.engine.catalog_error().map(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = retryCatalog)]
    pub fn retry_catalog(&mut self) -> Result<(), JsValue> {
        self.engine.retry_catalog().map_err(js_err)
    }

    #[wasm_bindgen(js_name = actionPressed)]
    pub fn action_pressed(&mut self) {
        self.engine.action_pressed();
    }

    #[wasm_bindgen(js_name = actionReleased)]
    pub fn action_released(&mut self) {
        self.engine.action_released();
    }

    /// Returns false once the loop should stop requesting frames
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.engine.frame(now_ms)
    }

    pub fn burn(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.engine.burn(now_ms).map_err(js_err)
    }

    #[wasm_bindgen(js_name = canSkip)]
    pub fn can_skip(&self) -> bool {
        self.engine.can_skip()
    }

    #[wasm_bindgen(js_name = skipBurn)]
    pub fn skip_burn(&mut self) -> Result<(), JsValue> {
        self.engine.skip_burn().map_err(js_err)
    }

    /// Ends the run; returns the `{score, rewardEarned}` submission as JSON
    #[wasm_bindgen(js_name = endRun)]
    pub fn end_run(&mut self) -> Result<String, JsValue> {
        let submission = self.engine.end_run().map_err(js_err)?;
        serde_json::to_string(&submission).map_err(js_err)
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.engine.restart().map_err(js_err)
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// Current phase name
    pub fn phase(&self) -> String {
        format!("{:?}", self.engine.phase())
    }

    /// Full snapshot as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&*self.engine.snapshot()).map_err(js_err)
    }
}
