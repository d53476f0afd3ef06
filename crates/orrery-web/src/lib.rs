pub mod runner;

pub use runner::OrreryRunner;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<OrreryRunner>> = RefCell::new(None);
}

/// Run `f` against the runner. Calls made before a successful
/// `orrery_init` are logged and return `None`.
fn with_runner<R>(f: impl FnOnce(&mut OrreryRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("orrery not initialized; call orrery_init() first");
                None
            }
        }
    })
}

/// Build the engine from a dataset and an optional config (empty string for
/// defaults). Returns false and keeps any previous engine on failure.
#[wasm_bindgen]
pub fn orrery_init(dataset_json: &str, config_json: &str) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    match OrreryRunner::from_json(dataset_json, config_json) {
        Ok(runner) => {
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("orrery: initialized");
            true
        }
        Err(e) => {
            log::error!("orrery: init failed: {e}");
            false
        }
    }
}

#[wasm_bindgen]
pub fn orrery_tick(dt: f64) {
    with_runner(|r| r.tick(dt));
}

// ---- UI mutation points (applied at the start of the next tick) ----

#[wasm_bindgen]
pub fn orrery_set_realism(realism: f64) {
    with_runner(|r| r.set_realism(realism));
}

#[wasm_bindgen]
pub fn orrery_set_time_scale(time_scale: f64) {
    with_runner(|r| r.set_time_scale(time_scale));
}

#[wasm_bindgen]
pub fn orrery_set_paused(paused: bool) {
    with_runner(|r| r.set_paused(paused));
}

#[wasm_bindgen]
pub fn orrery_set_elapsed(elapsed: f64) {
    with_runner(|r| r.set_elapsed(elapsed));
}

/// Toggle codes: 0 orbit paths, 1 axis indicators, 2 labels.
#[wasm_bindgen]
pub fn orrery_set_toggle(code: u32, on: bool) -> bool {
    with_runner(|r| r.set_toggle(code, on)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn orrery_reload(dataset_json: &str) -> bool {
    with_runner(|r| r.reload(dataset_json)).unwrap_or(false)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_snapshot_ptr() -> *const f32 {
    with_runner(|r| r.snapshot_ptr()).unwrap_or(std::ptr::null())
}

/// Number of body records in the snapshot.
#[wasm_bindgen]
pub fn get_snapshot_len() -> u32 {
    with_runner(|r| r.snapshot_len()).unwrap_or(0)
}

/// Floats per body record.
#[wasm_bindgen]
pub fn get_snapshot_stride() -> u32 {
    with_runner(|r| r.snapshot_floats()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_body_index(key: &str) -> i32 {
    with_runner(|r| r.body_index(key)).unwrap_or(-1)
}

#[wasm_bindgen]
pub fn get_elapsed() -> f64 {
    with_runner(|r| r.elapsed()).unwrap_or(0.0)
}
