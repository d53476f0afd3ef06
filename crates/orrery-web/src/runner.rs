use orrery_engine::{
    BodySnapshot, Command, ConfigResult, Dataset, Engine, EngineConfig, VisualToggle,
};

/// Wires the engine to the browser.
///
/// wasm-bindgen cannot export the engine directly, so the crate keeps one
/// `OrreryRunner` in a `thread_local!` and exposes free functions over it.
/// Every UI mutation is queued and lands at the start of the next tick.
pub struct OrreryRunner {
    engine: Engine,
}

impl OrreryRunner {
    /// Build from JSON. An empty config string means all defaults.
    pub fn from_json(dataset_json: &str, config_json: &str) -> ConfigResult<Self> {
        let dataset = Dataset::from_json(dataset_json)?;
        let config = if config_json.trim().is_empty() {
            EngineConfig::default()
        } else {
            EngineConfig::from_json(config_json)?
        };
        Ok(Self {
            engine: Engine::new(dataset, config)?,
        })
    }

    /// Run one frame. `dt` is real seconds since the previous frame.
    pub fn tick(&mut self, dt: f64) {
        self.engine.tick(dt);
    }

    pub fn set_realism(&mut self, realism: f64) {
        self.engine.push(Command::SetRealism(realism));
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.engine.push(Command::SetTimeScale(time_scale));
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.engine.push(Command::SetPaused(paused));
    }

    pub fn set_elapsed(&mut self, elapsed: f64) {
        self.engine.push(Command::SetElapsed(elapsed));
    }

    /// Returns false for an unknown toggle code.
    pub fn set_toggle(&mut self, code: u32, on: bool) -> bool {
        match VisualToggle::from_code(code) {
            Some(toggle) => {
                self.engine.push(Command::SetToggle(toggle, on));
                true
            }
            None => {
                log::warn!("unknown visual toggle {code}");
                false
            }
        }
    }

    /// Queue a reload. Returns false if the JSON doesn't parse; structural
    /// problems (cycles, missing reference) are reported when it's applied.
    pub fn reload(&mut self, dataset_json: &str) -> bool {
        match Dataset::from_json(dataset_json) {
            Ok(dataset) => {
                self.engine.push(Command::Reload(dataset));
                true
            }
            Err(e) => {
                log::error!("reload: {e}");
                false
            }
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    // ---- Pointer accessors for wasm memory reads ----

    pub fn snapshot_ptr(&self) -> *const f32 {
        self.engine.snapshot().ptr()
    }

    pub fn snapshot_len(&self) -> u32 {
        self.engine.snapshot().len() as u32
    }

    pub fn snapshot_floats(&self) -> u32 {
        BodySnapshot::FLOATS as u32
    }

    /// Slot of a body in the snapshot, or -1.
    pub fn body_index(&self, key: &str) -> i32 {
        self.engine
            .system()
            .id_of(key)
            .map_or(-1, |id| id.0 as i32)
    }

    pub fn elapsed(&self) -> f64 {
        self.engine.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM: &str = r#"{
        "bodies": [
            { "id": "sun", "is_reference": true, "kind": "star", "radius_km": 695700.0 },
            {
                "id": "earth", "kind": "planet", "parent_id": "sun", "order_from_parent": 3,
                "radius_km": 6371.0, "semi_major_axis_km": 149598023.0,
                "eccentricity": 0.0167, "orbital_period_s": 31558149.8
            }
        ]
    }"#;

    #[test]
    fn init_from_json_with_default_config() {
        let runner = OrreryRunner::from_json(SYSTEM, "").unwrap();
        assert_eq!(runner.snapshot_len(), 2);
        assert_eq!(runner.body_index("earth"), 1);
        assert_eq!(runner.body_index("vulcan"), -1);
    }

    #[test]
    fn setters_apply_on_next_tick() {
        let mut runner = OrreryRunner::from_json(SYSTEM, r#"{ "time_scale": 2.0 }"#).unwrap();
        runner.set_time_scale(100.0);
        runner.set_paused(false);
        assert!(runner.set_toggle(1, true));
        assert!(!runner.set_toggle(42, true));
        runner.tick(1.0);
        assert_eq!(runner.elapsed(), 100.0);
        assert!(runner.engine().toggles().axis_indicators);
    }

    #[test]
    fn bad_json_is_rejected() {
        assert!(OrreryRunner::from_json("{", "").is_err());
        let mut runner = OrreryRunner::from_json(SYSTEM, "").unwrap();
        assert!(!runner.reload("[1, 2"));
        assert_eq!(runner.engine().pending_commands(), 0);
    }
}
