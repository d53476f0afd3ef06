use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, VisualToggle, VisualToggles};
use crate::assets::dataset::Dataset;
use crate::bridge::snapshot::SnapshotBuffer;
use crate::components::body::BodyState;
use crate::core::resolver;
use crate::core::scale::VisualScaleContext;
use crate::core::spin::TidalLockSettings;
use crate::core::system::StarSystem;
use crate::core::time::SimulationClock;
use crate::error::ConfigResult;
use crate::input::queue::{Command, CommandQueue};

/// Configuration for the engine, provided by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulated seconds per real second (default: one day).
    pub time_scale: f64,
    /// Simulated time at startup, seconds since the epoch.
    pub start_elapsed: f64,
    pub start_paused: bool,
    pub tidal_lock: TidalLockSettings,
    pub scale: VisualScaleContext,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_scale: 86_400.0,
            start_elapsed: 0.0,
            start_paused: false,
            tidal_lock: TidalLockSettings::default(),
            scale: VisualScaleContext::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// How a reload was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Same bodies in the same layout: records re-applied, ids kept.
    InPlace,
    /// The body set or hierarchy changed: everything was respawned.
    Respawned,
}

/// The orrery: a star system, its clock, its scale context and the queue of
/// pending UI commands.
pub struct Engine {
    dataset: Dataset,
    system: StarSystem,
    scale: VisualScaleContext,
    lock: TidalLockSettings,
    toggles: VisualToggles,
    clock: SimulationClock,
    time_scale: f64,
    commands: CommandQueue,
    snapshot: SnapshotBuffer,
}

impl Engine {
    /// Resolve and spawn `dataset`, then solve it once at the start time so
    /// every body has a valid transform before the first tick.
    pub fn new(dataset: Dataset, config: EngineConfig) -> ConfigResult<Self> {
        let system = StarSystem::build(&dataset, &config.scale)?;
        let mut clock = SimulationClock::starting_at(config.start_elapsed);
        clock.set_paused(config.start_paused);

        let mut engine = Self {
            dataset,
            system,
            scale: config.scale,
            lock: config.tidal_lock,
            toggles: VisualToggles::default(),
            clock,
            time_scale: config.time_scale,
            commands: CommandQueue::new(),
            snapshot: SnapshotBuffer::new(),
        };
        engine.solve();
        log::info!("orrery: {} bodies ready", engine.system.len());
        Ok(engine)
    }

    /// Queue a command for the start of the next tick.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Run one frame: apply queued commands, advance the clock by
    /// `real_delta` seconds, then solve every body.
    pub fn tick(&mut self, real_delta: f64) {
        for command in self.commands.drain() {
            self.apply(command);
        }
        self.clock.advance(real_delta, self.time_scale);
        self.solve();
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SetRealism(w) => self.set_realism(w),
            Command::SetTimeScale(s) => self.set_time_scale(s),
            Command::SetPaused(p) => self.clock.set_paused(p),
            Command::SetElapsed(t) => self.clock.set_elapsed(t),
            Command::SetToggle(toggle, on) => self.set_toggle(toggle, on),
            Command::Reload(dataset) => {
                if let Err(e) = self.reload(dataset) {
                    log::error!("reload rejected, keeping current system: {e}");
                }
            }
        }
    }

    fn solve(&mut self) {
        self.system
            .update(self.clock.elapsed(), &self.scale, &self.lock, &self.toggles);
        self.snapshot.rebuild(&self.system);
    }

    /// Replace the dataset. Bodies keep their ids when the id set and the
    /// resolved hierarchy are unchanged; otherwise the system is respawned.
    /// On error the current system is left untouched.
    pub fn reload(&mut self, dataset: Dataset) -> ConfigResult<ReloadOutcome> {
        let resolved = resolver::resolve_order(&dataset.bodies)?;
        let same_ids = dataset.id_set() == self.dataset.id_set();

        let outcome = if same_ids && self.system.matches_layout(&dataset.bodies, &resolved) {
            self.system.reapply(&dataset.bodies, &resolved);
            ReloadOutcome::InPlace
        } else {
            self.system = StarSystem::from_resolved(&dataset.bodies, &resolved, &self.scale);
            ReloadOutcome::Respawned
        };
        log::info!("reloaded {} bodies: {outcome:?}", dataset.len());

        self.dataset = dataset;
        self.solve();
        Ok(outcome)
    }

    // -- Immediate setters (queued variants go through `push`) --

    pub fn set_realism(&mut self, realism: f64) {
        self.scale.set_realism(realism);
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        if time_scale.is_finite() {
            self.time_scale = time_scale;
        } else {
            log::warn!("ignoring non-finite time scale {time_scale}");
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.clock.set_paused(paused);
    }

    pub fn set_elapsed(&mut self, elapsed: f64) {
        self.clock.set_elapsed(elapsed);
    }

    pub fn set_toggle(&mut self, toggle: VisualToggle, on: bool) {
        self.toggles.set(toggle, on);
    }

    pub fn set_tidal_lock(&mut self, settings: TidalLockSettings) {
        self.lock = settings;
    }

    /// Mutable scale context. Its setters bump the generation, so any
    /// change is picked up on the next tick.
    pub fn scale_mut(&mut self) -> &mut VisualScaleContext {
        &mut self.scale
    }

    // -- Queries --

    pub fn system(&self) -> &StarSystem {
        &self.system
    }

    pub fn body(&self, id: BodyId) -> Option<&BodyState> {
        self.system.get(id)
    }

    pub fn find(&self, key: &str) -> Option<&BodyState> {
        self.system.find(key)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn scale(&self) -> &VisualScaleContext {
        &self.scale
    }

    pub fn tidal_lock(&self) -> &TidalLockSettings {
        &self.lock
    }

    pub fn toggles(&self) -> VisualToggles {
        self.toggles
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Flat per-body snapshot, rebuilt after every solve.
    pub fn snapshot(&self) -> &SnapshotBuffer {
        &self.snapshot
    }
}
