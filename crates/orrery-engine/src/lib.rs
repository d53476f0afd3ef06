pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::engine::{Engine, EngineConfig, ReloadOutcome};
pub use api::types::{BodyId, BodyKind, TidalLockOverride, VisualToggle, VisualToggles};
pub use assets::dataset::{BodyRecord, Dataset};
pub use components::body::{BodyConstants, BodyState};
pub use core::orbit::OrbitalElements;
pub use core::resolver::{resolve_order, ResolvedOrder};
pub use core::scale::{ProfilePair, ScaleAnchor, TypeScaleProfile, VisualScaleContext};
pub use core::spin::{SpinState, TidalLockSettings};
pub use core::system::StarSystem;
pub use core::time::SimulationClock;
pub use input::queue::{Command, CommandQueue};
pub use bridge::snapshot::{BodySnapshot, SnapshotBuffer};
pub use systems::orbit_path::OrbitPathCache;
pub use error::{ConfigError, ConfigResult};
