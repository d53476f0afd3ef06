use orrery_engine::{
    BodyKind, BodyRecord, Command, ConfigError, Dataset, Engine, EngineConfig, ReloadOutcome,
    SpinState, TidalLockOverride, VisualToggle,
};

const DAY: f64 = 86_400.0;

fn solar_system() -> Dataset {
    Dataset::new(vec![
        BodyRecord::star("sun", 695_700.0).with_rotation(25.38 * DAY, 7.25),
        BodyRecord::new("mercury", BodyKind::Planet, 2_439.7)
            .with_parent("sun")
            .with_order(1)
            .with_orbit(57_909_050.0, 0.2056, 87.969 * DAY)
            .with_orientation(7.005, 48.331, 29.124)
            .with_rotation(58.646 * DAY, 0.03),
        BodyRecord::new("venus", BodyKind::Planet, 6_051.8)
            .with_parent("sun")
            .with_order(2)
            .with_orbit(108_208_000.0, 0.0068, 224.701 * DAY)
            .with_orientation(3.395, 76.68, 54.884)
            .with_rotation(-243.025 * DAY, 177.36),
        BodyRecord::new("earth", BodyKind::Planet, 6_371.0)
            .with_parent("sun")
            .with_order(3)
            .with_orbit(149_598_023.0, 0.0167, 365.256 * DAY)
            .with_orientation(0.0, -11.26, 114.208)
            .with_rotation(0.99727 * DAY, 23.44)
            .with_multipliers(Some(21.842), None),
        BodyRecord::new("moon", BodyKind::Moon, 1_737.4)
            .with_parent("earth")
            .with_order(1)
            .with_orbit(384_400.0, 0.0549, 27.322 * DAY)
            .with_orientation(5.145, 125.08, 318.15)
            .with_rotation(27.322 * DAY, 6.68),
        BodyRecord::new("mars", BodyKind::Planet, 3_389.5)
            .with_parent("sun")
            .with_order(4)
            .with_orbit(227_939_200.0, 0.0934, 686.98 * DAY)
            .with_orientation(1.85, 49.558, 286.502)
            .with_rotation(1.025_96 * DAY, 25.19),
        BodyRecord::new("phobos", BodyKind::Moon, 11.27)
            .with_parent("mars")
            .with_order(1)
            .with_orbit(9_376.0, 0.0151, 0.318_91 * DAY)
            .with_rotation(0.318_91 * DAY, 0.0)
            .aligned_to_parent_equator(),
        BodyRecord::new("jupiter", BodyKind::Planet, 69_911.0)
            .with_parent("sun")
            .with_order(5)
            .with_orbit(778_570_000.0, 0.0489, 4_332.59 * DAY)
            .with_orientation(1.303, 100.464, 273.867)
            .with_rotation(0.413_54 * DAY, 3.13),
    ])
}

fn engine() -> Engine {
    Engine::new(solar_system(), EngineConfig::default()).unwrap()
}

#[test]
fn bodies_resolve_parents_first() {
    let engine = engine();
    let keys: Vec<&str> = engine.system().iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys[0], "sun");
    for body in engine.system().iter() {
        if let Some(parent) = body.parent {
            assert!(parent < body.id, "{} spawned before its parent", body.key);
        }
    }
}

#[test]
fn positions_repeat_after_one_period() {
    let mut engine = engine();
    let period = 365.256 * DAY;
    engine.push(Command::SetElapsed(123.0 * DAY));
    engine.tick(0.0);
    let first = engine.find("earth").unwrap().local_offset;
    engine.push(Command::SetElapsed(123.0 * DAY + period));
    engine.tick(0.0);
    let second = engine.find("earth").unwrap().local_offset;
    assert!((first - second).length() < 1e-6 * first.length());
}

#[test]
fn commands_apply_at_tick_start() {
    let mut engine = engine();
    let schematic = engine.find("earth").unwrap().diameter;
    engine.push(Command::SetRealism(1.0));
    assert_eq!(engine.find("earth").unwrap().diameter, schematic);

    engine.tick(0.0);
    let realistic = engine.find("earth").unwrap().diameter;
    assert!(realistic < schematic);
    assert!((realistic - 6_371.0 / 695_700.0).abs() < 1e-12);
}

#[test]
fn pause_freezes_time() {
    let mut engine = engine();
    engine.push(Command::SetPaused(true));
    engine.tick(1.0);
    let frozen = engine.find("mars").unwrap().position;
    engine.tick(1.0);
    assert_eq!(engine.elapsed(), 0.0);
    assert_eq!(engine.find("mars").unwrap().position, frozen);

    engine.push(Command::SetPaused(false));
    engine.tick(1.0);
    assert_eq!(engine.elapsed(), DAY);
    assert_ne!(engine.find("mars").unwrap().position, frozen);
}

#[test]
fn moons_lock_and_planets_spin() {
    let mut engine = engine();
    engine.tick(3.0);
    let system = engine.system();
    assert_eq!(system.find("moon").unwrap().spin_state, SpinState::TidalLocked);
    assert_eq!(system.find("phobos").unwrap().spin_state, SpinState::TidalLocked);
    assert_eq!(system.find("earth").unwrap().spin_state, SpinState::FreeSpin);
    assert_eq!(system.find("venus").unwrap().spin_state, SpinState::FreeSpin);
    assert!(engine.snapshot().bodies().iter().all(|s| s.qw.is_finite()));
}

#[test]
fn orbit_paths_respect_the_toggle() {
    let mut engine = engine();
    let mars = engine.system().id_of("mars").unwrap();
    assert_eq!(engine.system().orbit_path(mars).len(), engine.scale().orbit_path_samples());

    engine.push(Command::SetToggle(VisualToggle::OrbitPaths, false));
    engine.push(Command::SetRealism(0.5));
    engine.tick(0.0);
    let stale = engine.system().orbit_path(mars)[0];

    engine.push(Command::SetToggle(VisualToggle::OrbitPaths, true));
    engine.tick(0.0);
    let fresh = engine.system().orbit_path(mars)[0];
    assert!((stale - fresh).length() > 1e-9);
}

#[test]
fn reload_in_place_keeps_ids() {
    let mut engine = engine();
    let earth_id = engine.system().id_of("earth").unwrap();
    let before = engine.find("earth").unwrap().diameter;

    let mut data = solar_system();
    for body in &mut data.bodies {
        if body.id == "earth" {
            body.radius_km *= 2.0;
        }
    }
    let outcome = engine.reload(data).unwrap();

    assert_eq!(outcome, ReloadOutcome::InPlace);
    assert_eq!(engine.system().id_of("earth"), Some(earth_id));
    let after = engine.find("earth").unwrap().diameter;
    assert!((after - 2.0 * before).abs() < 1e-12);
}

#[test]
fn reload_with_new_bodies_respawns() {
    let mut engine = engine();
    let mut data = solar_system();
    data.bodies.push(
        BodyRecord::new("ceres", BodyKind::DwarfPlanet, 469.7)
            .with_parent("sun")
            .with_order(5)
            .with_orbit(413_690_250.0, 0.0758, 1_680.0 * DAY),
    );
    assert_eq!(engine.reload(data).unwrap(), ReloadOutcome::Respawned);
    assert_eq!(engine.system().len(), 9);
    assert!(engine.find("ceres").unwrap().is_initialized());
}

#[test]
fn reload_with_new_hierarchy_respawns() {
    let mut engine = engine();
    let mut data = solar_system();
    for body in &mut data.bodies {
        if body.id == "phobos" {
            body.parent_id = Some("earth".to_string());
        }
    }
    assert_eq!(engine.reload(data).unwrap(), ReloadOutcome::Respawned);
    let phobos = engine.find("phobos").unwrap();
    assert_eq!(phobos.parent, engine.system().id_of("earth"));
}

#[test]
fn cyclic_reload_is_rejected() {
    let mut engine = engine();
    let mut data = solar_system();
    for body in &mut data.bodies {
        if body.id == "earth" {
            body.parent_id = Some("moon".to_string());
        }
    }
    match engine.reload(data.clone()) {
        Err(ConfigError::ParentCycle(ids)) => assert_eq!(ids, ["earth", "moon"]),
        other => panic!("expected a cycle error, got {other:?}"),
    }
    assert_eq!(engine.find("moon").unwrap().parent, engine.system().id_of("earth"));

    engine.push(Command::Reload(data));
    engine.tick(0.0);
    assert_eq!(engine.system().len(), 8);
}

#[test]
fn engine_loads_from_json() {
    let json = r#"{
        "bodies": [
            { "id": "sun", "is_reference": true, "kind": "star", "radius_km": 695700.0 },
            { "id": "pluto", "kind": "dwarf_planet", "parent_id": "sun", "order_from_parent": 9,
              "radius_km": 1188.3, "semi_major_axis_km": 5906376272.0, "eccentricity": 0.2488,
              "inclination_deg": 17.16, "orbital_period_s": 7818640800.0,
              "rotation_period_s": -551856.7, "axial_tilt_deg": 122.53 },
            { "id": "charon", "kind": "moon", "parent_id": "pluto", "radius_km": 606.0,
              "semi_major_axis_km": 19591.0, "orbital_period_s": 551856.7,
              "rotation_period_s": 551856.7 }
        ]
    }"#;
    let config = EngineConfig::from_json(r#"{ "scale": { "realism": 0.25 } }"#).unwrap();
    let mut engine = Engine::new(Dataset::from_json(json).unwrap(), config).unwrap();
    assert_eq!(engine.scale().realism(), 0.25);
    engine.tick(1.0);

    let charon = engine.find("charon").unwrap();
    let pluto = engine.find("pluto").unwrap();
    assert_eq!(charon.spin_state, SpinState::TidalLocked);
    let minimum = (pluto.diameter + charon.diameter) / 2.0 + engine.scale().moon_clearance();
    assert!(charon.local_offset.length() >= minimum - 1e-12);
}

fn with_earth(edit: impl Fn(BodyRecord) -> BodyRecord) -> Engine {
    let mut data = solar_system();
    for body in &mut data.bodies {
        if body.id == "earth" {
            *body = edit(body.clone());
        }
    }
    Engine::new(data, EngineConfig::default()).unwrap()
}

#[test]
fn initial_phase_matches_a_later_start() {
    let period = 365.256 * DAY;
    let shifted = with_earth(|earth| earth.with_phase(90.0));
    let mut plain = engine();
    plain.push(Command::SetElapsed(period / 4.0));
    plain.tick(0.0);

    let a = shifted.find("earth").unwrap().local_offset;
    let b = plain.find("earth").unwrap().local_offset;
    assert!((a - b).length() < 1e-9 * a.length());

    let by_anomaly = with_earth(|earth| earth.with_mean_anomaly(90.0));
    let c = by_anomaly.find("earth").unwrap().local_offset;
    assert!((a - c).length() < 1e-9 * a.length());
}

#[test]
fn forced_lock_overrides_a_free_spinning_planet() {
    let mut engine = with_earth(|earth| earth.with_tidal_lock(TidalLockOverride::ForceOn));
    engine.tick(10.0);
    assert_eq!(engine.find("earth").unwrap().spin_state, SpinState::TidalLocked);
    assert_eq!(engine.find("mars").unwrap().spin_state, SpinState::FreeSpin);

    let mut engine = with_earth(|earth| earth.with_tidal_lock(TidalLockOverride::ForceOff));
    engine.tick(10.0);
    assert_eq!(engine.find("earth").unwrap().spin_state, SpinState::FreeSpin);
    assert_eq!(engine.find("moon").unwrap().spin_state, SpinState::TidalLocked);
}

#[test]
fn duplicate_records_are_dropped() {
    let mut data = solar_system();
    data.bodies.push(
        BodyRecord::new("earth", BodyKind::Planet, 1.0)
            .with_parent("jupiter")
            .with_orbit(1.0e6, 0.0, DAY),
    );
    let engine = Engine::new(data, EngineConfig::default()).unwrap();
    assert_eq!(engine.system().len(), 8);
    let earth = engine.find("earth").unwrap();
    assert_eq!(earth.constants.radius_km, 6_371.0);
    assert_eq!(engine.find("moon").unwrap().parent, Some(earth.id));
}
