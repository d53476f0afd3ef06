pub mod orbit_path;
