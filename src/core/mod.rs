pub mod error;
pub mod fuzzy;
pub mod settings;

use std::time::Instant;

pub const PRESET_ENV: &str = "FUZZY_PRESET";
pub const WORKERS_ENV: &str = "FUZZY_WORKERS";
pub const DEFAULT_PRESET: &str = "presets/tipping.json";

pub fn measure_time<T, F: FnOnce() -> T>(f: F, msg: &str) -> T {
    let now = Instant::now();
    let result = f();
    log::debug!("{}, time elapsed: {}ms", msg, now.elapsed().as_millis());
    result
}
