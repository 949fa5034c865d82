use std::{fmt::Display, time::Instant};

use chrono::Local;

/// Runs `f`, then reports how long it took on stderr.
pub fn timeit<T, F: FnOnce() -> T>(label: &str, f: F) -> T {
    let t0 = Instant::now();
    let out = f();
    eprintln!("{label:<20}{:?}", t0.elapsed());
    out
}

/// `[HH:MM:SS] msg` on stderr.
pub fn log(msg: impl Display) {
    eprintln!("[{}] {msg}", Local::now().format("%H:%M:%S"));
}
