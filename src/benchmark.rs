//! Scoped wall-clock timer.

use log::info;
use std::time::{Duration, Instant};

/// Measures the wall-clock time elapsed since it was created.
///
/// A timer created with `Benchmark::reporting` logs its label and elapsed time at info level when
/// it goes out of scope.
///
/// # Examples
///
/// ```
/// use splay_map::benchmark::Benchmark;
/// use splay_map::SplayMap;
///
/// let mut map = SplayMap::new();
/// let b = Benchmark::new("insert");
/// for i in 0..100 {
///     map.insert(i, i);
/// }
/// println!("{}: {:?}", b.label(), b.elapsed());
/// assert_eq!(map.len(), 100);
/// ```
pub struct Benchmark {
    label: String,
    start: Instant,
    report_on_drop: bool,
}

impl Benchmark {
    /// Starts a silent timer.
    pub fn new<L>(label: L) -> Self
    where
        L: Into<String>,
    {
        Benchmark {
            label: label.into(),
            start: Instant::now(),
            report_on_drop: false,
        }
    }

    /// Starts a timer that logs its elapsed time when dropped.
    pub fn reporting<L>(label: L) -> Self
    where
        L: Into<String>,
    {
        Benchmark {
            label: label.into(),
            start: Instant::now(),
            report_on_drop: true,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Benchmark {
    fn drop(&mut self) {
        if self.report_on_drop {
            info!("{}: {:?}", self.label, self.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Benchmark;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_elapsed() {
        let b = Benchmark::new("sleep");
        thread::sleep(Duration::from_millis(5));
        let first = b.elapsed();
        assert!(first >= Duration::from_millis(5));
        assert!(b.elapsed() >= first);
    }

    #[test]
    fn test_label() {
        assert_eq!(Benchmark::reporting("insert").label(), "insert");
        assert_eq!(Benchmark::new(String::from("get")).label(), "get");
    }
}
