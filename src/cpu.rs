//! The one piece of CPU topology this crate sources from outside sysfs:
//! how many CPUs are online, used as the fallback CPU set when a PMU
//! instance publishes neither `cpus` nor `cpumask`.

use crate::parse::Range;

/// Number of CPUs currently online, via `sysconf(_SC_NPROCESSORS_ONLN)` —
/// the same libc entry point `perfcnt` reaches for when it needs the
/// host's CPU count.
pub fn online_cpu_count() -> u64 {
    let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
    if n < 1 {
        1
    } else {
        n as u64
    }
}

/// `[0, online_cpu_count() - 1]` as a single range.
pub fn default_cpu_range() -> Range {
    Range {
        start: 0,
        end: online_cpu_count() - 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn online_cpu_count_is_at_least_one() {
        assert!(online_cpu_count() >= 1);
    }

    #[test]
    fn default_cpu_range_starts_at_zero() {
        let r = default_cpu_range();
        assert_eq!(r.start, 0);
        assert!(r.end >= r.start);
    }
}
