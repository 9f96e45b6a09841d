//! Time-range evaluator (§4.B).
//!
//! Midnight-crossing and degenerate "always-on" windows are the two
//! subtleties that earn this its own module — everything else is a
//! one-line comparison.

use crate::model::{TimeOfDay, TimeWindow};

/// True iff `t` falls in `[window.start, window.end)`, honoring:
/// - `start == end` ⇒ always true (degenerate always-on window),
/// - `start > end` ⇒ midnight-crossing, true iff `t >= start || t < end`,
/// - `start < end` ⇒ plain half-open range.
pub fn time_in_range(t: TimeOfDay, window: TimeWindow) -> bool {
    let (start, end) = (
        window.start.minutes_since_midnight(),
        window.end.minutes_since_midnight(),
    );
    let now = t.minutes_since_midnight();

    if start == end {
        true
    } else if start < end {
        now >= start && now < end
    } else {
        now >= start || now < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tod(h: u8, m: u8) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    fn window(sh: u8, sm: u8, eh: u8, em: u8) -> TimeWindow {
        TimeWindow {
            start: tod(sh, sm),
            end: tod(eh, em),
        }
    }

    #[test]
    fn plain_range_start_inclusive_end_exclusive() {
        let w = window(9, 0, 17, 0);
        assert!(time_in_range(tod(9, 0), w));
        assert!(time_in_range(tod(12, 0), w));
        assert!(!time_in_range(tod(17, 0), w));
        assert!(time_in_range(tod(16, 59), w));
        assert!(!time_in_range(tod(8, 59), w));
    }

    #[test]
    fn degenerate_start_equals_end_is_always_on() {
        let w = window(10, 0, 10, 0);
        assert!(time_in_range(tod(0, 0), w));
        assert!(time_in_range(tod(10, 0), w));
        assert!(time_in_range(tod(23, 59), w));
    }

    #[test]
    fn midnight_crossing_window() {
        let w = window(22, 0, 6, 0);
        assert!(time_in_range(tod(23, 0), w));
        assert!(time_in_range(tod(5, 30), w));
        assert!(time_in_range(tod(22, 0), w));
        assert!(!time_in_range(tod(6, 0), w));
        assert!(!time_in_range(tod(14, 0), w));
    }

    #[test]
    fn midnight_crossing_symmetry_property() {
        // The set of matching instants over 24h equals [s, 24:00) u [00:00, e).
        let w = window(22, 0, 6, 0);
        for minute in 0..24 * 60u16 {
            let h = (minute / 60) as u8;
            let m = (minute % 60) as u8;
            let t = tod(h, m);
            let expected = minute >= 22 * 60 || minute < 6 * 60;
            assert_eq!(time_in_range(t, w), expected, "minute={minute}");
        }
    }

    #[test]
    fn exclusive_end_boundary_property() {
        let w = window(9, 0, 17, 0);
        assert!(!time_in_range(tod(17, 0), w));
        assert!(time_in_range(tod(16, 59), w));
    }
}
