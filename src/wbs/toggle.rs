//! Date-range toggling for calendar cell clicks.

use chrono::NaiveDate;

use crate::models::DateRange;

/// Compute a leaf node's new schedule after a click on `clicked`.
///
/// Outside clicks grow the bar, inside clicks collapse it to the clicked day:
///
/// | current            | click                   | result            |
/// |--------------------|-------------------------|-------------------|
/// | unscheduled        | any day                 | that single day   |
/// | single day `d`     | `d`                     | unscheduled       |
/// | `start..=end`      | before `start`          | `clicked..=end`   |
/// | `start..=end`      | after `end`             | `start..=clicked` |
/// | `start..=end`      | within the range        | `clicked..=clicked` |
pub fn toggle(current: Option<DateRange>, clicked: NaiveDate) -> Option<DateRange> {
    let Some(range) = current else {
        return Some(DateRange::single(clicked));
    };

    if range.is_single_day() && range.start == clicked {
        None
    } else if clicked < range.start {
        Some(DateRange {
            start: clicked,
            end: range.end,
        })
    } else if clicked > range.end {
        Some(DateRange {
            start: range.start,
            end: clicked,
        })
    } else {
        Some(DateRange::single(clicked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn range(start: &str, end: &str) -> Option<DateRange> {
        Some(DateRange {
            start: day(start),
            end: day(end),
        })
    }

    #[test]
    fn selects_clicked_day_when_unscheduled() {
        let result = toggle(None, day("2026-03-05"));
        assert_eq!(result, range("2026-03-05", "2026-03-05"));
        assert_eq!(result.unwrap().days(), 1);
    }

    #[test]
    fn reclicking_single_day_clears_it() {
        let result = toggle(range("2026-03-05", "2026-03-05"), day("2026-03-05"));
        assert_eq!(result, None);
    }

    #[test]
    fn click_before_start_extends_backward() {
        let result = toggle(range("2026-03-05", "2026-03-10"), day("2026-03-01"));
        assert_eq!(result, range("2026-03-01", "2026-03-10"));
        assert_eq!(result.unwrap().days(), 10);
    }

    #[test]
    fn click_after_end_extends_forward() {
        let result = toggle(range("2026-03-05", "2026-03-10"), day("2026-03-20"));
        assert_eq!(result, range("2026-03-05", "2026-03-20"));
    }

    #[test]
    fn click_inside_collapses_to_single_day() {
        let result = toggle(range("2026-03-01", "2026-03-10"), day("2026-03-05"));
        assert_eq!(result, range("2026-03-05", "2026-03-05"));
        assert_eq!(result.unwrap().days(), 1);
    }

    #[test]
    fn click_on_edge_of_multi_day_range_collapses() {
        assert_eq!(
            toggle(range("2026-03-01", "2026-03-10"), day("2026-03-01")),
            range("2026-03-01", "2026-03-01")
        );
        assert_eq!(
            toggle(range("2026-03-01", "2026-03-10"), day("2026-03-10")),
            range("2026-03-10", "2026-03-10")
        );
    }

    #[test]
    fn single_day_click_elsewhere_extends() {
        assert_eq!(
            toggle(range("2026-03-05", "2026-03-05"), day("2026-03-07")),
            range("2026-03-05", "2026-03-07")
        );
    }

    #[test]
    fn extension_crosses_month_boundary() {
        let result = toggle(range("2026-01-30", "2026-01-31"), day("2026-02-02")).unwrap();
        assert_eq!(result.days(), 4);
    }
}
