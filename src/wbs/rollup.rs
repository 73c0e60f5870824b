//! Bottom-up aggregation of child schedules into their parents.

use crate::models::{DateRange, WbsNode};

/// Recompute every parent's schedule as the span of its direct children.
///
/// The sequence is scanned once, last row to first. A row is only ever read as
/// a child by rows before it, which the reverse scan visits later, so every
/// child is final by the time its parent aggregates it. This makes the rollup
/// transitive: a root sees the already aggregated spans of its sub-groups.
///
/// - Leaves are left untouched.
/// - A parent whose children are all unscheduled becomes unscheduled, even if
///   it had a schedule of its own before it gained children.
/// - Non-overlapping children yield a span covering the gap between them.
///
/// Returns the number of parent rows whose schedule changed.
pub fn rollup(nodes: &mut [WbsNode]) -> usize {
    let mut changed = 0;

    for i in (0..nodes.len()).rev() {
        let level = nodes[i].level;
        let mut has_children = false;
        let mut span: Option<DateRange> = None;

        for child in nodes[i + 1..]
            .iter()
            .take_while(|n| n.level > level)
            .filter(|n| n.level == level + 1)
        {
            has_children = true;
            if let Some(range) = child.schedule {
                span = Some(match span {
                    Some(acc) => acc.cover(&range),
                    None => range,
                });
            }
        }

        if has_children && nodes[i].schedule != span {
            nodes[i].schedule = span;
            changed += 1;
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn node(level: u8, span: Option<(&str, &str)>) -> WbsNode {
        let mut node = WbsNode::new(level);
        node.schedule = span.map(|(start, end)| DateRange {
            start: day(start),
            end: day(end),
        });
        node
    }

    #[test]
    fn parent_spans_its_children() {
        let mut nodes = vec![
            node(0, None),
            node(1, Some(("2026-01-01", "2026-01-03"))),
            node(1, Some(("2026-01-05", "2026-01-10"))),
        ];

        assert_eq!(rollup(&mut nodes), 1);

        let span = nodes[0].schedule.unwrap();
        assert_eq!(span.start, day("2026-01-01"));
        assert_eq!(span.end, day("2026-01-10"));
        assert_eq!(nodes[0].duration(), 10);
    }

    #[test]
    fn rollup_is_transitive() {
        let mut nodes = vec![
            node(0, None),
            node(1, None),
            node(2, Some(("2026-02-03", "2026-02-04"))),
            node(2, Some(("2026-02-10", "2026-02-12"))),
            node(1, Some(("2026-01-20", "2026-01-21"))),
        ];

        rollup(&mut nodes);

        assert_eq!(
            nodes[1].schedule,
            Some(DateRange {
                start: day("2026-02-03"),
                end: day("2026-02-12")
            })
        );
        assert_eq!(
            nodes[0].schedule,
            Some(DateRange {
                start: day("2026-01-20"),
                end: day("2026-02-12")
            })
        );
    }

    #[test]
    fn unscheduled_children_clear_parent() {
        let mut nodes = vec![
            node(0, Some(("2026-01-01", "2026-01-31"))),
            node(1, None),
            node(1, None),
        ];

        rollup(&mut nodes);

        assert_eq!(nodes[0].schedule, None);
        assert_eq!(nodes[0].duration(), 0);
    }

    #[test]
    fn unscheduled_children_are_ignored_in_span() {
        let mut nodes = vec![
            node(0, None),
            node(1, None),
            node(1, Some(("2026-01-07", "2026-01-08"))),
        ];

        rollup(&mut nodes);

        assert_eq!(
            nodes[0].schedule,
            Some(DateRange {
                start: day("2026-01-07"),
                end: day("2026-01-08")
            })
        );
    }

    #[test]
    fn leaves_keep_their_schedule() {
        let mut nodes = vec![
            node(0, Some(("2026-01-01", "2026-01-02"))),
            node(0, Some(("2026-03-01", "2026-03-02"))),
        ];
        let before = nodes.clone();

        assert_eq!(rollup(&mut nodes), 0);
        assert_eq!(nodes, before);
    }

    #[test]
    fn running_twice_changes_nothing() {
        let mut nodes = vec![
            node(0, None),
            node(1, Some(("2026-01-01", "2026-01-03"))),
            node(2, Some(("2026-01-02", "2026-01-09"))),
            node(1, None),
            node(0, Some(("2026-02-01", "2026-02-01"))),
        ];

        rollup(&mut nodes);
        let once = nodes.clone();
        assert_eq!(rollup(&mut nodes), 0);
        assert_eq!(nodes, once);
    }
}
