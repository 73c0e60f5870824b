//! ASCII rendering of WBS trees and their schedules.

use super::calendar::CalendarRange;
use crate::models::WbsNode;

const SCHEDULED: char = '●';
const UNSCHEDULED: char = '○';
const EXCLUDED: char = '✗';

const LEAF_BAR: char = '█';
const GROUP_BAR: char = '▬';
const EMPTY_CELL: char = '·';
const WEEKEND_CELL: char = ' ';

/// Width of the title column in the Gantt view.
const LABEL_WIDTH: usize = 28;

/// Get the status symbol for a node.
fn node_symbol(node: &WbsNode) -> char {
    if !node.include_in_export {
        EXCLUDED
    } else if node.is_scheduled() {
        SCHEDULED
    } else {
        UNSCHEDULED
    }
}

fn display_title(node: &WbsNode) -> &str {
    if node.title.trim().is_empty() {
        "(untitled)"
    } else {
        &node.title
    }
}

/// Whether the node at `index` is the last child of its parent.
fn is_last_sibling(nodes: &[WbsNode], index: usize) -> bool {
    let level = nodes[index].level;
    nodes[index + 1..]
        .iter()
        .find(|n| n.level <= level)
        .map_or(true, |n| n.level < level)
}

/// Render a tree as ASCII art with status symbols and schedules.
///
/// Example output:
/// ```text
/// Phase 1  [2026-01-01 ~ 2026-01-10, 10d]
/// ├── ● Planning  [2026-01-01 ~ 2026-01-05, 5d]
/// │   └── ● Requirements  [2026-01-01 ~ 2026-01-03, 3d]
/// ├── ○ Design
/// └── ✗ Legacy migration
/// ```
pub fn render_tree(nodes: &[WbsNode]) -> String {
    let mut output = String::new();
    // For each ancestor level, whether that ancestor was the last of its siblings.
    let mut last_at_level: Vec<bool> = Vec::new();

    for (i, node) in nodes.iter().enumerate() {
        let level = usize::from(node.level);
        let is_last = is_last_sibling(nodes, i);
        last_at_level.truncate(level);

        if level == 0 {
            // Root nodes: just title (no branch characters)
            output.push_str(display_title(node));
        } else {
            for &ancestor_last in last_at_level.iter().skip(1) {
                output.push_str(if ancestor_last { "    " } else { "│   " });
            }
            output.push_str(if is_last { "└── " } else { "├── " });
            output.push(node_symbol(node));
            output.push(' ');
            output.push_str(display_title(node));
        }

        if let Some(range) = node.schedule {
            output.push_str(&format!(
                "  [{} ~ {}, {}d]",
                range.start,
                range.end,
                range.days()
            ));
        }
        output.push('\n');

        last_at_level.push(is_last);
    }

    output
}

/// Render one bar row per node across the days of the calendar.
///
/// Leaves are drawn with solid bars, grouping rows with thin bars.
pub fn render_gantt(nodes: &[WbsNode], calendar: &CalendarRange) -> String {
    let days = calendar.days();
    let mut output = String::new();

    output.push_str(&" ".repeat(LABEL_WIDTH));
    for day in &days {
        output.push(if day.day == 1 {
            char::from_digit(day.month % 10, 10).unwrap_or('?')
        } else {
            ' '
        });
    }
    output.push('\n');

    for (i, node) in nodes.iter().enumerate() {
        let is_group = nodes.get(i + 1).is_some_and(|next| next.level > node.level);
        let bar = if is_group { GROUP_BAR } else { LEAF_BAR };

        let label = format!("{}{}", "  ".repeat(usize::from(node.level)), display_title(node));
        output.push_str(&fit(&label, LABEL_WIDTH));

        for day in &days {
            let filled = node.schedule.is_some_and(|range| range.contains(day.date));
            output.push(match (filled, day.is_weekend()) {
                (true, _) => bar,
                (false, true) => WEEKEND_CELL,
                (false, false) => EMPTY_CELL,
            });
        }
        output.push('\n');
    }

    output
}

/// Pad or truncate to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count >= width {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push(' ');
        cut
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}
