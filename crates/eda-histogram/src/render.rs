//! Text rendering of histograms

use crate::grouped::GroupedHistograms;
use crate::types::Histogram;
use std::fmt::Write;

/// One line per bin: edges, count and a bar scaled to `bar_width`
pub fn render_histogram(hist: &Histogram, bar_width: usize) -> String {
    let mut out = String::new();
    if hist.is_empty() {
        out.push_str("  (no values)\n");
        return out;
    }
    let max = hist.max_count().max(1);
    let last = hist.len() - 1;
    for (i, bin) in hist.bins().iter().enumerate() {
        let bar = (bin.count * bar_width + max / 2) / max;
        let close = if i == last { ']' } else { ')' };
        let _ = writeln!(
            out,
            "  [{:>9.3}, {:>9.3}{} {:>5} {}",
            bin.left,
            bin.right,
            close,
            bin.count,
            "#".repeat(bar)
        );
    }
    out
}

/// All groups under a common heading
pub fn render_grouped(grouped: &GroupedHistograms, bar_width: usize) -> String {
    let mut out = format!("Distribution of '{}' by '{}'\n", grouped.value, grouped.group);
    for (label, hist) in &grouped.groups {
        let _ = writeln!(out, "{} = {} (n={})", grouped.group, label, hist.total_count());
        out.push_str(&render_histogram(hist, bar_width));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::FixedWidthBuilder;
    use crate::traits::HistogramBuilder;

    #[test]
    fn test_render_histogram() {
        let hist = FixedWidthBuilder::new(2).build(&[1.0, 1.2, 1.4, 2.0]).unwrap();
        let text = render_histogram(&hist, 10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(&"#".repeat(10)));
        assert!(lines[1].trim_end().ends_with(&format!("1 {}", "#".repeat(3))));
        assert!(lines[1].contains(']'));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_histogram(&Histogram::empty(), 10), "  (no values)\n");
    }
}
