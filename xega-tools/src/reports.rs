use std::io::{self, Write};

use xega_bench::SwitchinessReport;

pub const SWITCHIEST_HEADER: &str = "Rank | Switches | Models | T | Game | Seed";

/// Summary line plus one row per selected group, in rank order.
pub fn write_switchiest_table<W: Write>(out: &mut W, report: &SwitchinessReport) -> io::Result<()> {
    writeln!(
        out,
        "Analyzed groups: {}. Selected: {}. Top-N = {}.",
        report.analyzed_groups,
        report.selected.len(),
        report.top_n
    )?;
    writeln!(out, "{SWITCHIEST_HEADER}")?;
    for (index, group) in report.selected.iter().enumerate() {
        writeln!(
            out,
            "{:4} | {:8} | {:6} | {:2} | {} | {}",
            index + 1,
            group.switches,
            group.models,
            group.timeline,
            group.key.game,
            group.key.seed
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xega_bench::{GroupKey, GroupScore};

    #[test]
    fn table_rows_are_right_aligned() {
        let report = SwitchinessReport {
            analyzed_groups: 4,
            top_n: 5,
            selected: vec![
                GroupScore {
                    key: GroupKey::new("Condense", "11"),
                    switches: 12,
                    models: 3,
                    timeline: 6,
                },
                GroupScore {
                    key: GroupKey::new("Contrast", "3"),
                    switches: 3,
                    models: 2,
                    timeline: 14,
                },
            ],
            records: Vec::new(),
        };
        let mut out = Vec::new();
        write_switchiest_table(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Analyzed groups: 4. Selected: 2. Top-N = 5.");
        assert_eq!(lines[1], SWITCHIEST_HEADER);
        assert_eq!(lines[2], "   1 |       12 |      3 |  6 | Condense | 11");
        assert_eq!(lines[3], "   2 |        3 |      2 | 14 | Contrast | 3");
    }

    #[test]
    fn empty_selection_prints_header_only() {
        let report = SwitchinessReport {
            analyzed_groups: 0,
            top_n: 1,
            selected: Vec::new(),
            records: Vec::new(),
        };
        let mut out = Vec::new();
        write_switchiest_table(&mut out, &report).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap().lines().count(),
            2,
            "summary and header"
        );
    }
}
