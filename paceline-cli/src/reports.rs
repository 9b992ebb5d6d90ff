use anyhow::Result;
use colored::Colorize;
use paceline_engine::numbers::hours_to_delta;
use paceline_engine::{
    CLOSED_HOURS, CourseDetail, CourseSummary, CueLine, RestStopLine, legend_entries,
};
use serde::Serialize;
use std::io::Write;

use crate::fields::{CellStyle, Field, FieldSelection, Row, SPACER};
use crate::util::{pretty_clock, pretty_duration};

/// What each report renders besides the split table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub include_sub_splits: bool,
    pub include_stops: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: CourseSummary,
    rest_stops: Vec<RestStopLine>,
    cue_sheet: Vec<CueLine>,
    course: &'a CourseDetail,
}

pub fn generate_console_report(
    writer: &mut dyn Write,
    details: &CourseDetail,
    selection: &FieldSelection,
    options: ReportOptions,
) -> Result<()> {
    let dashes = "─".repeat(selection.table_width());
    for (idx, segment) in details.segment_details.iter().enumerate() {
        writeln!(writer)?;
        writeln!(
            writer,
            "{} {}",
            format!("🚴 Segment {}", idx + 1).bright_cyan().bold(),
            format!(
                "({:.2} mi, {} → {})",
                segment.distance,
                pretty_clock(segment.start_time),
                pretty_clock(segment.end_time)
            )
            .cyan()
        )?;
        let headers: Vec<String> = selection
            .fields()
            .iter()
            .map(|field| pad(selection.header(*field), *field, selection))
            .collect();
        writeln!(writer, "{}", headers.join(SPACER))?;
        writeln!(writer, "{dashes}")?;
        for split in &segment.split_details {
            writeln!(writer, "{}", console_row(Row::Split(split), selection))?;
            if options.include_sub_splits && split.sub_splits.len() > 1 {
                for sub_split in &split.sub_splits {
                    let line = console_row(Row::SubSplit(sub_split), selection);
                    writeln!(writer, "{}", line.dimmed())?;
                }
            }
        }
        writeln!(writer, "{dashes}")?;
        if !segment.total_sleep_time.is_zero() {
            writeln!(
                writer,
                "😴 Sleep: {}",
                pretty_duration(segment.total_sleep_time).trim()
            )?;
        }
    }

    if options.include_stops {
        write_console_cue_sheet(writer, &details.cue_sheet())?;
    }
    write_console_summary(writer, &details.summary())
}

fn console_row(row: Row<'_>, selection: &FieldSelection) -> String {
    selection
        .fields()
        .iter()
        .map(|field| pad(&field.cell(row, CellStyle::Display), *field, selection))
        .collect::<Vec<_>>()
        .join(SPACER)
}

fn pad(text: &str, field: Field, selection: &FieldSelection) -> String {
    let width = selection.column_width(field);
    if field.left_aligned() {
        format!("{text:<width$}")
    } else {
        format!("{text:>width$}")
    }
}

fn write_console_cue_sheet(writer: &mut dyn Write, lines: &[CueLine]) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📍 Cue Sheet".bright_yellow().bold())?;
    writeln!(writer, "{}", "============".yellow())?;
    for line in lines {
        let hours = match line.hours.as_deref() {
            Some(CLOSED_HOURS) => CLOSED_HOURS.red(),
            Some(hours) => hours.green(),
            None => "".normal(),
        };
        writeln!(
            writer,
            "{} {:>8.2} (+{:>6.2})  {}  {:<20}  {}",
            line.legend(),
            line.mile_mark,
            line.distance_from_previous,
            pretty_clock(line.eta),
            line.name,
            hours
        )?;
    }
    writeln!(writer, "{}", legend_text("   "))?;
    Ok(())
}

fn legend_text(separator: &str) -> String {
    legend_entries()
        .iter()
        .map(|(glyph, description)| format!("{glyph} {description}"))
        .collect::<Vec<_>>()
        .join(separator)
}

fn write_console_summary(writer: &mut dyn Write, summary: &CourseSummary) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Course Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "=================".cyan())?;
    writeln!(writer, "{:14}: {:>8.3}", "Total Distance", summary.distance)?;
    writeln!(
        writer,
        "{:14}: {} - {}",
        "Time Span",
        pretty_clock(summary.start_time),
        pretty_clock(summary.end_time)
    )?;
    for (label, hours) in [
        ("Moving Time", summary.moving_hours),
        ("Down Time", summary.down_hours),
        ("Adj. Time", summary.adjustment_hours),
        ("Sleep Time", summary.sleep_hours),
        ("Elapsed Time", summary.elapsed_hours),
    ] {
        writeln!(
            writer,
            "{label:14}: {:14} [{hours:7.3} hours]",
            pretty_duration(hours_to_delta(hours)).trim()
        )?;
    }
    writeln!(writer, "{:14}: {:>8.3}", "Pace", summary.pace)?;
    writeln!(writer, "{:14}: {:>8.3}", "Distance/Day", summary.distance_per_day)?;
    for (label, ratio) in summary_ratios(summary) {
        writeln!(writer, "{label:14}: {:>7.3}%", ratio * 100.0)?;
    }
    Ok(())
}

fn summary_ratios(summary: &CourseSummary) -> [(&'static str, f64); 5] {
    [
        ("Moving/Elapsed", summary.moving_to_elapsed),
        ("Down/Elapsed", summary.down_to_elapsed),
        ("Adj./Elapsed", summary.adjustment_to_elapsed),
        ("Down/Moving", summary.down_to_moving),
        ("Adj./Moving", summary.adjustment_to_moving),
    ]
}

pub fn generate_json_report(writer: &mut dyn Write, details: &CourseDetail) -> Result<()> {
    let report = JsonReport {
        summary: details.summary(),
        rest_stops: details.rest_stop_lines(),
        cue_sheet: details.cue_sheet(),
        course: details,
    };
    let json_output = serde_json::to_string_pretty(&report)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(
    writer: &mut dyn Write,
    details: &CourseDetail,
    selection: &FieldSelection,
    options: ReportOptions,
) -> Result<()> {
    writeln!(writer, "# Paceline Course Plan\n")?;

    for (idx, segment) in details.segment_details.iter().enumerate() {
        writeln!(writer, "## Segment {}\n", idx + 1)?;
        let headers: Vec<&str> = selection
            .fields()
            .iter()
            .map(|field| selection.header(*field))
            .collect();
        writeln!(writer, "| {} |", headers.join(" | "))?;
        let rules: Vec<&str> = selection
            .fields()
            .iter()
            .map(|field| if field.left_aligned() { ":---" } else { "---:" })
            .collect();
        writeln!(writer, "| {} |", rules.join(" | "))?;
        for split in &segment.split_details {
            writeln!(writer, "{}", markdown_row(Row::Split(split), selection))?;
            if options.include_sub_splits && split.sub_splits.len() > 1 {
                for sub_split in &split.sub_splits {
                    writeln!(writer, "{}", markdown_row(Row::SubSplit(sub_split), selection))?;
                }
            }
        }
        writeln!(writer)?;
        if !segment.total_sleep_time.is_zero() {
            writeln!(
                writer,
                "_Sleep: {}_\n",
                pretty_duration(segment.total_sleep_time).trim()
            )?;
        }
    }

    if options.include_stops {
        writeln!(writer, "## Cue Sheet\n")?;
        writeln!(writer, "| | Mile | From Previous | ETA | Name | Hours |")?;
        writeln!(writer, "|---|---:|---:|---:|:---|---:|")?;
        for line in details.cue_sheet() {
            writeln!(
                writer,
                "| {} | {:.2} | {:.2} | {} | {} | {} |",
                line.legend(),
                line.mile_mark,
                line.distance_from_previous,
                pretty_clock(line.eta),
                escape_markdown(&line.name),
                escape_markdown(line.hours.as_deref().unwrap_or_default())
            )?;
        }
        writeln!(writer, "\n_{}_\n", legend_text(" · "))?;
    }

    let summary = details.summary();
    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "- **Total distance**: {:.3}", summary.distance)?;
    writeln!(
        writer,
        "- **Time span**: {} - {}",
        pretty_clock(summary.start_time),
        pretty_clock(summary.end_time)
    )?;
    writeln!(writer, "- **Moving hours**: {:.3}", summary.moving_hours)?;
    writeln!(writer, "- **Down hours**: {:.3}", summary.down_hours)?;
    writeln!(writer, "- **Adjustment hours**: {:.3}", summary.adjustment_hours)?;
    writeln!(writer, "- **Sleep hours**: {:.3}", summary.sleep_hours)?;
    writeln!(writer, "- **Elapsed hours**: {:.3}", summary.elapsed_hours)?;
    writeln!(writer, "- **Pace**: {:.3}", summary.pace)?;
    writeln!(writer, "- **Distance/day**: {:.3}", summary.distance_per_day)?;
    for (label, ratio) in summary_ratios(&summary) {
        writeln!(writer, "- **{label}**: {:.3}%", ratio * 100.0)?;
    }
    Ok(())
}

fn markdown_row(row: Row<'_>, selection: &FieldSelection) -> String {
    let cells: Vec<String> = selection
        .fields()
        .iter()
        .map(|field| escape_markdown(field.cell(row, CellStyle::Display).trim()))
        .collect();
    format!("| {} |", cells.join(" | "))
}

fn escape_markdown(text: &str) -> String {
    text.replace('|', "\\|")
}

/// One row per split, plus sub-split rows when requested.
pub fn generate_csv_report(
    writer: &mut dyn Write,
    details: &CourseDetail,
    selection: &FieldSelection,
    options: ReportOptions,
) -> Result<()> {
    let mut header = vec!["segment".to_string(), "split".to_string(), "sub_split".to_string()];
    header.extend(selection.fields().iter().map(|f| f.key().to_string()));
    writeln!(writer, "{}", header.join(","))?;

    for (segment_idx, segment) in details.segment_details.iter().enumerate() {
        for (split_idx, split) in segment.split_details.iter().enumerate() {
            write_csv_row(writer, selection, Row::Split(split), segment_idx, split_idx, None)?;
            if options.include_sub_splits {
                for (sub_idx, sub_split) in split.sub_splits.iter().enumerate() {
                    write_csv_row(
                        writer,
                        selection,
                        Row::SubSplit(sub_split),
                        segment_idx,
                        split_idx,
                        Some(sub_idx),
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn write_csv_row(
    writer: &mut dyn Write,
    selection: &FieldSelection,
    row: Row<'_>,
    segment: usize,
    split: usize,
    sub_split: Option<usize>,
) -> Result<()> {
    let mut cells = vec![
        (segment + 1).to_string(),
        (split + 1).to_string(),
        sub_split.map(|idx| (idx + 1).to_string()).unwrap_or_default(),
    ];
    cells.extend(
        selection
            .fields()
            .iter()
            .map(|field| escape_csv(&field.cell(row, CellStyle::Machine))),
    );
    writeln!(writer, "{}", cells.join(","))?;
    Ok(())
}

fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paceline_engine::{Course, compute_course_details};

    fn sample_details() -> CourseDetail {
        compute_course_details(&Course::sample().unwrap()).unwrap()
    }

    fn full_selection() -> FieldSelection {
        FieldSelection::new(&[], &[], true).unwrap()
    }

    const ALL: ReportOptions = ReportOptions {
        include_sub_splits: true,
        include_stops: true,
    };

    fn render(
        generate: fn(&mut dyn Write, &CourseDetail, &FieldSelection, ReportOptions) -> Result<()>,
        selection: &FieldSelection,
        options: ReportOptions,
    ) -> String {
        let mut buffer = Vec::new();
        generate(&mut buffer, &sample_details(), selection, options).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn csv_has_one_row_per_split_without_sub_splits() {
        let options = ReportOptions {
            include_sub_splits: false,
            include_stops: true,
        };
        let content = render(generate_csv_report, &full_selection(), options);
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("segment,split,sub_split,distance,span"));
        assert_eq!(lines.count(), 4);
        // Addresses carry commas and must be quoted.
        assert!(content.contains("\"7832 S Western Ave, Chicago, IL 60620\""));
    }

    #[test]
    fn csv_sub_split_rows_are_indexed() {
        let content = render(generate_csv_report, &full_selection(), ALL);
        // 4 splits plus 2 + 2 + 6 + 2 sub-splits.
        assert_eq!(content.lines().count(), 1 + 4 + 12);
        assert!(content.lines().any(|l| l.starts_with("2,1,6,")));
    }

    #[test]
    fn markdown_lists_segments_stops_and_summary() {
        let content = render(generate_markdown_report, &full_selection(), ALL);
        assert!(content.contains("# Paceline Course Plan"));
        assert!(content.contains("## Segment 2"));
        assert!(content.contains("## Cue Sheet"));
        assert!(content.contains("| ☆ |"));
        assert!(content.contains("| 🏁 | 0.00 | 0.00 |"));
        assert!(content.contains("| 🏁 | 550.00 |"));
        assert!(content.contains("☆ Optional Rest Stop · 🏁 Finish"));
        assert!(content.contains("**Sleep hours**: 11.000"));
    }

    #[test]
    fn console_cue_sheet_brackets_stops_with_start_and_finish() {
        let content = render(generate_console_report, &full_selection(), ALL);
        let cue_sheet: Vec<&str> = content
            .lines()
            .skip_while(|line| !line.contains("Cue Sheet"))
            .skip(2)
            .take_while(|line| !line.is_empty())
            .collect();
        // Start, four stops, finish, legend.
        assert_eq!(cue_sheet.len(), 7);
        assert!(cue_sheet[0].starts_with("🏁     0.00"));
        assert!(cue_sheet[0].contains("Start"));
        assert!(cue_sheet[5].starts_with("🏁   550.00"));
        assert!(cue_sheet[5].contains("Finish"));
        assert_eq!(
            cue_sheet[6],
            "🏁 Start   ★ Rest Stop   ☆ Optional Rest Stop   🏁 Finish"
        );
    }

    #[test]
    fn console_respects_renames_and_hidden_stops() {
        let selection = FieldSelection::new(
            &["alt".to_string()],
            &["distance=Miles".to_string()],
            false,
        )
        .unwrap();
        let options = ReportOptions {
            include_sub_splits: false,
            include_stops: false,
        };
        let content = render(generate_console_report, &selection, options);
        assert!(content.contains("   Miles"));
        assert!(!content.contains("Rest Stop Name"));
        assert!(!content.contains("Cue Sheet"));
        assert!(content.contains("Course Summary"));
        assert!(content.contains("Sleep: 0d 11h  0m  0.00s"));
    }

    #[test]
    fn json_report_carries_summary_and_course() {
        let mut buffer = Vec::new();
        generate_json_report(&mut buffer, &sample_details()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert!((value["summary"]["distance"].as_f64().unwrap() - 550.0).abs() < 1e-9);
        assert_eq!(value["rest_stops"].as_array().unwrap().len(), 4);
        let cue_sheet = value["cue_sheet"].as_array().unwrap();
        assert_eq!(cue_sheet.len(), 6);
        assert_eq!(cue_sheet[0]["kind"], "start");
        assert_eq!(cue_sheet[5]["kind"], "finish");
        assert_eq!(value["course"]["segment_details"].as_array().unwrap().len(), 2);
    }
}
