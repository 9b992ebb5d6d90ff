mod fields;
mod loader;
mod reports;
mod util;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use fields::{Field, FieldSelection};
use loader::{FileCourseLoader, SAMPLE_COURSE};
use paceline_engine::{Course, CourseDetail, PlanningEngine};
use reports::ReportOptions;
use util::split_csv;

#[derive(Debug, Parser)]
#[command(name = "paceline", version = "0.1.0")]
#[command(about = "Pace planner for multi-day endurance rides")]
struct Args {
    /// Course JSON file (defaults to the bundled sample course)
    #[arg(long)]
    course: Option<PathBuf>,

    /// Override the course start time, e.g. 2025-12-13T08:00:00
    #[arg(long)]
    start: Option<NaiveDateTime>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Include sub-split rows under each split
    #[arg(long)]
    sub_splits: bool,

    /// Hide rest-stop columns and the cue sheet
    #[arg(long)]
    no_stops: bool,

    /// Fields to leave out of tables (comma-separated keys)
    #[arg(long, default_value = "")]
    exclude: String,

    /// Relabel a field, e.g. --rename distance=Miles (repeatable)
    #[arg(long)]
    rename: Vec<String>,

    /// List all report field keys and exit
    #[arg(long)]
    list_fields: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_fields(&args)? {
        return Ok(());
    }

    let selection = FieldSelection::new(&split_csv(&args.exclude), &args.rename, !args.no_stops)?;
    if args.report == "console" && args.output.is_none() {
        announce_banner();
    }

    let engine = PlanningEngine::new(FileCourseLoader);
    let course = load_course(&args, &engine)?;
    let details = engine
        .plan_course(&course)
        .context("failed to plan course")?;

    write_reports(&args, &details, &selection)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn maybe_list_fields(args: &Args) -> Result<bool> {
    if !args.list_fields {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available fields:")?;
    for field in Field::ALL {
        let scope = if field.is_stop() { " (rest stop)" } else { "" };
        writeln!(
            output_target.writer(),
            "  {:18} - {}{scope}",
            field.key(),
            field.label().trim()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🚴 Paceline Pace Planner".bright_cyan().bold());
    println!("{}", "========================".cyan());
}

fn course_name(args: &Args) -> String {
    args.course
        .as_ref()
        .map_or_else(|| SAMPLE_COURSE.to_string(), |path| path.display().to_string())
}

fn load_course(args: &Args, engine: &PlanningEngine<FileCourseLoader>) -> Result<Course> {
    let name = course_name(args);
    let mut course = engine
        .load(&name)
        .with_context(|| format!("failed to load course '{name}'"))?;
    if let Some(start) = args.start {
        log::info!("overriding start time {} -> {start}", course.start_time);
        course.start_time = start;
    }
    Ok(course)
}

fn write_reports(args: &Args, details: &CourseDetail, selection: &FieldSelection) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let options = ReportOptions {
        include_sub_splits: args.sub_splits,
        include_stops: !args.no_stops,
    };

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, details)?,
        "markdown" => {
            reports::generate_markdown_report(&mut output_target, details, selection, options)?;
        }
        "csv" => reports::generate_csv_report(&mut output_target, details, selection, options)?,
        _ => reports::generate_console_report(&mut output_target, details, selection, options)?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use paceline_engine::compute_course_details;

    fn base_args() -> Args {
        Args {
            course: None,
            start: None,
            report: "json".to_string(),
            output: None,
            sub_splits: false,
            no_stops: false,
            exclude: String::new(),
            rename: Vec::new(),
            list_fields: false,
            verbose: false,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "paceline-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    fn sample_details() -> CourseDetail {
        compute_course_details(&Course::sample().unwrap()).unwrap()
    }

    fn full_selection() -> FieldSelection {
        FieldSelection::new(&[], &[], true).unwrap()
    }

    #[test]
    fn args_parse_from_command_line() {
        let args = Args::try_parse_from([
            "paceline",
            "--start",
            "2025-12-15T06:30:00",
            "--report",
            "csv",
            "--exclude",
            "alt,address",
            "--rename",
            "distance=Miles",
            "--rename",
            "pace=Speed",
            "--sub-splits",
        ])
        .unwrap();
        assert_eq!(args.report, "csv");
        assert_eq!(args.rename.len(), 2);
        assert!(args.sub_splits);
        assert_eq!(
            args.start,
            NaiveDate::from_ymd_opt(2025, 12, 15).and_then(|d| d.and_hms_opt(6, 30, 0))
        );
        assert!(Args::try_parse_from(["paceline", "--report", "xml"]).is_err());
    }

    #[test]
    fn course_name_defaults_to_sample() {
        assert_eq!(course_name(&base_args()), SAMPLE_COURSE);
        let args = Args {
            course: Some(PathBuf::from("/tmp/ride.json")),
            ..base_args()
        };
        assert_eq!(course_name(&args), "/tmp/ride.json");
    }

    #[test]
    fn load_course_applies_start_override() {
        let start = NaiveDate::from_ymd_opt(2025, 12, 15)
            .and_then(|d| d.and_hms_opt(5, 0, 0))
            .unwrap();
        let args = Args {
            start: Some(start),
            ..base_args()
        };
        let engine = PlanningEngine::new(FileCourseLoader);
        let course = load_course(&args, &engine).unwrap();
        assert_eq!(course.start_time, start);
    }

    #[test]
    fn load_course_reports_missing_file() {
        let args = Args {
            course: Some(temp_path("absent")),
            ..base_args()
        };
        let engine = PlanningEngine::new(FileCourseLoader);
        let err = load_course(&args, &engine).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load course"));
    }

    #[test]
    fn maybe_list_fields_writes_keys() {
        let temp = temp_path("fields");
        let args = Args {
            list_fields: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_fields(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available fields"));
        assert!(content.contains("adjustment_start"));
        assert!(content.contains("(rest stop)"));
    }

    #[test]
    fn maybe_list_fields_returns_false_when_disabled() {
        assert!(!maybe_list_fields(&base_args()).unwrap());
    }

    #[test]
    fn write_reports_emits_json() {
        let temp = temp_path("report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &sample_details(), &full_selection()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("\"segment_details\""));
        assert!(content.contains("\"rest_stops\""));
    }

    #[test]
    fn write_reports_emits_markdown() {
        let temp = temp_path("report.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &sample_details(), &full_selection()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("# Paceline Course Plan"));
    }

    #[test]
    fn write_reports_emits_csv() {
        let temp = temp_path("report.csv");
        let args = Args {
            report: "csv".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &sample_details(), &full_selection()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.starts_with("segment,split,sub_split,"));
    }

    #[test]
    fn write_reports_emits_console() {
        let temp = temp_path("report.txt");
        let args = Args {
            report: "console".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &sample_details(), &full_selection()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Course Summary"));
        assert!(content.contains("Rest Stop Name"));
    }
}
