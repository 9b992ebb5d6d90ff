use std::fs;
use std::path::PathBuf;

use paceline_engine::{Course, CourseLoader};
use thiserror::Error;

/// Course name that resolves to the bundled sample course.
pub const SAMPLE_COURSE: &str = "sample";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read course file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse course '{name}'")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads courses from JSON files on disk, or the bundled sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileCourseLoader;

impl CourseLoader for FileCourseLoader {
    type Error = LoadError;

    fn load_course(&self, name: &str) -> Result<Course, Self::Error> {
        let parse_error = |source| LoadError::Parse {
            name: name.to_string(),
            source,
        };
        if name == SAMPLE_COURSE {
            return Course::sample().map_err(parse_error);
        }
        let path = PathBuf::from(name);
        let raw = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("read {} bytes from {}", raw.len(), path.display());
        Course::from_json(&raw).map_err(parse_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "paceline-loader-{label}-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn sample_name_loads_bundled_course() {
        let course = FileCourseLoader.load_course(SAMPLE_COURSE).unwrap();
        assert_eq!(course.split_count(), 4);
    }

    #[test]
    fn reads_course_files_with_defaults() {
        let path = temp_path("minimal");
        fs::write(
            &path,
            r#"{
                "init_moving_speed": 18.0,
                "min_moving_speed": 15.0,
                "start_time": "2025-07-12T06:00:00",
                "segments": [{ "splits": [{ "distance": 42.0 }] }]
            }"#,
        )
        .unwrap();
        let course = FileCourseLoader
            .load_course(path.to_str().unwrap())
            .unwrap();
        assert!((course.total_distance() - 42.0).abs() < 1e-9);
        assert!(course.segments[0].no_end_down_time);
        assert!(course.segments[0].sleep_time.is_zero());
    }

    #[test]
    fn missing_and_malformed_files_are_reported() {
        let missing = temp_path("missing");
        let err = FileCourseLoader
            .load_course(missing.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));

        let broken = temp_path("broken");
        fs::write(&broken, "{ not json").unwrap();
        let err = FileCourseLoader
            .load_course(broken.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
