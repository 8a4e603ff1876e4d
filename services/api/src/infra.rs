use course_modality::config::{ConfigError, DataConfig};
use course_modality::error::AppError;
use course_modality::workflows::applications::{AdminPin, ApplicationWorkflow, Pin};
use course_modality::workflows::records::{FacultyDirectory, InMemoryCourseStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type CourseWorkflow = ApplicationWorkflow<InMemoryCourseStore>;

/// Tables and workflow shared by every request for the lifetime of the process.
pub(crate) struct Datasets {
    pub(crate) directory: Arc<FacultyDirectory>,
    pub(crate) store: Arc<InMemoryCourseStore>,
    pub(crate) workflow: Arc<CourseWorkflow>,
}

pub(crate) fn admin_pin(raw: &str) -> Result<AdminPin, AppError> {
    Pin::parse(raw)
        .map(AdminPin::new)
        .ok_or(AppError::Config(ConfigError::InvalidAdminPin))
}

/// Load both startup sources; an unusable source yields an empty table.
pub(crate) fn load_datasets(data: &DataConfig) -> Result<Datasets, AppError> {
    let directory = Arc::new(FacultyDirectory::load_or_empty(&data.faculty_csv));
    let store = Arc::new(InMemoryCourseStore::load_or_empty(&data.course_csv));
    Ok(assemble(directory, store, admin_pin(&data.admin_pin)?))
}

pub(crate) fn assemble(
    directory: Arc<FacultyDirectory>,
    store: Arc<InMemoryCourseStore>,
    admin: AdminPin,
) -> Datasets {
    let workflow = Arc::new(ApplicationWorkflow::new(
        store.clone(),
        directory.clone(),
        admin,
    ));
    Datasets {
        directory,
        store,
        workflow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_sources_start_empty() {
        let data = DataConfig {
            faculty_csv: PathBuf::from("does/not/exist/faculty.csv"),
            course_csv: PathBuf::from("does/not/exist/courses.csv"),
            admin_pin: "0000".to_string(),
        };

        let datasets = load_datasets(&data).expect("datasets assemble");
        assert!(datasets.directory.is_empty());
        assert!(datasets.store.is_empty());
    }

    #[test]
    fn malformed_admin_pin_is_a_config_error() {
        assert!(matches!(
            admin_pin("12"),
            Err(AppError::Config(ConfigError::InvalidAdminPin))
        ));
    }
}
