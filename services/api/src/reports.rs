use crate::infra::load_datasets;
use clap::Args;
use course_modality::config::AppConfig;
use course_modality::error::AppError;
use course_modality::workflows::records::{FacultyDirectory, FacultyRecord};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct FacultyFindArgs {
    /// Korean or English name, matched exactly
    pub(crate) name: String,
    /// Faculty CSV to read instead of the configured source
    #[arg(long)]
    pub(crate) faculty_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct CourseExportArgs {
    /// Admin PIN
    #[arg(long)]
    pub(crate) admin_pin: String,
    /// Restrict the export to one year-semester tag, e.g. 2025-1
    #[arg(long)]
    pub(crate) year_semester: Option<String>,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_faculty_find(args: FacultyFindArgs) -> Result<(), AppError> {
    let FacultyFindArgs { name, faculty_csv } = args;

    let path = match faculty_csv {
        Some(path) => path,
        None => AppConfig::load()?.data.faculty_csv,
    };
    let directory = FacultyDirectory::load(&path)?;
    let matches = directory.find(name.trim());

    if matches.is_empty() {
        println!("No faculty member named '{}'", name.trim());
        return Ok(());
    }

    for record in matches {
        println!("{}", render_faculty(record));
    }
    Ok(())
}

pub(crate) fn run_course_export(args: CourseExportArgs) -> Result<(), AppError> {
    let CourseExportArgs {
        admin_pin,
        year_semester,
        output,
    } = args;

    let config = AppConfig::load()?;
    let datasets = load_datasets(&config.data)?;
    let csv = datasets
        .workflow
        .admin_export(&admin_pin, year_semester.as_deref())?;

    match output {
        Some(path) => {
            std::fs::write(&path, csv)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn render_faculty(record: &FacultyRecord) -> String {
    let email = if record.email.is_empty() {
        "-"
    } else {
        record.email.as_str()
    };
    let category = if record.category.is_empty() {
        "-"
    } else {
        record.category.as_str()
    };
    format!(
        "{} | {} | {} | {}",
        record.korean_name, record.english_name, category, email
    )
}
