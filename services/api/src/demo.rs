use crate::infra::{admin_pin, assemble, CourseWorkflow};
use clap::Args;
use course_modality::error::AppError;
use course_modality::workflows::applications::{
    ApplicationView, ApplyRequest, LookupOutcome, RevokeRequest, TransitionOutcome,
};
use course_modality::workflows::records::{
    AppliedStatus, CourseApplication, FacultyDirectory, FacultyRecord, InMemoryCourseStore,
    RecordId,
};
use std::sync::Arc;

const DEMO_ADMIN_PIN: &str = "9999";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the admin CSV export at the end of the walkthrough.
    #[arg(long)]
    pub(crate) show_export: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let datasets = assemble(
        Arc::new(demo_directory()),
        Arc::new(InMemoryCourseStore::with_applications(demo_courses())),
        admin_pin(DEMO_ADMIN_PIN)?,
    );
    let workflow = &datasets.workflow;

    println!("Course modality demo");
    println!(
        "Loaded {} course rows and {} faculty entries",
        datasets.store.len(),
        datasets.directory.len()
    );

    println!("\nLookup without a PIN");
    render_lookup(workflow.lookup("Kim", None)?);

    println!("\nApply to row 1 with someone else's PIN");
    render_transition(workflow.apply(ApplyRequest {
        name: "Kim".to_string(),
        record_id: RecordId(1),
        pin: "5678".to_string(),
        reason: Some("Conference travel".to_string()),
    })?);

    println!("\nApply to row 1 with its own PIN");
    render_transition(workflow.apply(ApplyRequest {
        name: "Kim".to_string(),
        record_id: RecordId(1),
        pin: "1234".to_string(),
        reason: Some("Conference travel".to_string()),
    })?);

    println!("\nLookup with PIN 1234");
    render_lookup(workflow.lookup("Kim", Some("1234"))?);

    println!("\nRevoke row 3 with a short PIN");
    render_transition(workflow.revoke(RevokeRequest {
        name: "Lee".to_string(),
        record_id: RecordId(3),
        pin: "42".to_string(),
    })?);

    println!("\nRevoke row 3 with its own PIN");
    render_transition(workflow.revoke(RevokeRequest {
        name: "Lee".to_string(),
        record_id: RecordId(3),
        pin: "0042".to_string(),
    })?);

    if args.show_export {
        print_export(workflow)?;
    }

    Ok(())
}

fn print_export(workflow: &CourseWorkflow) -> Result<(), AppError> {
    println!("\nAdmin export (faculty names joined)");
    print!("{}", workflow.admin_export(DEMO_ADMIN_PIN, None)?);
    Ok(())
}

fn render_lookup(outcome: LookupOutcome) {
    match outcome {
        LookupOutcome::NotFound => println!("- no entries found"),
        LookupOutcome::Found {
            records,
            controls_enabled,
        } => {
            println!(
                "- {} entries, controls {}",
                records.len(),
                if controls_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            for view in &records {
                println!("  {}", render_view(view));
            }
        }
    }
}

fn render_transition(outcome: TransitionOutcome) {
    match outcome {
        TransitionOutcome::Applied(view) => println!("- applied: {}", render_view(&view)),
        TransitionOutcome::Revoked(view) => println!("- revoked: {}", render_view(&view)),
        TransitionOutcome::NoMatchingRecord => {
            println!("- rejected: no entry matches the supplied name and PIN")
        }
        TransitionOutcome::ControlsDisabled => println!("- controls disabled: PIN malformed"),
    }
}

fn render_view(view: &ApplicationView) -> String {
    let course = &view.course;
    let status = if course.applied_status.is_empty() {
        "-"
    } else {
        course.applied_status
    };
    let mut line = format!(
        "{} {} {} [{}] applied={} editable={}",
        course.record_id, course.year_semester, course.course_title, course.course_format, status,
        view.editable
    );
    if let Some(reason) = &view.reason_for_applying {
        line.push_str(&format!(" reason=\"{reason}\""));
    }
    line
}

fn demo_directory() -> FacultyDirectory {
    FacultyDirectory::new(vec![
        FacultyRecord {
            korean_name: "Kim".to_string(),
            english_name: "Minsu Kim".to_string(),
            category: "Full-time".to_string(),
            email: "minsu.kim@example.ac.kr".to_string(),
        },
        FacultyRecord {
            korean_name: "Lee".to_string(),
            english_name: "Jiyoung Lee".to_string(),
            category: "Visiting".to_string(),
            email: "jiyoung.lee@example.ac.kr".to_string(),
        },
    ])
}

fn demo_courses() -> Vec<CourseApplication> {
    let course = |name: &str, password: &str, title: &str, format: &str| {
        let mut application = CourseApplication::new(name, password);
        application.year_semester = "2025-1".to_string();
        application.language = "English".to_string();
        application.course_title = title.to_string();
        application.course_format = format.to_string();
        application
    };

    vec![
        course("Kim", "1234", "Public Finance", "Online"),
        course("Kim", "5678", "Trade Policy", "Hybrid"),
        course("Lee", "0042", "Econometrics", "Offline")
            .with_applied(AppliedStatus::Applied, Some("Sabbatical".to_string())),
    ]
}
