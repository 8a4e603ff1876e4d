use crate::demo::{run_demo, DemoArgs};
use crate::reports::{run_course_export, run_faculty_find, CourseExportArgs, FacultyFindArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use course_modality::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Course Modality Desk",
    about = "Serve and administer course-modality applications from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Query the faculty directory
    Faculty {
        #[command(subcommand)]
        command: FacultyCommand,
    },
    /// Administer the course-modality table
    Courses {
        #[command(subcommand)]
        command: CoursesCommand,
    },
    /// Walk through an apply/revoke session against in-memory sample data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum FacultyCommand {
    /// Look up a faculty member by Korean or English name
    Find(FacultyFindArgs),
}

#[derive(Subcommand, Debug)]
enum CoursesCommand {
    /// Export the course table as CSV (requires the admin PIN)
    Export(CourseExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Faculty {
            command: FacultyCommand::Find(args),
        } => run_faculty_find(args),
        Command::Courses {
            command: CoursesCommand::Export(args),
        } => run_course_export(args),
        Command::Demo(args) => run_demo(args),
    }
}
