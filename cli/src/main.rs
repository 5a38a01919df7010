//! `jobhub` command-line client for the recruitment platform.
//!
//! The session lives in a JSON file (`JOBHUB_SESSION_FILE`), so a `login`
//! in one invocation authenticates the next. Expired access tokens are
//! renewed transparently; when renewal fails the session file is cleared and
//! the user is told to sign in again.

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use jobhub_client::config::{ConfigError, normalize_base_url};
use jobhub_client::forms::{
    ApplicationStatusUpdate, EducationForm, EmailForm, ExperienceForm, JobApplicationForm, JobPostingForm, LoginForm,
    PersonalInfoForm, RegisterForm, ResetPasswordForm, SkillForm, VerifyEmailForm,
};
use jobhub_client::net::api::{admin, applications, auth, employer, jobs, profile};
use jobhub_client::net::types::{ApplicationStatus, JobFilters, ListQuery, Role};
use jobhub_client::{ApiClient, ApiError, ClientConfig, FileStore, SessionStore, spawn_invalidation_listener};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("output encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not signed in; run `jobhub login` first")]
    NotSignedIn,
}

impl CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E_CONFIG",
            Self::Api(e) => e.error_code(),
            Self::Json(_) => "E_OUTPUT",
            Self::NotSignedIn => "E_NOT_SIGNED_IN",
        }
    }

    /// Line printed to stderr. Validation failures list every field.
    fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Validation(errors)) => errors.to_string(),
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "jobhub", about = "JobHub recruitment platform CLI")]
struct Cli {
    /// API base URL, e.g. `https://jobs.example.com/api`.
    #[arg(long, env = "JOBHUB_API_URL")]
    api_url: Option<String>,

    /// File holding the signed-in session.
    #[arg(long, env = "JOBHUB_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "JOBHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "JOBHUB_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, value_enum, default_value_t = RoleArg::Candidate)]
        role: RoleArg,
    },
    Logout,
    Whoami,
    VerifyEmail {
        token: String,
    },
    ResendVerification {
        email: String,
    },
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        token: String,
        #[arg(long, env = "JOBHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Jobs(JobsCommand),
    Companies(CompaniesCommand),
    Applications(ApplicationsCommand),
    Profile(ProfileCommand),
    Employer(EmployerCommand),
    Admin(AdminCommand),
}

#[derive(Args, Debug, Default)]
struct PageArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Args, Debug)]
struct JobsCommand {
    #[command(subcommand)]
    command: JobsSubcommand,
}

#[derive(Subcommand, Debug)]
enum JobsSubcommand {
    List {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        employment_type: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Get {
        id: String,
    },
}

#[derive(Args, Debug)]
struct CompaniesCommand {
    #[command(subcommand)]
    command: CompaniesSubcommand,
}

#[derive(Subcommand, Debug)]
enum CompaniesSubcommand {
    List {
        #[arg(long)]
        keyword: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Get {
        id: String,
    },
}

#[derive(Args, Debug)]
struct ApplicationsCommand {
    #[command(subcommand)]
    command: ApplicationsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApplicationsSubcommand {
    List,
    Get {
        id: String,
    },
    Apply {
        job_id: String,
        #[arg(long)]
        cover_letter: Option<String>,
        #[arg(long)]
        resume: Option<String>,
    },
    Withdraw {
        id: String,
    },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        headline: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    AddExperience {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        start: String,
        #[arg(long, conflicts_with = "current")]
        end: Option<String>,
        #[arg(long)]
        current: bool,
        #[arg(long)]
        description: Option<String>,
    },
    DeleteExperience {
        id: String,
    },
    AddEducation {
        #[arg(long)]
        institution: String,
        #[arg(long)]
        degree: String,
        #[arg(long)]
        field: Option<String>,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: Option<String>,
    },
    DeleteEducation {
        id: String,
    },
    AddSkill {
        name: String,
        #[arg(long)]
        level: Option<String>,
    },
    RemoveSkill {
        id: String,
    },
    Documents,
    DeleteDocument {
        id: String,
    },
}

#[derive(Args, Debug)]
struct EmployerCommand {
    #[command(subcommand)]
    command: EmployerSubcommand,
}

#[derive(Subcommand, Debug)]
enum EmployerSubcommand {
    Dashboard,
    Jobs {
        #[command(flatten)]
        paging: PageArgs,
    },
    PostJob(PostJobArgs),
    CloseJob {
        id: String,
    },
    Applicants {
        job_id: String,
    },
    SetStatus {
        application_id: String,
        #[arg(long, value_enum)]
        status: StatusArg,
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Args, Debug)]
struct PostJobArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    location: String,
    #[arg(long, default_value = "full_time")]
    employment_type: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    salary_min: Option<f64>,
    #[arg(long)]
    salary_max: Option<f64>,
    #[arg(long)]
    currency: Option<String>,
    #[arg(long = "requirement")]
    requirements: Vec<String>,
    #[arg(long = "skill")]
    skills: Vec<String>,
    #[arg(long)]
    deadline: Option<String>,
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    Dashboard,
    Users {
        #[arg(long)]
        keyword: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Activate {
        user_id: String,
    },
    Deactivate {
        user_id: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RoleArg {
    Candidate,
    Employer,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Candidate => Self::Candidate,
            RoleArg::Employer => Self::Employer,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    Reviewing,
    Shortlisted,
    Interview,
    Offered,
    Hired,
    Rejected,
}

impl From<StatusArg> for ApplicationStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Reviewing => Self::Reviewing,
            StatusArg::Shortlisted => Self::Shortlisted,
            StatusArg::Interview => Self::Interview,
            StatusArg::Offered => Self::Offered,
            StatusArg::Hired => Self::Hired,
            StatusArg::Rejected => Self::Rejected,
        }
    }
}

// =============================================================================
// ENTRY
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(code = e.error_code(), error = %e, "command failed");
            eprintln!("error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config.base_url = normalize_base_url(url)?;
    }
    if let Some(path) = &cli.session_file {
        config.session_file.clone_from(path);
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = resolve_config(&cli)?;
    let session = Arc::new(SessionStore::new(Arc::new(FileStore::new(config.session_file.clone()))));
    session.init_auth();
    let listener = spawn_invalidation_listener(&session, || {
        eprintln!("Your session has expired. Run `jobhub login` to sign in again.");
    });
    let client = ApiClient::new(&config, session.clone())?;

    let result = dispatch(&client, cli.command).await;

    // Dropping the last session handle closes the event channel; the
    // listener drains pending events and exits.
    drop(client);
    drop(session);
    let _ = listener.await;
    result
}

async fn dispatch(client: &ApiClient, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => {
            let user = auth::login(client, &LoginForm { email, password }).await?;
            println!("Signed in as {} ({:?})", user.email, user.role);
            Ok(())
        }
        Command::Register { full_name, email, password, role } => {
            let form = RegisterForm {
                full_name,
                email,
                confirm_password: password.clone(),
                password,
                role: role.into(),
            };
            print_message(&auth::register(client, &form).await?);
            Ok(())
        }
        Command::Logout => {
            auth::logout(client);
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => {
            require_signed_in(client)?;
            print_json(&auth::current_user(client).await?)
        }
        Command::VerifyEmail { token } => {
            print_message(&auth::verify_email(client, &VerifyEmailForm { token }).await?);
            Ok(())
        }
        Command::ResendVerification { email } => {
            print_message(&auth::resend_verification(client, &EmailForm { email }).await?);
            Ok(())
        }
        Command::ForgotPassword { email } => {
            print_message(&auth::forgot_password(client, &EmailForm { email }).await?);
            Ok(())
        }
        Command::ResetPassword { token, password } => {
            let form = ResetPasswordForm { token, confirm_password: password.clone(), password };
            print_message(&auth::reset_password(client, &form).await?);
            Ok(())
        }
        Command::Jobs(jobs) => run_jobs(client, jobs.command).await,
        Command::Companies(companies) => run_companies(client, companies.command).await,
        Command::Applications(apps) => {
            require_signed_in(client)?;
            run_applications(client, apps.command).await
        }
        Command::Profile(profile) => {
            require_signed_in(client)?;
            run_profile(client, profile.command).await
        }
        Command::Employer(employer) => {
            require_signed_in(client)?;
            run_employer(client, employer.command).await
        }
        Command::Admin(admin) => {
            require_signed_in(client)?;
            run_admin(client, admin.command).await
        }
    }
}

async fn run_jobs(client: &ApiClient, command: JobsSubcommand) -> Result<(), CliError> {
    match command {
        JobsSubcommand::List { keyword, location, employment_type, company, paging } => {
            let filters = JobFilters {
                keyword,
                location,
                employment_type,
                company_id: company,
                page: paging.page,
                limit: paging.limit,
            };
            print_json(&jobs::list_jobs(client, &filters).await?)
        }
        JobsSubcommand::Get { id } => print_json(&jobs::get_job(client, &id).await?),
    }
}

async fn run_companies(client: &ApiClient, command: CompaniesSubcommand) -> Result<(), CliError> {
    match command {
        CompaniesSubcommand::List { keyword, paging } => {
            print_json(&jobs::list_companies(client, &list_query(keyword, &paging)).await?)
        }
        CompaniesSubcommand::Get { id } => print_json(&jobs::get_company(client, &id).await?),
    }
}

async fn run_applications(client: &ApiClient, command: ApplicationsSubcommand) -> Result<(), CliError> {
    match command {
        ApplicationsSubcommand::List => print_json(&applications::my_applications(client).await?),
        ApplicationsSubcommand::Get { id } => print_json(&applications::get_application(client, &id).await?),
        ApplicationsSubcommand::Apply { job_id, cover_letter, resume } => {
            let form = JobApplicationForm { job_id, cover_letter, resume_document_id: resume };
            print_json(&applications::apply(client, &form).await?)
        }
        ApplicationsSubcommand::Withdraw { id } => {
            print_json(&applications::withdraw_application(client, &id).await?)
        }
    }
}

async fn run_profile(client: &ApiClient, command: ProfileSubcommand) -> Result<(), CliError> {
    match command {
        ProfileSubcommand::Show => print_json(&profile::get_profile(client).await?),
        ProfileSubcommand::Update { full_name, headline, phone, location, bio } => {
            let full_name = full_name
                .or_else(|| client.session().user().map(|u| u.full_name))
                .unwrap_or_default();
            let form = PersonalInfoForm { full_name, headline, phone, location, bio };
            print_json(&profile::update_personal_info(client, &form).await?)
        }
        ProfileSubcommand::AddExperience { title, company, start, end, current, description } => {
            let form = ExperienceForm {
                title,
                company,
                location: None,
                start_date: start,
                end_date: end,
                is_current: current,
                description,
            };
            print_json(&profile::add_experience(client, &form).await?)
        }
        ProfileSubcommand::DeleteExperience { id } => {
            print_message(&profile::delete_experience(client, &id).await?);
            Ok(())
        }
        ProfileSubcommand::AddEducation { institution, degree, field, start, end } => {
            let form = EducationForm {
                institution,
                degree,
                field_of_study: field,
                start_date: start,
                end_date: end,
                grade: None,
            };
            print_json(&profile::add_education(client, &form).await?)
        }
        ProfileSubcommand::DeleteEducation { id } => {
            print_message(&profile::delete_education(client, &id).await?);
            Ok(())
        }
        ProfileSubcommand::AddSkill { name, level } => {
            print_json(&profile::add_skill(client, &SkillForm { name, level }).await?)
        }
        ProfileSubcommand::RemoveSkill { id } => {
            print_message(&profile::remove_skill(client, &id).await?);
            Ok(())
        }
        ProfileSubcommand::Documents => print_json(&profile::list_documents(client).await?),
        ProfileSubcommand::DeleteDocument { id } => {
            print_message(&profile::delete_document(client, &id).await?);
            Ok(())
        }
    }
}

async fn run_employer(client: &ApiClient, command: EmployerSubcommand) -> Result<(), CliError> {
    match command {
        EmployerSubcommand::Dashboard => print_json(&employer::dashboard(client).await?),
        EmployerSubcommand::Jobs { paging } => print_json(&employer::my_jobs(client, &list_query(None, &paging)).await?),
        EmployerSubcommand::PostJob(args) => print_json(&employer::create_job(client, &job_form(args)).await?),
        EmployerSubcommand::CloseJob { id } => print_json(&employer::close_job(client, &id).await?),
        EmployerSubcommand::Applicants { job_id } => print_json(&employer::job_applicants(client, &job_id).await?),
        EmployerSubcommand::SetStatus { application_id, status, note } => {
            let update = ApplicationStatusUpdate { status: status.into(), note };
            print_json(&employer::update_application_status(client, &application_id, &update).await?)
        }
    }
}

async fn run_admin(client: &ApiClient, command: AdminSubcommand) -> Result<(), CliError> {
    match command {
        AdminSubcommand::Dashboard => print_json(&admin::dashboard(client).await?),
        AdminSubcommand::Users { keyword, paging } => {
            print_json(&admin::list_users(client, &list_query(keyword, &paging)).await?)
        }
        AdminSubcommand::Activate { user_id } => print_json(&admin::set_user_active(client, &user_id, true).await?),
        AdminSubcommand::Deactivate { user_id } => print_json(&admin::set_user_active(client, &user_id, false).await?),
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn require_signed_in(client: &ApiClient) -> Result<(), CliError> {
    if client.session().is_authenticated() { Ok(()) } else { Err(CliError::NotSignedIn) }
}

fn list_query(keyword: Option<String>, paging: &PageArgs) -> ListQuery {
    ListQuery { keyword, page: paging.page, limit: paging.limit }
}

fn job_form(args: PostJobArgs) -> JobPostingForm {
    JobPostingForm {
        title: args.title,
        location: args.location,
        employment_type: args.employment_type,
        salary_min: args.salary_min,
        salary_max: args.salary_max,
        currency: args.currency,
        description: args.description,
        requirements: args.requirements,
        skills: args.skills,
        deadline: args.deadline,
    }
}

fn print_message(message: &str) {
    if message.trim().is_empty() {
        println!("ok");
    } else {
        println!("{message}");
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
