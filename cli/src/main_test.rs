use clap::CommandFactory;

use super::*;

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn parses_login_with_global_flags() {
    let cli = Cli::try_parse_from([
        "jobhub",
        "--api-url",
        "http://127.0.0.1:8000/api",
        "login",
        "--email",
        "ada@example.com",
        "--password",
        "secret123",
    ])
    .unwrap();
    assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:8000/api"));
    match cli.command {
        Command::Login { email, password } => {
            assert_eq!(email, "ada@example.com");
            assert_eq!(password, "secret123");
        }
        other => panic!("expected login, got {other:?}"),
    }
}

#[test]
fn parses_nested_job_filters() {
    let cli = Cli::try_parse_from(["jobhub", "jobs", "list", "--keyword", "rust", "--page", "2"]).unwrap();
    let Command::Jobs(JobsCommand { command: JobsSubcommand::List { keyword, paging, .. } }) = cli.command else {
        panic!("expected jobs list");
    };
    assert_eq!(keyword.as_deref(), Some("rust"));
    assert_eq!(paging.page, Some(2));
    assert_eq!(paging.limit, None);
}

#[test]
fn set_status_maps_to_application_status() {
    let cli = Cli::try_parse_from(["jobhub", "employer", "set-status", "42", "--status", "shortlisted"]).unwrap();
    let Command::Employer(EmployerCommand { command: EmployerSubcommand::SetStatus { application_id, status, .. } }) =
        cli.command
    else {
        panic!("expected employer set-status");
    };
    assert_eq!(application_id, "42");
    assert_eq!(ApplicationStatus::from(status), ApplicationStatus::Shortlisted);
}

#[test]
fn experience_end_conflicts_with_current() {
    let result = Cli::try_parse_from([
        "jobhub",
        "profile",
        "add-experience",
        "--title",
        "Engineer",
        "--company",
        "Acme",
        "--start",
        "2020-01-01",
        "--end",
        "2021-01-01",
        "--current",
    ]);
    assert!(result.is_err());
}

#[test]
fn validation_errors_list_every_field() {
    let mut errors = jobhub_client::util::validation::FieldErrors::new();
    errors.add("email", "Enter a valid email address");
    errors.add("password", "This field is required");
    let err = CliError::from(ApiError::Validation(errors));
    assert_eq!(err.user_message(), "email: Enter a valid email address; password: This field is required");
    assert_eq!(err.error_code(), "E_VALIDATION");
    assert_eq!(CliError::NotSignedIn.error_code(), "E_NOT_SIGNED_IN");
}

#[test]
fn register_role_excludes_admin() {
    assert!(Cli::try_parse_from(["jobhub", "register", "--full-name", "A", "--email", "a@b.co", "--password", "x", "--role", "admin"]).is_err());
    assert_eq!(Role::from(RoleArg::Employer), Role::Employer);
}
