use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use enroll_api::RegistrationClient;
use enroll_engine::{FormDataStore, NotificationSink, StepController, SubmissionCoordinator, SubmissionOutcome, Transition};
use enroll_types::{ErrorMap, FieldName, FieldSet, Step, SubmissionPayload};
use enroll_util::{ClientConfig, default_log_path, load_config, redact_json, redact_sensitive, remove_secret, store_secret};
use tracing::{debug, warn};

/// Keychain entry the `token` subcommand manages. Reference it from the
/// config file as `${secret:enroll-api-token}`.
const TOKEN_SECRET_NAME: &str = "enroll-api-token";

#[derive(Debug, Parser)]
#[command(name = "enroll", version, about = "Create an account with the registration service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register without the interactive wizard
    Register(RegisterArgs),
    /// Manage the bearer token stored in the OS keychain
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Debug, Subcommand)]
enum TokenAction {
    /// Store a token
    Set { value: String },
    /// Remove the stored token
    Clear,
}

#[derive(Debug, Default, Args)]
struct RegisterArgs {
    /// JSON object of field values; flags override its entries
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,
    /// Print the request that would be sent, with secrets redacted
    #[arg(long)]
    dry_run: bool,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    confirm_password: Option<String>,
    /// Business type
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    zip: Option<String>,
    #[arg(long)]
    country: Option<String>,
}

impl RegisterArgs {
    fn flag_values(&self) -> [(FieldName, Option<&String>); 12] {
        [
            (FieldName::Email, self.email.as_ref()),
            (FieldName::FirstName, self.first_name.as_ref()),
            (FieldName::LastName, self.last_name.as_ref()),
            (FieldName::Password, self.password.as_ref()),
            (FieldName::ConfirmPassword, self.confirm_password.as_ref()),
            (FieldName::Type, self.kind.as_ref()),
            (FieldName::Company, self.company.as_ref()),
            (FieldName::Address, self.address.as_ref()),
            (FieldName::City, self.city.as_ref()),
            (FieldName::State, self.state.as_ref()),
            (FieldName::Zip, self.zip.as_ref()),
            (FieldName::Country, self.country.as_ref()),
        ]
    }
}

/// Prints submission feedback to the console.
struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn show_blocking_wait(&mut self) {
        eprintln!("Submitting registration...");
    }

    fn show_success(&mut self, message: &str) {
        if message.is_empty() {
            println!("Account created.");
        } else {
            println!("{}", message);
        }
    }

    fn show_error(&mut self, title: &str, message: &str) {
        eprintln!("{} {}", title, message);
    }

    fn close(&mut self) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // No subcommand => TUI
    let Some(command) = cli.command else {
        init_file_tracing(&default_log_path())?;
        let config = load_config().context("failed to load configuration")?;
        return enroll_tui::run(config).await;
    };

    init_tracing();
    match command {
        Command::Register(args) => {
            let config = load_config().context("failed to load configuration")?;
            run_register(&config, &args).await
        }
        Command::Token { action } => run_token(action),
    }
}

fn tracing_filter() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// The TUI owns the terminal, so its logs go to a file instead of stderr.
fn init_file_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

/// Gather field values from `--file` and the per-field flags.
fn collect_fields(args: &RegisterArgs) -> Result<FieldSet> {
    let mut fields = FieldSet::new();
    if let Some(path) = &args.file {
        let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let from_file: FieldSet =
            serde_json::from_str(&text).with_context(|| format!("{} must be a JSON object of strings", path.display()))?;
        for (key, value) in from_file {
            match key.parse::<FieldName>() {
                Ok(field) if FieldName::EDITABLE.contains(&field) => fields.set_field(field, value),
                _ => warn!(key = %key, "ignoring unknown field in input file"),
            }
        }
    }
    for (field, value) in args.flag_values() {
        if let Some(value) = value {
            fields.set_field(field, value.as_str());
        }
    }
    Ok(fields)
}

/// Walk both steps with `provided` as the input surface and return the
/// merged values ready for submission.
fn complete_steps(controller: &mut StepController, provided: &FieldSet) -> Result<FieldSet> {
    loop {
        let step = controller.current_step();
        let live = FormDataStore::merge(&controller.defaults(), provided);
        match controller.advance(&live) {
            Ok(Transition::Advanced(next)) => debug!(%next, "advanced"),
            Ok(Transition::Submit(merged)) => return Ok(merged),
            Err(errors) => {
                report_errors(step, &errors);
                bail!("{} has {} invalid field(s)", step.title(), errors.len());
            }
        }
    }
}

fn report_errors(step: Step, errors: &ErrorMap) {
    eprintln!("{}:", step.title());
    for (field, message) in errors.iter() {
        eprintln!("  {}: {}", field.label(), message);
    }
}

async fn run_register(config: &ClientConfig, args: &RegisterArgs) -> Result<()> {
    let provided = collect_fields(args)?;
    let mut controller = StepController::new(config.user_type.as_str());
    let merged = complete_steps(&mut controller, &provided)?;

    let client = RegistrationClient::from_config(config).context("failed to build registration client")?;

    if args.dry_run {
        let payload = SubmissionPayload::from_fields(&merged);
        println!("{}", serde_json::to_string_pretty(&request_preview(&client, &payload)?)?);
        return Ok(());
    }

    let coordinator = SubmissionCoordinator::new(Arc::new(client));
    match coordinator.submit(&mut controller, &mut ConsoleSink, &merged).await {
        SubmissionOutcome::Succeeded { .. } => Ok(()),
        SubmissionOutcome::Rejected { message } => bail!("registration rejected: {}", message),
        SubmissionOutcome::TransportFailed => bail!("registration service unreachable"),
        SubmissionOutcome::Ignored => bail!("a registration is already in progress"),
    }
}

/// Describe the request `client` would send, with credentials redacted.
fn request_preview(client: &RegistrationClient, payload: &SubmissionPayload) -> Result<serde_json::Value> {
    let request = client.request(payload).build()?;
    let mut headers_out = serde_json::Map::new();
    for (name, value) in request.headers().iter() {
        let val = value.to_str().unwrap_or("");
        let line = format!("{}: {}", name.as_str(), val);
        let redacted = redact_sensitive(&line);
        // Extract after ': '
        let out_val = redacted
            .split_once(':')
            .map(|(_, rest)| rest.trim())
            .unwrap_or("")
            .to_string();
        headers_out.insert(name.as_str().to_string(), serde_json::Value::String(out_val));
    }
    // Installed by the client at send time, never shown.
    if client.authenticated {
        headers_out.insert("authorization".to_string(), serde_json::Value::String("[REDACTED]".to_string()));
    }
    let body = serde_json::to_value(payload)?;
    Ok(serde_json::json!({
        "method": request.method().to_string(),
        "url": request.url().to_string(),
        "headers": headers_out,
        "body": redact_json(&body),
    }))
}

fn run_token(action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Set { value } => {
            store_secret(TOKEN_SECRET_NAME, value.trim()).context("failed to store token")?;
            println!(
                "Token stored. Set \"token\": \"${{secret:{}}}\" in your config to use it.",
                TOKEN_SECRET_NAME
            );
        }
        TokenAction::Clear => {
            remove_secret(TOKEN_SECRET_NAME).context("failed to remove token")?;
            println!("Token removed.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn full_args() -> RegisterArgs {
        RegisterArgs {
            email: Some("a@b.com".into()),
            first_name: Some("A".into()),
            last_name: Some("B".into()),
            password: Some("abcde".into()),
            confirm_password: Some("abcde".into()),
            kind: Some("dealer".into()),
            company: Some("Acme".into()),
            address: Some("1 Main St".into()),
            city: Some("Springfield".into()),
            state: Some("IL".into()),
            zip: Some("62701".into()),
            country: Some("US".into()),
            ..RegisterArgs::default()
        }
    }

    fn local_config() -> ClientConfig {
        ClientConfig {
            base_url: "http://localhost:4000".into(),
            token: Some("secret-token".into()),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn cli_parses_register_flags() {
        let cli = Cli::parse_from(["enroll", "register", "--email", "a@b.com", "--type", "dealer", "--dry-run"]);
        let Some(Command::Register(args)) = cli.command else {
            panic!("expected register subcommand");
        };
        assert!(args.dry_run);
        assert_eq!(args.email.as_deref(), Some("a@b.com"));
        assert_eq!(args.kind.as_deref(), Some("dealer"));
    }

    #[test]
    fn no_subcommand_means_wizard() {
        assert!(Cli::parse_from(["enroll"]).command.is_none());
    }

    #[test]
    fn flags_override_file_values_and_unknown_keys_are_dropped() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"email":"old@b.com","city":"Shelbyville","userType":"root","nickname":"x"}}"#).expect("write");
        let args = RegisterArgs {
            file: Some(file.path().to_path_buf()),
            email: Some("new@b.com".into()),
            ..RegisterArgs::default()
        };
        let fields = collect_fields(&args).expect("fields collected");
        assert_eq!(fields.value(FieldName::Email), "new@b.com");
        assert_eq!(fields.value(FieldName::City), "Shelbyville");
        assert!(!fields.contains_key("userType"));
        assert!(!fields.contains_key("nickname"));
    }

    #[test]
    fn complete_steps_returns_merged_values() {
        let provided = collect_fields(&full_args()).expect("fields collected");
        let mut controller = StepController::new("admin");
        let merged = complete_steps(&mut controller, &provided).expect("both steps valid");
        assert_eq!(controller.current_step(), Step::Second);
        assert_eq!(merged.value(FieldName::Company), "Acme");
        assert_eq!(merged.value(FieldName::UserType), "admin");
    }

    #[test]
    fn complete_steps_stops_at_first_invalid_step() {
        let args = RegisterArgs {
            confirm_password: Some("abcdf".into()),
            ..full_args()
        };
        let provided = collect_fields(&args).expect("fields collected");
        let mut controller = StepController::new("admin");
        assert!(complete_steps(&mut controller, &provided).is_err());
        assert_eq!(controller.current_step(), Step::First);
    }

    #[test]
    fn preview_redacts_credentials() {
        let provided = collect_fields(&full_args()).expect("fields collected");
        let mut controller = StepController::new("admin");
        let merged = complete_steps(&mut controller, &provided).expect("valid");
        let client = RegistrationClient::from_config(&local_config()).expect("client builds");

        let preview = request_preview(&client, &SubmissionPayload::from_fields(&merged)).expect("preview");
        assert_eq!(preview["method"], "POST");
        assert_eq!(preview["url"], "http://localhost:4000/users/register");
        assert_eq!(preview["headers"]["authorization"], "[REDACTED]");
        assert_eq!(preview["body"]["password"], "[REDACTED]");
        assert_eq!(preview["body"]["email"], "a@b.com");
        assert!(preview["body"].get("confirmPassword").is_none());
        assert!(!preview.to_string().contains("secret-token"));
    }
}
