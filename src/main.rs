use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use concordia_house::{
    client::{SubmissionClient, DEFAULT_ENDPOINT},
    config::{self, Config},
    db::{self, PgStore, StoredRecord},
    export,
    form::{
        ApplicationForm, FormController, FormSchema, IncidentForm, InterestForm, SubmitRefused,
        SubmitState, SuggestionForm, SuggestionGate,
    },
    models::{ApplicationRecord, IncidentRecord, InterestRecord, RecordKind, SuggestionRecord},
    server,
    store::MemoryStore,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "concordia-house")]
#[command(about = "Form submissions for Concordia House student accommodation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the submission endpoints
    Serve {
        /// Keep submissions in process memory instead of Postgres
        #[arg(long)]
        in_memory: bool,
    },
    /// Create or upgrade the database schema
    InitDb,
    /// Print the newest records of one kind
    Recent {
        #[arg(long, value_enum)]
        kind: RecordKind,
        #[arg(long, default_value_t = 5)]
        limit: i64,
    },
    /// Write every record of one kind to a CSV file
    Export {
        #[arg(long, value_enum)]
        kind: RecordKind,
        #[arg(long)]
        out: PathBuf,
    },
    /// Fill in and submit a form
    Submit {
        /// Base URL of the deployment
        #[arg(long, env = "CONCORDIA_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
        #[command(subcommand)]
        form: FormCommand,
    },
}

#[derive(Subcommand)]
enum FormCommand {
    /// Join the room waitlist
    Application(ApplicationForm),
    /// Report an incident
    Incident(IncidentForm),
    /// Register waitlist interest
    Interest(InterestForm),
    /// Leave a suggestion (needs the residence access code)
    Suggestion {
        #[arg(long, default_value = "")]
        access_code: String,
        #[command(flatten)]
        form: SuggestionForm,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { in_memory } => {
            let config = Config::load()?;

            if in_memory {
                info!("Using in-memory store, submissions are lost on exit");
                server::serve(config, MemoryStore::new()).await?;
            } else {
                let pool = connect(config.max_connections).await?;
                server::serve(config, PgStore::new(pool)).await?;
            }
        }
        Commands::InitDb => {
            let pool = connect(Config::load()?.max_connections).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Recent { kind, limit } => {
            let pool = connect(Config::load()?.max_connections).await?;
            let output = match kind {
                RecordKind::Application => recent::<ApplicationRecord>(&pool, limit).await?,
                RecordKind::Incident => recent::<IncidentRecord>(&pool, limit).await?,
                RecordKind::Interest => recent::<InterestRecord>(&pool, limit).await?,
                RecordKind::Suggestion => recent::<SuggestionRecord>(&pool, limit).await?,
            };
            print!("{output}");
        }
        Commands::Export { kind, out } => {
            let pool = connect(Config::load()?.max_connections).await?;
            let written = match kind {
                RecordKind::Application => export_all::<ApplicationRecord>(&pool, &out).await?,
                RecordKind::Incident => export_all::<IncidentRecord>(&pool, &out).await?,
                RecordKind::Interest => export_all::<InterestRecord>(&pool, &out).await?,
                RecordKind::Suggestion => export_all::<SuggestionRecord>(&pool, &out).await?,
            };
            println!("Exported {written} {kind} records to {}.", out.display());
        }
        Commands::Submit { endpoint, form } => {
            let client = SubmissionClient::new(endpoint);

            match form {
                FormCommand::Application(form) => {
                    submit(&client, FormController::new(form)).await?
                }
                FormCommand::Incident(form) => submit(&client, FormController::new(form)).await?,
                FormCommand::Interest(form) => submit(&client, FormController::new(form)).await?,
                FormCommand::Suggestion { access_code, form } => {
                    let mut controller = match SuggestionGate.unlock(&access_code) {
                        Ok(controller) => controller,
                        Err((_, error)) => bail!("{error}"),
                    };
                    *controller.form_mut() = form;
                    submit(&client, controller).await?
                }
            }
        }
    }

    Ok(())
}

async fn connect(max_connections: u32) -> anyhow::Result<PgPool> {
    let database_url = config::database_url()?;

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn recent<T: StoredRecord>(pool: &PgPool, limit: i64) -> anyhow::Result<String> {
    let records = db::fetch_records::<T>(pool, Some(limit.max(1))).await?;
    export::render_recent(T::LABEL, &records)
}

async fn export_all<T: StoredRecord>(pool: &PgPool, out: &std::path::Path) -> anyhow::Result<usize> {
    let records = db::fetch_records::<T>(pool, None).await?;
    export::write_csv(&records, out)
}

async fn submit<F: FormSchema>(
    client: &SubmissionClient,
    mut controller: FormController<F>,
) -> anyhow::Result<()> {
    let id = match client.submit(&mut controller).await {
        Ok(id) => id,
        Err(SubmitRefused::Invalid(errors)) => {
            for (field, message) in errors.iter() {
                println!("- {field}: {message}");
            }
            bail!("{} field(s) need attention", errors.len());
        }
        Err(refused) => bail!("{refused}"),
    };

    match controller.state() {
        SubmitState::Success => {
            println!("{}", F::SUCCESS_TITLE);
            println!("{}", F::SUCCESS_MESSAGE);
            if let Some(id) = id {
                println!("Reference: {id}");
            }
            Ok(())
        }
        SubmitState::Error(banner) => bail!("{banner}"),
        SubmitState::Idle | SubmitState::Submitting => bail!("submission did not settle"),
    }
}
