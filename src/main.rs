use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use url::Url;

use paper_transfer::storage::DirectorySink;
use paper_transfer::upload::{Banner, FormState, SelectedFile, UploadForm};
use paper_transfer::{ApiClient, Config};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "paper-transfer", about = "Upload, list and download exam papers")]
struct Cli {
    /// Base URL of the paper API, e.g. http://localhost:8080/api/v1
    #[arg(long, global = true)]
    api_url: Option<Url>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a PDF and upload it for moderation
    Upload {
        #[arg(long)]
        file: PathBuf,
        /// Course ids, separated by commas or spaces
        #[arg(long)]
        course_ids: String,
        #[arg(long)]
        remarks: String,
        /// Moderator user id; defaults to the first active moderator
        #[arg(long)]
        moderator: Option<i64>,
    },
    /// List uploaded papers
    List,
    /// Download a paper into the download folder
    Download {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        moderator: i64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Replace a paper's file, name and remarks
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        remarks: String,
    },
    /// Show the question structure of a paper
    Structure {
        #[arg(long)]
        id: i64,
    },
    Moderators,
    Users,
    /// Activate or deactivate a user
    UserStatus {
        #[arg(long)]
        id: i64,
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
    Roles,
    Permissions,
    AcademicYears,
    DegreePrograms,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paper_transfer=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    let client = ApiClient::new(&config)?;
    tracing::debug!("Using paper API at {}", client.base_url());

    match cli.command {
        Command::Upload {
            file,
            course_ids,
            remarks,
            moderator,
        } => upload(&client, &config, file, course_ids, remarks, moderator).await?,
        Command::List => print_json(&client.list_papers().await?)?,
        Command::Download { id, moderator, out } => {
            let sink = DirectorySink::new(out.unwrap_or_else(|| config.download_folder.clone()));
            let saved = client.download_paper(id, moderator, &sink).await?;
            match saved.location {
                Some(path) => println!("Saved {} ({} bytes)", path.display(), saved.size),
                None => println!("Saved {} ({} bytes)", saved.file_name, saved.size),
            }
        }
        Command::Delete { id } => {
            let body = client.delete_paper(id).await?;
            print_message(body.and_then(|b| b.message), "Paper deleted.");
        }
        Command::Update {
            id,
            file,
            name,
            remarks,
        } => {
            let selected = SelectedFile::from_path(&file).await?;
            let name = name.unwrap_or_else(|| selected.name.clone());
            let body = client.update_paper(id, &selected, &name, &remarks).await?;
            print_message(body.and_then(|b| b.message), "Paper updated.");
        }
        Command::Structure { id } => print_json(&client.structure_data(id).await?)?,
        Command::Moderators => {
            for moderator in client.list_moderators().await? {
                println!("{}\t{}", moderator.id, moderator.label());
            }
        }
        Command::Users => print_json(&client.list_users().await?)?,
        Command::UserStatus { id, active } => {
            let ack = client.set_user_status(id, active).await?;
            print_message(ack, "User status updated.");
        }
        Command::Roles => print_json(&client.list_roles().await?)?,
        Command::Permissions => print_json(&client.list_permissions().await?)?,
        Command::AcademicYears => print_json(&client.list_academic_years().await?)?,
        Command::DegreePrograms => print_json(&client.list_degree_programs().await?)?,
    }

    Ok(())
}

async fn upload(
    client: &ApiClient,
    config: &Config,
    file: PathBuf,
    course_ids: String,
    remarks: String,
    moderator: Option<i64>,
) -> Result<(), BoxError> {
    let mut form = UploadForm::new(config.creator_id, config.academic_year_id);
    match moderator {
        Some(id) => form.select_moderator(id),
        None => {
            if let Err(e) = form.load_moderators(client).await {
                if let Some(Banner::Error(message)) = form.banner() {
                    eprintln!("{message}");
                }
                return Err(e.into());
            }
        }
    }

    let selected = SelectedFile::from_path(&file).await?;
    if let Err(e) = form.select_file(selected) {
        eprintln!("{e}");
        return Err(e.into());
    }
    form.set_course_code(course_ids);
    form.set_remarks(remarks);

    let state = form.submit(client).await;
    match form.banner() {
        Some(Banner::Success(message)) => println!("{message}"),
        Some(Banner::Error(message)) => eprintln!("{message}"),
        None => {}
    }
    if state == FormState::Success {
        Ok(())
    } else {
        Err("upload was not accepted".into())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), BoxError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_message(message: Option<String>, fallback: &str) {
    println!("{}", message.as_deref().unwrap_or(fallback));
}
