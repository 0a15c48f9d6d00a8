use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use object_crud_demo::{
    adapters::inbound::cli::StdinPrompt,
    app::{AppBuilder, StorageBackend},
    config::{ClientConfig, DEFAULT_CONFIG_FILE, DEFAULT_PROFILE},
    services::{DEFAULT_BUCKET_NAME, DEFAULT_DATA_OBJECT_NAME, DEFAULT_FILE_OBJECT_NAME},
    BucketName, CrudWalkthrough, NoPause, ObjectKey, OperatorPrompt, WalkthroughOptions,
    WalkthroughReport,
};
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "object-crud-demo")]
#[command(about = "Create a bucket, upload, list, download and verify objects, then clean up", long_about = None)]
struct Cli {
    /// Local file to upload
    file: Option<PathBuf>,

    /// Client configuration file (INI profiles)
    #[arg(long, env = "OBJECT_CRUD_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Profile to read from the configuration file
    #[arg(long, env = "OBJECT_CRUD_PROFILE", default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Storage backend type (s3, local, memory)
    #[arg(long, env = "STORAGE_BACKEND", default_value = "s3")]
    storage_backend: String,

    /// Root directory for the local backend
    #[arg(long, env = "STORAGE_ROOT")]
    storage_root: Option<PathBuf>,

    /// Bucket to create and delete
    #[arg(long, default_value = DEFAULT_BUCKET_NAME)]
    bucket_name: String,

    /// Name of the object holding the in-memory payload
    #[arg(long, default_value = DEFAULT_DATA_OBJECT_NAME)]
    data_object: String,

    /// Name of the object holding the uploaded file
    #[arg(long, default_value = DEFAULT_FILE_OBJECT_NAME)]
    file_object: String,

    /// Skip the pause before clean-up
    #[arg(long)]
    no_pause: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn init_logging(&self) {
        let level = self.log_level.parse::<Level>().unwrap_or(Level::INFO);

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
    }

    /// The file argument, if it names an existing file
    fn source_file(&self) -> Option<PathBuf> {
        self.file.clone().filter(|path| path.is_file())
    }

    fn storage_backend(&self) -> Result<StorageBackend> {
        let backend = match self.storage_backend.parse::<StorageBackend>()? {
            StorageBackend::Local { .. } => StorageBackend::Local {
                root: self.storage_root.clone(),
            },
            other => other,
        };
        Ok(backend)
    }

    /// Load the profile. Only the s3 backend cannot run without one.
    fn client_config(&self, backend: &StorageBackend) -> Result<Option<ClientConfig>> {
        if !self.config.exists() && *backend != StorageBackend::S3 {
            warn!(config = %self.config.display(), "no configuration file, using local defaults");
            return Ok(None);
        }

        let config = ClientConfig::from_file(&self.config, &self.profile).with_context(|| {
            format!(
                "Failed to load profile {} from {}",
                self.profile,
                self.config.display()
            )
        })?;
        Ok(Some(config))
    }

    fn walkthrough_options(&self) -> Result<WalkthroughOptions> {
        Ok(WalkthroughOptions::new(
            BucketName::new(self.bucket_name.clone()).context("Invalid bucket name")?,
            ObjectKey::new(self.data_object.clone()).context("Invalid data object name")?,
            ObjectKey::new(self.file_object.clone()).context("Invalid file object name")?,
        ))
    }
}

fn print_usage() {
    eprintln!("{}", Cli::command().render_usage());
    eprintln!("  <FILE> must name an existing file to upload");
}

fn print_report(report: &WalkthroughReport) {
    if let Some(bucket) = &report.bucket {
        println!(
            "Bucket {} created in namespace {} (compartment {})",
            bucket.name, bucket.namespace, bucket.compartment_id
        );
    }
    for object in &report.listed {
        println!("  {} ({} bytes)", object.name, object.size);
    }
    if let Some(matches) = report.string_matches {
        println!("Retrieved string matches payload: {}", matches);
    }
    if let Some(matches) = report.file_matches {
        println!("Downloaded file matches source: {}", matches);
    }
    if let (Some(source), Some(retrieved)) = (&report.source_md5, &report.retrieved_md5) {
        println!("MD5 source {} retrieved {}", source, retrieved);
    }
    println!(
        "Deleted {} object(s), bucket deleted: {}",
        report.deleted.len(),
        report.bucket_deleted
    );
    if let Some(error) = &report.error {
        eprintln!("Error: {}", error);
    }
    for error in &report.cleanup_errors {
        eprintln!("Clean-up error: {}", error);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging();

    let Some(source) = cli.source_file() else {
        print_usage();
        return Ok(ExitCode::FAILURE);
    };

    let backend = cli.storage_backend()?;
    info!(backend = ?backend, file = %source.display(), "Starting object storage walkthrough");

    let mut builder = AppBuilder::new().with_storage_backend(backend.clone());
    if let Some(config) = cli.client_config(&backend)? {
        builder = builder.with_client_config(config);
    }
    let compartment_id = builder.compartment_id()?;
    let client = builder.build().context("Failed to create storage client")?;

    let prompt: Arc<dyn OperatorPrompt> = if cli.no_pause {
        Arc::new(NoPause)
    } else {
        Arc::new(StdinPrompt)
    };

    let walkthrough =
        CrudWalkthrough::new(client, prompt, compartment_id, cli.walkthrough_options()?);
    let report = walkthrough.run(&source).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(if report.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["object-crud-demo", "upload.txt"]);

        assert_eq!(cli.file, Some(PathBuf::from("upload.txt")));
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(cli.profile, DEFAULT_PROFILE);
        assert_eq!(cli.bucket_name, DEFAULT_BUCKET_NAME);
        assert!(!cli.no_pause);
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "object-crud-demo",
            "--storage-backend",
            "local",
            "--storage-root",
            "/tmp/buckets",
            "--bucket-name",
            "my-bucket",
            "--no-pause",
            "--json",
            "photo.jpg",
        ]);

        assert_eq!(
            cli.storage_backend().unwrap(),
            StorageBackend::Local {
                root: Some(PathBuf::from("/tmp/buckets"))
            }
        );
        assert_eq!(
            cli.walkthrough_options().unwrap().bucket_name.as_str(),
            "my-bucket"
        );
        assert!(cli.no_pause);
        assert!(cli.json);
    }

    #[test]
    fn test_missing_or_nonexistent_file() {
        let cli = Cli::parse_from(["object-crud-demo"]);
        assert!(cli.source_file().is_none());

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let cli = Cli::parse_from(["object-crud-demo", missing.to_str().unwrap()]);
        assert!(cli.source_file().is_none());

        let present = dir.path().join("present.txt");
        std::fs::write(&present, b"data").unwrap();
        let cli = Cli::parse_from(["object-crud-demo", present.to_str().unwrap()]);
        assert_eq!(cli.source_file(), Some(present));
    }

    #[test]
    fn test_invalid_object_name_is_rejected() {
        let cli = Cli::parse_from(["object-crud-demo", "--data-object", "/leading", "f"]);
        assert!(cli.walkthrough_options().is_err());
    }
}
