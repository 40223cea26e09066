use anyhow::Result;
use clap::Parser;
use dataset_size::{MissingSize, SizeOptions, display};
use tracing_subscriber::{EnvFilter, fmt};

/// Prints the total size of a BigQuery dataset.
///
/// Credentials come from the environment (application-default credentials);
/// only read access to the dataset is required.
#[derive(Debug, Parser)]
#[command(name = "dataset-size", version)]
struct Args {
    /// Project that owns the dataset.
    project_id: String,

    /// Dataset to measure.
    dataset_id: String,

    /// Fail instead of counting a table with a missing or malformed size
    /// as zero bytes.
    #[arg(long)]
    strict: bool,

    /// Cap on listing page sizes; the service picks its own by default.
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();

    let options = SizeOptions {
        missing_size: if args.strict {
            MissingSize::Fail
        } else {
            MissingSize::Zero
        },
        max_page_size: args.page_size,
    };

    let megabytes =
        dataset_size::dataset_size_mb(&args.project_id, &args.dataset_id, options).await?;

    println!("{}", display::format_size(megabytes));
    Ok(())
}
