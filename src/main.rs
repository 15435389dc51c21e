use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use nrspace::components::{DocumentManager, DownloadAction, FileUploader, LoadOutcome, MediaListLoader};
use nrspace::config::{load_settings, Settings};
use nrspace::surface::{ConsoleSurface, DownloadLink, HtmlSurface, Surface};
use nrspace::view::{self, MediaListView, View, MSG_DOWNLOAD_UNAVAILABLE};
use nrspace::{ApiClient, Category, EventBus, MediaKind, Page, PageDeps, SelectedFile};

#[derive(Parser)]
#[command(name = "nrspace", version, about = "NR Space media, documents and uploads")]
struct Cli {
    /// Server base URL
    #[arg(long, global = true, env = "NRSPACE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List audio files
    Audio,
    /// List videos
    Videos,
    /// List gallery images and videos
    Gallery,
    /// List documents, optionally filtered
    Documents {
        /// Case-insensitive search on name and description
        #[arg(short, long, default_value = "")]
        search: String,
        /// Type tag (pdf, docx, ...) or "all"
        #[arg(short = 't', long = "type", default_value = "all")]
        type_filter: String,
    },
    /// Download a document by name
    Download {
        name: String,
        /// Output directory (defaults to the configured download directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Upload files to a category, one at a time
    Upload {
        category: Category,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Bootstrap a page skeleton against the server and print its markup
    Render { page: PathBuf },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "nrspace=debug" } else { "nrspace=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut settings = load_settings().await;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(timeout) = cli.timeout {
        settings.request_timeout = timeout;
    }

    let client = Arc::new(
        ApiClient::from_settings(&settings)
            .with_context(|| format!("invalid server address {}", settings.base_url))?,
    );

    match cli.command {
        Command::Audio => cmd_media(client, MediaKind::Audio).await,
        Command::Videos => cmd_media(client, MediaKind::Video).await,
        Command::Gallery => cmd_media(client, MediaKind::Gallery).await,
        Command::Documents {
            search,
            type_filter,
        } => cmd_documents(client, &search, &type_filter).await,
        Command::Download { name, out } => cmd_download(client, &settings, &name, out).await,
        Command::Upload { category, files } => cmd_upload(client, &settings, category, files).await,
        Command::Render { page } => cmd_render(client, &settings, page).await,
    }
}

async fn cmd_media(client: Arc<ApiClient>, kind: MediaKind) -> Result<()> {
    let loader = MediaListLoader::new(kind, client, Arc::new(ConsoleSurface::stdout()));
    if let MediaListView::Error { .. } = loader.load().await {
        bail!("could not load {}", kind.endpoint());
    }
    Ok(())
}

async fn cmd_documents(client: Arc<ApiClient>, search: &str, type_filter: &str) -> Result<()> {
    let manager = DocumentManager::new(client, Arc::new(HtmlSurface::new()));
    if manager.load_documents().await == LoadOutcome::Failed {
        bail!("could not load documents");
    }

    manager.filter_documents(search, type_filter);
    print!("{}", view::text::documents(&manager.view()));
    Ok(())
}

async fn cmd_download(
    client: Arc<ApiClient>,
    settings: &Settings,
    name: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    let manager = DocumentManager::new(client.clone(), Arc::new(HtmlSurface::new()));
    if manager.load_documents().await == LoadOutcome::Failed {
        bail!("could not load documents");
    }

    let documents = manager.documents();
    let Some(doc) = documents
        .iter()
        .find(|d| d.name == name)
        .or_else(|| documents.iter().find(|d| d.name.eq_ignore_ascii_case(name)))
    else {
        bail!("no document named {:?}", name);
    };

    let link: DownloadLink = match manager.download_document(&doc.url, &doc.name) {
        DownloadAction::Started(link) => link,
        DownloadAction::Unavailable => {
            println!("{}", style(MSG_DOWNLOAD_UNAVAILABLE).yellow());
            return Ok(());
        }
    };

    let dir = out.unwrap_or_else(|| settings.download_dir.clone());
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("cannot create {}", dir.display()))?;
    let bytes = client
        .download(&link.url)
        .await
        .with_context(|| format!("download of {} failed", link.url))?;
    let path = dir.join(&link.filename);
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("cannot write {}", path.display()))?;

    println!("{} {}", style("saved").green(), path.display());
    Ok(())
}

/// Shows uploader views on a progress bar, printing result lines as they
/// arrive.
struct ProgressSurface {
    bar: ProgressBar,
    printed: Mutex<usize>,
}

impl ProgressSurface {
    fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos:>3}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self {
            bar,
            printed: Mutex::new(0),
        }
    }
}

impl Surface for ProgressSurface {
    fn render(&self, view: &View) {
        let View::Upload(upload) = view else {
            return;
        };
        self.bar.set_position(upload.progress.percent.round() as u64);

        let mut printed = self.printed.lock();
        for line in upload.results.iter().skip(*printed) {
            self.bar.println(view::text::result_line(line));
        }
        *printed = upload.results.len();

        if !upload.progress.visible && *printed > 0 {
            self.bar.finish_and_clear();
        }
    }

    fn notice(&self, message: &str) {
        self.bar.println(message);
    }

    fn download(&self, _link: &DownloadLink) {}
}

async fn cmd_upload(
    client: Arc<ApiClient>,
    settings: &Settings,
    category: Category,
    paths: Vec<PathBuf>,
) -> Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());
        let file = SelectedFile::from_path(&expanded)
            .await
            .with_context(|| format!("cannot read {}", expanded.display()))?;
        files.push(file);
    }

    let uploader = FileUploader::new(
        category,
        client,
        Arc::new(ProgressSurface::new()),
        EventBus::new(),
        settings.upload_settle_delay(),
    );
    let summary = uploader.browse(files).await;

    println!(
        "{} of {} file(s) uploaded to {}",
        summary.uploaded, summary.total, category
    );
    if !summary.all_succeeded() {
        bail!("{} upload(s) failed", summary.failed);
    }
    Ok(())
}

async fn cmd_render(client: Arc<ApiClient>, settings: &Settings, page: PathBuf) -> Result<()> {
    let html = tokio::fs::read_to_string(&page)
        .await
        .with_context(|| format!("cannot read {}", page.display()))?;

    let page = Page::bootstrap(
        &html,
        PageDeps {
            api: client,
            bus: EventBus::new(),
            settle_delay: settings.upload_settle_delay(),
        },
    )
    .await;

    if page.sections().is_empty() {
        bail!("no NR Space containers found in the page");
    }
    println!("{}", page.html());
    Ok(())
}
