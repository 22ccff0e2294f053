//! Savanna CLI: admin client for the Savanna content API.
//!
//! Set SAVANNA_API_URL (default http://localhost:5000). `savanna login` stores
//! the admin token in ~/.savanna/token (or $SAVANNA_TOKEN_FILE).

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use savanna_api_client::{ApiClient, Session};
use savanna_cli::{confirm, init_tracing, orphan_prompt, print_json, progress_line, summary_lines};
use savanna_core::models::{CreatePhotoRequest, SettingUpdate, UpdateSlideRequest};
use savanna_upload::{
    AssetPicker, BatchUploader, CategoryFilter, DirectUploader, HomepageDraft,
    PickerTarget, SettingsDraft,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "savanna", about = "Savanna admin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as the admin and store the token
    Login {
        #[arg(long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// Show the API URL, session state and server health
    Whoami,
    /// Compress and upload images straight to the media host, then register them
    Upload {
        /// Image files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Category UUID the photos go into
        #[arg(long)]
        category: Uuid,
    },
    /// Portfolio photos
    Photos {
        #[command(subcommand)]
        sub: PhotoCommands,
    },
    /// Homepage slides
    Slides {
        #[command(subcommand)]
        sub: SlideCommands,
    },
    /// Photo categories
    Categories {
        #[command(subcommand)]
        sub: CategoryCommands,
    },
    /// Site settings
    Settings {
        #[command(subcommand)]
        sub: SettingCommands,
    },
    /// Print a bcrypt hash for ADMIN_PASSWORD_HASH
    HashPassword {
        password: String,
        #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
        cost: u32,
    },
}

#[derive(Subcommand)]
enum PhotoCommands {
    List {
        /// Only photos in this category
        #[arg(long)]
        category: Option<Uuid>,
    },
    /// Register an image that is already hosted
    Add {
        #[arg(long)]
        url: String,
        #[arg(long)]
        category: Uuid,
        #[arg(long)]
        featured: bool,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum SlideCommands {
    List,
    /// Add a slide from a URL or from an uploaded photo
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, conflicts_with = "photo", required_unless_present = "photo")]
        url: Option<String>,
        /// Reuse the image of this photo
        #[arg(long)]
        photo: Option<Uuid>,
        #[arg(long)]
        order: Option<i32>,
    },
    Update {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        order: Option<i32>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    List,
    Add {
        name: String,
    },
    /// Delete a category. Its photos are kept.
    Delete {
        id: Uuid,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SettingCommands {
    List,
    Get {
        key: String,
    },
    Set {
        key: String,
        value: String,
    },
    /// Point an image setting at an uploaded photo
    Pick {
        key: String,
        #[arg(long)]
        photo: Uuid,
        /// Only accept photos from this category
        #[arg(long)]
        category: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::HashPassword { password, cost } = &cli.command {
        let hash = bcrypt::hash(password, *cost).context("Failed to hash password")?;
        println!("{}", hash);
        return Ok(());
    }

    let mut session = Session::from_env().context("Failed to load session")?;
    let client = ApiClient::from_env(&session).context("Failed to create API client")?;

    match cli.command {
        Commands::HashPassword { .. } => {}
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            let response = client.login(&mut session, &username, &password).await?;
            println!("Logged in as {}", response.username);
        }
        Commands::Logout => {
            session.logout()?;
            println!("Logged out");
        }
        Commands::Whoami => {
            println!("api: {}", client.base_url());
            println!(
                "session: {}",
                if session.is_authenticated() {
                    "logged in"
                } else {
                    "logged out"
                }
            );
            match client.health().await {
                Ok(health) => println!(
                    "server: {} (database {}, media host {})",
                    health.status, health.database, health.vendor
                ),
                Err(e) => println!("server: unreachable ({})", e),
            }
        }
        Commands::Upload { files, category } => {
            require_login(&client)?;
            upload(&client, files, category).await?;
        }
        Commands::Photos { sub } => photos(&client, sub).await?,
        Commands::Slides { sub } => slides(&client, sub).await?,
        Commands::Categories { sub } => categories(&client, sub).await?,
        Commands::Settings { sub } => settings(&client, sub).await?,
    }

    Ok(())
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string())
}

fn require_login(client: &ApiClient) -> anyhow::Result<()> {
    if !client.is_authenticated() {
        bail!("Not logged in. Run `savanna login --username <name>` first");
    }
    Ok(())
}

async fn upload(client: &ApiClient, paths: Vec<PathBuf>, category: Uuid) -> anyhow::Result<()> {
    let mut uploader = DirectUploader::new(client.clone())?;
    if let Ok(base) = std::env::var("CLOUDINARY_UPLOAD_BASE") {
        uploader = uploader.with_vendor_base_url(base);
    }
    let batch = BatchUploader::new(uploader, client.clone());
    tracing::debug!(files = paths.len(), category = %category, "Starting batch upload");

    let summary = batch
        .upload_paths(&paths, category, |progress| {
            println!("{}", progress_line(progress))
        })
        .await;

    for line in summary_lines(&summary) {
        println!("{}", line);
    }
    if !summary.all_succeeded() {
        bail!("{} file(s) failed", summary.failures.len());
    }
    Ok(())
}

async fn photos(client: &ApiClient, sub: PhotoCommands) -> anyhow::Result<()> {
    match sub {
        PhotoCommands::List { category } => print_json(&client.list_photos(category).await?)?,
        PhotoCommands::Add {
            url,
            category,
            featured,
        } => {
            require_login(client)?;
            let photo = client
                .create_photo(&CreatePhotoRequest {
                    image_url: url,
                    category_id: category,
                    featured,
                })
                .await?;
            print_json(&photo)?;
        }
        PhotoCommands::Delete { id } => {
            require_login(client)?;
            print_json(&client.delete_photo(id).await?)?;
        }
    }
    Ok(())
}

async fn slides(client: &ApiClient, sub: SlideCommands) -> anyhow::Result<()> {
    match sub {
        SlideCommands::List => print_json(&client.list_slides().await?)?,
        SlideCommands::Add {
            title,
            url,
            photo,
            order,
        } => {
            require_login(client)?;
            let mut draft = HomepageDraft::default();
            draft.new_slide.title = title;
            draft.new_slide.order = order;
            match (url, photo) {
                (Some(url), _) => draft.new_slide.image_url = url,
                (None, Some(photo_id)) => {
                    let mut picker = AssetPicker::new(client.list_photos(None).await?);
                    picker.open(PickerTarget::NewSlide);
                    picker.pick(photo_id, &mut draft)?;
                }
                (None, None) => bail!("Either --url or --photo is required"),
            }
            let request = draft.new_slide.to_request()?;
            print_json(&client.create_slide(&request).await?)?;
        }
        SlideCommands::Update {
            id,
            title,
            url,
            order,
            active,
        } => {
            require_login(client)?;
            let patch = UpdateSlideRequest {
                title,
                image_url: url,
                order,
                active,
            };
            print_json(&client.update_slide(id, &patch).await?)?;
        }
        SlideCommands::Delete { id } => {
            require_login(client)?;
            print_json(&client.delete_slide(id).await?)?;
        }
    }
    Ok(())
}

async fn categories(client: &ApiClient, sub: CategoryCommands) -> anyhow::Result<()> {
    match sub {
        CategoryCommands::List => print_json(&client.list_categories().await?)?,
        CategoryCommands::Add { name } => {
            require_login(client)?;
            print_json(&client.create_category(&name).await?)?;
        }
        CategoryCommands::Delete { id, yes } => {
            require_login(client)?;
            if !yes {
                let name = client
                    .list_categories()
                    .await?
                    .into_iter()
                    .find(|c| c.id == id)
                    .map(|c| c.name)
                    .with_context(|| format!("Category {} not found", id))?;
                let photo_count = client.list_photos(Some(id)).await?.len();
                let prompt = orphan_prompt(&name, photo_count);
                if !confirm(&prompt, &mut io::stdin().lock(), &mut io::stdout())? {
                    println!("Aborted");
                    return Ok(());
                }
            }
            print_json(&client.delete_category(id).await?)?;
        }
    }
    Ok(())
}

async fn settings(client: &ApiClient, sub: SettingCommands) -> anyhow::Result<()> {
    match sub {
        SettingCommands::List => print_json(&client.list_settings().await?)?,
        SettingCommands::Get { key } => print_json(&client.get_setting(&key).await?)?,
        SettingCommands::Set { key, value } => {
            require_login(client)?;
            let settings = client
                .update_settings(vec![SettingUpdate::new(key, value)])
                .await?;
            print_json(&settings)?;
        }
        SettingCommands::Pick {
            key,
            photo,
            category,
        } => {
            require_login(client)?;
            let mut draft = HomepageDraft {
                settings: SettingsDraft::from_settings(&client.list_settings().await?),
                ..Default::default()
            };
            let mut picker = AssetPicker::new(client.list_photos(None).await?);
            if let Some(category) = category {
                picker.set_filter(CategoryFilter::Id(category));
            }
            picker.open(PickerTarget::Setting(key.clone()));
            let url = picker.pick(photo, &mut draft)?;

            let changes = draft.settings.changes();
            if changes.is_empty() {
                println!("{} already uses {}", key, url);
                return Ok(());
            }
            print_json(&client.update_settings(changes).await?)?;
        }
    }
    Ok(())
}
