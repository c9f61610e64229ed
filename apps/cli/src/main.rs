use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use page_core::{
    init, load_settings, Document, ElementSpec, EventKind, HttpLikeClient, LikeClient, ViewTree,
    UNLIKED_GLYPH,
};
use shared::{
    domain::{LikeStatus, ProjectId, UserId},
    validation::{is_valid_email, INVALID_EMAIL_MESSAGE},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// Overrides PORTFOLIO_SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Toggles one like through the server.
    Like {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        project_id: i64,
    },
    /// Applies the contact-form email rule.
    CheckEmail { email: String },
    /// Renders a single project card headlessly and clicks its like button.
    Page {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        project_id: i64,
        #[arg(long, default_value_t = 0)]
        likes: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }

    match cli.command {
        Command::Like {
            user_id,
            project_id,
        } => {
            let client = HttpLikeClient::new(&settings.server_url)?.with_user(UserId(user_id));
            let status = client.toggle_like(ProjectId(project_id)).await?;
            println!("project {project_id}: {}", status.as_str());
        }
        Command::CheckEmail { email } => {
            if !is_valid_email(&email) {
                bail!("{INVALID_EMAIL_MESSAGE}");
            }
            println!("{email} looks valid");
        }
        Command::Page {
            user_id,
            project_id,
            likes,
        } => {
            let doc = Document::new();
            let card = doc.append(None, ElementSpec::new("div").class("project-card"));
            let button = doc.append(
                Some(card),
                ElementSpec::new("button")
                    .class("like-btn")
                    .attr("data-project-id", &project_id.to_string())
                    .text(UNLIKED_GLYPH),
            );
            let count = doc.append(
                Some(button),
                ElementSpec::new("span")
                    .class("like-count")
                    .text(&likes.to_string()),
            );

            let client = HttpLikeClient::new(&settings.server_url)?.with_user(UserId(user_id));
            let interactions = init(doc.clone(), Arc::new(client), &settings)?;
            doc.dispatch(button, EventKind::Click);
            interactions.settle().await;

            if let Some(error) = doc.console_errors().pop() {
                bail!("{error}");
            }
            let shown = doc.text(count).context("like count disappeared")?;
            let liked = doc.has_class(button, "liked");
            let status = if liked {
                LikeStatus::Liked
            } else {
                LikeStatus::Unliked
            };
            println!(
                "project {project_id}: {} ({shown} likes shown)",
                status.as_str()
            );
        }
    }

    Ok(())
}
