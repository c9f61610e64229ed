use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shared::{domain::UserId, validation::is_valid_email};
use storage::{NewProject, Storage};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/portfolio.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Loads the demo user, projects and skills into an empty database.
    Seed,
    CreateProject {
        owner_user_id: i64,
        title: String,
        description: String,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        github_url: Option<String>,
    },
    CreateUser {
        username: String,
        email: String,
    },
    ListContacts,
}

struct DemoProject {
    title: &'static str,
    description: &'static str,
    image_url: &'static str,
    github_url: &'static str,
}

const DEMO_PROJECTS: &[DemoProject] = &[
    DemoProject {
        title: "Portfolio Website",
        description: "A personal portfolio website with a project showcase, skills display, and contact form.",
        image_url: "https://raw.githubusercontent.com/github/explore/80688e429a7d4ef2fca1e82350fe8e3517d3494d/topics/flask/flask.png",
        github_url: "https://github.com/username/portfolio",
    },
    DemoProject {
        title: "E-commerce Platform",
        description: "Full-stack e-commerce platform with user authentication, product management, and payment integration.",
        image_url: "https://raw.githubusercontent.com/github/explore/80688e429a7d4ef2fca1e82350fe8e3517d3494d/topics/react/react.png",
        github_url: "https://github.com/username/ecommerce",
    },
    DemoProject {
        title: "Task Management System",
        description: "A collaborative task management system with real-time updates over WebSocket.",
        image_url: "https://raw.githubusercontent.com/github/explore/80688e429a7d4ef2fca1e82350fe8e3517d3494d/topics/vue/vue.png",
        github_url: "https://github.com/username/taskmanager",
    },
    DemoProject {
        title: "Weather Dashboard",
        description: "Real-time weather dashboard with location search, 5-day forecast, and weather alerts.",
        image_url: "https://openweathermap.org/themes/openweathermap/assets/img/logo_white_cropped.png",
        github_url: "https://github.com/username/weather-dashboard",
    },
];

const DEMO_SKILLS: &[(&str, &str, u8)] = &[
    ("Python", "Programming Languages", 5),
    ("JavaScript", "Programming Languages", 4),
    ("Java", "Programming Languages", 4),
    ("SQL", "Programming Languages", 4),
    ("Flask", "Frameworks", 5),
    ("Django", "Frameworks", 4),
    ("React", "Frameworks", 4),
    ("Vue.js", "Frameworks", 3),
    ("PostgreSQL", "Databases", 4),
    ("MongoDB", "Databases", 3),
    ("Redis", "Databases", 3),
    ("Docker", "DevOps", 4),
    ("Git", "DevOps", 5),
    ("CI/CD", "DevOps", 3),
    ("AWS", "DevOps", 3),
];

async fn seed(storage: &Storage) -> Result<()> {
    if !storage.list_projects().await?.is_empty() {
        println!("database already has projects; seed skipped");
        return Ok(());
    }

    let owner = storage.create_user("testuser", "test@example.com").await?;

    for project in DEMO_PROJECTS {
        storage
            .create_project(NewProject {
                title: project.title,
                description: project.description,
                image_url: Some(project.image_url),
                github_url: Some(project.github_url),
                owner,
            })
            .await?;
    }
    for &(name, category, proficiency) in DEMO_SKILLS {
        storage.add_skill(name, Some(category), proficiency).await?;
    }

    println!(
        "seeded user_id={} projects={} skills={}",
        owner.0,
        DEMO_PROJECTS.len(),
        DEMO_SKILLS.len()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::Seed => seed(&storage).await?,
        Command::CreateProject {
            owner_user_id,
            title,
            description,
            image_url,
            github_url,
        } => {
            let owner = UserId(owner_user_id);
            if !storage.user_exists(owner).await? {
                bail!("no user with id {owner_user_id}");
            }
            let project_id = storage
                .create_project(NewProject {
                    title: &title,
                    description: &description,
                    image_url: image_url.as_deref(),
                    github_url: github_url.as_deref(),
                    owner,
                })
                .await?;
            println!("created project_id={}", project_id.0);
        }
        Command::CreateUser { username, email } => {
            if !is_valid_email(&email) {
                bail!("invalid email address: {email}");
            }
            let user_id = storage.create_user(&username, &email).await?;
            println!("user_id={}", user_id.0);
        }
        Command::ListContacts => {
            for contact in storage.list_contacts().await? {
                println!(
                    "[{}] #{} {} <{}>: {}",
                    contact.created_at.format("%Y-%m-%d %H:%M"),
                    contact.contact_id.0,
                    contact.name,
                    contact.email,
                    contact.message
                );
            }
        }
    }

    Ok(())
}
