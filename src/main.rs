//! CLI entry point for notion-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notion_blog::config::Credentials;
use notion_blog::Blog;

#[derive(Parser)]
#[command(name = "notion-blog")]
#[command(version)]
#[command(about = "A blog website that renders posts stored in a Notion database", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Notion integration token
    #[arg(long, global = true, env = "NOTION_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Id of the Notion database holding the posts
    #[arg(long, global = true, env = "NOTION_BLOG_DATABASE_ID")]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Clean the public folder
    Clean,

    /// List blog content
    List {
        /// Type of content to list (post, slug)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Print a single post
    Show {
        /// Slug of the post
        slug: String,

        /// Print display nodes as JSON instead of markdown
        #[arg(long)]
        nodes: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "notion_blog=debug,info"
    } else {
        "notion_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let credentials = Credentials::new(cli.token, cli.database);

    match cli.command {
        Commands::Serve { port, ip } => {
            let blog = Blog::new(&base_dir, credentials)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            notion_blog::server::start(blog, &ip, port).await?;
        }

        Commands::Generate => {
            let blog = Blog::new(&base_dir, credentials)?;
            tracing::info!("Generating static files...");
            let written = blog.generate().await?;
            println!("Generated {} files in {:?}", written, blog.public_dir);
        }

        Commands::Clean => {
            let blog = Blog::new(&base_dir, credentials)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let blog = Blog::new(&base_dir, credentials)?;
            notion_blog::commands::list::run(&blog, &r#type).await?;
        }

        Commands::Show { slug, nodes } => {
            let blog = Blog::new(&base_dir, credentials)?;
            notion_blog::commands::show::run(&blog, &slug, nodes).await?;
        }

        Commands::Version => {
            println!("notion-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
