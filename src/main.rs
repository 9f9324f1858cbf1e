use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};
use techwiki::{
    config::Config,
    content::{Article, ContentRepository, Corpus},
    index,
    progress::{FileStore, ProgressSummary, ProgressTracker},
    search::SearchIndex,
    site::SiteBuilder,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = ".", help = "The site directory.")]
    site: PathBuf,
    #[arg(
        short,
        long,
        env = "TECHWIKI_CONTENT_DIR",
        help = "The content directory, overriding the site configuration."
    )]
    content: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the whole site.
    Build {
        #[arg(short, long, default_value = "public", help = "The destination directory")]
        dest: PathBuf,
    },
    /// List articles, optionally of one category.
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Print one article.
    Show { category: String, slug: String },
    /// Fuzzy search over titles, tags and bodies.
    Search { query: String },
    /// Inspect or update reading progress.
    Progress {
        #[arg(long, default_value = ".techwiki/progress.json")]
        store: PathBuf,
        #[command(subcommand)]
        action: ProgressAction,
    },
}

#[derive(Subcommand, Debug)]
enum ProgressAction {
    Show,
    /// Mark an article as read.
    Visit {
        category: String,
        slug: String,
        #[arg(long, help = "The article this visit came from, as category/slug.")]
        from: Option<String>,
    },
    /// Add reading time to an article.
    Time {
        category: String,
        slug: String,
        seconds: u64,
    },
    Reset,
}

fn list(repo: &ContentRepository, category: Option<&str>) {
    let articles = match category {
        Some(category) => repo.by_category_name(category),
        None => repo.articles(),
    };

    if articles.is_empty() {
        println!("No articles.");
        return;
    }

    for article in articles {
        println!(
            "{:<32} {:<10} {:<13} {}",
            article.path.as_str(), article.metadata.category, article.metadata.difficulty, article.metadata.title
        );
    }
}

fn show(repo: &ContentRepository, config: &Config, category: &str, slug: &str) -> anyhow::Result<()> {
    let article = match repo.find(category, slug)? {
        Some(article) => article,
        None => bail!("No article at {}/{}", category, slug),
    };
    let meta = &article.metadata;

    println!("{}", meta.title);
    println!("{}", config.routes.article_url(article.path.as_str()));
    println!(
        "{} · {} · {} min",
        meta.category,
        meta.difficulty,
        meta.reading_minutes()
    );
    if !meta.tags.is_empty() {
        println!("Tags: {}", meta.tags.join(", "));
    }

    let corpus = repo.articles();
    let related = index::related(&article, &corpus, config.related_limit);
    if !related.is_empty() {
        println!(
            "Related: {}",
            related
                .iter()
                .map(|a| a.path.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    println!();
    print!("{}", article.body);

    Ok(())
}

/// The article at `{category}/{slug}`, or an error naming the missing path.
fn resolve(repo: &impl Corpus, category: &str, slug: &str) -> anyhow::Result<Article> {
    match repo.article(category, slug) {
        Some(article) => Ok(article),
        None => bail!("No article at {}/{}", category, slug),
    }
}

fn progress(
    repo: &ContentRepository,
    store: PathBuf,
    action: ProgressAction,
) -> anyhow::Result<()> {
    let mut tracker = ProgressTracker::new(FileStore::new(store));
    let corpus = repo.articles();
    let now = chrono::Utc::now();

    let data = match action {
        ProgressAction::Show => tracker.load(now)?,
        ProgressAction::Visit {
            category,
            slug,
            from,
        } => {
            let article = resolve(repo, &category, &slug)?;

            if let Some(from) = from {
                tracker.follow_link(&from, article.path.as_str(), &corpus, now)?;
            }
            tracker.record_visit(article.path.as_str(), &corpus, now)?
        }
        ProgressAction::Time {
            category,
            slug,
            seconds,
        } => {
            let article = resolve(repo, &category, &slug)?;
            tracker.record_time(article.path.as_str(), seconds, now)?
        }
        ProgressAction::Reset => {
            tracker.reset()?;
            log::info!("Progress cleared.");
            return Ok(());
        }
    };

    let summary = ProgressSummary::new(&data, &corpus);
    println!(
        "{} of {} terms read ({}%), {} min of reading",
        summary.visited, summary.total, summary.percent, summary.reading_minutes
    );
    for category in &summary.categories {
        println!(
            "  {:<10} {}/{} ({}%)",
            category.category, category.visited, category.total, category.percent
        );
    }
    for state in &summary.badges {
        println!(
            "  [{}] {} {}: {}",
            if state.earned { "x" } else { " " },
            state.badge.icon(),
            state.badge.name(),
            state.badge.description()
        );
    }
    if !summary.recent.is_empty() {
        println!("Recently read:");
        for article in &summary.recent {
            println!("  {}", article.metadata.title);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Initialize Logging.
    let log_environ = env_logger::Env::new()
        .filter("TECHWIKI_LOG")
        .write_style("TECHWIKI_LOG_STYLE");
    let mut log_builder = env_logger::Builder::new();

    log_builder.filter_level(log::LevelFilter::Info);
    log_builder.parse_env(log_environ);
    log_builder.init();

    // Parse Arguments.
    let args = Args::parse();

    let mut config = Config::load(&args.site)?;
    if let Some(content) = args.content {
        config.content_dir = content;
    }
    let repo = ContentRepository::from_config(&config);

    log::debug!("Reading content from `{}`", repo.root().display());

    match args.command {
        Command::Build { dest } => {
            log::info!("Outputting to `{}`", dest.display());

            let report = SiteBuilder::new(&config, &repo)?.build(&dest)?;

            log::info!(
                "Done. {} articles, {} pages, {} assets copied.",
                report.articles,
                report.pages,
                report.assets
            );
        }
        Command::List { category } => list(&repo, category.as_deref()),
        Command::Show { category, slug } => show(&repo, &config, &category, &slug)?,
        Command::Search { query } => {
            let index = SearchIndex::from_corpus(&repo, &config.routes, &config.search);
            let hits = index.search(&query);

            if hits.is_empty() {
                println!("No results for \"{}\".", query);
            }
            for hit in hits {
                println!(
                    "{:<40} {:<10} {}",
                    hit.entry.title, hit.entry.category, hit.entry.url
                );
            }
        }
        Command::Progress { store, action } => {
            let store = if store.is_relative() {
                args.site.join(store)
            } else {
                store
            };
            progress(&repo, store, action)?
        }
    }

    Ok(())
}
