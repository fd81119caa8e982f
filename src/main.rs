use std::process;

use dotenvy::dotenv;
use env_logger::Env;

use pushkind_press::db::establish_connection_pool_with;
use pushkind_press::domain::types::VisitorKey;
use pushkind_press::domain::visibility::{AdminPolicy, CallerContext, RequestScope};
use pushkind_press::models::config::ServerConfig;
use pushkind_press::repository::DieselRepository;
use pushkind_press::services::articles::{archive_summary, list_hot_articles};
use pushkind_press::services::tags::hot_tags;

/// Prints what an anonymous visitor sees in the blog sidebar: the monthly
/// archive and the most viewed articles.
fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match ServerConfig::load("config/settings") {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let pool = match establish_connection_pool_with(
        &config.database_url,
        config.connection_options(),
        config.pool_size,
    ) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to open database {}: {e}", config.database_url);
            process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let visitor = match VisitorKey::new("press-report") {
        Ok(visitor) => visitor,
        Err(e) => {
            log::error!("Invalid visitor key: {e}");
            process::exit(1);
        }
    };
    let scope = RequestScope::new(CallerContext::anonymous(visitor), &AdminPolicy);

    match archive_summary(&scope, config.listing.archive_months, &repo) {
        Ok(entries) => {
            println!("Archive:");
            for entry in entries {
                println!("  {} ({})", entry.month, entry.count);
            }
        }
        Err(e) => {
            log::error!("Failed to build archive summary: {e}");
            process::exit(1);
        }
    }

    match list_hot_articles(&scope, config.listing.hot_articles, &repo) {
        Ok(articles) => {
            println!("Hot articles:");
            for article in articles {
                println!("  {} /{} ({} views)", article.title, article.slug, article.view_count);
            }
        }
        Err(e) => {
            log::error!("Failed to list hot articles: {e}");
            process::exit(1);
        }
    }

    match hot_tags(config.listing.hot_tags, &repo) {
        Ok(tags) => {
            let names: Vec<&str> = tags.iter().map(|tag| tag.name.as_str()).collect();
            println!("Hot tags: {}", names.join(", "));
        }
        Err(e) => log::warn!("Failed to list hot tags: {e}"),
    }
}
