use crate::clients::tmdb::TmdbClient;
use crate::config::Config;

pub async fn cmd_search_movies(config: &Config, query: &str) -> anyhow::Result<()> {
    let client = TmdbClient::new(config.tmdb.clone())?;
    if !client.is_configured() {
        println!("TMDB API key is not set. Add it to config.toml or set TMDB_API_KEY.");
        return Ok(());
    }

    println!("Searching for: {query}");

    let results = client.search_movies(query).await?;

    if results.is_empty() {
        println!("No movies found matching '{query}'");
        return Ok(());
    }

    println!();
    println!("Search Results:");
    println!("{:-<60}", "");

    for movie in results.iter().take(10) {
        let year = movie.year().unwrap_or("????");

        println!("• {} ({})", movie.title, year);
        if let Some(original) = movie.original_title.as_deref()
            && original != movie.title
        {
            println!("  Original: {original}");
        }
        println!("  TMDB ID: {}", movie.id);
        println!();
    }

    println!("Add a movie from the admin page: /admin/search?query=...");

    Ok(())
}
