//! List movies command handler

use crate::config::Config;
use crate::db::Store;
use crate::models::movie::{MovieFilter, MovieSort, MovieStatus};
use crate::services::stats::{average_score, stars};

pub async fn cmd_list_movies(config: &Config, status: Option<&str>) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let filter = MovieFilter {
        status: status.and_then(MovieStatus::parse),
        sort: MovieSort::DateDesc,
        ..MovieFilter::default()
    };
    let movies = store.list_movies(&filter).await?;

    if movies.is_empty() {
        println!("No movies recorded.");
        println!();
        println!("Add one from the admin page or with the web form on /.");
        return Ok(());
    }

    let ids: Vec<i32> = movies.iter().map(|m| m.id).collect();
    let ratings = store.ratings_for_movies(&ids).await?;

    println!("Movies ({} total)", movies.len());
    println!("{:-<70}", "");

    for movie in movies {
        let average = ratings
            .get(&movie.id)
            .and_then(|r| average_score(r.iter().map(|r| r.score)));
        let rating_count = ratings.get(&movie.id).map_or(0, Vec::len);

        let status_indicator = match movie.status {
            Some(MovieStatus::Weekly) => "🎬",
            Some(MovieStatus::Seen) => "✓",
            _ => "•",
        };
        let date = if movie.date_watched.is_empty() {
            "no date"
        } else {
            movie.date_watched.as_str()
        };

        println!("{} {} [{}]", status_indicator, movie.title, date);
        println!(
            "  ID: {} | TMDB: {} | Status: {} | {} {}",
            movie.id,
            movie
                .tmdb_id
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            movie.status.as_ref().map_or("-", MovieStatus::as_str),
            average.map_or_else(|| "unrated".to_string(), |a| format!("{a:.2}")),
            if rating_count > 0 {
                format!("{} ({rating_count} ratings)", stars(average))
            } else {
                String::new()
            }
        );
    }

    println!();
    println!("Legend: 🎬 Movie of the week | ✓ Seen");

    Ok(())
}
