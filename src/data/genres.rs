//! TMDB movie genre table
//!
//! Discovery results only carry numeric genre ids, so they are mapped to
//! display names here. The table is TMDB's fixed movie genre list.

/// Map a TMDB movie genre id to its display name
///
/// Unknown ids are rendered as their number so no genre is silently dropped.
pub fn genre_name(id: u32) -> String {
    let name = match id {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Science Fiction",
        10770 => "TV Movie",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        other => return other.to_string(),
    };
    name.to_string()
}
