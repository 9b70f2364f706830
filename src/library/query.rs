//! Library query engine.
//!
//! Pure functions deriving the visible view from the full collection:
//! [`filter_and_sort`] produces the ordered view, [`group_songs`] buckets it.
//! Nothing here mutates its input.

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::{FilterSpec, GroupField, Song, SortDirection, SortField, SortSpec};

/// Label of the single group produced when grouping is off.
pub const ALL_SONGS_GROUP: &str = "All Songs";

/// A bucket of the grouped view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongGroup {
    /// Group key (the raw field value as text)
    pub key: String,
    /// Members in view order
    pub songs: Vec<Song>,
}

/// Filter `songs` and order the survivors.
///
/// The sort is stable, so songs with equal keys keep their collection order.
pub fn filter_and_sort(songs: &[Song], filter: &FilterSpec, sort: &SortSpec) -> Vec<Song> {
    let search = filter.search.to_lowercase();

    let mut view: Vec<Song> = songs
        .iter()
        .filter(|song| matches_filter(song, filter, &search))
        .cloned()
        .collect();

    view.sort_by(|a, b| {
        let cmp = compare_by(a, b, sort.field);
        match sort.direction {
            SortDirection::Asc => cmp,
            SortDirection::Desc => cmp.reverse(),
        }
    });

    view
}

/// Whether `song` passes every dimension of `filter`.
///
/// `folded_search` is `filter.search` already lowercased, so callers
/// filtering many songs fold it once.
pub fn matches_filter(song: &Song, filter: &FilterSpec, folded_search: &str) -> bool {
    let matches_search = folded_search.is_empty()
        || song.title.to_lowercase().contains(folded_search)
        || song.artist.to_lowercase().contains(folded_search)
        || song.album.to_lowercase().contains(folded_search);

    let matches_album = filter.album.is_empty() || song.album == filter.album;
    let matches_artist = filter.artist.is_empty() || song.artist == filter.artist;
    let matches_genre = filter.genre.is_empty() || song.genre == filter.genre;

    matches_search && matches_album && matches_artist && matches_genre
}

fn compare_by(a: &Song, b: &Song, field: SortField) -> Ordering {
    match field {
        SortField::Title => locale_cmp(&a.title, &b.title),
        SortField::Artist => locale_cmp(&a.artist, &b.artist),
        SortField::Album => locale_cmp(&a.album, &b.album),
        SortField::Year => a.year.cmp(&b.year),
        SortField::Duration => a.duration.cmp(&b.duration),
    }
}

/// Collation-style string comparison.
///
/// Letters compare without regard to accents or case first, so `"Édith"`
/// sorts with the `e`s. Ties are split by accents (unaccented first), then
/// by case (lowercase before uppercase).
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Lowercased text with combining marks stripped after decomposition.
fn base_letters(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Bucket an ordered view by `field`.
///
/// Buckets appear in the order their key is first met and keep view order
/// inside. [`GroupField::None`] yields one [`ALL_SONGS_GROUP`] bucket holding
/// the whole view, even when the view is empty.
pub fn group_songs(view: &[Song], field: GroupField) -> Vec<SongGroup> {
    if field == GroupField::None {
        return vec![SongGroup {
            key: ALL_SONGS_GROUP.to_string(),
            songs: view.to_vec(),
        }];
    }

    let mut groups: Vec<SongGroup> = Vec::new();
    for song in view {
        let key = group_key(song, field);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.songs.push(song.clone()),
            None => groups.push(SongGroup {
                key,
                songs: vec![song.clone()],
            }),
        }
    }
    groups
}

fn group_key(song: &Song, field: GroupField) -> String {
    match field {
        GroupField::Album => song.album.clone(),
        GroupField::Artist => song.artist.clone(),
        GroupField::Genre => song.genre.clone(),
        GroupField::Year => song.year.to_string(),
        GroupField::None => ALL_SONGS_GROUP.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilterUpdate;
    use crate::repository::default_catalog;
    use crate::test_utils::mock_song;

    fn titles(view: &[Song]) -> Vec<&str> {
        view.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let catalog = default_catalog();
        let view = filter_and_sort(&catalog, &FilterSpec::default(), &SortSpec::default());
        assert_eq!(view.len(), catalog.len());
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let catalog = default_catalog();
        let filter = FilterSpec {
            search: "QUEEN".to_string(),
            ..Default::default()
        };
        let view = filter_and_sort(&catalog, &filter, &SortSpec::default());
        assert_eq!(titles(&view), vec!["Bohemian Rhapsody"]);

        // Album names are searched too
        let filter = FilterSpec {
            search: "thriller".to_string(),
            ..Default::default()
        };
        let view = filter_and_sort(&catalog, &filter, &SortSpec::default());
        assert_eq!(titles(&view), vec!["Billie Jean"]);
    }

    #[test]
    fn test_search_without_match_is_empty() {
        let mut filter = FilterSpec::default();
        filter.merge(FilterUpdate::search("love"));
        let view = filter_and_sort(&default_catalog(), &filter, &SortSpec::default());
        assert!(view.is_empty());
    }

    #[test]
    fn test_exact_constraints_are_anded() {
        let catalog = default_catalog();
        let filter = FilterSpec {
            genre: "Rock".to_string(),
            artist: "Eagles".to_string(),
            ..Default::default()
        };
        let view = filter_and_sort(&catalog, &filter, &SortSpec::default());
        assert_eq!(titles(&view), vec!["Hotel California"]);

        // Exact match, not substring
        let filter = FilterSpec {
            genre: "Roc".to_string(),
            ..Default::default()
        };
        let view = filter_and_sort(&catalog, &filter, &SortSpec::default());
        assert!(view.is_empty());
    }

    #[test]
    fn test_sort_by_year_desc() {
        let catalog = default_catalog();
        let sort = SortSpec::new(SortField::Year, SortDirection::Desc);
        let view = filter_and_sort(&catalog, &FilterSpec::default(), &sort);
        assert_eq!(view.first().unwrap().title, "Smells Like Teen Spirit");
        assert!(view.windows(2).all(|w| w[0].year >= w[1].year));
    }

    #[test]
    fn test_equal_keys_keep_collection_order() {
        let songs = vec![
            Song {
                year: 1971,
                ..mock_song("a", "Stairway")
            },
            Song {
                year: 1965,
                ..mock_song("b", "Yesterday")
            },
            Song {
                year: 1971,
                ..mock_song("c", "Imagine")
            },
            Song {
                year: 1971,
                ..mock_song("d", "What's Going On")
            },
        ];
        let view = filter_and_sort(
            &songs,
            &FilterSpec::default(),
            &SortSpec::new(SortField::Year, SortDirection::Asc),
        );
        let ids: Vec<&str> = view.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c", "d"]);

        // Descending reverses the comparison, not the tie order
        let view = filter_and_sort(
            &songs,
            &FilterSpec::default(),
            &SortSpec::new(SortField::Year, SortDirection::Desc),
        );
        let ids: Vec<&str> = view.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_locale_cmp_ignores_case_first() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Zebra", "apple"), Ordering::Greater);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_locale_cmp_folds_accents() {
        assert_eq!(locale_cmp("Édith", "Fame"), Ordering::Less);
        assert_eq!(locale_cmp("Zombie", "Édith"), Ordering::Greater);
        assert_eq!(locale_cmp("Cafe", "Café"), Ordering::Less);
        assert_eq!(locale_cmp("café", "Café"), Ordering::Less);

        let songs = vec![
            mock_song("1", "Zombie"),
            mock_song("2", "Édith"),
            mock_song("3", "Fame"),
        ];
        let view = filter_and_sort(&songs, &FilterSpec::default(), &SortSpec::default());
        assert_eq!(titles(&view), vec!["Édith", "Fame", "Zombie"]);
    }

    #[test]
    fn test_group_none_is_single_bucket() {
        let view = default_catalog();
        let groups = group_songs(&view, GroupField::None);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, ALL_SONGS_GROUP);
        assert_eq!(groups[0].songs, view);

        let empty = group_songs(&[], GroupField::None);
        assert_eq!(empty.len(), 1);
        assert!(empty[0].songs.is_empty());
    }

    #[test]
    fn test_group_by_year_first_encountered_order() {
        let catalog = default_catalog();
        let view = filter_and_sort(
            &catalog,
            &FilterSpec::default(),
            &SortSpec::new(SortField::Title, SortDirection::Asc),
        );
        let groups = group_songs(&view, GroupField::Year);

        // Billie Jean (1982) sorts first by title
        assert_eq!(groups[0].key, "1982");
        assert_eq!(groups[1].key, "1975");

        let total: usize = groups.iter().map(|g| g.songs.len()).sum();
        assert_eq!(total, view.len());

        let seventy_one = groups.iter().find(|g| g.key == "1971").unwrap();
        assert_eq!(
            titles(&seventy_one.songs),
            vec!["Imagine", "Stairway to Heaven", "What's Going On"]
        );
    }

    #[test]
    fn test_group_by_genre_keys_unique() {
        let groups = group_songs(&default_catalog(), GroupField::Genre);
        let keys: std::collections::HashSet<&str> =
            groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys.len(), groups.len());
        assert_eq!(groups[0].key, "Rock");
        assert_eq!(groups[0].songs.len(), 4);
    }
}
