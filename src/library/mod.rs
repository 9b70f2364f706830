//! Library state store.
//!
//! [`LibraryStore`] owns the canonical song collection and the current view
//! parameters. Every change goes through [`LibraryStore::dispatch`], which
//! recomputes the derived view with [`query::filter_and_sort`] and, when the
//! collection itself changed, writes it back through the repository.
//!
//! The filtered view is never edited directly; it is always exactly
//! `filter_and_sort(songs, filters, sort)`. Grouping is applied on demand
//! by [`LibraryStore::grouped_view`] and not cached.

pub mod query;
pub mod stats;

pub use query::{ALL_SONGS_GROUP, SongGroup, filter_and_sort, group_songs};
pub use stats::{Facets, LibraryStats};

use rand::Rng;

use crate::model::{FilterSpec, FilterUpdate, GroupSpec, NewSong, Song, SortField, SortSpec};
use crate::repository::SongRepository;

/// Snapshot of the library.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryState {
    /// Full collection in insertion order
    pub songs: Vec<Song>,
    /// Derived filtered/sorted view
    pub filtered_songs: Vec<Song>,
    pub filters: FilterSpec,
    pub sort: SortSpec,
    pub group_by: GroupSpec,
    pub is_loading: bool,
}

/// State transitions of the library.
#[derive(Debug, Clone)]
pub enum LibraryAction {
    /// Replace the whole collection (initial load)
    SetSongs(Vec<Song>),
    /// Append a song under a freshly generated id
    AddSong(NewSong),
    /// Remove the song with this id
    DeleteSong(String),
    /// Merge a partial filter
    UpdateFilters(FilterUpdate),
    UpdateSort(SortSpec),
    UpdateGroupBy(GroupSpec),
    ClearFilters,
    SetLoading(bool),
}

/// Canonical song collection plus view configuration.
pub struct LibraryStore<R: SongRepository> {
    repository: R,
    state: LibraryState,
}

impl<R: SongRepository> LibraryStore<R> {
    /// Create an empty store. Call [`load`](Self::load) to populate it.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            state: LibraryState::default(),
        }
    }

    /// Create a store populated from the repository.
    pub fn open(repository: R) -> Self {
        let mut store = Self::new(repository);
        store.load();
        store
    }

    /// Populate the collection from the repository.
    pub fn load(&mut self) {
        self.set_loading(true);
        let songs = self.repository.load();
        tracing::info!(count = songs.len(), "Library loaded");
        self.set_songs(songs);
        self.set_loading(false);
    }

    /// Apply one state transition.
    pub fn dispatch(&mut self, action: LibraryAction) {
        let collection_changed = match action {
            LibraryAction::SetSongs(songs) => {
                self.state.songs = songs;
                true
            }
            LibraryAction::AddSong(new_song) => {
                let song = new_song.with_id(generate_id(&self.state.songs));
                tracing::debug!(id = %song.id, title = %song.title, "Adding song");
                self.state.songs.push(song);
                true
            }
            LibraryAction::DeleteSong(id) => {
                let before = self.state.songs.len();
                self.state.songs.retain(|song| song.id != id);
                let removed = self.state.songs.len() != before;
                if !removed {
                    tracing::debug!(id = %id, "Delete of unknown song ignored");
                }
                removed
            }
            LibraryAction::UpdateFilters(update) => {
                self.state.filters.merge(update);
                false
            }
            LibraryAction::UpdateSort(sort) => {
                self.state.sort = sort;
                false
            }
            LibraryAction::UpdateGroupBy(group_by) => {
                // Grouping is derived at read time, the view is unaffected
                self.state.group_by = group_by;
                return;
            }
            LibraryAction::ClearFilters => {
                self.state.filters = FilterSpec::default();
                false
            }
            LibraryAction::SetLoading(loading) => {
                self.state.is_loading = loading;
                return;
            }
        };

        self.recompute();
        if collection_changed {
            self.repository.save(&self.state.songs);
        }
    }

    fn recompute(&mut self) {
        self.state.filtered_songs =
            filter_and_sort(&self.state.songs, &self.state.filters, &self.state.sort);
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Replace the whole collection.
    pub fn set_songs(&mut self, songs: Vec<Song>) {
        self.dispatch(LibraryAction::SetSongs(songs));
    }

    /// Add a song under a freshly generated id and return it.
    ///
    /// The input is trusted; required-field checks belong to the caller.
    pub fn add_song(&mut self, song: NewSong) -> Song {
        self.dispatch(LibraryAction::AddSong(song));
        // Appended last, so the id is the one just generated
        self.state.songs[self.state.songs.len() - 1].clone()
    }

    /// Remove a song by id. Returns whether a song was removed.
    pub fn delete_song(&mut self, id: &str) -> bool {
        let before = self.state.songs.len();
        self.dispatch(LibraryAction::DeleteSong(id.to_string()));
        self.state.songs.len() != before
    }

    pub fn update_filters(&mut self, update: FilterUpdate) {
        self.dispatch(LibraryAction::UpdateFilters(update));
    }

    pub fn update_sort(&mut self, sort: SortSpec) {
        self.dispatch(LibraryAction::UpdateSort(sort));
    }

    /// Sort by `field`, flipping direction when it is already the ascending
    /// sort field.
    pub fn toggle_sort(&mut self, field: SortField) {
        let sort = self.state.sort.toggled(field);
        self.dispatch(LibraryAction::UpdateSort(sort));
    }

    pub fn update_group_by(&mut self, group_by: GroupSpec) {
        self.dispatch(LibraryAction::UpdateGroupBy(group_by));
    }

    pub fn clear_filters(&mut self) {
        self.dispatch(LibraryAction::ClearFilters);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.dispatch(LibraryAction::SetLoading(loading));
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn state(&self) -> &LibraryState {
        &self.state
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> LibraryState {
        self.state.clone()
    }

    pub fn songs(&self) -> &[Song] {
        &self.state.songs
    }

    pub fn filtered_songs(&self) -> &[Song] {
        &self.state.filtered_songs
    }

    pub fn find(&self, id: &str) -> Option<&Song> {
        self.state.songs.iter().find(|song| song.id == id)
    }

    /// The filtered view bucketed by the current group setting.
    pub fn grouped_view(&self) -> Vec<SongGroup> {
        group_songs(&self.state.filtered_songs, self.state.group_by.field)
    }

    /// Statistics over the filtered view.
    pub fn stats(&self) -> LibraryStats {
        LibraryStats::from_songs(&self.state.filtered_songs)
    }

    /// Filter choices drawn from the full collection.
    pub fn facets(&self) -> Facets {
        stats::facets(&self.state.songs)
    }
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Generate an id of the form `<unix millis><9 base-36 chars>` not present
/// in `existing`.
pub fn generate_id(existing: &[Song]) -> String {
    let mut rng = rand::rng();
    loop {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect();
        let id = format!("{}{}", millis, suffix);
        if !existing.iter().any(|song| song.id == id) {
            return id;
        }
    }
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::test_utils::MemoryRepository;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Step {
        Search(String),
        Genre(String),
        Sort(SortField),
        Delete(usize),
        Add(String),
        Clear,
    }

    fn arb_step() -> impl Strategy<Value = Step> {
        prop_oneof![
            "[a-z]{0,3}".prop_map(Step::Search),
            prop::sample::select(vec!["", "Rock", "Pop", "Soul"])
                .prop_map(|g| Step::Genre(g.to_string())),
            prop::sample::select(vec![
                SortField::Title,
                SortField::Artist,
                SortField::Year,
                SortField::Duration,
            ])
            .prop_map(Step::Sort),
            (0usize..15).prop_map(Step::Delete),
            "[A-Za-z]{1,8}".prop_map(Step::Add),
            Just(Step::Clear),
        ]
    }

    fn run(store: &mut LibraryStore<MemoryRepository>, step: Step) {
        match step {
            Step::Search(s) => store.update_filters(FilterUpdate::search(s)),
            Step::Genre(g) => store.update_filters(FilterUpdate::genre(g)),
            Step::Sort(field) => store.toggle_sort(field),
            Step::Delete(i) => {
                if let Some(id) = store.songs().get(i).map(|s| s.id.clone()) {
                    store.delete_song(&id);
                }
            }
            Step::Add(title) => {
                store.add_song(crate::test_utils::mock_new_song(
                    &title,
                    "Someone",
                    "Something",
                ));
            }
            Step::Clear => store.clear_filters(),
        }
    }

    proptest! {
        /// The view always equals the derivation from the canonical state
        #[test]
        fn view_tracks_collection(steps in prop::collection::vec(arb_step(), 0..25)) {
            let mut store = LibraryStore::open(MemoryRepository::new());
            for step in steps {
                run(&mut store, step);
                let state = store.state();
                let expected = filter_and_sort(&state.songs, &state.filters, &state.sort);
                prop_assert_eq!(&state.filtered_songs, &expected);
            }
        }

        /// Clearing twice is the same as clearing once
        #[test]
        fn clear_filters_idempotent(steps in prop::collection::vec(arb_step(), 0..15)) {
            let mut store = LibraryStore::open(MemoryRepository::new());
            for step in steps {
                run(&mut store, step);
            }
            store.clear_filters();
            let once = store.snapshot();
            store.clear_filters();
            prop_assert_eq!(once, store.snapshot());
        }

        /// Ids stay unique through any edit sequence
        #[test]
        fn ids_stay_unique(steps in prop::collection::vec(arb_step(), 0..25)) {
            let mut store = LibraryStore::open(MemoryRepository::new());
            for step in steps {
                run(&mut store, step);
            }
            let ids: std::collections::HashSet<&str> =
                store.songs().iter().map(|s| s.id.as_str()).collect();
            prop_assert_eq!(ids.len(), store.songs().len());
        }
    }
}
