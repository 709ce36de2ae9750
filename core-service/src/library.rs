//! # Library Service
//!
//! Application-facing façade over the record store.
//!
//! ## Overview
//!
//! `LibraryService` turns store results into the coarse [`CoreError`]
//! categories the UI shows, keeps a cached song listing in step with the
//! operations it performs, and publishes a [`LibraryEvent`] for each change.
//!
//! Every call opens the store on demand and commits on its own. There is no
//! transaction spanning a delete and the reload that usually follows it: the
//! delete can commit while the reload fails. The cached listing still
//! reflects the delete in that case and the next successful
//! [`load_library`](LibraryService::load_library) re-synchronises it.
//!
//! Calls that touch the listing hold its lock across the store call and the
//! cache update, so a reload can never resurrect a song deleted after its
//! snapshot was taken, and an add racing a reload never lists the song twice.

use crate::error::{CoreError, Result};
use core_library::{LibraryError, LibraryStore, Playlist, Song};
use core_runtime::events::{EventBus, LibraryEvent};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Returned by [`LibraryService::remove_song`]
///
/// The caller drops `song_id` from whatever listing it renders. The store
/// cannot tell "deleted" from "was already absent", so both produce this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRemoved {
    pub song_id: String,
}

pub struct LibraryService {
    store: Arc<dyn LibraryStore>,
    event_bus: EventBus,
    listing: Mutex<Vec<Song>>,
}

impl LibraryService {
    pub fn new(store: Arc<dyn LibraryStore>, event_bus: EventBus) -> Self {
        Self {
            store,
            event_bus,
            listing: Mutex::new(Vec::new()),
        }
    }

    /// Load every song and refresh the cached listing
    ///
    /// # Errors
    ///
    /// [`CoreError::LoadFailed`] for any store failure; the cause is logged.
    #[instrument(skip(self))]
    pub async fn load_library(&self) -> Result<Vec<Song>> {
        let mut listing = self.listing.lock().await;
        let songs = self.fetch_all().await.map_err(|e| {
            error!(error = %e, "Failed to load library");
            CoreError::LoadFailed
        })?;

        *listing = songs.clone();
        drop(listing);
        info!(song_count = songs.len(), "Library loaded");
        let _ = self.event_bus.emit(LibraryEvent::LibraryLoaded {
            song_count: songs.len(),
        });

        Ok(songs)
    }

    /// Delete a song and drop it from the cached listing
    ///
    /// # Errors
    ///
    /// [`CoreError::DeleteFailed`] if the store could not open or the delete
    /// did not commit. Deleting an unknown id is a success.
    #[instrument(skip(self))]
    pub async fn remove_song(&self, song_id: &str) -> Result<SongRemoved> {
        let mut listing = self.listing.lock().await;
        self.delete(song_id).await.map_err(|e| {
            error!(error = %e, "Failed to delete song");
            CoreError::DeleteFailed {
                song_id: song_id.to_string(),
            }
        })?;

        listing.retain(|song| song.id != song_id);
        drop(listing);
        debug!("Song removed from listing");
        let _ = self.event_bus.emit(LibraryEvent::SongDeleted {
            song_id: song_id.to_string(),
        });

        Ok(SongRemoved {
            song_id: song_id.to_string(),
        })
    }

    /// Store a new song and add it to the cached listing
    ///
    /// A listed song with the same id is replaced rather than duplicated.
    ///
    /// # Errors
    ///
    /// - [`CoreError::DuplicateSong`] if the id is taken; the stored song is
    ///   left untouched
    /// - [`CoreError::InvalidSong`] if the record fails validation
    /// - [`CoreError::SaveFailed`] for anything else
    #[instrument(skip(self, song), fields(song_id = %song.id))]
    pub async fn add_song(&self, song: Song) -> Result<Song> {
        let mut listing = self.listing.lock().await;
        self.insert_song(&song).await.map_err(|e| match e {
            LibraryError::DuplicateKey { id, .. } => {
                warn!("Song id already exists");
                CoreError::DuplicateSong { song_id: id }
            }
            LibraryError::InvalidInput { message, .. } => {
                warn!(%message, "Rejected invalid song");
                CoreError::InvalidSong(message)
            }
            other => {
                error!(error = %other, "Failed to save song");
                CoreError::SaveFailed
            }
        })?;

        match listing.iter_mut().find(|listed| listed.id == song.id) {
            Some(listed) => *listed = song.clone(),
            None => listing.push(song.clone()),
        }
        drop(listing);
        info!(title = %song.title, "Song added");
        let _ = self.event_bus.emit(LibraryEvent::SongAdded {
            song_id: song.id.clone(),
            title: song.title.clone(),
        });

        Ok(song)
    }

    /// Store a new playlist
    ///
    /// # Errors
    ///
    /// [`CoreError::DuplicatePlaylist`] if the id is taken, otherwise
    /// [`CoreError::SaveFailed`].
    #[instrument(skip(self, playlist), fields(playlist_id = %playlist.id))]
    pub async fn create_playlist(&self, playlist: Playlist) -> Result<Playlist> {
        self.insert_playlist(&playlist).await.map_err(|e| match e {
            LibraryError::DuplicateKey { id, .. } => {
                warn!("Playlist id already exists");
                CoreError::DuplicatePlaylist { playlist_id: id }
            }
            other => {
                error!(error = %other, "Failed to save playlist");
                CoreError::SaveFailed
            }
        })?;

        info!(name = %playlist.name, "Playlist created");
        let _ = self.event_bus.emit(LibraryEvent::PlaylistCreated {
            playlist_id: playlist.id.clone(),
            name: playlist.name.clone(),
        });

        Ok(playlist)
    }

    /// Fetch a playlist; `Ok(None)` when no playlist has this id
    pub async fn playlist(&self, playlist_id: &str) -> Result<Option<Playlist>> {
        self.fetch_playlist(playlist_id).await.map_err(|e| {
            error!(error = %e, playlist_id, "Failed to load playlist");
            CoreError::LoadFailed
        })
    }

    /// Snapshot of the cached listing
    pub async fn listing(&self) -> Vec<Song> {
        self.listing.lock().await.clone()
    }

    async fn fetch_all(&self) -> core_library::Result<Vec<Song>> {
        self.store.open().await?;
        self.store.get_all_songs().await
    }

    async fn delete(&self, song_id: &str) -> core_library::Result<()> {
        self.store.open().await?;
        self.store.delete_song(song_id).await
    }

    async fn insert_song(&self, song: &Song) -> core_library::Result<()> {
        self.store.open().await?;
        self.store.add_song(song).await
    }

    async fn insert_playlist(&self, playlist: &Playlist) -> core_library::Result<()> {
        self.store.open().await?;
        self.store.add_playlist(playlist).await
    }

    async fn fetch_playlist(&self, playlist_id: &str) -> core_library::Result<Option<Playlist>> {
        self.store.open().await?;
        self.store.get_playlist(playlist_id).await
    }
}
