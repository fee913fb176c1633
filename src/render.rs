//! Plain-text rendering of the user's library.

use std::io::{self, Write};

use crate::{
    api,
    protocol::{Playlist, Track, UserProfile},
};

/// Number of tracks shown when a playlist is expanded.
pub const TOP_TRACKS: usize = 10;

/// Formats a duration in milliseconds as `M:SS`.
#[must_use]
pub fn format_duration(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{minutes}:{seconds:02}")
}

pub fn profile<W: Write>(out: &mut W, profile: &UserProfile) -> io::Result<()> {
    writeln!(out, "{}", profile.display_name)?;
    writeln!(out, "  id:      {}", profile.id)?;
    writeln!(out, "  email:   {}", profile.email)?;
    writeln!(out, "  uri:     {} ({})", profile.uri, profile.external_urls.spotify)?;
    writeln!(out, "  url:     {}", profile.href)?;
    match profile.image() {
        Some(image) => writeln!(out, "  image:   {}", image.url),
        None => writeln!(out, "  image:   (no profile image)"),
    }
}

pub fn playlists<W: Write>(out: &mut W, playlists: &[Playlist]) -> io::Result<()> {
    writeln!(out, "Your Playlists ({})", playlists.len())?;
    for playlist in playlists {
        let visibility = if playlist.is_public() {
            "Public"
        } else {
            "Private"
        };
        writeln!(out, "  {}  [{}]", playlist.name, playlist.id)?;
        writeln!(out, "    {} tracks • {visibility}", playlist.tracks.total)?;
    }
    Ok(())
}

/// Renders the most popular of `tracks`, which must already be sorted.
pub fn popular_tracks<W: Write>(
    out: &mut W,
    playlist: &Playlist,
    tracks: &[Track],
) -> io::Result<()> {
    writeln!(out, "Most Popular Tracks in \"{}\"", playlist.name)?;

    if tracks.is_empty() {
        writeln!(out, "  No tracks found in this playlist.")?;
    }

    for (rank, track) in api::top_tracks(tracks, TOP_TRACKS).iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {} - {}",
            rank + 1,
            track.name,
            track.artist_names()
        )?;
        writeln!(
            out,
            "      {} | {} | popularity {}",
            track.album.name,
            format_duration(track.duration_ms),
            track.popularity
        )?;
    }

    writeln!(
        out,
        "View full playlist on Spotify: {}",
        playlist.external_urls.spotify
    )
}
