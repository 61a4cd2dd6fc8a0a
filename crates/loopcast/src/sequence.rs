use serde::{Deserialize, Serialize};

use crate::{
    catalog::Catalog,
    error::{LoopcastError, LoopcastResult},
    media_set::{ClipRef, Sequence},
    window::ResolvedClip,
};

/// One parallel rendition of the catalog, such as a subtitle track.
///
/// `paths` holds one entry per catalog clip, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub paths: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl Track {
    pub fn new(paths: Vec<String>, language: Option<String>) -> Self {
        Self { paths, language }
    }

    /// The track made of the catalog's own clip paths.
    pub fn primary(catalog: &Catalog, language: Option<String>) -> Self {
        Self {
            paths: catalog.paths().map(ToString::to_string).collect(),
            language,
        }
    }
}

/// Checks that every track holds exactly one path per catalog clip.
pub fn check_alignment(tracks: &[Track], catalog_len: usize) -> LoopcastResult<()> {
    for (track, t) in tracks.iter().enumerate() {
        if t.paths.len() != catalog_len {
            return Err(LoopcastError::TrackMisalignment {
                track,
                expected: catalog_len,
                actual: t.paths.len(),
            });
        }
    }
    Ok(())
}

/// Projects the resolved clips onto every track.
///
/// All sequences share the count and order of `clips`; each draws its paths from its own track.
pub fn assemble_sequences(
    clips: &[ResolvedClip<'_>],
    tracks: &[Track],
) -> LoopcastResult<Vec<Sequence>> {
    let Some(first) = tracks.first() else {
        return Ok(Vec::new());
    };
    check_alignment(tracks, first.paths.len())?;

    tracks
        .iter()
        .enumerate()
        .map(|(track, t)| {
            let clips = clips
                .iter()
                .map(|clip| {
                    t.paths
                        .get(clip.catalog_index)
                        .map(ClipRef::source)
                        .ok_or(LoopcastError::TrackMisalignment {
                            track,
                            expected: clip.catalog_index + 1,
                            actual: t.paths.len(),
                        })
                })
                .collect::<LoopcastResult<Vec<_>>>()?;
            Ok(Sequence::new(clips, t.language.clone()))
        })
        .collect()
}
