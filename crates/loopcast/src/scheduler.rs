use crate::{
    anchor::AnchorStore,
    catalog::Catalog,
    clock::Clock,
    error::{LoopcastError, LoopcastResult},
    keyframe,
    media_set::{MediaSet, OutputPlaylistType, Sequence},
    request::PlaylistRequest,
    segment::{floor_div, SegmentCounter},
    sequence::{assemble_sequences, check_alignment, Track},
    window::{resolve_window, Addressing, ResolvedClip, WindowParams},
};

/// Seed of the synthetic key-frame layout attached on request.
const KEY_FRAME_SEED: i64 = 0;

/// Builds media sets for catalogs, anchoring live windows in an [`AnchorStore`].
pub struct Scheduler<S> {
    anchors: S,
    clock: Clock,
}

impl<S> Scheduler<S>
where
    S: AnchorStore,
{
    pub fn new(anchors: S) -> Self {
        Self {
            anchors,
            clock: Clock::new(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn anchors(&self) -> &S {
        &self.anchors
    }

    /// Answers one playlist query for the catalog identified by `catalog_key`.
    ///
    /// `tracks` are catalog-aligned; use [`Track::primary`] for the catalog's own paths.
    /// Everything is validated before the reference time may be established.
    pub fn schedule(
        &self,
        catalog_key: &str,
        catalog: &Catalog,
        tracks: &[Track],
        request: &PlaylistRequest,
    ) -> LoopcastResult<MediaSet> {
        request.validate()?;
        if tracks.is_empty() {
            return Err(LoopcastError::invalid_value("tracks", "at least one track"));
        }
        check_alignment(tracks, catalog.len())?;

        let mut media_set = if request.playlist_type.is_live() {
            self.schedule_live(catalog_key, catalog, tracks, request)?
        } else {
            schedule_vod(catalog, tracks, request)?
        };

        if request.key_frames {
            let total_millis: i64 = media_set.durations.iter().sum();
            media_set.sequences = media_set
                .sequences
                .into_iter()
                .map(|s| s.with_key_frames(keyframe::synthesize(KEY_FRAME_SEED, total_millis)))
                .collect();
        }
        media_set.consistent_sequence_media_info = request.consistent_sequence_media_info;

        Ok(media_set)
    }

    fn schedule_live(
        &self,
        catalog_key: &str,
        catalog: &Catalog,
        tracks: &[Track],
        request: &PlaylistRequest,
    ) -> LoopcastResult<MediaSet> {
        let cycle = catalog.expand(request.dvr_window_millis, request.safety_margin_millis)?;

        let end_time = request
            .query_time_millis
            .unwrap_or_else(|| self.clock.now_millis());
        let start_time = end_time - request.safety_margin_millis - request.dvr_window_millis;

        // first query: anchor at the cycle boundary before the window start
        let catalog_cycle = catalog.cycle_duration_millis();
        let candidate = floor_div(start_time, catalog_cycle) * catalog_cycle;
        let reference_time = self.anchors.get_or_init(catalog_key, candidate)?;

        let params = WindowParams {
            segment_duration_millis: request.segment_duration_millis,
            dvr_window_millis: request.dvr_window_millis,
            safety_margin_millis: request.safety_margin_millis,
            discontinuity: request.discontinuity,
        };
        let window = resolve_window(&cycle, &params, reference_time, end_time)?;
        let sequences = assemble_sequences(&window.clips, tracks)?;
        tracing::debug!(
            catalog_key,
            reference_time,
            first_clip_time = window.first_clip_time,
            clips = window.clips.len(),
            "Live window resolved"
        );

        let (initial_clip_index, initial_segment_index, segment_base_time) =
            match window.addressing {
                Addressing::Discontinuity {
                    initial_clip_index,
                    initial_segment_index,
                } => (Some(initial_clip_index), Some(initial_segment_index), None),
                Addressing::Continuous { segment_base_time } => {
                    (None, None, Some(segment_base_time))
                }
            };

        Ok(MediaSet {
            discontinuity: request.discontinuity,
            playlist_type: OutputPlaylistType::Live,
            durations: window.durations(),
            sequences,
            first_clip_time: Some(window.first_clip_time),
            initial_clip_index,
            initial_segment_index,
            segment_base_time,
            live_window_duration: Some(request.dvr_window_millis),
            presentation_end_time: request.presentation_end.map(|p| p.time_from(end_time)),
            consistent_sequence_media_info: None,
        })
    }
}

/// Every clip of the catalog once, in order.
fn schedule_vod(
    catalog: &Catalog,
    tracks: &[Track],
    request: &PlaylistRequest,
) -> LoopcastResult<MediaSet> {
    let mut counter = SegmentCounter::new(request.segment_duration_millis, 0, 0);
    let mut start_time_millis = 0;
    let clips: Vec<ResolvedClip> = catalog
        .clips()
        .iter()
        .enumerate()
        .map(|(catalog_index, clip)| {
            let resolved = ResolvedClip {
                clip,
                catalog_index,
                clip_index: counter.clip_index,
                segment_index_start: counter.segment_index,
                start_time_millis,
            };
            counter.advance(clip.duration_millis);
            start_time_millis += clip.duration_millis;
            resolved
        })
        .collect();
    let sequences: Vec<Sequence> = assemble_sequences(&clips, tracks)?;

    Ok(MediaSet {
        discontinuity: request.discontinuity,
        playlist_type: OutputPlaylistType::Vod,
        durations: catalog.clips().iter().map(|c| c.duration_millis).collect(),
        sequences,
        first_clip_time: None,
        initial_clip_index: None,
        initial_segment_index: None,
        segment_base_time: None,
        live_window_duration: None,
        presentation_end_time: None,
        consistent_sequence_media_info: None,
    })
}
