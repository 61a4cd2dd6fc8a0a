//! Live-window scheduling of looping clip catalogs.
//!
//! ```text
//! ┌──────────────┐  paths  ┌──────────────────┐
//! │    Config    ├─────────►│ DurationProvider │ (ffprobe, cached)
//! └──────────────┘          └────────┬─────────┘
//!                                    │ Catalog
//!                          ┌─────────▼─────────┐   ┌─────────────┐
//!   PlaylistRequest ──────►│     Scheduler     ├──►│ AnchorStore │ reference time
//!                          └─────────┬─────────┘   └─────────────┘
//!                      expand cycle  │  resolve window
//!                          ┌─────────▼─────────┐
//!                          │ assemble sequences├──► MediaSet (JSON)
//!                          └───────────────────┘
//! ```

pub mod anchor;
pub mod catalog;
pub mod clock;
pub mod duration;
pub mod error;
pub mod keyframe;
pub mod media_set;
pub mod request;
pub mod scheduler;
pub mod segment;
pub mod sequence;
pub mod window;

pub use anchor::{AnchorStore, FileAnchorStore, FixedAnchorStore, MemoryAnchorStore};
pub use catalog::{Catalog, Clip, ExpandedCycle};
pub use duration::{
    CachedDurationProvider, DurationProvider, FfprobeDurationProvider, StaticDurationProvider,
};
pub use error::{LoopcastError, LoopcastResult};
pub use media_set::{ClipRef, MediaSet, OutputPlaylistType, Sequence};
pub use request::{PlaylistRequest, PlaylistType, PresentationEnd, ScheduleConfig};
pub use scheduler::Scheduler;
pub use sequence::Track;
pub use window::{resolve_window, Addressing, ResolvedClip, ResolvedWindow, WindowParams};
