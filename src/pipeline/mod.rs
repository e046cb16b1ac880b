//! Search pipeline: walk -> matcher pool -> result limiter -> console queue.

pub mod cancel;
pub mod context;
pub mod limiter;
pub mod matcher;
pub mod orchestrator;
pub mod walk;

pub use cancel::{CancelToken, recv_or_cancel, send_or_cancel};
pub use context::{
    PipelineChannels, PipelineHandles, PipelineTuning, WalkContext, WalkStats,
    create_pipeline_channels,
};
pub use limiter::{LimiterOutcome, run_limiter, spawn_limiter_thread};
pub use matcher::{MatchCounters, MatchStats, MatcherShared, spawn_matcher_pool};
pub use orchestrator::{run_pipeline, shutdown_pipeline_handles};
pub use walk::{WalkOutcome, run_walk_loop, spawn_walk_thread, to_outcome_walkdir};
