//! Per-stage timing for the render pipeline.
//!
//! Each pipeline stage (decode, resolve, measure, composite, encode) holds a
//! [`StageTimer`] for its duration; dropping it emits a `tracing::debug!`
//! event with target `"perf"`, so timings show up only when that target is
//! enabled by the embedding application's subscriber.

use std::time::Instant;

pub struct StageTimer {
    stage: &'static str,
    start: Instant,
}

/// Start timing a named stage. The event is emitted when the returned guard
/// drops, including on early-error paths.
pub fn stage(stage: &'static str) -> StageTimer {
    StageTimer { stage, start: Instant::now() }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(target: "perf", stage = self.stage, ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_survives_nesting_and_early_drop() {
        let outer = stage("render");
        {
            let _inner = stage("encode");
        }
        drop(outer);
    }
}
