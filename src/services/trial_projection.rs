use crate::domain::cycle::SimulationParameters;
use crate::domain::forecast::DailyTally;
use crate::domain::month_window::MonthWindow;
use crate::services::jitter_sampler::{CYCLE_JITTER_DAYS, DURATION_JITTER_DAYS, JitterSampler};

/// Number of cycles projected forward from the reference date.
pub const MAX_PROJECTED_CYCLES: usize = 12;
/// Projection stops once a cycle starts this many days after the month ends.
pub const LOOKAHEAD_CUTOFF_DAYS: f64 = 90.0;
/// Jittered cycle and period lengths never drop below one day.
pub const MIN_JITTERED_DAYS: f64 = 1.0;

/// A projected period, in fractional days relative to the first day of the
/// month. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventInterval {
    pub start: f64,
    pub end: f64,
}

impl EventInterval {
    pub fn overlaps(&self, day_count: u32) -> bool {
        let last_offset = day_count as f64 - 1.0;
        self.end >= 0.0 && self.start <= last_offset
    }

    /// Zero-based indices of the month days (midnight instants) covered by
    /// this interval, clipped to the month.
    pub fn covered_days(&self, day_count: u32) -> Option<(usize, usize)> {
        let first = self.start.ceil().max(0.0);
        let last = self.end.floor().min(day_count as f64 - 1.0);
        if first > last {
            return None;
        }
        Some((first as usize, last as usize))
    }
}

/// One Monte Carlo trial: jittered lengths and the periods they produce.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialProjection {
    pub cycle_length: f64,
    pub event_duration: f64,
    pub intervals: Vec<EventInterval>,
}

impl TrialProjection {
    pub fn sample<S: JitterSampler + ?Sized>(
        params: &SimulationParameters,
        window: &MonthWindow,
        sampler: &mut S,
    ) -> Self {
        let cycle_length = sampler
            .sample(params.mean_cycle_length, CYCLE_JITTER_DAYS)
            .max(MIN_JITTERED_DAYS);
        let event_duration = sampler
            .sample(params.mean_event_duration, DURATION_JITTER_DAYS)
            .max(MIN_JITTERED_DAYS);
        Self::project(params, window, cycle_length, event_duration)
    }

    pub fn project(
        params: &SimulationParameters,
        window: &MonthWindow,
        cycle_length: f64,
        event_duration: f64,
    ) -> Self {
        let reference_offset = (params.reference_date - window.first_day).num_days() as f64;
        let last_offset = window.day_count as f64 - 1.0;

        let mut intervals = Vec::with_capacity(MAX_PROJECTED_CYCLES);
        let mut cursor = reference_offset;
        for _ in 0..MAX_PROJECTED_CYCLES {
            cursor += cycle_length;
            intervals.push(EventInterval {
                start: cursor,
                end: cursor + event_duration - 1.0,
            });
            if cursor - last_offset > LOOKAHEAD_CUTOFF_DAYS {
                break;
            }
        }

        Self {
            cycle_length,
            event_duration,
            intervals,
        }
    }

    /// Adds this trial's covered days to `tally`, each day at most once even
    /// when consecutive periods overlap. Returns whether any interval
    /// overlapped the month.
    pub fn record(&self, tally: &mut DailyTally) -> bool {
        let day_count = tally.len() as u32;
        let mut hit = false;
        let mut next_unmarked = 0;
        for interval in &self.intervals {
            if !interval.overlaps(day_count) {
                continue;
            }
            hit = true;
            if let Some((first, last)) = interval.covered_days(day_count) {
                let first = first.max(next_unmarked);
                if first <= last {
                    tally.mark_range(first, last);
                    next_unmarked = last + 1;
                }
            }
        }
        hit
    }
}
