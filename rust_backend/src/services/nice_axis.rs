//! Human-friendly chart axis ceilings and ticks.
//!
//! Steps are drawn from the decimal "nice number" family
//! `{1, 2, 2.5, 5, 10} × 10^k`, restricted to positive integers. Candidates
//! are scored on tick count and wasted headroom; the lowest score wins.

use serde::{Deserialize, Serialize};

const STEP_MULTIPLIERS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];
const MAGNITUDE_SCALES: [f64; 3] = [0.1, 1.0, 10.0];
const TICK_BOUND_PENALTY: f64 = 100.0;
const TICK_DISTANCE_PENALTY: f64 = 10.0;

/// Largest ceiling the calculator produces. Targets above it are clamped so
/// every step and ceiling stays exactly representable as `u64`.
pub const MAX_AXIS_CEILING: f64 = 1e15;
/// Upper bound on requested tick counts.
pub const MAX_TICK_COUNT: u32 = 100;

/// Axis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NiceAxisRequest {
    /// Largest data value (for stacked charts, the largest stack total).
    pub max_value: f64,
    /// Headroom factor; values below 1 are treated as 1.
    pub multiplier: f64,
    /// Smallest acceptable ceiling, rounded up to a whole number.
    pub min_max: f64,
    pub desired_tick_count: u32,
    pub min_tick_count: u32,
    pub max_tick_count: u32,
}

impl Default for NiceAxisRequest {
    fn default() -> Self {
        Self {
            max_value: 0.0,
            multiplier: 1.0,
            min_max: 1.0,
            desired_tick_count: 6,
            min_tick_count: 4,
            max_tick_count: 8,
        }
    }
}

impl NiceAxisRequest {
    pub fn new(max_value: f64, multiplier: f64) -> Self {
        Self {
            max_value,
            multiplier,
            ..Self::default()
        }
    }
}

/// Axis ceiling, step and tick values `0, step, …, max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiceAxis {
    pub max: u64,
    pub step: u64,
    pub ticks: Vec<u64>,
}

impl NiceAxis {
    fn from_step(max: u64, step: u64) -> Self {
        let count = max / step + 1;
        Self {
            max,
            step,
            ticks: (0..count).map(|i| i * step).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    step: u64,
    max: u64,
    score: f64,
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Compute a nice axis for `request`.
///
/// # Example
/// ```
/// use roster_rust::services::nice_axis::{nice_axis, NiceAxisRequest};
///
/// let axis = nice_axis(&NiceAxisRequest::new(47.0, 1.1));
/// assert_eq!(axis.step, 10);
/// assert_eq!(axis.max, 60);
/// assert_eq!(axis.ticks, vec![0, 10, 20, 30, 40, 50, 60]);
/// ```
pub fn nice_axis(request: &NiceAxisRequest) -> NiceAxis {
    // Ceilings are integers, so a fractional minimum rounds up.
    let min_max = finite_or(request.min_max, 1.0).clamp(1.0, MAX_AXIS_CEILING).ceil();
    let max_value = finite_or(request.max_value, 0.0).max(0.0);
    let multiplier = finite_or(request.multiplier, 1.0).max(1.0);

    if max_value <= 0.0 {
        let max = min_max as u64;
        return NiceAxis {
            max,
            step: 1,
            ticks: vec![0, max],
        };
    }

    let target = min_max.max(max_value * multiplier).min(MAX_AXIS_CEILING);
    let desired = f64::from(request.desired_tick_count.min(MAX_TICK_COUNT));
    let min_ticks = f64::from(request.min_tick_count.min(MAX_TICK_COUNT));
    let max_ticks = f64::from(request.max_tick_count.min(MAX_TICK_COUNT));
    let intervals = (desired - 1.0).max(1.0);
    let rough_step = (target / intervals).max(1.0);
    let magnitude = 10f64.powf(rough_step.log10().floor());

    let mut steps: Vec<u64> = MAGNITUDE_SCALES
        .iter()
        .flat_map(|scale| STEP_MULTIPLIERS.iter().map(move |m| m * magnitude * scale))
        .filter(|step| step.is_finite() && *step >= 1.0 && step.round() == *step)
        .map(|step| step as u64)
        .collect();
    steps.sort_unstable();
    steps.dedup();

    let best = steps
        .into_iter()
        .map(|step| {
            let step_f = step as f64;
            let max_f = (target / step_f).ceil() * step_f;
            let ticks = max_f / step_f + 1.0;
            let below = if ticks < min_ticks { (min_ticks - ticks) * TICK_BOUND_PENALTY } else { 0.0 };
            let above = if ticks > max_ticks { (ticks - max_ticks) * TICK_BOUND_PENALTY } else { 0.0 };
            let distance = (ticks - desired).abs() * TICK_DISTANCE_PENALTY;
            let slack = (max_f - target) / step_f;
            Candidate {
                step,
                max: max_f as u64,
                score: below + above + distance + slack,
            }
        })
        .min_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then(a.max.cmp(&b.max))
                .then(a.step.cmp(&b.step))
        });

    match best {
        Some(candidate) => NiceAxis::from_step(candidate.max, candidate.step),
        None => {
            let step = rough_step.round().max(1.0) as u64;
            let max = (target / step as f64).ceil() as u64 * step;
            NiceAxis::from_step(max, step)
        }
    }
}
