//! Probability bands for the simulator.
//!
//! Each state owns a slice of `[0, 1]` whose width is its odds for the
//! current phase. Bands are laid out from 1 downwards in state order.

use crate::config::schema::StateWeights;
use crate::source::SourceError;

/// Tolerance for per-phase odds sums.
const ODDS_EPSILON: f64 = 1e-9;

/// Slice of the unit interval that maps a roll to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub value: String,
    pub low: f64,
    pub high: f64,
}

/// Lay out bands for `phase`.
///
/// The last state absorbs whatever probability is left, so the bands always
/// cover the whole interval. States reached after the total is exhausted,
/// and states with zero odds, get no band.
pub fn spread_odds(states: &[StateWeights], phase: usize) -> Vec<Band> {
    let mut total = 1.0_f64;
    let mut bands = Vec::with_capacity(states.len());

    for (i, state) in states.iter().enumerate() {
        if total <= 0.0 {
            break;
        }
        let high = total;
        total -= state.odds.get(phase).copied().unwrap_or(0.0);

        if i + 1 == states.len() && total > 0.0 {
            total = 0.0;
        }
        let low = total.max(0.0);

        if high > low {
            bands.push(Band {
                value: state.value.clone(),
                low,
                high,
            });
        }
    }
    bands
}

/// First band containing `roll`.
pub fn pick(bands: &[Band], roll: f64) -> Option<&Band> {
    bands.iter().find(|b| roll >= b.low && roll <= b.high)
}

/// Every problem with a state table.
pub fn check_states(states: &[StateWeights]) -> Vec<SourceError> {
    let mut errors = Vec::new();

    let Some(first) = states.first() else {
        errors.push(SourceError::NoStates);
        return errors;
    };
    let phases = first.odds.len();
    if phases == 0 {
        errors.push(SourceError::NoPhases {
            value: first.value.clone(),
        });
        return errors;
    }

    for state in states {
        if state.odds.len() != phases {
            errors.push(SourceError::MismatchedOdds {
                value: state.value.clone(),
                expected: phases,
                actual: state.odds.len(),
            });
        }
        for (phase, &odds) in state.odds.iter().enumerate() {
            if !odds.is_finite() || !(0.0..=1.0).contains(&odds) {
                errors.push(SourceError::InvalidOdds {
                    value: state.value.clone(),
                    phase,
                    odds,
                });
            }
        }
    }

    for phase in 0..phases {
        let total: f64 = states.iter().filter_map(|s| s.odds.get(phase)).sum();
        if total > 1.0 + ODDS_EPSILON {
            errors.push(SourceError::OddsOverflow { phase, total });
        }
    }
    errors
}
