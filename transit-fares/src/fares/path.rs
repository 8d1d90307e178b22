//! Search paths as seen by fare calculators.
//!
//! A search represents a path as a chain of states linked from the most
//! recent back to the origin. Pricing needs the transit rides in forward
//! order, so each call walks the chain once and reverses the rides found.

use std::iter;
use std::sync::Arc;

use crate::domain::ClockTime;
use crate::network::PatternIndex;

/// One ride on a trip pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitLeg {
    pub pattern: PatternIndex,
    pub board_time: ClockTime,
}

impl TransitLeg {
    pub fn new(pattern: PatternIndex, board_time: ClockTime) -> Self {
        Self {
            pattern,
            board_time,
        }
    }
}

/// A state in a backward-linked search path.
pub trait PathState {
    /// The state this one was reached from, `None` at the origin.
    fn back(&self) -> Option<&Self>;

    /// The ride that produced this state, `None` for access and transfer
    /// states.
    fn transit_leg(&self) -> Option<TransitLeg>;
}

/// Transit legs of the path ending at `state`, in travel order.
pub fn transit_legs<S: PathState>(state: &S) -> Vec<TransitLeg> {
    let mut legs: Vec<TransitLeg> = iter::successors(Some(state), |s| s.back())
        .filter_map(|s| s.transit_leg())
        .collect();
    legs.reverse();
    legs
}

/// How a [`SearchState`] was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    /// Reached the first stop from the street network.
    Access,
    /// Rode `pattern`, boarding at `board_time`.
    Transit {
        pattern: PatternIndex,
        board_time: ClockTime,
    },
    /// Walked or cycled between stops.
    Transfer,
}

/// A concrete immutable search state.
///
/// Extending a state returns a new state pointing back at it, so many paths
/// can share a common prefix.
///
/// # Examples
///
/// ```
/// use transit_fares::domain::ClockTime;
/// use transit_fares::fares::{SearchState, transit_legs};
/// use transit_fares::network::PatternIndex;
///
/// let t = ClockTime::from_seconds;
/// let path = SearchState::origin(t(0))
///     .ride(PatternIndex(4), t(60), t(900))
///     .transfer(t(1200))
///     .ride(PatternIndex(7), t(1500), t(2400));
///
/// let legs = transit_legs(path.as_ref());
/// assert_eq!(legs.len(), 2);
/// assert_eq!(legs[0].pattern, PatternIndex(4));
/// assert_eq!(legs[1].board_time, t(1500));
/// ```
#[derive(Debug, Clone)]
pub struct SearchState {
    kind: StateKind,
    clock_time: ClockTime,
    back: Option<Arc<SearchState>>,
}

impl SearchState {
    /// The first state of a path.
    pub fn origin(clock_time: ClockTime) -> Arc<SearchState> {
        Arc::new(SearchState {
            kind: StateKind::Access,
            clock_time,
            back: None,
        })
    }

    /// Extend with a ride on `pattern`.
    pub fn ride(
        self: &Arc<Self>,
        pattern: PatternIndex,
        board_time: ClockTime,
        alight_time: ClockTime,
    ) -> Arc<SearchState> {
        Arc::new(SearchState {
            kind: StateKind::Transit {
                pattern,
                board_time,
            },
            clock_time: alight_time,
            back: Some(Arc::clone(self)),
        })
    }

    /// Extend with a street transfer arriving at `arrival_time`.
    pub fn transfer(self: &Arc<Self>, arrival_time: ClockTime) -> Arc<SearchState> {
        Arc::new(SearchState {
            kind: StateKind::Transfer,
            clock_time: arrival_time,
            back: Some(Arc::clone(self)),
        })
    }

    /// How this state was reached.
    pub fn kind(&self) -> StateKind {
        self.kind
    }

    /// Clock time at this state.
    pub fn clock_time(&self) -> ClockTime {
        self.clock_time
    }
}

impl PathState for SearchState {
    fn back(&self) -> Option<&Self> {
        self.back.as_deref()
    }

    fn transit_leg(&self) -> Option<TransitLeg> {
        match self.kind {
            StateKind::Transit {
                pattern,
                board_time,
            } => Some(TransitLeg::new(pattern, board_time)),
            StateKind::Access | StateKind::Transfer => None,
        }
    }
}
