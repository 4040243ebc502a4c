//! Streak engine
//!
//! Turns a habit's check-offs into the set of covered periods and measures
//! runs of consecutive covered periods:
//!
//! - **Longest streak**: the best run anywhere between the first check-off
//!   and the scan bound.
//! - **Current streak**: the run ending at the latest covered period, or at
//!   the present period once that is covered. [`CurrentRule::GraceWindow`]
//!   narrows this to runs ending no earlier than the period before now.
//!
//! The engine never mutates check-off history and reads "now" only through
//! its [`Clock`].

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::habit::Trackable;
use super::id::HabitId;
use super::period::{period_start, periods_between, Periodicity};
use super::source::HabitSource;

/// Upper end of the longest-streak scan
///
/// Both bounds give the same answer for ordinary histories, since periods
/// after the latest check-off can only reset the run. They diverge when
/// check-offs are dated after now: `Now` ignores those periods,
/// `LatestCheckOff` counts them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanBound {
    /// Scan through the period containing the clock's now
    #[default]
    Now,
    /// Scan through the period of the most recent check-off
    LatestCheckOff,
}

impl ScanBound {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanBound::Now => "now",
            ScanBound::LatestCheckOff => "latest_check_off",
        }
    }
}

/// When a run that stopped before the present period still counts as current
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentRule {
    /// Count back from the latest covered period, however old
    #[default]
    FromLatest,
    /// Only a run ending in the present period or the one before it is alive
    GraceWindow,
}

impl CurrentRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrentRule::FromLatest => "from_latest",
            CurrentRule::GraceWindow => "grace_window",
        }
    }
}

/// Longest and current streak of one habit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    pub longest: u32,
    pub current: u32,
}

/// Computes streaks against an injected clock
#[derive(Debug, Clone)]
pub struct StreakEngine<C> {
    clock: C,
    bound: ScanBound,
    rule: CurrentRule,
}

impl<C: Clock> StreakEngine<C> {
    /// Creates an engine scanning up to now
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            bound: ScanBound::default(),
            rule: CurrentRule::default(),
        }
    }

    /// Sets the longest-streak scan bound
    pub fn with_bound(mut self, bound: ScanBound) -> Self {
        self.bound = bound;
        self
    }

    /// Sets how runs ending before the present period are treated
    pub fn with_current_rule(mut self, rule: CurrentRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn bound(&self) -> ScanBound {
        self.bound
    }

    pub fn current_rule(&self) -> CurrentRule {
        self.rule
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Longest run of consecutive covered periods
    pub fn longest_streak(&self, check_offs: &[NaiveDateTime], periodicity: Periodicity) -> u32 {
        let covered = covered_periods(check_offs, periodicity);
        let (Some(&first), Some(&latest)) = (covered.first(), covered.last()) else {
            return 0;
        };

        let upper = match self.bound {
            ScanBound::Now => period_start(self.clock.now(), periodicity),
            ScanBound::LatestCheckOff => latest,
        };

        let mut run = 0;
        let mut best = 0;
        for period in periods_between(first, upper, periodicity) {
            if covered.contains(&period) {
                run += 1;
                best = best.max(run);
            } else {
                run = 0;
            }
        }

        best
    }

    /// Run of covered periods ending at the latest check-off
    ///
    /// While the present period has no check-off, the walk starts at the
    /// latest covered period. Under [`CurrentRule::GraceWindow`] that period
    /// must be the one right before now, otherwise the result is 0.
    pub fn current_streak(&self, check_offs: &[NaiveDateTime], periodicity: Periodicity) -> u32 {
        let covered = covered_periods(check_offs, periodicity);
        let Some(&latest) = covered.last() else {
            return 0;
        };

        let now_period = period_start(self.clock.now(), periodicity);

        let anchor = if latest < now_period {
            let in_window = periodicity.previous(now_period) == Some(latest);
            if self.rule == CurrentRule::GraceWindow && !in_window {
                return 0;
            }
            latest
        } else {
            // Future-dated check-offs fall here too; walk back from now
            now_period
        };

        count_back(&covered, anchor, periodicity)
    }

    /// Both streaks for a habit
    pub fn streaks<H: Trackable + ?Sized>(&self, habit: &H) -> Streaks {
        Streaks {
            longest: self.longest_for(habit),
            current: self.current_for(habit),
        }
    }

    pub fn longest_for<H: Trackable + ?Sized>(&self, habit: &H) -> u32 {
        self.longest_streak(habit.check_offs(), habit.periodicity())
    }

    pub fn current_for<H: Trackable + ?Sized>(&self, habit: &H) -> u32 {
        self.current_streak(habit.check_offs(), habit.periodicity())
    }

    /// Both streaks for a habit read through a storage collaborator
    pub fn streaks_for_id<S: HabitSource + ?Sized>(
        &self,
        source: &S,
        id: &HabitId,
    ) -> Result<Streaks, S::Error> {
        let periodicity = source.periodicity_of(id)?;
        let check_offs = source.check_offs_of(id)?;

        Ok(Streaks {
            longest: self.longest_streak(&check_offs, periodicity),
            current: self.current_streak(&check_offs, periodicity),
        })
    }
}

/// Distinct period keys covered by the check-offs, ordered
pub fn covered_periods(check_offs: &[NaiveDateTime], periodicity: Periodicity) -> BTreeSet<NaiveDate> {
    check_offs
        .iter()
        .map(|instant| period_start(*instant, periodicity))
        .collect()
}

fn count_back(covered: &BTreeSet<NaiveDate>, from: NaiveDate, periodicity: Periodicity) -> u32 {
    let mut run = 0;
    let mut cursor = Some(from);

    while let Some(period) = cursor {
        if !covered.contains(&period) {
            break;
        }
        run += 1;
        cursor = periodicity.previous(period);
    }

    run
}
