//! Plot file registry
//!
//! Maps plot file names to their pending found deadlines and accumulated
//! health statistics. One registry is built per analyzed log file; several
//! can be combined with [`PlotFileRegistry::merge`].
//!
//! Records live in a `Vec` in first-seen order and are addressed through
//! [`PlotFileId`] handles, so lookups never insert as a side effect and
//! reports come out in a stable order.

use std::collections::HashMap;
use std::ops::{Add, AddAssign};

use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Stats
// ─────────────────────────────────────────────────────────────────────────────

/// Healthy and corrupted counters for one plot file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlotFileStats {
    /// Found deadlines confirmed equal by the pool
    pub healthy_count: u64,

    /// Found deadlines that the pool contradicted
    pub corrupted_count: u64,
}

impl PlotFileStats {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Healthy => self.healthy_count += 1,
            Outcome::Corrupted => self.corrupted_count += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.healthy_count + self.corrupted_count
    }
}

impl Add for PlotFileStats {
    type Output = PlotFileStats;

    fn add(self, rhs: Self) -> Self::Output {
        PlotFileStats {
            healthy_count: self.healthy_count + rhs.healthy_count,
            corrupted_count: self.corrupted_count + rhs.corrupted_count,
        }
    }
}

impl AddAssign for PlotFileStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// How a found deadline was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Healthy,
    Corrupted,
}

/// One settled found deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The found deadline that was settled
    pub deadline: String,
    pub outcome: Outcome,
}

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to a record inside the registry that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlotFileId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingDeadline {
    value: String,
    /// Registry-wide submission order, used to break ties between plot files
    sequence: u64,
}

/// Everything known about one plot file
#[derive(Debug, Clone)]
pub struct PlotFileRecord {
    name: String,
    pending: Vec<PendingDeadline>,
    resolutions: Vec<Resolution>,
    stats: PlotFileStats,
}

impl PlotFileRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pending: Vec::new(),
            resolutions: Vec::new(),
            stats: PlotFileStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> PlotFileStats {
        self.stats
    }

    /// Found deadlines not yet settled, oldest first
    pub fn pending_deadlines(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(|p| p.value.as_str())
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    /// Oldest pending occurrence of `deadline` as (position, sequence)
    fn oldest_pending(&self, deadline: &str) -> Option<(usize, u64)> {
        // Pending entries are pushed in sequence order, so the first hit is the oldest
        self.pending
            .iter()
            .position(|p| p.value == deadline)
            .map(|pos| (pos, self.pending[pos].sequence))
    }

    fn resolve(&mut self, deadline: String, outcome: Outcome) {
        self.stats.record(outcome);
        self.resolutions.push(Resolution { deadline, outcome });
    }

    fn recompute_stats(&mut self) {
        let mut stats = PlotFileStats::default();
        for resolution in &self.resolutions {
            stats.record(resolution.outcome);
        }
        self.stats = stats;
    }
}

/// Report row for one plot file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlotFileSummary {
    pub name: String,
    pub healthy_count: u64,
    pub corrupted_count: u64,
    pub pending_count: usize,
}

impl From<&PlotFileRecord> for PlotFileSummary {
    fn from(record: &PlotFileRecord) -> Self {
        Self {
            name: record.name.clone(),
            healthy_count: record.stats.healthy_count,
            corrupted_count: record.stats.corrupted_count,
            pending_count: record.pending.len(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Plot file records of one analysis, plus diagnostic counters
#[derive(Debug, Clone, Default)]
pub struct PlotFileRegistry {
    /// Records in first-seen order
    records: Vec<PlotFileRecord>,

    /// Name lookup into `records`
    index: HashMap<String, PlotFileId>,

    /// Sequence number for the next found deadline
    next_sequence: u64,

    /// Lines whose markers were present but incomplete
    mining_log_error_count: u64,

    /// Confirmed deadlines that matched no pending found deadline
    unmatched_confirmation_count: u64,
}

impl PlotFileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of plot files seen
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True iff a record exists for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Handle of the record for `name`, creating an empty record if needed
    pub fn get_or_create(&mut self, name: &str) -> PlotFileId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = PlotFileId(self.records.len());
        self.records.push(PlotFileRecord::new(name));
        self.index.insert(name.to_string(), id);
        id
    }

    /// Create an empty record for `name`; existing records are left untouched
    pub fn add(&mut self, name: &str) {
        self.get_or_create(name);
    }

    pub fn id_of(&self, name: &str) -> Option<PlotFileId> {
        self.index.get(name).copied()
    }

    /// Record behind a handle issued by this registry
    pub fn record(&self, id: PlotFileId) -> Option<&PlotFileRecord> {
        self.records.get(id.0)
    }

    pub fn get(&self, name: &str) -> Option<&PlotFileRecord> {
        self.id_of(name).and_then(|id| self.record(id))
    }

    /// All records in first-seen order
    pub fn records(&self) -> impl Iterator<Item = &PlotFileRecord> {
        self.records.iter()
    }

    /// Add a pending found deadline to `name`, creating its record if needed.
    ///
    /// Identical values are kept as separate pending entries.
    pub fn add_found_deadline(&mut self, name: &str, deadline: &str) -> PlotFileId {
        let id = self.get_or_create(name);
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.records[id.0].pending.push(PendingDeadline {
            value: deadline.to_string(),
            sequence,
        });
        id
    }

    /// Record holding `deadline` as pending.
    ///
    /// When several plot files hold the same value, the one that submitted it
    /// first wins.
    pub fn find_deadline(&self, deadline: &str) -> Option<PlotFileId> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| {
                record
                    .oldest_pending(deadline)
                    .map(|(_, sequence)| (sequence, PlotFileId(i)))
            })
            .min_by_key(|(sequence, _)| *sequence)
            .map(|(_, id)| id)
    }

    /// Name of the plot file holding `deadline` as pending, if any
    pub fn find_plot_file_with_deadline(&self, deadline: &str) -> Option<&str> {
        self.find_deadline(deadline)
            .and_then(|id| self.record(id))
            .map(PlotFileRecord::name)
    }

    /// Remove one pending occurrence of `deadline` from `name`.
    ///
    /// Returns false (and changes nothing) when there is no such occurrence.
    pub fn remove_deadline(&mut self, name: &str, deadline: &str) -> bool {
        let Some(id) = self.id_of(name) else {
            return false;
        };
        self.remove_pending(id, deadline).is_some()
    }

    fn remove_pending(&mut self, id: PlotFileId, deadline: &str) -> Option<u64> {
        let record = self.records.get_mut(id.0)?;
        let (pos, sequence) = record.oldest_pending(deadline)?;
        record.pending.remove(pos);
        Some(sequence)
    }

    /// Settle a confirmed deadline against the pending found deadlines.
    ///
    /// On a match the pending occurrence is consumed and the plot file is
    /// credited one healthy resolution. Returns the credited plot file.
    pub fn resolve_confirmed(&mut self, deadline: &str) -> Option<PlotFileId> {
        let id = self.find_deadline(deadline)?;
        self.remove_pending(id, deadline)?;
        self.records[id.0].resolve(deadline.to_string(), Outcome::Healthy);
        Some(id)
    }

    /// Append a resolution to a record's history and update its stats
    pub fn record_resolution(&mut self, id: PlotFileId, deadline: &str, outcome: Outcome) {
        if let Some(record) = self.records.get_mut(id.0) {
            record.resolve(deadline.to_string(), outcome);
        }
    }

    /// Consume the newest found deadline that is still pending.
    ///
    /// Looks across every record for the highest submission sequence, so an
    /// already confirmed latest submission falls back to the next newest
    /// unpaired one. Returns the owning plot file and the deadline value.
    pub fn take_latest_unconfirmed(&mut self) -> Option<(PlotFileId, String)> {
        let (id, pos) = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| {
                // Pending entries are pushed in sequence order, so the last one is the newest
                let pos = record.pending.len().checked_sub(1)?;
                Some((record.pending[pos].sequence, PlotFileId(i), pos))
            })
            .max_by_key(|(sequence, _, _)| *sequence)
            .map(|(_, id, pos)| (id, pos))?;
        let pending = self.records[id.0].pending.remove(pos);
        Some((id, pending.value))
    }

    /// Recompute every record's stats from its resolution history.
    ///
    /// Pending deadlines do not count either way. Safe to call repeatedly.
    pub fn calculate_corrupted_count(&mut self) {
        for record in &mut self.records {
            record.recompute_stats();
        }
    }

    pub fn increment_mining_log_error_count(&mut self) {
        self.mining_log_error_count += 1;
    }

    pub fn set_mining_log_error_count(&mut self, count: u64) {
        self.mining_log_error_count = count;
    }

    pub fn get_mining_log_error_count(&self) -> u64 {
        self.mining_log_error_count
    }

    pub fn increment_unmatched_confirmation_count(&mut self) {
        self.unmatched_confirmation_count += 1;
    }

    pub fn unmatched_confirmation_count(&self) -> u64 {
        self.unmatched_confirmation_count
    }

    /// Found deadlines still waiting for a confirmation, across all plot files
    pub fn pending_count(&self) -> usize {
        self.records.iter().map(PlotFileRecord::pending_count).sum()
    }

    /// Stats summed over all plot files
    pub fn total_stats(&self) -> PlotFileStats {
        self.records
            .iter()
            .fold(PlotFileStats::default(), |acc, r| acc + r.stats)
    }

    /// Report rows in first-seen order
    pub fn report(&self) -> Vec<PlotFileSummary> {
        self.records.iter().map(PlotFileSummary::from).collect()
    }

    /// Combine two registries.
    ///
    /// Plot files are unioned (lhs order first, then rhs newcomers); stats,
    /// resolution histories and pending deadlines of shared plot files are
    /// concatenated; diagnostic counters are summed. Pending deadlines from
    /// `rhs` are ordered after those of `lhs` for tie-breaking, so the merge
    /// is commutative on stats but not on which file a later tie credits.
    pub fn merge(lhs: &PlotFileRegistry, rhs: &PlotFileRegistry) -> PlotFileRegistry {
        let mut merged = lhs.clone();

        let offset = lhs.next_sequence;
        for record in &rhs.records {
            let id = merged.get_or_create(&record.name);
            let target = &mut merged.records[id.0];
            target
                .pending
                .extend(record.pending.iter().map(|p| PendingDeadline {
                    value: p.value.clone(),
                    sequence: p.sequence + offset,
                }));
            target.resolutions.extend(record.resolutions.iter().cloned());
            target.stats += record.stats;
        }

        merged.next_sequence = lhs.next_sequence + rhs.next_sequence;
        merged.mining_log_error_count += rhs.mining_log_error_count;
        merged.unmatched_confirmation_count += rhs.unmatched_confirmation_count;
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_of(registry: &PlotFileRegistry, name: &str) -> Vec<String> {
        registry
            .get(name)
            .map(|r| r.pending_deadlines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn stats_of(registry: &PlotFileRegistry, name: &str) -> PlotFileStats {
        registry.get(name).map(|r| r.stats()).unwrap_or_default()
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut registry = PlotFileRegistry::new();
        registry.add("plotA");
        registry.add_found_deadline("plotA", "100");
        registry.resolve_confirmed("100");

        registry.add("plotA");

        assert_eq!(registry.len(), 1);
        assert_eq!(stats_of(&registry, "plotA").healthy_count, 1);
    }

    #[test]
    fn test_contains_does_not_insert() {
        let registry = PlotFileRegistry::new();
        assert!(!registry.contains("plotA"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_found_deadline_auto_creates() {
        let mut registry = PlotFileRegistry::new();
        registry.add_found_deadline("plotA", "100");

        assert!(registry.contains("plotA"));
        assert_eq!(pending_of(&registry, "plotA"), vec!["100"]);
    }

    #[test]
    fn test_duplicate_deadlines_tracked_separately() {
        let mut registry = PlotFileRegistry::new();
        registry.add_found_deadline("plotA", "100");
        registry.add_found_deadline("plotA", "100");

        assert!(registry.remove_deadline("plotA", "100"));
        assert_eq!(pending_of(&registry, "plotA"), vec!["100"]);
    }

    #[test]
    fn test_find_plot_file_with_deadline() {
        let mut registry = PlotFileRegistry::new();
        registry.add_found_deadline("plotA", "100");
        registry.add_found_deadline("plotB", "200");

        assert_eq!(registry.find_plot_file_with_deadline("200"), Some("plotB"));
        assert_eq!(registry.find_plot_file_with_deadline("300"), None);
    }

    #[test]
    fn test_tie_break_prefers_earliest_submission() {
        let mut registry = PlotFileRegistry::new();
        // plotZ is seen first but submits 50 after plotA does
        registry.add_found_deadline("plotZ", "7");
        registry.add_found_deadline("plotA", "50");
        registry.add_found_deadline("plotZ", "50");

        assert_eq!(registry.find_plot_file_with_deadline("50"), Some("plotA"));
        registry.resolve_confirmed("50");
        assert_eq!(registry.find_plot_file_with_deadline("50"), Some("plotZ"));
    }

    #[test]
    fn test_remove_missing_deadline_is_noop() {
        let mut registry = PlotFileRegistry::new();
        registry.add_found_deadline("plotA", "100");

        assert!(!registry.remove_deadline("plotA", "999"));
        assert!(!registry.remove_deadline("unknown", "100"));
        assert_eq!(pending_of(&registry, "plotA"), vec!["100"]);
        assert!(!registry.contains("unknown"));
    }

    #[test]
    fn test_resolve_confirmed_credits_healthy() {
        let mut registry = PlotFileRegistry::new();
        let id = registry.add_found_deadline("plotA", "100");

        assert_eq!(registry.resolve_confirmed("100"), Some(id));
        assert_eq!(stats_of(&registry, "plotA").healthy_count, 1);
        assert!(pending_of(&registry, "plotA").is_empty());
        assert_eq!(registry.resolve_confirmed("100"), None);
    }

    #[test]
    fn test_take_latest_unconfirmed() {
        let mut registry = PlotFileRegistry::new();
        registry.add_found_deadline("plotA", "100");
        let id = registry.add_found_deadline("plotB", "200");

        assert_eq!(registry.take_latest_unconfirmed(), Some((id, "200".to_string())));
        assert_eq!(pending_of(&registry, "plotA"), vec!["100"]);
        assert_eq!(
            registry.take_latest_unconfirmed().map(|(_, d)| d),
            Some("100".to_string())
        );
        assert_eq!(registry.take_latest_unconfirmed(), None);
    }

    #[test]
    fn test_take_latest_falls_back_to_older_unpaired() {
        let mut registry = PlotFileRegistry::new();
        let a = registry.add_found_deadline("plotA", "100");
        registry.add_found_deadline("plotB", "200");
        registry.resolve_confirmed("200");

        assert_eq!(registry.take_latest_unconfirmed(), Some((a, "100".to_string())));
        assert!(pending_of(&registry, "plotA").is_empty());
    }

    #[test]
    fn test_take_latest_skips_already_confirmed() {
        let mut registry = PlotFileRegistry::new();
        registry.add_found_deadline("plotA", "100");
        registry.resolve_confirmed("100");

        assert_eq!(registry.take_latest_unconfirmed(), None);
    }

    #[test]
    fn test_calculate_corrupted_count_is_idempotent() {
        let mut registry = PlotFileRegistry::new();
        let id = registry.add_found_deadline("plotA", "100");
        registry.add_found_deadline("plotA", "300");
        registry.resolve_confirmed("100");
        registry.record_resolution(id, "200", Outcome::Corrupted);

        registry.calculate_corrupted_count();
        let first = stats_of(&registry, "plotA");
        registry.calculate_corrupted_count();
        let second = stats_of(&registry, "plotA");

        assert_eq!(first, second);
        assert_eq!(
            first,
            PlotFileStats {
                healthy_count: 1,
                corrupted_count: 1
            }
        );
    }

    #[test]
    fn test_error_counter() {
        let mut registry = PlotFileRegistry::new();
        registry.increment_mining_log_error_count();
        registry.increment_mining_log_error_count();
        assert_eq!(registry.get_mining_log_error_count(), 2);

        registry.set_mining_log_error_count(10);
        assert_eq!(registry.get_mining_log_error_count(), 10);
    }

    #[test]
    fn test_report_keeps_first_seen_order() {
        let mut registry = PlotFileRegistry::new();
        registry.add_found_deadline("zeta", "1");
        registry.add_found_deadline("alpha", "2");
        registry.add_found_deadline("zeta", "3");
        registry.resolve_confirmed("2");

        let report = registry.report();
        let names: Vec<_> = report.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(report[0].pending_count, 2);
        assert_eq!(report[1].healthy_count, 1);
    }

    fn sample(names_and_hits: &[(&str, &str, bool)]) -> PlotFileRegistry {
        let mut registry = PlotFileRegistry::new();
        for (name, deadline, confirm) in names_and_hits {
            registry.add_found_deadline(name, deadline);
            if *confirm {
                registry.resolve_confirmed(deadline);
            }
        }
        registry
    }

    #[test]
    fn test_merge_sums_shared_stats() {
        let mut a = sample(&[("plotA", "1", true), ("plotB", "2", true)]);
        a.increment_unmatched_confirmation_count();
        let mut b = sample(&[("plotA", "3", true), ("plotA", "4", false), ("plotC", "5", true)]);
        b.increment_mining_log_error_count();

        let merged = PlotFileRegistry::merge(&a, &b);

        assert_eq!(merged.len(), 3);
        assert_eq!(stats_of(&merged, "plotA").healthy_count, 2);
        assert_eq!(pending_of(&merged, "plotA"), vec!["4"]);
        assert_eq!(merged.total_stats().total(), 4);
        assert_eq!(merged.get_mining_log_error_count(), 1);
        assert_eq!(merged.unmatched_confirmation_count(), 1);
        let names: Vec<_> = merged.report().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["plotA", "plotB", "plotC"]);
    }

    #[test]
    fn test_merge_is_commutative_and_associative_on_stats() {
        let a = sample(&[("plotA", "1", true), ("plotB", "2", false)]);
        let b = sample(&[("plotB", "3", true), ("plotA", "4", true)]);
        let c = sample(&[("plotC", "5", true), ("plotA", "6", true)]);

        let ab = PlotFileRegistry::merge(&a, &b);
        let ba = PlotFileRegistry::merge(&b, &a);
        let ab_c = PlotFileRegistry::merge(&ab, &c);
        let a_bc = PlotFileRegistry::merge(&a, &PlotFileRegistry::merge(&b, &c));

        for name in ["plotA", "plotB", "plotC"] {
            assert_eq!(stats_of(&ab, name), stats_of(&ba, name));
            assert_eq!(stats_of(&ab_c, name), stats_of(&a_bc, name));
        }
        assert_eq!(stats_of(&ab_c, "plotA").healthy_count, 3);
    }

    #[test]
    fn test_merge_orders_rhs_pending_after_lhs() {
        let lhs = sample(&[("plotL", "50", false)]);
        let rhs = sample(&[("plotR", "50", false)]);

        let mut merged = PlotFileRegistry::merge(&rhs, &lhs);
        assert_eq!(merged.find_plot_file_with_deadline("50"), Some("plotR"));

        merged.resolve_confirmed("50");
        assert_eq!(merged.find_plot_file_with_deadline("50"), Some("plotL"));
    }

    #[test]
    fn test_merge_keeps_history_consistent_with_stats() {
        let a = sample(&[("plotA", "1", true)]);
        let b = sample(&[("plotA", "2", true)]);

        let mut merged = PlotFileRegistry::merge(&a, &b);
        let before = stats_of(&merged, "plotA");
        merged.calculate_corrupted_count();

        assert_eq!(stats_of(&merged, "plotA"), before);
        assert_eq!(merged.get("plotA").unwrap().resolutions().len(), 2);
    }
}
