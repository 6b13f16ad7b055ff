//! Working-copy editing of the markup table.
//!
//! Cell edits land on a working copy; the calculator only sees the committed
//! table, which changes on [`RateTableEditor::apply`] or
//! [`RateTableEditor::reset`].

use rust_decimal::Decimal;
use tracing::debug;

use crate::RateTable;
use crate::input::parse_rate_edit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTableEditor {
    committed: RateTable,
    working: RateTable,
    baseline: RateTable,
}

impl RateTableEditor {
    /// Starts with `baseline` committed. [`reset`](Self::reset) returns here.
    pub fn new(baseline: RateTable) -> Self {
        Self {
            committed: baseline.clone(),
            working: baseline.clone(),
            baseline,
        }
    }

    /// Table the calculator reads.
    pub fn committed(&self) -> &RateTable {
        &self.committed
    }

    /// Table being edited.
    pub fn working(&self) -> &RateTable {
        &self.working
    }

    /// Whether the working copy has edits that were not applied.
    pub fn is_dirty(&self) -> bool {
        self.working != self.committed
    }

    /// Applies a textual cell edit to the working copy.
    ///
    /// Returns `false` when the text is not a number or the month is out of
    /// range; the previous value is kept in both cases.
    pub fn edit(
        &mut self,
        month: u32,
        text: &str,
    ) -> bool {
        match parse_rate_edit(text) {
            Some(value) => self.edit_value(month, value),
            None => {
                debug!(month, input = %text, "ignoring non-numeric rate edit");
                false
            }
        }
    }

    pub fn edit_value(
        &mut self,
        month: u32,
        rate_pct: Decimal,
    ) -> bool {
        let applied = self.working.set_rate(month, rate_pct);
        if !applied {
            debug!(month, "ignoring rate edit for unsupported month");
        }
        applied
    }

    /// Publishes the working copy.
    pub fn apply(&mut self) {
        debug!(dirty = self.is_dirty(), "applying rate table edits");
        self.committed = self.working.clone();
    }

    /// Replaces the committed table wholesale, dropping unapplied edits.
    /// The baseline is unchanged.
    pub fn replace(
        &mut self,
        table: RateTable,
    ) {
        self.working = table.clone();
        self.committed = table;
    }

    /// Drops unapplied edits.
    pub fn discard(&mut self) {
        self.working = self.committed.clone();
    }

    /// Restores the baseline table, committed and working alike.
    pub fn reset(&mut self) {
        debug!("resetting rate table to baseline");
        self.committed = self.baseline.clone();
        self.working = self.baseline.clone();
    }
}

impl Default for RateTableEditor {
    fn default() -> Self {
        Self::new(RateTable::standard())
    }
}
