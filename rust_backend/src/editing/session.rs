//! Edit session over the employee table.
//!
//! The session owns three row-sets: the rows of record (`rows`), the
//! snapshot taken when editing started (`baseline`) and the working copy
//! (`draft`). Every transition is a method on `&mut self`, so edits apply in
//! the order they are issued.
//!
//! ```text
//!            start_editing            request_save
//!  Viewing ───────────────▶ Editing ───────────────▶ ConfirmPending
//!     ▲                      │  ▲      close_confirm       │
//!     │   cancel_editing     │  └──────────────────────────┤
//!     ├──────────────────────┘                             │ confirm_save
//!     │              success                               ▼
//!     └───────────────────────────────────────────────── Saving
//!                                failure ─▶ ConfirmPending
//! ```

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use super::derived::{recompute, refresh_after_change};
use super::diff::{build_pending_changes, is_cell_changed, row_map_by_id, PendingChange};
use super::persistence::{RowSaver, SaveError, SaveReport};
use super::validation::CellValidator;
use crate::db::checksum::rows_checksum;
use crate::models::{ColumnDescriptor, ColumnKey, NormalizedRow, RecordId};
use crate::transformations::{is_blank_cell, normalize_display, normalize_rows};

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Viewing,
    Editing,
    ConfirmPending,
    Saving,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Viewing => "viewing",
            SessionState::Editing => "editing",
            SessionState::ConfirmPending => "confirm_pending",
            SessionState::Saving => "saving",
        };
        f.write_str(name)
    }
}

/// Error type for session transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: SessionState,
        action: &'static str,
    },

    #[error("A save is already in progress")]
    Busy,

    #[error("Column {0:?} is not editable")]
    NotEditable(ColumnKey),

    #[error("Unknown row {0}")]
    UnknownRow(RecordId),

    #[error("{0} cells have validation errors")]
    ValidationFailed(usize),

    #[error(transparent)]
    Persistence(#[from] SaveError),
}

/// Outcome of [`EditSession::request_save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestSave {
    /// Nothing changed; the session went back to viewing.
    NoChanges,
    /// Cells carry validation errors; the session stays in editing.
    Blocked { error_count: usize },
    /// Confirmation is needed for these changes.
    ConfirmRequired { changes: Vec<PendingChange> },
}

/// Editing session over one table.
pub struct EditSession {
    rows: Vec<NormalizedRow>,
    baseline: Vec<NormalizedRow>,
    baseline_checksum: String,
    draft: Vec<NormalizedRow>,
    columns: Vec<ColumnDescriptor>,
    state: SessionState,
    pending: Vec<PendingChange>,
    cell_errors: HashMap<RecordId, BTreeMap<ColumnKey, String>>,
    busy: bool,
    last_error: Option<String>,
    saver: Arc<dyn RowSaver>,
    validator: Arc<dyn CellValidator>,
    today: Option<NaiveDate>,
    client_options: Vec<String>,
}

impl EditSession {
    pub fn new(
        rows: Vec<NormalizedRow>,
        columns: &[ColumnDescriptor],
        saver: Arc<dyn RowSaver>,
        validator: Arc<dyn CellValidator>,
    ) -> Self {
        let baseline_checksum = rows_checksum(&rows);
        Self {
            draft: rows.clone(),
            baseline: rows.clone(),
            rows,
            baseline_checksum,
            columns: columns.to_vec(),
            state: SessionState::Viewing,
            pending: Vec::new(),
            cell_errors: HashMap::new(),
            busy: false,
            last_error: None,
            saver,
            validator,
            today: None,
            client_options: Vec::new(),
        }
    }

    /// Pin "today" for derived columns.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Replace the persistence collaborator, e.g. before retrying a save.
    pub fn set_saver(&mut self, saver: Arc<dyn RowSaver>) {
        self.saver = saver;
    }

    pub fn set_validator(&mut self, validator: Arc<dyn CellValidator>) {
        self.validator = validator;
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    // ==================== Accessors ====================

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the draft is being edited (confirming and saving included).
    pub fn is_editing(&self) -> bool {
        self.state != SessionState::Viewing
    }

    pub fn is_confirm_open(&self) -> bool {
        self.state == SessionState::ConfirmPending
    }

    /// True while a save is in flight.
    ///
    /// If the future returned by [`confirm_save`](Self::confirm_save) is
    /// dropped before it completes, the session stays busy.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Rows of record.
    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn draft(&self) -> &[NormalizedRow] {
        &self.draft
    }

    /// Snapshot taken when editing started.
    pub fn baseline(&self) -> &[NormalizedRow] {
        &self.baseline
    }

    pub fn pending_changes(&self) -> &[PendingChange] {
        &self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn cell_error(&self, row_id: &RecordId, column: ColumnKey) -> Option<&str> {
        self.cell_errors
            .get(row_id)
            .and_then(|errors| errors.get(&column))
            .map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.cell_errors.is_empty()
    }

    /// Number of cells carrying an error.
    pub fn error_count(&self) -> usize {
        self.cell_errors.values().map(BTreeMap::len).sum()
    }

    /// Whether a draft cell differs from the baseline, for highlighting.
    pub fn is_cell_dirty(&self, row_id: &RecordId, column: ColumnKey) -> bool {
        let Some(descriptor) = self.columns.iter().find(|c| c.key == column) else {
            return false;
        };
        let baseline = row_map_by_id(&self.baseline);
        match (self.draft.iter().find(|r| &r.id == row_id), baseline.get(row_id)) {
            (Some(draft), Some(original)) => is_cell_changed(draft, original, descriptor, normalize_display),
            _ => false,
        }
    }

    /// Client names offered for the client column.
    pub fn client_options(&self) -> &[String] {
        &self.client_options
    }

    pub fn set_client_options(&mut self, options: Vec<String>) {
        self.client_options = options;
    }

    /// Offer a new client name; blank and known names are ignored.
    pub fn add_client_option(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() && !self.client_options.iter().any(|c| c == name) {
            self.client_options.push(name.to_string());
        }
    }

    // ==================== Transitions ====================

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.busy {
            Err(SessionError::Busy)
        } else {
            Ok(())
        }
    }

    fn ensure_state(&self, expected: &[SessionState], action: &'static str) -> Result<(), SessionError> {
        self.ensure_idle()?;
        if expected.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    fn reset_draft(&mut self) {
        self.draft = self.rows.clone();
        self.cell_errors.clear();
        self.pending.clear();
    }

    /// Replace the rows of record.
    ///
    /// While viewing the draft follows the new rows. While editing the draft
    /// is left alone and a changed source is only logged.
    pub fn sync_source(&mut self, rows: Vec<NormalizedRow>) {
        if self.state == SessionState::Viewing {
            self.rows = rows;
            self.baseline = self.rows.clone();
            self.baseline_checksum = rows_checksum(&self.rows);
            self.reset_draft();
            return;
        }
        if rows_checksum(&rows) != self.baseline_checksum {
            warn!(
                "Source rows changed while editing ({} rows); the draft keeps the snapshot taken at start",
                rows.len()
            );
        }
        self.rows = rows;
    }

    /// `Viewing → Editing`.
    pub fn start_editing(&mut self) -> Result<(), SessionError> {
        self.ensure_state(&[SessionState::Viewing], "start editing")?;
        let today = self.today();

        self.baseline = self.rows.clone();
        self.baseline_checksum = rows_checksum(&self.baseline);
        self.draft = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                for column in &self.columns {
                    if column.key.is_editable() && is_blank_cell(row.cell_or_empty(column.key)) {
                        row.set_cell(column.key, "");
                    }
                }
                for column in &self.columns {
                    if column.key.is_derived() {
                        recompute(&mut row, column.key, today);
                    }
                }
                row
            })
            .collect();
        self.pending.clear();
        self.last_error = None;
        self.validate_all();
        self.state = SessionState::Editing;
        info!(
            "Started editing {} rows ({} cells with errors)",
            self.draft.len(),
            self.error_count()
        );
        Ok(())
    }

    /// Set one draft cell and refresh dependent cells and errors.
    pub fn change_cell(
        &mut self,
        row_id: &RecordId,
        column: ColumnKey,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.ensure_state(&[SessionState::Editing], "change a cell")?;
        if !column.is_editable() {
            return Err(SessionError::NotEditable(column));
        }
        let today = self.today();
        let index = self
            .draft
            .iter()
            .position(|r| &r.id == row_id)
            .ok_or_else(|| SessionError::UnknownRow(row_id.clone()))?;

        let row = &mut self.draft[index];
        row.set_cell(column, value.into());
        refresh_after_change(row, column, today);
        debug!("Changed cell {:?} of row {}", column, row_id);

        self.validate_cell(index, column);
        match column {
            ColumnKey::JoinDate => self.validate_cell(index, ColumnKey::RetireDate),
            ColumnKey::BirthDate => self.validate_cell(index, ColumnKey::JoinDate),
            _ => {}
        }
        Ok(())
    }

    /// `Editing | ConfirmPending → Viewing`, discarding the draft.
    pub fn cancel_editing(&mut self) -> Result<(), SessionError> {
        self.ensure_state(&[SessionState::Editing, SessionState::ConfirmPending], "cancel editing")?;
        self.reset_draft();
        self.state = SessionState::Viewing;
        info!("Cancelled editing");
        Ok(())
    }

    /// Diff the draft and decide whether confirmation is needed.
    pub fn request_save(&mut self) -> Result<RequestSave, SessionError> {
        self.ensure_state(&[SessionState::Editing], "request a save")?;
        let changes = build_pending_changes(&self.draft, &self.baseline, &self.columns, normalize_display);

        if changes.is_empty() {
            self.reset_draft();
            self.state = SessionState::Viewing;
            debug!("No changes to save");
            return Ok(RequestSave::NoChanges);
        }

        self.validate_all();
        if self.has_errors() {
            let error_count = self.error_count();
            warn!("Save blocked by {} cell errors", error_count);
            return Ok(RequestSave::Blocked { error_count });
        }

        self.pending = changes.clone();
        self.state = SessionState::ConfirmPending;
        Ok(RequestSave::ConfirmRequired { changes })
    }

    /// `ConfirmPending → Editing`, keeping the draft.
    pub fn close_confirm(&mut self) -> Result<(), SessionError> {
        self.ensure_state(&[SessionState::ConfirmPending], "close the confirmation")?;
        self.state = SessionState::Editing;
        Ok(())
    }

    /// Persist the confirmed draft.
    ///
    /// On success the draft is re-normalized into the rows of record and the
    /// session returns to viewing. On failure the session returns to
    /// `ConfirmPending` with draft and pending changes intact.
    pub async fn confirm_save(&mut self) -> Result<SaveReport, SessionError> {
        self.ensure_state(&[SessionState::ConfirmPending], "confirm a save")?;

        self.validate_all();
        if self.has_errors() {
            self.state = SessionState::Editing;
            return Err(SessionError::ValidationFailed(self.error_count()));
        }

        self.busy = true;
        self.state = SessionState::Saving;
        self.last_error = None;
        info!("Saving {} pending changes", self.pending.len());

        let saver = Arc::clone(&self.saver);
        let result = saver.save_rows(&self.draft, &self.baseline).await;
        self.busy = false;

        match result {
            Ok(report) => {
                self.merge_draft();
                self.state = SessionState::Viewing;
                info!("Saved {} rows", report.updated.len());
                Ok(report)
            }
            Err(e) => {
                warn!("Save failed: {}", e);
                self.last_error = Some(e.to_string());
                self.state = SessionState::ConfirmPending;
                Err(SessionError::Persistence(e))
            }
        }
    }

    fn merge_draft(&mut self) {
        let saved = normalize_rows(&self.draft, &self.columns);
        let saved_by_id: HashMap<&RecordId, &NormalizedRow> = saved.iter().map(|r| (&r.id, r)).collect();
        for row in &mut self.rows {
            if let Some(updated) = saved_by_id.get(&row.id) {
                *row = (*updated).clone();
            }
        }
        self.baseline = self.rows.clone();
        self.baseline_checksum = rows_checksum(&self.baseline);
        self.reset_draft();
    }

    // ==================== Validation ====================

    fn validate_cell(&mut self, index: usize, column: ColumnKey) {
        let row = &self.draft[index];
        let message = self
            .validator
            .validate(row, column, row.cell_or_empty(column));
        let id = row.id.clone();
        let errors = self.cell_errors.entry(id.clone()).or_default();
        match message {
            Some(message) => {
                errors.insert(column, message);
            }
            None => {
                errors.remove(&column);
            }
        }
        if errors.is_empty() {
            self.cell_errors.remove(&id);
        }
    }

    fn validate_all(&mut self) {
        self.cell_errors.clear();
        for row in &self.draft {
            let errors: BTreeMap<ColumnKey, String> = self
                .columns
                .iter()
                .filter(|c| c.key.is_editable())
                .filter_map(|c| {
                    self.validator
                        .validate(row, c.key, row.cell_or_empty(c.key))
                        .map(|message| (c.key, message))
                })
                .collect();
            if !errors.is_empty() {
                self.cell_errors.insert(row.id.clone(), errors);
            }
        }
    }
}
