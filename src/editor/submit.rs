use std::sync::Arc;

use serde_json::{Map, json};

use crate::{
    domain::{DestinationData, first_to_lower},
    form::{make_object_from_fields_values, shallow_merge},
    services::DESTINATIONS_COLLECTION,
};

use super::{
    coordinator::{DestinationEditor, EditorMode},
    events::{EditorEvent, Notification, Route},
    session::SubmitPhase,
    tabs::PanelKey,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one panel rejected; nothing was merged or persisted.
    ValidationFailed { panels: Vec<(PanelKey, usize)> },
    /// The draft could not be saved; in-memory edits are kept for a retry.
    Failed { phase: SubmitPhase, message: String },
    Saved { connection_ok: bool },
}

impl DestinationEditor {
    /// Validates every form panel, merges the results into the draft, links
    /// sources, runs the strict connectivity check and persists the
    /// destinations collection.
    ///
    /// A failed connectivity check or sources update never blocks the save.
    pub async fn submit(&mut self) -> SubmitOutcome {
        self.update_session(|session| {
            session.submitted_once = true;
            session.destination_saving = true;
            session.save_popover = false;
            session.save_error = None;
        });

        let outcome = self.run_submit().await;
        match &outcome {
            SubmitOutcome::Saved { connection_ok } => {
                tracing::info!(id = %self.draft.id, connection_ok, "destination saved");
            }
            SubmitOutcome::ValidationFailed { panels } => {
                tracing::info!(id = %self.draft.id, ?panels, "destination has invalid panels");
            }
            SubmitOutcome::Failed { phase, message } => {
                tracing::warn!(id = %self.draft.id, ?phase, %message, "destination save failed");
            }
        }

        self.update_session(|session| session.destination_saving = false);
        self.bump_revision();
        outcome
    }

    async fn run_submit(&mut self) -> SubmitOutcome {
        self.set_phase(SubmitPhase::Validating);
        // every panel records its own errors_count before the results are joined
        let results: Vec<_> = self
            .panels
            .iter_mut()
            .filter(|panel| panel.has_form())
            .map(|panel| (panel.key, panel.validate()))
            .collect();
        let failed: Vec<(PanelKey, usize)> = results
            .iter()
            .filter_map(|(key, result)| result.as_ref().err().map(|errors| (*key, errors.count())))
            .collect();
        if !failed.is_empty() {
            self.set_phase(SubmitPhase::ValidationFailed);
            self.update_session(|session| session.save_popover = true);
            return SubmitOutcome::ValidationFailed { panels: failed };
        }

        self.set_phase(SubmitPhase::Merging);
        let merged = results
            .into_iter()
            .filter_map(|(_, result)| result.ok())
            .fold(Map::new(), |acc, values| {
                shallow_merge(acc, make_object_from_fields_values(&values))
            });
        if let Err(err) = self.draft.merge_fields(merged) {
            return self.fail(SubmitPhase::Merging, err.to_string());
        }

        self.set_phase(SubmitPhase::LinkingSources);
        self.update_linked_sources().await;

        self.draft.mappings.normalize();

        self.set_phase(SubmitPhase::ConnectivityChecking);
        let connectivity = Arc::clone(&self.context.services.connectivity);
        let check = connectivity.test_connection(&self.draft, true).await;
        if !check.success {
            self.set_phase(SubmitPhase::ConnectivityFailed);
        }
        self.draft
            .record_connection_result(check.success, check.message);

        self.set_phase(SubmitPhase::Persisting);
        let destinations = self.destinations_payload();
        let payload = match serde_json::to_value(&destinations) {
            Ok(items) => json!({ DESTINATIONS_COLLECTION: items }),
            Err(err) => return self.fail(SubmitPhase::Persisting, err.to_string()),
        };
        let storage = Arc::clone(&self.context.services.storage);
        if let Err(err) = storage
            .save(DESTINATIONS_COLLECTION, &payload, &self.context.services.project_id)
            .await
        {
            return self.fail(SubmitPhase::PersistFailed, err.to_string());
        }

        self.set_phase(SubmitPhase::Reconciling);
        self.context.destinations.replace(destinations);
        if self.is_mounted() {
            for panel in &mut self.panels {
                panel.touched = false;
                panel.errors_count = None;
            }
        }
        let created = self.mode == EditorMode::Add;
        self.mode = EditorMode::Edit;

        let connection_ok = self.draft.connection_test_ok;
        if connection_ok {
            self.notify(Notification::success(if created {
                "New destination has been added!"
            } else {
                "Destination has been updated!"
            }));
        } else {
            let reason = self
                .draft
                .connection_error_message
                .as_deref()
                .map(first_to_lower)
                .unwrap_or_default();
            self.notify(Notification::closeable_warning(format!(
                "Destination has been saved, but test has failed with '{reason}'. Data will not be piped to this destination"
            )));
        }
        self.emit(EditorEvent::Navigate(Route::DestinationsRoot));
        self.set_phase(SubmitPhase::Saved);
        SubmitOutcome::Saved { connection_ok }
    }

    /// Best effort: the destination stays valid without the link, so a
    /// failure here is logged and otherwise ignored.
    async fn update_linked_sources(&mut self) {
        let sources = self.context.sources.snapshot();
        let linker = Arc::clone(&self.context.services.sources);
        match linker
            .update_sources(&sources, &self.draft, &self.context.services.project_id)
            .await
        {
            Ok(updated) => self.context.sources.replace(updated),
            Err(err) => {
                tracing::warn!(id = %self.draft.id, error = %err, "failed to update linked sources");
            }
        }
    }

    /// Create mode appends the draft; edit mode replaces the entry with the
    /// same `_uid` in place.
    fn destinations_payload(&self) -> Vec<DestinationData> {
        let current = self.context.destinations.snapshot();
        let matched = current.iter().any(|dst| dst.uid == self.draft.uid);
        if self.mode == EditorMode::Edit && matched {
            return current
                .iter()
                .map(|dst| {
                    if dst.uid == self.draft.uid {
                        self.draft.clone()
                    } else {
                        dst.clone()
                    }
                })
                .collect();
        }
        if self.mode == EditorMode::Edit {
            tracing::warn!(uid = %self.draft.uid, "edited destination is missing from the collection, appending it");
        }
        let mut destinations = current.to_vec();
        destinations.push(self.draft.clone());
        destinations
    }

    fn fail(&mut self, phase: SubmitPhase, message: String) -> SubmitOutcome {
        self.set_phase(phase);
        let summary = message.clone();
        self.update_session(|session| {
            session.save_popover = true;
            session.save_error = Some(summary);
        });
        SubmitOutcome::Failed { phase, message }
    }
}
