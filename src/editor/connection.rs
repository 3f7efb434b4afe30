use std::sync::Arc;

use serde_json::Value;

use crate::form::make_object_from_fields_values;

use super::{coordinator::DestinationEditor, events::Notification, tabs::PanelKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestConnectionOutcome {
    /// Connection properties did not validate; nothing was probed.
    InvalidProperties { errors: usize },
    Failed { message: String },
    Connected,
}

impl DestinationEditor {
    /// Validates the connection properties, folds them into the draft and
    /// runs a soft connectivity probe. The probe's result only drives
    /// notifications; the draft's stored check result is left alone.
    pub async fn test_connection(&mut self) -> TestConnectionOutcome {
        self.update_session(|session| {
            session.test_connecting = true;
            session.test_connecting_popover = false;
        });

        let outcome = self.run_test_connection().await;

        self.update_session(|session| session.test_connecting = false);
        self.bump_revision();
        outcome
    }

    async fn run_test_connection(&mut self) -> TestConnectionOutcome {
        let values = match self.validate_panel(PanelKey::Config) {
            Ok(values) => values,
            Err(errors) => {
                tracing::debug!(errors = errors.count(), "connection properties are invalid");
                self.update_session(|session| session.test_connecting_popover = true);
                return TestConnectionOutcome::InvalidProperties {
                    errors: errors.count(),
                };
            }
        };

        let mut nested = make_object_from_fields_values(&values);
        self.draft.form_data = match nested.remove("_formData") {
            Some(Value::Object(form_data)) => form_data,
            _ => Default::default(),
        };

        let connectivity = Arc::clone(&self.context.services.connectivity);
        let result = connectivity.test_connection(&self.draft, false).await;
        if result.success {
            tracing::info!(id = %self.draft.id, "connection test passed");
            self.notify(Notification::success("Successfully connected!"));
            TestConnectionOutcome::Connected
        } else {
            let message = result
                .message
                .unwrap_or_else(|| crate::domain::DEFAULT_CONNECTION_ERROR.to_string());
            tracing::info!(id = %self.draft.id, %message, "connection test failed");
            self.notify(Notification::error(format!(
                "Unable to test connection with filled data: {message}"
            )));
            TestConnectionOutcome::Failed { message }
        }
    }
}
