use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::pricing::{
    check_metric, normalize_cost_per_unit, normalize_free_units, normalize_units_per_cost,
    DraftField, FieldError, UsageComponentDraft, DEFAULT_COST_PER_UNIT, DEFAULT_FREE_UNITS,
    DEFAULT_UNITS_PER_COST,
};

pub type SubmitFn = Arc<dyn Fn(UsageComponentDraft) + Send + Sync>;
pub type CancelFn = Arc<dyn Fn() + Send + Sync>;

/// What the embedding page lends the editor: the metrics it may pick from
/// and where a finished or abandoned draft goes.
#[derive(Clone)]
pub struct EditorCapabilities {
    pub allowed_metrics: BTreeSet<String>,
    pub on_submit: SubmitFn,
    pub on_cancel: CancelFn,
}

impl EditorCapabilities {
    pub fn new<I, S>(
        allowed_metrics: I,
        on_submit: impl Fn(UsageComponentDraft) + Send + Sync + 'static,
        on_cancel: impl Fn() + Send + Sync + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_metrics: allowed_metrics.into_iter().map(Into::into).collect(),
            on_submit: Arc::new(on_submit),
            on_cancel: Arc::new(on_cancel),
        }
    }
}

/// Field values while the editor is open.
#[derive(Clone, Debug, PartialEq)]
pub struct DraftForm {
    pub metric: Option<String>,
    pub cost_per_unit: f64,
    pub units_per_cost: f64,
    pub free_units: f64,
}

impl Default for DraftForm {
    fn default() -> Self {
        Self {
            metric: None,
            cost_per_unit: DEFAULT_COST_PER_UNIT,
            units_per_cost: DEFAULT_UNITS_PER_COST,
            free_units: DEFAULT_FREE_UNITS,
        }
    }
}

impl DraftForm {
    pub fn validate(
        &self,
        allowed_metrics: &BTreeSet<String>,
    ) -> Result<UsageComponentDraft, Vec<FieldError>> {
        if let Some(error) = check_metric(self.metric.as_deref(), allowed_metrics) {
            return Err(vec![error]);
        }
        Ok(UsageComponentDraft {
            metric: self.metric.clone().unwrap_or_default(),
            cost_per_unit: self.cost_per_unit,
            units_per_cost: self.units_per_cost,
            free_units: self.free_units,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfirmOutcome {
    /// Draft handed to `on_submit`; the editor is closed again.
    Submitted(UsageComponentDraft),
    /// Validation failed; the editor stays open with field errors.
    Invalid(Vec<FieldError>),
    /// Confirm while closed does nothing.
    Ignored,
}

/// State machine behind the "add usage component" dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UsageComponentEditor {
    state: EditorState,
    form: DraftForm,
    errors: Vec<FieldError>,
}

impl UsageComponentEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == EditorState::Open
    }

    pub fn form(&self) -> &DraftForm {
        &self.form
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: DraftField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Starts a fresh draft. Reopening an open editor keeps its draft.
    pub fn open(&mut self) {
        if self.state == EditorState::Open {
            return;
        }
        self.state = EditorState::Open;
        self.form = DraftForm::default();
        self.errors.clear();
    }

    /// Closed from outside (visibility flag dropped). Discards the draft
    /// without calling back.
    pub fn close(&mut self) {
        self.state = EditorState::Closed;
        self.form = DraftForm::default();
        self.errors.clear();
    }

    pub fn select_metric(&mut self, metric: impl Into<String>) {
        let metric = metric.into();
        self.form.metric = if metric.is_empty() { None } else { Some(metric) };
        self.errors.retain(|e| e.field != DraftField::Metric);
    }

    pub fn set_cost_per_unit(&mut self, value: Option<f64>) {
        self.form.cost_per_unit = normalize_cost_per_unit(value);
    }

    pub fn set_units_per_cost(&mut self, value: Option<f64>) {
        self.form.units_per_cost = normalize_units_per_cost(value);
    }

    pub fn set_free_units(&mut self, value: Option<f64>) {
        self.form.free_units = normalize_free_units(value);
    }

    pub fn confirm(&mut self, capabilities: &EditorCapabilities) -> ConfirmOutcome {
        if self.state != EditorState::Open {
            return ConfirmOutcome::Ignored;
        }

        match self.form.validate(&capabilities.allowed_metrics) {
            Ok(draft) => {
                (capabilities.on_submit)(draft.clone());
                self.close();
                ConfirmOutcome::Submitted(draft)
            }
            Err(errors) => {
                debug!(?errors, "usage component validation failed");
                self.errors = errors.clone();
                ConfirmOutcome::Invalid(errors)
            }
        }
    }

    pub fn cancel(&mut self, capabilities: &EditorCapabilities) {
        if self.state != EditorState::Open {
            return;
        }
        (capabilities.on_cancel)();
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    struct Recorder {
        submitted: Arc<Mutex<Vec<UsageComponentDraft>>>,
        cancels: Arc<AtomicUsize>,
        capabilities: EditorCapabilities,
    }

    fn recorder() -> Recorder {
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let cancels = Arc::new(AtomicUsize::new(0));
        let submitted_sink = submitted.clone();
        let cancel_sink = cancels.clone();
        let capabilities = EditorCapabilities::new(
            ["api_calls", "storage_gb"],
            move |draft| submitted_sink.lock().unwrap().push(draft),
            move || {
                cancel_sink.fetch_add(1, Ordering::SeqCst);
            },
        );
        Recorder {
            submitted,
            cancels,
            capabilities,
        }
    }

    #[test]
    fn test_confirm_without_metric_stays_open() {
        let rec = recorder();
        let mut editor = UsageComponentEditor::new();
        editor.open();

        let outcome = editor.confirm(&rec.capabilities);

        assert!(matches!(outcome, ConfirmOutcome::Invalid(_)));
        assert!(editor.is_open());
        assert_eq!(
            editor.error_for(DraftField::Metric),
            Some("Please select a metric")
        );
        assert!(rec.submitted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_confirm_with_defaults_submits() {
        let rec = recorder();
        let mut editor = UsageComponentEditor::new();
        editor.open();
        editor.select_metric("api_calls");

        let outcome = editor.confirm(&rec.capabilities);

        let expected = UsageComponentDraft {
            metric: "api_calls".into(),
            cost_per_unit: 0.0,
            units_per_cost: 1.0,
            free_units: 0.0,
        };
        assert_eq!(outcome, ConfirmOutcome::Submitted(expected.clone()));
        assert_eq!(*rec.submitted.lock().unwrap(), vec![expected]);
        assert_eq!(editor.state(), EditorState::Closed);
    }

    #[test]
    fn test_metric_outside_allowed_list_rejected() {
        let rec = recorder();
        let mut editor = UsageComponentEditor::new();
        editor.open();
        editor.select_metric("gpu_hours");

        assert!(matches!(
            editor.confirm(&rec.capabilities),
            ConfirmOutcome::Invalid(_)
        ));
        assert!(rec.submitted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_selecting_metric_clears_error() {
        let rec = recorder();
        let mut editor = UsageComponentEditor::new();
        editor.open();
        editor.confirm(&rec.capabilities);
        assert!(!editor.errors().is_empty());

        editor.select_metric("storage_gb");
        assert!(editor.errors().is_empty());
    }

    #[test]
    fn test_numeric_fields_are_normalized() {
        let rec = recorder();
        let mut editor = UsageComponentEditor::new();
        editor.open();
        editor.select_metric("storage_gb");
        editor.set_cost_per_unit(Some(0.123456));
        editor.set_units_per_cost(None);
        editor.set_free_units(Some(100.0));

        match editor.confirm(&rec.capabilities) {
            ConfirmOutcome::Submitted(draft) => {
                assert_eq!(draft.cost_per_unit, 0.1235);
                assert_eq!(draft.units_per_cost, 1.0);
                assert_eq!(draft.free_units, 100.0);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_cancel_discards_draft() {
        let rec = recorder();
        let mut editor = UsageComponentEditor::new();
        editor.open();
        editor.select_metric("api_calls");
        editor.set_free_units(Some(5.0));

        editor.cancel(&rec.capabilities);

        assert_eq!(rec.cancels.load(Ordering::SeqCst), 1);
        assert!(rec.submitted.lock().unwrap().is_empty());
        assert_eq!(editor.state(), EditorState::Closed);

        editor.open();
        assert_eq!(*editor.form(), DraftForm::default());
    }

    #[test]
    fn test_closed_editor_ignores_confirm_and_cancel() {
        let rec = recorder();
        let mut editor = UsageComponentEditor::new();

        assert_eq!(editor.confirm(&rec.capabilities), ConfirmOutcome::Ignored);
        editor.cancel(&rec.capabilities);

        assert_eq!(rec.cancels.load(Ordering::SeqCst), 0);
        assert!(rec.submitted.lock().unwrap().is_empty());
    }
}
