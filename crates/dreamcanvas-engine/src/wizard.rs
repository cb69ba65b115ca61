use anyhow::Result;
use dreamcanvas_contracts::events::{EventPayload, EventWriter};
use dreamcanvas_contracts::wizard::{
    ConfigUpdate, ImageConfig, Locale, Messages, Step, WizardAction,
};
use serde_json::{json, Value};

use crate::compiler::{compile_request, extract_image, GeneratedImage, GenerationRequest, GenerationResponse};
use crate::error::WizardError;
use crate::keys::{ApiKey, ApiKeySource};
use crate::providers::ImageProvider;

/// A generation the wizard has committed to. Hand the request and key to
/// the provider once, then report back through [`Wizard::complete_generation`].
#[derive(Debug, Clone)]
pub struct PendingGeneration {
    pub id: u64,
    pub request: GenerationRequest,
    pub key: ApiKey,
}

#[derive(Debug, Clone)]
pub enum Advance {
    Moved(Step),
    Generate(PendingGeneration),
}

#[derive(Debug, Clone)]
struct InFlight {
    id: u64,
    prompt: String,
}

/// Owns the configuration, the current step and the last result.
///
/// Every mutation goes through a method here; the step only changes along
/// the transition table in `dreamcanvas_contracts::wizard::TRANSITIONS`.
pub struct Wizard {
    step: Step,
    config: ImageConfig,
    generated: Option<GeneratedImage>,
    error: Option<String>,
    locale: Locale,
    keys: Box<dyn ApiKeySource>,
    events: Option<EventWriter>,
    in_flight: Option<InFlight>,
    generation_count: u64,
}

impl Wizard {
    pub fn new(keys: Box<dyn ApiKeySource>) -> Self {
        Self {
            step: Step::default(),
            config: ImageConfig::default(),
            generated: None,
            error: None,
            locale: Locale::default(),
            keys,
            events: None,
            in_flight: None,
            generation_count: 0,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_events(mut self, events: EventWriter) -> Self {
        self.events = Some(events);
        self.emit(
            "session_started",
            json!({ "step": self.step.as_str(), "has_key": self.keys.has_selected_key() }),
        );
        self
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    pub fn generated_image(&self) -> Option<&GeneratedImage> {
        self.generated.as_ref()
    }

    /// Localized message for the last failed action, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn messages(&self) -> &'static Messages {
        self.locale.messages()
    }

    pub fn events(&self) -> Option<&EventWriter> {
        self.events.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.step == Step::Generating
    }

    pub fn has_key(&self) -> bool {
        self.keys.has_selected_key()
    }

    /// Asks the key capability for a key and trusts only its answer.
    pub fn select_key(&mut self) -> Result<(), WizardError> {
        let outcome = self.keys.select_key();
        let selected = outcome.is_ok() && self.keys.has_selected_key();
        let mut payload = json!({ "selected": selected });
        if let Err(err) = &outcome {
            payload["error"] = Value::String(format!("{err:#}"));
        }
        self.emit("key_selected", payload);

        if selected {
            self.error = None;
            Ok(())
        } else {
            self.error = Some(self.messages().key_required.to_string());
            Err(WizardError::MissingCredential)
        }
    }

    pub fn update(&mut self, update: ConfigUpdate) -> Result<(), WizardError> {
        if !self.step.accepts_edits() {
            return Err(WizardError::Busy);
        }
        if update.is_empty() {
            return Ok(());
        }
        let fields = update.touched_fields();
        self.config = self.config.merged(update);
        self.emit("config_updated", json!({ "fields": fields }));
        Ok(())
    }

    /// Moves forward. On the prompt step this validates, checks the key and
    /// starts exactly one generation.
    pub fn next(&mut self) -> Result<Advance, WizardError> {
        if self.step != Step::EnteringPrompt {
            return self.transition(WizardAction::Next).map(Advance::Moved);
        }

        self.error = None;
        if !self.config.has_prompt() {
            let message = self.messages().prompt_required.to_string();
            self.error = Some(message.clone());
            self.emit("validation_failed", json!({ "field": "prompt" }));
            return Err(WizardError::Validation { message });
        }

        let key = self
            .keys
            .has_selected_key()
            .then(|| self.keys.selected_key())
            .flatten();
        let Some(key) = key else {
            self.error = Some(self.messages().key_required.to_string());
            self.emit("generation_blocked", json!({ "reason": "missing_key" }));
            return Err(WizardError::MissingCredential);
        };

        let request = compile_request(&self.config);
        self.transition(WizardAction::Next)?;
        self.generated = None;
        self.generation_count += 1;
        let id = self.generation_count;
        self.in_flight = Some(InFlight {
            id,
            prompt: request.prompt.clone(),
        });
        self.emit(
            "generation_started",
            json!({
                "generation_id": id,
                "fingerprint": request.fingerprint(),
                "aspect_ratio": request.aspect_ratio.as_str(),
                "style": self.config.style.display_name(),
                "has_reference_image": request.inline_parts().next().is_some(),
            }),
        );
        Ok(Advance::Generate(PendingGeneration { id, request, key }))
    }

    /// Applies the provider outcome for generation `id`.
    ///
    /// Failures of any kind send the wizard back to the prompt step with the
    /// generic error message set.
    pub fn complete_generation(
        &mut self,
        id: u64,
        outcome: Result<GenerationResponse>,
    ) -> Result<&GeneratedImage, WizardError> {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) if in_flight.id == id && self.step == Step::Generating => in_flight,
            other => {
                self.in_flight = other;
                return Err(WizardError::UnknownGeneration(id));
            }
        };

        let result = outcome
            .map_err(|err| format!("{err:#}"))
            .and_then(|response| {
                extract_image(&response, &in_flight.prompt).map_err(|err| err.to_string())
            });

        match result {
            Ok(image) => {
                self.transition(WizardAction::GenerationSucceeded)?;
                self.emit(
                    "generation_succeeded",
                    json!({ "generation_id": id, "mime_type": image.mime_type() }),
                );
                Ok(&*self.generated.insert(image))
            }
            Err(detail) => {
                self.generated = None;
                self.error = Some(self.messages().generation_failed.to_string());
                self.transition(WizardAction::GenerationFailed)?;
                self.emit(
                    "generation_failed",
                    json!({ "generation_id": id, "error": detail }),
                );
                Err(WizardError::Generation(detail))
            }
        }
    }

    /// `next` from the prompt step plus a single blocking provider call.
    pub fn submit(&mut self, provider: &dyn ImageProvider) -> Result<&GeneratedImage, WizardError> {
        if self.step != Step::EnteringPrompt {
            return Err(WizardError::InvalidTransition {
                action: WizardAction::Next,
                step: self.step,
            });
        }
        let pending = match self.next()? {
            Advance::Generate(pending) => pending,
            Advance::Moved(step) => {
                return Err(WizardError::InvalidTransition {
                    action: WizardAction::Next,
                    step,
                })
            }
        };
        let outcome = provider.generate(&pending.request, &pending.key);
        self.complete_generation(pending.id, outcome)
    }

    pub fn back(&mut self) -> Result<Step, WizardError> {
        let from = self.step;
        let to = self.transition(WizardAction::Back)?;
        if from == Step::ShowingResult {
            self.generated = None;
        }
        Ok(to)
    }

    pub fn reset(&mut self) -> Result<Step, WizardError> {
        let to = self.transition(WizardAction::Reset)?;
        self.generated = None;
        self.config = ImageConfig::default();
        self.error = None;
        self.emit("wizard_reset", json!({}));
        Ok(to)
    }

    fn transition(&mut self, action: WizardAction) -> Result<Step, WizardError> {
        let from = self.step;
        let to = from
            .apply(action)
            .ok_or(WizardError::InvalidTransition { action, step: from })?;
        self.step = to;
        self.emit(
            "step_changed",
            json!({ "action": action.as_str(), "from": from.as_str(), "to": to.as_str() }),
        );
        Ok(to)
    }

    fn emit(&self, event_type: &str, payload: Value) {
        let Some(events) = self.events.as_ref() else {
            return;
        };
        let payload: EventPayload = match payload {
            Value::Object(map) => map,
            _ => EventPayload::new(),
        };
        // The log is best effort; wizard state never depends on it.
        let _ = events.emit(event_type, payload);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use anyhow::bail;
    use dreamcanvas_contracts::wizard::{ArtStyle, AspectRatio, DataUri};

    use super::*;
    use crate::compiler::{InlineData, ResponsePart};
    use crate::keys::StaticKeySource;
    use crate::providers::DryrunProvider;

    #[derive(Clone, Copy)]
    enum Script {
        Image,
        TextOnly,
        Fail,
    }

    struct ScriptedProvider {
        script: Script,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(script: Script) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ImageProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn generate(&self, _request: &GenerationRequest, _key: &ApiKey) -> Result<GenerationResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script {
                Script::Image => Ok(GenerationResponse {
                    parts: vec![ResponsePart {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: "image/png".to_string(),
                            data: "iVBORw==".to_string(),
                        }),
                    }],
                }),
                Script::TextOnly => Ok(GenerationResponse {
                    parts: vec![ResponsePart {
                        text: Some("no".to_string()),
                        inline_data: None,
                    }],
                }),
                Script::Fail => bail!("quota exceeded"),
            }
        }
    }

    /// Key source whose availability can be flipped from the test.
    struct SharedKeySource {
        present: Arc<AtomicUsize>,
    }

    impl ApiKeySource for SharedKeySource {
        fn has_selected_key(&self) -> bool {
            self.present.load(Ordering::SeqCst) > 0
        }

        fn select_key(&mut self) -> Result<()> {
            // Selection "succeeds" but never actually provides a key.
            Ok(())
        }

        fn selected_key(&self) -> Option<ApiKey> {
            self.has_selected_key().then(|| ApiKey::new("shared")).flatten()
        }
    }

    fn keyed_wizard() -> Wizard {
        Wizard::new(Box::new(StaticKeySource::new("test-key")))
    }

    fn at_prompt(prompt: &str) -> Wizard {
        let mut wizard = keyed_wizard();
        for _ in 0..3 {
            wizard.next().unwrap();
        }
        wizard.update(ConfigUpdate::new().prompt(prompt)).unwrap();
        assert_eq!(wizard.step(), Step::EnteringPrompt);
        wizard
    }

    fn at_result() -> Wizard {
        let mut wizard = at_prompt("a flying cat");
        let provider = ScriptedProvider::new(Script::Image);
        wizard.submit(&provider).unwrap();
        assert_eq!(wizard.step(), Step::ShowingResult);
        wizard
    }

    #[test]
    fn walks_forward_through_selection_steps() {
        let mut wizard = keyed_wizard();
        assert_eq!(wizard.step(), Step::SelectingAspect);
        assert!(matches!(wizard.next(), Ok(Advance::Moved(Step::SelectingStyle))));
        assert!(matches!(wizard.next(), Ok(Advance::Moved(Step::SelectingColor))));
        assert!(matches!(wizard.next(), Ok(Advance::Moved(Step::EnteringPrompt))));
    }

    #[test]
    fn valid_prompt_enters_generating_once() {
        let mut wizard = at_prompt("a flying cat");
        let pending = match wizard.next() {
            Ok(Advance::Generate(pending)) => pending,
            other => panic!("expected generation, got {other:?}"),
        };
        assert_eq!(wizard.step(), Step::Generating);
        assert!(wizard.is_generating());
        assert_eq!(pending.id, 1);
        assert_eq!(pending.request.prompt, "a flying cat");
        assert_eq!(pending.key.expose(), "test-key");

        assert_eq!(
            wizard.next().unwrap_err(),
            WizardError::InvalidTransition {
                action: WizardAction::Next,
                step: Step::Generating
            }
        );
        assert_eq!(wizard.back().unwrap_err().to_string(), "cannot back from step 'generating'");
        assert_eq!(wizard.update(ConfigUpdate::new().prompt("x")), Err(WizardError::Busy));
        assert_eq!(wizard.step(), Step::Generating);
    }

    #[test]
    fn submit_invokes_provider_exactly_once() {
        let mut wizard = at_prompt("a flying cat");
        let provider = ScriptedProvider::new(Script::Image);
        let image = wizard.submit(&provider).unwrap().clone();
        assert_eq!(provider.calls(), 1);
        assert_eq!(image.prompt, "a flying cat");
        assert_eq!(image.data_uri.to_string(), "data:image/png;base64,iVBORw==");
        assert_eq!(wizard.step(), Step::ShowingResult);
        assert_eq!(wizard.generated_image(), Some(&image));

        assert!(wizard.submit(&provider).is_err());
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn blank_prompt_never_leaves_prompt_step() {
        for prompt in ["", "   ", "\n\t"] {
            let mut wizard = at_prompt(prompt);
            let provider = ScriptedProvider::new(Script::Image);
            let err = wizard.submit(&provider).unwrap_err();
            assert_eq!(
                err,
                WizardError::Validation {
                    message: "Please describe the image you want.".to_string()
                }
            );
            assert_eq!(wizard.step(), Step::EnteringPrompt);
            assert_eq!(wizard.error(), Some("Please describe the image you want."));
            assert_eq!(provider.calls(), 0);
        }
    }

    #[test]
    fn validation_message_follows_locale() {
        let mut wizard = Wizard::new(Box::new(StaticKeySource::new("k"))).with_locale(Locale::Persian);
        for _ in 0..3 {
            wizard.next().unwrap();
        }
        assert!(wizard.next().is_err());
        assert_eq!(wizard.error(), Some("لطفا توضیحات تصویر را وارد کنید"));
    }

    #[test]
    fn missing_key_blocks_generation_distinctly() {
        let mut wizard = Wizard::new(Box::new(StaticKeySource::empty()));
        for _ in 0..3 {
            wizard.next().unwrap();
        }
        wizard.update(ConfigUpdate::new().prompt("cat")).unwrap();
        let provider = ScriptedProvider::new(Script::Image);
        assert_eq!(wizard.submit(&provider).unwrap_err(), WizardError::MissingCredential);
        assert_eq!(wizard.step(), Step::EnteringPrompt);
        assert_eq!(wizard.error(), Some("Select an API key before generating."));
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn key_is_reverified_before_each_generation() {
        let present = Arc::new(AtomicUsize::new(1));
        let mut wizard = Wizard::new(Box::new(SharedKeySource {
            present: Arc::clone(&present),
        }));
        for _ in 0..3 {
            wizard.next().unwrap();
        }
        wizard.update(ConfigUpdate::new().prompt("cat")).unwrap();
        let provider = ScriptedProvider::new(Script::Image);
        wizard.submit(&provider).unwrap();
        wizard.back().unwrap();

        present.store(0, Ordering::SeqCst);
        assert_eq!(wizard.submit(&provider).unwrap_err(), WizardError::MissingCredential);
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn optimistic_key_selection_is_not_trusted() {
        let present = Arc::new(AtomicUsize::new(0));
        let mut wizard = Wizard::new(Box::new(SharedKeySource { present }));
        assert_eq!(wizard.select_key(), Err(WizardError::MissingCredential));
        assert!(!wizard.has_key());

        let mut keyed = keyed_wizard();
        assert_eq!(keyed.select_key(), Ok(()));
    }

    #[test]
    fn provider_failure_returns_to_prompt_with_generic_message() {
        let mut wizard = at_prompt("a flying cat");
        let provider = ScriptedProvider::new(Script::Fail);
        let err = wizard.submit(&provider).unwrap_err();
        assert_eq!(err, WizardError::Generation("quota exceeded".to_string()));
        assert_eq!(wizard.step(), Step::EnteringPrompt);
        assert!(wizard.generated_image().is_none());
        assert_eq!(
            wizard.error(),
            Some("Something went wrong while generating the image. Please try again.")
        );
    }

    #[test]
    fn response_without_image_is_generation_failure() {
        let mut wizard = at_prompt("a flying cat");
        let provider = ScriptedProvider::new(Script::TextOnly);
        let err = wizard.submit(&provider).unwrap_err();
        assert_eq!(err, WizardError::Generation("no image produced".to_string()));
        assert_eq!(wizard.step(), Step::EnteringPrompt);
    }

    #[test]
    fn error_clears_on_next_submission() {
        let mut wizard = at_prompt("a flying cat");
        let failing = ScriptedProvider::new(Script::Fail);
        assert!(wizard.submit(&failing).is_err());
        assert!(wizard.error().is_some());

        let pending = match wizard.next() {
            Ok(Advance::Generate(pending)) => pending,
            other => panic!("expected generation, got {other:?}"),
        };
        assert_eq!(wizard.error(), None);
        assert_eq!(pending.id, 2);
    }

    #[test]
    fn completion_requires_matching_in_flight_id() {
        let mut wizard = at_prompt("a flying cat");
        assert_eq!(
            wizard.complete_generation(1, Ok(GenerationResponse::default())).unwrap_err(),
            WizardError::UnknownGeneration(1)
        );

        let pending = match wizard.next() {
            Ok(Advance::Generate(pending)) => pending,
            other => panic!("expected generation, got {other:?}"),
        };
        assert_eq!(
            wizard
                .complete_generation(pending.id + 1, Ok(GenerationResponse::default()))
                .unwrap_err(),
            WizardError::UnknownGeneration(pending.id + 1)
        );
        assert_eq!(wizard.step(), Step::Generating);

        let response = DryrunProvider.generate(&pending.request, &pending.key).unwrap();
        wizard.complete_generation(pending.id, Ok(response)).unwrap();
        assert_eq!(wizard.step(), Step::ShowingResult);
        assert!(wizard.complete_generation(pending.id, Ok(GenerationResponse::default())).is_err());
    }

    #[test]
    fn back_from_result_discards_image() {
        let mut wizard = at_result();
        assert!(wizard.generated_image().is_some());
        assert_eq!(wizard.back(), Ok(Step::EnteringPrompt));
        assert!(wizard.generated_image().is_none());
        assert_eq!(wizard.config().prompt, "a flying cat");
    }

    #[test]
    fn back_walks_to_first_step_and_stops() {
        let mut wizard = at_prompt("x");
        assert_eq!(wizard.back(), Ok(Step::SelectingColor));
        assert_eq!(wizard.back(), Ok(Step::SelectingStyle));
        assert_eq!(wizard.back(), Ok(Step::SelectingAspect));
        assert!(matches!(
            wizard.back(),
            Err(WizardError::InvalidTransition {
                action: WizardAction::Back,
                step: Step::SelectingAspect
            })
        ));
        assert_eq!(wizard.step(), Step::SelectingAspect);
    }

    #[test]
    fn reset_restores_defaults_only_from_result() {
        let mut wizard = keyed_wizard();
        assert!(wizard.reset().is_err());

        let mut wizard = at_prompt("a flying cat");
        wizard
            .update(
                ConfigUpdate::new()
                    .aspect_ratio(AspectRatio::Tall)
                    .style(ArtStyle::Fantasy)
                    .primary_color(Some("pink"))
                    .gradient(true)
                    .remove_background(true)
                    .reference_image(DataUri::parse("data:image/png;base64,iVBORw==").ok()),
            )
            .unwrap();
        wizard.submit(&ScriptedProvider::new(Script::Image)).unwrap();

        assert_eq!(wizard.reset(), Ok(Step::SelectingAspect));
        assert_eq!(wizard.config(), &ImageConfig::default());
        assert!(wizard.generated_image().is_none());
        assert!(wizard.error().is_none());
    }

    fn event_types(events: &EventWriter) -> anyhow::Result<Vec<String>> {
        Ok(events
            .read_all()?
            .iter()
            .filter_map(|event| event["type"].as_str().map(str::to_string))
            .collect())
    }

    fn logged_wizard(keys: Box<dyn ApiKeySource>, events: &EventWriter, prompt: &str) -> Wizard {
        let mut wizard = Wizard::new(keys).with_events(events.clone());
        for _ in 0..3 {
            wizard.next().unwrap();
        }
        wizard.update(ConfigUpdate::new().prompt(prompt)).unwrap();
        wizard
    }

    #[test]
    fn unwritable_event_log_does_not_change_outcomes() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        // A directory cannot be opened for appending, so every emit fails.
        let events = EventWriter::new(temp.path(), "session-broken");
        assert!(events.emit("write_check", EventPayload::new()).is_err());

        let mut wizard = logged_wizard(Box::new(StaticKeySource::new("k")), &events, "a flying cat");
        assert_eq!(wizard.step(), Step::EnteringPrompt);
        let provider = ScriptedProvider::new(Script::Image);
        let image = wizard.submit(&provider)?.clone();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(wizard.step(), Step::ShowingResult);
        assert_eq!(provider.calls(), 1);

        assert_eq!(wizard.back(), Ok(Step::EnteringPrompt));
        let failing = ScriptedProvider::new(Script::Fail);
        assert!(matches!(wizard.submit(&failing), Err(WizardError::Generation(_))));
        assert_eq!(wizard.step(), Step::EnteringPrompt);
        Ok(())
    }

    #[test]
    fn blank_prompt_logs_validation_failure_only() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let events = EventWriter::new(temp.path().join("events.jsonl"), "session-blank");
        let mut wizard = logged_wizard(Box::new(StaticKeySource::new("k")), &events, "  ");
        assert!(wizard.submit(&ScriptedProvider::new(Script::Image)).is_err());

        let types = event_types(&events)?;
        assert_eq!(types.last().map(String::as_str), Some("validation_failed"));
        assert!(!types.iter().any(|kind| kind == "generation_started"));
        Ok(())
    }

    #[test]
    fn missing_key_logs_blocked_generation_and_failed_selection() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let events = EventWriter::new(temp.path().join("events.jsonl"), "session-nokey");
        let mut wizard = logged_wizard(Box::new(StaticKeySource::empty()), &events, "cat");
        assert!(wizard.submit(&ScriptedProvider::new(Script::Image)).is_err());
        assert!(wizard.select_key().is_err());

        let logged = events.read_all()?;
        let tail: Vec<&str> = logged
            .iter()
            .rev()
            .take(2)
            .filter_map(|event| event["type"].as_str())
            .collect();
        assert_eq!(tail, vec!["key_selected", "generation_blocked"]);
        let selection = &logged[logged.len() - 1];
        assert_eq!(selection["selected"], json!(false));
        assert_eq!(selection["error"], json!("no API key configured"));
        assert_eq!(logged[logged.len() - 2]["reason"], json!("missing_key"));
        Ok(())
    }

    #[test]
    fn provider_failure_logs_started_then_failed() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let events = EventWriter::new(temp.path().join("events.jsonl"), "session-fail");
        let mut wizard = logged_wizard(Box::new(StaticKeySource::new("k")), &events, "cat");
        assert!(wizard.submit(&ScriptedProvider::new(Script::Fail)).is_err());

        let logged = events.read_all()?;
        let tail: Vec<&str> = logged
            .iter()
            .skip(logged.len().saturating_sub(4))
            .filter_map(|event| event["type"].as_str())
            .collect();
        assert_eq!(
            tail,
            vec!["step_changed", "generation_started", "step_changed", "generation_failed"]
        );
        let failed = &logged[logged.len() - 1];
        assert_eq!(failed["generation_id"], json!(1));
        assert_eq!(failed["error"], json!("quota exceeded"));
        assert_eq!(logged[logged.len() - 2]["to"], json!("entering-prompt"));
        Ok(())
    }

    #[test]
    fn events_trace_a_full_session() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let events = EventWriter::new(temp.path().join("events.jsonl"), "session-test");
        let mut wizard = keyed_wizard().with_events(events.clone());
        for _ in 0..3 {
            wizard.next().unwrap();
        }
        wizard.update(ConfigUpdate::new().prompt("a flying cat")).unwrap();
        wizard.submit(&ScriptedProvider::new(Script::Image)).unwrap();
        wizard.reset().unwrap();

        let types: Vec<String> = events
            .read_all()?
            .iter()
            .filter_map(|event| event["type"].as_str().map(str::to_string))
            .collect();
        assert_eq!(
            types,
            vec![
                "session_started",
                "step_changed",
                "step_changed",
                "step_changed",
                "config_updated",
                "step_changed",
                "generation_started",
                "step_changed",
                "generation_succeeded",
                "step_changed",
                "wizard_reset",
            ]
        );

        let started = events
            .read_all()?
            .into_iter()
            .find(|event| event["type"] == json!("generation_started"))
            .unwrap_or_default();
        assert_eq!(started["aspect_ratio"], json!("1:1"));
        assert_eq!(started["has_reference_image"], json!(false));
        assert_eq!(started["fingerprint"].as_str().map(str::len), Some(64));
        Ok(())
    }
}
