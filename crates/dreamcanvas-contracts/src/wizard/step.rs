use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    #[default]
    SelectingAspect,
    SelectingStyle,
    SelectingColor,
    EnteringPrompt,
    Generating,
    ShowingResult,
}

/// The four steps the user fills in, in order.
pub const INPUT_STEPS: [Step; 4] = [
    Step::SelectingAspect,
    Step::SelectingStyle,
    Step::SelectingColor,
    Step::EnteringPrompt,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardAction {
    Next,
    Back,
    Reset,
    GenerationSucceeded,
    GenerationFailed,
}

/// Every legal `(from, action, to)` move. Anything else is rejected.
pub const TRANSITIONS: &[(Step, WizardAction, Step)] = &[
    (Step::SelectingAspect, WizardAction::Next, Step::SelectingStyle),
    (Step::SelectingStyle, WizardAction::Next, Step::SelectingColor),
    (Step::SelectingColor, WizardAction::Next, Step::EnteringPrompt),
    (Step::EnteringPrompt, WizardAction::Next, Step::Generating),
    (
        Step::Generating,
        WizardAction::GenerationSucceeded,
        Step::ShowingResult,
    ),
    (
        Step::Generating,
        WizardAction::GenerationFailed,
        Step::EnteringPrompt,
    ),
    (Step::SelectingStyle, WizardAction::Back, Step::SelectingAspect),
    (Step::SelectingColor, WizardAction::Back, Step::SelectingStyle),
    (Step::EnteringPrompt, WizardAction::Back, Step::SelectingColor),
    (Step::ShowingResult, WizardAction::Back, Step::EnteringPrompt),
    (Step::ShowingResult, WizardAction::Reset, Step::SelectingAspect),
];

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::SelectingAspect => "selecting-aspect",
            Step::SelectingStyle => "selecting-style",
            Step::SelectingColor => "selecting-color",
            Step::EnteringPrompt => "entering-prompt",
            Step::Generating => "generating",
            Step::ShowingResult => "showing-result",
        }
    }

    /// Target of `action` from this step, or `None` when the move is illegal.
    pub fn apply(self, action: WizardAction) -> Option<Step> {
        TRANSITIONS
            .iter()
            .find(|(from, candidate, _)| *from == self && *candidate == action)
            .map(|(_, _, to)| *to)
    }

    pub fn allows(self, action: WizardAction) -> bool {
        self.apply(action).is_some()
    }

    /// Zero-based position among [`INPUT_STEPS`]; `None` outside the input flow.
    pub fn progress_index(self) -> Option<usize> {
        INPUT_STEPS.iter().position(|step| *step == self)
    }

    pub fn accepts_edits(self) -> bool {
        self != Step::Generating
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WizardAction {
    pub fn as_str(self) -> &'static str {
        match self {
            WizardAction::Next => "next",
            WizardAction::Back => "back",
            WizardAction::Reset => "reset",
            WizardAction::GenerationSucceeded => "generation_succeeded",
            WizardAction::GenerationFailed => "generation_failed",
        }
    }
}

impl fmt::Display for WizardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
