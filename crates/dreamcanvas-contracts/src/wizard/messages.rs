use std::str::FromStr;

use super::config::ParseOptionError;
use super::step::Step;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    English,
    Persian,
}

impl FromStr for Locale {
    type Err = ParseOptionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "fa" | "persian" | "farsi" => Ok(Locale::Persian),
            other => Err(ParseOptionError {
                kind: "locale",
                value: other.to_string(),
                expected: "en, fa".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    pub title: &'static str,
    pub subtitle: &'static str,
}

/// User-facing strings for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub prompt_required: &'static str,
    pub key_required: &'static str,
    pub generation_failed: &'static str,
    pub next_label: &'static str,
    pub generate_label: &'static str,
}

const ENGLISH: Messages = Messages {
    prompt_required: "Please describe the image you want.",
    key_required: "Select an API key before generating.",
    generation_failed: "Something went wrong while generating the image. Please try again.",
    next_label: "Next step",
    generate_label: "Start designing",
};

const PERSIAN: Messages = Messages {
    prompt_required: "لطفا توضیحات تصویر را وارد کنید",
    key_required: "لطفاً کلید API خود را انتخاب کنید",
    generation_failed: "خطایی در تولید تصویر رخ داد. لطفا مجدد تلاش کنید.",
    next_label: "مرحله بعد",
    generate_label: "شروع طراحی",
};

impl Locale {
    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::English => &ENGLISH,
            Locale::Persian => &PERSIAN,
        }
    }

    pub fn step_info(self, step: Step) -> StepInfo {
        let (title, subtitle) = match (self, step) {
            (Locale::English, Step::SelectingAspect) => {
                ("Choose dimensions", "Pick the size of the output image")
            }
            (Locale::English, Step::SelectingStyle) => {
                ("Art style", "Choose the look you are after")
            }
            (Locale::English, Step::SelectingColor) => ("Color settings", "Palette and effects"),
            (Locale::English, Step::EnteringPrompt) => {
                ("Describe the image", "The details of what you have in mind")
            }
            (Locale::English, Step::Generating) => ("Designing", "The model is at work..."),
            (Locale::English, Step::ShowingResult) => ("Done", "Your masterpiece is ready"),
            (Locale::Persian, Step::SelectingAspect) => {
                ("انتخاب ابعاد", "سایز تصویر خروجی را مشخص کنید")
            }
            (Locale::Persian, Step::SelectingStyle) => {
                ("سبک طراحی", "استایل هنری مورد نظر را انتخاب کنید")
            }
            (Locale::Persian, Step::SelectingColor) => ("تنظیمات رنگ", "پالت رنگی و افکت‌ها"),
            (Locale::Persian, Step::EnteringPrompt) => {
                ("توصیف تصویر", "جزئیات چیزی که در ذهن دارید")
            }
            (Locale::Persian, Step::Generating) => ("در حال طراحی", "هوش مصنوعی مشغول کار است..."),
            (Locale::Persian, Step::ShowingResult) => ("پایان کار", "شاهکار شما آماده است"),
        };
        StepInfo { title, subtitle }
    }

    /// Label of the forward button on `step`.
    pub fn next_label(self, step: Step) -> &'static str {
        if step == Step::EnteringPrompt {
            self.messages().generate_label
        } else {
            self.messages().next_label
        }
    }
}
