use std::collections::BTreeMap;

use serde_json::Value;

use super::command_registry::{
    CommandSpec, NO_ARG_COMMANDS, RAW_ARG_COMMANDS, SINGLE_PATH_COMMANDS, TOGGLE_COMMANDS,
};

/// One line of wizard input, classified.
///
/// Slash commands map to a named `action`; anything else is `input`, which
/// the front end interprets according to the current step.
#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    pub action: String,
    pub raw: String,
    pub text: Option<String>,
    pub settings_update: BTreeMap<String, Value>,
    pub command_args: BTreeMap<String, Value>,
}

impl Intent {
    fn new(action: &str, raw: &str) -> Self {
        Self {
            action: action.to_string(),
            raw: raw.to_string(),
            text: None,
            settings_update: BTreeMap::new(),
            command_args: BTreeMap::new(),
        }
    }
}

fn find_spec(command: &str, specs: &[CommandSpec]) -> Option<CommandSpec> {
    specs.iter().find(|spec| spec.command == command).copied()
}

/// `on`/`off` style arguments; an empty argument or `toggle` flips the flag.
fn parse_toggle(arg: &str) -> Value {
    match arg.trim().to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Value::Bool(true),
        "off" | "no" | "false" | "0" => Value::Bool(false),
        _ => Value::String("toggle".to_string()),
    }
}

fn parse_single_path_arg(arg: &str) -> String {
    if arg.trim().is_empty() {
        return String::new();
    }
    match shell_words::split(arg) {
        Ok(parts) => parts
            .into_iter()
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Err(_) => arg.trim().to_string(),
    }
}

pub fn parse_intent(text: &str) -> Intent {
    let raw_trimmed = text.trim();
    if raw_trimmed.is_empty() {
        return Intent::new("noop", text);
    }

    if let Some(slash_tail) = raw_trimmed.strip_prefix('/') {
        let command_len = slash_tail
            .chars()
            .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .count();
        if command_len > 0 {
            let command = slash_tail[..command_len].to_ascii_lowercase();
            let arg = slash_tail[command_len..].trim();

            if let Some(spec) = find_spec(&command, RAW_ARG_COMMANDS) {
                let mut intent = Intent::new(spec.action, text);
                let value = if spec.action == "set_color"
                    && matches!(arg.to_ascii_lowercase().as_str(), "" | "none" | "off")
                {
                    Value::Null
                } else {
                    Value::String(arg.to_string())
                };
                if let Some(key) = spec.setting {
                    intent.settings_update.insert(key.to_string(), value);
                }
                return intent;
            }

            if let Some(spec) = find_spec(&command, TOGGLE_COMMANDS) {
                let mut intent = Intent::new(spec.action, text);
                if let Some(key) = spec.setting {
                    intent
                        .settings_update
                        .insert(key.to_string(), parse_toggle(arg));
                }
                return intent;
            }

            if let Some(spec) = find_spec(&command, SINGLE_PATH_COMMANDS) {
                let mut intent = Intent::new(spec.action, text);
                intent.command_args.insert(
                    "path".to_string(),
                    Value::String(parse_single_path_arg(arg)),
                );
                return intent;
            }

            if let Some(spec) = find_spec(&command, NO_ARG_COMMANDS) {
                return Intent::new(spec.action, text);
            }

            let mut intent = Intent::new("unknown", text);
            intent
                .command_args
                .insert("command".to_string(), Value::String(command));
            intent
                .command_args
                .insert("arg".to_string(), Value::String(arg.to_string()));
            return intent;
        }
    }

    let mut intent = Intent::new("input", text);
    intent.text = Some(raw_trimmed.to_string());
    intent
}
