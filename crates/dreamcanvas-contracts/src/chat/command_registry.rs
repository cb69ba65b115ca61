#[derive(Clone, Copy, Debug)]
pub(crate) struct CommandSpec {
    pub command: &'static str,
    pub action: &'static str,
    /// Settings key the argument is written under, if any.
    pub setting: Option<&'static str>,
}

const fn spec(command: &'static str, action: &'static str) -> CommandSpec {
    CommandSpec {
        command,
        action,
        setting: None,
    }
}

const fn setting(
    command: &'static str,
    action: &'static str,
    setting: &'static str,
) -> CommandSpec {
    CommandSpec {
        command,
        action,
        setting: Some(setting),
    }
}

pub(crate) const RAW_ARG_COMMANDS: &[CommandSpec] = &[
    setting("aspect", "set_aspect", "aspect_ratio"),
    setting("style", "set_style", "style"),
    setting("color", "set_color", "primary_color"),
    setting("prompt", "set_prompt", "prompt"),
];

pub(crate) const TOGGLE_COMMANDS: &[CommandSpec] = &[
    setting("gradient", "set_gradient", "is_gradient"),
    setting("background", "set_remove_background", "remove_background"),
];

pub(crate) const SINGLE_PATH_COMMANDS: &[CommandSpec] = &[
    spec("ref", "set_reference"),
    spec("reference", "set_reference"),
    spec("save", "save_image"),
];

pub(crate) const NO_ARG_COMMANDS: &[CommandSpec] = &[
    spec("next", "next"),
    spec("back", "back"),
    spec("reset", "reset"),
    spec("status", "status"),
    spec("key", "select_key"),
    spec("help", "help"),
    spec("quit", "quit"),
    spec("exit", "quit"),
];

pub const WIZARD_HELP_COMMANDS: &[&str] = &[
    "/next",
    "/back",
    "/reset",
    "/aspect <ratio>",
    "/style <name>",
    "/color <name|none>",
    "/gradient [on|off]",
    "/background [on|off]",
    "/prompt <text>",
    "/ref <path|none>",
    "/save [path]",
    "/key",
    "/status",
    "/help",
    "/quit",
];
