use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dreamcanvas_contracts::chat::{parse_intent, Intent, WIZARD_HELP_COMMANDS};
use dreamcanvas_contracts::events::EventWriter;
use dreamcanvas_contracts::models::{ModelSelector, ModelSpec};
use dreamcanvas_contracts::wizard::{
    normalize_color, ArtStyle, AspectRatio, ConfigUpdate, DataUri, ImageConfig, Locale, Step,
    INPUT_STEPS, PALETTE,
};
use dreamcanvas_engine::{
    compile_request, provider_for_model, sniff_image_mime, Advance, ApiKey, ApiKeySource,
    EnvKeySource, GeminiProvider, GeminiSettings, GeneratedImage, GenerationRequest,
    GenerationResponse, ImageProvider, StaticKeySource, Wizard, WizardError,
};
use serde_json::{json, Map, Value};

#[derive(Debug, Parser)]
#[command(name = "dreamcanvas", version, about = "Step-by-step image generation wizard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive wizard.
    Wizard(WizardArgs),
    /// Walk the wizard non-interactively and save the result.
    Generate(GenerateArgs),
    /// Print the request body that would be sent, without calling the model.
    Compile(CompileArgs),
}

#[derive(Debug, Clone, Args)]
struct SessionArgs {
    #[arg(long, default_value = ".")]
    out: PathBuf,
    #[arg(long)]
    events: Option<PathBuf>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long, default_value = "en")]
    locale: Locale,
    #[arg(long)]
    api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
struct ConfigArgs {
    /// JSON file holding an image configuration to start from.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    prompt: Option<String>,
    #[arg(long)]
    aspect: Option<AspectRatio>,
    #[arg(long)]
    style: Option<ArtStyle>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    gradient: bool,
    #[arg(long)]
    remove_background: bool,
    #[arg(long)]
    reference: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct WizardArgs {
    #[command(flatten)]
    session: SessionArgs,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Debug, Parser)]
struct GenerateArgs {
    #[command(flatten)]
    session: SessionArgs,
    #[command(flatten)]
    config: ConfigArgs,
    /// Explicit file for the image instead of `<out>/dreamcanvas-<millis>.<ext>`.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct CompileArgs {
    #[command(flatten)]
    config: ConfigArgs,
    #[arg(long)]
    model: Option<String>,
}

const EXIT_OK: i32 = 0;
const EXIT_VALIDATION: i32 = 2;
const EXIT_MISSING_KEY: i32 = 3;
const EXIT_GENERATION: i32 = 4;

const REFERENCE_IMAGE_CAPABILITY: &str = "reference_image";

const PROGRESS_TICK: Duration = Duration::from_millis(500);

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("dreamcanvas error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Wizard(args) => run_wizard(args),
        Command::Generate(args) => run_generate(args),
        Command::Compile(args) => run_compile(args),
    }
}

struct Session {
    model: ModelSpec,
    provider: Arc<dyn ImageProvider>,
    events: EventWriter,
    locale: Locale,
    out: PathBuf,
    api_key: Option<String>,
}

impl Session {
    fn open(args: &SessionArgs) -> Result<Self> {
        fs::create_dir_all(&args.out)
            .with_context(|| format!("failed to create {}", args.out.display()))?;
        let events_path = args
            .events
            .clone()
            .unwrap_or_else(|| args.out.join("events.jsonl"));
        let model = resolve_model(args.model.as_deref())?;
        let provider: Arc<dyn ImageProvider> = Arc::from(provider_for_model(&model)?);
        Ok(Self {
            model,
            provider,
            events: EventWriter::for_new_session(events_path),
            locale: args.locale,
            out: args.out.clone(),
            api_key: args.api_key.clone(),
        })
    }

    fn key_source(&self, interactive: bool) -> Box<dyn ApiKeySource> {
        if !self.model.requires_key {
            return Box::new(StaticKeySource::new(self.model.provider.as_str()));
        }
        if let Some(key) = self.api_key.as_deref() {
            return Box::new(StaticKeySource::new(key));
        }
        if interactive {
            Box::new(PromptingKeySource::from_env())
        } else {
            Box::new(EnvKeySource)
        }
    }

    fn wizard(&self, interactive: bool) -> Wizard {
        Wizard::new(self.key_source(interactive))
            .with_locale(self.locale)
            .with_events(self.events.clone())
    }
}

fn resolve_model(requested: Option<&str>) -> Result<ModelSpec> {
    let selection = match ModelSelector::new(None).select(requested, "image") {
        Ok(selection) => selection,
        Err(reason) => bail!(reason),
    };
    if let (Some(_), Some(reason)) = (requested, selection.fallback_reason.as_deref()) {
        eprintln!("{reason} Using {}.", selection.model.name);
    }
    Ok(selection.model)
}

type LineReader = Box<dyn FnMut(&mut String) -> io::Result<usize> + Send>;

/// Key seeded from the environment and replaceable from stdin.
///
/// Selecting always asks; a blank answer keeps the current key.
struct PromptingKeySource {
    current: Option<ApiKey>,
    read_line: LineReader,
}

impl PromptingKeySource {
    fn from_env() -> Self {
        Self::with_reader(
            EnvKeySource.selected_key(),
            Box::new(|line: &mut String| io::stdin().read_line(line)),
        )
    }

    fn with_reader(current: Option<ApiKey>, read_line: LineReader) -> Self {
        Self { current, read_line }
    }
}

impl ApiKeySource for PromptingKeySource {
    fn has_selected_key(&self) -> bool {
        self.current.is_some()
    }

    fn select_key(&mut self) -> Result<()> {
        let hint = if self.current.is_some() {
            " (blank keeps the current key)"
        } else {
            ""
        };
        print!("Gemini API key{hint}: ");
        io::stdout().flush()?;
        let mut line = String::new();
        (self.read_line)(&mut line).context("failed to read API key")?;
        if let Some(key) = ApiKey::new(line) {
            self.current = Some(key);
        }
        if self.current.is_none() {
            bail!("no API key entered");
        }
        Ok(())
    }

    fn selected_key(&self) -> Option<ApiKey> {
        self.current.clone()
    }
}

fn run_wizard(args: WizardArgs) -> Result<i32> {
    let session = Session::open(&args.session)?;
    let mut wizard = session.wizard(true);
    wizard.update(args.config.to_update()?)?;

    let stdin = io::stdin();
    let mut line = String::new();

    println!("DreamCanvas wizard. Type /help for commands.");
    print_step(&wizard);

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        let read = match stdin.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            break;
        }

        let input = line.trim_end_matches(['\n', '\r']);
        let intent = parse_intent(input);
        match intent.action.as_str() {
            "noop" => {}
            "quit" => break,
            "help" => println!("Commands: {}", WIZARD_HELP_COMMANDS.join(" ")),
            "status" => print_status(&wizard, &session),
            "next" => {
                let before = wizard.step();
                if before == Step::EnteringPrompt {
                    if let Err(message) = check_model_supports(&session.model, wizard.config()) {
                        eprintln!("{message}");
                        continue;
                    }
                }
                let outcome = advance_with_key_prompt(&mut wizard, &session.provider);
                if let Err(err) = &outcome {
                    report(&wizard, err);
                }
                if wizard.step() != before {
                    print_step(&wizard);
                }
            }
            "back" => match wizard.back() {
                Ok(_) => print_step(&wizard),
                Err(err) => report(&wizard, &err),
            },
            "reset" => match wizard.reset() {
                Ok(_) => print_step(&wizard),
                Err(err) => report(&wizard, &err),
            },
            "select_key" => match wizard.select_key() {
                Ok(()) => println!("API key selected."),
                Err(err) => report(&wizard, &err),
            },
            "save_image" => {
                let explicit = value_as_non_empty_string(intent.command_args.get("path"));
                match wizard.generated_image() {
                    Some(image) => {
                        let saved = save_image(
                            image,
                            &session.out,
                            explicit.as_deref().map(Path::new),
                            wizard.events(),
                        );
                        match saved {
                            Ok(path) => println!("Saved {}", path.display()),
                            Err(err) => eprintln!("dreamcanvas error: {err:#}"),
                        }
                    }
                    None => println!("Nothing to save yet."),
                }
            }
            "set_reference" => {
                let update = match value_as_non_empty_string(intent.command_args.get("path")) {
                    None => Ok(ConfigUpdate::new().reference_image(None)),
                    Some(path) if is_clear_word(&path) => {
                        Ok(ConfigUpdate::new().reference_image(None))
                    }
                    Some(path) => load_reference(Path::new(&path))
                        .map(|uri| ConfigUpdate::new().reference_image(Some(uri))),
                };
                apply_update(&mut wizard, update);
            }
            "set_aspect" | "set_style" | "set_color" | "set_prompt" | "set_gradient"
            | "set_remove_background" => {
                let update = settings_to_update(&intent.settings_update, wizard.config());
                apply_update(&mut wizard, update);
            }
            "input" => {
                let text = intent.text.as_deref().unwrap_or_default();
                match interpret_input(wizard.step(), text) {
                    Some(update) => apply_update(&mut wizard, Ok(update)),
                    None => println!("Nothing to set on this step; try /next, /back or /help."),
                }
            }
            _ => print_unknown(&intent),
        }
    }

    Ok(EXIT_OK)
}

fn run_generate(args: GenerateArgs) -> Result<i32> {
    let session = Session::open(&args.session)?;
    let mut wizard = session.wizard(false);
    wizard.update(args.config.to_update()?)?;

    while wizard.step() != Step::EnteringPrompt {
        wizard.next()?;
    }

    if let Err(message) = check_model_supports(&session.model, wizard.config()) {
        eprintln!("{message}");
        return Ok(EXIT_VALIDATION);
    }

    if let Err(err) = advance(&mut wizard, &session.provider) {
        report(&wizard, &err);
        return Ok(exit_code(&err));
    }

    let Some(image) = wizard.generated_image() else {
        bail!("wizard finished without an image");
    };
    let path = save_image(
        image,
        &session.out,
        args.output.as_deref(),
        wizard.events(),
    )?;
    println!("{}", path.display());
    Ok(EXIT_OK)
}

fn run_compile(args: CompileArgs) -> Result<i32> {
    let config = ImageConfig::default().merged(args.config.to_update()?);
    let request = compile_request(&config);
    let model = resolve_model(args.model.as_deref())?;
    match compile_endpoint(&model) {
        Some(endpoint) => eprintln!("POST {endpoint} (fingerprint {})", request.fingerprint()),
        None => eprintln!(
            "{} is served by the {} provider (fingerprint {})",
            model.name,
            model.provider,
            request.fingerprint()
        ),
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&GeminiProvider::build_payload(&request))?
    );
    Ok(EXIT_OK)
}

/// Remote endpoint for `model`, when it is served over HTTP.
fn compile_endpoint(model: &ModelSpec) -> Option<String> {
    (model.provider == "gemini")
        .then(|| GeminiProvider::new(GeminiSettings::from_env(&model.name)).endpoint())
}

fn check_model_supports(model: &ModelSpec, config: &ImageConfig) -> Result<(), String> {
    if config.reference_image.is_some() && !model.supports(REFERENCE_IMAGE_CAPABILITY) {
        return Err(format!(
            "{} does not accept reference images; clear it with /ref none",
            model.name
        ));
    }
    Ok(())
}

fn advance(wizard: &mut Wizard, provider: &Arc<dyn ImageProvider>) -> Result<(), WizardError> {
    match wizard.next()? {
        Advance::Moved(_) => Ok(()),
        Advance::Generate(pending) => {
            println!("{}", wizard.locale().step_info(Step::Generating).subtitle);
            let outcome = run_generation(Arc::clone(provider), pending.request, pending.key);
            wizard.complete_generation(pending.id, outcome).map(|_| ())
        }
    }
}

/// Like [`advance`], but a missing key triggers one key selection and retry.
fn advance_with_key_prompt(
    wizard: &mut Wizard,
    provider: &Arc<dyn ImageProvider>,
) -> Result<(), WizardError> {
    match advance(wizard, provider) {
        Err(WizardError::MissingCredential) => {
            wizard.select_key()?;
            advance(wizard, provider)
        }
        other => other,
    }
}

/// Runs one provider call on a worker thread, printing progress dots.
fn run_generation(
    provider: Arc<dyn ImageProvider>,
    request: GenerationRequest,
    key: ApiKey,
) -> Result<GenerationResponse> {
    let (tx, rx) = mpsc::channel();
    let handle = thread::Builder::new()
        .name("dreamcanvas-generate".to_string())
        .spawn(move || {
            let _ = tx.send(provider.generate(&request, &key));
        })
        .context("generation thread spawn failed")?;

    let outcome = loop {
        match rx.recv_timeout(PROGRESS_TICK) {
            Ok(outcome) => break outcome,
            Err(RecvTimeoutError::Timeout) => {
                eprint!(".");
                let _ = io::stderr().flush();
            }
            Err(RecvTimeoutError::Disconnected) => {
                break Err(anyhow::anyhow!("generation worker exited without a result"))
            }
        }
    };
    eprintln!();
    let _ = handle.join();
    outcome
}

fn exit_code(err: &WizardError) -> i32 {
    match err {
        WizardError::Validation { .. } => EXIT_VALIDATION,
        WizardError::MissingCredential => EXIT_MISSING_KEY,
        WizardError::Generation(_) => EXIT_GENERATION,
        WizardError::InvalidTransition { .. }
        | WizardError::Busy
        | WizardError::UnknownGeneration(_) => 1,
    }
}

fn report(wizard: &Wizard, err: &WizardError) {
    match err {
        WizardError::Validation { .. } | WizardError::MissingCredential => {
            eprintln!("{}", wizard.error().map(str::to_string).unwrap_or_else(|| err.to_string()));
        }
        WizardError::Generation(detail) => {
            eprintln!("{}", wizard.error().map(str::to_string).unwrap_or_else(|| err.to_string()));
            eprintln!("  detail: {detail}");
        }
        other => eprintln!("{other}"),
    }
}

fn apply_update(wizard: &mut Wizard, update: Result<ConfigUpdate>) {
    let update = match update {
        Ok(update) => update,
        Err(err) => {
            eprintln!("{err:#}");
            return;
        }
    };
    let fields = update.touched_fields();
    match wizard.update(update) {
        Ok(()) if !fields.is_empty() => println!("Updated {}.", fields.join(", ")),
        Ok(()) => {}
        Err(err) => report(wizard, &err),
    }
}

impl ConfigArgs {
    /// Folds `--config` and the individual flags into one update; flags win.
    fn to_update(&self) -> Result<ConfigUpdate> {
        let mut update = match self.config.as_deref() {
            Some(path) => full_update(read_config_file(path)?),
            None => ConfigUpdate::new(),
        };
        if let Some(ratio) = self.aspect {
            update = update.aspect_ratio(ratio);
        }
        if let Some(style) = self.style {
            update = update.style(style);
        }
        if let Some(color) = self.color.as_deref() {
            update = update.primary_color(normalize_color(color));
        }
        if self.gradient {
            update = update.gradient(true);
        }
        if self.remove_background {
            update = update.remove_background(true);
        }
        if let Some(prompt) = self.prompt.as_deref() {
            update = update.prompt(prompt);
        }
        if let Some(path) = self.reference.as_deref() {
            update = update.reference_image(Some(load_reference(path)?));
        }
        Ok(update)
    }
}

fn read_config_file(path: &Path) -> Result<ImageConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid image config in {}", path.display()))
}

fn full_update(config: ImageConfig) -> ConfigUpdate {
    ConfigUpdate::new()
        .aspect_ratio(config.aspect_ratio)
        .style(config.style)
        .primary_color(config.primary_color)
        .gradient(config.is_gradient)
        .remove_background(config.remove_background)
        .prompt(config.prompt)
        .reference_image(config.reference_image)
}

/// Slash-command settings as a config update. Toggles without an explicit
/// value flip the current setting.
fn settings_to_update(
    settings: &BTreeMap<String, Value>,
    current: &ImageConfig,
) -> Result<ConfigUpdate> {
    let mut update = ConfigUpdate::new();
    for (key, value) in settings {
        update = match key.as_str() {
            "aspect_ratio" => update.aspect_ratio(required_str(key, value)?.parse()?),
            "style" => update.style(required_str(key, value)?.parse()?),
            "primary_color" => update.primary_color(value.as_str().and_then(normalize_color)),
            "prompt" => update.prompt(required_str(key, value)?),
            "is_gradient" => update.gradient(toggle_value(value, current.is_gradient)),
            "remove_background" => {
                update.remove_background(toggle_value(value, current.remove_background))
            }
            other => bail!("unsupported setting '{other}'"),
        };
    }
    Ok(update)
}

fn required_str<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
    match value.as_str().map(str::trim) {
        Some(raw) if !raw.is_empty() => Ok(raw),
        _ => bail!("/{} needs a value", command_for_setting(key)),
    }
}

fn command_for_setting(key: &str) -> &str {
    match key {
        "aspect_ratio" => "aspect",
        "is_gradient" => "gradient",
        "remove_background" => "background",
        other => other,
    }
}

fn toggle_value(value: &Value, current: bool) -> bool {
    value.as_bool().unwrap_or(!current)
}

/// Bare input on a step: an option number, an option name, or the prompt.
fn interpret_input(step: Step, text: &str) -> Option<ConfigUpdate> {
    let index = text
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1));
    match step {
        Step::SelectingAspect => index
            .and_then(|index| AspectRatio::ALL.get(index).copied())
            .or_else(|| text.parse().ok())
            .map(|ratio| ConfigUpdate::new().aspect_ratio(ratio)),
        Step::SelectingStyle => index
            .and_then(|index| ArtStyle::ALL.get(index).copied())
            .or_else(|| text.parse().ok())
            .map(|style| ConfigUpdate::new().style(style)),
        Step::SelectingColor => {
            let color = match index.and_then(|index| PALETTE.get(index)) {
                Some(color) => Some(color.id.to_string()),
                None => normalize_color(text),
            };
            Some(ConfigUpdate::new().primary_color(color))
        }
        Step::EnteringPrompt => Some(ConfigUpdate::new().prompt(text)),
        Step::Generating | Step::ShowingResult => None,
    }
}

fn is_clear_word(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "none" | "off" | "clear")
}

fn load_reference(path: &Path) -> Result<DataUri> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read reference {}", path.display()))?;
    let Some(mime) = mime_for_path(path).or_else(|| sniff_image_mime(&bytes)) else {
        bail!("{} is not a supported image", path.display());
    };
    DataUri::from_bytes(mime, &bytes)
        .with_context(|| format!("failed to encode reference {}", path.display()))
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

fn save_image(
    image: &GeneratedImage,
    out_dir: &Path,
    explicit: Option<&Path>,
    events: Option<&EventWriter>,
) -> Result<PathBuf> {
    let bytes = image
        .bytes()
        .context("generated image payload is not valid base64")?;
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => out_dir.join(download_file_name(
            chrono::Utc::now().timestamp_millis(),
            image.extension(),
        )),
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;

    if let Some(events) = events {
        let mut payload = Map::new();
        payload.insert("path".to_string(), json!(path.to_string_lossy()));
        payload.insert("mime_type".to_string(), json!(image.mime_type()));
        payload.insert("bytes".to_string(), json!(bytes.len()));
        let _ = events.emit("image_saved", payload);
    }
    Ok(path)
}

fn download_file_name(millis: i64, extension: &str) -> String {
    format!("dreamcanvas-{millis}.{extension}")
}

fn print_step(wizard: &Wizard) {
    let locale = wizard.locale();
    let step = wizard.step();
    let config = wizard.config();
    let info = locale.step_info(step);
    let progress = step
        .progress_index()
        .map(|index| format!("[{}/{}] ", index + 1, INPUT_STEPS.len()))
        .unwrap_or_default();
    println!();
    println!("{progress}{}: {}", info.title, info.subtitle);

    match step {
        Step::SelectingAspect => {
            for (index, ratio) in AspectRatio::ALL.iter().enumerate() {
                println!("  {}. {ratio}{}", index + 1, marker(*ratio == config.aspect_ratio));
            }
        }
        Step::SelectingStyle => {
            for (index, style) in ArtStyle::ALL.iter().enumerate() {
                println!(
                    "  {}. {}{}",
                    index + 1,
                    style.display_name(),
                    marker(*style == config.style)
                );
            }
        }
        Step::SelectingColor => {
            for (index, color) in PALETTE.iter().enumerate() {
                let label = match locale {
                    Locale::English => color.id,
                    Locale::Persian => color.label_fa,
                };
                let selected = config.primary_color.as_deref() == Some(color.id);
                println!("  {:>2}. {label} {}{}", index + 1, color.hex, marker(selected));
            }
            println!(
                "  gradient: {}  remove background: {}",
                on_off(config.is_gradient),
                on_off(config.remove_background)
            );
        }
        Step::EnteringPrompt => {
            if config.has_prompt() {
                println!("  prompt: {}", config.prompt);
            }
            println!("  /next: {}", locale.next_label(step));
        }
        Step::Generating => {}
        Step::ShowingResult => {
            if let Some(image) = wizard.generated_image() {
                println!("  {} ({})", image.prompt, image.mime_type());
            }
            println!("  /save [path], /back to edit, /reset to start over");
        }
    }
}

fn print_status(wizard: &Wizard, session: &Session) {
    let config = wizard.config();
    println!("step: {}", wizard.step());
    println!("model: {} ({})", session.model.name, session.provider.name());
    println!("key: {}", if wizard.has_key() { "selected" } else { "missing" });
    println!("aspect: {}", config.aspect_ratio);
    println!("style: {}", config.style.display_name());
    println!("color: {}", config.primary_color.as_deref().unwrap_or("none"));
    println!("gradient: {}", on_off(config.is_gradient));
    println!("remove background: {}", on_off(config.remove_background));
    println!(
        "reference: {}",
        config
            .reference_image
            .as_ref()
            .map(|uri| uri.mime_type())
            .unwrap_or("none")
    );
    println!("prompt: {}", config.prompt);
    if let Some(error) = wizard.error() {
        println!("error: {error}");
    }
}

fn print_unknown(intent: &Intent) {
    let command = value_as_non_empty_string(intent.command_args.get("command"))
        .unwrap_or_else(|| intent.raw.clone());
    println!("Unknown command: /{command}. Type /help for commands.");
}

fn marker(selected: bool) -> &'static str {
    if selected {
        "  *"
    } else {
        ""
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn value_as_non_empty_string(value: Option<&Value>) -> Option<String> {
    let raw = value
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
