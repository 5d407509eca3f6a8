//! Command-line front end: resolve a profile, then report or scan a frame

use crate::args::{self, Args, ArgsError, COMMON_ARGS, Command};
use crate::config::{ConfigError, ConfigResolver, SettingValue, Settings, profile_rows};
use crate::perception::config::FIXED_QUERIES;
use crate::perception::{
    FixedWindow, FrameScreen, PerceptionEngine, PerceptionError, verify_assets,
};
use log::{error, info, warn};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG: &str = "config.ini";

/// A specialized `Result` type for the front end.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Args(#[from] ArgsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Perception(#[from] PerceptionError),

    #[error("Invalid number of fishes in keepnet: {count}, must be at least 0 and below the keepnet limit {limit}")]
    KeepnetCount { count: i64, limit: i64 },

    #[error("{count} image(s) missing for language '{language}'")]
    MissingAssets { language: String, count: usize },

    #[error("Failed to render settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// `default_arguments` words first, so the process arguments win
pub fn argv_with_defaults(default_arguments: &str, argv: &[String]) -> Result<Vec<String>, ArgsError> {
    let mut words = args::split_words(default_arguments)?;
    words.extend_from_slice(argv);
    Ok(words)
}

/// Fish count must leave room in the keepnet: `0 <= count < limit`
pub fn check_keepnet(count: i64, limit: i64) -> AppResult<()> {
    if (0..limit).contains(&count) {
        Ok(())
    } else {
        error!("Invalid number of fishes in keepnet");
        Err(AppError::KeepnetCount { count, limit })
    }
}

fn print_profiles(resolver: &ConfigResolver) {
    println!("📋 Profiles");
    for (pid, name) in resolver.profile_names().iter().enumerate() {
        println!("  {pid:>3}  {name}");
    }
}

/// Ask for a profile id until a valid one is entered
///
/// Returns `None` on `q` or end of input.
pub fn prompt_pid(
    resolver: &ConfigResolver,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> AppResult<Option<usize>> {
    loop {
        write!(output, "Enter profile id to use, h to see the list, q to quit: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim() {
            "q" => return Ok(None),
            "h" => print_profiles(resolver),
            answer => match answer.parse::<usize>() {
                Ok(pid) if resolver.is_valid_profile_index(pid) => return Ok(Some(pid)),
                _ => writeln!(output, "❌ Invalid profile id, please try again")?,
            },
        }
    }
}

fn print_settings(settings: &Settings) {
    println!("⚙️  Settings");
    for (label, value) in profile_rows(settings) {
        println!("  {label:<28} {value}");
    }
    if let Some(count) = settings.int("fishes_to_catch") {
        println!("  {:<28} {count}", "Fishes to catch");
    }
}

fn scan_frame(engine: &PerceptionEngine<'_>, frame: &Path) -> AppResult<()> {
    println!("🔍 Scanning {}", frame.display());
    for spec in FIXED_QUERIES {
        match engine.run_query(spec) {
            Ok(rects) if rects.is_empty() => println!("  {:<16} -", spec.name),
            Ok(rects) => {
                for rect in rects {
                    println!(
                        "  {:<16} ({},{}) {}x{}",
                        spec.name, rect.left, rect.top, rect.width, rect.height
                    );
                }
            }
            Err(PerceptionError::MissingTemplate { path }) => {
                println!("  {:<16} ⚠️ no template at {}", spec.name, path.display());
            }
            Err(e) => return Err(e.into()),
        }
    }

    let gauges = [
        ("energy high", engine.is_energy_high()),
        ("hunger low", engine.is_hunger_low()),
        ("comfort low", engine.is_comfort_low()),
    ];
    for (name, reading) in gauges {
        match reading {
            Ok(value) => println!("  {name:<16} {value}"),
            Err(e) => println!("  {name:<16} ⚠️ {e}"),
        }
    }

    match engine.float_camera_region() {
        Ok(region) => println!(
            "  {:<16} ({},{}) {}x{}",
            "float camera", region.left, region.top, region.width, region.height
        ),
        Err(e) => println!("  {:<16} ⚠️ {e}", "float camera"),
    }
    Ok(())
}

fn parse(words: Vec<String>) -> AppResult<Option<Args>> {
    match Args::parse_from(words)? {
        Command::Run(args) => Ok(Some(args)),
        Command::Help => {
            args::print_help();
            Ok(None)
        }
        Command::Version => {
            println!("RF4 Perception v{}", env!("CARGO_PKG_VERSION"));
            Ok(None)
        }
    }
}

/// Run the front end with `argv` (program name excluded)
pub fn run(argv: &[String]) -> AppResult<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    run_with_input(argv, &mut input, &mut output)
}

pub fn run_with_input(
    argv: &[String],
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> AppResult<()> {
    let Some(args) = parse(argv.to_vec())? else {
        return Ok(());
    };

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let resolver = ConfigResolver::load(&config_path)?;
    let base = resolver.resolve_base()?;

    let defaults = base.settings().str("default_arguments").unwrap_or_default();
    let args = if defaults.trim().is_empty() {
        args
    } else {
        info!("Prepending default arguments: {defaults}");
        match parse(argv_with_defaults(defaults, argv)?)? {
            Some(args) => args,
            None => return Ok(()),
        }
    };

    match base.settings().int("keepnet_limit") {
        Some(limit) => check_keepnet(args.fishes_in_keepnet, limit)?,
        None => warn!("Keepnet limit unknown, fish count not checked"),
    }

    if let Some(pid) = args.pid
        && !resolver.is_valid_profile_index(pid)
    {
        error!("Invalid profile id");
        return Err(ConfigError::InvalidProfile {
            pid,
            count: resolver.profile_names().len() - 1,
        }
        .into());
    }

    if base.settings().bool("image_verification_enabled") == Some(true) {
        let language = base.settings().require_str("language")?;
        info!("Verifying file integrity...");
        let missing = verify_assets(resolver.static_root(), language)?;
        if !missing.is_empty() {
            println!("❌ Missing images");
            for name in &missing {
                println!("  {name}");
            }
            return Err(AppError::MissingAssets {
                language: language.to_string(),
                count: missing.len(),
            });
        }
        info!("Integrity check passed");
    }

    let overridden = base.merge_args(&args, COMMON_ARGS)?;

    let pid = match args.pid {
        Some(pid) => pid,
        None => {
            print_profiles(&resolver);
            match prompt_pid(&resolver, input, output)? {
                Some(pid) => pid,
                None => {
                    info!("No profile selected");
                    return Ok(());
                }
            }
        }
    };

    if pid == 0 {
        println!(
            "📝 Edit the configuration file at {}",
            resolver.config_path().display()
        );
        return Ok(());
    }

    let mut settings = overridden.resolve_profile(pid)?;
    if let Some(count) = settings.fishes_to_catch() {
        settings.set("fishes_to_catch", SettingValue::Int(count));
    }

    print_settings(&settings);

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    }

    if let Some(frame) = &args.frame {
        let screen = FrameScreen::from_file(frame);
        let window = FixedWindow::at(args.window_origin.0, args.window_origin.1);
        let engine = PerceptionEngine::new(&settings, &screen, &window);
        scan_frame(&engine, frame)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    const CONFIG: &str = "\
[game]
language = en
window_size = 1920x1080
default_arguments = -c
confirmation_enabled = False
SMTP_validation_enabled = False
image_verification_enabled = True
coffee_limit = 10
keepnet_limit = 100
keep_fish_delay = 1
energy_threshold = 0.74
retrieval_detect_confidence = 0.8
alcohol_drinking_delay = 900
alcohol_drinking_quantity = 1
lure_broken_action = alarm
keepnet_full_action = alarm
alarm_sound_file = sound.mp3
unmarked_release_whitelist = mackerel

[shortcut]
tea = 1
carrot = 2
coffee = 4
bottom_rods = 1, 2, 3
quit = q

[spinning]
fishing_strategy = spin
cast_power_level = 5
cast_delay = 4
post_acceleration_enabled = False
";

    fn workspace(config: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, config).unwrap();
        fs::create_dir_all(dir.path().join("static").join("en")).unwrap();
        (dir, format!("--config={}", path.display()))
    }

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn run_quiet(argv: &[String], stdin: &str) -> AppResult<()> {
        let mut input = Cursor::new(stdin.as_bytes().to_vec());
        let mut output = Vec::new();
        run_with_input(argv, &mut input, &mut output)
    }

    #[test]
    fn test_defaults_come_first() {
        let words = argv_with_defaults("-m --pid=2", &argv(&["--pid=3"])).unwrap();
        assert_eq!(words, vec!["-m", "--pid=2", "--pid=3"]);
        assert_eq!(argv_with_defaults("", &argv(&["-c"])).unwrap(), vec!["-c"]);
    }

    #[test]
    fn test_keepnet_bounds() {
        assert!(check_keepnet(0, 100).is_ok());
        assert!(check_keepnet(99, 100).is_ok());
        assert!(matches!(
            check_keepnet(100, 100),
            Err(AppError::KeepnetCount { count: 100, limit: 100 })
        ));
        assert!(check_keepnet(-1, 100).is_err());
    }

    #[test]
    fn test_prompt_retries_until_valid() {
        let resolver = ConfigResolver::from_source(CONFIG, "config.ini", "static").unwrap();
        let mut input = Cursor::new(b"9\nabc\n1\n".to_vec());
        let mut output = Vec::new();

        let pid = prompt_pid(&resolver, &mut input, &mut output).unwrap();
        assert_eq!(pid, Some(1));
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("Invalid profile id").count(), 2);
    }

    #[test]
    fn test_prompt_quit_and_eof() {
        let resolver = ConfigResolver::from_source(CONFIG, "config.ini", "static").unwrap();
        let mut output = Vec::new();
        assert_eq!(
            prompt_pid(&resolver, &mut Cursor::new(b"q\n".to_vec()), &mut output).unwrap(),
            None
        );
        assert_eq!(
            prompt_pid(&resolver, &mut Cursor::new(Vec::new()), &mut output).unwrap(),
            None
        );
    }

    #[test]
    fn test_run_with_profile() {
        let (_dir, config) = workspace(CONFIG);
        run_quiet(&argv(&[config.as_str(), "--pid=1", "--dump"]), "").unwrap();
    }

    #[test]
    fn test_run_prompts_for_profile() {
        let (_dir, config) = workspace(CONFIG);
        run_quiet(&argv(&[config.as_str()]), "0\n").unwrap();
    }

    #[test]
    fn test_run_rejects_full_keepnet() {
        let (_dir, config) = workspace(CONFIG);
        let err = run_quiet(&argv(&[config.as_str(), "--pid=1", "-n", "100"]), "").unwrap_err();
        assert!(matches!(err, AppError::KeepnetCount { .. }));
    }

    #[test]
    fn test_run_rejects_invalid_pid() {
        let (_dir, config) = workspace(CONFIG);
        let err = run_quiet(&argv(&[config.as_str(), "--pid=2"]), "").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::InvalidProfile { pid: 2, count: 1 })
        ));
    }

    #[test]
    fn test_run_default_arguments_conflict() {
        // `-c` from default_arguments is fine; an exclusive pair across both is not
        let config = CONFIG.replace("default_arguments = -c", "default_arguments = -m");
        let (_dir, config) = workspace(&config);
        let err = run_quiet(&argv(&[config.as_str(), "--pid=1", "-a"]), "").unwrap_err();
        assert!(matches!(err, AppError::Args(ArgsError::Conflict(..))));
    }

    #[test]
    fn test_run_stops_on_missing_images() {
        let config = CONFIG.replace("language = en", "language = ru");
        let (dir, config) = workspace(&config);
        fs::write(dir.path().join("static").join("en").join("get.png"), b"png").unwrap();
        fs::create_dir_all(dir.path().join("static").join("ru")).unwrap();

        let err = run_quiet(&argv(&[config.as_str(), "--pid=1"]), "").unwrap_err();
        assert!(matches!(err, AppError::MissingAssets { count: 1, .. }));
    }

    #[test]
    fn test_run_missing_config() {
        let err = run_quiet(&argv(&["--config=/nonexistent/config.ini"]), "").unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_help_needs_no_config() {
        run_quiet(&argv(&["--config=/nonexistent/config.ini", "--help"]), "").unwrap();
    }
}
