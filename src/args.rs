use crate::config::{ArgSource, ArgSpec, FieldType, SettingValue};
use std::path::PathBuf;
use thiserror::Error;

/// Boat ticket durations sold in game, in hours
pub const TICKET_DURATIONS: [u32; 4] = [1, 2, 3, 5];

/// Command-line flags copied into the settings snapshot
pub const COMMON_ARGS: &[ArgSpec] = &[
    ArgSpec {
        flag: "marked",
        field: "keep_marked_only",
        ty: FieldType::Bool,
    },
    ArgSpec {
        flag: "rainbow-line",
        field: "rainbow_line_enabled",
        ty: FieldType::Bool,
    },
    ArgSpec {
        flag: "coffee",
        field: "coffee_enabled",
        ty: FieldType::Bool,
    },
    ArgSpec {
        flag: "alcohol",
        field: "alcohol_enabled",
        ty: FieldType::Bool,
    },
    ArgSpec {
        flag: "refill",
        field: "refill_enabled",
        ty: FieldType::Bool,
    },
    ArgSpec {
        flag: "harvest",
        field: "harvest_enabled",
        ty: FieldType::Bool,
    },
    ArgSpec {
        flag: "email",
        field: "email_enabled",
        ty: FieldType::Bool,
    },
    ArgSpec {
        flag: "plot",
        field: "plot_enabled",
        ty: FieldType::Bool,
    },
    ArgSpec {
        flag: "shutdown",
        field: "shutdown_enabled",
        ty: FieldType::Bool,
    },
    ArgSpec {
        flag: "fishes-in-keepnet",
        field: "fishes_in_keepnet",
        ty: FieldType::Int,
    },
    ArgSpec {
        flag: "boat-ticket-duration",
        field: "boat_ticket_duration",
        ty: FieldType::Int,
    },
    ArgSpec {
        flag: "strategy",
        field: "fishing_strategy",
        ty: FieldType::Str,
    },
];

#[derive(Debug, Error, PartialEq)]
pub enum ArgsError {
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),

    #[error("Flag {0} expects a value")]
    MissingValue(String),

    #[error("Flag {0} does not take a value")]
    UnexpectedValue(String),

    #[error("Invalid value '{value}' for {flag}: expected {expected}")]
    InvalidValue {
        flag: String,
        value: String,
        expected: &'static str,
    },

    #[error("Flags {0} and {1} cannot be used together")]
    Conflict(&'static str, &'static str),

    #[error("Unterminated quote or trailing backslash in '{0}'")]
    UnterminatedQuote(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub pid: Option<usize>,
    pub all: bool,
    pub marked: bool,
    pub default_spool: bool,
    pub rainbow_line: bool,
    pub coffee: bool,
    pub alcohol: bool,
    pub refill: bool,
    pub harvest: bool,
    pub email: bool,
    pub plot: bool,
    pub shutdown: bool,
    pub fishes_in_keepnet: i64,
    pub boat_ticket_duration: Option<u32>,
    pub strategy: Option<String>,
    pub frame: Option<PathBuf>,
    pub window_origin: (i32, i32),
    pub dump: bool,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Run(Args),
    Help,
    Version,
}

fn long_name(short: char) -> Option<&'static str> {
    let name = match short {
        'h' => "help",
        'v' => "version",
        'p' => "pid",
        'a' => "all",
        'm' => "marked",
        'd' => "default-spool",
        'R' => "rainbow-line",
        'c' => "coffee",
        'A' => "alcohol",
        'r' => "refill",
        'H' => "harvest",
        'e' => "email",
        'P' => "plot",
        's' => "shutdown",
        'n' => "fishes-in-keepnet",
        't' => "boat-ticket-duration",
        _ => return None,
    };
    Some(name)
}

fn takes_value(name: &str) -> bool {
    matches!(
        name,
        "config"
            | "pid"
            | "fishes-in-keepnet"
            | "boat-ticket-duration"
            | "strategy"
            | "frame"
            | "window-origin"
    )
}

fn invalid(flag: &str, value: &str, expected: &'static str) -> ArgsError {
    ArgsError::InvalidValue {
        flag: format!("--{flag}"),
        value: value.to_string(),
        expected,
    }
}

impl Args {
    /// Parse the process arguments, program name excluded
    ///
    /// Accepts `--flag`, `--flag=value`, `--flag value`, `-f value`, `-fVALUE`
    /// and bundled short switches such as `-mc`.
    pub fn parse_from<I, S>(words: I) -> Result<Command, ArgsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        let mut args = Args::default();
        let mut rest = words.iter();

        while let Some(word) = rest.next() {
            if let Some(long) = word.strip_prefix("--") {
                let (name, inline) = match long.split_once('=') {
                    Some((name, value)) => (name, Some(value.to_string())),
                    None => (long, None),
                };
                let name = name.replace('_', "-");
                match name.as_str() {
                    "help" => return Ok(Command::Help),
                    "version" => return Ok(Command::Version),
                    _ => {}
                }

                if takes_value(&name) {
                    let value = match inline {
                        Some(value) => value,
                        None => rest
                            .next()
                            .cloned()
                            .ok_or_else(|| ArgsError::MissingValue(format!("--{name}")))?,
                    };
                    args.set_value(&name, &value)?;
                } else if inline.is_some() {
                    return Err(ArgsError::UnexpectedValue(format!("--{name}")));
                } else {
                    args.set_switch(&name)
                        .ok_or_else(|| ArgsError::UnknownArgument(word.clone()))?;
                }
            } else if let Some(shorts) = word.strip_prefix('-')
                && !shorts.is_empty()
            {
                for (idx, short) in shorts.char_indices() {
                    let name = long_name(short)
                        .ok_or_else(|| ArgsError::UnknownArgument(format!("-{short}")))?;
                    match name {
                        "help" => return Ok(Command::Help),
                        "version" => return Ok(Command::Version),
                        _ => {}
                    }

                    if takes_value(name) {
                        let attached = &shorts[idx + short.len_utf8()..];
                        let value = if attached.is_empty() {
                            rest.next()
                                .cloned()
                                .ok_or_else(|| ArgsError::MissingValue(format!("-{short}")))?
                        } else {
                            attached.to_string()
                        };
                        args.set_value(name, &value)?;
                        break;
                    }
                    args.set_switch(name)
                        .ok_or_else(|| ArgsError::UnknownArgument(format!("-{short}")))?;
                }
            } else {
                return Err(ArgsError::UnknownArgument(word.clone()));
            }
        }

        if args.all && args.marked {
            return Err(ArgsError::Conflict("-a/--all", "-m/--marked"));
        }
        if args.default_spool && args.rainbow_line {
            return Err(ArgsError::Conflict("-d/--default-spool", "-R/--rainbow-line"));
        }

        Ok(Command::Run(args))
    }

    fn set_switch(&mut self, name: &str) -> Option<()> {
        let switch = match name {
            "all" => &mut self.all,
            "marked" => &mut self.marked,
            "default-spool" => &mut self.default_spool,
            "rainbow-line" => &mut self.rainbow_line,
            "coffee" => &mut self.coffee,
            "alcohol" => &mut self.alcohol,
            "refill" => &mut self.refill,
            "harvest" => &mut self.harvest,
            "email" => &mut self.email,
            "plot" => &mut self.plot,
            "shutdown" => &mut self.shutdown,
            "dump" => &mut self.dump,
            _ => return None,
        };
        *switch = true;
        Some(())
    }

    fn set_value(&mut self, name: &str, value: &str) -> Result<(), ArgsError> {
        match name {
            "config" => self.config = Some(PathBuf::from(value)),
            "frame" => self.frame = Some(PathBuf::from(value)),
            "strategy" => self.strategy = Some(value.to_string()),
            "pid" => {
                let pid = value
                    .parse::<usize>()
                    .map_err(|_| invalid(name, value, "a profile id"))?;
                self.pid = Some(pid);
            }
            "fishes-in-keepnet" => {
                self.fishes_in_keepnet = value
                    .parse::<i64>()
                    .map_err(|_| invalid(name, value, "an integer"))?;
            }
            "boat-ticket-duration" => {
                let duration = value
                    .parse::<u32>()
                    .ok()
                    .filter(|d| TICKET_DURATIONS.contains(d))
                    .ok_or_else(|| invalid(name, value, "one of 1, 2, 3, 5"))?;
                self.boat_ticket_duration = Some(duration);
            }
            "window-origin" => {
                let origin: (i32, i32) = value
                    .split_once(',')
                    .and_then(|(x, y)| Some((x.trim().parse().ok()?, y.trim().parse().ok()?)))
                    .ok_or_else(|| invalid(name, value, "X,Y"))?;
                self.window_origin = origin;
            }
            _ => return Err(ArgsError::UnknownArgument(format!("--{name}"))),
        }
        Ok(())
    }
}

impl ArgSource for Args {
    fn arg_value(&self, flag: &str) -> Option<SettingValue> {
        let value = match flag {
            "marked" => SettingValue::Bool(self.marked),
            "rainbow-line" => SettingValue::Bool(self.rainbow_line),
            "coffee" => SettingValue::Bool(self.coffee),
            "alcohol" => SettingValue::Bool(self.alcohol),
            "refill" => SettingValue::Bool(self.refill),
            "harvest" => SettingValue::Bool(self.harvest),
            "email" => SettingValue::Bool(self.email),
            "plot" => SettingValue::Bool(self.plot),
            "shutdown" => SettingValue::Bool(self.shutdown),
            "fishes-in-keepnet" => SettingValue::Int(self.fishes_in_keepnet),
            "boat-ticket-duration" => self
                .boat_ticket_duration
                .map_or(SettingValue::Null, |d| SettingValue::Int(d as i64)),
            "strategy" => self
                .strategy
                .clone()
                .map_or(SettingValue::Null, SettingValue::Str),
            _ => return None,
        };
        Some(value)
    }
}

/// Split a command string into words with POSIX shell quoting and escapes
pub fn split_words(line: &str) -> Result<Vec<String>, ArgsError> {
    shlex::split(line).ok_or_else(|| ArgsError::UnterminatedQuote(line.to_string()))
}

pub fn print_help() {
    println!("🎣 RF4 Perception - screen perception and configuration for Russian Fishing 4");
    println!();
    println!("USAGE:");
    println!("    rf4-perception [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --config=PATH                Configuration file (default: config.ini)");
    println!("    -p, --pid=N                  Profile id, prompted for when missing");
    println!("    -a, --all                    Keep all captured fishes (default)");
    println!("    -m, --marked                 Keep only marked fishes");
    println!("    -d, --default-spool          Detect retrieval end with the default spool (default)");
    println!("    -R, --rainbow-line           Detect retrieval end with the rainbow line");
    println!("    -c, --coffee                 Drink coffee when energy runs low");
    println!("    -A, --alcohol                Drink alcohol periodically");
    println!("    -r, --refill                 Refill hunger and comfort bars");
    println!("    -H, --harvest                Harvest baits while waiting");
    println!("    -e, --email                  Send an email when the session ends");
    println!("    -P, --plot                   Plot catch statistics when the session ends");
    println!("    -s, --shutdown               Shut down the computer when the session ends");
    println!("    -n, --fishes-in-keepnet=N    Fishes already in the keepnet (default: 0)");
    println!("    -t, --boat-ticket-duration=N Boat ticket to renew: 1, 2, 3 or 5 hours");
    println!("    --strategy=NAME              Override the profile's fishing strategy");
    println!("    --frame=PNG                  Probe every query against a screenshot");
    println!("    --window-origin=X,Y          Game window position for --frame (default: 0,0)");
    println!("    --dump                       Print the resolved settings as JSON");
    println!("    -h, --help                   Show this help message");
    println!("    -v, --version                Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    rf4-perception --pid=1 -m");
    println!("    rf4-perception --pid=2 --strategy=marine --dump");
    println!("    rf4-perception --pid=1 --frame=screenshot.png --window-origin=0,0");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(words: &[&str]) -> Args {
        match Args::parse_from(words.iter().copied()) {
            Ok(Command::Run(args)) => args,
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_no_arguments() {
        let args = run(&[]);
        assert_eq!(args, Args::default());
        assert_eq!(args.fishes_in_keepnet, 0);
    }

    #[test]
    fn test_value_forms() {
        assert_eq!(run(&["--pid=3"]).pid, Some(3));
        assert_eq!(run(&["--pid", "3"]).pid, Some(3));
        assert_eq!(run(&["-p", "3"]).pid, Some(3));
        assert_eq!(run(&["-p3"]).pid, Some(3));
        assert_eq!(run(&["-n", "-1"]).fishes_in_keepnet, -1);
        assert_eq!(run(&["--fishes_in_keepnet=12"]).fishes_in_keepnet, 12);
    }

    #[test]
    fn test_bundled_switches() {
        let args = run(&["-mcR", "-t2"]);
        assert!(args.marked && args.coffee && args.rainbow_line);
        assert!(!args.alcohol);
        assert_eq!(args.boat_ticket_duration, Some(2));

        let args = run(&["-An", "7"]);
        assert!(args.alcohol);
        assert_eq!(args.fishes_in_keepnet, 7);
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(Args::parse_from(["--pid=1", "--help"]), Ok(Command::Help));
        assert_eq!(Args::parse_from(["-h"]), Ok(Command::Help));
        assert_eq!(Args::parse_from(["--version"]), Ok(Command::Version));
    }

    #[test]
    fn test_mutually_exclusive_pairs() {
        assert!(matches!(
            Args::parse_from(["-a", "-m"]),
            Err(ArgsError::Conflict(..))
        ));
        assert!(matches!(
            Args::parse_from(["--rainbow-line", "--default-spool"]),
            Err(ArgsError::Conflict(..))
        ));
        assert!(Args::parse_from(["-a", "-R"]).is_ok());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Args::parse_from(["-t", "4"]),
            Err(ArgsError::InvalidValue { .. })
        ));
        assert!(matches!(
            Args::parse_from(["--pid=x"]),
            Err(ArgsError::InvalidValue { .. })
        ));
        assert!(matches!(
            Args::parse_from(["--window-origin=10"]),
            Err(ArgsError::InvalidValue { .. })
        ));
        assert_eq!(
            Args::parse_from(["--pid"]),
            Err(ArgsError::MissingValue("--pid".to_string()))
        );
        assert_eq!(
            Args::parse_from(["--coffee=yes"]),
            Err(ArgsError::UnexpectedValue("--coffee".to_string()))
        );
    }

    #[test]
    fn test_unknown_arguments() {
        assert_eq!(
            Args::parse_from(["--turbo"]),
            Err(ArgsError::UnknownArgument("--turbo".to_string()))
        );
        assert_eq!(
            Args::parse_from(["-x"]),
            Err(ArgsError::UnknownArgument("-x".to_string()))
        );
        assert!(Args::parse_from(["stray"]).is_err());
    }

    #[test]
    fn test_window_origin() {
        assert_eq!(run(&["--window-origin=-8,31"]).window_origin, (-8, 31));
    }

    #[test]
    fn test_arg_source_covers_common_args() {
        let args = run(&["-m", "--strategy=float", "-n", "4"]);
        for spec in COMMON_ARGS {
            let value = args
                .arg_value(spec.flag)
                .unwrap_or_else(|| panic!("{} missing from the argument source", spec.flag));
            assert!(value.conforms_to(spec.ty), "{} has the wrong type", spec.flag);
        }
        assert_eq!(args.arg_value("marked"), Some(SettingValue::Bool(true)));
        assert_eq!(args.arg_value("strategy"), Some(SettingValue::Str("float".into())));
        assert_eq!(args.arg_value("boat-ticket-duration"), Some(SettingValue::Null));
        assert_eq!(args.arg_value("frame"), None);
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("  -m   --pid=2 ").unwrap(), vec!["-m", "--pid=2"]);
        assert_eq!(
            split_words("--frame='my shot.png' -c").unwrap(),
            vec!["--frame=my shot.png", "-c"]
        );
        assert_eq!(split_words("\"\"").unwrap(), vec![""]);
        assert!(split_words("").unwrap().is_empty());
        assert!(matches!(
            split_words("--frame='open"),
            Err(ArgsError::UnterminatedQuote(_))
        ));
    }

    #[test]
    fn test_split_words_honours_backslashes() {
        assert_eq!(
            split_words(r"--frame=my\ shot.png -c").unwrap(),
            vec!["--frame=my shot.png", "-c"]
        );
        assert_eq!(
            split_words(r#"--strategy "sp\"in""#).unwrap(),
            vec!["--strategy", "sp\"in"]
        );
        assert_eq!(split_words(r"'a\b'").unwrap(), vec![r"a\b"]);
        assert!(split_words("-m \\").is_err(), "trailing backslash");
    }
}
