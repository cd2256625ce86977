//! Meeting List Lite CLI
//!
//! Entry point for the `mll` command-line tool.

use clap::{Parser, Subcommand};
use meeting_list_lite::{
    validate_and_normalize_config, Embed, SettingField, Settings, ShortcodeAttrs,
};
use mll_sanitize::audit_custom_css;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mll")]
#[command(about = "TSML UI meeting list embed", version)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the embed snippet
    Render {
        /// Path to settings file (default: mll.toml)
        #[arg(long, short = 's')]
        settings: Option<PathBuf>,

        /// Data source for this embed, overriding the stored one
        #[arg(long)]
        data_src: Option<String>,

        /// Timezone for this embed, overriding the stored one
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Print the effective widget configuration
    Resolve {
        /// Path to settings file (default: mll.toml)
        #[arg(long, short = 's')]
        settings: Option<PathBuf>,

        /// Data source to resolve for, overriding the stored one
        #[arg(long)]
        data_src: Option<String>,

        /// Include profile and override provenance
        #[arg(long, conflicts_with = "get")]
        explain: bool,

        /// Print only the value at a dot-separated path (e.g. strings.en.types.BT)
        #[arg(long)]
        get: Option<String>,
    },

    /// Validate and normalize a widget configuration override
    ValidateConfig {
        /// File to read (default: stdin)
        file: Option<PathBuf>,

        /// Report failures as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Sanitize custom CSS
    SanitizeCss {
        /// File to read (default: stdin)
        file: Option<PathBuf>,
    },

    /// Update a stored setting
    Set {
        /// Path to settings file (default: mll.toml)
        #[arg(long, short = 's')]
        settings: Option<PathBuf>,

        /// Output failures as JSON
        #[arg(long)]
        json: bool,

        /// Setting name (data_src, google_key, base_path, timezone, tsml_config, custom_css)
        field: String,

        /// New value ("-" reads stdin)
        value: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            settings,
            data_src,
            timezone,
        } => run_render(settings, ShortcodeAttrs { data_src, timezone }),
        Commands::Resolve {
            settings,
            data_src,
            explain,
            get,
        } => run_resolve(settings, data_src, explain, get),
        Commands::ValidateConfig { file, json } => run_validate_config(file, json),
        Commands::SanitizeCss { file } => run_sanitize_css(file),
        Commands::Set {
            settings,
            json,
            field,
            value,
        } => run_set(settings, &field, &value, json),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn settings_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from(meeting_list_lite::settings::DEFAULT_SETTINGS_FILE))
}

fn load_settings(path: &Path) -> Settings {
    match Settings::load(path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    }
}

fn read_input(file: Option<PathBuf>) -> String {
    let result = match file {
        Some(path) => fs::read_to_string(&path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    match result {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            process::exit(1);
        }
    }
}

fn run_render(settings_path_arg: Option<PathBuf>, attrs: ShortcodeAttrs) {
    let settings = load_settings(&settings_path(settings_path_arg));

    match Embed::new(&settings).render(&attrs) {
        Ok(html) => println!("{}", html),
        Err(e) => {
            eprintln!("Error rendering embed: {}", e);
            process::exit(1);
        }
    }
}

fn run_resolve(
    settings_path_arg: Option<PathBuf>,
    data_src: Option<String>,
    explain: bool,
    get: Option<String>,
) {
    let settings = load_settings(&settings_path(settings_path_arg));
    let attrs = ShortcodeAttrs {
        data_src,
        timezone: None,
    };
    let source = attrs.effective_data_src(&settings);
    let effective = settings
        .resolver()
        .explain(Some(settings.tsml_config.as_str()), &source);

    let output = if explain {
        effective.to_json()
    } else if let Some(path) = get {
        match effective.get(&path) {
            Some(value) => serde_json::to_string_pretty(value),
            None => {
                eprintln!("Error: no value at '{}'", path);
                process::exit(1);
            }
        }
    } else {
        serde_json::to_string_pretty(&effective.config)
    };
    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_validate_config(file: Option<PathBuf>, json_output: bool) {
    let input = read_input(file);

    match validate_and_normalize_config(&input) {
        Ok(normalized) => println!("{}", normalized),
        Err(e) => {
            report_validation_failure(&e, json_output);
            process::exit(1);
        }
    }
}

fn run_sanitize_css(file: Option<PathBuf>) {
    let input = read_input(file);
    let (output, rules) = audit_custom_css(&input);
    for rule in &rules {
        eprintln!("removed: {}", rule);
    }
    print!("{}", output);
}

fn run_set(settings_path_arg: Option<PathBuf>, field: &str, value: &str, json_output: bool) {
    let path = settings_path(settings_path_arg);
    let mut settings = load_settings(&path);

    let field: SettingField = match field.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };
    let value = if value == "-" {
        read_input(None)
    } else {
        value.to_string()
    };

    if let Err(e) = settings.update(field, &value) {
        report_validation_failure(&e, json_output);
        eprintln!("Stored value of '{}' left unchanged", field);
        process::exit(1);
    }

    if let Err(e) = settings.write_to_file(&path) {
        eprintln!("Error writing settings: {}", e);
        process::exit(1);
    }
    println!("{} = {:?}", field, settings.get(field));
}

fn report_validation_failure(e: &meeting_list_lite::ValidationError, json_output: bool) {
    if json_output {
        match serde_json::to_string_pretty(&e.to_failure()) {
            Ok(json) => println!("{}", json),
            Err(err) => eprintln!("Error serializing output: {}", err),
        }
    } else {
        eprintln!("Error [{}] {}: {}", e.code(), e.field(), e);
    }
}
