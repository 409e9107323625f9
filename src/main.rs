use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::io::BufReader;
use tokio::task::LocalSet;

use interlinear::core::{
    format_output_path, parse_document, print_error_message, translate_document,
    InterlinearError, InterlinearOptions,
};
use interlinear::env::{self as envvars, EnvVar};
use interlinear::serve::run_command_loop;
use interlinear::translation::{
    ConfigManager, Controller, RenderLayout, TranslationClient, TranslationConfig,
};

#[derive(Parser, Debug)]
#[command(version, about = "Render HTML documents with paragraph-level interlinear translations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a document once and write the bilingual result
    Translate {
        /// Input HTML file, or "-" for stdin
        input: String,

        /// Output file; supports %title%, %lang%, %timestamp% and %extension%
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Load a document and answer JSON-line commands on stdin/stdout
    Serve {
        /// Input HTML file (stdin carries the commands)
        input: String,

        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Write an example configuration file
    InitConfig {
        #[arg(default_value = "interlinear.toml")]
        path: PathBuf,
    },
    /// Print the supported environment variables
    Env,
}

#[derive(Args, Debug, Default)]
struct SettingsArgs {
    /// Configuration file (defaults to the standard search paths)
    #[arg(short, long)]
    config: Option<String>,

    /// Target language code
    #[arg(short, long)]
    target_lang: Option<String>,

    /// Source language code, or "auto" to read <html lang>
    #[arg(short, long)]
    source_lang: Option<String>,

    /// Translation provider: deeplx or google
    #[arg(short, long)]
    provider: Option<String>,

    /// Translation API endpoint
    #[arg(short = 'u', long)]
    api_url: Option<String>,

    /// Pause between consecutive paragraphs in milliseconds
    #[arg(short, long)]
    delay_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Placement of translated text
    #[arg(short, long, value_enum)]
    layout: Option<LayoutArg>,

    /// Input character encoding (detected from the document by default)
    #[arg(short = 'i', long)]
    input_encoding: Option<String>,

    /// Output character encoding (same as input by default)
    #[arg(short = 'E', long)]
    encoding: Option<String>,

    /// Do not memoize translations
    #[arg(long)]
    no_cache: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    Stacked,
    SideBySide,
}

impl From<LayoutArg> for RenderLayout {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::Stacked => RenderLayout::Stacked,
            LayoutArg::SideBySide => RenderLayout::SideBySide,
        }
    }
}

impl SettingsArgs {
    fn options(&self) -> InterlinearOptions {
        InterlinearOptions {
            target_lang: self.target_lang.clone(),
            source_lang: self.source_lang.clone(),
            api_url: self.api_url.clone(),
            provider: self.provider.clone(),
            unit_delay_ms: self.delay_ms,
            request_timeout_secs: self.timeout,
            layout: self.layout.map(RenderLayout::from),
            input_encoding: self.input_encoding.clone(),
            output_encoding: self.encoding.clone(),
            no_cache: self.no_cache,
        }
    }

    /// 配置文件 → 环境变量 → 命令行参数
    fn load_config(&self) -> Result<(TranslationConfig, InterlinearOptions), InterlinearError> {
        let manager = match &self.config {
            Some(path) => ConfigManager::from_path(path)?,
            None => ConfigManager::new()?,
        };

        let mut config = manager.into_config();
        let options = self.options();
        options.apply_to(&mut config)?;

        Ok((config, options))
    }
}

fn init_logging() {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
        Err(_) => tracing_subscriber::EnvFilter::new(
            envvars::core::LogLevel::get().unwrap_or_else(|_| "info".to_string()),
        ),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!envvars::core::NoColor::get_or_default(false))
        .with_writer(io::stderr)
        .init();
}

fn read_input(input: &str) -> Result<Vec<u8>, InterlinearError> {
    if input == "-" {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        Ok(data)
    } else {
        fs::read(input)
            .map_err(|e| InterlinearError::new(&format!("could not read {}: {}", input, e)))
    }
}

async fn run_translate(
    input: &str,
    output: Option<&str>,
    settings: &SettingsArgs,
) -> Result<(), InterlinearError> {
    let (config, options) = settings.load_config()?;
    let target_lang = config.target_lang.clone();
    let data = read_input(input)?;

    let (result, title, report) = translate_document(&data, &options, config).await?;

    tracing::info!(
        "{} of {} paragraphs rendered ({} kept original text)",
        report.rendered,
        report.found,
        report.fallbacks
    );

    match output {
        Some(path) if path != "-" => {
            let path = format_output_path(path, title.as_deref(), &target_lang);
            fs::write(&path, result)
                .map_err(|e| InterlinearError::new(&format!("could not write {}: {}", path, e)))?;
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&result)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

async fn run_serve(input: &str, settings: &SettingsArgs) -> Result<(), InterlinearError> {
    if input == "-" {
        return Err(InterlinearError::new(
            "serve reads commands from stdin; pass the document as a file",
        ));
    }

    let (config, options) = settings.load_config()?;
    let data = read_input(input)?;

    let (dom, _) = parse_document(&data, options.input_encoding.as_deref())?;
    let client = TranslationClient::from_config(&config)?;
    let controller = Rc::new(Controller::new(dom, client, config));

    tracing::info!("ready for commands on stdin");

    let local = LocalSet::new();
    local
        .run_until(run_command_loop(
            controller,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        ))
        .await?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match &cli.command {
        Commands::Translate {
            input,
            output,
            settings,
        } => run_translate(input, output.as_deref(), settings).await,
        Commands::Serve { input, settings } => run_serve(input, settings).await,
        Commands::InitConfig { path } => {
            let path = path.to_string_lossy();
            ConfigManager::generate_example_config(&path)
                .map(|_| println!("Wrote {}", path))
                .map_err(InterlinearError::from)
        }
        Commands::Env => {
            print!("{}", envvars::generate_env_docs());
            Ok(())
        }
    };

    if let Err(error) = result {
        print_error_message(&format!("Error: {}", error));
        process::exit(1);
    }
}
