use clap::{Parser, Subcommand, ValueEnum};
use simple_srcset::config::{self, Config};
use simple_srcset::imaging::{EncoderProfile, RustBackend};
use simple_srcset::markup::MarkupRequest;
use simple_srcset::session::{Session, Upload};
use simple_srcset::{export, output, planner};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-srcset")]
#[command(about = "Generate responsive AVIF variants and <img srcset> markup")]
#[command(long_about = "\
Generate responsive AVIF variants and <img srcset> markup

Give it one photo. It plans a set of widths, re-encodes the photo as AVIF at
each of them, keeps the original as the widest candidate, and prints an <img>
element ready to paste:

  <img
   src=\"/images/hero.jpg\"
   srcset=\"/images/hero-400.avif 400w,
   /images/hero-800.avif 800w,
   /images/hero-1200.avif 1200w,
   /images/hero.jpg 1600w\"
   sizes=\"(max-width: 768px) 50vw, 1600px\"
   width=\"1600\"
   height=\"1067\"
   alt=\"hero\"
   loading=\"lazy\"
  />

Width planning:
  original   ¼, ½, ¾ and 1× the source width (½, 0.8, 1× for sources ≤ 420px)
  rendered   0.6× and 1× the width the image is displayed at, plus the source

Run 'simple-srcset gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (missing file means stock defaults)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Output directory for packaged variants (overrides output.dir)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show source info and the planned widths without encoding anything
    Plan {
        /// Image to inspect
        image: PathBuf,

        /// Also plan around this displayed width (px)
        #[arg(long)]
        rendered_width: Option<u32>,
    },
    /// Encode variants, print the markup and package the results
    Generate(GenerateArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum AutoMode {
    Original,
    Rendered,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Image to process
    image: PathBuf,

    /// Manual width list, e.g. 400,800,1200 (replaces the automatic plan)
    #[arg(long, value_delimiter = ',')]
    widths: Vec<String>,

    /// Automatic planning mode when no --widths are given
    #[arg(long, value_enum, default_value = "original")]
    auto: AutoMode,

    /// Width the image is displayed at (px); drives `sizes` and the src pick
    #[arg(long)]
    rendered_width: Option<u32>,

    /// Alt text (derived from the filename when absent)
    #[arg(long)]
    alt: Option<String>,

    /// AVIF quality for the standard profile (1-100)
    #[arg(long)]
    quality: Option<u32>,

    /// Use the reduced-quality encoder profile
    #[arg(long)]
    reduced_quality: bool,

    /// Copy the markup to the system clipboard
    #[arg(long)]
    copy: bool,

    /// Skip writing the <name>-responsive.zip package
    #[arg(long)]
    no_package: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Plan {
            image,
            rendered_width,
        } => {
            let config = config::load_config(&cli.config)?;
            let quality = config.encode.effective_quality();
            let mut session = Session::new(RustBackend::new(), quality, config.markup);

            let source = session.load(read_upload(&image)?)?;
            let source_width = source.width;
            output::print_source_info(source);
            output::print_widths("from original", session.widths());
            if let Some(rendered) = rendered_width {
                output::print_widths(
                    "from rendered",
                    &planner::from_rendered(rendered, source_width),
                );
            }
        }
        Command::Generate(args) => {
            let mut config = config::load_config(&cli.config)?;
            apply_overrides(&mut config, &args)?;
            let out_dir = cli
                .output
                .unwrap_or_else(|| PathBuf::from(&config.output.dir));
            run_generate(&config, &args, &out_dir)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Layer the encoder flags on top of the loaded config.
fn apply_overrides(config: &mut Config, args: &GenerateArgs) -> Result<(), config::ConfigError> {
    if let Some(quality) = args.quality {
        config.encode.quality = quality;
    }
    if args.reduced_quality {
        config.encode.profile = EncoderProfile::Reduced;
    }
    config.validate()
}

fn read_upload(path: &Path) -> std::io::Result<Upload> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Upload { name, bytes })
}

fn run_generate(
    config: &Config,
    args: &GenerateArgs,
    out_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(
        RustBackend::new(),
        config.encode.effective_quality(),
        config.markup.clone(),
    );

    let source = session.load(read_upload(&args.image)?)?;
    output::print_source_info(source);

    if !args.widths.is_empty() {
        let list = session.widths_mut();
        list.clear();
        for text in &args.widths {
            if !list.add_str(text) {
                log::warn!("ignoring width {:?}", text);
            }
        }
        output::print_widths("manual", session.widths());
    } else {
        match (args.auto, args.rendered_width) {
            (AutoMode::Rendered, Some(rendered)) => {
                if session.auto_from_rendered(rendered)? {
                    output::print_widths("from rendered", session.widths());
                } else {
                    output::print_widths("from original", session.widths());
                }
            }
            (AutoMode::Rendered, None) => {
                log::warn!("--auto rendered needs --rendered-width; planning from original");
                output::print_widths("from original", session.widths());
            }
            (AutoMode::Original, _) => {
                output::print_widths("from original", session.widths());
            }
        }
    }

    let request = MarkupRequest {
        rendered_width: args.rendered_width,
        alt_text: args.alt.clone(),
    };

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_generate_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = session.generate(&request, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    let report = result?;

    output::print_results(&report);
    output::print_markup(&report.markup.html);

    let package_path = match (args.no_package, session.source()) {
        (false, Some(source)) => Some(export::package(&report, source, out_dir)?),
        _ => None,
    };

    // Clipboard failure only affects the copy, not the run
    let copied = args.copy
        && match export::copy_to_clipboard(&report.markup.html) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("Could not copy markup: {}", e);
                false
            }
        };

    output::print_export(package_path.as_deref(), copied);
    Ok(())
}
