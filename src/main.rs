use clap::{Parser, Subcommand};
use photo_album::album::Album;
use photo_album::config::{self, AlbumConfig};
use photo_album::naming;
use photo_album::pipeline::{self, PipelineOptions};
use photo_album::prompt::{AutoPrompter, LinePrompter};
use photo_album::tools::MagickTool;
use photo_album::{html, menu, output};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-album")]
#[command(about = "Build a captioned photo album with ImageMagick")]
#[command(long_about = "\
Build a captioned photo album with ImageMagick

Every image is processed by external programs run as child processes:

  convert -resize 10%  <image> <out>/NNN-<name>-thumb.<ext>    (in parallel)
  display <thumbnail>                                           (while asking)
  convert -resize 25%  <image> <out>/NNN-<name>-medium.<ext>   (in background)
  convert -rotate ±90  ...                                      (if requested)

For each image, in order, the thumbnail is shown and you are asked for a
caption and whether to rotate it. The result is <out>/index.html plus a
manifest.json that 'photo-album html' can re-render.

Run 'photo-album gen-config' to generate a documented album.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./album.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log child process activity (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate thumbnails, ask for captions, and write the album
    Build {
        /// Images, or directories to search for images
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output directory
        #[arg(long, default_value = "album")]
        output: PathBuf,
        /// Do not open a viewer on each thumbnail
        #[arg(long)]
        no_display: bool,
        /// Do not ask; caption from file names, never rotate
        #[arg(long)]
        no_prompt: bool,
    },
    /// Re-render index.html from an existing manifest.json
    Html {
        /// Output directory of a previous build
        #[arg(long, default_value = "album")]
        output: PathBuf,
    },
    /// Interactive menu: display, thumbnail and rotate single images
    Menu,
    /// List the images a build would process, without running anything
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long, default_value = "album")]
        output: PathBuf,
    },
    /// Print a stock album.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let album_config = load_album_config(cli.config.as_ref())?;
    let tool = MagickTool::from_config(&album_config.tools);

    match cli.command {
        Command::Build {
            paths,
            output: out_dir,
            no_display,
            no_prompt,
        } => {
            let inputs = pipeline::collect_inputs(&paths)?;
            let options = PipelineOptions::from_config(&album_config, &out_dir, !no_display);
            let title = &album_config.html.title;
            let mut on_event = |event: &pipeline::PipelineEvent| output::print_event(event);

            if no_prompt {
                pipeline::build(&tool, &mut AutoPrompter, &inputs, &options, title, &mut on_event)?;
            } else {
                let mut prompter = LinePrompter::new(
                    io::stdin().lock(),
                    io::stdout(),
                    album_config.prompt.max_input_len,
                );
                pipeline::build(&tool, &mut prompter, &inputs, &options, title, &mut on_event)?;
            }
        }
        Command::Html { output: out_dir } => {
            let album = Album::load(&out_dir)?;
            let index_html = html::write_index(&album, &out_dir, &album_config.html.title)?;
            output::print_album(&album, &index_html);
        }
        Command::Menu => {
            let mut prompter = LinePrompter::new(
                io::stdin().lock(),
                io::stdout(),
                album_config.prompt.max_input_len,
            );
            let session = menu::run(&tool, &mut prompter, album_config.sizes.thumbnail)?;
            if session.failures() > 0 {
                return Err(format!("{} conversion(s) failed", session.failures()).into());
            }
        }
        Command::Check {
            paths,
            output: out_dir,
        } => {
            let inputs = pipeline::collect_inputs(&paths)?;
            let planned: Vec<_> = inputs
                .into_iter()
                .enumerate()
                .map(|(i, source)| {
                    let names = naming::output_names(&out_dir, i + 1, &source);
                    (source, names)
                })
                .collect();
            output::print_check_output(&planned);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `--verbose`.
fn init_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

/// An explicit `--config` must exist; the implicit `album.toml` is optional.
fn load_album_config(path: Option<&PathBuf>) -> Result<AlbumConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config(path, true),
        None => config::load_config(std::path::Path::new(config::DEFAULT_CONFIG_FILE), false),
    }
}
