//! The album build: thumbnails, questions, finishing, harvest.
//!
//! ```text
//! 1. Queue     every thumbnail into the ThumbnailPool (≤ max_processes running)
//! 2. Ask       per image, in order: wait for its thumbnail, open a viewer,
//!              ask caption + rotation, close the viewer (SIGTERM)
//! 3. Finish    hand the image to a background finisher (medium copy and
//!              deferred rotations), on a pool of max_processes workers
//! 4. Harvest   collect finisher results in album order → Album
//! ```
//!
//! Steps 1–3 overlap: while the user answers questions about image *n*, the
//! pool is still converting later thumbnails and finishers are working on
//! earlier images.
//!
//! ## Failure
//!
//! The first error stops the album. Thumbnail children that are still
//! running are terminated when the pool is dropped; finishers that were
//! already handed out are allowed to complete before the error is returned.

use crate::album::{Album, AlbumItem};
use crate::config::{self, AlbumConfig};
use crate::finish::{self, FinishPlan};
use crate::html;
use crate::naming::{self, OutputNames};
use crate::pool::{PoolError, ThumbnailPool};
use crate::prompt::{PromptError, Prompter};
use crate::tools::{ImageTool, Job, ResizeParams, Rotation, Scale, ToolError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions picked up when a directory is given as input.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "tif", "tiff"];

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source image not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("no images to process")]
    NoImages,
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("prompt failed: {0}")]
    Prompt(#[from] PromptError),
    #[error("finishing image #{index} failed: {source}")]
    Finisher {
        index: usize,
        #[source]
        source: ToolError,
    },
    #[error("no result from the finisher for image #{0}")]
    FinisherLost(usize),
    #[error("could not start finisher workers: {0}")]
    Workers(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Album(#[from] crate::album::AlbumError),
}

/// Settings for one album build.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub output_dir: PathBuf,
    pub thumbnail_scale: Scale,
    pub medium_scale: Scale,
    /// Limit for running thumbnail children and for finisher workers.
    pub max_processes: usize,
    /// Open a viewer on each thumbnail while asking about it.
    pub show_display: bool,
}

impl PipelineOptions {
    pub fn from_config(config: &AlbumConfig, output_dir: &Path, show_display: bool) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            thumbnail_scale: config.sizes.thumbnail,
            medium_scale: config.sizes.medium,
            max_processes: config::effective_processes(&config.processing),
            show_display,
        }
    }
}

/// Progress notifications, in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    ThumbnailsQueued {
        count: usize,
        max_processes: usize,
    },
    ThumbnailReady {
        index: usize,
        source: PathBuf,
        thumbnail: PathBuf,
    },
    Captioned {
        index: usize,
        caption: String,
        rotation: Option<Rotation>,
    },
    ItemFinished {
        index: usize,
        medium: PathBuf,
        rotation: Option<Rotation>,
    },
    AlbumWritten {
        index_html: PathBuf,
        manifest: PathBuf,
        items: usize,
    },
}

/// Expand the command-line paths into the list of images to process.
///
/// Files are taken as given, in order. Directories are walked depth first
/// with the entries of every directory ordered by file name, so a
/// subdirectory's images come where its name sorts among its siblings.
/// Entries that cannot be read are skipped with a warning.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, PipelineError> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        log::warn!("skipping unreadable entry under {}: {e}", path.display());
                        None
                    }
                })
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| is_image(p));
            inputs.extend(found);
        } else if path.is_file() {
            inputs.push(path.clone());
        } else {
            return Err(PipelineError::SourceNotFound(path.clone()));
        }
    }
    if inputs.is_empty() {
        return Err(PipelineError::NoImages);
    }
    Ok(inputs)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Run the album pipeline and return the harvested album.
///
/// Does not write `manifest.json` or `index.html`; see [`build`].
pub fn run<T, P>(
    tool: &T,
    prompter: &mut P,
    inputs: &[PathBuf],
    options: &PipelineOptions,
    on_event: &mut dyn FnMut(&PipelineEvent),
) -> Result<Album, PipelineError>
where
    T: ImageTool + ?Sized,
    P: Prompter + ?Sized,
{
    if inputs.is_empty() {
        return Err(PipelineError::NoImages);
    }
    std::fs::create_dir_all(&options.output_dir)?;

    let names: Vec<OutputNames> = inputs
        .iter()
        .enumerate()
        .map(|(i, source)| naming::output_names(&options.output_dir, i + 1, source))
        .collect();

    // Stage 1: thumbnails
    let mut pool = ThumbnailPool::new(options.max_processes);
    for (i, (source, names)) in inputs.iter().zip(&names).enumerate() {
        pool.queue(
            i + 1,
            tool.resize(&ResizeParams {
                source: source.clone(),
                output: names.thumbnail.clone(),
                scale: options.thumbnail_scale,
            }),
        );
    }
    pool.fill()?;
    on_event(&PipelineEvent::ThumbnailsQueued {
        count: inputs.len(),
        max_processes: pool.capacity(),
    });

    let workers = rayon::ThreadPoolBuilder::new()
        .num_threads(options.max_processes.max(1))
        .thread_name(|i| format!("finisher-{i}"))
        .build()?;
    let (tx, rx) = mpsc::channel();

    // Stages 2 + 3: questions on this thread, finishers on the workers.
    let asked = workers.in_place_scope(|scope| -> Result<Vec<FinishPlan>, PipelineError> {
        let mut plans = Vec::with_capacity(inputs.len());
        for (i, (source, names)) in inputs.iter().zip(&names).enumerate() {
            let index = i + 1;
            pool.wait_for(index)?;
            on_event(&PipelineEvent::ThumbnailReady {
                index,
                source: source.clone(),
                thumbnail: names.thumbnail.clone(),
            });

            let (caption, rotation) =
                ask_about(tool, prompter, index, source, &names.thumbnail, options)?;
            on_event(&PipelineEvent::Captioned {
                index,
                caption: caption.clone(),
                rotation,
            });

            let plan = FinishPlan {
                index,
                source: source.clone(),
                names: names.clone(),
                medium_scale: options.medium_scale,
                rotation,
                caption,
            };
            let job = plan.clone();
            let tx = tx.clone();
            scope.spawn(move |_| {
                let result = finish::finish(tool, &job);
                // The receiver outlives the scope, so this cannot fail.
                let _ = tx.send((job.index, result));
            });
            plans.push(plan);
        }
        Ok(plans)
    });
    // Every spawned finisher has completed once the scope returns.
    drop(pool);
    let mut results: BTreeMap<usize, Result<(), ToolError>> = rx.try_iter().collect();
    let plans = asked?;

    // Stage 4: harvest in album order
    let mut items = Vec::with_capacity(plans.len());
    for plan in plans {
        let index = plan.index;
        match results.remove(&index) {
            Some(Ok(())) => {}
            Some(Err(source)) => return Err(PipelineError::Finisher { index, source }),
            None => return Err(PipelineError::FinisherLost(index)),
        }
        on_event(&PipelineEvent::ItemFinished {
            index,
            medium: plan.names.medium.clone(),
            rotation: plan.rotation,
        });
        items.push(AlbumItem {
            index,
            thumbnail: naming::relative_to(&plan.names.thumbnail, &options.output_dir),
            medium: naming::relative_to(&plan.names.medium, &options.output_dir),
            source: plan.source,
            caption: plan.caption,
            rotation: plan.rotation,
        });
    }

    Ok(Album { items })
}

/// Show the thumbnail (when enabled) and ask the two questions.
///
/// The viewer is closed whether or not the questions succeed. A viewer that
/// cannot be started is not fatal: the questions are asked without it.
fn ask_about<T, P>(
    tool: &T,
    prompter: &mut P,
    index: usize,
    source: &Path,
    thumbnail: &Path,
    options: &PipelineOptions,
) -> Result<(String, Option<Rotation>), PipelineError>
where
    T: ImageTool + ?Sized,
    P: Prompter + ?Sized,
{
    let viewer: Option<Job> = if options.show_display {
        match tool.display(thumbnail).spawn(format!("display #{index}")) {
            Ok(job) => Some(job),
            Err(e) => {
                log::warn!("could not show thumbnail #{index}: {e}");
                None
            }
        }
    } else {
        None
    };

    let answers = prompter.caption(index, source).and_then(|caption| {
        prompter
            .rotation(index, source)
            .map(|rotation| (caption, rotation))
    });

    if let Some(viewer) = viewer {
        viewer.terminate()?;
    }
    Ok(answers?)
}

/// Run the pipeline, then write `manifest.json` and `index.html` into the
/// output directory.
pub fn build<T, P>(
    tool: &T,
    prompter: &mut P,
    inputs: &[PathBuf],
    options: &PipelineOptions,
    title: &str,
    on_event: &mut dyn FnMut(&PipelineEvent),
) -> Result<Album, PipelineError>
where
    T: ImageTool + ?Sized,
    P: Prompter + ?Sized,
{
    let album = run(tool, prompter, inputs, options, on_event)?;
    let manifest = album.save(&options.output_dir)?;
    let index_html = html::write_index(&album, &options.output_dir, title)?;
    on_event(&PipelineEvent::AlbumWritten {
        index_html,
        manifest,
        items: album.len(),
    });
    Ok(album)
}
