//! Background finishing work for one image.
//!
//! Once the user has captioned an image and decided on its rotation, the
//! rest is mechanical and runs off the interactive thread:
//!
//! 1. `convert -resize <medium>` the source into the medium copy
//! 2. if a rotation was chosen, rotate the medium copy in place
//! 3. ... and the thumbnail in place, so the index page shows it upright
//!
//! Each step is a child process that is waited on before the next starts.

use crate::naming::OutputNames;
use crate::tools::{ImageTool, ResizeParams, RotateParams, Rotation, Scale, ToolError};
use std::path::PathBuf;

/// Everything a finisher needs, decided on the interactive thread.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishPlan {
    pub index: usize,
    pub source: PathBuf,
    pub names: OutputNames,
    pub medium_scale: Scale,
    pub rotation: Option<Rotation>,
    pub caption: String,
}

/// Run the finishing steps for `plan`, stopping at the first failure.
pub fn finish<T: ImageTool + ?Sized>(tool: &T, plan: &FinishPlan) -> Result<(), ToolError> {
    let index = plan.index;

    tool.resize(&ResizeParams {
        source: plan.source.clone(),
        output: plan.names.medium.clone(),
        scale: plan.medium_scale,
    })
    .run(format!("medium #{index}"))?;

    if let Some(rotation) = plan.rotation {
        for (what, path) in [("medium", &plan.names.medium), ("thumbnail", &plan.names.thumbnail)] {
            tool.rotate(&RotateParams {
                source: path.clone(),
                output: path.clone(),
                rotation,
            })
            .run(format!("rotate {what} #{index}"))?;
        }
    }

    log::debug!("finished #{index} ({})", plan.source.display());
    Ok(())
}
