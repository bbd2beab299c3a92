//! `veil encode ...` and `veil decode`.

use std::path::Path;

use anyhow::{Context, Result, bail};
use veil_application::workflow::Notification;
use veil_application::{OperationWorkflow, SubmitOutcome};
use veil_core::media::{OperationKind, SlotId};
use veil_infrastructure::load_blob;

use crate::context::AppContext;
use crate::output::{self, fail};

pub async fn encode_text(ctx: &AppContext, cover: &Path, message: String) -> Result<()> {
    ctx.require_login()?;
    let workflow = ctx.workflow(OperationKind::TextInImage);
    select(&workflow, SlotId::CoverImage, cover).await?;
    workflow.set_message(message);
    run(&workflow).await
}

pub async fn encode_image(ctx: &AppContext, cover: &Path, hidden: &Path) -> Result<()> {
    ctx.require_login()?;
    let workflow = ctx.workflow(OperationKind::ImageInImage);
    select(&workflow, SlotId::CoverImage, cover).await?;
    select(&workflow, SlotId::HiddenImage, hidden).await?;
    run(&workflow).await
}

pub async fn encode_audio(ctx: &AppContext, cover: &Path, audio: &Path) -> Result<()> {
    ctx.require_login()?;
    let workflow = ctx.workflow(OperationKind::AudioInImage);
    select(&workflow, SlotId::CoverImage, cover).await?;
    select(&workflow, SlotId::AudioFile, audio).await?;
    run(&workflow).await
}

pub async fn decode(ctx: &AppContext, image: &Path) -> Result<()> {
    ctx.require_login()?;
    let workflow = ctx.workflow(OperationKind::Decode);
    select(&workflow, SlotId::EncodedImage, image).await?;
    run(&workflow).await
}

async fn select(workflow: &OperationWorkflow, slot: SlotId, path: &Path) -> Result<()> {
    let blob = load_blob(path)
        .await
        .with_context(|| format!("Could not load the {}", slot.label()))?;
    workflow
        .select_file(slot, blob)
        .map_err(|e| fail(&Notification::for_validation(workflow.kind(), &e)))?;
    Ok(())
}

async fn run(workflow: &OperationWorkflow) -> Result<()> {
    let kind = workflow.kind();
    let outcome = workflow.submit().await;
    let view = workflow.view();
    workflow.teardown();

    match (&outcome, outcome.notification(kind)) {
        (SubmitOutcome::Settled(Ok(_)), Some(note)) => {
            output::notify(&note);
            if let Some(view) = view {
                output::result(&view);
            }
            Ok(())
        }
        (_, Some(note)) => Err(fail(&note)),
        (_, None) => bail!("The {} request did not complete.", kind.title()),
    }
}
