//! Release processing pipeline
//!
//! Releases are processed strictly one at a time, assets within a
//! release one at a time. The first failure anywhere aborts the whole
//! run; already-staged files are not cleaned up.

use crate::context::OpsCtx;
use crate::pack::invoke_releaser;
use crate::RunReport;
use gh2npm_archive::normalize;
use gh2npm_config::constants;
use gh2npm_errors::Error;
use gh2npm_events::{Event, EventSenderExt};
use gh2npm_github::{version_from_tag, Release};
use gh2npm_net::download_file;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Execute a full run: resolve releases, stage and package each one
///
/// With a tag override the single-release path is taken and the full
/// list is never fetched.
///
/// # Errors
///
/// Returns the first error from any pipeline stage; remaining releases
/// are not processed.
pub async fn run(ctx: &OpsCtx) -> Result<RunReport, Error> {
    let config = &ctx.config;
    let mut versions = Vec::new();

    if let Some(tag) = &config.tag {
        ctx.tx.emit(Event::ReleaseFetching { tag: tag.clone() });
        let release = ctx
            .github
            .get_release_by_tag(&config.owner, &config.repo, tag)
            .await?;
        versions.push(publish_release(ctx, &release).await?);
    } else {
        ctx.tx.emit(Event::ReleaseListStarted {
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        });
        let releases = ctx
            .github
            .list_all_releases(&config.owner, &config.repo)
            .await?;
        ctx.tx.emit(Event::ReleaseListCompleted {
            count: releases.len(),
        });

        for release in &releases {
            versions.push(publish_release(ctx, release).await?);
        }
    }

    Ok(RunReport {
        versions,
        dry_run: !config.publish,
    })
}

/// Stage one release's assets and hand them to the releaser
async fn publish_release(ctx: &OpsCtx, release: &Release) -> Result<String, Error> {
    let config = &ctx.config;
    let version = version_from_tag(&release.tag_name).to_string();

    ctx.tx.emit(Event::ReleaseProcessing {
        tag: release.tag_name.clone(),
        version: version.clone(),
        asset_count: release.assets.len(),
    });

    reset_staging(&config.staging_dir, ctx).await?;

    for asset in &release.assets {
        if asset.name == constants::CHECKSUM_MANIFEST {
            ctx.tx.emit(Event::AssetSkipped {
                name: asset.name.clone(),
            });
            continue;
        }

        let staged = download_file(
            &ctx.net,
            &asset.browser_download_url,
            &config.staging_dir,
            &asset.name,
            &ctx.tx,
        )
        .await?;

        normalize(&staged.path, &asset.name, &config.name, &ctx.tx).await?;
    }

    invoke_releaser(config, &version, &ctx.tx).await?;

    ctx.tx.emit(Event::ReleaseCompleted {
        version: version.clone(),
    });

    Ok(version)
}

/// Wipe and recreate the staging directory
///
/// The directory is left populated after the run; only the start of a
/// release wipes it.
async fn reset_staging(dir: &Path, ctx: &OpsCtx) -> Result<(), Error> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io_with_path(&e, dir)),
    }

    fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::io_with_path(&e, dir))?;

    ctx.tx.emit(Event::StagingReset {
        path: dir.to_path_buf(),
    });
    Ok(())
}
