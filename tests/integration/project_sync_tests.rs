/*!
 * Integration tests for project persistence, sync and export
 */

use anyhow::Result;
use chrono::Duration;
use std::sync::Arc;

use subgen::app_config::Config;
use subgen::app_controller::Controller;
use subgen::file_utils::FileManager;
use subgen::formats::SubtitleFormat;
use subgen::project::{
    JsonFileProjectStore, LastWriteWins, MediaType, Project, ProjectStatus, ProjectStore,
};

use crate::common;

#[test]
fn test_jsonStore_syncWith_shouldPersistLastWriteWinsResult() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("projects.json");

    let local = Project::new("Interview", MediaType::Audio).with_document(common::sample_document());
    let stale = Project::new("Stale", MediaType::Video);
    let store = JsonFileProjectStore::new(&path);
    store.save(local.clone())?;
    store.save(stale.clone())?;

    let mut remote_edit = local.clone();
    remote_edit.status = ProjectStatus::Completed;
    remote_edit.updated_at = local.updated_at + Duration::minutes(10);
    let mut outdated_remote = stale.clone();
    outdated_remote.name = "Outdated".to_string();
    outdated_remote.updated_at = stale.updated_at - Duration::minutes(10);

    store.sync_with(vec![remote_edit.clone(), outdated_remote], &LastWriteWins)?;

    let reopened = JsonFileProjectStore::new(&path);
    let projects = reopened.load_all()?;
    assert_eq!(projects.len(), 2);
    assert_eq!(reopened.get(&local.id)?.status, ProjectStatus::Completed);
    assert_eq!(reopened.get(&stale.id)?.name, "Stale");
    Ok(())
}

#[test]
fn test_exportProject_shouldWriteDocumentInRequestedFormat() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store_path = temp_dir.path().join("store").join("projects.json");

    let mut config = Config::default();
    config.store.path = Some(store_path.clone());
    let controller = Controller::with_config(config)?;

    let project = Project::new("Launch: v2/final", MediaType::Video)
        .with_document(common::sample_document());
    controller.save_project(project.clone())?;
    assert!(store_path.exists());

    let out_dir = temp_dir.path().join("out");
    let output = controller.export_project(&project.id, SubtitleFormat::Vtt, &out_dir, false)?;

    assert_eq!(output, out_dir.join("Launch__v2_final.vtt"));
    let vtt = FileManager::read_to_string(&output)?;
    assert!(vtt.contains("00:00:04.500 --> 00:00:07.250\nYou are a bold one."));

    // Second export without force refuses to overwrite
    assert!(controller
        .export_project(&project.id, SubtitleFormat::Vtt, &out_dir, false)
        .is_err());
    Ok(())
}

#[test]
fn test_exportProject_withUnknownId_shouldFail() -> Result<()> {
    let controller = Controller::with_store(
        Config::default(),
        Arc::new(subgen::project::MemoryProjectStore::new()),
    );
    let temp_dir = common::create_temp_dir()?;

    assert!(controller
        .export_project("missing", SubtitleFormat::Srt, temp_dir.path(), true)
        .is_err());
    assert!(controller.projects()?.is_empty());
    Ok(())
}
