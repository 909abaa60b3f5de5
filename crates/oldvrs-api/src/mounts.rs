//! Static file mounts
//!
//! Each recording folder is served under its own prefix; the web root serves
//! the operator's static assets and must be registered last.

use actix_files::Files;
use actix_web::web;
use oldvrs_core::models::{Folder, RecordingPaths};
use std::path::Path;
use tracing::{info, warn};

/// Log every folder mount, warning about directories that don't exist
pub fn announce_folders(folders: &[Folder]) {
    for folder in folders {
        info!("VR{}: {}", folder.folder_id, folder.datapath);
        if !Path::new(&folder.datapath).is_dir() {
            warn!(
                "Recording folder {} is not a directory: {}",
                folder.folder_id, folder.datapath
            );
        }
    }
}

/// Serve each folder's recordings under its mount prefix
pub fn mount_folders(cfg: &mut web::ServiceConfig, folders: &[Folder], paths: &RecordingPaths) {
    for folder in folders {
        cfg.service(Files::new(&paths.mount_prefix(folder.folder_id), &folder.datapath));
    }
}

/// Serve the web root from `dir`
pub fn mount_static(cfg: &mut web::ServiceConfig, dir: &str) {
    cfg.service(Files::new("/", dir).index_file("index.html"));
}
