// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! TutorGPT CLI entrypoint.
//!
//! Runs the interactive TUI. Subjects persist under `<data-dir>/storage` unless `--demo` is
//! given, in which case nothing is written.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use tutorgpt::api::{HttpTutorClient, TutorBackend};
use tutorgpt::chat::ChatSession;
use tutorgpt::config::{Overrides, TutorConfig};
use tutorgpt::store::{LocalPersistence, MemoryStorage, StorageDir};
use tutorgpt::subjects::SubjectStore;

#[derive(Debug, Parser)]
#[command(name = "tutorgpt", version, about = "Terminal client for the TutorGPT study assistant")]
struct Cli {
    /// Tutor service base URL (skips origin resolution).
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Browser origin used to derive the service URL inside a codespace.
    #[arg(long, value_name = "URL")]
    origin: Option<String>,

    /// Directory for stored subjects and the log file.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[arg(long, value_name = "ID")]
    student_id: Option<String>,

    /// Config file to read instead of the default location. Must exist.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep subjects in memory only.
    #[arg(long)]
    demo: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_base: self.api_base.clone(),
            origin: self.origin.clone(),
            data_dir: self.data_dir.clone(),
            student_id: self.student_id.clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("tutorgpt: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = TutorConfig::load(&cli.overrides(), cli.config.as_deref())?;
    if !tutorgpt::logging::init(&config.log_path())? {
        eprintln!("tutorgpt: logging already initialised");
    }
    tracing::info!(
        base_url = %config.base_url,
        data_dir = %config.data_dir.display(),
        demo = cli.demo,
        "starting tutorgpt"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let backend: Arc<dyn TutorBackend> = Arc::new(HttpTutorClient::new(
        config.base_url.clone(),
        config.request_timeout,
    )?);
    let chat = ChatSession::new(config.student_id.clone());
    let handle = runtime.handle().clone();

    if cli.demo {
        let store = SubjectStore::open(LocalPersistence::new(MemoryStorage::new()));
        tutorgpt::tui::run(store, chat, backend, handle)
    } else {
        let storage =
            StorageDir::new(config.storage_dir()).with_durability(config.write_durability);
        let store = SubjectStore::open(LocalPersistence::new(storage));
        tutorgpt::tui::run(store, chat, backend, handle)
    }
}
