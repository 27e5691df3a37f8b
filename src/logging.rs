// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt::Layer, prelude::*, registry::Registry, EnvFilter};

static SERVER_LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize logging for the stdio server with daily file rotation.
/// Logs go to files only; stdout carries protocol frames and nothing else.
pub fn init_server_logging(debug_mode: bool) -> Result<(), anyhow::Error> {
    let log_dir = crate::storage::get_logs_dir()?;

    SERVER_LOG_DIR
        .set(log_dir.clone())
        .map_err(|_| anyhow::anyhow!("Failed to set log directory"))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "server.log");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_mode {
            EnvFilter::new("info,clinresolve=debug")
        } else {
            EnvFilter::new("info")
        }
    });

    // JSON for structured tier/outcome fields
    let file_layer = Layer::new()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json();

    Registry::default().with(file_layer).with(env_filter).init();

    info!(
        log_directory = %log_dir.display(),
        debug_mode = debug_mode,
        "Server logging initialized"
    );

    Ok(())
}

/// Get the current log directory
pub fn get_log_directory() -> Option<PathBuf> {
    SERVER_LOG_DIR.get().cloned()
}
