//! Filesystem endpoint over a JSON-lines file.

use crate::core::context::Context;
use crate::core::endpoint::{Endpoint, EndpointCore};
use crate::core::error::{Error, Result};
use crate::core::events::EndpointEvent;
use crate::core::flow::Flow;
use crate::core::record::{Record, Selector};
use async_stream::try_stream;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast;

/// An endpoint persisting records as one JSON document per line.
///
/// A missing file reads as an empty sequence; `push` creates it on
/// demand. `clear(Selector::All)` removes the file, a field selector
/// rewrites it keeping only non-matching lines.
pub struct FilesystemEndpoint {
    core: EndpointCore,
    path: PathBuf,
}

impl FilesystemEndpoint {
    pub fn new(name: impl Into<String>, ctx: Arc<Context>, path: impl AsRef<Path>) -> Self {
        Self {
            core: EndpointCore::new(name, ctx),
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file this endpoint reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Endpoint for FilesystemEndpoint {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn context(&self) -> &Arc<Context> {
        self.core.context()
    }

    fn subscribe_events(&self) -> broadcast::Receiver<EndpointEvent> {
        self.core.subscribe()
    }

    fn read_with(&self, selector: Selector) -> Flow {
        let core = self.core.clone();
        let path = self.path.clone();
        Flow::new(move || {
            let core = core.clone();
            let path = path.clone();
            let selector = selector.clone();
            Box::pin(try_stream! {
                core.send_start();
                let file = core.check_read(match fs::File::open(&path).await {
                    Ok(file) => Ok(Some(file)),
                    Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                    Err(err) => Err(Error::produce(err)),
                })?;
                if let Some(file) = file {
                    let mut lines = BufReader::new(file).lines();
                    loop {
                        let next =
                            core.check_read(lines.next_line().await.map_err(Error::produce))?;
                        let line = match next {
                            Some(line) => line,
                            None => break,
                        };
                        if line.trim().is_empty() {
                            continue;
                        }
                        let record: Record = core
                            .check_read(serde_json::from_str(&line).map_err(Error::produce))?;
                        if !selector.matches(&record) {
                            continue;
                        }
                        core.context().wait_while_paused().await;
                        core.send_data(&record);
                        yield record;
                    }
                }
                core.send_end();
            })
        })
    }

    async fn push(&self, record: Record) -> Result<()> {
        let mut line = serde_json::to_string(&record).map_err(Error::mutation)?;
        line.push('\n');
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(Error::mutation)?;
            }
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(Error::mutation)?;
        file.write_all(line.as_bytes()).await.map_err(Error::mutation)?;
        file.flush().await.map_err(Error::mutation)?;
        self.core.send_push(&record);
        Ok(())
    }

    async fn clear(&self, selector: Selector) -> Result<()> {
        match &selector {
            Selector::All => match fs::remove_file(&self.path).await {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(Error::mutation(err)),
            },
            Selector::Fields(_) => {
                let contents = match fs::read_to_string(&self.path).await {
                    Ok(contents) => contents,
                    Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
                    Err(err) => return Err(Error::mutation(err)),
                };
                let mut kept = String::new();
                for line in contents.lines() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let record: Record = serde_json::from_str(line).map_err(Error::mutation)?;
                    if !selector.matches(&record) {
                        kept.push_str(line);
                        kept.push('\n');
                    }
                }
                fs::write(&self.path, kept).await.map_err(Error::mutation)?;
            }
        }
        self.core.send_clear(&selector);
        Ok(())
    }
}
