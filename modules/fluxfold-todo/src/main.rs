use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fluxfold_engine::Changes;
use fluxfold_todo::{JsonFileStorage, MemoryStorage, TodoConfig, TodoList, TodoStorage, TodoStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fluxfold=info".parse()?))
        .init();

    info!("fluxfold todo demo starting...");

    let config = TodoConfig::from_env();

    let storage: Arc<dyn TodoStorage> = match &config.storage_path {
        Some(path) => {
            info!(path = %path.display(), "Using JSON file storage");
            Arc::new(JsonFileStorage::new(path))
        }
        None => {
            info!("No FLUXFOLD_TODO_PATH set, using in-memory storage");
            Arc::new(MemoryStorage::new())
        }
    };

    let store = TodoStore::local(storage, config.store.clone())?;
    store.log();
    let mut changes = store.changes();

    store.load_all()?;
    let loaded = next_snapshot(&mut changes).await?;
    info!(todos = loaded.len(), "Loaded stored todos");

    store.create("Write the fold loop")?;
    store.create("   ")?; // rejected by the handler
    store.create("Ship it")?;
    next_snapshot(&mut changes).await?;
    let created = next_snapshot(&mut changes).await?;

    let first = created
        .iter()
        .filter(|t| t.text == "Write the fold loop")
        .last()
        .cloned()
        .context("expected the first created todo")?;
    store.toggle_complete(&first)?;
    next_snapshot(&mut changes).await?;

    store.clear_completed()?;
    let list = next_snapshot(&mut changes).await?;

    println!("\n=== Todos ({} active) ===", list.active_count());
    for todo in list.iter() {
        let mark = if todo.completed { "x" } else { " " };
        println!("[{mark}] {}  ({})", todo.text, todo.id);
    }

    Ok(())
}

async fn next_snapshot(changes: &mut Changes<TodoList>) -> Result<Arc<TodoList>> {
    tokio::time::timeout(Duration::from_secs(5), changes.next())
        .await
        .context("timed out waiting for the store")?
        .context("store stopped publishing")
}
