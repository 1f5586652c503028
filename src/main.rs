//! Todo Store binary entry point
//!
//! Opens the configured store and reports what it holds. With `export` as
//! the first argument it also writes a timestamped export snapshot.

use todo_store::{store::export_file_name_now, Config, TodoStore};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config decides the final level, so loading logs through a bootstrap subscriber
    let bootstrap = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, Config::load)?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level()?)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Todo Store with data file {}", config.data_file.display());

    let store = TodoStore::open(config.data_file.clone()).await;
    let tasks = store.list().await;
    let done = tasks.iter().filter(|task| task.completed).count();
    info!(
        "{} tasks ({} completed), next id {}",
        tasks.len(),
        done,
        store.next_id().await
    );

    if std::env::args().nth(1).as_deref() == Some("export") {
        let path = config.export_dir.join(export_file_name_now());
        store.export_to_path(&path).await?;
    }

    Ok(())
}
