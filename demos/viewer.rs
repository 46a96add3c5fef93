//! Runs the viewer with the headless recording backend: a window, the full
//! interaction machinery, no GPU. Swap the factory for a real scene-graph
//! backend to see pixels.

use anyhow::Result;
use log::LevelFilter;

use deckview::app::{BoxedBackend, ViewerApp};
use deckview::catalog::CardCatalog;
use deckview::config::ViewerConfig;
use deckview::render::HeadlessBackend;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .init();

    let app = ViewerApp::new("deckview - 1989 Score")
        .with_config(ViewerConfig::default())
        .with_catalog(CardCatalog::score_1989())
        .with_backend_factory(Box::new(|_window| {
            Ok(Box::new(HeadlessBackend::new()) as BoxedBackend)
        }));

    app.run()?;
    Ok(())
}
