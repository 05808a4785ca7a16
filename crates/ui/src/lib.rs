//! Desktop front end: lists, inputs and previews around an [`editor::EditorSession`].
mod app;
pub mod preview;

use std::path::PathBuf;

use editor::EditorConfig;

pub use crate::app::EditorApp;

/// Opens the editor window and blocks until it is closed.
pub fn run(initial: Option<PathBuf>) -> Result<(), eframe::Error> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("HTML Editor")
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([860.0, 560.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "htmledit",
        native_options,
        Box::new(move |_cc| Ok(Box::new(EditorApp::new(EditorConfig::default(), initial)))),
    )
}
