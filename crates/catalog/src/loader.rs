use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::{Catalog, CatalogError};

/// Loads a catalog file off the interactive path.
/// （在互動流程之外載入目錄檔案。）
///
/// Exactly one message is published on the returned channel. There is no
/// cancellation: a session that has already ended simply drops the receiver
/// and the result is discarded. A read failure is published as the error
/// variant so callers can degrade to an empty snippet list.
pub fn load_in_background(path: impl AsRef<Path>) -> Receiver<Result<Catalog, CatalogError>> {
    let path = path.as_ref().to_path_buf();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = Catalog::load_from(&path);
        if let Err(error) = &result {
            log::warn!("snippet catalog unavailable: {error}");
        }
        // The receiver may already be gone; a failed send is not an error.
        let _ = tx.send(result);
    });
    rx
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn background_load_publishes_parsed_catalog() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("snippets.js");
        fs::write(&path, "Header\n\n// MARK: A.\ncodeA").unwrap();

        let rx = load_in_background(&path);
        let catalog = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("publish")
            .expect("parse");
        assert_eq!(catalog.snippets().len(), 1);
        assert_eq!(catalog.snippets()[0].name, "A");
    }

    #[test]
    fn missing_file_publishes_read_error() {
        let dir = tempdir().expect("temp dir");
        let rx = load_in_background(dir.path().join("absent.js"));
        let result = rx.recv_timeout(Duration::from_secs(5)).expect("publish");
        assert!(matches!(result, Err(CatalogError::Read { .. })));
    }

    #[test]
    fn dropped_receiver_does_not_panic_the_loader() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("snippets.js");
        fs::write(&path, "Header\n\n// MARK: A.\ncodeA").unwrap();

        drop(load_in_background(&path));
        // The loader thread exits quietly; nothing to assert beyond no panic.
    }
}
