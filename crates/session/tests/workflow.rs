use injectpad_bridge::{
    extract_context, finalize_response, run_payload, FinalizeResponse, CODE_FIELD,
    FINALIZE_ARGUMENT_KEY,
};
use injectpad_catalog::{load_in_background, Catalog};
use injectpad_core::FALLBACK_SCRIPT;
use injectpad_session::{EditorSession, Overwrite, SessionState};
use injectpad_storage::{FileStorage, MemoryStorage, SavedCodeStore};
use serde_json::json;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn end_to_end_edit_save_and_finalize_flow() {
    // Host invokes the extension: run payload in, context out.
    let payload = run_payload("Example Domain", "https://example.com/");
    let context = extract_context(&payload);

    let dir = tempdir().expect("temp dir");
    let storage_path = dir.path().join("saved.json");
    let store = SavedCodeStore::new(Box::new(FileStorage::new(&storage_path)));
    let mut session = EditorSession::new(context, store);
    assert_eq!(session.context().title(), "Example Domain");

    // Catalog publishes while the user is already editing.
    session.attach_catalog(Catalog::builtin().into_snippets());
    session.insert_snippet(0).unwrap();
    assert_eq!(session.buffer().contents(), "alert(message);");

    // Save-then-run with a fresh name.
    session.begin_save().unwrap();
    let result = session.submit_name("show message", Overwrite::Deny).unwrap();
    assert_eq!(session.state(), SessionState::Finalized);

    // Finalize hands exactly the edited code to the host.
    let FinalizeResponse::Execute(payload) = finalize_response(Some(result.code())) else {
        panic!("expected an execute payload");
    };
    assert_eq!(
        payload[FINALIZE_ARGUMENT_KEY][CODE_FIELD],
        json!("alert(message);")
    );

    // A later invocation sees the saved entry and can load it.
    let store = SavedCodeStore::new(Box::new(FileStorage::new(&storage_path)));
    let mut next = EditorSession::new(extract_context(&json!({})), store);
    assert_eq!(next.saved_names(), vec!["show message"]);
    let prompt = next.request_load("show message").unwrap();
    next.confirm_load(prompt).unwrap();
    assert_eq!(next.buffer().contents(), "alert(message);");
}

#[test]
fn run_then_finalize_delivers_code_regardless_of_context() {
    for payload in [
        run_payload("A page", "https://a.example/"),
        json!({}),
        json!(null),
    ] {
        let context = extract_context(&payload);
        let store = SavedCodeStore::new(Box::new(MemoryStorage::new()));
        let mut session = EditorSession::new(context, store);
        session.insert_text("x").unwrap();
        let result = session.finish_without_saving().unwrap();

        let FinalizeResponse::Execute(out) = finalize_response(Some(result.code())) else {
            panic!("expected an execute payload");
        };
        assert_eq!(out[FINALIZE_ARGUMENT_KEY][CODE_FIELD], json!("x"));
    }
}

#[test]
fn cancelling_sends_no_payload_to_the_host() {
    let store = SavedCodeStore::new(Box::new(MemoryStorage::new()));
    let mut session = EditorSession::new(extract_context(&json!({})), store);
    session.insert_text("alert('never runs');").unwrap();
    session.cancel();
    assert_eq!(session.state(), SessionState::Cancelled);

    // A cancelled session produced no result, so the host gets NoResult.
    assert_eq!(finalize_response(None), FinalizeResponse::NoResult);
}

#[test]
fn untouched_buffer_finalizes_to_the_fallback_script() {
    let store = SavedCodeStore::new(Box::new(MemoryStorage::new()));
    let mut session = EditorSession::new(extract_context(&json!({})), store);
    let result = session.finish_without_saving().unwrap();

    let FinalizeResponse::Execute(payload) = finalize_response(Some(result.code())) else {
        panic!("expected an execute payload");
    };
    assert_eq!(
        payload[FINALIZE_ARGUMENT_KEY][CODE_FIELD],
        json!(FALLBACK_SCRIPT)
    );
}

#[test]
fn catalog_loads_off_the_interactive_path() {
    let dir = tempdir().expect("temp dir");
    let catalog_path = dir.path().join("snippets.js");
    std::fs::write(
        &catalog_path,
        "// MARK: Code snippets.\n\n// MARK: greet.\nalert('hi');",
    )
    .unwrap();

    let store = SavedCodeStore::new(Box::new(MemoryStorage::new()));
    let mut session = EditorSession::new(extract_context(&json!({})), store);
    let rx = load_in_background(&catalog_path);

    // The editor is usable before the catalog arrives.
    session.insert_text("// warming up\n").unwrap();
    assert!(session.snippets().is_empty());

    let catalog = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("publish")
        .expect("parse");
    session.attach_catalog(catalog.into_snippets());
    session.insert_snippet(0).unwrap();
    assert_eq!(session.buffer().contents(), "// warming up\nalert('hi');");
}
