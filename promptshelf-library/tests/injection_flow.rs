use async_trait::async_trait;
use promptshelf_library::{
    JsonFileStore, KeyValueStore, LibraryError, LibraryState, MemoryStore, MovePosition,
    Result, TextInjector, WizardEvent, WizardStatus,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Collects injected text, or fails as if no destination were open
#[derive(Default)]
struct RecordingInjector {
    delivered: Mutex<Vec<String>>,
    missing_target: bool,
}

#[async_trait]
impl TextInjector for RecordingInjector {
    async fn inject(&self, text: &str) -> Result<()> {
        if self.missing_target {
            return Err(LibraryError::InjectionTargetNotFound(
                "no open editor".to_string(),
            ));
        }
        self.delivered.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Reads succeed, writes always fail
struct ReadOnlyStore;

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>> {
        Ok(None)
    }

    async fn set(&self, key: &str, _value: Value) -> Result<()> {
        Err(LibraryError::storage(format!("cannot write {key}")))
    }
}

async fn memory_library() -> LibraryState {
    LibraryState::load(Arc::new(MemoryStore::new())).await.unwrap()
}

#[tokio::test]
async fn test_full_injection_with_back_navigation() {
    let mut library = memory_library().await;
    let id = library
        .add_prompt(
            None,
            "Review",
            "Review this {{lang}} code for {{focus|correctness}}. Use {{lang}} idioms.",
        )
        .await
        .unwrap();

    let mut session = library.begin_injection(&id).unwrap();
    library
        .advance(&mut session, WizardEvent::Submit("go".into()))
        .await
        .unwrap();
    library.advance(&mut session, WizardEvent::Back).await.unwrap();

    let step = session.step(library.history()).unwrap();
    assert_eq!(step.step.prefill, "go");
    assert_eq!(step.history, vec!["go"]);

    library
        .advance(&mut session, WizardEvent::Submit("rust".into()))
        .await
        .unwrap();
    let step = session.step(library.history()).unwrap();
    assert_eq!(step.step.name, "focus");
    assert!(step.step.is_last);
    library
        .advance(&mut session, WizardEvent::Submit(String::new()))
        .await
        .unwrap();

    let injector = RecordingInjector::default();
    let text = library.finish_injection(&session, &injector).await.unwrap();
    assert_eq!(
        text,
        "Review this rust code for correctness. Use rust idioms."
    );
    assert_eq!(injector.delivered.lock().unwrap().as_slice(), [text.as_str()]);

    assert_eq!(library.history().values("lang"), ["rust", "go"]);
    assert_eq!(library.history().values("focus"), ["correctness"]);
    let prompt = library.forest().find(&id).unwrap().as_prompt().unwrap();
    assert_eq!(prompt.use_count, Some(1));
}

#[tokio::test]
async fn test_metacharacter_names_substituted_literally() {
    let mut library = memory_library().await;
    let id = library
        .add_prompt(None, "Odd", "value: {{a.b*c}} / {{ a.b*c }} / {{abbbc}}")
        .await
        .unwrap();

    let mut session = library.begin_injection(&id).unwrap();
    assert_eq!(session.declarations().len(), 2);
    library
        .advance(&mut session, WizardEvent::Submit("X".into()))
        .await
        .unwrap();
    library
        .advance(&mut session, WizardEvent::Submit("Y".into()))
        .await
        .unwrap();

    assert_eq!(session.render().unwrap(), "value: X / X / Y");
}

#[tokio::test]
async fn test_cancelled_injection_is_not_delivered() {
    let mut library = memory_library().await;
    let id = library.add_prompt(None, "P", "{{a}} {{b}}").await.unwrap();

    let mut session = library.begin_injection(&id).unwrap();
    library
        .advance(&mut session, WizardEvent::Submit("first".into()))
        .await
        .unwrap();
    library.advance(&mut session, WizardEvent::Cancel).await.unwrap();
    assert_eq!(session.status(), &WizardStatus::Cancelled);

    let injector = RecordingInjector::default();
    let result = library.finish_injection(&session, &injector).await;
    assert!(matches!(result, Err(LibraryError::InjectionCancelled)));
    assert!(injector.delivered.lock().unwrap().is_empty());

    assert_eq!(library.history().values("a"), ["first"]);
    let prompt = library.forest().find(&id).unwrap().as_prompt().unwrap();
    assert_eq!(prompt.use_count, None);
}

#[tokio::test]
async fn test_missing_target_does_not_count_usage() {
    let mut library = memory_library().await;
    let id = library.add_prompt(None, "Plain", "no variables").await.unwrap();
    let session = library.begin_injection(&id).unwrap();

    let injector = RecordingInjector {
        missing_target: true,
        ..Default::default()
    };
    let result = library.finish_injection(&session, &injector).await;

    assert!(matches!(
        result,
        Err(LibraryError::InjectionTargetNotFound(_))
    ));
    let prompt = library.forest().find(&id).unwrap().as_prompt().unwrap();
    assert_eq!(prompt.use_count, None);
}

#[tokio::test]
async fn test_storage_failures_propagate() {
    let mut library = LibraryState::load(Arc::new(ReadOnlyStore)).await.unwrap();

    let err = library.add_folder(None, "Work").await.unwrap_err();
    assert!(matches!(err, LibraryError::Storage(_)));
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(temp.path()));

    let (folder, prompt) = {
        let mut library = LibraryState::load(store.clone()).await.unwrap();
        let folder = library.add_folder(None, "Work").await.unwrap();
        let prompt = library
            .add_prompt(None, "Summarize", "Summarize {{text}}")
            .await
            .unwrap();
        let moved = library
            .move_node(&prompt, &folder, MovePosition::Inside)
            .await
            .unwrap();
        assert!(moved.is_moved());

        let mut session = library.begin_injection(&prompt).unwrap();
        library
            .advance(&mut session, WizardEvent::Submit("the notes".into()))
            .await
            .unwrap();
        (folder, prompt)
    };

    let library = LibraryState::load(store).await.unwrap();
    assert_eq!(library.forest().roots().len(), 1);
    assert_eq!(
        library.forest().find_parent(&prompt).unwrap().id,
        folder
    );
    assert_eq!(library.history().values("text"), ["the notes"]);
    assert!(library.last_modified().is_some());
}

#[tokio::test]
async fn test_export_then_import_into_fresh_library() {
    let mut source = memory_library().await;
    let folder = source.add_folder(None, "Writing").await.unwrap();
    source
        .add_prompt(Some(folder.as_str()), "Blog", "Write about {{topic}}")
        .await
        .unwrap();
    let id = source.duplicate(&folder).await.unwrap().unwrap();
    assert!(source.rename(&id, "Writing v2").await.unwrap());

    let exported = serde_json::to_string_pretty(&source.export()).unwrap();

    let mut target = memory_library().await;
    target.import(&exported).await.unwrap();
    assert_eq!(target.forest(), source.forest());
    assert_eq!(target.forest().roots()[1].title(), "Writing v2");
}
