//! End-to-end archive behavior against an in-memory database.

use bytes::Bytes;
use content_store::{ContentStore, ContentStoreConfig};

use arkiv_daemon::archive::catalogs;
use arkiv_daemon::archive::documents::{
    self, ContentPayload, ContentUpload, DocumentPatch, NewDocument,
};
use arkiv_daemon::archive::search::{self, SearchFilter};
use arkiv_daemon::archive::{audit, ArchiveError, Requester};
use arkiv_daemon::database::models::{DocumentPermission, User, DOCUMENT_TYPES, TAGS};
use arkiv_daemon::database::types::{Privacy, Role};
use arkiv_daemon::database::Database;
use arkiv_daemon::ServiceState;

async fn fixture() -> ServiceState {
    ServiceState::for_testing().await
}

async fn register(db: &Database, login: &str, role: Role) -> Requester {
    let user_id = User::insert(db, login, "irrelevant-hash", None, role)
        .await
        .unwrap();
    Requester {
        user_id,
        is_admin: role.is_admin(),
    }
}

fn titled(title: &str) -> NewDocument {
    NewDocument {
        title: title.to_string(),
        ..NewDocument::default()
    }
}

async fn grant_for(db: &Database, document_id: i64, user_id: i64) -> Option<DocumentPermission> {
    let mut conn = db.acquire().await.unwrap();
    DocumentPermission::get(&mut conn, document_id, user_id)
        .await
        .unwrap()
}

#[tokio::test]
async fn create_then_get_round_trip() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;

    let input = NewDocument {
        title: "Harbor survey".to_string(),
        privacy: Some(Privacy::Private),
        author: Some("  J. Morales  ".to_string()),
        geojson: Some(r#"{"type":"Point","coordinates":[24.1,56.9]}"#.to_string()),
        tags: vec!["Harbor".to_string(), "harbor".to_string(), "survey".to_string()],
        ..NewDocument::default()
    };
    let id = documents::create_document(db, store, &alice, input)
        .await
        .unwrap();

    let view = documents::get_document(db, store, &alice, id).await.unwrap();
    assert_eq!(view.document.title, "Harbor survey");
    assert_eq!(view.document.privacy, Privacy::Private);
    assert_eq!(view.document.author.as_deref(), Some("J. Morales"));
    assert_eq!(view.document.created_by, Some(alice.user_id));
    assert!(view.document.updated_at.is_none());
    // deduped case-insensitively, listed in catalog order
    assert_eq!(view.tags, vec!["Harbor".to_string(), "survey".to_string()]);
    assert!(view.capabilities.can_edit);
    assert!(view.content.is_none());
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;

    let err = documents::create_document(db, store, &alice, titled("   ")).await;
    assert!(matches!(
        err,
        Err(ArchiveError::Validation { field: "title", .. })
    ));
}

#[tokio::test]
async fn private_documents_are_hidden_from_strangers() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;
    let bob = register(db, "bob", Role::User).await;

    let input = NewDocument {
        privacy: Some(Privacy::Private),
        ..titled("secret")
    };
    let id = documents::create_document(db, store, &alice, input)
        .await
        .unwrap();

    let err = documents::get_document(db, store, &bob, id).await;
    assert!(matches!(err, Err(ArchiveError::PermissionDenied)));

    // unknown ids are a plain not-found, for everyone
    let err = documents::get_document(db, store, &bob, 999_999).await;
    assert!(matches!(err, Err(ArchiveError::NotFound)));
}

#[tokio::test]
async fn public_documents_are_readable_but_not_editable_by_strangers() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;
    let bob = register(db, "bob", Role::User).await;

    let id = documents::create_document(db, store, &alice, titled("open data"))
        .await
        .unwrap();

    let view = documents::get_document(db, store, &bob, id).await.unwrap();
    assert!(!view.capabilities.can_edit);
    // grant rows are only exposed to editors
    assert!(view.grants.is_empty());

    let patch = DocumentPatch {
        title: Some("defaced".to_string()),
        ..DocumentPatch::default()
    };
    let err = documents::update_document(db, store, &bob, id, patch).await;
    assert!(matches!(err, Err(ArchiveError::PermissionDenied)));
}

#[tokio::test]
async fn view_grant_opens_reading_only() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;
    let bob = register(db, "bob", Role::User).await;

    let input = NewDocument {
        privacy: Some(Privacy::Private),
        ..titled("shared read")
    };
    let id = documents::create_document(db, store, &alice, input)
        .await
        .unwrap();

    documents::set_permission(db, &alice, id, bob.user_id, true, false)
        .await
        .unwrap();

    let view = documents::get_document(db, store, &bob, id).await.unwrap();
    assert!(view.capabilities.can_view);
    assert!(!view.capabilities.can_edit);

    let patch = DocumentPatch {
        title: Some("nope".to_string()),
        ..DocumentPatch::default()
    };
    let err = documents::update_document(db, store, &bob, id, patch).await;
    assert!(matches!(err, Err(ArchiveError::PermissionDenied)));
}

#[tokio::test]
async fn edit_grant_allows_updates_and_grant_management() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;
    let bob = register(db, "bob", Role::User).await;
    let carol = register(db, "carol", Role::User).await;

    let input = NewDocument {
        privacy: Some(Privacy::Private),
        ..titled("joint work")
    };
    let id = documents::create_document(db, store, &alice, input)
        .await
        .unwrap();
    documents::set_permission(db, &alice, id, bob.user_id, true, true)
        .await
        .unwrap();

    let patch = DocumentPatch {
        title: Some("joint work, revised".to_string()),
        ..DocumentPatch::default()
    };
    documents::update_document(db, store, &bob, id, patch)
        .await
        .unwrap();

    // an editor can manage grants too
    documents::set_permission(db, &bob, id, carol.user_id, true, false)
        .await
        .unwrap();

    let view = documents::get_document(db, store, &carol, id).await.unwrap();
    assert_eq!(view.document.title, "joint work, revised");
    assert_eq!(view.document.updated_by, Some(bob.user_id));
    assert!(view.document.updated_at.is_some());
}

#[tokio::test]
async fn partial_update_leaves_absent_fields_alone() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;

    let date = time::Date::from_calendar_date(2021, time::Month::June, 14).unwrap();
    let input = NewDocument {
        author: Some("R. Osis".to_string()),
        document_date: Some(date),
        tags: vec!["maps".to_string()],
        ..titled("atlas")
    };
    let id = documents::create_document(db, store, &alice, input)
        .await
        .unwrap();

    // touch only the title
    let patch = DocumentPatch {
        title: Some("atlas, second edition".to_string()),
        ..DocumentPatch::default()
    };
    documents::update_document(db, store, &alice, id, patch)
        .await
        .unwrap();

    let view = documents::get_document(db, store, &alice, id).await.unwrap();
    assert_eq!(view.document.title, "atlas, second edition");
    assert_eq!(view.document.author.as_deref(), Some("R. Osis"));
    assert_eq!(view.document.document_date, Some(date));
    assert_eq!(view.tags, vec!["maps".to_string()]);
}

#[tokio::test]
async fn interleaved_patches_to_disjoint_fields_both_land() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;

    let input = NewDocument {
        author: Some("R. Osis".to_string()),
        ..titled("ledger")
    };
    let id = documents::create_document(db, store, &alice, input)
        .await
        .unwrap();

    // two racing editors touch different fields; neither patch may
    // write the other's field back to its old value
    let title_patch = DocumentPatch {
        title: Some("ledger, amended".to_string()),
        ..DocumentPatch::default()
    };
    let author_patch = DocumentPatch {
        author: Some(Some("V. Ander".to_string())),
        ..DocumentPatch::default()
    };
    let (a, b) = tokio::join!(
        documents::update_document(db, store, &alice, id, title_patch),
        documents::update_document(db, store, &alice, id, author_patch),
    );
    a.unwrap();
    b.unwrap();

    let view = documents::get_document(db, store, &alice, id).await.unwrap();
    assert_eq!(view.document.title, "ledger, amended");
    assert_eq!(view.document.author.as_deref(), Some("V. Ander"));
}

#[tokio::test]
async fn explicit_null_clears_and_empty_tag_list_clears() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;

    let input = NewDocument {
        author: Some("R. Osis".to_string()),
        tags: vec!["maps".to_string(), "geology".to_string()],
        ..titled("atlas")
    };
    let id = documents::create_document(db, store, &alice, input)
        .await
        .unwrap();

    let patch = DocumentPatch {
        author: Some(None),
        tags: Some(Vec::new()),
        ..DocumentPatch::default()
    };
    documents::update_document(db, store, &alice, id, patch)
        .await
        .unwrap();

    let view = documents::get_document(db, store, &alice, id).await.unwrap();
    assert!(view.document.author.is_none());
    assert!(view.tags.is_empty());
}

#[tokio::test]
async fn empty_patch_is_a_validation_error() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;
    let id = documents::create_document(db, store, &alice, titled("doc"))
        .await
        .unwrap();

    let err = documents::update_document(db, store, &alice, id, DocumentPatch::default()).await;
    assert!(matches!(err, Err(ArchiveError::Validation { .. })));
}

#[tokio::test]
async fn search_restricts_before_paginating() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;
    let bob = register(db, "bob", Role::User).await;

    for i in 0..3 {
        documents::create_document(db, store, &alice, titled(&format!("public {i}")))
            .await
            .unwrap();
    }
    for i in 0..2 {
        let input = NewDocument {
            privacy: Some(Privacy::Private),
            ..titled(&format!("private {i}"))
        };
        documents::create_document(db, store, &alice, input)
            .await
            .unwrap();
    }

    // bob pages through what he can see; privates never occupy a slot
    let filter = SearchFilter {
        limit: 2,
        ..SearchFilter::default()
    };
    let page_one = search::search_documents(db, &bob, &filter).await.unwrap();
    assert_eq!(page_one.len(), 2);

    let filter = SearchFilter {
        limit: 2,
        offset: 2,
        ..SearchFilter::default()
    };
    let page_two = search::search_documents(db, &bob, &filter).await.unwrap();
    assert_eq!(page_two.len(), 1);
    assert!(page_two[0].title.starts_with("public"));

    // alice sees all five
    let all = search::search_documents(db, &alice, &SearchFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.iter().all(|row| row.can_edit && row.is_creator));
}

#[tokio::test]
async fn search_filters_compose() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;

    let date = time::Date::from_calendar_date(2020, time::Month::March, 1).unwrap();
    let input = NewDocument {
        author: Some("J. Morales".to_string()),
        document_date: Some(date),
        tags: vec!["harbor".to_string()],
        ..titled("harbor survey")
    };
    documents::create_document(db, store, &alice, input)
        .await
        .unwrap();
    documents::create_document(db, store, &alice, titled("unrelated"))
        .await
        .unwrap();

    let filter = SearchFilter {
        tag: Some("HARBOR".to_string()),
        author: Some("j. morales".to_string()),
        date_from: Some(time::Date::from_calendar_date(2020, time::Month::January, 1).unwrap()),
        date_to: Some(time::Date::from_calendar_date(2020, time::Month::December, 31).unwrap()),
        ..SearchFilter::default()
    };
    let rows = search::search_documents(db, &alice, &filter).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "harbor survey");

    let filter = SearchFilter {
        date_from: Some(time::Date::from_calendar_date(2021, time::Month::January, 1).unwrap()),
        date_to: Some(time::Date::from_calendar_date(2020, time::Month::January, 1).unwrap()),
        ..SearchFilter::default()
    };
    let err = search::search_documents(db, &alice, &filter).await;
    assert!(matches!(err, Err(ArchiveError::Validation { .. })));
}

#[tokio::test]
async fn admin_sees_and_edits_everything() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;
    let admin = register(db, "root", Role::Admin).await;

    let input = NewDocument {
        privacy: Some(Privacy::Private),
        ..titled("classified")
    };
    let id = documents::create_document(db, store, &alice, input)
        .await
        .unwrap();

    let rows = search::search_documents(db, &admin, &SearchFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].can_edit);
    assert!(!rows[0].is_creator);

    let patch = DocumentPatch {
        privacy: Some(Privacy::Public),
        ..DocumentPatch::default()
    };
    documents::update_document(db, store, &admin, id, patch)
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_removes_document_and_grants() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;
    let bob = register(db, "bob", Role::User).await;

    let input = NewDocument {
        tags: vec!["temp".to_string()],
        ..titled("ephemeral")
    };
    let id = documents::create_document(db, store, &alice, input)
        .await
        .unwrap();
    documents::set_permission(db, &alice, id, bob.user_id, true, false)
        .await
        .unwrap();

    documents::delete_document(db, &alice, id).await.unwrap();

    let err = documents::get_document(db, store, &alice, id).await;
    assert!(matches!(err, Err(ArchiveError::NotFound)));

    let grant = grant_for(db, id, bob.user_id).await;
    assert!(grant.is_none());

    // the tag itself survives in the catalog
    let tags = catalogs::list(db, TAGS).await.unwrap();
    assert_eq!(tags.len(), 1);
}

#[tokio::test]
async fn all_false_grant_removes_the_row() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;
    let bob = register(db, "bob", Role::User).await;

    let id = documents::create_document(db, store, &alice, titled("doc"))
        .await
        .unwrap();
    documents::set_permission(db, &alice, id, bob.user_id, true, true)
        .await
        .unwrap();
    documents::set_permission(db, &alice, id, bob.user_id, false, false)
        .await
        .unwrap();

    let grant = grant_for(db, id, bob.user_id).await;
    assert!(grant.is_none());

    // removing again is a quiet no-op
    documents::remove_permission(db, &alice, id, bob.user_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn grants_may_reference_unknown_users() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;

    let id = documents::create_document(db, store, &alice, titled("doc"))
        .await
        .unwrap();
    // no such account yet; the grant just never matches
    documents::set_permission(db, &alice, id, 424_242, true, false)
        .await
        .unwrap();

    let grant = grant_for(db, id, 424_242).await;
    assert!(grant.is_some());
}

#[tokio::test]
async fn inline_content_round_trips_through_download() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;

    let input = NewDocument {
        content: Some(ContentUpload {
            filename: "scan.pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4 pretend"),
            mime: "application/pdf".to_string(),
        }),
        ..titled("scanned deed")
    };
    let id = documents::create_document(db, store, &alice, input)
        .await
        .unwrap();

    let view = documents::get_document(db, store, &alice, id).await.unwrap();
    let content = view.content.expect("content metadata");
    assert!(content.inline);
    assert_eq!(content.mime, "application/pdf");
    assert_eq!(content.size, 16);
    assert!(content.download_url.is_none());

    match documents::download_content(db, store, &alice, id).await.unwrap() {
        ContentPayload::Bytes { bytes, mime } => {
            assert_eq!(bytes, Bytes::from_static(b"%PDF-1.4 pretend"));
            assert_eq!(mime, "application/pdf");
        }
        ContentPayload::Redirect(url) => panic!("unexpected redirect to {url}"),
    }
}

#[tokio::test]
async fn object_content_is_proxied_when_backend_cannot_sign() {
    let db = Database::memory().await.unwrap();
    let store = ContentStore::memory();
    let alice = register(&db, "alice", Role::User).await;

    let input = NewDocument {
        content: Some(ContentUpload {
            filename: "plot.png".to_string(),
            bytes: Bytes::from_static(b"png-ish"),
            mime: "image/png".to_string(),
        }),
        ..titled("plot")
    };
    let id = documents::create_document(&db, &store, &alice, input)
        .await
        .unwrap();

    let view = documents::get_document(&db, &store, &alice, id)
        .await
        .unwrap();
    let content = view.content.expect("content metadata");
    assert!(!content.inline);
    // the memory backend cannot mint presigned URLs
    assert!(content.download_url.is_none());

    match documents::download_content(&db, &store, &alice, id)
        .await
        .unwrap()
    {
        ContentPayload::Bytes { bytes, .. } => assert_eq!(bytes, Bytes::from_static(b"png-ish")),
        ContentPayload::Redirect(url) => panic!("unexpected redirect to {url}"),
    }
}

#[tokio::test]
async fn replacing_content_updates_the_reference() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;

    let input = NewDocument {
        content: Some(ContentUpload {
            filename: "v1.txt".to_string(),
            bytes: Bytes::from_static(b"first"),
            mime: "text/plain".to_string(),
        }),
        ..titled("versioned")
    };
    let id = documents::create_document(db, store, &alice, input)
        .await
        .unwrap();

    let patch = DocumentPatch {
        content: Some(ContentUpload {
            filename: "v2.txt".to_string(),
            bytes: Bytes::from_static(b"second"),
            mime: "text/plain".to_string(),
        }),
        ..DocumentPatch::default()
    };
    documents::update_document(db, store, &alice, id, patch)
        .await
        .unwrap();

    match documents::download_content(db, store, &alice, id).await.unwrap() {
        ContentPayload::Bytes { bytes, .. } => assert_eq!(bytes, Bytes::from_static(b"second")),
        ContentPayload::Redirect(url) => panic!("unexpected redirect to {url}"),
    }
}

#[tokio::test]
async fn failed_upload_leaves_no_trace() {
    let db = Database::memory().await.unwrap();
    let alice = register(&db, "alice", Role::User).await;

    // local backend whose root is then replaced with a plain file, so
    // every later upload fails at the object store
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("objects");
    let broken = ContentStore::new(ContentStoreConfig::Local { path: root.clone() })
        .await
        .unwrap();
    std::fs::remove_dir_all(&root).unwrap();
    std::fs::write(&root, b"").unwrap();

    let input = NewDocument {
        content: Some(ContentUpload {
            filename: "doomed.bin".to_string(),
            bytes: Bytes::from_static(b"payload"),
            mime: "application/octet-stream".to_string(),
        }),
        ..titled("doomed")
    };
    let err = documents::create_document(&db, &broken, &alice, input).await;
    assert!(matches!(err, Err(ArchiveError::Dependency(_))));

    // no row was written for the failed creation
    let rows = search::search_documents(&db, &alice, &SearchFilter::default())
        .await
        .unwrap();
    assert!(rows.is_empty());

    // a failed replacement upload leaves the old descriptor alone
    let store = ContentStore::memory();
    let input = NewDocument {
        content: Some(ContentUpload {
            filename: "v1.txt".to_string(),
            bytes: Bytes::from_static(b"first"),
            mime: "text/plain".to_string(),
        }),
        ..titled("stable")
    };
    let id = documents::create_document(&db, &store, &alice, input)
        .await
        .unwrap();
    let before = documents::get_document(&db, &store, &alice, id)
        .await
        .unwrap();

    let patch = DocumentPatch {
        content: Some(ContentUpload {
            filename: "v2.txt".to_string(),
            bytes: Bytes::from_static(b"second"),
            mime: "text/plain".to_string(),
        }),
        ..DocumentPatch::default()
    };
    let err = documents::update_document(&db, &broken, &alice, id, patch).await;
    assert!(matches!(err, Err(ArchiveError::Dependency(_))));

    let after = documents::get_document(&db, &store, &alice, id)
        .await
        .unwrap();
    assert_eq!(
        after.content.as_ref().map(|c| c.sha256.as_str()),
        before.content.as_ref().map(|c| c.sha256.as_str()),
    );
    assert!(after.document.updated_at.is_none());

    match documents::download_content(&db, &store, &alice, id)
        .await
        .unwrap()
    {
        ContentPayload::Bytes { bytes, .. } => assert_eq!(bytes, Bytes::from_static(b"first")),
        ContentPayload::Redirect(url) => panic!("unexpected redirect to {url}"),
    }
}

#[tokio::test]
async fn catalogs_converge_on_one_row_per_name() {
    let state = fixture().await;
    let db = state.database();
    let alice = register(db, "alice", Role::User).await;

    let first = catalogs::create_or_fetch(db, &alice, TAGS, "Geology")
        .await
        .unwrap();
    let second = catalogs::create_or_fetch(db, &alice, TAGS, "  geology ")
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    // the original spelling wins
    assert_eq!(second.name, "Geology");

    let err = catalogs::create_or_fetch(db, &alice, TAGS, "  ").await;
    assert!(matches!(err, Err(ArchiveError::Validation { .. })));
}

#[tokio::test]
async fn refetching_a_catalog_name_is_not_audited_as_a_create() {
    let state = fixture().await;
    let db = state.database();
    let alice = register(db, "alice", Role::User).await;
    let admin = register(db, "root", Role::Admin).await;

    catalogs::create_or_fetch(db, &alice, TAGS, "Geology")
        .await
        .unwrap();
    catalogs::create_or_fetch(db, &alice, TAGS, "geology")
        .await
        .unwrap();

    let records = audit::logs_by_table(db, &admin, "tags", 10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action, "create");
}

#[tokio::test]
async fn renaming_into_an_existing_name_conflicts() {
    let state = fixture().await;
    let db = state.database();
    let alice = register(db, "alice", Role::User).await;

    let maps = catalogs::create_or_fetch(db, &alice, DOCUMENT_TYPES, "maps")
        .await
        .unwrap();
    catalogs::create_or_fetch(db, &alice, DOCUMENT_TYPES, "reports")
        .await
        .unwrap();

    let err = catalogs::rename(db, &alice, DOCUMENT_TYPES, maps.id, "REPORTS").await;
    assert!(matches!(err, Err(ArchiveError::Conflict(_))));

    let err = catalogs::rename(db, &alice, DOCUMENT_TYPES, 999, "anything").await;
    assert!(matches!(err, Err(ArchiveError::NotFound)));
}

#[tokio::test]
async fn deleting_a_type_orphans_documents_gracefully() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;

    let entry = catalogs::create_or_fetch(db, &alice, DOCUMENT_TYPES, "maps")
        .await
        .unwrap();
    let input = NewDocument {
        type_id: Some(entry.id),
        ..titled("typed doc")
    };
    let id = documents::create_document(db, store, &alice, input)
        .await
        .unwrap();

    catalogs::delete(db, &alice, DOCUMENT_TYPES, entry.id)
        .await
        .unwrap();

    let view = documents::get_document(db, store, &alice, id).await.unwrap();
    assert!(view.document.type_id.is_none());
    assert!(view.type_name.is_none());
}

#[tokio::test]
async fn audit_log_is_admin_only_and_records_mutations() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;
    let admin = register(db, "root", Role::Admin).await;

    let id = documents::create_document(db, store, &alice, titled("tracked"))
        .await
        .unwrap();
    let patch = DocumentPatch {
        title: Some("tracked, renamed".to_string()),
        ..DocumentPatch::default()
    };
    documents::update_document(db, store, &alice, id, patch)
        .await
        .unwrap();

    let err = audit::logs_by_user(db, &alice, alice.user_id, 10).await;
    assert!(matches!(err, Err(ArchiveError::PermissionDenied)));

    let records = audit::logs_by_user(db, &admin, alice.user_id, 10)
        .await
        .unwrap();
    let actions: Vec<&str> = records.iter().map(|r| r.action.as_str()).collect();
    // newest first
    assert_eq!(actions, vec!["update", "create"]);
    assert!(records.iter().all(|r| r.table_name == "documents"));

    let by_table = audit::logs_by_table(db, &admin, "documents", 10)
        .await
        .unwrap();
    assert_eq!(by_table.len(), 2);
}

#[tokio::test]
async fn referencing_a_missing_type_is_a_validation_error() {
    let state = fixture().await;
    let (db, store) = (state.database(), state.content_store());
    let alice = register(db, "alice", Role::User).await;

    let input = NewDocument {
        type_id: Some(12_345),
        ..titled("typed doc")
    };
    let err = documents::create_document(db, store, &alice, input).await;
    assert!(matches!(err, Err(ArchiveError::Validation { .. })));
}
