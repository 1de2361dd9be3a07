//! Facade end-to-end tests
//!
//! These tests drive the facade the way an application would: settings from
//! disk, channels opened by path, permissions flipped through the store.

use acl::{AclPermission, PermissionSet, Principal, Requester};
use blob_channel::{ChannelConfig, FileAttribute, OpenMode, OpenOptions};
use blob_fs::{BlobFileSystem, FsError, FsSettings};
use blob_store::{AccessLevel, BlobStore, GetOptions, MemoryBlobStore};
use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::sync::Arc;

fn boot() -> (Arc<MemoryBlobStore>, BlobFileSystem, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let settings_path = dir.path().join("settings.json");
    FsSettings::new(Principal::user("admin"))
        .with_channel(ChannelConfig::default().with_mirror_dir(dir.path().join("mirrors")))
        .save(&settings_path)
        .unwrap();
    std::fs::create_dir(dir.path().join("mirrors")).unwrap();

    let settings = FsSettings::load(&settings_path).unwrap();
    let store = Arc::new(MemoryBlobStore::with_containers(["media"]));
    let fs = BlobFileSystem::new(store.clone(), settings);
    (store, fs, dir)
}

#[test]
fn test_publish_workflow() {
    let (store, fs, dir) = boot();

    let mut channel = fs
        .open(
            "media/posters/launch.svg",
            OpenOptions::from([OpenMode::CreateNew, OpenMode::Write]),
            vec![
                FileAttribute::content_type("image/svg+xml"),
                FileAttribute::content_disposition("inline"),
            ],
        )
        .unwrap();
    write!(channel, "<svg/>").unwrap();
    channel.close().unwrap();

    let blob = store
        .get("media", "posters/launch.svg", &GetOptions::new())
        .unwrap()
        .unwrap();
    assert_eq!(blob.payload, b"<svg/>");
    assert_eq!(blob.metadata.content_type.as_deref(), Some("image/svg+xml"));
    assert_eq!(blob.metadata.content_disposition.as_deref(), Some("inline"));
    assert_eq!(std::fs::read_dir(dir.path().join("mirrors")).unwrap().count(), 0);

    let read = PermissionSet::from([AclPermission::ReadData]);
    assert!(!fs
        .check_access("media/posters/launch.svg", None, None, &read)
        .unwrap());

    let admin = fs
        .permissions("media/posters/launch.svg", Requester::new(Principal::user("admin")))
        .unwrap();
    assert!(admin.set_readable(true, false));
    assert_eq!(
        store.get_access("media", "posters/launch.svg").unwrap(),
        AccessLevel::PublicRead
    );
    assert!(fs
        .check_access("media/posters/launch.svg", None, None, &read)
        .unwrap());

    let visitor = fs
        .permissions("media/posters/launch.svg", Requester::anonymous())
        .unwrap();
    assert!(visitor.can_read());
    assert!(!visitor.can_write());
}

#[test]
fn test_reopen_preserves_content_and_reads_through_std_io() {
    let (_store, fs, _dir) = boot();

    let mut channel = fs
        .open(
            "media/log.txt",
            OpenOptions::from([OpenMode::Create, OpenMode::Write]),
            Vec::new(),
        )
        .unwrap();
    channel.write_all(b"first line\n").unwrap();
    channel.close().unwrap();

    let mut channel = fs
        .open("media/log.txt", OpenOptions::from([OpenMode::Append]), Vec::new())
        .unwrap();
    channel.write_all(b"second line\n").unwrap();
    channel.close().unwrap();

    let mut channel = fs.open("media/log.txt", OpenOptions::new(), Vec::new()).unwrap();
    let mut text = String::new();
    channel.read_to_string(&mut text).unwrap();
    assert_eq!(text, "first line\nsecond line\n");
}

#[test]
fn test_group_membership_is_caller_declared() {
    let (_store, fs, _dir) = boot();
    let mut channel = fs
        .open(
            "media/team.txt",
            OpenOptions::from([OpenMode::Create, OpenMode::Write]),
            Vec::new(),
        )
        .unwrap();
    channel.write_all(b"roster").unwrap();
    channel.close().unwrap();

    let everything: PermissionSet = AclPermission::ALL.iter().copied().collect();
    let admin = Principal::user("admin");
    let groups = BTreeSet::from([Principal::group("staff")]);
    assert!(fs
        .check_access("media/team.txt", Some(&admin), Some(&groups), &everything)
        .unwrap());
    assert!(!fs
        .check_access(
            "media/team.txt",
            Some(&Principal::user("temp")),
            Some(&groups),
            &PermissionSet::from([AclPermission::WriteData]),
        )
        .unwrap());
}

#[test]
fn test_permissions_on_missing_object() {
    let (_store, fs, _dir) = boot();
    assert!(matches!(
        fs.permissions("media/ghost", Requester::anonymous()),
        Err(FsError::Store(_))
    ));
}
