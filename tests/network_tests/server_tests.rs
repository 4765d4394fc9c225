//! Tests for the request handler and TCP server
//!
//! These tests verify:
//! - Input validation and status mapping in the handler
//! - Upload handling and the default avatar
//! - A full client/server exchange over TCP

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use badgeboard::network::{Client, Handler, Server};
use badgeboard::protocol::{Command, NewAchievement, NewMember, Response, Status, Upload};
use badgeboard::uploads::UploadNamer;
use badgeboard::{Config, RecordStore};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn test_config(temp: &TempDir) -> Config {
    Config::builder()
        .data_dir(temp.path().join("data"))
        .uploads_dir(temp.path().join("uploads"))
        .listen_addr("127.0.0.1:0")
        .workers(2)
        .read_timeout_ms(5000)
        .build()
}

fn setup_handler() -> (TempDir, Arc<RecordStore>, Handler) {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    let store = Arc::new(RecordStore::open(&config).unwrap());
    let uploads = UploadNamer::open(&config).unwrap();
    let handler = Handler::new(Arc::clone(&store), uploads, &config);
    (temp_dir, store, handler)
}

fn add_member(name: &str, role: &str, avatar: Option<Upload>) -> Command {
    Command::AddMember(NewMember {
        name: name.to_string(),
        role: role.to_string(),
        avatar,
    })
}

fn add_achievement(member_id: u64, category: &str, image: Option<Upload>) -> Command {
    Command::AddAchievement(NewAchievement {
        member_id,
        category: category.to_string(),
        image,
    })
}

fn png(name: &str) -> Option<Upload> {
    Some(Upload {
        filename: name.to_string(),
        bytes: b"fake-png".to_vec(),
    })
}

fn error_message(response: &Response) -> String {
    response.json().unwrap()["error"].as_str().unwrap().to_string()
}

// =============================================================================
// Handler Tests
// =============================================================================

#[test]
fn test_ping() {
    let (_temp, _store, handler) = setup_handler();

    let response = handler.handle(Command::Ping);

    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.payload.as_deref(), Some(&b"PONG"[..]));
}

#[test]
fn test_add_member_uses_default_avatar() {
    let (_temp, store, handler) = setup_handler();

    let response = handler.handle(add_member("Ann", "Lead", None));

    assert_eq!(response.status, Status::Ok);
    let body = response.json().unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["sort_order"], 1);
    assert_eq!(body["data"]["avatar"], "assets/images/avatar.svg");
    assert_eq!(body["data"]["achievements"], serde_json::json!([]));
    assert_eq!(store.member_count(), 1);
}

#[test]
fn test_add_member_stores_avatar_upload() {
    let (_temp, store, handler) = setup_handler();

    let response = handler.handle(add_member("Ann", "Lead", png("ann.png")));

    assert_eq!(response.status, Status::Ok);
    let avatar = store.list_members()[0].avatar.clone();
    assert!(avatar.ends_with(".png"));
    assert!(Path::new(&avatar).parent().unwrap().ends_with("avatars"));
    assert_eq!(fs::read(&avatar).unwrap(), b"fake-png");
}

#[test]
fn test_add_member_requires_name_and_role() {
    let (_temp, store, handler) = setup_handler();

    for command in [add_member("", "Lead", None), add_member("Ann", "   ", None)] {
        let response = handler.handle(command);
        assert_eq!(response.status, Status::BadRequest);
        assert_eq!(error_message(&response), "name and role are required");
    }
    assert_eq!(store.member_count(), 0);
}

#[test]
fn test_add_achievement_requires_image_and_category() {
    let (_temp, store, handler) = setup_handler();
    handler.handle(add_member("Ann", "Lead", None));

    let missing_image = handler.handle(add_achievement(1, "positive", None));
    let missing_category = handler.handle(add_achievement(1, "", png("b.png")));

    assert_eq!(missing_image.status, Status::BadRequest);
    assert_eq!(error_message(&missing_image), "image file is required");
    assert_eq!(missing_category.status, Status::BadRequest);
    assert_eq!(error_message(&missing_category), "category is required");
    assert_eq!(store.achievement_count(), 0);
}

#[test]
fn test_text_fields_are_stored_as_sent() {
    let (_temp, store, handler) = setup_handler();

    let member = handler.handle(add_member(" Ann ", "Lead\t", None));
    assert_eq!(member.status, Status::Ok);
    assert_eq!(member.json().unwrap()["data"]["name"], " Ann ");

    let badge = handler.handle(add_achievement(1, " positive", png("b.png")));
    assert_eq!(badge.status, Status::Ok);

    let members = store.list_members();
    assert_eq!(members[0].name, " Ann ");
    assert_eq!(members[0].role, "Lead\t");
    assert_eq!(members[0].achievements[0].category, " positive");
}

#[test]
fn test_add_achievement_unknown_member_is_not_found() {
    let (_temp, store, handler) = setup_handler();

    let response = handler.handle(add_achievement(99, "negative", png("x.png")));

    assert_eq!(response.status, Status::NotFound);
    assert!(error_message(&response).contains("99"));
    assert_eq!(store.achievement_count(), 0);
}

#[test]
fn test_oversized_upload_is_bad_request() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path().join("data"))
        .uploads_dir(temp_dir.path().join("uploads"))
        .max_upload_bytes(4)
        .build();
    let store = Arc::new(RecordStore::open(&config).unwrap());
    let handler = Handler::new(Arc::clone(&store), UploadNamer::open(&config).unwrap(), &config);

    let response = handler.handle(add_member("Ann", "Lead", png("ann.png")));

    assert_eq!(response.status, Status::BadRequest);
    assert_eq!(store.member_count(), 0);
}

#[test]
fn test_list_members_body() {
    let (_temp, _store, handler) = setup_handler();
    handler.handle(add_member("Ann", "Lead", None));
    handler.handle(add_member("Bob", "Dev", None));
    handler.handle(add_achievement(2, "positive", png("b.png")));

    let body = handler.handle(Command::ListMembers).json().unwrap();

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["name"], "Ann");
    assert_eq!(data[1]["name"], "Bob");
    let badges = data[1]["achievements"].as_array().unwrap();
    assert_eq!(badges.len(), 1);
    assert_eq!(badges[0]["member_id"], 2);
    assert_eq!(badges[0]["category"], "positive");
    assert!(badges[0]["created_at"].as_str().unwrap().ends_with('Z'));
}

// =============================================================================
// Server Tests
// =============================================================================

#[test]
fn test_server_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    let store = Arc::new(RecordStore::open(&config).unwrap());
    let handler = Arc::new(Handler::new(
        Arc::clone(&store),
        UploadNamer::open(&config).unwrap(),
        &config,
    ));

    let server = Server::bind(config, handler).unwrap();
    let addr = server.local_addr().unwrap().to_string();
    let shutdown = server.shutdown_handle();
    let server_thread = thread::spawn(move || server.run());

    {
        let mut client = Client::connect(&addr).unwrap();

        let pong = client.send(&Command::Ping).unwrap();
        assert_eq!(pong.payload.as_deref(), Some(&b"PONG"[..]));

        let created = client.send(&add_member("Ann", "Lead", None)).unwrap();
        assert_eq!(created.status, Status::Ok);

        let awarded = client
            .send(&add_achievement(1, "positive", png("badge.png")))
            .unwrap();
        assert_eq!(awarded.status, Status::Ok);
        assert_eq!(awarded.json().unwrap()["data"]["id"], 1);

        let rejected = client
            .send(&add_achievement(99, "negative", png("x.png")))
            .unwrap();
        assert_eq!(rejected.status, Status::NotFound);

        let listed = client.send(&Command::ListMembers).unwrap().json().unwrap();
        assert_eq!(listed["data"][0]["achievements"].as_array().unwrap().len(), 1);
    }

    // A second connection sees the same store
    {
        let mut client = Client::connect(&addr).unwrap();
        let listed = client.send(&Command::ListMembers).unwrap().json().unwrap();
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    }

    shutdown.store(true, std::sync::atomic::Ordering::Relaxed);
    server_thread.join().unwrap().unwrap();

    assert_eq!(store.member_count(), 1);
    assert_eq!(store.achievement_count(), 1);
}

#[test]
fn test_server_bind_rejects_zero_workers() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path().join("data"))
        .uploads_dir(temp_dir.path().join("uploads"))
        .listen_addr("127.0.0.1:0")
        .build();
    let store = Arc::new(RecordStore::open(&config).unwrap());
    let handler = Arc::new(Handler::new(store, UploadNamer::open(&config).unwrap(), &config));

    let mut bad = config.clone();
    bad.workers = 0;

    assert!(Server::bind(bad, handler).is_err());
}
