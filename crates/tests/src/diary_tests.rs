use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn create_and_list_entries_newest_first() {
    let app = TestApp::spawn().await;
    let user = app.register_user("list").await;

    for title in ["first", "second"] {
        let resp = app
            .post("/api/diary")
            .json(&serde_json::json!({
                "username": user.username,
                "title": title,
                "content": format!("content of {title}"),
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201);
        // created_at has millisecond precision; keep the two apart.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let resp = app
        .get(&format!("/api/diary?username={}", user.username))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], true);
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Sorted by created_at descending.
    assert_eq!(entries[0]["title"], "second");
    assert_eq!(entries[1]["title"], "first");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn get_entry_by_id() {
    let app = TestApp::spawn().await;
    let user = app.register_user("get").await;

    let resp = app
        .post("/api/diary")
        .json(&serde_json::json!({
            "username": user.username,
            "title": "  A day  ",
            "content": "  it rained  ",
        }))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let entry_id = json["entry"]["id"].as_str().unwrap().to_string();
    // Title and content are stored trimmed.
    assert_eq!(json["entry"]["title"], "A day");
    assert_eq!(json["entry"]["content"], "it rained");

    let resp = app
        .get(&format!("/api/diary/{entry_id}?username={}", user.username))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["entry"]["id"], entry_id.as_str());
    assert_eq!(json["entry"]["title"], "A day");
    assert!(json["entry"]["createdAt"].as_str().is_some());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn create_requires_title_and_content() {
    let app = TestApp::spawn().await;
    let user = app.register_user("val").await;

    for body in [
        serde_json::json!({ "username": user.username, "title": "only title" }),
        serde_json::json!({ "username": user.username, "content": "only content" }),
        serde_json::json!({ "username": user.username, "title": "   ", "content": "x" }),
        serde_json::json!({ "title": "no user", "content": "x" }),
    ] {
        let resp = app.post("/api/diary").json(&body).send().await.unwrap();
        assert_eq!(resp.status().as_u16(), 400, "body: {body}");
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn delete_entry_then_it_is_gone() {
    let app = TestApp::spawn().await;
    let user = app.register_user("del").await;

    let resp = app
        .post("/api/diary")
        .json(&serde_json::json!({
            "username": user.username,
            "title": "temp",
            "content": "to be deleted",
        }))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let entry_id = json["entry"]["id"].as_str().unwrap().to_string();

    let resp = app
        .delete(&format!("/api/diary/{entry_id}?username={}", user.username))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .get(&format!("/api/diary/{entry_id}?username={}", user.username))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    // Deleting again is also a 404.
    let resp = app
        .delete(&format!("/api/diary/{entry_id}?username={}", user.username))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn entries_are_scoped_to_their_owner() {
    let app = TestApp::spawn().await;
    let alice = app.register_user("alice").await;
    let bob = app.register_user("bob").await;

    let resp = app
        .post("/api/diary")
        .json(&serde_json::json!({
            "username": alice.username,
            "title": "private",
            "content": "alice only",
        }))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let entry_id = json["entry"]["id"].as_str().unwrap().to_string();

    // Bob can neither read nor delete Alice's entry.
    let resp = app
        .get(&format!("/api/diary/{entry_id}?username={}", bob.username))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = app
        .delete(&format!("/api/diary/{entry_id}?username={}", bob.username))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    // And Bob's list stays empty.
    let resp = app
        .get(&format!("/api/diary?username={}", bob.username))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["entries"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn unknown_user_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app.get("/api/diary?username=nobody").send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = app
        .post("/api/diary")
        .json(&serde_json::json!({
            "username": "nobody",
            "title": "t",
            "content": "c",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn health_and_unknown_routes() {
    let app = TestApp::spawn().await;

    let resp = app.get("/api/health").send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], true);

    let resp = app.get("/api/nope").send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], false);
}
