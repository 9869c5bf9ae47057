mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, ids};

#[tokio::test]
async fn admin_edit_is_attributed_and_sticky() {
    let app = TestApp::new();
    let admin = app.register("admin", "admin").await;
    let owner = app.register("owner", "user").await;
    let post = app.create_post(&owner, "original").await;

    let (status, body) = app
        .put(&format!("/posts/{post}"), &admin.token, json!({ "content": "moderated" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["content"], "moderated");
    assert_eq!(body["post"]["edited"], true);
    assert_eq!(body["post"]["edited_by_admin"], true);
    assert_eq!(body["post"]["user_id"], owner.id);

    let (status, body) = app
        .put(&format!("/posts/{post}"), &owner.token, json!({ "content": "my words again" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["edited"], true);
    assert_eq!(body["post"]["edited_by_admin"], true);
}

#[tokio::test]
async fn owner_edit_leaves_admin_flag_unset() {
    let app = TestApp::new();
    let admin = app.register("admin", "admin").await;
    let post = app.create_post(&admin, "admin's own post").await;

    // An admin editing their own row is an owner edit.
    let (status, body) = app
        .put(&format!("/posts/{post}"), &admin.token, json!({ "content": "fixed typo" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["edited"], true);
    assert_eq!(body["post"]["edited_by_admin"], false);
}

#[tokio::test]
async fn strangers_cannot_modify_content() {
    let app = TestApp::new();
    let owner = app.register("owner", "user").await;
    let stranger = app.register("stranger", "user").await;
    let post = app.create_post(&owner, "mine").await;
    let comment = app.create_comment(&owner, post, "also mine").await;

    let (status, body) = app
        .put(&format!("/posts/{post}"), &stranger.token, json!({ "content": "hijack" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Permission denied");

    let (status, _) = app.delete(&format!("/posts/{post}"), &stranger.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let comment_uri = format!("/posts/{post}/comments/{comment}");
    let (status, _) = app.put(&comment_uri, &stranger.token, json!({ "content": "x" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&comment_uri, &stranger.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app.get(&format!("/posts/{post}"), &owner.token).await;
    assert_eq!(body["post"]["content"], "mine");
    assert_eq!(body["post"]["deleted"], false);
}

#[tokio::test]
async fn deleted_comment_is_hidden_from_everyone_but_admins() {
    let app = TestApp::new();
    let admin = app.register("admin", "admin").await;
    let owner = app.register("owner", "user").await;
    let reader = app.register("reader", "user").await;
    let post = app.create_post(&owner, "post").await;
    let kept = app.create_comment(&reader, post, "kept").await;
    let gone = app.create_comment(&owner, post, "gone").await;

    let (status, body) = app
        .delete(&format!("/posts/{post}/comments/{gone}"), &owner.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Comment deleted successfully");

    let list_uri = format!("/posts/{post}/comments");
    for user in [&owner, &reader] {
        let (_, body) = app.get(&list_uri, &user.token).await;
        assert_eq!(ids(&body["comments"]), vec![kept]);

        let (status, _) = app.get(&format!("{list_uri}/{gone}"), &user.token).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let (_, body) = app.get(&list_uri, &admin.token).await;
    assert_eq!(ids(&body["comments"]), vec![gone, kept]);
    assert_eq!(body["comments"][0]["deleted"], true);

    let (_, body) = app.get(&format!("/posts/{post}"), &reader.token).await;
    assert_eq!(body["post"]["comment_count"], 1);
    let (_, body) = app.get(&format!("/posts/{post}"), &admin.token).await;
    assert_eq!(body["post"]["comment_count"], 2);

    // Soft-deleted rows can't be edited by the owner either.
    let (status, _) = app
        .put(&format!("{list_uri}/{gone}"), &owner.token, json!({ "content": "back" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_posts_and_listing_totals() {
    let app = TestApp::new();
    let admin = app.register("admin", "admin").await;
    let owner = app.register("owner", "user").await;

    let mut posts = Vec::new();
    for i in 0..4 {
        posts.push(app.create_post(&owner, &format!("post {i}")).await);
    }
    let (status, _) = app.delete(&format!("/posts/{}", posts[1]), &owner.token).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/posts?limit=2", &owner.token).await;
    assert_eq!(ids(&body["posts"]), vec![posts[3], posts[2]]);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["hasMore"], true);

    let (_, body) = app.get("/posts?limit=2&offset=2", &owner.token).await;
    assert_eq!(ids(&body["posts"]), vec![posts[0]]);
    assert_eq!(body["pagination"]["hasMore"], false);

    let (_, body) = app.get("/posts", &admin.token).await;
    assert_eq!(body["pagination"]["total"], 4);
    let deleted: Vec<bool> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["deleted"].as_bool().unwrap())
        .collect();
    assert_eq!(deleted, vec![false, false, true, false]);

    let (status, _) = app.get(&format!("/posts/{}", posts[1]), &owner.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = app.get(&format!("/posts/{}", posts[1]), &admin.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["deleted"], true);
}

#[tokio::test]
async fn unusable_paging_parameters_fall_back_to_defaults() {
    let app = TestApp::new();
    let owner = app.register("owner", "user").await;
    for i in 0..12 {
        app.create_post(&owner, &format!("post {i}")).await;
    }

    for query in ["", "?limit=abc", "?limit=0", "?limit=-4&offset=-1"] {
        let (status, body) = app.get(&format!("/posts{query}"), &owner.token).await;
        assert_eq!(status, StatusCode::OK, "query {query}");
        assert_eq!(body["posts"].as_array().unwrap().len(), 10, "query {query}");
        assert_eq!(body["pagination"]["limit"], 10);
        assert_eq!(body["pagination"]["offset"], 0);
        assert_eq!(body["pagination"]["hasMore"], true);
    }
}

#[tokio::test]
async fn odd_query_strings_are_normalized_not_rejected() {
    let app = TestApp::new();
    let owner = app.register("owner", "user").await;
    for i in 0..7 {
        app.create_post(&owner, &format!("post {i}")).await;
    }

    let (status, body) = app.get("/posts?limit=5&limit=6", &owner.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["limit"], 5);

    let (status, body) = app
        .get("/posts?offset=abc&offset=3&sort=new&limit=2", &owner.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["offset"], 0);
    assert_eq!(body["pagination"]["limit"], 2);

    let (status, body) = app
        .get("/posts/search?q=post%206&q=nothing&limit=1&limit=x", &owner.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["posts"][0]["content"], "post 6");
}

#[tokio::test]
async fn search_filters_by_content_or_username() {
    let app = TestApp::new();
    let alice = app.register("alice", "user").await;
    let fan = app.register("HelloKitty", "user").await;

    let by_content = app.create_post(&alice, "Well HELLO there").await;
    let by_author = app.create_post(&fan, "meow").await;
    app.create_post(&alice, "goodbye").await;
    let hidden = app.create_post(&alice, "hello from the grave").await;
    app.delete(&format!("/posts/{hidden}"), &alice.token).await;

    let (status, body) = app.get("/posts/search?q=hello", &alice.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["posts"]), vec![by_author, by_content]);
    assert_eq!(body["pagination"]["total"], 2);

    for query in ["/posts/search", "/posts/search?q=", "/posts/search?q=%20%20"] {
        let (status, body) = app.get(query, &alice.token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        assert_eq!(body["error"], "Search query is required");
    }
}

#[tokio::test]
async fn comments_require_a_live_parent() {
    let app = TestApp::new();
    let admin = app.register("admin", "admin").await;
    let author = app.register("author", "user").await;
    let post = app.create_post(&author, "short-lived").await;
    let early = app.create_comment(&author, post, "early").await;

    app.delete(&format!("/posts/{post}"), &author.token).await;

    for user in [&author, &admin] {
        let (status, _) = app
            .post(&format!("/posts/{post}/comments"), &user.token, json!({ "content": "late" }))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // Existing comments survive the parent's deletion, visible to admins.
    let (status, body) = app.get(&format!("/posts/{post}/comments"), &admin.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["comments"]), vec![early]);
    assert_eq!(body["comments"][0]["deleted"], false);

    let (status, _) = app.get(&format!("/posts/{post}/comments"), &author.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_content_cannot_be_edited_even_by_admins() {
    let app = TestApp::new();
    let admin = app.register("admin", "admin").await;
    let owner = app.register("owner", "user").await;
    let post = app.create_post(&owner, "gone soon").await;

    let (status, _) = app.delete(&format!("/posts/{post}"), &admin.token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .put(&format!("/posts/{post}"), &admin.token, json!({ "content": "revive" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Deleted content cannot be edited");

    // Deleting again is a no-op for admins.
    let (status, _) = app.delete(&format!("/posts/{post}"), &admin.token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn content_is_validated_and_trimmed() {
    let app = TestApp::new();
    let owner = app.register("owner", "user").await;

    let (status, body) = app.post("/posts", &owner.token, json!({ "content": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Content is required");

    let (status, body) = app.post("/posts", &owner.token, json!({ "content": "  hi  " })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["post"]["content"], "hi");
    assert_eq!(body["post"]["edited"], false);
    assert_eq!(body["post"]["comment_count"], 0);

    let (status, body) = app.get("/posts/abc", &owner.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "path");
}
