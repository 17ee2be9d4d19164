use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use crate::config::Config;
use crate::models::folder::FolderCreateRequest;
use crate::models::Folder;
use crate::routes;
use crate::store::FolderStore;

fn new_store() -> web::Data<FolderStore> {
    web::Data::new(FolderStore::new(&Config::default()))
}

async fn seed(store: &FolderStore, name: &str, parent: Option<&Folder>) -> Folder {
    store
        .create_folder(FolderCreateRequest {
            name: name.to_string(),
            description: None,
            parent_id: parent.map(|p| p.id.clone()),
            sort_order: None,
        })
        .await
        .unwrap()
}

#[actix_web::test]
async fn test_existing_breadcrumbs() {
    let store = new_store();
    let admin = seed(&store, "admin", None).await;
    let admin_1 = seed(&store, "admin_1", Some(&admin)).await;
    let admin_1_1 = seed(&store, "admin_1_1", Some(&admin_1)).await;

    let app =
        test::init_service(App::new().app_data(store.clone()).configure(routes::config)).await;

    let req = test::TestRequest::get()
        .uri(&format!("/files/{}", admin_1_1.id))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    let result: Value = serde_json::from_slice(&body).unwrap();

    let names: Vec<&str> = result["breadcrumbs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();

    assert_eq!(names, vec!["admin", "admin_1", "admin_1_1"]);
}

#[actix_web::test]
async fn test_missing_folder_is_404() {
    let app = test::init_service(App::new().app_data(new_store()).configure(routes::config)).await;

    let req = test::TestRequest::get().uri("/files/nope").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "The folder was not found.");
}

#[actix_web::test]
async fn test_create_folder_then_tree() {
    let store = new_store();
    let app =
        test::init_service(App::new().app_data(store.clone()).configure(routes::config)).await;

    let req = test::TestRequest::post()
        .uri("/create-folder")
        .set_json(json!({ "name": "Languages" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let parent_id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/create-folder")
        .set_json(json!({ "name": "Japanese", "parent_id": parent_id }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/folders/tree").to_request();
    let tree: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(tree.as_array().unwrap().len(), 1);
    assert_eq!(tree[0]["name"], "Languages");
    assert_eq!(tree[0]["children"][0]["name"], "Japanese");
}

#[actix_web::test]
async fn test_blank_name_is_rejected() {
    let app = test::init_service(App::new().app_data(new_store()).configure(routes::config)).await;

    let req = test::TestRequest::post()
        .uri("/create-folder")
        .set_json(json!({ "name": "  " }))
        .to_request();

    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_move_into_descendant_conflicts() {
    let store = new_store();
    let a = seed(&store, "A", None).await;
    let b = seed(&store, "B", Some(&a)).await;
    let app =
        test::init_service(App::new().app_data(store.clone()).configure(routes::config)).await;

    let req = test::TestRequest::post()
        .uri(&format!("/folders/{}/move", a.id))
        .set_json(json!({ "destination_id": b.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri(&format!("/folders/{}/move", b.id))
        .set_json(json!({}))
        .to_request();
    let moved: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(moved["folder"]["parent_id"], Value::Null);
}

#[actix_web::test]
async fn test_copy_and_rename() {
    let store = new_store();
    let a = seed(&store, "A", None).await;
    let b = seed(&store, "B", Some(&a)).await;
    let app =
        test::init_service(App::new().app_data(store.clone()).configure(routes::config)).await;

    let req = test::TestRequest::post()
        .uri(&format!("/folders/{}/copy", b.id))
        .set_json(json!({ "destination_id": a.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let copied: Value = test::read_body_json(resp).await;
    let copy_id = copied["id"].as_str().unwrap().to_string();
    assert_ne!(copy_id, b.id);

    let req = test::TestRequest::patch()
        .uri(&format!("/folders/{copy_id}"))
        .set_json(json!({ "name": "B (copy)" }))
        .to_request();
    let renamed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(renamed["folder"]["name"], "B (copy)");

    let req = test::TestRequest::get().uri(&format!("/files/{}", a.id)).to_request();
    let contents: Value = test::call_and_read_body_json(&app, req).await;
    let children: Vec<&str> = contents["child_folders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(children, vec!["B", "B (copy)"]);
}

#[actix_web::test]
async fn test_destination_options() {
    let store = new_store();
    let a = seed(&store, "A", None).await;
    let b = seed(&store, "B", Some(&a)).await;
    let app =
        test::init_service(App::new().app_data(store.clone()).configure(routes::config)).await;

    let req = test::TestRequest::get()
        .uri(&format!("/folders/{}/destinations?transfer=copy", b.id))
        .to_request();
    let options: Value = test::call_and_read_body_json(&app, req).await;
    let options = options.as_array().unwrap();

    assert_eq!(options.len(), 3);
    assert_eq!(options[0]["folder"], Value::Null);
    assert_eq!(options[0]["allowed"], true);
    // copying next to itself is allowed
    assert_eq!(options[1]["folder"]["id"], a.id.as_str());
    assert_eq!(options[1]["allowed"], true);
    assert_eq!(options[2]["reason"], "same_folder");

    let req = test::TestRequest::get()
        .uri(&format!("/folders/{}/destinations", b.id))
        .to_request();
    let options: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(options[1]["reason"], "current_parent");
}

#[actix_web::test]
async fn test_decks_live_in_folders() {
    let store = new_store();
    let a = seed(&store, "A", None).await;
    let app =
        test::init_service(App::new().app_data(store.clone()).configure(routes::config)).await;

    let req = test::TestRequest::post()
        .uri("/create-deck")
        .set_json(json!({ "name": "Hiragana" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let deck_id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/decks/{deck_id}/move"))
        .set_json(json!({ "destination_id": a.id }))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::get().uri(&format!("/files/{}", a.id)).to_request();
    let contents: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(contents["decks"][0]["name"], "Hiragana");

    let req = test::TestRequest::get().uri("/decks").to_request();
    let decks: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(decks.as_array().unwrap().len(), 1);
}
