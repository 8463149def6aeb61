use serde_json::json;
use std::sync::Arc;

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storystrip::config::{ImageServiceConfig, SessionConfig, TextServiceConfig};
use storystrip::pipeline::{ArtStyle, NullProgress, Pipeline, Preferences, StoryTone};
use storystrip::providers::{FireworksClient, GroqProvider, ImageRef};
use storystrip::session::{Session, Turn};

const MODEL_PATH: &str = "workflows/test-model";

fn session_config() -> SessionConfig {
    SessionConfig {
        cooldown_seconds: 0,
        ..Default::default()
    }
}

fn build_pipeline(text_server: &MockServer, image_server: &MockServer) -> Pipeline {
    let text_config = TextServiceConfig {
        api_base: text_server.uri(),
        api_key: Some("gq_test".to_string()),
        ..Default::default()
    };
    let image_config = ImageServiceConfig {
        api_base: image_server.uri(),
        model_path: MODEL_PATH.to_string(),
        max_attempts: 5,
        poll_interval_ms: 10,
        api_key: Some("fw_test".to_string()),
    };

    let text = Arc::new(GroqProvider::new(text_config).unwrap());
    let image = FireworksClient::new(image_config).unwrap();
    Pipeline::new(text, image, session_config())
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": { "role": "assistant", "content": content }
        }]
    })
}

fn seeded_session() -> Session {
    let mut session = Session::new(&session_config());
    session.conversation.append(Turn::user("long day at work"));
    session
        .conversation
        .append(Turn::assistant("Tell me more about it!"));
    session.conversation.append(Turn::user("we shipped the big release"));
    session
        .conversation
        .append(Turn::assistant("That is a huge milestone."));
    session
}

async fn mount_image_success(server: &MockServer, url: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/{MODEL_PATH}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request_id": "req-1"
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/{MODEL_PATH}/get_result")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Ready",
            "result": { "sample": url }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_chat_turn_round_trip() {
    let text_server = MockServer::start().await;
    let image_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gq_test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("That sounds like quite a day!")),
        )
        .expect(1)
        .mount(&text_server)
        .await;

    let pipeline = build_pipeline(&text_server, &image_server);
    let mut session = Session::new(&session_config());

    let reply = pipeline
        .handle_chat_turn(&mut session, "long day at work")
        .await
        .unwrap();

    assert_eq!(reply, "That sounds like quite a day!");
    assert_eq!(session.conversation.len(), 2);
}

#[tokio::test]
async fn test_short_conversation_makes_no_network_calls() {
    let text_server = MockServer::start().await;
    let image_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&text_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&image_server)
        .await;

    let pipeline = build_pipeline(&text_server, &image_server);
    let mut session = Session::new(&session_config());
    session.conversation.append(Turn::user("only one message"));

    let err = pipeline
        .generate_comic(&mut session, &Preferences::default(), &NullProgress)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Chat a little more first"));
}

#[tokio::test]
async fn test_comic_runs_stages_in_order() {
    let text_server = MockServer::start().await;
    let image_server = MockServer::start().await;

    // Each stage's template has a distinctive opening line, so matching
    // on body text pins each canned response to the right stage no
    // matter the order the mocks are declared in.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("master storyteller"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("DRAFT STORY")))
        .expect(1)
        .mount(&text_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("quality specialist"))
        .and(body_string_contains("DRAFT STORY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("FINAL STORY")))
        .expect(1)
        .mount(&text_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("visual storytelling expert"))
        .and(body_string_contains("FINAL STORY"))
        .and(body_string_contains("Cartoonish"))
        .and(body_string_contains("Inspirational"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("VISUAL PROMPT")))
        .expect(1)
        .mount(&text_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/{MODEL_PATH}")))
        .and(body_string_contains("VISUAL PROMPT"))
        .and(body_string_contains("3 panels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request_id": "req-1"
        })))
        .expect(1)
        .mount(&image_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/{MODEL_PATH}/get_result")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Ready",
            "result": { "sample": "https://cdn.example/comic.jpg" }
        })))
        .mount(&image_server)
        .await;

    let pipeline = build_pipeline(&text_server, &image_server);
    let mut session = seeded_session();
    let prefs = Preferences::new(ArtStyle::Cartoonish, StoryTone::Inspirational, 3).unwrap();

    let artifacts = pipeline
        .generate_comic(&mut session, &prefs, &NullProgress)
        .await
        .unwrap();

    assert_eq!(artifacts.story, "FINAL STORY");
    assert_eq!(artifacts.visual_prompt, "VISUAL PROMPT");
    assert_eq!(
        artifacts.image,
        ImageRef::Url("https://cdn.example/comic.jpg".to_string())
    );

    // The session remembers the enhanced prompt and image for /regen
    let stored = session.last_enhanced_prompt().unwrap();
    assert!(stored.contains("VISUAL PROMPT"));
    assert!(stored.contains("3 panels"));
    assert!(session.last_image().unwrap().is_url());
}

#[tokio::test]
async fn test_regenerate_reuses_stored_prompt_with_variation() {
    let text_server = MockServer::start().await;
    let image_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("STORY TEXT")))
        .mount(&text_server)
        .await;

    mount_image_success(&image_server, "https://cdn.example/first.jpg").await;

    let pipeline = build_pipeline(&text_server, &image_server);
    let mut session = seeded_session();

    pipeline
        .generate_comic(&mut session, &Preferences::default(), &NullProgress)
        .await
        .unwrap();

    // Second image server so the regeneration request can be asserted on
    // its own
    let regen_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/{MODEL_PATH}")))
        .and(body_string_contains("Alternative visual interpretation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request_id": "req-2"
        })))
        .expect(1)
        .mount(&regen_server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/{MODEL_PATH}/get_result")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Ready",
            "result": { "sample": "https://cdn.example/second.jpg" }
        })))
        .mount(&regen_server)
        .await;

    let regen_pipeline = build_pipeline(&text_server, &regen_server);
    let image = regen_pipeline
        .regenerate(&mut session, &NullProgress)
        .await
        .unwrap();

    assert_eq!(
        image,
        ImageRef::Url("https://cdn.example/second.jpg".to_string())
    );
    // The stored base prompt stays unsuffixed for the next regeneration
    assert!(!session
        .last_enhanced_prompt()
        .unwrap()
        .contains("Alternative visual interpretation"));
}
