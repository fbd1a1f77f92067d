//! End-to-end test of `quizsmith generate` against a mocked Ollama server.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quizsmith(home: &TempDir, ollama_url: &str) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizsmith").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("QUIZSMITH_OLLAMA_URL", ollama_url)
        .env_remove("QUIZSMITH_MODEL");
    cmd
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "message": {"role": "assistant", "content": content},
        "model": "llama3.2:latest",
        "done": true
    }))
}

const QUIZ_REPLY: &str = "\
1. What do plants produce during photosynthesis?
A. Salt
B. Sugar
C. Iron
D. Sand
Answer: B. Sugar

2. Which pigment absorbs light?
A. Chlorophyll
B. Keratin
C. Melanin
D. Hemoglobin
Answer: A. Chlorophyll
";

#[tokio::test(flavor = "multi_thread")]
async fn generate_from_document() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains("Summarize the following text"))
        .respond_with(chat_reply(
            "Plants use chlorophyll to turn light, water and carbon dioxide into sugar.",
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains("Generate 2 multiple-choice questions"))
        .respond_with(chat_reply(QUIZ_REPLY))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("notes.txt"),
        "Photosynthesis lets plants make sugar from light.\0 Chlorophyll absorbs the light.",
    )
    .unwrap();

    quizsmith(&home, &server.uri())
        .arg("generate")
        .arg("--input")
        .arg("notes.txt")
        .arg("--num-questions")
        .arg("2")
        .arg("--output")
        .arg("out")
        .arg("--time-limit")
        .arg("90")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Generated 2 question(s) (2 requested), 0 warning(s).",
        ));

    let out = home.path().join("out");
    let summary = std::fs::read_to_string(out.join("summary.txt")).unwrap();
    assert!(summary.starts_with("Summary of notes\n"));
    assert!(summary.contains("Plants use chlorophyll"));

    let quiz = std::fs::read_to_string(out.join("quiz.txt")).unwrap();
    assert!(quiz.contains("Answer: A. Chlorophyll"));

    let html = std::fs::read_to_string(out.join("quiz.html")).unwrap();
    assert!(html.contains("name=\"q2\" value=\"Chlorophyll\""));
    assert!(html.contains("const QUIZ_TIME_LIMIT = 90;"));
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_on_topic() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains("on the topic 'photosynthesis'"))
        .respond_with(chat_reply(QUIZ_REPLY))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    quizsmith(&home, &server.uri())
        .arg("generate")
        .arg("--topic")
        .arg("photosynthesis")
        .arg("--num-questions")
        .arg("2")
        .arg("--output")
        .arg("out")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 2 question(s)"));

    let out = home.path().join("out");
    assert!(out.join("quiz.txt").exists());
    assert!(!out.join("summary.txt").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_model_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    quizsmith(&home, &server.uri())
        .arg("generate")
        .arg("--topic")
        .arg("volcanoes")
        .arg("--model")
        .arg("missing:latest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ollama pull missing:latest"));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_models_marks_configured_model() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [
                {"name": "llama3.2:latest", "size": 2000000000_u64},
                {"name": "mistral:7b", "size": 4100000000_u64}
            ]
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    quizsmith(&home, &server.uri())
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("llama3.2:latest (2.0 GB) (configured)"))
        .stdout(predicate::str::contains("mistral:7b (4.1 GB)"));
}
