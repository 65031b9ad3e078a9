use std::{
    io::{Read, Write},
    net::TcpListener,
    thread::{self, JoinHandle},
    time::Duration,
};

use asteroids_core::{HighscoreEntry, HighscoreList, LeaderboardRequest};
use leaderboard::{
    LeaderboardConfig, LeaderboardError, LeaderboardSync, LocalStore, RemoteConfig,
    RemoteLeaderboard,
};
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(5);

/// Serves exactly one HTTP response and returns the raw request it saw.
fn one_shot_server(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            request.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= head_end + 4 + content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        stream.write_all(response.as_bytes()).unwrap();
        String::from_utf8_lossy(&request).to_string()
    });

    (base_url, handle)
}

fn remote_config(base_url: String) -> RemoteConfig {
    RemoteConfig {
        base_url,
        api_key: "anon-key".to_string(),
        table: "highscores".to_string(),
        timeout: Duration::from_secs(2),
    }
}

#[test]
fn fetch_top_sends_query_and_auth() {
    let (base_url, server) = one_shot_server(
        "200 OK",
        r#"[{"name":"ALPHA","score":900,"wave":4,"ship":"THE WAVE"},{"name":"BAD","score":1}]"#,
    );
    let remote = RemoteLeaderboard::new(remote_config(base_url));

    let list = remote.fetch_top(10).unwrap();
    let request = server.join().unwrap();

    assert_eq!(list.len(), 1);
    assert_eq!(list.entries()[0].name, "ALPHA");
    assert!(request.starts_with("GET /rest/v1/highscores?"));
    assert!(request.contains("order=score.desc"));
    assert!(request.contains("limit=10"));
    assert!(request.to_ascii_lowercase().contains("apikey: anon-key"));
    assert!(request.contains("Bearer anon-key"));
}

#[test]
fn submit_posts_minimal_json() {
    let (base_url, server) = one_shot_server("201 Created", "");
    let remote = RemoteLeaderboard::new(remote_config(base_url));
    let entry = HighscoreEntry::new("ACE  ", 1_500, 6, "INTERSTELLAR");

    remote.submit(&entry).unwrap();
    let request = server.join().unwrap();

    assert!(request.starts_with("POST /rest/v1/highscores"));
    assert!(request.to_ascii_lowercase().contains("prefer: return=minimal"));
    assert!(request.contains(r#""name":"ACE  ""#));
    assert!(request.contains(r#""score":1500"#));
}

#[test]
fn server_error_surfaces_status() {
    let (base_url, server) = one_shot_server("500 Internal Server Error", r#"{"msg":"down"}"#);
    let remote = RemoteLeaderboard::new(remote_config(base_url));

    let err = remote.fetch_top(10).unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, LeaderboardError::Http { status: 500, .. }), "{err}");
}

#[test]
fn invalid_entry_is_rejected_before_sending() {
    let remote = RemoteLeaderboard::new(remote_config("http://127.0.0.1:9".to_string()));
    let err = remote
        .submit(&HighscoreEntry::new("AB", 10, 1, ""))
        .unwrap_err();
    assert!(matches!(err, LeaderboardError::Invalid(_)));
}

#[test]
fn offline_fetch_serves_local_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("top10.json");
    let mut list = HighscoreList::new();
    list.insert("LOCAL", 400, 2, "THE WAVE");
    LocalStore::open(&path).save(&list).unwrap();

    let sync = LeaderboardSync::spawn(&LeaderboardConfig::offline(&path)).unwrap();
    sync.request_fetch(false).unwrap();
    let update = sync.wait(WAIT).expect("worker answers");

    assert!(update.offline);
    assert_eq!(update.highscores, list);
}

#[test]
fn offline_submit_persists_and_refetches() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("top10.json");
    let sync = LeaderboardSync::spawn(&LeaderboardConfig::offline(&path)).unwrap();

    let mut session_list = HighscoreList::new();
    session_list.insert("NEWBY", 650, 3, "TERMINATOR");
    let entry = session_list.entries()[0].clone();

    sync.handle(LeaderboardRequest::Submit(entry), &session_list)
        .unwrap();
    let update = sync.wait(WAIT).expect("refetch after submit");

    assert!(update.offline);
    assert_eq!(update.highscores.entries()[0].name, "NEWBY");
    assert_eq!(sync.local_store().load(), session_list);
}

#[test]
fn unreachable_remote_falls_back_to_cache() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("top10.json");
    let mut list = HighscoreList::new();
    list.insert("CACHE", 300, 1, "");
    LocalStore::open(&path).save(&list).unwrap();

    // Bind then drop so the port refuses connections.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = LeaderboardConfig {
        remote: Some(remote_config(format!("http://127.0.0.1:{port}"))),
        cache_window: Duration::from_secs(30),
        highscore_file: path,
    };

    let sync = LeaderboardSync::spawn(&config).unwrap();
    sync.request_fetch(true).unwrap();
    let update = sync.wait(WAIT).expect("fallback snapshot");

    assert!(update.offline);
    assert_eq!(update.highscores, list);
}

#[test]
fn fresh_remote_cache_skips_refetch() {
    let dir = TempDir::new().unwrap();
    let (base_url, server) = one_shot_server(
        "200 OK",
        r#"[{"name":"TOPPY","score":5000,"wave":9,"ship":"THE WAVE"}]"#,
    );
    let config = LeaderboardConfig {
        remote: Some(remote_config(base_url)),
        cache_window: Duration::from_secs(30),
        highscore_file: dir.path().join("top10.json"),
    };

    let sync = LeaderboardSync::spawn(&config).unwrap();
    sync.request_fetch(false).unwrap();
    let update = sync.wait(WAIT).expect("remote snapshot");
    server.join().unwrap();
    assert!(!update.offline);
    assert_eq!(update.highscores.top_score(), 5_000);
    assert_eq!(sync.local_store().load(), update.highscores);

    sync.request_fetch(false).unwrap();
    assert_eq!(sync.wait(Duration::from_millis(200)), None);
}
