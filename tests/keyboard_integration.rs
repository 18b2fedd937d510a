//! Keyboard visualizer integration tests
//!
//! HTTP tests run the client against a throwaway server on a local port.

use dotfolio::core::error::DotfolioError;
use dotfolio::keyboard::*;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const HYPRLAND_BODY: &str = r#"[
    {"category": "Windows", "key": "Q", "modifiers": ["cmd"], "action": "Close window"},
    {"category": "Apps", "key": "Return", "modifiers": ["cmd"], "action": "Terminal"},
    {"category": "Windows", "key": "F", "modifiers": ["cmd", "shift"], "action": "Fullscreen"}
]"#;

const YABAI_BODY: &str = r#"[
    {"category": "Spaces", "key": "1", "modifiers": ["alt"], "action": "Focus space 1", "platform": "yabai"}
]"#;

/// Request paths seen by the mock server
type Requests = Arc<Mutex<Vec<String>>>;

/// Serve `(path, status, body)` routes until the test ends
async fn spawn_server(routes: Vec<(&'static str, u16, &'static str)>) -> (String, Requests) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let head = String::from_utf8_lossy(&buf);
            let path = head
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or("")
                .to_string();
            seen.lock().unwrap().push(path.clone());

            let (status, body) = routes
                .iter()
                .find(|(route, _, _)| *route == path)
                .map(|(_, status, body)| (*status, *body))
                .unwrap_or((404, "not found"));
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{}", addr), requests)
}

fn client(base_url: &str) -> KeybindClient {
    KeybindClient::new(base_url, Duration::from_secs(5)).unwrap()
}

// ============================================================================
// Fetching
// ============================================================================

#[tokio::test]
async fn test_switch_platform_fetches_once_and_updates_url() {
    let (base_url, requests) = spawn_server(vec![
        ("/api/keybinds/hyprland", 200, HYPRLAND_BODY),
        ("/api/keybinds/yabai", 200, YABAI_BODY),
    ])
    .await;
    let client = client(&base_url);

    let mut location = PageLocation::parse("/dotfiles");
    let mut viz = KeyboardViz::from_location(&location, Platform::Yabai);
    assert_eq!(viz.platform(), Platform::Yabai);

    let ticket = viz.switch_platform(Platform::Hyprland, &mut location);
    assert!(viz.is_loading());
    assert_eq!(location.href(), "/dotfiles?platform=hyprland");

    let (ticket, result) = client.fetch_ticket(ticket).await;
    assert_eq!(viz.complete_fetch(ticket, result), FetchOutcome::Applied(3));
    assert!(!viz.is_loading());

    let requests = requests.lock().unwrap().clone();
    assert_eq!(requests, vec!["/api/keybinds/hyprland".to_string()]);
}

#[tokio::test]
async fn test_error_status_keeps_previous_list() {
    let (base_url, _) = spawn_server(vec![
        ("/api/keybinds/yabai", 200, YABAI_BODY),
        ("/api/keybinds/hyprland", 500, "boom"),
    ])
    .await;
    let client = client(&base_url);

    let mut location = PageLocation::parse("/");
    let mut viz = KeyboardViz::from_location(&location, Platform::Yabai);
    let (ticket, result) = client.fetch_ticket(viz.begin_fetch()).await;
    assert_eq!(viz.complete_fetch(ticket, result), FetchOutcome::Applied(1));

    let ticket = viz.switch_platform(Platform::Hyprland, &mut location);
    let (ticket, result) = client.fetch_ticket(ticket).await;
    assert!(matches!(
        result,
        Err(DotfolioError::HttpStatus { status: 500, .. })
    ));
    assert_eq!(viz.complete_fetch(ticket, result), FetchOutcome::Failed);
    assert_eq!(viz.keybinds().len(), 1);
    assert_eq!(viz.keybinds()[0].action, "Focus space 1");
    assert!(!viz.is_loading());
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let (base_url, _) =
        spawn_server(vec![("/api/keybinds/yabai", 200, r#"{"not": "a list"}"#)]).await;
    let result = client(&base_url).fetch(Platform::Yabai).await;
    assert!(matches!(result, Err(DotfolioError::Parse(_))));
}

#[tokio::test]
async fn test_out_of_order_responses_keep_latest_platform() {
    let (base_url, _) = spawn_server(vec![
        ("/api/keybinds/hyprland", 200, HYPRLAND_BODY),
        ("/api/keybinds/yabai", 200, YABAI_BODY),
    ])
    .await;
    let client = client(&base_url);

    let mut location = PageLocation::parse("/");
    let mut viz = KeyboardViz::new(Platform::Yabai);
    let first = viz.switch_platform(Platform::Hyprland, &mut location);
    let second = viz.switch_platform(Platform::Yabai, &mut location);

    // The newer request lands first
    let (second, newer) = client.fetch_ticket(second).await;
    let (first, older) = client.fetch_ticket(first).await;
    assert_eq!(viz.complete_fetch(second, newer), FetchOutcome::Applied(1));
    assert_eq!(viz.complete_fetch(first, older), FetchOutcome::Stale);
    assert_eq!(viz.platform(), Platform::Yabai);
    assert_eq!(viz.keybinds()[0].category, "Spaces");
    assert_eq!(location.query_param("platform"), Some("yabai"));
}

// ============================================================================
// Hover and highlighting
// ============================================================================

#[test]
fn test_hovering_key_shows_every_matching_bind() {
    let mut viz = KeyboardViz::new(Platform::Hyprland);
    let ticket = viz.begin_fetch();
    viz.complete_fetch(ticket, parse_keybinds(HYPRLAND_BODY));

    let cmd_key = find_key("cmd").unwrap();
    viz.on_key_hover(cmd_key);
    let info = viz.hover_info();
    assert_eq!(info.title, "Cmd + Q, Cmd + RETURN, Cmd + Shift + F");
    assert_eq!(info.desc, "Close window | Terminal | Fullscreen");

    let q = find_key("q").unwrap();
    assert_eq!(viz.key_state(q), KeyState::Highlighted);
    assert_eq!(viz.key_state(cmd_key), KeyState::Modifier { highlighted: true });

    viz.on_key_leave();
    assert_eq!(viz.hover_info(), &HoverInfo::default());
    assert_eq!(viz.key_state(q), KeyState::Active);
}

#[test]
fn test_page_url_selects_initial_platform() {
    let location = PageLocation::parse("/dotfiles?platform=hyprland");
    assert_eq!(
        KeyboardViz::from_location(&location, Platform::Yabai).platform(),
        Platform::Hyprland
    );
    let location = PageLocation::parse("/dotfiles?platform=windows");
    assert_eq!(
        KeyboardViz::from_location(&location, Platform::Yabai).platform(),
        Platform::Yabai
    );
}

#[test]
fn test_page_url_platform_is_percent_decoded() {
    let location = PageLocation::parse("/dotfiles?platform=%68yprland");
    assert_eq!(
        KeyboardViz::from_location(&location, Platform::Yabai).platform(),
        Platform::Hyprland
    );
    let location = PageLocation::parse("/dotfiles?theme=dark+mode&platform=Y%61BAI");
    assert_eq!(
        KeyboardViz::from_location(&location, Platform::Hyprland).platform(),
        Platform::Yabai
    );
}

// ============================================================================
// Grouping
// ============================================================================

fn keybind_strategy() -> impl Strategy<Value = Keybind> {
    ("[A-C]", "[a-z0-9]", "[a-z ]{1,10}").prop_map(|(category, key, action)| {
        Keybind::new(&category, &key, &["cmd"], &action)
    })
}

proptest! {
    #[test]
    fn test_grouping_partitions_keybinds(keybinds in prop::collection::vec(keybind_strategy(), 0..30)) {
        let mut viz = KeyboardViz::new(Platform::Yabai);
        let ticket = viz.begin_fetch();
        viz.complete_fetch(ticket, Ok(keybinds.clone()));

        let groups = viz.grouped_keybinds();
        let total: usize = groups.iter().map(|(_, entries)| entries.len()).sum();
        prop_assert_eq!(total, keybinds.len());

        // Categories appear once, in order of first appearance
        let mut firsts: Vec<&str> = Vec::new();
        for kb in &keybinds {
            if !firsts.contains(&kb.category.as_str()) {
                firsts.push(kb.category.as_str());
            }
        }
        let categories: Vec<&str> = groups.iter().map(|(category, _)| *category).collect();
        prop_assert_eq!(categories, firsts);

        for (category, entries) in &groups {
            let expected: Vec<&Keybind> =
                keybinds.iter().filter(|kb| kb.category == *category).collect();
            prop_assert_eq!(entries, &expected);
        }
    }
}
