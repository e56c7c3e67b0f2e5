use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use codebook_core::error::Error;
use codebook_generate::{build_prompt, collect_stream_fragments, OllamaClient};

#[test]
fn fragments_join_with_single_spaces_in_stream_order() {
    let body = "{\"response\":\"A\"}\n{\"response\":\"B\"}\n";
    assert_eq!(collect_stream_fragments(body), "A B");
}

#[test]
fn malformed_lines_are_skipped_silently() {
    let body = "{\"response\":\"A\"}\nnot json\n{\"done\":true}\n{\"response\":\"B\"}";
    assert_eq!(collect_stream_fragments(body), "A B");
}

#[test]
fn empty_stream_yields_empty_answer() {
    assert_eq!(collect_stream_fragments(""), "");
    assert_eq!(collect_stream_fragments("\n\n"), "");
}

#[test]
fn prompt_carries_both_contexts_and_query() {
    let prompt = build_prompt("some text", "NO TABLE", "what is a flue?");
    assert!(prompt.contains("some text"));
    assert!(prompt.contains("NO TABLE"));
    assert!(prompt.contains("what is a flue?"));
}

// Minimal one-shot HTTP responder; enough for a client that sends one POST
// and reads one body.
fn spawn_http_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nContent-Type: application/x-ndjson\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}")
}

fn read_request(stream: &mut std::net::TcpStream) {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                data.extend_from_slice(&buf[..n]);
                if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(&data[..pos]).to_ascii_lowercase();
                    let content_length = headers
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if data.len() >= pos + 4 + content_length {
                        break;
                    }
                }
            }
            Err(_) => break,
        }
    }
}

#[tokio::test]
async fn ok_response_concatenates_fragments() -> anyhow::Result<()> {
    let base = spawn_http_once("200 OK", "{\"response\":\"A\"}\n{\"response\":\"B\"}\n");
    let client = OllamaClient::new(&base, "llama3", Duration::from_secs(5))?;
    let answer = client.generate("masonry?").await?;
    assert_eq!(answer, "A B");
    Ok(())
}

#[tokio::test]
async fn non_200_surfaces_status_and_body() -> anyhow::Result<()> {
    let base = spawn_http_once("500 Internal Server Error", "model exploded");
    let client = OllamaClient::new(&base, "llama3", Duration::from_secs(5))?;
    let err = client.generate("masonry?").await.expect_err("500");
    match &err {
        Error::GenerationApi { status, body } => {
            assert_eq!(*status, 500);
            assert!(body.contains("model exploded"));
        }
        other => panic!("expected GenerationApi, got {other:?}"),
    }
    assert!(err.to_string().contains("500"));
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_connection_error() -> anyhow::Result<()> {
    // Grab a free port, then close the listener so nothing is there.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };
    let client = OllamaClient::new(&format!("http://127.0.0.1:{port}"), "llama3", Duration::from_secs(5))?;
    let err = client.generate("masonry?").await.expect_err("refused");
    assert!(matches!(err, Error::GenerationConnection(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn stalled_backend_times_out_as_its_own_kind() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request(&mut stream);
            // Hold the connection open well past the client deadline.
            thread::sleep(Duration::from_secs(5));
        }
    });
    let client = OllamaClient::new(&format!("http://{addr}"), "llama3", Duration::from_secs(1))?;
    let err = client.generate("masonry?").await.expect_err("timeout");
    assert!(matches!(err, Error::GenerationTimeout(1)), "got {err:?}");
    Ok(())
}
