// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub fn relais() -> Command {
    let mut cmd = cargo_bin_cmd!("relais");
    cmd.env_remove("RELAIS_DIR").env_remove("RELAIS_LOG");
    cmd
}

/// Returns a URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Helper to create an initialized temp directory pointing at `url`
pub fn init_temp_with(url: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    relais()
        .arg("init")
        .arg("--remote")
        .arg(url)
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to create an initialized temp directory with an unreachable remote
pub fn init_temp() -> TempDir {
    init_temp_with(&unreachable_url())
}

/// Helper to enqueue an operation and return its ID
pub fn enqueue(temp: &TempDir, args: &[&str]) -> String {
    let output = relais()
        .arg("enqueue")
        .args(args)
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Helper to enqueue a producer create and return its ID
pub fn enqueue_producteur(temp: &TempDir, nom: &str) -> String {
    let data = format!(r#"{{"nom_complet":"{}"}}"#, nom);
    enqueue(temp, &["producteur", "create", "--data", &data])
}

/// Minimal HTTP server answering each connection with the next canned
/// `(status line, body)` pair. Returns the base URL, the request lines
/// seen so far, and the server thread.
pub fn serve(
    responses: Vec<(&'static str, &'static str)>,
) -> (String, Arc<Mutex<Vec<String>>>, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_server = Arc::clone(&seen);

    let handle = std::thread::spawn(move || {
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut length = 0usize;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some(v) = header.to_ascii_lowercase().strip_prefix("content-length:") {
                    length = v.trim().parse().unwrap();
                }
            }
            let mut request_body = vec![0u8; length];
            reader.read_exact(&mut request_body).unwrap();
            seen_by_server
                .lock()
                .unwrap()
                .push(request_line.trim_end().to_string());

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
        }
    });

    (url, seen, handle)
}
