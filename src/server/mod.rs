//! Local HTTP service exposing fit sessions, stats, validation and the
//! candidate search over a plain TCP listener.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

pub mod api;
pub mod routes;
pub mod session;

use crate::catalog::MemoryCatalog;
use session::SessionStore;

/// Shared server state: the read-only catalog plus the session store.
pub struct ServerContext {
    pub catalog: MemoryCatalog,
    pub sessions: SessionStore,
}

impl ServerContext {
    pub fn new(catalog: MemoryCatalog) -> Self {
        Self {
            catalog,
            sessions: SessionStore::new(),
        }
    }
}

pub fn run_server(bind_addr: &str, catalog: MemoryCatalog) -> std::io::Result<()> {
    let ctx = ServerContext::new(catalog);
    let listener = TcpListener::bind(bind_addr)?;
    println!("drydock server listening on http://{bind_addr}");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&ctx, &mut stream) {
                    eprintln!("request error: {err}");
                }
            }
            Err(err) => eprintln!("connection failed: {err}"),
        }
    }

    Ok(())
}

fn handle_connection(ctx: &ServerContext, stream: &mut TcpStream) -> std::io::Result<()> {
    let mut buffer = [0_u8; 65_536];
    let bytes_read = stream.read(&mut buffer)?;
    if bytes_read == 0 {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&buffer[..bytes_read]);
    let mut lines = request.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET");
    let path = request_parts.next().unwrap_or("/");

    let body = request
        .split("\r\n\r\n")
        .nth(1)
        .or_else(|| request.split("\n\n").nth(1))
        .unwrap_or("");

    let response = routes::route_request(ctx, method, path, body).to_http_string();
    stream.write_all(response.as_bytes())?;
    stream.flush()?;
    Ok(())
}
