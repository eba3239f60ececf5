//! Static file server for the built game
//!
//! Serves one directory over plain HTTP:
//!
//! - `GET`/`HEAD /a/b.js` returns the file with a content type picked from
//!   its extension
//! - a directory resolves to its `index.html`, or an HTML listing when there
//!   is none; `/dir` redirects to `/dir/`
//! - anything missing, or trying to climb out with `..`, is a 404
//! - other methods get 405

pub mod mime;

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Router;
use tokio::net::TcpListener;

use crate::error::WasmkitError;
use mime::content_type_for;

#[derive(Debug)]
struct StaticRoot {
    dir: PathBuf,
}

/// Router serving every path below `static_dir`
pub fn router(static_dir: PathBuf) -> Router {
    Router::new()
        .fallback(serve_static)
        .with_state(Arc::new(StaticRoot { dir: static_dir }))
}

/// A bound, not yet running, static file server
pub struct StaticServer {
    listener: TcpListener,
    static_dir: PathBuf,
}

impl StaticServer {
    /// Bind `addr` (e.g. `0.0.0.0:8888`)
    pub async fn bind(addr: &str, static_dir: PathBuf) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| WasmkitError::server(addr, e.to_string()))?;
        Ok(Self {
            listener,
            static_dir,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to read bound address")
    }

    /// Serve until Ctrl-C
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            // An error here means no signal handler could be installed;
            // keep serving until the process is killed instead.
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve until `shutdown` completes, then drain open connections
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, router(self.static_dir))
            .with_graceful_shutdown(shutdown)
            .await
            .context("serving HTTP")
    }
}

async fn serve_static(State(root): State<Arc<StaticRoot>>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
            "Method Not Allowed",
        )
            .into_response();
    }

    let Some(relative) = request_path(uri.path()) else {
        return not_found();
    };
    let path = root.dir.join(&relative);

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(_) => return not_found(),
    };

    if !metadata.is_dir() {
        return file_response(&method, &path).await;
    }

    if !uri.path().ends_with('/') {
        // a leading `//` would make Location protocol-relative
        let local = format!("/{}", uri.path().trim_start_matches('/'));
        let target = match uri.query() {
            Some(query) => format!("{}/?{}", local, query),
            None => format!("{}/", local),
        };
        return Redirect::permanent(&target).into_response();
    }

    let index = path.join("index.html");
    if tokio::fs::metadata(&index).await.map(|m| m.is_file()).unwrap_or(false) {
        return file_response(&method, &index).await;
    }

    match directory_listing(&path, uri.path()).await {
        Ok(html) if method == Method::HEAD => head_response("text/html; charset=utf-8", html.len()),
        Ok(html) => Html(html).into_response(),
        Err(_) => not_found(),
    }
}

/// Decode a request path into a path relative to the served directory.
///
/// Returns `None` for anything that could escape it.
fn request_path(uri_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(uri_path).ok()?;
    let mut relative = PathBuf::new();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains(['\\', ':', '\0']) => return None,
            s => relative.push(s),
        }
    }

    Some(relative)
}

async fn file_response(method: &Method, path: &Path) -> Response {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(_) => return not_found(),
    };
    let content_type = content_type_for(path);

    if method == Method::HEAD {
        return head_response(content_type, bytes.len());
    }

    ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
}

async fn directory_listing(dir: &Path, uri_path: &str) -> std::io::Result<String> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().to_string();
        if entry.file_type().await?.is_dir() {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();

    let title = escape_html(uri_path);
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Directory listing for {title}</title></head>\n\
         <body>\n<h1>Directory listing for {title}</h1>\n<ul>\n"
    );
    for name in &names {
        let (stem, slash) = match name.strip_suffix('/') {
            Some(stem) => (stem, "/"),
            None => (name.as_str(), ""),
        };
        html.push_str(&format!(
            "<li><a href=\"{}{}\">{}</a></li>\n",
            urlencoding::encode(stem),
            slash,
            escape_html(name)
        ));
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    Ok(html)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn head_response(content_type: &str, len: usize) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, len.to_string()),
        ],
        Body::empty(),
    )
        .into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
