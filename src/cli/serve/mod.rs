//! Live preview server.
//!
//! Serves a single shell page over HTTP. Content reaches the page over the
//! WebSocket opened by its embedded script, driven by the actor system.

mod lifecycle;
mod response;

use crate::{
    config::cfg,
    debug, log,
    utils::path::{expand_tilde, normalize_file_path},
};
use anyhow::{Result, bail};
use crossbeam::channel;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiny_http::{Method, Request, Server};

/// Number of threads answering HTTP requests.
const REQUEST_THREADS: usize = 4;

/// Serve a live preview of `file` until shutdown is requested.
pub fn serve(file: &Path) -> Result<()> {
    let file = resolve_file(file)?;
    let config = cfg();

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    // Bound before the first page is served so the script gets the real port
    let (ws_listener, ws_port) = crate::reload::server::bind(config.serve.interface, config.serve.ws_port)?;
    debug!("ws"; "ws://{}:{}", config.serve.interface, ws_port);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    let url = format!("http://{addr}");
    log!("serve"; "{} -> {}", file.display(), url);

    if config.serve.open
        && let Err(e) = crate::utils::browser::open_url(&url)
    {
        log!("open"; "{:#}", e);
    }

    let actor_handle = lifecycle::spawn_actors(Arc::clone(&config), file.clone(), addr, ws_listener, shutdown_rx);

    let page = Arc::new(crate::embed::serve::shell_page(&file.display().to_string(), ws_port));

    run_request_loop(&server, &page)?;
    lifecycle::wait_for_shutdown(actor_handle);
    Ok(())
}

/// Expand and absolutize the previewed path.
///
/// The file itself may not exist yet, but its directory must, since that
/// is what gets watched.
fn resolve_file(file: &Path) -> Result<PathBuf> {
    let file = normalize_file_path(&expand_tilde(file));
    match file.parent() {
        Some(dir) if dir.is_dir() => Ok(file),
        Some(dir) => bail!("directory does not exist: {}", dir.display()),
        None => bail!("not a file path: {}", file.display()),
    }
}

fn run_request_loop(server: &Server, page: &Arc<String>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()?;

    for request in server.incoming_requests() {
        let page = Arc::clone(page);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &page) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, page: &str) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }

    match route(request.url()) {
        Route::Shell => response::respond_shell(request, page),
        Route::NotFound => response::respond_not_found(request),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Shell,
    NotFound,
}

fn route(url: &str) -> Route {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    match path {
        "/" | "/index.html" => Route::Shell,
        _ => Route::NotFound,
    }
}
