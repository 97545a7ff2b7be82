use anyhow::{anyhow, Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use log::{debug, error, info, warn};
use tiny_http::{Header, Request, Response, Server};

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use rosterdb::consts::MAX_BODY_BYTES;
use rosterdb::{api, metrics, RosterConfig, Store};

#[derive(Parser, Debug)]
#[command(
    name = "rosterdb_server",
    version,
    about = "rosterdb HTTP API for roster collections and calendar week snapshots"
)]
struct Opt {
    /// Listen address (default: ROSTER_HTTP_ADDR or 0.0.0.0:8000)
    #[arg(long)]
    addr: Option<String>,
    /// Data directory (default: ROSTER_DATA_DIR or ./data)
    #[arg(long)]
    path: Option<PathBuf>,
    /// Worker threads pulling requests from the listener
    #[arg(long, default_value_t = 4)]
    workers: usize,
}

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let opt = Opt::parse();

    let mut cfg = RosterConfig::from_env();
    if let Some(p) = opt.path {
        cfg = cfg.with_data_dir(p);
    }
    if let Some(a) = opt.addr {
        cfg = cfg.with_http_addr(a);
    }
    let addr = cfg.http_addr.clone();

    let store = Arc::new(Store::open_with_config(cfg).context("open store")?);
    let server =
        Arc::new(Server::http(&addr).map_err(|e| anyhow!("bind http at {}: {}", addr, e))?);
    info!(
        "rosterdb_server listening on {} (data_dir={})",
        addr,
        store.root().display()
    );

    let workers = opt.workers.max(1);
    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let server = Arc::clone(&server);
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || serve(&server, &store)));
    }
    for h in handles {
        if h.join().is_err() {
            warn!("worker thread panicked");
        }
    }
    Ok(())
}

fn serve(server: &Server, store: &Store) {
    loop {
        let rq = match server.recv() {
            Ok(rq) => rq,
            Err(e) => {
                warn!("http recv error: {}", e);
                continue;
            }
        };
        respond(store, rq);
    }
}

fn respond(store: &Store, mut rq: Request) {
    let url = rq.url().to_string();
    let method = rq.method().as_str().to_string();
    debug!("{} {}", method, url);

    if method == "OPTIONS" {
        let resp = with_cors(Response::from_string("").with_status_code(204));
        let _ = rq.respond(resp);
        return;
    }

    if method == "GET" && url == "/metrics" {
        let mut resp = Response::from_string(metrics::render_prometheus());
        if let Ok(ct) = Header::from_bytes(b"Content-Type", b"text/plain; version=0.0.4") {
            resp.add_header(ct);
        }
        let _ = rq.respond(resp);
        return;
    }

    let reply = match api::read_body(rq.as_reader(), MAX_BODY_BYTES) {
        Ok(body) => api::handle(store, &method, &url, &body),
        Err(r) => {
            warn!("{} {}: body rejected ({})", method, url, r.status);
            r
        }
    };
    let text = serde_json::to_string(&reply.body).unwrap_or_else(|_| "null".to_string());
    let mut resp = Response::from_string(text).with_status_code(reply.status);
    if let Ok(ct) = Header::from_bytes(b"Content-Type", b"application/json; charset=utf-8") {
        resp.add_header(ct);
    }
    let _ = rq.respond(with_cors(resp));
}

fn with_cors<R: Read>(mut resp: Response<R>) -> Response<R> {
    let headers: [(&[u8], &[u8]); 3] = [
        (b"Access-Control-Allow-Origin", b"*"),
        (b"Access-Control-Allow-Methods", b"GET, POST, PUT, DELETE, OPTIONS"),
        (b"Access-Control-Allow-Headers", b"*"),
    ];
    for (k, v) in headers {
        if let Ok(h) = Header::from_bytes(k, v) {
            resp.add_header(h);
        }
    }
    resp
}
