//! Notes RPC server: JSON-RPC over stdin/stdout for a UI shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"note.add", "params":{"content":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}

use std::path::PathBuf;

use log::{error, info};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};

use notes_app::app::App;
use notes_app::logging::init_logging;
use notes_app::rpc_handler::handle_method;
use notes_app::services::config_loader::{ConfigLoader, ConfigLoaderTrait};

/// Overrides the config file location.
const ENV_CONFIG_PATH: &str = "NOTES_CONFIG";
/// Overrides the directory holding `notes.db`.
const ENV_DATA_DIR: &str = "NOTES_DATA_DIR";

async fn send(stdout: &mut Stdout, message: &Value) -> std::io::Result<()> {
    let mut line = message.to_string();
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let loader = ConfigLoader::new(std::env::var(ENV_CONFIG_PATH).ok());
    let config = loader.load().map_err(|e| {
        error!("{}", e);
        e
    })?;
    let mut app = match std::env::var(ENV_DATA_DIR) {
        Ok(dir) => App::with_data_dir(config, &PathBuf::from(dir))?,
        Err(_) => App::from_config(config)?,
    };

    let mut stdout = tokio::io::stdout();
    send(
        &mut stdout,
        &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}),
    )
    .await?;
    info!("rpc server ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                send(&mut stdout, &json!({"id": null, "error": format!("parse error: {}", e)})).await?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&mut app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        send(&mut stdout, &response).await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
