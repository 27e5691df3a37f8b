// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{stdin, stdout, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use crate::resolution::{AiQuery, QueryResolver, ResolutionError};
use crate::search::SearchQuery;

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    text: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    specialty: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

/// Line-delimited JSON-RPC 2.0 server over stdio
pub struct ResolutionServer {
    resolver: QueryResolver,
}

impl ResolutionServer {
    pub fn new(resolver: QueryResolver) -> Self {
        Self { resolver }
    }

    /// Run the server on stdio until EOF
    pub async fn run(&self) -> Result<()> {
        self.serve(BufReader::new(stdin()), stdout()).await
    }

    /// Serve one request per line from `reader`, one response per line to `writer`
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                debug!("EOF received, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            debug!("Received request: {}", trimmed);

            let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => JsonRpcResponse::failure(None, PARSE_ERROR, format!("Parse error: {}", e)),
            };

            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        let params = request.params.unwrap_or(Value::Null);

        match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "serverInfo": {
                        "name": "clinresolve",
                        "version": env!("CARGO_PKG_VERSION")
                    },
                    "methods": ["resolve", "search", "usage"],
                    "logDirectory": crate::logging::get_log_directory()
                }),
            ),

            "resolve" => {
                let query: AiQuery = match serde_json::from_value(params) {
                    Ok(query) => query,
                    Err(e) => {
                        return JsonRpcResponse::failure(id, INVALID_PARAMS, format!("Invalid params: {}", e))
                    }
                };

                match self.resolver.process_query(&query).await {
                    Ok(response) => match serde_json::to_value(&response) {
                        Ok(value) => JsonRpcResponse::success(id, value),
                        Err(e) => JsonRpcResponse::failure(id, INTERNAL_ERROR, e.to_string()),
                    },
                    Err(e @ ResolutionError::InvalidInput { .. }) => {
                        JsonRpcResponse::failure(id, INVALID_PARAMS, e.to_string())
                    }
                    Err(e) => JsonRpcResponse::failure(id, INTERNAL_ERROR, e.to_string()),
                }
            }

            "search" => {
                let params: SearchParams = match serde_json::from_value(params) {
                    Ok(params) => params,
                    Err(e) => {
                        return JsonRpcResponse::failure(id, INVALID_PARAMS, format!("Invalid params: {}", e))
                    }
                };
                self.handle_search(id, params).await
            }

            "usage" => match self.resolver.usage_stats().await {
                Ok(stats) => JsonRpcResponse::success(id, json!(stats)),
                Err(e) => JsonRpcResponse::failure(id, INTERNAL_ERROR, e.to_string()),
            },

            _ => JsonRpcResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    async fn handle_search(&self, id: Option<Value>, params: SearchParams) -> JsonRpcResponse {
        let candidates = match self.resolver.candidates(&params.text).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "Knowledge lookup failed for search request");
                return JsonRpcResponse::failure(id, INTERNAL_ERROR, e.to_string());
            }
        };

        let mut query = SearchQuery::new(params.text.as_str());
        query.category = params.category;
        query.specialty = params.specialty;
        query.limit = params
            .limit
            .unwrap_or(self.resolver.ranker().config().default_limit);

        let results = self.resolver.ranker().search(&query, &candidates);
        JsonRpcResponse::success(id, json!({ "results": results }))
    }
}
