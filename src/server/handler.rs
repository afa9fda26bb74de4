//! Request routing.
//!
//! `/records` and `/records/table` reach the record store; every other
//! target is looked up under the document root, whatever the method.

use crate::http::mime;
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::static_files::{listing, Decision, ResourceResolver};
use crate::store::{Criteria, Record, RecordStore};
use tracing::{debug, warn};

pub const RECORDS_PATH: &str = "/records";
pub const RECORDS_TABLE_PATH: &str = "/records/table";

const CRITERIA_FIELDS: [&str; 3] = ["number", "first", "last"];

/// Turns a parsed request into exactly one response.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    resolver: ResourceResolver,
    store: RecordStore,
}

impl RequestHandler {
    pub fn new(resolver: ResourceResolver, store: RecordStore) -> Self {
        Self { resolver, store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub async fn handle(&self, req: &Request) -> Response {
        match (req.method, req.path()) {
            (Method::POST, RECORDS_PATH) => self.add_record(req).await,
            (Method::GET, RECORDS_PATH) => self.find_records(req, records_json).await,
            (Method::GET, RECORDS_TABLE_PATH) => self.find_records(req, records_table).await,
            (_, path) => self.serve_static(path).await,
        }
    }

    async fn serve_static(&self, path: &str) -> Response {
        let decision = self.resolver.resolve(path).await;
        debug!(path, ?decision, "Resolved");

        match decision {
            Decision::ServeIndexFile(file) | Decision::ServeFile(file) => {
                match tokio::fs::read(&file).await {
                    Ok(body) => Response::ok(mime::guess(&file), body),
                    Err(e) => {
                        // Stat said it was there; treat a vanished file as missing
                        warn!(file = %file.display(), error = %e, "Failed to read file");
                        Response::not_found()
                    }
                }
            }
            Decision::ServeDirectoryListing { uri, entries } => {
                Response::ok("text/html", listing::render(&uri, &entries))
            }
            Decision::Redirect(location) => Response::redirect(&location),
            Decision::NotFound => Response::not_found(),
        }
    }

    async fn add_record(&self, req: &Request) -> Response {
        let fields = req.json.as_ref().and_then(|json| {
            let first = json.get("first")?.as_str()?;
            let last = json.get("last")?.as_str()?;
            Some((first, last))
        });

        let Some((first, last)) = fields else {
            warn!("Record body needs string fields \"first\" and \"last\"");
            return Response::not_found();
        };

        match self.store.append(first, last).await {
            Ok(record) => match serde_json::to_vec(&record) {
                Ok(body) => Response::ok("application/json", body),
                Err(e) => {
                    warn!(error = %e, "Failed to encode record");
                    Response::not_found()
                }
            },
            Err(e) => {
                warn!(error = %e, "Failed to append record");
                Response::not_found()
            }
        }
    }

    async fn find_records(&self, req: &Request, render: fn(&[Record]) -> Option<(&'static str, Vec<u8>)>) -> Response {
        let criteria: Criteria = req
            .query_params()
            .into_iter()
            .filter(|(key, _)| CRITERIA_FIELDS.contains(&key.as_str()))
            .collect();

        let records = match self.store.query(Some(&criteria)).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Record query rejected");
                return Response::not_found();
            }
        };

        match render(&records) {
            Some((content_type, body)) => Response::ok(content_type, body),
            None => Response::not_found(),
        }
    }
}

fn records_json(records: &[Record]) -> Option<(&'static str, Vec<u8>)> {
    serde_json::to_vec(records)
        .ok()
        .map(|body| ("application/json", body))
}

fn records_table(records: &[Record]) -> Option<(&'static str, Vec<u8>)> {
    let rows: String = records
        .iter()
        .map(|r| {
            format!(
                "\n<tr>\n    <td>{}</td>\n    <td>{}</td>\n    <td>{}</td>\n</tr>\n",
                r.number,
                escape_html(&r.first),
                escape_html(&r.last),
            )
        })
        .collect();

    let page = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<meta charset=\"UTF-8\">\n<title>Records</title>\n\n\
         <table>\n<tr><th>Number</th><th>First</th><th>Last</th></tr>{}</table>\n",
        rows
    );
    Some(("text/html", page.into_bytes()))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
