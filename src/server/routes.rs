//! Pure request router: (method, path, body) in, HttpResponse out. No
//! socket types anywhere, so the whole surface is testable without a
//! listener.

use crate::server::api;
use crate::server::ServerContext;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

fn json_ok(body: String) -> HttpResponse {
    HttpResponse {
        status_code: 200,
        status_text: "OK",
        content_type: "application/json",
        body,
    }
}

fn api_error_response(err: api::ApiError) -> HttpResponse {
    let (status_code, status_text) = err.status();
    error_response(status_code, status_text, &err.to_string())
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"unknown error\"".to_string())
        ),
    }
}

fn respond(result: Result<String, api::ApiError>) -> HttpResponse {
    match result {
        Ok(body) => json_ok(body),
        Err(err) => api_error_response(err),
    }
}

/// Fit-session sub-path: `/api/fits/{id}/...` -> (id, remainder).
fn fit_route(path: &str) -> Option<(&str, &str)> {
    let rest = path.strip_prefix("/api/fits/")?;
    let rest = rest.split('?').next().unwrap_or(rest);
    match rest.split_once('/') {
        Some((id, tail)) => Some((id, tail)),
        None => Some((rest, "")),
    }
}

pub fn route_request(ctx: &ServerContext, method: &str, path: &str, body: &str) -> HttpResponse {
    let bare_path = path.split('?').next().unwrap_or(path);

    match (method, bare_path) {
        ("GET", "/api/health") => return respond(api::health_payload(ctx)),
        ("POST", "/api/fits") => return respond(api::create_fit_payload(ctx, body)),
        ("GET", "/api/catalog/items") => return respond(api::catalog_items_payload(ctx, path)),
        _ => {}
    }

    if method == "GET" {
        if let Some(name) = bare_path
            .strip_prefix("/api/hulls/")
            .and_then(|rest| rest.strip_suffix("/slots"))
        {
            return respond(api::hull_slots_payload(ctx, name));
        }
    }

    if let Some((id, tail)) = fit_route(bare_path) {
        return match (method, tail) {
            ("GET", "stats") => {
                let range_km = api::query_param(path, "range_km").and_then(|v| v.parse().ok());
                respond(api::stats_payload(ctx, id, range_km))
            }
            ("GET", "modules") => respond(api::modules_get_payload(ctx, id)),
            ("POST", "modules") => respond(api::modules_post_payload(ctx, id, body)),
            ("POST", "validate") => respond(api::validate_payload(ctx, id)),
            ("POST", "optimize") => respond(api::optimize_payload(ctx, id, body)),
            ("POST", "pareto") => respond(api::pareto_payload(ctx, id, body)),
            ("DELETE", "") => respond(api::delete_fit_payload(ctx, id)),
            _ => error_response(404, "Not Found", "Route not found"),
        };
    }

    error_response(404, "Not Found", "Route not found")
}
