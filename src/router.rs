use crate::entities::{self, parse_form, EntitySpec, FormInput};
use crate::errors::ServerError;
use crate::handlers::{lists, records};
use crate::responses::{html_response, ResultResp};
use crate::state::AppState;
use crate::templates;
use astra::Request;
use std::io::Read;
use url::form_urlencoded;

pub fn handle(mut req: Request, app: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let query = query.as_deref();

    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(decode_segment)
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    tracing::debug!(%method, %path, "request");

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => html_response(templates::pages::home_page()),

        ("GET", [slug]) => lists::list(app, entity(slug)?, query),
        ("GET", [slug, "export.xlsx"]) => lists::export(app, entity(slug)?, query),
        ("GET", [slug, "new"]) => records::new_form(entity(slug)?),
        ("POST", [slug]) => {
            let form = read_form(&mut req)?;
            records::create(app, entity(slug)?, &form)
        }

        ("GET", [slug, id, "edit"]) => records::edit_form(app, entity(slug)?, id),
        ("POST", [slug, id]) => {
            let form = read_form(&mut req)?;
            records::update(app, entity(slug)?, id, &form)
        }
        ("POST", [slug, id, "delete"]) => {
            let form = read_form(&mut req)?;
            records::delete(app, entity(slug)?, id, &form)
        }
        ("POST", [slug, id, "status"]) => {
            let form = read_form(&mut req)?;
            records::toggle_status(app, entity(slug)?, id, &form)
        }

        _ => Err(ServerError::NotFound),
    }
}

fn entity(slug: &str) -> Result<&'static EntitySpec, ServerError> {
    entities::find(slug).ok_or(ServerError::NotFound)
}

fn read_form(req: &mut Request) -> Result<FormInput, ServerError> {
    let mut bytes = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut bytes)
        .map_err(|e| ServerError::BadRequest(format!("Unreadable form body: {e}")))?;
    Ok(parse_form(&bytes))
}

/// Undoes the escaping `EntitySpec::record_path` applies to ids.
fn decode_segment(raw: &str) -> String {
    form_urlencoded::parse(format!("v={raw}").as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| raw.to_string())
}
