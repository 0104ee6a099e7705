// handlers/records.rs
//
// Create/edit/delete/status. Each successful call is applied to the loaded
// list right away, then the list is fetched again.

use crate::entities::{EntitySpec, FieldErrors, FormInput};
use crate::errors::ServerError;
use crate::handlers::lists;
use crate::listview::envelope::single_record;
use crate::listview::record::{as_flag, lookup};
use crate::listview::{ensure_loaded, ListParams, Mutation};
use crate::responses::{html_response, html_response_with_status, redirect, ResultResp};
use crate::state::AppState;
use crate::templates::pages::{form_page, FormPageVm};
use serde_json::Value;

/// Hidden form field carrying the list's query string, so a mutation lands
/// back on the same page, search and sort.
const BACK_FIELD: &str = "back";

/// GET /{entity}/new
pub fn new_form(entity: &EntitySpec) -> ResultResp {
    render_form(entity, None, &FormInput::new(), &FieldErrors::new(), None, 200)
}

/// GET /{entity}/{id}/edit
pub fn edit_form(app: &AppState, entity: &EntitySpec, id: &str) -> ResultResp {
    let record = find_loaded(app, entity, id)?;
    let values = entity.form.prefill(&record, app.config.display_offset);
    render_form(entity, Some(id), &values, &FieldErrors::new(), None, 200)
}

/// POST /{entity}
pub fn create(app: &AppState, entity: &EntitySpec, form: &FormInput) -> ResultResp {
    let payload = match entity.form.validate(form, app.config.display_offset) {
        Ok(payload) => payload,
        Err(errors) => {
            tracing::info!(entity = entity.slug, fields = ?errors.keys().collect::<Vec<_>>(), "create failed validation");
            return render_form(entity, None, form, &errors, None, 400);
        }
    };

    match app.api.create(entity.resource, &payload) {
        Ok(body) => {
            if let Some(record) = single_record(&body) {
                app.view(entity)?.apply(&Mutation::Created(record));
            }
            tracing::info!(entity = entity.slug, "created record");
            refetch(app, entity);
            redirect(&back_to(app, entity, form))
        }
        Err(e) => {
            tracing::warn!(entity = entity.slug, error = %e, "create failed");
            render_form(entity, None, form, &FieldErrors::new(), Some(&e.user_message()), 502)
        }
    }
}

/// POST /{entity}/{id}
pub fn update(app: &AppState, entity: &EntitySpec, id: &str, form: &FormInput) -> ResultResp {
    let payload = match entity.form.validate(form, app.config.display_offset) {
        Ok(payload) => payload,
        Err(errors) => {
            tracing::info!(entity = entity.slug, id, "update failed validation");
            return render_form(entity, Some(id), form, &errors, None, 400);
        }
    };

    match app.api.update(entity.resource, id, &payload) {
        Ok(_) => {
            app.view(entity)?.apply(&Mutation::Updated {
                id: id.to_string(),
                patch: payload,
            });
            tracing::info!(entity = entity.slug, id, "updated record");
            refetch(app, entity);
            redirect(&back_to(app, entity, form))
        }
        Err(e) => {
            tracing::warn!(entity = entity.slug, id, error = %e, "update failed");
            render_form(entity, Some(id), form, &FieldErrors::new(), Some(&e.user_message()), 502)
        }
    }
}

/// POST /{entity}/{id}/delete
pub fn delete(app: &AppState, entity: &EntitySpec, id: &str, form: &FormInput) -> ResultResp {
    if let Err(e) = app.api.delete(entity.resource, id) {
        tracing::warn!(entity = entity.slug, id, error = %e, "delete failed");
        return lists::render(app, entity, &back_params(app, form), Some(&e.user_message()));
    }

    let removed = app.view(entity)?.apply(&Mutation::Deleted { id: id.to_string() });
    tracing::info!(entity = entity.slug, id, removed, "deleted record");

    refetch(app, entity);
    redirect(&back_to(app, entity, form))
}

/// POST /{entity}/{id}/status: flips the entity's boolean status field.
pub fn toggle_status(app: &AppState, entity: &EntitySpec, id: &str, form: &FormInput) -> ResultResp {
    let field = entity.toggle_field.ok_or(ServerError::NotFound)?;
    let record = find_loaded(app, entity, id)?;
    let active = !lookup(&record, field).and_then(as_flag).unwrap_or(false);

    if let Err(e) = app.api.set_status(entity.resource, id, field, active) {
        tracing::warn!(entity = entity.slug, id, field, error = %e, "status change failed");
        return lists::render(app, entity, &back_params(app, form), Some(&e.user_message()));
    }
    app.view(entity)?.apply(&Mutation::StatusSet {
        id: id.to_string(),
        field,
        active,
    });
    tracing::info!(entity = entity.slug, id, field, active, "status changed");

    refetch(app, entity);
    redirect(&back_to(app, entity, form))
}

/// Record from the loaded list, loading the first page if nothing is held yet.
fn find_loaded(app: &AppState, entity: &EntitySpec, id: &str) -> Result<Value, ServerError> {
    let view = app.view(entity)?;
    if let Some(record) = view.find_record(id) {
        return Ok(record);
    }

    let params = ListParams::new(app.config.default_page_size);
    let sort = entity.default_sort();
    let snapshot = ensure_loaded(app.list_fetch(entity)?, &params, &sort)?;
    snapshot.find(id).cloned().ok_or(ServerError::NotFound)
}

/// Re-reads the list after a write. The optimistic state stays if this fails.
fn refetch(app: &AppState, entity: &EntitySpec) {
    let fallback = entity.source().query(
        &ListParams::new(app.config.default_page_size),
        &entity.view,
        &entity.default_sort(),
        None,
    );
    let result = app
        .view(entity)
        .map_err(|e| e.to_string())
        .and_then(|view| {
            view.reload(app.api.as_ref(), entity.resource, fallback)
                .map_err(|e| e.to_string())
        });
    if let Err(error) = result {
        tracing::warn!(entity = entity.slug, %error, "re-fetch after write failed");
    }
}

/// List URL to return to. The carried query is re-parsed rather than echoed.
fn back_to(app: &AppState, entity: &EntitySpec, form: &FormInput) -> String {
    match form.get(BACK_FIELD).filter(|q| !q.is_empty()) {
        Some(_) => back_params(app, form).href(&entity.list_path()),
        None => entity.list_path(),
    }
}

/// List state the mutation was started from.
fn back_params(app: &AppState, form: &FormInput) -> ListParams {
    let query = form.get(BACK_FIELD).map(String::as_str).filter(|q| !q.is_empty());
    match query {
        Some(query) => ListParams::parse(Some(query), app.config.default_page_size),
        None => ListParams::new(app.config.default_page_size),
    }
}

fn render_form(
    entity: &EntitySpec,
    record_id: Option<&str>,
    values: &FormInput,
    errors: &FieldErrors,
    message: Option<&str>,
    status: u16,
) -> ResultResp {
    let markup = form_page(&FormPageVm {
        entity,
        record_id,
        values,
        errors,
        message,
    });
    if status == 200 {
        html_response(markup)
    } else {
        html_response_with_status(status, markup)
    }
}
