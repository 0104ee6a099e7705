// handlers/lists.rs

use crate::entities::EntitySpec;
use crate::listview::envelope::normalize;
use crate::listview::pipeline::arrange;
use crate::listview::source::PagingMode;
use crate::listview::view::Snapshot;
use crate::listview::{ensure_loaded, load_for_render, present, ListParams};
use crate::responses::{html_response, html_response_with_status, ResultResp};
use crate::spreadsheets::export_rows_response;
use crate::state::AppState;
use crate::templates::pages::{list_page, ListPageVm};

/// GET /{entity}
pub fn list(app: &AppState, entity: &EntitySpec, query: Option<&str>) -> ResultResp {
    let params = ListParams::parse(query, app.config.default_page_size);
    render(app, entity, &params, None)
}

/// Renders the list for `params`. `failure` is the message of a mutation that
/// just failed: it takes the banner and the response becomes a 502, with the
/// table still on screen for a retry.
pub fn render(
    app: &AppState,
    entity: &EntitySpec,
    params: &ListParams,
    failure: Option<&str>,
) -> ResultResp {
    let sort = params.sort_state(&entity.view, &entity.default_sort());
    let loaded = load_for_render(app.list_fetch(entity)?, params, &sort);

    let mut outcome = present(&loaded, entity.source(), &entity.view, sort, params, app.now());
    if let Some(message) = failure {
        outcome.error = Some(message.to_string());
    }

    let markup = list_page(&ListPageVm {
        entity,
        params,
        outcome: &outcome,
    });
    match failure {
        Some(_) => html_response_with_status(502, markup),
        None => html_response(markup),
    }
}

/// GET /{entity}/export.xlsx: every row matching the current search, in the
/// current sort order.
pub fn export(app: &AppState, entity: &EntitySpec, query: Option<&str>) -> ResultResp {
    let params = ListParams::parse(query, app.config.default_page_size);
    let source = entity.source();
    let sort = params.sort_state(&entity.view, &entity.default_sort());

    let snapshot = match entity.paging {
        PagingMode::Client => ensure_loaded(app.list_fetch(entity)?, &params, &sort)?,
        // The view only holds one page; ask for everything without touching it.
        PagingMode::Server => {
            let query = source.export_query(&params);
            let body = app.api.list(entity.resource, &query)?;
            Snapshot::from_normalized(normalize(&body), query)
        }
    };

    let now = app.now();
    let rows = arrange(&snapshot, source, &entity.view, &params, &sort, now);

    export_rows_response(entity, &rows, &now.format("%Y%m%d").to_string())
}
