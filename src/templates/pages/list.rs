// templates/pages/list.rs

use crate::entities::EntitySpec;
use crate::listview::params::ListParams;
use crate::listview::record::{as_flag, lookup};
use crate::listview::row::{Row, STATUS_KEY};
use crate::listview::sort::{SortDirection, SortKind, SortState};
use crate::listview::status::StatusRule;
use crate::listview::ListOutcome;
use crate::templates::components::{error_banner, link_button, metrics_cards, pagination, status_badge};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct ListPageVm<'a> {
    pub entity: &'a EntitySpec,
    pub params: &'a ListParams,
    pub outcome: &'a ListOutcome,
}

pub fn list_page(vm: &ListPageVm) -> Markup {
    let entity = vm.entity;
    let params = vm.params;
    let out = vm.outcome;
    let base = entity.list_path();
    let has_status = !matches!(entity.view.status, StatusRule::None);
    let colspan = entity.view.columns.len() + usize::from(has_status) + 1;

    desktop_layout(
        entity.title,
        Some(entity.slug),
        html! {
            div class="page-header" {
                h1 { (entity.title) }
                div class="actions" {
                    (link_button(&format!("New {}", entity.singular), &format!("{base}/new")))
                    a class="btn btn-secondary" href=(format!("{base}/export.xlsx?{}", params.to_query())) { "Export" }
                    a class="btn btn-secondary" href=(format!("{}&refresh=1", params.href(&base))) { "Refresh" }
                }
            }

            (metrics_cards(&out.metrics))

            form class="search" method="get" action=(base) {
                input type="search" name="q" value=(params.search) placeholder=(format!("Search {}", entity.title.to_lowercase()));
                @if let Some(sort) = &params.sort {
                    input type="hidden" name="sort" value=(sort);
                }
                @if let Some(dir) = params.dir {
                    input type="hidden" name="dir" value=(dir.as_str());
                }
                input type="hidden" name="size" value=(params.size);
                button type="submit" class="btn" { "Search" }
            }

            @if let Some(message) = &out.error {
                (error_banner(message, &format!("{}&refresh=1", params.href(&base))))
                @if out.stale {
                    p class="microcopy" { "Showing rows from the last successful load." }
                }
            }

            div style="overflow-x: auto;" {
                table class="table" {
                    thead {
                        tr {
                            @for column in entity.view.columns {
                                th { (sort_link(column.header, column.key, column.kind.sort_kind(), out, params, &base)) }
                            }
                            @if has_status {
                                th { (sort_link("Status", STATUS_KEY, SortKind::Text, out, params, &base)) }
                            }
                            th { "Actions" }
                        }
                    }
                    tbody {
                        @for row in &out.page.items {
                            (table_row(entity, row, params, has_status, &base))
                        }
                        @if out.page.items.is_empty() {
                            tr {
                                td colspan=(colspan) class="empty" {
                                    @if params.search.is_empty() {
                                        "No " (entity.title.to_lowercase()) " yet."
                                    } @else {
                                        "Nothing matches \"" (params.search) "\"."
                                    }
                                }
                            }
                        }
                    }
                }
            }

            (pagination(&out.page, params, &base))
        },
    )
}

fn sort_link(
    label: &str,
    key: &str,
    kind: SortKind,
    out: &ListOutcome,
    params: &ListParams,
    base: &str,
) -> Markup {
    let active = out.sort.key == key;
    let next: SortState = out.sort.toggle(key, kind);
    html! {
        a href=(params.with_sort(&next).href(base)) class=[active.then_some("sorted")] {
            (label)
            @if active {
                @match out.sort.direction {
                    SortDirection::Asc => " ▲",
                    SortDirection::Desc => " ▼",
                }
            }
        }
    }
}

fn toggle_label(row: &Row, field: &str) -> &'static str {
    if lookup(&row.record, field).and_then(as_flag).unwrap_or(false) {
        "Deactivate"
    } else {
        "Activate"
    }
}

fn table_row(entity: &EntitySpec, row: &Row, params: &ListParams, has_status: bool, base: &str) -> Markup {
    html! {
        tr id=(format!("row-{}", row.id)) {
            @for cell in &row.cells {
                td { (cell.text) }
            }
            @if has_status {
                td { (status_badge(row.status)) }
            }
            td class="row-actions" {
                // Position-keyed rows have no id the API would recognise.
                @if row.keyed {
                    (row_menu(entity, row, params, base))
                }
            }
        }
    }
}

fn row_menu(entity: &EntitySpec, row: &Row, params: &ListParams, base: &str) -> Markup {
    let open = params.menu.is_open(&row.id);
    let back = params.with_menu(params.menu.close()).to_query();

    html! {
        a class="menu-toggle" href=(params.with_menu(params.menu.toggle(&row.id)).href(base)) aria-expanded=(open) { "⋯" }
        @if open {
            div class="dropdown" {
                a href=(entity.record_path(&row.id, Some("edit"))) { "Edit" }
                @if let Some(field) = entity.toggle_field {
                    form method="post" action=(entity.record_path(&row.id, Some("status"))) {
                        input type="hidden" name="back" value=(back);
                        button type="submit" { (toggle_label(row, field)) }
                    }
                }
                form method="post" action=(entity.record_path(&row.id, Some("delete")))
                    onsubmit="return confirm('Delete this record?');" {
                    input type="hidden" name="back" value=(back);
                    button type="submit" class="danger" { "Delete" }
                }
            }
        }
    }
}
