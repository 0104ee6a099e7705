use crate::listview::metrics::ListMetrics;
use crate::listview::paginate::{Page, PAGE_SIZES};
use crate::listview::params::ListParams;
use crate::listview::status::Status;
use maud::{html, Markup};

pub mod error;

pub use error::error_page;

pub fn button(label: &str) -> Markup {
    html! {
        button type="submit" class="btn" { (label) }
    }
}

pub fn link_button(label: &str, href: &str) -> Markup {
    html! {
        a class="btn" href=(href) { (label) }
    }
}

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn status_badge(status: Option<Status>) -> Markup {
    html! {
        @if let Some(status) = status {
            span class=(status.css_class()) { (status.label()) }
        }
    }
}

/// Inline failure notice. Rows from the last good load may still follow it.
pub fn error_banner(message: &str, retry_href: &str) -> Markup {
    html! {
        div class="alert alert-error" role="alert" {
            span { (message) }
            " "
            a href=(retry_href) { "Retry" }
        }
    }
}

pub fn metrics_cards(metrics: &ListMetrics) -> Markup {
    html! {
        div class="metrics" {
            div class="metric" {
                span class="metric-value" { (metrics.total) }
                span class="metric-label" { "Total" }
            }
            @for (status, count) in &metrics.by_status {
                div class="metric" {
                    span class="metric-value" { (count) }
                    span class=(status.css_class()) { (status.label()) }
                }
            }
            @if metrics.page_local && !metrics.by_status.is_empty() {
                p class="microcopy" { "Status counts cover the current page." }
            }
        }
    }
}

pub fn pagination<T>(page: &Page<T>, params: &ListParams, base: &str) -> Markup {
    html! {
        nav class="pagination" {
            span class="range" {
                (page.first_index()) "–" (page.last_index()) " of " (page.total)
            }
            @if page.has_prev() {
                a href=(params.with_page(page.page - 1).href(base)) { "Previous" }
            } @else {
                span class="disabled" { "Previous" }
            }
            span class="current" { "Page " (page.page) " of " (page.total_pages) }
            @if page.has_next() {
                a href=(params.with_page(page.page + 1).href(base)) { "Next" }
            } @else {
                span class="disabled" { "Next" }
            }
            span class="sizes" {
                @for size in PAGE_SIZES {
                    @if *size == page.size {
                        strong { (size) }
                    } @else {
                        a href=(params.with_size(*size).href(base)) { (size) }
                    }
                }
            }
        }
    }
}
