// templates/pages/home.rs

use crate::entities::CATALOG;
use crate::listview::source::PagingMode;
use crate::templates::{components::card, desktop_layout};
use maud::{html, Markup};

pub fn home_page() -> Markup {
    desktop_layout(
        "Overview",
        None,
        html! {
            h1 { "Dashboard" }

            div class="grid" {
                @for entity in CATALOG {
                    (card(entity.title, html! {
                        p {
                            @match entity.paging {
                                PagingMode::Client => "Searched and sorted in the dashboard.",
                                PagingMode::Server => "Paged by the platform API.",
                            }
                        }
                        a href=(entity.list_path()) { "Open " (entity.title.to_lowercase()) }
                    }))
                }
            }
        },
    )
}
