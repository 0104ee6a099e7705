use crate::entities::CATALOG;
use maud::{html, Markup, DOCTYPE};

/// Page shell with the entity navigation. `active` is the slug of the
/// entity being shown, if any.
pub fn desktop_layout(title: &str, active: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Booking Admin" }
                link rel="icon" href="/static/favicon/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    a href="/" class="brand" { "Booking Admin" }
                }
                div class="shell" {
                    nav class="sidebar" {
                        ul {
                            li class=[active.is_none().then_some("active")] { a href="/" { "Overview" } }
                            @for entity in CATALOG {
                                li class=[(active == Some(entity.slug)).then_some("active")] {
                                    a href=(entity.list_path()) { (entity.title) }
                                }
                            }
                        }
                    }
                    main class="container" {
                        (content)
                    }
                }
            }
        }
    }
}
