use maud::{Markup, Render, html};

pub fn render_table<const N: usize>(titles: [&'static str; N], items: Vec<[Markup; N]>) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="min-w-full bg-gray-800 rounded shadow-md" {
                thead class="bg-gray-700" {
                    tr {
                        @for title in titles {
                            th class="py-2 px-4 text-left font-semibold text-gray-300" {(title)}
                        }
                    }
                }
                tbody {
                    @for row in items {
                        tr {
                            @for col in row {
                                td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

/// A nullable column, blank when missing.
pub struct Cell<'a>(pub &'a Option<String>);

impl Render for Cell<'_> {
    fn render(&self) -> Markup {
        html! {
            @if let Some(value) = self.0 {
                (value)
            }
        }
    }
}
