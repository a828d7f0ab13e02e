use maud::{Markup, Render, html};

pub const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";

pub fn table<const N: usize>(
    overall_title: impl Render,
    titles: [&'static str; N],
    items: Vec<[Markup; N]>,
) -> Markup {
    html! {
        div class="container mx-auto" {
            (overall_title)
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
                        @if items.is_empty() {
                            tr {
                                td colspan=(N) class="py-4 px-4 text-center italic text-gray-400" {"No students found"}
                            }
                        }
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
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        h2 class="text-xl font-semibold mb-2" {(s)}
    }
}

pub fn form_element(id: &'static str, label: &'static str, element: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (element)
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    required: bool,
    input_type: Option<&'static str>,
    value: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input required[required] type=(input_type.unwrap_or("text")) id=(id) name=(id) value=[value] class=(INPUT_CLASSES) {}
        },
    )
}

/// A required `<select>` whose options are `(value, label)` pairs.
pub fn select_form_element<'a>(
    id: &'static str,
    label: &'static str,
    options: impl IntoIterator<Item = (&'a str, &'a str)>,
    selected: &str,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            select required id=(id) name=(id) class=(INPUT_CLASSES) {
                option value="" disabled selected[selected.is_empty()] {"Select..."}
                @for (value, text) in options {
                    option value=(value) selected[value.eq_ignore_ascii_case(selected)] {(text)}
                }
            }
        },
    )
}

pub fn form_submit_button(text: Option<&str>) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (text.unwrap_or("Submit"))
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A dismissable notification, swapped out-of-band into `#toasts`.
pub fn toast(kind: ToastKind, message: impl Render) -> Markup {
    let classes = match kind {
        ToastKind::Success => "bg-green-100 border border-green-400 text-green-700",
        ToastKind::Error => "bg-red-100 border border-red-400 text-red-700",
    };

    html! {
        div hx-swap-oob="beforeend:#toasts" {
            div class={"px-4 py-3 rounded relative mb-2 flex flex-row items-center justify-between space-x-4 " (classes)} role="alert" {
                span {(message)}
                button type="button" class="font-bold" onclick="this.parentElement.remove()" {"×"}
            }
        }
    }
}

pub struct DetailLine<'a>(pub &'static str, pub &'a str);
impl Render for DetailLine<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="text-gray-200 font-semibold" {
                (self.0)
                ": "
                span class="font-medium" {(self.1)}
            }
        }
    }
}
