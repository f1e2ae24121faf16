//! Markup cleanup for verse text.
//!
//! The API embeds HTML in verse strings: formatting tags, footnote markers
//! (`<sup class="footnote-marker">`) followed by the footnote body
//! (`<i class="footnote">…</i>`), and entities such as `&nbsp;`. The renderer
//! escapes everything it emits, so text is reduced to plain characters here.

use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Strip tags, drop footnotes, decode entities and collapse whitespace.
pub fn clean_markup(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    let mut text = String::with_capacity(raw.len());
    collect_text(fragment.root_element(), &mut text);

    text.replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_text(element: ElementRef<'_>, text: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(el) => {
                if el.classes().any(|class| class.starts_with("footnote")) {
                    continue;
                }
                let breaks = matches!(el.name(), "br" | "p");
                if breaks {
                    text.push(' ');
                }
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, text);
                }
                if breaks {
                    text.push(' ');
                }
            }
            _ => {}
        }
    }
}
