use scraper::{Html, Selector};

use super::{Element, DOCUMENT_TAG};

// Marks each serialized node with its position so scraper matches map back.
const NODE_ATTR: &str = "data-file-ingest-node";

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn select(scope: &Element, selector: &str) -> Vec<Element> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    let root = scope.root();
    let mut nodes = Vec::new();
    let mut markup = String::new();
    let html = if root.tag_name() == DOCUMENT_TAG {
        for child in root.children() {
            write_node(&child, &mut nodes, &mut markup);
        }
        Html::parse_document(&markup)
    } else {
        write_node(&root, &mut nodes, &mut markup);
        Html::parse_fragment(&markup)
    };

    html.select(&selector)
        .filter_map(|found| found.value().attr(NODE_ATTR))
        .filter_map(|index| index.parse::<usize>().ok())
        .filter_map(|index| nodes.get(index).cloned())
        .collect()
}

fn write_node(element: &Element, nodes: &mut Vec<Element>, out: &mut String) {
    let tag = element.tag_name();
    out.push_str(&format!("<{} {}=\"{}\"", tag, NODE_ATTR, nodes.len()));
    nodes.push(element.clone());

    for (name, value) in element.attributes() {
        out.push_str(&format!(" {}=\"{}\"", name, escape_attr(&value)));
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&tag) {
        return;
    }
    for child in element.children() {
        write_node(&child, nodes, out);
    }
    out.push_str(&format!("</{}>", tag));
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
