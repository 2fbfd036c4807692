use crate::error::{ConvertError, Result};
use kuchiki::traits::TendrilSink;
use kuchiki::{Attributes, ElementData, NodeDataRef, NodeRef};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Notion color classes look like `highlight-red` or `block-color-blue`.
static COLOR_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:highlight|block-color)-([a-z_]+)$").unwrap());

/// Notion color names mapped to CSS named colors.
static CSS_COLOR_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("default", "black"),
        ("gray", "gray"),
        ("brown", "saddlebrown"),
        ("orange", "orange"),
        ("yellow", "gold"),
        ("teal", "teal"),
        ("blue", "blue"),
        ("purple", "purple"),
        ("pink", "deeppink"),
        ("red", "red"),
    ])
});

/// Tags the sanitizer keeps; everything else is unwrapped, content retained.
const ALLOWED_TAGS: &[&str] = &[
    "strong", "b", "em", "i", "u", "code", "pre", "span", "br", "ul", "ol", "li", "a", "div",
];

/// Reduce a markup fragment to plain text: text nodes joined by single
/// spaces, surrounding whitespace trimmed. Used for the Front field.
pub fn plain_text(html: &str) -> String {
    let fragment = scraper::Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clean up the HTML of an answer cell.
///
/// - `<mark>` highlights are unwrapped; a mark whose classes map to a text
///   color becomes a `<span>` carrying the equivalent inline style.
/// - Color classes on spans are rewritten to `style="color:..."`.
/// - Anchors keep only `href`.
/// - Tags outside the allowed set are unwrapped, their content kept.
/// - `background-color` rules are stripped from inline styles.
/// - Attribute-less `<span>` wrappers are unwrapped.
///
/// Re-running on already-cleaned output yields identical output.
pub fn sanitize_fragment(html: &str) -> Result<String> {
    let document = kuchiki::parse_html().one(html.to_string());
    let body = select_all(&document, "body")?
        .into_iter()
        .next()
        .ok_or_else(|| ConvertError::Selector("body".to_string()))?
        .as_node()
        .clone();

    // <mark> marks a Notion highlight. Keep the color if one is encoded in
    // its classes, drop the element otherwise.
    for mark in select_all(&document, "body mark")? {
        convert_color_classes(&mark);
        let style = mark.attributes.borrow().get("style").map(str::to_owned);
        match style {
            Some(style) if !style.is_empty() => replace_with_span(mark.as_node(), &style)?,
            _ => unwrap_node(mark.as_node()),
        }
    }

    for span in select_all(&document, "body span")? {
        convert_color_classes(&span);
    }

    // Anchors keep href only.
    for anchor in select_all(&document, "body a")? {
        let mut attrs = anchor.attributes.borrow_mut();
        let href = attrs.get("href").map(str::to_owned);
        attrs.map.clear();
        if let Some(href) = href {
            attrs.insert("href", href);
        }
    }

    // Unwrap disallowed tags, keeping their content. Parents come before
    // children in document order, so nested disallowed tags unwrap cleanly.
    for element in select_all(&document, "body *")? {
        let name = element.name.local.to_string();
        if !ALLOWED_TAGS.contains(&name.as_str()) {
            unwrap_node(element.as_node());
        }
    }

    // Strip background-color from inline styles; drop emptied attributes.
    for element in select_all(&document, "body [style]")? {
        let mut attrs = element.attributes.borrow_mut();
        let style = match attrs.get("style") {
            Some(s) => s.to_owned(),
            None => continue,
        };
        let kept = style
            .split(';')
            .map(str::trim)
            .filter(|rule| !rule.is_empty() && !rule.starts_with("background-color"))
            .collect::<Vec<_>>()
            .join(";");
        if kept.is_empty() {
            attrs.remove("style");
        } else {
            attrs.insert("style", kept);
        }
    }

    // Spans left with neither style nor class are wrapper noise.
    for span in select_all(&document, "body span")? {
        if span.attributes.borrow().map.is_empty() {
            unwrap_node(span.as_node());
        }
    }

    let mut out = Vec::new();
    for child in body.children() {
        child.serialize(&mut out)?;
    }
    let serialized = String::from_utf8(out)?;

    // Normalize <br> variants so downstream fence handling sees one form
    Ok(serialized
        .replace("<br>", "<br/>")
        .replace("<br />", "<br/>"))
}

fn select_all(root: &NodeRef, selector: &str) -> Result<Vec<NodeDataRef<ElementData>>> {
    Ok(root
        .select(selector)
        .map_err(|()| ConvertError::Selector(selector.to_string()))?
        .collect())
}

/// Rewrite Notion color classes into an inline `color` style. Background
/// variants are consumed without producing a rule; unknown color names are
/// consumed best-effort.
fn convert_color_classes(element: &NodeDataRef<ElementData>) {
    let mut attrs = element.attributes.borrow_mut();
    let class_attr = match attrs.get("class") {
        Some(c) => c.to_owned(),
        None => return,
    };

    let mut kept = Vec::new();
    let mut rules = Vec::new();
    for class in class_attr.split_whitespace() {
        match COLOR_CLASS_RE.captures(class) {
            Some(caps) => {
                let key = caps.get(1).map_or("", |m| m.as_str());
                if !key.ends_with("_background") {
                    if let Some(color) = CSS_COLOR_MAP.get(key) {
                        rules.push(format!("color:{color}"));
                    }
                }
            }
            None => kept.push(class),
        }
    }

    if kept.is_empty() {
        attrs.remove("class");
    } else {
        attrs.insert("class", kept.join(" "));
    }
    for rule in &rules {
        merge_style(&mut attrs, rule);
    }
}

/// Merge new inline CSS rules into an element's style attribute.
fn merge_style(attrs: &mut Attributes, new_rules: &str) {
    let existing = attrs.get("style").map(str::to_owned);
    let merged = match existing {
        Some(existing) => {
            let existing = existing.trim().trim_end_matches(';');
            if existing.is_empty() {
                new_rules.to_string()
            } else {
                format!("{existing};{new_rules}")
            }
        }
        None => new_rules.to_string(),
    };
    attrs.insert("style", merged);
}

/// Replace `node` with a `<span style="...">` carrying its children.
fn replace_with_span(node: &NodeRef, style: &str) -> Result<()> {
    let fragment = kuchiki::parse_html().one(format!("<span style=\"{style}\"></span>"));
    let span = fragment
        .select("span")
        .map_err(|()| ConvertError::Selector("span".to_string()))?
        .next()
        .ok_or_else(|| ConvertError::Selector("span".to_string()))?
        .as_node()
        .clone();
    span.detach();

    for child in node.children().collect::<Vec<_>>() {
        span.append(child);
    }
    node.insert_before(span);
    node.detach();
    Ok(())
}

/// Remove `node` from the tree, splicing its children into its place.
fn unwrap_node(node: &NodeRef) {
    for child in node.children().collect::<Vec<_>>() {
        node.insert_before(child);
    }
    node.detach();
}
