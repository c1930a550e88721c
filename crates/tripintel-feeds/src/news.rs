//! RSS parsing for the news feed endpoint.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::FeedsError;
use crate::types::NewsItem;

/// Parse an RSS feed into [`NewsItem`]s.
///
/// Extracts `<item>` elements, pulling `<title>`, `<link>`, `<description>`,
/// and `<pubDate>`. HTML tags inside descriptions are stripped. Stops after
/// `max_items`.
pub(crate) fn parse_news_rss(xml: &str, max_items: usize) -> Result<Vec<NewsItem>, FeedsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut in_description = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut link = String::new();
    let mut description = String::new();
    let mut pub_date = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("").to_string();
                if name == "item" {
                    in_item = true;
                    in_description = false;
                    title.clear();
                    link.clear();
                    description.clear();
                    pub_date.clear();
                } else if name == "description" && in_item {
                    in_description = true;
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "description" {
                    in_description = false;
                }
                if name == "item" && in_item {
                    in_item = false;
                    if !title.is_empty() && !link.is_empty() {
                        items.push(NewsItem {
                            title: title.clone(),
                            url: link.clone(),
                            summary: strip_html(&description),
                            published_at: if pub_date.is_empty() {
                                None
                            } else {
                                Some(pub_date.clone())
                            },
                        });
                        if items.len() >= max_items {
                            break;
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    if in_description {
                        // Text nodes keep arriving after nested tags like <b>.
                        if !description.is_empty() {
                            description.push(' ');
                        }
                        description.push_str(&text);
                    } else {
                        match current_tag.as_str() {
                            "title" => title = text,
                            "link" => link = text,
                            "pubDate" => pub_date = text,
                            _ => {}
                        }
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_item && in_description {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    description = strip_html(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedsError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

/// Strip HTML tags from a string and normalize whitespace.
fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
