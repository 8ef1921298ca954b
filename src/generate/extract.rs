//! Image URL extraction from provider responses
//!
//! Providers put the generated image in different places depending on the
//! model and on whether the response is streamed. Each known location is a
//! small function over `choices[0]`; they run in priority order and the
//! first non-empty hit wins.

use serde_json::Value;
use tracing::trace;

/// Looks for an image URL inside one completion choice
pub type Extractor = fn(&Value) -> Option<&str>;

/// Known image locations, highest priority first
pub const EXTRACTORS: &[(&str, Extractor)] = &[
    ("delta.images", delta_images),
    ("message.images", message_images),
    ("content[image_url]", content_image_item),
    ("message.content", message_content_string),
];

/// Find the generated image URL in a completion or completion chunk
pub fn extract_image_url(response: &Value) -> Option<String> {
    let choice = response.pointer("/choices/0")?;
    EXTRACTORS.iter().find_map(|(path, extract)| {
        let url = extract(choice).filter(|url| !url.is_empty())?;
        trace!("Image URL found at {}", path);
        Some(url.to_string())
    })
}

fn first_image(images: Option<&Value>) -> Option<&str> {
    images?.pointer("/0/image_url/url")?.as_str()
}

fn delta_images(choice: &Value) -> Option<&str> {
    first_image(choice.pointer("/delta/images"))
}

fn message_images(choice: &Value) -> Option<&str> {
    first_image(choice.pointer("/message/images"))
}

fn content_image_item(choice: &Value) -> Option<&str> {
    ["/delta/content", "/message/content"]
        .iter()
        .filter_map(|pointer| choice.pointer(pointer)?.as_array())
        .find_map(|items| {
            items
                .iter()
                .find(|item| item.get("type").and_then(Value::as_str) == Some("image_url"))?
                .pointer("/image_url/url")?
                .as_str()
        })
}

fn message_content_string(choice: &Value) -> Option<&str> {
    choice.pointer("/message/content")?.as_str()
}
