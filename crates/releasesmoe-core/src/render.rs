//! HTML card used as the result name under [`NamePolicy::Html`]
//!
//! Web UIs that render result names as HTML show the cover, the release
//! group, the best/alt tag and the AniList metadata as inline-styled pills.
//!
//! [`NamePolicy::Html`]: crate::config::NamePolicy::Html

use html_escape::{encode_single_quoted_attribute, encode_text};

use crate::types::ReleaseRecord;

const ROUNDED_STYLE: &str = "font-weight: 500;font-size: .75rem;padding-top: .125rem;\
padding-bottom: .125rem;padding-left: .625rem;padding-right: .625rem";

const NOTES_STYLE: &str = "padding-left: .625rem;padding-right: .625rem;display: inline-flex;\
align-items: center;margin: 2px;";

const NOTES_ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" height="1.25rem" viewBox="0 -960 960 960" width="1.25rem" fill="#000000"><path d="M160-400v-80h280v80H160Zm0-160v-80h440v80H160Zm0-160v-80h440v80H160Zm360 560v-123l221-220q9-9 20-13t22-4q12 0 23 4.5t20 13.5l37 37q8 9 12.5 20t4.5 22q0 11-4 22.5T863-380L643-160H520Zm300-263-37-37 37 37ZM580-220h38l121-122-18-19-19-18-122 121v38Zm141-141-19-18 37 37-18-19Z"/></svg>"##;

// (text rgb, background rgb)
const BLUE: (&str, &str) = ("30 64 175", "219 234 254");
const GREEN: (&str, &str) = ("22 101 52", "220 252 231");
const RED: (&str, &str) = ("153 27 27", "254 226 226");
const GRAY: (&str, &str) = ("31 41 55", "243 244 246");

fn pill((fg, bg): (&str, &str), text: &str) -> String {
    format!(
        "<span style='color: rgb({fg});font-weight: 500;padding-top: .125rem;\
         padding-bottom: .125rem;padding-left: .300rem;padding-right: .300rem;\
         background-color: rgb({bg});border-radius: .25rem;'>{text}</span>"
    )
}

fn pill_rounded((fg, bg): (&str, &str), text: &str, title: &str, style: &str) -> String {
    format!(
        "<span title='{}' style='color: rgb({fg});background-color: rgb({bg});\
         border-radius: 9999px;{style}'>{text}</span>",
        encode_single_quoted_attribute(title)
    )
}

fn episode_label(count: u32) -> String {
    if count == 1 {
        "1 Episode".to_string()
    } else {
        format!("{count} Episodes")
    }
}

/// Renders the single-line HTML card for a release
pub fn render_card(release: &ReleaseRecord<'_>) -> String {
    let title = release.title;

    let group = pill(BLUE, &encode_text(&release.torrent.release_group));
    let tag = if release.torrent.is_best {
        pill(GREEN, "Best")
    } else {
        pill(RED, "Alt")
    };

    let mut details = vec![pill_rounded(GREEN, &encode_text(&title.format), "", ROUNDED_STYLE)];
    if let Some(year) = title.year {
        details.push(pill_rounded(BLUE, &year.to_string(), "", ROUNDED_STYLE));
    }
    if title.format != "Movie"
        && let Some(count) = title.episodes
    {
        details.push(pill_rounded(GRAY, &episode_label(count), "", ROUNDED_STYLE));
    }
    details.push(pill_rounded(GRAY, &encode_text(&title.status), "", ROUNDED_STYLE));
    if !release.notes.is_empty() {
        details.push(pill_rounded(GRAY, NOTES_ICON, &release.notes, NOTES_STYLE));
    }

    format!(
        "<div style=\"margin-bottom: 8px; margin-top: 8px;display: flex;flex-direction: row; \
         border-style: solid; border-width: 1px; box-sizing: border-box; border-radius: .25rem; \
         border-color: hsl(240 5.9% 90%);\">\
         <img src=\"{cover}\" style=\"border-radius: .25rem 0 0 .25rem; object-fit: cover;\
         height: 7rem; max-width: 100%; display: block;\">\
         <div style=\"padding: .5rem; display: flex; flex-direction: column; \
         justify-content: space-between; height: 7rem\">\
         <div style=\"display: flex; gap: 8px; align-items: center; margin: 0;\">\
         {group} {tag} <h3 style=\"font-weight: 600;font-family: ui-sans-serif, system-ui, sans-serif;\
         padding-bottom: 5px;\"> {name} </h3></div>\
         <div style=\"display: flex; gap: .5rem; display: inline-flex; align-items: center; margin: 0;\">\
         {details}</div></div></div>",
        cover = html_escape::encode_double_quoted_attribute(&title.cover),
        name = encode_text(&title.name),
        details = details.join(" "),
    )
}
